use crate::api::models::TokenInfo;
use crate::chat::{ChatMessage, Speaker};
use crate::domain::insights::{format_count, format_currency};
use crate::domain::PropertyView;
use crate::templates::components::{card, score_badge};
use crate::templates::public_layout;
use maud::{html, Markup};

pub fn public_report_page(token: &str, p: &PropertyView, info: Option<&TokenInfo>) -> Markup {
    let title = if p.address.is_empty() { "Property report" } else { p.address.as_str() };
    let chat_url = format!("/report/{token}/chat");
    public_layout(
        title,
        html! {
            h1 { (title) }
            @if let Some(expires) = info.and_then(|i| i.expires_at.as_deref()) {
                p class="muted" { "This report is available until " (expires) "." }
            }

            div class="detail-grid" {
                @if let Some(url) = &p.image_url {
                    figure class="floor-plan" { img src=(url) alt="Floor plan"; }
                }
                dl class="key-facts" {
                    dt { "Bedrooms" } dd { (format_count(p.bedrooms)) }
                    dt { "Bathrooms" } dd { (format_count(p.bathrooms)) }
                    @if p.square_footage > 0.0 { dt { "Size" } dd { (format_count(p.square_footage)) " sq ft" } }
                    @if p.price() > 0.0 { dt { "Estimated value" } dd { (format_currency(p.price())) } }
                    @if let Some(inv) = &p.insights.investment { dt { "Investment score" } dd { (score_badge(inv.score)) } }
                }
            }

            @if let Some(headline) = &p.listing_copy.headline {
                (card(headline, html! {
                    @if let Some(d) = &p.listing_copy.description { p { (d) } }
                    @if !p.listing_copy.highlights.is_empty() {
                        ul { @for h in &p.listing_copy.highlights { li { (h) } } }
                    }
                }))
            }

            @if !p.features.is_empty() {
                (card("Features", html! { ul class="tags" { @for f in &p.features { li { (f) } } } }))
            }

            (card("Ask about this property", html! {
                div id="chat-log" class="chat-log" aria-live="polite" {
                    (chat_messages(&[ChatMessage {
                        speaker: Speaker::Assistant,
                        text: "Hi! Ask me about the price, size, rooms, features or neighborhood.".into(),
                    }]))
                }
                form class="chat-form" method="post" action=(chat_url)
                    hx-post=(chat_url) hx-target="#chat-log" hx-swap="beforeend"
                {
                    input type="text" name="question" required placeholder="Type a question" autocomplete="off";
                    button type="submit" class="btn btn-primary" { "Send" }
                }
            }))
        },
    )
}

/// Messages appended to the chat log.
pub fn chat_messages(messages: &[ChatMessage]) -> Markup {
    html! {
        @for m in messages {
            div class=(speaker_class(m.speaker)) { (m.text) }
        }
    }
}

fn speaker_class(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::Visitor => "chat-message chat-visitor",
        Speaker::Assistant => "chat-message chat-assistant",
    }
}

/// Invalid or expired token.
pub fn report_unavailable_page(heading: &str, message: &str) -> Markup {
    public_layout(
        heading,
        html! {
            h1 { (heading) }
            p { (message) }
        },
    )
}
