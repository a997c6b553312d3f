use crate::api::models::ShareableLink;
use crate::api::ApiError;
use crate::domain::PropertyView;
use crate::templates::components::{api_error_banner, card, empty_state};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct AgentToolsVm {
    pub properties: Vec<PropertyView>,
    pub selected: Option<PropertyView>,
    pub link: Option<ShareableLink>,
    pub error: Option<ApiError>,
}

const PLATFORMS: [(&str, &str); 4] = [
    ("instagram", "Instagram"),
    ("facebook", "Facebook"),
    ("twitter", "X / Twitter"),
    ("linkedin", "LinkedIn"),
];

pub fn agent_tools_page(vm: &AgentToolsVm) -> Markup {
    desktop_layout(
        "Agent Tools",
        "/agent-tools",
        html! {
            h1 { "Agent tools" }
            @if let Some(err) = &vm.error { (api_error_banner(err)) }

            @if vm.properties.is_empty() {
                (empty_state("Upload a property to generate listing copy and share links."))
            } @else {
                form method="get" action="/agent-tools" class="inline-form" {
                    label { "Property "
                        select name="id" onchange="this.form.submit()" {
                            @for p in &vm.properties {
                                option value=(p.id) selected[vm.selected.as_ref().map(|s| s.id == p.id).unwrap_or(false)] {
                                    (if p.address.is_empty() { p.id.as_str() } else { p.address.as_str() })
                                }
                            }
                        }
                    }
                    noscript { button type="submit" class="btn" { "Show" } }
                }
            }

            @if let Some(p) = &vm.selected {
                (listing_card(p))
                (social_card(p))
                (share_card(p, vm.link.as_ref()))
            }
        },
    )
}

fn listing_card(p: &PropertyView) -> Markup {
    let copy = &p.listing_copy;
    card(
        "Listing copy",
        html! {
            @if copy.headline.is_none() && copy.description.is_none() {
                p class="muted" { "No listing copy yet. It is written after enrichment completes." }
            } @else {
                @if let Some(h) = &copy.headline { h3 { (h) } }
                @if let Some(d) = &copy.description { p class="copyable" { (d) } }
                @if !copy.highlights.is_empty() {
                    ul { @for h in &copy.highlights { li { (h) } } }
                }
                @if let Some(cta) = &copy.call_to_action { p { strong { (cta) } } }
                @if let Some(subject) = &copy.email_subject { p { "Email subject: " em { (subject) } } }
                @if !copy.seo_keywords.is_empty() { p class="muted" { "Keywords: " (copy.seo_keywords.join(", ")) } }
            }
            a href=(format!("/properties/{}#listing", p.id)) { "Edit on the property page" }
        },
    )
}

fn social_card(p: &PropertyView) -> Markup {
    let caption = p.listing_copy.social_media_caption.as_deref();
    card(
        "Social media",
        html! {
            @if p.social_variants.is_empty() && caption.is_none() {
                p class="muted" { "No social posts generated yet." }
            }
            @if let Some(c) = caption {
                div class="social-post" { h4 { "Caption" } p class="copyable" { (c) } }
            }
            @for (key, label) in PLATFORMS {
                @if let Some(text) = p.social_variants.get(key) {
                    div class="social-post" { h4 { (label) } p class="copyable" { (text) } }
                }
            }
            // Platforms the backend added that we have no label for.
            @for (key, text) in &p.social_variants {
                @if !PLATFORMS.iter().any(|(k, _)| *k == key.as_str()) {
                    div class="social-post" { h4 { (key) } p class="copyable" { (text) } }
                }
            }
        },
    )
}

fn share_card(p: &PropertyView, link: Option<&ShareableLink>) -> Markup {
    card(
        "Share",
        html! {
            @match link.and_then(|l| l.share_url.as_deref()) {
                Some(url) => {
                    p { a href=(url) target="_blank" { (url) } }
                    @if let Some(expires) = link.and_then(|l| l.expires_at.as_deref()) {
                        p class="muted" { "Expires " (expires) }
                    }
                }
                None => p class="muted" { "This property has not been shared yet." },
            }
            form method="post" action=(format!("/properties/{}/share", p.id)) {
                input type="hidden" name="return_to" value=(format!("/agent-tools?id={}", p.id));
                button type="submit" class="btn btn-primary" {
                    @if link.is_some() { "Get share link" } @else { "Generate share link" }
                }
            }
        },
    )
}
