//! Scripted assistant for the public report page. No model behind it: the
//! question is matched against keyword lists and answered from a template
//! filled with the property's own data.

use crate::domain::insights::{format_count, format_currency, ScoreLevel};
use crate::domain::PropertyView;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Greeting,
    Neighborhood,
    Issues,
    Cost,
    Investment,
    Size,
    Bedrooms,
    Features,
    Unknown,
}

// Checked in order; the first topic whose pattern matches wins. Whole words
// only, so "current" is not about rent.
static TOPIC_PATTERNS: LazyLock<Vec<(Topic, Regex)>> = LazyLock::new(|| {
    [
        (Topic::Neighborhood, r"\b(?:neighbou?rhoods?|areas?|location|nearby|schools?)\b"),
        (Topic::Issues, r"\b(?:issues?|problems?|concerns?|risks?|risky|downsides?|wrong)\b"),
        (Topic::Investment, r"\b(?:invest\w*|rent|rental|rents|renting|roi|cap rate|apprecia\w*)\b"),
        (Topic::Cost, r"\b(?:costs?|price[ds]?|pricing|worth|values?|expensive|afford\w*|how much)\b"),
        (Topic::Size, r"\b(?:size|square|sqft|sq\.? ?ft|big|bigger|large|larger|space|spacious)\b"),
        (Topic::Bedrooms, r"\b(?:bed(?:room)?s?|bath(?:room)?s?|rooms)\b"),
        (Topic::Features, r"\b(?:features?|amenit\w*|highlights?|layout|kitchen|balcon(?:y|ies))\b"),
        (Topic::Greeting, r"\b(?:hello|hi|hey|good (?:morning|afternoon|evening))\b"),
    ]
    .into_iter()
    .map(|(topic, pattern)| (topic, Regex::new(pattern).unwrap()))
    .collect()
});

pub fn classify(question: &str) -> Topic {
    let lower = question.to_lowercase();
    TOPIC_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&lower))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::Unknown)
}

pub fn answer(question: &str, property: &PropertyView) -> String {
    let address = if property.address.is_empty() {
        "this property".to_string()
    } else {
        property.address.clone()
    };

    match classify(question) {
        Topic::Greeting => format!(
            "Hi! I can answer questions about {address}: price, size, rooms, features, the neighborhood or investment potential."
        ),
        Topic::Neighborhood => match (&property.insights.neighborhood_summary, &property.neighborhood) {
            (Some(summary), _) => summary.clone(),
            (None, Some(name)) => format!("{address} is in {name}. Ask the listing agent for a full neighborhood tour."),
            (None, None) => format!(
                "We don't have a neighborhood report for {address} yet. The listing agent can share local details."
            ),
        },
        Topic::Issues => {
            let risks = property
                .insights
                .investment
                .as_ref()
                .map(|inv| inv.risk_factors.as_slice())
                .unwrap_or_default();
            if risks.is_empty() {
                "No specific concerns were flagged in the analysis. An in-person inspection is always recommended.".to_string()
            } else {
                format!("Things to consider: {}.", risks.join("; "))
            }
        }
        Topic::Cost => {
            let price = property.price();
            if price <= 0.0 {
                return "A price estimate isn't available yet. Please contact the listing agent.".to_string();
            }
            let mut reply = format!("The estimated market value is {}", format_currency(price));
            if let Some((lo, hi)) = property.insights.value_range {
                reply.push_str(&format!(
                    ", with a likely range of {} to {}",
                    format_currency(lo),
                    format_currency(hi)
                ));
            }
            if property.square_footage > 0.0 {
                reply.push_str(&format!(
                    " (about {} per sq ft)",
                    format_currency(price / property.square_footage)
                ));
            }
            reply.push('.');
            reply
        }
        Topic::Investment => match &property.insights.investment {
            Some(inv) if inv.score > 0.0 => {
                let mut reply = format!(
                    "The investment score is {}/100 ({}).",
                    inv.score.round(),
                    ScoreLevel::from_score(inv.score).label()
                );
                if let Some(rent) = inv.estimated_rental_income {
                    reply.push_str(&format!(" Estimated rent is {} per month.", format_currency(rent)));
                }
                if let Some(cap) = inv.cap_rate {
                    reply.push_str(&format!(" Projected cap rate: {cap:.1}%."));
                }
                reply
            }
            _ => "An investment analysis hasn't been prepared for this property yet.".to_string(),
        },
        Topic::Size => {
            if property.square_footage > 0.0 {
                format!(
                    "{address} offers approximately {} sq ft{}.",
                    format_count(property.square_footage),
                    if property.layout_type.is_empty() {
                        String::new()
                    } else {
                        format!(" in a {} layout", property.layout_type.to_lowercase())
                    }
                )
            } else {
                "The square footage hasn't been measured yet.".to_string()
            }
        }
        Topic::Bedrooms => format!(
            "It has {} bedroom{} and {} bathroom{}.",
            format_count(property.bedrooms),
            plural(property.bedrooms),
            format_count(property.bathrooms),
            plural(property.bathrooms)
        ),
        Topic::Features => {
            if property.features.is_empty() {
                "The floor plan analysis didn't list specific features. The photos and floor plan above show the layout.".to_string()
            } else {
                format!("Highlights include: {}.", property.features.join(", "))
            }
        }
        Topic::Unknown => "I can help with price, size, rooms, features, the neighborhood, potential issues or investment potential. For anything else, please contact the listing agent.".to_string(),
    }
}

fn plural(n: f64) -> &'static str {
    if n == 1.0 {
        ""
    } else {
        "s"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Visitor,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

/// The whole conversation state: an ordered list of messages.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Record a question and its answer; returns the answer.
    pub fn ask(&mut self, question: &str, property: &PropertyView) -> &ChatMessage {
        let reply = answer(question, property);
        self.messages.push(ChatMessage {
            speaker: Speaker::Visitor,
            text: question.trim().to_string(),
        });
        self.messages.push(ChatMessage {
            speaker: Speaker::Assistant,
            text: reply,
        });
        &self.messages[self.messages.len() - 1]
    }
}
