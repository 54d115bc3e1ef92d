//! Free-text search criteria extraction.
//!
//! Maps a raw chat utterance to the sparse filter object the recommendation
//! backend accepts. Keyword heuristics only; nothing here parses grammar.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Boston neighborhoods the extractor recognizes, in scan order.
/// First hit wins, so earlier entries shadow later ones when a message
/// names more than one.
const NEIGHBORHOODS: [&str; 16] = [
    "back bay",
    "beacon hill",
    "south end",
    "dorchester",
    "jamaica plain",
    "charlestown",
    "east boston",
    "roxbury",
    "north end",
    "fenway",
    "allston",
    "brighton",
    "seaport",
    "south boston",
    "west end",
    "financial district",
];

/// Buy-or-rent intent detected in a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Buy,
    Rent,
}

/// Sparse property filter. Absent fields are unconstrained and are omitted
/// from the serialized request body entirely, never sent as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
}

impl SearchCriteria {
    /// True when no detector matched; an empty criteria never triggers a
    /// recommendation refresh.
    pub fn is_empty(&self) -> bool {
        self.neighborhood.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.max_price.is_none()
            && self.mode.is_none()
    }
}

fn bedroom_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(bed|bedroom|br)").expect("invalid bedroom regex"))
}

fn bathroom_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(bath|bathroom|ba)").expect("invalid bathroom regex"))
}

fn price_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"under\s*\$?(\d+)k?").expect("invalid price regex"))
}

/// Derive a [`SearchCriteria`] from a raw user message.
///
/// Pure and total: unrecognized input yields the empty criteria. Matching is
/// case-insensitive. Neighborhoods resolve first-match-wins in canonical list
/// order, and the rent branch is checked before buy, so a message naming both
/// resolves to rent.
pub fn extract_search_criteria(text: &str) -> SearchCriteria {
    let lower = text.to_lowercase();
    let mut criteria = SearchCriteria::default();

    for hood in NEIGHBORHOODS {
        let patterns = [
            format!("in {hood}"),
            format!("near {hood}"),
            format!("around {hood}"),
            format!("at {hood}"),
            hood.to_string(),
        ];
        if patterns.iter().any(|pattern| lower.contains(pattern.as_str())) {
            criteria.neighborhood = Some(title_case(hood));
            break;
        }
    }

    if let Some(caps) = bedroom_re().captures(&lower) {
        criteria.bedrooms = caps[1].parse().ok();
    }

    if let Some(caps) = bathroom_re().captures(&lower) {
        criteria.bathrooms = caps[1].parse().ok();
    }

    if let Some(caps) = price_re().captures(&lower) {
        if let Ok(value) = caps[1].parse::<u64>() {
            // Values up to 1000 are read as "thousands" shorthand: "under
            // 500k" and "under 500" both mean $500,000, while "under 2000"
            // stays literal.
            criteria.max_price = Some(if value > 1000 { value } else { value * 1000 });
        }
    }

    if lower.contains("rent") || lower.contains("rental") {
        criteria.mode = Some(Mode::Rent);
    } else if lower.contains("buy") || lower.contains("purchase") || lower.contains("sale") {
        criteria.mode = Some(Mode::Buy);
    }

    criteria
}

/// Title-case each word of a lowercase neighborhood name.
fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
