/// Keyword intent classification
///
/// Lower-cases the message and checks the rules in order; the first rule
/// with a keyword contained in the message wins. Order matters: "rent a car
/// at a good price" is an availability question, not a price one.

use crate::error::{RentalError, Result};
use serde::{Deserialize, Serialize};

/// What the user is after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    CheckAvailability,
    CheckPrice,
    MakeReservation,
    Unknown,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Intent::CheckAvailability => "CHECK_AVAILABILITY",
            Intent::CheckPrice => "CHECK_PRICE",
            Intent::MakeReservation => "MAKE_RESERVATION",
            Intent::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

// Evaluated top to bottom
const RULES: &[(Intent, &[&str])] = &[
    (Intent::CheckAvailability, &["available", "rent", "car"]),
    (Intent::CheckPrice, &["price", "cost", "rate"]),
    (Intent::MakeReservation, &["book", "reserve"]),
];

pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify a message
    ///
    /// # Returns
    /// * `Ok(Intent)` - `Intent::Unknown` when no rule matches
    /// * `Err(RentalError::InvalidInput)` - Empty or whitespace-only message
    pub fn classify(message: &str) -> Result<Intent> {
        if message.trim().is_empty() {
            return Err(RentalError::InvalidInput("message is empty".to_string()));
        }

        let folded = message.to_lowercase();

        let intent = RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Unknown);

        Ok(intent)
    }
}
