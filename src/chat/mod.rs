/// Chat module
///
/// Keyword intent classification and the canned answers built from the car
/// inventory.

pub mod classifier;
pub mod router;
pub mod service;

pub use classifier::{Intent, IntentClassifier};
pub use router::{IntentRouter, InventorySource};
pub use service::{ChatReply, ChatService};
