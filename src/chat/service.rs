/// Chat request handling
///
/// Takes the raw request body (`{"message": "..."}`), classifies and routes
/// it, and wraps the outcome as `{"response": ...}` or `{"error": ...}`.

use crate::chat::classifier::IntentClassifier;
use crate::chat::router::{IntentRouter, InventorySource};
use crate::error::{RentalError, Result};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

/// Outcome of one chat exchange
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Response(String),
    Error { message: String, server_side: bool },
}

impl ChatReply {
    /// Error reply for a failed exchange, logged by severity
    pub fn from_error(e: &RentalError) -> Self {
        if e.is_server_side() {
            tracing::error!(error = %e, "chat request failed");
        } else {
            tracing::warn!(error = %e, "bad chat request");
        }
        ChatReply::Error {
            message: format!("An error occurred: {}", e),
            server_side: e.is_server_side(),
        }
    }

    pub fn to_document(&self) -> Value {
        match self {
            ChatReply::Response(text) => json!({ "response": text }),
            ChatReply::Error { message, .. } => json!({ "error": message }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ChatReply::Error { .. })
    }
}

pub struct ChatService<S> {
    router: IntentRouter<S>,
}

impl<S: InventorySource> ChatService<S> {
    pub fn new(source: S) -> Self {
        Self {
            router: IntentRouter::new(source),
        }
    }

    /// Answer an already-extracted message
    pub async fn respond(&self, message: &str) -> Result<String> {
        let intent = IntentClassifier::classify(message)?;
        tracing::debug!(%intent, "classified chat message");
        self.router.route(intent, message).await
    }

    /// Answer a raw request body
    pub async fn handle(&self, body: &str) -> Result<String> {
        let request: ChatRequest = serde_json::from_str(body).map_err(|e| {
            RentalError::InvalidInput(format!("expected {{\"message\": <string>}}: {}", e))
        })?;
        self.respond(&request.message).await
    }

    /// Same as `handle`, but never fails: errors become an error reply
    pub async fn reply(&self, body: &str) -> ChatReply {
        match self.handle(body).await {
            Ok(text) => ChatReply::Response(text),
            Err(e) => ChatReply::from_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::router::HELP_TEXT;
    use crate::db::{CarInventory, Database, NewCar};
    use tempfile::TempDir;

    async fn setup() -> (ChatService<CarInventory>, TempDir) {
        let temp = TempDir::new().unwrap();
        let db = Database::new(temp.path().join("chat.db")).await.unwrap();
        let inventory = CarInventory::new(db);
        inventory.ensure_schema().await.unwrap();
        inventory
            .add_car(NewCar {
                make: "Toyota".to_string(),
                model: "Corolla".to_string(),
                year: 2022,
                available: true,
                price_per_day: 45.0,
            })
            .await
            .unwrap();
        inventory
            .add_car(NewCar {
                make: "Ford".to_string(),
                model: "Focus".to_string(),
                year: 2019,
                available: false,
                price_per_day: 30.0,
            })
            .await
            .unwrap();
        (ChatService::new(inventory), temp)
    }

    #[tokio::test]
    async fn test_availability_from_database() {
        let (service, _temp) = setup().await;

        let reply = service.handle(r#"{"message": "Any car available?"}"#).await.unwrap();
        assert_eq!(reply, "Available cars:\n2022 Toyota Corolla\n");
    }

    #[tokio::test]
    async fn test_price_from_database() {
        let (service, _temp) = setup().await;

        let reply = service.respond("What does it cost?").await.unwrap();
        assert_eq!(reply, "Rental rates per day:\nToyota Corolla: $45.0/day\n");
    }

    #[tokio::test]
    async fn test_hello_gets_help() {
        let (service, _temp) = setup().await;

        let reply = service.reply(r#"{"message": "hello"}"#).await;
        assert_eq!(reply.to_document(), json!({ "response": HELP_TEXT }));
    }

    #[tokio::test]
    async fn test_missing_message_is_invalid_input() {
        let (service, _temp) = setup().await;

        assert!(matches!(
            service.handle(r#"{"text": "hi"}"#).await,
            Err(RentalError::InvalidInput(_))
        ));
        assert!(matches!(
            service.handle(r#"{"message": 42}"#).await,
            Err(RentalError::InvalidInput(_))
        ));
        assert!(matches!(
            service.handle("not json").await,
            Err(RentalError::InvalidInput(_))
        ));

        let reply = service.reply(r#"{"message": "  "}"#).await;
        assert!(reply.is_error());
        assert!(matches!(reply, ChatReply::Error { server_side: false, .. }));
        assert!(reply.to_document()["error"]
            .as_str()
            .unwrap()
            .starts_with("An error occurred"));
    }

    #[tokio::test]
    async fn test_database_failure_is_server_side() {
        let temp = TempDir::new().unwrap();
        let db = Database::new(temp.path().join("chat.db")).await.unwrap();
        // No ensure_schema: the cars table doesn't exist.
        let service = ChatService::new(CarInventory::new(db));

        let reply = service.reply(r#"{"message": "rent"}"#).await;
        assert!(matches!(reply, ChatReply::Error { server_side: true, .. }));
    }

    #[test]
    fn test_error_reply_document() {
        let reply = ChatReply::from_error(&RentalError::Config("no home".to_string()));

        assert!(reply.is_error());
        assert!(matches!(reply, ChatReply::Error { server_side: true, .. }));
        assert_eq!(
            reply.to_document(),
            json!({ "error": "An error occurred: Configuration error: no home" })
        );
    }
}
