/// Listing documents
///
/// Builds the `{"rentals": [...]}` documents handed back to callers. The
/// file listing sits behind a credential check; the table listing doesn't.

use crate::auth::CredentialVerifier;
use crate::core::codec::RecordCodec;
use crate::core::file_store::FileRecordStore;
use crate::db::TableRecordStore;
use crate::error::{RentalError, Result};
use serde_json::Value;
use std::sync::Arc;

pub struct Listing {
    verifier: Arc<dyn CredentialVerifier>,
}

impl Listing {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }

    /// File-backed rentals, for callers that pass the credential check
    pub async fn file_document(
        &self,
        store: &FileRecordStore,
        id: &str,
        secret: &str,
    ) -> Result<Value> {
        if !self.verifier.verify(id, secret) {
            tracing::warn!(user = %id.trim(), "rejected listing credentials");
            return Err(RentalError::Unauthorized);
        }

        let records = store.list().await?;
        Ok(RecordCodec::encode(&records))
    }

    /// Table-backed rentals. Creates and seeds the table on first use.
    pub async fn table_document(store: &TableRecordStore) -> Result<Value> {
        store.prepare().await?;
        let records = store.list_all().await?;
        Ok(RecordCodec::encode(&records))
    }
}
