//! Client directory port.
//!
//! The billing engine does not own client profiles; it joins contact
//! data from the directory for presentation only.

use crate::domain::foundation::{ClientId, DomainError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Contact details for a client, as supplied by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContact {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Read-only lookup into the client directory.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Look up a client's contact card.
    ///
    /// Returns `None` if the directory has no such client.
    async fn find_contact(&self, id: &ClientId) -> Result<Option<ClientContact>, DomainError>;
}
