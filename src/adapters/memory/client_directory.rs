//! Static client directory implementation.
//!
//! Serves contact cards from a fixed map. Used in development and
//! integration tests where no external directory is wired up.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{ClientId, DomainError};
use crate::ports::{ClientContact, ClientDirectory};

/// Fixed-map implementation of the ClientDirectory port.
#[derive(Default)]
pub struct StaticClientDirectory {
    contacts: Mutex<HashMap<ClientId, ClientContact>>,
}

impl StaticClientDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a contact card.
    pub fn insert(&self, contact: ClientContact) {
        self.contacts.lock().unwrap().insert(contact.id, contact);
    }
}

#[async_trait]
impl ClientDirectory for StaticClientDirectory {
    async fn find_contact(
        &self,
        id: &ClientId,
    ) -> Result<Option<ClientContact>, DomainError> {
        Ok(self.contacts.lock().unwrap().get(id).cloned())
    }
}
