//! In-memory contact repository for follow-up tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::followup::{
    domain::{Contact, ContactId, NewContact},
    ports::{ContactRepository, FollowupRepositoryError, FollowupRepositoryResult},
};
use crate::tenant::{self, TenantContext, TenantScoped};

/// Thread-safe in-memory contact repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactRepository {
    state: Arc<RwLock<InMemoryContactState>>,
}

#[derive(Debug, Default)]
struct InMemoryContactState {
    contacts: HashMap<ContactId, Contact>,
    next_id: i64,
}

impl InMemoryContactRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> FollowupRepositoryError {
    FollowupRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn create(
        &self,
        ctx: &TenantContext,
        new: NewContact,
    ) -> FollowupRepositoryResult<Contact> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.next_id += 1;
        let id = ContactId::new(state.next_id);
        let contact = Contact::create(new, id, ctx.team(), Utc::now());
        state.contacts.insert(id, contact.clone());
        Ok(contact)
    }

    async fn find(
        &self,
        ctx: &TenantContext,
        id: ContactId,
    ) -> FollowupRepositoryResult<Option<Contact>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .contacts
            .get(&id)
            .filter(|contact| contact.team_id() == ctx.team())
            .cloned())
    }

    async fn update(
        &self,
        ctx: &TenantContext,
        contact: &Contact,
    ) -> FollowupRepositoryResult<()> {
        tenant::ensure_scope(ctx, contact)?;
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.contacts.contains_key(&contact.id()) {
            return Err(FollowupRepositoryError::ContactNotFound(contact.id()));
        }
        state.contacts.insert(contact.id(), contact.clone());
        Ok(())
    }
}
