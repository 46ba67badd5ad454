use std::sync::Arc;

use shared::{
    domain::{Contact, ContactChanges, ContactId},
    error::{ApiError, ErrorCode},
    protocol::ContactListing,
};
use storage::ContactStore;
use tracing::error;

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn ContactStore>,
}

impl ApiContext {
    pub fn new(store: impl ContactStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Lists contacts for the sidebar. The query is echoed exactly as received so
/// the search box keeps what the user typed; blank terms still match everyone.
pub async fn list_contacts(ctx: &ApiContext, q: Option<&str>) -> Result<ContactListing, ApiError> {
    let contacts = ctx.store.get_contacts(q).await.map_err(internal)?;
    Ok(ContactListing {
        contacts,
        q: q.map(str::to_string),
    })
}

pub async fn create_contact(ctx: &ApiContext) -> Result<Contact, ApiError> {
    ctx.store.create_empty_contact().await.map_err(internal)
}

pub async fn get_contact(ctx: &ApiContext, raw_id: &str) -> Result<Contact, ApiError> {
    let id = require_contact_id(raw_id)?;
    ctx.store
        .get_contact(&id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::contact_not_found(id.as_str()))
}

pub async fn update_contact(
    ctx: &ApiContext,
    raw_id: &str,
    changes: ContactChanges,
) -> Result<Contact, ApiError> {
    let id = require_contact_id(raw_id)?;
    ctx.store
        .update_contact(&id, changes)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::contact_not_found(id.as_str()))
}

pub async fn set_favorite(
    ctx: &ApiContext,
    raw_id: &str,
    favorite: bool,
) -> Result<Contact, ApiError> {
    let id = require_contact_id(raw_id)?;
    ctx.store
        .set_favorite(&id, favorite)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::contact_not_found(id.as_str()))
}

/// Deletes the contact named by a path segment. Unknown ids are left to the
/// store, which treats them as a no-op.
pub async fn destroy_contact(ctx: &ApiContext, raw_id: Option<&str>) -> Result<ContactId, ApiError> {
    let id = raw_id
        .and_then(ContactId::parse)
        .ok_or_else(ApiError::missing_contact_id)?;
    ctx.store.delete_contact(&id).await.map_err(internal)?;
    Ok(id)
}

pub async fn health(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.store
        .health_check()
        .await
        .map_err(|e| ApiError::new(ErrorCode::Unavailable, e.to_string()))
}

fn require_contact_id(raw_id: &str) -> Result<ContactId, ApiError> {
    ContactId::parse(raw_id).ok_or_else(ApiError::missing_contact_id)
}

fn internal(err: anyhow::Error) -> ApiError {
    error!(error = %format!("{err:#}"), "contact store operation failed");
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
