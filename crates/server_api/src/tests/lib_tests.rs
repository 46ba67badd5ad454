use super::*;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use storage::Storage;

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext::new(storage)
}

async fn named(ctx: &ApiContext, first: &str) -> Contact {
    let contact = create_contact(ctx).await.expect("create");
    update_contact(
        ctx,
        contact.id.as_str(),
        ContactChanges {
            first: Some(first.to_string()),
            ..ContactChanges::default()
        },
    )
    .await
    .expect("update")
}

struct UnavailableStore;

#[async_trait]
impl ContactStore for UnavailableStore {
    async fn get_contacts(&self, _query: Option<&str>) -> Result<Vec<Contact>> {
        Err(anyhow!("store unavailable"))
    }

    async fn create_empty_contact(&self) -> Result<Contact> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_contact(&self, _id: &ContactId) -> Result<Option<Contact>> {
        Err(anyhow!("store unavailable"))
    }

    async fn update_contact(
        &self,
        _id: &ContactId,
        _changes: ContactChanges,
    ) -> Result<Option<Contact>> {
        Err(anyhow!("store unavailable"))
    }

    async fn set_favorite(&self, _id: &ContactId, _favorite: bool) -> Result<Option<Contact>> {
        Err(anyhow!("store unavailable"))
    }

    async fn delete_contact(&self, _id: &ContactId) -> Result<bool> {
        Err(anyhow!("store unavailable"))
    }

    async fn health_check(&self) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }
}

#[tokio::test]
async fn list_echoes_query_and_filters() {
    let ctx = setup().await;
    let ada = named(&ctx, "Ada").await;
    named(&ctx, "Bo").await;

    let listing = list_contacts(&ctx, Some("Ada")).await.expect("list");
    assert_eq!(listing.q.as_deref(), Some("Ada"));
    assert_eq!(listing.contacts, vec![ada]);
}

#[tokio::test]
async fn blank_query_lists_everything_and_echoes_raw_term() {
    let ctx = setup().await;
    named(&ctx, "Ada").await;
    named(&ctx, "Bo").await;

    let unfiltered = list_contacts(&ctx, None).await.expect("list");
    let blank = list_contacts(&ctx, Some("  ")).await.expect("list");
    assert_eq!(blank.q.as_deref(), Some("  "));
    assert_eq!(unfiltered.q, None);
    assert_eq!(blank.contacts, unfiltered.contacts);
    assert_eq!(unfiltered.contacts.len(), 2);
}

#[tokio::test]
async fn created_contact_appears_in_next_listing() {
    let ctx = setup().await;
    let contact = create_contact(&ctx).await.expect("create");
    let listing = list_contacts(&ctx, None).await.expect("list");
    assert!(listing.contacts.iter().any(|c| c.id == contact.id));
}

#[tokio::test]
async fn destroy_requires_an_id() {
    let ctx = setup().await;
    let ada = named(&ctx, "Ada").await;

    for raw in [None, Some(""), Some("   ")] {
        let err = destroy_contact(&ctx, raw).await.expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Validation);
    }

    let listing = list_contacts(&ctx, None).await.expect("list");
    assert_eq!(listing.contacts, vec![ada]);
}

#[tokio::test]
async fn destroy_removes_contact_and_tolerates_unknown_ids() {
    let ctx = setup().await;
    let ada = named(&ctx, "Ada").await;
    let bo = named(&ctx, "Bo").await;

    let removed = destroy_contact(&ctx, Some(bo.id.as_str()))
        .await
        .expect("destroy");
    assert_eq!(removed, bo.id);
    destroy_contact(&ctx, Some("never-existed"))
        .await
        .expect("unknown id is a no-op");

    let listing = list_contacts(&ctx, None).await.expect("list");
    assert_eq!(listing.contacts, vec![ada]);
}

#[tokio::test]
async fn get_contact_reports_not_found() {
    let ctx = setup().await;
    let err = get_contact(&ctx, "missing").await.expect_err("should fail");
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = get_contact(&ctx, "").await.expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn set_favorite_updates_flag() {
    let ctx = setup().await;
    let contact = create_contact(&ctx).await.expect("create");
    let starred = set_favorite(&ctx, contact.id.as_str(), true)
        .await
        .expect("favorite");
    assert!(starred.favorite);

    let err = set_favorite(&ctx, "missing", true)
        .await
        .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn store_failures_surface_as_internal_errors() {
    let ctx = ApiContext::new(UnavailableStore);

    let err = list_contacts(&ctx, None).await.expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Internal);
    let err = create_contact(&ctx).await.expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Internal);
    let err = destroy_contact(&ctx, Some("abc"))
        .await
        .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Internal);
    let err = health(&ctx).await.expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Unavailable);
}
