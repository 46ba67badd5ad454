use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info};

use shared::domain::{normalize_query, Contact, ContactChanges, ContactId};

mod demo;

pub use demo::{demo_contacts, DemoContact};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/contacts.db";

const CONTACT_COLUMNS: &str =
    "id, first_name, last_name, avatar, twitter, notes, favorite, created_at";

/// Data access consumed by the request handlers.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Contacts matching `query` (case-insensitive substring of first or
    /// last name), ordered by last name then creation order. A blank query
    /// returns every contact.
    async fn get_contacts(&self, query: Option<&str>) -> Result<Vec<Contact>>;
    async fn create_empty_contact(&self) -> Result<Contact>;
    async fn get_contact(&self, id: &ContactId) -> Result<Option<Contact>>;
    async fn update_contact(
        &self,
        id: &ContactId,
        changes: ContactChanges,
    ) -> Result<Option<Contact>>;
    async fn set_favorite(&self, id: &ContactId, favorite: bool) -> Result<Option<Contact>>;
    /// Returns whether a row was removed. Unknown ids are not an error.
    async fn delete_contact(&self, id: &ContactId) -> Result<bool>;
    async fn health_check(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn count_contacts(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await
            .context("failed to count contacts")?;
        Ok(count)
    }

    /// Inserts a fully populated contact, used for seeding.
    pub async fn insert_contact(&self, contact: &Contact) -> Result<()> {
        sqlx::query(
            "INSERT INTO contacts (id, first_name, last_name, avatar, twitter, notes, favorite, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(contact.id.as_str())
        .bind(contact.first.as_deref())
        .bind(contact.last.as_deref())
        .bind(contact.avatar.as_deref())
        .bind(contact.twitter.as_deref())
        .bind(contact.notes.as_deref())
        .bind(contact.favorite)
        .bind(contact.created_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert contact {}", contact.id))?;
        Ok(())
    }

    /// Seeds the demo contacts when the table is empty. Returns how many
    /// rows were inserted.
    pub async fn seed_demo_contacts(&self) -> Result<usize> {
        if self.count_contacts().await? > 0 {
            return Ok(0);
        }

        let demo = demo_contacts();
        for entry in &demo {
            self.insert_contact(&entry.to_contact(ContactId::generate(), now()))
                .await?;
        }
        info!(count = demo.len(), "seeded demo contacts");
        Ok(demo.len())
    }
}

#[async_trait]
impl ContactStore for Storage {
    async fn get_contacts(&self, query: Option<&str>) -> Result<Vec<Contact>> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS}
             FROM contacts
             ORDER BY last_name IS NULL, last_name, seq"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list contacts")?;
        let contacts = rows
            .iter()
            .map(contact_from_row)
            .collect::<Result<Vec<_>>>()?;

        // SQLite's lower() only folds ASCII, so matching happens here.
        let Some(term) = normalize_query(query) else {
            return Ok(contacts);
        };
        let needle = term.to_lowercase();
        Ok(contacts
            .into_iter()
            .filter(|contact| name_contains(contact, &needle))
            .collect())
    }

    async fn create_empty_contact(&self) -> Result<Contact> {
        let contact = Contact::empty(ContactId::generate(), now());
        self.insert_contact(&contact).await?;
        info!(contact_id = %contact.id, "created empty contact");
        Ok(contact)
    }

    async fn get_contact(&self, id: &ContactId) -> Result<Option<Contact>> {
        let row = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(contact_from_row).transpose()
    }

    async fn update_contact(
        &self,
        id: &ContactId,
        changes: ContactChanges,
    ) -> Result<Option<Contact>> {
        let changes = changes.normalized();
        let row = sqlx::query(&format!(
            "UPDATE contacts
             SET first_name = ?, last_name = ?, avatar = ?, twitter = ?, notes = ?
             WHERE id = ?
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(changes.first)
        .bind(changes.last)
        .bind(changes.avatar)
        .bind(changes.twitter)
        .bind(changes.notes)
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to update contact {id}"))?;
        row.as_ref().map(contact_from_row).transpose()
    }

    async fn set_favorite(&self, id: &ContactId, favorite: bool) -> Result<Option<Contact>> {
        let row = sqlx::query(&format!(
            "UPDATE contacts SET favorite = ? WHERE id = ? RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(favorite)
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to update favorite flag of contact {id}"))?;
        row.as_ref().map(contact_from_row).transpose()
    }

    async fn delete_contact(&self, id: &ContactId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete contact {id}"))?;
        let removed = result.rows_affected() > 0;
        if removed {
            info!(contact_id = %id, "deleted contact");
        } else {
            debug!(contact_id = %id, "delete requested for unknown contact");
        }
        Ok(removed)
    }

    async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

/// Millisecond precision survives the TEXT round trip unchanged.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn contact_from_row(row: &SqliteRow) -> Result<Contact> {
    Ok(Contact {
        id: ContactId(row.try_get::<String, _>("id")?),
        first: row.try_get("first_name")?,
        last: row.try_get("last_name")?,
        avatar: row.try_get("avatar")?,
        twitter: row.try_get("twitter")?,
        notes: row.try_get("notes")?,
        favorite: row.try_get("favorite")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

/// Case-insensitive substring match on first or last name. `needle` must
/// already be lowercased.
fn name_contains(contact: &Contact, needle: &str) -> bool {
    [contact.first.as_deref(), contact.last.as_deref()]
        .into_iter()
        .flatten()
        .any(|name| name.to_lowercase().contains(needle))
}

/// Accepts `sqlite:` URLs or plain file paths; blank falls back to
/// [`DEFAULT_DATABASE_URL`].
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }

    if raw_database_url.starts_with("sqlite:") || raw_database_url.contains("://") {
        return raw_database_url.replace('\\', "/");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
