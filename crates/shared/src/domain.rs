use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub String);

impl ContactId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Parses an id taken from a request path. Ids are opaque: whitespace
    /// only decides blankness and is otherwise kept.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn empty(id: ContactId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            first: None,
            last: None,
            avatar: None,
            twitter: None,
            notes: None,
            favorite: false,
            created_at,
        }
    }

    /// `first last` when either half is present, otherwise `None`.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first.as_deref(), self.last.as_deref()]
            .into_iter()
            .filter_map(non_blank)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn display_name(&self) -> String {
        self.full_name()
            .unwrap_or_else(|| NO_NAME_PLACEHOLDER.to_string())
    }
}

pub const NO_NAME_PLACEHOLDER: &str = "No Name";
pub const FAVORITE_MARKER: &str = "★";

/// Edit payload. Blank strings are stored as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactChanges {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ContactChanges {
    pub fn normalized(self) -> Self {
        Self {
            first: owned_non_blank(self.first),
            last: owned_non_blank(self.last),
            avatar: owned_non_blank(self.avatar),
            twitter: owned_non_blank(self.twitter),
            notes: owned_non_blank(self.notes),
        }
    }
}

/// Client-side route transition status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NavigationState {
    #[default]
    Idle,
    Pending {
        target: String,
    },
}

impl NavigationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn is_pending_to(&self, path: &str) -> bool {
        match self {
            Self::Pending { target } => link_matches(path, target),
            Self::Idle => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Active,
    Pending,
    Inactive,
}

impl LinkStatus {
    pub fn for_link(link: &str, current_path: &str, navigation: &NavigationState) -> Self {
        if link_matches(link, current_path) {
            Self::Active
        } else if navigation.is_pending_to(link) {
            Self::Pending
        } else {
            Self::Inactive
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "",
        }
    }
}

pub fn contact_path(id: &ContactId) -> String {
    format!("/contacts/{id}")
}

pub fn edit_contact_path(id: &ContactId) -> String {
    format!("/contacts/{id}/edit")
}

/// Normalizes an optional search term: blank means "no filter".
pub fn normalize_query(q: Option<&str>) -> Option<String> {
    non_blank(q).map(str::to_string)
}

/// A link matches its own route and every route nested below it.
fn link_matches(link: &str, location: &str) -> bool {
    let link = route_key(link);
    let location = route_key(location);
    location == link
        || (!link.is_empty()
            && location
                .strip_prefix(link)
                .is_some_and(|rest| rest.starts_with('/')))
}

fn route_key(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.trim_matches('/')
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn owned_non_blank(value: Option<String>) -> Option<String> {
    non_blank(value.as_deref()).map(str::to_string)
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
