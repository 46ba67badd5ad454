use serde::{Deserialize, Serialize};

use crate::domain::Contact;

/// Loader payload for the contact list: the matching contacts plus the
/// query they were filtered by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactListing {
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteForm {
    pub favorite: bool,
}
