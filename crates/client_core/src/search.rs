use std::sync::Arc;

use shared::{domain::Contact, protocol::ContactListing};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{ClientError, ContactsClient};

/// Identifies one search request. Tickets are issued in keystroke order, so
/// a larger ticket always carries newer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

/// Search box plus the contact list it drives.
///
/// Typing updates `text` immediately. Responses may arrive in any order;
/// only a response newer than the last applied one replaces the list, and
/// only the response to the latest keystroke overwrites the box.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    text: String,
    contacts: Vec<Contact>,
    issued: u64,
    applied: u64,
}

impl SearchState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// True while a request newer than the applied listing is in flight.
    pub fn is_searching(&self) -> bool {
        self.applied < self.issued
    }

    pub fn input(&mut self, text: &str) -> SearchTicket {
        self.text = text.to_string();
        self.issued += 1;
        SearchTicket(self.issued)
    }

    /// Applies a listing loaded by navigation rather than typing, for
    /// example a back button. The echoed query always wins.
    pub fn load(&mut self, listing: ContactListing) {
        self.issued += 1;
        self.applied = self.issued;
        self.text = listing.q.unwrap_or_default();
        self.contacts = listing.contacts;
    }

    /// Settles a keystroke whose request failed so the box stops showing a
    /// search in flight. The text stays as typed and the list is unchanged.
    /// Only the latest keystroke can settle; older failures change nothing.
    pub fn abandon(&mut self, ticket: SearchTicket) {
        if ticket.0 == self.issued && ticket.0 > self.applied {
            debug!(ticket = ticket.0, "search request failed; keeping previous list");
            self.applied = ticket.0;
        }
    }

    /// Returns false when the response was superseded and dropped.
    pub fn reconcile(&mut self, ticket: SearchTicket, listing: ContactListing) -> bool {
        if ticket.0 <= self.applied {
            debug!(ticket = ticket.0, applied = self.applied, "dropping stale search response");
            return false;
        }
        self.applied = ticket.0;
        self.contacts = listing.contacts;
        if ticket.0 == self.issued {
            self.text = listing.q.unwrap_or_default();
        }
        true
    }
}

/// Drives [`SearchState`] against a live server. Clones share state, so
/// each keystroke can run on its own task.
#[derive(Clone)]
pub struct SearchSession {
    client: ContactsClient,
    state: Arc<Mutex<SearchState>>,
}

impl SearchSession {
    pub fn new(client: ContactsClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(SearchState::default())),
        }
    }

    pub async fn open(&self, q: Option<&str>) -> Result<(), ClientError> {
        let listing = self.client.list_contacts(q).await?;
        self.state.lock().await.load(listing);
        Ok(())
    }

    /// Returns whether this keystroke's response was applied. A failed
    /// request is abandoned before the error is returned.
    pub async fn type_text(&self, text: &str) -> Result<bool, ClientError> {
        let ticket = self.state.lock().await.input(text);
        match self.client.list_contacts(Some(text)).await {
            Ok(listing) => Ok(self.state.lock().await.reconcile(ticket, listing)),
            Err(err) => {
                self.state.lock().await.abandon(ticket);
                Err(err)
            }
        }
    }

    pub async fn snapshot(&self) -> SearchState {
        self.state.lock().await.clone()
    }
}
