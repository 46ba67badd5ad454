use reqwest::{
    header::{ACCEPT, LOCATION},
    redirect::Policy,
    Client, Response, StatusCode,
};
use shared::{
    domain::{Contact, ContactChanges, ContactId},
    error::{ApiError, ApiException},
    protocol::{ContactListing, FavoriteForm},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod navigation;
pub mod search;

pub use navigation::Navigator;
pub use search::{SearchSession, SearchState, SearchTicket};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request: {0}")]
    Api(#[from] ApiException),
    #[error("server returned status {status} without an error body")]
    UnexpectedStatus { status: u16 },
    #[error("expected a redirect from {route}, got status {status}")]
    MissingRedirect { route: String, status: u16 },
    #[error("redirect target '{0}' does not name a contact")]
    UnexpectedRedirect(String),
}

/// HTTP client for the contacts routes. Redirects are not followed so the
/// caller can observe where a mutation sends the browser.
#[derive(Debug, Clone)]
pub struct ContactsClient {
    http: Client,
    base: Url,
}

impl ContactsClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(server_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder().redirect(Policy::none()).build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn list_contacts(&self, q: Option<&str>) -> Result<ContactListing, ClientError> {
        let mut url = self.base.clone();
        if let Some(q) = q {
            url.query_pairs_mut().append_pair("q", q);
        }
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        Ok(ensure_ok(response).await?.json().await?)
    }

    /// Creates an empty contact and returns the id embedded in the edit
    /// redirect.
    pub async fn create_contact(&self) -> Result<ContactId, ClientError> {
        let response = self.http.post(self.base.clone()).send().await?;
        let target = redirect_target(ensure_ok(response).await?, "/")?;
        let id = target
            .strip_prefix("/contacts/")
            .and_then(|rest| rest.strip_suffix("/edit"))
            .and_then(ContactId::parse)
            .ok_or_else(|| ClientError::UnexpectedRedirect(target.clone()))?;
        debug!(contact_id = %id, "created contact");
        Ok(id)
    }

    pub async fn get_contact(&self, id: &ContactId) -> Result<Contact, ClientError> {
        let url = self.base.join(&format!("contacts/{id}"))?;
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        Ok(ensure_ok(response).await?.json().await?)
    }

    pub async fn update_contact(
        &self,
        id: &ContactId,
        changes: &ContactChanges,
    ) -> Result<(), ClientError> {
        let route = format!("contacts/{id}/edit");
        let response = self
            .http
            .post(self.base.join(&route)?)
            .form(changes)
            .send()
            .await?;
        redirect_target(ensure_ok(response).await?, &route)?;
        Ok(())
    }

    pub async fn set_favorite(&self, id: &ContactId, favorite: bool) -> Result<(), ClientError> {
        let route = format!("contacts/{id}/favorite");
        let response = self
            .http
            .post(self.base.join(&route)?)
            .form(&FavoriteForm { favorite })
            .send()
            .await?;
        redirect_target(ensure_ok(response).await?, &route)?;
        Ok(())
    }

    /// Deletes by raw path segment so blank ids reach the server and are
    /// rejected there.
    pub async fn delete_contact(&self, id: &str) -> Result<(), ClientError> {
        let route = format!("contacts/{id}/destroy");
        let response = self.http.post(self.base.join(&route)?).send().await?;
        redirect_target(ensure_ok(response).await?, &route)?;
        Ok(())
    }
}

async fn ensure_ok(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() || status.is_redirection() {
        return Ok(response);
    }
    match response.json::<ApiError>().await {
        Ok(error) => Err(ClientError::Api(error.into())),
        Err(_) => Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
        }),
    }
}

fn redirect_target(response: Response, route: &str) -> Result<String, ClientError> {
    let status = response.status();
    let missing = || ClientError::MissingRedirect {
        route: route.to_string(),
        status: status.as_u16(),
    };
    if !matches!(
        status,
        StatusCode::SEE_OTHER | StatusCode::FOUND | StatusCode::TEMPORARY_REDIRECT
    ) {
        return Err(missing());
    }
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(missing)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
