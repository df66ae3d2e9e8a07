use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{
    error::ChatApiError,
    models::{CreateWebhook, CreatedWebhook, HistoryMessage, Member, Page, Room, SendNotification, Webhook},
};

/// Items requested per page on collection endpoints
const PAGE_SIZE: u32 = 100;

/// Upper bound on pages fetched for one listing
const MAX_PAGES: usize = 100;

/// Per-user HipChat access token
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// The subset of the HipChat v2 API this service calls
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn list_rooms(&self) -> Result<Vec<Room>, ChatApiError>;
    async fn list_room_members(&self, room_id: &str) -> Result<Vec<Member>, ChatApiError>;
    async fn list_room_webhooks(&self, room_id: &str) -> Result<Vec<Webhook>, ChatApiError>;
    async fn create_room_webhook(
        &self,
        room_id: &str,
        webhook: &CreateWebhook,
    ) -> Result<CreatedWebhook, ChatApiError>;
    async fn room_history(&self, room_id: &str) -> Result<Vec<HistoryMessage>, ChatApiError>;
    async fn send_room_notification(
        &self,
        room_id: &str,
        notification: &SendNotification,
    ) -> Result<(), ChatApiError>;
}

/// Builds an API client scoped to one user's credential
pub trait ChatClientFactory: Send + Sync {
    fn client_for(&self, credential: &Credential) -> Arc<dyn ChatApi>;
}

/// Factory sharing one connection pool across all per-request clients
pub struct HipChatClientFactory {
    http: Client,
    api_url: Url,
    page_limit: usize,
}

impl HipChatClientFactory {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, ChatApiError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| ChatApiError::InvalidUrl(format!("{}: {}", api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(ChatApiError::InvalidUrl(api_url.to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url,
            page_limit: MAX_PAGES,
        })
    }

    /// Overrides how many pages one listing may span before it fails
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit;
        self
    }

    fn client(&self, credential: &Credential) -> HipChatClient {
        HipChatClient {
            http: self.http.clone(),
            api_url: self.api_url.clone(),
            page_limit: self.page_limit,
            credential: credential.clone(),
        }
    }
}

impl ChatClientFactory for HipChatClientFactory {
    fn client_for(&self, credential: &Credential) -> Arc<dyn ChatApi> {
        Arc::new(self.client(credential))
    }
}

/// Room ids travel as one opaque path segment. The URL parser drops
/// dot segments, so those can never name a room.
fn check_room_id(room_id: &str) -> Result<(), ChatApiError> {
    match room_id {
        "" | "." | ".." => Err(ChatApiError::InvalidRoomId(room_id.to_string())),
        _ => Ok(()),
    }
}

/// reqwest-backed HipChat v2 client
pub struct HipChatClient {
    http: Client,
    api_url: Url,
    page_limit: usize,
    credential: Credential,
}

impl HipChatClient {
    /// `{api_url}/v2/{segments..}`, each segment percent-encoded on its own
    fn url(&self, segments: &[&str]) -> Result<Url, ChatApiError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ChatApiError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .push("v2")
            .extend(segments);
        Ok(url)
    }

    fn room_url(&self, room_id: &str, resource: &str) -> Result<Url, ChatApiError> {
        check_room_id(room_id)?;
        self.url(&["room", room_id, resource])
    }

    fn paged(mut url: Url) -> Url {
        url.query_pairs_mut()
            .append_pair("max-results", &PAGE_SIZE.to_string());
        url
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(self.credential.token())
    }

    async fn check_status(response: Response) -> Result<Response, ChatApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        warn!(status = status.as_u16(), "HipChat request failed");
        Err(ChatApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ChatApiError> {
        debug!(url = %url, "GET");
        let response = self.authorized(self.http.get(url)).send().await?;
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ChatApiError::Decode(e.to_string()))
    }

    /// Fetches every page of a collection by following `links.next`.
    ///
    /// Fails rather than return a partial listing when the collection spans
    /// more than `page_limit` pages.
    async fn get_all<T: DeserializeOwned>(&self, first_url: Url) -> Result<Vec<T>, ChatApiError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);
        let mut pages = 0;

        while let Some(url) = next {
            if pages == self.page_limit {
                warn!(pages, "HipChat listing exceeded the page limit");
                return Err(ChatApiError::PageLimit(self.page_limit));
            }
            let page: Page<T> = self.get_json(url).await?;
            items.extend(page.items);
            next = page
                .links
                .next
                .map(|link| {
                    Url::parse(&link).map_err(|e| ChatApiError::InvalidUrl(format!("{}: {}", link, e)))
                })
                .transpose()?;
            pages += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl ChatApi for HipChatClient {
    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<Room>, ChatApiError> {
        self.get_all(Self::paged(self.url(&["room"])?)).await
    }

    #[instrument(skip(self))]
    async fn list_room_members(&self, room_id: &str) -> Result<Vec<Member>, ChatApiError> {
        self.get_all(Self::paged(self.room_url(room_id, "member")?))
            .await
    }

    #[instrument(skip(self))]
    async fn list_room_webhooks(&self, room_id: &str) -> Result<Vec<Webhook>, ChatApiError> {
        self.get_all(Self::paged(self.room_url(room_id, "webhook")?))
            .await
    }

    #[instrument(skip(self, webhook), fields(event = %webhook.event))]
    async fn create_room_webhook(
        &self,
        room_id: &str,
        webhook: &CreateWebhook,
    ) -> Result<CreatedWebhook, ChatApiError> {
        let url = self.room_url(room_id, "webhook")?;
        debug!(url = %url, "POST");
        let response = self
            .authorized(self.http.post(url))
            .json(webhook)
            .send()
            .await?;
        Self::check_status(response)
            .await?
            .json::<CreatedWebhook>()
            .await
            .map_err(|e| ChatApiError::Decode(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn room_history(&self, room_id: &str) -> Result<Vec<HistoryMessage>, ChatApiError> {
        let page: Page<HistoryMessage> = self
            .get_json(self.room_url(room_id, "history")?)
            .await?;
        Ok(page.items)
    }

    #[instrument(skip(self, notification), fields(color = %notification.color))]
    async fn send_room_notification(
        &self,
        room_id: &str,
        notification: &SendNotification,
    ) -> Result<(), ChatApiError> {
        let url = self.room_url(room_id, "notification")?;
        debug!(url = %url, "POST");
        let response = self
            .authorized(self.http.post(url))
            .json(notification)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
