//! Portal notification REST API client.
//!
//! Provides typed access to the notification endpoints with the
//! session cookie attached to every request ("credentials included").

mod notifications;
mod request;

pub mod models;

pub use models::{NotificationAction, NotificationRecord};

use url::Url;

use crate::PortalError;

/// Default REST prefix under which the portal exposes its PWA endpoints.
pub const DEFAULT_REST_PATH: &str = "/pwa/rest";

/// Portal API client bound to a single origin.
#[derive(Debug, Clone)]
pub struct PortalApiClient {
    pub(super) http: reqwest::Client,
    pub(super) origin: Url,
    pub(super) rest_path: String,
    pub(super) session_cookie: Option<String>,
}

impl PortalApiClient {
    pub fn new(origin: Url, rest_path: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            origin,
            rest_path: rest_path.into(),
            session_cookie: None,
        }
    }

    /// Attach the session cookie sent with every request.
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        let cookie = cookie.into();
        self.session_cookie = if cookie.is_empty() { None } else { Some(cookie) };
        self
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `{origin}{rest_path}/notifications/{id}` with the id as a single
    /// percent-encoded path segment.
    pub(super) fn notification_url(&self, notification_id: &str) -> Result<Url, PortalError> {
        let base = format!("{}/notifications", self.rest_path.trim_end_matches('/'));
        let mut url = self.origin.join(&base)?;
        url.path_segments_mut()
            .map_err(|_| PortalError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(notification_id);
        Ok(url)
    }
}
