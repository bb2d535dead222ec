use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use url::Url;

use super::*;

impl PortalApiClient {
    /// Build the credential headers for a same-origin request.
    fn auth_headers(&self) -> Result<HeaderMap, PortalError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &self.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| PortalError::InvalidHeader(e.to_string()))?;
            headers.insert(COOKIE, value);
        }
        Ok(headers)
    }

    /// Execute a GET request with credentials.
    ///
    /// Non-2xx statuses come back as [`PortalError::ApiError`].
    pub(super) async fn authenticated_get(&self, url: Url) -> Result<String, PortalError> {
        let headers = self.auth_headers()?;
        let resp = self.http.get(url.clone()).headers(headers).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "GET returned non-success status");
            return Err(PortalError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }

    /// Execute a PATCH request with credentials and a form-encoded body.
    /// The response body is discarded on success.
    pub(super) async fn authenticated_patch_form(
        &self,
        url: Url,
        form: &[(&str, &str)],
    ) -> Result<(), PortalError> {
        let headers = self.auth_headers()?;
        let resp = self
            .http
            .patch(url)
            .headers(headers)
            .form(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await?;
            return Err(PortalError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
