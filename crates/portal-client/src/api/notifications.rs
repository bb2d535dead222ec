use super::*;

impl PortalApiClient {
    /// Fetch a notification record by id.
    ///
    /// Returns `Ok(None)` when the portal answers with any non-success
    /// status (not found, forbidden, server error). Transport and
    /// decoding failures are still errors.
    pub async fn fetch_record(
        &self,
        notification_id: &str,
    ) -> Result<Option<NotificationRecord>, PortalError> {
        let url = self.notification_url(notification_id)?;
        let body = match self.authenticated_get(url).await {
            Ok(body) => body,
            Err(PortalError::ApiError { status, .. }) => {
                tracing::debug!(notification_id, status, "Notification record unavailable");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let mut record: NotificationRecord = serde_json::from_str(&body)?;
        record.id = notification_id.to_string();
        Ok(Some(record))
    }

    /// Apply a named state change (`markRead` or an application action).
    pub async fn patch_state(&self, notification_id: &str, action: &str) -> Result<(), PortalError> {
        let url = self.notification_url(notification_id)?;
        self.authenticated_patch_form(url, &[("action", action)])
            .await?;
        tracing::debug!(notification_id, action, "Notification state updated");
        Ok(())
    }
}
