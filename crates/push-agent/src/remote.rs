//! [`RemoteState`] bound to the portal REST client.

use async_trait::async_trait;
use portal_client::{NotificationRecord, PortalApiClient};

use crate::AgentError;
use crate::ports::RemoteState;

#[async_trait]
impl RemoteState for PortalApiClient {
    async fn fetch_record(
        &self,
        notification_id: &str,
    ) -> Result<Option<NotificationRecord>, AgentError> {
        Ok(PortalApiClient::fetch_record(self, notification_id).await?)
    }

    async fn patch_state(&self, notification_id: &str, action: &str) -> Result<(), AgentError> {
        Ok(PortalApiClient::patch_state(self, notification_id, action).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use url::Url;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn remote_for(server: &MockServer) -> Arc<dyn RemoteState> {
        let origin = Url::parse(&server.uri()).unwrap();
        Arc::new(PortalApiClient::new(origin, "/pwa/rest"))
    }

    #[tokio::test]
    async fn patch_state_runs_on_a_spawned_task() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/pwa/rest/notifications/42"))
            .and(body_string("action=markRead"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let remote = remote_for(&server);
        tokio::spawn(async move { remote.patch_state("42", "markRead").await })
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn fetch_failures_map_into_agent_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pwa/rest/notifications/7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pwa/rest/notifications/8"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let remote = remote_for(&server);
        let task_remote = remote.clone();
        let err = tokio::spawn(async move { task_remote.fetch_record("7").await })
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, AgentError::Remote(portal_client::PortalError::Json(_))));
        assert!(remote.fetch_record("8").await.unwrap().is_none());
    }
}
