use portal_client::{NotificationAction, NotificationRecord};
use serde_json::json;
use url::Url;

use super::*;
use crate::memory::{Fault, MemoryHost, MemoryRemote};
use crate::normalize::NotificationOptions;

struct Fixture {
    host: Arc<MemoryHost>,
    remote: Arc<MemoryRemote>,
    handler: PushHandler,
}

fn fixture() -> Fixture {
    let host = Arc::new(MemoryHost::new());
    let remote = Arc::new(MemoryRemote::new());
    let mut normalizer = NormalizerConfig::new(Url::parse("https://portal.example").unwrap());
    normalizer.badge_falls_back_to_icon = false;
    let badge = BadgeSynchronizer::new(host.clone(), Some(host.clone()));
    let handler = PushHandler::new(host.clone(), host.clone(), remote.clone(), normalizer, badge);
    Fixture {
        host,
        remote,
        handler,
    }
}

fn record(id: &str, title: &str) -> NotificationRecord {
    NotificationRecord {
        id: id.into(),
        title: Some(title.into()),
        ..Default::default()
    }
}

async fn show_plain(host: &MemoryHost, options: NotificationOptions) {
    host.show(&DisplayDescriptor {
        title: "existing".into(),
        options,
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn open_renders_minimal_record() {
    let f = fixture();
    f.remote.insert(NotificationRecord {
        body: Some("B".into()),
        ..record("42", "T")
    });

    let outcome = f.handler.handle(Some("42:open")).await;
    assert_eq!(
        outcome,
        PushOutcome::Rendered {
            notification_id: Some("42".into()),
            badge: Some(BadgeUpdate::Set(1)),
        }
    );

    let shown = f.host.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "T");
    assert_eq!(
        serde_json::to_value(&shown[0].options).unwrap(),
        json!({
            "body": "B",
            "icon": "https://portal.example/pwa/rest/manifest/smallIcon?sizes=72x72",
            "data": { "notificationId": "42", "url": "https://portal.example/" }
        })
    );
    assert_eq!(f.host.badge_value(), Some(1));
}

#[tokio::test]
async fn open_truncates_actions_to_platform_limit() {
    let f = fixture();
    f.host.set_max_actions(1);
    let actions = ["snooze", "markRead"]
        .iter()
        .map(|a| NotificationAction {
            action: (*a).into(),
            title: (*a).into(),
            icon: None,
        })
        .collect();
    f.remote.insert(NotificationRecord {
        actions: Some(actions),
        ..record("7", "T")
    });

    f.handler.handle(Some("7:open")).await;
    let actions = f.host.shown()[0].options.actions.clone().unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action, "snooze");
}

#[tokio::test]
async fn open_missing_record_renders_nothing() {
    let f = fixture();
    assert_eq!(f.handler.handle(Some("404:open")).await, PushOutcome::NotFound);
    assert!(f.host.shown().is_empty());
    assert_eq!(f.host.badge_value(), None);
}

#[tokio::test]
async fn permission_not_granted_is_a_no_op() {
    let f = fixture();
    f.remote.insert(record("1", "T"));
    for permission in [Permission::Denied, Permission::Default] {
        f.host.set_permission(permission);
        assert_eq!(f.handler.handle(Some("1:open")).await, PushOutcome::PermissionDenied);
    }
    assert!(f.host.shown().is_empty());
}

#[tokio::test]
async fn malformed_payload_is_ignored() {
    let f = fixture();
    assert_eq!(f.handler.handle(Some("garbage")).await, PushOutcome::Ignored);
    assert_eq!(f.handler.handle(None).await, PushOutcome::Ignored);
}

#[tokio::test]
async fn close_all_empties_the_set_and_badge_clears() {
    let f = fixture();
    f.remote.insert(record("1", "one"));
    f.remote.insert(record("2", "two"));
    f.handler.handle(Some("1:open")).await;
    f.handler.handle(Some("2:open")).await;
    assert_eq!(f.host.badge_value(), Some(2));

    assert_eq!(
        f.handler.handle(Some("0:closeAll")).await,
        PushOutcome::ClosedAll {
            closed: 2,
            badge: Some(BadgeUpdate::Cleared),
        }
    );
    assert!(f.host.shown().is_empty());
    assert_eq!(f.host.badge_value(), None);
}

#[tokio::test]
async fn close_matches_on_correlation_id() {
    let f = fixture();
    f.remote.insert(record("1", "one"));
    f.remote.insert(record("2", "two"));
    f.handler.handle(Some("1:open")).await;
    f.handler.handle(Some("2:open")).await;
    assert_eq!(f.host.badge_value(), Some(2));

    assert_eq!(
        f.handler.handle(Some("1:close")).await,
        PushOutcome::Closed {
            found: true,
            badge: Some(BadgeUpdate::Set(1)),
        }
    );
    assert_eq!(f.host.badge_value(), Some(1));
    let remaining = f.host.shown();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].correlation_id(), Some("2"));

    // closing again is harmless
    assert_eq!(
        f.handler.handle(Some("1:close")).await,
        PushOutcome::Closed {
            found: false,
            badge: Some(BadgeUpdate::Set(1)),
        }
    );
}

#[tokio::test]
async fn closing_the_last_notification_clears_the_badge() {
    let f = fixture();
    f.remote.insert(record("1", "one"));
    f.handler.handle(Some("1:open")).await;
    assert_eq!(f.host.badge_value(), Some(1));

    f.handler.handle(Some("1:close")).await;
    assert!(f.host.shown().is_empty());
    assert_eq!(f.host.badge_value(), None);
}

#[tokio::test]
async fn close_keeps_its_outcome_when_badge_fails() {
    let f = fixture();
    f.remote.insert(record("1", "one"));
    f.handler.handle(Some("1:open")).await;
    f.host.fail(Fault::Badge);

    assert_eq!(
        f.handler.handle(Some("1:close")).await,
        PushOutcome::Closed {
            found: true,
            badge: None,
        }
    );
    assert!(f.host.shown().is_empty());
}

#[tokio::test]
async fn close_falls_back_to_tag_for_notifications_without_data() {
    let f = fixture();
    show_plain(
        &f.host,
        NotificationOptions {
            tag: Some("5".into()),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(
        f.handler.handle(Some("5:close")).await,
        PushOutcome::Closed { found: true, .. }
    ));
    assert!(f.host.shown().is_empty());
}

#[tokio::test]
async fn legacy_payload_renders_without_fetch() {
    let f = fixture();
    f.remote.fail(Fault::Fetch);

    let outcome = f
        .handler
        .handle(Some(r#"{"title":"Hello","message":"World","path":"/portal/x"}"#))
        .await;
    assert_eq!(
        outcome,
        PushOutcome::Rendered {
            notification_id: None,
            badge: Some(BadgeUpdate::Set(1)),
        }
    );
    let shown = &f.host.shown()[0];
    assert_eq!(shown.title, "Hello");
    assert_eq!(shown.options.body.as_deref(), Some("World"));
    assert_eq!(shown.target_url(), Some("https://portal.example/portal/x"));
    assert_eq!(shown.correlation_id(), None);
}

#[tokio::test]
async fn unexpected_failures_resolve_as_failed() {
    let f = fixture();
    f.remote.fail(Fault::Fetch);
    assert_eq!(f.handler.handle(Some("1:open")).await, PushOutcome::Failed);

    let f = fixture();
    f.remote.insert(record("1", "one"));
    f.host.fail(Fault::Show);
    assert_eq!(f.handler.handle(Some("1:open")).await, PushOutcome::Failed);

    let f = fixture();
    f.host.fail(Fault::Query);
    assert_eq!(f.handler.handle(Some("1:closeAll")).await, PushOutcome::Failed);
}

#[tokio::test]
async fn badge_failure_does_not_undo_render() {
    let f = fixture();
    f.remote.insert(record("1", "one"));
    f.host.fail(Fault::Badge);

    assert_eq!(
        f.handler.handle(Some("1:open")).await,
        PushOutcome::Rendered {
            notification_id: Some("1".into()),
            badge: None,
        }
    );
    assert_eq!(f.host.shown().len(), 1);
}
