//! End-to-end publish flow over HTTP: scanner, backend client, and the
//! LinkedIn publisher against the fake backend.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::mpsc;

use postpilot::backend::client::BackendClient;
use postpilot::backend::{PostPublisher, PostStore};
use postpilot::linkedin::LinkedInClient;
use postpilot::models::post::PostStatus;
use postpilot::scheduler::cache::ScheduleCache;
use postpilot::scheduler::publisher::LinkedInPublisher;
use postpilot::scheduler::scanner::{PassOutcome, ScanEvent, Scanner};
use postpilot::session::Session;

use super::fake_backend::{planned_post, FakeBackend, EXTERNAL_USER_ID};

fn at(timestamp: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S").expect("valid test timestamp")
}

fn wire_scanner(
    backend: &FakeBackend,
    session: Session,
) -> (Arc<Scanner>, mpsc::Receiver<ScanEvent>) {
    let config = backend.config();
    let store = BackendClient::new(&config, session.clone()).expect("backend client");
    let linkedin = LinkedInClient::new(&config, session.clone()).expect("linkedin client");
    let (event_tx, event_rx) = mpsc::channel(32);
    let scanner = Scanner::new(
        Arc::new(store) as Arc<dyn PostStore>,
        Arc::new(LinkedInPublisher::new(linkedin)) as Arc<dyn PostPublisher>,
        Arc::new(ScheduleCache::new()),
        session,
        format!("{}/auth/linkedin", backend.base_url),
        event_tx,
    );
    (Arc::new(scanner), event_rx)
}

#[tokio::test]
async fn due_post_is_delivered_and_marked_published() {
    let backend = FakeBackend::start().await;
    let mut seeded = planned_post("p1", "2025-03-07", "10:00");
    seeded.media_urls = vec!["/media/a.png".to_owned()];
    backend.push_post(seeded).await;

    let (scanner, mut events) = wire_scanner(&backend, backend.authed_session());
    let outcome = scanner.pass_at(at("2025-03-07T10:01:00")).await;
    assert_eq!(
        outcome,
        PassOutcome::Completed {
            due: 1,
            published: 1,
            failed: 0
        }
    );

    let stored = backend.post("p1").await.expect("post exists");
    assert_eq!(stored.status, PostStatus::Published);

    let delivered = backend.state.lock().await.linkedin_posts.clone();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0]["externalUserId"], EXTERNAL_USER_ID);
    assert_eq!(delivered[0]["content"], "post p1");
    assert_eq!(delivered[0]["mediaUrls"][0], "/media/a.png");

    match events.recv().await.expect("event emitted") {
        ScanEvent::Published { post_id } => assert_eq!(post_id, "p1"),
        other => panic!("expected Published, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_delivery_leaves_the_post_planned_for_retry() {
    let backend = FakeBackend::start().await;
    backend.push_post(planned_post("p1", "2025-03-07", "10:00")).await;
    backend.state.lock().await.fail_linkedin_post = true;

    let (scanner, _events) = wire_scanner(&backend, backend.authed_session());
    let outcome = scanner.pass_at(at("2025-03-07T10:01:00")).await;
    assert_eq!(
        outcome,
        PassOutcome::Completed {
            due: 1,
            published: 0,
            failed: 1
        }
    );
    let stored = backend.post("p1").await.expect("post exists");
    assert_eq!(stored.status, PostStatus::Planned);

    // Outage over: the same post goes out on the next pass.
    backend.state.lock().await.fail_linkedin_post = false;
    let retry = scanner.pass_at(at("2025-03-07T10:02:00")).await;
    assert_eq!(
        retry,
        PassOutcome::Completed {
            due: 1,
            published: 1,
            failed: 0
        }
    );
}

#[tokio::test]
async fn rejected_token_fails_the_post_and_aborts_the_next_pass() {
    let backend = FakeBackend::start().await;
    backend.push_post(planned_post("p1", "2025-03-07", "10:00")).await;
    backend.state.lock().await.reject_linkedin_token = true;

    let session = backend.authed_session();
    let (scanner, mut events) = wire_scanner(&backend, session.clone());

    let first = scanner.pass_at(at("2025-03-07T10:01:00")).await;
    assert_eq!(
        first,
        PassOutcome::Completed {
            due: 1,
            published: 0,
            failed: 1
        }
    );
    assert!(!session.has_linkedin_token().await);
    match events.recv().await.expect("event emitted") {
        ScanEvent::PublishFailed { post_id, .. } => assert_eq!(post_id, "p1"),
        other => panic!("expected PublishFailed, got {other:?}"),
    }

    let second = scanner.pass_at(at("2025-03-07T10:02:00")).await;
    assert_eq!(second, PassOutcome::AuthAborted);
    match events.recv().await.expect("event emitted") {
        ScanEvent::AuthRequired { auth_url } => {
            assert_eq!(auth_url, format!("{}/auth/linkedin", backend.base_url));
        }
        other => panic!("expected AuthRequired, got {other:?}"),
    }
}
