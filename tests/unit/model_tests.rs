//! Unit tests for the scheduled-post model: status token migration,
//! publish-moment combination, and due evaluation.

use chrono::NaiveDateTime;

use postpilot::models::post::{NewPost, PostStatus, ScheduledPost};
use postpilot::AppError;

fn post(date: &str, time: &str, status: PostStatus) -> ScheduledPost {
    ScheduledPost {
        id: "p1".to_owned(),
        user_id: "u1".to_owned(),
        content: "hello".to_owned(),
        media_urls: vec!["/media/a.png".to_owned()],
        scheduled_date: date.to_owned(),
        scheduled_time: time.to_owned(),
        status,
    }
}

fn at(timestamp: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S").expect("valid test timestamp")
}

#[test]
fn status_accepts_legacy_capitalization() {
    for raw in ["\"planned\"", "\"Planned\"", "\"PLANNED\""] {
        let status: PostStatus = serde_json::from_str(raw).expect("legacy token should parse");
        assert_eq!(status, PostStatus::Planned);
    }
}

#[test]
fn status_accepts_both_cancelled_spellings() {
    for raw in ["\"cancelled\"", "\"canceled\"", "\"Canceled\""] {
        let status: PostStatus = serde_json::from_str(raw).expect("spelling variant should parse");
        assert_eq!(status, PostStatus::Cancelled);
    }
}

#[test]
fn status_rejects_unknown_tokens() {
    let result: Result<PostStatus, _> = serde_json::from_str("\"draft\"");
    assert!(result.is_err());
}

#[test]
fn status_serializes_canonical_lowercase() {
    assert_eq!(
        serde_json::to_string(&PostStatus::Published).expect("serialize"),
        "\"published\""
    );
    assert_eq!(PostStatus::Cancelled.as_str(), "cancelled");
}

#[test]
fn publish_moment_combines_date_and_time() {
    let post = post("2025-03-07", "10:00", PostStatus::Planned);
    assert_eq!(
        post.publish_moment().expect("valid schedule"),
        at("2025-03-07T10:00:00")
    );
}

#[test]
fn publish_moment_accepts_seconds() {
    let post = post("2025-03-07", "10:00:30", PostStatus::Planned);
    assert_eq!(
        post.publish_moment().expect("valid schedule"),
        at("2025-03-07T10:00:30")
    );
}

#[test]
fn publish_moment_rejects_malformed_components() {
    let bad_date = post("07/03/2025", "10:00", PostStatus::Planned);
    assert!(matches!(bad_date.publish_moment(), Err(AppError::Parse(_))));

    let bad_time = post("2025-03-07", "ten o'clock", PostStatus::Planned);
    assert!(matches!(bad_time.publish_moment(), Err(AppError::Parse(_))));
}

#[test]
fn due_at_and_after_the_publish_moment() {
    let post = post("2025-03-07", "10:00", PostStatus::Planned);
    assert!(post.is_due(at("2025-03-07T10:01:00")));
    assert!(post.is_due(at("2025-03-07T10:00:00")));
    assert!(!post.is_due(at("2025-03-07T09:59:00")));
}

#[test]
fn terminal_posts_are_never_due() {
    let published = post("2025-03-07", "10:00", PostStatus::Published);
    let cancelled = post("2025-03-07", "10:00", PostStatus::Cancelled);
    let past = at("2025-03-07T10:01:00");
    assert!(!published.is_due(past));
    assert!(!cancelled.is_due(past));
}

#[test]
fn malformed_schedule_is_never_due() {
    let post = post("not-a-date", "10:00", PostStatus::Planned);
    assert!(!post.is_due(at("2099-01-01T00:00:00")));
}

#[test]
fn only_planned_posts_may_transition_to_terminal() {
    let planned = post("2025-03-07", "10:00", PostStatus::Planned);
    assert!(planned.can_transition_to(PostStatus::Published));
    assert!(planned.can_transition_to(PostStatus::Cancelled));
    assert!(!planned.can_transition_to(PostStatus::Planned));

    let published = post("2025-03-07", "10:00", PostStatus::Published);
    assert!(!published.can_transition_to(PostStatus::Cancelled));
}

#[test]
fn scheduled_post_uses_camel_case_wire_fields() {
    let raw = r#"{
        "id": "p9",
        "userId": "u1",
        "content": "body",
        "mediaUrls": ["/media/a.png", "/media/b.png"],
        "scheduledDate": "2025-03-07",
        "scheduledTime": "10:00",
        "status": "planned"
    }"#;
    let post: ScheduledPost = serde_json::from_str(raw).expect("wire record should parse");
    assert_eq!(post.user_id, "u1");
    assert_eq!(
        post.media_urls,
        vec!["/media/a.png".to_owned(), "/media/b.png".to_owned()]
    );
}

#[test]
fn scheduled_post_tolerates_missing_media_urls() {
    let raw = r#"{
        "id": "p9",
        "userId": "u1",
        "content": "body",
        "scheduledDate": "2025-03-07",
        "scheduledTime": "10:00",
        "status": "planned"
    }"#;
    let post: ScheduledPost = serde_json::from_str(raw).expect("record without media");
    assert!(post.media_urls.is_empty());
}

#[test]
fn new_post_serializes_camel_case() {
    let body = NewPost {
        content: "body".to_owned(),
        urls: vec!["/media/a.png".to_owned()],
        date: "2025-03-07".to_owned(),
        time: "10:00".to_owned(),
        user_id: "u1".to_owned(),
        media_urls: Vec::new(),
    };
    let json = serde_json::to_value(&body).expect("serialize");
    assert_eq!(json["userId"], "u1");
    assert!(json["mediaUrls"].as_array().expect("array").is_empty());
    assert_eq!(json["urls"][0], "/media/a.png");
}
