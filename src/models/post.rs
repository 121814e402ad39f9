//! Scheduled post model and due-evaluation helpers.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Lifecycle status for a scheduled post.
///
/// The backend stores free-text tokens with inconsistent capitalization
/// (and both `cancelled`/`canceled` spellings). Deserialization accepts the
/// legacy variants; serialization always emits the canonical lowercase form,
/// which migrates rows forward on their next status write.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Awaiting automatic publication.
    Planned,
    /// Delivered to LinkedIn.
    Published,
    /// Withdrawn by the operator before publication.
    Cancelled,
}

impl<'de> Deserialize<'de> for PostStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "published" => Ok(Self::Published),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(de::Error::custom(format!("unknown post status: {other}"))),
        }
    }
}

impl PostStatus {
    /// Canonical wire token for this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the status can never return to the due set.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Published | Self::Cancelled)
    }
}

/// Scheduled post record as served by `GET /posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPost {
    /// Unique record identifier assigned by the backend.
    pub id: String,
    /// Owning user identifier.
    pub user_id: String,
    /// Free-form text body.
    pub content: String,
    /// Ordered relative media paths; insertion order is display order.
    #[serde(default)]
    pub media_urls: Vec<String>,
    /// Calendar date component of the publish moment (`YYYY-MM-DD`).
    pub scheduled_date: String,
    /// Wall-clock time component of the publish moment (`HH:MM` or `HH:MM:SS`).
    pub scheduled_time: String,
    /// Current lifecycle status.
    pub status: PostStatus,
}

impl ScheduledPost {
    /// Combine the date and time components into a single publish moment.
    ///
    /// The components are stored separately by the backend and only joined
    /// at evaluation time, mirroring the stored contract.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Parse` if either component is malformed.
    pub fn publish_moment(&self) -> Result<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(&self.scheduled_date, "%Y-%m-%d").map_err(|err| {
            AppError::Parse(format!(
                "bad scheduled_date '{}': {err}",
                self.scheduled_date
            ))
        })?;
        let time = NaiveTime::parse_from_str(&self.scheduled_time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&self.scheduled_time, "%H:%M"))
            .map_err(|err| {
                AppError::Parse(format!(
                    "bad scheduled_time '{}': {err}",
                    self.scheduled_time
                ))
            })?;
        Ok(date.and_time(time))
    }

    /// Whether the post is eligible for publication at `now`.
    ///
    /// Eligible iff still planned and the publish moment has arrived. A post
    /// with a malformed date or time is never due; the scanner logs and
    /// skips it instead.
    #[must_use]
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        if self.status != PostStatus::Planned {
            return false;
        }
        self.publish_moment().is_ok_and(|moment| now >= moment)
    }

    /// Determine whether a lifecycle transition is permitted.
    ///
    /// Only `planned` posts may move, and only into a terminal status.
    #[must_use]
    pub fn can_transition_to(&self, next: PostStatus) -> bool {
        self.status == PostStatus::Planned && next.is_terminal()
    }
}

/// Creation payload for `POST /posts/add`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Free-form text body.
    pub content: String,
    /// Link URLs embedded in the post body.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Calendar date component (`YYYY-MM-DD`).
    pub date: String,
    /// Wall-clock time component (`HH:MM`).
    pub time: String,
    /// Owning user identifier.
    pub user_id: String,
    /// Ordered relative media paths.
    #[serde(default)]
    pub media_urls: Vec<String>,
}
