use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLISECONDS_PER_MINUTE: i64 = 60_000;

/// The open interval the shop is currently in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub opened_at: DateTime<Utc>,
    pub is_active: bool,
}

impl ActiveSession {
    pub fn start(opened_at: DateTime<Utc>) -> Self {
        Self {
            opened_at,
            is_active: true,
        }
    }

    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        rounded_minutes(self.opened_at, now)
    }

    /// Completes this session. A `closed_at` earlier than `opened_at` is
    /// clamped so the recorded interval never goes negative.
    pub fn end(&self, closed_at: DateTime<Utc>) -> ShopSession {
        let closed_at = closed_at.max(self.opened_at);
        ShopSession {
            opened_at: self.opened_at,
            closed_at,
            duration_minutes: rounded_minutes(self.opened_at, closed_at),
        }
    }
}

/// One completed open/close interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSession {
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub duration_minutes: i64,
}

fn rounded_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let milliseconds = to.signed_duration_since(from).num_milliseconds().max(0);
    (milliseconds + MILLISECONDS_PER_MINUTE / 2) / MILLISECONDS_PER_MINUTE
}
