//! Rate-limit bookkeeping from the service's `Ratelimit-*` response headers.

// self
use crate::{_prelude::*, http::ResponseHeaders};

/// Header carrying the hourly request quota.
pub const LIMIT_HEADER: &str = "ratelimit-limit";
/// Header carrying the requests left in the current window.
pub const REMAINING_HEADER: &str = "ratelimit-remaining";
/// Header carrying the unix timestamp at which the window resets.
pub const RESET_HEADER: &str = "ratelimit-reset";

/// Server-reported quota usage attached to the most recent successful response.
///
/// Values are kept verbatim as strings; the typed accessors parse them on demand and return
/// `None` when a value is missing or malformed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
	/// Request quota for the window.
	pub limit: Option<String>,
	/// Requests left in the window.
	pub remaining: Option<String>,
	/// Unix timestamp (seconds) at which the window resets.
	pub reset: Option<String>,
}
impl RateLimit {
	/// Captures the snapshot from response headers; absent headers become `None`.
	pub fn from_headers(headers: &ResponseHeaders) -> Self {
		let read = |name: &str| headers.get(name).map(str::to_owned);

		Self {
			limit: read(LIMIT_HEADER),
			remaining: read(REMAINING_HEADER),
			reset: read(RESET_HEADER),
		}
	}

	/// Returns `true` when no rate-limit header has been observed.
	pub fn is_empty(&self) -> bool {
		self.limit.is_none() && self.remaining.is_none() && self.reset.is_none()
	}

	/// Parsed request quota.
	pub fn limit_value(&self) -> Option<u64> {
		parse_u64(self.limit.as_deref())
	}

	/// Parsed number of requests left.
	pub fn remaining_value(&self) -> Option<u64> {
		parse_u64(self.remaining.as_deref())
	}

	/// Instant at which the window resets.
	pub fn reset_at(&self) -> Option<OffsetDateTime> {
		let secs = self.reset.as_deref()?.trim().parse::<i64>().ok()?;

		OffsetDateTime::from_unix_timestamp(secs).ok()
	}
}

fn parse_u64(raw: Option<&str>) -> Option<u64> {
	raw?.trim().parse().ok()
}
