//! Session configuration resolved once at construction from explicit arguments and/or the
//! process environment.
//!
//! Recognized options are the bearer token(s), the base endpoint, and the request timeout.
//! Explicit builder calls win over values read from the environment, so the usual pattern is
//! `Config::from_env().with_token(...)`.

// self
use crate::{_prelude::*, auth::TokenSecret, endpoint::Endpoint, obs};

/// Environment variable holding a single bearer token.
pub const ACCESS_TOKEN_ENV: &str = "DIGITALOCEAN_ACCESS_TOKEN";
/// Environment variable overriding the base endpoint.
pub const END_POINT_ENV: &str = "DIGITALOCEAN_END_POINT";
/// Environment variable holding the request timeout in (fractional) seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "DIGITALOCEAN_REQUEST_TIMEOUT_SEC";

/// Explicit client configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
	/// Ordered bearer tokens used round-robin; may be empty until call time.
	pub tokens: Vec<TokenSecret>,
	/// Base endpoint; [`DEFAULT_END_POINT`](crate::endpoint::DEFAULT_END_POINT) when unset.
	pub end_point: Option<String>,
	/// Timeout applied to every request; unbounded when unset.
	pub timeout: Option<StdDuration>,
}
impl Config {
	/// Creates an empty configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reads every recognized option from the process environment.
	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads every recognized option through `lookup`, treating empty values as unset.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |key: &str| lookup(key).filter(|value: &String| !value.trim().is_empty());
		let tokens = read(ACCESS_TOKEN_ENV).map(TokenSecret::new).into_iter().collect();
		let end_point = read(END_POINT_ENV);
		let timeout = read(REQUEST_TIMEOUT_ENV).and_then(|raw| parse_timeout(&raw));

		Self { tokens, end_point, timeout }
	}

	/// Replaces the token sequence with a single token.
	pub fn with_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.tokens = vec![token.into()];

		self
	}

	/// Replaces the token sequence with an ordered list of tokens.
	pub fn with_tokens<I, S>(mut self, tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<TokenSecret>,
	{
		self.tokens = tokens.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the base endpoint.
	pub fn with_end_point(mut self, end_point: impl Into<String>) -> Self {
		self.end_point = Some(end_point.into());

		self
	}

	/// Overrides the request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Validates the configured endpoint, falling back to the public API.
	pub fn endpoint(&self) -> Result<Endpoint> {
		match &self.end_point {
			Some(raw) => Endpoint::parse(raw),
			None => Ok(Endpoint::default()),
		}
	}
}

/// Parses a timeout expressed in seconds.
///
/// Unparsable, negative, or non-finite values are logged and ignored, and zero means
/// unbounded, so `None` always leaves calls without a deadline.
pub fn parse_timeout(raw: &str) -> Option<StdDuration> {
	let trimmed = raw.trim();
	let parsed =
		trimmed.parse::<f64>().ok().and_then(|secs| StdDuration::try_from_secs_f64(secs).ok());

	match parsed {
		Some(timeout) if timeout.is_zero() => None,
		Some(timeout) => Some(timeout),
		None => {
			obs::invalid_timeout(trimmed);

			None
		},
	}
}
