//! Demonstrates plugging a non-reqwest transport into the requester.
//!
//! 1. Implement [`ApiTransport`] so every [`ApiRequest`] resolves to a [`RawResponse`].
//! 2. Hand the transport to [`Requester::with_transport`] together with a [`Config`].
//! 3. Surface transport failures through [`TransportError::network`] so callers see
//!    [`Error::Transport`].

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
};
// crates.io
use color_eyre::Result;
use serde_json::json;
// self
use digitalocean_api::{
	config::Config,
	error::{Error, TransportError},
	http::{ApiRequest, ApiTransport, RawResponse, ResponseHeaders, TransportFuture},
	requester::Requester,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = Config::new()
		.with_tokens(["demo-token-a", "demo-token-b"])
		.with_end_point("https://api.example.com/v2/");
	let mut requester: Requester<CannedTransport> =
		Requester::with_transport(config.clone(), CannedTransport)?;
	let data = requester.get("regions").await?.into_data().unwrap_or_default();

	println!("Regions served by the canned transport: {}.", data["regions"]);
	println!("Requests left in the window: {:?}.", requester.rate_limit().remaining_value());

	let mut failing: Requester<OfflineTransport> =
		Requester::with_transport(config, OfflineTransport { host: "api.example.com" })?;

	match failing.get("regions").await {
		Err(Error::Transport(TransportError::Network { source })) => {
			println!("Offline transport surfaced a network error: {source}.");
		},
		other => println!("Unexpected outcome from the offline transport: {other:?}."),
	}

	Ok(())
}

/// Answers every request with a fixed region listing.
struct CannedTransport;
impl ApiTransport for CannedTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			println!("{} {}", request.method, request.url);

			let body = json!({ "regions": [{ "slug": "nyc3" }, { "slug": "ams3" }], "links": {} });
			let headers: ResponseHeaders =
				[("RateLimit-Limit", "5000"), ("RateLimit-Remaining", "4999")].into_iter().collect();

			Ok(RawResponse { status: 200, headers, body: body.to_string().into_bytes() })
		})
	}
}

/// Fails every request as if DNS resolution never succeeded.
struct OfflineTransport {
	host: &'static str,
}
impl ApiTransport for OfflineTransport {
	fn execute(&self, _request: ApiRequest) -> TransportFuture<'_> {
		let host = self.host;

		Box::pin(async move { Err(TransportError::network(OfflineError { host })) })
	}
}

#[derive(Debug)]
struct OfflineError {
	host: &'static str,
}
impl Display for OfflineError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "DNS lookup failed for {}", self.host)
	}
}
impl StdError for OfflineError {}
