//! Shared wiring for the httpmock-backed integration tests.

// crates.io
use httpmock::MockServer;
// self
use digitalocean_api::{
	config::Config, http::ReqwestTransport, requester::ReqwestRequester, reqwest::Client,
};

/// Builds a reqwest transport that accepts the self-signed certificates produced by `httpmock`.
pub fn test_reqwest_transport() -> ReqwestTransport {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestTransport::with_client(client)
}

/// Builds a requester pointed at the mock server's `/v2/` prefix.
pub fn build_test_requester(server: &MockServer, config: Config) -> ReqwestRequester {
	ReqwestRequester::with_transport(
		config.with_end_point(server.url("/v2/")),
		test_reqwest_transport(),
	)
	.expect("Requester should build against the mock server.")
}
