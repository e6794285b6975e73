//! Session object dispatching API calls.
//!
//! A [`Requester`] owns the validated endpoint, the token rotator, the configured timeout, and
//! the latest rate-limit snapshot. Calls take `&mut self`: rotating the token and recording the
//! rate limit mutate session state without internal locking, so callers sharing one session
//! across tasks must serialize access themselves (for example behind an async mutex).

// self
use crate::{
	_prelude::*,
	auth::{TokenRotator, TokenSecret},
	config::Config,
	endpoint::Endpoint,
	http::{self, ApiRequest, ApiTransport, Method, RawResponse, USER_AGENT},
	obs::{self, DispatchRecord, RequestOutcome, RequestSpan},
	rate_limit::RateLimit,
	response::{self, ApiResponse},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Parameter mapping sent as a query string (GET) or JSON body (other verbs).
pub type Params = Map<String, Value>;

/// Page size applied to GET requests that do not set `per_page`.
pub const DEFAULT_PER_PAGE: u64 = 200;

const PER_PAGE: &str = "per_page";
const PAGE: &str = "page";

#[cfg(feature = "reqwest")]
/// Requester specialized for the crate's default reqwest transport.
pub type ReqwestRequester = Requester<ReqwestTransport>;

/// One logical API session.
pub struct Requester<T>
where
	T: ?Sized + ApiTransport,
{
	transport: Arc<T>,
	endpoint: Endpoint,
	tokens: TokenRotator,
	timeout: Option<StdDuration>,
	rate_limit: RateLimit,
}
impl<T> Requester<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a session over a caller-provided transport.
	///
	/// Fails with [`Error::EndPoint`] before any network traffic when the configured endpoint
	/// lacks a scheme or host. An empty token list is accepted here and reported as
	/// [`Error::Token`] at call time.
	pub fn with_transport(config: Config, transport: impl Into<Arc<T>>) -> Result<Self> {
		let endpoint = config.endpoint()?;

		Ok(Self {
			transport: transport.into(),
			endpoint,
			tokens: TokenRotator::new(config.tokens),
			timeout: config.timeout,
			rate_limit: RateLimit::default(),
		})
	}

	/// Validated base endpoint.
	pub fn endpoint(&self) -> &Endpoint {
		&self.endpoint
	}

	/// Token rotator used for the `Authorization` header.
	pub fn tokens(&self) -> &TokenRotator {
		&self.tokens
	}

	/// Replaces the tokens with a single token and resets the rotation.
	pub fn set_token(&mut self, token: impl Into<TokenSecret>) {
		self.tokens.set_single(token);
	}

	/// Replaces the tokens with an ordered list and resets the rotation.
	pub fn set_tokens<I, S>(&mut self, tokens: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<TokenSecret>,
	{
		self.tokens.set(tokens);
	}

	/// Timeout applied to every call.
	pub fn timeout(&self) -> Option<StdDuration> {
		self.timeout
	}

	/// Rate-limit snapshot recorded from the most recent successful response.
	pub fn rate_limit(&self) -> &RateLimit {
		&self.rate_limit
	}

	/// Issues one HTTP request and returns the raw response without classifying it.
	///
	/// GET parameters are encoded as a query string; every other verb sends them as a JSON body.
	pub async fn perform(
		&mut self,
		method: Method,
		path: &str,
		params: &Params,
	) -> Result<RawResponse> {
		let mut url = self.endpoint.join(path)?;
		let token = self.tokens.current()?;
		let rendered = Value::Object(params.clone()).to_string();
		let body = if method.uses_query() {
			http::append_query(&mut url, params);

			None
		} else {
			Some(rendered.clone().into_bytes())
		};
		let headers = vec![
			("Authorization", format!("Bearer {}", token.expose())),
			("Content-Type", "application/json".to_owned()),
			("User-Agent", USER_AGENT.to_owned()),
		];
		let request = ApiRequest { method, url, headers, body, timeout: self.timeout };

		obs::record_dispatch(&self.dispatch_record(&request, &rendered));

		Ok(self.transport.execute(request).await?)
	}

	/// Describes `request` for the dispatch log with every configured token redacted.
	fn dispatch_record(&self, request: &ApiRequest, rendered: &str) -> DispatchRecord {
		DispatchRecord {
			method: request.method,
			url: self.tokens.redact(request.url.as_str()),
			payload: if request.method.uses_query() { "params" } else { "data" },
			params: self.tokens.redact(rendered),
			headers: self.tokens.redact(&format!("{:?}", request.headers)),
			timeout: request.timeout,
		}
	}

	/// Performs, classifies, and records the rate limit for a single page.
	pub(crate) async fn call(
		&mut self,
		method: Method,
		path: &str,
		params: &Params,
	) -> Result<ApiResponse> {
		let response = self.perform(method, path, params).await?;
		let outcome = response::classify(&response)?;

		self.rate_limit = RateLimit::from_headers(&response.headers);

		Ok(outcome)
	}

	/// Calls the API and returns the success sentinel or the decoded (and, for paginated
	/// listings, fully merged) mapping.
	///
	/// GET requests default `per_page` to [`DEFAULT_PER_PAGE`]. When the first page carries a
	/// `links.pages.next` link and the caller did not pin `page`, every following page is fetched
	/// sequentially and merged; a failure on any page aborts the whole call.
	pub async fn get_data(
		&mut self,
		path: &str,
		method: Method,
		params: Option<Params>,
	) -> Result<ApiResponse> {
		let span = RequestSpan::new(method, path);

		obs::record_request_outcome(method, RequestOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut params = params.unwrap_or_default();

				if method.uses_query() && !params.contains_key(PER_PAGE) {
					params.insert(PER_PAGE.into(), DEFAULT_PER_PAGE.into());
				}

				let data = match self.call(method, path, &params).await? {
					ApiResponse::NoContent => return Ok(ApiResponse::NoContent),
					ApiResponse::Data(data) => data,
				};

				if params.contains_key(PAGE) {
					return Ok(ApiResponse::Data(data));
				}

				self.walk_pages(method, params, data).await.map(ApiResponse::Data)
			})
			.await;

		match &result {
			Ok(_) => obs::record_request_outcome(method, RequestOutcome::Success),
			Err(_) => obs::record_request_outcome(method, RequestOutcome::Failure),
		}

		result
	}

	/// Shorthand for a GET [`get_data`](Self::get_data) call without parameters.
	pub async fn get(&mut self, path: &str) -> Result<ApiResponse> {
		self.get_data(path, Method::Get, None).await
	}
}
#[cfg(feature = "reqwest")]
impl Requester<ReqwestTransport> {
	/// Creates a session backed by the crate's default reqwest transport.
	pub fn new(config: Config) -> Result<Self> {
		Self::with_transport(config, ReqwestTransport::default())
	}

	/// Creates a reqwest-backed session configured entirely from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::new(Config::from_env())
	}
}
impl<T> Debug for Requester<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Requester")
			.field("endpoint", &self.endpoint)
			.field("tokens", &self.tokens)
			.field("timeout", &self.timeout)
			.field("rate_limit", &self.rate_limit)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{collections::VecDeque, sync::Mutex};
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{error::TransportError, http::TransportFuture};

	#[derive(Default)]
	struct ScriptedTransport {
		responses: Mutex<VecDeque<RawResponse>>,
		requests: Mutex<Vec<ApiRequest>>,
	}
	impl ScriptedTransport {
		fn new(responses: impl IntoIterator<Item = RawResponse>) -> Self {
			Self { responses: Mutex::new(responses.into_iter().collect()), ..Default::default() }
		}

		fn requests(&self) -> Vec<ApiRequest> {
			self.requests.lock().expect("Request log lock should not be poisoned.").clone()
		}
	}
	impl ApiTransport for ScriptedTransport {
		fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
			self.requests.lock().expect("Request log lock should not be poisoned.").push(request);

			let next = self
				.responses
				.lock()
				.expect("Response queue lock should not be poisoned.")
				.pop_front();

			Box::pin(async move {
				next.ok_or_else(|| TransportError::Io(std::io::ErrorKind::NotConnected.into()))
			})
		}
	}

	fn json_response(status: u16, body: Value) -> RawResponse {
		RawResponse { status, body: body.to_string().into_bytes(), ..Default::default() }
	}

	fn requester(transport: Arc<ScriptedTransport>) -> Requester<ScriptedTransport> {
		let config = Config::new()
			.with_tokens(["token-a", "token-b"])
			.with_end_point("https://api.example.com/v2/");

		Requester::<ScriptedTransport>::with_transport(config, transport)
			.expect("Requester should build.")
	}

	#[tokio::test]
	async fn get_defaults_per_page_and_rotates_tokens() {
		let transport = Arc::new(ScriptedTransport::new([
			json_response(200, json!({ "account": { "status": "active" } })),
			json_response(200, json!({ "balance": "1.00" })),
			json_response(200, json!({ "regions": [] })),
		]));
		let mut requester = requester(transport.clone());

		requester.get("account").await.expect("First call should succeed.");
		requester.get("customers/my/balance").await.expect("Second call should succeed.");
		requester.get("regions").await.expect("Third call should succeed.");

		let requests = transport.requests();
		let auth = requests.iter().map(|r| r.header("authorization")).collect::<Vec<_>>();

		assert_eq!(auth, [Some("Bearer token-a"), Some("Bearer token-b"), Some("Bearer token-a")]);
		assert_eq!(requests[0].url.as_str(), "https://api.example.com/v2/account?per_page=200");
		assert_eq!(requests[0].header("content-type"), Some("application/json"));
		assert_eq!(requests[0].header("user-agent"), Some(USER_AGENT));
		assert!(requests[0].body.is_none());
	}

	#[tokio::test]
	async fn mutating_verbs_send_json_bodies() {
		let transport = Arc::new(ScriptedTransport::new([json_response(
			202,
			json!({ "action": { "status": "in-progress" } }),
		)]));
		let mut requester = requester(transport.clone());
		let params = json!({ "type": "power_off" }).as_object().cloned();
		let response = requester
			.get_data("droplets/42/actions", Method::Post, params)
			.await
			.expect("POST should succeed.");

		assert_eq!(
			response.data().and_then(|d| d["action"]["status"].as_str()),
			Some("in-progress")
		);

		let request = &transport.requests()[0];

		assert_eq!(request.url.as_str(), "https://api.example.com/v2/droplets/42/actions");
		assert_eq!(request.body.as_deref(), Some(b"{\"type\":\"power_off\"}".as_slice()));
	}

	#[tokio::test]
	async fn missing_token_fails_before_dispatch() {
		let transport = Arc::new(ScriptedTransport::default());
		let mut requester: Requester<ScriptedTransport> =
			Requester::with_transport(Config::new(), transport.clone())
				.expect("Requester should build without tokens.");
		let err = requester.get("account").await.expect_err("Call without a token should fail.");

		assert!(matches!(err, Error::Token));
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn set_tokens_restarts_rotation() {
		let transport = Arc::new(ScriptedTransport::new([
			json_response(200, json!({})),
			json_response(200, json!({})),
		]));
		let mut requester = requester(transport.clone());

		requester.get("account").await.expect("First call should succeed.");
		requester.set_tokens(["fresh-1", "fresh-2"]);
		requester.get("account").await.expect("Second call should succeed.");

		assert_eq!(transport.requests()[1].header("authorization"), Some("Bearer fresh-1"));
		assert!(format!("{requester:?}").contains("tokens: 2"));
	}

	#[tokio::test]
	async fn unresolvable_path_keeps_the_rotation() {
		let transport = Arc::new(ScriptedTransport::new([json_response(200, json!({}))]));
		let mut requester = requester(transport.clone());
		let err = requester
			.perform(Method::Get, "http://[::1", &Params::new())
			.await
			.expect_err("Broken path should fail.");

		assert!(matches!(err, Error::Path { .. }));
		assert!(transport.requests().is_empty());
		assert_eq!(requester.tokens().peek().map(TokenSecret::expose), Some("token-a"));

		requester.get("account").await.expect("Follow-up call should succeed.");

		assert_eq!(transport.requests()[0].header("authorization"), Some("Bearer token-a"));
	}

	#[test]
	fn dispatch_record_redacts_every_field() {
		let requester = requester(Arc::new(ScriptedTransport::default()));
		let mut url = Url::parse("https://api.example.com/v2/tags")
			.expect("Test URL should parse successfully.");
		let params = json!({ "name": "token-b" });
		let params = params.as_object().expect("Test params should be an object.");

		http::append_query(&mut url, params);

		let request = ApiRequest {
			method: Method::Get,
			url,
			headers: vec![("Authorization", "Bearer token-a".to_owned())],
			body: None,
			timeout: None,
		};
		let rendered = Value::Object(params.clone()).to_string();
		let record = requester.dispatch_record(&request, &rendered);

		assert_eq!(record.url, "https://api.example.com/v2/tags?name=TOKEN1");
		assert_eq!(record.params, "{\"name\":\"TOKEN1\"}");
		assert_eq!(record.headers, "[(\"Authorization\", \"Bearer TOKEN0\")]");
		assert_eq!(record.payload, "params");

		for field in [&record.url, &record.params, &record.headers] {
			assert!(!field.contains("token-a") && !field.contains("token-b"));
		}
	}

	#[tokio::test]
	async fn transport_failure_propagates() {
		let mut requester = requester(Arc::new(ScriptedTransport::default()));
		let err = requester.get("account").await.expect_err("Empty script should fail.");

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));
	}
}
