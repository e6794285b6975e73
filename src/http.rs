//! Transport primitives for DigitalOcean API calls.
//!
//! The module exposes [`ApiTransport`] alongside the owned [`ApiRequest`] and [`RawResponse`]
//! envelopes so downstream crates can plug in a custom HTTP stack (or a fake for tests) without
//! touching the request core. The dispatcher fully prepares every request (resolved URL, query
//! string, JSON body, headers, timeout) before handing it over, so a transport only moves bytes.

// std
use std::collections::BTreeMap;
// self
use crate::{_prelude::*, error::TransportError};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// HTTP verbs understood by the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	/// Read; parameters travel as a query string.
	#[default]
	Get,
	/// Create; parameters travel as a JSON body.
	Post,
	/// Replace; parameters travel as a JSON body.
	Put,
	/// Partial update; parameters travel as a JSON body.
	Patch,
	/// Delete; parameters travel as a JSON body.
	Delete,
}
impl Method {
	/// Returns the canonical upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}

	/// Returns `true` when parameters are encoded as a query string instead of a JSON body.
	pub const fn uses_query(self) -> bool {
		matches!(self, Method::Get)
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// Fully prepared outbound request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL, query string included.
	pub url: Url,
	/// Header name/value pairs in send order.
	pub headers: Vec<(&'static str, String)>,
	/// JSON body for mutating verbs.
	pub body: Option<Vec<u8>>,
	/// Deadline for the whole exchange; unbounded when `None`.
	pub timeout: Option<StdDuration>,
}
impl ApiRequest {
	/// Looks up a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Response headers keyed by lower-cased name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseHeaders(BTreeMap<String, String>);
impl ResponseHeaders {
	/// Inserts a header, replacing any previous value with the same name.
	pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
		self.0.insert(name.as_ref().to_ascii_lowercase(), value.into());
	}

	/// Looks up a header value by case-insensitive name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Iterates over `(name, value)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}
impl<K, V> FromIterator<(K, V)> for ResponseHeaders
where
	K: AsRef<str>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut headers = Self::default();

		for (name, value) in iter {
			headers.insert(name, value);
		}

		headers
	}
}

/// Raw response envelope produced by a transport.
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: ResponseHeaders,
	/// Undecoded response body.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Returns `true` for 2xx status codes.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports capable of executing prepared API requests.
///
/// Implementations must be `Send + Sync + 'static` so a session can hold them behind an
/// [`Arc`]. A transport reports network-level failures only; HTTP error statuses are returned as
/// regular [`RawResponse`] values and classified by the caller.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and collects the full response body.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let ApiRequest { method, url, headers, body, timeout } = request;
			let mut builder = client.request(method.into(), url);

			for (name, value) in headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}
			if let Some(timeout) = timeout {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status, headers, body })
		})
	}
}

/// Appends `params` to `url` as a query string.
///
/// Arrays expand into repeated keys, strings are sent verbatim, `null` entries are skipped, and
/// any other value uses its JSON text form.
pub fn append_query(url: &mut Url, params: &Map<String, Value>) {
	if params.is_empty() {
		return;
	}

	let mut pairs = url.query_pairs_mut();

	for (key, value) in params {
		match value {
			Value::Array(items) =>
				for item in items {
					if let Some(text) = query_text(item) {
						pairs.append_pair(key, &text);
					}
				},
			other =>
				if let Some(text) = query_text(other) {
					pairs.append_pair(key, &text);
				},
		}
	}
}

fn query_text(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(text) => Some(text.clone()),
		other => Some(other.to_string()),
	}
}
