// self
use crate::{_prelude::*, http::Method};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder wrapping one logical call (every page of a pagination walk included).
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the HTTP method and the caller-supplied path.
	pub fn new(method: Method, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::debug_span!("digitalocean_api.request", method = method.as_str(), path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, path);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Redacted description of a request about to leave the process.
///
/// Every string field must already have the configured tokens replaced by their positional
/// placeholders.
#[derive(Clone, Debug)]
pub struct DispatchRecord {
	/// HTTP method.
	pub method: Method,
	/// Fully resolved target URL, query string included.
	pub url: String,
	/// Where the parameters travel (`params` or `data`).
	pub payload: &'static str,
	/// Rendered parameter mapping.
	pub params: String,
	/// Rendered request headers.
	pub headers: String,
	/// Timeout applied to the call.
	pub timeout: Option<StdDuration>,
}

/// Emits the debug event describing a dispatched request.
pub fn record_dispatch(record: &DispatchRecord) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			method = record.method.as_str(),
			url = %record.url,
			payload = record.payload,
			params = %record.params,
			headers = %record.headers,
			timeout = ?record.timeout,
			"Dispatching DigitalOcean API request."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = record;
	}
}

/// Reports a timeout value that could not be parsed and will be ignored.
pub fn invalid_timeout(raw: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(
			timeout = raw,
			"Failed parsing the request timeout; please use a valid non-negative number of seconds."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = raw;
	}
}
