//! Client-level error types shared by the dispatcher, classifier, and pagination walker.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every failure surfaces to the immediate caller; the client never retries and never returns a
/// partially merged pagination result.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Base endpoint is not an absolute URL with a scheme and host.
	#[error("Provided end point `{end_point}` is not a valid URL.")]
	EndPoint {
		/// Raw endpoint string that failed validation.
		end_point: String,
		/// Underlying parsing failure, when the string did not parse at all.
		#[source]
		source: Option<url::ParseError>,
	},
	/// Per-call path could not be resolved against the validated endpoint.
	#[error("Request path `{path}` cannot be resolved against the end point.")]
	Path {
		/// Raw path passed by the caller.
		path: String,
		/// Underlying resolution failure.
		#[source]
		source: url::ParseError,
	},
	/// No usable bearer token was configured at call time.
	#[error("No token provided. Please use a valid token.")]
	Token,
	/// Remote service answered with HTTP 404.
	#[error("Requested resource was not found.")]
	NotFound,
	/// Response body could not be decoded as a JSON object.
	#[error("Read failed from DigitalOcean at `{path}`: {source}.")]
	JsonRead {
		/// Underlying decoder failure.
		#[source]
		source: serde_json::Error,
		/// Path of the offending field (`.` for the document root).
		path: String,
		/// HTTP status code of the response, when one was received.
		status: Option<u16>,
	},
	/// Remote service answered with a non-2xx status and a decodable error body.
	#[error("DigitalOcean returned HTTP {status}: {message}.")]
	DataRead {
		/// HTTP status code returned by the service.
		status: u16,
		/// Service-supplied `message`, falling back to the error `id`.
		message: String,
	},
	/// Next-page link embedded in a listing could not be parsed.
	#[error("Next-page link `{link}` is not a valid URL.")]
	Pagination {
		/// Raw link taken from `links.pages.next`.
		link: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// Wraps a URL parsing failure raised while validating the base endpoint.
	pub fn end_point(end_point: impl Into<String>, source: Option<url::ParseError>) -> Self {
		Self::EndPoint { end_point: end_point.into(), source }
	}

	/// Wraps a decoding failure that tracked the offending field path.
	pub fn json_read(
		err: serde_path_to_error::Error<serde_json::Error>,
		status: Option<u16>,
	) -> Self {
		let path = err.path().to_string();

		Self::JsonRead { source: err.into_inner(), path, status }
	}

	/// Returns `true` for the 404 classification.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the DigitalOcean API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The configured request timeout elapsed before a response arrived.
	#[error("Request to the DigitalOcean API timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the DigitalOcean API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		TransportError::from(e).into()
	}
}
