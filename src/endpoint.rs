//! Validated base endpoint used to resolve relative API paths.

// self
use crate::_prelude::*;

/// Public DigitalOcean API base URL.
pub const DEFAULT_END_POINT: &str = "https://api.digitalocean.com/v2/";

/// Absolute base URL with a scheme and host.
///
/// Paths are resolved with RFC 3986 reference resolution, so a relative path such as
/// `droplets` lands under the base path while an absolute URL (for example a next-page link)
/// replaces it entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint(Url);
impl Endpoint {
	/// Parses and validates a base URL, failing with [`Error::EndPoint`] when the scheme or host
	/// is missing.
	pub fn parse(raw: &str) -> Result<Self> {
		let url = Url::parse(raw).map_err(|source| Error::end_point(raw, Some(source)))?;

		Self::try_from_url(url).map_err(|_| Error::end_point(raw, None))
	}

	/// Validates an already parsed URL.
	pub fn try_from_url(url: Url) -> Result<Self> {
		if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
			return Err(Error::end_point(url.as_str(), None));
		}

		Ok(Self(url))
	}

	/// Resolves `path` against the base URL, failing with [`Error::Path`] when it cannot be
	/// resolved.
	pub fn join(&self, path: &str) -> Result<Url> {
		self.0.join(path).map_err(|source| Error::Path { path: path.to_owned(), source })
	}

	/// Returns the underlying URL.
	pub fn as_url(&self) -> &Url {
		&self.0
	}
}
impl Default for Endpoint {
	fn default() -> Self {
		Self(Url::parse(DEFAULT_END_POINT).expect("Default end point must be a valid URL."))
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.0.as_str())
	}
}
impl FromStr for Endpoint {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
