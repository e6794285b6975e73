//! Response classification into the client's success sentinel, decoded mapping, or typed error.

// self
use crate::{_prelude::*, http::RawResponse};

/// Decoded outcome of a successful call.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiResponse {
	/// HTTP 204; the call succeeded without a body.
	NoContent,
	/// Decoded JSON object (merged across pages for paginated listings).
	Data(Map<String, Value>),
}
impl ApiResponse {
	/// Returns `true` for the no-content success sentinel.
	pub fn is_no_content(&self) -> bool {
		matches!(self, Self::NoContent)
	}

	/// Borrows the decoded mapping, if any.
	pub fn data(&self) -> Option<&Map<String, Value>> {
		match self {
			Self::NoContent => None,
			Self::Data(map) => Some(map),
		}
	}

	/// Consumes the response, returning the decoded mapping, if any.
	pub fn into_data(self) -> Option<Map<String, Value>> {
		match self {
			Self::NoContent => None,
			Self::Data(map) => Some(map),
		}
	}

	/// Decodes the mapping into a resource type with an explicit field set.
	///
	/// Keys unknown to `T` are ignored unless `T` opts into `deny_unknown_fields`; resources
	/// that need them can capture the remainder with `#[serde(flatten)]`. Returns `Ok(None)` for
	/// [`ApiResponse::NoContent`].
	pub fn decode<T>(self) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		let Some(map) = self.into_data() else {
			return Ok(None);
		};

		serde_path_to_error::deserialize(Value::Object(map))
			.map(Some)
			.map_err(|e| Error::json_read(e, None))
	}
}

/// Maps a raw response to the client's outcome taxonomy.
///
/// | Condition | Outcome |
/// |---|---|
/// | status 204 | [`ApiResponse::NoContent`] |
/// | status 404 | [`Error::NotFound`] |
/// | body is not a JSON object | [`Error::JsonRead`] |
/// | other non-2xx | [`Error::DataRead`] with the body's `message`, falling back to `id` |
/// | otherwise | [`ApiResponse::Data`] |
pub fn classify(response: &RawResponse) -> Result<ApiResponse> {
	match response.status {
		204 => return Ok(ApiResponse::NoContent),
		404 => return Err(Error::NotFound),
		_ => (),
	}

	let status = Some(response.status);
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
	let data: Map<String, Value> = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| Error::json_read(e, status))?;

	deserializer.end().map_err(|source| Error::JsonRead { source, path: ".".into(), status })?;

	if !response.is_success() {
		return Err(Error::DataRead {
			status: response.status,
			message: error_message(&data, response.status),
		});
	}

	Ok(ApiResponse::Data(data))
}

fn error_message(data: &Map<String, Value>, status: u16) -> String {
	["message", "id"]
		.into_iter()
		.find_map(|key| match data.get(key) {
			Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
			Some(Value::Null) | None => None,
			Some(other) => Some(other.to_string()),
		})
		.unwrap_or_else(|| format!("unexpected HTTP status {status}"))
}
