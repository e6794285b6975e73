//! Pagination walk over listings that expose `links.pages.next`.
//!
//! [`Requester::get_data`] hands the first decoded page to the walker, which keeps following the
//! next-page link until the service stops returning one. Each subsequent page is fetched only
//! after the previous one completes, merged into a single mapping, and any failure aborts the
//! whole walk without returning the pages collected so far.
//!
//! Merge rule: list-valued fields already present in the accumulator are concatenated in page
//! order; every other field is overwritten by the newest page.

// self
use crate::{
	_prelude::*,
	endpoint::Endpoint,
	http::{ApiTransport, Method},
	requester::{Params, Requester},
	response::ApiResponse,
};

/// Next page to fetch, split into its target URL and query parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PageCursor {
	/// Absolute next-page URL with query and fragment stripped.
	pub target: Url,
	/// Query parameters carried by the link; repeated keys collapse into arrays.
	pub query: Map<String, Value>,
}
impl PageCursor {
	/// Parses a next-page link, resolving relative links against `endpoint`.
	pub fn parse(link: &str, endpoint: &Endpoint) -> Result<Self> {
		let mut target = endpoint
			.as_url()
			.join(link)
			.map_err(|source| Error::Pagination { link: link.to_owned(), source })?;
		let mut query = Map::new();

		for (key, value) in target.query_pairs() {
			if value.is_empty() {
				continue;
			}

			let value = Value::String(value.into_owned());

			match query.get_mut(&*key) {
				Some(Value::Array(items)) => items.push(value),
				Some(existing) => *existing = Value::Array(vec![existing.take(), value]),
				None => {
					query.insert(key.into_owned(), value);
				},
			}
		}

		target.set_query(None);
		target.set_fragment(None);

		Ok(Self { target, query })
	}

	/// Merges the link's query parameters into `params`; the link wins on name clashes.
	pub fn merge_into(self, params: &mut Params) {
		for (key, value) in self.query {
			params.insert(key, value);
		}
	}
}

/// Extracts the cursor for the page following `data`, if the listing continues.
///
/// A missing, non-string, or empty `links.pages.next` ends the walk.
pub fn next_page(data: &Map<String, Value>, endpoint: &Endpoint) -> Result<Option<PageCursor>> {
	data.get("links")
		.and_then(|links| links.get("pages"))
		.and_then(|pages| pages.get("next"))
		.and_then(Value::as_str)
		.filter(|link| !link.is_empty())
		.map(|link| PageCursor::parse(link, endpoint))
		.transpose()
}

/// Merges `page` into `merged`.
pub fn merge_page(merged: &mut Map<String, Value>, page: Map<String, Value>) {
	for (key, value) in page {
		match value {
			Value::Array(items) => match merged.get_mut(&key) {
				Some(Value::Array(existing)) => existing.extend(items),
				_ => {
					merged.insert(key, Value::Array(items));
				},
			},
			value => {
				merged.insert(key, value);
			},
		}
	}
}

impl<T> Requester<T>
where
	T: ?Sized + ApiTransport,
{
	/// Follows next-page links starting from `first`, returning the merged mapping.
	pub(crate) async fn walk_pages(
		&mut self,
		method: Method,
		mut params: Params,
		first: Map<String, Value>,
	) -> Result<Map<String, Value>> {
		let mut cursor = next_page(&first, self.endpoint())?;
		let mut merged = first;

		while let Some(next) = cursor.take() {
			let target = next.target.clone();

			next.merge_into(&mut params);

			let page = match self.call(method, target.as_str(), &params).await? {
				ApiResponse::Data(page) => page,
				ApiResponse::NoContent => break,
			};

			cursor = next_page(&page, self.endpoint())?;

			merge_page(&mut merged, page);
		}

		Ok(merged)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn endpoint() -> Endpoint {
		Endpoint::parse("https://api.example.com/v2/").expect("Test endpoint should parse.")
	}

	fn object(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			other => panic!("Expected a JSON object, got {other}."),
		}
	}

	#[test]
	fn next_page_splits_target_and_query() {
		let data = object(json!({
			"links": { "pages": { "next": "https://api.example.com/v2/droplets?page=2&per_page=200" } }
		}));
		let cursor = next_page(&data, &endpoint())
			.expect("Next-page link should parse.")
			.expect("Next-page link should be present.");

		assert_eq!(cursor.target.as_str(), "https://api.example.com/v2/droplets");
		assert_eq!(Value::Object(cursor.query), json!({ "page": "2", "per_page": "200" }));
	}

	#[test]
	fn next_page_collects_repeated_keys_and_skips_blanks() {
		let link = "droplets?tag_name=web&tag_name=db&name=&page=3";
		let cursor =
			PageCursor::parse(link, &endpoint()).expect("Relative next-page link should parse.");

		assert_eq!(cursor.target.as_str(), "https://api.example.com/v2/droplets");
		assert_eq!(Value::Object(cursor.query), json!({ "tag_name": ["web", "db"], "page": "3" }));
	}

	#[test]
	fn absent_or_empty_links_end_the_walk() {
		let endpoint = endpoint();

		for data in [
			json!({ "droplets": [] }),
			json!({ "links": {} }),
			json!({ "links": { "pages": { "prev": "https://api.example.com/v2/droplets?page=1" } } }),
			json!({ "links": { "pages": { "next": "" } } }),
			json!({ "links": { "pages": { "next": null } } }),
		] {
			assert_eq!(next_page(&object(data), &endpoint).expect("Lookup should not fail."), None);
		}
	}

	#[test]
	fn unparsable_link_is_a_pagination_error() {
		let data = object(json!({ "links": { "pages": { "next": "http://[::1" } } }));
		let err = next_page(&data, &endpoint()).expect_err("Broken link should fail.");

		assert!(matches!(err, Error::Pagination { .. }));
	}

	#[test]
	fn merge_into_lets_the_link_win() {
		let cursor = PageCursor::parse("droplets?page=2&per_page=50", &endpoint())
			.expect("Next-page link should parse.");
		let mut params = object(json!({ "per_page": 200, "tag_name": "web" }));

		cursor.merge_into(&mut params);

		assert_eq!(
			Value::Object(params),
			json!({ "per_page": "50", "tag_name": "web", "page": "2" })
		);
	}

	#[test]
	fn merge_page_concatenates_lists_and_overwrites_scalars() {
		let mut merged = object(json!({
			"droplets": [{ "id": 1 }, { "id": 2 }],
			"meta": { "total": 5 },
			"links": { "pages": { "next": "page-2" } },
		}));

		merge_page(
			&mut merged,
			object(json!({
				"droplets": [{ "id": 3 }],
				"meta": { "total": 6 },
				"links": {},
				"extra": ["new"],
			})),
		);

		assert_eq!(
			Value::Object(merged),
			json!({
				"droplets": [{ "id": 1 }, { "id": 2 }, { "id": 3 }],
				"meta": { "total": 6 },
				"links": {},
				"extra": ["new"],
			})
		);
	}
}
