//! Request core for the DigitalOcean REST API: rotating bearer tokens, transparent pagination,
//! rate-limit bookkeeping, and a typed error taxonomy in one crate.
//!
//! Resource wrappers call [`Requester::get_data`](requester::Requester::get_data) once per logical
//! operation and decode the returned mapping into their own field set with
//! [`ApiResponse::decode`](response::ApiResponse::decode).

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod obs;
pub mod pagination;
pub mod rate_limit;
pub mod requester;
pub mod response;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
