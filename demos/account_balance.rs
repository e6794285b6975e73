//! Fetches the account balance with a token taken from the environment.
//!
//! ```sh
//! DIGITALOCEAN_ACCESS_TOKEN=dop_v1_... cargo run --example account_balance
//! ```
//!
//! `DIGITALOCEAN_END_POINT` and `DIGITALOCEAN_REQUEST_TIMEOUT_SEC` are honored as well.

// crates.io
use color_eyre::{Result, eyre::eyre};
use serde::Deserialize;
// self
use digitalocean_api::requester::ReqwestRequester;

#[derive(Debug, Deserialize)]
struct Balance {
	month_to_date_balance: String,
	account_balance: String,
	month_to_date_usage: String,
	generated_at: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut requester = ReqwestRequester::from_env()?;
	let balance = requester
		.get("customers/my/balance")
		.await?
		.decode::<Balance>()?
		.ok_or_else(|| eyre!("Balance endpoint returned no content."))?;

	println!("Account balance: {}.", balance.account_balance);
	println!(
		"Month to date: {} balance, {} usage (generated at {}).",
		balance.month_to_date_balance, balance.month_to_date_usage, balance.generated_at
	);

	let rate_limit = requester.rate_limit();

	if let (Some(remaining), Some(limit)) = (rate_limit.remaining_value(), rate_limit.limit_value())
	{
		println!("Rate limit: {remaining}/{limit} requests left.");
	}

	Ok(())
}
