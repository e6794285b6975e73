//! Round-robin selection over the configured bearer tokens.

// std
use std::cmp::Reverse;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Ordered, immutable token sequence paired with a rotating cursor.
///
/// [`TokenRotator::current`] is the single mutation point: it hands out the token under the
/// cursor and advances it, wrapping at the sequence length. Replacing the sequence through
/// [`TokenRotator::set`] resets the cursor to zero.
#[derive(Clone, Default)]
pub struct TokenRotator {
	tokens: Arc<[TokenSecret]>,
	cursor: usize,
}
impl TokenRotator {
	/// Builds a rotator over an ordered token sequence; blank entries are discarded.
	pub fn new<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<TokenSecret>,
	{
		let tokens = tokens
			.into_iter()
			.map(Into::into)
			.filter(|token: &TokenSecret| !token.is_blank())
			.collect::<Vec<_>>();

		Self { tokens: Arc::from(tokens), cursor: 0 }
	}

	/// Builds a rotator holding a single token.
	pub fn single(token: impl Into<TokenSecret>) -> Self {
		Self::new([token.into()])
	}

	/// Replaces the token sequence and resets the cursor.
	pub fn set<I, S>(&mut self, tokens: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<TokenSecret>,
	{
		*self = Self::new(tokens);
	}

	/// Replaces the token sequence with a single token and resets the cursor.
	pub fn set_single(&mut self, token: impl Into<TokenSecret>) {
		*self = Self::single(token);
	}

	/// Returns the next token in round-robin order and advances the cursor.
	pub fn current(&mut self) -> Result<TokenSecret> {
		let len = self.tokens.len();

		if len == 0 {
			return Err(Error::Token);
		}

		let idx = self.cursor % len;

		self.cursor = (idx + 1) % len;

		Ok(self.tokens[idx].clone())
	}

	/// Returns the token the next [`current`](Self::current) call will hand out.
	pub fn peek(&self) -> Option<&TokenSecret> {
		self.tokens.get(self.cursor)
	}

	/// Number of configured tokens.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// Returns `true` when no usable token is configured.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Replaces every configured token inside `text` with a positional `TOKEN<i>` placeholder.
	///
	/// Longer tokens are replaced first so a token that prefixes another cannot leave the
	/// longer one's tail behind.
	pub fn redact(&self, text: &str) -> String {
		let mut order = (0..self.tokens.len()).collect::<Vec<_>>();

		order.sort_by_key(|&i| Reverse(self.tokens[i].expose().len()));

		order.into_iter().fold(text.to_owned(), |acc, i| {
			acc.replace(self.tokens[i].expose(), &format!("TOKEN{i}"))
		})
	}
}
impl Debug for TokenRotator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRotator")
			.field("tokens", &self.tokens.len())
			.field("cursor", &self.cursor)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn take(rotator: &mut TokenRotator, n: usize) -> Vec<String> {
		(0..n)
			.map(|_| {
				rotator.current().expect("Rotator should yield a token.").expose().to_owned()
			})
			.collect()
	}

	#[test]
	fn current_cycles_in_insertion_order() {
		let mut rotator = TokenRotator::new(["alpha", "beta", "gamma"]);

		assert_eq!(take(&mut rotator, 7), [
			"alpha", "beta", "gamma", "alpha", "beta", "gamma", "alpha"
		]);
	}

	#[test]
	fn single_token_always_returns_itself() {
		let mut rotator = TokenRotator::single("solo");

		assert_eq!(take(&mut rotator, 3), ["solo", "solo", "solo"]);
	}

	#[test]
	fn set_resets_the_cursor() {
		let mut rotator = TokenRotator::new(["a", "b"]);

		take(&mut rotator, 1);
		assert_eq!(rotator.peek().map(TokenSecret::expose), Some("b"));

		rotator.set(["x", "y", "z"]);
		assert_eq!(take(&mut rotator, 2), ["x", "y"]);

		rotator.set_single("only");
		assert_eq!(take(&mut rotator, 2), ["only", "only"]);
	}

	#[test]
	fn empty_sequence_fails_with_token_error() {
		let mut rotator = TokenRotator::default();

		assert!(matches!(rotator.current(), Err(Error::Token)));

		let mut blank = TokenRotator::single("   ");

		assert!(blank.is_empty());
		assert!(matches!(blank.current(), Err(Error::Token)));
	}

	#[test]
	fn redact_uses_positional_placeholders() {
		let rotator = TokenRotator::new(["secret-one", "secret-two"]);
		let redacted =
			rotator.redact("Authorization: Bearer secret-two, fallback Bearer secret-one");

		assert_eq!(redacted, "Authorization: Bearer TOKEN1, fallback Bearer TOKEN0");
		assert!(format!("{rotator:?}").contains("tokens: 2"));
	}

	#[test]
	fn redact_handles_tokens_that_prefix_each_other() {
		let rotator = TokenRotator::new(["dop_v1_abc", "dop_v1_abcdef"]);

		assert_eq!(rotator.redact("Bearer dop_v1_abcdef"), "Bearer TOKEN1");
		assert_eq!(
			rotator.redact("Bearer dop_v1_abc, Bearer dop_v1_abcdef"),
			"Bearer TOKEN0, Bearer TOKEN1"
		);
	}
}
