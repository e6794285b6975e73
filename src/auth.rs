//! Bearer-token models: redacting secrets and the round-robin rotator.

pub mod rotator;
pub mod secret;

pub use rotator::*;
pub use secret::*;
