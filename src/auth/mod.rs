//! Authentication module for DreamEcho.
//!
//! Login is deliberately simplified: any non-empty username/password pair
//! receives a signed session token. The token is the only credential.

pub mod token;

pub use token::{Claims, TokenError, TokenIssuer, TOKEN_TTL_SECS};
