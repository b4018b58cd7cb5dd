//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs carrying the user's id and email. The middleware
//! validates them and attaches the decoded [`Claims`] to the request.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, TokenSigner};
pub use middleware::{require_auth, AuthUser};
