//! `globaltrade-auth` — session token verification boundary.
//!
//! Credential storage and token issuance live with the identity provider; this
//! crate only decides whether a presented token names a valid session. It is
//! intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod validator;

pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use validator::{AuthError, Hs256JwtValidator, JwtValidator};
