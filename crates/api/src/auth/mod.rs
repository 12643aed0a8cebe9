//! Authentication primitives.
//!
//! Login and token issuance live in the platform's identity service; this
//! crate only validates the access tokens it issues.

pub mod jwt;
