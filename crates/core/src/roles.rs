//! Well-known role name constants.
//!
//! These must match the role values the identity service puts into
//! access-token claims.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_STUDENT: &str = "student";
