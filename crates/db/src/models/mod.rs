//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO where inserts need one

pub mod chapter;
pub mod course;
pub mod enrollment;
pub mod progress;
pub mod user;
