//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod chapter_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod user_repo;
pub mod watch_progress_repo;

pub use chapter_repo::ChapterRepo;
pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use user_repo::UserRepo;
pub use watch_progress_repo::WatchProgressRepo;
