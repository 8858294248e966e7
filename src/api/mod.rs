//! API adapter — login/signup, bearer-token attachment, and the
//! marketplace endpoint surface.

pub mod client;
pub mod courses;
pub mod profiles;

pub use client::{ApiClient, ApiEnvelope};
pub use courses::{Course, CourseQuery, NewCourse};
pub use profiles::{Educator, NewEducator, NewStudent, Student};
