//! Session layer — the canonical authenticated-user record, its persistence,
//! and normalization of the server's two auth response shapes.

pub mod model;
pub mod normalize;
pub mod store;

pub use model::{Session, SessionUser, UserType};
pub use normalize::normalize_auth_response;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
