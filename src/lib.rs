//! LearnFrame client core — signup flow engine and session/API adapter.

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod signup;
