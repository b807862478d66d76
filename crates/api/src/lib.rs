#![forbid(unsafe_code)]

//! JSON REST surface of the language portal.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod query;
pub mod routes;

pub use error::Problem;
pub use routes::router;
