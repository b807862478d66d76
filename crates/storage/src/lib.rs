#![forbid(unsafe_code)]

pub mod memory;
pub mod repository;
pub mod sqlite;
