#![forbid(unsafe_code)]

pub mod model;
pub mod pagination;
pub mod stats;
pub mod time;

pub use pagination::Page;
pub use stats::{DashboardStats, StudyHistory};
pub use time::Clock;
