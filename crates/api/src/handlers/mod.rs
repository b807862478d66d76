//! HTTP request handlers - thin layer that delegates to the services

pub mod dashboard;
pub mod groups;
pub mod study_activities;
pub mod study_sessions;
pub mod words;
