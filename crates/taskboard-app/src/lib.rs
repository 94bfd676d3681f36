//! Application layer for the task dashboard.
//!
//! This crate holds the session's entity store, the mutation service that keeps it
//! consistent, configuration, sample data and the mock login used by front-ends.

/// Mock login.
pub mod auth;
/// Project configuration.
pub mod config;
/// Filter construction from user-facing tokens.
pub mod filter_util;
/// Seed datasets.
pub mod seed;
/// Task mutations.
pub mod service;
/// Session entity store.
pub mod store;

// Re-exports for convenience
pub use auth::{AuthError, Credentials, SessionToken};
pub use config::{AuthConfig, DashboardConfig, ProjectConfig, SeedConfig};
pub use filter_util::{
    FilterBuildError, TaskFilterBuilder, normalize_timestamp, parse_optional_timestamp,
    parse_timestamp,
};
pub use seed::{SeedData, SeedError, sample_data};
pub use service::{TaskError, TaskInput, TaskService};
pub use store::EntityStore;
