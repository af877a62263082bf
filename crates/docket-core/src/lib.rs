//! docket-core: case and update tracking for a small legal office.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums per concern, each mapping to an
//!   [`error::ErrorCode`]; `anyhow::Result` for config loading.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Time**: operations take `now`/`today` from the caller.

pub mod catalog;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod query;
pub mod reminder;
pub mod repository;
pub mod schedule;
pub mod seed;
pub mod service;
pub mod storage;
pub mod view;

pub use repository::{DataExport, Repository};
pub use service::Docket;
