//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization and per-recipe history tables
//! - SQLite pragma configuration
//! - Repository layer for snapshot history

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::{HistoryRow, RepoError, Repository};
