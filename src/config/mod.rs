//! Configuration module for linkmap
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every section falls back to sensible defaults, so the binary runs
//! without a file at all.
//!
//! # Example
//!
//! ```no_run
//! use linkmap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkmap.toml")).unwrap();
//! println!("Listening on port: {}", config.server.port);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, CrawlerConfig, ServerConfig, StorageConfig};
pub use validation::validate;
