//! Configuration module for Sor-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sor_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("registry.toml")).unwrap();
//! println!("Crawling county: {}", config.registry.county);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, RegistryConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
