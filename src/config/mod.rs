//! Configuration module for Menu-Scanner
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file.
//!
//! # Example
//!
//! ```no_run
//! use menu_scanner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scanner.toml")).unwrap();
//! println!("Scanner will fetch {} sites at a time", config.scan.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ScanOptions, UserAgentConfig, BATCH_SIZE_RANGE, MAX_RETRIES_RANGE, TIMEOUT_MS_RANGE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
