//! Shared configuration utilities
//!
//! This module provides the YAML plumbing used by the storage layer and by
//! the Pacer transport config:
//!
//! - Generic YAML config loading/saving
//! - Strict YAML reading for data files that must not silently fall back
//! - Default data directory
//!
//! # Usage
//!
//! ```ignore
//! use paternologia_core::config::{load_config, save_config, default_data_dir};
//!
//! let config: MyConfig = load_config(&default_data_dir().join("my.yaml"));
//! save_config(&config, &path)?;
//! ```

mod io;
mod paths;

pub use io::{load_config, read_yaml, save_config};
pub use paths::{default_config_path, default_data_dir, DATA_DIR_ENV};
