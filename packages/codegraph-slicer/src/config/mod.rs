//! Configuration
//!
//! ```rust,ignore
//! use codegraph_slicer::config::{Preset, SlicingConfig};
//!
//! // Preset
//! let config = SlicingConfig::from_preset(Preset::Balanced);
//!
//! // Override specific fields
//! let config = SlicingConfig::default().max_upward_depth(2).optimize(false);
//! config.validate()?;
//!
//! // YAML document
//! let config = SlicingConfig::from_yaml_str("max_downward_depth: 1")?;
//! ```

pub mod error;
pub mod preset;
pub mod slicing_config;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use preset::Preset;
pub use slicing_config::SlicingConfig;
