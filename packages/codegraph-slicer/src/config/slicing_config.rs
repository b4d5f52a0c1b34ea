//! Slicing configuration
//!
//! Controls interprocedural reach, the platform filter and the post-processing passes.

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use crate::shared::constants::{depth, merging, namespaces};

// ============================================================================
// Slicing Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicingConfig {
    /// Maximum caller levels followed from a criterion (0..=5)
    pub max_upward_depth: usize,

    /// Maximum callee levels followed from a criterion (0..=5)
    pub max_downward_depth: usize,

    /// Class-name prefixes left out of the call graph
    pub excluded_namespaces: Vec<String>,

    /// Dead-branch elimination on merged multi-node paths
    pub optimize: bool,

    /// Fold `String.replace(char, char)` on known strings
    pub fold_string_constants: bool,

    /// Run the merger after slicing
    pub merge: bool,

    /// Upper bound on root-to-leaf paths enumerated per root (1..=65536)
    pub max_merge_paths: usize,
}

impl SlicingConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_upward_depth > depth::MAX_DEPTH_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_upward_depth",
                self.max_upward_depth,
                0,
                depth::MAX_DEPTH_LIMIT,
                "Caller chains deeper than 5 are not followed",
            ));
        }

        if self.max_downward_depth > depth::MAX_DEPTH_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_downward_depth",
                self.max_downward_depth,
                0,
                depth::MAX_DEPTH_LIMIT,
                "Callee chains deeper than 5 are not followed",
            ));
        }

        if self.max_merge_paths == 0 || self.max_merge_paths > 65_536 {
            return Err(ConfigError::range_with_hint(
                "max_merge_paths",
                self.max_merge_paths,
                1,
                65_536,
                "At least one path must be merged",
            ));
        }

        if let Some(empty) = self.excluded_namespaces.iter().position(|ns| ns.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "excluded_namespaces[{}] is empty and would exclude every class",
                empty
            )));
        }

        Ok(())
    }

    /// Builder: Set max_upward_depth
    pub fn max_upward_depth(mut self, v: usize) -> Self {
        self.max_upward_depth = v;
        self
    }

    /// Builder: Set max_downward_depth
    pub fn max_downward_depth(mut self, v: usize) -> Self {
        self.max_downward_depth = v;
        self
    }

    /// Builder: Replace excluded_namespaces
    pub fn excluded_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: Set optimize
    pub fn optimize(mut self, v: bool) -> Self {
        self.optimize = v;
        self
    }

    /// Builder: Set fold_string_constants
    pub fn fold_string_constants(mut self, v: bool) -> Self {
        self.fold_string_constants = v;
        self
    }

    /// Builder: Set merge
    pub fn merge(mut self, v: bool) -> Self {
        self.merge = v;
        self
    }

    /// Builder: Set max_merge_paths
    pub fn max_merge_paths(mut self, v: usize) -> Self {
        self.max_merge_paths = v;
        self
    }

    /// Parse a YAML document; missing fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        let excluded_namespaces = namespaces::DEFAULT_EXCLUDED
            .iter()
            .map(|ns| ns.to_string())
            .collect();
        match preset {
            Preset::Fast => Self {
                max_upward_depth: 1,
                max_downward_depth: 1,
                excluded_namespaces,
                optimize: false,
                fold_string_constants: true,
                merge: true,
                max_merge_paths: 64,
            },
            Preset::Balanced => Self {
                max_upward_depth: 3,
                max_downward_depth: 3,
                excluded_namespaces,
                optimize: true,
                fold_string_constants: true,
                merge: true,
                max_merge_paths: merging::DEFAULT_MAX_MERGE_PATHS,
            },
            Preset::Thorough => Self {
                max_upward_depth: depth::DEFAULT_UPWARD_DEPTH,
                max_downward_depth: depth::DEFAULT_DOWNWARD_DEPTH,
                excluded_namespaces,
                optimize: true,
                fold_string_constants: true,
                merge: true,
                max_merge_paths: merging::DEFAULT_MAX_MERGE_PATHS,
            },
        }
    }
}

impl Default for SlicingConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}
