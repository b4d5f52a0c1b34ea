//! Slice requests
//!
//! A request names where to start slicing. Batches can be written as YAML:
//!
//! ```yaml
//! - caller: "<com.app.Crypto: void init(java.lang.String)>"
//!   target_statement: "<javax.crypto.Cipher: javax.crypto.Cipher getInstance(java.lang.String)>"
//!   kind: invocation
//!   params: [0]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigResult;
use crate::features::slicing::TargetKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceRequest {
    pub caller: String,
    pub target_statement: String,
    pub kind: TargetKind,
    /// Selected argument positions; `-1` is the receiver
    #[serde(default)]
    pub params: Vec<i32>,
}

impl SliceRequest {
    pub fn new(
        caller: impl Into<String>,
        target_statement: impl Into<String>,
        kind: TargetKind,
        params: Vec<i32>,
    ) -> Self {
        Self {
            caller: caller.into(),
            target_statement: target_statement.into(),
            kind,
            params,
        }
    }

    pub fn batch_from_yaml_str(yaml: &str) -> ConfigResult<Vec<Self>> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
