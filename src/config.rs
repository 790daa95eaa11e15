//! Compiler configuration, loadable from `sqlcompose.toml`.
//!
//! ```toml
//! legacy_pagination = false
//! operators = ["~", "~*"]
//! parameter_prefix = "$"
//! ```

use crate::error::{ComposeError, ComposeResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options applied when a compiler is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// SQL Server only: paginate with `TOP` / `ROW_NUMBER()` instead of
    /// `OFFSET ... FETCH`.
    pub legacy_pagination: bool,
    /// Extra operators accepted in WHERE/HAVING comparisons.
    pub operators: Vec<String>,
    /// Prefix for named parameters in the final SQL. Defaults to `@p`.
    pub parameter_prefix: Option<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            legacy_pagination: true,
            operators: Vec::new(),
            parameter_prefix: None,
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(content: &str) -> ComposeResult<Self> {
        toml::from_str(content).map_err(|e| ComposeError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ComposeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ComposeError::Config(format!(
                "{} not found",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
