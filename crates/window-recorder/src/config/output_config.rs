use crate::config::default_output_dir;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where recordings are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory. Relative paths resolve against the working directory.
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}
