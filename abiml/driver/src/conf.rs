use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Conf {
    /// suffix a directory entry must carry to count as an archive member
    pub entry_suffix: String,
    /// abort on the first unreadable archive entry instead of skipping it
    pub strict: bool,
}

impl Default for Conf {
    fn default() -> Self {
        Self { entry_suffix: ".abi".to_owned(), strict: false }
    }
}

impl Conf {
    pub fn load(path: impl AsRef<Path>) -> crate::err::Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&src)?)
    }
}
