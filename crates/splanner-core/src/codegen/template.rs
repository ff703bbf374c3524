//! Sources for the hub script template.

use std::future::Future;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Result, SplanError};

/// Supplies the opaque template text that plan data is merged into.
///
/// Fetching is the only suspension point of generation. A caller may drop
/// the future at any time; nothing is mutated before it resolves.
pub trait TemplateSource {
    /// Fetches the template, failing with `SplanError::TemplateUnavailable`.
    fn fetch_template(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Template text held in memory.
#[derive(Debug, Clone)]
pub struct InlineTemplate {
    text: String,
}

impl InlineTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TemplateSource for InlineTemplate {
    async fn fetch_template(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Template read from a file each time it is fetched.
#[derive(Debug, Clone)]
pub struct FileTemplate {
    path: PathBuf,
}

impl FileTemplate {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateSource for FileTemplate {
    async fn fetch_template(&self) -> Result<String> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SplanError::TemplateUnavailable {
                message: format!("{}: {e}", self.path.display()),
            })?;
        debug!(
            "Fetched {} byte template from {}",
            text.len(),
            self.path.display()
        );
        Ok(text)
    }
}
