use std::path::Path;

use super::error::LoadError;
use super::loader;
use super::model::Dataset;

/// The dataset currently shown by the application.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Empty,
    Loaded(Dataset),
}

impl Session {
    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            Session::Empty => None,
            Session::Loaded(ds) => Some(ds),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Session::Loaded(_))
    }

    /// Replace the current dataset wholesale.
    pub fn install(&mut self, dataset: Dataset) {
        *self = Session::Loaded(dataset);
    }

    /// Load `path` and install it on success, returning the record count.
    /// On failure the current dataset stays untouched.
    pub fn load(&mut self, path: &Path) -> Result<usize, LoadError> {
        let dataset = loader::load(path)?;
        let count = dataset.len();
        self.install(dataset);
        Ok(count)
    }
}
