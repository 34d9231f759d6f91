//! Explicit dataset cache keyed by year.
//!
//! Owned by the application layer and handed to each command, so repeated
//! commands in one process do not re-read the file. Invalidation is
//! explicit; there is no global state.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use anyhow::Result;
use log::debug;

use super::{load::load_dataset, Dataset};

#[derive(Debug)]
pub struct DatasetCache {
    data_dir: PathBuf,
    entries: HashMap<u16, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(data_dir: PathBuf) -> Self {
        DatasetCache {
            data_dir,
            entries: HashMap::new(),
        }
    }

    /// Returns the dataset for a year, loading it on first use.
    pub fn load(&mut self, year: u16) -> Result<Arc<Dataset>> {
        if let Some(dataset) = self.entries.get(&year) {
            debug!("dataset for {year} served from cache");
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_dataset(&self.data_dir, year)?);
        self.entries.insert(year, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drops the cached dataset for a year; the next `load` re-reads it.
    pub fn invalidate(&mut self, year: u16) {
        self.entries.remove(&year);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// -- Tests -------------------------------------------------------------------
