use std::path::{Path, PathBuf};

use crate::error::{ImportError, ImportResult};

/// Commit after this many processed ids
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Locale used for localized names and descriptions
pub const DEFAULT_LOCALE: &str = "en";

pub const MATERIALS_STEM: &str = "typeMaterials";
pub const BLUEPRINTS_STEM: &str = "blueprints";
pub const TYPES_STEM: &str = "types";

/// Locations of the three SDE source files
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePaths {
    pub materials: PathBuf,
    pub blueprints: PathBuf,
    pub types: PathBuf,
}

impl SourcePaths {
    /// Find the source files inside an extracted SDE directory.
    ///
    /// Handles both the YAML layout (`fsd/typeMaterials.yaml`) and the flat
    /// JSONL layout (`typeMaterials.jsonl`). A file that cannot be found
    /// resolves to its YAML location and is reported as missing at load time.
    pub fn discover(sde_dir: &Path) -> Self {
        Self {
            materials: find_source(sde_dir, MATERIALS_STEM),
            blueprints: find_source(sde_dir, BLUEPRINTS_STEM),
            types: find_source(sde_dir, TYPES_STEM),
        }
    }
}

fn find_source(sde_dir: &Path, stem: &str) -> PathBuf {
    let candidates = [
        sde_dir.join("fsd").join(format!("{stem}.yaml")),
        sde_dir.join(format!("{stem}.yaml")),
        sde_dir.join(format!("{stem}.jsonl")),
        sde_dir.join(format!("{stem}.json")),
    ];

    candidates
        .iter()
        .find(|p| p.exists())
        .cloned()
        .unwrap_or_else(|| candidates[0].clone())
}

/// Everything an import run needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub sources: SourcePaths,
    pub db_path: PathBuf,
    pub batch_size: usize,
    pub locale: String,
    /// Only write type rows for published types
    pub published_only: bool,
}

impl ImportConfig {
    pub fn new(sources: SourcePaths, db_path: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            db_path: db_path.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            locale: DEFAULT_LOCALE.to_string(),
            published_only: false,
        }
    }

    pub fn with_batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }

    pub fn with_locale(self, locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..self
        }
    }

    pub fn with_published_only(self, published_only: bool) -> Self {
        Self {
            published_only,
            ..self
        }
    }

    pub fn validate(&self) -> ImportResult<()> {
        if self.batch_size == 0 {
            return Err(ImportError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.locale.trim().is_empty() {
            return Err(ImportError::InvalidConfig("locale must not be empty".to_string()));
        }
        Ok(())
    }
}
