use crate::dataset::{ExportKind, ImportKind};
use crate::error::{Result, ShopError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the database lives and where datasets are read from / results written to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub datasets_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("product_shop.db"),
            datasets_dir: PathBuf::from("Datasets"),
            output_dir: PathBuf::from("Results"),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ShopError::Config {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).map_err(|e| ShopError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Command-line / environment values win over the file
    pub fn with_overrides(
        mut self,
        database_path: Option<PathBuf>,
        datasets_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(path) = database_path {
            self.database_path = path;
        }
        if let Some(dir) = datasets_dir {
            self.datasets_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("database_path", &self.database_path),
            ("datasets_dir", &self.datasets_dir),
            ("output_dir", &self.output_dir),
        ];
        for (name, path) in fields {
            if path.as_os_str().is_empty() {
                return Err(ShopError::Config {
                    message: format!("{} must not be empty", name),
                });
            }
        }
        Ok(())
    }

    pub fn dataset_path(&self, kind: ImportKind) -> PathBuf {
        self.datasets_dir.join(kind.dataset_file())
    }

    pub fn result_path(&self, kind: ExportKind) -> PathBuf {
        self.output_dir.join(kind.result_file())
    }
}
