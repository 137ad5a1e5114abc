use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::LoadError;

/// On-disk encoding of the catalog files in a store directory.
///
/// The variant name doubles as the file extension, so `Yaml` and `Yml` parse
/// identically and differ only in which files they read and write.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    #[default]
    Json,
    Yaml,
    Yml,
}

impl CatalogFormat {
    /// The literal extension used for `<locale>.<ext>` files.
    pub fn extension(self) -> &'static str {
        match self {
            CatalogFormat::Json => "json",
            CatalogFormat::Yaml => "yaml",
            CatalogFormat::Yml => "yml",
        }
    }

    /// Whether files in this format are read with the YAML codec.
    pub fn is_yaml(self) -> bool {
        matches!(self, CatalogFormat::Yaml | CatalogFormat::Yml)
    }
}

impl FromStr for CatalogFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(CatalogFormat::Json),
            "yaml" => Ok(CatalogFormat::Yaml),
            "yml" => Ok(CatalogFormat::Yml),
            other => Err(LoadError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl Display for CatalogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}
