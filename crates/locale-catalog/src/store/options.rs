//! Settings for opening a catalog store.

use std::path::PathBuf;

use bon::Builder;
use serde::Deserialize;

use crate::types::CatalogFormat;

/// Settings for [`CatalogStore::with_options`](crate::CatalogStore::with_options).
///
/// Options can be assembled with the builder or deserialized from a host
/// application's own configuration file.
///
/// # Example
///
/// ```
/// use locale_catalog::{CatalogFormat, StoreOptions};
///
/// let options = StoreOptions::builder()
///     .root("locales")
///     .format(CatalogFormat::Yaml)
///     .current_locale("fr")
///     .build();
///
/// assert_eq!(options.fallback_locale, "en");
/// assert!(options.locales.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Deserialize)]
#[builder(on(String, into))]
#[serde(deny_unknown_fields)]
pub struct StoreOptions {
    /// Directory holding one `<locale>.<ext>` file per locale.
    #[builder(into)]
    pub root: PathBuf,

    /// Encoding of the catalog files.
    #[builder(default)]
    #[serde(default)]
    pub format: CatalogFormat,

    /// Locale consulted first on every lookup.
    #[builder(default = "en".to_string())]
    #[serde(default = "default_locale")]
    pub current_locale: String,

    /// Locale consulted when the current locale has no usable message.
    #[builder(default = "en".to_string())]
    #[serde(default = "default_locale")]
    pub fallback_locale: String,

    /// Additional locales to register when the store opens.
    #[builder(default)]
    #[serde(default)]
    pub locales: Vec<String>,
}

fn default_locale() -> String {
    "en".to_string()
}
