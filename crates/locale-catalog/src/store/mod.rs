//! The catalog store.
//!
//! This module loads locale catalogs from disk, resolves dotted message paths
//! with a fallback locale, and interpolates the resolved templates.

mod catalog_store;
mod error;
mod interpolate;
mod options;

pub use catalog_store::CatalogStore;
pub use error::{CatalogWarning, LoadError, LookupError, compute_suggestions};
pub use interpolate::{interpolate, render};
pub use options::StoreOptions;
