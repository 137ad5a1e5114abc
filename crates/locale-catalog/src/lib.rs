//! Per-locale message catalogs with fallback lookup and interpolation.
//!
//! A [`CatalogStore`] reads one JSON or YAML file per locale from a directory,
//! resolves dotted paths such as `errors.not_found` against the current
//! locale, falls back to a second locale when the message is missing or
//! empty, and fills `{name}` placeholders from caller-supplied [`Value`]s.

pub mod parser;
mod shared;
pub mod store;
pub mod types;

pub use parser::{ParseError, Segment, Template, parse_catalog, parse_template};
pub use shared::SharedCatalogStore;
pub use store::{
    CatalogStore, CatalogWarning, LoadError, LookupError, StoreOptions, compute_suggestions,
};
pub use types::{CatalogFormat, MessageTree, Value};

/// Creates a `HashMap<String, Value>` of interpolation arguments.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, booleans or strings directly.
///
/// # Example
///
/// ```
/// use locale_catalog::{args, Value};
///
/// let a = args! { "count" => 3, "name" => "Ada" };
/// assert_eq!(a.len(), 2);
/// assert_eq!(a["count"].as_number(), Some(3));
/// assert_eq!(a["name"].as_string(), Some("Ada"));
/// ```
#[macro_export]
macro_rules! args {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
