//! Locale catalog storage and message resolution.
//!
//! A [`CatalogStore`] owns a directory of `<locale>.<ext>` files, keeps one
//! parsed [`MessageTree`] per registered locale, and resolves dotted message
//! paths against the current locale with a single fallback locale behind it.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{self, Path, PathBuf};

use tracing::{debug, trace};

use crate::parser::parse_catalog;
use crate::store::error::{CatalogWarning, LoadError, LookupError, compute_suggestions};
use crate::store::interpolate::interpolate;
use crate::store::options::StoreOptions;
use crate::types::{CatalogFormat, MessageTree, Value};

/// The locale every store starts with.
const DEFAULT_LOCALE: &str = "en";

/// User-facing message store backed by a directory of locale files.
///
/// The store is seeded with the `en` locale. Other locales are registered on
/// demand; registering a locale whose file does not exist creates it with an
/// empty catalog so translators have something to fill in.
///
/// Lookups never touch the file system. All I/O happens when the store is
/// opened and when locales are registered, reloaded or scaffolded, which is
/// why those operations take `&mut self`. Share a store across threads with
/// [`SharedCatalogStore`](crate::SharedCatalogStore).
///
/// # Example
///
/// ```
/// use locale_catalog::{CatalogStore, args};
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("en.json"), r#"{"greeting": "Hello, {name}!"}"#).unwrap();
///
/// let store = CatalogStore::new(dir.path(), "json").unwrap();
/// let text = store.get("greeting", &args! { "name" => "Ada" }).unwrap();
/// assert_eq!(text, "Hello, Ada!");
/// ```
#[derive(Debug)]
pub struct CatalogStore {
    /// Absolute path of the locale directory.
    root: PathBuf,

    format: CatalogFormat,

    /// Registered locales in registration order, without duplicates.
    locales: Vec<String>,

    current_locale: String,

    fallback_locale: String,

    /// Parsed catalog per registered locale.
    catalogs: HashMap<String, MessageTree>,
}

impl CatalogStore {
    /// Open a store rooted at `path` whose files use `format`
    /// (`"json"`, `"yaml"` or `"yml"`).
    ///
    /// The directory is created if needed and the `en` catalog is loaded,
    /// seeding `en.<format>` with an empty catalog if it does not exist.
    pub fn new(path: impl AsRef<Path>, format: &str) -> Result<Self, LoadError> {
        let format = format.parse::<CatalogFormat>()?;
        Self::with_options(
            StoreOptions::builder()
                .root(path.as_ref())
                .format(format)
                .build(),
        )
    }

    /// Open a store from [`StoreOptions`].
    ///
    /// Besides `en`, every locale in `options.locales` is registered, followed
    /// by the current and fallback locales if they are not registered yet.
    pub fn with_options(options: StoreOptions) -> Result<Self, LoadError> {
        let StoreOptions {
            root,
            format,
            current_locale,
            fallback_locale,
            locales,
        } = options;

        let root = absolute_root(&root)?;
        fs::create_dir_all(&root).map_err(|source| LoadError::Io {
            path: root.clone(),
            source,
        })?;

        let mut store = Self {
            root,
            format,
            locales: vec![DEFAULT_LOCALE.to_string()],
            current_locale: DEFAULT_LOCALE.to_string(),
            fallback_locale: DEFAULT_LOCALE.to_string(),
            catalogs: HashMap::new(),
        };
        store.load_locale(DEFAULT_LOCALE)?;

        for locale in locales.iter().chain([&current_locale, &fallback_locale]) {
            if !store.is_registered(locale) {
                store.add_locale(locale.as_str())?;
            }
        }

        store.current_locale = current_locale;
        store.fallback_locale = fallback_locale;
        Ok(store)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Absolute path of the locale directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> CatalogFormat {
        self.format
    }

    /// Registered locales, in registration order.
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn is_registered(&self, locale: &str) -> bool {
        self.locales.iter().any(|registered| registered == locale)
    }

    pub fn current_locale(&self) -> &str {
        &self.current_locale
    }

    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    /// The loaded catalog for `locale`, if it is registered.
    pub fn catalog(&self, locale: &str) -> Option<&MessageTree> {
        self.catalogs.get(locale)
    }

    /// Path of the file backing `locale`.
    pub fn locale_path(&self, locale: &str) -> PathBuf {
        self.root.join(format!("{locale}.{}", self.format.extension()))
    }

    // =========================================================================
    // Locale Management
    // =========================================================================

    /// Register `locale` and load its catalog, creating an empty file for it
    /// if none exists.
    ///
    /// Registering a locale that is already registered reloads its file
    /// without adding a second entry. A locale whose file fails to load is
    /// not registered. Returns the number of non-empty messages loaded.
    pub fn add_locale(&mut self, locale: impl Into<String>) -> Result<usize, LoadError> {
        let locale = locale.into();
        let count = self.load_locale(&locale)?;

        if self.is_registered(&locale) {
            debug!(locale = %locale, "locale already registered, catalog reloaded");
        } else {
            self.locales.push(locale);
        }
        Ok(count)
    }

    /// Re-read the file of a registered locale, replacing its catalog.
    pub fn reload_locale(&mut self, locale: &str) -> Result<usize, LoadError> {
        if !self.is_registered(locale) {
            return Err(LoadError::NotRegistered {
                locale: locale.to_string(),
            });
        }
        self.load_locale(locale)
    }

    /// Change the locale consulted when the current locale has no message.
    ///
    /// The locale does not need to be registered; an unregistered fallback
    /// simply never matches.
    pub fn set_fallback(&mut self, locale: impl Into<String>) {
        self.fallback_locale = locale.into();
    }

    /// Change the locale consulted first.
    ///
    /// This does not load anything. A current locale that was never
    /// registered behaves as an empty catalog, so every lookup goes to the
    /// fallback locale.
    pub fn set_current_locale(&mut self, locale: impl Into<String>) {
        self.current_locale = locale.into();
    }

    /// Write a skeleton of `source` into the file for `target` and register it.
    ///
    /// Every message of `source` that `target` lacks is added with empty text.
    /// Messages already present in the target file are kept as they are.
    /// Since empty messages fall through to the fallback locale, the new
    /// locale is usable straight away.
    pub fn scaffold_locale(
        &mut self,
        source: &str,
        target: impl Into<String>,
    ) -> Result<usize, LoadError> {
        let target = target.into();
        let skeleton = self
            .catalogs
            .get(source)
            .ok_or_else(|| LoadError::NotRegistered {
                locale: source.to_string(),
            })?
            .skeleton();

        let path = self.locale_path(&target);
        let mut tree = if file_exists(&path)? {
            self.read_catalog(&target, &path)?
        } else {
            MessageTree::empty()
        };
        tree.merge_missing(&skeleton);

        let content = self.encode(&target, &path, &tree)?;
        fs::write(&path, content).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(
            source_locale = source,
            locale = %target,
            path = %path.display(),
            "scaffolded catalog"
        );

        self.add_locale(target)
    }

    /// Compare the catalog of `target` against `source`.
    ///
    /// Returns an empty vector if either locale is not registered. Warnings
    /// are sorted by message path.
    pub fn validate_locale(&self, source: &str, target: &str) -> Vec<CatalogWarning> {
        let mut warnings = Vec::new();

        let Some(source_tree) = self.catalogs.get(source) else {
            return warnings;
        };
        let Some(target_tree) = self.catalogs.get(target) else {
            return warnings;
        };

        diff_trees(source_tree, target_tree, "", target, &mut warnings);
        warnings.sort_by(|a, b| a.path().cmp(b.path()));
        warnings
    }

    // =========================================================================
    // Message Resolution
    // =========================================================================

    /// Resolve `path` and substitute its `{name}` placeholders from `args`.
    ///
    /// The current locale is searched first. The fallback locale is searched
    /// only when it differs from the current one and the current locale has
    /// no message, or an empty one, at `path`.
    ///
    /// # Errors
    ///
    /// - [`LookupError::InvalidArgument`] if `path` is empty
    /// - [`LookupError::MessageNotFound`] if neither locale has a message
    /// - [`LookupError::NotALeafMessage`] if `path` names a group of messages
    /// - [`LookupError::MissingInterpolationArgument`] if a placeholder has no argument
    /// - [`LookupError::InvalidTemplate`] if the message has unbalanced braces
    pub fn get(&self, path: &str, args: &HashMap<String, Value>) -> Result<String, LookupError> {
        let text = self.raw(path)?;
        interpolate(path, text, args)
    }

    /// Resolve `path` to its message text without interpolating it.
    pub fn raw(&self, path: &str) -> Result<&str, LookupError> {
        let (locale, message) = self.resolve(path)?;
        match message {
            MessageTree::Leaf(text) => Ok(text.as_str()),
            MessageTree::Node(_) => Err(LookupError::NotALeafMessage {
                path: path.to_string(),
                locale: locale.to_string(),
            }),
        }
    }

    /// Whether `path` resolves to a message in the current or fallback locale.
    pub fn contains(&self, path: &str) -> bool {
        self.raw(path).is_ok()
    }

    /// Find the value at `path`, returning the locale it came from.
    fn resolve(&self, path: &str) -> Result<(&str, &MessageTree), LookupError> {
        if path.is_empty() {
            return Err(LookupError::InvalidArgument {
                reason: "the message path must be a non-empty string".to_string(),
            });
        }

        let segments: Vec<&str> = path.split('.').collect();

        if let Some(message) = self.lookup(&self.current_locale, &segments) {
            return Ok((self.current_locale.as_str(), message));
        }

        if self.current_locale != self.fallback_locale
            && let Some(message) = self.lookup(&self.fallback_locale, &segments)
        {
            trace!(
                path,
                locale = %self.current_locale,
                fallback = %self.fallback_locale,
                "message resolved from fallback locale"
            );
            return Ok((self.fallback_locale.as_str(), message));
        }

        Err(LookupError::MessageNotFound {
            path: path.to_string(),
            suggestions: self.suggestions(path),
        })
    }

    /// Walk one locale's catalog, treating empty values as missing.
    fn lookup(&self, locale: &str, segments: &[&str]) -> Option<&MessageTree> {
        self.catalogs
            .get(locale)?
            .walk(segments)
            .filter(|message| message.is_present())
    }

    /// Known message paths close to `path`, from the current and fallback locales.
    fn suggestions(&self, path: &str) -> Vec<String> {
        let mut available: Vec<String> = [&self.current_locale, &self.fallback_locale]
            .into_iter()
            .filter_map(|locale| self.catalogs.get(locale))
            .flat_map(MessageTree::leaf_paths)
            .collect();
        available.sort();
        available.dedup();
        compute_suggestions(path, &available)
    }

    // =========================================================================
    // Catalog Files
    // =========================================================================

    /// Load the file for `locale` into memory, seeding it if missing.
    ///
    /// Loading the same locale twice **replaces** its previous catalog.
    fn load_locale(&mut self, locale: &str) -> Result<usize, LoadError> {
        let path = self.locale_path(locale);
        self.seed_if_missing(locale, &path)?;

        let tree = self.read_catalog(locale, &path)?;
        let count = tree.leaf_count();
        debug!(locale, path = %path.display(), messages = count, "loaded catalog");

        self.catalogs.insert(locale.to_string(), tree);
        Ok(count)
    }

    /// Create `path` containing an empty catalog unless it already exists.
    ///
    /// The seed is always the JSON text `{}`, which YAML also reads as an
    /// empty mapping.
    fn seed_if_missing(&self, locale: &str, path: &Path) -> Result<(), LoadError> {
        let seed = serde_json::to_string(&MessageTree::empty()).map_err(|e| LoadError::Write {
            locale: locale.to_string(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let io_error = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(io_error(e)),
        };
        file.write_all(seed.as_bytes()).map_err(io_error)?;
        debug!(locale, path = %path.display(), "seeded empty catalog");
        Ok(())
    }

    fn read_catalog(&self, locale: &str, path: &Path) -> Result<MessageTree, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_catalog(&content, self.format)
            .map_err(|e| LoadError::parse(locale, path.to_path_buf(), e))
    }

    fn encode(&self, locale: &str, path: &Path, tree: &MessageTree) -> Result<String, LoadError> {
        let encoded = if self.format.is_yaml() {
            serde_yaml::to_string(tree).map_err(|e| format!("yaml: {e}"))
        } else {
            serde_json::to_string_pretty(tree)
                .map(|json| json + "\n")
                .map_err(|e| format!("json: {e}"))
        };
        encoded.map_err(|message| LoadError::Write {
            locale: locale.to_string(),
            path: path.to_path_buf(),
            message,
        })
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf, LoadError> {
    let root = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root
    };
    path::absolute(root).map_err(|source| LoadError::Io {
        path: root.to_path_buf(),
        source,
    })
}

fn file_exists(path: &Path) -> Result<bool, LoadError> {
    path.try_exists().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Join a dotted prefix and a relative path; either side may be empty.
fn join_path(prefix: &str, key: &str) -> String {
    if key.is_empty() {
        prefix.to_string()
    } else if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Record how `target` differs from `source`, both rooted at `prefix`.
fn diff_trees(
    source: &MessageTree,
    target: &MessageTree,
    prefix: &str,
    locale: &str,
    warnings: &mut Vec<CatalogWarning>,
) {
    match (source, target) {
        (MessageTree::Node(source_children), MessageTree::Node(target_children)) => {
            for (key, source_child) in source_children {
                let path = join_path(prefix, key);
                match target_children.get(key) {
                    Some(target_child) => {
                        diff_trees(source_child, target_child, &path, locale, warnings);
                    }
                    None => {
                        for (leaf, text) in source_child.leaves() {
                            if !text.is_empty() {
                                warnings.push(CatalogWarning::MissingMessage {
                                    path: join_path(&path, &leaf),
                                    locale: locale.to_string(),
                                });
                            }
                        }
                    }
                }
            }
            for (key, target_child) in target_children {
                if source_children.contains_key(key) {
                    continue;
                }
                let path = join_path(prefix, key);
                for (leaf, _) in target_child.leaves() {
                    warnings.push(CatalogWarning::UnknownMessage {
                        path: join_path(&path, &leaf),
                        locale: locale.to_string(),
                    });
                }
            }
        }
        (MessageTree::Leaf(source_text), MessageTree::Leaf(target_text)) => {
            if !source_text.is_empty() && target_text.is_empty() {
                warnings.push(CatalogWarning::MissingMessage {
                    path: prefix.to_string(),
                    locale: locale.to_string(),
                });
            }
        }
        (MessageTree::Leaf(_), MessageTree::Node(_)) | (MessageTree::Node(_), MessageTree::Leaf(_)) => {
            warnings.push(CatalogWarning::ShapeMismatch {
                path: prefix.to_string(),
                locale: locale.to_string(),
            });
        }
    }
}
