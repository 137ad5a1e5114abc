mod format;
mod message_tree;
mod value;

pub use format::CatalogFormat;
pub use message_tree::MessageTree;
pub(crate) use message_tree::TreeSeed;
pub use value::Value;
