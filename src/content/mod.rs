//! Content module - content records, front-matter and loading

mod date;
mod frontmatter;
pub mod index;
pub mod lint;
pub mod metadata;
mod record;
pub mod store;

pub use date::parse_date;
pub use frontmatter::{FrontMatter, FrontMatterError, FrontMatterFormat};
pub use lint::Lint;
pub use metadata::{MetaValue, Metadata};
pub use record::{published_location, ContentRecord};
pub use store::{ContentStore, LoadReport};
