pub mod html;
pub mod query;

pub use html::escape_html;
pub use query::SearchQuery;
