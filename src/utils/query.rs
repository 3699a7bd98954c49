use url::{Url, form_urlencoded};

/// Search filters as an ordered list of `key=value` pairs.
///
/// Text filters are dropped when empty and flags are dropped when false, so
/// a query built from an empty form encodes to nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pairs: Vec<(&'static str, String)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &'static str, value: &str) -> Self {
        if !value.is_empty() {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    pub fn flag(mut self, key: &'static str, value: bool) -> Self {
        if value {
            self.pairs.push((key, "true".to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Replaces the query of `url` with these filters. An empty query leaves
    /// the URL without a `?` at all.
    pub fn apply_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.encode()));
        }
    }

    /// The form-urlencoded query string, without the leading `?`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}
