//! Per-source keyword filter.

/// Case-insensitive keyword filter over event summaries.
///
/// An event passes when the filter is empty or when at least one keyword is a
/// substring of its summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Parses a space-separated keyword list.
    pub fn parse(text: &str) -> Self {
        Self {
            keywords: text.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    /// Returns true if the filter lets everything through.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Returns true if the summary passes the filter.
    pub fn matches(&self, summary: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let summary = summary.to_lowercase();
        self.keywords.iter().any(|k| summary.contains(k.as_str()))
    }
}
