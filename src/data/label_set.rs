use serde::{Deserialize, Serialize};

/// Used whenever the label asset is missing, empty or unreadable.
pub const DEFAULT_LABELS: [&str; 4] = ["Harmful", "Kitchen", "Other", "Recyclable"];

/// Ordered class names; index `i` names output position `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::new(DEFAULT_LABELS.iter().map(|x| x.to_string()).collect())
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(labels: Vec<String>) -> Self {
        Self::new(labels)
    }
}

impl From<&[&str]> for LabelSet {
    fn from(labels: &[&str]) -> Self {
        Self::new(labels.iter().map(|x| x.to_string()).collect())
    }
}

impl std::ops::Deref for LabelSet {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.labels
    }
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// One label per non-blank line, `\n` or `\r\n` separated.
    pub fn parse(text: &str) -> Self {
        let labels = text
            .trim_start_matches('\u{feff}')
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { labels }
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.labels.get(i).map(String::as_str)
    }

    pub fn is_default(&self) -> bool {
        self.labels.iter().map(String::as_str).eq(DEFAULT_LABELS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_blank_lines() {
        let labels = LabelSet::parse("Harmful\n\nKitchen\r\n  \nOther\nRecyclable\n");
        assert_eq!(labels.len(), 4);
        assert_eq!(labels.get(1), Some("Kitchen"));
        assert_eq!(labels.get(3), Some("Recyclable"));
        assert!(labels.is_default());
    }

    #[test]
    fn parse_strips_bom() {
        let labels = LabelSet::parse("\u{feff}Glass\nPaper");
        assert_eq!(&labels[..], &["Glass".to_string(), "Paper".to_string()]);
    }

    #[test]
    fn blank_text_is_empty() {
        assert!(LabelSet::parse("\n \r\n\n").is_empty());
    }
}
