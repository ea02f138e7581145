//! Ignore rules
//!
//! Patterns are read from a plain text file, one shell glob per line.
//! Blank lines and lines starting with `#` are skipped.
//!
//! A pattern is matched against the whole relative object key, never just
//! the file name, and `*`/`?` also match `/`. So `*.log` ignores both
//! `a.log` and `logs/a.log`, while `secret.txt` only ignores the file at
//! the top of the local root.

use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::error::Result;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Loaded ignore patterns, immutable for the rest of the run
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<Pattern>,
}

impl IgnoreRules {
    /// Read rules from `path`; a missing file gives an empty rule set
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no ignore file");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse rules from file content
    ///
    /// Lines that are not valid globs are logged and dropped.
    pub fn parse(content: &str) -> Self {
        let mut patterns = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match Pattern::new(line) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => {
                    tracing::warn!(line = index + 1, pattern = line, error = %e, "skipping invalid ignore pattern");
                }
            }
        }
        Self { patterns }
    }

    /// The first pattern matching `key`, if any
    pub fn matched_by(&self, key: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.matches_with(key, MATCH_OPTIONS))
            .map(Pattern::as_str)
    }

    /// Whether `key` should be left out of uploads
    pub fn matches(&self, key: &str) -> bool {
        self.matched_by(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let rules = IgnoreRules::parse("# build output\n\n*.tmp\n   \n  # indented comment\ndrafts/*\n");
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let rules = IgnoreRules::load(&temp_dir.path().join(".bucketignore")).unwrap();
        assert!(rules.is_empty());
        assert!(!rules.matches("anything.txt"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".bucketignore");
        std::fs::write(&path, "*.psd\n.DS_Store\n").unwrap();

        let rules = IgnoreRules::load(&path).unwrap();
        assert!(rules.matches("logo.psd"));
        assert!(rules.matches(".DS_Store"));
        assert!(!rules.matches("logo.png"));
    }

    #[test]
    fn test_wildcard_crosses_directories() {
        let rules = IgnoreRules::parse("*.log");
        assert!(rules.matches("a.log"));
        assert!(rules.matches("logs/2024/a.log"));
        assert!(!rules.matches("a.log.gz"));
    }

    #[test]
    fn test_literal_matches_whole_key_only() {
        let rules = IgnoreRules::parse("secret.txt");
        assert!(rules.matches("secret.txt"));
        assert!(!rules.matches("private/secret.txt"));
    }

    #[test]
    fn test_directory_prefix_pattern() {
        let rules = IgnoreRules::parse("drafts/*");
        assert!(rules.matches("drafts/post.md"));
        assert!(rules.matches("drafts/images/hero.png"));
        assert!(!rules.matches("posts/drafts.md"));
    }

    #[test]
    fn test_question_mark_and_classes() {
        let rules = IgnoreRules::parse("img?.png\nv[0-9].txt\nx[!a].md");
        assert!(rules.matches("img1.png"));
        assert!(!rules.matches("img10.png"));
        assert!(rules.matches("v7.txt"));
        assert!(!rules.matches("vx.txt"));
        assert!(rules.matches("xb.md"));
        assert!(!rules.matches("xa.md"));
    }

    #[test]
    fn test_case_sensitive() {
        let rules = IgnoreRules::parse("*.JPG");
        assert!(rules.matches("photo.JPG"));
        assert!(!rules.matches("photo.jpg"));
    }

    #[test]
    fn test_invalid_pattern_dropped() {
        let rules = IgnoreRules::parse("[unclosed\n*.bak");
        assert_eq!(rules.len(), 1);
        assert!(rules.matches("old.bak"));
    }

    #[test]
    fn test_matched_by_reports_first_pattern() {
        let rules = IgnoreRules::parse("*.txt\nnotes.*");
        assert_eq!(rules.matched_by("notes.txt"), Some("*.txt"));
        assert_eq!(rules.matched_by("notes.md"), Some("notes.*"));
        assert_eq!(rules.matched_by("readme.md"), None);
    }
}
