use crate::error::{GitShipError, Result};
use regex::{Regex, RegexSet};

/// Exclusions that always apply: version-control and editor metadata, and
/// environment files that tend to hold secrets
pub const BUILTIN_EXCLUSIONS: &[&str] = &[
    r"(^|/)\.git(/|$)",
    r"(^|/)\.vscode(/|$)",
    r"(^|/)\.idea(/|$)",
    r"(^|/)\.DS_Store$",
    r"(^|/)\.env(\.[^/]*)?$",
];

/// Compiled union of built-in and caller-supplied exclusion patterns
///
/// Patterns are unanchored regular expressions tested against root-relative
/// paths with `/` separators.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    set: RegexSet,
}

impl ExclusionSet {
    /// Built-in exclusions plus the given extra patterns
    pub fn new<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns: Vec<String> = BUILTIN_EXCLUSIONS.iter().map(|p| p.to_string()).collect();
        for pattern in extra {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            Regex::new(pattern).map_err(|e| GitShipError::Exclusion {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
            patterns.push(pattern.to_string());
        }

        let set = RegexSet::new(&patterns).map_err(|e| GitShipError::Exclusion {
            pattern: patterns.join(","),
            reason: e.to_string(),
        })?;
        Ok(ExclusionSet { patterns, set })
    }

    /// Built-in exclusions plus a comma-separated list of patterns
    pub fn from_comma_list(list: &str) -> Result<Self> {
        Self::new(split_patterns(list))
    }

    /// Whether a root-relative path is excluded
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        self.set.is_match(relative_path)
    }

    /// Every active pattern, built-ins first
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        let patterns: Vec<String> = BUILTIN_EXCLUSIONS.iter().map(|p| p.to_string()).collect();
        let set = RegexSet::new(&patterns).expect("built-in exclusions are valid");
        ExclusionSet { patterns, set }
    }
}

/// Split a comma-separated pattern list, dropping empty items
pub fn split_patterns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_exclude_metadata() {
        let set = ExclusionSet::default();
        assert!(set.is_excluded(".git"));
        assert!(set.is_excluded(".git/HEAD"));
        assert!(set.is_excluded("vendor/lib/.git"));
        assert!(set.is_excluded(".vscode"));
        assert!(set.is_excluded(".idea/workspace.xml"));
        assert!(set.is_excluded("assets/.DS_Store"));
        assert!(set.is_excluded(".env"));
        assert!(set.is_excluded("api/.env.production"));
    }

    #[test]
    fn test_builtins_keep_lookalikes() {
        let set = ExclusionSet::default();
        assert!(!set.is_excluded(".gitignore"));
        assert!(!set.is_excluded(".github/workflows/ci.yml"));
        assert!(!set.is_excluded("docs/git/intro.md"));
        assert!(!set.is_excluded("environment.ts"));
        assert!(!set.is_excluded("index.html"));
    }

    #[test]
    fn test_extra_patterns() {
        let set = ExclusionSet::from_comma_list(r"\.map$, ^node_modules").unwrap();
        assert!(set.is_excluded("dist/app.js.map"));
        assert!(set.is_excluded("node_modules"));
        assert!(!set.is_excluded("src/node_modules_helper.rs"));
        assert!(set.is_excluded(".git"));
        assert_eq!(set.patterns().len(), BUILTIN_EXCLUSIONS.len() + 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ExclusionSet::from_comma_list("ok,(unclosed").unwrap_err();
        match err {
            GitShipError::Exclusion { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_split_patterns() {
        assert_eq!(split_patterns(" a , ,b,"), vec!["a", "b"]);
        assert!(split_patterns("").is_empty());
    }
}
