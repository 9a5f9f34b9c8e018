use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an extracted thumbnail is named on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum NamingPolicy {
    /// `<archive-name>.jpg`; extraction stops at the first scene with a thumbnail.
    #[default]
    #[serde(rename = "archive")]
    ArchiveName,
    /// `<scene-name>.jpg`; every scene with a thumbnail is written.
    #[serde(rename = "scene")]
    SceneName,
}

impl NamingPolicy {
    pub fn output_stem<'a>(&self, archive_name: &'a str, scene_name: &'a str) -> &'a str {
        match self {
            NamingPolicy::ArchiveName => archive_name,
            NamingPolicy::SceneName => scene_name,
        }
    }

    pub fn stops_at_first_match(&self) -> bool {
        matches!(self, NamingPolicy::ArchiveName)
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingPolicy::ArchiveName => write!(f, "archive"),
            NamingPolicy::SceneName => write!(f, "scene"),
        }
    }
}

impl FromStr for NamingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "archive" => Ok(NamingPolicy::ArchiveName),
            "scene" => Ok(NamingPolicy::SceneName),
            other => Err(format!(
                "Unknown naming policy '{}' (expected 'archive' or 'scene')",
                other
            )),
        }
    }
}

/// Derives a creator identifier from a file or archive name.
pub trait CreatorKey {
    fn creator_of(&self, name: &str) -> String;
}

/// Text before the first separator, or the whole name when there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadingSegment {
    separator: char,
}

impl LeadingSegment {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }
}

impl Default for LeadingSegment {
    fn default() -> Self {
        Self::new('.')
    }
}

impl CreatorKey for LeadingSegment {
    fn creator_of(&self, name: &str) -> String {
        name.split(self.separator).next().unwrap_or(name).to_string()
    }
}

impl<F> CreatorKey for F
where
    F: Fn(&str) -> String,
{
    fn creator_of(&self, name: &str) -> String {
        self(name)
    }
}

/// Keeps a derived name inside the output directory. Only path separators
/// and control characters are replaced; every other character is kept.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|ch| match ch {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        "unnamed".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_segment() {
        let key = LeadingSegment::default();
        assert_eq!(key.creator_of("alice.hub.jpg"), "alice");
        assert_eq!(key.creator_of("scene1.jpg"), "scene1");
        assert_eq!(key.creator_of("noext"), "noext");
        assert_eq!(key.creator_of(".hidden.jpg"), "");

        let dash = LeadingSegment::new('-');
        assert_eq!(dash.creator_of("carol-pack.1.jpg"), "carol");
    }

    #[test]
    fn test_closure_creator_key() {
        let upper = |name: &str| name.to_uppercase();
        assert_eq!(upper.creator_of("dave.jpg"), "DAVE.JPG");
    }

    #[test]
    fn test_naming_policy_parsing() {
        assert_eq!("archive".parse::<NamingPolicy>(), Ok(NamingPolicy::ArchiveName));
        assert_eq!(" Scene ".parse::<NamingPolicy>(), Ok(NamingPolicy::SceneName));
        assert!("creator".parse::<NamingPolicy>().is_err());
        assert_eq!(NamingPolicy::SceneName.to_string(), "scene");
    }

    #[test]
    fn test_output_stem() {
        assert_eq!(NamingPolicy::ArchiveName.output_stem("alice.hub", "intro"), "alice.hub");
        assert_eq!(NamingPolicy::SceneName.output_stem("alice.hub", "intro"), "intro");
        assert!(NamingPolicy::ArchiveName.stops_at_first_match());
        assert!(!NamingPolicy::SceneName.stops_at_first_match());
    }

    #[test]
    fn test_filename_sanitization() {
        assert_eq!(sanitize_filename("alice.hub"), "alice.hub");
        assert_eq!(sanitize_filename("look: v2?*"), "look: v2?*");
        assert_eq!(sanitize_filename("trailing..."), "trailing...");
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename("tab\there"), "tab_here");
        assert_eq!(sanitize_filename(""), "unnamed");
    }
}
