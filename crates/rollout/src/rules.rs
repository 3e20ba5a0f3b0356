//! Rule Source - loads the rule document applied to every target.
//!
//! Rules are opaque JSON objects; the Dashboard validates them at apply time.
//! Two document shapes are accepted:
//!
//! - a bare array: `[{"comment": "deny-all", "policy": "deny", ...}]`
//! - an object with a `rules` array, which is what the API returns and what
//!   backup artifacts contain, so a backup can be re-applied as-is.

use crate::error::{Error, Result};
use dashboard::Direction;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An ordered rule set tagged with the direction it targets.
///
/// Immutable once loaded; the whole list replaces the remote rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDocument {
    direction: Direction,
    rules: Vec<Value>,
    source: Option<PathBuf>,
}

impl RuleDocument {
    /// Build a document from rules already in memory.
    pub fn new(direction: Direction, rules: Vec<Value>) -> Self {
        Self {
            direction,
            rules,
            source: None,
        }
    }

    /// Load a rule document from a JSON file.
    pub fn load(path: impl AsRef<Path>, direction: Direction) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                Error::RulesNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::RulesRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let rules = parse_rules(&content).map_err(|message| Error::RulesParse {
            path: path.to_path_buf(),
            message,
        })?;
        log::info!("Loaded {} {} rules from {}", rules.len(), direction, path.display());

        Ok(Self {
            direction,
            rules,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rules(&self) -> &[Value] {
        &self.rules
    }

    /// File the document was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pretty-printed rule list, exactly what will be sent.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.rules).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Extract the rule list from either accepted document shape.
fn parse_rules(content: &str) -> std::result::Result<Vec<Value>, String> {
    let doc: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    match doc {
        Value::Array(rules) => Ok(rules),
        Value::Object(mut map) => match map.remove("rules") {
            Some(Value::Array(rules)) => Ok(rules),
            Some(_) => Err("\"rules\" must be a list".to_string()),
            None => Err("expected a list of rules or an object with a \"rules\" list".to_string()),
        },
        _ => Err("expected a list of rules or an object with a \"rules\" list".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_bare_array() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "rules.json", r#"[{"comment":"deny-all","policy":"deny"}]"#);

        let doc = RuleDocument::load(&path, Direction::Outbound).unwrap();
        assert_eq!(doc.direction(), Direction::Outbound);
        assert_eq!(doc.rules(), &[json!({"comment": "deny-all", "policy": "deny"})]);
        assert_eq!(doc.source(), Some(path.as_path()));
    }

    #[test]
    fn test_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "rules.json", r#"[{"comment":"b"},{"comment":"a"},{"comment":"c"}]"#);

        let doc = RuleDocument::load(&path, Direction::Inbound).unwrap();
        let comments: Vec<_> = doc.rules().iter().map(|r| r["comment"].clone()).collect();
        assert_eq!(comments, vec![json!("b"), json!("a"), json!("c")]);
    }

    #[test]
    fn test_load_backup_shape() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "backup.json",
            r#"{"rules":[{"comment":"allow dns","policy":"allow"}],"syslogDefaultRule":false}"#,
        );

        let doc = RuleDocument::load(&path, Direction::Inbound).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = RuleDocument::load(dir.path().join("nope.json"), Direction::Inbound).unwrap_err();
        assert!(matches!(err, Error::RulesNotFound { .. }));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.json", "[{\"comment\": ");
        let err = RuleDocument::load(&path, Direction::Inbound).unwrap_err();
        assert!(matches!(err, Error::RulesParse { .. }));
    }

    #[test]
    fn test_load_wrong_shape() {
        let dir = TempDir::new().unwrap();
        for content in [r#""deny""#, r#"{"policy":"deny"}"#, r#"{"rules":{"a":1}}"#, "42"] {
            let path = write(&dir, "shape.json", content);
            let err = RuleDocument::load(&path, Direction::Outbound).unwrap_err();
            assert!(matches!(err, Error::RulesParse { .. }), "accepted {content}");
        }
    }

    #[test]
    fn test_empty_list_is_allowed() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.json", "[]");
        let doc = RuleDocument::load(&path, Direction::Outbound).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.to_pretty_json(), "[]");
    }

    #[test]
    fn test_pretty_json_is_the_rule_list() {
        let doc = RuleDocument::new(Direction::Inbound, vec![json!({"policy": "deny"})]);
        let printed: Value = serde_json::from_str(&doc.to_pretty_json()).unwrap();
        assert_eq!(printed, json!([{"policy": "deny"}]));
        assert!(doc.source().is_none());
    }
}
