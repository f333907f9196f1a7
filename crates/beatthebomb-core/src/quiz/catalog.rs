//! Category catalog.
//!
//! A small static tree of menu categories. Branches hold children; leaves
//! select a contiguous slice of the question bank. The engine only consults
//! the catalog to pick the question set a session starts with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::question::QuestionSet;
use crate::error::{CatalogError, CoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogNode {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CatalogNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<QuestionRange>,
}

impl CatalogNode {
    pub fn is_leaf(&self) -> bool {
        self.questions.is_some()
    }

    fn child(&self, title: &str) -> Option<&CatalogNode> {
        self.children
            .iter()
            .find(|c| c.title.eq_ignore_ascii_case(title))
    }
}

/// A playable leaf with its full title path from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub path: Vec<String>,
    pub questions: QuestionRange,
}

/// Read-only category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    root: CatalogNode,
}

impl Catalog {
    /// # Errors
    /// Returns [`CatalogError::MalformedNode`] if any node is both or
    /// neither a branch and a leaf.
    pub fn new(root: CatalogNode) -> Result<Self, CatalogError> {
        check_shape(&root)?;
        Ok(Self { root })
    }

    /// # Errors
    /// Returns a [`CatalogError`] for malformed JSON or tree shape.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let root: CatalogNode = serde_json::from_str(json)?;
        Self::new(root)
    }

    /// # Errors
    /// Returns an IO error if the file cannot be read, or a catalog error
    /// if its content is invalid.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    pub fn root(&self) -> &CatalogNode {
        &self.root
    }

    /// Walk down by child titles (case-insensitive). An empty path is the root.
    pub fn node<S: AsRef<str>>(&self, path: &[S]) -> Option<&CatalogNode> {
        path.iter()
            .try_fold(&self.root, |node, title| node.child(title.as_ref()))
    }

    /// All playable leaves, depth first, in menu order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut out = Vec::new();
        collect_entries(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Resolve a path to the question set it selects from `bank`.
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownPath`], [`CatalogError::NotALeaf`] or
    /// [`CatalogError::InvalidRange`].
    pub fn resolve<S: AsRef<str>>(
        &self,
        path: &[S],
        bank: &QuestionSet,
    ) -> Result<QuestionSet, CatalogError> {
        let joined = path
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("/");
        let node = self
            .node(path)
            .ok_or_else(|| CatalogError::UnknownPath(joined.clone()))?;
        let range = node.questions.ok_or(CatalogError::NotALeaf(joined))?;
        bank.slice(range.start..range.end)
            .map_err(|_| CatalogError::InvalidRange {
                title: node.title.clone(),
                start: range.start,
                end: range.end,
                len: bank.len(),
            })
    }

    /// Check every leaf range against a question bank.
    ///
    /// # Errors
    /// Returns the first [`CatalogError::InvalidRange`] found.
    pub fn validate_against(&self, bank: &QuestionSet) -> Result<(), CatalogError> {
        for entry in self.entries() {
            let QuestionRange { start, end } = entry.questions;
            if start >= end || end > bank.len() {
                return Err(CatalogError::InvalidRange {
                    title: entry.path.last().cloned().unwrap_or_default(),
                    start,
                    end,
                    len: bank.len(),
                });
            }
        }
        Ok(())
    }
}

fn check_shape(node: &CatalogNode) -> Result<(), CatalogError> {
    if node.children.is_empty() == node.questions.is_none() {
        return Err(CatalogError::MalformedNode(node.title.clone()));
    }
    node.children.iter().try_for_each(check_shape)
}

fn collect_entries(node: &CatalogNode, path: &mut Vec<String>, out: &mut Vec<CatalogEntry>) {
    for child in &node.children {
        path.push(child.title.clone());
        if let Some(range) = child.questions {
            out.push(CatalogEntry {
                path: path.clone(),
                questions: range,
            });
        }
        collect_entries(child, path, out);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::question::{Answer, Question};

    const CATALOG: &str = r#"{
        "title": "Main Menu",
        "children": [
            { "title": "Science", "children": [
                { "title": "Physics", "questions": { "start": 0, "end": 2 } },
                { "title": "Chemistry", "questions": { "start": 2, "end": 4 } }
            ]},
            { "title": "History", "questions": { "start": 4, "end": 6 } }
        ]
    }"#;

    fn bank(n: usize) -> QuestionSet {
        let questions = (0..n)
            .map(|i| {
                let answers = (0..4).map(|j| Answer::new(format!("{j}"), j == 0)).collect();
                Question::new(format!("Q{i}"), answers).unwrap()
            })
            .collect();
        QuestionSet::new(questions).unwrap()
    }

    #[test]
    fn lists_leaves_in_menu_order() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let paths: Vec<String> = catalog
            .entries()
            .into_iter()
            .map(|e| e.path.join("/"))
            .collect();
        assert_eq!(paths, ["Science/Physics", "Science/Chemistry", "History"]);
    }

    #[test]
    fn resolves_leaf_to_slice() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let set = catalog.resolve(&["science", "chemistry"], &bank(6)).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().prompt(), "Q2");
    }

    #[test]
    fn branch_is_not_playable() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(
            catalog.resolve(&["Science"], &bank(6)),
            Err(CatalogError::NotALeaf("Science".into()))
        );
    }

    #[test]
    fn unknown_path_is_reported() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(
            catalog.resolve(&["Science", "Biology"], &bank(6)),
            Err(CatalogError::UnknownPath("Science/Biology".into()))
        );
    }

    #[test]
    fn range_beyond_bank_is_invalid() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert!(matches!(
            catalog.validate_against(&bank(5)),
            Err(CatalogError::InvalidRange { end: 6, len: 5, .. })
        ));
        assert!(catalog.validate_against(&bank(6)).is_ok());
    }

    #[test]
    fn node_with_both_children_and_range_is_malformed() {
        let json = r#"{ "title": "Root", "children": [
            { "title": "Odd", "questions": { "start": 0, "end": 1 },
              "children": [ { "title": "Leaf", "questions": { "start": 0, "end": 1 } } ] }
        ]}"#;
        assert_eq!(
            Catalog::from_json(json),
            Err(CatalogError::MalformedNode("Odd".into()))
        );
    }

    #[test]
    fn empty_path_is_root() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let empty: [&str; 0] = [];
        assert_eq!(catalog.node(&empty).unwrap().title, "Main Menu");
    }
}
