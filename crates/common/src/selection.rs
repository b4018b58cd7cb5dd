//! Hierarchical multi-select state
//!
//! Mirrors the hierarchical dropdown widget: selecting a node also selects
//! every ancestor, deselecting a node also clears every descendant. The
//! selection keeps insertion order so rendered labels match click order.

use crate::hierarchy::Tree;
use crate::{Error, Result};

/// Visual state of a node in the dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Selected,
    /// Not selected itself, but some descendant is
    Partial,
    Unselected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    values: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from client-supplied values.
    ///
    /// Each value is resolved against the tree (id first, then label) and
    /// selected with ancestor propagation. Values that do not resolve are
    /// returned alongside the selection.
    pub fn from_values<S: AsRef<str>>(tree: &Tree, values: &[S]) -> (Self, Vec<String>) {
        let mut selection = Self::new();
        let mut unknown = Vec::new();
        for value in values {
            let value = value.as_ref();
            match tree.resolve(value) {
                Some(node) => {
                    let id = node.id.clone();
                    selection.insert_with_ancestors(tree, &id);
                }
                None => unknown.push(value.to_string()),
            }
        }
        (selection, unknown)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.iter().any(|v| v == id)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Flip the selection state of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, tree: &Tree, id: &str) -> Result<bool> {
        if self.contains(id) {
            self.deselect(tree, id)?;
            Ok(false)
        } else {
            self.select(tree, id)?;
            Ok(true)
        }
    }

    /// Select `id` and every ancestor.
    pub fn select(&mut self, tree: &Tree, id: &str) -> Result<()> {
        if tree.node(id).is_none() {
            return Err(Error::not_found("hierarchy node", id));
        }
        self.insert_with_ancestors(tree, id);
        Ok(())
    }

    /// Deselect `id` and every descendant. Ancestors stay selected.
    pub fn deselect(&mut self, tree: &Tree, id: &str) -> Result<()> {
        if tree.node(id).is_none() {
            return Err(Error::not_found("hierarchy node", id));
        }
        let descendants: Vec<&str> = tree.descendants(id).iter().map(|n| n.id.as_str()).collect();
        self.values
            .retain(|v| v != id && !descendants.contains(&v.as_str()));
        Ok(())
    }

    fn insert_with_ancestors(&mut self, tree: &Tree, id: &str) {
        self.push_unique(id);
        let ancestors: Vec<String> = tree.ancestors(id).iter().map(|n| n.id.clone()).collect();
        for ancestor in ancestors {
            self.push_unique(&ancestor);
        }
    }

    fn push_unique(&mut self, id: &str) {
        if !self.contains(id) {
            self.values.push(id.to_string());
        }
    }

    pub fn state(&self, tree: &Tree, id: &str) -> NodeState {
        if self.contains(id) {
            NodeState::Selected
        } else if tree.descendants(id).iter().any(|n| self.contains(&n.id)) {
            NodeState::Partial
        } else {
            NodeState::Unselected
        }
    }

    /// Text shown on the closed dropdown button.
    pub fn display(&self, tree: &Tree, full_path: bool, placeholder: &str) -> String {
        if self.values.is_empty() {
            return placeholder.to_string();
        }
        self.values
            .iter()
            .filter_map(|id| tree.node(id))
            .map(|node| {
                if full_path && node.parent.is_some() {
                    tree.full_path(&node.id)
                } else {
                    node.label.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy;

    fn locations() -> &'static Tree {
        hierarchy::tree("locations").unwrap()
    }

    #[test]
    fn test_select_propagates_to_ancestors() {
        let tree = locations();
        let mut sel = Selection::new();
        assert!(sel.toggle(tree, "toronto").unwrap());
        assert_eq!(sel.values(), &["toronto", "ontario", "canada", "north-america"]);
    }

    #[test]
    fn test_deselect_clears_descendants_only() {
        let tree = locations();
        let mut sel = Selection::new();
        sel.select(tree, "san-francisco").unwrap();
        sel.select(tree, "nyc").unwrap();

        assert!(!sel.toggle(tree, "usa").unwrap());
        assert_eq!(sel.values(), &["north-america"]);
    }

    #[test]
    fn test_unknown_node_leaves_selection_unchanged() {
        let tree = locations();
        let mut sel = Selection::new();
        sel.select(tree, "london").unwrap();
        let before = sel.clone();
        assert!(matches!(sel.toggle(tree, "paris"), Err(Error::NotFound { .. })));
        assert_eq!(sel, before);
    }

    #[test]
    fn test_partial_state() {
        let tree = locations();
        let mut sel = Selection::new();
        sel.select(tree, "berlin").unwrap();
        sel.deselect(tree, "germany").unwrap();
        // berlin went with germany; europe is still selected
        assert_eq!(sel.state(tree, "europe"), NodeState::Selected);
        assert_eq!(sel.state(tree, "germany"), NodeState::Unselected);

        let mut sel = Selection::new();
        sel.select(tree, "berlin").unwrap();
        sel.values.retain(|v| v != "europe");
        assert_eq!(sel.state(tree, "europe"), NodeState::Partial);
    }

    #[test]
    fn test_display_full_path_and_labels() {
        let tree = hierarchy::tree("categories").unwrap();
        let mut sel = Selection::new();
        assert_eq!(sel.display(tree, true, "Select options..."), "Select options...");

        sel.select(tree, "react").unwrap();
        assert_eq!(
            sel.display(tree, true, ""),
            "Technology > Frontend Development > React, Technology > Frontend Development, Technology"
        );
        assert_eq!(sel.display(tree, false, ""), "React, Frontend Development, Technology");
    }

    #[test]
    fn test_from_values_resolves_and_reports_unknown() {
        let tree = hierarchy::tree("skillsTree").unwrap();
        let (sel, unknown) = Selection::from_values(tree, &["DJANGO", "C#", "cobol"]);
        assert_eq!(
            sel.values(),
            &["django", "backend-frameworks", "frameworks", "csharp", "programming"]
        );
        assert_eq!(unknown, vec!["cobol".to_string()]);
    }

    #[test]
    fn test_clear() {
        let tree = locations();
        let mut sel = Selection::new();
        sel.select(tree, "munich").unwrap();
        sel.clear();
        assert!(sel.is_empty());
    }
}
