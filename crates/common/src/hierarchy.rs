//! Hierarchy trees for the hierarchical multi-select form
//!
//! Trees are addressed by key (`categories`, `skillsTree`, `locations`).
//! Keys, node ids and labels resolve case-insensitively; tree keys also
//! ignore `-` and `_` so `skills-tree` and `SKILLSTREE` name the same tree.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declarative node used to build a tree
struct NodeDef {
    id: &'static str,
    label: &'static str,
    children: Vec<NodeDef>,
}

fn branch(id: &'static str, label: &'static str, children: Vec<NodeDef>) -> NodeDef {
    NodeDef { id, label, children }
}

fn leaf(id: &'static str, label: &'static str) -> NodeDef {
    branch(id, label, Vec::new())
}

/// Flattened tree node
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
    /// Depth from the root level (roots are 0)
    pub level: usize,
}

impl Node {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Node as served to the AJAX tree loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: String,
    pub label: String,
    pub parent_id: Option<String>,
    pub has_children: bool,
    pub level: usize,
}

/// Summary row for the tree index endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    pub key: String,
    pub label: String,
    pub root_count: usize,
    pub node_count: usize,
}

#[derive(Debug)]
pub struct Tree {
    key: &'static str,
    label: &'static str,
    roots: Vec<String>,
    nodes: HashMap<String, Node>,
    /// lowercase id -> id
    by_id: HashMap<String, String>,
    /// lowercase label -> id (first occurrence in preorder wins)
    by_label: HashMap<String, String>,
}

impl Tree {
    fn build(key: &'static str, label: &'static str, defs: Vec<NodeDef>) -> Self {
        let mut tree = Tree {
            key,
            label,
            roots: Vec::new(),
            nodes: HashMap::new(),
            by_id: HashMap::new(),
            by_label: HashMap::new(),
        };
        for def in defs {
            let id = def.id.to_string();
            tree.insert(def, None, 0);
            tree.roots.push(id);
        }
        tree
    }

    fn insert(&mut self, def: NodeDef, parent: Option<&str>, level: usize) {
        let id = def.id.to_string();
        let children: Vec<String> = def.children.iter().map(|c| c.id.to_string()).collect();

        self.by_id.insert(id.to_lowercase(), id.clone());
        self.by_label
            .entry(def.label.to_lowercase())
            .or_insert_with(|| id.clone());
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                label: def.label.to_string(),
                parent: parent.map(str::to_string),
                children,
                level,
            },
        );

        for child in def.children {
            self.insert(child, Some(&id), level + 1);
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn summary(&self) -> TreeSummary {
        TreeSummary {
            key: self.key.to_string(),
            label: self.label.to_string(),
            root_count: self.roots.len(),
            node_count: self.nodes.len(),
        }
    }

    /// Resolve an id or label, ignoring case. Ids take precedence.
    pub fn resolve(&self, key: &str) -> Option<&Node> {
        let needle = key.trim().to_lowercase();
        self.by_id
            .get(&needle)
            .or_else(|| self.by_label.get(&needle))
            .and_then(|id| self.nodes.get(id))
    }

    /// Look up a node by its exact id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn view(&self, node: &Node) -> NodeView {
        NodeView {
            id: node.id.clone(),
            label: node.label.clone(),
            parent_id: node.parent.clone(),
            has_children: node.has_children(),
            level: node.level,
        }
    }

    /// Children of `parent`, or the roots when `parent` is `None`.
    /// An unresolvable parent yields an empty list.
    pub fn children(&self, parent: Option<&str>) -> Vec<NodeView> {
        let ids = match parent.map(str::trim).filter(|p| !p.is_empty()) {
            None => &self.roots,
            Some(key) => match self.resolve(key) {
                Some(node) => &node.children,
                None => return Vec::new(),
            },
        };
        ids.iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|n| self.view(n))
            .collect()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: &str) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(id).and_then(|n| n.parent.as_deref());
        while let Some(parent_id) = current {
            match self.nodes.get(parent_id) {
                Some(parent) => {
                    out.push(parent);
                    current = parent.parent.as_deref();
                }
                None => break,
            }
        }
        out
    }

    /// All descendants of `id` in preorder.
    pub fn descendants(&self, id: &str) -> Vec<&Node> {
        let mut out = Vec::new();
        if let Some(node) = self.nodes.get(id) {
            self.collect_descendants(node, &mut out);
        }
        out
    }

    fn collect_descendants<'a>(&'a self, node: &'a Node, out: &mut Vec<&'a Node>) {
        for child_id in &node.children {
            if let Some(child) = self.nodes.get(child_id) {
                out.push(child);
                self.collect_descendants(child, out);
            }
        }
    }

    /// Labels from the root down to `id`.
    pub fn path(&self, id: &str) -> Vec<&str> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut labels: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .map(|n| n.label.as_str())
            .collect();
        labels.reverse();
        labels.push(node.label.as_str());
        labels
    }

    pub fn full_path(&self, id: &str) -> String {
        self.path(id).join(" > ")
    }
}

static TREES: Lazy<Vec<Tree>> = Lazy::new(|| vec![categories(), skills_tree(), locations()]);

/// Look up a tree by key (case-insensitive, separators ignored).
pub fn tree(key: &str) -> Option<&'static Tree> {
    let wanted = normalize_key(key);
    TREES.iter().find(|t| normalize_key(t.key) == wanted)
}

pub fn trees() -> &'static [Tree] {
    &TREES
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn categories() -> Tree {
    Tree::build(
        "categories",
        "Categories",
        vec![
            branch(
                "technology",
                "Technology",
                vec![
                    branch(
                        "frontend",
                        "Frontend Development",
                        vec![leaf("react", "React"), leaf("angular", "Angular"), leaf("vue", "Vue.js")],
                    ),
                    branch(
                        "backend",
                        "Backend Development",
                        vec![leaf("node", "Node.js"), leaf("python", "Python"), leaf("java", "Java")],
                    ),
                    branch(
                        "mobile",
                        "Mobile Development",
                        vec![
                            leaf("ios", "iOS"),
                            leaf("android", "Android"),
                            leaf("react-native", "React Native"),
                        ],
                    ),
                ],
            ),
            branch(
                "design",
                "Design",
                vec![
                    branch(
                        "ui-design",
                        "UI Design",
                        vec![leaf("web-design", "Web Design"), leaf("mobile-design", "Mobile Design")],
                    ),
                    branch(
                        "ux-design",
                        "UX Design",
                        vec![leaf("user-research", "User Research"), leaf("prototyping", "Prototyping")],
                    ),
                ],
            ),
        ],
    )
}

fn skills_tree() -> Tree {
    Tree::build(
        "skillsTree",
        "Skills",
        vec![
            branch(
                "programming",
                "Programming Languages",
                vec![
                    leaf("javascript", "JavaScript"),
                    leaf("typescript", "TypeScript"),
                    leaf("python", "Python"),
                    leaf("java", "Java"),
                    leaf("csharp", "C#"),
                ],
            ),
            branch(
                "frameworks",
                "Frameworks & Libraries",
                vec![
                    branch(
                        "js-frameworks",
                        "JavaScript Frameworks",
                        vec![
                            leaf("react-framework", "React"),
                            leaf("angular-framework", "Angular"),
                            leaf("vue-framework", "Vue.js"),
                        ],
                    ),
                    branch(
                        "backend-frameworks",
                        "Backend Frameworks",
                        vec![
                            leaf("express", "Express.js"),
                            leaf("django", "Django"),
                            leaf("spring", "Spring"),
                        ],
                    ),
                ],
            ),
        ],
    )
}

fn locations() -> Tree {
    Tree::build(
        "locations",
        "Locations",
        vec![
            branch(
                "north-america",
                "North America",
                vec![
                    branch(
                        "usa",
                        "United States",
                        vec![
                            branch(
                                "california",
                                "California",
                                vec![
                                    leaf("san-francisco", "San Francisco"),
                                    leaf("los-angeles", "Los Angeles"),
                                    leaf("san-diego", "San Diego"),
                                ],
                            ),
                            branch(
                                "new-york",
                                "New York",
                                vec![leaf("nyc", "New York City"), leaf("buffalo", "Buffalo")],
                            ),
                        ],
                    ),
                    branch(
                        "canada",
                        "Canada",
                        vec![branch(
                            "ontario",
                            "Ontario",
                            vec![leaf("toronto", "Toronto"), leaf("ottawa", "Ottawa")],
                        )],
                    ),
                ],
            ),
            branch(
                "europe",
                "Europe",
                vec![
                    branch(
                        "uk",
                        "United Kingdom",
                        vec![leaf("london", "London"), leaf("manchester", "Manchester")],
                    ),
                    branch(
                        "germany",
                        "Germany",
                        vec![leaf("berlin", "Berlin"), leaf("munich", "Munich")],
                    ),
                ],
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_key_normalization() {
        assert_eq!(tree("skillsTree").unwrap().key(), "skillsTree");
        assert_eq!(tree("skills-tree").unwrap().key(), "skillsTree");
        assert_eq!(tree("SKILLS_TREE").unwrap().key(), "skillsTree");
        assert_eq!(tree(" Locations ").unwrap().key(), "locations");
        assert!(tree("regions").is_none());
    }

    #[test]
    fn test_node_counts() {
        assert_eq!(tree("categories").unwrap().node_count(), 20);
        assert_eq!(tree("skillsTree").unwrap().node_count(), 15);
        assert_eq!(tree("locations").unwrap().node_count(), 20);
    }

    #[test]
    fn test_roots_and_children() {
        let t = tree("categories").unwrap();
        let roots = t.children(None);
        let ids: Vec<_> = roots.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["technology", "design"]);
        assert!(roots.iter().all(|n| n.parent_id.is_none() && n.has_children && n.level == 0));

        let kids = t.children(Some("technology"));
        assert_eq!(kids.len(), 3);
        assert_eq!(kids[0].parent_id.as_deref(), Some("technology"));
        assert_eq!(kids[0].level, 1);

        let leaves = t.children(Some("frontend"));
        assert!(leaves.iter().all(|n| !n.has_children));
        assert!(t.children(Some("react")).is_empty());
    }

    #[test]
    fn test_children_resolve_case_insensitively() {
        let t = tree("locations").unwrap();
        assert_eq!(t.children(Some("NORTH-AMERICA")).len(), 2);
        // by label
        assert_eq!(t.children(Some("united states")).len(), 2);
        assert!(t.children(Some("atlantis")).is_empty());
        // blank parent means roots
        assert_eq!(t.children(Some("  ")).len(), 2);
    }

    #[test]
    fn test_ancestors_and_path() {
        let t = tree("locations").unwrap();
        let ancestors: Vec<_> = t.ancestors("san-francisco").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ancestors, vec!["california", "usa", "north-america"]);
        assert_eq!(
            t.full_path("san-francisco"),
            "North America > United States > California > San Francisco"
        );
        assert_eq!(t.full_path("europe"), "Europe");
        assert!(t.path("nowhere").is_empty());
    }

    #[test]
    fn test_descendants_preorder() {
        let t = tree("skillsTree").unwrap();
        let ids: Vec<_> = t.descendants("frameworks").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "js-frameworks",
                "react-framework",
                "angular-framework",
                "vue-framework",
                "backend-frameworks",
                "express",
                "django",
                "spring",
            ]
        );
        assert!(t.descendants("csharp").is_empty());
    }

    #[test]
    fn test_label_resolution_prefers_ids() {
        let t = tree("categories").unwrap();
        // "design" is both an id and part of labels; id wins
        assert_eq!(t.resolve("Design").unwrap().id, "design");
        assert_eq!(t.resolve("vue.js").unwrap().id, "vue");
    }
}
