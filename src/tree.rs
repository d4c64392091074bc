//! Menu Tree
//!
//! Arena of menu nodes keyed by id. Each node keeps its parent id and the
//! ordered ids of its children, so `order` and `has_children` are derived
//! from the structure instead of being stored next to it.

use std::collections::HashMap;

use crate::error::{MenuError, MenuResult};
use crate::models::{normalize_url, MenuId, MenuItem};

#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    pub id: MenuId,
    pub text: String,
    pub url: Option<String>,
    parent: Option<MenuId>,
    children: Vec<MenuId>,
}

impl MenuNode {
    pub fn children(&self) -> &[MenuId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Result of [`MenuTree::find`]; `parent` is `None` for top-level nodes
#[derive(Debug, Clone, Copy)]
pub struct Found<'a> {
    pub node: &'a MenuNode,
    pub parent: Option<&'a MenuNode>,
}

/// One display row, in depth-first order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuRow {
    pub id: MenuId,
    pub text: String,
    pub url: Option<String>,
    pub depth: usize,
    pub order: u32,
    pub parent_id: Option<MenuId>,
    pub has_children: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuTree {
    nodes: HashMap<MenuId, MenuNode>,
    roots: Vec<MenuId>,
}

impl MenuTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the nested wire form. Sibling groups follow the server's
    /// `order` (ties keep server sequence); a repeated id is rejected.
    pub fn from_items(items: Vec<MenuItem>) -> MenuResult<Self> {
        let mut tree = Self::new();
        let roots = tree.insert_group(items, None)?;
        tree.roots = roots;
        Ok(tree)
    }

    fn insert_group(&mut self, mut items: Vec<MenuItem>, parent: Option<&MenuId>) -> MenuResult<Vec<MenuId>> {
        items.sort_by_key(|item| item.order);

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            if self.nodes.contains_key(&item.id) {
                return Err(MenuError::Malformed(format!("duplicate menu id {}", item.id)));
            }
            let id = item.id;
            self.nodes.insert(
                id.clone(),
                MenuNode {
                    id: id.clone(),
                    text: item.text,
                    url: normalize_url(item.url.as_deref()),
                    parent: parent.cloned(),
                    children: Vec::new(),
                },
            );
            let children = self.insert_group(item.children, Some(&id))?;
            if let Some(node) = self.nodes.get_mut(&id) {
                node.children = children;
            }
            ids.push(id);
        }
        Ok(ids)
    }

    /// Nested wire form with canonical `order` (1..n) and `has_children`
    #[cfg(test)]
    pub fn to_items(&self) -> Vec<MenuItem> {
        self.items_of(&self.roots)
    }

    #[cfg(test)]
    fn items_of(&self, ids: &[MenuId]) -> Vec<MenuItem> {
        ids.iter()
            .enumerate()
            .filter_map(|(idx, id)| {
                let node = self.nodes.get(id)?;
                Some(MenuItem {
                    id: node.id.clone(),
                    text: node.text.clone(),
                    url: node.url.clone(),
                    order: idx as u32 + 1,
                    has_children: node.has_children(),
                    children: self.items_of(&node.children),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[MenuId] {
        &self.roots
    }

    pub fn get(&self, id: &MenuId) -> Option<&MenuNode> {
        self.nodes.get(id)
    }

    /// Locate a node and its parent anywhere in the tree
    pub fn find(&self, id: &MenuId) -> Option<Found<'_>> {
        let node = self.nodes.get(id)?;
        let parent = node.parent.as_ref().and_then(|pid| self.nodes.get(pid));
        Some(Found { node, parent })
    }

    /// Ordered ids under `parent` (`None` = top level)
    pub fn siblings(&self, parent: Option<&MenuId>) -> &[MenuId] {
        match parent {
            None => &self.roots,
            Some(pid) => self.nodes.get(pid).map(|n| n.children.as_slice()).unwrap_or(&[]),
        }
    }

    /// 1-based position among siblings
    #[cfg(test)]
    pub fn order_of(&self, id: &MenuId) -> Option<u32> {
        let node = self.nodes.get(id)?;
        self.siblings(node.parent.as_ref())
            .iter()
            .position(|sid| sid == id)
            .map(|idx| idx as u32 + 1)
    }

    /// True if `ancestor` is `id` itself or appears on `id`'s parent chain
    pub fn is_same_or_ancestor(&self, ancestor: &MenuId, id: &MenuId) -> bool {
        let mut current = Some(id);
        // A well-formed chain is never longer than the node count
        for _ in 0..=self.nodes.len() {
            match current {
                Some(cid) if cid == ancestor => return true,
                Some(cid) => current = self.nodes.get(cid).and_then(|n| n.parent.as_ref()),
                None => return false,
            }
        }
        false
    }

    fn container_mut(&mut self, parent: Option<&MenuId>) -> Option<&mut Vec<MenuId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(pid) => self.nodes.get_mut(pid).map(|n| &mut n.children),
        }
    }

    /// Unlink `id` from its sibling group. Returns the old parent and index.
    pub(crate) fn detach(&mut self, id: &MenuId) -> Option<(Option<MenuId>, usize)> {
        let parent = self.nodes.get(id)?.parent.clone();
        let container = self.container_mut(parent.as_ref())?;
        let idx = container.iter().position(|sid| sid == id)?;
        container.remove(idx);
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
        Some((parent, idx))
    }

    /// Link a detached `id` under `parent` at `index` (clamped). Returns the
    /// new 1-based order.
    pub(crate) fn attach(&mut self, id: &MenuId, parent: Option<&MenuId>, index: usize) -> Option<u32> {
        let container = self.container_mut(parent)?;
        let index = index.min(container.len());
        container.insert(index, id.clone());
        let node = self.nodes.get_mut(id)?;
        node.parent = parent.cloned();
        Some(index as u32 + 1)
    }

    /// Remove a node with all of its descendants. Returns the removed ids,
    /// the node itself first.
    pub fn remove_subtree(&mut self, id: &MenuId) -> Vec<MenuId> {
        if self.detach(id).is_none() {
            return Vec::new();
        }
        let mut removed = Vec::new();
        let mut to_visit = vec![id.clone()];
        while let Some(current) = to_visit.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                to_visit.extend(node.children.into_iter().rev());
                removed.push(current);
            }
        }
        removed
    }

    /// Depth-first rows in display order
    pub fn flatten(&self) -> Vec<MenuRow> {
        fn collect(tree: &MenuTree, ids: &[MenuId], depth: usize, result: &mut Vec<MenuRow>) {
            for (idx, id) in ids.iter().enumerate() {
                let Some(node) = tree.nodes.get(id) else { continue };
                result.push(MenuRow {
                    id: node.id.clone(),
                    text: node.text.clone(),
                    url: node.url.clone(),
                    depth,
                    order: idx as u32 + 1,
                    parent_id: node.parent.clone(),
                    has_children: node.has_children(),
                });
                collect(tree, &node.children, depth + 1, result);
            }
        }

        let mut result = Vec::with_capacity(self.nodes.len());
        collect(self, &self.roots, 0, &mut result);
        result
    }

    /// Structural self-check: edges agree both ways and every node is
    /// reachable from the roots exactly once.
    #[cfg(test)]
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::with_capacity(self.nodes.len());
        let mut stack: Vec<(Option<&MenuId>, &MenuId)> = self.roots.iter().map(|id| (None, id)).collect();

        while let Some((parent, id)) = stack.pop() {
            let node = self.nodes.get(id).ok_or_else(|| format!("dangling reference to {}", id))?;
            if node.parent.as_ref() != parent {
                return Err(format!("{} has parent {:?}, listed under {:?}", id, node.parent, parent));
            }
            if !seen.insert(id) {
                return Err(format!("{} is reachable twice", id));
            }
            stack.extend(node.children.iter().map(|cid| (Some(id), cid)));
        }

        if seen.len() != self.nodes.len() {
            return Err(format!("{} nodes unreachable from the roots", self.nodes.len() - seen.len()));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(id: &str, order: u32, children: Vec<MenuItem>) -> MenuItem {
        MenuItem {
            id: MenuId::from(id),
            text: format!("Item {}", id),
            url: None,
            order,
            has_children: !children.is_empty(),
            children,
        }
    }

    pub(crate) fn id(s: &str) -> MenuId {
        MenuId::from(s)
    }

    /// Top-level ids with their child ids, for compact assertions
    pub(crate) fn shape(tree: &MenuTree) -> Vec<(String, Vec<String>)> {
        tree.roots()
            .iter()
            .map(|rid| {
                let children = tree.get(rid).unwrap().children().iter().map(|c| c.to_string()).collect();
                (rid.to_string(), children)
            })
            .collect()
    }

    fn sample() -> MenuTree {
        MenuTree::from_items(vec![
            item("a", 1, vec![]),
            item("b", 2, vec![item("c", 1, vec![]), item("d", 2, vec![item("e", 1, vec![])])]),
        ])
        .unwrap()
    }

    #[test]
    fn test_find_top_level_and_nested() {
        let tree = sample();

        let a = tree.find(&id("a")).unwrap();
        assert_eq!(a.node.id, id("a"));
        assert!(a.parent.is_none());

        let e = tree.find(&id("e")).unwrap();
        assert_eq!(e.parent.unwrap().id, id("d"));

        assert!(tree.find(&id("zzz")).is_none());
    }

    #[test]
    fn test_from_items_sorts_by_order() {
        let tree = MenuTree::from_items(vec![
            item("x", 3, vec![]),
            item("y", 1, vec![item("y2", 2, vec![]), item("y1", 1, vec![])]),
            item("z", 2, vec![]),
        ])
        .unwrap();

        assert_eq!(
            shape(&tree),
            vec![
                ("y".to_string(), vec!["y1".to_string(), "y2".to_string()]),
                ("z".to_string(), vec![]),
                ("x".to_string(), vec![]),
            ]
        );
        assert_eq!(tree.order_of(&id("x")), Some(3));
        assert_eq!(tree.order_of(&id("y2")), Some(2));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = MenuTree::from_items(vec![item("a", 1, vec![item("a", 1, vec![])])]);
        assert!(matches!(result, Err(MenuError::Malformed(_))));
    }

    #[test]
    fn test_to_items_renumbers() {
        let tree = MenuTree::from_items(vec![item("a", 5, vec![]), item("b", 9, vec![item("c", 4, vec![])])]).unwrap();
        let items = tree.to_items();
        assert_eq!(items[0].order, 1);
        assert_eq!(items[1].order, 2);
        assert!(items[1].has_children);
        assert!(!items[0].has_children);
        assert_eq!(items[1].children[0].order, 1);
    }

    #[test]
    fn test_blank_url_is_absent() {
        let mut raw = item("a", 1, vec![]);
        raw.url = Some("".to_string());
        let tree = MenuTree::from_items(vec![raw]).unwrap();
        assert_eq!(tree.get(&id("a")).unwrap().url, None);
    }

    #[test]
    fn test_ancestor_chain() {
        let tree = sample();
        assert!(tree.is_same_or_ancestor(&id("b"), &id("e")));
        assert!(tree.is_same_or_ancestor(&id("e"), &id("e")));
        assert!(!tree.is_same_or_ancestor(&id("e"), &id("b")));
        assert!(!tree.is_same_or_ancestor(&id("a"), &id("c")));
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = sample();
        let removed = tree.remove_subtree(&id("b"));

        assert_eq!(removed.len(), 4);
        assert_eq!(removed[0], id("b"));
        for gone in ["b", "c", "d", "e"] {
            assert!(tree.find(&id(gone)).is_none());
        }
        assert_eq!(shape(&tree), vec![("a".to_string(), vec![])]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_last_child_clears_has_children() {
        let mut tree = sample();
        tree.remove_subtree(&id("e"));
        assert!(!tree.get(&id("d")).unwrap().has_children());
        assert!(tree.remove_subtree(&id("e")).is_empty());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_flatten_tree() {
        let tree = sample();
        let rows = tree.flatten();

        let order: Vec<(String, usize, u32)> = rows.iter().map(|r| (r.id.to_string(), r.depth, r.order)).collect();
        assert_eq!(
            order,
            vec![
                ("a".to_string(), 0, 1),
                ("b".to_string(), 0, 2),
                ("c".to_string(), 1, 1),
                ("d".to_string(), 1, 2),
                ("e".to_string(), 2, 1),
            ]
        );
        assert!(rows[1].has_children);
        assert_eq!(rows[4].parent_id, Some(id("d")));
    }

    #[test]
    fn test_check_invariants_detects_broken_edge() {
        let mut tree = sample();
        tree.nodes.get_mut(&id("c")).unwrap().parent = None;
        assert!(tree.check_invariants().is_err());
    }
}
