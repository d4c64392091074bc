//! Reorder Engine
//!
//! Applies a drag-and-drop move to a [`MenuTree`] and describes the move
//! for the menu API.

use crate::error::{MenuError, MenuResult};
use crate::models::{MenuId, MoveMenuItem};
use crate::tree::MenuTree;

/// Where a dragged item was dropped, decoded once by the view
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// The zone after the last top-level item
    TopLevelAppend,
    /// The zone in front of a sibling (top level on the menu screen)
    InsertBeforeSibling(MenuId),
    /// The item itself: become its last child
    MakeChildOf(MenuId),
}

impl DropTarget {
    fn anchor(&self) -> Option<&MenuId> {
        match self {
            DropTarget::TopLevelAppend => None,
            DropTarget::InsertBeforeSibling(id) | DropTarget::MakeChildOf(id) => Some(id),
        }
    }
}

/// What the remote authority needs to persist a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub moved_id: MenuId,
    pub old_parent_id: Option<MenuId>,
    pub new_parent_id: Option<MenuId>,
    pub new_order: u32,
}

impl MoveRequest {
    pub fn body(&self) -> MoveMenuItem {
        MoveMenuItem {
            order: self.new_order,
            parent_id: self.old_parent_id.clone(),
            new_parent_id: self.new_parent_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMoveReason {
    DroppedOnSelf,
    IntoOwnDescendant,
    AlreadyInPlace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(MoveRequest),
    Unchanged(NoMoveReason),
}

/// Move `source` to `target`.
///
/// Unknown ids return `NotFound` with the tree untouched; rejected moves
/// return `Unchanged` with the tree untouched.
pub fn apply_move(tree: &mut MenuTree, source: &MenuId, target: &DropTarget) -> MenuResult<MoveOutcome> {
    let Some(found) = tree.find(source) else {
        return Err(MenuError::NotFound(source.clone()));
    };
    let old_parent = found.parent.map(|p| p.id.clone());

    // Parent of the sibling a drop lands in front of, resolved before detaching
    let mut anchor_parent = None;
    if let Some(anchor) = target.anchor() {
        if anchor == source {
            return Ok(MoveOutcome::Unchanged(NoMoveReason::DroppedOnSelf));
        }
        let Some(anchor_found) = tree.find(anchor) else {
            return Err(MenuError::NotFound(anchor.clone()));
        };
        anchor_parent = anchor_found.parent.map(|p| p.id.clone());
        if tree.is_same_or_ancestor(source, anchor) {
            return Ok(MoveOutcome::Unchanged(NoMoveReason::IntoOwnDescendant));
        }
    }

    let Some((_, old_index)) = tree.detach(source) else {
        return Err(MenuError::NotFound(source.clone()));
    };

    let (new_parent, index) = match target {
        DropTarget::TopLevelAppend => (None, tree.roots().len()),
        DropTarget::InsertBeforeSibling(sibling) => {
            let index = tree
                .siblings(anchor_parent.as_ref())
                .iter()
                .position(|sid| sid == sibling)
                .unwrap_or(0);
            (anchor_parent, index)
        }
        DropTarget::MakeChildOf(parent) => {
            let index = tree.get(parent).map(|n| n.children().len()).unwrap_or(0);
            (Some(parent.clone()), index)
        }
    };

    if new_parent == old_parent && index == old_index {
        tree.attach(source, old_parent.as_ref(), old_index);
        return Ok(MoveOutcome::Unchanged(NoMoveReason::AlreadyInPlace));
    }

    let Some(new_order) = tree.attach(source, new_parent.as_ref(), index) else {
        // Unreachable with the anchor checked above; put the node back
        tree.attach(source, old_parent.as_ref(), old_index);
        return Err(MenuError::NotFound(source.clone()));
    };

    Ok(MoveOutcome::Moved(MoveRequest {
        moved_id: source.clone(),
        old_parent_id: old_parent,
        new_parent_id: new_parent,
        new_order,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::{id, item, shape};

    fn s(v: &str) -> String {
        v.to_string()
    }

    fn orders_are_contiguous(tree: &MenuTree) -> bool {
        let mut groups = vec![tree.roots().to_vec()];
        for row in tree.flatten() {
            groups.push(tree.get(&row.id).unwrap().children().to_vec());
        }
        groups.iter().all(|group| {
            group
                .iter()
                .enumerate()
                .all(|(idx, gid)| tree.order_of(gid) == Some(idx as u32 + 1))
        })
    }

    #[test]
    fn test_make_child_appends_after_existing_children() {
        let mut tree = MenuTree::from_items(vec![item("A", 1, vec![]), item("B", 2, vec![item("C", 1, vec![])])]).unwrap();

        let outcome = apply_move(&mut tree, &id("A"), &DropTarget::MakeChildOf(id("B"))).unwrap();

        assert_eq!(shape(&tree), vec![(s("B"), vec![s("C"), s("A")])]);
        assert_eq!(tree.order_of(&id("B")), Some(1));
        assert_eq!(tree.order_of(&id("A")), Some(2));
        assert_eq!(tree.find(&id("A")).unwrap().parent.unwrap().id, id("B"));
        assert_eq!(
            outcome,
            MoveOutcome::Moved(MoveRequest {
                moved_id: id("A"),
                old_parent_id: None,
                new_parent_id: Some(id("B")),
                new_order: 2,
            })
        );
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_before_first_top_level() {
        let mut tree = MenuTree::from_items(vec![item("A", 1, vec![]), item("B", 2, vec![]), item("C", 3, vec![])]).unwrap();

        let outcome = apply_move(&mut tree, &id("C"), &DropTarget::InsertBeforeSibling(id("A"))).unwrap();

        assert_eq!(shape(&tree), vec![(s("C"), vec![]), (s("A"), vec![]), (s("B"), vec![])]);
        assert_eq!(tree.order_of(&id("C")), Some(1));
        assert_eq!(tree.order_of(&id("B")), Some(3));
        let MoveOutcome::Moved(request) = outcome else { panic!("expected a move") };
        assert_eq!(request.new_order, 1);
        assert_eq!(request.new_parent_id, None);
    }

    #[test]
    fn test_insert_before_later_sibling_accounts_for_detach() {
        let mut tree = MenuTree::from_items(vec![item("A", 1, vec![]), item("B", 2, vec![]), item("C", 3, vec![])]).unwrap();

        apply_move(&mut tree, &id("A"), &DropTarget::InsertBeforeSibling(id("C"))).unwrap();

        assert_eq!(shape(&tree), vec![(s("B"), vec![]), (s("A"), vec![]), (s("C"), vec![])]);
        assert!(orders_are_contiguous(&tree));
    }

    #[test]
    fn test_insert_before_nested_sibling_joins_its_group() {
        let mut tree = MenuTree::from_items(vec![
            item("A", 1, vec![item("A1", 1, vec![]), item("A2", 2, vec![])]),
            item("B", 2, vec![]),
        ])
        .unwrap();

        let outcome = apply_move(&mut tree, &id("B"), &DropTarget::InsertBeforeSibling(id("A2"))).unwrap();

        assert_eq!(shape(&tree), vec![(s("A"), vec![s("A1"), s("B"), s("A2")])]);
        assert_eq!(
            outcome,
            MoveOutcome::Moved(MoveRequest {
                moved_id: id("B"),
                old_parent_id: None,
                new_parent_id: Some(id("A")),
                new_order: 2,
            })
        );
        assert!(orders_are_contiguous(&tree));
    }

    #[test]
    fn test_nested_item_to_top_level_appends() {
        let mut tree = MenuTree::from_items(vec![
            item("A", 1, vec![item("A1", 1, vec![]), item("A2", 2, vec![])]),
            item("B", 2, vec![]),
        ])
        .unwrap();

        let outcome = apply_move(&mut tree, &id("A1"), &DropTarget::TopLevelAppend).unwrap();

        assert_eq!(shape(&tree), vec![(s("A"), vec![s("A2")]), (s("B"), vec![]), (s("A1"), vec![])]);
        assert_eq!(tree.order_of(&id("A2")), Some(1));
        assert_eq!(
            outcome,
            MoveOutcome::Moved(MoveRequest {
                moved_id: id("A1"),
                old_parent_id: Some(id("A")),
                new_parent_id: None,
                new_order: 3,
            })
        );
        assert!(orders_are_contiguous(&tree));
    }

    #[test]
    fn test_last_child_leaving_clears_has_children() {
        let mut tree = MenuTree::from_items(vec![item("A", 1, vec![item("A1", 1, vec![])])]).unwrap();
        apply_move(&mut tree, &id("A1"), &DropTarget::TopLevelAppend).unwrap();
        assert!(!tree.get(&id("A")).unwrap().has_children());
    }

    #[test]
    fn test_drop_on_self_is_noop() {
        let mut tree = MenuTree::from_items(vec![item("A", 1, vec![]), item("B", 2, vec![])]).unwrap();
        let before = tree.clone();

        for target in [DropTarget::MakeChildOf(id("A")), DropTarget::InsertBeforeSibling(id("A"))] {
            let outcome = apply_move(&mut tree, &id("A"), &target).unwrap();
            assert_eq!(outcome, MoveOutcome::Unchanged(NoMoveReason::DroppedOnSelf));
        }
        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_into_descendant_is_rejected() {
        let mut tree = MenuTree::from_items(vec![item(
            "A",
            1,
            vec![item("B", 1, vec![item("C", 1, vec![])])],
        )])
        .unwrap();
        let before = tree.clone();

        let direct = apply_move(&mut tree, &id("A"), &DropTarget::MakeChildOf(id("B"))).unwrap();
        let transitive = apply_move(&mut tree, &id("A"), &DropTarget::MakeChildOf(id("C"))).unwrap();
        let beside = apply_move(&mut tree, &id("A"), &DropTarget::InsertBeforeSibling(id("C"))).unwrap();

        for outcome in [direct, transitive, beside] {
            assert_eq!(outcome, MoveOutcome::Unchanged(NoMoveReason::IntoOwnDescendant));
        }
        assert_eq!(tree, before);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_already_in_place() {
        let mut tree = MenuTree::from_items(vec![item("A", 1, vec![]), item("B", 2, vec![]), item("C", 3, vec![])]).unwrap();
        let before = tree.clone();

        let append_last = apply_move(&mut tree, &id("C"), &DropTarget::TopLevelAppend).unwrap();
        let before_next = apply_move(&mut tree, &id("A"), &DropTarget::InsertBeforeSibling(id("B"))).unwrap();

        assert_eq!(append_last, MoveOutcome::Unchanged(NoMoveReason::AlreadyInPlace));
        assert_eq!(before_next, MoveOutcome::Unchanged(NoMoveReason::AlreadyInPlace));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_stale_ids_leave_tree_untouched() {
        let mut tree = MenuTree::from_items(vec![item("A", 1, vec![]), item("B", 2, vec![])]).unwrap();
        let before = tree.clone();

        let missing_source = apply_move(&mut tree, &id("gone"), &DropTarget::TopLevelAppend);
        let missing_target = apply_move(&mut tree, &id("A"), &DropTarget::MakeChildOf(id("gone")));

        assert_eq!(missing_source, Err(MenuError::NotFound(id("gone"))));
        assert_eq!(missing_target, Err(MenuError::NotFound(id("gone"))));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_request_body() {
        let request = MoveRequest {
            moved_id: id("A"),
            old_parent_id: Some(id("P")),
            new_parent_id: Some(id("Q")),
            new_order: 4,
        };
        let body = request.body();
        assert_eq!(body.order, 4);
        assert_eq!(body.parent_id, Some(id("P")));
        assert_eq!(body.new_parent_id, Some(id("Q")));
    }

    #[test]
    fn test_orders_stay_contiguous_over_many_moves() {
        let mut tree = MenuTree::from_items(vec![
            item("A", 1, vec![item("A1", 1, vec![]), item("A2", 2, vec![])]),
            item("B", 2, vec![item("B1", 1, vec![])]),
            item("C", 3, vec![]),
        ])
        .unwrap();

        let moves = [
            ("B1", DropTarget::MakeChildOf(id("A"))),
            ("C", DropTarget::InsertBeforeSibling(id("A"))),
            ("A2", DropTarget::TopLevelAppend),
            ("A", DropTarget::MakeChildOf(id("C"))),
            ("A1", DropTarget::InsertBeforeSibling(id("C"))),
        ];
        for (source, target) in moves {
            apply_move(&mut tree, &id(source), &target).unwrap();
            tree.check_invariants().unwrap();
            assert!(orders_are_contiguous(&tree));
        }
        assert_eq!(tree.len(), 6);
    }
}
