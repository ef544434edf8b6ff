use docutree_core::{
    analyze_stats, apply_actions, delete, find_by_id, find_path, insert_child, patch, EditAction,
    MutationStatus, Node, NodeKind, NodePatch, RefusalReason,
};
use std::sync::Arc;

fn hotel() -> Arc<Node> {
    Arc::new(
        Node::with_id("root", NodeKind::Root, "Grand Hotel").with_children([
            Node::with_id("rooms", NodeKind::Category, "Rooms").with_children([
                Node::with_id("suite", NodeKind::Item, "Suite").with_value("2 bedrooms"),
                Node::with_id("double", NodeKind::Item, "Double").with_value("1 bed"),
            ]),
            Node::with_id("dining", NodeKind::Category, "Dining").with_children([
                Node::with_id("bar", NodeKind::Menu, "Bar Menu")
                    .with_children([Node::with_id("negroni", NodeKind::MenuItem, "Negroni")]),
            ]),
            Node::with_id("faq", NodeKind::List, "FAQ").with_children([
                Node::with_id("checkin", NodeKind::QaPair, "Check-in time?").with_answer("3pm"),
            ]),
        ]),
    )
}

#[test]
fn missing_ids_return_the_same_root_reference() {
    let root = hotel();

    let patched = patch(&root, "nope", &NodePatch::value("x"));
    assert_eq!(patched.status, MutationStatus::NotFound);
    assert!(Arc::ptr_eq(&patched.root, &root));

    let deleted = delete(&root, "nope");
    assert_eq!(deleted.status, MutationStatus::NotFound);
    assert!(Arc::ptr_eq(&deleted.root, &root));

    let inserted = insert_child(&root, "nope", Node::new(NodeKind::Item, "Orphan"));
    assert_eq!(inserted.status, MutationStatus::NotFound);
    assert!(Arc::ptr_eq(&inserted.root, &root));
}

#[test]
fn patch_shares_every_subtree_off_the_target_path() {
    let root = hotel();
    let fields = NodePatch {
        price: Some(14.0),
        ..NodePatch::default()
    };
    let result = patch(&root, "negroni", &fields);
    assert!(result.is_applied());
    let new_root = &result.root;

    // Siblings of the path at every level keep identity.
    assert!(Arc::ptr_eq(&new_root.children()[0], &root.children()[0]));
    assert!(Arc::ptr_eq(&new_root.children()[2], &root.children()[2]));
    assert!(Arc::ptr_eq(
        &new_root.children()[0].children()[1],
        &root.children()[0].children()[1]
    ));

    // The path itself is copied.
    let old_path = find_path(&root, "negroni").unwrap();
    let new_path = find_path(new_root, "negroni").unwrap();
    for (old, new) in old_path.iter().zip(&new_path) {
        assert!(!Arc::ptr_eq(old, new));
    }
    assert_eq!(new_path.last().unwrap().price, Some(14.0));
    assert_eq!(old_path.last().unwrap().price, None);
}

#[test]
fn root_delete_is_refused_without_copying() {
    let root = hotel();
    let result = delete(&root, "root");
    assert_eq!(
        result.status,
        MutationStatus::Refused(RefusalReason::RootDeletion)
    );
    assert!(Arc::ptr_eq(&result.root, &root));
}

#[test]
fn delete_removes_whole_subtree_and_keeps_siblings() {
    let root = hotel();
    let result = delete(&root, "dining");
    assert!(result.is_applied());
    assert!(find_by_id(&result.root, "dining").is_none());
    assert!(find_by_id(&result.root, "negroni").is_none());
    assert_eq!(result.root.children().len(), 2);
    assert!(Arc::ptr_eq(&result.root.children()[0], &root.children()[0]));
    assert!(Arc::ptr_eq(&result.root.children()[1], &root.children()[2]));
}

#[test]
fn insert_appends_after_existing_children() {
    let root = hotel();
    let result = insert_child(
        &root,
        "rooms",
        Node::with_id("single", NodeKind::Item, "Single"),
    );
    let rooms = find_by_id(&result.root, "rooms").unwrap();
    let names = rooms
        .children()
        .iter()
        .map(|node| node.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Suite", "Double", "Single"]);
    assert_eq!(root.children()[0].children().len(), 2);
}

#[test]
fn find_path_is_none_or_root_to_target() {
    let root = hotel();
    for id in ["root", "rooms", "double", "negroni", "checkin", "ghost"] {
        match find_path(&root, id) {
            Some(chain) => {
                assert!(Arc::ptr_eq(chain[0], &root));
                assert_eq!(chain.last().unwrap().id, id);
                for pair in chain.windows(2) {
                    assert!(pair[0].children().iter().any(|c| Arc::ptr_eq(c, pair[1])));
                }
            }
            None => assert_eq!(id, "ghost"),
        }
    }
}

#[test]
fn edit_actions_funnel_through_the_same_operations() {
    let root = hotel();
    let actions: Vec<EditAction> = serde_json::from_str(
        r#"[
            {
                "type": "add",
                "targetId": "faq",
                "data": {"id": "wifi", "kind": "qa-pair", "name": "Wifi?"}
            },
            {"type": "update", "targetId": "wifi", "data": {"answer": "Free"}},
            {"type": "delete", "targetId": "double"},
            {"type": "delete", "targetId": "root"},
            {"type": "update", "targetId": "ghost", "data": {"name": "Boo"}}
        ]"#,
    )
    .unwrap();

    let (new_root, statuses) = apply_actions(&root, &actions);
    assert_eq!(
        statuses,
        vec![
            MutationStatus::Applied,
            MutationStatus::Applied,
            MutationStatus::Applied,
            MutationStatus::Refused(RefusalReason::RootDeletion),
            MutationStatus::NotFound,
        ]
    );
    assert_eq!(
        find_by_id(&new_root, "wifi").unwrap().answer.as_deref(),
        Some("Free")
    );
    assert!(find_by_id(&new_root, "double").is_none());
    assert!(Arc::ptr_eq(&new_root.children()[1], &root.children()[1]));
}

#[test]
fn very_deep_trees_do_not_exhaust_the_stack() {
    const DEPTH: usize = 20_000;
    let mut node = Node::with_id(format!("n{DEPTH}"), NodeKind::Item, "leaf");
    for level in (1..DEPTH).rev() {
        node = Node::with_id(format!("n{level}"), NodeKind::Category, format!("level {level}"))
            .with_children([node]);
    }
    let mut root_node = Node::with_id("root", NodeKind::Root, "Deep");
    root_node.children = Some(vec![Arc::new(node)]);
    let root = Arc::new(root_node);

    let leaf_id = format!("n{DEPTH}");
    assert_eq!(find_path(&root, &leaf_id).unwrap().len(), DEPTH + 1);
    assert_eq!(analyze_stats(&root).max_depth, DEPTH + 1);

    let patched = patch(&root, &leaf_id, &NodePatch::value("bottom"));
    assert_eq!(
        find_by_id(&patched.root, &leaf_id).unwrap().value.as_deref(),
        Some("bottom")
    );

    let deleted = delete(&patched.root, &leaf_id);
    assert!(deleted.is_applied());
    assert!(find_by_id(&deleted.root, &leaf_id).is_none());
}
