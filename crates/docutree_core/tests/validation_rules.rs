use docutree_core::{
    insert_child, run_validation, validate, CoreConfig, DocumentService, Node, NodeKind,
    Severity,
};
use std::sync::Arc;

#[test]
fn blank_item_under_new_category_yields_one_warning() {
    let root = Arc::new(Node::with_id("root", NodeKind::Root, "Seaside Resort"));
    let root = insert_child(&root, "root", Node::with_id("dining", NodeKind::Category, "Dining"))
        .into_root();
    let root = insert_child(
        &root,
        "dining",
        Node::with_id("steak", NodeKind::Item, "Steakhouse"),
    )
    .into_root();

    let issues = run_validation(&root);

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].node_id, "steak");
    assert_eq!(issues[0].severity, Severity::Warning);
    assert!(issues[0].suggested_fix.is_some());
    assert!(issues.iter().all(|issue| issue.node_id != "dining"));
}

#[test]
fn case_insensitive_sibling_collisions_are_all_critical() {
    let root = Arc::new(
        Node::with_id("root", NodeKind::Root, "Resort").with_children([
            Node::with_id("rec", NodeKind::Category, "Recreation").with_children([
                Node::with_id("p1", NodeKind::Item, "Pool").with_value("Outdoor"),
                Node::with_id("p2", NodeKind::Item, "pool").with_value("Indoor"),
                Node::with_id("p3", NodeKind::Item, "POOL").with_value("Kids"),
            ]),
        ]),
    );

    let issues = run_validation(&root);
    let duplicates = issues
        .iter()
        .filter(|issue| issue.rule == "duplicate-name")
        .collect::<Vec<_>>();

    assert_eq!(duplicates.len(), 3);
    assert!(duplicates
        .iter()
        .all(|issue| issue.severity == Severity::Critical));
    let ids = duplicates
        .iter()
        .map(|issue| issue.node_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}

#[test]
fn battery_order_and_depth_threshold() {
    let mut deep = Node::with_id("d6", NodeKind::Item, "Sixth").with_value("x");
    for level in (2..=5).rev() {
        deep = Node::with_id(format!("d{level}"), NodeKind::Category, format!("Level {level}"))
            .with_children([deep]);
    }
    let root = Arc::new(Node::with_id("d1", NodeKind::Root, "Top").with_children([
        deep,
        Node::with_id("q", NodeKind::QaPair, "Parking?"),
        Node::with_id("m", NodeKind::MenuItem, "Untitled"),
        Node::with_id("f", NodeKind::Field, "Hours")
            .with_value("see below")
            .with_children([Node::with_id("fc", NodeKind::Note, "Mon").with_value("9-5")]),
    ]));

    let report = validate(&root, &CoreConfig::default());
    let summary = report
        .issues
        .iter()
        .map(|issue| (issue.rule.as_str(), issue.node_id.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            ("node-name", "m"),
            ("missing-price", "m"),
            ("blank-answer", "q"),
            ("max-depth", "d6"),
            ("field-with-children", "f"),
        ]
    );
    assert_eq!(report.critical, 1);
    assert_eq!(report.warning, 3);
    assert_eq!(report.optimization, 1);

    let relaxed = CoreConfig {
        max_depth: 6,
        ..CoreConfig::default()
    };
    assert_eq!(validate(&root, &relaxed).optimization, 0);
}

#[test]
fn validation_never_mutates_and_fixes_resolve_issues() {
    let root = Arc::new(
        Node::with_id("root", NodeKind::Root, "Resort").with_children([
            Node::with_id("spa", NodeKind::Item, "Spa"),
            Node::with_id("hours", NodeKind::Field, "Hours")
                .with_value("daily")
                .with_children([
                    Node::with_id("sun", NodeKind::Item, "Sunday").with_value("closed")
                ]),
        ]),
    );
    let snapshot = Arc::clone(&root);
    let mut service = DocumentService::new(root).unwrap();

    let report = service.validate();
    assert_eq!(report.issues.len(), 2);
    assert!(Arc::ptr_eq(service.root(), &snapshot));

    for issue in &report.issues {
        let fix = issue.suggested_fix.as_ref().unwrap();
        service.apply_fix(fix).unwrap();
    }

    assert!(service.validate().is_clean());
    let spa = docutree_core::find_by_id(service.root(), "spa").unwrap();
    assert_eq!(spa.value.as_deref(), Some("TBD"));
    let hours = docutree_core::find_by_id(service.root(), "hours").unwrap();
    assert_eq!(hours.kind, NodeKind::Category);
}
