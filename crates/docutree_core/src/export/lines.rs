//! Line-oriented export for chunked embedding.
//!
//! Each node renders as one self-contained line:
//! `[breadcrumb] KIND: name | Value: .. | Answer: .. | Price: .. | Rules: .. | Tags: .. | Note: ..`
//! Segments with no source content are omitted, and embedded line breaks
//! are flattened to spaces.

use super::{flatten, log_export, run_batched, ExportContext, ExportError, ExportFormat, FlatEntry};
use crate::model::node::Node;
use std::sync::Arc;

/// Serializes the tree as newline-separated node lines.
pub fn export_lines(
    root: &Arc<Node>,
    ctx: &mut ExportContext<'_>,
) -> Result<String, ExportError> {
    let entries = flatten(root);
    let result =
        run_batched(&entries, ctx, |entry| Ok(render_line(entry))).map(|lines| lines.join("\n"));
    log_export(ExportFormat::Lines, entries.len(), &result);
    result
}

fn render_line(entry: &FlatEntry<'_>) -> String {
    let node = entry.node;
    let mut line = format!(
        "[{}] {}: {}",
        single_line(&entry.path()),
        kind_label(node),
        single_line(&node.name)
    );

    let segments = [
        ("Value", node.value.clone()),
        ("Answer", node.answer.clone()),
        ("Price", node.price.map(|price| price.to_string())),
        ("Rules", node.availability.as_ref().map(|rule| rule.encode())),
        ("Tags", (!node.tags.is_empty()).then(|| node.tags.join(", "))),
        ("Note", node.description.clone()),
    ];
    for (label, text) in segments {
        let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
            continue;
        };
        line.push_str(" | ");
        line.push_str(label);
        line.push_str(": ");
        line.push_str(&single_line(&text));
    }
    line
}

fn kind_label(node: &Node) -> String {
    node.kind.as_str().to_uppercase().replace('-', "_")
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{Availability, NodeKind, Recurrence};

    #[test]
    fn renders_present_segments_only() {
        let mut hours = Availability::new(Recurrence::Daily);
        hours.start_time = Some("07:00".to_string());
        hours.end_time = Some("10:30".to_string());
        let root = Arc::new(Node::new(NodeKind::Root, "Hotel").with_children([
            Node::new(NodeKind::Menu, "Breakfast").with_children([
                Node::new(NodeKind::MenuItem, "Pancakes")
                    .with_price(9.5)
                    .with_availability(hours)
                    .with_tags(["vegetarian", "sweet"])
                    .with_description("Served with\nmaple syrup"),
            ]),
            Node::new(NodeKind::QaPair, "Late checkout?").with_answer("Until 1pm"),
        ]));

        let out = export_lines(&root, &mut ExportContext::new()).unwrap();
        let lines = out.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "[Hotel] ROOT: Hotel");
        assert_eq!(lines[1], "[Hotel > Breakfast] MENU: Breakfast");
        assert_eq!(
            lines[2],
            "[Hotel > Breakfast > Pancakes] MENU_ITEM: Pancakes | Price: 9.5 | \
             Rules: DAILY;TIME=07:00-10:30 | Tags: vegetarian, sweet | \
             Note: Served with maple syrup"
        );
        assert_eq!(
            lines[3],
            "[Hotel > Late checkout?] QA_PAIR: Late checkout? | Answer: Until 1pm"
        );
    }
}
