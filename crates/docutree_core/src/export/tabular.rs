//! Spreadsheet-friendly CSV export.
//!
//! # Invariants
//! - Output starts with a UTF-8 byte-order mark and a fixed header row.
//! - Fields are quoted only when they contain a comma, quote, CR or LF.
//! - Rows end with CRLF.

use super::{
    flatten, log_export, run_batched, ExportContext, ExportError, ExportFormat, FlatEntry,
};
use crate::model::node::{Attribute, Node};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::sync::Arc;

const BYTE_ORDER_MARK: &str = "\u{FEFF}";

/// Column order of the tabular export.
pub const COLUMNS: [&str; 10] = [
    "ID",
    "Path",
    "Parent Path",
    "Type",
    "Name",
    "Content",
    "Availability",
    "Attributes",
    "Tags",
    "Description",
];

/// Serializes the tree as CSV, one row per node.
pub fn export_tabular(
    root: &Arc<Node>,
    ctx: &mut ExportContext<'_>,
) -> Result<String, ExportError> {
    let entries = flatten(root);
    let result = write_rows(&entries, ctx);
    log_export(ExportFormat::Tabular, entries.len(), &result);
    result
}

fn write_rows(
    entries: &[FlatEntry<'_>],
    ctx: &mut ExportContext<'_>,
) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(BYTE_ORDER_MARK.as_bytes().to_vec());
    writer.write_record(COLUMNS)?;
    run_batched(entries, ctx, |entry| Ok(writer.write_record(&row_fields(entry))?))?;

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| {
        ExportError::Csv(csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            err,
        )))
    })
}

fn row_fields(entry: &FlatEntry<'_>) -> [String; 10] {
    let node = entry.node;
    [
        node.id.clone(),
        entry.path().to_string(),
        entry.parent_path().to_string(),
        node.kind.as_str().to_string(),
        node.name.clone(),
        node.primary_content().unwrap_or_default(),
        node.availability
            .as_ref()
            .map(|rule| rule.encode())
            .unwrap_or_default(),
        attribute_summary(&node.attributes),
        node.tags.join(", "),
        node.description.clone().unwrap_or_default(),
    ]
}

fn attribute_summary(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(|attribute| format!("{}: {}", attribute.key, attribute.value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::NodeKind;

    #[test]
    fn quotes_only_fields_that_need_it() {
        let root = Arc::new(
            Node::with_id("r", NodeKind::Root, "Hotel").with_children([
                Node::with_id("a", NodeKind::Item, "Bar").with_value("say \"hi\""),
                Node::with_id("b", NodeKind::Item, "Two").with_value("two\nlines"),
            ]),
        );
        let out = export_tabular(&root, &mut ExportContext::new()).unwrap();

        assert!(out.contains("\r\na,Hotel > Bar,Hotel,item,Bar,\"say \"\"hi\"\"\",,,,\r\n"));
        assert!(out.contains(",\"two\nlines\","));
    }

    #[test]
    fn output_has_bom_header_and_one_row_per_node() {
        let root = Arc::new(
            Node::with_id("r", NodeKind::Root, "Hotel")
                .with_children([Node::with_id("s", NodeKind::Item, "Spa").with_value("9-5")]),
        );
        let out = export_tabular(&root, &mut ExportContext::new()).unwrap();

        assert!(out.starts_with('\u{FEFF}'));
        let lines = out.trim_start_matches('\u{FEFF}').split("\r\n").collect::<Vec<_>>();
        assert_eq!(
            lines[0],
            "ID,Path,Parent Path,Type,Name,Content,Availability,Attributes,Tags,Description"
        );
        assert_eq!(lines[2], "s,Hotel > Spa,Hotel,item,Spa,9-5,,,,");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "");
    }
}
