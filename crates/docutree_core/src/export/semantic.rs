//! Compact nested JSON export for language-model consumers.
//!
//! # Invariants
//! - Ids, attribute ids and UI state never appear in the output.
//! - Every node carries a `_path` breadcrumb string.
//! - Null, empty-string and empty-collection fields are dropped, at any
//!   nesting level.
//! - Children nest under `contains`.

use super::{
    flatten, log_export, run_batched, ExportContext, ExportError, ExportFormat, FlatEntry,
};
use crate::model::node::Node;
use serde_json::ser::{CompactFormatter, Formatter};
use serde_json::{Map, Number, Value};
use std::sync::Arc;

const CHILDREN_KEY: &str = "contains";

/// Serializes the tree as compact nested JSON.
///
/// Objects are streamed through a JSON formatter as entries arrive, so
/// output nesting never becomes call-stack depth.
pub fn export_semantic(
    root: &Arc<Node>,
    ctx: &mut ExportContext<'_>,
) -> Result<String, ExportError> {
    let entries = flatten(root);
    let mut writer = NestedWriter::default();
    let result = run_batched(&entries, ctx, |entry| {
        writer.push(entry.depth, entry.node.has_children(), &semantic_object(entry)?)
    })
    .and_then(|_| writer.finish());
    log_export(ExportFormat::Semantic, entries.len(), &result);
    result
}

/// Writes pre-order `(depth, object)` pairs as nested JSON, keeping only the
/// chain of open `contains` arrays on the heap.
#[derive(Default)]
struct NestedWriter {
    out: Vec<u8>,
    formatter: CompactFormatter,
    /// Depths of objects whose `contains` array is open, with a flag telling
    /// whether a child has been written into it yet.
    open: Vec<(usize, bool)>,
}

impl NestedWriter {
    fn push(
        &mut self,
        depth: usize,
        has_children: bool,
        object: &Map<String, Value>,
    ) -> Result<(), ExportError> {
        self.close_to(depth)?;
        if let Some((_, written)) = self.open.last_mut() {
            let first = !*written;
            *written = true;
            self.formatter.begin_array_value(&mut self.out, first).map_err(io_error)?;
        }

        self.formatter.begin_object(&mut self.out).map_err(io_error)?;
        for (index, (key, value)) in object.iter().enumerate() {
            self.write_key(key, index == 0)?;
            serde_json::to_writer(&mut self.out, value)?;
            self.formatter.end_object_value(&mut self.out).map_err(io_error)?;
        }

        if has_children {
            self.write_key(CHILDREN_KEY, object.is_empty())?;
            self.formatter.begin_array(&mut self.out).map_err(io_error)?;
            self.open.push((depth, false));
        } else {
            self.end_object()?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<String, ExportError> {
        self.close_to(0)?;
        String::from_utf8(self.out).map_err(|err| {
            io_error(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })
    }

    /// Closes every open object at `depth` or deeper.
    fn close_to(&mut self, depth: usize) -> Result<(), ExportError> {
        while self.open.last().is_some_and(|(open_depth, _)| *open_depth >= depth) {
            self.open.pop();
            self.formatter.end_array(&mut self.out).map_err(io_error)?;
            self.formatter.end_object_value(&mut self.out).map_err(io_error)?;
            self.end_object()?;
        }
        Ok(())
    }

    fn write_key(&mut self, key: &str, first: bool) -> Result<(), ExportError> {
        self.formatter.begin_object_key(&mut self.out, first).map_err(io_error)?;
        serde_json::to_writer(&mut self.out, key)?;
        self.formatter.end_object_key(&mut self.out).map_err(io_error)?;
        self.formatter.begin_object_value(&mut self.out).map_err(io_error)
    }

    fn end_object(&mut self) -> Result<(), ExportError> {
        self.formatter.end_object(&mut self.out).map_err(io_error)?;
        if !self.open.is_empty() {
            self.formatter.end_array_value(&mut self.out).map_err(io_error)?;
        }
        Ok(())
    }
}

fn io_error(err: std::io::Error) -> ExportError {
    ExportError::Serialize(serde_json::Error::io(err))
}

fn semantic_object(entry: &FlatEntry<'_>) -> Result<Map<String, Value>, ExportError> {
    let node = entry.node;
    let mut object = Map::new();
    object.insert("_path".to_string(), Value::String(entry.path().to_string()));
    object.insert("kind".to_string(), Value::String(node.kind.as_str().to_string()));
    object.insert("name".to_string(), Value::String(node.name.clone()));
    insert_text(&mut object, "value", node.value.as_deref());
    insert_text(&mut object, "answer", node.answer.as_deref());
    insert_text(&mut object, "description", node.description.as_deref());
    if let Some(price) = node.price.and_then(Number::from_f64) {
        object.insert("price".to_string(), Value::Number(price));
    }

    let attributes = node
        .attributes
        .iter()
        .map(|attribute| {
            let mut pair = Map::new();
            pair.insert("key".to_string(), Value::String(attribute.key.clone()));
            pair.insert("value".to_string(), Value::String(attribute.value.clone()));
            Value::Object(pair)
        })
        .collect::<Vec<_>>();
    object.insert("attributes".to_string(), Value::Array(attributes));
    object.insert(
        "tags".to_string(),
        Value::Array(node.tags.iter().cloned().map(Value::String).collect()),
    );
    if let Some(rule) = &node.availability {
        object.insert("availability".to_string(), Value::String(rule.encode()));
    }
    if let Some(schema) = &node.schema_data {
        object.insert("schemaData".to_string(), serde_json::to_value(schema)?);
    }

    Ok(object
        .into_iter()
        .filter_map(|(key, value)| prune(value).map(|value| (key, value)))
        .collect())
}

fn insert_text(object: &mut Map<String, Value>, key: &str, text: Option<&str>) {
    if let Some(text) = text {
        object.insert(key.to_string(), Value::String(text.to_string()));
    }
}

/// Drops null, empty-string and empty-collection values recursively.
fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::Array(items) => {
            let items = items.into_iter().filter_map(prune).collect::<Vec<_>>();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(fields) => {
            let fields = fields
                .into_iter()
                .filter_map(|(key, value)| prune(value).map(|value| (key, value)))
                .collect::<Map<_, _>>();
            (!fields.is_empty()).then_some(Value::Object(fields))
        }
        other => Some(other),
    }
}
