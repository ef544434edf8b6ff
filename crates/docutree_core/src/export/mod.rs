//! Deterministic document exporters.
//!
//! # Responsibility
//! - Flatten the tree once into `(node, breadcrumb path, depth)` entries.
//! - Drive the tabular, semantic and line serializers over those entries
//!   in fixed-size batches with progress reporting and cancellation.
//!
//! # Invariants
//! - All serializers see entries in the same pre-order.
//! - Missing fields serialize as empty/omitted; exporters never fail on
//!   partial nodes.
//! - Cancellation is checked before every batch; a cancelled export
//!   returns no partial payload.

pub mod lines;
pub mod semantic;
pub mod tabular;

pub use lines::export_lines;
pub use semantic::export_semantic;
pub use tabular::export_tabular;

use crate::config::CoreConfig;
use crate::model::node::Node;
use crate::tree::path::walk;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const BREADCRUMB_SEPARATOR: &str = " > ";

/// Export failure.
#[derive(Debug)]
pub enum ExportError {
    /// The caller cancelled between batches.
    Cancelled { processed: usize, total: usize },
    /// JSON encoding failed.
    Serialize(serde_json::Error),
    /// CSV encoding failed.
    Csv(csv::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled { processed, total } => {
                write!(f, "export cancelled after {processed} of {total} nodes")
            }
            Self::Serialize(err) => write!(f, "export serialization failed: {err}"),
            Self::Csv(err) => write!(f, "csv export failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cancelled { .. } => None,
            Self::Serialize(err) => Some(err),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Batching, progress and cancellation settings for one export call.
pub struct ExportContext<'a> {
    batch_size: usize,
    token: CancellationToken,
    on_progress: Option<Box<dyn FnMut(u8) + 'a>>,
    last_reported: Option<u8>,
}

impl<'a> ExportContext<'a> {
    pub fn new() -> Self {
        Self::from_config(&CoreConfig::default())
    }

    /// Uses `export_batch_size` from `config`.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            batch_size: config.export_batch_size.max(1),
            token: CancellationToken::new(),
            on_progress: None,
            last_reported: None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Registers a callback receiving cumulative percentages (0..=100).
    pub fn on_progress(mut self, callback: impl FnMut(u8) + 'a) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    fn report(&mut self, percent: u8) {
        if self.last_reported.is_some_and(|last| last >= percent) {
            return;
        }
        self.last_reported = Some(percent);
        if let Some(callback) = self.on_progress.as_mut() {
            callback(percent);
        }
    }
}

impl Default for ExportContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Export format label used in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Tabular,
    Semantic,
    Lines,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tabular => "tabular",
            Self::Semantic => "semantic",
            Self::Lines => "lines",
        }
    }
}

/// One flattened node with its breadcrumb path (ancestor names, own name
/// last, joined with ` > `).
#[derive(Debug, Clone)]
pub struct FlatEntry<'a> {
    pub node: &'a Node,
    /// Root is depth 1.
    pub depth: usize,
    path: String,
}

impl FlatEntry<'_> {
    /// Full breadcrumb joined with ` > `.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Breadcrumb without the node's own name; empty for the root.
    pub fn parent_path(&self) -> &str {
        if self.depth <= 1 {
            return "";
        }
        let own = self.node.name.len() + BREADCRUMB_SEPARATOR.len();
        &self.path[..self.path.len().saturating_sub(own)]
    }
}

/// Flattens the tree in pre-order.
pub fn flatten(root: &Arc<Node>) -> Vec<FlatEntry<'_>> {
    let mut path = String::new();
    let mut ends: Vec<usize> = Vec::new();
    walk(root)
        .map(|(node, depth)| {
            ends.truncate(depth.saturating_sub(1));
            path.truncate(ends.last().copied().unwrap_or(0));
            if depth > 1 {
                path.push_str(BREADCRUMB_SEPARATOR);
            }
            path.push_str(&node.name);
            ends.push(path.len());
            FlatEntry {
                node: node.as_ref(),
                depth,
                path: path.clone(),
            }
        })
        .collect()
}

/// Maps entries batch by batch, reporting progress after each batch.
pub(crate) fn run_batched<E, T, F>(
    entries: &[E],
    ctx: &mut ExportContext<'_>,
    mut emit: F,
) -> Result<Vec<T>, ExportError>
where
    F: FnMut(&E) -> Result<T, ExportError>,
{
    let total = entries.len();
    let mut out = Vec::with_capacity(total);
    if total == 0 {
        ctx.report(100);
        return Ok(out);
    }

    for batch in entries.chunks(ctx.batch_size) {
        if ctx.token.is_cancelled() {
            return Err(ExportError::Cancelled {
                processed: out.len(),
                total,
            });
        }
        for entry in batch {
            out.push(emit(entry)?);
        }
        ctx.report(percent(out.len(), total));
        std::thread::yield_now();
    }
    Ok(out)
}

fn percent(processed: usize, total: usize) -> u8 {
    ((processed * 100) / total.max(1)).min(100) as u8
}

/// Emits the `export_run` event for a finished export.
pub(crate) fn log_export<T>(format: ExportFormat, nodes: usize, result: &Result<T, ExportError>) {
    match result {
        Ok(_) => info!(
            "event=export_run module=export status=ok format={} nodes={}",
            format.as_str(),
            nodes
        ),
        Err(ExportError::Cancelled { processed, total }) => warn!(
            "event=export_run module=export status=cancelled format={} processed={} total={}",
            format.as_str(),
            processed,
            total
        ),
        Err(err) => warn!(
            "event=export_run module=export status=error format={} error={}",
            format.as_str(),
            err
        ),
    }
}
