//! Content node domain model.
//!
//! # Responsibility
//! - Define the canonical node record shared by every tree component.
//! - Keep kind-specific payloads typed instead of duck-typed.
//!
//! # Invariants
//! - `id` is stable for the node lifetime and never reassigned by core.
//! - `children` holds shared references; a subtree is referenced by exactly
//!   one parent at a time.
//! - `price` is meaningful only for `NodeKind::MenuItem`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Opaque node identifier, unique across one document.
pub type NodeId = String;

/// Generates a fresh node identifier.
pub fn new_node_id() -> NodeId {
    Uuid::new_v4().to_string()
}

/// Node kind tag.
///
/// The set is open: unknown tags survive a serde round trip as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Root,
    Category,
    List,
    Menu,
    Item,
    Field,
    MenuItem,
    QaPair,
    Note,
    Policy,
    Custom(String),
}

impl NodeKind {
    /// Stable wire tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Root => "root",
            Self::Category => "category",
            Self::List => "list",
            Self::Menu => "menu",
            Self::Item => "item",
            Self::Field => "field",
            Self::MenuItem => "menu-item",
            Self::QaPair => "qa-pair",
            Self::Note => "note",
            Self::Policy => "policy",
            Self::Custom(tag) => tag.as_str(),
        }
    }

    /// Parses a wire tag, falling back to `Custom` for unknown values.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "root" => Self::Root,
            "category" => Self::Category,
            "list" => Self::List,
            "menu" => Self::Menu,
            "item" => Self::Item,
            "field" => Self::Field,
            "menu-item" | "menu_item" => Self::MenuItem,
            "qa-pair" | "qa_pair" => Self::QaPair,
            "note" => Self::Note,
            "policy" => Self::Policy,
            _ => Self::Custom(value.trim().to_string()),
        }
    }

    /// Root, category, list and menu kinds group other nodes.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Root | Self::Category | Self::List | Self::Menu)
    }

    /// Every non-container kind carries content subject to emptiness checks.
    pub fn is_fillable(&self) -> bool {
        !self.is_container()
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        Self::parse(value.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        value.as_str().to_string()
    }
}

/// Declared value type of one attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    #[default]
    Text,
    Number,
    Boolean,
    Date,
    Url,
}

/// Flexible key/value metadata entry. Keys are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default = "new_node_id")]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: AttributeType,
}

impl Attribute {
    /// Creates a text attribute with a generated id.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: new_node_id(),
            key: key.into(),
            value: value.into(),
            kind: AttributeType::Text,
        }
    }
}

/// Recurrence cadence for availability rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Seasonal,
}

impl Recurrence {
    fn code(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Seasonal => "SEASONAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Two-letter code used in encoded rules.
    pub fn code(self) -> &'static str {
        match self {
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
            Self::Sunday => "SU",
        }
    }
}

/// Availability / recurrence rule attached to a node.
///
/// Times are `HH:MM` strings and season bounds are `MM-DD` strings; core
/// treats both as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub recurrence: Recurrence,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_end: Option<String>,
}

impl Availability {
    pub fn new(recurrence: Recurrence) -> Self {
        Self {
            recurrence,
            days: Vec::new(),
            start_time: None,
            end_time: None,
            season_start: None,
            season_end: None,
        }
    }

    /// Encodes the rule as a compact, deterministic string.
    ///
    /// Example: `WEEKLY;DAYS=MO,WE;TIME=18:00-22:00`.
    pub fn encode(&self) -> String {
        let mut parts = vec![self.recurrence.code().to_string()];
        if !self.days.is_empty() {
            let mut days = self.days.clone();
            days.sort();
            days.dedup();
            let codes = days.iter().map(|day| day.code()).collect::<Vec<_>>();
            parts.push(format!("DAYS={}", codes.join(",")));
        }
        if self.start_time.is_some() || self.end_time.is_some() {
            parts.push(format!(
                "TIME={}-{}",
                self.start_time.as_deref().unwrap_or(""),
                self.end_time.as_deref().unwrap_or("")
            ));
        }
        if self.season_start.is_some() || self.season_end.is_some() {
            parts.push(format!(
                "SEASON={}..{}",
                self.season_start.as_deref().unwrap_or(""),
                self.season_end.as_deref().unwrap_or("")
            ));
        }
        parts.join(";")
    }
}

/// Structured event record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

/// Structured dining venue record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dress_code: Option<String>,
    #[serde(default)]
    pub reservation_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seating_capacity: Option<u32>,
}

/// Structured room record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_configuration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_meters: Option<f64>,
}

/// Schema-tagged structured payload. Opaque to core except for presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum SchemaData {
    Event(EventRecord),
    Dining(DiningRecord),
    Room(RoomRecord),
}

impl SchemaData {
    /// Schema tag as written on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Event(_) => "event",
            Self::Dining(_) => "dining",
            Self::Room(_) => "room",
        }
    }
}

/// Presentation-only state. Never interpreted by core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(default)]
    pub collapsed: bool,
}

/// One node of the content document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Assigned at creation; a missing id on input is generated.
    #[serde(default = "new_node_id")]
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_data: Option<SchemaData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiState>,
    /// `None` for leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<Node>>>,
}

impl Node {
    /// Creates a node with a generated id.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self::with_id(new_node_id(), kind, name)
    }

    /// Creates a node with a caller-provided id.
    pub fn with_id(id: impl Into<NodeId>, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            value: None,
            answer: None,
            description: None,
            price: None,
            attributes: Vec::new(),
            tags: Vec::new(),
            availability: None,
            schema_data: None,
            ui: None,
            children: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = Some(availability);
        self
    }

    pub fn with_schema(mut self, schema: SchemaData) -> Self {
        self.schema_data = Some(schema);
        self
    }

    /// Replaces children with the given nodes.
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        self.children = Some(children.into_iter().map(Arc::new).collect());
        self
    }

    /// Children in order; empty for leaves.
    pub fn children(&self) -> &[Arc<Node>] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Primary content used by exporters: value, then answer, then price.
    pub fn primary_content(&self) -> Option<String> {
        non_blank(&self.value)
            .or_else(|| non_blank(&self.answer))
            .map(str::to_string)
            .or_else(|| self.price.map(|price| price.to_string()))
    }

    /// Kind-specific emptiness check for fillable nodes.
    ///
    /// Containers are never considered empty.
    pub fn is_empty_content(&self) -> bool {
        match self.kind {
            _ if self.kind.is_container() => false,
            NodeKind::QaPair => is_blank(&self.answer),
            NodeKind::MenuItem => self.price.is_none(),
            _ => is_blank(&self.value),
        }
    }
}

impl Drop for Node {
    // Dismantles uniquely-owned descendants iteratively so dropping a very
    // deep document does not recurse once per level.
    fn drop(&mut self) {
        let Some(children) = self.children.take() else {
            return;
        };
        let mut pending = children;
        while let Some(child) = pending.pop() {
            if let Ok(mut owned) = Arc::try_unwrap(child) {
                if let Some(grandchildren) = owned.children.take() {
                    pending.extend(grandchildren);
                }
            }
        }
    }
}

/// Returns `true` when the field is absent or whitespace-only.
pub fn is_blank(field: &Option<String>) -> bool {
    non_blank(field).is_none()
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}
