use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Record categories the data source exposes. Each maps to exactly one tool
/// and one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[serde(rename = "vn")]
    VisualNovel,
    Character,
    Release,
    Producer,
    Staff,
    Tag,
    Trait,
    Quote,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::VisualNovel,
        EntityKind::Character,
        EntityKind::Release,
        EntityKind::Producer,
        EntityKind::Staff,
        EntityKind::Tag,
        EntityKind::Trait,
        EntityKind::Quote,
    ];

    /// Name of the tool the model calls for this kind
    pub fn tool_name(self) -> &'static str {
        match self {
            EntityKind::VisualNovel => "queryVn",
            EntityKind::Character => "queryCharacter",
            EntityKind::Release => "queryRelease",
            EntityKind::Producer => "queryProducer",
            EntityKind::Staff => "queryStaff",
            EntityKind::Tag => "queryTag",
            EntityKind::Trait => "queryTrait",
            EntityKind::Quote => "queryQuote",
        }
    }

    /// Resolves a model-supplied tool name. Unknown names yield `None`.
    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tool_name() == name)
    }

    /// Path segment under the Kana base URL
    pub fn endpoint(self) -> &'static str {
        match self {
            EntityKind::VisualNovel => "vn",
            EntityKind::Character => "character",
            EntityKind::Release => "release",
            EntityKind::Producer => "producer",
            EntityKind::Staff => "staff",
            EntityKind::Tag => "tag",
            EntityKind::Trait => "trait",
            EntityKind::Quote => "quote",
        }
    }

    /// Fields always requested so a card can be rendered for the record
    pub fn display_fields(self) -> &'static [&'static str] {
        match self {
            EntityKind::VisualNovel => &["id", "title", "image.url"],
            EntityKind::Character => &["id", "name", "image.url"],
            EntityKind::Release => &["id", "title"],
            EntityKind::Producer | EntityKind::Staff | EntityKind::Tag => &["id", "name"],
            EntityKind::Trait => &["id", "name", "description"],
            EntityKind::Quote => &["id", "quote"],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::VisualNovel => "visual novel",
            EntityKind::Character => "character",
            EntityKind::Release => "release",
            EntityKind::Producer => "producer",
            EntityKind::Staff => "staff",
            EntityKind::Tag => "tag",
            EntityKind::Trait => "trait",
            EntityKind::Quote => "quote",
        };
        f.write_str(label)
    }
}

/// One entry returned by VNDB, tagged with its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Record {
    /// Tags a raw result object with its kind.
    ///
    /// Producers carry their own `type` attribute (company, individual,
    /// amateur group); it is moved to `producerType` so the kind tag wins.
    pub fn tag(kind: EntityKind, raw: Value) -> Self {
        let mut attributes = match raw {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        if let Some(producer_type) = attributes.remove("type") {
            if kind == EntityKind::Producer {
                attributes.insert("producerType".to_string(), producer_type);
            }
        }

        Self { kind, attributes }
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").and_then(Value::as_str)
    }

    /// Title, name or quote text, whichever this kind is labelled by
    pub fn label(&self) -> Option<&str> {
        ["title", "name", "quote"]
            .iter()
            .find_map(|key| self.attributes.get(*key).and_then(Value::as_str))
    }

    pub fn image_url(&self) -> Option<&str> {
        self.attributes
            .get("image")
            .and_then(|image| image.get("url"))
            .and_then(Value::as_str)
    }
}

/// Entry in a tool result: a record, or a synthetic error the model can read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultItem {
    Error { error: String },
    Record(Record),
}

/// Output of one data-access call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolResult {
    #[serde(rename = "results")]
    pub records: Vec<ResultItem>,
    #[serde(rename = "count", skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl ToolResult {
    pub fn from_records(records: Vec<Record>, total_count: Option<u64>) -> Self {
        Self {
            records: records.into_iter().map(ResultItem::Record).collect(),
            total_count,
        }
    }

    /// A result holding one synthetic error record
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            records: vec![ResultItem::Error {
                error: message.into(),
            }],
            total_count: None,
        }
    }

    pub fn valid_records(&self) -> Vec<Record> {
        self.records
            .iter()
            .filter_map(|item| match item {
                ResultItem::Record(record) => Some(record.clone()),
                ResultItem::Error { .. } => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|item| match item {
                ResultItem::Error { error } => Some(error.as_str()),
                ResultItem::Record(_) => None,
            })
            .collect()
    }
}
