//! Schema Registry: the callable tools, their parameter schemas and the
//! authoritative field/filter sets used to validate model arguments.

use std::collections::HashSet;

use explorer_core::types::{FunctionDeclaration, Tool};
use serde_json::{json, Value};

use crate::catalog;
use crate::record::EntityKind;

/// Page size used when the model does not ask for one; also the ceiling.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Declaration of one callable tool
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: &'static str,
    pub kind: EntityKind,
    pub description: &'static str,
    pub parameters: Value,
    pub valid_fields: HashSet<&'static str>,
    pub valid_filters: HashSet<&'static str>,
}

impl ToolSchema {
    fn build(kind: EntityKind) -> Self {
        let valid_fields: HashSet<&'static str> =
            catalog::valid_fields(kind).iter().copied().collect();
        let valid_filters: HashSet<&'static str> =
            catalog::valid_filters(kind).iter().copied().collect();

        Self {
            name: kind.tool_name(),
            kind,
            description: catalog::tool_description(kind),
            parameters: parameter_schema(kind),
            valid_fields,
            valid_filters,
        }
    }

    pub fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            parameters: self.parameters.clone(),
        }
    }
}

/// Parameter schema in the Gemini OpenAPI subset
fn parameter_schema(kind: EntityKind) -> Value {
    let filters = format!(
        "A JSON string representing the filter array, e.g. '[\"search\", \"=\", \"Steins;Gate\"]' or \
         '[\"and\", [\"id\", \"=\", \"v17\"], [\"lang\", \"=\", \"en\"]]'. You MUST ONLY use filters from \
         the following list: {}.{}",
        catalog::valid_filters(kind).join(", "),
        catalog::filter_guidance(kind)
    );
    let fields = format!(
        "A comma-separated string of fields to retrieve.{} You MUST ONLY use fields from the \
         following list: {}.",
        catalog::field_guidance(kind),
        catalog::valid_fields(kind).join(", ")
    );

    let mut properties = json!({
        "filters": {"type": "STRING", "description": filters},
        "sort": {
            "type": "STRING",
            "description": format!("Field to sort on. Valid values: {}.", catalog::sort_keys(kind)),
            "nullable": true
        },
        "reverse": {
            "type": "BOOLEAN",
            "description": "Set to true to sort in descending order.",
            "nullable": true
        },
        "results": {
            "type": "INTEGER",
            "description": format!("Number of results per page, max {0}. Default is {0}.", MAX_PAGE_SIZE),
            "nullable": true
        },
        "count": {
            "type": "BOOLEAN",
            "description": "Set to true to get the total number of entries matching the filters. \
                            When counting, set results to 0 to avoid fetching the entries themselves.",
            "nullable": true
        },
        "fields": {"type": "STRING", "description": fields},
    });

    if kind == EntityKind::VisualNovel {
        properties["random"] = json!({
            "type": "BOOLEAN",
            "description": "Set to true to fetch a single random visual novel matching the other filters. \
                            'sort', 'reverse' and 'results' are ignored: exactly one random entry is returned.",
            "nullable": true
        });
    }

    let required: Vec<&str> = if catalog::filters_required(kind) {
        vec!["filters", "fields"]
    } else {
        vec!["fields"]
    };

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

/// Static, read-only table of every tool. Built once at startup and shared.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<ToolSchema>,
    empty: HashSet<&'static str>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            schemas: EntityKind::ALL.into_iter().map(ToolSchema::build).collect(),
            empty: HashSet::new(),
        }
    }

    pub fn get(&self, tool_name: &str) -> Option<&ToolSchema> {
        self.schemas.iter().find(|schema| schema.name == tool_name)
    }

    /// Valid output fields; empty for unknown tools, meaning nothing is permitted
    pub fn get_valid_fields(&self, tool_name: &str) -> &HashSet<&'static str> {
        self.get(tool_name)
            .map(|schema| &schema.valid_fields)
            .unwrap_or(&self.empty)
    }

    /// Valid filter names; empty for unknown tools
    pub fn get_valid_filters(&self, tool_name: &str) -> &HashSet<&'static str> {
        self.get(tool_name)
            .map(|schema| &schema.valid_filters)
            .unwrap_or(&self.empty)
    }

    pub fn list_tool_schemas(&self) -> &[ToolSchema] {
        &self.schemas
    }

    /// All tools wrapped the way `generateContent` expects them
    pub fn tool_declarations(&self) -> Vec<Tool> {
        vec![Tool {
            function_declarations: self.schemas.iter().map(ToolSchema::declaration).collect(),
        }]
    }
}
