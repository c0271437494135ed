use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::errors::{VndbError, VndbResult};
use crate::schema::MAX_PAGE_SIZE;

/// Arguments the model passes to a query tool
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryArgs {
    #[serde(default)]
    pub filters: Option<String>,
    #[serde(default)]
    pub fields: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub reverse: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_page_size")]
    pub results: Option<u32>,
    #[serde(default)]
    pub count: Option<bool>,
    #[serde(default)]
    pub random: Option<bool>,
}

/// The model sometimes emits integers as floats (`10.0`)
fn deserialize_page_size<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.map(|n| n.max(0.0).round() as u32))
}

impl QueryArgs {
    /// Parses the raw `args` object of a function call
    pub fn from_value(args: &Value) -> VndbResult<Self> {
        if args.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(args.clone()).map_err(|e| VndbError::InvalidArguments(e.to_string()))
    }

    /// Requested page size, clamped to the ceiling
    pub fn page_size(&self) -> u32 {
        self.results.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }

    /// The filter expression as JSON; absent or blank means "match everything"
    pub fn parsed_filters(&self) -> VndbResult<Value> {
        match self.filters.as_deref().map(str::trim) {
            None | Some("") => Ok(json!([])),
            Some(raw) => {
                serde_json::from_str(raw).map_err(|e| VndbError::InvalidFilters(e.to_string()))
            }
        }
    }
}

/// Splits a comma-separated projection, trimming and dropping empties
pub fn split_fields(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

/// Request body for `POST /kana/{endpoint}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryBody {
    pub filters: Value,
    pub fields: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    pub results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<bool>,
}

impl QueryBody {
    pub fn from_args(args: &QueryArgs, fields: String) -> VndbResult<Self> {
        Ok(Self {
            filters: args.parsed_filters()?,
            fields,
            sort: args.sort.clone(),
            reverse: args.reverse,
            results: args.page_size(),
            count: args.count,
        })
    }
}

/// Response body of a Kana query
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_from_function_call() {
        let args = QueryArgs::from_value(&json!({
            "filters": "[\"search\", \"=\", \"Ever17\"]",
            "fields": "title, released",
            "results": 5.0,
            "count": true
        }))
        .unwrap();

        assert_eq!(args.fields.as_deref(), Some("title, released"));
        assert_eq!(args.results, Some(5));
        assert_eq!(args.page_size(), 5);
        assert_eq!(args.count, Some(true));
        assert_eq!(args.random, None);
        assert_eq!(args.parsed_filters().unwrap(), json!(["search", "=", "Ever17"]));
    }

    #[test]
    fn test_page_size_defaults_and_ceiling() {
        assert_eq!(QueryArgs::default().page_size(), 100);
        let args = QueryArgs {
            results: Some(500),
            ..Default::default()
        };
        assert_eq!(args.page_size(), 100);
        let args = QueryArgs {
            results: Some(0),
            ..Default::default()
        };
        assert_eq!(args.page_size(), 0);
    }

    #[test]
    fn test_blank_and_invalid_filters() {
        assert_eq!(QueryArgs::default().parsed_filters().unwrap(), json!([]));
        let blank = QueryArgs {
            filters: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.parsed_filters().unwrap(), json!([]));

        let broken = QueryArgs {
            filters: Some("[\"search\", \"=\"".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            broken.parsed_filters(),
            Err(VndbError::InvalidFilters(_))
        ));
    }

    #[test]
    fn test_wrong_argument_types_are_rejected() {
        let err = QueryArgs::from_value(&json!({"fields": ["id", "title"]})).unwrap_err();
        assert!(matches!(err, VndbError::InvalidArguments(_)));
        assert_eq!(QueryArgs::from_value(&Value::Null).unwrap(), QueryArgs::default());
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields(" id, ,name ,,"), vec!["id", "name"]);
        assert!(split_fields("").is_empty());
    }

    #[test]
    fn test_body_omits_unset_options() {
        let body = QueryBody::from_args(&QueryArgs::default(), "id,title".to_string()).unwrap();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({"filters": [], "fields": "id,title", "results": 100})
        );
    }
}
