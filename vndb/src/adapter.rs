//! Data Access Adapter: turns a validated tool invocation into a Kana query,
//! tags the results with their kind and folds failures into error records.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{RandomPickError, VndbResult};
use crate::query::{split_fields, QueryArgs, QueryBody};
use crate::record::{EntityKind, Record, ToolResult};
use crate::transport::{HttpTransport, VndbTransport};

/// Draws an integer uniformly from `1..=max`
pub type Sampler = fn(u64) -> u64;

fn uniform_draw(max: u64) -> u64 {
    rand::rng().random_range(1..=max)
}

#[derive(Clone)]
pub struct VndbAdapter {
    transport: Arc<dyn VndbTransport>,
    sampler: Sampler,
}

impl VndbAdapter {
    pub fn new(transport: Arc<dyn VndbTransport>) -> Self {
        Self {
            transport,
            sampler: uniform_draw,
        }
    }

    /// Adapter talking to the Kana API over HTTP
    pub fn http(base_url: &str, timeout: Option<Duration>) -> VndbResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(base_url, timeout)?)))
    }

    /// Replaces the random draw used by the random sampler
    pub fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Runs one tool invocation. Never fails: transport and remote errors
    /// come back as a single error record.
    pub async fn query(&self, kind: EntityKind, args: &QueryArgs) -> ToolResult {
        if kind == EntityKind::VisualNovel && args.random == Some(true) {
            return match self.random_visual_novel(args).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "Random visual novel draw failed");
                    ToolResult {
                        total_count: Some(0),
                        ..ToolResult::error(e.to_string())
                    }
                }
            };
        }

        let fields = with_display_fields(kind, args.fields.as_deref());
        match QueryBody::from_args(args, fields) {
            Ok(body) => self.fetch(kind, &body).await,
            Err(e) => query_failure(kind, e),
        }
    }

    async fn fetch(&self, kind: EntityKind, body: &QueryBody) -> ToolResult {
        match self.transport.post_query(kind.endpoint(), body).await {
            Ok(response) => {
                debug!(
                    endpoint = kind.endpoint(),
                    results = response.results.len(),
                    count = ?response.count,
                    "VNDB query completed"
                );
                let records = response
                    .results
                    .into_iter()
                    .map(|raw| Record::tag(kind, raw))
                    .collect();
                ToolResult::from_records(records, response.count)
            }
            Err(e) => query_failure(kind, e),
        }
    }

    /// Picks a random visual novel matching the caller's filters.
    ///
    /// Looks up the highest matching ID, draws N uniformly from `1..=max`
    /// and returns the first match with ID >= vN. IDs are sparse, so an
    /// entry that follows a long run of deleted or filtered-out IDs is
    /// picked more often than one inside a dense run. This skew is accepted.
    async fn random_visual_novel(&self, args: &QueryArgs) -> Result<ToolResult, RandomPickError> {
        let kind = EntityKind::VisualNovel;
        let existing = args.parsed_filters()?;

        let max_probe = QueryBody {
            filters: existing.clone(),
            fields: "id".to_string(),
            sort: Some("id".to_string()),
            reverse: Some(true),
            results: 1,
            count: None,
        };
        let probe = self
            .transport
            .post_query(kind.endpoint(), &max_probe)
            .await
            .map_err(|e| RandomPickError::NoMatch(e.to_string()))?;

        let max_id = probe
            .results
            .first()
            .and_then(|record| record.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| RandomPickError::NoMatch("No results found.".to_string()))?
            .to_string();
        let max = parse_numeric_id(&max_id).ok_or(RandomPickError::MalformedId(max_id))?;

        let drawn = (self.sampler)(max);
        debug!(max, drawn, "Drew random visual novel id");

        let body = QueryBody {
            filters: random_filter(existing, drawn),
            fields: with_display_fields(kind, args.fields.as_deref()),
            sort: Some("id".to_string()),
            reverse: Some(false),
            results: 1,
            count: None,
        };
        Ok(self.fetch(kind, &body).await)
    }
}

fn query_failure(kind: EntityKind, error: impl std::fmt::Display) -> ToolResult {
    warn!(endpoint = kind.endpoint(), error = %error, "VNDB query failed");
    ToolResult::error(format!(
        "Failed to query VNDB {}: {}",
        kind.endpoint(),
        error
    ))
}

/// Requested fields plus whatever the kind needs for display, deduplicated
/// and in request order.
pub fn with_display_fields(kind: EntityKind, requested: Option<&str>) -> String {
    let mut fields = requested.map(split_fields).unwrap_or_default();
    let mut deduped: Vec<String> = Vec::with_capacity(fields.len() + 3);
    for field in fields.drain(..) {
        if !deduped.contains(&field) {
            deduped.push(field);
        }
    }
    for essential in kind.display_fields() {
        if !deduped.iter().any(|field| field == essential) {
            deduped.push((*essential).to_string());
        }
    }
    deduped.join(",")
}

/// Numeric part of a prefixed ID such as `v42`; `None` unless a positive integer
fn parse_numeric_id(id: &str) -> Option<u64> {
    let mut chars = id.chars();
    chars.next()?;
    chars.as_str().parse::<u64>().ok().filter(|n| *n > 0)
}

/// `id >= v{drawn}`, AND-ed with the caller's filters when there are any
fn random_filter(existing: Value, drawn: u64) -> Value {
    let lower_bound = json!(["id", ">=", format!("v{}", drawn)]);
    let has_filters = match &existing {
        Value::Array(items) => !items.is_empty(),
        Value::Null => false,
        _ => true,
    };
    if has_filters {
        json!(["and", existing, lower_bound])
    } else {
        lower_bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VndbError;
    use crate::query::QueryResponse;
    use crate::record::ResultItem;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted responses and records every request
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<VndbResult<QueryResponse>>>,
        requests: Mutex<Vec<(String, QueryBody)>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<VndbResult<QueryResponse>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(String, QueryBody)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VndbTransport for ScriptedTransport {
        async fn post_query(&self, endpoint: &str, body: &QueryBody) -> VndbResult<QueryResponse> {
            self.requests
                .lock()
                .unwrap()
                .push((endpoint.to_string(), body.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(QueryResponse::default()))
        }
    }

    fn ok(results: Vec<Value>, count: Option<u64>) -> VndbResult<QueryResponse> {
        Ok(QueryResponse { results, count })
    }

    #[test]
    fn test_display_fields_are_appended_once() {
        assert_eq!(
            with_display_fields(EntityKind::VisualNovel, Some("rating, title,rating")),
            "rating,title,id,image.url"
        );
        assert_eq!(with_display_fields(EntityKind::Quote, None), "id,quote");
        assert_eq!(
            with_display_fields(EntityKind::Trait, Some("")),
            "id,name,description"
        );
    }

    #[test]
    fn test_parse_numeric_id() {
        assert_eq!(parse_numeric_id("v42"), Some(42));
        assert_eq!(parse_numeric_id("v0"), None);
        assert_eq!(parse_numeric_id("vx1"), None);
        assert_eq!(parse_numeric_id("v"), None);
        assert_eq!(parse_numeric_id(""), None);
    }

    #[test]
    fn test_random_filter_combines_with_existing() {
        assert_eq!(random_filter(json!([]), 7), json!(["id", ">=", "v7"]));
        assert_eq!(
            random_filter(json!(["lang", "=", "en"]), 7),
            json!(["and", ["lang", "=", "en"], ["id", ">=", "v7"]])
        );
    }

    #[tokio::test]
    async fn test_query_tags_records_and_keeps_count() {
        let transport = ScriptedTransport::new(vec![ok(
            vec![json!({"id": "c1", "name": "Okabe"}), json!({"id": "c2", "name": "Kurisu"})],
            Some(2),
        )]);
        let adapter = VndbAdapter::new(transport.clone());
        let args = QueryArgs {
            filters: Some("[\"vn\", \"=\", [\"id\", \"=\", \"v2002\"]]".to_string()),
            fields: Some("age".to_string()),
            count: Some(true),
            ..Default::default()
        };

        let result = adapter.query(EntityKind::Character, &args).await;
        assert_eq!(result.total_count, Some(2));
        let records = result.valid_records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.kind == EntityKind::Character));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let (endpoint, body) = &requests[0];
        assert_eq!(endpoint, "character");
        assert_eq!(body.fields, "age,id,name,image.url");
        assert_eq!(body.results, 100);
        assert_eq!(body.count, Some(true));
        assert_eq!(body.filters, json!(["vn", "=", ["id", "=", "v2002"]]));
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_error_record() {
        let transport = ScriptedTransport::new(vec![Err(VndbError::HttpError {
            status: 400,
            body: "Unknown field 'bogus'".to_string(),
        })]);
        let adapter = VndbAdapter::new(transport);

        let result = adapter.query(EntityKind::Tag, &QueryArgs::default()).await;
        assert!(result.valid_records().is_empty());
        let errors = result.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Failed to query VNDB tag: VNDB API error (400)"));
    }

    #[tokio::test]
    async fn test_invalid_filters_skip_the_network() {
        let transport = ScriptedTransport::new(vec![]);
        let adapter = VndbAdapter::new(transport.clone());
        let args = QueryArgs {
            filters: Some("not json".to_string()),
            ..Default::default()
        };

        let result = adapter.query(EntityKind::Staff, &args).await;
        assert_eq!(result.errors().len(), 1);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_random_single_match_is_always_returned() {
        for _ in 0..10 {
            let transport = ScriptedTransport::new(vec![
                ok(vec![json!({"id": "v42"})], None),
                ok(
                    vec![json!({"id": "v42", "title": "Only One", "image": {"url": "https://t.vndb.org/cv/42.jpg"}})],
                    None,
                ),
            ]);
            let adapter = VndbAdapter::new(transport.clone());
            let args = QueryArgs {
                filters: Some("[\"search\", \"=\", \"Only One\"]".to_string()),
                random: Some(true),
                ..Default::default()
            };

            let result = adapter.query(EntityKind::VisualNovel, &args).await;
            let records = result.valid_records();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].id(), Some("v42"));
            assert_eq!(records[0].kind, EntityKind::VisualNovel);

            let requests = transport.requests();
            assert_eq!(requests.len(), 2);

            let probe = &requests[0].1;
            assert_eq!(probe.fields, "id");
            assert_eq!(probe.sort.as_deref(), Some("id"));
            assert_eq!(probe.reverse, Some(true));
            assert_eq!(probe.results, 1);

            let pick = &requests[1].1;
            assert_eq!(pick.fields, "id,title,image.url");
            assert_eq!(pick.reverse, Some(false));
            assert_eq!(pick.results, 1);
            assert_eq!(pick.filters[0], "and");
            assert_eq!(pick.filters[1], json!(["search", "=", "Only One"]));
            let bound = pick.filters[2][2].as_str().unwrap();
            let drawn: u64 = bound.trim_start_matches('v').parse().unwrap();
            assert!((1..=42).contains(&drawn));
        }
    }

    #[tokio::test]
    async fn test_random_uses_sampler_without_filters() {
        fn pick_seven(_max: u64) -> u64 {
            7
        }

        let transport = ScriptedTransport::new(vec![
            ok(vec![json!({"id": "v50000"})], None),
            ok(vec![json!({"id": "v9", "title": "Next"})], None),
        ]);
        let adapter = VndbAdapter::new(transport.clone()).with_sampler(pick_seven);
        let args = QueryArgs {
            random: Some(true),
            results: Some(20),
            ..Default::default()
        };

        let result = adapter.query(EntityKind::VisualNovel, &args).await;
        assert_eq!(result.valid_records()[0].id(), Some("v9"));
        assert_eq!(
            transport.requests()[1].1.filters,
            json!(["id", ">=", "v7"])
        );
    }

    #[tokio::test]
    async fn test_random_without_matches() {
        let transport = ScriptedTransport::new(vec![ok(vec![], None)]);
        let adapter = VndbAdapter::new(transport.clone());
        let args = QueryArgs {
            random: Some(true),
            ..Default::default()
        };

        let result = adapter.query(EntityKind::VisualNovel, &args).await;
        assert_eq!(result.total_count, Some(0));
        match &result.records[..] {
            [ResultItem::Error { error }] => {
                assert!(error.starts_with("Could not find any VN matching the filters"))
            }
            other => panic!("unexpected records: {:?}", other),
        }
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_random_with_malformed_max_id() {
        let transport = ScriptedTransport::new(vec![ok(vec![json!({"id": "vabc"})], None)]);
        let adapter = VndbAdapter::new(transport.clone());
        let args = QueryArgs {
            random: Some(true),
            ..Default::default()
        };

        let result = adapter.query(EntityKind::VisualNovel, &args).await;
        assert_eq!(
            result.errors(),
            vec!["Failed to parse a valid maximum ID. Got: vabc"]
        );
        assert_eq!(transport.requests().len(), 1);
    }
}
