// Request compilation: constraints, ordering and pagination on the wire
use mindbreeze::cli::{constraint_value, order_args, parse_constraint_arg};
use mindbreeze::config::Config;
use mindbreeze::constraints::{anchored_literal, Constraint, ConstraintKind};
use mindbreeze::error::{MindbreezeError, Result};
use mindbreeze::http::{HttpClient, HttpResponse, PostRequest};
use mindbreeze::session::{PaginationSession, PaginationToken};
use mindbreeze::QueryBuilder;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::Arc;

struct OfflineClient;

impl HttpClient for OfflineClient {
    fn post(&self, _url: &str, _request: PostRequest) -> Result<HttpResponse> {
        Err(MindbreezeError::Transport("offline".to_string()))
    }
}

fn builder() -> QueryBuilder {
    QueryBuilder::new(
        "http://localhost/search",
        Arc::new(OfflineClient),
        PaginationSession::in_memory("compile-tests"),
    )
}

fn compiled(builder: &QueryBuilder) -> Value {
    serde_json::to_value(builder.compile_data().unwrap()).unwrap()
}

#[test]
fn test_between_dates_bounds_for_many_ranges() {
    let ranges = [
        (0_i64, 0_i64),
        (1, 2),
        (946_684_800, 978_307_199),
        (1_700_000_000, 1_600_000_000),
        (-86_400, 86_400),
    ];

    for (a, b) in ranges {
        let doc = Constraint::between_dates("mes:date")
            .create(&json!([a, b]))
            .unwrap()
            .compile();
        let doc = serde_json::to_value(doc).unwrap();

        let entries = doc["filter_base"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0]["and"],
            json!([
                {"num": a * 1000, "cmp": "GE", "unit": "ms_since_1970"},
                {"num": b * 1000, "cmp": "LE", "unit": "ms_since_1970"}
            ])
        );
    }
}

#[test]
fn test_between_dates_rejects_bad_shapes() {
    for input in [json!(5), json!("2024"), json!({"from": 1, "to": 2}), json!([1]), json!([1, 2, 3])] {
        let err = Constraint::new(ConstraintKind::BetweenDates, "mes:date")
            .create(&input)
            .unwrap_err();
        assert!(
            matches!(err, MindbreezeError::InvalidArgument(_)),
            "input {} should be rejected",
            input
        );
    }
}

#[test]
fn test_regex_patterns_match_literally() {
    let samples = [
        "C++ (2nd ed.)",
        "what?",
        "a|b",
        "100% [draft]",
        "^$",
        "tabs\tand\nnewlines",
        "unicode: café ☕",
    ];

    for sample in samples {
        let doc = Constraint::regex("title")
            .create(&json!([sample]))
            .unwrap()
            .compile();
        let doc = serde_json::to_value(doc).unwrap();
        let pattern = doc["filter_base"][0]["regex"].as_str().unwrap();

        assert_eq!(pattern, anchored_literal(sample));
        assert_eq!(doc["filter_base"][0]["value"], json!({"str": sample}));

        let re = Regex::new(pattern).unwrap();
        assert!(re.is_match(sample));
        assert!(!re.is_match(&format!("{}x", sample)));
        assert!(!re.is_match(&format!("x{}", sample)));
    }
}

#[test]
fn test_constraints_are_dispatched_by_kind() {
    let mut builder = builder();
    builder
        .add_constraint("title", "regex", &json!(["Annual", "Budget"]))
        .unwrap()
        .add_constraint("category", "term", &json!("News"))
        .unwrap()
        .add_date_constraint(1, 2)
        .unwrap();

    let data = compiled(&builder);
    let constraints = data["user"]["constraints"].as_array().unwrap();
    assert_eq!(constraints.len(), 3);

    assert_eq!(constraints[0]["label"], json!("title"));
    assert_eq!(constraints[0]["filter_base"].as_array().unwrap().len(), 2);
    assert_eq!(
        constraints[1]["filter_base"][0]["and"],
        json!([{"label": "category", "quoted_term": "News"}])
    );
    assert_eq!(constraints[2]["label"], json!("mes:date"));
}

#[test]
fn test_failed_constraint_leaves_state_untouched() {
    let mut builder = builder();
    assert!(builder
        .add_constraint("mes:date", "between_dates", &json!([1]))
        .is_err());
    assert!(builder.add_constraint("x", "nope", &json!("v")).is_err());
    for empty in [Value::Null, json!([])] {
        let err = builder.add_constraint("title", "regex", &empty).err().unwrap();
        assert!(matches!(err, MindbreezeError::InvalidArgument(_)));
    }

    let data = compiled(&builder);
    assert_eq!(data["user"]["constraints"], json!([]));
}

#[test]
fn test_order_on_the_wire() {
    let mut builder = builder();
    builder.set_order("relevance", "asc").unwrap();

    let data = compiled(&builder);
    assert_eq!(data["orderby"], json!("mes:relevance"));
    assert_eq!(data["order_direction"], json!("ASCENDING"));

    builder.set_order("DATE", "Desc").unwrap();
    let data = compiled(&builder);
    assert_eq!(data["orderby"], json!("mes:date"));
    assert_eq!(data["order_direction"], json!("DESCENDING"));
}

#[test]
fn test_properties_and_facets() {
    let mut builder = builder();
    builder
        .add_property("Title")
        .add_property("mes:date")
        .add_facet("category");

    let data = compiled(&builder);
    assert_eq!(
        data["properties"],
        json!([
            {"formats": ["HTML", "VALUE"], "name": "Title"},
            {"formats": ["HTML", "VALUE"], "name": "mes:date"}
        ])
    );
    assert_eq!(data["facets"], json!([{"formats": ["HTML"], "name": "category"}]));
}

#[test]
fn test_page_one_never_has_result_pages() {
    let mut builder = builder();
    builder.set_query("budget");
    builder
        .session()
        .store(PaginationToken::new(builder.encoded_query(), json!("t")))
        .unwrap();

    for page in [-1, 0, 1] {
        builder.set_page(page);
        assert!(compiled(&builder).get("result_pages").is_none());
    }
}

#[test]
fn test_page_starts_follow_page_size() {
    let mut builder = builder();
    builder.set_query("budget").set_per_page(10);
    builder
        .session()
        .store(PaginationToken::new(builder.encoded_query(), json!(["t"])))
        .unwrap();

    for page in 2..=5_i64 {
        builder.set_page(page);
        let data = compiled(&builder);
        assert_eq!(data["result_pages"]["qeng_ids"], json!(["t"]));
        assert_eq!(data["result_pages"]["pages"]["starts"], json!([(page - 1) * 10]));
        assert_eq!(data["result_pages"]["pages"]["counts"], json!([10]));
        assert_eq!(data["result_pages"]["pages"]["page_number"], json!(page));
    }
}

#[test]
fn test_from_config_seeds_defaults() {
    let mut config = Config::default();
    config.request.per_page = 25;
    config.request.content_sample_length = 120;
    config.request.properties = vec!["title".to_string()];
    config.request.facets = vec!["mes:size".to_string()];
    config.datasources.insert(
        "gazette".to_string(),
        vec![
            "Web:GazetteArchivesPages".to_string(),
            "Web:GazetteArchivesWP".to_string(),
        ],
    );

    let mut builder = QueryBuilder::from_config(
        &config,
        Arc::new(OfflineClient),
        PaginationSession::in_memory("cfg"),
    );
    builder.set_query("minutes").add_datasource_constraint("gazette").unwrap();

    assert_eq!(builder.url(), config.endpoint.url);
    let data = compiled(&builder);
    assert_eq!(data["count"], json!(25));
    assert_eq!(data["content_sample_length"], json!(120));
    assert_eq!(data["properties"][0]["name"], json!("title"));
    assert_eq!(data["facets"][0]["name"], json!("mes:size"));
    assert_eq!(
        data["source_context"],
        json!({
            "constraints": {
                "label": "fqcategory",
                "filter_base": [
                    {
                        "label": "fqcategory",
                        "and": [{"label": "fqcategory", "quoted_term": "Web:GazetteArchivesPages"}],
                        "value": {"str": "Web:GazetteArchivesPages"}
                    },
                    {
                        "label": "fqcategory",
                        "and": [{"label": "fqcategory", "quoted_term": "Web:GazetteArchivesWP"}],
                        "value": {"str": "Web:GazetteArchivesWP"}
                    }
                ]
            }
        })
    );
}

#[test]
fn test_command_line_constraints_keep_typed_text() {
    let mut builder = builder();
    for arg in ["title:regex:12.50", "title:term:1e3", "title:regex:null"] {
        let (label, kind, value) = parse_constraint_arg(arg).unwrap();
        let data = constraint_value(&kind, &value).unwrap();
        builder.add_constraint(&label, &kind, &data).unwrap();
    }

    let data = compiled(&builder);
    let constraints = data["user"]["constraints"].as_array().unwrap();
    assert_eq!(constraints.len(), 3);

    assert_eq!(
        constraints[0]["filter_base"][0]["regex"],
        json!(anchored_literal("12.50"))
    );
    assert_eq!(constraints[0]["filter_base"][0]["value"], json!({"str": "12.50"}));
    assert_eq!(
        constraints[1]["filter_base"][0]["and"],
        json!([{"label": "title", "quoted_term": "1e3"}])
    );
    assert_eq!(constraints[2]["filter_base"].as_array().unwrap().len(), 1);
    assert_eq!(constraints[2]["filter_base"][0]["value"], json!({"str": "null"}));
}

#[test]
fn test_command_line_date_constraint() {
    let (label, kind, value) = parse_constraint_arg("mes:date:between_dates:[1,2]").unwrap();
    let mut builder = builder();
    builder
        .add_constraint(&label, &kind, &constraint_value(&kind, &value).unwrap())
        .unwrap();

    let data = compiled(&builder);
    assert_eq!(
        data["user"]["constraints"][0]["filter_base"][0]["and"],
        json!([
            {"num": 1000, "cmp": "GE", "unit": "ms_since_1970"},
            {"num": 2000, "cmp": "LE", "unit": "ms_since_1970"}
        ])
    );
}

#[test]
fn test_direction_alone_reaches_the_wire() {
    let mut builder = builder();
    let (field, direction) = order_args(None, "asc");
    builder.set_order(field, direction).unwrap();

    let data = compiled(&builder);
    assert_eq!(data["orderby"], json!("mes:relevance"));
    assert_eq!(data["order_direction"], json!("ASCENDING"));
}
