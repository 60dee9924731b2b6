//! End-to-end runs of the `lkg` subcommands through `run`

use lkg_core::error::ToolError;
use lkg_test_utils::{json, Scratch, FEATURE_TABLE, LINKING_DOCUMENT, MENTION_METADATA, MENTION_TABLE, SAMPLE_CACHE};
use lkg_toolkit::{build_cli, run};
use pretty_assertions::assert_eq;

async fn lkg(args: &[&str]) -> (Result<(), ToolError>, String) {
    let mut argv = vec!["lkg"];
    argv.extend_from_slice(args);
    let matches = build_cli().try_get_matches_from(argv).unwrap();
    let mut out = Vec::new();
    let result = run(&matches, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

fn arg(path: &std::path::Path) -> &str {
    path.to_str().unwrap()
}

#[tokio::test]
async fn sanitize_in_place() {
    let scratch = Scratch::new();
    let cache = scratch.write("fusion_cache.json", SAMPLE_CACHE);

    let (result, out) = lkg(&["sanitize", "--input", arg(&cache)]).await;

    result.unwrap();
    assert!(out.contains("Empty code references removed: 1"));
    assert_eq!(
        json(&scratch.read("fusion_cache.json")),
        json(r#"{"E1": {"references": [{"reference_type": "doc", "references": ["x"]}]}}"#)
    );
}

#[tokio::test]
async fn reconcile_with_sample_flag() {
    let scratch = Scratch::new();
    let table = scratch.write("entity_links.csv", MENTION_TABLE);
    let mentions = scratch.write("mention_metadata.json", MENTION_METADATA);

    let (result, out) = lkg(&[
        "reconcile",
        "--table",
        arg(&table),
        "--mentions",
        arg(&mentions),
        "--sample",
        "1",
    ])
    .await;

    result.unwrap();
    assert!(out.contains("First 1 rows after update:\n"));
    assert!(out.contains("1 | foo | F1 | [\"c1\"]\n"));
    assert!(!out.contains("2 | bar"));
    assert!(out.contains("Matched mentions: 2/3 (66.67%)"));
}

#[tokio::test]
async fn sample_size_from_config_file() {
    let scratch = Scratch::new();
    let table = scratch.write("t.csv", MENTION_TABLE);
    let mentions = scratch.write("m.json", MENTION_METADATA);
    let config = scratch.write("lkg.toml", "[reconcile]\nsample_size = 2\n");

    let (result, out) = lkg(&[
        "--config",
        arg(&config),
        "reconcile",
        "--table",
        arg(&table),
        "--mentions",
        arg(&mentions),
    ])
    .await;

    result.unwrap();
    assert!(out.contains("First 2 rows after update:\n"));
}

#[tokio::test]
async fn schema_error_maps_to_exit_code_3() {
    let scratch = Scratch::new();
    let table = scratch.write("t.csv", "mention_id,mention\n1,foo\n");
    let mentions = scratch.write("m.json", MENTION_METADATA);

    let (result, out) = lkg(&[
        "reconcile",
        "--table",
        arg(&table),
        "--mentions",
        arg(&mentions),
    ])
    .await;

    assert_eq!(result.unwrap_err().exit_code(), 3);
    assert!(out.is_empty());
}

#[tokio::test]
async fn parse_error_maps_to_exit_code_2() {
    let scratch = Scratch::new();
    let cache = scratch.write("c.json", "{not json");

    let (result, _) = lkg(&["sanitize", "--input", arg(&cache)]).await;

    assert_eq!(result.unwrap_err().exit_code(), 2);
}

#[tokio::test]
async fn missing_input_maps_to_exit_code_4() {
    let scratch = Scratch::new();
    let absent = scratch.path().join("absent.json");

    let (result, _) = lkg(&["cache-stats", "--input", arg(&absent)]).await;

    assert_eq!(result.unwrap_err().exit_code(), 4);
}

#[tokio::test]
async fn bad_config_maps_to_exit_code_5() {
    let scratch = Scratch::new();
    let cache = scratch.write("c.json", SAMPLE_CACHE);
    let config = scratch.write("lkg.toml", "[limits]\nmax_file_size = 0\n");

    let (result, _) = lkg(&["--config", arg(&config), "cache-stats", "--input", arg(&cache)]).await;

    assert_eq!(result.unwrap_err().exit_code(), 5);
}

#[tokio::test]
async fn size_limit_from_config() {
    let scratch = Scratch::new();
    let cache = scratch.write("c.json", SAMPLE_CACHE);
    let config = scratch.write("lkg.toml", "[limits]\nmax_file_size = 8\n");

    let (result, _) = lkg(&["--config", arg(&config), "sanitize", "--input", arg(&cache)]).await;

    assert!(matches!(result, Err(ToolError::Parse(_))));
    assert_eq!(scratch.read("c.json"), SAMPLE_CACHE);
}

#[tokio::test]
async fn features_listing() {
    let scratch = Scratch::new();
    let table = scratch.write("features.csv", FEATURE_TABLE);

    let (result, out) = lkg(&["features", "--table", arg(&table), "--show-mentions"]).await;

    result.unwrap();
    assert!(out.contains("Features with mentions: 2 (3 mentions)"));
    assert!(out.contains("    - ring buffer\n"));
}

#[tokio::test]
async fn check_json_cells_by_name() {
    let scratch = Scratch::new();
    let table = scratch.write("t.csv", "id,link\n1,\"{'a': 1}\"\n2,oops\n");

    let (result, out) = lkg(&["check-json-cells", "--table", arg(&table), "--column", "link"]).await;

    result.unwrap();
    assert!(out.contains("Rows: 2  Valid: 1  Invalid: 1  Empty: 0"));
}

#[tokio::test]
async fn check_json_cells_default_column_out_of_range() {
    let scratch = Scratch::new();
    let table = scratch.write("t.csv", "id,link\n1,[]\n");

    let (result, _) = lkg(&["check-json-cells", "--table", arg(&table)]).await;

    assert_eq!(result.unwrap_err().exit_code(), 3);
}

#[tokio::test]
async fn extract_links_end_to_end() {
    let scratch = Scratch::new();
    let input = scratch.write("kg.json", LINKING_DOCUMENT);
    let output = scratch.path().join("links.json");

    let (result, out) = lkg(&["extract-links", "--input", arg(&input), "--output", arg(&output)]).await;

    result.unwrap();
    assert!(out.contains("Links extracted: 2"));
    assert_eq!(json(&scratch.read("links.json")).as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn probe_failure_does_not_fail_command() {
    // Outcome of the request itself is irrelevant here
    let (result, out) = lkg(&[
        "probe",
        "--url",
        "http://127.0.0.1:9/",
        "--connect-timeout",
        "1",
        "--timeout",
        "2",
    ])
    .await;

    result.unwrap();
    assert!(out.contains("[1/1] http://127.0.0.1:9/"));
    assert!(out.contains("Recommended client settings:"));
}
