//! File-level runs of the inspect helpers

use lkg_core::error::{ParseError, SchemaError, ToolError};
use lkg_core::formats::ColumnSelector;
use lkg_core::layer::DocumentLayer;
use lkg_inspect::{check_json_cells, extract_links};
use lkg_test_utils::{Scratch, LINKING_DOCUMENT};
use pretty_assertions::assert_eq;

const BENCHMARK: &str = "\
mention_id,feature_id,h1,h2,description,mention,ngram_wikipedia_link
1,101,Memory,Slab,kfence,kfence,\"{'kfence': 'https://en.wikipedia.org/wiki/KFENCE'}\"
2,101,Memory,Slab,kfence,sampling,
3,102,Net,,xdp,XDP,\"{'XDP': }\"
";

#[test]
fn checks_seventh_column_by_default() {
    let scratch = Scratch::new();
    let path = scratch.write("benchmark.csv", BENCHMARK);

    let report =
        check_json_cells(&DocumentLayer::new(), &path, &ColumnSelector::Index(6)).unwrap();

    assert_eq!(report.column, "ngram_wikipedia_link");
    assert_eq!((report.valid(), report.empty(), report.invalid()), (1, 1, 1));
    assert_eq!(scratch.read("benchmark.csv"), BENCHMARK);
}

#[test]
fn missing_named_column() {
    let scratch = Scratch::new();
    let path = scratch.write("benchmark.csv", BENCHMARK);

    let err = check_json_cells(
        &DocumentLayer::new(),
        &path,
        &ColumnSelector::Name("wikipedia_link".into()),
    )
    .unwrap_err();

    assert!(matches!(err, ToolError::Schema(SchemaError::MissingColumn { .. })));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn extracts_with_four_space_indent() {
    let scratch = Scratch::new();
    let input = scratch.write("kg_results.json", LINKING_DOCUMENT);
    let output = scratch.path().join("links.json");

    let report = extract_links(&DocumentLayer::new(), &input, &output).unwrap();

    assert_eq!((report.entries, report.extracted), (3, 2));
    assert_eq!(
        scratch.read("links.json"),
        "[\n    {\n        \"concept\": \"RCU\",\n        \"wikipedia_url\": \"https://en.wikipedia.org/wiki/Read-copy-update\"\n    },\n    {\n        \"concept\": \"Slab allocation\",\n        \"wikipedia_url\": \"https://en.wikipedia.org/wiki/Slab_allocation\"\n    }\n]\n"
    );
}

#[test]
fn nothing_linked_writes_empty_list() {
    let scratch = Scratch::new();
    let input = scratch.write("kg.json", r#"{"linking": []}"#);
    let output = scratch.path().join("links.json");

    extract_links(&DocumentLayer::new(), &input, &output).unwrap();

    assert_eq!(scratch.read("links.json"), "[]\n");
}

#[test]
fn non_ascii_concepts_kept_verbatim() {
    let scratch = Scratch::new();
    let input = scratch.write(
        "kg.json",
        r#"{"linking": [{"mention": "调度器", "wikipedia_url": "https://zh.wikipedia.org/wiki/调度"}]}"#,
    );
    let output = scratch.path().join("links.json");

    extract_links(&DocumentLayer::new(), &input, &output).unwrap();

    assert!(scratch.read("links.json").contains("\"concept\": \"调度器\""));
}

#[test]
fn malformed_input_writes_nothing() {
    let scratch = Scratch::new();
    let input = scratch.write("kg.json", r#"{"linking": "#);
    let output = scratch.path().join("links.json");

    let err = extract_links(&DocumentLayer::new(), &input, &output).unwrap_err();

    assert!(matches!(err, ToolError::Parse(ParseError::Syntax { .. })));
    assert!(!output.exists());
}
