// Tests for report generation functionality

use annomap_client::{Annotation, Reference};
use annomap_core::report::{
    ReportFormat, generate_html_report, generate_json_report, generate_markdown_report,
    generate_text_report, render_report, save_report,
};
use annomap_core::{MindMap, RenderOptions, ReportAssembler, SequentialIds};
use serde_json::json;
use tempfile::TempDir;

fn sample_map(title: &str, notes: &[Annotation]) -> MindMap {
    let reference = Reference {
        authors_text: Some("Smith J".to_string()),
        published_year: Some(json!(2020)),
        title: Some(title.to_string()),
        abstract_text: Some("Short abstract".to_string()),
        ..Default::default()
    };
    ReportAssembler::new(SequentialIds::new())
        .assemble(&reference, notes)
        .unwrap()
}

fn methods_and_results() -> MindMap {
    sample_map(
        "Mind maps",
        &[
            Annotation::new(Some("#m"), "We sampled widely"),
            Annotation::new(Some("#r"), "It worked"),
        ],
    )
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("html"), Some(ReportFormat::Html));
    assert_eq!(ReportFormat::from_str("markdown"), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert_eq!(ReportFormat::from_str("HTML"), Some(ReportFormat::Html));
    assert_eq!(ReportFormat::from_str("Json"), Some(ReportFormat::Json));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert_eq!(ReportFormat::from_str("csv"), None);
    assert_eq!(ReportFormat::from_str(""), None);
}

#[test]
fn test_report_format_extension() {
    assert_eq!(ReportFormat::Text.extension(), "txt");
    assert_eq!(ReportFormat::Json.extension(), "json");
    assert_eq!(ReportFormat::Html.extension(), "html");
    assert_eq!(ReportFormat::Markdown.extension(), "md");
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_tree() {
    let report = generate_text_report(&methods_and_results());
    assert_eq!(
        report,
        "Smith J (2020)\n\
         Mind maps\n\
         ├── Methods\n\
         │   └── We sampled widely...\n\
         └── Results\n\
         \u{20}   └── It worked...\n"
    );
}

#[test]
fn test_text_report_empty_map() {
    assert_eq!(generate_text_report(&MindMap::new()), "(empty)\n");
}

#[test]
fn test_text_report_root_only() {
    let report = generate_text_report(&sample_map("Mind maps", &[]));
    assert_eq!(report, "Smith J (2020)\nMind maps\n");
}

// ============================================================================
// Markdown Report Tests
// ============================================================================

#[test]
fn test_markdown_report_outline() {
    let report = generate_markdown_report(&methods_and_results());

    assert!(report.starts_with("# Smith J (2020)"));
    assert!(report.contains("> Short abstract\n"));
    assert!(report.contains("- Methods\n  - We sampled widely...\n    > We sampled widely\n"));
    assert!(report.contains("- Results\n  - It worked...\n    > It worked\n"));
}

#[test]
fn test_markdown_report_skips_tooltip_equal_to_label() {
    let map = sample_map(
        "Mind maps",
        &[Annotation::new(Some("plain note"), "plain note")],
    );
    let report = generate_markdown_report(&map);
    assert!(report.contains("- Highlights\n  - plain note\n"));
    assert!(!report.contains("> plain note"));
}

#[test]
fn test_markdown_report_empty_map() {
    assert_eq!(generate_markdown_report(&MindMap::new()), "");
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_structure() {
    let json = generate_json_report(&methods_and_results(), &RenderOptions::default()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &parsed["report"];
    assert_eq!(report["metadata"]["generator"], "annomap");
    assert_eq!(report["metadata"]["format"], "json");
    assert_eq!(report["summary"]["total_nodes"], 5);
    assert_eq!(report["summary"]["total_edges"], 4);
    assert_eq!(report["options"]["autoResize"], true);
    assert_eq!(report["options"]["nodes"]["shape"], "box");
}

#[test]
fn test_json_report_nodes_use_vis_fields() {
    let json = generate_json_report(&methods_and_results(), &RenderOptions::default()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let nodes = parsed["report"]["nodes"].as_array().unwrap();
    let root = &nodes[0];
    assert_eq!(root["id"], "#t");
    assert_eq!(root["title"], "Short abstract");
    assert_eq!(root["level"], 1);
    assert_eq!(root["color"], "#7BE141");
    assert!(root.get("tooltip").is_none());

    let edges = parsed["report"]["edges"].as_array().unwrap();
    assert!(edges.contains(&json!({ "from": "#t", "to": "#m" })));
}

// ============================================================================
// HTML Report Tests
// ============================================================================

#[test]
fn test_html_report_page() {
    let html = generate_html_report(&methods_and_results(), &RenderOptions::default()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("vis-network"));
    assert!(html.contains("new vis.DataSet("));
    assert!(html.contains("\"shape\":\"box\""));
    assert!(html.contains("<title>Smith J (2020)  Mind maps</title>"));
}

#[test]
fn test_html_report_escapes_title() {
    let map = sample_map("Cells <i>in vitro</i> & more", &[]);
    let html = generate_html_report(&map, &RenderOptions::default()).unwrap();
    assert!(html.contains("Cells &lt;i&gt;in vitro&lt;/i&gt; &amp; more"));
}

#[test]
fn test_html_report_keeps_script_closed() {
    let map = sample_map(
        "Mind maps",
        &[Annotation::new(Some("#m"), "</script><script>alert(1)")],
    );
    let html = generate_html_report(&map, &RenderOptions::default()).unwrap();
    assert_eq!(html.matches("</script>").count(), 2);
}

#[test]
fn test_render_report_dispatch() {
    let map = methods_and_results();
    let options = RenderOptions::default();

    let text = render_report(&map, &options, ReportFormat::Text).unwrap();
    assert_eq!(text, generate_text_report(&map));

    let markdown = render_report(&map, &options, ReportFormat::Markdown).unwrap();
    assert_eq!(markdown, generate_markdown_report(&map));

    let html = render_report(&map, &options, ReportFormat::Html).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
}

// ============================================================================
// Save Report Tests
// ============================================================================

#[test]
fn test_save_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mindmap.md");

    let content = generate_markdown_report(&methods_and_results());
    save_report(&content, &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_save_report_overwrites() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mindmap.txt");

    save_report("first", &path).unwrap();
    save_report("second", &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
}

#[test]
fn test_save_report_missing_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("mindmap.txt");
    assert!(save_report("content", &path).is_err());
}
