// Rendering a finished mind map into the supported output formats

use crate::assemble::RenderOptions;
use crate::model::{MindMap, Node};
use crate::skeleton::ROOT_ID;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Html,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "html" => Some(ReportFormat::Html),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
        }
    }
}

const VIS_NETWORK_SCRIPT: &str =
    "https://unpkg.com/vis-network/standalone/umd/vis-network.min.js";

pub fn render_report(
    map: &MindMap,
    options: &RenderOptions,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(map)),
        ReportFormat::Json => generate_json_report(map, options),
        ReportFormat::Html => generate_html_report(map, options),
        ReportFormat::Markdown => Ok(generate_markdown_report(map)),
    }
}

/// Indented tree, one node per line.
pub fn generate_text_report(map: &MindMap) -> String {
    let mut report = String::new();
    let Some(root) = map.node(ROOT_ID) else {
        report.push_str("(empty)\n");
        return report;
    };

    for line in root.label.lines().filter(|l| !l.trim().is_empty()) {
        report.push_str(line.trim());
        report.push('\n');
    }

    let mut visited = HashSet::from([root.id.as_str()]);
    write_text_branch(map, &root.id, "", &mut visited, &mut report);
    report
}

fn write_text_branch<'a>(
    map: &'a MindMap,
    id: &str,
    prefix: &str,
    visited: &mut HashSet<&'a str>,
    report: &mut String,
) {
    let children = map.children(id);
    let count = children.len();

    for (i, child) in children.into_iter().enumerate() {
        if !visited.insert(child.id.as_str()) {
            continue;
        }
        let is_last = i == count - 1;
        let (branch, indent) = if is_last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        report.push_str(&format!("{}{}{}\n", prefix, branch, child.flat_label()));
        write_text_branch(map, &child.id, &format!("{}{}", prefix, indent), visited, report);
    }
}

/// Nested outline. Tooltips are kept as quoted text under their node.
pub fn generate_markdown_report(map: &MindMap) -> String {
    let mut report = String::new();
    let Some(root) = map.node(ROOT_ID) else {
        return report;
    };

    report.push_str(&format!("# {}\n\n", root.flat_label()));
    if !root.tooltip.is_empty() {
        report.push_str(&format!("> {}\n\n", tooltip_as_text(&root.tooltip)));
    }

    let mut visited = HashSet::from([root.id.as_str()]);
    write_markdown_branch(map, &root.id, 0, &mut visited, &mut report);
    report
}

fn write_markdown_branch<'a>(
    map: &'a MindMap,
    id: &str,
    depth: usize,
    visited: &mut HashSet<&'a str>,
    report: &mut String,
) {
    for child in map.children(id) {
        if !visited.insert(child.id.as_str()) {
            continue;
        }
        let indent = "  ".repeat(depth);
        report.push_str(&format!("{}- {}\n", indent, child.flat_label()));
        let tooltip = tooltip_as_text(&child.tooltip);
        if !tooltip.is_empty() && tooltip != child.flat_label() {
            report.push_str(&format!("{}  > {}\n", indent, tooltip));
        }
        write_markdown_branch(map, &child.id, depth + 1, visited, report);
    }
}

fn tooltip_as_text(tooltip: &str) -> String {
    tooltip.replace("<br/>", " ").trim().to_string()
}

/// vis-network data set (`nodes`, `edges`) and options, with metadata.
pub fn generate_json_report(
    map: &MindMap,
    options: &RenderOptions,
) -> Result<String, serde_json::Error> {
    let nodes: Vec<&Node> = map.nodes().collect();
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "annomap",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
            },
            "summary": {
                "total_nodes": map.node_count(),
                "total_edges": map.edge_count(),
            },
            "nodes": nodes,
            "edges": map.edges(),
            "options": options,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// Standalone page drawing the map with vis-network.
pub fn generate_html_report(
    map: &MindMap,
    options: &RenderOptions,
) -> Result<String, serde_json::Error> {
    let nodes: Vec<&Node> = map.nodes().collect();
    let nodes_json = script_safe(&serde_json::to_string(&nodes)?);
    let edges_json = script_safe(&serde_json::to_string(&map.edges())?);
    let options_json = script_safe(&serde_json::to_string(options)?);
    let title = map
        .node(ROOT_ID)
        .map(|root| html_escape(&root.flat_label()))
        .unwrap_or_default();

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{script}"></script>
<style>
  body {{ margin: 0; font-family: sans-serif; }}
  #mindmap {{ width: 100%; height: 100vh; }}
</style>
</head>
<body>
<div id="mindmap"></div>
<script>
  const nodes = new vis.DataSet({nodes_json});
  const edges = new vis.DataSet({edges_json});
  const options = {options_json};
  new vis.Network(document.getElementById("mindmap"), {{ nodes, edges }}, options);
</script>
</body>
</html>
"#,
        title = title,
        script = VIS_NETWORK_SCRIPT,
        nodes_json = nodes_json,
        edges_json = edges_json,
        options_json = options_json,
    ))
}

/// Keeps embedded JSON from closing the surrounding script element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
