// Report assembly: skeleton, root metadata, annotations, coloring, pruning

use crate::hierarchy::{HierarchyBuilder, IdGenerator, TOOLTIP_BREAK, TOOLTIP_WIDTH};
use crate::model::{Level, MindMap, Result};
use crate::skeleton::{ROOT_ID, ROOT_LEVEL, SECTIONS, mind_map_skeleton};
use crate::wrap::wrap_text;
use annomap_client::{Annotation, Reference};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const AUTHORS_PREFIX_CHARS: usize = 20;
pub const TITLE_WIDTH: usize = 35;

/// Display color for a level. Levels above 7 stay uncolored.
pub fn level_color(level: Level) -> Option<&'static str> {
    match level {
        0 | 1 => Some("#7BE141"),
        2 => Some("#FFA807"),
        3 => Some("#97C2FC"),
        4 => Some("#FFFF00"),
        5 => Some("#FB7E81"),
        6 => Some("violet"),
        7 => Some("#C2FABC"),
        _ => None,
    }
}

/// Root label: author prefix, year, then the wrapped title.
pub fn root_label(reference: &Reference) -> String {
    let authors: String = reference
        .authors_text()
        .chars()
        .take(AUTHORS_PREFIX_CHARS)
        .collect();
    format!(
        "{} ({})\n\n{}",
        authors,
        reference.published_year_text(),
        wrap_text(Some(reference.title_text()), TITLE_WIDTH, "\n", None)
    )
}

pub fn root_tooltip(reference: &Reference) -> String {
    wrap_text(
        Some(reference.abstract_text()),
        TOOLTIP_WIDTH,
        TOOLTIP_BREAK,
        None,
    )
}

/// Static layout settings handed to the renderer along with the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub auto_resize: bool,
    pub height: String,
    pub nodes: NodeOptions,
    pub edges: EdgeOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOptions {
    pub shape: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeOptions {
    pub smooth: SmoothOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothOptions {
    pub roundness: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            auto_resize: true,
            height: "calc(100vh - 75px)".to_string(),
            nodes: NodeOptions {
                shape: "box".to_string(),
            },
            edges: EdgeOptions {
                smooth: SmoothOptions { roundness: 1.0 },
            },
        }
    }
}

/// Builds the finished mind map for one reference.
pub struct ReportAssembler<I: IdGenerator> {
    builder: HierarchyBuilder<I>,
}

impl<I: IdGenerator> ReportAssembler<I> {
    pub fn new(ids: I) -> Self {
        Self {
            builder: HierarchyBuilder::new(ids),
        }
    }

    pub fn assemble(&mut self, reference: &Reference, notes: &[Annotation]) -> Result<MindMap> {
        let mut map = mind_map_skeleton()?;

        if let Some(root) = map.node_mut(ROOT_ID) {
            root.label = root_label(reference);
            root.tooltip = root_tooltip(reference);
            root.level = ROOT_LEVEL;
        }

        for note in notes {
            let added = self.builder.merge(&mut map, note)?;
            debug!("Annotation {:?} added {} node(s)", note.id, added);
        }

        apply_level_colors(&mut map);
        let pruned = prune_empty_sections(&mut map);

        info!(
            "Assembled mind map: {} notes, {} nodes, {} edges, {} empty sections pruned",
            notes.len(),
            map.node_count(),
            map.edge_count(),
            pruned
        );
        Ok(map)
    }
}

pub fn apply_level_colors(map: &mut MindMap) {
    for node in map.nodes_mut() {
        if let Some(color) = level_color(node.level) {
            node.color = Some(color.to_string());
        }
    }
}

/// Removes skeleton sections that received no children. Returns how many
/// were removed.
pub fn prune_empty_sections(map: &mut MindMap) -> usize {
    let empty: Vec<&str> = SECTIONS
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| !map.has_outgoing(id))
        .collect();

    empty
        .into_iter()
        .filter(|id| map.remove_node(id).is_some())
        .count()
}
