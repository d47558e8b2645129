// The fixed starter sections every mind map begins with

use crate::model::{Level, MindMap, Node, Result};

pub const ROOT_ID: &str = "#t";
pub const ROOT_PLACEHOLDER: &str = "Title \n subtitle";
pub const ROOT_LEVEL: Level = 1;
pub const SECTION_LEVEL: Level = 2;

/// Unstructured notes and bare highlights land here.
pub const HIGHLIGHTS_ID: &str = "#h";

/// Section ids and labels, in display order.
pub const SECTIONS: [(&str, &str); 10] = [
    ("#b", "Background"),
    ("#o", "Objectives"),
    ("#m", "Methods"),
    ("#r", "Results"),
    ("#c", "Conclusions"),
    ("#q", "Questions / Comments"),
    (HIGHLIGHTS_ID, "Highlights"),
    ("#k", "Key Messages"),
    ("#crossref", "crossref"),
    ("#todo", "To Do"),
];

pub fn is_section(id: &str) -> bool {
    SECTIONS.iter().any(|(section, _)| *section == id)
}

/// Builds a map holding only the root and its ten sections.
pub fn mind_map_skeleton() -> Result<MindMap> {
    let mut map = MindMap::new();
    map.add_node(Node::new(ROOT_ID, ROOT_PLACEHOLDER, "", ROOT_LEVEL))?;
    for (id, label) in SECTIONS {
        map.add_child(ROOT_ID, Node::new(id, label, "", SECTION_LEVEL))?;
    }
    Ok(map)
}
