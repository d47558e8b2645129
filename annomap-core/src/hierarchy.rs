//! Turns hashtag-structured annotation comments into mind map branches.
//!
//! A comment such as `#Methods ##sampling ###too small` is read as a path:
//! the number of consecutive `#` characters before a piece of text is its
//! nesting level. Each annotation is merged into the shared [`MindMap`]:
//! a token that names an existing node (by section id, e.g. `#m`, or by
//! label) reuses that node, anything else becomes a new node. The annotation's
//! highlighted passage is attached as a leaf wherever a branch ends on an
//! existing node, and under the last token of the comment.

use crate::model::{Level, MindMap, Node, Result};
use crate::skeleton::{HIGHLIGHTS_ID, ROOT_ID};
use crate::wrap::wrap_text;
use annomap_client::Annotation;
use tracing::debug;

pub const MARKER: char = '#';

pub const LABEL_WIDTH: usize = 30;
pub const TOOLTIP_WIDTH: usize = 50;
pub const TOOLTIP_BREAK: &str = "<br/>";
pub const HIGHLIGHT_TRUNCATE: usize = 80;
/// Level of leaves filed directly under a skeleton section.
pub const SECTION_LEAF_LEVEL: Level = 3;

/// Source of ids for generated nodes.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Counter based ids: `n1`, `n2`, ...
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    issued: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("n{}", self.issued)
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub level: Level,
}

/// Splits a comment into `(text, level)` tokens.
///
/// Every run of `#` is paired with the text that follows it up to the next
/// `#`. Text is trimmed; empty text is dropped along with its run. Text
/// before the first `#` counts as level 1.
pub fn tokenize(comment: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut level: Level = 1;
    let mut rest = comment;

    loop {
        let text_end = rest.find(MARKER).unwrap_or(rest.len());
        let text = rest[..text_end].trim();
        if !text.is_empty() {
            tokens.push(Token {
                text: text.to_string(),
                level,
            });
        }

        rest = &rest[text_end..];
        if rest.is_empty() {
            break;
        }

        let run = rest.find(|c| c != MARKER).unwrap_or(rest.len());
        level = run as Level;
        rest = &rest[run..];
    }

    tokens
}

/// How a token relates to the one after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The next token is nested below this one.
    DirectChild,
    /// The next token is shallower; this one closes its branch.
    Ascend,
    /// The next token sits at the same level.
    Sibling,
    /// Last token of the comment.
    Terminal,
}

impl Relation {
    pub fn between(current: Level, next: Option<Level>) -> Self {
        match next {
            None => Relation::Terminal,
            Some(next) if next > current => Relation::DirectChild,
            Some(next) if next < current => Relation::Ascend,
            Some(_) => Relation::Sibling,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Id,
    Label,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMatch {
    pub id: String,
    pub level: Level,
    pub kind: MatchKind,
}

/// Looks a token up among existing nodes. An id match (`"#" + text`) wins
/// over a label match.
pub fn find_match(map: &MindMap, text: &str) -> Option<NodeMatch> {
    let by_id = map
        .node(&format!("{}{}", MARKER, text))
        .map(|node| (node, MatchKind::Id));
    by_id
        .or_else(|| map.find_by_label(text).map(|node| (node, MatchKind::Label)))
        .map(|(node, kind)| NodeMatch {
            id: node.id.clone(),
            level: node.level,
            kind,
        })
}

/// Path from the root to the current token's parent. Never empty.
#[derive(Debug)]
struct ParentStack(Vec<String>);

impl ParentStack {
    fn new() -> Self {
        Self(vec![ROOT_ID.to_string()])
    }

    fn top(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or(ROOT_ID)
    }

    fn push(&mut self, id: &str) {
        self.0.push(id.to_string());
    }

    /// Drops back to the parent of a token at `level`.
    fn unwind_to(&mut self, level: Level) {
        let depth = (level as usize).max(1);
        self.0.truncate(depth);
    }
}

/// Merges annotations, one at a time, into a mind map.
pub struct HierarchyBuilder<I: IdGenerator> {
    ids: I,
}

impl<I: IdGenerator> HierarchyBuilder<I> {
    pub fn new(ids: I) -> Self {
        Self { ids }
    }

    /// Merges one annotation and returns how many nodes were added.
    pub fn merge(&mut self, map: &mut MindMap, note: &Annotation) -> Result<usize> {
        let before = map.node_count();
        let highlight = note.highlight();

        match note.comment_text() {
            None => {
                debug!("No comment, filing highlight under {}", HIGHLIGHTS_ID);
                self.add_highlight_leaf(map, HIGHLIGHTS_ID, highlight, SECTION_LEAF_LEVEL)?;
            }
            Some(comment) if !comment.contains(MARKER) => {
                debug!("Unstructured comment, filing under {}", HIGHLIGHTS_ID);
                let node = Node::new(
                    self.fresh_id(map),
                    wrap_text(Some(comment), LABEL_WIDTH, "\n", None),
                    tooltip_for(highlight),
                    SECTION_LEAF_LEVEL,
                );
                map.add_child(HIGHLIGHTS_ID, node)?;
            }
            Some(comment) => {
                let tokens = tokenize(comment);
                debug!(
                    "Tokenized {:?} into levels {:?}",
                    comment,
                    tokens.iter().map(|t| t.level).collect::<Vec<_>>()
                );
                if tokens.is_empty() {
                    self.add_highlight_leaf(map, HIGHLIGHTS_ID, highlight, SECTION_LEAF_LEVEL)?;
                } else {
                    self.merge_tokens(map, &tokens, highlight)?;
                }
            }
        }

        Ok(map.node_count() - before)
    }

    fn merge_tokens(
        &mut self,
        map: &mut MindMap,
        tokens: &[Token],
        highlight: Option<&str>,
    ) -> Result<()> {
        let mut parents = ParentStack::new();

        for (i, token) in tokens.iter().enumerate() {
            let next_level = tokens.get(i + 1).map(|t| t.level);
            let relation = Relation::between(token.level, next_level);

            match find_match(map, &token.text) {
                Some(found) => {
                    debug!(
                        "Token {:?} matches {} by {:?} ({:?})",
                        token.text, found.id, found.kind, relation
                    );
                    match relation {
                        Relation::DirectChild => parents.push(&found.id),
                        Relation::Ascend => {
                            if let Some(next) = next_level {
                                parents.unwind_to(next);
                            }
                        }
                        Relation::Sibling | Relation::Terminal => {}
                    }
                    if relation != Relation::DirectChild {
                        self.add_highlight_leaf(map, &found.id, highlight, found.level + 1)?;
                    }
                }
                None => {
                    let id = self.fresh_id(map);
                    let level = token.level + 1;
                    let parent = parents.top().to_string();
                    debug!(
                        "Token {:?} is new, adding {} under {} at level {} ({:?})",
                        token.text, id, parent, level, relation
                    );
                    let node = Node::new(
                        id.clone(),
                        wrap_text(Some(&token.text), LABEL_WIDTH, "\n", None),
                        tooltip_for(highlight),
                        level,
                    );
                    map.add_child(&parent, node)?;

                    match relation {
                        Relation::DirectChild => parents.push(&id),
                        Relation::Ascend => {
                            if let Some(next) = next_level {
                                parents.unwind_to(next);
                            }
                        }
                        Relation::Sibling => {}
                        Relation::Terminal => {
                            self.add_highlight_leaf(map, &id, highlight, level + 1)?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn add_highlight_leaf(
        &mut self,
        map: &mut MindMap,
        parent: &str,
        highlight: Option<&str>,
        level: Level,
    ) -> Result<()> {
        let node = Node::new(
            self.fresh_id(map),
            wrap_text(highlight, LABEL_WIDTH, "\n", Some(HIGHLIGHT_TRUNCATE)),
            tooltip_for(highlight),
            level,
        );
        map.add_child(parent, node)
    }

    fn fresh_id(&mut self, map: &MindMap) -> String {
        loop {
            let id = self.ids.next_id();
            if !map.contains(&id) {
                return id;
            }
        }
    }
}

fn tooltip_for(highlight: Option<&str>) -> String {
    wrap_text(highlight, TOOLTIP_WIDTH, TOOLTIP_BREAK, None)
}
