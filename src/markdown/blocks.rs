/*!
 * Block-level Markdown parsing and rendering.
 *
 * Documents are parsed with comrak into a flat list of top-level blocks, each
 * carrying its canonical re-rendered Markdown text and a coarse type tag. The
 * segmenter only ever reasons about this flat list; inline structure stays
 * inside the rendered text.
 */

use comrak::nodes::{AstNode, NodeValue};
use comrak::{Arena, Options, format_commonmark, parse_document};

use crate::errors::SegmentError;

/// Coarse classification of a top-level block node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// ATX or setext heading
    Heading,
    /// Ordered or unordered list
    List,
    /// Fenced or indented code block
    CodeBlock,
    /// Any other block (paragraph, table, blockquote, html, ...)
    Other,
}

/// A top-level block with its canonical Markdown rendering
#[derive(Debug, Clone)]
pub struct Block {
    /// Coarse type tag used for split and skip decisions
    pub kind: BlockKind,
    /// Canonical Markdown text of this block, single trailing newline
    pub text: String,
}

/// Comrak options shared by every parse and render in the pipeline.
/// GFM extensions are enabled so tables and task lists survive the round trip.
pub fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

/// Render a single AST node (and its subtree) back to Markdown
pub fn render_node<'a>(node: &'a AstNode<'a>) -> Result<String, SegmentError> {
    let mut output = String::new();
    let options = comrak_options();
    format_commonmark(node, &options, &mut output)
        .map_err(|e| SegmentError::Render(e.to_string()))?;
    Ok(output)
}

/// Parse a Markdown body into its ordered top-level blocks
pub fn parse_blocks(source: &str) -> Result<Vec<Block>, SegmentError> {
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut blocks = Vec::new();
    for node in root.children() {
        let kind = classify(&node.data.borrow().value);
        let text = render_node(node)?;
        blocks.push(Block { kind, text });
    }

    Ok(blocks)
}

/// Map a comrak node value to its coarse block kind
fn classify(value: &NodeValue) -> BlockKind {
    match value {
        NodeValue::Heading(_) => BlockKind::Heading,
        NodeValue::List(_) => BlockKind::List,
        NodeValue::CodeBlock(_) => BlockKind::CodeBlock,
        _ => BlockKind::Other,
    }
}

/// Join block texts into one document body.
///
/// Blocks are separated by a single blank line and the result carries one
/// trailing newline, matching what comrak itself produces when rendering the
/// blocks as a single document.
pub fn join_block_texts<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut joined = texts
        .into_iter()
        .map(|t| t.trim_end_matches('\n'))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    if !joined.is_empty() {
        joined.push('\n');
    }
    joined
}
