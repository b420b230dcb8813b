/*!
 * Heading extraction and anchor re-injection.
 *
 * Anchors are derived once, from the source document, and stamped back onto
 * the translated document strictly by position. Translation is expected to
 * carry every heading through at its original level; any drift is fatal for
 * the document because a wrong anchor silently breaks every inbound link.
 */

use comrak::nodes::{AstNode, NodeValue};
use comrak::{Arena, parse_document};

use crate::errors::StructureError;

use super::blocks::comrak_options;

/// A heading recorded from the source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level, 1..=6
    pub level: u8,
    /// Anchor slug derived from the source heading text
    pub anchor: String,
}

/// A heading located in the translated body
struct LocatedHeading {
    level: u8,
    /// 1-based line of the heading text in the body
    line: usize,
    text: String,
}

/// Derive the anchor slug for a heading.
///
/// Lowercases, then collapses every run of characters outside `[a-z0-9]`
/// (underscore included) into a single hyphen and strips hyphens from both
/// ends. Multi-byte characters count as non-word and collapse away, matching
/// the anchor format of the published documentation.
pub fn anchor_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Extract the ordered heading sequence from a source body
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, body, &options);

    root.children()
        .filter_map(|node| match &node.data.borrow().value {
            NodeValue::Heading(heading) => Some(Heading {
                level: heading.level,
                anchor: anchor_slug(&collect_inline_text(node)),
            }),
            _ => None,
        })
        .collect()
}

/// Re-inject source anchors into a translated body.
///
/// The i-th translated heading receives the literal suffix ` {#anchor_i}`.
/// Injection is a line edit at the heading's source position so the translated
/// prose is otherwise untouched. Fails when the translated body has fewer
/// headings than the source recorded, or when a heading's level drifted.
pub fn inject_anchors(body: &str, headings: &[Heading]) -> Result<String, StructureError> {
    let located = locate_headings(body);

    let mut lines: Vec<String> = body.split('\n').map(str::to_string).collect();
    for (index, heading) in headings.iter().enumerate() {
        let Some(found) = located.get(index) else {
            return Err(StructureError::HeadingCountMismatch {
                index,
                expected_level: heading.level,
                anchor: heading.anchor.clone(),
                found: located.len(),
            });
        };

        if found.level != heading.level {
            return Err(StructureError::HeadingLevelMismatch {
                index,
                expected_level: heading.level,
                anchor: heading.anchor.clone(),
                found_level: found.level,
                excerpt: excerpt(&found.text),
            });
        }

        // Sourcepos lines are 1-based.
        if let Some(line) = lines.get_mut(found.line - 1) {
            line.push_str(&format!(" {{#{}}}", heading.anchor));
        }
    }

    Ok(lines.join("\n"))
}

/// Locate top-level headings in a body, in document order
fn locate_headings(body: &str) -> Vec<LocatedHeading> {
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, body, &options);

    root.children()
        .filter_map(|node| {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Heading(heading) => Some(LocatedHeading {
                    level: heading.level,
                    line: data.sourcepos.start.line,
                    text: collect_inline_text(node),
                }),
                _ => None,
            }
        })
        .collect()
}

/// Collect the plain text of a node's inline content.
///
/// Walks every inline descendant rather than assuming the first child is a
/// text node, so headings that start with emphasis, links or inline code still
/// produce their full text.
fn collect_inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    collect_inline_text_into(node, &mut text);
    text
}

fn collect_inline_text_into<'a>(node: &'a AstNode<'a>, out: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(t) => out.push_str(t),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => {}
        }
        collect_inline_text_into(child, out);
    }
}

/// Short single-line excerpt for error messages
fn excerpt(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    line.chars().take(80).collect()
}
