/*!
 * Token-bounded document segmentation.
 *
 * Splits a Markdown body into an ordered list of segments, each intended for
 * one remote translation call. Non-skip segments stay under the configured
 * token ceiling whenever the document structure allows it; fenced code blocks
 * and structurally indivisible over-budget leftovers become skip segments that
 * pass through the pipeline verbatim.
 *
 * The split is recursive: when greedy packing at the current structural
 * boundary still produces an over-budget segment, that segment is re-split at
 * the next boundary in the priority order (heading, then list, then every
 * block on its own). A leftover that no boundary can reduce is accepted and
 * logged rather than rejected, since the rest of the document must still make
 * forward progress.
 */

use log::warn;

use crate::errors::SegmentError;

use super::blocks::{Block, BlockKind, join_block_texts, parse_blocks};
use super::token_count::TokenCounter;

/// A contiguous span of document content, the unit of one translation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Markdown text of this segment
    pub content: String,
    /// Whether this segment bypasses translation and passes through verbatim
    pub skip: bool,
}

impl Segment {
    /// Create a segment that will be sent to the translator
    pub fn translatable(content: impl Into<String>) -> Self {
        Self { content: content.into(), skip: false }
    }

    /// Create a segment that passes through verbatim
    pub fn verbatim(content: impl Into<String>) -> Self {
        Self { content: content.into(), skip: true }
    }
}

/// Structural boundary types used as split points, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitBoundary {
    /// Split in front of headings
    Heading,
    /// Split in front of lists
    List,
}

impl SplitBoundary {
    fn matches(self, kind: BlockKind) -> bool {
        match self {
            Self::Heading => kind == BlockKind::Heading,
            Self::List => kind == BlockKind::List,
        }
    }
}

/// What to do with a segment that no split strategy can get under the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversizePolicy {
    /// Log a warning and emit the segment as a verbatim skip segment
    #[default]
    WarnAndPass,
    /// Fail segmentation of the whole document
    Fail,
}

/// Segmenter configuration
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Maximum token budget per translatable segment
    pub max_tokens: usize,
    /// Boundary types tried in order when a segment is over budget
    pub split_priority: Vec<SplitBoundary>,
    /// Policy for segments that stay over budget after every strategy
    pub on_oversize: OversizePolicy,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            split_priority: vec![SplitBoundary::Heading, SplitBoundary::List],
            on_oversize: OversizePolicy::WarnAndPass,
        }
    }
}

/// Intermediate grouping of consecutive blocks sharing skip status
struct NodeGroup {
    skip: bool,
    blocks: Vec<Block>,
}

/// The recursive token-bounded segmenter
pub struct Segmenter {
    counter: TokenCounter,
    options: SegmentOptions,
}

impl Segmenter {
    /// Create a segmenter with the given counter and options
    pub fn new(counter: TokenCounter, options: SegmentOptions) -> Self {
        Self { counter, options }
    }

    /// Split a Markdown body into ordered segments.
    ///
    /// Concatenating all segment contents with a single newline between them
    /// and trimming reproduces a document structurally equivalent to the
    /// input.
    pub fn segment(&self, body: &str) -> Result<Vec<Segment>, SegmentError> {
        let segments = self.split_at_depth(body, 0)?;

        // Peel leading/trailing newline runs off translatable segments into
        // empty skip segments. The remote call is assumed to collapse blank
        // lines around the text it returns; the empty segments restore them
        // through the newline join.
        let mut peeled = Vec::with_capacity(segments.len());
        for segment in segments {
            peel_blank_edges(segment, &mut peeled);
        }
        Ok(peeled)
    }

    /// One level of the recursive split, using the boundary at `depth` in the
    /// priority order. Depth beyond the priority list means every block is its
    /// own group and over-budget leftovers can no longer be subdivided.
    fn split_at_depth(&self, content: &str, depth: usize) -> Result<Vec<Segment>, SegmentError> {
        if self.counter.count(content) < self.options.max_tokens {
            return Ok(vec![Segment::translatable(content)]);
        }

        let boundary = self.options.split_priority.get(depth).copied();
        let blocks = parse_blocks(content)?;

        // Partition top-level blocks into groups of shared skip status, with
        // boundary blocks seeding new groups.
        let mut groups: Vec<NodeGroup> = Vec::new();
        let mut pending: Vec<Block> = Vec::new();
        for block in blocks {
            if block.kind == BlockKind::CodeBlock {
                if !pending.is_empty() {
                    groups.push(NodeGroup { skip: false, blocks: std::mem::take(&mut pending) });
                }
                groups.push(NodeGroup { skip: true, blocks: vec![block] });
                continue;
            }

            let is_boundary = boundary.is_none_or(|b| b.matches(block.kind));
            if is_boundary && !pending.is_empty() {
                groups.push(NodeGroup { skip: false, blocks: std::mem::take(&mut pending) });
            }
            pending.push(block);
        }
        if !pending.is_empty() {
            groups.push(NodeGroup { skip: false, blocks: pending });
        }

        // Greedily pack consecutive non-skip groups while the projected merged
        // rendering stays under the ceiling.
        let mut output: Vec<Segment> = Vec::new();
        let mut accumulated: Vec<Block> = Vec::new();
        for group in groups {
            if group.skip {
                self.flush_accumulated(&mut accumulated, depth, boundary, &mut output)?;
                output.push(Segment::verbatim(join_block_texts(
                    group.blocks.iter().map(|b| b.text.as_str()),
                )));
                continue;
            }

            if !accumulated.is_empty() {
                let projected = join_block_texts(
                    accumulated.iter().chain(group.blocks.iter()).map(|b| b.text.as_str()),
                );
                if self.counter.count(&projected) > self.options.max_tokens {
                    self.flush_accumulated(&mut accumulated, depth, boundary, &mut output)?;
                }
            }
            accumulated.extend(group.blocks);
        }
        self.flush_accumulated(&mut accumulated, depth, boundary, &mut output)?;

        Ok(output)
    }

    /// Flush the packing accumulator as one segment, recursing with the next
    /// split boundary when the flushed segment is still over budget.
    fn flush_accumulated(
        &self,
        accumulated: &mut Vec<Block>,
        depth: usize,
        boundary: Option<SplitBoundary>,
        output: &mut Vec<Segment>,
    ) -> Result<(), SegmentError> {
        if accumulated.is_empty() {
            return Ok(());
        }

        let content = join_block_texts(accumulated.iter().map(|b| b.text.as_str()));
        accumulated.clear();

        let tokens = self.counter.count(&content);
        if tokens > self.options.max_tokens {
            if boundary.is_some() {
                output.extend(self.split_at_depth(&content, depth + 1)?);
                return Ok(());
            }

            // No split strategy left. The ceiling is advisory for content
            // that cannot be structurally subdivided.
            let excerpt: String = content.chars().take(100).collect();
            match self.options.on_oversize {
                OversizePolicy::WarnAndPass => {
                    warn!(
                        "Segment of {} tokens exceeds ceiling of {}, passing through verbatim: {}...",
                        tokens, self.options.max_tokens, excerpt
                    );
                    output.push(Segment::verbatim(content));
                    return Ok(());
                }
                OversizePolicy::Fail => {
                    return Err(SegmentError::Oversize {
                        tokens,
                        ceiling: self.options.max_tokens,
                        excerpt,
                    });
                }
            }
        }

        output.push(Segment::translatable(content));
        Ok(())
    }
}

/// Split the leading and trailing newline runs of a translatable segment into
/// empty skip segments, one per newline, so that the final newline join puts
/// the exact whitespace back.
fn peel_blank_edges(segment: Segment, output: &mut Vec<Segment>) {
    if segment.skip {
        output.push(segment);
        return;
    }

    let content = segment.content;
    let core_start = content.len() - content.trim_start_matches('\n').len();
    let core = content[core_start..].trim_end_matches('\n');
    let leading = core_start;
    let trailing = content.len() - core_start - core.len();

    if leading == 0 && trailing == 0 {
        output.push(Segment::translatable(content));
        return;
    }

    for _ in 0..leading {
        output.push(Segment::verbatim(""));
    }
    if !core.is_empty() {
        output.push(Segment::translatable(core));
    }
    for _ in 0..trailing {
        output.push(Segment::verbatim(""));
    }
}
