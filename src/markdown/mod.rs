/*!
 * Markdown structural processing.
 *
 * This module contains the document-side half of the pipeline, everything that
 * happens before and after the remote translation calls:
 *
 * - `blocks`: parsing a body into typed top-level blocks and rendering them back
 * - `token_count`: token counting under the fixed tokenizer model
 * - `segment`: the recursive token-bounded segmenter
 * - `headings`: heading extraction and positional anchor re-injection
 * - `front_matter`: front matter split and restore
 * - `reassemble`: joining translated segment outputs back into one document
 */

// Re-export main types for easier usage
pub use self::headings::Heading;
pub use self::segment::{OversizePolicy, Segment, SegmentOptions, Segmenter, SplitBoundary};
pub use self::token_count::TokenCounter;

// Submodules
pub mod blocks;
pub mod front_matter;
pub mod headings;
pub mod reassemble;
pub mod segment;
pub mod token_count;
