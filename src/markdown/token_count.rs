/*!
 * Token counting under the fixed tokenizer model.
 *
 * The segmenter calls this once per candidate join, so counting has to be
 * cheap. The cl100k_base BPE table is built once and shared behind an Arc;
 * `CoreBPE` encoding is reentrant and takes `&self`, so no per-call
 * acquire/release is needed and the counter is never held across an await.
 */

use std::sync::Arc;

use anyhow::{Context, Result};
use tiktoken_rs::{CoreBPE, cl100k_base};

/// Shared token counter for the cl100k_base encoding
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
}

impl TokenCounter {
    /// Build the counter, loading the embedded cl100k_base table
    pub fn new() -> Result<Self> {
        let bpe = cl100k_base().context("Failed to initialize cl100k_base tokenizer")?;
        Ok(Self { bpe: Arc::new(bpe) })
    }

    /// Count the tokens a span of text would consume
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}
