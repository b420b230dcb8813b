/*!
 * Concurrent per-segment translation dispatch.
 *
 * Every non-skip segment is an independent translation call: segments share no
 * mutable state, only the read-only per-document glossary. Calls are issued
 * concurrently up to the provider's concurrency cap and the results collected
 * back into segment order, so output order never depends on completion order.
 * Skip segments resolve immediately to their own content.
 *
 * One segment exhausting its retries fails the whole document: a partially
 * translated document is never assembled.
 */

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use log::debug;

use crate::errors::TranslationError;
use crate::markdown::Segment;

use super::core::TranslationService;

/// Dispatches segment translations against a translation service
pub struct SegmentDispatcher {
    service: TranslationService,
    max_concurrent: usize,
}

impl SegmentDispatcher {
    /// Create a dispatcher around a translation service
    pub fn new(service: TranslationService) -> Self {
        let max_concurrent = service.max_concurrent_requests().max(1);
        Self { service, max_concurrent }
    }

    /// Translate all segments, returning their outputs in segment order
    pub async fn translate_segments(
        &self,
        segments: &[Segment],
        glossary: &BTreeMap<String, String>,
    ) -> Result<Vec<String>, TranslationError> {
        let total = segments.len();
        let results = stream::iter(segments.iter().enumerate())
            .map(|(index, segment)| {
                let service = self.service.clone();
                async move {
                    if segment.skip {
                        return (index, Ok(segment.content.clone()));
                    }

                    debug!("Dispatching segment {}/{}", index + 1, total);
                    let result = service.translate_text(&segment.content, glossary).await;
                    (index, result)
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        // Collect positionally: sort by segment index to restore input order
        // regardless of completion order.
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(index, _)| *index);

        let mut outputs = Vec::with_capacity(total);
        for (index, result) in sorted_results {
            match result {
                Ok(output) => outputs.push(output),
                Err(e) => {
                    debug!("Segment {} failed, aborting document: {}", index + 1, e);
                    return Err(e);
                }
            }
        }

        Ok(outputs)
    }
}
