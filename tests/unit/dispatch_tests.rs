/*!
 * Segment dispatch tests: concurrent translation with positional reassembly,
 * skip segment passthrough and the bounded retry budget.
 */

use std::collections::BTreeMap;

use mdxlate::errors::TranslationError;
use mdxlate::markdown::Segment;
use mdxlate::providers::mock::MockProvider;
use mdxlate::translation::{ProviderClient, SegmentDispatcher, TranslationService};

use crate::common;

fn glossary() -> BTreeMap<String, String> {
    BTreeMap::new()
}

#[tokio::test]
async fn outputs_come_back_in_segment_order() {
    // A slow provider makes completion order diverge from dispatch order.
    let dispatcher = SegmentDispatcher::new(common::service_with(MockProvider::slow(10)));

    let segments: Vec<Segment> = (0..8)
        .map(|i| Segment::translatable(format!("paragraph number {i}")))
        .collect();

    let outputs = dispatcher.translate_segments(&segments, &glossary()).await.unwrap();

    let expected: Vec<String> = segments.iter().map(|s| s.content.clone()).collect();
    assert_eq!(outputs, expected);
}

#[tokio::test]
async fn skip_segments_bypass_the_provider() {
    // With a provider that always fails, success proves skip segments were
    // never dispatched.
    let dispatcher = SegmentDispatcher::new(common::service_with(MockProvider::failing()));

    let segments = vec![
        Segment::verbatim("```\ncode\n```\n"),
        Segment::verbatim(""),
        Segment::verbatim("over-budget leftover"),
    ];

    let outputs = dispatcher.translate_segments(&segments, &glossary()).await.unwrap();
    assert_eq!(outputs, vec!["```\ncode\n```\n", "", "over-budget leftover"]);
}

#[tokio::test]
async fn transient_failures_are_retried() {
    // The second request fails once; its retry succeeds within the budget.
    let dispatcher = SegmentDispatcher::new(common::service_with(MockProvider::intermittent(2)));

    let segments = vec![
        Segment::translatable("first paragraph"),
        Segment::translatable("second paragraph"),
    ];

    let outputs = dispatcher.translate_segments(&segments, &glossary()).await.unwrap();
    assert_eq!(outputs, vec!["first paragraph", "second paragraph"]);
}

#[tokio::test]
async fn exhausted_retries_fail_the_document() {
    let service = TranslationService::with_client(
        ProviderClient::Mock(MockProvider::failing()),
        2,
        1,
    );
    let dispatcher = SegmentDispatcher::new(service);

    let segments = vec![
        Segment::translatable("will never translate"),
        Segment::verbatim("unaffected skip segment"),
    ];

    let err = dispatcher.translate_segments(&segments, &glossary()).await.unwrap_err();
    match err {
        TranslationError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 2),
        other => panic!("unexpected error: {other}"),
    }
}
