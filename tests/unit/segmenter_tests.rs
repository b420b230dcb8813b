/*!
 * Segmenter behavior tests: reassembly fidelity, ceiling enforcement, code
 * block isolation and the handling of structurally indivisible content.
 */

use mdxlate::errors::SegmentError;
use mdxlate::markdown::{OversizePolicy, Segment, SegmentOptions, Segmenter, TokenCounter};

fn segmenter(max_tokens: usize) -> Segmenter {
    Segmenter::new(
        TokenCounter::new().expect("Failed to build token counter"),
        SegmentOptions { max_tokens, ..SegmentOptions::default() },
    )
}

fn strict_segmenter(max_tokens: usize) -> Segmenter {
    Segmenter::new(
        TokenCounter::new().expect("Failed to build token counter"),
        SegmentOptions {
            max_tokens,
            on_oversize: OversizePolicy::Fail,
            ..SegmentOptions::default()
        },
    )
}

fn join(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// A document in canonical CommonMark form, large enough to force splitting
/// at small ceilings.
fn sectioned_document() -> String {
    let mut body = String::new();
    for i in 1..=6 {
        body.push_str(&format!(
            "## Section number {i}\n\nThis section carries a couple of sentences of ordinary \
prose so that every part of the document contributes a meaningful number of tokens to the \
total count.\n\n"
        ));
    }
    body.trim_end().to_string() + "\n"
}

#[test]
fn split_document_reassembles_to_the_source() {
    let body = sectioned_document();
    let segments = segmenter(60).segment(&body).unwrap();

    assert!(
        segments.iter().filter(|s| !s.skip).count() > 1,
        "ceiling of 60 should force a split"
    );
    assert_eq!(join(&segments), body.trim_end());
}

#[test]
fn translatable_segments_stay_under_the_ceiling() {
    let body = sectioned_document();
    let counter = TokenCounter::new().unwrap();
    let ceiling = 60;

    let segments = segmenter(ceiling).segment(&body).unwrap();
    for segment in segments.iter().filter(|s| !s.skip) {
        assert!(
            counter.count(&segment.content) <= ceiling,
            "segment exceeded ceiling: {:?}",
            segment.content
        );
    }
}

#[test]
fn segments_preserve_document_order() {
    let body = sectioned_document();
    let segments = segmenter(60).segment(&body).unwrap();

    let positions: Vec<usize> = (1..=6)
        .map(|i| {
            let marker = format!("## Section number {i}");
            segments
                .iter()
                .position(|s| s.content.contains(&marker))
                .unwrap_or_else(|| panic!("section {i} missing from segments"))
        })
        .collect();

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn code_fences_are_never_split_or_translated() {
    let mut body = String::from("# Build instructions\n\n");
    body.push_str(
        "The build is driven by a shell script reproduced below in full, \
followed by a discussion of each step that pads the document well past a small ceiling.\n\n",
    );
    body.push_str("```bash\n");
    for i in 0..40 {
        body.push_str(&format!("make step-{i}\n"));
    }
    body.push_str("```\n\n# Discussion\n\nEvery step above is idempotent and safe to rerun.\n");

    let segments = segmenter(50).segment(&body).unwrap();

    let fences: Vec<&Segment> = segments.iter().filter(|s| s.content.contains("```")).collect();
    assert_eq!(fences.len(), 1, "the fence must live in exactly one segment");
    assert!(fences[0].skip, "the fenced block must be a skip segment");
    assert!(fences[0].content.contains("make step-0"));
    assert!(fences[0].content.contains("make step-39"));
}

#[test]
fn indivisible_oversized_list_passes_through_verbatim() {
    let mut body = String::new();
    for i in 0..500 {
        body.push_str(&format!("- item number {i} with a few extra words\n"));
    }

    let segments = segmenter(50).segment(&body).unwrap();

    assert_eq!(segments.len(), 1);
    assert!(segments[0].skip);
    assert!(segments[0].content.contains("item number 0"));
    assert!(segments[0].content.contains("item number 499"));
}

#[test]
fn strict_policy_rejects_indivisible_oversized_content() {
    let mut body = String::new();
    for i in 0..500 {
        body.push_str(&format!("- item number {i} with a few extra words\n"));
    }

    let err = strict_segmenter(50).segment(&body).unwrap_err();
    match err {
        SegmentError::Oversize { tokens, ceiling, .. } => {
            assert!(tokens > ceiling);
            assert_eq!(ceiling, 50);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blank_edges_become_empty_skip_segments() {
    let body = "# Short document\n\nOne sentence.\n";
    let segments = segmenter(10_000).segment(body).unwrap();

    // The trailing newline peels into an empty skip segment so the newline
    // join puts it back.
    assert_eq!(
        segments,
        vec![
            Segment::translatable("# Short document\n\nOne sentence."),
            Segment::verbatim(""),
        ]
    );
    assert_eq!(
        segments.iter().map(|s| s.content.as_str()).collect::<Vec<_>>().join("\n"),
        body
    );
}
