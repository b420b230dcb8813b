/*!
 * Segment reassembly.
 *
 * Segment order is the sole join key: translated and verbatim outputs are
 * concatenated in their original segment order with a single newline between
 * them. The empty skip segments produced by blank-edge peeling turn those join
 * newlines back into the blank lines the source had.
 */

/// Join segment outputs in order and trim the result
pub fn join_segments<S: AsRef<str>>(outputs: &[S]) -> String {
    outputs
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
