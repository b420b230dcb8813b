/*!
 * Front matter split and restore.
 *
 * Front matter is a literal block delimited by `---` lines at the very start
 * of a document. It is captured verbatim before any other processing and
 * prepended unchanged to the output; it is never tokenized, segmented or
 * translated.
 */

const DELIMITER: &str = "---";

/// Split an optional front matter block off the start of a document.
///
/// Returns the captured front matter (delimiters included, trailing newline
/// kept) and the remaining body. A document that does not open with a `---`
/// line, or whose opening delimiter is never closed, has no front matter.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let mut offset = 0;
    let mut state = State::BeforeOpen;

    for line in text.split_inclusive('\n') {
        match state {
            State::BeforeOpen => {
                if line.trim_end_matches(['\r', '\n']) != DELIMITER {
                    return (None, text);
                }
                state = State::Inside;
            }
            State::Inside => {
                if line.trim_end_matches(['\r', '\n']) == DELIMITER {
                    let end = offset + line.len();
                    return (Some(&text[..end]), &text[end..]);
                }
            }
        }
        offset += line.len();
    }

    (None, text)
}

enum State {
    BeforeOpen,
    Inside,
}

/// Restore captured front matter to the top of a finished body.
///
/// A single blank line separates the front matter from the body, matching the
/// source layout where the closing delimiter line is followed by one empty
/// line before the first block.
pub fn prepend_front_matter(body: &str, front_matter: Option<&str>) -> String {
    match front_matter {
        Some(front) => format!("{front}\n{body}"),
        None => body.to_string(),
    }
}
