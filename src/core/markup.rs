//! Inline answer markup.
//!
//! Answers arrive as plain narrative text with two kinds of inline
//! emphasis: `**strong**` and `*emphasis*`. [`format_answer`] turns that
//! text into a flat sequence of [`StyledRun`]s which renderers draw as
//! literal text, so nothing in an answer is ever interpreted as structure
//! beyond these two delimiters.
//!
//! ```
//! use lexi::core::markup::{format_answer, StyledRun};
//!
//! let runs = format_answer("**a** and *b*");
//! assert_eq!(
//!     runs,
//!     vec![
//!         StyledRun::strong("a"),
//!         StyledRun::plain(" and "),
//!         StyledRun::emphasis("b"),
//!     ]
//! );
//! ```

const STRONG_DELIMITER: &str = "**";
const EMPHASIS_DELIMITER: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    Plain,
    Strong,
    Emphasis,
}

/// A contiguous span of answer text rendered with a single style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyledRun {
    pub kind: RunKind,
    pub text: String,
}

impl StyledRun {
    pub fn new(kind: RunKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(RunKind::Plain, text)
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self::new(RunKind::Strong, text)
    }

    pub fn emphasis(text: impl Into<String>) -> Self {
        Self::new(RunKind::Emphasis, text)
    }
}

/// Output of one delimiter pass.
enum Segment<'a> {
    /// Text outside any matched pair, still open to later passes.
    Residual(&'a str),
    /// Content between a matched pair of delimiters.
    Matched(&'a str),
    /// A delimiter with no partner, kept verbatim.
    Unpaired(&'a str),
}

/// Convert raw answer markup into styled runs.
///
/// Strong spans are resolved first; emphasis is then matched only inside
/// the text left over between them. A delimiter without a partner on the
/// same line stays in the output as plain text. Adjacent plain runs are
/// merged, and matched spans with no content produce nothing.
pub fn format_answer(raw: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    for segment in split_delimited(raw, STRONG_DELIMITER) {
        match segment {
            Segment::Matched(text) => push_run(&mut runs, RunKind::Strong, text),
            Segment::Unpaired(text) => push_run(&mut runs, RunKind::Plain, text),
            Segment::Residual(text) => {
                for inner in split_delimited(text, EMPHASIS_DELIMITER) {
                    match inner {
                        Segment::Matched(text) => push_run(&mut runs, RunKind::Emphasis, text),
                        Segment::Unpaired(text) | Segment::Residual(text) => {
                            push_run(&mut runs, RunKind::Plain, text)
                        }
                    }
                }
            }
        }
    }
    runs
}

/// Split `text` on nearest pairs of `delimiter`, left to right.
///
/// Pairs never span a line break.
fn split_delimited<'a>(text: &'a str, delimiter: &str) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(delimiter) {
        let open = cursor + found;
        let content_start = open + delimiter.len();
        let line_end = text[content_start..]
            .find(['\n', '\r'])
            .map_or(text.len(), |offset| content_start + offset);

        if open > cursor {
            segments.push(Segment::Residual(&text[cursor..open]));
        }

        match text[content_start..line_end].find(delimiter) {
            Some(offset) => {
                let close = content_start + offset;
                segments.push(Segment::Matched(&text[content_start..close]));
                cursor = close + delimiter.len();
            }
            None => {
                segments.push(Segment::Unpaired(&text[open..content_start]));
                cursor = content_start;
            }
        }
    }

    if cursor < text.len() {
        segments.push(Segment::Residual(&text[cursor..]));
    }
    segments
}

fn push_run(runs: &mut Vec<StyledRun>, kind: RunKind, text: &str) {
    if text.is_empty() {
        return;
    }
    if kind == RunKind::Plain {
        if let Some(last) = runs.last_mut() {
            if last.kind == RunKind::Plain {
                last.text.push_str(text);
                return;
            }
        }
    }
    runs.push(StyledRun::new(kind, text));
}
