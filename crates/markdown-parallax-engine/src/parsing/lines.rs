use xi_rope::Rope;

/// A single document line with its 1-indexed number and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef<'a> {
    /// 1-indexed line number.
    pub number: usize,
    /// Byte offset of the first character of the line.
    pub offset: usize,
    /// Line text without its terminator (`\n` or `\r\n`).
    pub text: std::borrow::Cow<'a, str>,
}

/// Splits `text` into lines on `\n`, dropping a `\r` that precedes it.
///
/// An empty string is one empty line, and a trailing terminator produces a
/// trailing empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = LineRef<'_>> + '_ {
    let mut offset = 0usize;
    text.split('\n').enumerate().map(move |(i, raw)| {
        let start = offset;
        offset += raw.len() + 1;
        LineRef {
            number: i + 1,
            offset: start,
            text: raw.strip_suffix('\r').unwrap_or(raw).into(),
        }
    })
}

/// Lines of a rope, numbered the same way as [`split_lines`].
///
/// `lines_raw` keeps newline characters, which gives us byte offsets and
/// tells us whether a trailing empty line needs to be synthesised.
pub fn lines_with_spans(rope: &Rope) -> Vec<LineRef<'static>> {
    let mut offset = 0usize;
    let mut ends_open = true;
    let mut out: Vec<LineRef<'static>> = Vec::new();

    for line in rope.lines_raw(..) {
        let start = offset;
        offset += line.len();
        ends_open = line.ends_with('\n');
        let text = line.strip_suffix('\n').unwrap_or(&*line);
        let text = text.strip_suffix('\r').unwrap_or(text);
        out.push(LineRef {
            number: out.len() + 1,
            offset: start,
            text: text.to_string().into(),
        });
    }

    if ends_open {
        out.push(LineRef {
            number: out.len() + 1,
            offset: rope.len(),
            text: String::new().into(),
        });
    }
    out
}
