use std::borrow::Cow;

/// Removes terminal control sequences and C0 control characters from a string.
///
/// Names scraped from third-party markdown end up in the catalogue and are
/// printed back to the terminal by the CLI, so ANSI CSI sequences
/// (`\x1b[...m`), OSC sequences (`\x1b]...\x07`), bare ESC, DEL and C0
/// controls are dropped. Tab, LF and CR are preserved.
///
/// Returns `Cow::Borrowed` when nothing needs stripping.
///
/// # Examples
///
/// ```
/// use feedatlas::util::strip_control_chars;
///
/// assert_eq!(strip_control_chars("\x1b[31mTech\x1b[0m"), "Tech");
/// assert_eq!(strip_control_chars("plain"), "plain");
/// ```
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // CSI: parameter/intermediate bytes up to a final byte in 0x40..=0x7e
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    // OSC: terminated by BEL or ST (ESC \)
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if !is_stripped_control(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

fn is_stripped_control(c: char) -> bool {
    c == '\x1b' || c == '\x7f' || (c < '\x20' && c != '\t' && c != '\n' && c != '\r')
}

/// Normalizes one markdown table cell to its plain text.
///
/// - `[text](link)` becomes `text`
/// - `<https://...>` becomes `https://...`
/// - surrounding whitespace is trimmed
///
/// Cells that are neither are returned trimmed.
pub fn plain_cell(cell: &str) -> &str {
    let cell = cell.trim();

    if let Some(rest) = cell.strip_prefix('[') {
        if let Some(close) = rest.find("](") {
            if cell.ends_with(')') {
                return rest[..close].trim();
            }
        }
    }

    if let Some(inner) = cell.strip_prefix('<').and_then(|c| c.strip_suffix('>')) {
        return inner.trim();
    }

    cell
}
