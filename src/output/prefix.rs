// src/output/prefix.rs

use std::io::{self, Write};

/// Write `chunk` to `out` with every line prefixed by `<label> | `.
///
/// Lines are split on `b'\n'` only; the bytes in between are copied
/// verbatim. A trailing newline does not produce an extra, empty prefixed
/// line, and the output always ends with exactly one `\n`.
pub fn write_prefixed<W: Write + ?Sized>(out: &mut W, chunk: &[u8], label: &str) -> io::Result<()> {
    let mut lines: Vec<&[u8]> = chunk.split(|b| *b == b'\n').collect();
    if lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    for line in lines {
        out.write_all(label.as_bytes())?;
        out.write_all(b" | ")?;
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Prefix every line of `text` with `<label> | `.
///
/// ```
/// use cmdgroup::output::prefix_lines;
///
/// assert_eq!(prefix_lines("hi", "p"), "p | hi\n");
/// assert_eq!(prefix_lines("hello\nasdf\n", "cmd"), "cmd | hello\ncmd | asdf\n");
/// ```
pub fn prefix_lines(text: &str, label: &str) -> String {
    let mut out = Vec::with_capacity(text.len() + label.len() + 4);
    // Writes into a Vec never fail.
    let _ = write_prefixed(&mut out, text.as_bytes(), label);
    // UTF-8 in, UTF-8 out: only ASCII is inserted, at line boundaries.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::{prefix_lines, write_prefixed};

    #[test]
    fn single_line() {
        assert_eq!(prefix_lines("hi", "pre-1"), "pre-1 | hi\n");
    }

    #[test]
    fn multiple_lines() {
        assert_eq!(
            prefix_lines("hello\nasdf", "shCmd"),
            "shCmd | hello\nshCmd | asdf\n"
        );
        assert_eq!(
            prefix_lines("Starting...\nWaiting...\nReady!", "launcher"),
            "launcher | Starting...\nlauncher | Waiting...\nlauncher | Ready!\n"
        );
    }

    #[test]
    fn trailing_newline_is_not_a_line() {
        assert_eq!(prefix_lines("done\n", "x"), "x | done\n");
    }

    #[test]
    fn bytes_between_newlines_are_copied_verbatim() {
        let mut out = Vec::new();
        write_prefixed(&mut out, b"\xff\xfe\n\x00ok", "bin").unwrap();
        assert_eq!(out, b"bin | \xff\xfe\nbin | \x00ok\n");
    }

    #[test]
    fn blank_lines_in_the_middle_are_kept() {
        assert_eq!(prefix_lines("a\n\nb\n", "x"), "x | a\nx | \nx | b\n");
    }
}
