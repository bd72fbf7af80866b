//! Minimal CSV reading and writing (RFC 4180 quoting, CRLF tolerant).

use std::io::{self, Write};
use std::mem::take;
use thiserror::Error;

const SEP: char = ',';

/// A quoted field was still open at end of input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unterminated quoted field starting on line {line}")]
pub struct UnterminatedQuote {
    /// 1-based line where the quoted field opened.
    pub line: usize,
}

/// Parse CSV text into rows of fields.
///
/// Handles quoted fields, doubled quotes, and embedded newlines inside
/// quotes. A quote only opens a quoted field at the start of a field;
/// elsewhere it is a literal character. Blank lines are skipped. A
/// leading UTF-8 BOM is ignored.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, UnterminatedQuote> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line = 1usize;
    let mut quote_line = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\n' {
            line += 1;
        }
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if at_field_start => {
                in_quotes = true;
                quote_line = line;
                at_field_start = false;
            }
            SEP if !in_quotes => {
                row.push(take(&mut field));
                at_field_start = true;
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                    line += 1;
                }
                row.push(take(&mut field));
                push_row(&mut rows, take(&mut row));
                at_field_start = true;
            }
            _ => {
                field.push(ch);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return Err(UnterminatedQuote { line: quote_line });
    }

    // Trailing row without a final newline.
    row.push(field);
    push_row(&mut rows, row);

    Ok(rows)
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    let blank = row.len() == 1 && row[0].is_empty();
    if !blank {
        rows.push(row);
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row, quoting fields where needed.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{SEP}")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}
