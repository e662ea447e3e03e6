//! Minimal CSV codec for the stay sheet.
//!
//! Records are one per physical line (CR, LF or CRLF); quoted fields may
//! contain commas and doubled quotes but not line breaks.

use thiserror::Error;

pub const LINE_ENDING: &str = "\r\n";

/// Reasons an upload is rejected as a whole.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvError {
    #[error("CSV file is empty")]
    Empty,
    #[error("CSV header is missing the \"{0}\" column")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based position among non-blank lines; the header is row 1.
    pub number: usize,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl CsvTable {
    /// Index of the column whose header equals `name`, ignoring ASCII case.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Parse CSV text. Blank lines are skipped; the first remaining line is the
/// header.
pub fn parse(text: &str) -> Result<CsvTable, CsvError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty());

    let headers = parse_line(lines.next().ok_or(CsvError::Empty)?);

    let rows = lines
        .enumerate()
        .map(|(i, line)| CsvRow {
            number: i + 2,
            fields: parse_line(line),
        })
        .collect();

    Ok(CsvTable { headers, rows })
}

/// Split one line into trimmed field values, decoding quotes.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == ',' {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Wrap a value in double quotes, doubling any embedded quote.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render one record with every value quoted.
pub fn write_row<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| quote(v.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}
