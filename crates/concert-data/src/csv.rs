//! CSV Parsing
//!
//! Minimal reader for published spreadsheet exports. Handles quoted fields
//! containing commas, newlines and doubled quotes, and both `\n` and `\r\n`
//! line endings. Malformed input never fails; it degrades to whatever fields
//! the state machine can recover.

use std::collections::HashMap;

/// One data row keyed by (trimmed) header name
pub type Record = HashMap<String, String>;

/// Parse CSV text into header-keyed records.
///
/// The first row is the header. Rows shorter than the header are padded
/// with empty strings; extra trailing fields are dropped.
pub fn parse_csv(text: &str) -> Vec<Record> {
    let mut rows = parse_rows(text).into_iter();

    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    rows.map(|row| {
        header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect()
    })
    .collect()
}

/// Split CSV text into raw rows of fields, dropping blank rows.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => row.push(std::mem::take(&mut field)),
            '\n' if !in_quotes => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            '\r' if !in_quotes => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    row.push(std::mem::take(&mut field));
                    push_row(&mut rows, std::mem::take(&mut row));
                }
                // lone carriage returns are dropped
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }

    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|f| !f.trim().is_empty()) {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_keyed_rows_in_order() {
        let records = parse_csv("slug,artistName\na,First\nb,Second\nc,Third\n");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["slug"], "a");
        assert_eq!(records[1]["artistName"], "Second");
        assert_eq!(records[2]["slug"], "c");
    }

    #[test]
    fn test_quoted_field_with_comma_newline_and_quote() {
        let records = parse_csv("name,notes\nx,\"a, \"\"b\"\"\nc\"\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["notes"], "a, \"b\"\nc");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_csv("").is_empty());
        assert!(parse_rows("").is_empty());
    }

    #[test]
    fn test_header_only() {
        assert!(parse_csv("slug,date\n").is_empty());
    }

    #[test]
    fn test_trailing_blank_lines_suppressed() {
        let records = parse_csv("slug,date\na,2025-01-01\n\n");
        assert_eq!(records.len(), 1);

        let records = parse_csv("slug,date\na,2025-01-01\n  ,  \n");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let rows = parse_rows("a,b\r\n1,2\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_lone_carriage_return_dropped() {
        let rows = parse_rows("a\rb,c\n");
        assert_eq!(rows, vec![vec!["ab", "c"]]);
    }

    #[test]
    fn test_carriage_return_kept_inside_quotes() {
        let rows = parse_rows("\"a\r\nb\",c\n");
        assert_eq!(rows, vec![vec!["a\r\nb", "c"]]);
    }

    #[test]
    fn test_last_row_without_terminator() {
        let records = parse_csv("slug,date\na,2025-01-01");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["date"], "2025-01-01");
    }

    #[test]
    fn test_short_and_long_rows() {
        let records = parse_csv("a,b,c\n1\n1,2,3,4\n");
        assert_eq!(records[0]["a"], "1");
        assert_eq!(records[0]["b"], "");
        assert_eq!(records[0]["c"], "");
        assert_eq!(records[1].len(), 3);
        assert_eq!(records[1]["c"], "3");
    }

    #[test]
    fn test_only_header_names_trimmed() {
        let records = parse_csv(" slug , note \na,  spaced  \n");
        assert_eq!(records[0]["slug"], "a");
        assert_eq!(records[0]["note"], "  spaced  ");
    }

    #[test]
    fn test_unterminated_quote_is_best_effort() {
        let rows = parse_rows("a,\"b,c\nd");
        assert_eq!(rows, vec![vec!["a", "b,c\nd"]]);
    }
}
