use std::collections::HashMap;
use thiserror::Error;

use crate::models::keyword::Keyword;

/// The seven column names a keyword CSV must carry. Matching is
/// case-insensitive and order-independent; extra columns are ignored.
pub const REQUIRED_HEADERS: [&str; 7] = [
    "Japanese",
    "English",
    "Japanese Audio URL",
    "English Audio URL",
    "Japanese Sentence",
    "English Sentence",
    "Japanese Sentence Audio URL",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("CSV file is empty")]
    Empty,
    #[error("CSV is missing required column(s): {}", .0.join(", "))]
    MissingHeaders(Vec<String>),
    #[error("CSV has too many rows (limit {0})")]
    TooManyRows(usize),
}

/// Result of an import: parsed keywords plus the skip-and-count record
/// for rows that were dropped. Whether the skip count is surfaced to
/// the user is the import dialog's decision, not ours.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub keywords: Vec<Keyword>,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

/// Splits one CSV line. Quoted fields may contain commas, and a
/// doubled quote inside a quoted field unescapes to a single quote.
pub fn parse_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Parses keyword rows out of CSV text. Missing required headers abort
/// the whole import; malformed rows are skipped with a warning and
/// counted, never fatal.
pub fn import_keywords(text: &str, max_rows: usize) -> Result<ImportReport, ImportError> {
    let mut lines = text.lines().enumerate();
    let (_, header_line) = lines
        .by_ref()
        .find(|(_, line)| !line.trim().is_empty())
        .ok_or(ImportError::Empty)?;
    let columns = header_columns(header_line)?;

    let mut report = ImportReport::default();
    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        if report.keywords.len() >= max_rows {
            return Err(ImportError::TooManyRows(max_rows));
        }
        let fields = parse_row(line);
        // Row numbers are physical 1-based line numbers in the file,
        // so blank lines still count.
        let row = line_no + 1;

        let get = |name: &str| -> &str {
            columns
                .get(&name.to_lowercase())
                .and_then(|&idx| fields.get(idx))
                .map(|s| s.trim())
                .unwrap_or("")
        };

        let japanese = get("Japanese");
        let english = get("English");
        if japanese.is_empty() || english.is_empty() {
            tracing::warn!(row, "skipping keyword row without Japanese or English text");
            report.skipped += 1;
            report
                .warnings
                .push(format!("Row {}: missing Japanese or English text", row));
            continue;
        }

        let optional = |value: &str| {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        report.keywords.push(Keyword {
            japanese_text: japanese.to_string(),
            english_text: english.to_string(),
            japanese_audio_url: get("Japanese Audio URL").to_string(),
            english_audio_url: get("English Audio URL").to_string(),
            japanese_sentence: optional(get("Japanese Sentence")),
            english_sentence: optional(get("English Sentence")),
            japanese_sentence_audio_url: optional(get("Japanese Sentence Audio URL")),
        });
    }

    Ok(report)
}

fn header_columns(header_line: &str) -> Result<HashMap<String, usize>, ImportError> {
    let mut columns = HashMap::new();
    for (idx, name) in parse_row(header_line).iter().enumerate() {
        columns.entry(name.trim().to_lowercase()).or_insert(idx);
    }

    let missing: Vec<String> = REQUIRED_HEADERS
        .iter()
        .filter(|name| !columns.contains_key(&name.to_lowercase()))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingHeaders(missing));
    }
    Ok(columns)
}

/// The downloadable template: the seven-column header plus three
/// example rows.
pub fn template_csv() -> String {
    let rows: [[&str; 7]; 3] = [
        [
            "みず",
            "water",
            "https://cdn.example.com/audio/mizu-ja.mp3",
            "https://cdn.example.com/audio/water-en.mp3",
            "みずをのみます。",
            "I drink water.",
            "https://cdn.example.com/audio/mizu-sentence.mp3",
        ],
        [
            "ねこ",
            "cat",
            "https://cdn.example.com/audio/neko-ja.mp3",
            "https://cdn.example.com/audio/cat-en.mp3",
            "ねこがすきです。",
            "I like cats.",
            "https://cdn.example.com/audio/neko-sentence.mp3",
        ],
        [
            "ともだち",
            "friend",
            "",
            "",
            "ともだちと、はなします。",
            "I talk with my friend.",
            "",
        ],
    ];

    let mut csv = REQUIRED_HEADERS
        .iter()
        .map(|name| quote_field(name))
        .collect::<Vec<_>>()
        .join(",");
    csv.push('\n');
    for row in rows {
        let line = row
            .iter()
            .map(|field| quote_field(field))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }
    csv
}

fn quote_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{import_keywords, parse_row, template_csv, ImportError};

    #[test]
    fn quoted_field_keeps_embedded_comma() {
        assert_eq!(parse_row("\"a,b\",c"), vec!["a,b", "c"]);
    }

    #[test]
    fn doubled_quotes_unescape() {
        assert_eq!(
            parse_row("\"he said \"\"hi\"\"\",x"),
            vec!["he said \"hi\"", "x"]
        );
    }

    #[test]
    fn unquoted_rows_split_on_commas() {
        assert_eq!(parse_row("a,b,,d"), vec!["a", "b", "", "d"]);
        assert_eq!(parse_row(""), vec![""]);
    }

    #[test]
    fn headers_match_any_case_and_order() {
        let csv = "english,JAPANESE,Japanese Audio URL,English Audio URL,\
Japanese Sentence,English Sentence,Japanese Sentence Audio URL\n\
water,みず,,,,,\n";
        let report = import_keywords(csv, 100).unwrap();
        assert_eq!(report.keywords.len(), 1);
        assert_eq!(report.keywords[0].japanese_text, "みず");
        assert_eq!(report.keywords[0].english_text, "water");
    }

    #[test]
    fn missing_headers_abort_with_names() {
        let err = import_keywords("Japanese,English\nみず,water\n", 100).unwrap_err();
        match err {
            ImportError::MissingHeaders(missing) => {
                assert_eq!(missing.len(), 5);
                assert!(missing.contains(&"Japanese Audio URL".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn empty_file_is_an_error() {
        assert_eq!(import_keywords("", 100).unwrap_err(), ImportError::Empty);
        assert_eq!(
            import_keywords("  \n\n", 100).unwrap_err(),
            ImportError::Empty
        );
    }

    #[test]
    fn bad_rows_are_skipped_and_counted() {
        let csv = format!(
            "{}\nみず,water,,,,,\n,missing-japanese,,,,,\nしか\nねこ,cat,,,,,\n",
            super::REQUIRED_HEADERS.join(",")
        );
        let report = import_keywords(&csv, 100).unwrap();
        assert_eq!(report.keywords.len(), 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].starts_with("Row 3:"));
    }

    #[test]
    fn row_numbers_count_blank_lines() {
        let csv = format!(
            "{}\nみず,water,,,,,\n\n,missing-japanese,,,,,\n",
            super::REQUIRED_HEADERS.join(",")
        );
        let report = import_keywords(&csv, 100).unwrap();
        assert_eq!(report.keywords.len(), 1);
        assert_eq!(report.skipped, 1);
        assert!(report.warnings[0].starts_with("Row 4:"));
    }

    #[test]
    fn sentences_become_optional_fields() {
        let csv = format!(
            "{}\nみず,water,,,\"みずを、のみます\",I drink water,\n",
            super::REQUIRED_HEADERS.join(",")
        );
        let report = import_keywords(&csv, 100).unwrap();
        let kw = &report.keywords[0];
        assert_eq!(kw.japanese_sentence.as_deref(), Some("みずを、のみます"));
        assert_eq!(kw.japanese_sentence_audio_url, None);
    }

    #[test]
    fn row_limit_is_enforced() {
        let csv = format!(
            "{}\nみず,water,,,,,\nねこ,cat,,,,,\n",
            super::REQUIRED_HEADERS.join(",")
        );
        assert_eq!(
            import_keywords(&csv, 1).unwrap_err(),
            ImportError::TooManyRows(1)
        );
    }

    #[test]
    fn template_round_trips_through_the_importer() {
        let report = import_keywords(&template_csv(), 100).unwrap();
        assert_eq!(report.keywords.len(), 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.keywords[1].english_text, "cat");
        assert_eq!(
            report.keywords[2].english_sentence.as_deref(),
            Some("I talk with my friend.")
        );
    }
}
