//! Labeled training rows from CSV (`email_body`, `sender_role`, optional `is_bec`).

use crate::error::{GuardError, Result};
use crate::features::EmailSample;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSample {
    pub sample: EmailSample,
    /// Ground truth, used only for the evaluation report
    pub is_bec: Option<bool>,
}

impl LabeledSample {
    pub fn new(sample: EmailSample, is_bec: Option<bool>) -> Self {
        Self { sample, is_bec }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    email_body: String,
    #[serde(default)]
    sender_role: String,
    #[serde(default)]
    is_bec: Option<String>,
}

fn parse_label(raw: Option<&str>, line: usize) -> Result<Option<bool>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(Some(true)),
        "0" | "false" | "no" => Ok(Some(false)),
        other => Err(GuardError::InvalidParameter(format!(
            "row {}: is_bec must be 0/1 or true/false, got {:?}",
            line, other
        ))),
    }
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<LabeledSample>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        // header is line 1
        let is_bec = parse_label(row.is_bec.as_deref(), i + 2)?;
        out.push(LabeledSample::new(
            EmailSample::new(row.email_body, row.sender_role),
            is_bec,
        ));
    }
    Ok(out)
}

pub fn load_csv(path: &Path) -> Result<Vec<LabeledSample>> {
    let file = std::fs::File::open(path)?;
    let rows = read_csv(file)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "training data loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_labeled_rows_with_quoted_bodies() {
        let data = "email_body,sender_role,is_bec\n\
                    \"Please transfer funds, urgently\",HR,1\n\
                    Team lunch on friday,Manager,0\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sample.body, "Please transfer funds, urgently");
        assert_eq!(rows[0].sample.sender_role, "HR");
        assert_eq!(rows[0].is_bec, Some(true));
        assert_eq!(rows[1].is_bec, Some(false));
    }

    #[test]
    fn label_column_is_optional() {
        let data = "sender_role,email_body\nFinance,Invoice attached\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].sample, EmailSample::new("Invoice attached", "Finance"));
        assert_eq!(rows[0].is_bec, None);
    }

    #[test]
    fn bad_label_names_the_row() {
        let data = "email_body,sender_role,is_bec\nhello,HR,maybe\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("does-not-exist.csv")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
