use serde_json::{Map, Value};

use crate::modules::study::RawRecord;
use crate::shared::errors::{AppError, AppResult};

/// Parse the study table into one JSON object per data row.
///
/// First line is the header (names trimmed and lowercased). Fields may be
/// wrapped in double quotes, in which case commas and doubled quotes inside
/// them are literal. Short rows simply omit the missing columns; blank rows
/// are skipped.
pub fn parse_studies_csv(text: &str) -> AppResult<Vec<RawRecord>> {
    let text = text.trim_start_matches('\u{feff}');

    let non_blank_lines = text.lines().filter(|line| !line.trim().is_empty()).count();
    if non_blank_lines < 2 {
        return Err(AppError::ParseError(format!(
            "expected a header row and at least one data row, found {} non-empty line(s)",
            non_blank_lines
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();

    if headers.iter().all(|header| header.is_empty()) {
        return Err(AppError::ParseError("header row is empty".to_string()));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }

        let record: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, field)| (header.clone(), Value::String(field.to_string())))
            .collect();

        records.push(Value::Object(record));
    }

    Ok(records)
}
