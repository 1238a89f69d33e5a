//! Bulk import parsing and sample-file generation.
//!
//! Import accepts CSV with a header row of schema field keys. Unmatched
//! columns pass through as extra record properties — the server decides
//! whether to reject them. A parse failure aborts the whole import before
//! any row is submitted.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{FieldType, SchemaField, WorkflowConfig};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Cannot parse import file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Import file has no header row")]
    MissingHeader,

    #[error("Import file has no data rows")]
    Empty,
}

/// Parse a CSV import into schema-keyed records.
///
/// Every header becomes a record key; empty cells are omitted so the
/// server sees absent, not blank, values.
pub fn parse_bulk_csv(data: &[u8]) -> Result<Vec<BTreeMap<String, String>>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::MissingHeader);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = BTreeMap::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            if !header.is_empty() && !value.is_empty() {
                row.insert(header.clone(), value.to_string());
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(rows)
}

/// Type-appropriate placeholder for the sample row.
fn example_value(field: &SchemaField) -> String {
    match field.field_type {
        FieldType::Date => "1990-01-15".to_string(),
        FieldType::Datetime => "2024-03-15T09:30".to_string(),
        FieldType::Time => "09:30".to_string(),
        FieldType::Phone => "+11234567890".to_string(),
        FieldType::Select => field
            .options
            .first()
            .cloned()
            .unwrap_or_default(),
        FieldType::Text => format!("Sample {}", field.label.to_lowercase()),
    }
}

/// Generate the downloadable import template: one header row of editable
/// field keys plus one illustrative example row.
pub fn sample_csv(config: &WorkflowConfig) -> String {
    let fields = config.editable_fields();
    let mut writer = csv::Writer::from_writer(Vec::new());

    // Both writes are in-memory; csv only fails here on unequal row
    // lengths, which the shared `fields` slice rules out.
    let _ = writer.write_record(fields.iter().map(|f| f.key.as_str()));
    let _ = writer.write_record(fields.iter().map(|f| example_value(f)).collect::<Vec<_>>());

    String::from_utf8(writer.into_inner().unwrap_or_default()).unwrap_or_default()
}
