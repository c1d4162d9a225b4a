//! CSV rendering of stored responses.

use std::borrow::Cow;

use prakriti::ResponseRecord;
use prakriti::wire::EXPORT_FILENAME;

/// Header row of the export.
pub const HEADERS: [&str; 9] = [
    "Timestamp",
    "Name",
    "Gender",
    "Phone",
    "Email",
    "City",
    "Scores",
    "Result",
    "Description",
];

/// File name offered to the browser.
pub const FILENAME: &str = EXPORT_FILENAME;

/// Render records, in the given order, below the header row.
pub fn render(records: &[ResponseRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(HEADERS.join(","));
    for record in records {
        let columns = record.columns();
        let fields: Vec<Cow<'_, str>> = columns.iter().map(|c| escape(c)).collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

/// Quote a field if it contains a delimiter, quote or line break.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
