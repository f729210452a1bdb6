use crate::domain::model::Company;
use crate::utils::error::{DirectoryError, Result};
use crate::utils::format::format_date;
use csv::{QuoteStyle, Terminator, WriterBuilder};

const BOM: &str = "\u{FEFF}";

pub const HEADERS: [&str; 10] = [
    "Name",
    "Description",
    "Address",
    "Latitude",
    "Longitude",
    "Website",
    "Email",
    "Phone",
    "Specializations",
    "CreatedAt",
];

/// Quote a field only if it contains a comma, a double quote or a newline.
pub fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn coordinate(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}

fn row(company: &Company) -> [String; 10] {
    let text = |v: &Option<String>| escape_field(v.as_deref().unwrap_or(""));
    [
        escape_field(&company.name),
        text(&company.description),
        text(&company.address),
        coordinate(company.latitude),
        coordinate(company.longitude),
        text(&company.website),
        text(&company.email),
        text(&company.phone),
        escape_field(&company.specialization_names().join("; ")),
        format_date(&company.created_at),
    ]
}

/// Comma-separated export with a byte-order mark, header row first.
pub fn to_delimited_text(records: &[Company]) -> Result<Vec<u8>> {
    // Fields are escaped by `escape_field`; the writer only joins them.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(BOM.as_bytes().to_vec());

    writer.write_record(HEADERS)?;
    for company in records {
        writer.write_record(&row(company))?;
    }

    writer
        .into_inner()
        .map_err(|e| DirectoryError::Io(e.into_error()))
}
