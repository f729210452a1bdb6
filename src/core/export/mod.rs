//! Export serializers: delimited text, GeoJSON and a paginated PDF report.
//!
//! Each serializer is a pure function over a company snapshot. Writing the
//! bytes somewhere is left to the caller.

pub mod delimited;
pub mod document;
pub mod geojson;
pub mod pdf;

pub use delimited::to_delimited_text;
pub use document::{layout_document, to_document, DocumentLayout, ReportOptions};
pub use geojson::{to_geo_format, FeatureCollection};

use crate::domain::model::Company;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATASET_NAME: &str = "niedersachsen-beratungsunternehmen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    GeoJson,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::GeoJson => "application/geo+json",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "geojson" | "geo" => Ok(ExportFormat::GeoJson),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format: {} (expected csv, geojson or pdf)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `<dataset-name>-<unix-millis>.<ext>`
pub fn suggested_filename(dataset_name: &str, format: ExportFormat, now: DateTime<Utc>) -> String {
    format!("{}-{}.{}", dataset_name, now.timestamp_millis(), format.extension())
}

/// Serialize `records` in the requested format, in input order.
pub fn export(
    format: ExportFormat,
    records: &[Company],
    dataset_name: &str,
    report: &ReportOptions,
    now: DateTime<Utc>,
) -> Result<ExportArtifact> {
    let bytes = match format {
        ExportFormat::Csv => to_delimited_text(records)?,
        ExportFormat::GeoJson => to_geo_format(records)?,
        ExportFormat::Pdf => to_document(records, report),
    };

    tracing::debug!(format = ?format, records = records.len(), bytes = bytes.len(), "export serialized");

    Ok(ExportArtifact {
        filename: suggested_filename(dataset_name, format, now),
        content_type: format.content_type(),
        bytes,
    })
}
