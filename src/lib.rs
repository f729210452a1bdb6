pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::{JsonRecordStore, LocalStorage, MemoryStore, NominatimGeocoder, Snapshot};
pub use crate::core::directory::{DirectoryService, ServiceOptions};
pub use crate::core::export::{export, ExportArtifact, ExportFormat};
pub use crate::core::filter::apply;
pub use domain::model::{City, CityCategory, Company, FilterState, SortOption, Specialization};
pub use utils::error::{DirectoryError, GeocodingError, Result};
