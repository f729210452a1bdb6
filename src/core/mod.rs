pub mod collation;
pub mod directory;
pub mod export;
pub mod filter;
pub mod forms;
pub mod stats;

pub use crate::domain::model::{Company, FilterState};
pub use crate::domain::ports::{ConfigProvider, Geocoder, RecordStore, Storage};
pub use crate::utils::error::Result;
