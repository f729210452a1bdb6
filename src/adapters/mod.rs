// Adapters layer: concrete implementations of the domain ports.

pub mod json_store;
pub mod local_storage;
pub mod memory_store;
pub mod nominatim;
pub mod snapshot;

pub use json_store::JsonRecordStore;
pub use local_storage::LocalStorage;
pub use memory_store::MemoryStore;
pub use nominatim::NominatimGeocoder;
pub use snapshot::Snapshot;
