use crate::adapters::snapshot::Snapshot;
use crate::domain::model::{
    City, CityInput, CityPatch, Company, CompanyInput, CompanyPatch, Specialization,
    SpecializationInput,
};
use crate::domain::ports::{RecordStore, Storage};
use crate::utils::error::{DirectoryError, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

/// Record store persisting the whole directory as one JSON document.
///
/// Every mutation is a read-modify-write of the document, serialized by a
/// lock so overlapping calls from one process cannot lose updates.
pub struct JsonRecordStore<S: Storage> {
    storage: S,
    path: String,
    write_lock: Mutex<()>,
}

impl<S: Storage> JsonRecordStore<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// A missing file reads as an empty directory.
    pub async fn load(&self) -> Result<Snapshot> {
        if !self.storage.exists(&self.path).await {
            tracing::debug!("No data file at {}, starting empty", self.path);
            return Ok(Snapshot::default());
        }

        let bytes = self.storage.read_file(&self.path).await?;
        serde_json::from_slice(&bytes).map_err(|e| DirectoryError::Store {
            message: format!("could not parse {}: {}", self.path, e),
        })
    }

    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        tracing::debug!("Writing {} bytes to {}", bytes.len(), self.path);
        self.storage.write_file(&self.path, &bytes).await
    }

    /// Apply `change` and persist; nothing is written when it fails.
    async fn mutate<T, F>(&self, change: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut Snapshot) -> Result<T> + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.load().await?;
        let value = change(&mut snapshot)?;
        self.save(&snapshot).await?;
        Ok(value)
    }
}

#[async_trait]
impl<S: Storage> RecordStore for JsonRecordStore<S> {
    async fn list_companies(&self) -> Result<Vec<Company>> {
        Ok(self.load().await?.companies_newest_first())
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        Ok(self.load().await?.cities_by_population())
    }

    async fn list_specializations(&self) -> Result<Vec<Specialization>> {
        Ok(self.load().await?.specializations_by_name())
    }

    async fn create_company(&self, input: CompanyInput) -> Result<Company> {
        self.mutate(|s| s.insert_company(input, Utc::now())).await
    }

    async fn update_company(&self, id: &str, patch: CompanyPatch) -> Result<Company> {
        self.mutate(|s| s.update_company(id, patch, Utc::now())).await
    }

    async fn delete_company(&self, id: &str) -> Result<()> {
        self.mutate(|s| s.remove_company(id)).await
    }

    async fn create_city(&self, input: CityInput) -> Result<City> {
        self.mutate(|s| s.insert_city(input, Utc::now())).await
    }

    async fn update_city(&self, id: &str, patch: CityPatch) -> Result<City> {
        self.mutate(|s| s.update_city(id, patch, Utc::now())).await
    }

    async fn delete_city(&self, id: &str) -> Result<()> {
        self.mutate(|s| s.remove_city(id)).await
    }

    async fn create_specialization(&self, input: SpecializationInput) -> Result<Specialization> {
        self.mutate(|s| s.insert_specialization(input)).await
    }

    async fn delete_specialization(&self, id: &str) -> Result<()> {
        self.mutate(|s| s.remove_specialization(id)).await
    }
}
