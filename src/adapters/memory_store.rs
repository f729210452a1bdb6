use crate::adapters::snapshot::Snapshot;
use crate::domain::model::{
    City, CityInput, CityPatch, Company, CompanyInput, CompanyPatch, Specialization,
    SpecializationInput,
};
use crate::domain::ports::RecordStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

/// Process-local record store, used for tests and seeding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_companies(&self) -> Result<Vec<Company>> {
        Ok(self.state.read().await.companies_newest_first())
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        Ok(self.state.read().await.cities_by_population())
    }

    async fn list_specializations(&self) -> Result<Vec<Specialization>> {
        Ok(self.state.read().await.specializations_by_name())
    }

    async fn create_company(&self, input: CompanyInput) -> Result<Company> {
        self.state.write().await.insert_company(input, Utc::now())
    }

    async fn update_company(&self, id: &str, patch: CompanyPatch) -> Result<Company> {
        self.state.write().await.update_company(id, patch, Utc::now())
    }

    async fn delete_company(&self, id: &str) -> Result<()> {
        self.state.write().await.remove_company(id)
    }

    async fn create_city(&self, input: CityInput) -> Result<City> {
        self.state.write().await.insert_city(input, Utc::now())
    }

    async fn update_city(&self, id: &str, patch: CityPatch) -> Result<City> {
        self.state.write().await.update_city(id, patch, Utc::now())
    }

    async fn delete_city(&self, id: &str) -> Result<()> {
        self.state.write().await.remove_city(id)
    }

    async fn create_specialization(&self, input: SpecializationInput) -> Result<Specialization> {
        self.state.write().await.insert_specialization(input)
    }

    async fn delete_specialization(&self, id: &str) -> Result<()> {
        self.state.write().await.remove_specialization(id)
    }
}
