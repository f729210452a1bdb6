use crate::domain::model::{
    City, CityInput, CityPatch, Company, CompanyInput, CompanyPatch, GeoPoint, GeocodingResult,
    Specialization, SpecializationInput,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// Source of truth for companies, cities and specializations.
///
/// Inputs reaching a store are already validated; stores assign ids and
/// timestamps.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_companies(&self) -> Result<Vec<Company>>;
    async fn list_cities(&self) -> Result<Vec<City>>;
    async fn list_specializations(&self) -> Result<Vec<Specialization>>;

    async fn create_company(&self, input: CompanyInput) -> Result<Company>;
    async fn update_company(&self, id: &str, patch: CompanyPatch) -> Result<Company>;
    async fn delete_company(&self, id: &str) -> Result<()>;

    async fn create_city(&self, input: CityInput) -> Result<City>;
    async fn update_city(&self, id: &str, patch: CityPatch) -> Result<City>;
    async fn delete_city(&self, id: &str) -> Result<()>;

    async fn create_specialization(&self, input: SpecializationInput) -> Result<Specialization>;
    async fn delete_specialization(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeocodingResult>;
    async fn reverse_geocode(&self, point: GeoPoint) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn data_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn dataset_name(&self) -> &str;
    fn report_title(&self) -> &str;
    fn region_suffix(&self) -> &str;
}
