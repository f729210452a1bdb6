use crate::core::export::{self, ExportArtifact, ExportFormat, ReportOptions, DEFAULT_DATASET_NAME};
use crate::core::filter;
use crate::core::stats::{self, CityCount, CityStats, CompanyStats};
use crate::domain::model::{
    City, CityCategory, CityInput, CityPatch, Company, CompanyInput, CompanyPatch, FilterState,
    GeoPoint, GeocodingResult, Specialization, SpecializationInput,
};
use crate::domain::ports::{ConfigProvider, Geocoder, RecordStore};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::{DateTime, Utc};

pub const DEFAULT_REPORT_TITLE: &str = "Niedersachsen Beratungsunternehmen";
pub const DEFAULT_REGION_SUFFIX: &str = "Niedersachsen, Deutschland";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOptions {
    pub dataset_name: String,
    pub report_title: String,
    /// Appended to street addresses before geocoding.
    pub region_suffix: String,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            region_suffix: DEFAULT_REGION_SUFFIX.to_string(),
        }
    }
}

impl ServiceOptions {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            dataset_name: config.dataset_name().to_string(),
            report_title: config.report_title().to_string(),
            region_suffix: config.region_suffix().to_string(),
        }
    }
}

/// `"{address}, {city}, {region}"`, skipping blank parts.
pub fn full_address(address: &str, city: Option<&str>, region_suffix: &str) -> String {
    [Some(address), city, Some(region_suffix)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ties the record store and geocoder to the filter and export core.
pub struct DirectoryService<S: RecordStore, G: Geocoder> {
    store: S,
    geocoder: G,
    options: ServiceOptions,
}

impl<S: RecordStore, G: Geocoder> DirectoryService<S, G> {
    pub fn new(store: S, geocoder: G) -> Self {
        Self::with_options(store, geocoder, ServiceOptions::default())
    }

    pub fn with_options(store: S, geocoder: G, options: ServiceOptions) -> Self {
        Self {
            store,
            geocoder,
            options,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn companies(&self, state: &FilterState) -> Result<Vec<Company>> {
        let all = self.store.list_companies().await?;
        Ok(filter::apply(&all, state))
    }

    pub async fn cities(&self) -> Result<Vec<City>> {
        self.store.list_cities().await
    }

    pub async fn specializations(&self) -> Result<Vec<Specialization>> {
        self.store.list_specializations().await
    }

    pub async fn geocode(&self, address: &str) -> Result<GeocodingResult> {
        self.geocoder.geocode(address).await
    }

    pub async fn reverse_geocode(&self, point: GeoPoint) -> Result<String> {
        self.geocoder.reverse_geocode(point).await
    }

    async fn locate(&self, address: &str, city: Option<&str>) -> Result<GeocodingResult> {
        let query = full_address(address, city, &self.options.region_suffix);
        tracing::debug!("Geocoding: {}", query);
        self.geocoder.geocode(&query).await
    }

    /// Validate, resolve the address to coordinates when none were given,
    /// then persist. A failed lookup aborts the save.
    pub async fn create_company(&self, input: CompanyInput) -> Result<Company> {
        let mut input = input.normalized();
        input.validate()?;

        if input.latitude.is_none() {
            if let Some(address) = input.address.clone() {
                let point = self.locate(&address, input.city.as_deref()).await?;
                input.latitude = Some(point.lat);
                input.longitude = Some(point.lng);
            }
        }

        let company = self.store.create_company(input).await?;
        tracing::info!(id = %company.id, "created company {}", company.name);
        Ok(company)
    }

    /// A changed address without explicit coordinates is geocoded again.
    pub async fn update_company(&self, id: &str, patch: CompanyPatch) -> Result<Company> {
        let mut patch = patch.normalized();
        patch.validate()?;

        if patch.latitude.is_none() {
            if let Some(address) = patch.address.clone() {
                let city = match &patch.city {
                    Some(city) => Some(city.clone()),
                    None => self
                        .store
                        .list_companies()
                        .await?
                        .into_iter()
                        .find(|c| c.id == id)
                        .and_then(|c| c.city),
                };
                let point = self.locate(&address, city.as_deref()).await?;
                patch.latitude = Some(point.lat);
                patch.longitude = Some(point.lng);
            }
        }

        let company = self.store.update_company(id, patch).await?;
        tracing::info!(id = %company.id, "updated company {}", company.name);
        Ok(company)
    }

    pub async fn delete_company(&self, id: &str) -> Result<()> {
        self.store.delete_company(id).await?;
        tracing::info!(id, "deleted company");
        Ok(())
    }

    /// Category defaults to the population-based suggestion when not chosen.
    pub async fn create_city(&self, input: CityInput) -> Result<City> {
        let mut input = input.normalized();
        input.validate()?;

        if input.city_category.is_none() {
            input.city_category = Some(CityCategory::from_population(input.population));
        }

        let city = self.store.create_city(input).await?;
        tracing::info!(id = %city.id, category = %city.city_category, "created city {}", city.name);
        Ok(city)
    }

    pub async fn update_city(&self, id: &str, patch: CityPatch) -> Result<City> {
        let patch = patch.normalized();
        patch.validate()?;
        let city = self.store.update_city(id, patch).await?;
        tracing::info!(id = %city.id, "updated city {}", city.name);
        Ok(city)
    }

    pub async fn delete_city(&self, id: &str) -> Result<()> {
        self.store.delete_city(id).await?;
        tracing::info!(id, "deleted city");
        Ok(())
    }

    pub async fn create_specialization(&self, input: SpecializationInput) -> Result<Specialization> {
        input.validate()?;
        self.store.create_specialization(input).await
    }

    pub async fn delete_specialization(&self, id: &str) -> Result<()> {
        self.store.delete_specialization(id).await
    }

    /// Filter the current records and serialize them in `format`.
    pub async fn export(
        &self,
        format: ExportFormat,
        state: &FilterState,
        now: DateTime<Utc>,
    ) -> Result<ExportArtifact> {
        let records = self.companies(state).await?;
        let report = ReportOptions::new(self.options.report_title.clone(), now.date_naive());
        let artifact = export::export(format, &records, &self.options.dataset_name, &report, now)?;
        tracing::info!(
            "Exported {} companies as {} ({} bytes)",
            records.len(),
            artifact.filename,
            artifact.bytes.len()
        );
        Ok(artifact)
    }

    pub async fn company_stats(&self) -> Result<CompanyStats> {
        Ok(stats::company_stats(&self.store.list_companies().await?))
    }

    pub async fn city_counts(&self) -> Result<Vec<CityCount>> {
        Ok(stats::city_counts(&self.store.list_companies().await?))
    }

    pub async fn city_stats(&self) -> Result<CityStats> {
        Ok(stats::city_stats(&self.store.list_cities().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_address() {
        assert_eq!(
            full_address("Vahrenwalder Straße 7", Some("Hannover"), DEFAULT_REGION_SUFFIX),
            "Vahrenwalder Straße 7, Hannover, Niedersachsen, Deutschland"
        );
        assert_eq!(full_address("Markt 1", None, ""), "Markt 1");
        assert_eq!(full_address("Markt 1", Some("  "), "DE"), "Markt 1, DE");
    }
}
