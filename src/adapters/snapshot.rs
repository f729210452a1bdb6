use crate::domain::model::{
    City, CityCategory, CityInput, CityPatch, Company, CompanyInput, CompanyPatch, Specialization,
    SpecializationInput,
};
use crate::utils::error::{DirectoryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whole-directory state as held by the bundled record stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub specializations: Vec<Specialization>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Snapshot {
    /// Newest first, matching what the admin list shows.
    pub fn companies_newest_first(&self) -> Vec<Company> {
        let mut companies = self.companies.clone();
        companies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        companies
    }

    /// Largest population first.
    pub fn cities_by_population(&self) -> Vec<City> {
        let mut cities = self.cities.clone();
        cities.sort_by(|a, b| b.population.cmp(&a.population));
        cities
    }

    pub fn specializations_by_name(&self) -> Vec<Specialization> {
        let mut specs = self.specializations.clone();
        specs.sort_by(|a, b| crate::core::collation::compare(&a.name, &b.name));
        specs
    }

    fn resolve_specializations(&self, ids: &[String]) -> Result<Vec<Specialization>> {
        let mut resolved: Vec<Specialization> = Vec::with_capacity(ids.len());
        for id in ids {
            if resolved.iter().any(|s| &s.id == id) {
                continue;
            }
            let spec = self
                .specializations
                .iter()
                .find(|s| &s.id == id)
                .ok_or_else(|| DirectoryError::not_found("specialization", id))?;
            resolved.push(spec.clone());
        }
        Ok(resolved)
    }

    pub fn insert_company(&mut self, input: CompanyInput, now: DateTime<Utc>) -> Result<Company> {
        let specializations = self.resolve_specializations(&input.specialization_ids)?;
        let company = Company {
            id: new_id(),
            name: input.name,
            description: input.description,
            address: input.address,
            city: input.city,
            latitude: input.latitude,
            longitude: input.longitude,
            website: input.website,
            email: input.email,
            phone: input.phone,
            specializations,
            created_at: now,
            updated_at: now,
        };
        self.companies.push(company.clone());
        Ok(company)
    }

    pub fn update_company(&mut self, id: &str, patch: CompanyPatch, now: DateTime<Utc>) -> Result<Company> {
        let specializations = match &patch.specialization_ids {
            Some(ids) => Some(self.resolve_specializations(ids)?),
            None => None,
        };

        let company = self
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DirectoryError::not_found("company", id))?;

        if let Some(name) = patch.name {
            company.name = name;
        }
        if patch.description.is_some() {
            company.description = patch.description;
        }
        if patch.address.is_some() {
            company.address = patch.address;
        }
        if patch.city.is_some() {
            company.city = patch.city;
        }
        if let (Some(lat), Some(lng)) = (patch.latitude, patch.longitude) {
            company.latitude = Some(lat);
            company.longitude = Some(lng);
        }
        if patch.website.is_some() {
            company.website = patch.website;
        }
        if patch.email.is_some() {
            company.email = patch.email;
        }
        if patch.phone.is_some() {
            company.phone = patch.phone;
        }
        if let Some(specs) = specializations {
            company.specializations = specs;
        }
        company.updated_at = now;

        Ok(company.clone())
    }

    pub fn remove_company(&mut self, id: &str) -> Result<()> {
        let before = self.companies.len();
        self.companies.retain(|c| c.id != id);
        if self.companies.len() == before {
            return Err(DirectoryError::not_found("company", id));
        }
        Ok(())
    }

    pub fn insert_city(&mut self, input: CityInput, now: DateTime<Utc>) -> Result<City> {
        let city = City {
            id: new_id(),
            name: input.name,
            latitude: input.latitude,
            longitude: input.longitude,
            population: input.population,
            digitalization_budget: input.digitalization_budget,
            city_category: input
                .city_category
                .unwrap_or_else(|| CityCategory::from_population(input.population)),
            description: input.description,
            website: input.website,
            created_at: now,
            updated_at: now,
        };
        self.cities.push(city.clone());
        Ok(city)
    }

    /// The stored category only changes when the patch names one.
    pub fn update_city(&mut self, id: &str, patch: CityPatch, now: DateTime<Utc>) -> Result<City> {
        let city = self
            .cities
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DirectoryError::not_found("city", id))?;

        if let Some(name) = patch.name {
            city.name = name;
        }
        if let (Some(lat), Some(lng)) = (patch.latitude, patch.longitude) {
            city.latitude = lat;
            city.longitude = lng;
        }
        if let Some(population) = patch.population {
            city.population = population;
        }
        if let Some(budget) = patch.digitalization_budget {
            city.digitalization_budget = budget;
        }
        if let Some(category) = patch.city_category {
            city.city_category = category;
        }
        if patch.description.is_some() {
            city.description = patch.description;
        }
        if patch.website.is_some() {
            city.website = patch.website;
        }
        city.updated_at = now;

        Ok(city.clone())
    }

    pub fn remove_city(&mut self, id: &str) -> Result<()> {
        let before = self.cities.len();
        self.cities.retain(|c| c.id != id);
        if self.cities.len() == before {
            return Err(DirectoryError::not_found("city", id));
        }
        Ok(())
    }

    pub fn insert_specialization(&mut self, input: SpecializationInput) -> Result<Specialization> {
        if self.specializations.iter().any(|s| s.name == input.name) {
            return Err(DirectoryError::Store {
                message: format!("specialization '{}' already exists", input.name),
            });
        }
        let spec = Specialization {
            id: new_id(),
            name: input.name,
            icon: input.icon,
            color: input.color,
        };
        self.specializations.push(spec.clone());
        Ok(spec)
    }

    /// Also detaches the specialization from every company.
    pub fn remove_specialization(&mut self, id: &str) -> Result<()> {
        let before = self.specializations.len();
        self.specializations.retain(|s| s.id != id);
        if self.specializations.len() == before {
            return Err(DirectoryError::not_found("specialization", id));
        }
        for company in &mut self.companies {
            company.specializations.retain(|s| s.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn seeded() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot
            .insert_specialization(SpecializationInput {
                name: "Cloud Migration".to_string(),
                icon: "☁️".to_string(),
                color: "#3B82F6".to_string(),
            })
            .unwrap();
        snapshot
    }

    #[test]
    fn test_insert_company_resolves_specializations() {
        let mut snapshot = seeded();
        let spec_id = snapshot.specializations[0].id.clone();
        let company = snapshot
            .insert_company(
                CompanyInput {
                    name: "Nord IT".to_string(),
                    specialization_ids: vec![spec_id.clone(), spec_id],
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(company.specializations.len(), 1);
        assert_eq!(company.specializations[0].name, "Cloud Migration");
    }

    #[test]
    fn test_unknown_specialization_is_rejected() {
        let mut snapshot = seeded();
        let err = snapshot
            .insert_company(
                CompanyInput {
                    name: "Nord IT".to_string(),
                    specialization_ids: vec!["missing".to_string()],
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { .. }));
        assert!(snapshot.companies.is_empty());
    }

    #[test]
    fn test_remove_specialization_detaches_from_companies() {
        let mut snapshot = seeded();
        let spec_id = snapshot.specializations[0].id.clone();
        snapshot
            .insert_company(
                CompanyInput {
                    name: "Nord IT".to_string(),
                    specialization_ids: vec![spec_id.clone()],
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();

        snapshot.remove_specialization(&spec_id).unwrap();
        assert!(snapshot.companies[0].specializations.is_empty());
        assert!(snapshot.remove_specialization(&spec_id).is_err());
    }

    #[test]
    fn test_city_category_is_not_recomputed_on_update() {
        let mut snapshot = Snapshot::default();
        let city = snapshot
            .insert_city(
                CityInput {
                    name: "Celle".to_string(),
                    latitude: 52.62,
                    longitude: 10.08,
                    population: 69_000,
                    digitalization_budget: 1.0,
                    city_category: Some(CityCategory::Small),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(city.city_category, CityCategory::Small);

        let updated = snapshot
            .update_city(
                &city.id,
                CityPatch {
                    population: Some(250_000),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(updated.population, 250_000);
        assert_eq!(updated.city_category, CityCategory::Small);
    }

    #[test]
    fn test_companies_newest_first() {
        let mut snapshot = Snapshot::default();
        let t0 = Utc::now();
        for (i, name) in ["old", "new", "mid"].iter().enumerate() {
            let offset = [0, 2, 1][i];
            snapshot
                .insert_company(
                    CompanyInput {
                        name: name.to_string(),
                        ..Default::default()
                    },
                    t0 + Duration::minutes(offset),
                )
                .unwrap();
        }
        let names: Vec<String> = snapshot
            .companies_newest_first()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_update_and_remove_unknown_ids() {
        let mut snapshot = Snapshot::default();
        assert!(snapshot
            .update_company("nope", CompanyPatch::default(), Utc::now())
            .is_err());
        assert!(snapshot.remove_company("nope").is_err());
        assert!(snapshot.remove_city("nope").is_err());
    }
}
