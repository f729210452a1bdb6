use crate::core::collation;
use crate::domain::model::{City, CityCategory, Company};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyStats {
    pub total_companies: usize,
    pub unique_cities: usize,
    pub unique_specializations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStats {
    pub total: usize,
    pub total_population: u64,
    pub total_budget: f64,
    pub by_category: BTreeMap<CityCategory, usize>,
}

pub fn company_stats(records: &[Company]) -> CompanyStats {
    let cities: HashSet<&str> = records.iter().filter_map(|c| c.city.as_deref()).collect();
    let specializations: HashSet<&str> = records
        .iter()
        .flat_map(|c| c.specializations.iter().map(|s| s.id.as_str()))
        .collect();

    CompanyStats {
        total_companies: records.len(),
        unique_cities: cities.len(),
        unique_specializations: specializations.len(),
    }
}

/// Companies per city, highest company count first, ties by name.
/// Companies without a city are not counted.
pub fn city_counts(records: &[Company]) -> Vec<CityCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for city in records.iter().filter_map(|c| c.city.as_deref()) {
        *counts.entry(city).or_insert(0) += 1;
    }

    let mut result: Vec<CityCount> = counts
        .into_iter()
        .map(|(city, count)| CityCount {
            city: city.to_string(),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| collation::compare(&a.city, &b.city)));
    result
}

pub fn city_stats(cities: &[City]) -> CityStats {
    let mut by_category: BTreeMap<CityCategory, usize> =
        CityCategory::ALL.iter().map(|c| (*c, 0)).collect();
    for city in cities {
        *by_category.entry(city.city_category).or_insert(0) += 1;
    }

    CityStats {
        total: cities.len(),
        total_population: cities.iter().map(|c| c.population).sum(),
        total_budget: cities.iter().map(|c| c.digitalization_budget).sum(),
        by_category,
    }
}
