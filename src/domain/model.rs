use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialization {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specializations: Vec<Specialization>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// A point only when both coordinates are present and finite.
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }

    pub fn has_specialization(&self, id: &str) -> bool {
        self.specializations.iter().any(|s| s.id == id)
    }

    pub fn specialization_names(&self) -> Vec<&str> {
        self.specializations.iter().map(|s| s.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CityCategory {
    #[serde(rename = "Großstadt")]
    Large,
    #[serde(rename = "Mittelstadt")]
    Medium,
    #[serde(rename = "Kleinstadt")]
    Small,
}

impl CityCategory {
    pub const ALL: [CityCategory; 3] = [CityCategory::Large, CityCategory::Medium, CityCategory::Small];

    /// Default suggestion for a new city. Stored categories are never recomputed.
    pub fn from_population(population: u64) -> Self {
        if population >= 100_000 {
            CityCategory::Large
        } else if population >= 20_000 {
            CityCategory::Medium
        } else {
            CityCategory::Small
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CityCategory::Large => "Großstadt",
            CityCategory::Medium => "Mittelstadt",
            CityCategory::Small => "Kleinstadt",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            CityCategory::Large => "#EF4444",
            CityCategory::Medium => "#F59E0B",
            CityCategory::Small => "#10B981",
        }
    }

    /// Map marker size in pixels.
    pub fn marker_size(&self) -> u32 {
        match self {
            CityCategory::Large => 16,
            CityCategory::Medium => 12,
            CityCategory::Small => 10,
        }
    }
}

impl std::fmt::Display for CityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for CityCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "large" | "großstadt" | "grossstadt" => Ok(CityCategory::Large),
            "medium" | "mittelstadt" => Ok(CityCategory::Medium),
            "small" | "kleinstadt" => Ok(CityCategory::Small),
            other => Err(format!("unknown city category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
    pub digitalization_budget: f64,
    pub city_category: CityCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Alphabetical,
    Newest,
    Nearest,
}

impl std::str::FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "alphabetical" => Ok(SortOption::Alphabetical),
            "newest" => Ok(SortOption::Newest),
            "nearest" => Ok(SortOption::Nearest),
            other => Err(format!("unknown sort option: {}", other)),
        }
    }
}

/// User-chosen criteria for a company list. Plain value, passed into the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub search_query: String,
    pub selected_specialization_ids: BTreeSet<String>,
    pub sort_by: SortOption,
    pub selected_city: Option<String>,
    /// Reference point for `SortOption::Nearest`.
    pub origin: Option<GeoPoint>,
}

impl FilterState {
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_sort(mut self, sort_by: SortOption) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_city(mut self, city: Option<String>) -> Self {
        self.selected_city = city;
        self
    }

    pub fn with_origin(mut self, origin: Option<GeoPoint>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_specialization(mut self, id: impl Into<String>) -> Self {
        self.selected_specialization_ids.insert(id.into());
        self
    }

    pub fn toggle_specialization(&mut self, id: &str) {
        if !self.selected_specialization_ids.remove(id) {
            self.selected_specialization_ids.insert(id.to_string());
        }
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }
}

/// Administrative form payload for a new company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization_ids: Vec<String>,
}

/// Partial update; `specialization_ids` replaces the whole set when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityInput {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
    pub digitalization_budget: f64,
    pub city_category: Option<CityCategory>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityPatch {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub population: Option<u64>,
    pub digitalization_budget: Option<f64>,
    pub city_category: Option<CityCategory>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecializationInput {
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeocodingResult> for GeoPoint {
    fn from(result: GeocodingResult) -> Self {
        GeoPoint::new(result.lat, result.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_category_thresholds() {
        assert_eq!(CityCategory::from_population(535_932), CityCategory::Large);
        assert_eq!(CityCategory::from_population(100_000), CityCategory::Large);
        assert_eq!(CityCategory::from_population(99_999), CityCategory::Medium);
        assert_eq!(CityCategory::from_population(20_000), CityCategory::Medium);
        assert_eq!(CityCategory::from_population(19_999), CityCategory::Small);
        assert_eq!(CityCategory::from_population(0), CityCategory::Small);
    }

    #[test]
    fn test_city_category_marker_style() {
        assert_eq!(CityCategory::Large.color(), "#EF4444");
        assert_eq!(CityCategory::Medium.color(), "#F59E0B");
        assert_eq!(CityCategory::Small.color(), "#10B981");

        let sizes: Vec<u32> = CityCategory::ALL.iter().map(|c| c.marker_size()).collect();
        assert_eq!(sizes, vec![16, 12, 10]);
    }

    #[test]
    fn test_city_category_serializes_stored_label() {
        let json = serde_json::to_string(&CityCategory::Large).unwrap();
        assert_eq!(json, "\"Großstadt\"");
        let parsed: CityCategory = serde_json::from_str("\"Kleinstadt\"").unwrap();
        assert_eq!(parsed, CityCategory::Small);
        assert_eq!("medium".parse::<CityCategory>().unwrap(), CityCategory::Medium);
    }

    #[test]
    fn test_toggle_specialization() {
        let mut state = FilterState::default();
        state.toggle_specialization("cloud");
        assert!(state.selected_specialization_ids.contains("cloud"));
        state.toggle_specialization("cloud");
        assert!(state.selected_specialization_ids.is_empty());
    }

    #[test]
    fn test_clear_resets_to_defaults() {
        let mut state = FilterState::default()
            .with_search("hannover")
            .with_sort(SortOption::Newest)
            .with_city(Some("Hannover".to_string()))
            .with_specialization("cloud");
        state.clear();
        assert_eq!(state, FilterState::default());
        assert_eq!(state.sort_by, SortOption::Alphabetical);
    }

    #[test]
    fn test_distance_hannover_braunschweig() {
        let hannover = GeoPoint::new(52.3759, 9.732);
        let braunschweig = GeoPoint::new(52.2689, 10.5268);
        let d = hannover.distance_km(&braunschweig);
        assert!(d > 50.0 && d < 60.0, "distance was {}", d);
    }
}
