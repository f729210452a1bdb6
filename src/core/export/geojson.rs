use crate::domain::model::Company;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecializationProperty {
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specializations: Vec<SpecializationProperty>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn feature(company: &Company) -> Option<Feature> {
    let point = company.location()?;

    Some(Feature {
        kind: "Feature".to_string(),
        geometry: Geometry {
            kind: "Point".to_string(),
            coordinates: [point.longitude, point.latitude],
        },
        properties: Properties {
            id: company.id.clone(),
            name: company.name.clone(),
            description: company.description.clone(),
            address: company.address.clone(),
            website: company.website.clone(),
            email: company.email.clone(),
            phone: company.phone.clone(),
            specializations: company
                .specializations
                .iter()
                .map(|s| SpecializationProperty {
                    name: s.name.clone(),
                    icon: s.icon.clone(),
                    color: s.color.clone(),
                })
                .collect(),
            created_at: company.created_at,
            updated_at: company.updated_at,
        },
    })
}

pub fn feature_collection(records: &[Company]) -> FeatureCollection {
    let features: Vec<Feature> = records.iter().filter_map(feature).collect();

    let skipped = records.len() - features.len();
    if skipped > 0 {
        tracing::warn!(skipped, "companies without coordinates left out of GeoJSON export");
    }

    FeatureCollection {
        kind: "FeatureCollection".to_string(),
        features,
    }
}

/// Pretty-printed GeoJSON FeatureCollection, one Point feature per located company.
pub fn to_geo_format(records: &[Company]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&feature_collection(records))?)
}
