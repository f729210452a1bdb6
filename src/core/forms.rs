//! Boundary checks for administrative form submissions.

use crate::domain::model::{CityInput, CityPatch, CompanyInput, CompanyPatch, SpecializationInput};
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::{
    validate_coordinates, validate_email, validate_non_empty_string, validate_optional_url,
    validate_range, Validate,
};

pub const MAX_POPULATION: u64 = 10_000_000;
pub const MAX_BUDGET: f64 = 1_000_000_000.0;

/// Trimmed value, or `None` for blank strings.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_budget(value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(DirectoryError::validation(
            "digitalization_budget",
            "Budget must be a finite number",
        ));
    }
    validate_range("digitalization_budget", value, 0.0, MAX_BUDGET)
}

fn validate_hex_color(value: &str) -> Result<()> {
    let hex = value.strip_prefix('#').unwrap_or("");
    if (hex.len() == 6 || hex.len() == 3) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(DirectoryError::validation(
            "color",
            format!("'{}' is not a hex color like #3B82F6", value),
        ))
    }
}

impl CompanyInput {
    /// Trim text fields and drop blank optionals.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: clean(self.description),
            address: clean(self.address),
            city: clean(self.city),
            website: clean(self.website),
            email: clean(self.email),
            phone: clean(self.phone),
            ..self
        }
    }
}

impl Validate for CompanyInput {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_optional_url("website", self.website.as_deref())?;
        validate_email("email", self.email.as_deref())?;
        validate_coordinates(self.latitude, self.longitude)
    }
}

impl CompanyPatch {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            description: clean(self.description),
            address: clean(self.address),
            city: clean(self.city),
            website: clean(self.website),
            email: clean(self.email),
            phone: clean(self.phone),
            ..self
        }
    }
}

impl Validate for CompanyPatch {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_non_empty_string("name", name)?;
        }
        validate_optional_url("website", self.website.as_deref())?;
        validate_email("email", self.email.as_deref())?;
        validate_coordinates(self.latitude, self.longitude)
    }
}

impl CityInput {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: clean(self.description),
            website: clean(self.website),
            ..self
        }
    }
}

impl Validate for CityInput {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_coordinates(Some(self.latitude), Some(self.longitude))?;
        validate_range("population", self.population, 0, MAX_POPULATION)?;
        validate_budget(self.digitalization_budget)?;
        validate_optional_url("website", self.website.as_deref())
    }
}

impl CityPatch {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            description: clean(self.description),
            website: clean(self.website),
            ..self
        }
    }
}

impl Validate for CityPatch {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_non_empty_string("name", name)?;
        }
        validate_coordinates(self.latitude, self.longitude)?;
        if let Some(population) = self.population {
            validate_range("population", population, 0, MAX_POPULATION)?;
        }
        if let Some(budget) = self.digitalization_budget {
            validate_budget(budget)?;
        }
        validate_optional_url("website", self.website.as_deref())
    }
}

impl Validate for SpecializationInput {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_non_empty_string("icon", &self.icon)?;
        validate_hex_color(&self.color)
    }
}
