use crate::utils::error::{DirectoryError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(DirectoryError::validation(field_name, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DirectoryError::validation(
                field_name,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(DirectoryError::validation(
            field_name,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_optional_url(field_name: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(url) => validate_url(field_name, url),
        None => Ok(()),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DirectoryError::validation(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DirectoryError::validation(
            field_name,
            format!("Value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

pub fn validate_email(field_name: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(email) if !email_pattern().is_match(email) => Err(DirectoryError::validation(
            field_name,
            format!("'{}' is not a valid email address", email),
        )),
        _ => Ok(()),
    }
}

/// Coordinates must come as a finite latitude/longitude pair or not at all.
pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<()> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) => {
            if !lat.is_finite() {
                return Err(DirectoryError::validation("latitude", "Latitude must be a finite number"));
            }
            if !lng.is_finite() {
                return Err(DirectoryError::validation("longitude", "Longitude must be a finite number"));
            }
            validate_range("latitude", lat, -90.0, 90.0)?;
            validate_range("longitude", lng, -180.0, 180.0)
        }
        (Some(_), None) => Err(DirectoryError::validation(
            "longitude",
            "Longitude is required when latitude is set",
        )),
        (None, Some(_)) => Err(DirectoryError::validation(
            "latitude",
            "Latitude is required when longitude is set",
        )),
    }
}
