use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeocodingError {
    #[error("Address cannot be empty")]
    EmptyAddress,

    #[error("Address not found: {address}")]
    NotFound { address: String },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Geocoding API error: {status}")]
    Provider { status: u16 },

    #[error("Invalid geocoding response: {message}")]
    InvalidResponse { message: String },

    #[error("Geocoding request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Record store error: {message}")]
    Store { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Geocoding,
    Store,
    Export,
    Configuration,
    System,
}

impl DirectoryError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Geocoding(_) => ErrorCategory::Geocoding,
            Self::NotFound { .. } | Self::Store { .. } => ErrorCategory::Store,
            Self::Csv(_) | Self::Serialization(_) => ErrorCategory::Export,
            Self::Config { .. } | Self::Toml(_) => ErrorCategory::Configuration,
            Self::Io(_) => ErrorCategory::System,
        }
    }

    /// Short message suitable for showing to whoever triggered the action.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Validation { field, message } => format!("Invalid input for {}: {}", field, message),
            Self::Geocoding(GeocodingError::Network(_)) => {
                "The geocoding service could not be reached".to_string()
            }
            Self::Geocoding(e) => e.to_string(),
            Self::NotFound { entity, id } => format!("No {} with id {}", entity, id),
            Self::Store { .. } => "Saving or loading data failed, nothing was changed".to_string(),
            Self::Config { message } => format!("Configuration problem: {}", message),
            Self::Toml(_) => "The configuration file is not valid TOML".to_string(),
            Self::Csv(_) | Self::Serialization(_) => "The export could not be generated".to_string(),
            Self::Io(e) => format!("File system error: {}", e),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Validation => 2,
            ErrorCategory::Geocoding => 3,
            ErrorCategory::Store => 4,
            ErrorCategory::Export => 5,
            ErrorCategory::Configuration => 6,
            ErrorCategory::System => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocoding_errors_keep_their_category() {
        let err: DirectoryError = GeocodingError::RateLimited.into();
        assert_eq!(err.category(), ErrorCategory::Geocoding);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().contains("Rate limit"));
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = DirectoryError::validation("name", "Name cannot be empty");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.to_string().contains("'name'"));
    }
}
