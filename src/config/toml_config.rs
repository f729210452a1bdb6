use crate::adapters::nominatim::{DEFAULT_BASE_URL, DEFAULT_COUNTRY_CODES, DEFAULT_USER_AGENT};
use crate::core::directory::{DEFAULT_REGION_SUFFIX, DEFAULT_REPORT_TITLE};
use crate::core::export::DEFAULT_DATASET_NAME;
use crate::core::ConfigProvider;
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub country_codes: String,
    pub region_suffix: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_codes: DEFAULT_COUNTRY_CODES.to_string(),
            region_suffix: DEFAULT_REGION_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dataset_name: String,
    pub report_title: String,
    pub output_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            output_path: "./exports".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: "directory.json".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${GEOCODER_URL})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DirectoryError::Config {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("geocoder.base_url", &self.geocoder.base_url)?;
        validate_non_empty_string("geocoder.user_agent", &self.geocoder.user_agent)?;
        validate_non_empty_string("export.dataset_name", &self.export.dataset_name)?;
        validate_non_empty_string("export.report_title", &self.export.report_title)?;
        validate_non_empty_string("export.output_path", &self.export.output_path)?;
        validate_non_empty_string("store.data_file", &self.store.data_file)?;

        if self.export.dataset_name.contains(['/', '\\']) {
            return Err(DirectoryError::Config {
                message: "export.dataset_name must not contain path separators".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn data_file(&self) -> &str {
        &self.store.data_file
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn dataset_name(&self) -> &str {
        &self.export.dataset_name
    }

    fn report_title(&self) -> &str {
        &self.export.report_title
    }

    fn region_suffix(&self) -> &str {
        &self.geocoder.region_suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.dataset_name(), "niedersachsen-beratungsunternehmen");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[geocoder]
base_url = "http://localhost:8080"
region_suffix = "Bremen, Deutschland"

[export]
report_title = "Beratung im Norden"
"#;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.geocoder.base_url, "http://localhost:8080");
        assert_eq!(config.geocoder.user_agent, "NiedersachsenBeratungsMap/1.0");
        assert_eq!(config.region_suffix(), "Bremen, Deutschland");
        assert_eq!(config.report_title(), "Beratung im Norden");
        assert_eq!(config.data_file(), "directory.json");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONSULT_MAP_TEST_GEOCODER", "https://geo.example.org");

        let toml_content = r#"
[geocoder]
base_url = "${CONSULT_MAP_TEST_GEOCODER}"
user_agent = "${CONSULT_MAP_TEST_UNSET_AGENT}"
"#;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.geocoder.base_url, "https://geo.example.org");
        assert_eq!(config.geocoder.user_agent, "${CONSULT_MAP_TEST_UNSET_AGENT}");

        std::env::remove_var("CONSULT_MAP_TEST_GEOCODER");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str("[geocoder]\nbase_url = \"not a url\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[export]\ndataset_name = \"../escape\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = AppConfig::from_toml_str("[geocoder\n").unwrap_err();
        assert!(matches!(err, DirectoryError::Toml(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[store]\ndata_file = \"data/companies.json\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_file(), "data/companies.json");
    }
}
