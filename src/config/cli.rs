use crate::config::toml_config::AppConfig;
use crate::core::export::ExportFormat;
use crate::domain::model::{CityCategory, CityInput, CompanyInput, FilterState, GeoPoint, SortOption};
use crate::utils::error::Result;
use crate::utils::validation::validate_coordinates;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "consult-map")]
#[command(about = "Directory of consulting companies in Lower Saxony: filter, export and maintain records")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// JSON file holding companies, cities and specializations
    #[arg(long, global = true)]
    pub data_file: Option<String>,

    /// Directory exports are written to
    #[arg(long, global = true)]
    pub output_path: Option<String>,

    /// Base URL of a Nominatim-compatible geocoder
    #[arg(long, global = true)]
    pub geocoder_url: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List companies matching the filter
    List(FilterArgs),
    /// Export the filtered companies as csv, geojson or pdf
    Export {
        #[arg(long, short, default_value = "csv")]
        format: ExportFormat,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Company and city statistics
    Stats,
    /// List cities, largest first
    Cities,
    /// List specializations
    Specializations,
    /// Resolve an address to coordinates
    Geocode { address: String },
    /// Resolve coordinates to a place name
    ReverseGeocode {
        #[arg(value_parser = parse_point)]
        point: GeoPoint,
    },
    AddCompany(CompanyArgs),
    AddCity(CityArgs),
    AddSpecialization {
        name: String,
        #[arg(long, default_value = "📌")]
        icon: String,
        #[arg(long, default_value = "#3B82F6")]
        color: String,
    },
    DeleteCompany { id: String },
    DeleteCity { id: String },
    DeleteSpecialization { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Case-insensitive text matched against name, description and address
    #[arg(long, short)]
    pub search: Option<String>,

    /// Specialization id; repeat to require several
    #[arg(long = "spec")]
    pub specializations: Vec<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long, default_value = "alphabetical")]
    pub sort: SortOption,

    /// Reference point for `--sort nearest`, as LAT,LNG
    #[arg(long, value_parser = parse_point)]
    pub near: Option<GeoPoint>,
}

impl FilterArgs {
    pub fn to_state(&self) -> FilterState {
        let mut state = FilterState::default()
            .with_search(self.search.clone().unwrap_or_default())
            .with_sort(self.sort)
            .with_city(self.city.clone())
            .with_origin(self.near);
        for id in &self.specializations {
            state = state.with_specialization(id.clone());
        }
        state
    }
}

#[derive(Debug, Clone, Args)]
pub struct CompanyArgs {
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long = "spec")]
    pub specialization_ids: Vec<String>,
}

impl From<CompanyArgs> for CompanyInput {
    fn from(args: CompanyArgs) -> Self {
        CompanyInput {
            name: args.name,
            description: args.description,
            address: args.address,
            city: args.city,
            latitude: args.latitude,
            longitude: args.longitude,
            website: args.website,
            email: args.email,
            phone: args.phone,
            specialization_ids: args.specialization_ids,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct CityArgs {
    pub name: String,
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,
    #[arg(long)]
    pub population: u64,
    #[arg(long, default_value = "0")]
    pub budget: f64,
    /// Großstadt, Mittelstadt or Kleinstadt; derived from population if omitted
    #[arg(long)]
    pub category: Option<CityCategory>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
}

impl From<CityArgs> for CityInput {
    fn from(args: CityArgs) -> Self {
        CityInput {
            name: args.name,
            latitude: args.latitude,
            longitude: args.longitude,
            population: args.population,
            digitalization_budget: args.budget,
            city_category: args.category,
            description: args.description,
            website: args.website,
        }
    }
}

/// `LAT,LNG` -> GeoPoint
pub fn parse_point(raw: &str) -> std::result::Result<GeoPoint, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got '{}'", raw))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude '{}'", lat))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude '{}'", lng))?;
    validate_coordinates(Some(lat), Some(lng)).map_err(|e| e.to_string())?;
    Ok(GeoPoint::new(lat, lng))
}

impl CliConfig {
    /// Load the TOML file (if any) and apply command-line overrides on top.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                AppConfig::from_file(path)?
            }
            None => AppConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(data_file) = &self.data_file {
            config.store.data_file = data_file.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.export.output_path = output_path.clone();
        }
        if let Some(url) = &self.geocoder_url {
            config.geocoder.base_url = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let point = parse_point("52.37, 9.73").unwrap();
        assert_eq!(point, GeoPoint::new(52.37, 9.73));
        assert!(parse_point("52.37").is_err());
        assert!(parse_point("north,9.73").is_err());
        assert!(parse_point("95,9.73").is_err());
    }

    #[test]
    fn test_export_with_filter_flags() {
        let cli = CliConfig::try_parse_from([
            "consult-map",
            "export",
            "--format",
            "pdf",
            "--search",
            "cloud",
            "--spec",
            "s1",
            "--spec",
            "s2",
            "--sort",
            "nearest",
            "--near",
            "52.37,9.73",
        ])
        .unwrap();

        let Command::Export { format, filter } = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(format, ExportFormat::Pdf);

        let state = filter.to_state();
        assert_eq!(state.search_query, "cloud");
        assert_eq!(state.selected_specialization_ids.len(), 2);
        assert_eq!(state.sort_by, SortOption::Nearest);
        assert_eq!(state.origin, Some(GeoPoint::new(52.37, 9.73)));
        assert_eq!(state.selected_city, None);
    }

    #[test]
    fn test_global_flags_override_config() {
        let cli = CliConfig::try_parse_from([
            "consult-map",
            "stats",
            "--data-file",
            "other.json",
            "--geocoder-url",
            "http://localhost:9000",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);

        let config = cli.resolve().unwrap();
        assert_eq!(config.store.data_file, "other.json");
        assert_eq!(config.geocoder.base_url, "http://localhost:9000");
        assert_eq!(config.export.output_path, "./exports");
    }

    #[test]
    fn test_add_city_leaves_category_unset() {
        let cli = CliConfig::try_parse_from([
            "consult-map",
            "add-city",
            "Celle",
            "--latitude",
            "52.62",
            "--longitude",
            "10.08",
            "--population",
            "69000",
        ])
        .unwrap();
        let Command::AddCity(args) = cli.command else {
            panic!("expected add-city command");
        };
        let input = CityInput::from(args);
        assert_eq!(input.city_category, None);
        assert_eq!(input.digitalization_budget, 0.0);
    }
}
