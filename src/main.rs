use chrono::Utc;
use clap::Parser;
use consult_map::config::cli::Command;
use consult_map::core::directory::{DirectoryService, ServiceOptions};
use consult_map::core::{ConfigProvider, Storage};
use consult_map::domain::model::{Company, SpecializationInput};
use consult_map::utils::format::{format_currency, format_number};
use consult_map::utils::{logger, validation::Validate};
use consult_map::{AppConfig, CliConfig, JsonRecordStore, LocalStorage, NominatimGeocoder};

type Service = DirectoryService<JsonRecordStore<LocalStorage>, NominatimGeocoder>;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting consult-map");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> consult_map::Result<()> {
    let config = cli.resolve()?;

    // 驗證配置
    config.validate()?;

    let service = build_service(&config);

    match cli.command {
        Command::List(filter) => {
            let companies = service.companies(&filter.to_state()).await?;
            for company in &companies {
                print_company(company);
            }
            println!("{} companies", companies.len());
        }
        Command::Export { format, filter } => {
            let artifact = service.export(format, &filter.to_state(), Utc::now()).await?;
            let output = LocalStorage::new(config.output_path());
            output.write_file(&artifact.filename, &artifact.bytes).await?;
            println!("📁 {}", output.full_path(&artifact.filename).display());
        }
        Command::Stats => {
            let companies = service.company_stats().await?;
            println!("Companies:       {}", format_number(companies.total_companies as u64));
            println!("Cities:          {}", format_number(companies.unique_cities as u64));
            println!("Specializations: {}", format_number(companies.unique_specializations as u64));

            let cities = service.city_stats().await?;
            println!();
            println!("Tracked cities:  {}", format_number(cities.total as u64));
            println!("Population:      {}", format_number(cities.total_population));
            println!("Digital budget:  {}", format_currency(cities.total_budget));
            for (category, count) in &cities.by_category {
                println!("  {:<12} {}", category.label(), count);
            }

            println!();
            for entry in service.city_counts().await? {
                println!("  {:<24} {}", entry.city, entry.count);
            }
        }
        Command::Cities => {
            for city in service.cities().await? {
                println!(
                    "{}  {} ({}, {} inhabitants, budget {})",
                    city.id,
                    city.name,
                    city.city_category,
                    format_number(city.population),
                    format_currency(city.digitalization_budget)
                );
            }
        }
        Command::Specializations => {
            for spec in service.specializations().await? {
                println!("{}  {} {} {}", spec.id, spec.icon, spec.name, spec.color);
            }
        }
        Command::Geocode { address } => {
            let result = service.geocode(&address).await?;
            println!("{}, {}", result.lat, result.lng);
        }
        Command::ReverseGeocode { point } => {
            println!("{}", service.reverse_geocode(point).await?);
        }
        Command::AddCompany(args) => {
            let company = service.create_company(args.into()).await?;
            println!("✅ Created company {}", company.id);
        }
        Command::AddCity(args) => {
            let city = service.create_city(args.into()).await?;
            println!("✅ Created city {} ({})", city.id, city.city_category);
        }
        Command::AddSpecialization { name, icon, color } => {
            let spec = service
                .create_specialization(SpecializationInput { name, icon, color })
                .await?;
            println!("✅ Created specialization {}", spec.id);
        }
        Command::DeleteCompany { id } => {
            service.delete_company(&id).await?;
            println!("🗑️  Deleted company {}", id);
        }
        Command::DeleteCity { id } => {
            service.delete_city(&id).await?;
            println!("🗑️  Deleted city {}", id);
        }
        Command::DeleteSpecialization { id } => {
            service.delete_specialization(&id).await?;
            println!("🗑️  Deleted specialization {}", id);
        }
    }

    Ok(())
}

fn build_service(config: &AppConfig) -> Service {
    let store = JsonRecordStore::new(LocalStorage::new("."), config.data_file());
    let geocoder = NominatimGeocoder::new(config.geocoder.base_url.clone())
        .with_user_agent(config.geocoder.user_agent.clone())
        .with_country_codes(config.geocoder.country_codes.clone());
    DirectoryService::with_options(store, geocoder, ServiceOptions::from_config(config))
}

fn print_company(company: &Company) {
    let city = company.city.as_deref().unwrap_or("-");
    let specs = company.specialization_names().join(", ");
    println!("{}  {} [{}] {}", company.id, company.name, city, specs);
}
