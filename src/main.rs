use care_locator::care::NearbyCareService;
use care_locator::geo::{consultation_channel, consultation_groups, Coordinate, FacilityFinder, GeoConfig, Geocoder};
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Care Locator — find hospitals near a patient's address
///
/// Geocodes addresses with OpenStreetMap Nominatim and searches the Overpass
/// API for nearby hospitals. Results are printed as JSON on stdout.
///
/// Examples:
///   care-locator geocode "Kariakoo, Dar es Salaam"
///   care-locator hospitals --lat -6.7924 --lon 39.2083 --radius-km 5
///   care-locator distance -6.7924 39.2083 -1.2921 36.8219
///   care-locator nearby "Upanga, Dar es Salaam"
///   care-locator channels
///   care-locator channels telegram
///   care-locator serve --port 8080
#[derive(Parser)]
#[command(name = "care-locator", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the Nominatim search endpoint.
    #[arg(long, global = true)]
    nominatim_url: Option<String>,

    /// Override the Overpass interpreter endpoint.
    #[arg(long, global = true)]
    overpass_url: Option<String>,

    /// Comma-separated ISO country codes for geocoding (e.g. "tz,ke").
    /// Pass an empty string to search worldwide.
    #[arg(long, global = true)]
    countries: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an address to coordinates.
    Geocode { address: String },

    /// List hospitals around a coordinate, closest first.
    Hospitals {
        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Search radius in kilometres. Defaults to 10.
        #[arg(long)]
        radius_km: Option<f64>,
    },

    /// Great-circle distance in kilometres between two points.
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },

    /// Geocode an address and list hospitals near it.
    Nearby { address: String },

    /// Show the consultation group links, or one channel by identifier.
    Channels {
        /// Channel identifier, e.g. "whatsapp" or "telegram".
        id: Option<String>,
    },

    /// Start the HTTP API server.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("care_locator=info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    match cli.command {
        Command::Geocode { ref address } => {
            let result = Geocoder::new(config).resolve(address).unwrap_or_else(|| {
                fail(&format!("Could not resolve address '{}'", address));
            });
            print_json(&result);
        }
        Command::Hospitals { lat, lon, radius_km } => {
            let center = checked_coordinate(lat, lon);
            let finder = FacilityFinder::new(config);
            let radius_km = radius_km.unwrap_or(finder.config().default_radius_km);
            if !(radius_km.is_finite() && radius_km > 0.0) {
                fail("--radius-km must be a positive number");
            }
            print_json(&finder.find_hospitals(center, radius_km));
        }
        Command::Distance { lat1, lon1, lat2, lon2 } => {
            let from = checked_coordinate(lat1, lon1);
            let to = checked_coordinate(lat2, lon2);
            let km = from.distance_km(&to);
            print_json(&serde_json::json!({
                "distance_km": care_locator::geo::distance::round_km(km),
                "distance_text": care_locator::geo::distance::format_km(km),
            }));
        }
        Command::Nearby { ref address } => {
            let care = NearbyCareService::new(config).lookup(Some(address));
            print_json(&care);
        }
        Command::Channels { id: None } => print_json(&consultation_groups()),
        Command::Channels { id: Some(ref id) } => {
            let channel = consultation_channel(id).unwrap_or_else(|| {
                fail(&format!("Unknown consultation channel '{}'", id));
            });
            print_json(channel);
        }
        Command::Serve { ref host, port } => {
            let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
                fail(&format!("Cannot start async runtime: {}", e));
            });
            runtime.block_on(care_locator::server::start(host, port, config));
        }
    }
}

fn build_config(cli: &Cli) -> GeoConfig {
    let mut config = GeoConfig::default();
    if let Some(ref url) = cli.nominatim_url {
        config = config.with_nominatim_url(url.clone());
    }
    if let Some(ref url) = cli.overpass_url {
        config = config.with_overpass_url(url.clone());
    }
    if let Some(ref countries) = cli.countries {
        config = config.with_country_codes(countries.split(','));
    }
    config
}

fn checked_coordinate(lat: f64, lon: f64) -> Coordinate {
    let c = Coordinate::new(lat, lon);
    if !c.is_valid() {
        fail("Invalid coordinates. Lat: -90..90, Lon: -180..180");
    }
    c
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&format!("Cannot serialise output: {}", e)),
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}
