// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use route_demand_core::live::{AviationStackClient, FlightRecord, LiveFlights, ACCESS_KEY_VAR};
use route_demand_core::ranking::RouteFrequency;
use route_demand_core::{
    CountryFilter, Dashboard, DashboardSettings, FeedSource, FeedSources, RouteDetails, TopN,
};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

const BAR_WIDTH: usize = 40;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Airports feed (URL or file, `.gz` accepted)
    #[arg(long, env = "ROUTE_DEMAND_AIRPORTS")]
    airports: Option<FeedSource>,

    /// Routes feed (URL or file, `.gz` accepted)
    #[arg(long, env = "ROUTE_DEMAND_ROUTES")]
    routes: Option<FeedSource>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List source countries available as filters
    Countries,
    /// Show the most frequent routes
    Top {
        /// Number of routes (5..=200)
        #[arg(short = 'n', long, default_value_t = TopN::DEFAULT)]
        top_n: usize,
        /// Origin country, or "All"
        #[arg(short, long, default_value = "All")]
        country: CountryFilter,
    },
    /// List the routes offered for selection
    Routes {
        #[arg(short, long, default_value = "All")]
        country: CountryFilter,
    },
    /// Show simulated price and booking trends for a route (e.g. SYD-MEL)
    Trend {
        route: String,
        #[arg(long, default_value_t = route_demand_core::trend::SIMULATION_MONTHS)]
        months: usize,
        #[arg(long, default_value_t = route_demand_core::trend::DEFAULT_SEED)]
        seed: u64,
    },
    /// Fetch live flights for a route from AviationStack
    Flights {
        route: String,
        #[arg(long, default_value_t = route_demand_core::live::DEFAULT_FLIGHT_LIMIT)]
        limit: u32,
        #[arg(long, env = ACCESS_KEY_VAR, hide_env_values = true)]
        access_key: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let defaults = FeedSources::default();
    let sources = FeedSources {
        airports: cli.airports.unwrap_or(defaults.airports),
        routes: cli.routes.unwrap_or(defaults.routes),
    };

    let mut settings = DashboardSettings::default();
    if let Commands::Trend { months, seed, .. } = &cli.command {
        settings.months = *months;
        settings.seed = *seed;
    }
    let mut dashboard = Dashboard::new(sources, settings);

    match &cli.command {
        Commands::Countries => {
            let countries = dashboard.countries()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&countries)?);
            } else {
                println!("{}", CountryFilter::All);
                for country in countries {
                    println!("{}", country);
                }
            }
        }
        Commands::Top { top_n, country } => {
            let top_n = TopN::new(*top_n);
            let top = dashboard.top_routes(top_n, country)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&top)?);
            } else {
                println!("Top {} routes — origin country: {}", top_n.get(), country);
                print_ranking(&top);
            }
        }
        Commands::Routes { country } => {
            let choices = dashboard.route_choices(country)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&choices)?);
            } else {
                for route in choices {
                    println!("{}", route);
                }
            }
        }
        Commands::Trend { route, .. } => {
            let details = dashboard.route_details(route)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                print_trend(&details);
            }
        }
        Commands::Flights {
            route,
            limit,
            access_key,
        } => {
            let details = dashboard.route_details(route)?;
            let selected = format!(
                "Selected route: {} → {}",
                details.origin(),
                details.destination()
            );
            // Keep stdout machine-readable in JSON mode
            if cli.json {
                eprintln!("{}", selected);
            } else {
                println!("{}", selected);
            }

            let gateway = AviationStackClient::new(access_key.clone());
            match details.live_flights(&gateway, *limit) {
                Ok(flights) if cli.json => println!("{}", flights_json(&flights)?),
                Ok(LiveFlights::Found(records)) => print_flights(&records),
                Ok(LiveFlights::Empty) => {
                    println!(
                        "No live flights found for this route. Try a busier one like SYD-MEL or LHR-CDG."
                    );
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Always a JSON array; "no results" is `[]`.
fn flights_json(flights: &LiveFlights) -> serde_json::Result<String> {
    serde_json::to_string_pretty(flights.records())
}

fn print_ranking(records: &[RouteFrequency]) {
    let max = records.iter().map(|r| r.count).max().unwrap_or(0);
    for (i, r) in records.iter().enumerate() {
        let bar_len = if max == 0 {
            0
        } else {
            (r.count * BAR_WIDTH).div_ceil(max)
        };
        println!(
            "{:>4}  {:<9} {:>5}  {}",
            i + 1,
            r.route_id,
            r.count,
            "#".repeat(bar_len)
        );
    }
}

fn print_trend(details: &RouteDetails) {
    let route = &details.route;
    let place = |city: Option<&str>, country: Option<&str>| match (city, country) {
        (Some(city), Some(country)) => format!("{}, {}", city, country),
        (Some(city), None) => city.to_string(),
        _ => "unknown airport".to_string(),
    };
    println!(
        "{}: {} → {}",
        route.route_id,
        place(route.source_city(), route.source_country()),
        place(route.dest_city(), route.dest_country())
    );

    let trend = &details.trend;
    println!(
        "Simulated trends, {} months, seed {}",
        trend.prices.len(),
        trend.seed
    );
    println!("{:<8} {:>9} {:>9}", "month", "price", "bookings");
    for (p, b) in trend.prices.iter().zip(&trend.bookings) {
        println!(
            "{:<8} {:>9.2} {:>9}",
            p.month.format("%Y-%m"),
            p.price,
            b.bookings
        );
    }

    if let (Some(min), Some(max), Some(mean)) =
        (trend.min_price(), trend.max_price(), trend.mean_price())
    {
        println!("price min {:.2}  max {:.2}  mean {:.2}", min, max, mean);
    }
    if let Some(peak) = trend.peak_booking_month() {
        println!(
            "bookings total {}  peak {} in {}",
            trend.total_bookings(),
            peak.bookings,
            peak.month.format("%Y-%m")
        );
    }
}

fn print_flights(records: &[FlightRecord]) {
    let columns = FlightRecord::present_columns(records);
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| {
            records
                .iter()
                .filter_map(|r| r.get(c))
                .map(str::len)
                .chain(std::iter::once(c.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect();
    println!("{}", header.join("  "));

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", record.get(c).unwrap_or(""), w = *w))
            .collect();
        println!("{}", row.join("  ").trim_end());
    }
}
