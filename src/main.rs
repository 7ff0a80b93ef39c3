use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use holiday_search::config::{load_settings, Settings};
use holiday_search::models::BestHotelOffer;
use holiday_search::search::codec::{self, format_date};
use holiday_search::search::{
    HttpOfferClient, MemoryNavigator, Query, SearchDefaults, SearchForm, SearchState,
    SearchStateController,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "holiday-search", about = "Search hotel offers from the command line")]
struct Cli {
    /// Offers API base URL (overrides HOLIDAY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Write results to this file as JSON
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open a search page URL (or bare query) and show its offers
    Open { location: String },
    /// Run a new search
    Search(SearchArgs),
    /// List all offers of one hotel for the search in a URL
    Offers { hotel_id: i64, location: String },
}

#[derive(Debug, clap::Args)]
struct SearchArgs {
    /// Departure airport code, repeatable
    #[arg(long = "airport")]
    airports: Vec<String>,
    #[arg(long, default_value_t = SearchDefaults::COUNT_ADULTS, allow_negative_numbers = true)]
    adults: i32,
    #[arg(long, default_value_t = SearchDefaults::COUNT_CHILDREN, allow_negative_numbers = true)]
    children: i32,
    /// Trip length in days
    #[arg(long, default_value_t = SearchDefaults::DURATION, allow_negative_numbers = true)]
    duration: i32,
    /// Earliest departure (YYYY-MM-DD or ISO-8601 date-time)
    #[arg(long, default_value = "")]
    earliest: String,
    /// Latest return (YYYY-MM-DD or ISO-8601 date-time)
    #[arg(long, default_value = "")]
    latest: String,
    #[arg(long, default_value = "")]
    meal_type: String,
    #[arg(long, default_value = "")]
    room_type: String,
    #[arg(long)]
    ocean_view: bool,
}

impl From<SearchArgs> for SearchForm {
    fn from(args: SearchArgs) -> Self {
        SearchForm {
            departure_airports: args.airports,
            count_adults: args.adults,
            count_children: args.children,
            duration: args.duration,
            earliest_departure: args.earliest,
            latest_return: args.latest,
            meal_type: args.meal_type,
            room_type: args.room_type,
            ocean_view: args.ocean_view,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }

    match cli.command {
        Command::Open { location } => {
            let navigator = MemoryNavigator::from_url(&location);
            let mut controller = controller(&settings, navigator)?;
            if controller.load_initial().await.is_none() {
                info!("No search in this URL; pass one with `search` or add earliestDepartureDate");
                return Ok(());
            }
            report(&controller, cli.output.as_ref()).await
        }
        Command::Search(args) => {
            let navigator = MemoryNavigator::new(settings.page_path.clone());
            let mut controller = controller(&settings, navigator)?;
            controller.search(args.into()).await;
            report(&controller, cli.output.as_ref()).await
        }
        Command::Offers { hotel_id, location } => {
            let params = codec::decode(&Query::parse(&location));
            let client = HttpOfferClient::new(&settings).context("Failed to create offers client")?;
            let hotel = client
                .hotel_offers(hotel_id, &params)
                .await
                .with_context(|| format!("Failed to fetch offers for hotel {hotel_id}"))?;

            println!(
                "{} ({} offers)",
                hotel.hotel.name.as_deref().unwrap_or("Unnamed hotel"),
                hotel.items.len()
            );
            for (i, offer) in hotel.items.iter().enumerate() {
                println!(
                    "{}. {:.2} EUR  {} -> {}  from {}",
                    i + 1,
                    offer.price,
                    offer.outbound_departure_datetime,
                    offer.inbound_departure_datetime,
                    offer.outbound_departure_airport
                );
                println!(
                    "   {} / {}, ocean view: {}",
                    offer.room_type, offer.meal_type, offer.ocean_view
                );
            }
            write_json(cli.output.as_ref(), &hotel).await
        }
    }
}

fn controller(
    settings: &Settings,
    navigator: MemoryNavigator,
) -> anyhow::Result<SearchStateController<HttpOfferClient, MemoryNavigator>> {
    let client = HttpOfferClient::new(settings).context("Failed to create offers client")?;
    Ok(SearchStateController::new(client, navigator))
}

async fn report(
    controller: &SearchStateController<HttpOfferClient, MemoryNavigator>,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let params = controller.params();
    for field in controller.last_report().malformed() {
        info!("Ignored unparseable value for {}", field);
    }
    info!(
        "Search {} -> {}, {} days, {} adults, {} children",
        format_date(params.earliest_departure_date),
        format_date(params.latest_return_date),
        params.duration,
        params.count_adults,
        params.count_children
    );

    let offers = match controller.state() {
        SearchState::Loaded(offers) => offers,
        SearchState::Failed(message) => bail!("Search failed: {message}"),
        SearchState::Idle | SearchState::Loading => return Ok(()),
    };

    info!("✅ Found {} hotels", offers.len());
    for (i, offer) in offers.iter().enumerate() {
        print_offer(i, offer);
        println!("   Offers: {}", codec::offers_link(params, offer.hotel_id()));
        println!();
    }
    println!("Share this search: {}", controller.navigator().location());

    write_json(output, offers).await
}

fn print_offer(i: usize, offer: &BestHotelOffer) {
    let stars = offer
        .hotel
        .stars
        .map(|s| format!(" {s}*"))
        .unwrap_or_default();
    println!(
        "{}. {}{} (from {:.2} EUR)",
        i + 1,
        offer.hotel.name.as_deref().unwrap_or("Unnamed hotel"),
        stars,
        offer.min_price
    );
    println!(
        "   {} -> {}, {} days, {} offers",
        offer.departure_date, offer.return_date, offer.duration, offer.count_available_offers
    );
    if let Some(room) = &offer.room_type {
        println!("   Room: {}", room);
    }
    if let Some(meal) = &offer.meal_type {
        println!("   Meal: {}", meal);
    }
}

async fn write_json<T: Serialize + ?Sized>(
    output: Option<&PathBuf>,
    value: &T,
) -> anyhow::Result<()> {
    let Some(path) = output else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Saved results to {}", path.display());
    Ok(())
}
