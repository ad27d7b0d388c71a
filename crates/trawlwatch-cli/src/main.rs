//! TrawlWatch operator CLI
//!
//! Fetches backend data into a map session and prints what the dashboard
//! would show.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trawlwatch_cli::report::{metrics_rows, summarize_layers, totals_lines};
use trawlwatch_cli::{Config, RestClient};
use trawlwatch_domain::{format_duration, MetricsQuery, Order, VesselId, ZoneCategory};
use trawlwatch_map::layers::vessels::{recency_opacity, select_positions};
use trawlwatch_map::stores::{FilterDimension, ModeKind, SegmentMode};
use trawlwatch_map::{load_metrics, load_reference_data, refresh_positions, track_vessel, MapSession};

#[derive(Parser, Debug)]
#[command(name = "trawlwatch")]
#[command(about = "Inspect TrawlWatch vessel data from the terminal")]
struct Args {
    /// API base URL (overrides TRAWLWATCH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// API key (overrides TRAWLWATCH_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List vessels, optionally searching by name, MMSI or IMO
    Vessels {
        #[arg(short, long)]
        search: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Latest positions as drawn in position mode
    Positions {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Track vessels and summarise their excursions
    Track {
        /// Vessel ids, in palette order
        #[arg(required = true)]
        vessel_ids: Vec<VesselId>,

        /// Keep excursions overlapping this day or later (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Keep excursions overlapping this day or earlier (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Frame the camera on this excursion
        #[arg(long)]
        focus: Option<i64>,

        /// Colour segments by speed instead of by vessel
        #[arg(long)]
        by_speed: bool,

        /// Add segment start markers
        #[arg(long)]
        show_positions: bool,

        /// Print the derived layers as JSON
        #[arg(long)]
        layers: bool,
    },

    /// Print every derived layer as JSON
    Layers {
        #[arg(long, value_enum, default_value = "position")]
        mode: ModeArg,

        /// Zone categories to draw; none draws all
        #[arg(long = "zone", value_enum)]
        zones: Vec<ZoneArg>,

        /// Vessels to track before deriving
        #[arg(long = "track")]
        tracked: Vec<VesselId>,

        /// Print one summary line per layer instead of full JSON
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Ranked time at sea and zone visits
    Metrics {
        /// Window length ending now
        #[arg(long, default_value = "30")]
        days: i64,

        #[arg(long, default_value = "10")]
        limit: u32,

        /// Lowest first
        #[arg(long)]
        asc: bool,
    },

    /// Refresh latest positions on an interval
    Poll {
        /// Overrides POSITIONS_REFRESH_SECS
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Stop after this many refreshes
        #[arg(long)]
        iterations: Option<u32>,
    },
}

#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    /// Vessel type filter, repeatable
    #[arg(long = "type")]
    types: Vec<String>,

    /// Length class filter, repeatable
    #[arg(long = "class")]
    classes: Vec<String>,

    /// ISO3 country filter, repeatable
    #[arg(long = "country")]
    countries: Vec<String>,
}

impl FilterArgs {
    fn apply(self, session: &mut MapSession) {
        session.vessels.set_filter(FilterDimension::Type, self.types);
        session.vessels.set_filter(FilterDimension::LengthClass, self.classes);
        session.vessels.set_filter(FilterDimension::Country, self.countries);
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    Position,
    Track,
}

impl From<ModeArg> for ModeKind {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Position => Self::Position,
            ModeArg::Track => Self::Track,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ZoneArg {
    Amp,
    TerritorialSeas,
    FishingCoastalWaters,
}

impl From<ZoneArg> for ZoneCategory {
    fn from(zone: ZoneArg) -> Self {
        match zone {
            ZoneArg::Amp => Self::Amp,
            ZoneArg::TerritorialSeas => Self::TerritorialSeas,
            ZoneArg::FishingCoastalWaters => Self::FishingCoastalWaters,
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::seconds(1)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(key) = args.api_key {
        config.api_key = key;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into());
    tracing_subscriber::registry()
        .with(filter)
        .with(args.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!args.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    info!(api = %config.api_url, "TrawlWatch CLI");
    let client = RestClient::new(&config);
    let mut session = MapSession::default();

    match args.command {
        Command::Vessels { search, filters } => {
            load_reference_data(&mut session, &client).await;
            filters.apply(&mut session);
            let vessels: Vec<_> = match search.as_deref() {
                Some(query) => session.vessels.search(query),
                None => session.vessels.vessels().iter().collect(),
            };
            for vessel in vessels.into_iter().filter(|v| session.vessels.filters().matches(v)) {
                println!(
                    "{:>6}  {:<28} {:<12} {:<8} {}",
                    vessel.id,
                    vessel.display_name(),
                    vessel.vessel_type.as_deref().unwrap_or("-"),
                    vessel.length_class.as_deref().unwrap_or("-"),
                    vessel.country_iso3.as_deref().unwrap_or("-"),
                );
            }
        }

        Command::Positions { filters } => {
            load_reference_data(&mut session, &client).await;
            filters.apply(&mut session);
            let now = Utc::now();
            for position in select_positions(&session.snapshot(now)) {
                println!(
                    "{:<28} {:>9.4} {:>9.4} {:>6} kn  {:>8} ago  opacity {:.2}",
                    position.vessel.display_name(),
                    position.position.longitude(),
                    position.position.latitude(),
                    position.speed.map_or_else(|| "-".to_string(), |s| format!("{s:.1}")),
                    format_duration(u64::try_from((now - position.timestamp).num_seconds()).unwrap_or(0)),
                    recency_opacity(position.timestamp, now),
                );
            }
        }

        Command::Track { vessel_ids, from, to, focus, by_speed, show_positions, layers } => {
            session.track.set_start_date(from.map(start_of_day));
            if !session.track.set_end_date(to.map(end_of_day)) {
                bail!("--to must not be before --from");
            }
            if by_speed {
                session.track.set_segment_mode(SegmentMode::Speed);
            }
            session.track.set_show_positions(show_positions);

            load_reference_data(&mut session, &client).await;
            for vessel_id in &vessel_ids {
                let outcome = track_vessel(&mut session, &client, *vessel_id).await;
                info!(vessel_id, ?outcome, "tracked");
            }
            session.set_mode(ModeKind::Track);

            for vessel_id in &vessel_ids {
                let name = session
                    .vessels
                    .get(*vessel_id)
                    .map_or_else(|| format!("Vessel #{vessel_id}"), |v| v.display_name());
                let totals = session
                    .vessel_totals(*vessel_id)
                    .with_context(|| format!("summing excursions of vessel {vessel_id}"))?;
                println!("{name}: {} excursions", session.track.vessel_excursions(*vessel_id).len());
                for (label, value) in totals_lines(&totals) {
                    println!("  {label:<20} {value}");
                }
            }

            if let Some(excursion_id) = focus {
                match session.focus_excursion(excursion_id) {
                    Some(view) => println!(
                        "camera -> lng {:.4} lat {:.4} zoom {}",
                        view.longitude, view.latitude, view.zoom
                    ),
                    None => warn!(excursion_id, "excursion not found among tracked vessels"),
                }
            }

            if layers {
                println!("{}", serde_json::to_string_pretty(&session.layers(Utc::now()))?);
            }
        }

        Command::Layers { mode, zones, tracked, summary, filters } => {
            load_reference_data(&mut session, &client).await;
            filters.apply(&mut session);
            for category in zones {
                session.map_view.toggle_zone_category(category.into());
            }
            for vessel_id in tracked {
                track_vessel(&mut session, &client, vessel_id).await;
            }
            session.set_mode(mode.into());

            let layers = session.layers(Utc::now());
            if summary {
                for line in summarize_layers(&layers) {
                    println!("{:<40} {:<8} {:<6} {}", line.id, line.kind, line.visible, line.items);
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&layers)?);
            }
        }

        Command::Metrics { days, limit, asc } => {
            let end_at = Utc::now();
            let query = MetricsQuery {
                limit,
                order: if asc { Order::Asc } else { Order::Desc },
                ..MetricsQuery::new(end_at - Duration::days(days), end_at)
            };
            load_metrics(&mut session, &client, &query).await;
            let (vessels, zones) = metrics_rows(&session.metrics)?;

            println!("=== TIME AT SEA ===");
            for (rank, (name, duration)) in vessels.iter().enumerate() {
                println!("#{:<3} {name:<28} {duration}", rank + 1);
            }
            println!("=== ZONE VISITS ===");
            for (rank, (name, duration)) in zones.iter().enumerate() {
                println!("#{:<3} {name:<28} {duration}", rank + 1);
            }
        }

        Command::Poll { interval_secs, iterations } => {
            let period = interval_secs.map_or(config.positions_refresh, std::time::Duration::from_secs);
            info!(interval_secs = period.as_secs(), "polling latest positions");
            let mut ticker = tokio::time::interval(period);
            let mut done = 0_u32;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        refresh_positions(&mut session, &client).await;
                        done += 1;
                        info!(
                            tick = done,
                            positions = session.map_view.positions().len(),
                            "positions refreshed"
                        );
                        if iterations.is_some_and(|limit| done >= limit) {
                            break;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Received Ctrl+C, stopping");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
