//! Fleet Dashboard - Main entry point
//!
//! Terminal front end: resolves the reporting period from the command line,
//! loads one screen from the reporting backend and prints or exports it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fleet_dashboard::config::Config;
use fleet_dashboard::dashboard::{Dashboard, Loaded, Screen, ScreenData};
use fleet_dashboard::date_range::{CustomRange, RangeSelection, DEFAULT_END_TIME, DEFAULT_START_TIME};
use fleet_dashboard::display::{
    display_bus_ranking, display_cards, display_tickets, display_trips, print_section,
    print_section_simple,
};
use fleet_dashboard::export::{self, ExportFormat, ReportHeader};
use fleet_dashboard::listing::{paginate, search};
use fleet_dashboard::navigation::{Clock, NavigationState, SystemClock};
use fleet_dashboard::source::RestDataSource;
use fleet_dashboard::summary;
use fleet_dashboard::types::{BusSales, TicketRecord, TripRecord};

#[derive(Parser)]
#[command(name = "fleet-dashboard")]
#[command(author, version, about = "Bus fleet ticketing dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    period: PeriodArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct PeriodArgs {
    /// Reporting period (today, yesterday, this-week, last-week, this-month,
    /// last-month, this-year)
    #[arg(short, long, global = true, conflicts_with = "start_date")]
    range: Option<RangeSelection>,

    /// Step this many periods into the past
    #[arg(long, global = true, default_value_t = 0)]
    back: u32,

    /// Step this many periods towards the present
    #[arg(long, global = true, default_value_t = 0)]
    forward: u32,

    /// Custom range start date (YYYY-MM-DD)
    #[arg(long, global = true)]
    start_date: Option<NaiveDate>,

    /// Custom range start time (HH:mm)
    #[arg(long, global = true, requires = "start_date")]
    start_time: Option<String>,

    /// Custom range end date (YYYY-MM-DD, defaults to the start date)
    #[arg(long, global = true, requires = "start_date")]
    end_date: Option<NaiveDate>,

    /// Custom range end time (HH:mm)
    #[arg(long, global = true, requires = "start_date")]
    end_time: Option<String>,
}

#[derive(Args)]
struct OutputArgs {
    /// Only show records containing this text
    #[arg(short, long, global = true)]
    search: Option<String>,

    /// Table page to show
    #[arg(short, long, global = true, default_value_t = 1)]
    page: usize,

    /// Export the loaded records
    #[arg(short, long, global = true, value_enum)]
    export: Option<ExportFormat>,

    /// Export file path (default: generated name in the configured output directory)
    #[arg(short, long, global = true, requires = "export")]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fleet-wide sales summary and bus ranking
    Summary,

    /// Sales and trips for one bus
    Bus {
        /// Bus identifier
        bus_id: String,
    },

    /// Trip listing
    Trips {
        /// Only trips run by this bus
        #[arg(long)]
        bus_id: Option<String>,
    },

    /// Tickets sold on one trip
    Tickets {
        /// Trip identifier
        trip_id: String,
    },

    /// Print the resolved reporting period without contacting the backend
    Range,

    /// Show or edit configuration
    Config {
        /// Print current configuration
        #[arg(long)]
        show: bool,

        /// Create default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };

    // Initialize logging
    let level = if cli.verbose {
        "debug"
    } else {
        config.general.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    config.validate()?;

    let screen = match cli.command {
        Some(Commands::Config { show, init }) => {
            return run_config(&config, cli.config.as_deref(), show, init);
        }
        Some(Commands::Range) => {
            let state = resolve_state(&cli.period, &config, SystemClock.now())?;
            print_range(&state, SystemClock.now());
            return Ok(());
        }
        Some(Commands::Summary) | None => Screen::Fleet,
        Some(Commands::Bus { bus_id }) => Screen::Bus(bus_id),
        Some(Commands::Trips { bus_id }) => Screen::Trips { bus_id },
        Some(Commands::Tickets { trip_id }) => Screen::Tickets(trip_id),
    };

    let state = resolve_state(&cli.period, &config, SystemClock.now())?;
    run_screen(&config, &cli.output, state, &screen).await
}

fn run_config(
    config: &Config,
    path: Option<&std::path::Path>,
    show: bool,
    init: bool,
) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    if init {
        Config::default().save_to(&path)?;
        println!("Created default configuration at {}", path.display());
    } else if show {
        let contents = toml::to_string_pretty(config)?;
        println!("{contents}");
    } else {
        println!("Configuration path: {}", path.display());
    }
    Ok(())
}

fn custom_range(period: &PeriodArgs) -> Option<CustomRange> {
    let start_date = period.start_date?;
    let end_date = period.end_date.unwrap_or(start_date);
    Some(CustomRange::new(start_date, end_date).with_times(
        period.start_time.as_deref().unwrap_or(DEFAULT_START_TIME),
        period.end_time.as_deref().unwrap_or(DEFAULT_END_TIME),
    ))
}

/// Selected period after applying `--back` / `--forward`.
fn resolve_state(
    period: &PeriodArgs,
    config: &Config,
    now: chrono::NaiveDateTime,
) -> Result<NavigationState> {
    let mut state = match custom_range(period) {
        Some(custom) => NavigationState::apply_custom(custom, now)?,
        None => {
            let selection = match period.range {
                Some(ref selection) => selection.clone(),
                None => config.dashboard.default_selection()?,
            };
            NavigationState::select(selection, now)?
        }
    };

    for _ in 0..period.back {
        state = state.back(now)?;
    }
    for step in 0..period.forward {
        match state.forward(now)? {
            Some(next) => state = next,
            None => {
                warn!(
                    requested = period.forward,
                    taken = step,
                    "Already at the latest period"
                );
                break;
            }
        }
    }
    Ok(state)
}

fn print_range(state: &NavigationState, now: chrono::NaiveDateTime) {
    let interval = state.interval();
    print_section(&format!("{} - {}", state.selection(), state.display_range()));
    println!("  Start:    {}", interval.start().format("%Y-%m-%d %H:%M:%S%.3f"));
    println!("  End:      {}", interval.end().format("%Y-%m-%d %H:%M:%S%.3f"));
    println!("  Anchor:   {}", state.anchor());
    println!(
        "  Forward:  {}",
        if state.has_next(now) { "available" } else { "blocked" }
    );
}

/// Records of a screen that can be exported.
enum Rows<'a> {
    Buses(&'a [BusSales]),
    Trips(&'a [TripRecord]),
    Tickets(&'a [TicketRecord]),
}

impl Rows<'_> {
    fn render(&self, format: ExportFormat, header: &ReportHeader<'_>) -> Result<String> {
        let contents = match (self, format) {
            (Self::Buses(rows), ExportFormat::Csv) => export::buses_csv(rows)?,
            (Self::Trips(rows), ExportFormat::Csv) => export::trips_csv(rows)?,
            (Self::Tickets(rows), ExportFormat::Csv) => export::tickets_csv(rows)?,
            (Self::Buses(rows), ExportFormat::Html) => export::buses_html(rows, header),
            (Self::Trips(rows), ExportFormat::Html) => export::trips_html(rows, header),
            (Self::Tickets(rows), ExportFormat::Html) => export::tickets_html(rows, header),
        };
        Ok(contents)
    }
}

fn screen_title(screen: &Screen) -> String {
    match screen {
        Screen::Fleet => "Fleet Overview".to_string(),
        Screen::Bus(bus_id) => format!("Bus {bus_id}"),
        Screen::Trips { bus_id: Some(bus_id) } => format!("Trips for bus {bus_id}"),
        Screen::Trips { bus_id: None } => "Trips".to_string(),
        Screen::Tickets(trip_id) => format!("Tickets for trip {trip_id}"),
    }
}

async fn run_screen(
    config: &Config,
    output: &OutputArgs,
    state: NavigationState,
    screen: &Screen,
) -> Result<()> {
    let source = RestDataSource::new(&config.backend)?;
    let dashboard = Dashboard::with_state(source, SystemClock, state);
    let loaded = dashboard.load(screen).await;

    let currency = config.export.currency.as_str();
    let query = output.search.as_deref().unwrap_or_default();
    let page_size = config.dashboard.page_size;
    let title = screen_title(screen);

    print_section(&format!("{title} - {}", loaded.range));

    match &loaded.view {
        ScreenData::Fleet(fleet) => {
            display_cards(&summary::fleet_cards(fleet, currency));
            let ranked = summary::top_buses(fleet, config.dashboard.top_buses);
            let buses: Vec<BusSales> = search(&ranked, query).into_iter().cloned().collect();
            print_section_simple("Top Buses");
            display_bus_ranking(&buses, currency);
            export_rows(config, output, &title, &loaded, screen, &Rows::Buses(&buses))?;
        }
        ScreenData::Bus(bus, trips) => {
            display_cards(&summary::bus_cards(bus, trips, currency));
            let matched = search(trips, query);
            print_section_simple("Trips");
            display_trips(&paginate(&matched, output.page, page_size), currency);
            let rows: Vec<TripRecord> = matched.into_iter().cloned().collect();
            export_rows(config, output, &title, &loaded, screen, &Rows::Trips(&rows))?;
        }
        ScreenData::Trips(trips) => {
            display_cards(&summary::trip_cards(trips, currency));
            let matched = search(trips, query);
            print_section_simple("Trips");
            display_trips(&paginate(&matched, output.page, page_size), currency);
            let rows: Vec<TripRecord> = matched.into_iter().cloned().collect();
            export_rows(config, output, &title, &loaded, screen, &Rows::Trips(&rows))?;
        }
        ScreenData::Tickets(tickets) => {
            display_cards(&summary::ticket_cards(tickets, currency));
            let matched = search(tickets, query);
            print_section_simple("Tickets");
            display_tickets(&paginate(&matched, output.page, page_size), currency);
            let rows: Vec<TicketRecord> = matched.into_iter().cloned().collect();
            export_rows(config, output, &title, &loaded, screen, &Rows::Tickets(&rows))?;
        }
    }

    if dashboard.has_next() {
        println!("\n  Use --forward 1 to see the next period.");
    }
    Ok(())
}

fn export_rows(
    config: &Config,
    output: &OutputArgs,
    title: &str,
    loaded: &Loaded,
    screen: &Screen,
    rows: &Rows<'_>,
) -> Result<()> {
    let Some(format) = output.export else {
        return Ok(());
    };

    let header = ReportHeader {
        title,
        range: &loaded.range,
        generated_at: SystemClock.now(),
        currency: &config.export.currency,
    };
    let contents = rows.render(format, &header)?;
    let path = output.output.clone().unwrap_or_else(|| {
        config
            .output_dir()
            .join(export::default_file_name(screen.stem(), format, &loaded.interval))
    });

    export::write_export(&path, &contents)
        .with_context(|| format!("failed to write export to {}", path.display()))?;
    info!(path = %path.display(), "Export complete");
    println!("\n  Exported to {}", path.display());
    Ok(())
}
