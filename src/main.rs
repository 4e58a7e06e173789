//! parts-quote - price lookup and quoting for a dealership parts counter

use anyhow::Result;
use clap::{Parser, Subcommand};
use parts_quote::commands::search::build_translator;
use parts_quote::commands::{
    load_catalog, QuoteCommand, QuoteRequest, ScanCommand, SchemaCommand, SearchCommand,
    ShellCommand,
};
use parts_quote::config::{parse_tax_rate, Config, OutputFormat};
use parts_quote::quote::{ImportEntry, QuoteHeader};
use parts_quote::services::{ScannerInputDecoder, SystemClock};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "parts-quote",
    version,
    about = "Parts price lookup and quoting",
    long_about = "Search a supplier price file by part number or description, and build tax-inclusive quotes for the parts counter."
)]
struct Cli {
    /// Price file (CSV or zipped CSV)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Tax rate as a fraction (0.16) or percentage (16%)
    #[arg(long, global = true, value_parser = parse_tax_rate)]
    tax_rate: Option<Decimal>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by any column
    #[command(alias = "s")]
    Search {
        /// Search text
        query: String,

        /// Maximum number of rows to show
        #[arg(short, long)]
        max: Option<usize>,

        /// Minimum base price filter
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Maximum base price filter
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Required keywords in description (comma-separated)
        #[arg(long, value_delimiter = ',')]
        keywords: Option<Vec<String>>,

        /// Excluded keywords from description (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// Hide parts without a usable price
        #[arg(long)]
        priced_only: bool,

        /// Translate descriptions
        #[arg(long)]
        translate: bool,
    },

    /// Exact part-number lookup; reads codes from stdin when none are given
    Scan {
        /// Scanned or typed codes
        codes: Vec<String>,
    },

    /// Build a quote and write its printable document
    #[command(alias = "q")]
    Quote {
        /// Part to add as SKU[:QTY[:STATUS]] (repeatable)
        #[arg(short, long = "item")]
        items: Vec<ImportEntry>,

        /// CSV file listing parts and quantities
        #[arg(long)]
        import: Option<PathBuf>,

        /// Customer name
        #[arg(long, default_value = "")]
        customer: String,

        /// Plate or VIN
        #[arg(long, default_value = "")]
        vehicle: String,

        /// Order number
        #[arg(long, default_value = "")]
        order: String,

        /// Document path (default: quote-<timestamp>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive session at the parts counter
    Shell,

    /// Show how the price file's columns are interpreted
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(catalog) = cli.catalog {
        config.catalog_path = Some(catalog);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(rate) = cli.tax_rate {
        config.tax_rate = rate;
    }
    config.validate()?;

    match cli.command {
        Commands::Search {
            query,
            max,
            min_price,
            max_price,
            keywords,
            exclude,
            priced_only,
            translate,
        } => {
            // Apply search-specific config
            if let Some(max) = max {
                config.max_results = max;
            }
            if min_price.is_some() {
                config.min_price = min_price;
            }
            if max_price.is_some() {
                config.max_price = max_price;
            }
            if let Some(kw) = keywords {
                config.keywords = kw;
            }
            if let Some(ex) = exclude {
                config.exclude_keywords = ex;
            }
            config.priced_only |= priced_only;
            config.translate |= translate;

            let catalog = load_catalog(&config)?;
            let output = SearchCommand::new(config).execute(&catalog, &query).await?;
            println!("{}", output);
        }

        Commands::Scan { codes } => {
            let catalog = load_catalog(&config)?;
            let cmd = ScanCommand::new(config, ScannerInputDecoder::new());

            if codes.is_empty() {
                let stdin = BufReader::new(tokio::io::stdin());
                cmd.run(&catalog, stdin, &mut std::io::stdout()).await?;
            } else {
                println!("{}", cmd.execute(&catalog, &codes)?);
            }
        }

        Commands::Quote { items, import, customer, vehicle, order, output } => {
            let catalog = load_catalog(&config)?;
            let clock = SystemClock::with_offset_hours(config.utc_offset_hours)?;
            let request = QuoteRequest {
                items,
                import,
                header: QuoteHeader { customer, vehicle_id: vehicle, order_number: order },
                output,
            };

            let output = QuoteCommand::new(config).execute(&catalog, &request, &clock)?;
            println!("{}", output);
        }

        Commands::Shell => {
            let clock = SystemClock::with_offset_hours(config.utc_offset_hours)?;
            let translator = if config.translate { Some(build_translator(&config)?) } else { None };

            let mut shell = ShellCommand::new(config, Box::new(clock));
            if let Some(translator) = translator {
                shell = shell.with_translator(Box::new(translator));
            }

            let stdin = BufReader::new(tokio::io::stdin());
            shell.run(stdin, &mut std::io::stdout()).await?;
        }

        Commands::Schema => {
            let path = config.require_catalog()?.to_path_buf();
            println!("{}", SchemaCommand::new(config).execute(&path)?);
        }
    }

    Ok(())
}
