//! pcjc-import - Award Record Import Tool
//!
//! Batch maintenance for the award store: import raw scraped JSON records,
//! verify photo paths, review name variants, fetch missing award pages and
//! clean out placeholder rows. Each subcommand replaces one of the ad hoc
//! scripts the archive used to be maintained with.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use pcjc_common::config::{resolve_root_folder, Paths};
use pcjc_common::{db, AwardNum};
use pcjc_import::importer::{collect_json_files, Importer};
use pcjc_import::raw::RawAward;
use pcjc_import::review;
use pcjc_import::scrape::{self, HttpFetcher, DEFAULT_BASE_URL};

#[derive(Parser)]
#[command(name = "pcjc-import", about = "Award record import and maintenance tools")]
struct Cli {
    /// Root data folder (overrides PCJC_ROOT and the config file)
    #[arg(long, global = true)]
    root: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import raw award JSON files into the store
    Import {
        /// Limit the scan to one award year
        #[arg(long)]
        year: Option<i64>,

        /// Import a single JSON file instead of scanning the archive
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Verify stored photo paths against the image library
    Photos {
        /// Rewrite non-canonical paths (audited); default is report-only
        #[arg(long)]
        apply: bool,
    },

    /// Report near-duplicate exhibitor and location names for human review
    Names {
        /// Jaro-Winkler similarity threshold
        #[arg(long, default_value_t = review::DEFAULT_THRESHOLD)]
        threshold: f64,
    },

    /// Fetch one award page and photo, and extract a raw JSON record
    Fetch {
        /// Event date path segment on the source site (YYYYMMDD)
        #[arg(long)]
        date: String,

        /// Award number to fetch
        #[arg(long)]
        award: String,

        /// Source site base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },

    /// Delete placeholder rows whose award number fails validation
    Clean {
        /// Report what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let paths = Paths::new(resolve_root_folder(cli.root.as_deref()));
    paths.ensure_base_directories()?;
    info!("Root folder: {}", paths.root().display());

    let pool = db::init_database(&paths.database()).await?;

    match cli.command {
        Command::Import { year, file } => {
            let importer = Importer::new(pool, paths.images_dir());
            let files = match file {
                Some(file) => vec![file],
                None => collect_json_files(&paths, year),
            };
            if files.is_empty() {
                warn!("No raw record files found under {}", paths.root().display());
                return Ok(());
            }
            info!("Importing {} raw record file(s)", files.len());
            let report = importer.import_batch(&files).await;
            print!("{}", report.render());
        }

        Command::Photos { apply } => {
            let importer = Importer::new(pool, paths.images_dir());
            let report = importer.verify_photos(apply).await?;
            println!("Photo check: {} record(s)", report.checked);
            println!("  correct:   {}", report.correct);
            if apply {
                println!("  rewritten: {}", report.rewritten);
            } else {
                println!("  to rewrite: {} (re-run with --apply)", report.rewritten);
            }
            println!("  missing:   {}", report.missing);
            println!("  no photo:  {}", report.absent);
            for issue in &report.issues {
                println!(
                    "  [missing] {}: {}",
                    issue.award_num.as_deref().unwrap_or("-"),
                    issue.reason
                );
            }
        }

        Command::Names { threshold } => {
            let exhibitors = db::distinct_exhibitors(&pool).await?;
            let locations = db::distinct_locations(&pool).await?;
            let exhibitor_pairs = review::near_duplicates(&exhibitors, threshold);
            let location_pairs = review::near_duplicates(&locations, threshold);
            print!("{}", review::render_report("Exhibitors", &exhibitor_pairs));
            print!("{}", review::render_report("Locations", &location_pairs));
            println!("Review the pairs above and add confirmed variants to the alias tables.");
        }

        Command::Fetch {
            date,
            award,
            base_url,
        } => {
            let award_num = AwardNum::parse(&award)?;
            let fetcher = HttpFetcher::new();
            let outcome =
                scrape::fetch_award(&fetcher, &paths, &base_url, &date, &award_num).await?;
            println!("Fetched award {}", award_num);
            println!("  html:  {}", outcome.html_path.display());
            println!("  json:  {}", outcome.json_path.display());
            match outcome.image_path {
                Some(path) => println!("  photo: {}", path.display()),
                None => println!("  photo: (not available)"),
            }

            // Show what the importer would see, without importing
            let text = std::fs::read_to_string(&outcome.json_path)?;
            let raw = RawAward::from_json(&text)?;
            println!(
                "  extracted: {} {} ({})",
                raw.genus.as_deref().unwrap_or("?"),
                raw.species.as_deref().unwrap_or("?"),
                raw.award.as_deref().unwrap_or("no award code")
            );
        }

        Command::Clean { dry_run } => {
            let importer = Importer::new(pool, paths.images_dir());
            let report = importer.clean_placeholders(dry_run).await?;
            println!(
                "Scanned {} row(s), {} invalid",
                report.scanned,
                report.invalid.len()
            );
            for num in &report.invalid {
                println!("  invalid award number: {:?}", num);
            }
            if dry_run {
                println!("Dry run: nothing deleted");
            } else {
                println!("Deleted {} row(s)", report.deleted);
            }
        }
    }

    Ok(())
}
