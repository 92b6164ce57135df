//! Award page retrieval
//!
//! Downloads one award's HTML page and photo into the per-year archive and
//! extracts a raw JSON record from the page. Retrieval sits behind the
//! `PageFetcher` seam and extraction is a pure function, so either side
//! can be swapped without touching the importer.

pub mod client;
pub mod extract;

pub use client::{FetchError, HttpFetcher, PageFetcher};

use std::path::PathBuf;

use tracing::{info, warn};

use pcjc_common::config::Paths;
use pcjc_common::AwardNum;

use crate::normalize::photo::canonical_photo_path;

/// The judging center's award archive
pub const DEFAULT_BASE_URL: &str = "https://www.paccentraljc.org";

/// Files written by one fetch
#[derive(Debug)]
pub struct FetchOutcome {
    pub html_path: PathBuf,
    pub json_path: PathBuf,
    pub image_path: Option<PathBuf>,
}

/// Fetch one award page (`{base}/{YYYYMMDD}/{award_num}.html`) plus its
/// photo, write them into the archive layout and extract a raw record.
///
/// A missing photo is logged and skipped; the importer reports the
/// dangling reference later. Page failures are fatal to the fetch - there
/// is no automatic retry, re-invocation is the retry policy.
pub async fn fetch_award<F: PageFetcher>(
    fetcher: &F,
    paths: &Paths,
    base_url: &str,
    event_date: &str,
    award_num: &AwardNum,
) -> Result<FetchOutcome, FetchError> {
    let year = award_num.year();
    paths.ensure_year_directories(year)?;

    let page_url = format!("{}/{}/{}.html", base_url, event_date, award_num);
    info!("Fetching {}", page_url);
    let html = fetcher.fetch_page(&page_url).await?;

    let html_path = paths.year_html_dir(year).join(format!("{}.html", award_num));
    std::fs::write(&html_path, &html)?;

    let mut raw = extract::extract_fields(&html);
    if raw.award_num.is_none() {
        raw.award_num = Some(award_num.to_string());
    }
    raw.source_url = Some(page_url);

    let image_url = format!("{}/{}/{}.jpg", base_url, event_date, award_num);
    let image_path = match fetcher.fetch_image(&image_url).await {
        Ok(bytes) => {
            let archive_path = paths.year_images_dir(year).join(format!("{}.jpg", award_num));
            std::fs::write(&archive_path, &bytes)?;
            // The consolidated library copy is what the photo resolver
            // checks at import time
            std::fs::write(
                paths.images_dir().join(format!("{}.jpg", award_num)),
                &bytes,
            )?;
            raw.photo = Some(canonical_photo_path(award_num.as_str()));
            Some(archive_path)
        }
        Err(err) => {
            warn!("No photo for {}: {}", award_num, err);
            None
        }
    };

    let json_path = paths.year_json_dir(year).join(format!("{}.json", award_num));
    std::fs::write(&json_path, serde_json::to_string_pretty(&raw)?)?;
    info!("Wrote {}", json_path.display());

    Ok(FetchOutcome {
        html_path,
        json_path,
        image_path,
    })
}
