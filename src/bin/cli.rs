use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::*;
use rating_csv::rocr::parse_iso_date;
use rating_csv::{ExportConfig, HeaderStyle, RatingType};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "rating-csv",
    about = "Converts XBRL files using the Record of Credit Ratings (ROCR) taxonomy to CSV."
)]
struct Opt {
    /// The path of the ZIP archive containing the XBRL files to read
    #[structopt(parse(from_os_str))]
    zip_path: PathBuf,

    /// The path of the CSV file to write to
    #[structopt(parse(from_os_str))]
    csv_path: PathBuf,

    /// The type of ratings to extract
    #[structopt(possible_values = &["obligor", "issuer"])]
    rating_type: RatingType,

    /// Only extract the most recent ratings as of this date (YYYY-MM-DD)
    #[structopt(long, parse(try_from_str = parse_iso_date))]
    asof: Option<NaiveDate>,

    /// Write descriptive column names instead of taxonomy tags
    #[structopt(long)]
    long_names: bool,

    /// Show a progress bar while reading the archive
    #[structopt(long)]
    progress: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let header_style = if opt.long_names {
        HeaderStyle::Long
    } else {
        HeaderStyle::Short
    };
    let config = ExportConfig::new(opt.zip_path, opt.csv_path, opt.rating_type)
        .with_asof(opt.asof)
        .with_header_style(header_style)
        .with_progress(opt.progress);

    let summary = rating_csv::export(&config).with_context(|| {
        format!(
            "Failed to export {} ratings from {}",
            config.rating_type,
            config.zip_path.display()
        )
    })?;

    println!(
        "{} {} rows to {}",
        "Wrote".green(),
        summary.rows,
        config.csv_path.display()
    );
    if summary.skipped > 0 {
        println!(
            "{}",
            format!("Skipped {} unreadable documents", summary.skipped).yellow()
        );
    }

    Ok(())
}
