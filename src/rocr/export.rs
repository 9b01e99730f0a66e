use chrono::NaiveDate;
use csv::Writer;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;
use zip::ZipArchive;

use super::asof::AsOfFilter;
use super::decode::{decode_entry, parse_entry};
use super::extract::extract_records;
use super::fields::{columns, Column};
use crate::core::config::ExportConfig;
use crate::core::types::{RatingType, Record};
use crate::error::{RatingError, Result};
use crate::utils::dirs::ensure_parent_dir;
use crate::utils::progress::ProgressTracker;

/// Suffix of the archive entries that are read as rating documents.
pub const DOCUMENT_EXTENSION: &str = ".xml";

/// Counts from one export run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Archive entries seen, documents or not.
    pub entries: usize,
    /// Documents decoded and parsed.
    pub documents: usize,
    /// Documents skipped because they could not be decoded or parsed.
    pub skipped: usize,
    /// CSV rows written, header excluded.
    pub rows: usize,
}

fn archive_error(path: &Path) -> impl FnOnce(zip::result::ZipError) -> RatingError + '_ {
    move |source| RatingError::Archive {
        path: path.to_path_buf(),
        source,
    }
}

fn write_row<W: Write>(writer: &mut Writer<W>, columns: &[Column], record: &Record) -> Result<()> {
    writer.write_record(columns.iter().map(|column| {
        record
            .get(column.key)
            .and_then(|value| value.as_deref())
            .unwrap_or("")
    }))?;
    Ok(())
}

fn read_document<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    zip_path: &Path,
    index: usize,
    name: &str,
    rating_type: RatingType,
    filter: Option<&AsOfFilter>,
) -> Result<Vec<Record>> {
    let mut bytes = Vec::new();
    archive
        .by_index(index)
        .map_err(archive_error(zip_path))?
        .read_to_end(&mut bytes)?;

    let text = decode_entry(name, &bytes)?;
    let document = parse_entry(name, &text)?;
    extract_records(&document, rating_type, filter)
}

/// Convert every rating document in an archive into rows of one CSV file.
///
/// The header is written before any entry is read, so an archive without
/// matching documents still produces a header-only file. Entries that
/// cannot be decoded or parsed are skipped with a warning; any other error
/// aborts the run.
pub fn export(config: &ExportConfig) -> Result<ExportSummary> {
    let zip_path = config.zip_path.as_path();
    info!(
        "Exporting {} ratings from {} to {}",
        config.rating_type,
        zip_path.display(),
        config.csv_path.display()
    );

    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(archive_error(zip_path))?;

    ensure_parent_dir(&config.csv_path)?;
    let mut writer = Writer::from_path(&config.csv_path)?;
    let columns = columns(config.rating_type);
    writer.write_record(columns.iter().map(|column| config.header_style.header(column)))?;

    let filter = config.filter();
    let archive_name = zip_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let progress = ProgressTracker::new(config.show_progress, archive.len() as u64, &archive_name);
    let mut summary = ExportSummary::default();

    for index in 0..archive.len() {
        progress.increment(1);
        let Some(name) = archive.name_for_index(index).map(String::from) else {
            continue;
        };
        summary.entries += 1;
        if !name.ends_with(DOCUMENT_EXTENSION) {
            debug!("Ignoring non-document entry {}", name);
            continue;
        }
        progress.update_message(&name);

        match read_document(
            &mut archive,
            zip_path,
            index,
            &name,
            config.rating_type,
            filter.as_ref(),
        ) {
            Ok(records) => {
                debug!("{}: {} records", name, records.len());
                for record in &records {
                    write_row(&mut writer, columns, record)?;
                }
                summary.documents += 1;
                summary.rows += records.len();
            }
            Err(e) if e.is_entry_local() => {
                warn!("Skipping {}: {}", name, e);
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    writer.flush()?;
    progress.finish(summary.rows);
    info!(
        "Wrote {} rows from {} documents ({} skipped)",
        summary.rows, summary.documents, summary.skipped
    );
    Ok(summary)
}

/// Export with short headers and no progress bar.
pub fn ratings_to_csv(
    zip_path: impl AsRef<Path>,
    csv_path: impl AsRef<Path>,
    rating_type: RatingType,
    asof: Option<NaiveDate>,
) -> Result<ExportSummary> {
    let config = ExportConfig::new(zip_path.as_ref(), csv_path.as_ref(), rating_type).with_asof(asof);
    export(&config)
}
