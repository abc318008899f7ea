use csv::WriterBuilder;
use lobby_lda::Table;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// File name the table is saved under when no path is given.
pub const DEFAULT_CSV_FILE: &str = "lda_search_results.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Write `table` as UTF-8 CSV: a header row, then one line per row, no index
/// column. Missing values are empty fields.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), ExportError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(table.headers())?;
    for row in &table.rows {
        writer.write_record(
            table
                .columns
                .iter()
                .map(|col| row.cell(*col).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Save `table` to `path`, creating parent directories as needed.
pub fn save_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = std::fs::File::create(path).map_err(|e| {
        debug!("failed to create {}", path.display());
        e
    })?;
    write_csv(table, file)?;
    debug!("{} rows written to {}", table.len(), path.display());
    Ok(())
}
