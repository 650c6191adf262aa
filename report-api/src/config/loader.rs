use crate::config::types::MdfiveConfig;
use crate::error::{ReportApiError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Configuration loader trait
pub trait ConfigLoader {
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<MdfiveConfig>;
    fn load_or_default<P: AsRef<Path>>(path: P) -> Result<MdfiveConfig>;
}

/// Default configuration loader implementation
pub struct DefaultConfigLoader;

impl ConfigLoader for DefaultConfigLoader {
    /// Load configuration from an mdfive.toml file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<MdfiveConfig> {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            return Err(ReportApiError::ConfigNotFound {
                path: path_ref.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path_ref)?;
        let config: MdfiveConfig = toml::from_str(&content).map_err(|e| {
            ReportApiError::invalid_config(format!(
                "Failed to parse TOML in {}: {}",
                path_ref.display(),
                e
            ))
        })?;

        Ok(config)
    }

    /// Load the file when present, fall back to defaults otherwise
    fn load_or_default<P: AsRef<Path>>(path: P) -> Result<MdfiveConfig> {
        match Self::load_from_file(path) {
            Ok(config) => Ok(config),
            Err(ReportApiError::ConfigNotFound { .. }) => Ok(MdfiveConfig::default()),
            Err(err) => Err(err),
        }
    }
}

/// One spreadsheet row keyed by its header cell
pub type SheetRow = HashMap<String, String>;

/// Load rows from a `.csv`, `.xlsx` or `.xls` file; the first row is the header
pub fn load_sheet_rows<P: AsRef<Path>>(path: P) -> Result<Vec<SheetRow>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_csv_rows(path),
        "xlsx" | "xls" => load_workbook_rows(path),
        _ => Err(ReportApiError::validation(
            "sheet",
            format!(
                "Please upload a valid spreadsheet (.csv, .xlsx or .xls): {}",
                path.display()
            ),
        )),
    }
}

fn load_csv_rows(path: &Path) -> Result<Vec<SheetRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = HashMap::new();

        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                row.insert(header.trim().to_string(), value.trim().to_string());
            }
        }

        rows.push(row);
    }

    Ok(rows)
}

fn load_workbook_rows(path: &Path) -> Result<Vec<SheetRow>> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)?;
    let Some(first_sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = workbook.worksheet_range(&first_sheet)?;

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(|c| cell_text(c).trim().to_string()).collect();

    let mut rows = Vec::new();
    for cells in rows_iter {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let mut row = HashMap::new();
        for (header, cell) in headers.iter().zip(cells.iter()) {
            if !header.is_empty() {
                row.insert(header.clone(), cell_text(cell).trim().to_string());
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Render a spreadsheet cell as text, keeping integral numbers free of a `.0` suffix
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

// Convenience functions maintaining the API
impl MdfiveConfig {
    /// Create a new config builder
    pub fn builder() -> crate::config::builder::MdfiveConfigBuilder {
        crate::config::builder::MdfiveConfigBuilder::new()
    }

    /// Load configuration from an mdfive.toml file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        DefaultConfigLoader::load_from_file(path)
    }

    /// Load configuration, using defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        DefaultConfigLoader::load_or_default(path)
    }
}
