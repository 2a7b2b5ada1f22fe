use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::debug;

use crate::error::FolioError;

/// Ledger file format, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Json,
    Csv,
}

/// Detect the ledger format of a file
///
/// `.json` → JSON array of records, `.csv` / `.txt` → CSV with a header row.
/// Extension matching is case-insensitive.
pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("File has no extension: {}", path.display()))?
        .to_lowercase();

    let file_type = match extension.as_str() {
        "json" => FileType::Json,
        "csv" | "txt" => FileType::Csv,
        _ => return Err(FolioError::UnsupportedFormat(extension).into()),
    };

    debug!("Detected {:?} ledger format for {:?}", file_type, path);
    Ok(file_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect_file_type("trades.json").unwrap(), FileType::Json);
        assert_eq!(detect_file_type("TRADES.CSV").unwrap(), FileType::Csv);
        assert_eq!(detect_file_type("export.txt").unwrap(), FileType::Csv);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = detect_file_type("trades.xlsx").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FolioError>(),
            Some(FolioError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn test_missing_extension() {
        assert!(detect_file_type("trades").is_err());
    }
}
