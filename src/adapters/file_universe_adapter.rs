//! Symbol file universe adapter.
//!
//! Reads ticker symbols from a plain text file, one per line or comma
//! separated, `#` comments allowed. Normalization happens here so the scan
//! never sees raw symbols: uppercase, dots replaced with dashes (share-class
//! suffixes like BRK.B), de-duplicated, sorted.

use crate::domain::error::TraderError;
use crate::ports::universe_port::UniversePort;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

pub struct FileUniverseAdapter {
    path: PathBuf,
}

impl FileUniverseAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase().replace('.', "-")
}

impl UniversePort for FileUniverseAdapter {
    fn fetch_symbols(&self) -> Result<Vec<String>, TraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TraderError::Universe {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut symbols = BTreeSet::new();
        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("");
            for token in line.split(',') {
                let symbol = normalize_symbol(token);
                if !symbol.is_empty() {
                    symbols.insert(symbol);
                }
            }
        }

        if symbols.is_empty() {
            return Err(TraderError::Universe {
                reason: format!("no symbols in {}", self.path.display()),
            });
        }

        Ok(symbols.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn universe_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn reads_sorted_deduplicated_symbols() {
        let file = universe_file("msft\nAAPL\nGOOG\naapl\n");
        let adapter = FileUniverseAdapter::new(file.path().to_path_buf());

        let symbols = adapter.fetch_symbols().unwrap();
        assert_eq!(symbols, vec!["AAPL", "GOOG", "MSFT"]);
    }

    #[test]
    fn accepts_comma_separated_lines() {
        let file = universe_file("AAPL, MSFT\nGOOG,AMZN\n");
        let adapter = FileUniverseAdapter::new(file.path().to_path_buf());

        let symbols = adapter.fetch_symbols().unwrap();
        assert_eq!(symbols, vec!["AAPL", "AMZN", "GOOG", "MSFT"]);
    }

    #[test]
    fn normalizes_dots_to_dashes() {
        assert_eq!(normalize_symbol("BRK.B"), "BRK-B");
        assert_eq!(normalize_symbol(" bf.b "), "BF-B");
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let file = universe_file("# large caps\nAAPL\n\nMSFT # software\n");
        let adapter = FileUniverseAdapter::new(file.path().to_path_buf());

        let symbols = adapter.fetch_symbols().unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = universe_file("# nothing here\n");
        let adapter = FileUniverseAdapter::new(file.path().to_path_buf());

        assert!(matches!(
            adapter.fetch_symbols(),
            Err(TraderError::Universe { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let adapter = FileUniverseAdapter::new(PathBuf::from("/nonexistent/universe.txt"));
        assert!(matches!(
            adapter.fetch_symbols(),
            Err(TraderError::Universe { .. })
        ));
    }
}
