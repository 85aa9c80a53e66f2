use std::{
    collections::BTreeSet,
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{HistoryProvider, HistoryRequest, PriceBar, Result, Symbol, SymbolDirectory};

/// Daily history stored as one CSV file per symbol.
///
/// Reads `<dir>/<SYMBOL>.csv` with a `Date,Open,High,Low,Close,Volume` header.
/// A missing file means the symbol has no data.
#[derive(Clone, Debug)]
pub struct CsvHistoryProvider {
    dir: PathBuf,
}

impl CsvHistoryProvider {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the history of `symbol`, always directly inside
    /// [`dir`](Self::dir).
    #[must_use]
    pub fn path_for(&self, symbol: &Symbol) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// Parses every bar of a history export.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Csv`](crate::Error::Csv) on malformed rows.
    pub fn read_bars<R: Read>(reader: R) -> Result<Vec<PriceBar>> {
        let mut reader = csv::Reader::from_reader(reader);
        let bars = reader.deserialize().collect::<Result<Vec<PriceBar>, _>>()?;
        Ok(bars)
    }
}

impl HistoryProvider for CsvHistoryProvider {
    fn fetch_history(&self, request: &HistoryRequest) -> Result<Vec<PriceBar>> {
        let path = self.path_for(&request.symbol);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no history file");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut bars = Self::read_bars(file)?;
        bars.retain(|bar| request.contains(bar.date));
        bars.sort_by_key(|bar| bar.date);

        debug!(
            symbol = %request.symbol,
            period = %request.period,
            bars = bars.len(),
            "history loaded"
        );

        Ok(bars)
    }
}

#[derive(Deserialize)]
struct SymbolRow {
    #[serde(rename = "Symbol")]
    symbol: String,
}

/// Symbol listing read from a CSV file with a `Symbol` column.
///
/// Other columns (names, sectors) are ignored. Rows holding an invalid ticker
/// are skipped with a warning.
#[derive(Clone, Debug)]
pub struct CsvSymbolDirectory {
    path: PathBuf,
}

impl CsvSymbolDirectory {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the `Symbol` column of a listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Csv`](crate::Error::Csv) if the listing is malformed
    /// or has no `Symbol` column.
    ///
    /// ```
    /// use quantedge_signal::CsvSymbolDirectory;
    ///
    /// let listing = "Symbol,Security\nMSFT,Microsoft\naapl,Apple\nMSFT,Microsoft\n";
    /// let symbols = CsvSymbolDirectory::read_symbols(listing.as_bytes()).unwrap();
    /// let tickers: Vec<_> = symbols.iter().map(|s| s.as_str()).collect();
    /// assert_eq!(tickers, ["AAPL", "MSFT"]);
    /// ```
    pub fn read_symbols<R: Read>(reader: R) -> Result<BTreeSet<Symbol>> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut symbols = BTreeSet::new();

        for row in reader.deserialize::<SymbolRow>() {
            let row = row?;
            match Symbol::new(&row.symbol) {
                Ok(symbol) => {
                    symbols.insert(symbol);
                }
                Err(e) => warn!(error = %e, "skipping listing row"),
            }
        }

        Ok(symbols)
    }
}

impl SymbolDirectory for CsvSymbolDirectory {
    fn list_symbols(&self) -> Result<BTreeSet<Symbol>> {
        let symbols = Self::read_symbols(File::open(&self.path)?)?;
        debug!(path = %self.path.display(), symbols = symbols.len(), "symbols listed");
        Ok(symbols)
    }
}
