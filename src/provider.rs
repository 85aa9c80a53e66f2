use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, HashMap},
};

use chrono::NaiveDate;
use tracing::debug;

use crate::{Period, PriceBar, Result, Symbol};

/// What a [`HistoryProvider`] is asked for: daily bars of `symbol` covering
/// `period` and ending on `as_of`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub period: Period,
    pub as_of: NaiveDate,
}

impl HistoryRequest {
    #[must_use]
    pub fn new(symbol: Symbol, period: Period, as_of: NaiveDate) -> Self {
        Self {
            symbol,
            period,
            as_of,
        }
    }

    /// First date covered, `None` when the period is unbounded.
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.period.start_date(self.as_of)
    }

    /// Whether a session on `date` falls inside the requested window.
    ///
    /// Both ends are inclusive.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date <= self.as_of && self.start_date().is_none_or(|start| date >= start)
    }
}

/// Source of the tickers offered for analysis.
pub trait SymbolDirectory {
    /// All known symbols, sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot be read.
    fn list_symbols(&self) -> Result<BTreeSet<Symbol>>;
}

/// Source of daily price history.
///
/// Implementations return the bars inside the request window in ascending
/// date order. An unknown symbol is an empty `Vec`, not an error; the caller
/// turns that into [`Error::NoData`](crate::Error::NoData).
pub trait HistoryProvider {
    /// Fetches daily bars for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing source fails.
    fn fetch_history(&self, request: &HistoryRequest) -> Result<Vec<PriceBar>>;
}

impl<P: HistoryProvider + ?Sized> HistoryProvider for &P {
    fn fetch_history(&self, request: &HistoryRequest) -> Result<Vec<PriceBar>> {
        (**self).fetch_history(request)
    }
}

impl<D: SymbolDirectory + ?Sized> SymbolDirectory for &D {
    fn list_symbols(&self) -> Result<BTreeSet<Symbol>> {
        (**self).list_symbols()
    }
}

/// Provider backed by bars held in memory, keyed by symbol.
///
/// Mostly useful for tests and offline replays.
///
/// ```
/// use chrono::NaiveDate;
/// use quantedge_signal::{
///     HistoryProvider, HistoryRequest, InMemoryProvider, Period, PriceBar, Symbol,
/// };
///
/// let spy = Symbol::new("SPY").unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
/// let bar = PriceBar { date, open: 1.0, high: 1.0, low: 1.0, close: 1.0, volume: 0 };
///
/// let provider = InMemoryProvider::new().with_bars(spy.clone(), vec![bar]);
/// let request = HistoryRequest::new(spy, Period::FiveDays, date);
/// assert_eq!(provider.fetch_history(&request).unwrap(), vec![bar]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryProvider {
    bars: BTreeMap<Symbol, Vec<PriceBar>>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bars` for `symbol`, replacing earlier ones.
    #[must_use]
    pub fn with_bars(mut self, symbol: Symbol, bars: Vec<PriceBar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    pub fn insert(&mut self, symbol: Symbol, mut bars: Vec<PriceBar>) {
        bars.sort_by_key(|bar| bar.date);
        self.bars.insert(symbol, bars);
    }
}

impl HistoryProvider for InMemoryProvider {
    fn fetch_history(&self, request: &HistoryRequest) -> Result<Vec<PriceBar>> {
        Ok(self
            .bars
            .get(&request.symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|bar| request.contains(bar.date))
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl SymbolDirectory for InMemoryProvider {
    fn list_symbols(&self) -> Result<BTreeSet<Symbol>> {
        Ok(self.bars.keys().cloned().collect())
    }
}

/// Memoises another provider per [`HistoryRequest`].
///
/// Only non-empty successful results are cached, so a symbol that had no data
/// or a failed fetch is retried on the next request. Single-threaded: the
/// cache lives in a [`RefCell`].
#[derive(Debug)]
pub struct CachedHistoryProvider<P> {
    inner: P,
    cache: RefCell<HashMap<HistoryRequest, Vec<PriceBar>>>,
}

impl<P: HistoryProvider> CachedHistoryProvider<P> {
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Number of cached requests.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: HistoryProvider> HistoryProvider for CachedHistoryProvider<P> {
    fn fetch_history(&self, request: &HistoryRequest) -> Result<Vec<PriceBar>> {
        if let Some(bars) = self.cache.borrow().get(request) {
            debug!(symbol = %request.symbol, period = %request.period, "history cache hit");
            return Ok(bars.clone());
        }

        debug!(symbol = %request.symbol, period = %request.period, "history cache miss");
        let bars = self.inner.fetch_history(request)?;

        if !bars.is_empty() {
            self.cache.borrow_mut().insert(request.clone(), bars.clone());
        }

        Ok(bars)
    }
}

impl<P: SymbolDirectory> SymbolDirectory for CachedHistoryProvider<P> {
    fn list_symbols(&self) -> Result<BTreeSet<Symbol>> {
        self.inner.list_symbols()
    }
}
