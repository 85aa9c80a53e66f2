use chrono::NaiveDate;
use thiserror::Error;

use crate::Symbol;

/// Convenience alias for results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The unified error type for `quantedge-signal`.
///
/// Missing indicator values are not errors: the decision rule degrades to
/// [`Recommendation::Hold`](crate::Recommendation::Hold) instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The history provider returned no bars for the requested symbol.
    #[error("No data found for {symbol}.")]
    NoData { symbol: Symbol },

    /// Bar dates are not strictly ascending (out of order or duplicated).
    #[error("bar dated {date} does not follow {previous}")]
    UnorderedBars { previous: NaiveDate, date: NaiveDate },

    /// A bar carries a price that is not a positive finite number.
    #[error("invalid bar at {date}: {reason}")]
    InvalidBar { date: NaiveDate, reason: &'static str },

    /// The ticker is empty, starts with `.`, or holds a character other than an
    /// ASCII letter, digit, `.`, `-`, `^` or `=`.
    #[error("invalid symbol {0:?}")]
    InvalidSymbol(String),

    /// Unrecognised lookback period code.
    #[error("invalid period {0:?}, expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max")]
    InvalidPeriod(String),

    /// A data provider failed for a reason of its own.
    #[error("provider error: {0}")]
    Provider(String),

    /// Configuration values are out of range.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("failed to parse configuration")]
    Toml(#[from] toml::de::Error),
}
