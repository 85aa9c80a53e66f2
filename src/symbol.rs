use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An equity ticker, trimmed and upper-cased.
///
/// Holds ASCII letters and digits plus the punctuation tickers use for share
/// classes (`BRK.B`, `BF-B`), indices (`^GSPC`) and currency pairs
/// (`EURUSD=X`). A ticker never starts with `.`, so it is always a plain
/// file stem.
///
/// ```
/// use quantedge_signal::Symbol;
///
/// let symbol: Symbol = " aapl ".parse().unwrap();
/// assert_eq!(symbol.as_str(), "AAPL");
/// assert!(Symbol::new("   ").is_err());
/// assert!(Symbol::new("../spy").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Normalises and validates a ticker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSymbol`] for empty tickers, tickers starting
    /// with `.`, and tickers holding any other character.
    pub fn new(ticker: &str) -> Result<Self> {
        let trimmed = ticker.trim();

        if trimmed.is_empty()
            || trimmed.starts_with('.')
            || !trimmed.chars().all(is_ticker_char)
        {
            return Err(Error::InvalidSymbol(ticker.to_owned()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Picks the symbol to analyse from a directory selection and a free-text
    /// entry.
    ///
    /// A non-blank `typed` entry wins over `picked`; a blank pick counts as no
    /// pick. Returns `Ok(None)` when neither holds a ticker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSymbol`] if the winning entry is not a valid
    /// ticker.
    ///
    /// ```
    /// use quantedge_signal::Symbol;
    ///
    /// let chosen = Symbol::resolve(Some("MSFT"), " nvda ").unwrap();
    /// assert_eq!(chosen.unwrap().as_str(), "NVDA");
    ///
    /// assert_eq!(Symbol::resolve(Some(""), "  ").unwrap(), None);
    /// ```
    pub fn resolve(picked: Option<&str>, typed: &str) -> Result<Option<Self>> {
        if !typed.trim().is_empty() {
            return Self::new(typed).map(Some);
        }

        match picked {
            Some(ticker) if !ticker.trim().is_empty() => Self::new(ticker).map(Some),
            _ => Ok(None),
        }
    }
}

const fn is_ticker_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
