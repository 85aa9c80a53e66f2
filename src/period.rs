use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Lookback period of a history request.
///
/// Parsed from and displayed as the usual short codes (`1mo`, `1y`, `ytd`,
/// ...). Defaults to one year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl Period {
    pub const ALL: [Self; 11] = [
        Self::OneDay,
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::TenYears,
        Self::YearToDate,
        Self::Max,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    /// First calendar date covered when the period ends on `as_of`.
    ///
    /// `None` for [`Period::Max`], which has no lower bound. Month arithmetic
    /// clamps to the end of shorter months.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use quantedge_signal::Period;
    ///
    /// let as_of = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
    /// assert_eq!(
    ///     Period::OneYear.start_date(as_of),
    ///     NaiveDate::from_ymd_opt(2023, 3, 25),
    /// );
    /// assert_eq!(Period::Max.start_date(as_of), None);
    /// ```
    #[must_use]
    pub fn start_date(self, as_of: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::OneDay => as_of.checked_sub_days(Days::new(1)),
            Self::FiveDays => as_of.checked_sub_days(Days::new(5)),
            Self::OneMonth => as_of.checked_sub_months(Months::new(1)),
            Self::ThreeMonths => as_of.checked_sub_months(Months::new(3)),
            Self::SixMonths => as_of.checked_sub_months(Months::new(6)),
            Self::OneYear => as_of.checked_sub_months(Months::new(12)),
            Self::TwoYears => as_of.checked_sub_months(Months::new(24)),
            Self::FiveYears => as_of.checked_sub_months(Months::new(60)),
            Self::TenYears => as_of.checked_sub_months(Months::new(120)),
            Self::YearToDate => NaiveDate::from_ymd_opt(as_of.year(), 1, 1),
            Self::Max => None,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|period| period.code() == code)
            .ok_or_else(|| Error::InvalidPeriod(s.to_owned()))
    }
}

impl TryFrom<String> for Period {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.code().to_owned()
    }
}
