use std::{fmt::Display, io, num::NonZero};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    KeyLevels, KeyLevelsConfig, Ohlcv, Price, PriceBar, PriceHistory, Result, Sma, SmaConfig,
    Symbol, Volatility, VolatilityConfig,
};

const fn nz(n: usize) -> NonZero<usize> {
    match NonZero::new(n) {
        Some(n) => n,
        None => panic!("window length must be non-zero"),
    }
}

/// Window lengths of the [`IndicatorPipeline`].
///
/// Defaults: SMA 50 and 200 on close, volatility over 30 daily returns,
/// support/resistance over 30 bars.
///
/// ```
/// use quantedge_signal::PipelineConfig;
/// use std::num::NonZero;
///
/// let config = PipelineConfig::builder()
///     .fast_sma(NonZero::new(20).unwrap())
///     .build();
/// assert_eq!(config.fast_sma(), 20);
/// assert_eq!(config.slow_sma(), 200);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    fast_sma: NonZero<usize>,
    slow_sma: NonZero<usize>,
    volatility: NonZero<usize>,
    key_levels: NonZero<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fast_sma: nz(50),
            slow_sma: nz(200),
            volatility: nz(30),
            key_levels: nz(30),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    #[must_use]
    pub fn fast_sma(&self) -> usize {
        self.fast_sma.get()
    }

    #[must_use]
    pub fn slow_sma(&self) -> usize {
        self.slow_sma.get()
    }

    /// Number of daily returns in the volatility window.
    #[must_use]
    pub fn volatility(&self) -> usize {
        self.volatility.get()
    }

    #[must_use]
    pub fn key_levels(&self) -> usize {
        self.key_levels.get()
    }

    /// Bars needed before every column is defined.
    #[must_use]
    pub fn warm_up(&self) -> usize {
        self.fast_sma()
            .max(self.slow_sma())
            .max(self.volatility() + 1)
            .max(self.key_levels())
    }
}

impl Display for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PipelineConfig(sma: {}/{}, vol: {}, levels: {})",
            self.fast_sma, self.slow_sma, self.volatility, self.key_levels
        )
    }
}

/// Builder for [`PipelineConfig`], starting from the defaults.
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    #[must_use]
    pub fn fast_sma(mut self, length: NonZero<usize>) -> Self {
        self.config.fast_sma = length;
        self
    }

    #[must_use]
    pub fn slow_sma(mut self, length: NonZero<usize>) -> Self {
        self.config.slow_sma = length;
        self
    }

    #[must_use]
    pub fn volatility(mut self, length: NonZero<usize>) -> Self {
        self.config.volatility = length;
        self
    }

    #[must_use]
    pub fn key_levels(mut self, length: NonZero<usize>) -> Self {
        self.config.key_levels = length;
        self
    }

    /// Builds the config.
    ///
    /// # Panics
    ///
    /// Panics if the volatility window is shorter than 2 returns.
    #[must_use]
    pub fn build(self) -> PipelineConfig {
        assert!(
            self.config.volatility.get() >= 2,
            "volatility length must be at least 2"
        );
        self.config
    }
}

/// Indicator values derived for one bar. `None` until the trailing window
/// behind the field is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub sma_fast: Option<Price>,
    pub sma_slow: Option<Price>,
    pub daily_return: Option<f64>,
    pub volatility: Option<f64>,
    pub resistance: Option<Price>,
    pub support: Option<Price>,
}

/// Streaming form of the indicator pipeline.
///
/// Feeds every bar to a fast and slow [`Sma`], a [`Volatility`] and a
/// [`KeyLevels`] indicator and collects their outputs. Same bar-boundary rules
/// as the individual indicators: repeating an `open_time` repaints the latest
/// row.
#[derive(Clone, Debug)]
pub struct IndicatorPipeline {
    config: PipelineConfig,
    sma_fast: Sma,
    sma_slow: Sma,
    volatility: Volatility,
    key_levels: KeyLevels,
    current: Option<IndicatorRow>,
}

impl IndicatorPipeline {
    /// # Panics
    ///
    /// Panics if `config` was deserialized with a volatility window of 1.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            sma_fast: Sma::new(SmaConfig::close(config.fast_sma)),
            sma_slow: Sma::new(SmaConfig::close(config.slow_sma)),
            volatility: Volatility::new(VolatilityConfig::new(config.volatility)),
            key_levels: KeyLevels::new(KeyLevelsConfig::new(config.key_levels)),
            current: None,
        }
    }

    pub fn compute(&mut self, ohlcv: &impl Ohlcv) -> IndicatorRow {
        let sma_fast = self.sma_fast.compute(ohlcv);
        let sma_slow = self.sma_slow.compute(ohlcv);
        let volatility = self.volatility.compute(ohlcv);
        let key_levels = self.key_levels.compute(ohlcv);

        let row = IndicatorRow {
            sma_fast,
            sma_slow,
            daily_return: self.volatility.daily_return(),
            volatility,
            resistance: key_levels.map(|levels| levels.resistance()),
            support: key_levels.map(|levels| levels.support()),
        };

        self.current = Some(row);
        row
    }

    /// Row computed for the latest bar, `None` before the first bar.
    #[must_use]
    pub fn value(&self) -> Option<IndicatorRow> {
        self.current
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

/// A price bar together with the indicators derived up to it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EnrichedBar {
    #[serde(flatten)]
    pub bar: PriceBar,
    #[serde(flatten)]
    pub indicators: IndicatorRow,
}

impl EnrichedBar {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    #[must_use]
    pub fn close(&self) -> Price {
        self.bar.close
    }

    /// Reads a single column of this row.
    #[must_use]
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Close => Some(self.bar.close),
            Column::SmaFast => self.indicators.sma_fast,
            Column::SmaSlow => self.indicators.sma_slow,
            Column::DailyReturn => self.indicators.daily_return,
            Column::Volatility => self.indicators.volatility,
            Column::Support => self.indicators.support,
            Column::Resistance => self.indicators.resistance,
        }
    }
}

/// Numeric columns of an [`EnrichedHistory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Close,
    SmaFast,
    SmaSlow,
    DailyReturn,
    Volatility,
    Support,
    Resistance,
}

impl Column {
    /// Columns drawn by the price chart.
    pub const CHART: [Self; 5] = [
        Self::Close,
        Self::SmaFast,
        Self::SmaSlow,
        Self::Support,
        Self::Resistance,
    ];
}

/// A [`PriceHistory`] with indicator columns, one row per bar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrichedHistory {
    symbol: Symbol,
    config: PipelineConfig,
    rows: Vec<EnrichedBar>,
}

impl EnrichedHistory {
    /// Runs every bar of `history` through an [`IndicatorPipeline`].
    ///
    /// ```
    /// use quantedge_signal::{EnrichedHistory, Period, PipelineConfig, PriceBar, PriceHistory};
    /// use chrono::NaiveDate;
    ///
    /// let bars = (1..=60)
    ///     .map(|day| PriceBar {
    ///         date: NaiveDate::from_yo_opt(2024, day).unwrap(),
    ///         open: 100.0,
    ///         high: 101.0,
    ///         low: 99.0,
    ///         close: 100.0,
    ///         volume: 10,
    ///     })
    ///     .collect();
    /// let history = PriceHistory::new("spy".parse().unwrap(), Period::OneYear, bars).unwrap();
    /// let enriched = EnrichedHistory::from_history(&history, PipelineConfig::default());
    ///
    /// assert_eq!(enriched.len(), 60);
    /// assert_eq!(enriched.rows()[48].indicators.sma_fast, None);
    /// assert_eq!(enriched.rows()[49].indicators.sma_fast, Some(100.0));
    /// ```
    #[must_use]
    pub fn from_history(history: &PriceHistory, config: PipelineConfig) -> Self {
        let mut pipeline = IndicatorPipeline::new(config);

        let rows = history
            .bars()
            .iter()
            .map(|bar| EnrichedBar {
                bar: *bar,
                indicators: pipeline.compute(bar),
            })
            .collect();

        Self {
            symbol: history.symbol().clone(),
            config,
            rows,
        }
    }

    /// Wraps rows enriched elsewhere, e.g. by a streaming
    /// [`IndicatorPipeline`].
    #[must_use]
    pub fn from_rows(symbol: Symbol, config: PipelineConfig, rows: Vec<EnrichedBar>) -> Self {
        Self {
            symbol,
            config,
            rows,
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn rows(&self) -> &[EnrichedBar] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&EnrichedBar> {
        self.rows.last()
    }

    /// One value per row, `None` where the column is undefined.
    #[must_use]
    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.get(column)).collect()
    }

    /// Header used for `column` in CSV output, e.g. `SMA_50`.
    #[must_use]
    pub fn column_name(&self, column: Column) -> String {
        match column {
            Column::Close => "Close".to_owned(),
            Column::SmaFast => format!("SMA_{}", self.config.fast_sma()),
            Column::SmaSlow => format!("SMA_{}", self.config.slow_sma()),
            Column::DailyReturn => "Daily Return".to_owned(),
            Column::Volatility => "Volatility".to_owned(),
            Column::Support => "Support".to_owned(),
            Column::Resistance => "Resistance".to_owned(),
        }
    }

    /// Writes `Date` followed by the chart columns as CSV. Undefined values
    /// are written as empty fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Csv`](crate::Error::Csv) or
    /// [`Error::Io`](crate::Error::Io) if the writer fails.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["Date".to_owned()];
        header.extend(Column::CHART.iter().map(|c| self.column_name(*c)));
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.date().to_string()];
            record.extend(
                Column::CHART
                    .iter()
                    .map(|c| row.get(*c).map(|v| v.to_string()).unwrap_or_default()),
            );
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }
}
