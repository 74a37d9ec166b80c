//! CSV output format.

use std::borrow::Cow;
use std::io::Write;

use oilprice_types::PricePoint;

use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }

    /// Quotes a text field if it contains the delimiter, a quote or a newline.
    fn field<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if value.contains([self.delimiter, '"', '\n', '\r']) {
            Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
        } else {
            Cow::Borrowed(value)
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_prices<W: Write + Send>(
        &self,
        prices: &[PricePoint],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "timestamp{d}code{d}value{d}unit{d}price_type")?;
        }

        for price in prices {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}",
                price.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
                self.field(&price.code),
                price.value,
                self.field(&price.unit),
                self.field(&price.price_type)
            )?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
