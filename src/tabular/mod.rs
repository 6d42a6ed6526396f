//! Whitespace-aligned table extraction.
//!
//! Command-line tools such as `docker ps` print tables whose columns are
//! padded with spaces. A single space may occur inside a cell (`CONTAINER ID`,
//! `Up 2 hours`), so columns are split on runs of two or more whitespace
//! characters instead.
//!
//! Parsing is deliberately lenient: a row whose field count differs from the
//! header's is dropped rather than failing the whole table, and looking up a
//! header that does not exist yields an empty column. Callers treat emptiness
//! as "no data".
//!
//! ```
//! use host_probe::tabular::Table;
//!
//! let table = Table::parse("NAME  STATUS\nweb   Up 2 hours\ndb    Exited (0)\n");
//! assert_eq!(table.column_by_header("status"), vec!["Up 2 hours", "Exited (0)"]);
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Separator used when re-joining fields; the shortest run that still splits.
pub const COLUMN_SEPARATOR: &str = "  ";

/// Two or more consecutive whitespace characters.
static COLUMN_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("COLUMN_BOUNDARY must compile"));

/// Splits one line into fields on runs of 2+ whitespace characters.
///
/// Leading and trailing whitespace is ignored; a blank line yields no fields.
#[must_use]
pub fn split_columns(line: &str) -> Vec<String> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    COLUMN_BOUNDARY
        .split(line)
        .map(str::to_string)
        .collect()
}

/// Options controlling table lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Match header names exactly instead of ignoring ASCII case.
    pub case_sensitive_headers: bool,
}

/// A header row plus the data rows that line up with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    options: TableOptions,
}

impl Table {
    /// Parses `text` with default options.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, TableOptions::default())
    }

    /// Parses `text`: the first non-blank line is the header, the rest are
    /// data rows. Ragged rows are dropped.
    #[must_use]
    pub fn parse_with(text: &str, options: TableOptions) -> Self {
        let mut lines = text
            .lines()
            .map(split_columns)
            .filter(|fields| !fields.is_empty());

        let Some(header) = lines.next() else {
            return Self {
                options,
                ..Self::default()
            };
        };

        let width = header.len();
        let rows = lines
            .filter(|fields| {
                let aligned = fields.len() == width;
                if !aligned {
                    tracing::trace!(
                        expected = width,
                        actual = fields.len(),
                        row = ?fields,
                        "Dropping ragged row"
                    );
                }
                aligned
            })
            .collect();

        Self {
            header,
            rows,
            options,
        }
    }

    /// The header fields, empty for empty input.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// The retained data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns true if there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the header named `name`, if any.
    #[must_use]
    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| {
            if self.options.case_sensitive_headers {
                h == name
            } else {
                h.eq_ignore_ascii_case(name)
            }
        })
    }

    /// Values of the column headed `name`, in row order.
    ///
    /// An unknown header gives an empty vector, not an error.
    #[must_use]
    pub fn column_by_header(&self, name: &str) -> Vec<String> {
        self.header_index(name)
            .map(|index| self.column(index))
            .unwrap_or_default()
    }

    /// Values of the column at `index` (header excluded), in row order.
    #[must_use]
    pub fn column(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).cloned())
            .collect()
    }
}
