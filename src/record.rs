//! Catalog records and CSV parsing
//!
//! A record is one CSV row. Columns are keyed by the header row; missing
//! columns become empty strings and unknown columns are ignored. Nothing is
//! validated.

use crate::error::Result;
use serde::Serialize;

/// One row of the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Display label, searched
    pub title: String,
    /// Location of the PDF, used verbatim as a link target
    pub path: String,
    /// Auxiliary search text
    pub keywords: String,
    /// Opaque display-only timestamp
    #[serde(rename = "updateAt")]
    pub update_at: String,
    /// Opaque display-only timestamp
    #[serde(rename = "createAt")]
    pub create_at: String,
}

impl Record {
    pub fn new(title: impl Into<String>, path: impl Into<String>, keywords: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            keywords: keywords.into(),
            ..Default::default()
        }
    }

    /// Case-insensitive substring match against title or keywords.
    /// `needle_lower` must already be lower-cased.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.keywords.to_lowercase().contains(needle_lower)
    }
}

/// Column positions resolved from the header row
struct Columns {
    title: Option<usize>,
    path: Option<usize>,
    keywords: Option<usize>,
    update_at: Option<usize>,
    create_at: Option<usize>,
}

impl Columns {
    /// The first column wins when a header name repeats
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            title: find("title"),
            path: find("path"),
            keywords: find("keywords"),
            update_at: find("updateAt"),
            create_at: find("createAt"),
        }
    }

    fn record(&self, row: &csv::StringRecord) -> Record {
        let get = |col: Option<usize>| {
            col.and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string()
        };
        Record {
            title: get(self.title),
            path: get(self.path),
            keywords: get(self.keywords),
            update_at: get(self.update_at),
            create_at: get(self.create_at),
        }
    }
}

/// Parse CSV text with a header row into records, in row order.
///
/// Rows may be shorter or longer than the header. Blank lines are skipped.
pub fn parse_csv(text: &str) -> Result<Vec<Record>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = Columns::from_headers(reader.headers()?);

    let mut records = Vec::new();
    for row in reader.records() {
        records.push(columns.record(&row?));
    }

    Ok(records)
}
