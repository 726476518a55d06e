use serde::{Deserialize, Serialize};

// Response structs for the Sheets values API
#[derive(Serialize, Deserialize, Debug)]
pub struct ValueRange {
    pub range: String,
    #[serde(rename = "majorDimension")]
    pub major_dimension: String,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// One raw spreadsheet row before any coercion. Both cells stay strings so
/// the extraction layer can distinguish an empty weight cell from a parse
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRecord {
    pub date: String,
    pub weight: String,
}

impl ValueRange {
    /// Drops the header row and maps the remaining rows to raw records.
    /// Rows narrower than two columns are padded with empty cells, so a
    /// date-only row keeps its weight gap.
    pub fn into_records(self) -> Vec<SheetRecord> {
        self.values
            .into_iter()
            .skip(1)
            .map(|row| {
                let mut cells = row.into_iter();
                SheetRecord {
                    date: cells.next().unwrap_or_default(),
                    weight: cells.next().unwrap_or_default(),
                }
            })
            .collect()
    }
}
