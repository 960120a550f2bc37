//! CSV property catalogs used to seed the store.
//!
//! Expected header: `title,description,price_in_inr,location,city,bedrooms,bathrooms,
//! area_sqft,property_type,amenities,image_url,status`. Only `title`, `price_in_inr`,
//! `location` and `property_type` are required; `amenities` is `;`-separated.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::schema::{Property, ValidationError, DEFAULT_CITY, DEFAULT_STATUS};

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read property catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid property catalog data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog line {line}: {reason}")]
    RejectedRow { line: u64, reason: String },
}

/// Row that could not become a property. `line` counts the header as line 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

/// Outcome of reading a catalog: valid properties plus every rejected row.
#[derive(Debug, Clone, Default)]
pub struct CatalogImport {
    pub properties: Vec<Property>,
    pub rejected: Vec<RejectedRow>,
}

/// Aggregate view used by `catalog check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub by_type: BTreeMap<String, usize>,
    pub price_range: Option<(i64, i64)>,
}

impl CatalogImport {
    /// All properties, or the first rejected row when the catalog is not clean.
    pub fn into_properties(self) -> Result<Vec<Property>, CatalogImportError> {
        match self.rejected.into_iter().next() {
            Some(RejectedRow { line, reason }) => {
                Err(CatalogImportError::RejectedRow { line, reason })
            }
            None => Ok(self.properties),
        }
    }

    pub fn summary(&self) -> CatalogSummary {
        let mut by_type = BTreeMap::new();
        for property in &self.properties {
            *by_type.entry(property.property_type.clone()).or_insert(0) += 1;
        }

        let prices = self.properties.iter().map(|property| property.price_in_inr);
        let price_range = prices
            .clone()
            .min()
            .zip(prices.max());

        CatalogSummary {
            accepted: self.properties.len(),
            rejected: self.rejected.len(),
            by_type,
            price_range,
        }
    }
}

pub struct PropertyCatalogImporter;

impl PropertyCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CatalogImport, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads every row. Short, undecodable or invalid rows are collected, not fatal; only a
    /// broken file (unreadable, bad header) fails the import.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<CatalogImport, CatalogImportError> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(input.as_slice());
        let headers = csv_reader.headers()?.clone();

        let mut import = CatalogImport::default();
        for (index, result) in csv_reader.records().enumerate() {
            let fallback = index as u64 + 2;
            let record = match result {
                Ok(record) => record,
                Err(err) if is_row_error(&err) => {
                    import.rejected.push(RejectedRow {
                        line: err
                            .position()
                            .map_or(fallback, |position| record_line(&input, position)),
                        reason: row_reason(&err),
                    });
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            let line = record
                .position()
                .map_or(fallback, |position| record_line(&input, position));

            let row = match record.deserialize::<CatalogRow>(Some(&headers)) {
                Ok(row) => row,
                Err(err) => {
                    import.rejected.push(RejectedRow {
                        line,
                        reason: row_reason(&err),
                    });
                    continue;
                }
            };

            match row.into_property().validated() {
                Ok(property) => import.properties.push(property),
                Err(error) => import.rejected.push(RejectedRow {
                    line,
                    reason: describe(&error),
                }),
            }
        }

        Ok(import)
    }
}

/// Physical line a record starts on. The reader stamps a record with the position it
/// started reading from, which precedes any blank lines or pending `\n` it then skips.
fn record_line(input: &[u8], position: &csv::Position) -> u64 {
    let start = usize::try_from(position.byte())
        .unwrap_or(input.len())
        .min(input.len());
    let skipped = input[start..]
        .iter()
        .take_while(|byte| matches!(**byte, b'\r' | b'\n'))
        .filter(|byte| **byte == b'\n')
        .count();
    position.line() + skipped as u64
}

fn is_row_error(err: &csv::Error) -> bool {
    matches!(
        err.kind(),
        csv::ErrorKind::UnequalLengths { .. }
            | csv::ErrorKind::Utf8 { .. }
            | csv::ErrorKind::Deserialize { .. }
    )
}

fn row_reason(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("column {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} columns, found {len}"),
        csv::ErrorKind::Utf8 { err, .. } => {
            format!("column {}: invalid UTF-8", err.field() + 1)
        }
        _ => err.to_string(),
    }
}

fn describe(error: &ValidationError) -> String {
    error
        .fields()
        .iter()
        .map(|field| format!("{} {}", field.field, field.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    price_in_inr: i64,
    location: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default)]
    bedrooms: Option<i64>,
    #[serde(default)]
    bathrooms: Option<i64>,
    #[serde(default)]
    area_sqft: Option<i64>,
    property_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amenities: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    image_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

impl CatalogRow {
    fn into_property(self) -> Property {
        Property {
            title: self.title,
            description: self.description,
            price_in_inr: self.price_in_inr,
            location: self.location,
            city: self.city.unwrap_or_else(|| DEFAULT_CITY.to_string()),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area_sqft: self.area_sqft,
            property_type: self.property_type,
            amenities: self
                .amenities
                .map(|cell| cell.split(';').map(str::to_string).collect())
                .unwrap_or_default(),
            image_url: self.image_url,
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "title,description,price_in_inr,location,city,bedrooms,bathrooms,area_sqft,property_type,amenities,image_url,status\n";

    #[test]
    fn reads_rows_with_defaults_and_amenities() {
        let csv = format!(
            "{HEADER}\
3BHK Gated Community,Corner unit,12500000,Gachibowli,,3,3,1850,Apartment,Clubhouse; Pool;Gym,,\n\
Farm plot,,2500000,Shadnagar,Rangareddy,,,,Plot,,,booked\n"
        );

        let import = PropertyCatalogImporter::from_reader(csv.as_bytes()).expect("import");
        assert!(import.rejected.is_empty());
        assert_eq!(import.properties.len(), 2);

        let apartment = &import.properties[0];
        assert_eq!(apartment.city, "Hyderabad");
        assert_eq!(apartment.status, "available");
        assert_eq!(apartment.amenities, vec!["Clubhouse", "Pool", "Gym"]);
        assert_eq!(apartment.bedrooms, Some(3));

        let plot = &import.properties[1];
        assert_eq!(plot.city, "Rangareddy");
        assert_eq!(plot.status, "booked");
        assert!(plot.bedrooms.is_none());
    }

    #[test]
    fn invalid_rows_are_collected_with_line_numbers() {
        let csv = format!(
            "{HEADER}\
Good villa,,45000000,Jubilee Hills,,4,5,4200,Villa,,,\n\
,,1000,Kokapet,,,,,Plot,,,\n\
Cheap,,not-a-number,Miyapur,,,,,Apartment,,,\n\
Negative,,-5,Miyapur,,,,,Apartment,,,\n"
        );

        let import = PropertyCatalogImporter::from_reader(csv.as_bytes()).expect("import");
        assert_eq!(import.properties.len(), 1);
        let lines: Vec<u64> = import.rejected.iter().map(|row| row.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(import.rejected[0].reason.contains("title"));
        assert!(import.rejected[2].reason.contains("price_in_inr"));

        match import.into_properties() {
            Err(CatalogImportError::RejectedRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected rejected row, got {other:?}"),
        }
    }

    #[test]
    fn line_numbers_follow_the_file_across_blank_lines_and_multiline_cells() {
        let csv = format!(
            "{HEADER}\
Good villa,,45000000,Jubilee Hills,,4,5,4200,Villa,,,\n\
\n\
,,1000,Kokapet,,,,,Plot,,,\n\
Corner flat,\"Corner unit\nnear the metro\",9000000,Ameerpet,,2,2,1100,Apartment,,,\n\
Negative,,-5,Miyapur,,,,,Apartment,,,\n"
        );

        let import = PropertyCatalogImporter::from_reader(csv.as_bytes()).expect("import");
        assert_eq!(import.properties.len(), 2);
        assert_eq!(
            import.properties[1].description.as_deref(),
            Some("Corner unit\nnear the metro")
        );
        let lines: Vec<u64> = import.rejected.iter().map(|row| row.line).collect();
        assert_eq!(lines, vec![4, 7]);
    }

    #[test]
    fn crlf_catalogs_report_physical_lines() {
        let csv = "title,price_in_inr,location,property_type\r\n\
Good,100,Kondapur,Apartment\r\n\
\r\n\
Bad,-1,Kondapur,Apartment\r\n";

        let import = PropertyCatalogImporter::from_reader(csv.as_bytes()).expect("import");
        assert_eq!(import.properties.len(), 1);
        assert_eq!(import.rejected.len(), 1);
        assert_eq!(import.rejected[0].line, 4);
    }

    #[test]
    fn short_rows_are_rejected_without_aborting_the_import() {
        let csv = format!(
            "{HEADER}\
Good villa,,45000000,Jubilee Hills,,4,5,4200,Villa,,,\n\
Short row,,100,Kondapur\n\
Studio,,3000000,Madhapur,,1,1,450,Apartment,,,\n"
        );

        let import = PropertyCatalogImporter::from_reader(csv.as_bytes()).expect("import");
        assert_eq!(import.properties.len(), 2);
        assert_eq!(import.rejected.len(), 1);
        assert_eq!(import.rejected[0].line, 3);
        assert!(import.rejected[0].reason.contains("expected 12 columns, found 4"));

        match import.into_properties() {
            Err(CatalogImportError::RejectedRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected rejected row, got {other:?}"),
        }
    }

    #[test]
    fn summary_counts_types_and_price_range() {
        let csv = format!(
            "{HEADER}\
A,,100,Kondapur,,,,,Apartment,,,\n\
B,,300,Kondapur,,,,,Apartment,,,\n\
C,,200,Kokapet,,,,,Villa,,,\n"
        );

        let summary = PropertyCatalogImporter::from_reader(csv.as_bytes())
            .expect("import")
            .summary();
        assert_eq!(summary.accepted, 3);
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.by_type.get("Apartment"), Some(&2));
        assert_eq!(summary.price_range, Some((100, 300)));
    }

    #[test]
    fn empty_catalog_has_no_price_range() {
        let import = PropertyCatalogImporter::from_reader(HEADER.as_bytes()).expect("import");
        assert_eq!(import.summary().price_range, None);
        assert!(import.into_properties().expect("clean").is_empty());
    }
}
