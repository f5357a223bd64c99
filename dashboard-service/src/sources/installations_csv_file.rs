use std::{fs::File, io::Read, path::PathBuf};

use csv::StringRecord;
use installations_core::{domain::InstallationRecord, ReferenceTables};

use super::LoadError;
use crate::transform::{InstallationNormalizer, RawInstallation};

pub const DISTRICT_CODE_COLUMN: &str = "DIST_PCODE";
pub const DISTRICT_NAME_COLUMN: &str = "DIST_EN";
pub const INSTALLATION_DATE_COLUMN: &str = "Installation Date";

/// Values a spreadsheet export writes for an empty cell.
const MISSING_MARKERS: [&str; 5] = ["NA", "N/A", "NaN", "nan", "null"];

/// Installations table (one row per installed server).
///
/// Expected header columns (by name):
/// - DIST_PCODE (district code; blank rows fall back to "Unknown")
/// - DIST_EN (district display name)
/// - Installation Date (unparseable values leave the year empty)
///
/// Other columns are ignored.
pub struct InstallationsCsvFileSource {
    path: PathBuf,
}

impl InstallationsCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self, refs: &ReferenceTables) -> Result<Vec<InstallationRecord>, LoadError> {
        let file = File::open(&self.path).map_err(|e| LoadError::Open {
            path: self.path.display().to_string(),
            source: e,
        })?;
        read_installations(file, refs)
    }
}

/// Header positions of the consumed columns.
struct Columns {
    district_code: usize,
    district_name: usize,
    installation_date: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, LoadError> {
        let position = |name: &'static str| -> Result<usize, LoadError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(LoadError::MissingColumn(name))
        };

        Ok(Self {
            district_code: position(DISTRICT_CODE_COLUMN)?,
            district_name: position(DISTRICT_NAME_COLUMN)?,
            installation_date: position(INSTALLATION_DATE_COLUMN)?,
        })
    }
}

fn parse_optional_string(s: Option<&str>) -> Option<String> {
    let trimmed = s?.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn record_to_raw_installation(record: &StringRecord, columns: &Columns) -> RawInstallation {
    RawInstallation {
        district_code: parse_optional_string(record.get(columns.district_code)),
        district_name: parse_optional_string(record.get(columns.district_name)),
        installation_date: parse_optional_string(record.get(columns.installation_date)),
    }
}

/// Read and normalize every installation row from `reader`.
pub fn read_installations<R: Read>(
    reader: R,
    refs: &ReferenceTables,
) -> Result<Vec<InstallationRecord>, LoadError> {
    // Short rows load with the missing trailing cells left blank.
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns = Columns::locate(&headers)?;

    let mut normalizer = InstallationNormalizer::new(refs);
    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        records.push(normalizer.apply(record_to_raw_installation(&record, &columns)));
    }

    let summary = normalizer.finish();
    tracing::info!(
        records = summary.records,
        missing_dates = summary.missing_dates,
        "installations loaded"
    );
    if summary.unparseable_dates > 0 || summary.missing_districts > 0 || summary.unmatched_districts > 0 {
        tracing::warn!(
            unparseable_dates = summary.unparseable_dates,
            missing_districts = summary.missing_districts,
            unmatched_districts = summary.unmatched_districts,
            "some installation values degraded to unknown"
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use installations_core::domain::UNKNOWN_DISTRICT_CODE;

    const CSV: &str = "\
Server ID,DIST_PCODE,DIST_EN,Installation Date
s-1,NP0301,Kathmandu,2020-03-05
s-2,NP0301,Kathmandu,2021-07-14 10:30:00
s-3,,Nowhere,2020-01-01
s-4,NP0402,Kaski,soon
";

    #[test]
    fn reads_and_normalizes_rows() {
        let records = read_installations(CSV.as_bytes(), &ReferenceTables::default()).unwrap();
        assert_eq!(records.len(), 4);

        assert_eq!(records[0].district_code, "NP0301");
        assert_eq!(records[0].district_name.as_deref(), Some("Kathmandu"));
        assert_eq!(records[1].installation_year.as_deref(), Some("2021"));
        assert_eq!(records[2].district_code, UNKNOWN_DISTRICT_CODE);
        assert_eq!(records[3].installation_year, None);
        assert!(records.iter().all(|r| r.province_code.is_none()));
    }

    #[test]
    fn missing_markers_are_treated_as_blank() {
        let csv = "DIST_PCODE,DIST_EN,Installation Date\nNaN,N/A,null\n";
        let records = read_installations(csv.as_bytes(), &ReferenceTables::default()).unwrap();
        assert_eq!(records[0].district_code, UNKNOWN_DISTRICT_CODE);
        assert_eq!(records[0].district_name, None);
        assert_eq!(records[0].installation_date, None);
    }

    #[test]
    fn rejects_missing_required_column() {
        let csv = "DIST_PCODE,Installation Date\nNP0301,2020-03-05\n";
        let res = read_installations(csv.as_bytes(), &ReferenceTables::default());
        assert!(matches!(res, Err(LoadError::MissingColumn(DISTRICT_NAME_COLUMN))));
    }

    #[test]
    fn short_row_loads_without_a_year() {
        let csv = "DIST_PCODE,DIST_EN,Installation Date\nNP0301,Kathmandu,2020-03-05\nNP0301,Kathmandu\n";
        let records = read_installations(csv.as_bytes(), &ReferenceTables::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].district_code, "NP0301");
        assert_eq!(records[1].installation_date, None);
        assert_eq!(records[1].installation_year, None);
    }

    #[test]
    fn rejects_invalid_utf8() {
        let mut csv = b"DIST_PCODE,DIST_EN,Installation Date\nNP0301,".to_vec();
        csv.extend_from_slice(&[0xff, 0xfe]);
        csv.extend_from_slice(b",2020-03-05\n");
        let res = read_installations(csv.as_slice(), &ReferenceTables::default());
        assert!(matches!(res, Err(LoadError::Csv(_))));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let source = InstallationsCsvFileSource::new("/definitely/not/here.csv");
        let res = source.load(&ReferenceTables::default());
        assert!(matches!(res, Err(LoadError::Open { .. })));
    }
}
