use time::Date;

/// District code assigned to records whose source row had none.
pub const UNKNOWN_DISTRICT_CODE: &str = "Unknown";

/// One installed server, normalized at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationRecord {
    pub district_code: String,
    pub district_name: Option<String>,
    pub installation_date: Option<Date>,
    pub installation_year: Option<String>,
    pub province_code: Option<String>,
}
