use installations_core::{
    domain::{InstallationRecord, UNKNOWN_DISTRICT_CODE},
    ReferenceTables,
};
use crate::metrics_server;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

/// Installation row as read from the source, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInstallation {
    pub district_code: Option<String>,
    pub district_name: Option<String>,
    pub installation_date: Option<String>,
}

/// Parse an installation date, returning `None` for anything unrecognised.
///
/// Accepted: RFC 3339, `YYYY-MM-DD[ T]HH:MM:SS`, year-first dates with `-` or
/// `/` and optional zero padding, month-first `M/D/YYYY` and `M-D-YYYY`
/// (day-first when the leading number cannot be a month), `D Mon YYYY`,
/// compact `YYYYMMDD`, and any of the date forms followed by a time we do not
/// parse.
pub fn parse_installation_date(raw: &str) -> Option<Date> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(ts.date());
    }

    let datetime_formats = [
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ];
    if let Some(dt) = datetime_formats
        .iter()
        .find_map(|f| PrimitiveDateTime::parse(s, *f).ok())
    {
        return Some(dt.date());
    }

    let date_formats = [
        format_description!("[year]-[month]-[day]"),
        format_description!("[year]-[month padding:none]-[day padding:none]"),
        format_description!("[year]/[month padding:none]/[day padding:none]"),
        format_description!("[month padding:none]/[day padding:none]/[year]"),
        format_description!("[month padding:none]-[day padding:none]-[year]"),
        format_description!("[day padding:none]-[month padding:none]-[year]"),
        format_description!("[day padding:none] [month repr:short case_sensitive:false] [year]"),
    ];
    let parse_date = |input: &str| {
        date_formats
            .iter()
            .find_map(|f| Date::parse(input, *f).ok())
            .or_else(|| parse_compact_date(input))
    };

    parse_date(s).or_else(|| {
        let prefix = s.split([' ', 'T']).next()?;
        if prefix.len() < s.len() {
            parse_date(prefix)
        } else {
            None
        }
    })
}

/// `YYYYMMDD` with no separators.
fn parse_compact_date(s: &str) -> Option<Date> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let iso = format!("{}-{}-{}", &s[..4], &s[4..6], &s[6..]);
    Date::parse(&iso, format_description!("[year]-[month]-[day]")).ok()
}

/// Pure normalization of one installation row.
///
/// Rules:
/// - a missing district code becomes `"Unknown"`;
/// - the year is derived from the parsed date, absent when the date is;
/// - the province is looked up from the raw district code, so rows without
///   a code never receive one.
pub fn normalize_installation(raw: RawInstallation, refs: &ReferenceTables) -> InstallationRecord {
    let province_code = raw
        .district_code
        .as_deref()
        .and_then(|code| refs.province_for_district(code))
        .map(str::to_string);

    let installation_date = raw.installation_date.as_deref().and_then(parse_installation_date);
    let installation_year = installation_date.map(|d| d.year().to_string());

    InstallationRecord {
        district_code: raw
            .district_code
            .unwrap_or_else(|| UNKNOWN_DISTRICT_CODE.to_string()),
        district_name: raw.district_name,
        installation_date,
        installation_year,
        province_code,
    }
}

/// Counts of values that degraded during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationSummary {
    pub records: usize,
    pub missing_dates: usize,
    pub unparseable_dates: usize,
    pub missing_districts: usize,
    pub unmatched_districts: usize,
}

/// Applies [`normalize_installation`] row by row, recording degraded values.
pub struct InstallationNormalizer<'a> {
    refs: &'a ReferenceTables,
    summary: NormalizationSummary,
}

impl<'a> InstallationNormalizer<'a> {
    pub fn new(refs: &'a ReferenceTables) -> Self {
        Self {
            refs,
            summary: NormalizationSummary::default(),
        }
    }

    pub fn apply(&mut self, raw: RawInstallation) -> InstallationRecord {
        let had_code = raw.district_code.is_some();
        let had_date = raw.installation_date.is_some();

        let record = normalize_installation(raw, self.refs);
        self.summary.records += 1;

        if record.installation_date.is_none() {
            if had_date {
                self.summary.unparseable_dates += 1;
                metrics::counter!(metrics_server::DATES_UNPARSEABLE_TOTAL).increment(1);
            } else {
                self.summary.missing_dates += 1;
            }
        }

        if !had_code {
            self.summary.missing_districts += 1;
            metrics::counter!(metrics_server::DISTRICTS_MISSING_TOTAL).increment(1);
        } else if record.province_code.is_none() {
            self.summary.unmatched_districts += 1;
            metrics::counter!(metrics_server::DISTRICTS_UNMATCHED_TOTAL).increment(1);
        }

        record
    }

    pub fn finish(self) -> NormalizationSummary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use installations_core::domain::DistrictBoundaries;
    use time::macros::date;

    fn refs() -> ReferenceTables {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null,
                 "properties": {"DIST_PCODE": "NP0301", "DIST_EN": "Kathmandu", "ADM1_PCODE": "NP03"}}
            ]
        }"#;
        let fc = match raw.parse::<geojson::GeoJson>().unwrap() {
            geojson::GeoJson::FeatureCollection(fc) => fc,
            _ => unreachable!(),
        };
        ReferenceTables::from_boundaries(&DistrictBoundaries::from_feature_collection(fc).unwrap())
    }

    fn raw(code: Option<&str>, date: Option<&str>) -> RawInstallation {
        RawInstallation {
            district_code: code.map(str::to_string),
            district_name: Some("Kathmandu".to_string()),
            installation_date: date.map(str::to_string),
        }
    }

    #[test]
    fn parses_supported_date_forms() {
        assert_eq!(parse_installation_date("2020-03-05"), Some(date!(2020 - 03 - 05)));
        assert_eq!(parse_installation_date(" 2022/11/30 "), Some(date!(2022 - 11 - 30)));
        assert_eq!(parse_installation_date("3/5/2020"), Some(date!(2020 - 03 - 05)));
        assert_eq!(parse_installation_date("12/31/2019"), Some(date!(2019 - 12 - 31)));
        assert_eq!(
            parse_installation_date("2021-07-14 10:30:00"),
            Some(date!(2021 - 07 - 14))
        );
        assert_eq!(
            parse_installation_date("2019-01-02T03:04:05Z"),
            Some(date!(2019 - 01 - 02))
        );
        assert_eq!(
            parse_installation_date("2018-08-09 10:30"),
            Some(date!(2018 - 08 - 09))
        );
    }

    #[test]
    fn parses_loosely_formatted_dates() {
        assert_eq!(parse_installation_date("2020-3-5"), Some(date!(2020 - 03 - 05)));
        assert_eq!(parse_installation_date("2020/3/5"), Some(date!(2020 - 03 - 05)));
        assert_eq!(parse_installation_date("05-03-2020"), Some(date!(2020 - 05 - 03)));
        assert_eq!(parse_installation_date("25-12-2020"), Some(date!(2020 - 12 - 25)));
        assert_eq!(parse_installation_date("20200305"), Some(date!(2020 - 03 - 05)));
        assert_eq!(parse_installation_date("5 Mar 2020"), Some(date!(2020 - 03 - 05)));
        assert_eq!(parse_installation_date("5 mar 2020"), Some(date!(2020 - 03 - 05)));
        assert_eq!(
            parse_installation_date("2020-3-5 14:00"),
            Some(date!(2020 - 03 - 05))
        );
    }

    #[test]
    fn loosely_formatted_dates_feed_the_year() {
        let record = normalize_installation(raw(Some("NP0301"), Some("20210704")), &refs());
        assert_eq!(record.installation_year.as_deref(), Some("2021"));
    }

    #[test]
    fn unparseable_dates_degrade_to_none() {
        assert_eq!(parse_installation_date(""), None);
        assert_eq!(parse_installation_date("not a date"), None);
        assert_eq!(parse_installation_date("2020-13-45"), None);
        assert_eq!(parse_installation_date("31/12/2020"), None);
        assert_eq!(parse_installation_date("20201345"), None);
        assert_eq!(parse_installation_date("12345678901"), None);
    }

    #[test]
    fn normalizes_matched_record() {
        let record = normalize_installation(raw(Some("NP0301"), Some("2020-03-05")), &refs());
        assert_eq!(record.district_code, "NP0301");
        assert_eq!(record.installation_year.as_deref(), Some("2020"));
        assert_eq!(record.province_code.as_deref(), Some("NP03"));
    }

    #[test]
    fn missing_district_code_becomes_unknown_without_province() {
        let record = normalize_installation(raw(None, Some("2020-03-05")), &refs());
        assert_eq!(record.district_code, UNKNOWN_DISTRICT_CODE);
        assert_eq!(record.province_code, None);
    }

    #[test]
    fn normalizer_counts_degraded_values() {
        let refs = refs();
        let mut normalizer = InstallationNormalizer::new(&refs);

        let bad_date = normalizer.apply(raw(Some("NP0301"), Some("someday")));
        assert_eq!(bad_date.installation_year, None);
        assert_eq!(bad_date.province_code.as_deref(), Some("NP03"));

        normalizer.apply(raw(None, None));
        normalizer.apply(raw(Some("NP9999"), Some("2021-01-01")));

        assert_eq!(
            normalizer.finish(),
            NormalizationSummary {
                records: 3,
                missing_dates: 1,
                unparseable_dates: 1,
                missing_districts: 1,
                unmatched_districts: 1,
            }
        );
    }
}
