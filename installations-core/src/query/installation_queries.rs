use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::domain::{province_codes_for_name, province_name, InstallationRecord, Selection, Selector, ALL};

/// Installations counted for one district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictCount {
    pub district_code: String,
    pub installations: usize,
}

/// Resolve a province display name to the code used for filtering.
///
/// Returns `None` both for `All` and for names absent from the province table;
/// either way the province dimension does not filter.
fn resolve_province(selector: &Selector) -> Option<&'static str> {
    let name = selector.value()?;
    province_codes_for_name(name).into_iter().next()
}

/// Narrow `records` to those matching every concrete selector in `selection`.
pub fn filter_installations<'a, I>(records: I, selection: &Selection) -> Vec<&'a InstallationRecord>
where
    I: IntoIterator<Item = &'a InstallationRecord>,
{
    let province_code = resolve_province(&selection.province);

    records
        .into_iter()
        .filter(|r| selection.year.matches(r.installation_year.as_deref()))
        .filter(|r| province_code.map_or(true, |code| r.province_code.as_deref() == Some(code)))
        .filter(|r| selection.district.matches(r.district_name.as_deref()))
        .collect()
}

/// Count records per district code, ordered by code. Districts without
/// records are not emitted.
pub fn count_by_district<'a, I>(records: I) -> Vec<DistrictCount>
where
    I: IntoIterator<Item = &'a InstallationRecord>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.district_code.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(code, installations)| DistrictCount {
            district_code: code.to_string(),
            installations,
        })
        .collect()
}

/// Dropdown entries, each list led by `All`. Derived once from the full
/// dataset; the lists do not narrow as other selectors change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOptions {
    pub years: Vec<String>,
    pub provinces: Vec<String>,
    pub districts: Vec<String>,
}

impl DropdownOptions {
    pub fn from_records(records: &[InstallationRecord]) -> Self {
        let years: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.installation_year.as_deref())
            .collect();

        let province_codes: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.province_code.as_deref())
            .collect();
        let mut seen_provinces = HashSet::new();
        let provinces = province_codes
            .into_iter()
            .map(province_name)
            .filter(|name| seen_provinces.insert(*name));

        // First record of each district code supplies its display name.
        let mut seen_codes = HashSet::new();
        let mut seen_names = HashSet::new();
        let districts = records
            .iter()
            .filter(|r| seen_codes.insert(r.district_code.as_str()))
            .filter_map(|r| r.district_name.as_deref())
            .filter(|name| seen_names.insert(*name));

        Self {
            years: with_all(years),
            provinces: with_all(provinces),
            districts: with_all(districts),
        }
    }
}

fn with_all<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    std::iter::once(ALL)
        .chain(values)
        .map(str::to_string)
        .collect()
}
