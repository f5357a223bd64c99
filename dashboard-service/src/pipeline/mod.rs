use std::time::Instant;

use installations_core::{
    domain::{DistrictBoundaries, InstallationRecord, Selection},
    query::{count_by_district, filter_installations, DistrictCount, DropdownOptions},
    ReferenceTables,
};

use crate::{
    config::{DataConfig, MapConfig},
    metrics_server,
    render::{ChoroplethFigure, DistrictNames},
    sources::{DistrictBoundariesFileSource, InstallationsCsvFileSource, LoadError},
};

/// Everything loaded at startup. Read-only once built; every view is
/// recomputed from the full record set.
pub struct Dashboard {
    records: Vec<InstallationRecord>,
    boundaries: DistrictBoundaries,
    names: DistrictNames,
    options: DropdownOptions,
    map: MapConfig,
}

/// Result of running the selection through filter, aggregate and render.
pub struct DashboardView<'a> {
    pub selection: Selection,
    pub filtered: Vec<&'a InstallationRecord>,
    pub counts: Vec<DistrictCount>,
    pub figure: ChoroplethFigure<'a>,
}

impl DashboardView<'_> {
    pub fn total_installations(&self) -> usize {
        self.filtered.len()
    }
}

impl Dashboard {
    pub fn new(
        records: Vec<InstallationRecord>,
        boundaries: DistrictBoundaries,
        refs: &ReferenceTables,
        map: MapConfig,
    ) -> Self {
        let names = DistrictNames::from_sources(refs, &records);
        let options = DropdownOptions::from_records(&records);

        Self {
            records,
            boundaries,
            names,
            options,
            map,
        }
    }

    /// Load boundaries first: the district to province table they yield is
    /// needed while normalizing installations.
    pub fn load(data: &DataConfig, map: MapConfig) -> Result<Self, LoadError> {
        let boundaries = DistrictBoundariesFileSource::new(&data.boundaries_geojson).load()?;
        let refs = ReferenceTables::from_boundaries(&boundaries);
        let records = InstallationsCsvFileSource::new(&data.installations_csv).load(&refs)?;

        let dashboard = Self::new(records, boundaries, &refs, map);
        tracing::info!(
            records = dashboard.records.len(),
            districts = refs.district_count(),
            years = dashboard.options.years.len() - 1,
            "dashboard data ready"
        );
        Ok(dashboard)
    }

    pub fn records(&self) -> &[InstallationRecord] {
        &self.records
    }

    pub fn options(&self) -> &DropdownOptions {
        &self.options
    }

    pub fn view(&self, selection: &Selection) -> DashboardView<'_> {
        let started = Instant::now();

        let filtered = filter_installations(&self.records, selection);
        let counts = count_by_district(filtered.iter().copied());
        let figure = ChoroplethFigure::build(&counts, &self.boundaries, &self.names, &self.map);

        metrics::counter!(metrics_server::VIEWS_TOTAL).increment(1);
        metrics::histogram!(metrics_server::VIEW_SECONDS).record(started.elapsed().as_secs_f64());
        tracing::debug!(
            unfiltered = selection.is_unfiltered(),
            year = selection.year.as_str(),
            province = selection.province.as_str(),
            district = selection.district.as_str(),
            matched = filtered.len(),
            districts = counts.len(),
            "dashboard view recomputed"
        );

        DashboardView {
            selection: selection.clone(),
            filtered,
            counts,
            figure,
        }
    }
}
