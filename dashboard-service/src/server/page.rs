use installations_core::domain::{province_name, InstallationRecord, UNKNOWN_PROVINCE_NAME};
use minijinja::{context, Environment};
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::{pipeline::Dashboard, DashboardView};

const DASHBOARD_TEMPLATE: &str = "dashboard.html";

static TEMPLATE_ENV: OnceCell<Environment<'static>> = OnceCell::new();

fn environment() -> Result<&'static Environment<'static>, minijinja::Error> {
    TEMPLATE_ENV.get_or_try_init(|| {
        let mut env = Environment::new();
        env.add_template(
            DASHBOARD_TEMPLATE,
            include_str!("../../templates/dashboard.html"),
        )?;
        Ok(env)
    })
}

/// One row of the filtered data table.
#[derive(Debug, Serialize)]
pub struct RecordRow<'a> {
    pub district_code: &'a str,
    pub district_name: Option<&'a str>,
    pub installation_date: Option<String>,
    pub installation_year: Option<&'a str>,
    pub province_code: Option<&'a str>,
    pub province_name: Option<&'static str>,
}

impl<'a> From<&'a InstallationRecord> for RecordRow<'a> {
    fn from(r: &'a InstallationRecord) -> Self {
        let province_code = r.province_code.as_deref();
        RecordRow {
            district_code: &r.district_code,
            district_name: r.district_name.as_deref(),
            installation_date: r.installation_date.map(|d| d.to_string()),
            installation_year: r.installation_year.as_deref(),
            province_code,
            province_name: province_code
                .map(province_name)
                .filter(|name| *name != UNKNOWN_PROVINCE_NAME),
        }
    }
}

/// Render the full dashboard page for an already computed view.
pub fn render_page(
    dashboard: &Dashboard,
    view: &DashboardView<'_>,
    heading: &str,
    show_table: bool,
) -> Result<String, super::ServerError> {
    // Keep a `</script>` inside district names from ending the script block.
    let figure_json = serde_json::to_string(&view.figure)?.replace("</", "<\\/");
    let rows: Vec<RecordRow<'_>> = if show_table {
        view.filtered.iter().map(|r| RecordRow::from(*r)).collect()
    } else {
        Vec::new()
    };

    let template = environment()?.get_template(DASHBOARD_TEMPLATE)?;
    let html = template.render(context! {
        heading => heading,
        options => dashboard.options(),
        selection => &view.selection,
        show_table => show_table,
        total_installations => view.total_installations(),
        district_count => view.counts.len(),
        figure_json => figure_json,
        rows => rows,
    })?;
    Ok(html)
}
