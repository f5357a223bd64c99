pub mod config;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod sources;
pub mod transform;

pub use pipeline::{Dashboard, DashboardView};
