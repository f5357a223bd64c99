use tracing_subscriber::EnvFilter;

/// Directives layered on top of `RUST_LOG`.
const DEFAULT_DIRECTIVES: [&str; 2] = ["dashboard_service=info", "installations_core=info"];

pub fn init_tracing() {
    let filter = DEFAULT_DIRECTIVES
        .iter()
        .fold(EnvFilter::from_default_env(), |filter, directive| match directive.parse() {
            Ok(d) => filter.add_directive(d),
            Err(_) => filter,
        });

    // Keep an already installed subscriber (tests, embedding binaries).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
