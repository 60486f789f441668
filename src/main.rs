use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::info!(
        "{} {} starting",
        jge::statics::EN_APP_TITLE,
        env!("CARGO_PKG_VERSION")
    );
    jge::run_gui()
}
