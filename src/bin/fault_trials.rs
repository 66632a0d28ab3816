use tracing_subscriber::EnvFilter;

fn main() {
    // Off unless RUST_LOG asks, so stderr carries only diagnostic lines.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    fault_trials::run();
}
