use insights_dashboard::cmd;
use tracing::info;

fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    match cmd::Cli::run() {
        Ok(_) => info!("dashboard closed"),
        Err(e) => {
            eprintln!("Oops! {e}");

            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut index = 0;
                while let Some(err) = source {
                    eprintln!("    {index}: {err}");
                    source = err.source();
                    index += 1;
                }
            }
            std::process::exit(1);
        }
    }
}
