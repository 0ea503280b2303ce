mod application;
mod presentation;

use tracing_subscriber::EnvFilter;

fn main() -> deckwatch_core::error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deckwatch=info,deckwatch_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    application::run()
}
