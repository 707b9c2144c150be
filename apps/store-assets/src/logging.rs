use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str =
    "store_assets=info,engine=info,resize_screenshots=info,generate_icons=info";

/// Install the fmt subscriber. `RUST_LOG` overrides the default directives.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

fn default_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_DIRECTIVES)
}
