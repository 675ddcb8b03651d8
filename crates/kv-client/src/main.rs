//! KV test-harness client entry point.
//!
//! Loads the configuration, opens the console, performs the handshake with
//! the host test runner, and runs the built-in suite.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config / load_config_from   -- ClientConfig (defaults if absent)
//!  └─ open_console()                   -- stdio or file backend
//!  └─ Session::setup()                 -- blocks until the host sends __sync
//!  └─ ConsoleSuite::run()              -- RunSuiteUseCase over the console
//!       └─ GreetingExchange            -- device_greetings round trip
//! ```
//!
//! # Usage
//!
//! ```text
//! kv-client [CONFIG_PATH]
//! ```
//!
//! Without `CONFIG_PATH` the platform config file is used.  `RUST_LOG`
//! overrides the configured `log_level`.  Logs always go to stderr because
//! stdout may be the protocol channel.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kv_client::application::greeting::GreetingExchange;
use kv_client::infrastructure::console::{open_console, ConsoleSuite};
use kv_client::infrastructure::storage::config::{load_config, load_config_from};

fn main() -> anyhow::Result<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_config_from(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => load_config().context("loading config")?,
    };

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = kv_core::protocol::CLIENT_VERSION,
        backend = ?config.console.backend,
        "KV client starting"
    );

    let mut session = open_console(&config.console)
        .context("opening console")?
        .into_session();

    info!("waiting for host to synchronize");
    session
        .setup(config.suite.timeout_secs, &config.suite.host_test_name)
        .context("handshake with host failed")?;

    let mut suite = ConsoleSuite::new();
    suite.add_case(Box::new(GreetingExchange::new()));
    let report = suite.run(&mut session);

    info!(
        cases = report.cases,
        passes = report.passes,
        failures = report.failures,
        "KV client finished"
    );
    Ok(())
}
