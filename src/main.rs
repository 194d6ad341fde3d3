// SPDX-License-Identifier: AGPL-3.0-or-later

mod cli;

use anyhow::Result;
use clap::Parser;
use formportal::Node;

use crate::cli::{load_config, print_config, Cli};

/// Scopes the configured log level to this crate unless `RUST_LOG` is set.
fn setup_logging(log_level: &str) {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = env_logger::builder().try_init();
        return;
    }

    // A level like "debug" gets scoped, a filter like "=TRACE" or "tower_http=DEBUG" is used as
    // is
    let filter = if log_level.contains('=') {
        log_level.trim_start_matches('=').to_string()
    } else {
        format!("formportal={}", log_level)
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments and merge them with the config file and environment
    let loaded = load_config(Cli::parse())?;
    setup_logging(&loaded.log_level);

    println!("{}", print_config(&loaded.config_file_path, &loaded.config));

    // Start the portal in async runtime
    let node = Node::start(loaded.config).await?;

    // Run this until [CTRL] + [C] got pressed or something went wrong
    tokio::select! {
        _ = tokio::signal::ctrl_c() => (),
        _ = node.on_exit() => (),
    }

    // Wait until all tasks are gracefully shut down and exit
    node.shutdown().await;

    Ok(())
}
