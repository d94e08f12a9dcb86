//! Standalone relay hub
//!
//! ```text
//! RUST_LOG=info cargo run -p relay_server -- hub.ron
//! ```
//!
//! Without an argument the hub listens on the default port with the
//! default namespace.

use relaynet_hub::{Hub, HubConfig};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

const IDLE_SLEEP: Duration = Duration::from_millis(1);
const STATS_EVERY: u64 = 10_000;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> relaynet_hub::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading {}", path);
            HubConfig::load(path)?
        }
        None => HubConfig::default(),
    };

    let mut hub = Hub::bind(config)?;
    let mut idle_loops = 0u64;
    loop {
        if hub.poll()? == 0 {
            idle_loops += 1;
            if idle_loops % STATS_EVERY == 0 {
                log::debug!("{:?}, {} client(s)", hub.stats(), hub.clients().len());
            }
            thread::sleep(IDLE_SLEEP);
        }
    }
}
