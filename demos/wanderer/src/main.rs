//! Headless wandering client
//!
//! Connects to a hub, spawns its player and walks it in a circle so other
//! peers can watch it move. Remote objects are logged as they appear.
//!
//! ```text
//! RUST_LOG=info cargo run -p wanderer -- peer.ron
//! ```

use relaynet_core::{ObjectHandle, Vec3};
use relaynet_peer::{Peer, PeerConfig, PeerEvent, PrefabRegistry};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);
const RADIUS: f32 = 3.0;
const DEFAULT_PLAYER: &str = "Player";

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

fn run() -> relaynet_peer::Result<()> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => PeerConfig::load(path)?,
        None => PeerConfig::default(),
    };
    config
        .player_prefab
        .get_or_insert_with(|| DEFAULT_PLAYER.to_string());

    let mut prefabs = PrefabRegistry::new();
    prefabs.register_body(DEFAULT_PLAYER).register_body("Cube");

    let mut peer = Peer::bind(config, prefabs)?;
    let start = Instant::now();
    peer.connect(start)?;

    let mut player: Option<ObjectHandle> = None;
    loop {
        let now = Instant::now();
        if let Some(handle) = player {
            let angle = now.duration_since(start).as_secs_f32();
            if let Some(object) = peer.object_mut(handle) {
                object
                    .instance_mut()
                    .set_position(Vec3::new(angle.cos(), 0.0, angle.sin()) * RADIUS);
            }
        }

        peer.update(now)?;
        for event in peer.take_events() {
            match event {
                PeerEvent::Connected { uid } => log::info!("connected, uid {}", uid),
                PeerEvent::NobIdAssigned { handle, nob_id } => {
                    log::info!("walking {} as {}", handle, nob_id);
                    player.get_or_insert(handle);
                }
                PeerEvent::RemoteSpawned {
                    nob_id,
                    owner,
                    type_name,
                    ..
                } => log::info!("{} joined with {} {}", owner, type_name, nob_id),
                PeerEvent::RemoteDespawned { nob_id, owner } => {
                    log::info!("{} removed {}", owner, nob_id)
                }
                PeerEvent::RequestExhausted { address, attempts, .. } => {
                    log::warn!("{} unanswered after {} attempt(s)", address, attempts)
                }
                PeerEvent::Message(message) => log::debug!("{}", message),
            }
        }

        thread::sleep(FRAME);
    }
}
