//! Standalone player binary.
//!
//! Usage:
//!   cargo run -p rig_player -- [--config rig.json] [--track right.txt]
//!                              [--listen 127.0.0.1:8055] [--tick-hz 20] [--points 21]
//!
//! With `--track` the recording is replayed in a loop. Without it the player
//! listens for live messages on the UDP address and applies the latest one
//! each tick. Positions are reported through `tracing`; set
//! `RUST_LOG=rig_player=debug` to see the first point every report.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use rig_player::{PacedHost, PointSequencePlayer};
use rig_shared::{
    config::RigConfig,
    net::{LiveReceiver, SampleSource},
    scene::SceneNode,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

fn parse_args() -> anyhow::Result<RigConfig> {
    let args: Vec<String> = env::args().collect();
    parse_args_from(&args)
}

fn parse_args_from(args: &[String]) -> anyhow::Result<RigConfig> {
    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => RigConfig::from_json_file(&args[i + 1])?,
        _ => RigConfig::default(),
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => i += 2,
            "--track" if i + 1 < args.len() => {
                cfg.recording = Some(args[i + 1].clone());
                i += 2;
            }
            "--listen" if i + 1 < args.len() => {
                cfg.listen_addr = args[i + 1].clone();
                i += 2;
            }
            "--tick-hz" if i + 1 < args.len() => {
                cfg.tick_hz = args[i + 1]
                    .parse::<u32>()
                    .with_context(|| format!("--tick-hz {:?}", args[i + 1]))?;
                i += 2;
            }
            "--points" if i + 1 < args.len() => {
                cfg.point_count = args[i + 1]
                    .parse::<usize>()
                    .with_context(|| format!("--points {:?}", args[i + 1]))?;
                i += 2;
            }
            _ => i += 1,
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args()?;
    let targets = SceneNode::rig(cfg.point_count);

    let mut receiver_task: Option<JoinHandle<anyhow::Result<()>>> = None;
    let mut player = match &cfg.recording {
        Some(path) => {
            let track = cfg
                .recorded_source()
                .load(path)
                .with_context(|| format!("load recording {path}"))?;
            info!(path = %path, frames = track.len(), points = cfg.point_count, "Replaying recording");
            PointSequencePlayer::recorded(targets, track)
        }
        None => {
            let addr: SocketAddr = cfg.listen_addr.parse().context("parse listen_addr")?;
            let receiver = LiveReceiver::bind(addr).await?;
            info!(addr = %receiver.local_addr()?, points = cfg.point_count, "Waiting for live feed");
            let feed: Arc<dyn SampleSource> = Arc::new(receiver.slot());
            receiver_task = Some(receiver.spawn());
            PointSequencePlayer::live(targets, cfg.live_source(), feed)
        }
    };

    let mut host = PacedHost::new(cfg.tick_interval());
    info!(tick_hz = cfg.tick_hz, period = ?host.period(), "Playback started");

    loop {
        host.wait().await;
        player.tick();

        let stats = player.stats();
        if stats.ticks % u64::from(cfg.tick_hz) == 0 {
            info!(
                ticks = stats.ticks,
                applied = stats.applied,
                skipped = stats.skipped,
                cursor = ?player.cursor(),
                "Playback"
            );
            if let Some(first) = player.targets().first() {
                debug!(node = %first.name, position = ?first.local_position, "First point");
            }
        }

        if receiver_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = receiver_task.take() {
                task.await.context("live receiver task")??;
            }
            anyhow::bail!("live receiver stopped");
        }
    }
}
