//! Standalone feed binary.
//!
//! Usage:
//!   cargo run -p rig_feed -- --track right.txt [--to 127.0.0.1:8055]
//!                            [--tick-hz 20] [--loops 3] [--config rig.json]
//!
//! Sends the recording one frame per tick to a listening player, in the same
//! bracketed format the capture process uses. Runs forever unless `--loops`
//! is given.

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use rig_feed::TrackFeed;
use rig_shared::{
    calib::Calibration,
    config::RigConfig,
    net::{any_addr_for, FeedSender},
    recorded::RecordedFrameSource,
};
use tracing::info;

struct FeedArgs {
    cfg: RigConfig,
    loops: Option<u32>,
}

fn parse_args() -> anyhow::Result<FeedArgs> {
    let args: Vec<String> = env::args().collect();
    parse_args_from(&args)
}

fn parse_args_from(args: &[String]) -> anyhow::Result<FeedArgs> {
    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => RigConfig::from_json_file(&args[i + 1])?,
        _ => RigConfig::default(),
    };
    let mut loops = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => i += 2,
            "--track" if i + 1 < args.len() => {
                cfg.recording = Some(args[i + 1].clone());
                i += 2;
            }
            "--to" if i + 1 < args.len() => {
                cfg.listen_addr = args[i + 1].clone();
                i += 2;
            }
            "--tick-hz" if i + 1 < args.len() => {
                cfg.tick_hz = args[i + 1]
                    .parse::<u32>()
                    .with_context(|| format!("--tick-hz {:?}", args[i + 1]))?;
                i += 2;
            }
            "--loops" if i + 1 < args.len() => {
                loops = Some(
                    args[i + 1]
                        .parse::<u32>()
                        .with_context(|| format!("--loops {:?}", args[i + 1]))?,
                );
                i += 2;
            }
            _ => i += 1,
        }
    }
    cfg.validate()?;
    Ok(FeedArgs { cfg, loops })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let FeedArgs { cfg, loops } = parse_args()?;
    let path = cfg.recording.as_deref().context("--track <recording> is required")?;

    let track = RecordedFrameSource::new(Calibration::IDENTITY)
        .load(path)
        .with_context(|| format!("load recording {path}"))?;

    let peer: SocketAddr = cfg.listen_addr.parse().context("parse target address")?;
    let sender = FeedSender::bind(any_addr_for(peer), peer).await?;
    info!(local = %sender.local_addr()?, %peer, tick_hz = cfg.tick_hz, "Feed ready");

    let mut feed = TrackFeed::new(sender, track, cfg.delimiters);
    let sent = feed.run(cfg.tick_interval(), loops).await?;
    info!(sent, "Feed finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("rig_feed")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn loops_flag_bounds_the_feed() {
        let parsed = parse_args_from(&args(&["--track", "right.txt", "--loops", "3"])).unwrap();
        assert_eq!(parsed.loops, Some(3));
        assert_eq!(parsed.cfg.recording.as_deref(), Some("right.txt"));
    }

    #[test]
    fn malformed_numbers_are_errors() {
        assert!(parse_args_from(&args(&["--loops", "x"])).is_err());
        assert!(parse_args_from(&args(&["--tick-hz", "abc"])).is_err());
    }
}
