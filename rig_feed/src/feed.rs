//! Track feed.
//!
//! Sends one frame of a track per tick as a live message. Tracks given to the
//! feed should be loaded with `Calibration::IDENTITY` so the datagrams carry
//! the recording's raw values, which the receiving player calibrates itself.

use std::time::Duration;

use rig_shared::{
    calib::Calibration,
    frame::Track,
    live::{Delimiters, LiveFrameSource},
    net::FeedSender,
};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Streams a track to one receiver.
pub struct TrackFeed {
    sender: FeedSender,
    encoder: LiveFrameSource,
    track: Track,
    cursor: usize,
    sent: u64,
}

impl TrackFeed {
    pub fn new(sender: FeedSender, track: Track, delimiters: Delimiters) -> Self {
        Self {
            sender,
            encoder: LiveFrameSource::new(Calibration::IDENTITY, delimiters),
            track,
            cursor: 0,
            sent: 0,
        }
    }

    /// Sends the next frame and returns its index in the track.
    pub async fn send_next(&mut self) -> anyhow::Result<usize> {
        let index = self.cursor;
        let message = self.encoder.encode_message(self.track.frame_at(index));
        self.sender.send(&message).await?;
        debug!(index, bytes = message.len(), "Frame sent");

        self.sent += 1;
        self.cursor = (self.cursor + 1) % self.track.len();
        Ok(index)
    }

    /// Sends frames every `period`. `loops` bounds the number of passes
    /// over the track; `None` runs until an error.
    pub async fn run(&mut self, period: Duration, loops: Option<u32>) -> anyhow::Result<u64> {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let total = loops.map(|n| u64::from(n) * self.track.len() as u64);

        info!(peer = %self.sender.peer_addr(), frames = self.track.len(), ?loops, "Feeding track");
        while total.map_or(true, |t| self.sent < t) {
            interval.tick().await;
            let index = self.send_next().await?;
            if index + 1 == self.track.len() {
                debug!(sent = self.sent, "Track pass complete");
            }
        }
        Ok(self.sent)
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_shared::{
        net::{any_addr_for, LiveReceiver, SampleSource},
        recorded::RecordedFrameSource,
    };

    #[tokio::test]
    async fn sends_raw_values_in_order() -> anyhow::Result<()> {
        let mut receiver = LiveReceiver::bind("127.0.0.1:0".parse()?).await?;
        let addr = receiver.local_addr()?;
        let slot = receiver.slot();

        let track = RecordedFrameSource::new(Calibration::IDENTITY).parse_str("100,200,300\n1.5,2,3")?;
        let sender = FeedSender::bind(any_addr_for(addr), addr).await?;
        let mut feed = TrackFeed::new(sender, track, Delimiters::default());

        assert_eq!(feed.send_next().await?, 0);
        time::timeout(Duration::from_secs(2), receiver.recv_once()).await??;
        assert_eq!(slot.latest().as_deref(), Some("[100, 200, 300]"));

        assert_eq!(feed.send_next().await?, 1);
        time::timeout(Duration::from_secs(2), receiver.recv_once()).await??;
        assert_eq!(slot.latest().as_deref(), Some("[1.5, 2, 3]"));

        assert_eq!(feed.send_next().await?, 0);
        assert_eq!(feed.sent(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn bounded_run_sends_every_frame_per_loop() -> anyhow::Result<()> {
        let receiver = LiveReceiver::bind("127.0.0.1:0".parse()?).await?;
        let addr = receiver.local_addr()?;
        let track = RecordedFrameSource::new(Calibration::IDENTITY).parse_str("1,2,3\n4,5,6\n7,8,9")?;
        let sender = FeedSender::bind(any_addr_for(addr), addr).await?;
        let mut feed = TrackFeed::new(sender, track, Delimiters::default());

        let sent = feed.run(Duration::from_millis(1), Some(2)).await?;
        assert_eq!(sent, 6);
        Ok(())
    }

    #[tokio::test]
    async fn bounded_run_survives_missing_listener() -> anyhow::Result<()> {
        let vacant = tokio::net::UdpSocket::bind("127.0.0.1:0").await?.local_addr()?;
        let track = RecordedFrameSource::new(Calibration::IDENTITY).parse_str("1,2,3")?;
        let sender = FeedSender::bind(any_addr_for(vacant), vacant).await?;
        let mut feed = TrackFeed::new(sender, track, Delimiters::default());

        let sent = feed.run(Duration::from_millis(5), Some(3)).await?;
        assert_eq!(sent, 3);
        Ok(())
    }
}
