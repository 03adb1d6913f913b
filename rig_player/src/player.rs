//! Point sequence playback.
//!
//! The player is ticked once per host frame. Each tick fetches the current
//! frame from its source and writes the first `min(frame.len(), targets.len())`
//! points onto the targets, in order. Recorded tracks loop forever; live mode
//! decodes whatever message the receiver holds at that moment.
//!
//! A tick that cannot produce a frame (no live message yet, malformed
//! message) leaves every target where it was.

use std::sync::Arc;

use rig_shared::{
    frame::{Frame, FrameError, Track},
    live::LiveFrameSource,
    net::SampleSource,
    scene::PositionTarget,
};
use tracing::{debug, trace, warn};

/// Where frames come from.
pub enum PlaybackSource {
    /// Looping recording. `cursor` is always in `[0, track.len())`.
    Recorded { track: Track, cursor: usize },
    /// Latest message from an external receiver.
    Live {
        decoder: LiveFrameSource,
        feed: Arc<dyn SampleSource>,
    },
}

/// Counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub ticks: u64,
    /// Ticks that wrote a frame.
    pub applied: u64,
    /// Ticks that kept the previous positions.
    pub skipped: u64,
}

enum Skip {
    NoSample,
    Malformed(FrameError),
}

/// Drives a fixed set of targets from recorded or live frames.
pub struct PointSequencePlayer<T: PositionTarget> {
    targets: Vec<T>,
    source: PlaybackSource,
    current: Option<Frame>,
    stats: PlayerStats,
}

impl<T: PositionTarget> PointSequencePlayer<T> {
    pub fn new(targets: Vec<T>, source: PlaybackSource) -> Self {
        Self {
            targets,
            source,
            current: None,
            stats: PlayerStats::default(),
        }
    }

    /// Plays `track` from its first frame.
    pub fn recorded(targets: Vec<T>, track: Track) -> Self {
        Self::new(targets, PlaybackSource::Recorded { track, cursor: 0 })
    }

    /// Plays whatever `feed` last received, decoded by `decoder`.
    pub fn live(targets: Vec<T>, decoder: LiveFrameSource, feed: Arc<dyn SampleSource>) -> Self {
        Self::new(targets, PlaybackSource::Live { decoder, feed })
    }

    /// Advances one host frame.
    pub fn tick(&mut self) {
        self.stats.ticks += 1;
        match self.next_frame() {
            Ok(frame) => self.apply(frame),
            Err(Skip::NoSample) => {
                self.stats.skipped += 1;
                debug!("No live sample yet; keeping positions");
            }
            Err(Skip::Malformed(e)) => {
                self.stats.skipped += 1;
                warn!(error = %e, "Dropping malformed frame; keeping positions");
            }
        }
    }

    fn next_frame(&mut self) -> Result<Frame, Skip> {
        match &mut self.source {
            PlaybackSource::Recorded { track, cursor } => {
                let frame = track.frame_at(*cursor).clone();
                *cursor += 1;
                if *cursor == track.len() {
                    *cursor = 0;
                }
                Ok(frame)
            }
            PlaybackSource::Live { decoder, feed } => {
                let raw = feed.latest().ok_or(Skip::NoSample)?;
                decoder.parse(&raw).map_err(Skip::Malformed)
            }
        }
    }

    fn apply(&mut self, frame: Frame) {
        for (target, point) in self.targets.iter_mut().zip(frame.points()) {
            target.set_local_position(*point);
        }
        if frame.len() > self.targets.len() {
            trace!(
                points = frame.len(),
                targets = self.targets.len(),
                "Frame has more points than targets; extras ignored"
            );
        }
        self.stats.applied += 1;
        self.current = Some(frame);
    }

    /// Next recorded frame index; `None` in live mode.
    pub fn cursor(&self) -> Option<usize> {
        match &self.source {
            PlaybackSource::Recorded { cursor, .. } => Some(*cursor),
            PlaybackSource::Live { .. } => None,
        }
    }

    /// Restarts a recorded track from its first frame.
    pub fn rewind(&mut self) {
        if let PlaybackSource::Recorded { cursor, .. } = &mut self.source {
            *cursor = 0;
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.source, PlaybackSource::Live { .. })
    }

    pub fn targets(&self) -> &[T] {
        &self.targets
    }

    /// The last frame written to the targets.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> PlayerStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_shared::{
        calib::Calibration,
        math::Point3,
        net::SampleSlot,
        recorded::RecordedFrameSource,
        scene::SceneNode,
    };

    fn track(text: &str) -> Track {
        RecordedFrameSource::new(Calibration::IDENTITY)
            .parse_str(text)
            .unwrap()
    }

    fn positions(player: &PointSequencePlayer<SceneNode>) -> Vec<Point3> {
        player.targets().iter().map(|n| n.local_position).collect()
    }

    #[test]
    fn cursor_wraps_after_len_ticks() {
        let mut player = PointSequencePlayer::recorded(SceneNode::rig(1), track("1,0,0\n2,0,0\n3,0,0"));
        assert_eq!(player.cursor(), Some(0));
        for expected_x in [1.0, 2.0, 3.0] {
            player.tick();
            assert_eq!(player.targets()[0].local_position.x, expected_x);
        }
        assert_eq!(player.cursor(), Some(0));
        player.tick();
        assert_eq!(player.targets()[0].local_position.x, 1.0);
        assert_eq!(player.cursor(), Some(1));
    }

    #[test]
    fn single_frame_track_stays_at_zero() {
        let mut player = PointSequencePlayer::recorded(SceneNode::rig(1), track("5,5,5"));
        player.tick();
        player.tick();
        assert_eq!(player.cursor(), Some(0));
        assert_eq!(player.stats().applied, 2);
    }

    #[test]
    fn extra_points_are_ignored() {
        let mut player =
            PointSequencePlayer::recorded(SceneNode::rig(2), track("1,1,1,2,2,2,3,3,3"));
        player.tick();
        assert_eq!(
            positions(&player),
            vec![Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0)]
        );
        assert_eq!(player.current_frame().map(Frame::len), Some(3));
    }

    #[test]
    fn short_frames_leave_remaining_targets() {
        let mut player = PointSequencePlayer::recorded(SceneNode::rig(3), track("1,1,1,2,2,2\n9,9,9"));
        player.tick();
        player.tick();
        assert_eq!(
            positions(&player),
            vec![
                Point3::new(9.0, 9.0, 9.0),
                Point3::new(2.0, 2.0, 2.0),
                Point3::ZERO
            ]
        );
    }

    #[test]
    fn rewind_restarts_track() {
        let mut player = PointSequencePlayer::recorded(SceneNode::rig(1), track("1,0,0\n2,0,0\n3,0,0"));
        player.tick();
        player.tick();
        player.rewind();
        assert_eq!(player.cursor(), Some(0));
        player.tick();
        assert_eq!(player.targets()[0].local_position.x, 1.0);
    }

    #[test]
    fn live_absent_and_malformed_samples_keep_positions() {
        let slot = SampleSlot::new();
        let mut player = PointSequencePlayer::live(
            SceneNode::rig(1),
            LiveFrameSource::default(),
            Arc::new(slot.clone()),
        );
        assert!(player.is_live());
        assert_eq!(player.cursor(), None);

        player.tick();
        assert_eq!(positions(&player), vec![Point3::ZERO]);

        slot.store("[100,200,300]".into());
        player.tick();
        assert_eq!(positions(&player), vec![Point3::new(6.0, 2.0, 3.0)]);

        for bad in ["", "[1,2]", "garbage", "[1,x,3]"] {
            slot.store(bad.into());
            player.tick();
            assert_eq!(positions(&player), vec![Point3::new(6.0, 2.0, 3.0)]);
        }

        let stats = player.stats();
        assert_eq!(stats.ticks, 6);
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.skipped, 5);
    }

    #[test]
    fn live_reads_latest_each_tick() {
        let slot = SampleSlot::new();
        let mut player = PointSequencePlayer::live(
            SceneNode::rig(1),
            LiveFrameSource::default(),
            Arc::new(slot.clone()),
        );
        slot.store("[0,0,0]".into());
        player.tick();
        player.tick();
        assert_eq!(positions(&player), vec![Point3::new(7.0, 0.0, 0.0)]);
        slot.store("[700,100,0]".into());
        player.tick();
        assert_eq!(positions(&player), vec![Point3::new(0.0, 1.0, 0.0)]);
    }
}
