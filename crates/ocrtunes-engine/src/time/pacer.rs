use std::time::{Duration, Instant};

/// Shortest step reported by [`FramePacer::tick`].
const MIN_STEP: Duration = Duration::from_micros(100);
/// Longest step; a stalled or minimized window resumes without a jump.
const MAX_STEP: Duration = Duration::from_millis(250);

/// Fixed-rate frame scheduler.
///
/// Deadlines advance by whole periods from the previous deadline so the average
/// rate stays at the target. After a stall longer than one period the schedule
/// restarts from `now` instead of bursting to catch up.
#[derive(Debug, Clone)]
pub struct FramePacer {
    period: Duration,
    next: Instant,
    last_tick: Instant,
}

impl FramePacer {
    /// `fps` is clamped to at least 1.
    pub fn new(fps: u32, now: Instant) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            next: now,
            last_tick: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// The instant at which the next frame should start.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Returns `true` (and schedules the following frame) if a frame is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }

    /// Seconds since the previous tick, clamped to `0.0001..=0.25`.
    ///
    /// Called once per drawn frame; the first tick measures from construction.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let step = now.saturating_duration_since(self.last_tick).clamp(MIN_STEP, MAX_STEP);
        self.last_tick = now;
        step.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── scheduling ────────────────────────────────────────────────────────

    #[test]
    fn sixty_fps_period() {
        let pacer = FramePacer::new(60, Instant::now());
        assert_eq!(pacer.period(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn first_frame_is_due_immediately() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(60, t0);
        assert!(pacer.poll(t0));
        assert!(!pacer.poll(t0));
        assert_eq!(pacer.deadline(), t0 + pacer.period());
    }

    #[test]
    fn frames_keep_cadence() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(10, t0);
        assert!(pacer.poll(t0));
        // slightly late; the next deadline stays on the grid
        assert!(pacer.poll(t0 + Duration::from_millis(105)));
        assert_eq!(pacer.deadline(), t0 + Duration::from_millis(200));
    }

    #[test]
    fn long_stall_restarts_schedule() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(10, t0);
        assert!(pacer.poll(t0));
        let late = t0 + Duration::from_secs(2);
        assert!(pacer.poll(late));
        assert_eq!(pacer.deadline(), late + Duration::from_millis(100));
    }

    #[test]
    fn zero_fps_is_clamped() {
        let pacer = FramePacer::new(0, Instant::now());
        assert_eq!(pacer.period(), Duration::from_secs(1));
    }

    // ── step ──────────────────────────────────────────────────────────────

    #[test]
    fn tick_measures_between_frames() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(60, t0);
        let dt = pacer.tick(t0 + Duration::from_millis(20));
        assert!((dt - 0.020).abs() < 1e-6);
        let dt = pacer.tick(t0 + Duration::from_millis(30));
        assert!((dt - 0.010).abs() < 1e-6);
    }

    #[test]
    fn tick_is_clamped_at_both_ends() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(60, t0);
        assert!((pacer.tick(t0) - 0.0001).abs() < 1e-7);
        assert_eq!(pacer.tick(t0 + Duration::from_secs(5)), 0.25);
    }
}
