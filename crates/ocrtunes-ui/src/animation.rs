//! Linear tweens stepped by frame time.

/// Linear interpolation from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self { from, to, duration: duration.max(0.0), elapsed: 0.0 }
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn step(&mut self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
        self.value()
    }

    /// Fraction complete in `0..=1`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 { 1.0 } else { self.elapsed / self.duration }
    }

    pub fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.progress()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Tweens played back to back while the owning scene blocks input.
///
/// Stages that have not started report their start value; finished stages
/// report their end value.
#[derive(Debug, Clone)]
pub struct ModalAnimation {
    stages: Vec<Tween>,
    current: usize,
    running: bool,
}

impl ModalAnimation {
    pub fn new(stages: Vec<Tween>) -> Self {
        Self { stages, current: 0, running: false }
    }

    /// Rewinds every stage and starts from the first.
    pub fn start(&mut self) {
        self.stages.iter_mut().for_each(Tween::reset);
        self.current = 0;
        self.running = !self.stages.is_empty();
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances the running stage; leftover time does not carry over.
    pub fn step(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        let Some(stage) = self.stages.get_mut(self.current) else {
            self.running = false;
            return;
        };
        stage.step(dt);
        if stage.is_done() {
            self.current += 1;
            self.running = self.current < self.stages.len();
        }
    }

    /// Current value of stage `index`; `0.0` for an unknown stage.
    pub fn value(&self, index: usize) -> f32 {
        self.stages.get(index).map(Tween::value).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_interpolates_and_clamps() {
        let mut t = Tween::new(0.0, 200.0, 1.0);
        assert_eq!(t.step(0.25), 50.0);
        assert_eq!(t.step(10.0), 200.0);
        assert!(t.is_done());
        t.reset();
        assert_eq!(t.value(), 0.0);
    }

    #[test]
    fn zero_duration_is_immediately_done() {
        let t = Tween::new(3.0, 7.0, 0.0);
        assert!(t.is_done());
        assert_eq!(t.value(), 7.0);
    }

    #[test]
    fn bad_dt_is_ignored() {
        let mut t = Tween::new(0.0, 1.0, 1.0);
        t.step(f32::NAN);
        t.step(-1.0);
        assert_eq!(t.value(), 0.0);
    }

    #[test]
    fn stages_run_in_sequence() {
        let mut a = ModalAnimation::new(vec![Tween::new(10.0, 20.0, 0.5), Tween::new(0.0, 1.0, 0.5)]);
        assert!(!a.is_running());
        a.start();
        a.step(0.5);
        assert_eq!(a.value(0), 20.0);
        assert_eq!(a.value(1), 0.0);
        assert!(a.is_running());
        a.step(0.25);
        assert_eq!(a.value(1), 0.5);
        a.step(0.25);
        assert!(!a.is_running());
        assert_eq!(a.value(7), 0.0);
    }
}
