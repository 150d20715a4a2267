use super::Ease;

/// Result of advancing a [`Transition`] by one tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Step {
    /// Still running; the eased value to write back this tick.
    Running(f32),
    /// Finished; the literal target value. The owner retires the slot.
    Finished(f32),
}

impl Step {
    #[inline]
    pub fn value(self) -> f32 {
        match self {
            Step::Running(v) | Step::Finished(v) => v,
        }
    }

    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, Step::Finished(_))
    }
}

/// Tween of one scalar from `start` to `target` over `duration_ms`.
///
/// A transition has no clock; every [`update`](Self::update) is handed the
/// frame delta. Once elapsed time reaches the duration it reports the exact
/// target, never an eased approximation of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    start: f32,
    target: f32,
    duration_ms: u32,
    elapsed_ms: u32,
    ease: Ease,
}

impl Transition {
    pub fn new(start: f32, target: f32, duration_ms: u32, ease: Ease) -> Self {
        Self {
            start,
            target,
            duration_ms,
            elapsed_ms: 0,
            ease,
        }
    }

    #[inline]
    pub fn start(&self) -> f32 {
        self.start
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    #[inline]
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    #[inline]
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Advances by `dt_ms` and returns the value to write back.
    ///
    /// A zero duration finishes on the first call.
    pub fn update(&mut self, dt_ms: u32) -> Step {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        if self.elapsed_ms >= self.duration_ms {
            return Step::Finished(self.target);
        }

        let t = self.elapsed_ms as f32 / self.duration_ms as f32;
        Step::Running(self.start + (self.target - self.start) * self.ease.apply(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_progress_is_proportional() {
        let mut t = Transition::new(0.0, 10.0, 100, Ease::Linear);
        assert_eq!(t.update(25), Step::Running(2.5));
        assert_eq!(t.update(25), Step::Running(5.0));
        assert_eq!(t.elapsed_ms(), 50);
    }

    #[test]
    fn converges_to_literal_target_for_every_curve() {
        for ease in Ease::ALL {
            let mut t = Transition::new(0.0, 10.0, 100, ease);
            let mut last = t.update(33);
            while !last.is_finished() {
                last = t.update(33);
            }
            assert_eq!(last, Step::Finished(10.0), "{ease:?}");
        }
    }

    #[test]
    fn overshooting_tick_still_lands_on_target() {
        let mut t = Transition::new(3.0, -7.0, 100, Ease::OutCubic);
        assert_eq!(t.update(500), Step::Finished(-7.0));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut t = Transition::new(1.0, 2.0, 0, Ease::InOutQuad);
        assert_eq!(t.update(0), Step::Finished(2.0));
    }

    #[test]
    fn eased_value_uses_curve() {
        let mut t = Transition::new(0.0, 100.0, 100, Ease::InQuad);
        assert_eq!(t.update(50).value(), 25.0);
    }
}
