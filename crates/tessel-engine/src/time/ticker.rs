/// Periodic trigger driven by externally supplied frame deltas.
///
/// Accumulates time while running and invokes `on_tick` once for every full
/// `timeout_ms` elapsed. The remainder carries over to the next period.
pub struct Ticker {
    on_tick: Box<dyn FnMut()>,
    accumulated: u32,
    timeout: u32,
    stopped: bool,
}

impl Ticker {
    /// Creates a running ticker.
    pub fn new(timeout_ms: u32, on_tick: impl FnMut() + 'static) -> Self {
        debug_assert!(timeout_ms > 0, "Ticker::new: zero timeout");
        Self {
            on_tick: Box::new(on_tick),
            accumulated: 0,
            timeout: timeout_ms,
            stopped: timeout_ms == 0,
        }
    }

    /// Creates a stopped ticker with no timeout; call `set_timeout` then `start`.
    pub fn stopped(on_tick: impl FnMut() + 'static) -> Self {
        Self {
            on_tick: Box::new(on_tick),
            accumulated: 0,
            timeout: 0,
            stopped: true,
        }
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[inline]
    pub fn timeout(&self) -> u32 {
        self.timeout
    }

    /// Sets the period and discards accumulated time.
    pub fn set_timeout(&mut self, timeout_ms: u32) {
        self.timeout = timeout_ms;
        self.accumulated = 0;
    }

    /// Resumes accumulating time. Ignored while no timeout is set.
    pub fn start(&mut self) {
        debug_assert!(self.timeout > 0, "Ticker::start: no timeout set");
        if self.timeout == 0 {
            log::warn!("Ticker::start ignored: no timeout set");
            return;
        }
        self.stopped = false;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Accumulates `dt_ms`; returns how many times `on_tick` fired.
    pub fn update(&mut self, dt_ms: u32) -> u32 {
        if self.stopped {
            return 0;
        }

        self.accumulated = self.accumulated.saturating_add(dt_ms);
        let mut fired = 0;
        while !self.stopped && self.accumulated >= self.timeout {
            self.accumulated -= self.timeout;
            (self.on_tick)();
            fired += 1;
        }
        fired
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("accumulated", &self.accumulated)
            .field("timeout", &self.timeout)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn counting(timeout: u32) -> (Ticker, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (Ticker::new(timeout, move || c.set(c.get() + 1)), count)
    }

    #[test]
    fn fires_once_per_period() {
        let (mut t, count) = counting(100);
        assert_eq!(t.update(60), 0);
        assert_eq!(t.update(60), 1);
        assert_eq!(count.get(), 1);
        // 20ms carried over from the previous period.
        assert_eq!(t.update(80), 1);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn long_frame_fires_multiple_times() {
        let (mut t, count) = counting(10);
        assert_eq!(t.update(35), 3);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn stopped_ticker_does_not_accumulate() {
        let (mut t, count) = counting(10);
        t.stop();
        assert!(t.is_stopped());
        t.update(100);
        t.start();
        t.update(5);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn set_timeout_discards_progress() {
        let (mut t, count) = counting(10);
        t.update(9);
        t.set_timeout(20);
        t.update(11);
        assert_eq!(count.get(), 0);
        t.update(9);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn stopped_constructor_waits_for_start() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut t = Ticker::stopped(move || c.set(c.get() + 1));
        t.update(1000);
        t.set_timeout(50);
        t.start();
        t.update(50);
        assert_eq!(count.get(), 1);
    }
}
