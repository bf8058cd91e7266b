/// A LimitTracker enforces a particular limit within the lexer or the parser.
///
/// Tracks the observed high-water mark so callers can tune limits from real
/// document measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitTracker {
    current: usize,
    /// Must not exceed this limit.
    limit: usize,
    /// Records the highest value reached so far.
    high: usize,
}

impl LimitTracker {
    pub fn new(limit: usize) -> Self {
        Self {
            current: 0,
            limit,
            high: 0,
        }
    }

    /// Record a consumed unit and report whether the limit has been passed.
    pub fn check_and_increment(&mut self) -> bool {
        self.current += 1;
        if self.current > self.high {
            self.high = self.current;
        }
        self.current > self.limit
    }

    pub fn decrement(&mut self) {
        self.current -= 1;
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Highest value reached while this tracker was live.
    pub fn high(&self) -> usize {
        self.high
    }
}

#[cfg(test)]
mod test {
    use super::LimitTracker;

    #[test]
    fn tracks_high_water_mark() {
        let mut tracker = LimitTracker::new(3);
        assert!(!tracker.check_and_increment());
        assert!(!tracker.check_and_increment());
        tracker.decrement();
        assert!(!tracker.check_and_increment());
        assert_eq!(tracker.high(), 2);
        assert!(!tracker.check_and_increment());
        assert!(tracker.check_and_increment());
        assert_eq!(tracker.high(), 4);
    }
}
