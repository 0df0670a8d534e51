//! Consecutive non-productive cycle counter.

/// How a cycle affects the stuck counter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StuckDelta {
    /// Non-productive cycle (turning in place, obstacle contact)
    Increment,
    /// Productive cycle (cruising, wall-following arc)
    Reset,
}

/// Counts consecutive non-productive cycles up to a ceiling.
///
/// The count saturates at the ceiling; reaching it is terminal for the run.
#[derive(Clone, Debug)]
pub struct StuckDetector {
    count: u32,
    ceiling: u32,
}

impl StuckDetector {
    pub fn new(ceiling: u32) -> Self {
        Self { count: 0, ceiling }
    }

    /// Apply one cycle's outcome
    pub fn apply(&mut self, delta: StuckDelta) {
        match delta {
            StuckDelta::Increment => self.count = (self.count + 1).min(self.ceiling),
            StuckDelta::Reset => self.count = 0,
        }
    }

    /// True once the counter has reached the ceiling
    pub fn is_stuck(&self) -> bool {
        self.count >= self.ceiling
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }
}
