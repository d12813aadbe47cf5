use tracing::warn;

pub const PROGRESS_MAX: u32 = 100;

/// Bounded progress counter shared by the loaders.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProgressCounter {
    value: u32,
    step: u32,
}

impl ProgressCounter {
    /// A zero step would never finish; it is raised to 1.
    pub fn new(step: u32) -> Self {
        if step == 0 {
            warn!("progress step of 0 raised to 1");
        }
        Self {
            value: 0,
            step: step.clamp(1, PROGRESS_MAX),
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_full(&self) -> bool {
        self.value >= PROGRESS_MAX
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    pub fn fill(&mut self) {
        self.value = PROGRESS_MAX;
    }

    /// Adds one step, clamped at 100. Returns `true` only on the call that
    /// reaches 100.
    pub fn advance(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.value = (self.value + self.step).min(PROGRESS_MAX);
        self.is_full()
    }
}

/// Index into a fixed-size message list, wrapping at the end.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MessageCycle {
    index: usize,
    len: usize,
}

impl MessageCycle {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// An empty list keeps the index at 0.
    pub fn advance(&mut self) {
        if self.len == 0 {
            return;
        }
        self.index = (self.index + 1) % self.len;
    }
}
