/// Position within a fixed, non-empty, linear sequence of steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCursor {
    index: usize,
    len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    /// Already on the last step; the caller decides what finishing means
    Finished,
}

impl StepCursor {
    /// Returns `None` for an empty sequence.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { index: 0, len })
    }

    /// Cursor at `index`, clamped to the last step.
    pub fn at(len: usize, index: usize) -> Option<Self> {
        Self::new(len).map(|c| Self {
            index: index.min(c.len - 1),
            ..c
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }

    pub fn advance(&mut self) -> Advance {
        if self.is_last() {
            return Advance::Finished;
        }
        self.index += 1;
        Advance::Moved(self.index)
    }

    /// Step back, staying put at the first step.
    pub fn retreat(&mut self) -> usize {
        self.index = self.index.saturating_sub(1);
        self.index
    }

    pub fn rewind(&mut self) {
        self.index = 0;
    }
}
