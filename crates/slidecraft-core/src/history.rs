//! Bounded undo/redo stacks of document snapshots.

/// Undo history over snapshots of type `T`.
///
/// A gesture (drag, resize, rotate) stages one snapshot at pointer-down with
/// [`History::begin`] and pushes it only if the gesture actually changes
/// something, so a whole gesture undoes in one step.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo_stack: Vec<T>,
    redo_stack: Vec<T>,
    pending: Option<T>,
    depth: usize,
}

impl<T> History<T> {
    /// Create a history keeping at most `depth` undo states.
    pub fn new(depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: None,
            depth,
        }
    }

    /// Push the state as it was before a change. Clears redo.
    pub fn record(&mut self, before: T) {
        self.pending = None;
        self.undo_stack.push(before);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.depth {
            let excess = self.undo_stack.len() - self.depth;
            self.undo_stack.drain(..excess);
        }
    }

    /// Stage a snapshot for a gesture that may or may not change anything.
    pub fn begin(&mut self, before: T) {
        self.pending = Some(before);
    }

    /// Push the staged snapshot, if any. Returns true if one was pushed.
    pub fn commit_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(before) => {
                self.record(before);
                true
            }
            None => false,
        }
    }

    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    /// Step back. `current` goes onto the redo stack.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward. `current` goes onto the undo stack.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
    }

    /// Rewrite every stored snapshot in place.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        self.undo_stack
            .iter_mut()
            .chain(self.redo_stack.iter_mut())
            .chain(self.pending.iter_mut())
            .for_each(&mut f);
    }
}
