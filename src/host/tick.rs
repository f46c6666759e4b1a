/// Whether the grid is inside its render tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameContext {
    #[default]
    OutsideAnimationFrame,
    InsideAnimationFrame,
}

impl FrameContext {
    pub fn is_inside(self) -> bool {
        self == Self::InsideAnimationFrame
    }
}

/// Single-step queue of keyed tasks run after the current tick.
///
/// Scheduling a task under a key that is already queued replaces the queued
/// task; the replacement keeps the original queue position.
#[derive(Debug)]
pub struct TickQueue<K, T> {
    tasks: Vec<(K, T)>,
}

impl<K, T> Default for TickQueue<K, T> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<K: PartialEq, T> TickQueue<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` under `key`. Returns `true` if it superseded a queued task.
    pub fn schedule(&mut self, key: K, task: T) -> bool {
        match self.tasks.iter_mut().find(|(queued, _)| *queued == key) {
            Some(slot) => {
                slot.1 = task;
                true
            }
            None => {
                self.tasks.push((key, task));
                false
            }
        }
    }

    pub fn cancel(&mut self, key: &K) -> Option<T> {
        let position = self.tasks.iter().position(|(queued, _)| queued == key)?;
        Some(self.tasks.remove(position).1)
    }

    /// Remove and return every queued task in queue order.
    pub fn take(&mut self) -> Vec<(K, T)> {
        std::mem::take(&mut self.tasks)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}
