//! Input queue - collects pointer samples between frames

use super::InputSample;

/// Ordered buffer of pointer samples drained once per frame tick.
///
/// Samples closer than `min_distance` to the last accepted one are dropped.
#[derive(Debug, Clone)]
pub struct InputQueue {
    min_distance: f32,
    pending: Vec<InputSample>,
    last: Option<InputSample>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl InputQueue {
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance: min_distance.max(0.0),
            pending: Vec::with_capacity(32),
            last: None,
        }
    }

    /// Queue a sample; returns false if it was filtered out
    pub fn push(&mut self, sample: InputSample) -> bool {
        if let Some(last) = self.last {
            if last.distance_to(&sample) < self.min_distance {
                return false;
            }
        }
        self.last = Some(sample);
        self.pending.push(sample);
        true
    }

    /// Take every queued sample in arrival order
    pub fn drain(&mut self) -> Vec<InputSample> {
        std::mem::take(&mut self.pending)
    }

    /// Forget pending samples and the distance anchor (call on stroke end)
    pub fn reset(&mut self) {
        self.pending.clear();
        self.last = None;
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
