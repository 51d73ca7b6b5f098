//! History module - bounded linear undo stack of (layer, mask) snapshots
//!
//! Entries are swapped in and out rather than copied: undo exchanges the
//! live layer and mask with the stored pair, which leaves the entry holding
//! exactly what redo has to put back.

use std::collections::VecDeque;

use crate::raster::Surface;

/// Default byte budget across all entries (150 MiB)
pub const DEFAULT_BUDGET_BYTES: usize = 150 * 1024 * 1024;
/// Default maximum entry count
pub const DEFAULT_MAX_ENTRIES: usize = 20;

/// One atomic snapshot of a layer and the mask
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub layer_id: u32,
    pub layer: Surface,
    pub mask: Surface,
}

impl HistoryEntry {
    pub fn new(layer_id: u32, layer: Surface, mask: Surface) -> Self {
        Self {
            layer_id,
            layer,
            mask,
        }
    }

    pub fn byte_len(&self) -> usize {
        self.layer.byte_len() + self.mask.byte_len()
    }
}

#[derive(Debug)]
pub struct HistoryManager {
    entries: VecDeque<HistoryEntry>,
    /// Entries before the cursor can be undone, entries at or after it redone
    cursor: usize,
    total_bytes: usize,
    budget_bytes: usize,
    max_entries: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET_BYTES, DEFAULT_MAX_ENTRIES)
    }
}

impl HistoryManager {
    pub fn new(budget_bytes: usize, max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            total_bytes: 0,
            budget_bytes,
            max_entries: max_entries.max(1),
        }
    }

    /// Push a snapshot taken before an edit.
    ///
    /// Drops any redo entries, then evicts the oldest entries while over the
    /// byte budget or entry cap.
    pub fn commit(&mut self, entry: HistoryEntry) {
        while self.entries.len() > self.cursor {
            if let Some(dropped) = self.entries.pop_back() {
                self.total_bytes -= dropped.byte_len();
            }
        }

        self.total_bytes += entry.byte_len();
        self.entries.push_back(entry);
        self.cursor = self.entries.len();

        let mut evicted = 0;
        while self.total_bytes > self.budget_bytes || self.entries.len() > self.max_entries {
            let Some(old) = self.entries.pop_front() else {
                break;
            };
            self.total_bytes -= old.byte_len();
            self.cursor = self.cursor.saturating_sub(1);
            evicted += 1;
        }

        tracing::debug!(
            "History commit: {} entries, {} bytes, {} evicted",
            self.entries.len(),
            self.total_bytes,
            evicted
        );
    }

    /// Step back. The caller swaps its live layer and mask with the returned
    /// entry. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&mut HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get_mut(self.cursor)
    }

    /// Step forward; same swap contract as [`undo`](Self::undo)
    pub fn redo(&mut self) -> Option<&mut HistoryEntry> {
        if self.cursor >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get_mut(self.cursor - 1)
    }

    /// Drop every entry whose snapshot belongs to `layer_id`
    pub fn forget_layer(&mut self, layer_id: u32) {
        let mut kept = VecDeque::with_capacity(self.entries.len());
        let mut cursor = 0;
        for (i, entry) in self.entries.drain(..).enumerate() {
            if entry.layer_id == layer_id {
                self.total_bytes -= entry.byte_len();
                continue;
            }
            if i < self.cursor {
                cursor += 1;
            }
            kept.push_back(entry);
        }
        self.entries = kept;
        self.cursor = cursor;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.total_bytes = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn budget_bytes(&self) -> usize {
        self.budget_bytes
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}
