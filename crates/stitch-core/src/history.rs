//! Undo/redo using serialized document snapshots.
//!
//! Each snapshot is the full document as JSON, recorded *after* an edit.
//! The newest past entry therefore stands for the live document, and undo
//! moves it to the redo stack and restores the entry below it. Seed the
//! history with the freshly loaded document so the first edit can be
//! undone.
//!
//! Continuous edits (slider drags, nudges) go through
//! [`History::schedule_push`] and are coalesced into one snapshot once the
//! input has been quiet for the debounce interval. Discrete actions call
//! [`History::push_state`] directly. Undo and redo borrow the store
//! mutably, so a push can never interleave with a restore.

use crate::document::{Document, DocumentResult};
use crate::store::DocumentStore;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Maximum number of undo states to keep.
pub const MAX_HISTORY: usize = 50;

/// Quiet period before a scheduled snapshot is taken.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Linear undo/redo history.
#[derive(Debug, Clone)]
pub struct History {
    past: Vec<String>,
    future: Vec<String>,
    max_history: usize,
    debounce: Duration,
    /// When the scheduled snapshot becomes due.
    pending: Option<Instant>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY, DEFAULT_DEBOUNCE)
    }
}

impl History {
    pub fn new(max_history: usize, debounce: Duration) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_history: max_history.max(1),
            debounce,
            pending: None,
        }
    }

    /// Record the current document.
    ///
    /// Skipped when identical to the newest snapshot. Otherwise the redo
    /// stack is discarded. Returns whether a snapshot was added.
    pub fn push_state(&mut self, document: &Document) -> DocumentResult<bool> {
        self.pending = None;
        let snapshot = document.to_json()?;
        if self.past.last() == Some(&snapshot) {
            return Ok(false);
        }

        self.past.push(snapshot);
        self.future.clear();
        while self.past.len() > self.max_history {
            self.past.remove(0);
        }
        log::debug!("History push ({} past)", self.past.len());
        Ok(true)
    }

    /// Ask for a snapshot once input has been quiet. Each call restarts the
    /// quiet period.
    pub fn schedule_push(&mut self, now: Instant) {
        self.pending = Some(now + self.debounce);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the scheduled snapshot if its quiet period has elapsed.
    pub fn flush_due(&mut self, document: &Document, now: Instant) -> DocumentResult<bool> {
        match self.pending {
            Some(due) if now >= due => self.push_state(document),
            _ => Ok(false),
        }
    }

    /// Take the scheduled snapshot immediately, if any.
    pub fn flush(&mut self, document: &Document) -> DocumentResult<bool> {
        if self.pending.is_some() {
            self.push_state(document)
        } else {
            Ok(false)
        }
    }

    /// Step back one state. Returns whether the document changed.
    ///
    /// Edits made since the newest snapshot are recorded first so redo can
    /// return to them.
    pub fn undo(&mut self, store: &mut DocumentStore) -> DocumentResult<bool> {
        let had_pending = self.pending.take().is_some();
        let current = store.document().to_json()?;
        if self.past.last() != Some(&current) {
            if self.past.is_empty() {
                return Ok(false);
            }
            if !had_pending {
                log::debug!("Recording unsnapshotted edits before undo");
            }
            self.past.push(current);
            self.future.clear();
        }
        if self.past.len() < 2 {
            return Ok(false);
        }

        let target = &self.past[self.past.len() - 2];
        let document = Document::from_json(target)?;
        if let Some(latest) = self.past.pop() {
            self.future.push(latest);
        }
        store.restore(document);
        log::debug!("Undo ({} past, {} future)", self.past.len(), self.future.len());
        Ok(true)
    }

    /// Step forward one state. Returns whether the document changed.
    ///
    /// Edits made since the newest snapshot start a new branch: they are
    /// recorded and the redo stack is dropped.
    pub fn redo(&mut self, store: &mut DocumentStore) -> DocumentResult<bool> {
        self.pending = None;
        if self.future.is_empty() {
            return Ok(false);
        }
        let current = store.document().to_json()?;
        if self.past.last() != Some(&current) {
            self.push_state(store.document())?;
            return Ok(false);
        }
        let Some(target) = self.future.last() else {
            return Ok(false);
        };
        let document = Document::from_json(target)?;
        if let Some(target) = self.future.pop() {
            self.past.push(target);
        }
        while self.past.len() > self.max_history {
            self.past.remove(0);
        }
        store.restore(document);
        log::debug!("Redo ({} past, {} future)", self.past.len(), self.future.len());
        Ok(true)
    }

    /// Whether [`History::undo`] has an earlier state to go back to.
    pub fn can_undo(&self) -> bool {
        self.past.len() > 1 || (self.pending.is_some() && !self.past.is_empty())
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    /// Drop all history, e.g. when another document is loaded.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.pending = None;
    }
}
