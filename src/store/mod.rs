//! The ordered collection of annotated images.
//!
//! The collection owns every per-image entry and all the operations a user
//! performs on them: bulk appends, deletion, selection, and in-place
//! nucleus/fiber edits. It is a single-writer structure; callers that share
//! one instance across threads must add their own mutual exclusion.
//!
//! Lookup is path-keyed through an auxiliary path-to-index map that is kept
//! in sync with the entry list on every mutation, so display order and
//! O(1)-ish access coexist.

mod entry;
mod error;
mod event;

pub use entry::ImageEntry;
pub use error::StoreError;
pub use event::StoreEvent;

use std::collections::{HashMap, VecDeque};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::analysis::AnalysisOutput;
use crate::model::{FiberSet, Nucleus};

/// Ordered list of unique image entries plus the current selection.
///
/// Invariants:
/// - no two entries share a resolved path or a file name;
/// - `current_index`, when set, is a valid index; it is cleared when the
///   collection empties;
/// - entry order is insertion order, with deletions shifting later
///   entries down by one.
#[derive(Debug, Default)]
pub struct AnnotationCollection {
    entries: Vec<ImageEntry>,
    by_path: HashMap<PathBuf, usize>,
    by_name: HashMap<OsString, usize>,
    current: Option<usize>,
    events: VecDeque<StoreEvent>,
}

/// Result of a bulk append.
#[derive(Debug, Default)]
pub struct AppendOutcome {
    /// Number of entries actually appended.
    pub appended: usize,
    /// One conflict per rejected entry, in batch order.
    pub conflicts: Vec<StoreError>,
}

impl AppendOutcome {
    /// Whether any entry was rejected.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

impl AnnotationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in display order.
    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    /// Iterate over the entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageEntry> {
        self.entries.iter()
    }

    /// Look up an entry by path.
    pub fn get(&self, path: &Path) -> Option<&ImageEntry> {
        self.index_of(path).map(|index| &self.entries[index])
    }

    /// Whether an entry with this path exists.
    pub fn contains(&self, path: &Path) -> bool {
        self.index_of(path).is_some()
    }

    /// Display index of the entry with this path.
    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.by_path.get(&resolve(path)).copied()
    }

    /// Index of the currently selected entry, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The currently selected entry, if any.
    pub fn current_entry(&self) -> Option<&ImageEntry> {
        self.current.map(|index| &self.entries[index])
    }

    /// Drain the queued change notifications.
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        self.events.drain(..).collect()
    }

    /// Append a batch of entries, preserving batch order.
    ///
    /// Every entry whose resolved path or file name collides with an
    /// existing entry, or with an already-accepted entry of the same batch,
    /// is rejected individually; the rest of the batch is still applied.
    /// The current selection is never touched: selecting a new entry is a
    /// separate, explicit call.
    pub fn append(&mut self, batch: impl IntoIterator<Item = ImageEntry>) -> AppendOutcome {
        let mut outcome = AppendOutcome::default();

        for entry in batch {
            let path = resolve(&entry.path);
            let name = entry.file_name();
            if self.by_path.contains_key(&path) || self.by_name.contains_key(&name) {
                log::warn!("rejecting duplicate image {:?}", entry.path);
                outcome.conflicts.push(StoreError::conflict(&entry.path));
                continue;
            }

            let index = self.entries.len();
            self.by_path.insert(path, index);
            self.by_name.insert(name, index);
            self.events.push_back(StoreEvent::EntryAdded {
                path: entry.path.clone(),
            });
            self.entries.push(entry);
            outcome.appended += 1;
        }

        outcome
    }

    /// Remove the entry with this path and return it.
    ///
    /// When the removed entry was selected, the selection moves to the
    /// entry that took its index, or to the previous entry if it was last;
    /// removing the only entry clears the selection.
    pub fn remove(&mut self, path: &Path) -> Result<ImageEntry, StoreError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| StoreError::not_found(path))?;

        let removed = self.entries.remove(index);
        self.by_path.remove(&resolve(&removed.path));
        self.by_name.remove(&removed.file_name());
        for slot in self.by_path.values_mut().chain(self.by_name.values_mut()) {
            if *slot > index {
                *slot -= 1;
            }
        }

        let retargeted = match self.current {
            Some(_) if self.entries.is_empty() => None,
            Some(current) if index < current => Some(current - 1),
            Some(current) if index == current => Some(current.min(self.entries.len() - 1)),
            other => other,
        };
        if retargeted != self.current {
            self.current = retargeted;
            self.events.push_back(StoreEvent::SelectionChanged { index: retargeted });
        }

        self.events.push_back(StoreEvent::EntryRemoved {
            path: removed.path.clone(),
        });
        Ok(removed)
    }

    /// Select the entry with this path without mutating any data.
    pub fn select(&mut self, path: &Path) -> Result<usize, StoreError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| StoreError::not_found(path))?;
        if self.current != Some(index) {
            self.current = Some(index);
            self.events
                .push_back(StoreEvent::SelectionChanged { index: Some(index) });
        }
        Ok(index)
    }

    /// Apply an in-place edit to one entry's nuclei.
    pub fn mutate_nuclei(
        &mut self,
        path: &Path,
        edit: impl FnOnce(&mut Vec<Nucleus>),
    ) -> Result<(), StoreError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| StoreError::not_found(path))?;
        edit(&mut self.entries[index].nuclei);
        self.events.push_back(StoreEvent::EntryChanged {
            path: self.entries[index].path.clone(),
        });
        Ok(())
    }

    /// Apply an in-place edit to one entry's fiber data.
    pub fn mutate_fibers(
        &mut self,
        path: &Path,
        edit: impl FnOnce(&mut FiberSet),
    ) -> Result<(), StoreError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| StoreError::not_found(path))?;
        edit(&mut self.entries[index].fibers);
        self.events.push_back(StoreEvent::EntryChanged {
            path: self.entries[index].path.clone(),
        });
        Ok(())
    }

    /// Add a nucleus marker to the entry with this path.
    pub fn add_nucleus(&mut self, path: &Path, nucleus: Nucleus) -> Result<(), StoreError> {
        self.mutate_nuclei(path, |nuclei| nuclei.push(nucleus))
    }

    /// Remove the first nucleus at this marker's position.
    ///
    /// Returns whether a nucleus was removed. Markers have positional
    /// identity, so matching ignores polarity.
    pub fn remove_nucleus(&mut self, path: &Path, nucleus: &Nucleus) -> Result<bool, StoreError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| StoreError::not_found(path))?;
        let nuclei = &mut self.entries[index].nuclei;
        let Some(pos) = nuclei
            .iter()
            .position(|n| n.x == nucleus.x && n.y == nucleus.y)
        else {
            return Ok(false);
        };
        nuclei.remove(pos);
        self.events.push_back(StoreEvent::EntryChanged {
            path: self.entries[index].path.clone(),
        });
        Ok(true)
    }

    /// Toggle the polarity of the first nucleus at this marker's position.
    ///
    /// Returns whether a nucleus was toggled.
    pub fn toggle_nucleus(&mut self, path: &Path, nucleus: &Nucleus) -> Result<bool, StoreError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| StoreError::not_found(path))?;
        let Some(n) = self.entries[index]
            .nuclei
            .iter_mut()
            .find(|n| n.x == nucleus.x && n.y == nucleus.y)
        else {
            return Ok(false);
        };
        n.toggle();
        self.events.push_back(StoreEvent::EntryChanged {
            path: self.entries[index].path.clone(),
        });
        Ok(true)
    }

    /// Replace one entry's annotation data with a fresh analysis result.
    pub fn apply_analysis(
        &mut self,
        path: &Path,
        output: AnalysisOutput,
    ) -> Result<(), StoreError> {
        let index = self
            .index_of(path)
            .ok_or_else(|| StoreError::not_found(path))?;
        self.entries[index].apply_analysis(output);
        self.events.push_back(StoreEvent::EntryChanged {
            path: self.entries[index].path.clone(),
        });
        Ok(())
    }

    /// Point an entry at a new location of the same file.
    ///
    /// Used after an original image is copied into a project folder. The
    /// file name must not change; annotation data and ordering are
    /// untouched.
    pub fn rebase_path(&mut self, from: &Path, to: PathBuf) -> Result<(), StoreError> {
        let index = self
            .index_of(from)
            .ok_or_else(|| StoreError::not_found(from))?;
        self.by_path.remove(&resolve(&self.entries[index].path));
        self.by_path.insert(resolve(&to), index);
        self.entries[index].path = to;
        Ok(())
    }

    /// Empty the collection and clear the selection. Idempotent.
    pub fn reset(&mut self) {
        if self.entries.is_empty() && self.current.is_none() {
            return;
        }
        self.entries.clear();
        self.by_path.clear();
        self.by_name.clear();
        self.current = None;
        self.events.push_back(StoreEvent::Reset);
    }
}

/// Lexically resolve a path: strip `.` components and fold `..` into their
/// parent where possible. Uniqueness checks run on the resolved form so the
/// same file spelled two ways still collides.
fn resolve(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    resolved.push(component.as_os_str());
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}
