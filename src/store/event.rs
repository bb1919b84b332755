//! Change notifications emitted by the annotation collection.

use std::path::PathBuf;

/// A state change in the collection.
///
/// Events describe what changed, never how to draw it: any view is a pure
/// projection of collection state and can rebuild itself from these plus
/// the collection's accessors. The collection queues events; callers drain
/// them with [`super::AnnotationCollection::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// An entry was appended.
    EntryAdded {
        /// Path of the new entry.
        path: PathBuf,
    },
    /// An entry was removed.
    EntryRemoved {
        /// Path of the removed entry.
        path: PathBuf,
    },
    /// An entry's nuclei or fibers changed.
    EntryChanged {
        /// Path of the mutated entry.
        path: PathBuf,
    },
    /// The current selection moved.
    SelectionChanged {
        /// New selection, `None` when nothing is selected.
        index: Option<usize>,
    },
    /// The whole collection was emptied.
    Reset,
}
