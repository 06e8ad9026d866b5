use thiserror::Error;

use crate::store::Op;

#[derive(Debug, Error)]
pub enum MemoryError {
    /// A fault queued with `MemoryStore::fail_next`
    #[error("Injected fault on {0:?}")]
    InjectedFault(Op),

    /// No record with this id in the collection
    #[error("Object not found: {class}/{id}")]
    ObjectNotFound { class: String, id: String },

    /// OR composition over queries on different collections
    #[error("All queries must be for the same class: expected {expected}, found {found}")]
    ClassMismatch { expected: String, found: String },

    /// OR composition without operands
    #[error("Cannot OR an empty list of queries")]
    EmptyOr,

    /// Projection without keys
    #[error("Select requires at least one key")]
    EmptySelect,

    /// A saved attribute points at a record that has no id yet
    #[error("Cannot store a pointer to an unsaved {0} object")]
    UnsavedPointer(String),

    /// `fetch` on a record that was never saved
    #[error("Cannot fetch an unsaved {0} object")]
    Unsaved(String),
}
