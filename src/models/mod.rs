pub mod area;
pub mod injury;
pub mod profile;
pub mod progress;
pub mod role;
pub mod routine;

pub use area::BodyArea;
pub use injury::{InjuryRecord, InjuryStatus, NewInjury};
pub use profile::UserProfile;
pub use progress::ProgressEntry;
pub use role::Role;
pub use routine::{Exercise, Routine};

use crate::backend::{BackendError, Document, Fields};

/// Typed view over a stored document
pub trait FromDocument: Sized {
    fn from_document(doc: &Document) -> Result<Self, BackendError>;
}

/// Field map written back to the store
pub trait ToFields {
    fn to_fields(&self) -> Fields;
}
