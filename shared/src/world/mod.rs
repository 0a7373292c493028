pub mod change_tracker;
pub mod object;
pub mod store;

pub use change_tracker::{ChangeKind, ChangeRecord, ChangeTracker};
pub use object::{FieldSet, FieldValue, ObjectId, SceneObject, TypeTag};
pub use store::SceneStore;
