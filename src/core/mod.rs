pub mod overlay;
pub mod rename;
pub mod selection;
pub mod session;

pub use overlay::{EditOverlay, FieldEdit, ItemField};
pub use selection::SelectionTracker;
pub use session::ReceptionSession;
