pub mod designer;
pub mod drop;
pub mod input;
pub mod mode;
pub mod preview;
pub mod properties;
pub mod session;
pub mod shortcuts;

pub use designer::{Designer, DropOutcome, Panel};
pub use drop::{DropAction, apply_drop, resolve_drop};
pub use input::DragEvent;
pub use mode::Mode;
pub use preview::PreviewForm;
pub use properties::{CommitOutcome, EditState, PropertiesEditor, ScratchBuffer};
pub use session::DragSession;
pub use shortcuts::{ShortcutAction, ShortcutMap};
