pub mod collection;
pub mod config;
pub mod drag;
pub mod error;
pub mod export;
pub mod fields;
pub mod id;
pub mod list;
pub mod model;
pub mod registry;
pub mod schema;
pub mod widget;

pub use collection::FieldCollection;
pub use config::{DesignerConfig, SchemaLimits};
pub use drag::{DragSource, DropTarget, Half};
pub use error::FormError;
pub use export::FieldRecord;
pub use id::{FieldId, FieldKind};
pub use model::*;
pub use registry::{FieldRegistry, FieldType, PaletteEntry};
pub use schema::PropertyDiagnostic;
pub use widget::{PreviewState, RenderContext, Widget};
