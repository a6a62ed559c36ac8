pub mod hit;
pub mod html;

pub use hit::{ColumnLayout, FieldRegion, hit_test, layout_column};
pub use html::{Html, render_html};
