//! Designer / preview mode.

use fb_core::widget::RenderContext;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Designer,
    Preview,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Designer => Mode::Preview,
            Mode::Preview => Mode::Designer,
        }
    }

    /// Render context used for the canvas in this mode.
    pub fn render_context(self) -> RenderContext {
        match self {
            Mode::Designer => RenderContext::Designer,
            Mode::Preview => RenderContext::Preview,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Designer => "designer",
            Mode::Preview => "preview",
        }
    }
}
