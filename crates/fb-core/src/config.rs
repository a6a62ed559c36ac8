//! Designer configuration.

// ─── Config ───────────────────────────────────────────────────────────────

/// Bounds enforced by the properties schema checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaLimits {
    /// Minimum label length in characters. Default: **2**.
    pub label_min: usize,
    /// Maximum label length in characters. Default: **50**.
    pub label_max: usize,
    /// Maximum helper-text length. Default: **200**.
    pub helper_text_max: usize,
    /// Maximum placeholder length. Default: **50**.
    pub placeholder_max: usize,
}

impl Default for SchemaLimits {
    fn default() -> Self {
        Self {
            label_min: 2,
            label_max: 50,
            helper_text_max: 200,
            placeholder_max: 50,
        }
    }
}

/// Configuration for a designer session.
#[derive(Debug, Clone)]
pub struct DesignerConfig {
    /// Prefix for generated field ids (`field_0`, `field_1`, …). Default: **"field"**.
    pub id_prefix: String,

    /// Schema bounds applied when committing properties.
    pub limits: SchemaLimits,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            id_prefix: "field".to_string(),
            limits: SchemaLimits::default(),
        }
    }
}
