use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for field ids and type tags for fast comparisons and low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for a field instance.
/// Internally a `Spur` index: 4 bytes, Copy, O(1) Eq and Hash.
///
/// Stable for the lifetime of the instance; it is also the correlation
/// token carried by drag sessions.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(Spur);

impl FieldId {
    /// Intern a string as a FieldId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        FieldId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to the interned string, which lives as long as the process.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a process-unique id with a prefix (e.g. `field_1`, `field_2`).
    pub fn generate(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            // Skip names a loaded form already uses.
            if INTERNER.get(&candidate).is_none() {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FieldId::intern(&s))
    }
}

/// Field-type tag (`text`, `dropdown`, `table`, …) selecting a registry entry.
///
/// Open-ended: a new field type registers a new tag and the engine never
/// matches on concrete tags.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldKind(Spur);

impl FieldKind {
    pub fn intern(s: &str) -> Self {
        FieldKind(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldKind({})", self.as_str())
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FieldKind::intern(&s))
    }
}
