//! Structured error types for gridview.
//!
//! Every error here is a programming or invariant error: a broken contract
//! between the layout engine and its collaborators. Callers are expected to
//! abort the current operation, not retry it. Soft no-ops (setting a value to
//! its current value, moving an item onto itself) are reported through plain
//! `bool` returns instead.

/// All errors that can occur in the layout engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Internal consistency violation.
    #[error("Assertion failed [{code}]: {context}")]
    Assert {
        /// Short machine-readable code identifying the failed check.
        code: &'static str,
        /// Human readable context.
        context: String,
    },

    /// Index outside the bounds of the sequence it addresses.
    #[error("Index {index} out of range [{code}] (length {len})")]
    IndexOutOfRange {
        /// Short machine-readable code identifying the call site.
        code: &'static str,
        /// Offending index.
        index: usize,
        /// Length of the addressed sequence.
        len: usize,
    },

    /// Field name not present in the current schema.
    #[error("Field not found [{code}]: {name}")]
    FieldNotFound {
        /// Short machine-readable code identifying the call site.
        code: &'static str,
        /// Name that was looked up.
        name: String,
    },

    /// Two schema fields claim the same field index.
    #[error("Duplicate field index {index} in schema")]
    DuplicateFieldIndex {
        /// Field index claimed twice.
        index: usize,
    },

    /// A schema field claims an index beyond the field count.
    #[error("Field index {index} exceeds field count {count}")]
    FieldIndexOutOfRange {
        /// Claimed field index.
        index: usize,
        /// Number of fields in the schema.
        count: usize,
    },

    /// `end_schema_change` without a matching `begin_schema_change`.
    #[error("Unbalanced schema change nesting")]
    UnbalancedSchemaChange,

    /// A cell pool was requested while it was being rebuilt.
    #[error("Cell pool requested while it is being computed")]
    RecursivePoolComputation,

    /// Settings patch could not be deserialized.
    #[error("Settings JSON: {0}")]
    SettingsJson(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    /// Create an assertion error.
    pub fn assert(code: &'static str, context: impl Into<String>) -> Self {
        Self::Assert {
            code,
            context: context.into(),
        }
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Assert { code, .. }
            | Self::IndexOutOfRange { code, .. }
            | Self::FieldNotFound { code, .. } => code,
            Self::DuplicateFieldIndex { .. } => "CMCCDFI",
            Self::FieldIndexOutOfRange { .. } => "CMCCFIR",
            Self::UnbalancedSchemaChange => "CMESCU",
            Self::RecursivePoolComputation => "VLCPRC",
            Self::SettingsJson(_) => "GSPJ",
        }
    }
}

/// Check that `index < len`, otherwise produce an [`GridError::IndexOutOfRange`].
pub(crate) fn check_index(code: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(GridError::IndexOutOfRange { code, index, len })
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
