use crate::service::ValueKind;

/// Reasons an attribute refuses a source value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueRejected {
    /// The source value's type cannot be stored in the attribute's kind
    #[error("attribute '{attribute}' stores {expected} values, got {found}")]
    TypeMismatch {
        /// Attribute name
        attribute: String,
        /// Kind the attribute stores
        expected: ValueKind,
        /// Type name of the offending source value
        found: &'static str,
    },

    /// The source value is null
    #[error("attribute '{attribute}' received a null value")]
    Null {
        /// Attribute name
        attribute: String,
    },
}
