//! Report error types.

use budgetline_shared::types::ReportNodeId;
use budgetline_shared::AppError;
use thiserror::Error;

/// Errors that can occur while building or evaluating a report tree.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Report node not found.
    #[error("Report node not found: {0}")]
    NodeNotFound(ReportNodeId),

    /// Parent report node not found.
    #[error("Parent report node not found: {0}")]
    ParentNotFound(ReportNodeId),

    /// A node with this ID already exists.
    #[error("Report node already exists: {0}")]
    DuplicateNode(ReportNodeId),

    /// Reparenting would make a node its own ancestor.
    #[error("Cannot move report node {node} under its own descendant {parent}")]
    CyclicParent {
        /// Node being moved.
        node: ReportNodeId,
        /// Requested parent.
        parent: ReportNodeId,
    },

    /// Report value references loop back to this node.
    #[error("Report node {0} references itself through its report values")]
    CyclicReference(ReportNodeId),

    /// A node balance does not fit in a decimal.
    #[error("Balance of report node {0} overflows")]
    AmountOverflow(ReportNodeId),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NodeNotFound(_) | ReportError::ParentNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ReportError::AmountOverflow(_) => Self::Internal(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_mapping() {
        let id = ReportNodeId::new();
        assert_eq!(AppError::from(ReportError::NodeNotFound(id)).error_code(), "NOT_FOUND");
        assert!(AppError::from(ReportError::CyclicReference(id)).is_validation());
        assert_eq!(
            AppError::from(ReportError::AmountOverflow(id)).error_code(),
            "INTERNAL_ERROR"
        );
    }
}
