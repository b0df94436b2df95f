//! Error types for the frame adapter
//!
//! Three layers, from the inside out:
//! - [`FrameError`]: the analysis engine rejected a definition call or failed to solve.
//! - [`SchemaError`]: one field-level problem found by the validation pass.
//! - [`AdapterError`]: everything that can end a request, classified by [`ErrorKind`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::elements::Dof;
use crate::input::{EntityKind, UnsupportedEntity};

/// Errors raised by the analysis engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Node {0} not found in model")]
    NodeNotFound(i64),

    #[error("Element {0} not found in model")]
    ElementNotFound(i64),

    #[error("Duplicate node id {0}")]
    DuplicateNode(i64),

    #[error("Duplicate element id {0}")]
    DuplicateElement(i64),

    #[error("Duplicate {kind} tag {tag}")]
    DuplicateTag { kind: &'static str, tag: i32 },

    #[error("Geometric transformation {0} not found in model")]
    TransformNotFound(i32),

    #[error("Time series {0} not found in model")]
    TimeSeriesNotFound(i32),

    #[error("No active load pattern - define a pattern before adding loads")]
    NoActivePattern,

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Singular stiffness matrix at node {node} ({dof}) - model may be unstable or have insufficient supports")]
    SingularMatrix { node: i64, dof: Dof },

    #[error("Singular stiffness matrix - model may be unstable or have insufficient supports")]
    SingularSystem,

    #[error("Solution contains non-finite displacements")]
    NonFiniteSolution,

    #[error("Model not analyzed - run analyze() first")]
    NotAnalyzed,
}

impl FrameError {
    /// True for failures of the solve itself rather than of a definition call
    pub fn is_solver_failure(&self) -> bool {
        matches!(
            self,
            FrameError::SingularMatrix { .. }
                | FrameError::SingularSystem
                | FrameError::NonFiniteSolution
        )
    }
}

/// Result type for engine operations
pub type FrameResult<T> = Result<T, FrameError>;

/// What is wrong with a single input field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaProblem {
    #[error("missing required field")]
    Missing,

    #[error("expected {expected}")]
    WrongType { expected: &'static str },

    #[error("expected {expected} values, found {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("references undeclared node {0}")]
    UnknownNode(i64),

    #[error("duplicate id {0}")]
    DuplicateId(i64),

    #[error("must be positive, got {0}")]
    NonPositive(f64),

    #[error("element end nodes coincide")]
    ZeroLength,
}

/// A field-level schema violation, located by collection, position and id
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    pub entity: EntityKind,
    /// Position in the input array, `None` for collection-level problems
    pub index: Option<usize>,
    pub id: Option<i64>,
    /// Field name, empty when the whole entry is at fault
    pub field: String,
    pub problem: SchemaProblem,
}

impl SchemaError {
    pub fn new(entity: EntityKind, index: Option<usize>, field: &str, problem: SchemaProblem) -> Self {
        Self {
            entity,
            index,
            id: None,
            field: field.to_string(),
            problem,
        }
    }

    pub fn with_id(mut self, id: Option<i64>) -> Self {
        self.id = id;
        self
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity.collection())?;
        if let Some(index) = self.index {
            write!(f, "[{}]", index)?;
        }
        if let Some(id) = self.id {
            write!(f, " (id {})", id)?;
        }
        if !self.field.is_empty() {
            write!(f, ".{}", self.field)?;
        }
        write!(f, ": {}", self.problem)
    }
}

impl std::error::Error for SchemaError {}

/// Failure category exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyInput,
    MalformedJson,
    Schema,
    UnsupportedEntity,
    Model,
    Solver,
    Io,
    Internal,
}

/// Contextual fields attached to a structured error response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub entity: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Everything that can end an analysis request
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("No input provided")]
    EmptyInput,

    #[error("Malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Invalid input: {}", join(.0))]
    Schema(Vec<SchemaError>),

    #[error("Unsupported input: {}", join(.0))]
    Unsupported(Vec<UnsupportedEntity>),

    #[error(transparent)]
    Engine(#[from] FrameError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The result could not be written out; the request itself was fine
    #[error("Failed to serialize output: {0}")]
    Output(serde_json::Error),
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AdapterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::EmptyInput => ErrorKind::EmptyInput,
            AdapterError::MalformedJson(_) => ErrorKind::MalformedJson,
            AdapterError::Schema(_) => ErrorKind::Schema,
            AdapterError::Unsupported(_) => ErrorKind::UnsupportedEntity,
            AdapterError::Engine(e) if e.is_solver_failure() => ErrorKind::Solver,
            AdapterError::Engine(_) => ErrorKind::Model,
            AdapterError::Io(_) => ErrorKind::Io,
            AdapterError::Output(_) => ErrorKind::Internal,
        }
    }

    /// Per-entity context for callers that branch on the offending field
    pub fn details(&self) -> Vec<ErrorDetail> {
        match self {
            AdapterError::Schema(errors) => errors
                .iter()
                .map(|e| ErrorDetail {
                    entity: e.entity.collection(),
                    index: e.index,
                    id: e.id,
                    field: (!e.field.is_empty()).then(|| e.field.clone()),
                    message: e.problem.to_string(),
                })
                .collect(),
            AdapterError::Unsupported(entities) => entities
                .iter()
                .map(|u| ErrorDetail {
                    entity: u.entity.collection(),
                    index: Some(u.index),
                    id: u.id,
                    field: Some("type".to_string()),
                    message: format!("unsupported type '{}'", u.tag),
                })
                .collect(),
            AdapterError::Engine(FrameError::SingularMatrix { node, dof }) => vec![ErrorDetail {
                entity: EntityKind::Node.collection(),
                index: None,
                id: Some(*node),
                field: Some(dof.to_string()),
                message: "no stiffness against this degree of freedom".to_string(),
            }],
            _ => Vec::new(),
        }
    }
}

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::new(
            EntityKind::Node,
            Some(1),
            "fix",
            SchemaProblem::WrongLength { expected: 3, found: 2 },
        )
        .with_id(Some(2));
        assert_eq!(err.to_string(), "nodes[1] (id 2).fix: expected 3 values, found 2");
    }

    #[test]
    fn test_collection_level_display() {
        let err = SchemaError::new(
            EntityKind::Load,
            None,
            "",
            SchemaProblem::WrongType { expected: "an array" },
        );
        assert_eq!(err.to_string(), "loads: expected an array");
    }

    #[test]
    fn test_empty_input_message() {
        assert_eq!(AdapterError::EmptyInput.to_string(), "No input provided");
        assert_eq!(AdapterError::EmptyInput.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn test_output_failure_is_internal() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AdapterError::Output(cause);
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().starts_with("Failed to serialize output: "));
        assert_eq!(
            serde_json::to_value(err.kind()).unwrap(),
            serde_json::json!("internal")
        );
    }

    #[test]
    fn test_engine_error_kinds() {
        let singular = AdapterError::from(FrameError::SingularMatrix { node: 3, dof: Dof::Uy });
        assert_eq!(singular.kind(), ErrorKind::Solver);
        assert_eq!(singular.details()[0].id, Some(3));

        let missing = AdapterError::from(FrameError::NodeNotFound(9));
        assert_eq!(missing.kind(), ErrorKind::Model);
        assert!(missing.details().is_empty());
    }
}
