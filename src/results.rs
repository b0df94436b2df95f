//! Result types for frame analysis

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{AdapterError, ErrorDetail, ErrorKind};

/// Displacement results at a node, serialized as `[dx, dy, rz]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, RZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            rz: arr[2],
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.dx, self.dy, self.rz]
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

impl From<[f64; 3]> for NodeDisplacement {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<NodeDisplacement> for [f64; 3] {
    fn from(disp: NodeDisplacement) -> Self {
        disp.as_array()
    }
}

/// Local end forces of a beam-column, serialized as `[n_i, v_i, m_i, n_j, v_j, m_j]`
///
/// Forces act on the element, in element axes: `n` along the chord, `v`
/// perpendicular to it, `m` about Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct ElementForces {
    pub n_i: f64,
    pub v_i: f64,
    pub m_i: f64,
    pub n_j: f64,
    pub v_j: f64,
    pub m_j: f64,
}

impl ElementForces {
    pub fn from_array(f: [f64; 6]) -> Self {
        Self {
            n_i: f[0],
            v_i: f[1],
            m_i: f[2],
            n_j: f[3],
            v_j: f[4],
            m_j: f[5],
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.n_i, self.v_i, self.m_i, self.n_j, self.v_j, self.m_j]
    }

    /// Axial force (positive = tension)
    pub fn axial(&self) -> f64 {
        self.n_j
    }
}

impl From<[f64; 6]> for ElementForces {
    fn from(f: [f64; 6]) -> Self {
        Self::from_array(f)
    }
}

impl From<ElementForces> for [f64; 6] {
    fn from(forces: ElementForces) -> Self {
        forces.as_array()
    }
}

/// Size and shape of a solved system
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Free DOFs (unknowns)
    pub num_equations: usize,
    /// Largest row distance from the diagonal after numbering
    pub half_bandwidth: usize,
    /// Stored lower-triangle entries of the factor
    pub profile: usize,
    /// Pseudo-time reached
    pub time: f64,
}

/// Successful response: `{"nodeDisplacements": {...}, "elementForces": {...}}`
///
/// Entries keep input order; ids are written as JSON object keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput {
    #[serde(serialize_with = "serialize_by_id")]
    pub node_displacements: Vec<(i64, NodeDisplacement)>,
    #[serde(serialize_with = "serialize_by_id")]
    pub element_forces: Vec<(i64, ElementForces)>,
}

fn serialize_by_id<S, T>(entries: &[(i64, T)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    serializer.collect_map(entries.iter().map(|(id, value)| (id, value)))
}

impl AnalysisOutput {
    pub fn displacement(&self, node: i64) -> Option<NodeDisplacement> {
        self.node_displacements
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, d)| *d)
    }

    pub fn forces(&self, element: i64) -> Option<ElementForces> {
        self.element_forces
            .iter()
            .find(|(id, _)| *id == element)
            .map(|(_, f)| *f)
    }
}

/// Failure response: `{"error": message}`, optionally with kind and details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

impl ErrorResponse {
    /// The plain `{"error": message}` shape
    pub fn new(err: &AdapterError) -> Self {
        Self {
            error: err.to_string(),
            kind: None,
            details: Vec::new(),
        }
    }

    /// Message plus error kind and per-entity details
    pub fn detailed(err: &AdapterError) -> Self {
        Self {
            error: err.to_string(),
            kind: Some(err.kind()),
            details: err.details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shape() {
        let output = AnalysisOutput {
            node_displacements: vec![
                (2, NodeDisplacement::from_array([0.5, -1.0, 0.25])),
                (1, NodeDisplacement::from_array([0.0, 0.0, 0.0])),
            ],
            element_forces: Vec::new(),
        };

        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(
            json,
            r#"{"nodeDisplacements":{"2":[0.5,-1.0,0.25],"1":[0.0,0.0,0.0]},"elementForces":{}}"#
        );
    }

    #[test]
    fn test_error_response_shapes() {
        let err = AdapterError::EmptyInput;
        let plain = serde_json::to_string(&ErrorResponse::new(&err)).unwrap();
        assert_eq!(plain, r#"{"error":"No input provided"}"#);

        let detailed = serde_json::to_value(ErrorResponse::detailed(&err)).unwrap();
        assert_eq!(detailed["kind"], "empty_input");
        assert!(detailed.get("details").is_none());
    }

    #[test]
    fn test_element_forces_round_trip_through_array() {
        let forces = ElementForces::from_array([-1.0, 2.0, 3.0, 1.0, -2.0, 4.0]);
        let value = serde_json::to_value(forces).unwrap();
        assert_eq!(value, serde_json::json!([-1.0, 2.0, 3.0, 1.0, -2.0, 4.0]));
        assert_eq!(forces.axial(), 1.0);
    }
}
