//! Frame Adapter - linear static analysis of planar elastic frames
//!
//! Takes a JSON document of nodes, elastic beam-column elements and nodal
//! loads, runs a one-shot linear static analysis and returns the nodal
//! displacements:
//! - 2D model, 3 DOF per node (UX, UY, RZ)
//! - Euler-Bernoulli elastic beam-columns with a linear geometric transformation
//! - Banded SPD (skyline Cholesky) or dense LU system, RCM or plain numbering
//! - Load control with a linear time series and a plain load pattern
//!
//! ## Example
//! ```rust
//! use frame_adapter::prelude::*;
//! use serde_json::json;
//!
//! let document = json!({
//!     "nodes": [
//!         {"id": 1, "x": 0.0, "y": 0.0, "fix": [1, 1, 1]},
//!         {"id": 2, "x": 5.0, "y": 0.0}
//!     ],
//!     "elements": [
//!         {"id": 1, "type": "ElasticBeamColumn", "nodes": [1, 2],
//!          "A": 0.01, "E": 200e9, "Iz": 1e-4}
//!     ],
//!     "loads": [
//!         {"type": "Nodal", "node": 2, "value": [0.0, -1000.0, 0.0]}
//!     ]
//! });
//!
//! let output = Adapter::default().run_document(&document).unwrap();
//! let tip = output.displacement(2).unwrap();
//! assert!(tip.dy < 0.0);
//! ```

pub mod adapter;
pub mod analysis;
pub mod elements;
pub mod error;
pub mod input;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::adapter::{run_analysis, Adapter};
    pub use crate::analysis::{
        AnalysisOptions, Integrator, Numberer, SolutionPolicy, SystemKind, UnsupportedPolicy,
    };
    pub use crate::elements::{Dof, ElasticBeamColumn, Fixity, GeomTransf, Node};
    pub use crate::error::{AdapterError, AdapterResult, ErrorKind, FrameError, FrameResult};
    pub use crate::input::{validate, AnalysisInput, ElementSpec, LoadSpec, NodeSpec};
    pub use crate::loads::{LoadPattern, NodalLoad, TimeSeries};
    pub use crate::model::FrameModel;
    pub use crate::results::{AnalysisOutput, AnalysisSummary, ElementForces, NodeDisplacement};
}
