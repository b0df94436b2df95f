//! Request adapter: JSON document in, result or error document out
//!
//! Each request gets its own [`FrameModel`], so nothing leaks between
//! requests and concurrent callers never share engine state.

use log::{debug, error, info, warn};
use serde_json::Value;

use crate::analysis::{AnalysisOptions, UnsupportedPolicy};
use crate::elements::GeomTransf;
use crate::error::{AdapterError, AdapterResult};
use crate::input::{self, AnalysisInput, ValidatedDocument};
use crate::loads::{LoadPattern, TimeSeries};
use crate::model::FrameModel;
use crate::results::{AnalysisOutput, ErrorResponse};

/// Tag of the single linear transformation shared by every element
pub const TRANSFORM_TAG: i32 = 1;
/// Tag of the linear time series driving the load pattern
pub const SERIES_TAG: i32 = 1;
/// Tag of the plain load pattern holding every load
pub const PATTERN_TAG: i32 = 1;

/// Build, solve and read back a model for a validated input
pub fn run_analysis(input: &AnalysisInput, options: &AnalysisOptions) -> AdapterResult<AnalysisOutput> {
    let mut model = FrameModel::new();

    // Nodes and their restraints
    for node in &input.nodes {
        model.add_node(node.id, node.to_node())?;
        if let Some(fixity) = node.fix {
            model.fix(node.id, fixity)?;
        }
    }
    debug!("defined {} nodes", model.num_nodes());

    model.add_geom_transf(TRANSFORM_TAG, GeomTransf::Linear)?;
    for element in &input.elements {
        model.add_element(element.id(), element.to_element(TRANSFORM_TAG))?;
    }
    debug!("defined {} elements", model.num_elements());

    model.add_time_series(SERIES_TAG, TimeSeries::linear())?;
    model.add_pattern(PATTERN_TAG, LoadPattern::plain(SERIES_TAG))?;
    for load in &input.loads {
        let (node, load) = load.nodal();
        model.add_nodal_load(node, load)?;
    }
    debug!("defined {} nodal loads", input.loads.len());

    let summary = model.analyze(&options.solution)?;
    info!(
        "analysis complete: {} nodes, {} elements, {} equations, profile {}",
        summary.num_nodes, summary.num_elements, summary.num_equations, summary.profile
    );

    let mut output = AnalysisOutput::default();
    for node in &input.nodes {
        output
            .node_displacements
            .push((node.id, model.node_displacement(node.id)?));
    }
    if options.element_forces {
        for element in &input.elements {
            let id = element.id();
            output.element_forces.push((id, model.element_forces(id)?));
        }
    }

    Ok(output)
}

/// Handles whole requests: raw text to output document
#[derive(Debug, Clone, Copy, Default)]
pub struct Adapter {
    pub options: AnalysisOptions,
    /// Attach error kind and details to failure documents
    pub error_detail: bool,
}

impl Adapter {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            error_detail: false,
        }
    }

    pub fn with_error_detail(mut self, error_detail: bool) -> Self {
        self.error_detail = error_detail;
        self
    }

    /// Parse, validate and analyze a request body
    pub fn run_str(&self, body: &str) -> AdapterResult<AnalysisOutput> {
        if body.is_empty() {
            return Err(AdapterError::EmptyInput);
        }
        let document: Value = serde_json::from_str(body)?;
        self.run_document(&document)
    }

    /// Validate and analyze an already parsed document
    pub fn run_document(&self, document: &Value) -> AdapterResult<AnalysisOutput> {
        let ValidatedDocument { input, unsupported } =
            input::validate(document).map_err(AdapterError::Schema)?;

        if !unsupported.is_empty() {
            match self.options.unsupported {
                UnsupportedPolicy::Reject => return Err(AdapterError::Unsupported(unsupported)),
                UnsupportedPolicy::Warn => {
                    for entity in &unsupported {
                        warn!("skipping {}", entity);
                    }
                }
            }
        }

        run_analysis(&input, &self.options)
    }

    /// The failure document for `err`, in the configured shape
    pub fn error_response(&self, err: &AdapterError) -> ErrorResponse {
        if self.error_detail {
            ErrorResponse::detailed(err)
        } else {
            ErrorResponse::new(err)
        }
    }

    /// Output line and exit status for a request body
    pub fn respond(&self, body: &str) -> (String, i32) {
        let result = self.run_str(body).and_then(|output| {
            serde_json::to_string(&output).map_err(AdapterError::Output)
        });

        match result {
            Ok(line) => (line, 0),
            Err(err) => {
                error!("analysis failed: {}", err);
                let response = self.error_response(&err);
                let line = serde_json::to_string(&response)
                    .unwrap_or_else(|_| r#"{"error":"Internal error"}"#.to_string());
                (line, 1)
            }
        }
    }
}
