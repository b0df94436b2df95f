//! Frame model - the analysis session
//!
//! A [`FrameModel`] owns everything one analysis needs: nodes, supports,
//! transformations, elements, time series, load patterns and the results of
//! the last solve. Sessions share nothing, so independent requests can build
//! and solve their own models concurrently.

use std::collections::HashMap;

use log::{debug, info};

use crate::analysis::{DofNumbering, SolutionPolicy, SystemKind};
use crate::elements::{ElasticBeamColumn, Fixity, GeomTransf, Node};
use crate::error::{FrameError, FrameResult};
use crate::loads::{LoadPattern, NodalLoad, TimeSeries};
use crate::math::{self, Mat6, SkylineCholesky, SparseMatrixBuilder, Vec as FEVec, Vec6};
use crate::results::{AnalysisSummary, ElementForces, NodeDisplacement};

/// Spatial dimensions of the model
pub const NDM: usize = 2;
/// Degrees of freedom per node
pub const NDF: usize = 3;

/// An element placed in the model, with its geometry resolved
#[derive(Debug, Clone)]
struct PlacedElement {
    id: i64,
    element: ElasticBeamColumn,
    /// Positions of the end nodes in `FrameModel::nodes`
    ends: [usize; 2],
    /// Global-to-local transformation
    t: Mat6,
}

/// Factorized global stiffness
enum Factored {
    Band(SkylineCholesky),
    Dense(math::Mat),
}

/// The 2D, 3-DOF-per-node structural model
#[derive(Debug, Clone, Default)]
pub struct FrameModel {
    /// (id, node) in declaration order
    nodes: Vec<(i64, Node)>,
    node_index: HashMap<i64, usize>,
    elements: Vec<PlacedElement>,
    element_index: HashMap<i64, usize>,
    transforms: HashMap<i32, GeomTransf>,
    time_series: HashMap<i32, TimeSeries>,
    /// (tag, pattern) in declaration order
    patterns: Vec<(i32, LoadPattern)>,
    active_pattern: Option<usize>,
    /// Pseudo-time reached by the integrator
    time: f64,
    analyzed: bool,
}

impl FrameModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every definition and result
    pub fn wipe(&mut self) {
        *self = Self::new();
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node to the model
    pub fn add_node(&mut self, id: i64, node: Node) -> FrameResult<()> {
        if self.node_index.contains_key(&id) {
            return Err(FrameError::DuplicateNode(id));
        }
        self.node_index.insert(id, self.nodes.len());
        self.nodes.push((id, node));
        self.analyzed = false;
        Ok(())
    }

    /// Restrain degrees of freedom of a node
    pub fn fix(&mut self, id: i64, fixity: Fixity) -> FrameResult<()> {
        let idx = self.node_position(id)?;
        let node = &mut self.nodes[idx].1;
        node.fixity = node.fixity.merged(fixity);
        self.analyzed = false;
        Ok(())
    }

    /// Register a geometric transformation under `tag`
    pub fn add_geom_transf(&mut self, tag: i32, transf: GeomTransf) -> FrameResult<()> {
        if self.transforms.contains_key(&tag) {
            return Err(FrameError::DuplicateTag {
                kind: "geometric transformation",
                tag,
            });
        }
        self.transforms.insert(tag, transf);
        Ok(())
    }

    /// Add an element to the model
    pub fn add_element(&mut self, id: i64, mut element: ElasticBeamColumn) -> FrameResult<()> {
        let i = self.node_position(element.i_node)?;
        let j = self.node_position(element.j_node)?;
        let transf = *self
            .transforms
            .get(&element.transf)
            .ok_or(FrameError::TransformNotFound(element.transf))?;
        if self.element_index.contains_key(&id) {
            return Err(FrameError::DuplicateElement(id));
        }

        let i_coords = self.nodes[i].1.coords();
        let j_coords = self.nodes[j].1.coords();
        let length = math::segment_length(&i_coords, &j_coords);
        if !(length > 1e-10) {
            return Err(FrameError::InvalidGeometry(format!(
                "Element {} has zero length: i={}, j={}",
                id, element.i_node, element.j_node
            )));
        }
        element.length = Some(length);

        self.element_index.insert(id, self.elements.len());
        self.elements.push(PlacedElement {
            id,
            t: transf.matrix(&i_coords, &j_coords),
            element,
            ends: [i, j],
        });
        self.analyzed = false;
        Ok(())
    }

    /// Register a time series under `tag`
    pub fn add_time_series(&mut self, tag: i32, series: TimeSeries) -> FrameResult<()> {
        if self.time_series.contains_key(&tag) {
            return Err(FrameError::DuplicateTag {
                kind: "time series",
                tag,
            });
        }
        self.time_series.insert(tag, series);
        Ok(())
    }

    /// Register a load pattern and make it the target of subsequent loads
    pub fn add_pattern(&mut self, tag: i32, pattern: LoadPattern) -> FrameResult<()> {
        if !self.time_series.contains_key(&pattern.series) {
            return Err(FrameError::TimeSeriesNotFound(pattern.series));
        }
        if self.patterns.iter().any(|(t, _)| *t == tag) {
            return Err(FrameError::DuplicateTag {
                kind: "load pattern",
                tag,
            });
        }
        self.active_pattern = Some(self.patterns.len());
        self.patterns.push((tag, pattern));
        self.analyzed = false;
        Ok(())
    }

    /// Add a nodal load to the active pattern
    pub fn add_nodal_load(&mut self, node: i64, load: NodalLoad) -> FrameResult<()> {
        self.node_position(node)?;
        let active = self.active_pattern.ok_or(FrameError::NoActivePattern)?;
        self.patterns[active].1.add_load(node, load);
        self.analyzed = false;
        Ok(())
    }

    // ========================
    // Analysis Methods
    // ========================

    /// Run `policy.steps` load-control steps of a linear static analysis
    ///
    /// Pseudo-time, displacements and element forces are committed only when
    /// every step succeeds. A failed call leaves the model unanalyzed with its
    /// pseudo-time where it was.
    pub fn analyze(&mut self, policy: &SolutionPolicy) -> FrameResult<AnalysisSummary> {
        self.analyzed = false;
        let fixities: Vec<Fixity> = self.nodes.iter().map(|(_, n)| n.fixity).collect();
        let connectivity: Vec<[usize; 2]> = self.elements.iter().map(|e| e.ends).collect();
        let numbering = DofNumbering::new(&fixities, &connectivity, policy.numberer);
        let n_eq = numbering.num_equations();

        let stiffness = self.assemble_stiffness(&numbering);
        debug!(
            "assembled {} equations from {} elements ({} triplets)",
            n_eq,
            self.elements.len(),
            stiffness.nnz()
        );

        let mut summary = AnalysisSummary {
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
            num_equations: n_eq,
            ..Default::default()
        };

        let factored = match policy.system {
            SystemKind::BandSpd => {
                let mut chol = SkylineCholesky::new(&stiffness.to_csr());
                summary.half_bandwidth = chol.half_bandwidth();
                summary.profile = chol.profile();
                chol.factorize()
                    .map_err(|breakdown| self.singular_at(&numbering, breakdown.equation))?;
                Factored::Band(chol)
            }
            SystemKind::FullGeneral => {
                summary.profile = n_eq * (n_eq + 1) / 2;
                summary.half_bandwidth = n_eq.saturating_sub(1);
                Factored::Dense(stiffness.to_dense())
            }
        };

        let increment = policy.integrator.increment();
        let mut time = self.time;
        let mut solution = None;
        for _ in 0..policy.steps {
            time += increment;
            let p = self.load_vector(&numbering, time)?;

            let d = match &factored {
                _ if n_eq == 0 => FEVec::zeros(0),
                Factored::Band(chol) => chol.solve(&p),
                Factored::Dense(k) => {
                    math::solve_linear_system(k, &p).ok_or(FrameError::SingularSystem)?
                }
            };
            if d.iter().any(|v| !v.is_finite()) {
                return Err(FrameError::NonFiniteSolution);
            }

            solution = Some(d);
        }

        if let Some(d) = solution {
            self.store_displacements(&numbering, &d);
        }
        self.time = time;
        self.recover_element_forces();
        self.analyzed = true;
        summary.time = time;

        info!(
            "linear static analysis: {} nodes, {} elements, {} equations, half-bandwidth {}, t = {}",
            summary.num_nodes,
            summary.num_elements,
            summary.num_equations,
            summary.half_bandwidth,
            summary.time
        );
        Ok(summary)
    }

    /// Build the reduced global stiffness matrix over free DOFs
    fn assemble_stiffness(&self, numbering: &DofNumbering) -> SparseMatrixBuilder {
        let mut k_global = SparseMatrixBuilder::new(numbering.num_equations());

        for placed in &self.elements {
            let length = placed.element.length.unwrap_or_default();
            let k_local = placed.element.local_stiffness(length);

            // Transform to global: K_global = T^T * K_local * T
            let k_elem = placed.t.transpose() * k_local * placed.t;

            let dofs = numbering.element_equations(placed.ends[0], placed.ends[1]);
            k_global.add_element_matrix(&dofs, &k_elem);
        }

        k_global
    }

    /// Build the load vector at pseudo-time `time`
    fn load_vector(&self, numbering: &DofNumbering, time: f64) -> FrameResult<FEVec> {
        let mut p = FEVec::zeros(numbering.num_equations());

        for (_, pattern) in &self.patterns {
            let series = self
                .time_series
                .get(&pattern.series)
                .ok_or(FrameError::TimeSeriesNotFound(pattern.series))?;
            let factor = series.factor(time);

            for (node, load) in &pattern.loads {
                let equations = numbering.node_equations(self.node_position(*node)?);
                // Loads on restrained DOFs go straight into the reactions
                for (eq, value) in equations.iter().zip(load.scaled(factor).as_array()) {
                    if let Some(eq) = eq {
                        p[*eq] += value;
                    }
                }
            }
        }

        Ok(p)
    }

    fn store_displacements(&mut self, numbering: &DofNumbering, d: &FEVec) {
        for (idx, (_, node)) in self.nodes.iter_mut().enumerate() {
            let equations = numbering.node_equations(idx);
            let mut disp = [0.0; NDF];
            for (value, eq) in disp.iter_mut().zip(equations) {
                if let Some(eq) = eq {
                    *value = d[eq];
                }
            }
            node.displacement = Some(disp);
        }
    }

    /// Local end forces F = K_local * T * d for every element
    fn recover_element_forces(&mut self) {
        let nodes = &self.nodes;
        for placed in &mut self.elements {
            let [i, j] = placed.ends;
            let (Some(d_i), Some(d_j)) = (nodes[i].1.displacement, nodes[j].1.displacement) else {
                continue;
            };
            let d_global = Vec6::from_iterator(d_i.into_iter().chain(d_j));
            let length = placed.element.length.unwrap_or_default();
            let f = placed.element.local_end_forces(length, &placed.t, &d_global);

            let mut forces = [0.0; 6];
            forces.copy_from_slice(f.as_slice());
            placed.element.local_forces = Some(forces);
        }
    }

    fn singular_at(&self, numbering: &DofNumbering, equation: usize) -> FrameError {
        match numbering.owner(equation) {
            Some((idx, dof)) => FrameError::SingularMatrix {
                node: self.nodes[idx].0,
                dof,
            },
            None => FrameError::SingularSystem,
        }
    }

    fn node_position(&self, id: i64) -> FrameResult<usize> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(FrameError::NodeNotFound(id))
    }

    // ========================
    // Result Access Methods
    // ========================

    /// Get node displacement of the last analysis
    pub fn node_displacement(&self, id: i64) -> FrameResult<NodeDisplacement> {
        let node = &self.nodes[self.node_position(id)?].1;
        if !self.analyzed {
            return Err(FrameError::NotAnalyzed);
        }
        node.displacement()
            .map(NodeDisplacement::from_array)
            .ok_or(FrameError::NotAnalyzed)
    }

    /// Get local end forces of an element from the last analysis
    pub fn element_forces(&self, id: i64) -> FrameResult<ElementForces> {
        let idx = *self
            .element_index
            .get(&id)
            .ok_or(FrameError::ElementNotFound(id))?;
        if !self.analyzed {
            return Err(FrameError::NotAnalyzed);
        }
        self.elements[idx]
            .element
            .local_force()
            .map(ElementForces::from_array)
            .ok_or(FrameError::NotAnalyzed)
    }

    pub fn node(&self, id: i64) -> Option<&Node> {
        self.node_index.get(&id).map(|&idx| &self.nodes[idx].1)
    }

    pub fn element(&self, id: i64) -> Option<&ElasticBeamColumn> {
        self.element_index
            .get(&id)
            .map(|&idx| &self.elements[idx].element)
    }

    /// Node ids in declaration order
    pub fn node_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.nodes.iter().map(|(id, _)| *id)
    }

    /// Element ids in declaration order
    pub fn element_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.elements.iter().map(|e| e.id)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Pseudo-time reached by the last analysis
    pub fn current_time(&self) -> f64 {
        self.time
    }

    /// Check if model has been analyzed since its last change
    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }
}
