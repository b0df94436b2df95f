//! Analysis policy and options
//!
//! The solution pipeline is fixed to a one-shot linear static analysis:
//! plain constraint handling (restrained DOFs get no equation and stay at
//! zero), load control, a linear algorithm and a static analysis type. The
//! pieces that do vary are the linear system, the equation numberer and the
//! load-control increment.

mod numberer;

use serde::{Deserialize, Serialize};

pub use numberer::DofNumbering;

/// Storage and factorization used for the global system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemKind {
    /// Banded (skyline) symmetric positive definite Cholesky
    BandSpd,
    /// Dense LU, no symmetry or definiteness assumed
    FullGeneral,
}

/// Ordering of nodes before equations are assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Numberer {
    /// Declaration order
    Plain,
    /// Reverse Cuthill-McKee over the element connectivity graph
    Rcm,
}

/// Pseudo-time stepping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Integrator {
    /// Advance pseudo-time by a fixed increment each step
    LoadControl { increment: f64 },
}

impl Integrator {
    pub fn increment(&self) -> f64 {
        match self {
            Integrator::LoadControl { increment } => *increment,
        }
    }
}

/// How the solution is configured and run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolutionPolicy {
    pub system: SystemKind,
    pub numberer: Numberer,
    pub integrator: Integrator,
    /// Number of analysis steps to run
    pub steps: usize,
}

impl Default for SolutionPolicy {
    fn default() -> Self {
        Self {
            system: SystemKind::BandSpd,
            numberer: Numberer::Rcm,
            integrator: Integrator::LoadControl { increment: 1.0 },
            steps: 1,
        }
    }
}

impl SolutionPolicy {
    /// Single step of unit load control, banded SPD system, RCM numbering
    pub fn linear_static() -> Self {
        Self::default()
    }

    pub fn with_system(mut self, system: SystemKind) -> Self {
        self.system = system;
        self
    }

    pub fn with_numberer(mut self, numberer: Numberer) -> Self {
        self.numberer = numberer;
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }
}

/// What to do with element or load type tags outside the supported set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsupportedPolicy {
    /// Log a warning per entity and leave it out of the model
    #[default]
    Warn,
    /// Fail the request, listing every unsupported entity
    Reject,
}

/// Options for a frame analysis request
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Solution pipeline
    pub solution: SolutionPolicy,
    /// Handling of unsupported element/load types
    pub unsupported: UnsupportedPolicy,
    /// Recover element end forces into the output
    pub element_forces: bool,
}

impl AnalysisOptions {
    /// Create options for the default linear static analysis
    pub fn linear() -> Self {
        Self::default()
    }

    /// Reject unsupported element/load types instead of skipping them
    pub fn strict(mut self) -> Self {
        self.unsupported = UnsupportedPolicy::Reject;
        self
    }

    /// Populate element end forces
    pub fn with_element_forces(mut self) -> Self {
        self.element_forces = true;
        self
    }

    pub fn with_solution(mut self, solution: SolutionPolicy) -> Self {
        self.solution = solution;
        self
    }
}
