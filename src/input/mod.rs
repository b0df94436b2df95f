//! Input document model and schema validation
//!
//! The request document is checked field by field before anything reaches
//! the engine. Validation yields either a fully typed [`AnalysisInput`] or
//! every [`SchemaError`](crate::error::SchemaError) found in the document.

mod fields;
mod validate;

use std::fmt;

use crate::elements::{ElasticBeamColumn, Fixity, Node};
use crate::loads::NodalLoad;

pub use validate::validate;

/// Element type tag of the elastic beam-column
pub const ELASTIC_BEAM_COLUMN: &str = "ElasticBeamColumn";
/// Load type tag of a nodal load
pub const NODAL: &str = "Nodal";

/// Which part of the document an entity comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Document,
    Node,
    Element,
    Load,
}

impl EntityKind {
    /// Name of the top-level collection holding this kind
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Document => "document",
            EntityKind::Node => "nodes",
            EntityKind::Element => "elements",
            EntityKind::Load => "loads",
        }
    }
}

/// An element or load whose type tag is not supported
#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedEntity {
    pub entity: EntityKind,
    pub index: usize,
    pub id: Option<i64>,
    pub tag: String,
}

impl fmt::Display for UnsupportedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.entity.collection(), self.index)?;
        if let Some(id) = self.id {
            write!(f, " (id {})", id)?;
        }
        write!(f, ": unsupported type '{}'", self.tag)
    }
}

/// A validated node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    /// Restraints, when the input gives a `fix` triple
    pub fix: Option<Fixity>,
}

impl NodeSpec {
    pub fn to_node(&self) -> Node {
        Node::new(self.x, self.y)
    }
}

/// A validated elastic beam-column
#[derive(Debug, Clone, PartialEq)]
pub struct BeamColumnSpec {
    pub id: i64,
    pub nodes: [i64; 2],
    pub a: f64,
    pub e: f64,
    pub iz: f64,
}

/// Supported element types
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSpec {
    ElasticBeamColumn(BeamColumnSpec),
}

impl ElementSpec {
    pub fn id(&self) -> i64 {
        match self {
            ElementSpec::ElasticBeamColumn(spec) => spec.id,
        }
    }

    /// Build the engine element using geometric transformation `transf`
    pub fn to_element(&self, transf: i32) -> ElasticBeamColumn {
        match self {
            ElementSpec::ElasticBeamColumn(spec) => {
                ElasticBeamColumn::new(spec.nodes, spec.a, spec.e, spec.iz, transf)
            }
        }
    }
}

/// A validated nodal load
#[derive(Debug, Clone, PartialEq)]
pub struct NodalLoadSpec {
    pub node: i64,
    /// [FX, FY, MZ]
    pub value: [f64; 3],
}

/// Supported load types
#[derive(Debug, Clone, PartialEq)]
pub enum LoadSpec {
    Nodal(NodalLoadSpec),
}

impl LoadSpec {
    /// Target node and load vector
    pub fn nodal(&self) -> (i64, NodalLoad) {
        match self {
            LoadSpec::Nodal(spec) => (spec.node, NodalLoad::from_array(spec.value)),
        }
    }
}

/// A fully typed analysis request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisInput {
    pub nodes: Vec<NodeSpec>,
    pub elements: Vec<ElementSpec>,
    pub loads: Vec<LoadSpec>,
}

/// Result of a successful validation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedDocument {
    pub input: AnalysisInput,
    /// Entries with unsupported type tags, left out of `input`
    pub unsupported: Vec<UnsupportedEntity>,
}
