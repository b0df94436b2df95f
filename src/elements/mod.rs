//! Structural elements module

mod beam_column;
mod node;
mod support;
mod transform;

pub use beam_column::ElasticBeamColumn;
pub use node::Node;
pub use support::{Dof, Fixity};
pub use transform::GeomTransf;
