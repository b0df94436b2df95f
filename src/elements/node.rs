//! Node element - represents a point in the XY plane

use serde::{Deserialize, Serialize};

use super::Fixity;

/// A node of the planar frame model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Restrained degrees of freedom
    #[serde(default)]
    pub fixity: Fixity,

    /// Displacement results [UX, UY, RZ] of the last analysis step
    #[serde(skip)]
    pub(crate) displacement: Option<[f64; 3]>,
}

impl Node {
    /// Create a new, unrestrained node at the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            fixity: Fixity::free(),
            displacement: None,
        }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        crate::math::segment_length(&self.coords(), &other.coords())
    }

    /// Get displacement [UX, UY, RZ] of the last analysis
    pub fn displacement(&self) -> Option<[f64; 3]> {
        self.displacement
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(1.0, 2.0);
        assert_eq!(node.coords(), [1.0, 2.0]);
        assert!(!node.fixity.is_supported());
        assert!(node.displacement().is_none());
    }

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(0.0, 0.0);
        let n2 = Node::new(3.0, 4.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }
}
