//! Equation numbering for the free degrees of freedom

use crate::elements::{Dof, Fixity};
use crate::math::reverse_cuthill_mckee;

use super::Numberer;

/// Map between node DOFs and global equation numbers
///
/// Nodes are addressed by their position in the model (declaration order).
/// Restrained DOFs have no equation.
#[derive(Debug, Clone)]
pub struct DofNumbering {
    equations: Vec<[Option<usize>; 3]>,
    owners: Vec<(usize, Dof)>,
}

impl DofNumbering {
    /// Number the free DOFs of `fixities.len()` nodes connected by `connectivity`
    pub fn new(fixities: &[Fixity], connectivity: &[[usize; 2]], numberer: Numberer) -> Self {
        let n_nodes = fixities.len();

        let order: Vec<usize> = match numberer {
            Numberer::Plain => (0..n_nodes).collect(),
            Numberer::Rcm => {
                let mut adjacency = vec![Vec::new(); n_nodes];
                for &[i, j] in connectivity {
                    if i != j {
                        adjacency[i].push(j);
                        adjacency[j].push(i);
                    }
                }
                reverse_cuthill_mckee(&adjacency)
            }
        };

        let mut equations = vec![[None; 3]; n_nodes];
        let mut owners = Vec::with_capacity(n_nodes * 3);

        for node in order {
            for dof in Dof::ALL {
                if !fixities[node].restrains(dof) {
                    equations[node][dof.index()] = Some(owners.len());
                    owners.push((node, dof));
                }
            }
        }

        Self { equations, owners }
    }

    /// Number of free DOFs, i.e. the size of the global system
    pub fn num_equations(&self) -> usize {
        self.owners.len()
    }

    /// Equations of a node's [UX, UY, RZ]
    pub fn node_equations(&self, node: usize) -> [Option<usize>; 3] {
        self.equations[node]
    }

    /// Equations of an element's six end DOFs
    pub fn element_equations(&self, i_node: usize, j_node: usize) -> [Option<usize>; 6] {
        let [a, b, c] = self.equations[i_node];
        let [d, e, f] = self.equations[j_node];
        [a, b, c, d, e, f]
    }

    /// Node position and DOF that own an equation
    pub fn owner(&self, equation: usize) -> Option<(usize, Dof)> {
        self.owners.get(equation).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restrained_dofs_get_no_equation() {
        let fixities = [Fixity::fixed(), Fixity::pinned(), Fixity::free()];
        let numbering = DofNumbering::new(&fixities, &[[0, 1], [1, 2]], Numberer::Plain);

        assert_eq!(numbering.num_equations(), 4);
        assert_eq!(numbering.node_equations(0), [None, None, None]);
        assert_eq!(numbering.node_equations(1), [None, None, Some(0)]);
        assert_eq!(numbering.node_equations(2), [Some(1), Some(2), Some(3)]);
        assert_eq!(numbering.owner(0), Some((1, Dof::Rz)));
        assert_eq!(numbering.owner(4), None);
    }

    #[test]
    fn test_rcm_numbers_every_free_dof_once() {
        let fixities = vec![Fixity::free(); 5];
        let connectivity = [[0, 4], [4, 1], [1, 3], [3, 2]];
        let numbering = DofNumbering::new(&fixities, &connectivity, Numberer::Rcm);

        assert_eq!(numbering.num_equations(), 15);
        let mut seen: Vec<usize> = (0..5)
            .flat_map(|n| numbering.node_equations(n))
            .flatten()
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..15).collect::<Vec<_>>());

        // Neighbours along the chain end up in adjacent equation blocks
        let block = |n: usize| numbering.node_equations(n)[0].unwrap() / 3;
        for [i, j] in connectivity {
            assert_eq!(block(i).abs_diff(block(j)), 1);
        }
    }

    #[test]
    fn test_element_equations() {
        let fixities = [Fixity::fixed(), Fixity::free()];
        let numbering = DofNumbering::new(&fixities, &[[0, 1]], Numberer::Plain);
        assert_eq!(
            numbering.element_equations(0, 1),
            [None, None, None, Some(0), Some(1), Some(2)]
        );
    }
}
