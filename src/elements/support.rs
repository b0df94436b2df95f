//! Degrees of freedom and support conditions

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three nodal degrees of freedom of a planar frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dof {
    /// Translation along global X
    Ux,
    /// Translation along global Y
    Uy,
    /// Rotation about global Z
    Rz,
}

impl Dof {
    pub const ALL: [Dof; 3] = [Dof::Ux, Dof::Uy, Dof::Rz];

    /// Position of this DOF in a nodal [UX, UY, RZ] triple
    pub fn index(self) -> usize {
        match self {
            Dof::Ux => 0,
            Dof::Uy => 1,
            Dof::Rz => 2,
        }
    }
}

impl fmt::Display for Dof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dof::Ux => "ux",
            Dof::Uy => "uy",
            Dof::Rz => "rz",
        })
    }
}

/// Support conditions at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixity {
    /// Restrained in X translation
    pub ux: bool,
    /// Restrained in Y translation
    pub uy: bool,
    /// Restrained in Z rotation
    pub rz: bool,
}

impl Fixity {
    /// Create a fixity with no restraints
    pub fn free() -> Self {
        Self::default()
    }

    /// Create a fully fixed support (all DOFs restrained)
    pub fn fixed() -> Self {
        Self::from_flags([true, true, true])
    }

    /// Create a pinned support (translations restrained, rotation free)
    pub fn pinned() -> Self {
        Self::from_flags([true, true, false])
    }

    /// Create a roller support (Y translation restrained only)
    pub fn roller_y() -> Self {
        Self::from_flags([false, true, false])
    }

    /// Create from [UX, UY, RZ] flags
    pub fn from_flags(flags: [bool; 3]) -> Self {
        Self {
            ux: flags[0],
            uy: flags[1],
            rz: flags[2],
        }
    }

    /// Get the flags as [UX, UY, RZ]
    pub fn as_array(&self) -> [bool; 3] {
        [self.ux, self.uy, self.rz]
    }

    pub fn restrains(&self, dof: Dof) -> bool {
        self.as_array()[dof.index()]
    }

    /// Union of two sets of restraints
    pub fn merged(self, other: Fixity) -> Self {
        Self {
            ux: self.ux || other.ux,
            uy: self.uy || other.uy,
            rz: self.rz || other.rz,
        }
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.ux || self.uy || self.rz
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.as_array().iter().filter(|&&r| r).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_support() {
        let fixity = Fixity::fixed();
        assert!(fixity.ux && fixity.uy && fixity.rz);
        assert_eq!(fixity.num_restrained(), 3);
    }

    #[test]
    fn test_pinned_support() {
        let fixity = Fixity::pinned();
        assert!(fixity.restrains(Dof::Ux) && fixity.restrains(Dof::Uy));
        assert!(!fixity.restrains(Dof::Rz));
        assert_eq!(fixity.num_restrained(), 2);
    }

    #[test]
    fn test_merge_restraints() {
        let merged = Fixity::roller_y().merged(Fixity::from_flags([true, false, false]));
        assert_eq!(merged, Fixity::pinned());
        assert!(!Fixity::free().is_supported());
    }
}
