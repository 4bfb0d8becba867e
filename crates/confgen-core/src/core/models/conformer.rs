use nalgebra::Point3;
use std::fmt;

/// Identifier of a conformer, assigned in acceptance order at embedding time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ConformerId(pub u32);

impl fmt::Display for ConformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One 3D arrangement of a molecule's atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    id: ConformerId,
    positions: Vec<Point3<f64>>,
    energy: Option<f64>,
}

impl Conformer {
    pub fn new(id: ConformerId, positions: Vec<Point3<f64>>) -> Self {
        Self {
            id,
            positions,
            energy: None,
        }
    }

    pub fn id(&self) -> ConformerId {
        self.id
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.positions
    }

    /// Force-field energy in kcal/mol, present once the conformer has been optimized.
    pub fn energy(&self) -> Option<f64> {
        self.energy
    }

    pub fn set_energy(&mut self, energy: f64) {
        self.energy = Some(energy);
    }
}
