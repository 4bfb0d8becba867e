use super::element::Element;
use nalgebra::Point3;

/// An atom of a molecular graph.
///
/// The position stored here is the reference geometry read from the input
/// file. Generated geometries live in [`Conformer`](super::conformer::Conformer)s
/// so the reference coordinates stay available for stereo perception.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The chemical element of the atom.
    pub element: Element,
    /// The reference coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The formal charge in elementary charge units.
    pub formal_charge: i8,
}

impl Atom {
    /// Creates a neutral atom at the given position.
    pub fn new(element: Element, position: Point3<f64>) -> Self {
        Self {
            element,
            position,
            formal_charge: 0,
        }
    }

    pub fn with_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    /// Returns `true` for every atom that is not a hydrogen isotope.
    pub fn is_heavy(&self) -> bool {
        !self.element.is_hydrogen()
    }
}
