use crate::core::models::element::Element;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const BUILTIN_PARAMS: &str = include_str!("../../../data/forcefield/dreiding.toml");
const BUILTIN_ORIGIN: &str = "<builtin dreiding.toml>";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VdwParam {
    pub radius: f64,
    pub well_depth: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TorsionParam {
    pub barrier: f64,
    pub periodicity: u32,
    /// Phase offset in degrees.
    pub phase: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TorsionTable {
    pub sp3_sp3: TorsionParam,
    pub sp2_sp3: TorsionParam,
    pub sp2_sp2_single: TorsionParam,
    pub sp2_sp2_double: TorsionParam,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GlobalParams {
    /// Stretch constant of a single bond; multiplied by the bond order.
    pub bond_force_constant: f64,
    pub angle_force_constant: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Forcefield {
    pub globals: GlobalParams,
    pub torsions: TorsionTable,
    pub vdw: HashMap<String, VdwParam>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid parameter in '{path}': {message}")]
    Invalid { path: String, message: String },
}

impl Forcefield {
    /// The parameter set compiled into the library.
    pub fn builtin() -> Result<Self, ParamLoadError> {
        Self::parse(BUILTIN_PARAMS, BUILTIN_ORIGIN)
    }

    /// Loads a complete parameter set from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let origin = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: origin.clone(),
            source: e,
        })?;
        Self::parse(&content, &origin)
    }

    pub fn vdw(&self, element: Element) -> Option<&VdwParam> {
        self.vdw.get(element.symbol())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ParamLoadError> {
        let forcefield: Self = toml::from_str(content).map_err(|e| ParamLoadError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        forcefield.validate().map_err(|message| ParamLoadError::Invalid {
            path: origin.to_string(),
            message,
        })?;
        Ok(forcefield)
    }

    fn validate(&self) -> Result<(), String> {
        if self.globals.bond_force_constant < 0.0 || self.globals.angle_force_constant < 0.0 {
            return Err("force constants must not be negative".to_string());
        }
        let torsions = [
            ("sp3_sp3", &self.torsions.sp3_sp3),
            ("sp2_sp3", &self.torsions.sp2_sp3),
            ("sp2_sp2_single", &self.torsions.sp2_sp2_single),
            ("sp2_sp2_double", &self.torsions.sp2_sp2_double),
        ];
        for (name, torsion) in torsions {
            if torsion.periodicity == 0 {
                return Err(format!("torsion '{name}' has zero periodicity"));
            }
        }
        for (symbol, param) in &self.vdw {
            if param.radius <= 0.0 || param.well_depth < 0.0 {
                return Err(format!(
                    "vdw parameters for '{symbol}' must have a positive radius and non-negative well depth"
                ));
            }
        }
        Ok(())
    }
}
