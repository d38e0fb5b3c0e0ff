use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKey {
    SoftIron,
    Steel,
    CastIron,
    Ferrite,
}

impl MaterialKey {
    pub fn all() -> &'static [MaterialKey] {
        &[MaterialKey::SoftIron, MaterialKey::Steel, MaterialKey::CastIron, MaterialKey::Ferrite]
    }

    pub fn key(&self) -> &'static str {
        match self {
            MaterialKey::SoftIron => "soft_iron",
            MaterialKey::Steel => "steel",
            MaterialKey::CastIron => "cast_iron",
            MaterialKey::Ferrite => "ferrite",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            MaterialKey::SoftIron => 0,
            MaterialKey::Steel => 1,
            MaterialKey::CastIron => 2,
            MaterialKey::Ferrite => 3,
        }
    }

    pub fn next(&self) -> MaterialKey {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> MaterialKey {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }

    pub fn material(&self) -> &'static Material {
        &CATALOG[self.index()]
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MaterialKey {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialKey::all()
            .iter()
            .copied()
            .find(|k| k.key() == s)
            .ok_or_else(|| ScopeError::UnknownMaterial(s.to_string()))
    }
}

/// A specimen's loop-shaping constants.
#[derive(Debug, PartialEq)]
pub struct Material {
    pub name: &'static str,
    pub coercivity: f64,
    /// Residual flux density at zero field. Shown to the user, not used by the loop model.
    pub retentivity: f64,
    pub saturation: f64,
    pub softness: Option<f64>,
    pub color: (u8, u8, u8),
}

impl Material {
    pub fn softness(&self) -> f64 {
        self.softness.unwrap_or(1.0)
    }
}

const CATALOG: [Material; 4] = [
    Material { name: "Soft Iron", coercivity: 0.2, retentivity: 0.8, saturation: 1.0, softness: None, color: (0x4f, 0xc3, 0xf7) },
    Material { name: "Hard Steel", coercivity: 0.6, retentivity: 0.6, saturation: 0.9, softness: None, color: (0xff, 0xb7, 0x4d) },
    Material { name: "Cast Iron", coercivity: 0.5, retentivity: 0.4, saturation: 0.7, softness: None, color: (0xa1, 0x88, 0x7f) },
    Material { name: "Ferrite", coercivity: 0.1, retentivity: 0.3, saturation: 0.5, softness: None, color: (0xe5, 0x73, 0x73) },
];
