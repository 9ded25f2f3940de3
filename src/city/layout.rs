//! Built-in 16x16 downtown layout.
//!
//! Codes: `R` house, `L` skyscraper, `S` store, `M` mid-rise, `H`/`V` straight
//! roads, `I` intersection, `C` corner, `T` T-junction, blank for an empty lot.

use bevy::prelude::*;

use crate::city::grid::CityGrid;

#[rustfmt::skip]
pub const REFERENCE_LAYOUT: [[&str; 16]; 16] = [
    ["C", "H", "H", "I", "H", "H", "C", "", "", "", "", "", "", "", "", ""],
    ["V", "R", "", "V", "L", "", "V", "", "", "R", "S", "", "M", "S", "", ""],
    ["V", "", "", "V", "", "", "V", "", "", "", "", "M", "", "M", "", ""],
    ["I", "H", "H", "C", "", "", "C", "H", "I", "H", "H", "I", "H", "H", "C", ""],
    ["V", "L", "", "L", "", "R", "M", "", "V", "R", "", "V", "", "", "V", ""],
    ["V", "S", "", "", "L", "", "", "R", "I", "", "", "I", "", "", "V", ""],
    ["C", "H", "H", "H", "C", "", "", "M", "V", "", "S", "V", "L", "", "V", ""],
    ["", "", "", "", "V", "C", "H", "H", "I", "H", "H", "I", "", "M", "V", ""],
    ["", "L", "R", "", "V", "V", "", "", "", "R", "", "V", "S", "", "V", ""],
    ["", "", "M", "S", "V", "C", "H", "H", "C", "M", "", "I", "L", "", "V", ""],
    ["", "", "", "", "V", "R", "", "", "V", "", "", "V", "", "", "V", ""],
    ["", "M", "", "R", "V", "M", "S", "", "C", "H", "H", "C", "C", "H", "C", ""],
    ["C", "H", "H", "C", "C", "H", "C", "", "M", "", "", "R", "V", "", "L", ""],
    ["V", "R", "", "V", "S", "", "V", "S", "M", "", "", "", "V", "S", "", ""],
    ["V", "", "", "V", "", "", "V", "", "", "R", "", "", "V", "S", "", ""],
    ["C", "H", "H", "I", "H", "H", "I", "H", "H", "H", "H", "H", "C", "", "", ""],
];

/// Layout codes the city is composed from.
#[derive(Resource, Clone, Debug)]
pub struct CityLayout {
    pub rows: Vec<Vec<String>>,
}

impl CityLayout {
    pub fn from_codes<R, S>(rows: &[R]) -> Self
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        Self {
            rows: rows
                .iter()
                .map(|r| r.as_ref().iter().map(|c| c.as_ref().to_string()).collect())
                .collect(),
        }
    }
}

impl Default for CityLayout {
    fn default() -> Self {
        Self::from_codes(&REFERENCE_LAYOUT)
    }
}

/// The built-in layout as a grid.
pub fn reference_layout() -> CityGrid {
    CityGrid::parse(&REFERENCE_LAYOUT).expect("reference layout is rectangular and uses known codes")
}
