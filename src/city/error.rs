//! Failures raised while validating input or composing a city.

/// Everything that can stop a city from being composed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CityError {
    #[error("city grid has no tiles")]
    EmptyGrid,
    #[error("city grid row {row} has {found} tiles, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid city configuration: {0}")]
    InvalidConfig(String),
    #[error("unknown tile code {code:?} at row {row}, column {col}")]
    UnclassifiableTile { row: usize, col: usize, code: String },
    #[error("cannot place {requested} vehicles, only {eligible} drivable tiles are free")]
    UnsatisfiableDemand { requested: usize, eligible: usize },
}

impl CityError {
    /// True for the malformed-input family (grid shape or config values).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CityError::EmptyGrid | CityError::RaggedGrid { .. } | CityError::InvalidConfig(_)
        )
    }
}
