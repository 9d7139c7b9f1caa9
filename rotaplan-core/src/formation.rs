//! Formation and position definitions

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// Field sizes with a built-in formation
pub const FIELD_SIZES: [usize; 5] = [5, 6, 7, 9, 11];

/// Role of a position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Keeper,
    Defensive,
    Offensive,
}

/// Classify a position name into its role.
///
/// "Keeper" is the goalkeeper; names containing "Back" are defensive;
/// everything else counts as offensive.
pub fn classify(position: &str) -> Role {
    if position == "Keeper" {
        Role::Keeper
    } else if position.contains("Back") {
        Role::Defensive
    } else {
        Role::Offensive
    }
}

// ============================================================================
// FORMATION CATALOG
// ============================================================================

const FIVE: [&str; 5] = [
    "Keeper",
    "Left Back",
    "Right Back",
    "Left Forward",
    "Right Forward",
];

const SIX: [&str; 6] = [
    "Keeper",
    "Left Back",
    "Right Back",
    "Center Midfield",
    "Left Forward",
    "Right Forward",
];

const SEVEN: [&str; 7] = [
    "Keeper",
    "Left Back",
    "Center Back",
    "Right Back",
    "Left Forward",
    "Center Forward",
    "Right Forward",
];

const NINE: [&str; 9] = [
    "Keeper",
    "Left Back",
    "Center Back",
    "Right Back",
    "Left Midfield",
    "Right Midfield",
    "Left Forward",
    "Center Forward",
    "Right Forward",
];

const ELEVEN: [&str; 11] = [
    "Keeper",
    "Left Back",
    "Left Center Back",
    "Right Center Back",
    "Right Back",
    "Left Midfield",
    "Center Midfield",
    "Right Midfield",
    "Left Forward",
    "Center Forward",
    "Right Forward",
];

// ============================================================================
// FORMATION
// ============================================================================

/// An ordered, fixed-size list of unique position names for one field size
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Formation {
    pub name: String,
    positions: Vec<String>,
}

impl Formation {
    /// Build a formation from an explicit position list
    pub fn custom(name: &str, positions: Vec<String>) -> Result<Self, GenerateError> {
        if positions.is_empty() {
            return Err(GenerateError::EmptyFormation);
        }
        for (i, position) in positions.iter().enumerate() {
            if positions[..i].contains(position) {
                return Err(GenerateError::DuplicatePosition(position.clone()));
            }
        }
        Ok(Self {
            name: name.to_string(),
            positions,
        })
    }

    /// Built-in formation for a supported field size (5/6/7/9/11)
    pub fn for_field_size(field_size: usize) -> Option<Self> {
        let (name, positions): (&str, &[&str]) = match field_size {
            5 => ("5-a-side", &FIVE),
            6 => ("6-a-side", &SIX),
            7 => ("7-a-side", &SEVEN),
            9 => ("9-a-side", &NINE),
            11 => ("11-a-side", &ELEVEN),
            _ => return None,
        };

        Some(Self {
            name: name.to_string(),
            positions: positions.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// Players on the field per quarter
    pub fn field_size(&self) -> usize {
        self.positions.len()
    }

    /// Position names in formation order
    pub fn positions(&self) -> &[String] {
        &self.positions
    }

    /// Index of the keeper position, if the formation has one
    pub fn keeper_index(&self) -> Option<usize> {
        self.positions.iter().position(|p| classify(p) == Role::Keeper)
    }

    /// Role of the position at `index`
    pub fn role_of(&self, index: usize) -> Role {
        classify(&self.positions[index])
    }
}

// ============================================================================
// TESTS
// ============================================================================
