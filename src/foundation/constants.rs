//! Physical constants in SI units.

/// Vacuum permittivity (F/m).
pub const EPSILON_0: f64 = 8.85418782e-12;

/// Vacuum permeability (H/m).
pub const MU_0: f64 = 1.25663706e-6;

/// Speed of light in vacuum (m/s), `1 / sqrt(EPSILON_0 * MU_0)` for the values above.
pub const C_0: f64 = 299_792_458.130_996_05;

/// Elementary charge (C).
pub const Q_E: f64 = 1.602176634e-19;

#[cfg(test)]
#[path = "../../tests/unit/foundation/constants.rs"]
mod tests;
