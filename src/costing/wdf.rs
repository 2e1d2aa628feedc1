//! Work difficulty factor adjustment.
//!
//! ```text
//! effective_workforce = basic_workforce * (100 + F1 + ... + F7) / 100
//! ```
//!
//! The formula has no on/off branch. Disabling WDF is done by the caller
//! substituting zero flags, see [`WdfSettings::effective_flags`].

use crate::core::{WdfFlags, WdfSettings, WDF_FLAG_COUNT};

/// Effective workforce after applying all seven difficulty percentages.
///
/// Flags may be negative; the result is not clamped. Zero flags return
/// `basic_workforce` bit for bit.
pub fn total_workforce(basic_workforce: f64, wdf_flags: &[f64; WDF_FLAG_COUNT]) -> f64 {
    let flag_sum: f64 = wdf_flags.iter().sum();
    basic_workforce + basic_workforce * flag_sum / 100.0
}

impl WdfSettings {
    /// Flags to feed into [`total_workforce`] for this project.
    pub fn effective_flags(&self, flags: &WdfFlags) -> [f64; WDF_FLAG_COUNT] {
        if !self.enabled {
            return [0.0; WDF_FLAG_COUNT];
        }
        flags.0.map(|flag| flag * self.global_multiplier)
    }
}
