//! Error types for cost estimation operations.
//!
//! Every failure mode of the engine is a synchronous validation error. The
//! variants map onto the policies the engine applies:
//!
//! - `NotFound`: a category code has no unit factor. Under the default
//!   policy the category contributes zero.
//! - `InvalidItem`: a record carries a negative or non-finite number. The item
//!   is skipped and counted, the batch continues.
//! - `InvalidDuration` / `InvalidRate` / `InvalidAmount`: bad projection
//!   parameters. Fatal to that single call only.
//! - `Config` / `Validation`: configuration or snapshot consistency problems,
//!   reported before any calculation starts.
//!
//! # Example
//!
//! ```rust
//! use isdc_estimator::errors::CostError;
//!
//! let err = CostError::invalid_item("item-7", "negative quantity -2 for category 'M01'");
//! assert_eq!(err.kind(), "invalid_item");
//! ```

pub mod summary;

use serde::Serialize;
use thiserror::Error;

pub use summary::{SkipSummary, SkippedItem};

/// Main error type for the estimation engine.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostError {
    /// Category code absent from the unit factor table
    #[error("unit factor not found for category '{code}'")]
    NotFound { code: String },

    /// Item carries data the calculator cannot price
    #[error("invalid item '{item_id}': {reason}")]
    InvalidItem { item_id: String, reason: String },

    /// Projection duration must be at least one year
    #[error("invalid duration: {duration} year(s), must be positive")]
    InvalidDuration { duration: i32 },

    /// Percentage rate outside the accepted range
    #[error("invalid {name} rate: {value}% (expected a finite value in (-100, 100])")]
    InvalidRate { name: String, value: f64 },

    /// Monetary amount or multiplier that is not usable
    #[error("invalid {name}: {value}")]
    InvalidAmount { name: String, value: f64 },

    /// Configuration file errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Snapshot or parameter consistency errors
    #[error("validation error: {message}")]
    Validation { message: String },
}

impl CostError {
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn invalid_item(item_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidItem {
            item_id: item_id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_rate(name: impl Into<String>, value: f64) -> Self {
        Self::InvalidRate {
            name: name.into(),
            value,
        }
    }

    pub fn invalid_amount(name: impl Into<String>, value: f64) -> Self {
        Self::InvalidAmount {
            name: name.into(),
            value,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidItem { .. } => "invalid_item",
            Self::InvalidDuration { .. } => "invalid_duration",
            Self::InvalidRate { .. } => "invalid_rate",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::Config { .. } => "config",
            Self::Validation { .. } => "validation",
        }
    }
}

/// Result alias used throughout the engine.
pub type CostResult<T> = Result<T, CostError>;
