//! Unit factor lookup by category code.
//!
//! Codes match exactly: case-sensitive, no trimming or normalisation.
//! What happens when a code is missing is decided by
//! [`MissingUnitFactorPolicy`], never by the lookup itself.

use crate::core::UnitFactor;
use crate::errors::{CostError, CostResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the item calculator treats a category with no unit factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingUnitFactorPolicy {
    /// Log a warning and let the category contribute nothing
    #[default]
    Zero,
    /// Fail the item; the batch layer skips it
    Reject,
}

impl MissingUnitFactorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Reject => "reject",
        }
    }
}

impl std::str::FromStr for MissingUnitFactorPolicy {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(Self::Zero),
            "reject" => Ok(Self::Reject),
            other => Err(CostError::config(format!(
                "unknown missing unit factor policy '{other}' (expected 'zero' or 'reject')"
            ))),
        }
    }
}

/// Find a unit factor by exact code in a plain slice.
pub fn lookup<'a>(code: &str, table: &'a [UnitFactor]) -> CostResult<&'a UnitFactor> {
    table
        .iter()
        .find(|uf| uf.code == code)
        .ok_or_else(|| CostError::not_found(code))
}

/// Indexed unit factor table for a single project.
///
/// When the source records contain duplicate codes the first one wins;
/// snapshot validation reports the duplicates separately.
#[derive(Debug, Clone, Default)]
pub struct UnitFactorTable {
    factors: Vec<UnitFactor>,
    index: HashMap<String, usize>,
}

impl UnitFactorTable {
    pub fn new(factors: Vec<UnitFactor>) -> Self {
        let mut index = HashMap::with_capacity(factors.len());
        for (position, factor) in factors.iter().enumerate() {
            index.entry(factor.code.clone()).or_insert(position);
        }
        Self { factors, index }
    }

    pub fn lookup(&self, code: &str) -> CostResult<&UnitFactor> {
        self.index
            .get(code)
            .map(|&position| &self.factors[position])
            .ok_or_else(|| CostError::not_found(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitFactor> {
        self.factors.iter()
    }
}

impl FromIterator<UnitFactor> for UnitFactorTable {
    fn from_iter<I: IntoIterator<Item = UnitFactor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> UnitFactorTable {
        UnitFactorTable::new(vec![
            UnitFactor::new("INV1", 15.0, 8.0),
            UnitFactor::new("WST-A", 2.5, 1.0),
        ])
    }

    #[test]
    fn test_lookup_exact_match() {
        let uf = table().lookup("INV1").unwrap().clone();
        assert_eq!(uf.investment_uf, 15.0);
        assert_eq!(uf.expenses_uf, 8.0);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let err = table().lookup("inv1").unwrap_err();
        assert_eq!(err, CostError::not_found("inv1"));
    }

    #[test]
    fn test_lookup_does_not_trim() {
        assert!(table().lookup(" INV1").is_err());
    }

    #[test]
    fn test_slice_lookup_matches_table_lookup() {
        let factors = vec![UnitFactor::new("A", 1.0, 2.0)];
        assert_eq!(lookup("A", &factors).unwrap().expenses_uf, 2.0);
        assert!(matches!(lookup("B", &factors), Err(CostError::NotFound { .. })));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let table = UnitFactorTable::new(vec![
            UnitFactor::new("A", 1.0, 1.0),
            UnitFactor::new("A", 9.0, 9.0),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("A").unwrap().investment_uf, 1.0);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "reject".parse::<MissingUnitFactorPolicy>().unwrap(),
            MissingUnitFactorPolicy::Reject
        );
        assert!("ignore".parse::<MissingUnitFactorPolicy>().is_err());
        assert_eq!(MissingUnitFactorPolicy::default(), MissingUnitFactorPolicy::Zero);
    }
}
