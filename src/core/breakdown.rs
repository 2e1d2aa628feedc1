use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Computed cost components for one item or one aggregation bucket.
///
/// Never a source of truth: always re-derivable from the inputs. All fields
/// aggregate by plain summation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Effective workforce hours after difficulty adjustment
    pub workforce: f64,
    pub labour: f64,
    pub investment: f64,
    pub expenses: f64,
    pub contingency: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Cost before contingency.
    pub fn direct_cost(&self) -> f64 {
        self.labour + self.investment + self.expenses
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Componentwise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let pairs = [
            (self.workforce, other.workforce),
            (self.labour, other.labour),
            (self.investment, other.investment),
            (self.expenses, other.expenses),
            (self.contingency, other.contingency),
            (self.total, other.total),
        ];
        pairs.iter().all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Add for CostBreakdown {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            workforce: self.workforce + rhs.workforce,
            labour: self.labour + rhs.labour,
            investment: self.investment + rhs.investment,
            expenses: self.expenses + rhs.expenses,
            contingency: self.contingency + rhs.contingency,
            total: self.total + rhs.total,
        }
    }
}

impl AddAssign for CostBreakdown {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for CostBreakdown {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a CostBreakdown> for CostBreakdown {
    fn sum<I: Iterator<Item = &'a CostBreakdown>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
