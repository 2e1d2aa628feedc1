//! Time projection of the grand total: cashflow series and sensitivity
//! scenarios.

pub mod cashflow;
pub mod sensitivity;

pub use cashflow::{
    net_present_value, project, validate_duration, validate_rate, CashflowProjection,
    CashflowYear,
};
pub use sensitivity::{
    run_scenarios, RejectedScenario, ScenarioKind, SensitivityReport, SensitivityScenario,
    DEFAULT_DEFERRAL_YEARS, DEFAULT_UNIT_FACTOR_MULTIPLIERS, DEFERRAL_STORAGE_GROWTH_PER_YEAR,
    UNIT_FACTOR_NPV_HORIZON_YEARS,
};
