//! Odds ratios and risk ratios with small-sample confidence intervals for
//! case/control tables.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod measures;

pub use error::AssocError;
pub use measures::{
    measure, odds_ratio, relative_risk, AssociationTable, CiMethod, Level, Missing, Options,
    RatioKind,
};
