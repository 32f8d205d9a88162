//! Quadrature points and Dakota file exchange for wind-farm AEP uncertainty studies.

pub mod cli;
pub mod conditions;
pub mod config;
pub mod convergence;
/// Probability laws over wind speed and wind direction.
pub mod distribution;
pub mod driver;
pub mod error;
/// Dakota parameters, results and points-table files.
pub mod exchange;
pub mod io;
pub mod layout;
pub mod power;
/// Rectangle rule and driver-delegated point placement.
pub mod quadrature;
pub mod record;
pub mod statistics;

pub use error::{Result, UqError};
pub use quadrature::{Generated, Method, MethodSpec, SampleSet, UncertainVariable, generate};
