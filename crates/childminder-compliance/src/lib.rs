//! Compliance core for a childminder agency back office.
//!
//! Two pure computations sit at the centre: [`workflows::coverage`] decides whether a
//! person's address history accounts for the trailing window the regulator requires, and
//! [`workflows::vetting`] derives a DBS compliance state, risk tier and next review date.
//! [`workflows::household`] composes them per person and across a roster.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
