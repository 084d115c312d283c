//! HTTP surface for Calorix: prediction, health and catalog administration.
//!
//! Every endpoint that changes the catalog retrains the shared predictor
//! before it responds, so the next prediction already sees the change.

pub mod rest;
pub mod state;

pub use rest::RestApi;
pub use state::AppState;
