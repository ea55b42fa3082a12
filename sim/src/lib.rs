pub mod autopilot;
pub mod error;
pub mod run;
pub mod store;
