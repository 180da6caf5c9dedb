//! Core library for the PEI wizard: student intake, simulated plan
//! generation, plan editing and the wizard state machine tying them
//! together. Nothing here draws to a screen.

pub mod dashboard;
pub mod driver;
pub mod editor;
pub mod generator;
pub mod intake;
pub mod notify;
pub mod plan;
pub mod profile;
pub mod simulator;
pub mod timer;
pub mod wizard;

pub use wizard::{Step, Transition, Trigger, Wizard};
