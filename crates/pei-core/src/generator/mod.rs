//! Plan generation strategies.
//!
//! This module defines the [`PlanGenerator`] trait that turns a student
//! profile into plan content, the bundled [`TemplateGenerator`], and the
//! [`GeneratorRegistry`] used to pick a strategy by name at runtime.
//!
//! # Architecture
//!
//! ```text
//! GenerationSimulator
//!     |  (completion delay elapsed)
//!     v
//! GeneratorRegistry --get("template")--> Arc<dyn PlanGenerator>
//!                                             |
//!                                   generate(&StudentProfile)
//!                                             |
//!                                             v
//!                                        PlanContent
//! ```

pub mod registry;
pub mod template;
pub mod trait_def;

pub use registry::{GeneratorError, GeneratorRegistry};
pub use template::TemplateGenerator;
pub use trait_def::PlanGenerator;
