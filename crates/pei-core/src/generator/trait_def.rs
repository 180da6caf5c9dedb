//! The `PlanGenerator` trait -- the strategy interface behind the
//! simulated generation step.
//!
//! The simulator only decides *when* content appears; what the content is
//! comes from an implementor of this trait. Swapping in a real backend
//! means adding another implementor, not touching the state machine.

use crate::plan::PlanContent;
use crate::profile::StudentProfile;

/// Strategy producing plan content for a student.
///
/// Implementations must accept any profile, including one with only the
/// required fields filled, and return content for all five sections.
///
/// # Object Safety
///
/// The trait is object-safe and is shared as `Arc<dyn PlanGenerator>`
/// between the registry and every simulator built from it.
pub trait PlanGenerator: Send + Sync {
    /// Registry key for this strategy (e.g. "template").
    fn name(&self) -> &str;

    /// Produce plan content for `profile`.
    fn generate(&self, profile: &StudentProfile) -> PlanContent;
}

// Compile-time assertion: PlanGenerator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanGenerator) {}
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Section;

    /// Echoes the student's name into every section.
    struct EchoGenerator;

    impl PlanGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        fn generate(&self, profile: &StudentProfile) -> PlanContent {
            let mut content = PlanContent::default();
            for section in Section::ALL {
                content.set_section(section, format!("1. {}", profile.name));
            }
            content
        }
    }

    #[test]
    fn generator_is_object_safe() {
        let generator: Box<dyn PlanGenerator> = Box::new(EchoGenerator);
        assert_eq!(generator.name(), "echo");
    }

    #[test]
    fn generator_accepts_empty_profile() {
        let generator: Box<dyn PlanGenerator> = Box::new(EchoGenerator);
        let content = generator.generate(&StudentProfile::default());
        assert_eq!(content.academic_goals, "1. ");
    }
}
