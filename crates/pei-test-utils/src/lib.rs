//! Shared test utilities for pei integration tests.
//!
//! Provides a notifier that records what it was sent, plan generators
//! with observable behavior, and canned student profiles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pei_core::generator::{PlanGenerator, TemplateGenerator};
use pei_core::notify::{Notification, Notifier};
use pei_core::plan::PlanContent;
use pei_core::profile::{Diagnosis, Grade, StudentProfile};
use pei_core::simulator::SimulatorSettings;
use pei_core::wizard::Wizard;

/// Notifier that keeps every notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.title).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(notification);
    }
}

/// Generator that delegates to the template and counts invocations.
#[derive(Debug, Clone, Default)]
pub struct CountingGenerator {
    calls: Arc<AtomicUsize>,
}

impl CountingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PlanGenerator for CountingGenerator {
    fn name(&self) -> &str {
        "counting"
    }

    fn generate(&self, profile: &StudentProfile) -> PlanContent {
        self.calls.fetch_add(1, Ordering::SeqCst);
        TemplateGenerator.generate(profile)
    }
}

/// Generator that echoes parts of the profile into the plan, so tests can
/// see which profile a run was given.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoGenerator;

impl PlanGenerator for EchoGenerator {
    fn name(&self) -> &str {
        "echo"
    }

    fn generate(&self, profile: &StudentProfile) -> PlanContent {
        PlanContent {
            academic_goals: format!("Metas para {}", profile.name),
            social_goals: profile.strengths.clone(),
            communication_goals: profile.communication_label().to_string(),
            adaptation_strategies: profile.interests.clone(),
            evaluation_methods: profile.age.clone(),
        }
    }
}

/// The profile used throughout the walkthrough tests.
pub fn sample_profile() -> StudentProfile {
    StudentProfile {
        name: "Lucas Silva".to_string(),
        age: "8".to_string(),
        grade: Some(Grade::Ano3),
        diagnosis: [Diagnosis::Asd].into_iter().collect(),
        ..Default::default()
    }
}

/// A wizard on the dashboard with default timing.
pub fn wizard_with(generator: Arc<dyn PlanGenerator>, notifier: Arc<dyn Notifier>) -> Wizard {
    Wizard::new(generator, notifier, SimulatorSettings::default())
}
