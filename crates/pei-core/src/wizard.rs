//! Wizard controller: the top-level state machine of a session.
//!
//! Enforces the transition graph:
//!
//! ```text
//! dashboard  --create new-->     intake
//! intake     --submit (valid)--> generation   (stores profile)
//! generation --back-->           intake       (plan discarded, profile kept)
//! generation --finalize-->       complete     (stores plan)
//! complete   --view dashboard--> dashboard
//! complete   --create new-->     intake       (profile and plan cleared)
//! ```
//!
//! Every other trigger is ignored. The active [`Screen`] owns the state
//! of the visible step (the intake draft, the plan editor), so a
//! generation screen cannot exist without a submitted profile.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::dashboard::{Dashboard, PlanRecord};
use crate::editor::PlanEditor;
use crate::generator::PlanGenerator;
use crate::intake::{IntakeError, IntakeForm};
use crate::notify::{Notification, Notifier};
use crate::plan::{PlanContent, PlanSummary};
use crate::profile::StudentProfile;
use crate::simulator::{SimulatorEvent, SimulatorSettings};

/// The four wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Dashboard,
    Intake,
    Generation,
    Complete,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Dashboard => "dashboard",
            Self::Intake => "intake",
            Self::Generation => "generation",
            Self::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// User actions that may move the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    CreateNew,
    Submit,
    Back,
    Finalize,
    ViewDashboard,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreateNew => "create_new",
            Self::Submit => "submit",
            Self::Back => "back",
            Self::Finalize => "finalize",
            Self::ViewDashboard => "view_dashboard",
        };
        f.write_str(s)
    }
}

/// Outcome of dispatching a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved { from: Step, to: Step },
    /// Intake submission failed validation; the wizard stays on intake.
    Invalid(IntakeError),
    /// The trigger is not valid for the current step (or its action is
    /// unavailable right now); nothing changed.
    Ignored,
}

/// State owned by the visible step.
#[derive(Debug)]
pub enum Screen {
    Dashboard,
    Intake(IntakeForm),
    Generation(PlanEditor),
    Complete,
}

impl Screen {
    pub fn step(&self) -> Step {
        match self {
            Self::Dashboard => Step::Dashboard,
            Self::Intake(_) => Step::Intake,
            Self::Generation(_) => Step::Generation,
            Self::Complete => Step::Complete,
        }
    }
}

/// One educator's session.
pub struct Wizard {
    screen: Screen,
    profile: Option<Arc<StudentProfile>>,
    plan: Option<PlanContent>,
    dashboard: Dashboard,
    generator: Arc<dyn PlanGenerator>,
    notifier: Arc<dyn Notifier>,
    settings: SimulatorSettings,
}

impl Wizard {
    /// A session starting on the dashboard with an empty plan list.
    pub fn new(
        generator: Arc<dyn PlanGenerator>,
        notifier: Arc<dyn Notifier>,
        settings: SimulatorSettings,
    ) -> Self {
        Self {
            screen: Screen::Dashboard,
            profile: None,
            plan: None,
            dashboard: Dashboard::new(),
            generator,
            notifier,
            settings,
        }
    }

    pub fn with_dashboard(mut self, dashboard: Dashboard) -> Self {
        self.dashboard = dashboard;
        self
    }

    pub fn step(&self) -> Step {
        self.screen.step()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Profile stored at the last valid submission.
    pub fn profile(&self) -> Option<&StudentProfile> {
        self.profile.as_deref()
    }

    /// Plan stored at the last finalization.
    pub fn plan(&self) -> Option<&PlanContent> {
        self.plan.as_ref()
    }

    pub fn plan_summary(&self) -> Option<PlanSummary> {
        self.plan.as_ref().map(PlanContent::summary)
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn intake(&self) -> Option<&IntakeForm> {
        match &self.screen {
            Screen::Intake(form) => Some(form),
            _ => None,
        }
    }

    pub fn intake_mut(&mut self) -> Option<&mut IntakeForm> {
        match &mut self.screen {
            Screen::Intake(form) => Some(form),
            _ => None,
        }
    }

    pub fn editor(&self) -> Option<&PlanEditor> {
        match &self.screen {
            Screen::Generation(editor) => Some(editor),
            _ => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut PlanEditor> {
        match &mut self.screen {
            Screen::Generation(editor) => Some(editor),
            _ => None,
        }
    }

    /// Advance the active editor's simulator, if the generation step is
    /// showing.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SimulatorEvent> {
        match &mut self.screen {
            Screen::Generation(editor) => editor.advance(elapsed),
            _ => Vec::new(),
        }
    }

    /// Time until the active simulator's next timer, if one is pending.
    pub fn until_next(&self) -> Option<Duration> {
        self.editor().and_then(PlanEditor::until_next)
    }

    /// Apply a trigger to the current step.
    pub fn dispatch(&mut self, trigger: Trigger) -> Transition {
        let from = self.step();
        let transition = match (from, trigger) {
            (Step::Dashboard, Trigger::CreateNew) => {
                self.screen = Screen::Intake(IntakeForm::new());
                self.moved(from)
            }
            (Step::Intake, Trigger::Submit) => self.submit_intake(),
            (Step::Generation, Trigger::Back) => self.leave_generation(),
            (Step::Generation, Trigger::Finalize) => self.finalize_plan(),
            (Step::Complete, Trigger::ViewDashboard) => {
                self.screen = Screen::Dashboard;
                self.moved(from)
            }
            (Step::Complete, Trigger::CreateNew) => {
                self.profile = None;
                self.plan = None;
                self.screen = Screen::Intake(IntakeForm::new());
                self.moved(from)
            }
            _ => Transition::Ignored,
        };

        match &transition {
            Transition::Moved { from, to } => {
                tracing::info!(%trigger, %from, %to, "wizard transition");
            }
            Transition::Invalid(err) => {
                tracing::warn!(%trigger, error = %err, "intake submission rejected");
            }
            Transition::Ignored => {
                tracing::debug!(%trigger, step = %from, "trigger ignored");
            }
        }
        transition
    }

    fn moved(&self, from: Step) -> Transition {
        Transition::Moved {
            from,
            to: self.step(),
        }
    }

    fn submit_intake(&mut self) -> Transition {
        let Screen::Intake(form) = &self.screen else {
            return Transition::Ignored;
        };
        let profile = match form.submit() {
            Ok(profile) => Arc::new(profile),
            Err(err) => {
                self.notifier.notify(Notification::missing_required());
                return Transition::Invalid(err);
            }
        };

        self.profile = Some(Arc::clone(&profile));
        self.plan = None;
        self.screen = Screen::Generation(PlanEditor::new(
            profile,
            Arc::clone(&self.generator),
            Arc::clone(&self.notifier),
            self.settings,
        ));
        self.moved(Step::Intake)
    }

    fn leave_generation(&mut self) -> Transition {
        let Screen::Generation(editor) = &mut self.screen else {
            return Transition::Ignored;
        };
        if !editor.can_go_back() {
            return Transition::Ignored;
        }
        editor.teardown();

        let draft = self
            .profile
            .as_deref()
            .cloned()
            .map(IntakeForm::prefilled)
            .unwrap_or_default();
        self.screen = Screen::Intake(draft);
        self.moved(Step::Generation)
    }

    fn finalize_plan(&mut self) -> Transition {
        let Screen::Generation(editor) = &mut self.screen else {
            return Transition::Ignored;
        };
        let Some(plan) = editor.finalize() else {
            return Transition::Ignored;
        };
        editor.teardown();

        let record = PlanRecord::new(editor.profile(), Utc::now());
        self.dashboard.record(record);
        self.plan = Some(plan);
        self.screen = Screen::Complete;
        self.notifier.notify(Notification::plan_finalized());
        self.moved(Step::Generation)
    }
}

impl fmt::Debug for Wizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wizard")
            .field("step", &self.step())
            .field("generator", &self.generator.name())
            .field("has_profile", &self.profile.is_some())
            .field("has_plan", &self.plan.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TemplateGenerator;
    use crate::notify::TracingNotifier;

    fn wizard() -> Wizard {
        Wizard::new(
            Arc::new(TemplateGenerator),
            Arc::new(TracingNotifier),
            SimulatorSettings::default(),
        )
    }

    #[test]
    fn starts_on_dashboard_without_data() {
        let wizard = wizard();
        assert_eq!(wizard.step(), Step::Dashboard);
        assert!(wizard.profile().is_none());
        assert!(wizard.plan().is_none());
        assert!(wizard.intake().is_none());
        assert!(wizard.editor().is_none());
    }

    #[test]
    fn dashboard_only_accepts_create_new() {
        for trigger in [
            Trigger::Submit,
            Trigger::Back,
            Trigger::Finalize,
            Trigger::ViewDashboard,
        ] {
            let mut wizard = wizard();
            assert_eq!(wizard.dispatch(trigger), Transition::Ignored, "{trigger}");
            assert_eq!(wizard.step(), Step::Dashboard);
        }

        let mut wizard = wizard();
        assert_eq!(
            wizard.dispatch(Trigger::CreateNew),
            Transition::Moved {
                from: Step::Dashboard,
                to: Step::Intake
            }
        );
        assert!(wizard.intake().unwrap().draft().name.is_empty());
    }

    #[test]
    fn advance_outside_generation_is_inert() {
        let mut wizard = wizard();
        assert!(wizard.advance(Duration::from_secs(5)).is_empty());
        assert_eq!(wizard.until_next(), None);
    }

    #[test]
    fn debug_does_not_dump_profile() {
        let wizard = wizard();
        let debug = format!("{wizard:?}");
        assert!(debug.contains("Dashboard"));
        assert!(debug.contains("template"));
    }
}
