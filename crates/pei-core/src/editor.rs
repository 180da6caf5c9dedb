//! Plan editor: the generation screen's controller.
//!
//! Wraps a [`GenerationSimulator`] together with the live, user-editable
//! [`PlanContent`]. The editor decides which of its three views is shown
//! and which actions are available in each.

use std::sync::Arc;
use std::time::Duration;

use crate::generator::PlanGenerator;
use crate::notify::Notifier;
use crate::plan::{PlanContent, Section};
use crate::profile::StudentProfile;
use crate::simulator::{
    GenerationSimulator, GenerationState, PhaseView, SimulatorEvent, SimulatorSettings,
};

/// What the generation screen is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorView {
    /// Nothing generated yet: profile summary and a generate trigger.
    Prompt,
    /// Simulation running: progress bar and phase indicators.
    Progress,
    /// Content available: one editable region per section.
    Editing,
}

#[derive(Debug)]
pub struct PlanEditor {
    simulator: GenerationSimulator,
    content: PlanContent,
    tab: Section,
}

impl PlanEditor {
    pub fn new(
        profile: Arc<StudentProfile>,
        generator: Arc<dyn PlanGenerator>,
        notifier: Arc<dyn Notifier>,
        settings: SimulatorSettings,
    ) -> Self {
        Self {
            simulator: GenerationSimulator::new(profile, generator, notifier, settings),
            content: PlanContent::default(),
            tab: Section::Academic,
        }
    }

    pub fn profile(&self) -> &StudentProfile {
        self.simulator.profile()
    }

    pub fn simulator(&self) -> &GenerationSimulator {
        &self.simulator
    }

    pub fn content(&self) -> &PlanContent {
        &self.content
    }

    pub fn view(&self) -> EditorView {
        if self.simulator.is_generating() {
            EditorView::Progress
        } else if self.content.is_unset() && self.simulator.state() == GenerationState::Idle {
            EditorView::Prompt
        } else {
            EditorView::Editing
        }
    }

    pub fn progress(&self) -> u8 {
        self.simulator.progress()
    }

    pub fn phases(&self) -> [PhaseView; 4] {
        self.simulator.phases()
    }

    /// Start generation. A no-op unless the simulator is idle.
    pub fn generate(&mut self) -> bool {
        self.simulator.generate()
    }

    /// Advance the simulator; when it completes, its output replaces the
    /// content in one step.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SimulatorEvent> {
        let events = self.simulator.advance(elapsed);
        if events.contains(&SimulatorEvent::Completed) {
            if let Some(content) = self.simulator.take_output() {
                self.content = content;
            }
        }
        events
    }

    pub fn until_next(&self) -> Option<Duration> {
        self.simulator.until_next()
    }

    /// Replace a section's full text. Only allowed in the editing view.
    pub fn edit(&mut self, section: Section, text: impl Into<String>) -> bool {
        if self.view() != EditorView::Editing {
            return false;
        }
        self.content.set_section(section, text);
        true
    }

    pub fn tab(&self) -> Section {
        self.tab
    }

    pub fn select_tab(&mut self, section: Section) {
        self.tab = section;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
    }

    pub fn can_go_back(&self) -> bool {
        !self.simulator.is_generating()
    }

    pub fn can_finalize(&self) -> bool {
        !self.simulator.is_generating() && !self.content.academic_goals.is_empty()
    }

    /// The live (possibly edited) content, when finalizing is allowed.
    pub fn finalize(&self) -> Option<PlanContent> {
        self.can_finalize().then(|| self.content.clone())
    }

    /// Cancel the simulator's timers.
    pub fn teardown(&mut self) {
        self.simulator.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TemplateGenerator;
    use crate::notify::TracingNotifier;
    use crate::profile::Grade;

    fn editor() -> PlanEditor {
        let profile = StudentProfile {
            name: "Ana Oliveira".into(),
            age: "6".into(),
            grade: Some(Grade::Ano1),
            ..Default::default()
        };
        PlanEditor::new(
            Arc::new(profile),
            Arc::new(TemplateGenerator),
            Arc::new(TracingNotifier),
            SimulatorSettings::default(),
        )
    }

    fn run_to_completion(editor: &mut PlanEditor) {
        editor.generate();
        editor.advance(editor.simulator().settings().total_duration());
    }

    #[test]
    fn views_follow_generation() {
        let mut editor = editor();
        assert_eq!(editor.view(), EditorView::Prompt);

        editor.generate();
        assert_eq!(editor.view(), EditorView::Progress);
        assert!(!editor.can_go_back());
        assert!(!editor.can_finalize());

        editor.advance(Duration::from_secs(10));
        assert_eq!(editor.view(), EditorView::Editing);
        assert!(editor.can_go_back());
        assert!(editor.can_finalize());
    }

    #[test]
    fn content_appears_all_at_once() {
        let mut editor = editor();
        editor.generate();
        editor.advance(Duration::from_millis(3500));
        assert!(editor.content().is_unset());

        editor.advance(Duration::from_millis(1499));
        assert!(editor.content().is_unset());

        editor.advance(Duration::from_millis(1));
        assert!(editor.content().is_complete());
    }

    #[test]
    fn edits_are_rejected_before_content_exists() {
        let mut editor = editor();
        assert!(!editor.edit(Section::Social, "cedo demais"));
        editor.generate();
        assert!(!editor.edit(Section::Social, "cedo demais"));
        assert!(editor.content().social_goals.is_empty());
    }

    #[test]
    fn finalize_returns_edited_content() {
        let mut editor = editor();
        run_to_completion(&mut editor);

        assert!(editor.edit(Section::Evaluation, "1. Observação"));
        let plan = editor.finalize().unwrap();
        assert_eq!(plan.evaluation_methods, "1. Observação");
        assert_eq!(plan.social_goals, editor.content().social_goals);
    }

    #[test]
    fn clearing_academic_goals_blocks_finalize() {
        let mut editor = editor();
        run_to_completion(&mut editor);

        editor.edit(Section::Academic, "");
        assert!(!editor.can_finalize());
        assert_eq!(editor.finalize(), None);
        assert_eq!(editor.view(), EditorView::Editing);
    }

    #[test]
    fn clearing_every_section_stays_in_editing() {
        let mut editor = editor();
        run_to_completion(&mut editor);
        for section in Section::ALL {
            editor.edit(section, "");
        }
        assert!(editor.content().is_unset());
        assert_eq!(editor.view(), EditorView::Editing);
    }

    #[test]
    fn tabs_cycle_through_sections() {
        let mut editor = editor();
        assert_eq!(editor.tab(), Section::Academic);
        editor.prev_tab();
        assert_eq!(editor.tab(), Section::Evaluation);
        editor.next_tab();
        editor.next_tab();
        assert_eq!(editor.tab(), Section::Social);
        editor.select_tab(Section::Strategies);
        assert_eq!(editor.tab(), Section::Strategies);
    }
}
