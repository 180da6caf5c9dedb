//! Plan content: the five long-form sections of a generated PEI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five categorized sections of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Academic,
    Social,
    Communication,
    Strategies,
    Evaluation,
}

impl Section {
    /// Sections in tab order.
    pub const ALL: [Section; 5] = [
        Self::Academic,
        Self::Social,
        Self::Communication,
        Self::Strategies,
        Self::Evaluation,
    ];

    /// Short tab label.
    pub fn tab_label(self) -> &'static str {
        match self {
            Self::Academic => "Acadêmico",
            Self::Social => "Social",
            Self::Communication => "Comunicação",
            Self::Strategies => "Adaptações",
            Self::Evaluation => "Avaliação",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Academic => "Metas Acadêmicas",
            Self::Social => "Metas Sociais",
            Self::Communication => "Metas de Comunicação",
            Self::Strategies => "Estratégias de Adaptação",
            Self::Evaluation => "Métodos de Avaliação",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Academic => {
                "Objetivos focados em aprendizagem e desenvolvimento de habilidades acadêmicas."
            }
            Self::Social => {
                "Objetivos relacionados à interação social e desenvolvimento emocional."
            }
            Self::Communication => {
                "Objetivos focados em desenvolvimento de habilidades comunicativas."
            }
            Self::Strategies => {
                "Recomendações de adaptações e suportes para o ambiente escolar."
            }
            Self::Evaluation => "Estratégias para monitorar e avaliar o progresso do aluno.",
        }
    }

    /// The section after this one, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// The section before this one, wrapping around.
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tab_label())
    }
}

/// Generated plan text, one opaque block per section.
///
/// Items inside a block are newline-delimited and conventionally numbered,
/// but nothing enforces that structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContent {
    pub academic_goals: String,
    pub social_goals: String,
    pub communication_goals: String,
    pub adaptation_strategies: String,
    pub evaluation_methods: String,
}

impl PlanContent {
    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::Academic => &self.academic_goals,
            Section::Social => &self.social_goals,
            Section::Communication => &self.communication_goals,
            Section::Strategies => &self.adaptation_strategies,
            Section::Evaluation => &self.evaluation_methods,
        }
    }

    /// Replace the full text of one section.
    pub fn set_section(&mut self, section: Section, text: impl Into<String>) {
        let slot = match section {
            Section::Academic => &mut self.academic_goals,
            Section::Social => &mut self.social_goals,
            Section::Communication => &mut self.communication_goals,
            Section::Strategies => &mut self.adaptation_strategies,
            Section::Evaluation => &mut self.evaluation_methods,
        };
        *slot = text.into();
    }

    /// `true` while no section has any text, i.e. nothing was generated yet.
    pub fn is_unset(&self) -> bool {
        Section::ALL.iter().all(|s| self.section(*s).is_empty())
    }

    /// `true` once every section has text.
    pub fn is_complete(&self) -> bool {
        Section::ALL.iter().all(|s| !self.section(*s).is_empty())
    }

    pub fn summary(&self) -> PlanSummary {
        let goal_sections = [
            &self.academic_goals,
            &self.social_goals,
            &self.communication_goals,
        ];
        PlanSummary {
            academic_highlight: first_line(&self.academic_goals).to_owned(),
            social_highlight: first_line(&self.social_goals).to_owned(),
            communication_highlight: first_line(&self.communication_goals).to_owned(),
            total_goals: goal_sections.iter().map(|s| s.split('\n').count()).sum(),
        }
    }
}

/// What the completion screen shows about a finalized plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub academic_highlight: String,
    pub social_highlight: String,
    pub communication_highlight: String,
    /// Line count across the three goal sections. An empty section still
    /// counts as one line.
    pub total_goals: usize,
}

fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlanContent {
        PlanContent {
            academic_goals: "1. Ler\n2. Contar".into(),
            social_goals: "1. Cumprimentar".into(),
            communication_goals: "1. Pedir\n2. Responder\n3. Agradecer".into(),
            adaptation_strategies: "1. Apoio visual".into(),
            evaluation_methods: "1. Portfólio".into(),
        }
    }

    #[test]
    fn default_content_is_unset() {
        let content = PlanContent::default();
        assert!(content.is_unset());
        assert!(!content.is_complete());
    }

    #[test]
    fn single_section_makes_content_set() {
        let mut content = PlanContent::default();
        content.set_section(Section::Evaluation, "x");
        assert!(!content.is_unset());
        assert!(!content.is_complete());
    }

    #[test]
    fn set_section_replaces_whole_text() {
        let mut content = sample();
        content.set_section(Section::Social, "novo texto");
        assert_eq!(content.social_goals, "novo texto");
        assert_eq!(content.section(Section::Academic), "1. Ler\n2. Contar");
    }

    #[test]
    fn summary_takes_first_lines_and_counts_goals() {
        let summary = sample().summary();
        assert_eq!(summary.academic_highlight, "1. Ler");
        assert_eq!(summary.social_highlight, "1. Cumprimentar");
        assert_eq!(summary.communication_highlight, "1. Pedir");
        assert_eq!(summary.total_goals, 6);
    }

    #[test]
    fn section_navigation_wraps() {
        assert_eq!(Section::Evaluation.next(), Section::Academic);
        assert_eq!(Section::Academic.prev(), Section::Evaluation);
        assert_eq!(Section::Social.next(), Section::Communication);
    }
}
