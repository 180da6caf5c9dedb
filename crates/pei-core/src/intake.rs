//! Intake form controller: collects and validates a [`StudentProfile`].
//!
//! The controller owns a mutable draft. Field updates never fail;
//! submission checks only that `name`, `age` and `grade` are present.

use std::fmt;

use crate::profile::{
    CommunicationStyle, Diagnosis, Grade, RequiredField, StudentProfile, TextField,
};

/// Errors from submitting the intake form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("missing required fields: {}", FieldList(.fields))]
    MissingRequired { fields: Vec<RequiredField> },
}

struct FieldList<'a>(&'a [RequiredField]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

/// Single-select fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectField {
    Grade,
    CommunicationStyle,
}

impl SelectField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Grade => "Série/Ano Escolar*",
            Self::CommunicationStyle => "Estilo de Comunicação",
        }
    }
}

/// Draft-holding controller behind the intake screen.
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    draft: StudentProfile,
}

impl IntakeForm {
    /// An empty draft, as when the intake screen first mounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft starting from an existing profile.
    pub fn prefilled(profile: StudentProfile) -> Self {
        Self { draft: profile }
    }

    pub fn draft(&self) -> &StudentProfile {
        &self.draft
    }

    /// Replace the value of a text field.
    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        *self.draft.text_mut(field) = value.into();
    }

    pub fn set_grade(&mut self, grade: Option<Grade>) {
        self.draft.grade = grade;
    }

    pub fn set_communication_style(&mut self, style: Option<CommunicationStyle>) {
        self.draft.communication_style = style;
    }

    /// Set whether `code` is part of the diagnosis set.
    ///
    /// Returns `true` when membership actually changed.
    pub fn toggle_diagnosis(&mut self, code: Diagnosis, checked: bool) -> bool {
        if checked {
            self.draft.diagnosis.insert(code)
        } else {
            self.draft.diagnosis.remove(&code)
        }
    }

    /// Validate the draft and hand back the completed profile.
    ///
    /// On failure the draft is left untouched so the user can fix it.
    pub fn submit(&self) -> Result<StudentProfile, IntakeError> {
        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            return Err(IntakeError::MissingRequired { fields: missing });
        }
        Ok(self.draft.clone())
    }
}
