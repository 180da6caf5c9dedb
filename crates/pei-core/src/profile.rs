//! Student profile: the intake data collected about a student.
//!
//! The enumerated fields ([`Grade`], [`Diagnosis`], [`CommunicationStyle`])
//! round-trip through their short codes (`"3ano"`, `"asd"`, `"aac"`), which
//! is also the form used by serde and by the CLI.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Error returned when a code does not name a member of a closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} code: {code:?}")]
pub struct CodeParseError {
    pub kind: &'static str,
    pub code: String,
}

impl CodeParseError {
    fn new(kind: &'static str, code: &str) -> Self {
        Self {
            kind,
            code: code.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

/// School grade, from early childhood through the ninth year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "infantil1")]
    Infantil1,
    #[serde(rename = "infantil2")]
    Infantil2,
    #[serde(rename = "1ano")]
    Ano1,
    #[serde(rename = "2ano")]
    Ano2,
    #[serde(rename = "3ano")]
    Ano3,
    #[serde(rename = "4ano")]
    Ano4,
    #[serde(rename = "5ano")]
    Ano5,
    #[serde(rename = "6ano")]
    Ano6,
    #[serde(rename = "7ano")]
    Ano7,
    #[serde(rename = "8ano")]
    Ano8,
    #[serde(rename = "9ano")]
    Ano9,
}

impl Grade {
    /// Every grade, in the order the intake form lists them.
    pub const ALL: [Grade; 11] = [
        Self::Infantil1,
        Self::Infantil2,
        Self::Ano1,
        Self::Ano2,
        Self::Ano3,
        Self::Ano4,
        Self::Ano5,
        Self::Ano6,
        Self::Ano7,
        Self::Ano8,
        Self::Ano9,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Infantil1 => "infantil1",
            Self::Infantil2 => "infantil2",
            Self::Ano1 => "1ano",
            Self::Ano2 => "2ano",
            Self::Ano3 => "3ano",
            Self::Ano4 => "4ano",
            Self::Ano5 => "5ano",
            Self::Ano6 => "6ano",
            Self::Ano7 => "7ano",
            Self::Ano8 => "8ano",
            Self::Ano9 => "9ano",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Infantil1 => "Educação Infantil 1",
            Self::Infantil2 => "Educação Infantil 2",
            Self::Ano1 => "1º Ano Fundamental",
            Self::Ano2 => "2º Ano Fundamental",
            Self::Ano3 => "3º Ano Fundamental",
            Self::Ano4 => "4º Ano Fundamental",
            Self::Ano5 => "5º Ano Fundamental",
            Self::Ano6 => "6º Ano Fundamental",
            Self::Ano7 => "7º Ano Fundamental",
            Self::Ano8 => "8º Ano Fundamental",
            Self::Ano9 => "9º Ano Fundamental",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Grade {
    type Err = CodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.code() == s)
            .ok_or_else(|| CodeParseError::new("grade", s))
    }
}

// ---------------------------------------------------------------------------
// Diagnosis
// ---------------------------------------------------------------------------

/// Diagnosis codes offered as checkboxes on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Asd,
    Adhd,
    Communication,
    Intellectual,
    Sensory,
    Anxiety,
}

impl Diagnosis {
    pub const ALL: [Diagnosis; 6] = [
        Self::Asd,
        Self::Adhd,
        Self::Communication,
        Self::Intellectual,
        Self::Sensory,
        Self::Anxiety,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Asd => "asd",
            Self::Adhd => "adhd",
            Self::Communication => "communication",
            Self::Intellectual => "intellectual",
            Self::Sensory => "sensory",
            Self::Anxiety => "anxiety",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Asd => "Transtorno do Espectro Autista (TEA)",
            Self::Adhd => "TDAH",
            Self::Communication => "Transtorno de Comunicação",
            Self::Intellectual => "Deficiência Intelectual",
            Self::Sensory => "Transtorno do Processamento Sensorial",
            Self::Anxiety => "Ansiedade",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Diagnosis {
    type Err = CodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.code() == s)
            .ok_or_else(|| CodeParseError::new("diagnosis", s))
    }
}

// ---------------------------------------------------------------------------
// CommunicationStyle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStyle {
    Verbal,
    Limited,
    Nonverbal,
    Aac,
    Mixed,
}

impl CommunicationStyle {
    pub const ALL: [CommunicationStyle; 5] = [
        Self::Verbal,
        Self::Limited,
        Self::Nonverbal,
        Self::Aac,
        Self::Mixed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Verbal => "verbal",
            Self::Limited => "limited",
            Self::Nonverbal => "nonverbal",
            Self::Aac => "aac",
            Self::Mixed => "mixed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Verbal => "Verbal fluente",
            Self::Limited => "Comunicação verbal limitada",
            Self::Nonverbal => "Não-verbal",
            Self::Aac => "Utiliza comunicação alternativa (CAA)",
            Self::Mixed => "Comunicação mista",
        }
    }
}

impl fmt::Display for CommunicationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CommunicationStyle {
    type Err = CodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| CodeParseError::new("communication style", s))
    }
}

// ---------------------------------------------------------------------------
// StudentProfile
// ---------------------------------------------------------------------------

/// Free-text fields of a [`StudentProfile`], addressable by name so the
/// form controller can update any of them through one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Age,
    BirthDate,
    Strengths,
    Challenges,
    Interests,
    GuardianName,
    GuardianContact,
    AdditionalNotes,
}

impl TextField {
    pub const ALL: [TextField; 9] = [
        Self::Name,
        Self::Age,
        Self::BirthDate,
        Self::Strengths,
        Self::Challenges,
        Self::Interests,
        Self::GuardianName,
        Self::GuardianContact,
        Self::AdditionalNotes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Nome completo*",
            Self::Age => "Idade*",
            Self::BirthDate => "Data de Nascimento",
            Self::Strengths => "Pontos Fortes",
            Self::Challenges => "Desafios",
            Self::Interests => "Interesses Específicos",
            Self::GuardianName => "Nome do Responsável",
            Self::GuardianContact => "Contato do Responsável",
            Self::AdditionalNotes => "Observações Adicionais",
        }
    }
}

/// Intake data about one student.
///
/// Only `name`, `age` and `grade` are required, and only for presence:
/// `age` is kept as the text the educator typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentProfile {
    pub name: String,
    pub age: String,
    pub grade: Option<Grade>,
    pub birth_date: String,
    pub diagnosis: BTreeSet<Diagnosis>,
    pub strengths: String,
    pub challenges: String,
    pub communication_style: Option<CommunicationStyle>,
    pub interests: String,
    pub guardian_name: String,
    pub guardian_contact: String,
    pub additional_notes: String,
}

impl StudentProfile {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::Age => &self.age,
            TextField::BirthDate => &self.birth_date,
            TextField::Strengths => &self.strengths,
            TextField::Challenges => &self.challenges,
            TextField::Interests => &self.interests,
            TextField::GuardianName => &self.guardian_name,
            TextField::GuardianContact => &self.guardian_contact,
            TextField::AdditionalNotes => &self.additional_notes,
        }
    }

    pub fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Name => &mut self.name,
            TextField::Age => &mut self.age,
            TextField::BirthDate => &mut self.birth_date,
            TextField::Strengths => &mut self.strengths,
            TextField::Challenges => &mut self.challenges,
            TextField::Interests => &mut self.interests,
            TextField::GuardianName => &mut self.guardian_name,
            TextField::GuardianContact => &mut self.guardian_contact,
            TextField::AdditionalNotes => &mut self.additional_notes,
        }
    }

    /// Required fields that are currently empty, in form order.
    pub fn missing_required(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(RequiredField::Name);
        }
        if self.age.is_empty() {
            missing.push(RequiredField::Age);
        }
        if self.grade.is_none() {
            missing.push(RequiredField::Grade);
        }
        missing
    }

    pub fn is_submittable(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Birth date parsed as `YYYY-MM-DD`, when the text happens to be one.
    pub fn birth_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d").ok()
    }

    /// Label shown for the communication style, with the form's fallback.
    pub fn communication_label(&self) -> &'static str {
        self.communication_style
            .map(CommunicationStyle::label)
            .unwrap_or("Não especificado")
    }
}

/// The three fields a profile must fill before it can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Name,
    Age,
    Grade,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Grade => "grade",
        };
        f.write_str(s)
    }
}
