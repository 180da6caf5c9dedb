//! `pei generate`: run one profile through the wizard without a terminal UI.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use pei_core::driver::{self, DriveOutcome};
use pei_core::generator::PlanGenerator;
use pei_core::intake::IntakeForm;
use pei_core::notify::TracingNotifier;
use pei_core::plan::{PlanContent, PlanSummary, Section};
use pei_core::profile::StudentProfile;
use pei_core::simulator::{SimulatorEvent, SimulatorSettings};
use pei_core::{Transition, Trigger, Wizard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// What `--format json` prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutput<'a> {
    pub student: &'a StudentProfile,
    pub plan: &'a PlanContent,
    pub summary: PlanSummary,
}

/// Read a profile from a `.toml` or `.json` file.
pub fn load_profile(path: &Path) -> Result<StudentProfile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile at {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let profile = match extension {
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON profile {}", path.display()))?,
        "toml" => toml::from_str(&contents)
            .with_context(|| format!("failed to parse TOML profile {}", path.display()))?,
        other => bail!(
            "unsupported profile format {other:?} for {} (expected .toml or .json)",
            path.display()
        ),
    };
    Ok(profile)
}

/// Drive a profile from intake to a finalized plan in real time.
///
/// Returns the wizard parked on the completion step.
pub async fn generate_plan(
    profile: StudentProfile,
    generator: Arc<dyn PlanGenerator>,
    settings: SimulatorSettings,
    cancel: &CancellationToken,
    mut on_progress: impl FnMut(u8),
) -> Result<Wizard> {
    let mut wizard = Wizard::new(generator, Arc::new(TracingNotifier), settings);
    wizard.dispatch(Trigger::CreateNew);
    if let Some(form) = wizard.intake_mut() {
        *form = IntakeForm::prefilled(profile);
    }

    match wizard.dispatch(Trigger::Submit) {
        Transition::Moved { .. } => {}
        Transition::Invalid(err) => return Err(err).context("profile rejected"),
        Transition::Ignored => bail!("wizard did not accept the profile"),
    }

    let editor = wizard
        .editor_mut()
        .context("generation step not active after submit")?;
    editor.generate();
    let outcome = driver::drive(editor, cancel, |event, _| {
        if let SimulatorEvent::Progress(p) = event {
            on_progress(p);
        }
    })
    .await;

    match outcome {
        DriveOutcome::Completed => {}
        DriveOutcome::Cancelled => bail!("generation cancelled"),
        DriveOutcome::Idle => bail!("generation did not start"),
    }

    match wizard.dispatch(Trigger::Finalize) {
        Transition::Moved { .. } => Ok(wizard),
        _ => bail!("generated plan could not be finalized"),
    }
}

/// Plain-text rendering of a finalized plan.
pub fn render_text(profile: &StudentProfile, plan: &PlanContent) -> String {
    let mut out = String::new();
    let grade = profile.grade.map(|g| g.label()).unwrap_or("-");
    let _ = writeln!(out, "PEI: {} ({} anos, {grade})", profile.name, profile.age);
    if let Some(date) = profile.birth_date_parsed() {
        let _ = writeln!(out, "Nascimento: {}", date.format("%d/%m/%Y"));
    }
    for section in Section::ALL {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", section.title());
        let _ = writeln!(out, "{}", plan.section(section));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total de metas: {}", plan.summary().total_goals);
    out
}

/// Execute `pei generate`.
pub async fn run_generate(
    path: &Path,
    format: OutputFormat,
    generator: Arc<dyn PlanGenerator>,
    settings: SimulatorSettings,
) -> Result<()> {
    let profile = load_profile(path)?;

    // First signal cancels, second force-exits.
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let got_first_signal = Arc::new(AtomicBool::new(false));
    tokio::spawn(async move {
        loop {
            tokio::signal::ctrl_c().await.ok();
            if got_first_signal.swap(true, Ordering::SeqCst) {
                eprintln!("\nForce exit.");
                std::process::exit(130);
            }
            eprintln!("\nCancelling generation (Ctrl+C again to force)...");
            cancel_clone.cancel();
        }
    });

    let wizard = generate_plan(profile, generator, settings, &cancel, |p| {
        eprintln!("Gerando PEI personalizado... {p}%");
    })
    .await?;

    let (Some(student), Some(plan)) = (wizard.profile(), wizard.plan()) else {
        bail!("wizard finished without a plan");
    };
    match format {
        OutputFormat::Json => {
            let output = GenerateOutput {
                student,
                plan,
                summary: plan.summary(),
            };
            let json = serde_json::to_string_pretty(&output).context("failed to encode plan")?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{}", render_text(student, plan)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pei_core::generator::TemplateGenerator;
    use pei_core::profile::Grade;
    use std::time::Duration;

    fn fast() -> SimulatorSettings {
        SimulatorSettings {
            tick_interval: Duration::from_millis(1),
            progress_step: 50,
            completion_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn load_profile_by_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let toml_path = tmp.path().join("aluno.toml");
        std::fs::write(&toml_path, "name = \"Ana\"\nage = \"6\"\ngrade = \"1ano\"\n").unwrap();
        let json_path = tmp.path().join("aluno.json");
        std::fs::write(&json_path, r#"{"name":"Ana","age":"6","grade":"1ano"}"#).unwrap();

        let a = load_profile(&toml_path).unwrap();
        let b = load_profile(&json_path).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.grade, Some(Grade::Ano1));
    }

    #[test]
    fn load_profile_rejects_unknown_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("aluno.yaml");
        std::fs::write(&path, "name: Ana").unwrap();
        let err = load_profile(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported profile format"));
    }

    #[tokio::test(start_paused = true)]
    async fn generate_plan_finalizes() {
        let profile = StudentProfile {
            name: "Ana".into(),
            age: "6".into(),
            grade: Some(Grade::Ano1),
            ..Default::default()
        };
        let mut seen = Vec::new();
        let wizard = generate_plan(
            profile,
            Arc::new(TemplateGenerator),
            fast(),
            &CancellationToken::new(),
            |p| seen.push(p),
        )
        .await
        .unwrap();

        assert_eq!(seen, vec![50, 100]);
        assert!(wizard.plan().is_some_and(PlanContent::is_complete));
        assert_eq!(wizard.dashboard().active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn generate_plan_rejects_incomplete_profile() {
        let err = generate_plan(
            StudentProfile::default(),
            Arc::new(TemplateGenerator),
            fast(),
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap_err();
        assert!(format!("{err:#}").contains("missing required fields: name, age, grade"));
    }

    #[test]
    fn text_output_lists_every_section() {
        let profile = StudentProfile {
            name: "Ana".into(),
            age: "6".into(),
            grade: Some(Grade::Ano1),
            ..Default::default()
        };
        let plan = TemplateGenerator.generate(&profile);
        let text = render_text(&profile, &plan);
        for section in Section::ALL {
            assert!(text.contains(section.title()), "missing {section}");
        }
        assert!(text.ends_with("Total de metas: 15\n"));
        assert!(!text.contains("Nascimento"));
    }

    #[test]
    fn text_output_shows_birth_date_when_parseable() {
        let mut profile = StudentProfile {
            name: "Ana".into(),
            age: "6".into(),
            grade: Some(Grade::Ano1),
            birth_date: "2017-05-03".into(),
            ..Default::default()
        };
        let plan = TemplateGenerator.generate(&profile);
        let text = render_text(&profile, &plan);
        assert!(text.contains("\nNascimento: 03/05/2017\n"));

        profile.birth_date = "maio de 2017".into();
        assert!(!render_text(&profile, &plan).contains("Nascimento"));
    }
}
