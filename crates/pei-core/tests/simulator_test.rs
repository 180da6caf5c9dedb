//! Integration tests for the generation simulator's timing and teardown.

use std::sync::Arc;
use std::time::Duration;

use pei_core::generator::TemplateGenerator;
use pei_core::simulator::{
    GenerationSimulator, GenerationState, PhaseStatus, SimulatorEvent, SimulatorSettings,
};
use pei_test_utils::{CountingGenerator, RecordingNotifier, sample_profile};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn simulator_with(
    generator: &CountingGenerator,
    notifier: &RecordingNotifier,
    settings: SimulatorSettings,
) -> GenerationSimulator {
    GenerationSimulator::new(
        Arc::new(sample_profile()),
        Arc::new(generator.clone()),
        Arc::new(notifier.clone()),
        settings,
    )
}

fn progress_values(events: &[SimulatorEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            SimulatorEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

// ===========================================================================
// Timing
// ===========================================================================

#[test]
fn default_sequence_and_single_payload() {
    let generator = CountingGenerator::new();
    let notifier = RecordingNotifier::new();
    let mut sim = simulator_with(&generator, &notifier, SimulatorSettings::default());
    assert!(sim.generate());

    let events = sim.advance(ms(3500));
    assert_eq!(progress_values(&events), vec![15, 30, 45, 60, 75, 90, 100]);
    assert_eq!(events.last(), Some(&SimulatorEvent::TickerStopped));
    assert_eq!(sim.state(), GenerationState::Generating);
    assert_eq!(sim.pending_timers(), 1);

    assert!(sim.advance(ms(1499)).is_empty());
    assert_eq!(generator.calls(), 0);

    assert_eq!(sim.advance(ms(1)), vec![SimulatorEvent::Completed]);
    assert_eq!(sim.state(), GenerationState::Done);
    assert!(sim.output().is_some_and(|c| c.is_complete()));
    assert_eq!(generator.calls(), 1);
    assert_eq!(notifier.titles(), vec!["PEI Gerado com Sucesso"]);

    // Nothing fires after completion.
    assert!(sim.advance(ms(60_000)).is_empty());
    assert_eq!(generator.calls(), 1);
    assert_eq!(sim.pending_timers(), 0);
}

#[test]
fn small_steps_match_one_large_step() {
    let generator = CountingGenerator::new();
    let notifier = RecordingNotifier::new();
    let mut sim = simulator_with(&generator, &notifier, SimulatorSettings::default());
    sim.generate();

    let mut events = Vec::new();
    for _ in 0..50 {
        events.extend(sim.advance(ms(100)));
    }
    assert_eq!(progress_values(&events), vec![15, 30, 45, 60, 75, 90, 100]);
    assert_eq!(events.last(), Some(&SimulatorEvent::Completed));
    assert_eq!(generator.calls(), 1);
}

#[test]
fn progress_is_monotonic_and_bounded() {
    let generator = CountingGenerator::new();
    let notifier = RecordingNotifier::new();
    let settings = SimulatorSettings {
        progress_step: 40,
        ..Default::default()
    };
    let mut sim = simulator_with(&generator, &notifier, settings);
    sim.generate();

    let values = progress_values(&sim.advance(settings.total_duration()));
    assert_eq!(values, vec![40, 80, 100]);
    assert!(values.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn phases_track_progress() {
    let generator = CountingGenerator::new();
    let notifier = RecordingNotifier::new();
    let mut sim = simulator_with(&generator, &notifier, SimulatorSettings::default());
    sim.generate();

    sim.advance(ms(1500));
    assert_eq!(sim.progress(), 45);
    let statuses = sim.phases().map(|p| p.status);
    assert_eq!(
        statuses,
        [
            PhaseStatus::Complete,
            PhaseStatus::InProgress,
            PhaseStatus::Waiting,
            PhaseStatus::Waiting
        ]
    );
    assert_eq!(sim.phases()[1].phase.label, "Gerando metas");
}

// ===========================================================================
// Re-entrancy and teardown
// ===========================================================================

#[test]
fn generate_while_generating_is_a_no_op() {
    let generator = CountingGenerator::new();
    let notifier = RecordingNotifier::new();
    let mut sim = simulator_with(&generator, &notifier, SimulatorSettings::default());

    assert!(sim.generate());
    sim.advance(ms(1000));
    assert!(!sim.generate());
    assert_eq!(sim.progress(), 30);
    assert_eq!(sim.pending_timers(), 1);

    sim.advance(ms(10_000));
    assert!(!sim.generate());
    assert_eq!(generator.calls(), 1);
}

#[test]
fn teardown_before_completion_suppresses_payload() {
    let generator = CountingGenerator::new();
    let notifier = RecordingNotifier::new();
    let mut sim = simulator_with(&generator, &notifier, SimulatorSettings::default());
    sim.generate();
    sim.advance(ms(4000));
    assert_eq!(sim.pending_timers(), 1);

    sim.teardown();
    sim.teardown();
    assert_eq!(sim.pending_timers(), 0);
    assert!(sim.advance(ms(60_000)).is_empty());
    assert_eq!(generator.calls(), 0);
    assert!(notifier.notifications().is_empty());
}

#[test]
fn dropping_mid_run_cancels_timers() {
    let generator = CountingGenerator::new();
    let notifier = RecordingNotifier::new();
    {
        let mut sim = simulator_with(&generator, &notifier, SimulatorSettings::default());
        sim.generate();
        sim.advance(ms(700));
    }
    assert_eq!(generator.calls(), 0);
    assert!(notifier.notifications().is_empty());
}

#[test]
fn template_output_ignores_profile() {
    let notifier = RecordingNotifier::new();
    let mut a = GenerationSimulator::new(
        Arc::new(sample_profile()),
        Arc::new(TemplateGenerator),
        Arc::new(notifier.clone()),
        SimulatorSettings::default(),
    );
    let mut b = GenerationSimulator::new(
        Arc::new(Default::default()),
        Arc::new(TemplateGenerator),
        Arc::new(notifier),
        SimulatorSettings::default(),
    );
    for sim in [&mut a, &mut b] {
        sim.generate();
        sim.advance(ms(5000));
    }
    assert_eq!(a.output(), b.output());
}
