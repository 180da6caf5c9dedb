//! Plan generation simulator: a timed, staged progress sequence that ends
//! with plan content.
//!
//! ```text
//! idle --generate--> generating --(progress >= 100, delay)--> done
//! ```
//!
//! While generating, a repeating ticker adds `progress_step` every
//! `tick_interval` until progress reaches 100. The ticker is then
//! cancelled and a one-shot `completion_delay` runs before the
//! [`PlanGenerator`] is asked for content. Both timers live on the
//! simulator's own virtual clock (see [`crate::timer`]) and are cancelled
//! by [`GenerationSimulator::teardown`], which also runs on drop.

use std::sync::Arc;
use std::time::Duration;

use crate::generator::PlanGenerator;
use crate::notify::{Notification, Notifier};
use crate::plan::PlanContent;
use crate::profile::StudentProfile;
use crate::timer::{TimerId, Timers};

/// Upper bound of the progress counter.
pub const PROGRESS_MAX: u8 = 100;

/// Timing of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorSettings {
    pub tick_interval: Duration,
    /// Progress added per tick. Zero is treated as one.
    pub progress_step: u8,
    pub completion_delay: Duration,
}

impl SimulatorSettings {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);
    pub const DEFAULT_PROGRESS_STEP: u8 = 15;
    pub const DEFAULT_COMPLETION_DELAY: Duration = Duration::from_millis(1500);

    /// Number of ticks needed to reach [`PROGRESS_MAX`].
    pub fn ticks_to_complete(&self) -> u32 {
        let step = u32::from(self.progress_step.max(1));
        u32::from(PROGRESS_MAX).div_ceil(step)
    }

    /// Virtual time from `generate` until content is produced.
    pub fn total_duration(&self) -> Duration {
        self.tick_interval * self.ticks_to_complete() + self.completion_delay
    }
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            progress_step: Self::DEFAULT_PROGRESS_STEP,
            completion_delay: Self::DEFAULT_COMPLETION_DELAY,
        }
    }
}

/// Lifecycle of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating,
    Done,
}

// ---------------------------------------------------------------------------
// Phase indicators
// ---------------------------------------------------------------------------

/// A labeled progress milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub label: &'static str,
    pub threshold: u8,
}

/// The four milestones shown while generating, in order.
pub const PHASES: [Phase; 4] = [
    Phase {
        label: "Analisando perfil",
        threshold: 30,
    },
    Phase {
        label: "Gerando metas",
        threshold: 60,
    },
    Phase {
        label: "Criando estratégias",
        threshold: 80,
    },
    Phase {
        label: "Finalizando documento",
        threshold: 100,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Waiting,
    InProgress,
    Complete,
}

impl PhaseStatus {
    /// Status of `PHASES[index]` at `progress`.
    ///
    /// A phase completes once progress passes its threshold (the last one
    /// at exactly [`PROGRESS_MAX`]) and is in progress once progress passes
    /// its predecessor's threshold. The first phase is never waiting.
    fn at(index: usize, progress: u8) -> Self {
        let threshold = PHASES[index].threshold;
        let complete = if threshold >= PROGRESS_MAX {
            progress >= PROGRESS_MAX
        } else {
            progress > threshold
        };
        if complete {
            Self::Complete
        } else if index == 0 || progress > PHASES[index - 1].threshold {
            Self::InProgress
        } else {
            Self::Waiting
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Waiting => "Aguardando",
            Self::InProgress => "Em andamento",
            Self::Complete => "Completo",
        }
    }
}

/// A phase paired with its current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseView {
    pub phase: Phase,
    pub status: PhaseStatus,
}

/// Phase statuses for a progress value.
pub fn phases_at(progress: u8) -> [PhaseView; 4] {
    std::array::from_fn(|i| PhaseView {
        phase: PHASES[i],
        status: PhaseStatus::at(i, progress),
    })
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Observable effect of advancing the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorEvent {
    /// The ticker fired; carries the new progress.
    Progress(u8),
    /// Progress reached the maximum and the ticker was cancelled.
    TickerStopped,
    /// Content was produced and the run is done.
    Completed,
}

/// Drives one simulated generation for one student profile.
pub struct GenerationSimulator {
    profile: Arc<StudentProfile>,
    generator: Arc<dyn PlanGenerator>,
    notifier: Arc<dyn Notifier>,
    settings: SimulatorSettings,
    state: GenerationState,
    progress: u8,
    timers: Timers,
    ticker: Option<TimerId>,
    completion: Option<TimerId>,
    output: Option<PlanContent>,
    torn_down: bool,
}

impl GenerationSimulator {
    pub fn new(
        profile: Arc<StudentProfile>,
        generator: Arc<dyn PlanGenerator>,
        notifier: Arc<dyn Notifier>,
        settings: SimulatorSettings,
    ) -> Self {
        Self {
            profile,
            generator,
            notifier,
            settings,
            state: GenerationState::Idle,
            progress: 0,
            timers: Timers::new(),
            ticker: None,
            completion: None,
            output: None,
            torn_down: false,
        }
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn is_generating(&self) -> bool {
        self.state == GenerationState::Generating
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn phases(&self) -> [PhaseView; 4] {
        phases_at(self.progress)
    }

    pub fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }

    pub fn profile(&self) -> &Arc<StudentProfile> {
        &self.profile
    }

    /// Content produced by the run, once done.
    pub fn output(&self) -> Option<&PlanContent> {
        self.output.as_ref()
    }

    /// Take the produced content, leaving the simulator done but empty.
    pub fn take_output(&mut self) -> Option<PlanContent> {
        self.output.take()
    }

    /// Number of timers that could still fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Virtual time until the next timer fires, if any is pending.
    pub fn until_next(&self) -> Option<Duration> {
        self.timers.until_next()
    }

    /// Start a run. Only accepted from `idle`; returns whether it started.
    pub fn generate(&mut self) -> bool {
        if self.state != GenerationState::Idle || self.torn_down {
            tracing::debug!(state = ?self.state, "generate ignored: simulator not idle");
            return false;
        }
        self.state = GenerationState::Generating;
        self.progress = 0;
        self.ticker = Some(self.timers.every(self.settings.tick_interval));
        tracing::info!(
            student = %self.profile.name,
            generator = self.generator.name(),
            "plan generation started"
        );
        true
    }

    /// Move virtual time forward by `elapsed`, firing every timer that
    /// falls due, in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SimulatorEvent> {
        let mut events = Vec::new();
        let target = self.timers.now() + elapsed;

        while let Some(id) = self.timers.pop_due(target) {
            if Some(id) == self.ticker {
                self.on_tick(&mut events);
            } else if Some(id) == self.completion {
                self.on_completion(&mut events);
            }
        }
        self.timers.settle(target);
        events
    }

    fn on_tick(&mut self, events: &mut Vec<SimulatorEvent>) {
        let step = self.settings.progress_step.max(1);
        self.progress = self.progress.saturating_add(step).min(PROGRESS_MAX);
        events.push(SimulatorEvent::Progress(self.progress));
        tracing::debug!(progress = self.progress, "generation tick");

        if self.progress >= PROGRESS_MAX {
            if let Some(ticker) = self.ticker.take() {
                self.timers.cancel(ticker);
            }
            events.push(SimulatorEvent::TickerStopped);
            self.completion = Some(self.timers.once(self.settings.completion_delay));
        }
    }

    fn on_completion(&mut self, events: &mut Vec<SimulatorEvent>) {
        self.completion = None;
        let content = self.generator.generate(&self.profile);
        self.output = Some(content);
        self.state = GenerationState::Done;
        events.push(SimulatorEvent::Completed);
        tracing::info!(
            student = %self.profile.name,
            generator = self.generator.name(),
            "plan generation completed"
        );
        self.notifier.notify(Notification::plan_generated());
    }

    /// Cancel every pending timer. Idempotent; after teardown nothing fires
    /// and `generate` is refused until [`Self::reset`].
    ///
    /// An interrupted run goes back to `idle` with zero progress. A finished
    /// run stays `done`.
    pub fn teardown(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.ticker = None;
        self.completion = None;
        if !self.torn_down && cancelled > 0 {
            tracing::debug!(cancelled, state = ?self.state, "simulator torn down with pending timers");
        }
        if self.state == GenerationState::Generating {
            self.state = GenerationState::Idle;
            self.progress = 0;
        }
        self.torn_down = true;
    }

    /// Return to `idle` with zero progress and no output.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.ticker = None;
        self.completion = None;
        self.state = GenerationState::Idle;
        self.progress = 0;
        self.output = None;
        self.torn_down = false;
    }
}

impl Drop for GenerationSimulator {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for GenerationSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationSimulator")
            .field("generator", &self.generator.name())
            .field("state", &self.state)
            .field("progress", &self.progress)
            .field("pending_timers", &self.timers.pending())
            .finish()
    }
}
