//! Real-time driver for a [`PlanEditor`].
//!
//! The simulator only knows virtual time. This loop sleeps on the tokio
//! clock until the next timer is due, advances the editor by the time that
//! actually passed, and stops on completion or cancellation.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::editor::PlanEditor;
use crate::simulator::{GenerationState, SimulatorEvent};

/// How a driven run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// Content was produced.
    Completed,
    /// No timer was pending (generation never started or was torn down).
    Idle,
    /// The token fired first; the editor has been torn down and is no
    /// longer generating.
    Cancelled,
}

/// Drive `editor` in real time until its simulator has nothing left to do.
///
/// `on_event` is called for every simulator event, after the editor has
/// applied it.
pub async fn drive<F>(
    editor: &mut PlanEditor,
    cancel: &CancellationToken,
    mut on_event: F,
) -> DriveOutcome
where
    F: FnMut(SimulatorEvent, &PlanEditor),
{
    loop {
        let Some(wait) = editor.until_next() else {
            return if editor.simulator().state() == GenerationState::Done {
                DriveOutcome::Completed
            } else {
                DriveOutcome::Idle
            };
        };

        let started = Instant::now();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(progress = editor.progress(), "generation cancelled");
                editor.teardown();
                return DriveOutcome::Cancelled;
            }
            _ = tokio::time::sleep(wait) => {
                for event in editor.advance(started.elapsed()) {
                    on_event(event, editor);
                }
            }
        }
    }
}
