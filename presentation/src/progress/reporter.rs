//! Progress reporting for reasoning cycles

use autologic_application::{ProgressEvent, ProgressSink};
use autologic_domain::{Stage, StageStatus};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner per stage.
///
/// EXECUTE and CRITIQUE may go active several times in one cycle; the
/// stage's spinner is reused rather than stacked.
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<Stage, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Reporter that renders nowhere (tests, piped output)
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn describe(event: &ProgressEvent) -> String {
        match &event.model_name {
            Some(model) => format!("{} {}", event.message, format!("({model})").dimmed()),
            None => event.message.clone(),
        }
    }

    fn start(&self, bars: &mut HashMap<Stage, ProgressBar>, event: &ProgressEvent) {
        let message = Self::describe(event);
        if let Some(bar) = bars.get(&event.stage)
            && !bar.is_finished()
        {
            bar.set_message(message);
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(Self::spinner_style());
        bar.set_prefix(event.stage.label());
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));
        bars.insert(event.stage, bar);
    }

    /// Whether the stage's spinner has been closed
    pub fn is_stage_finished(&self, stage: Stage) -> Option<bool> {
        let bars = self.bars.lock().ok()?;
        bars.get(&stage).map(ProgressBar::is_finished)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressReporter {
    fn emit(&self, event: ProgressEvent) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };

        match event.status {
            StageStatus::Active => self.start(&mut bars, &event),
            StageStatus::Completed => {
                if event.stage == Stage::Done {
                    for bar in bars.values().filter(|b| !b.is_finished()) {
                        bar.finish();
                    }
                    return;
                }
                if !bars.contains_key(&event.stage) {
                    self.start(&mut bars, &event);
                }
                if let Some(bar) = bars.get(&event.stage) {
                    bar.finish_with_message(format!("{} {}", "v".green(), event.message));
                }
            }
            StageStatus::Error => {
                if !bars.contains_key(&event.stage) {
                    self.start(&mut bars, &event);
                }
                if let Some(bar) = bars.get(&event.stage) {
                    bar.abandon_with_message(format!("{} {}", "x".red(), event.message));
                }
            }
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl SimpleProgress {
    /// The line printed for an event
    pub fn line(event: &ProgressEvent) -> String {
        let model = event
            .model_name
            .as_deref()
            .map(|m| format!(" [{m}]"))
            .unwrap_or_default();
        match event.status {
            StageStatus::Active => format!(
                "{} {}{}: {}",
                "->".cyan(),
                event.stage.label().bold(),
                model,
                event.message
            ),
            StageStatus::Completed => format!("  {} {}", "v".green(), event.message),
            StageStatus::Error => format!("  {} {} (failed)", "x".red(), event.message),
        }
    }
}

impl ProgressSink for SimpleProgress {
    fn emit(&self, event: ProgressEvent) {
        eprintln!("{}", Self::line(&event));
    }
}
