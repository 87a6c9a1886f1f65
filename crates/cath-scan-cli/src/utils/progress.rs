use cathscan::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Phases of a scan, in the order the workflows report them.
const SCAN_PHASES: [&str; 3] = ["Indexing", "Building query set", "Scanning"];

#[derive(Debug, Default)]
struct CurrentPhase {
    name: &'static str,
    started: Option<Instant>,
}

/// Renders scan progress on stderr: a numbered spinner while the index and query set are
/// built, and a bar over the query rep pairs while scanning.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
    phase: Arc<Mutex<CurrentPhase>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that draws nothing, for `--quiet` runs.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        Self {
            bar,
            phase: Arc::new(Mutex::new(CurrentPhase::default())),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        let phase = Arc::clone(&self.phase);

        Box::new(move |progress: Progress| match progress {
            Progress::PhaseStart { name } => {
                match phase.lock() {
                    Ok(mut current) => {
                        current.name = name;
                        current.started = Some(Instant::now());
                    }
                    Err(_) => warn!("Progress phase mutex was poisoned."),
                }
                bar.reset();
                bar.set_length(0);
                bar.set_style(spinner_style());
                bar.set_message(phase_label(name));
                bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::PhaseFinish => {
                bar.disable_steady_tick();
                let summary = match phase.lock() {
                    Ok(current) => {
                        let seconds = current
                            .started
                            .map_or(0.0, |started| started.elapsed().as_secs_f64());
                        format!("✓ {} ({seconds:.1}s)", current.name)
                    }
                    Err(_) => "✓ Done".to_string(),
                };
                bar.finish_with_message(summary);
            }
            Progress::TaskStart { total_steps } => {
                bar.disable_steady_tick();
                bar.set_style(rep_pair_bar_style());
                bar.set_length(total_steps);
                bar.set_position(0);
            }
            Progress::TaskAdvance { steps } => bar.inc(steps),
            Progress::TaskFinish => {
                if let Some(length) = bar.length() {
                    bar.set_position(length);
                }
            }
            Progress::Message(msg) => bar.println(format!("  {msg}")),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// `[n/3] name` for the scan's own phases, the bare name otherwise.
fn phase_label(name: &str) -> String {
    match SCAN_PHASES.iter().position(|&phase| phase == name) {
        Some(index) => format!("[{}/{}] {name}", index + 1, SCAN_PHASES.len()),
        None => name.to_string(),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn rep_pair_bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} query rep pairs ({rate}, eta {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .with_key("rate", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
        let _ = write!(w, "{:.0}/s", state.per_sec());
    })
    .progress_chars("##-")
}
