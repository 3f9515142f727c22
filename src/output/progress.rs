//! Progress reporting for the analysis pipeline's phases (spec §2).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Reports progress through the pipeline's named phases (Walking, Computing
/// metrics, Resolving imports, Building structure graph, Detecting clones,
/// Detecting smells, Synthesizing narrative).
pub struct ProgressReporter {
    quiet: bool,
    verbose: bool,
    multi_progress: Arc<MultiProgress>,
    main_bar: Option<ProgressBar>,
    message_bar: Option<ProgressBar>,
    current_phase: Arc<Mutex<String>>,
}

impl ProgressReporter {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let multi_progress = Arc::new(MultiProgress::new());

        let (main_bar, message_bar) = if quiet {
            (None, None)
        } else {
            let main_bar = multi_progress.add(ProgressBar::new(7));
            main_bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );

            let message_bar = multi_progress.add(ProgressBar::new_spinner());
            message_bar.set_style(ProgressStyle::default_spinner().template("{wide_msg}").unwrap());

            (Some(main_bar), Some(message_bar))
        };

        Self {
            quiet,
            verbose,
            multi_progress,
            main_bar,
            message_bar,
            current_phase: Arc::new(Mutex::new(String::new())),
        }
    }

    pub fn start_phase(&self, index: usize, total: usize, phase: &str) {
        if self.quiet {
            return;
        }
        if let Some(bar) = &self.main_bar {
            bar.set_length(total as u64);
            bar.set_position(index as u64);
            bar.set_message(phase.to_string());
        }
        if let Some(msg_bar) = &self.message_bar {
            msg_bar.set_message(phase.to_string());
            msg_bar.enable_steady_tick(Duration::from_millis(120));
        }
        if let Ok(mut current) = self.current_phase.lock() {
            *current = phase.to_string();
        }
        if self.verbose {
            println!("[{}/{}] {}", index + 1, total, phase);
        }
    }

    pub fn finish(&self, message: &str) {
        if self.quiet {
            return;
        }
        if let Some(bar) = &self.main_bar {
            bar.finish_with_message(message.to_string());
        }
        if let Some(msg_bar) = &self.message_bar {
            msg_bar.finish_and_clear();
        }
        if self.verbose {
            println!("Done: {}", message);
        }
    }

    pub fn print(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    pub fn print_verbose(&self, message: &str) {
        if self.verbose {
            println!("{}", message);
        }
    }

    pub fn print_warning(&self, message: &str) {
        eprintln!("warning: {}", message);
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

/// The named phases of the analysis pipeline (spec §2), in execution order.
pub const PIPELINE_PHASES: &[&str] = &[
    "Walking",
    "Computing metrics",
    "Resolving imports",
    "Building structure graph",
    "Detecting clones",
    "Detecting smells",
    "Synthesizing narrative",
];
