//! Runs trials one after another, isolating each one's failure.
//!
//! A trial's attempt either succeeds (nothing is reported) or produces a
//! [`Fault`], which is classified against the kinds the trial anticipates and
//! written to the error stream as one diagnostic line. An attempt that panics
//! is caught with `catch_unwind` and reported the same way, so no fault ever
//! leaves [`run_trial`].

use crate::config::RunnerConfig;
use crate::fault::{Fault, FaultKind};
use crate::trials::TRIALS;
use colored::Colorize;
use std::any::Any;
use std::io::{self, IsTerminal, Write};
use std::panic::{self, catch_unwind, AssertUnwindSafe};
use tracing::{debug, info_span, warn};

/// One fault-provoking operation. `out` is the standard output stream.
pub type Attempt = fn(&RunnerConfig, &mut dyn Write) -> Result<(), Fault>;

#[derive(Clone, Copy)]
pub struct Trial {
    pub id: u8,
    pub label: &'static str,
    /// Most specific kind first.
    pub anticipates: &'static [FaultKind],
    pub attempt: Attempt,
}

impl Trial {
    pub const fn new(
        id: u8,
        label: &'static str,
        anticipates: &'static [FaultKind],
        attempt: Attempt,
    ) -> Self {
        Self {
            id,
            label,
            anticipates,
            attempt,
        }
    }
}

impl std::fmt::Debug for Trial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trial")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("anticipates", &self.anticipates)
            .finish_non_exhaustive()
    }
}

/// The line reported for one caught fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: FaultKind,
    pub anticipated: bool,
    pub message: String,
}

impl Diagnostic {
    pub fn for_fault(trial: &Trial, fault: &Fault) -> Self {
        match fault.classify(trial.anticipates) {
            Some(kind) => Self {
                kind,
                anticipated: true,
                message: fault.to_string(),
            },
            None => Self {
                kind: fault.kind(),
                anticipated: false,
                message: fault.to_string(),
            },
        }
    }

    pub fn prefix(&self) -> String {
        if self.anticipated {
            format!("{} caught:", self.kind.label())
        } else {
            format!("unanticipated {} caught:", self.kind.label())
        }
    }

    pub fn render(&self, color: bool) -> String {
        let prefix = self.prefix();
        if !color {
            return format!("{} {}", prefix, self.message);
        }
        let prefix = if self.anticipated {
            prefix.yellow().bold()
        } else {
            prefix.red().bold()
        };
        format!("{} {}", prefix, self.message)
    }
}

/// Run the fixed trial sequence against the process's standard streams.
pub fn run() {
    let mut config = RunnerConfig::default();
    config.color &= io::stderr().is_terminal();
    colored::control::set_override(config.color);
    install_panic_hook();

    let stdout = io::stdout();
    let stderr = io::stderr();
    run_with(&config, &mut stdout.lock(), &mut stderr.lock());
}

/// Replace the default panic hook, which prints to stderr, with a debug
/// event. A panicking attempt is then reported only by its diagnostic line.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(ToString::to_string)
            .unwrap_or_default();
        debug!(%location, "attempt panicked");
    }));
}

pub fn run_with(config: &RunnerConfig, out: &mut dyn Write, err: &mut dyn Write) {
    run_trials(&TRIALS, config, out, err);
}

pub fn run_trials(
    trials: &[Trial],
    config: &RunnerConfig,
    out: &mut dyn Write,
    err: &mut dyn Write,
) {
    for trial in trials {
        run_trial(trial, config, out, err);
    }
    debug!(count = trials.len(), "all trials attempted");
}

/// Attempt one trial and report its fault, if any. Never panics on a
/// faulting attempt and never returns the fault.
pub fn run_trial(trial: &Trial, config: &RunnerConfig, out: &mut dyn Write, err: &mut dyn Write) {
    let span = info_span!("trial", id = trial.id, label = trial.label);
    let _entered = span.enter();

    let outcome = catch_unwind(AssertUnwindSafe(|| (trial.attempt)(config, &mut *out)))
        .unwrap_or_else(|payload| {
            Err(Fault::Panic {
                message: panic_message(payload.as_ref()),
            })
        });

    let fault = match outcome {
        Ok(()) => {
            debug!("attempt completed without a fault");
            return;
        }
        Err(fault) => fault,
    };

    let diagnostic = Diagnostic::for_fault(trial, &fault);
    if diagnostic.anticipated {
        debug!(kind = ?diagnostic.kind, "caught anticipated fault");
    } else {
        warn!(kind = ?diagnostic.kind, expected = ?trial.anticipates, "caught unanticipated fault");
    }

    if let Err(error) = writeln!(err, "{}", diagnostic.render(config.color)) {
        warn!(%error, "failed to write diagnostic line");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
