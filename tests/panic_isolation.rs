use fault_trials::{install_panic_hook, run_trials, Fault, FaultKind, RunnerConfig, Trial};
use std::io::{self, Write};
use std::process::Command;

// Set in the re-executed test binary, which then runs the trial for real.
const CHILD_ENV: &str = "FAULT_TRIALS_PANIC_CHILD";

fn index_empty_vec(_config: &RunnerConfig, out: &mut dyn Write) -> Result<(), Fault> {
    let values: Vec<u8> = Vec::new();
    let index = std::hint::black_box(3);
    writeln!(out, "{}", values[index]).map_err(|source| Fault::io("stdout", source))
}

#[test]
fn test_panicking_trial_writes_one_stderr_line() {
    if std::env::var_os(CHILD_ENV).is_some() {
        install_panic_hook();
        let trials = [Trial::new(
            1,
            "index an empty vec",
            &[FaultKind::Bounds],
            index_empty_vec,
        )];
        let config = RunnerConfig::default().without_color();
        let stdout = io::stdout();
        let stderr = io::stderr();
        run_trials(&trials, &config, &mut stdout.lock(), &mut stderr.lock());
        return;
    }

    let output = Command::new(std::env::current_exe().unwrap())
        .args([
            "--exact",
            "test_panicking_trial_writes_one_stderr_line",
            "--nocapture",
            "--test-threads=1",
        ])
        .env(CHILD_ENV, "1")
        .env("RUST_BACKTRACE", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to re-run test binary");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "stderr was:\n{stderr}");
    assert!(lines[0]
        .starts_with("unanticipated panic caught: attempt panicked: index out of bounds"));
}
