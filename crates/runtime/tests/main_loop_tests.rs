use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

struct RunOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

fn run_runtime(args: &[&str]) -> RunOutput {
    let mut child = Command::new(env!("CARGO_BIN_EXE_runtime_main"))
        .args(args)
        .env("RUST_LOG", "info")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn runtime_main process");

    let stdout_captured = Arc::new(Mutex::new(String::new()));
    let stdout_handle = {
        let stdout = child.stdout.take().expect("Failed to capture stdout");
        let captured = Arc::clone(&stdout_captured);
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                let mut data = captured.lock().unwrap();
                data.push_str(&line);
                data.push('\n');
            }
        })
    };
    let mut stderr = child.stderr.take().expect("Failed to capture stderr");

    let timeout = Duration::from_secs(30);
    let status = match child.wait_timeout_secs(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            child.kill().expect("Failed to kill timed-out process");
            panic!("runtime_main process timed out after {timeout:?}");
        }
        Err(e) => panic!("Failed to wait for runtime_main process: {e}"),
    };

    stdout_handle.join().expect("Stdout reader thread panicked");
    let mut stderr_output = String::new();
    stderr.read_to_string(&mut stderr_output).unwrap();
    let stdout_output = stdout_captured.lock().unwrap().clone();

    eprintln!("--- runtime_main STDOUT ---\n{stdout_output}");
    eprintln!("--- runtime_main STDERR ---\n{stderr_output}");

    RunOutput {
        status,
        stdout: stdout_output,
        stderr: stderr_output,
    }
}

#[test]
fn test_runtime_main_executes_successfully() {
    let out = run_runtime(&["--steps", "100", "--shoes", "12", "--wrapped", "4"]);

    assert!(
        out.status.success(),
        "runtime_main process exited with error: {:?}",
        out.status.code()
    );
    assert!(
        out.stdout.contains("Simulation loop finished after 100 steps."),
        "Expected log output not found in stdout."
    );
    assert!(out.stdout.contains("Simulation step 100 complete. Contacts: 4, engaged shoes: 4"));
}

#[test]
fn test_runtime_main_rejects_undersized_cache() {
    let out = run_runtime(&["--steps", "1", "--shoes", "8", "--cache-capacity", "4"]);

    assert!(!out.status.success());
    assert!(out.stderr.contains("capacity"));
}

// A helper trait to wait with a timeout (not in std Command on all Rust versions)
trait ChildExt {
    fn wait_timeout_secs(&mut self, duration: Duration) -> std::io::Result<Option<ExitStatus>>;
}

impl ChildExt for Child {
    fn wait_timeout_secs(&mut self, duration: Duration) -> std::io::Result<Option<ExitStatus>> {
        let start_time = Instant::now();
        loop {
            match self.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start_time.elapsed() > duration {
                        return Ok(None);
                    }
                    thread::sleep(Duration::from_millis(50));
                }
            }
        }
    }
}
