use crate::signals::install_shell_policy;
use std::path::Path;
use std::sync::Once;
use std::time::{Duration, Instant};

static SHELL_POLICY: Once = Once::new();

/// Put the test process under the shell's signal policy.
///
/// Dispositions are process-wide, so once any test installs them every test
/// runs with SIGINT and SIGCHLD ignored. Tests that spawn processes call this
/// up front so they behave the same regardless of ordering. Because SIGCHLD is
/// ignored, `std::process::Command::output`/`status` cannot be used in tests:
/// results are observed through files instead.
pub(crate) fn shell_policy() {
    SHELL_POLICY.call_once(|| {
        install_shell_policy().unwrap();
    });
}

pub(crate) fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

pub(crate) fn path_token(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Poll until `path` exists or `timeout` passes.
pub(crate) fn wait_for_file(path: &Path, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if path.exists() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    path.exists()
}
