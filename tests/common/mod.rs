//! Shared helpers: fake solver scripts written into a temp directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Writing an executable while another thread forks can fail the exec with
/// ETXTBSY; every test that writes or runs a solver holds this lock.
static SOLVER_LOCK: Mutex<()> = Mutex::new(());

pub fn solver_lock() -> MutexGuard<'static, ()> {
    SOLVER_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

pub const SOLVER_NAME: &str = "fake-solver";

/// Records each seed to `seeds.log` next to itself and writes a
/// three-line result file to the `-o` path.
pub const SUCCEEDING: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    --seed) seed="$2"; shift 2 ;;
    *) shift ;;
  esac
done
echo "$seed" >> "$(dirname "$0")/seeds.log"
printf 'tree\nspecies\n  cost %s  \n' "$seed" > "$out"
"#;

/// Records the seed, then exits 1 without writing output.
pub const FAILING: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    --seed) seed="$2"; shift 2 ;;
    *) shift ;;
  esac
done
echo "$seed" >> "$(dirname "$0")/seeds.log"
echo "solver: cannot parse input" >&2
exit 1
"#;

/// Copies one line of its stdin into the metric slot of the result file.
pub const STDIN_ECHO: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
read -r line
printf 'tree\nspecies\n%s\n' "$line" > "$out"
"#;

/// Succeeds without producing a result file.
pub const SILENT: &str = "#!/bin/sh\nexit 0\n";

/// Install `script` as `<dir>/fake-solver.linux`
#[cfg(unix)]
pub fn install_solver(dir: &Path, script: &str) -> std::io::Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(format!("{}.linux", SOLVER_NAME));
    fs::write(&path, script)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// Seeds the fake solver was invoked with, in order
pub fn recorded_seeds(dir: &Path) -> Vec<u32> {
    fs::read_to_string(dir.join("seeds.log"))
        .unwrap_or_default()
        .lines()
        .filter_map(|l| l.trim().parse().ok())
        .collect()
}
