use std::ffi::OsStr;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use sysinfo::{ProcessesToUpdate, System};

/// One process instance observed during a poll cycle.
///
/// Derived fresh from the OS process table on every cycle; never cached or
/// diffed against a previous cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: String,
    /// Start time in seconds since the Unix epoch, as reported by the OS.
    pub start_time_epoch_secs: u64,
    /// Resident physical memory in bytes, reported for observability only.
    pub working_set_bytes: u64,
}

impl ProcessSnapshot {
    /// Elapsed wall-clock runtime in fractional minutes at `now_epoch_millis`.
    pub fn lifetime_minutes(&self, now_epoch_millis: i64) -> f64 {
        let start_millis = (self.start_time_epoch_secs as i64).saturating_mul(1_000);
        now_epoch_millis.saturating_sub(start_millis) as f64 / 60_000.0
    }
}

/// Outcome of a termination request. Never an error to the caller; the
/// monitor records the outcome and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// SIGKILL was delivered.
    Requested,
    /// The process vanished between enumeration and the kill request.
    AlreadyGone,
    /// The process exists but belongs to someone we may not signal.
    PermissionDenied,
    Failed(Errno),
}

/// Best-effort SIGKILL of a single pid.
pub fn kill_process(pid: u32) -> KillOutcome {
    match kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) => KillOutcome::Requested,
        Err(Errno::ESRCH) => KillOutcome::AlreadyGone,
        Err(Errno::EPERM) => KillOutcome::PermissionDenied,
        Err(e) => KillOutcome::Failed(e),
    }
}

/// Handle on the OS process table, refreshed on every enumeration.
pub struct ProcessTable {
    system: System,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    /// Snapshot every running process whose name equals `name` exactly.
    ///
    /// Sorted by pid so a cycle visits each match exactly once in a stable
    /// order. On Linux the kernel truncates the reported name at 15 chars,
    /// which bounds what "exact" can mean.
    pub fn processes_by_name(&mut self, name: &str) -> Vec<ProcessSnapshot> {
        self.system
            .refresh_processes(ProcessesToUpdate::All, true);

        let mut snapshots: Vec<ProcessSnapshot> = self
            .system
            .processes_by_exact_name(OsStr::new(name))
            .map(|process| ProcessSnapshot {
                pid: process.pid().as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                start_time_epoch_secs: process.start_time(),
                working_set_bytes: process.memory(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.pid);
        snapshots
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
