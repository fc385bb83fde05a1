use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use tracing::{debug, info, warn};

use crate::errors::PtyError;

/// ASCII ETX (Ctrl-C).
const ETX: u8 = 0x03;

/// Grace period between signaling the process group and force-killing it.
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A single live PTY-attached session running `sh -c "<command>"`.
///
/// Owns no global state: every session is an independent handle over its
/// own PTY and child process.
pub struct Session {
    master: Box<dyn MasterPty + Send>,
    child: Mutex<Box<dyn Child + Send + Sync>>,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    pid: Option<u32>,
    closed: AtomicBool,
    exited: AtomicBool,
}

impl Session {
    /// Spawn `sh -c "<command>"` attached to a new pseudo-terminal.
    ///
    /// `cwd` becomes the child's working directory; `env` pairs are added on
    /// top of the inherited environment alongside a forced
    /// `TERM=xterm-256color`; `size` sets initial PTY geometry (defaults to
    /// 24x80 when absent).
    pub fn spawn(
        command: &str,
        cwd: &Path,
        env: &[(String, String)],
        size: Option<(u16, u16)>,
    ) -> Result<Self, PtyError> {
        let (rows, cols) = size.unwrap_or((24, 80));
        let pty_size = PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        };

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(pty_size)
            .map_err(|e| PtyError::OpenFailed(e.to_string()))?;

        let mut cmd = CommandBuilder::new("sh");
        cmd.arg("-c");
        cmd.arg(command);
        cmd.cwd(cwd);
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.env("TERM", "xterm-256color");

        info!(event = "pty.session.spawn_started", command = command, rows = rows, cols = cols);

        let child = pair.slave.spawn_command(cmd).map_err(|e| PtyError::SpawnFailed {
            command: command.to_string(),
            reason: e.to_string(),
        })?;
        let pid = child.process_id();

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| PtyError::OpenFailed(e.to_string()))?;

        info!(event = "pty.session.spawn_completed", command = command, pid = ?pid);

        Ok(Self {
            master: pair.master,
            child: Mutex::new(child),
            writer: Arc::new(Mutex::new(writer)),
            pid,
            closed: AtomicBool::new(false),
            exited: AtomicBool::new(false),
        })
    }

    /// Clone the PTY master's reader so output can be pumped from a
    /// background thread without holding the session lock while blocked.
    pub fn try_clone_reader(&self) -> Result<Box<dyn Read + Send>, PtyError> {
        self.master
            .try_clone_reader()
            .map_err(|e| PtyError::CloneReaderFailed(e.to_string()))
    }

    /// Write bytes to the PTY. Fails with [`PtyError::Closed`] after `close`.
    pub fn write(&self, data: &[u8]) -> Result<usize, PtyError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PtyError::Closed);
        }
        let mut writer = self.writer.lock().expect("pty writer mutex poisoned");
        writer.write_all(data).map_err(|e| PtyError::WriteFailed(e.to_string()))?;
        writer.flush().map_err(|e| PtyError::WriteFailed(e.to_string()))?;
        Ok(data.len())
    }

    /// Resize the PTY. No-op after `close`.
    pub fn set_size(&self, rows: u16, cols: u16) -> Result<(), PtyError> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.master
            .resize(PtySize { rows, cols, pixel_width: 0, pixel_height: 0 })
            .map_err(|e| PtyError::ResizeFailed(e.to_string()))?;
        debug!(event = "pty.session.resize_completed", rows = rows, cols = cols);
        Ok(())
    }

    /// Write a single ETX (Ctrl-C) byte to the PTY.
    pub fn send_interrupt(&self) -> Result<(), PtyError> {
        self.write(&[ETX]).map(|_| ())
    }

    /// Best-effort liveness: a command was spawned and no exit has been
    /// observed yet. Does not block to reap the child.
    pub fn running(&self) -> bool {
        !self.closed.load(Ordering::SeqCst) && !self.exited.load(Ordering::SeqCst)
    }

    /// Idempotent: marks the session closed, closes the PTY master, signals
    /// the process group with SIGTERM, and waits up to 5s for exit before
    /// force-killing with SIGKILL. Concurrent callers observe a single close.
    ///
    /// The child is the leader of its own process group (`portable_pty`
    /// calls `setsid()` in the forked child before exec), so its pid doubles
    /// as its pgid; signaling the group reaches any grandchildren the
    /// assistant process has forked, not just the `sh -c` leader.
    pub fn close(&self) -> Result<(), PtyError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        info!(event = "pty.session.close_started", pid = ?self.pid);

        if let Some(pid) = self.pid
            && let Err(e) = signal::killpg(Pid::from_raw(pid as i32), Signal::SIGTERM)
        {
            warn!(event = "pty.session.sigterm_failed", pid = pid, error = %e);
        }

        let mut child = self.child.lock().expect("pty child mutex poisoned");
        if !wait_with_timeout(&mut **child, GRACEFUL_SHUTDOWN_TIMEOUT) {
            warn!(event = "pty.session.force_kill", pid = ?self.pid);
            if let Some(pid) = self.pid {
                let _ = signal::killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
            }
            let _ = child.kill();
            let _ = child.wait();
        }
        self.exited.store(true, Ordering::SeqCst);

        info!(event = "pty.session.close_completed", pid = ?self.pid);
        Ok(())
    }
}

/// Poll `child` for exit until `timeout` elapses. Returns `true` if it
/// exited within the window.
fn wait_with_timeout(child: &mut dyn Child, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) => {
                if Instant::now() >= deadline {
                    return false;
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(_) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_runs_command_and_reads_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let session = Session::spawn("echo hello-amux", dir.path(), &[], None).unwrap();

        let mut reader = session.try_clone_reader().unwrap();
        let mut buf = [0u8; 256];
        let mut collected = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(3);
        while Instant::now() < deadline {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    collected.extend_from_slice(&buf[..n]);
                    if collected.windows(11).any(|w| w == b"hello-amux\n") || collected.len() > 10 {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        assert!(String::from_utf8_lossy(&collected).contains("hello-amux"));
    }

    #[test]
    fn test_write_after_close_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let session = Session::spawn("sleep 5", dir.path(), &[], None).unwrap();
        session.close().unwrap();
        assert!(matches!(session.write(b"x"), Err(PtyError::Closed)));
    }

    #[test]
    fn test_set_size_is_noop_after_close() {
        let dir = tempfile::TempDir::new().unwrap();
        let session = Session::spawn("sleep 5", dir.path(), &[], None).unwrap();
        session.close().unwrap();
        assert!(session.set_size(10, 20).is_ok());
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let session = Session::spawn("sleep 5", dir.path(), &[], None).unwrap();
        session.close().unwrap();
        session.close().unwrap();
    }

    #[test]
    fn test_running_false_after_close() {
        let dir = tempfile::TempDir::new().unwrap();
        let session = Session::spawn("sleep 5", dir.path(), &[], None).unwrap();
        assert!(session.running());
        session.close().unwrap();
        assert!(!session.running());
    }

    #[test]
    fn test_force_kill_after_graceful_timeout_for_trapped_process() {
        let dir = tempfile::TempDir::new().unwrap();
        // ignores SIGTERM; close() must fall through to SIGKILL.
        let session =
            Session::spawn("trap '' TERM; sleep 30", dir.path(), &[], None).unwrap();
        let start = Instant::now();
        session.close().unwrap();
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_close_reaps_grandchild_in_same_process_group() {
        let dir = tempfile::TempDir::new().unwrap();
        let pidfile = dir.path().join("grandchild.pid");
        // The leader backgrounds a grandchild (no setsid of its own, so it
        // stays in the leader's process group) and writes its pid, then
        // blocks so the leader is still alive when we call close().
        let command = format!("sleep 30 & echo $! > {}; sleep 30", pidfile.display());
        let session = Session::spawn(&command, dir.path(), &[], None).unwrap();

        let deadline = Instant::now() + Duration::from_secs(3);
        let mut grandchild_pid = None;
        while Instant::now() < deadline {
            if let Ok(contents) = std::fs::read_to_string(&pidfile)
                && let Ok(pid) = contents.trim().parse::<i32>()
            {
                grandchild_pid = Some(pid);
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        let grandchild_pid = grandchild_pid.expect("leader wrote its grandchild's pid");
        assert!(process_alive(grandchild_pid), "grandchild should be running before close");

        session.close().unwrap();

        let deadline = Instant::now() + Duration::from_secs(3);
        while Instant::now() < deadline && process_alive(grandchild_pid) {
            std::thread::sleep(Duration::from_millis(50));
        }
        assert!(!process_alive(grandchild_pid), "close() must reap grandchildren via the process group");
    }

    fn process_alive(pid: i32) -> bool {
        signal::kill(Pid::from_raw(pid), None).is_ok()
    }
}
