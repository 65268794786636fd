// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SIGCHLD` handling: a signal-safe atomic flag set by the handler,
//! and a zombie-reaping loop run between dispatcher ticks with the
//! flag check bracketed by a blocked signal mask so the handler can't
//! race a read-modify-write of it.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{sigprocmask, signal, SigHandler, SigSet, SigmaskHow, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

/// The only piece of process-global mutable state: set by the `SIGCHLD`
/// handler, read (and cleared) by the dispatcher between ticks.
static SIGCHLD_FLAG: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigchld(_signum: libc::c_int) {
    SIGCHLD_FLAG.store(true, Ordering::SeqCst);
}

/// Install the `SIGCHLD` handler. Must be called once at startup before
/// any child is spawned.
///
/// # Safety
/// Registers a signal handler via `sigaction`; the handler itself only
/// performs an atomic store, which is async-signal-safe.
pub unsafe fn install() -> Result<(), nix::Error> {
    unsafe {
        signal(Signal::SIGCHLD, SigHandler::Handler(on_sigchld))?;
    }
    Ok(())
}

/// True if `SIGCHLD` has fired since the last [`take_sigchld`], checked
/// with the signal blocked so the read can't race the handler.
pub fn sigchld_pending() -> bool {
    with_sigchld_blocked(|| SIGCHLD_FLAG.load(Ordering::SeqCst))
}

/// Atomically read-and-clear the flag, with the signal blocked for the
/// same reason as [`sigchld_pending`].
pub fn take_sigchld() -> bool {
    with_sigchld_blocked(|| SIGCHLD_FLAG.swap(false, Ordering::SeqCst))
}

fn with_sigchld_blocked<T>(f: impl FnOnce() -> T) -> T {
    let mut set = SigSet::empty();
    set.add(Signal::SIGCHLD);
    // SAFETY: sigprocmask only manipulates this thread's signal mask;
    // the closure run while blocked does no signal-unsafe work.
    unsafe {
        let _ = sigprocmask(SigmaskHow::SIG_BLOCK, Some(&set), None);
    }
    let result = f();
    unsafe {
        let _ = sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&set), None);
    }
    result
}

/// Reap every terminated child with a non-blocking `waitpid(-1, ...)`
/// loop, returning the `(pid, exit_status)` pairs harvested.
pub fn reap_zombies() -> Vec<(i32, i32)> {
    let mut reaped = Vec::new();
    loop {
        match waitpid(Option::<Pid>::None, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, status)) => reaped.push((pid.as_raw(), status)),
            Ok(WaitStatus::Signaled(pid, sig, _)) => reaped.push((pid.as_raw(), -(sig as i32))),
            Ok(WaitStatus::StillAlive) | Err(nix::Error::ECHILD) => break,
            Ok(_) => continue,
            Err(_) => break,
        }
    }
    reaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_round_trips_through_take() {
        SIGCHLD_FLAG.store(true, Ordering::SeqCst);
        assert!(sigchld_pending());
        assert!(take_sigchld());
        assert!(!sigchld_pending());
    }
}
