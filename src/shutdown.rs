// src/shutdown.rs

//! SIGINT / SIGTERM handling: the handler only raises a flag that the render
//! loop polls, so teardown runs on the main thread.

use anyhow::{Context, Result};
use log::debug;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn request_shutdown(_signal: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::Relaxed);
}

/// Installs the handlers and returns the flag they raise.
pub fn install_handlers() -> Result<&'static AtomicBool> {
    let action = SigAction::new(
        SigHandler::Handler(request_shutdown),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only performs an atomic store.
        unsafe { sigaction(signal, &action) }
            .with_context(|| format!("Failed to install {} handler", signal))?;
        debug!("Installed shutdown handler for {}", signal);
    }
    Ok(&SHUTDOWN_REQUESTED)
}
