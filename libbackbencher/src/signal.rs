//! SIGINT bookkeeping. The handler only records which signal arrived; it is up to the main thread to notice and report it between
//! the phases of a run. A run is never cut short by a signal

use std::{ffi::CStr, io, sync::atomic::{AtomicI32, Ordering}};

/// The number of the last signal seen and not yet taken, or 0
static PENDING: AtomicI32 = AtomicI32::new(0);

extern "C" fn record_signal(signo: libc::c_int) {
	PENDING.store(signo, Ordering::SeqCst);
}

/// Installs the recording handler for SIGINT. Interrupted syscalls are restarted, so the copy carries on as though nothing happened
pub fn install() -> Result<(), io::Error> {
	install_for(libc::SIGINT)
}

fn install_for(signo: libc::c_int) -> Result<(), io::Error> {
	unsafe {
		let mut action: libc::sigaction = std::mem::zeroed();
		action.sa_sigaction = record_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
		action.sa_flags = libc::SA_RESTART;
		libc::sigemptyset(&mut action.sa_mask);

		if libc::sigaction(signo, &action, std::ptr::null_mut()) != 0 {
			return Err(io::Error::last_os_error());
		}
	}

	Ok(())
}

/// Returns the signal that arrived since the last call, if any, clearing it
pub fn take_pending() -> Option<i32> {
	match PENDING.swap(0, Ordering::SeqCst) {
		0 => None,
		signo => Some(signo)
	}
}

/// A human readable description of a signal, e.g. "Interrupt" for SIGINT
pub fn describe(signo: i32) -> String {
	unsafe {
		let desc = libc::strsignal(signo);
		if desc.is_null() {
			format!("signal {}", signo)
		} else {
			CStr::from_ptr(desc).to_string_lossy().into_owned()
		}
	}
}
