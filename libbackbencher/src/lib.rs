pub mod error;
pub mod config;
pub mod session;
pub mod io;
pub mod report;
pub mod signal;
pub mod utils;

#[cfg(not(target_pointer_width = "64"))]
compile_error!("Target architecture is not 64-bit - This software is only supported on 64-bit platforms");

#[cfg(not(unix))]
compile_error!("Target is not a Unix platform - mmap(2) and the signal handling used here require one");
