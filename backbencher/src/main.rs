mod args;

use std::{env, io::{self, Write}, process::ExitCode};

use args::Args;
use clap::Parser;
use libbackbencher::{error::{Error, IoContext, IoOp}, session::Session, signal, utils};
use log::{debug, error, info, warn};

fn main() -> ExitCode {
	let me = utils::program_name(env::args_os().next());

	let args = match Args::try_parse() {
		Ok(args) => args,
		// --help and --version land here too, and aren't failures
		Err(e) if !e.use_stderr() => {
			let _ = e.print();
			return ExitCode::SUCCESS;
		}
		Err(e) => {
			eprint!("{}: {}", me, e.render());
			return ExitCode::FAILURE;
		}
	};

	env_logger::Builder::new()
		.filter_level(args.log_level_filter())
		.format(move |f, record| {
			let level_style = f.default_level_style(record.level());
			writeln!(f, "{}: [{}{}{}]: {}", me, level_style.render(), record.level(), level_style.render_reset(), record.args())
		})
		.init();

	debug!("Args: {:?}", args);
	if args.debug > 0 {
		debug!("debug level is {}", args.debug);
	}

	if let Err(e) = signal::install() {
		warn!("Could not install SIGINT handler: {}", e);
	}

	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{}", e);
			ExitCode::FAILURE
		}
	}
}

fn run(args: &Args) -> Result<(), Error> {
	let session = Session::open(&args.file, &args.bench_config())?;
	report_signals();

	let report = session.run()?;
	report_signals();

	if report.rate().is_none() {
		warn!("No measurable time elapsed, the rate is undefined");
	}

	report_signals();
	report.write_to(io::stdout().lock()).during(IoOp::Report)
}

/// Logs a signal that arrived during the last phase of the run, if one did
fn report_signals() {
	if let Some(signo) = signal::take_pending() {
		info!("Signal {} ({}) seen", signo, signal::describe(signo));
	}
}
