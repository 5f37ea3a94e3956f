//! Printmux wrapper commands
//!
//! This crate provides the `lpr`, `lp`, `lpq`, and `lprm` wrapper binaries
//! for sites running a mix of CUPS and LPRng printing. Each wrapper decides
//! which subsystem an invocation's arguments were written for, normalizes
//! queue selection and notification options, resolves the queue through the
//! site directory, and hands the job to the subsystem-specific command
//! (`cups-lpr`, `lprng-lpq`, ...).
//!
//! # Architecture
//!
//! - [`lpr`]: the full driver, with `LPROPT` injection, notification
//!   synthesis, and LPRng-to-CUPS option translation
//! - [`simple`]: the shared driver for wrappers that only need queue
//!   normalization
//! - [`lp`], [`lpq`], [`lprm`]: per-command grammars and glue
//!
//! Drivers are pure functions from `(argv, Config, &dyn Directory)` to a
//! dispatch plan; the binaries apply the plan and map errors to exit codes.
//!
//! # Examples
//!
//! ```bash
//! # Dispatches to cups-lpr or lprng-lpr depending on where ajax lives
//! lpr -Pajax thesis.ps
//!
//! # LPRng-style options are translated when ajax resolves to CUPS
//! lpr -Zduplex -Pajax thesis.ps
//! ```

use std::env;
use std::process::ExitCode;

use printmux_core::config::Config;
use printmux_core::directory::{Directory, SystemDirectory};
use printmux_core::error::Result;
use printmux_core::execution::Invocation;

pub mod lp;
pub mod lpq;
pub mod lpr;
pub mod lprm;
pub mod simple;

/// A wrapper driver: builds the dispatch plan for one invocation.
pub type Driver = fn(Vec<String>, &Config, &dyn Directory) -> Result<Invocation>;

/// Shared scaffold for the four wrapper binaries.
///
/// Snapshots the environment, runs the driver, applies the plan, and maps
/// the outcome to an exit code: the child's own code on success, 2 when no
/// default queue could be resolved, 1 otherwise.
pub fn run_wrapper(driver: Driver) -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let outcome = Config::from_env()
        .and_then(|config| {
            let directory = SystemDirectory::new(&config);
            driver(args, &config, &directory)
        })
        .and_then(|invocation| invocation.run());

    match outcome {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
