//! The `lprm` wrapper driver.

use printmux_core::config::Config;
use printmux_core::directory::Directory;
use printmux_core::error::Result;
use printmux_core::execution::Invocation;
use printmux_core::options::Grammar;
use printmux_core::system::System;

use crate::simple;

/// CUPS lprm option grammar.
pub const CUPS_OPTS: &str = "EU:h:P:";
/// LPRng lprm option grammar.
pub const LPRNG_OPTS: &str = "aAD:P:VU:";

const QUEUE_FLAG: char = 'P';

/// Builds the dispatch plan for one `lprm` invocation.
///
/// # Errors
///
/// Returns an error when no queue can be resolved at all.
pub fn run(args: Vec<String>, config: &Config, directory: &dyn Directory) -> Result<Invocation> {
    let grammars = [
        (System::Cups, Grammar::new(CUPS_OPTS)),
        (System::Lprng, Grammar::new(LPRNG_OPTS)),
    ];
    simple::simple("lprm", &grammars, QUEUE_FLAG, args, config, directory)
}
