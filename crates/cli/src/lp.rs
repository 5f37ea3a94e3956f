//! The `lp` wrapper driver.

use printmux_core::config::Config;
use printmux_core::directory::Directory;
use printmux_core::error::Result;
use printmux_core::execution::Invocation;
use printmux_core::options::Grammar;
use printmux_core::system::System;

use crate::simple;

/// CUPS lp option grammar.
pub const CUPS_OPTS: &str = "EU:cd:h:mn:o:q:st:H:P:i:";
/// LPRng lp option grammar.
pub const LPRNG_OPTS: &str = "ckmprswBGYd:D:f:n:q:t:";

const QUEUE_FLAG: char = 'd';

/// Builds the dispatch plan for one `lp` invocation.
///
/// # Errors
///
/// Returns an error when no queue can be resolved at all.
pub fn run(args: Vec<String>, config: &Config, directory: &dyn Directory) -> Result<Invocation> {
    let grammars = [
        (System::Cups, Grammar::new(CUPS_OPTS)),
        (System::Lprng, Grammar::new(LPRNG_OPTS)),
    ];
    simple::simple("lp", &grammars, QUEUE_FLAG, args, config, directory)
}
