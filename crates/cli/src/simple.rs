//! A shared driver for the simple wrapper commands.
//!
//! Given the option grammars for the CUPS and LPRng forms of a command and
//! the flag that command uses for queue selection, this module builds the
//! dispatch plan for any wrapper that needs no per-option rewriting.

use log::debug;

use printmux_core::config::Config;
use printmux_core::directory::Directory;
use printmux_core::error::{Error, Result};
use printmux_core::execution::Invocation;
use printmux_core::options::{self, Grammar};
use printmux_core::resolver;
use printmux_core::system::System;

/// Builds the dispatch plan for a wrapper with no option rewriting.
///
/// `grammars` lists the candidate parses in preference order; `queue_flag`
/// is the flag this command selects its queue with.
///
/// # Errors
///
/// Returns an error when no queue can be resolved at all.
pub fn simple(
    command: &str,
    grammars: &[(System, Grammar)],
    queue_flag: char,
    args: Vec<String>,
    config: &Config,
    directory: &dyn Directory,
) -> Result<Invocation> {
    let mut args = args;

    // CUPS' lprm accepts a lone dash as the all-jobs specifier, which no
    // option parsing copes with, and requires it to be the last argument.
    // Hold it aside while slicing options and put it back at the end.
    let trailing_dash = command == "lprm" && args.last().map(String::as_str) == Some("-");
    if trailing_dash {
        args.pop();
    }

    let mut queue = resolver::default_queue(config, directory);

    if let Some((_, parsed, operands)) = options::parse_args(&args, grammars) {
        // The last queue specified in the arguments wins.
        let (queue_opts, parsed) = options::extract_opt(parsed, queue_flag);
        if let Some(last) = queue_opts.last() {
            queue = last.value.clone();
        }

        args = options::join(&parsed, &operands);
    }

    let Some(queue) = queue.filter(|queue| !queue.is_empty()) else {
        return Err(Error::NoDefaultQueue { queue_flag });
    };

    let (system, server, queue) = resolver::find_queue(&queue, config, directory);
    debug!("{queue} resolves to {system}");

    args.insert(0, format!("-{queue_flag}{queue}"));

    if trailing_dash && system == System::Cups {
        args.push("-".to_string());
    }

    Ok(Invocation {
        system,
        command: command.to_string(),
        args,
        cups_server: server,
        scrub: Vec::new(),
    })
}
