//! The `lpq` wrapper driver.
//!
//! The simple flow, plus a warning when the requested queue has neither a
//! directory record nor a local device URI. `lpq` is where users discover
//! a queue was renamed or retired, so a hint beats a silent empty listing.

use printmux_core::config::Config;
use printmux_core::directory::Directory;
use printmux_core::error::{Error, Result};
use printmux_core::execution::Invocation;
use printmux_core::options::{self, Grammar};
use printmux_core::resolver;
use printmux_core::system::System;

/// CUPS lpq option grammar.
pub const CUPS_OPTS: &str = "EU:h:P:al";
/// LPRng lpq option grammar.
pub const LPRNG_OPTS: &str = "aAlLVcvP:st:D:";

const QUEUE_FLAG: char = 'P';

fn grammars() -> Vec<(System, Grammar)> {
    vec![
        (System::Cups, Grammar::new(CUPS_OPTS)),
        (System::Lprng, Grammar::new(LPRNG_OPTS)),
    ]
}

/// Builds the dispatch plan for one `lpq` invocation.
///
/// # Errors
///
/// Returns an error when no queue can be resolved at all.
pub fn run(args: Vec<String>, config: &Config, directory: &dyn Directory) -> Result<Invocation> {
    let mut args = args;

    let mut queue = resolver::default_queue(config, directory);

    if let Some((_, parsed, operands)) = options::parse_args(&args, &grammars()) {
        // The last queue specified in the arguments wins.
        let (queue_opts, parsed) = options::extract_opt(parsed, QUEUE_FLAG);
        if let Some(last) = queue_opts.last() {
            queue = last.value.clone();
        }

        args = options::join(&parsed, &operands);
    }

    let Some(queue) = queue.filter(|queue| !queue.is_empty()) else {
        return Err(Error::NoDefaultQueue {
            queue_flag: QUEUE_FLAG,
        });
    };

    let (system, server, queue) = resolver::find_queue(&queue, config, directory);

    if server.is_none() && directory.device_uri(&queue).is_none() {
        // Let it go through anyway; the local spooler's own error message
        // is authoritative if we are wrong.
        eprintln!(
            "\nWARNING: The print queue '{queue}' does not appear to exist.\n\
             If it was recently renamed or retired, check your site's printing\n\
             documentation for its replacement.\n"
        );
    }

    args.insert(0, format!("-{QUEUE_FLAG}{queue}"));

    Ok(Invocation {
        system,
        command: "lpq".to_string(),
        args,
        cups_server: server,
        scrub: Vec::new(),
    })
}
