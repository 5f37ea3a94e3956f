//! The `lpr` wrapper driver.
//!
//! The only wrapper that rewrites options rather than just extracting the
//! queue: it injects `LPROPT` defaults, synthesizes a notification option
//! when the submitting user asked for none, and translates LPRng options
//! to CUPS when the queue resolves to a CUPS server.

use itertools::Itertools;
use log::debug;

use printmux_core::config::{self, Config};
use printmux_core::directory::Directory;
use printmux_core::error::{Error, Result};
use printmux_core::execution::Invocation;
use printmux_core::options::{self, Grammar, Opt};
use printmux_core::resolver;
use printmux_core::system::System;
use printmux_core::translate;

/// CUPS lpr option grammar.
pub const CUPS_OPTS: &str = "EH:U:P:#:hlmo:pqrC:J:T:";
/// LPRng lpr option grammar.
pub const LPRNG_OPTS: &str = "ABblC:D:F:Ghi:kJ:K:#:m:NP:rR:sT:U:Vw:X:YZ:z1:2:3:4:";

const QUEUE_FLAG: char = 'P';
const NOTIFY_FLAG: char = 'N';

fn grammars() -> Vec<(System, Grammar)> {
    vec![
        (System::Cups, Grammar::new(CUPS_OPTS)),
        (System::Lprng, Grammar::new(LPRNG_OPTS)),
    ]
}

/// Builds the dispatch plan for one `lpr` invocation.
///
/// # Errors
///
/// Returns an error when no queue can be resolved at all, or when the
/// assembled LPRng argument vector fails to re-parse for translation
/// (a defect: this process built that vector).
pub fn run(args: Vec<String>, config: &Config, directory: &dyn Directory) -> Result<Invocation> {
    let mut args = args;
    let mut scrub = Vec::new();

    if let Some(injected) = &config.lpr_options {
        // The child is told to forget LPROPT, or LPRng would apply these
        // options a second time.
        let mut merged: Vec<String> = injected.split_whitespace().map(str::to_string).collect();
        merged.extend(args);
        args = merged;
        scrub.push(config::LPROPT_VAR.to_string());
    }

    let mut queue = resolver::default_queue(config, directory);
    let mut style = None;

    if let Some((system, parsed, operands)) = options::parse_args(&args, &grammars()) {
        style = Some(system);

        // The last queue specified in the arguments wins.
        let (queue_opts, parsed) = options::extract_opt(parsed, QUEUE_FLAG);
        if let Some(last) = queue_opts.last() {
            queue = last.value.clone();
        }

        // Users who did not opt out of notifications get the form the
        // detected grammar expects.
        let (notify_opts, mut parsed) = options::extract_opt(parsed, NOTIFY_FLAG);
        if notify_opts.is_empty() {
            if let Some(user) = &config.user {
                parsed.push(match system {
                    System::Cups => Opt::bare('m'),
                    System::Lprng => Opt::valued('m', format!("zephyr%{user}")),
                });
            }
        }

        args = options::join(&parsed, &operands);
    }

    let Some(queue) = queue.filter(|queue| !queue.is_empty()) else {
        return Err(Error::NoDefaultQueue {
            queue_flag: QUEUE_FLAG,
        });
    };

    let (system, server, queue) = resolver::find_queue(&queue, config, directory);

    args.insert(0, format!("-{QUEUE_FLAG}{queue}"));
    if let Some(user) = &config.user {
        args.insert(0, format!("-U{user}"));
    }

    if system == System::Cups && style == Some(System::Lprng) {
        args = translate_to_cups(args)?;
    }

    Ok(Invocation {
        system,
        command: "lpr".to_string(),
        args,
        cups_server: server,
        scrub,
    })
}

/// Re-parses a finished LPRng argument vector and renders its CUPS form.
fn translate_to_cups(args: Vec<String>) -> Result<Vec<String>> {
    let (parsed, operands) = options::parse(&args, &Grammar::new(LPRNG_OPTS))?;
    let translated = translate::lprng_lpr_to_cups(&parsed);
    let args = options::join(&translated, &operands);
    debug!("using cups-lpr {}", args.iter().join(" "));
    Ok(args)
}
