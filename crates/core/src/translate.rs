//! Translation of LPRng `lpr` options into their CUPS equivalents.
//!
//! Used when an invocation was written in the LPRng grammar but the queue
//! resolves to a CUPS server. The mapping is a fixed per-flag action table;
//! options it does not cover are dropped with a diagnostic rather than
//! failing the whole invocation.

use crate::options::Opt;

/// How one recognized LPRng flag carries over to CUPS.
enum Action {
    /// Forward under the given CUPS flag, keeping any value.
    Rename(char),
    /// Forward the flag alone. The CUPS side infers what the value named.
    DropValue(char),
    /// Map an enumerated value to a CUPS job option (`-o key=value`).
    /// Values outside the table have no CUPS counterpart and are dropped.
    JobOption(&'static [(&'static str, &'static str)]),
}

const SIDES: &[(&str, &str)] = &[
    ("simplex", "sides=one-sided"),
    ("duplex", "sides=two-sided-long-edge"),
    ("duplexshort", "sides=two-sided-short-edge"),
];

fn action_for(flag: char) -> Option<Action> {
    match flag {
        'b' | 'l' => Some(Action::Rename('l')),
        'h' => Some(Action::Rename('h')),
        'J' => Some(Action::Rename('J')),
        'K' | '#' => Some(Action::Rename('#')),
        'P' => Some(Action::Rename('P')),
        'T' => Some(Action::Rename('T')),
        'U' => Some(Action::Rename('U')),
        'Z' => Some(Action::JobOption(SIDES)),
        // Notifications always go to the submitting user on the CUPS side,
        // so any explicit recipient is dropped.
        'm' => Some(Action::DropValue('m')),
        _ => None,
    }
}

/// Translates parsed LPRng `lpr` options into CUPS `lpr` options.
///
/// Pure except for the stderr diagnostic on unmapped flags; input order is
/// preserved in the output.
pub fn lprng_lpr_to_cups(options: &[Opt]) -> Vec<Opt> {
    let mut cups = Vec::new();
    for option in options {
        match action_for(option.flag) {
            Some(Action::Rename(flag)) => cups.push(Opt {
                flag,
                value: option.value.clone(),
            }),
            Some(Action::DropValue(flag)) => cups.push(Opt::bare(flag)),
            Some(Action::JobOption(table)) => {
                let value = option.value.as_deref().unwrap_or("");
                if let Some((_, job_option)) = table.iter().find(|(name, _)| *name == value) {
                    cups.push(Opt::valued('o', *job_option));
                }
            }
            None => eprintln!("Warning: option {option} not converted to CUPS"),
        }
    }
    cups
}
