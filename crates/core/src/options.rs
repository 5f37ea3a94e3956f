//! Short-option grammars and multi-grammar argument parsing.
//!
//! The wrapper commands have to accept two independent argument sets: the
//! CUPS and LPRng versions of each print command define disjoint
//! getopt-style grammars. This module compiles those specification strings
//! into [`Grammar`]s, parses an argument vector against one grammar with
//! GNU getopt semantics, and tries a preference-ordered list of grammars
//! until one accepts the input.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use log::debug;

use crate::error::{Error, Result};
use crate::system::System;

/// One recognized option: a short flag and its value, if the flag takes one.
///
/// Rendering an `Opt` produces the attached form the wrapped commands
/// accept (`-Pajax`, `-m`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opt {
    pub flag: char,
    pub value: Option<String>,
}

impl Opt {
    /// An argumentless flag.
    pub fn bare(flag: char) -> Self {
        Self { flag, value: None }
    }

    /// A flag carrying a value.
    pub fn valued(flag: char, value: impl Into<String>) -> Self {
        Self {
            flag,
            value: Some(value.into()),
        }
    }
}

impl Display for Opt {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "-{}", self.flag)?;
        if let Some(value) = &self.value {
            formatter.write_str(value)?;
        }
        Ok(())
    }
}

/// The set of short options one subsystem's version of a command accepts.
///
/// Compiled from a getopt specification string: every character is a flag,
/// and a trailing `:` marks the flag as taking a value.
#[derive(Clone, Debug)]
pub struct Grammar {
    flags: HashMap<char, bool>,
}

impl Grammar {
    pub fn new(spec: &str) -> Self {
        let mut flags = HashMap::new();
        let mut chars = spec.chars().peekable();
        while let Some(flag) = chars.next() {
            let takes_value = chars.peek() == Some(&':');
            if takes_value {
                chars.next();
            }
            flags.insert(flag, takes_value);
        }
        Self { flags }
    }

    /// Whether `flag` is part of this grammar, and if so whether it takes a
    /// value.
    fn takes_value(&self, flag: char) -> Option<bool> {
        self.flags.get(&flag).copied()
    }
}

/// Parses an argument vector against a single grammar.
///
/// GNU getopt semantics: operands may be interleaved with options, `--`
/// ends option scanning, short flags cluster (`-lh`), and values either
/// attach (`-Pajax`) or consume the following argument (`-P ajax`). A lone
/// `-` is an operand. Long options are not part of any wrapped grammar and
/// fail the parse.
///
/// # Errors
///
/// Returns an error for an unknown flag, a value-taking flag at the end of
/// the input, or a long option. Inputs come from the same toolchain that
/// defines the grammars, so at the call sites that cannot fall back to
/// another grammar these errors indicate a defect, not bad user input.
pub fn parse(args: &[String], grammar: &Grammar) -> Result<(Vec<Opt>, Vec<String>)> {
    let mut options = Vec::new();
    let mut operands = Vec::new();

    let mut tokens = args.iter();
    while let Some(token) = tokens.next() {
        if token == "--" {
            operands.extend(tokens.by_ref().cloned());
            break;
        }

        if token.starts_with("--") {
            return Err(Error::UnsupportedLongOption(token.clone()));
        }

        if token.len() > 1 && token.starts_with('-') {
            let mut flags = token[1..].chars();
            while let Some(flag) = flags.next() {
                match grammar.takes_value(flag) {
                    None => return Err(Error::UnrecognizedOption(flag)),
                    Some(false) => options.push(Opt::bare(flag)),
                    Some(true) => {
                        let attached: String = flags.by_ref().collect();
                        let value = if attached.is_empty() {
                            match tokens.next() {
                                Some(value) => value.clone(),
                                None => return Err(Error::MissingOptionValue(flag)),
                            }
                        } else {
                            attached
                        };
                        options.push(Opt::valued(flag, value));
                    }
                }
            }
        } else {
            operands.push(token.clone());
        }
    }

    Ok((options, operands))
}

/// Parses an argument vector, given multiple ways to parse it.
///
/// `grammars` lists the candidate `(System, Grammar)` pairs in preference
/// order. The first grammar that accepts the input decides which
/// subsystem's version of the command the arguments were written for.
///
/// Returns `None` when every grammar rejects the input. Callers recover by
/// falling back to defaults and forwarding the argument vector untouched.
pub fn parse_args(
    args: &[String],
    grammars: &[(System, Grammar)],
) -> Option<(System, Vec<Opt>, Vec<String>)> {
    for (system, grammar) in grammars {
        match parse(args, grammar) {
            Ok((options, operands)) => {
                debug!("arguments parse as {system}");
                return Some((*system, options, operands));
            }
            Err(e) => {
                debug!("arguments do not parse as {system}: {e}");
            }
        }
    }
    None
}

/// Finds every occurrence of a particular flag and removes it.
///
/// Returns `(extracted, remaining)`, both preserving input order.
pub fn extract_opt(options: Vec<Opt>, flag: char) -> (Vec<Opt>, Vec<Opt>) {
    options.into_iter().partition(|option| option.flag == flag)
}

/// Re-renders sliced-up options and operands as an argument vector.
///
/// Options come first in attached form, then the operands, matching the
/// order the wrapped commands were originally handed.
pub fn join(options: &[Opt], operands: &[String]) -> Vec<String> {
    options
        .iter()
        .map(ToString::to_string)
        .chain(operands.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn test_grammars() -> Vec<(System, Grammar)> {
        vec![
            (System::Cups, Grammar::new("P:")),
            (System::Lprng, Grammar::new("X:")),
        ]
    }

    #[test]
    fn test_parse_attached_value() {
        let (options, operands) = parse(&args(&["-Pmeadow", "my_job"]), &Grammar::new("P:")).unwrap();
        assert_eq!(options, vec![Opt::valued('P', "meadow")]);
        assert_eq!(operands, args(&["my_job"]));
    }

    #[test]
    fn test_parse_separate_value() {
        let (options, operands) = parse(&args(&["-P", "meadow"]), &Grammar::new("P:")).unwrap();
        assert_eq!(options, vec![Opt::valued('P', "meadow")]);
        assert!(operands.is_empty());
    }

    #[test]
    fn test_parse_separate_value_may_look_like_an_option() {
        let (options, _) = parse(&args(&["-P", "-meadow"]), &Grammar::new("P:")).unwrap();
        assert_eq!(options, vec![Opt::valued('P', "-meadow")]);
    }

    #[test]
    fn test_parse_clustered_flags() {
        let (options, _) = parse(&args(&["-al"]), &Grammar::new("al")).unwrap();
        assert_eq!(options, vec![Opt::bare('a'), Opt::bare('l')]);
    }

    #[test]
    fn test_parse_cluster_ending_in_value() {
        let (options, _) = parse(&args(&["-lPajax"]), &Grammar::new("lP:")).unwrap();
        assert_eq!(options, vec![Opt::bare('l'), Opt::valued('P', "ajax")]);
    }

    #[test]
    fn test_parse_permutes_operands() {
        let (options, operands) =
            parse(&args(&["my_job", "-Pmeadow", "other_job"]), &Grammar::new("P:")).unwrap();
        assert_eq!(options, vec![Opt::valued('P', "meadow")]);
        assert_eq!(operands, args(&["my_job", "other_job"]));
    }

    #[test]
    fn test_parse_double_dash_ends_options() {
        let (options, operands) =
            parse(&args(&["-Pmeadow", "--", "-Pother"]), &Grammar::new("P:")).unwrap();
        assert_eq!(options, vec![Opt::valued('P', "meadow")]);
        assert_eq!(operands, args(&["-Pother"]));
    }

    #[test]
    fn test_parse_lone_dash_is_an_operand() {
        let (options, operands) = parse(&args(&["-"]), &Grammar::new("P:")).unwrap();
        assert!(options.is_empty());
        assert_eq!(operands, args(&["-"]));
    }

    #[test]
    fn test_parse_unknown_flag() {
        let result = parse(&args(&["-wtf"]), &Grammar::new("P:"));
        assert!(matches!(result, Err(Error::UnrecognizedOption('w'))));
    }

    #[test]
    fn test_parse_missing_value() {
        let result = parse(&args(&["-P"]), &Grammar::new("P:"));
        assert!(matches!(result, Err(Error::MissingOptionValue('P'))));
    }

    #[test]
    fn test_parse_rejects_long_options() {
        let result = parse(&args(&["--help"]), &Grammar::new("P:"));
        assert!(matches!(result, Err(Error::UnsupportedLongOption(_))));
    }

    #[test]
    fn test_parse_args_valid_primary_args() {
        let result = parse_args(&args(&["-Pmeadow", "my_job"]), &test_grammars());
        assert_eq!(
            result,
            Some((
                System::Cups,
                vec![Opt::valued('P', "meadow")],
                args(&["my_job"])
            ))
        );
    }

    #[test]
    fn test_parse_args_valid_secondary_args() {
        let result = parse_args(&args(&["-Xmeadow", "my_job"]), &test_grammars());
        assert_eq!(
            result,
            Some((
                System::Lprng,
                vec![Opt::valued('X', "meadow")],
                args(&["my_job"])
            ))
        );
    }

    #[test]
    fn test_parse_args_empty_args() {
        let result = parse_args(&[], &test_grammars());
        assert_eq!(result, Some((System::Cups, Vec::new(), Vec::new())));
    }

    #[test]
    fn test_parse_args_invalid_args() {
        let result = parse_args(&args(&["-wtf"]), &test_grammars());
        assert_eq!(result, None);
    }

    #[test]
    fn test_extract_opt() {
        let options = vec![
            Opt::valued('P', "barbar"),
            Opt::bare('l'),
            Opt::valued('P', "meadow"),
        ];
        let (extracted, remaining) = extract_opt(options, 'P');
        assert_eq!(
            extracted,
            vec![Opt::valued('P', "barbar"), Opt::valued('P', "meadow")]
        );
        assert_eq!(remaining, vec![Opt::bare('l')]);
    }

    #[test]
    fn test_extract_opt_no_match() {
        let options = vec![Opt::bare('l')];
        let (extracted, remaining) = extract_opt(options, 'P');
        assert!(extracted.is_empty());
        assert_eq!(remaining, vec![Opt::bare('l')]);
    }

    #[test]
    fn test_join_renders_attached_form() {
        let options = vec![Opt::valued('P', "meadow"), Opt::bare('m')];
        let rendered = join(&options, &args(&["my_job"]));
        assert_eq!(rendered, args(&["-Pmeadow", "-m", "my_job"]));
    }

    #[test]
    fn test_opt_display() {
        assert_eq!(Opt::valued('P', "ajax").to_string(), "-Pajax");
        assert_eq!(Opt::bare('m').to_string(), "-m");
    }
}
