use std::fmt::{Display, Formatter};

/// A printing subsystem a wrapped command can belong to.
///
/// Doubles as the tag for the argument grammar that subsystem's version of
/// the command understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum System {
    Cups,
    Lprng,
}

/// Canonical preference order for the subsystems.
///
/// Order matters: grammar detection tries these in turn and the first
/// successful parse wins.
pub const SYSTEMS: [System; 2] = [System::Cups, System::Lprng];

impl System {
    /// Prefix of the subsystem-specific executable (`cups-lpr`, `lprng-lpq`).
    pub fn command_prefix(self) -> &'static str {
        match self {
            Self::Cups => "cups-",
            Self::Lprng => "lprng-",
        }
    }
}

impl Display for System {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cups => formatter.write_str("CUPS"),
            Self::Lprng => formatter.write_str("LPRng"),
        }
    }
}
