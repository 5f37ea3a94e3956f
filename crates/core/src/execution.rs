//! Running an assembled dispatch plan.

use std::fmt::{Display, Formatter};
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};
use crate::system::System;

/// Names the CUPS server in the child environment.
pub const CUPS_SERVER_VAR: &str = "CUPS_SERVER";

/// A fully assembled plan for one wrapped command.
///
/// Building an `Invocation` has no side effects; everything the child
/// process needs, including environment adjustments, is carried here and
/// applied by [`Invocation::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Subsystem whose command should receive the job.
    pub system: System,
    /// The wrapped command name (`lpr`, `lpq`, ...).
    pub command: String,
    /// Final argument list, excluding argv[0].
    pub args: Vec<String>,
    /// Server to point the child's spooler client at, if any.
    pub cups_server: Option<String>,
    /// Environment variables to remove from the child.
    pub scrub: Vec<String>,
}

impl Invocation {
    /// Name of the subsystem-specific executable to run.
    pub fn target(&self) -> String {
        format!("{}{}", self.system.command_prefix(), self.command)
    }

    /// Spawns the planned command and returns its exit code.
    ///
    /// The child keeps the wrapped command name as its argv[0] and inherits
    /// stdio, so to the user it is indistinguishable from having run the
    /// real command directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the subsystem command cannot be spawned or
    /// waited on.
    pub fn run(&self) -> Result<i32> {
        debug!("running {self}");

        let mut command = Command::new(self.target());
        command
            .arg0(&self.command)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(server) = &self.cups_server {
            command.env(CUPS_SERVER_VAR, server);
        }
        for var in &self.scrub {
            command.env_remove(var);
        }

        let status = command
            .spawn()
            .map_err(|e| Error::subprocess(self.target(), e))?
            .wait()
            .map_err(|e| Error::subprocess(self.target(), e))?;

        Ok(status.code().unwrap_or(1))
    }
}

impl Display for Invocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(server) = &self.cups_server {
            write!(formatter, "{CUPS_SERVER_VAR}={server} ")?;
        }
        formatter.write_str(&self.target())?;
        for arg in &self.args {
            write!(formatter, " {arg}")?;
        }
        Ok(())
    }
}
