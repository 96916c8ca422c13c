use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::CmdGroupError;

/// Shell used to interpret a command's text (`<shell> -c "<command>"`).
///
/// Only a small fixed set is supported; anything else is rejected before a
/// process is ever spawned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Shell {
    Zsh,
    Bash,
    #[default]
    Sh,
}

impl Shell {
    /// Program name looked up on `PATH`.
    pub fn program(self) -> &'static str {
        match self {
            Shell::Zsh => "zsh",
            Shell::Bash => "bash",
            Shell::Sh => "sh",
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for Shell {
    type Err = CmdGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "sh" => Ok(Shell::Sh),
            "zsh" => Ok(Shell::Zsh),
            "bash" => Ok(Shell::Bash),
            other => Err(CmdGroupError::UnsupportedShell(other.to_string())),
        }
    }
}

impl TryFrom<String> for Shell {
    type Error = CmdGroupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
