// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fmt;

/// Database/filter combination requested from the server.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Paired alignment; sent as the empty mode string to the pairing endpoint.
    Pair,
    Env,
    All,
    EnvNoFilter,
    NoFilter,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Pair => "",
            Mode::Env => "env",
            Mode::All => "all",
            Mode::EnvNoFilter => "env-nofilter",
            Mode::NoFilter => "nofilter",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Mode::Pair => "ticket/pair",
            _ => "ticket/msa",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Pair => write!(f, "pair"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// What the caller asks for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    pub use_env: bool,
    pub use_filter: bool,
    pub use_templates: bool,
    pub use_pairing: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            use_env: true,
            use_filter: true,
            use_templates: false,
            use_pairing: false,
        }
    }
}

/// Options after resolution: pairing turns environmental databases and templates off.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JobSettings {
    pub mode: Mode,
    pub use_env: bool,
    pub use_templates: bool,
}

impl SearchOptions {
    pub fn resolve(&self) -> JobSettings {
        if self.use_pairing {
            return JobSettings {
                mode: Mode::Pair,
                use_env: false,
                use_templates: false,
            };
        }
        let mode = match (self.use_filter, self.use_env) {
            (true, true) => Mode::Env,
            (true, false) => Mode::All,
            (false, true) => Mode::EnvNoFilter,
            (false, false) => Mode::NoFilter,
        };
        JobSettings {
            mode,
            use_env: self.use_env,
            use_templates: self.use_templates,
        }
    }
}
