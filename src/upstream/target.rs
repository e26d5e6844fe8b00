//! Forwarding targets.
//!
//! The four destinations are fixed at startup; the dispatch router names a
//! target by kind and never sees the URL.

use std::fmt;

use url::Url;

use crate::config::TargetsConfig;

/// Which downstream endpoint a call goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardingTarget {
    Trade,
    Exit,
    /// Reverse flow, phase 1.
    ReverseExit,
    /// Reverse flow, phase 2.
    ReverseEntry,
}

impl ForwardingTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardingTarget::Trade => "trade",
            ForwardingTarget::Exit => "exit",
            ForwardingTarget::ReverseExit => "reverse_exit",
            ForwardingTarget::ReverseEntry => "reverse_entry",
        }
    }
}

impl fmt::Display for ForwardingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved target URLs.
#[derive(Debug, Clone)]
pub struct Targets {
    trade: Url,
    exit: Url,
    reverse_exit: Url,
    reverse_entry: Url,
}

impl Targets {
    /// Parse the configured URLs.
    pub fn from_config(config: &TargetsConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            trade: Url::parse(&config.trade)?,
            exit: Url::parse(&config.exit)?,
            reverse_exit: Url::parse(&config.reverse_exit)?,
            reverse_entry: Url::parse(&config.reverse_entry)?,
        })
    }

    pub fn url(&self, target: ForwardingTarget) -> &Url {
        match target {
            ForwardingTarget::Trade => &self.trade,
            ForwardingTarget::Exit => &self.exit,
            ForwardingTarget::ReverseExit => &self.reverse_exit,
            ForwardingTarget::ReverseEntry => &self.reverse_entry,
        }
    }
}
