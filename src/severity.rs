use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Syslog Severities from RFC 5424.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum Severity {
    EMERG = 0,
    ALERT = 1,
    CRIT = 2,
    ERR = 3,
    WARNING = 4,
    NOTICE = 5,
    #[default]
    INFO = 6,
    DEBUG = 7,
}

/// Names accepted by [`parse_severity`].
pub const SEVERITY_NAMES: [(&str, Severity); 8] = [
    ("emerg", Severity::EMERG),
    ("alert", Severity::ALERT),
    ("crit", Severity::CRIT),
    ("err", Severity::ERR),
    ("warning", Severity::WARNING),
    ("notice", Severity::NOTICE),
    ("info", Severity::INFO),
    ("debug", Severity::DEBUG),
];

impl Severity {
    /// Convert a numeric code into a `Severity`.
    ///
    /// The wire protocol only carries 0..7, anything else is `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        let severity = match code {
            0 => Severity::EMERG,
            1 => Severity::ALERT,
            2 => Severity::CRIT,
            3 => Severity::ERR,
            4 => Severity::WARNING,
            5 => Severity::NOTICE,
            6 => Severity::INFO,
            7 => Severity::DEBUG,
            _ => return None,
        };

        Some(severity)
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert a syslog severity into a unique string representation
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::EMERG => "emerg",
            Severity::ALERT => "alert",
            Severity::CRIT => "crit",
            Severity::ERR => "err",
            Severity::WARNING => "warning",
            Severity::NOTICE => "notice",
            Severity::INFO => "info",
            Severity::DEBUG => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_severity(s)
    }
}

/// Look up a severity by its exact, lowercase name.
pub fn parse_severity(name: &str) -> Result<Severity> {
    SEVERITY_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, severity)| *severity)
        .ok_or_else(|| Error::UnknownSeverity(name.to_string()))
}
