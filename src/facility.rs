use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Syslog facilities. Codes are from RFC 5424, names are from `<syslog.h>` on Linux.
///
/// Codes 12 to 15 have no `<syslog.h>` name on most platforms. They can be built with
/// [`Facility::from_code`] and rendered, but [`parse_facility`] does not know them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[allow(non_camel_case_types)]
pub enum Facility {
    KERN = 0,
    USER = 1,
    MAIL = 2,
    DAEMON = 3,
    AUTH = 4,
    SYSLOG = 5,
    LPR = 6,
    NEWS = 7,
    UUCP = 8,
    CRON = 9,
    AUTHPRIV = 10,
    FTP = 11,
    NTP = 12,
    AUDIT = 13,
    ALERT = 14,
    CLOCKD = 15,
    #[default]
    LOCAL0 = 16,
    LOCAL1 = 17,
    LOCAL2 = 18,
    LOCAL3 = 19,
    LOCAL4 = 20,
    LOCAL5 = 21,
    LOCAL6 = 22,
    LOCAL7 = 23,
}

/// Names accepted by [`parse_facility`].
pub const FACILITY_NAMES: [(&str, Facility); 20] = [
    ("kern", Facility::KERN),
    ("user", Facility::USER),
    ("mail", Facility::MAIL),
    ("daemon", Facility::DAEMON),
    ("auth", Facility::AUTH),
    ("syslog", Facility::SYSLOG),
    ("lpr", Facility::LPR),
    ("news", Facility::NEWS),
    ("uucp", Facility::UUCP),
    ("cron", Facility::CRON),
    ("authpriv", Facility::AUTHPRIV),
    ("ftp", Facility::FTP),
    ("local0", Facility::LOCAL0),
    ("local1", Facility::LOCAL1),
    ("local2", Facility::LOCAL2),
    ("local3", Facility::LOCAL3),
    ("local4", Facility::LOCAL4),
    ("local5", Facility::LOCAL5),
    ("local6", Facility::LOCAL6),
    ("local7", Facility::LOCAL7),
];

impl Facility {
    /// Convert a numeric code (as used in the wire serialization) into a `Facility`
    pub fn from_code(code: u8) -> Option<Self> {
        let fac = match code {
            0 => Facility::KERN,
            1 => Facility::USER,
            2 => Facility::MAIL,
            3 => Facility::DAEMON,
            4 => Facility::AUTH,
            5 => Facility::SYSLOG,
            6 => Facility::LPR,
            7 => Facility::NEWS,
            8 => Facility::UUCP,
            9 => Facility::CRON,
            10 => Facility::AUTHPRIV,
            11 => Facility::FTP,
            12 => Facility::NTP,
            13 => Facility::AUDIT,
            14 => Facility::ALERT,
            15 => Facility::CLOCKD,
            16 => Facility::LOCAL0,
            17 => Facility::LOCAL1,
            18 => Facility::LOCAL2,
            19 => Facility::LOCAL3,
            20 => Facility::LOCAL4,
            21 => Facility::LOCAL5,
            22 => Facility::LOCAL6,
            23 => Facility::LOCAL7,
            _ => return None,
        };

        Some(fac)
    }

    /// Numeric facility code, 0 through 23.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert a syslog facility into a unique string representation
    pub fn as_str(self) -> &'static str {
        match self {
            Facility::KERN => "kern",
            Facility::USER => "user",
            Facility::MAIL => "mail",
            Facility::DAEMON => "daemon",
            Facility::AUTH => "auth",
            Facility::SYSLOG => "syslog",
            Facility::LPR => "lpr",
            Facility::NEWS => "news",
            Facility::UUCP => "uucp",
            Facility::CRON => "cron",
            Facility::AUTHPRIV => "authpriv",
            Facility::FTP => "ftp",
            Facility::NTP => "ntp",
            Facility::AUDIT => "audit",
            Facility::ALERT => "alert",
            Facility::CLOCKD => "clockd",
            Facility::LOCAL0 => "local0",
            Facility::LOCAL1 => "local1",
            Facility::LOCAL2 => "local2",
            Facility::LOCAL3 => "local3",
            Facility::LOCAL4 => "local4",
            Facility::LOCAL5 => "local5",
            Facility::LOCAL6 => "local6",
            Facility::LOCAL7 => "local7",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_facility(s)
    }
}

/// Look up a facility by its exact, lowercase name.
///
/// No normalization happens here; callers lowercase user input first.
pub fn parse_facility(name: &str) -> Result<Facility> {
    FACILITY_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, facility)| *facility)
        .ok_or_else(|| Error::UnknownFacility(name.to_string()))
}
