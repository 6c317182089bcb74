//! In-memory representation of a single Syslog message, and its wire rendering.

use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};

use crate::facility::Facility;
use crate::severity::Severity;
use crate::{Error, Result};

/// App name used when the caller does not set one.
pub const DEFAULT_APP_NAME: &str = "sysloggen";

/// RFC 5424 NILVALUE
const NIL: &str = "-";

/// Wire layout used by [`Message::render`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Format {
    /// BSD syslog: `<PRI>Mmm dd hh:mm:ss host tag: msg`
    #[default]
    RFC3164,
    /// IETF syslog, version 1, without structured data.
    RFC5424,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::RFC3164 => "rfc3164",
            Format::RFC5424 => "rfc5424",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rfc3164" => Ok(Format::RFC3164),
            "rfc5424" => Ok(Format::RFC5424),
            _ => Err(Error::InvalidConfig(format!("unknown syslog format: {s}"))),
        }
    }
}

/// A syslog record waiting to be rendered.
///
/// Fields are public and may be overwritten freely before calling [`Message::render`].
/// Nothing is validated: whatever is stored is what goes on the wire.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    pub facility: Facility,
    pub severity: Severity,
    pub timestamp: DateTime<FixedOffset>,
    pub hostname: String,
    pub app_name: String,
    pub proc_id: Option<String>,
    /// Only rendered by [`Format::RFC5424`].
    pub msg_id: Option<String>,
    pub msg: String,
    pub format: Format,
}

impl Message {
    /// Build a message stamped with the current local time and host name.
    ///
    /// Defaults to `local0.info` in RFC 3164 layout. If the host name cannot be
    /// determined it is left empty.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            facility: Facility::default(),
            severity: Severity::default(),
            timestamp: Local::now().fixed_offset(),
            hostname: local_hostname(),
            app_name: DEFAULT_APP_NAME.to_string(),
            proc_id: None,
            msg_id: None,
            msg: msg.into(),
            format: Format::default(),
        }
    }

    #[must_use]
    pub fn with_facility(mut self, facility: Facility) -> Self {
        self.facility = facility;
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    #[must_use]
    pub fn with_proc_id(mut self, proc_id: impl Into<String>) -> Self {
        self.proc_id = Some(proc_id.into());
        self
    }

    #[must_use]
    pub fn with_msg_id(mut self, msg_id: impl Into<String>) -> Self {
        self.msg_id = Some(msg_id.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// PRI value, `facility * 8 + severity`. Always within 0..=191.
    #[inline]
    pub fn priority(&self) -> u8 {
        (self.facility.code() << 3) | self.severity.code()
    }

    /// Render the wire text. No trailing newline; framing belongs to the transport.
    pub fn render(&self) -> String {
        let mut buf = String::with_capacity(64 + self.msg.len());
        let written = match self.format {
            Format::RFC3164 => self.write_rfc3164(&mut buf),
            Format::RFC5424 => self.write_rfc5424(&mut buf),
        };
        written.expect("writing to a String never fails");
        buf
    }

    // <PRI>Mmm dd hh:mm:ss HOSTNAME TAG: MSG
    fn write_rfc3164(&self, buf: &mut String) -> fmt::Result {
        write!(
            buf,
            "<{}>{} {} {}",
            self.priority(),
            self.timestamp.format("%b %e %H:%M:%S"),
            self.hostname,
            self.app_name
        )?;
        if let Some(proc_id) = present(&self.proc_id) {
            write!(buf, "[{proc_id}]")?;
        }
        write!(buf, ": {}", self.msg)
    }

    // <PRI>1 TIMESTAMP HOSTNAME APP-NAME PROCID MSGID STRUCTURED-DATA MSG
    fn write_rfc5424(&self, buf: &mut String) -> fmt::Result {
        write!(
            buf,
            "<{}>1 {} {} {} {} {} {} {}",
            self.priority(),
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            nil_if_empty(&self.hostname),
            nil_if_empty(&self.app_name),
            present(&self.proc_id).unwrap_or(NIL),
            present(&self.msg_id).unwrap_or(NIL),
            NIL,
            self.msg
        )
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default()
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn nil_if_empty(field: &str) -> &str {
    if field.is_empty() {
        NIL
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 5, 7, 8, 9)
            .unwrap()
    }

    #[test]
    fn defaults() {
        let msg = Message::new("hello");
        assert_eq!(msg.facility, Facility::LOCAL0);
        assert_eq!(msg.severity, Severity::INFO);
        assert_eq!(msg.format, Format::RFC3164);
        assert_eq!(msg.app_name, DEFAULT_APP_NAME);
        assert_eq!(msg.proc_id, None);
        assert_eq!(msg.priority(), 134);
    }

    #[test]
    fn rfc3164_pads_day_with_space() {
        let msg = Message::new("body")
            .with_timestamp(fixed_time())
            .with_hostname("web01")
            .with_app_name("app");
        assert_eq!(msg.render(), "<134>Mar  5 07:08:09 web01 app: body");
    }

    #[test]
    fn rfc3164_empty_proc_id_has_no_brackets() {
        let msg = Message::new("body")
            .with_timestamp(fixed_time())
            .with_hostname("web01")
            .with_app_name("app")
            .with_proc_id("");
        assert!(!msg.render().contains('['));
    }

    #[test]
    fn rfc5424_micros_and_zulu() {
        let msg = Message::new("body")
            .with_format(Format::RFC5424)
            .with_timestamp(fixed_time())
            .with_hostname("web01")
            .with_app_name("app");
        assert_eq!(
            msg.render(),
            "<134>1 2024-03-05T07:08:09.000000Z web01 app - - - body"
        );
    }

    #[test]
    fn format_parse_is_case_insensitive() {
        assert_eq!("RFC5424".parse::<Format>().unwrap(), Format::RFC5424);
        assert_eq!("rfc3164".parse::<Format>().unwrap(), Format::RFC3164);
        assert!("json".parse::<Format>().is_err());
    }
}
