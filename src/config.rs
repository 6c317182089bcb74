//! Per-invocation settings handed to the sending workflows.
//!
//! Nothing here is global: the command line (or a test) builds these values and
//! passes them down explicitly.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::message::{Format, Message, DEFAULT_APP_NAME};
use crate::sender::Protocol;
use crate::{Error, Facility, Result, Severity};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 514;

/// Where messages go.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(protocol: Protocol, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol,
            host: host.into(),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::new(Protocol::Udp, DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Header fields stamped onto every message body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessageOptions {
    pub app_name: String,
    pub format: Format,
    pub facility: Facility,
    pub severity: Severity,
    /// Overrides the local host name when set.
    pub hostname: Option<String>,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            format: Format::default(),
            facility: Facility::default(),
            severity: Severity::default(),
            hostname: None,
        }
    }
}

impl MessageOptions {
    /// Copy these header fields onto `msg`.
    pub fn apply(&self, mut msg: Message) -> Message {
        msg.app_name.clone_from(&self.app_name);
        msg.format = self.format;
        msg.facility = self.facility;
        msg.severity = self.severity;
        if let Some(hostname) = &self.hostname {
            msg.hostname.clone_from(hostname);
        }
        msg
    }

    pub fn message(&self, body: impl Into<String>) -> Message {
        self.apply(Message::new(body))
    }
}

/// Template stream settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamOptions {
    pub template: String,
    /// Messages per second.
    pub rate: u32,
    pub duration: Duration,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            template: "ssh-failed".to_string(),
            rate: 1,
            duration: Duration::from_secs(10),
        }
    }
}

impl StreamOptions {
    pub fn validate(&self) -> Result<()> {
        if self.rate == 0 {
            return Err(Error::InvalidConfig("rate must be at least 1".to_string()));
        }
        if self.duration.is_zero() {
            return Err(Error::InvalidConfig(
                "duration must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Time between two sends.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(1) / self.rate.max(1)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplayOptions {
    pub path: PathBuf,
    /// Pause briefly before each line instead of sending as fast as possible.
    pub preserve_timing: bool,
}

/// Canned attack sequences.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Simulation {
    BruteForce,
    PortScan,
}

impl Simulation {
    pub fn as_str(self) -> &'static str {
        match self {
            Simulation::BruteForce => "brute-force",
            Simulation::PortScan => "port-scan",
        }
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Simulation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "brute-force" => Ok(Simulation::BruteForce),
            "port-scan" => Ok(Simulation::PortScan),
            _ => Err(Error::InvalidConfig(format!(
                "unknown simulation type: {s} (available: brute-force, port-scan)"
            ))),
        }
    }
}

/// User templates loaded from TOML:
///
/// ```toml
/// [templates]
/// sudo-denied = "{User} : command not allowed ; COMMAND={Path}"
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct TemplateFile {
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

impl TemplateFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        text.parse()
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates
            .iter()
            .map(|(name, pattern)| (name.as_str(), pattern.as_str()))
    }
}

impl FromStr for TemplateFile {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_from_rate() {
        let opts = StreamOptions {
            rate: 4,
            ..StreamOptions::default()
        };
        assert_eq!(opts.interval(), Duration::from_millis(250));
    }

    #[test]
    fn zero_rate_rejected() {
        let opts = StreamOptions {
            rate: 0,
            ..StreamOptions::default()
        };
        assert!(matches!(opts.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn apply_overrides_headers() {
        let opts = MessageOptions {
            app_name: "sshd".to_string(),
            format: Format::RFC5424,
            facility: Facility::AUTH,
            severity: Severity::WARNING,
            hostname: Some("bastion".to_string()),
        };
        let msg = opts.message("hi");
        assert_eq!(msg.app_name, "sshd");
        assert_eq!(msg.hostname, "bastion");
        assert_eq!(msg.priority(), 36);
        assert_eq!(msg.format, Format::RFC5424);
    }

    #[test]
    fn simulation_names() {
        assert_eq!("brute-force".parse::<Simulation>().unwrap(), Simulation::BruteForce);
        assert_eq!("port-scan".parse::<Simulation>().unwrap(), Simulation::PortScan);
        assert!("ddos".parse::<Simulation>().is_err());
    }

    #[test]
    fn template_file_parses() {
        let file: TemplateFile = r#"
            [templates]
            sudo = "{User} : COMMAND={Path}"
            cron = "CMD (run-parts /etc/cron.hourly)"
        "#
        .parse()
        .unwrap();
        assert_eq!(file.templates.len(), 2);
        assert_eq!(file.templates["sudo"], "{User} : COMMAND={Path}");
    }

    #[test]
    fn target_addr() {
        let target = Target::default();
        assert_eq!(target.addr(), "127.0.0.1:514");
        assert_eq!(target.to_string(), "udp://127.0.0.1:514");
    }
}
