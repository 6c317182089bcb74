//! Synthetic syslog traffic for testing log-ingestion pipelines and detection rules.
//!
//! Messages are rendered as [RFC 3164](https://tools.ietf.org/html/rfc3164) or
//! [RFC 5424](https://tools.ietf.org/html/rfc5424) text and delivered over UDP, TCP
//! or TLS. Bodies come from literal text, replayed files, canned attack sequences,
//! or named templates filled with random but plausible values.
//!
//! # Example
//!
//! Send one templated line to a local collector
//!
//! ```no_run
//! use sysloggen::{Facility, Format, Generator, Message, Protocol, Sender, Severity};
//!
//! let mut generator = Generator::new();
//! let body = generator.generate("ssh-failed").unwrap();
//!
//! let msg = Message::new(body)
//!     .with_facility(Facility::AUTH)
//!     .with_severity(Severity::WARNING)
//!     .with_format(Format::RFC5424);
//!
//! let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", 514).unwrap();
//! sender.send(&msg.render()).unwrap();
//! sender.close().unwrap();
//! ```
//!
//! # Unimplemented Features
//!
//!  * RFC 5424 structured data. The SD field is always rendered as `-`.
//!  * Delivery acknowledgement, buffering under backpressure, retries beyond a
//!    single reconnect.
//!

pub mod config;
mod error;
mod facility;
pub mod fixture;
mod message;
pub mod replay;
pub mod sender;
mod severity;
pub mod simulate;
pub mod stream;
pub mod template;

pub use config::{MessageOptions, ReplayOptions, Simulation, StreamOptions, Target};
pub use error::{Error, Result, TemplateError};
pub use facility::{parse_facility, Facility, FACILITY_NAMES};
pub use fixture::Fixtures;
pub use message::{Format, Message, DEFAULT_APP_NAME};
pub use sender::{Protocol, Sender, SenderOptions};
pub use severity::{parse_severity, Severity, SEVERITY_NAMES};
pub use template::{Generator, Template};
