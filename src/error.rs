use std::io;

use thiserror::Error;

/// Errors surfaced by message construction, template generation and transport.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("unable to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("unable to send to {addr}: {source}")]
    Send {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("invalid template {name}: {source}")]
    InvalidTemplate {
        name: String,
        #[source]
        source: TemplateError,
    },

    #[error("unknown facility: {0}")]
    UnknownFacility(String),

    #[error("unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Reasons a template pattern fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),

    #[error("placeholder opened at byte {offset} is never closed")]
    UnclosedPlaceholder { offset: usize },

    #[error("unmatched '}}' at byte {offset}")]
    UnmatchedBrace { offset: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
