//! Named log-line templates filled with random fixture values.
//!
//! A pattern is literal text with `{Name}` placeholders. `{{` and `}}` stand for
//! literal braces. Recognized placeholders are `Timestamp`, `IP`, `User`, `Action`,
//! `Path`, `Status` and `Port`; anything else fails to parse.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{Local, SecondsFormat};
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::TemplateError;
use crate::fixture::Fixtures;
use crate::{Error, Result};

/// Templates every [`Generator`] starts with.
pub const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    (
        "ssh-failed",
        "Failed password for {User} from {IP} port {Port} ssh2",
    ),
    (
        "ssh-accepted",
        "Accepted publickey for {User} from {IP} port {Port} ssh2",
    ),
    (
        "nginx-access",
        r#"{IP} - {User} [{Timestamp}] "GET {Path} HTTP/1.1" {Status} 1024 "-" "Mozilla/5.0""#,
    ),
    (
        "firewall-drop",
        "SRC={IP} DST=192.168.1.1 PROTO=TCP DPT={Port} ACTION=DROP",
    ),
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Field {
    Timestamp,
    IP,
    User,
    Action,
    Path,
    Status,
    Port,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "Timestamp" => Field::Timestamp,
            "IP" => Field::IP,
            "User" => Field::User,
            "Action" => Field::Action,
            "Path" => Field::Path,
            "Status" => Field::Status,
            "Port" => Field::Port,
            _ => return None,
        };

        Some(field)
    }
}

/// One full draw of placeholder values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldValues {
    pub timestamp: String,
    pub ip: String,
    pub user: String,
    pub action: String,
    pub path: String,
    pub status: u16,
    pub port: u16,
}

impl FieldValues {
    /// Draw every field exactly once, whether or not a template uses it.
    pub fn draw<R: Rng>(fixtures: &mut Fixtures<R>) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            ip: fixtures.ip(),
            user: fixtures.user().to_string(),
            action: fixtures.action().to_string(),
            path: fixtures.path().to_string(),
            status: fixtures.status_code(),
            port: fixtures.port(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(Field),
}

/// A parsed pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(pattern: &str) -> std::result::Result<Self, TemplateError> {
        let bytes = pattern.as_bytes();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut start = 0;
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b'{' if bytes.get(pos + 1) == Some(&b'{') => {
                    literal.push_str(&pattern[start..pos]);
                    literal.push('{');
                    pos += 2;
                    start = pos;
                }
                b'}' if bytes.get(pos + 1) == Some(&b'}') => {
                    literal.push_str(&pattern[start..pos]);
                    literal.push('}');
                    pos += 2;
                    start = pos;
                }
                b'{' => {
                    literal.push_str(&pattern[start..pos]);
                    let close = pattern[pos + 1..]
                        .find('}')
                        .map(|i| pos + 1 + i)
                        .ok_or(TemplateError::UnclosedPlaceholder { offset: pos })?;
                    let name = &pattern[pos + 1..close];
                    let field = Field::from_name(name)
                        .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(field));
                    pos = close + 1;
                    start = pos;
                }
                b'}' => return Err(TemplateError::UnmatchedBrace { offset: pos }),
                _ => pos += 1,
            }
        }

        literal.push_str(&pattern[start..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Placeholders in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(field) => Some(*field),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, values: &FieldValues) -> String {
        let mut out = String::with_capacity(128);
        self.write_to(&mut out, values)
            .expect("writing to a String never fails");
        out
    }

    fn write_to(&self, out: &mut String, values: &FieldValues) -> std::fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.write_str(text)?,
                Segment::Placeholder(Field::Timestamp) => out.write_str(&values.timestamp)?,
                Segment::Placeholder(Field::IP) => out.write_str(&values.ip)?,
                Segment::Placeholder(Field::User) => out.write_str(&values.user)?,
                Segment::Placeholder(Field::Action) => out.write_str(&values.action)?,
                Segment::Placeholder(Field::Path) => out.write_str(&values.path)?,
                Segment::Placeholder(Field::Status) => write!(out, "{}", values.status)?,
                Segment::Placeholder(Field::Port) => write!(out, "{}", values.port)?,
            }
        }
        Ok(())
    }
}

/// Registry of named templates plus the fixture source used to fill them.
#[derive(Debug)]
pub struct Generator<R = StdRng> {
    templates: HashMap<String, Template>,
    fixtures: Fixtures<R>,
}

impl Generator<StdRng> {
    pub fn new() -> Self {
        Self::with_fixtures(Fixtures::new())
    }
}

impl Default for Generator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Generator<R> {
    /// Registry holding the built-in templates, drawing values from `fixtures`.
    pub fn with_fixtures(fixtures: Fixtures<R>) -> Self {
        let mut generator = Self {
            templates: HashMap::with_capacity(BUILTIN_TEMPLATES.len()),
            fixtures,
        };
        for (name, pattern) in BUILTIN_TEMPLATES {
            generator
                .register(name, pattern)
                .expect("built-in templates are valid");
        }
        generator
    }

    /// Parse `pattern` and bind it to `name`, replacing any previous binding.
    ///
    /// On a parse error the registry is left untouched.
    pub fn register(&mut self, name: impl Into<String>, pattern: &str) -> Result<()> {
        let name = name.into();
        match Template::parse(pattern) {
            Ok(template) => {
                self.templates.insert(name, template);
                Ok(())
            }
            Err(source) => Err(Error::InvalidTemplate { name, source }),
        }
    }

    /// Register many user templates. Invalid ones are skipped and returned; the
    /// valid ones stay registered.
    pub fn register_all<'a, I>(&mut self, templates: I) -> Vec<Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rejected = Vec::new();
        for (name, pattern) in templates {
            if let Err(err) = self.register(name, pattern) {
                tracing::warn!(template = name, error = %err, "skipping template");
                rejected.push(err);
            }
        }
        rejected
    }

    pub fn generate(&mut self, name: &str) -> Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))?;
        let values = FieldValues::draw(&mut self.fixtures);
        Ok(template.render(&values))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn list_templates(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}
