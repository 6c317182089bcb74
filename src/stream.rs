//! Rate-limited template streams.

use crossbeam_channel::{after, select, tick};
use rand::Rng;

use crate::config::{MessageOptions, StreamOptions};
use crate::sender::Sender;
use crate::template::Generator;
use crate::{Error, Result};

/// Outcome of a finished stream.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct StreamReport {
    pub sent: u64,
    pub failed: u64,
}

/// Generate, render and send one message per tick until the deadline passes.
///
/// A failed send is logged and counted; the stream keeps going. A template that
/// cannot be generated stops the stream with that error.
pub fn run<R: Rng>(
    generator: &mut Generator<R>,
    sender: &mut Sender,
    message: &MessageOptions,
    opts: &StreamOptions,
) -> Result<StreamReport> {
    opts.validate()?;
    // fail before the first tick rather than after it
    if !generator.contains(&opts.template) {
        return Err(Error::TemplateNotFound(opts.template.clone()));
    }

    let ticker = tick(opts.interval());
    let deadline = after(opts.duration);
    let mut report = StreamReport::default();

    loop {
        select! {
            recv(deadline) -> _ => break,
            recv(ticker) -> _ => {
                let body = generator.generate(&opts.template)?;
                let line = message.message(body).render();
                match sender.send(&line) {
                    Ok(()) => report.sent += 1,
                    Err(err) => {
                        report.failed += 1;
                        tracing::warn!(error = %err, "send failed");
                    }
                }
            }
        }
    }

    tracing::info!(sent = report.sent, failed = report.failed, "stream finished");
    Ok(report)
}

/// Render `count` messages from `template` without sending them.
pub fn preview<R: Rng>(
    generator: &mut Generator<R>,
    message: &MessageOptions,
    template: &str,
    count: usize,
) -> Result<Vec<String>> {
    (0..count)
        .map(|_| {
            generator
                .generate(template)
                .map(|body| message.message(body).render())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Fixtures;

    #[test]
    fn preview_renders_requested_count() {
        let mut generator = Generator::with_fixtures(Fixtures::seeded(3));
        let lines =
            preview(&mut generator, &MessageOptions::default(), "firewall-drop", 5).unwrap();
        assert_eq!(lines.len(), 5);
        for line in lines {
            assert!(line.starts_with("<134>"), "{line}");
            assert!(line.contains("ACTION=DROP"), "{line}");
        }
    }

    #[test]
    fn preview_unknown_template() {
        let mut generator = Generator::with_fixtures(Fixtures::seeded(3));
        let err = preview(&mut generator, &MessageOptions::default(), "nope", 5).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(name) if name == "nope"));
    }
}
