//! Replay of recorded log lines.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::config::MessageOptions;
use crate::sender::Sender;
use crate::Result;

/// App name the replay command stamps on lines unless told otherwise.
pub const REPLAY_APP_NAME: &str = "replay";

/// Pause before each line when timing is preserved.
pub const LINE_DELAY: Duration = Duration::from_millis(10);

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ReplayReport {
    pub sent: u64,
    pub failed: u64,
}

/// Wrap every line of `reader` in a syslog header and send it.
///
/// Lines are split on `\n` with a trailing `\r` removed. Bytes that are not valid
/// UTF-8 are replaced with U+FFFD rather than ending the replay. Send failures are
/// logged and counted. A read error ends the replay.
pub fn run<B: BufRead>(
    mut reader: B,
    sender: &mut Sender,
    message: &MessageOptions,
    preserve_timing: bool,
) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(trim_line_ending(&buf));
        if preserve_timing {
            thread::sleep(LINE_DELAY);
        }
        match sender.send(&message.message(line.into_owned()).render()) {
            Ok(()) => report.sent += 1,
            Err(err) => {
                report.failed += 1;
                tracing::warn!(error = %err, "send failed");
            }
        }
    }

    Ok(report)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

pub fn run_file(
    path: impl AsRef<Path>,
    sender: &mut Sender,
    message: &MessageOptions,
    preserve_timing: bool,
) -> Result<ReplayReport> {
    let path = path.as_ref();
    let file = File::open(path)?;
    tracing::info!(path = %path.display(), target = %sender.addr(), "replaying");
    run(BufReader::new(file), sender, message, preserve_timing)
}
