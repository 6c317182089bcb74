//! sysloggen - synthetic syslog traffic generator
//!
//! # Usage
//!
//! ```bash
//! # One message
//! sysloggen send --host 10.0.0.5 --proto tcp -m "disk almost full" --severity warning
//!
//! # 50 templated messages per second for two minutes
//! sysloggen generate -T nginx-access -r 50 -d 2m --format rfc5424
//!
//! # Replay a recorded file
//! sysloggen replay -f auth.log --proto tls --port 6514
//!
//! # Canned attack pattern
//! sysloggen simulate --type port-scan
//!
//! # Dry run
//! sysloggen preview -T ssh-failed
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sysloggen::config::{DEFAULT_HOST, DEFAULT_PORT};
use sysloggen::replay::REPLAY_APP_NAME;
use sysloggen::simulate::Pacing;
use sysloggen::{
    parse_facility, parse_severity, replay, simulate, stream, Format, Generator, MessageOptions,
    Protocol, ReplayOptions, Sender, Simulation, StreamOptions, Target, DEFAULT_APP_NAME,
};

/// Generate syslog traffic and attack patterns for SIEM pipeline testing
#[derive(Parser, Debug)]
#[command(name = "sysloggen")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a single syslog message
    Send(SendArgs),
    /// Generate high-volume syslog traffic from templates
    Generate(GenerateArgs),
    /// Replay log lines from a file
    Replay(ReplayArgs),
    /// Run attack simulations (brute-force, port-scan)
    Simulate(SimulateArgs),
    /// Preview templated messages without sending
    Preview(PreviewArgs),
    /// List available templates
    Templates(TemplateArgs),
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Target IP or host name
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Target port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Protocol (udp, tcp, tls)
    #[arg(long = "proto", default_value = "udp")]
    protocol: String,
}

impl TargetArgs {
    fn target(&self) -> Result<Target> {
        let protocol: Protocol = self.protocol.parse()?;
        Ok(Target::new(protocol, self.host.clone(), self.port))
    }
}

#[derive(Args, Debug)]
struct HeaderArgs {
    /// Syslog tag / app-name [default: sysloggen, or replay for the replay command]
    #[arg(short = 't', long = "tag")]
    tag: Option<String>,

    /// Syslog format (rfc3164, rfc5424)
    #[arg(long, default_value = "rfc3164")]
    format: String,

    /// Syslog facility (e.g. auth, cron, local0)
    #[arg(long, default_value = "local0")]
    facility: String,

    /// Syslog severity (e.g. info, debug, err)
    #[arg(long, default_value = "info")]
    severity: String,

    /// Host name to put in the header instead of the local one
    #[arg(long)]
    hostname: Option<String>,
}

impl HeaderArgs {
    fn options(&self, default_tag: &str) -> Result<MessageOptions> {
        Ok(MessageOptions {
            app_name: self.tag.as_deref().unwrap_or(default_tag).to_string(),
            format: self.format.parse::<Format>()?,
            facility: parse_facility(&self.facility.to_lowercase())?,
            severity: parse_severity(&self.severity.to_lowercase())?,
            hostname: self.hostname.clone(),
        })
    }
}

#[derive(Args, Debug)]
struct SendArgs {
    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    header: HeaderArgs,

    /// Log message content
    #[arg(short, long, default_value = "sysloggen test message")]
    message: String,
}

#[derive(Args, Debug)]
struct TemplateArgs {
    /// TOML file with extra templates under a [templates] table
    #[arg(long)]
    templates_file: Option<PathBuf>,
}

impl TemplateArgs {
    fn generator(&self) -> Result<Generator> {
        let mut generator = Generator::new();
        if let Some(path) = &self.templates_file {
            let file = sysloggen::config::TemplateFile::load(path)
                .with_context(|| format!("loading templates from {}", path.display()))?;
            let rejected = generator.register_all(file.entries());
            if !rejected.is_empty() {
                tracing::warn!(count = rejected.len(), "some templates were skipped");
            }
        }
        Ok(generator)
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    header: HeaderArgs,

    #[command(flatten)]
    templates: TemplateArgs,

    /// Log template name
    #[arg(short = 'T', long, default_value = "ssh-failed")]
    template: String,

    /// Logs per second
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    rate: u32,

    /// Duration to run (e.g. 10s, 2m)
    #[arg(short, long, default_value = "10s", value_parser = humantime::parse_duration)]
    duration: Duration,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    header: HeaderArgs,

    /// Path to log file
    #[arg(short, long)]
    file: PathBuf,

    /// Pause briefly between lines instead of sending as fast as possible
    #[arg(long)]
    preserve_timing: bool,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Simulation type (brute-force, port-scan)
    #[arg(short = 'T', long = "type", default_value = "brute-force")]
    kind: String,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    header: HeaderArgs,

    #[command(flatten)]
    templates: TemplateArgs,

    /// Log template name
    #[arg(short = 'T', long, default_value = "ssh-failed")]
    template: String,

    /// Number of messages to render
    #[arg(short = 'n', long, default_value_t = 5)]
    count: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Send(args) => send_one(args),
        Command::Generate(args) => generate_stream(args),
        Command::Replay(args) => replay_file(args),
        Command::Simulate(args) => run_simulation(args),
        Command::Preview(args) => preview_template(args),
        Command::Templates(args) => list_templates(args),
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn send_one(args: SendArgs) -> Result<()> {
    let target = args.target.target()?;
    let line = args.header.options(DEFAULT_APP_NAME)?.message(args.message).render();

    let mut sender = Sender::connect(&target)?;
    tracing::info!(%target, %line, "sending");
    let sent = sender.send(&line);
    sender.close()?;
    sent?;

    println!("Message sent successfully.");
    Ok(())
}

fn generate_stream(args: GenerateArgs) -> Result<()> {
    let target = args.target.target()?;
    let message = args.header.options(DEFAULT_APP_NAME)?;
    let opts = StreamOptions {
        template: args.template,
        rate: args.rate,
        duration: args.duration,
    };
    let mut generator = args.templates.generator()?;

    let mut sender = Sender::connect(&target)?;
    tracing::info!(
        template = %opts.template,
        %target,
        rate = opts.rate,
        duration = ?opts.duration,
        "starting generation"
    );
    let report = stream::run(&mut generator, &mut sender, &message, &opts);
    sender.close()?;
    let report = report?;

    println!("Completed. Sent {} messages ({} failed).", report.sent, report.failed);
    Ok(())
}

fn replay_file(args: ReplayArgs) -> Result<()> {
    let target = args.target.target()?;
    let message = args.header.options(REPLAY_APP_NAME)?;
    let opts = ReplayOptions {
        path: args.file,
        preserve_timing: args.preserve_timing,
    };

    let mut sender = Sender::connect(&target)?;
    let report = replay::run_file(&opts.path, &mut sender, &message, opts.preserve_timing);
    sender.close()?;
    let report = report.with_context(|| format!("replaying {}", opts.path.display()))?;

    println!("Replay complete. Sent {} messages ({} failed).", report.sent, report.failed);
    Ok(())
}

fn run_simulation(args: SimulateArgs) -> Result<()> {
    let target = args.target.target()?;
    let kind: Simulation = args.kind.parse()?;

    let mut sender = Sender::connect(&target)?;
    let mut fixtures = sysloggen::Fixtures::new();
    let report = simulate::run(kind, &mut sender, &mut fixtures, Pacing::default());
    sender.close()?;
    let report = report?;

    println!(
        "Simulation completed: {} (attacker {} -> victim {}), {} sent, {} failed.",
        kind, report.attacker, report.victim, report.sent, report.failed
    );
    Ok(())
}

fn preview_template(args: PreviewArgs) -> Result<()> {
    let message = args.header.options(DEFAULT_APP_NAME)?;
    let mut generator = args.templates.generator()?;
    let lines = stream::preview(&mut generator, &message, &args.template, args.count)?;

    println!("Previewing template: {}", args.template);
    println!("----------------------------------------");
    for line in lines {
        println!("{line}");
    }
    println!("----------------------------------------");
    Ok(())
}

fn list_templates(args: TemplateArgs) -> Result<()> {
    let generator = args.generator()?;
    let mut names = generator.list_templates();
    names.sort_unstable();
    for name in names {
        println!("{name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(args: &[&str]) -> HeaderArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Replay(args) => args.header,
            Command::Send(args) => args.header,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn replay_tag_defaults_to_replay() {
        let header = header(&["sysloggen", "replay", "-f", "auth.log"]);
        assert_eq!(header.options(REPLAY_APP_NAME).unwrap().app_name, "replay");
    }

    #[test]
    fn explicit_tag_wins() {
        let header = header(&["sysloggen", "replay", "-f", "auth.log", "-t", "kernel"]);
        assert_eq!(header.options(REPLAY_APP_NAME).unwrap().app_name, "kernel");
    }

    #[test]
    fn send_tag_defaults_to_crate_name() {
        let header = header(&["sysloggen", "send", "-m", "hi"]);
        assert_eq!(header.options(DEFAULT_APP_NAME).unwrap().app_name, "sysloggen");
    }
}
