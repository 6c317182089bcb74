//! Canned attack sequences for exercising detection rules.

use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::config::{MessageOptions, Simulation};
use crate::fixture::Fixtures;
use crate::sender::Sender;
use crate::{Facility, Result, Severity};

pub const BRUTE_FORCE_USERS: [&str; 4] = ["root", "admin", "service", "dbadmin"];
pub const BRUTE_FORCE_ATTEMPTS: usize = 3;
pub const SCANNED_PORTS: [u16; 9] = [21, 22, 23, 25, 53, 80, 443, 3306, 8080];

/// Pauses between simulated events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pacing {
    pub login_attempt: Duration,
    pub port_probe: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            login_attempt: Duration::from_millis(100),
            port_probe: Duration::from_millis(50),
        }
    }
}

impl Pacing {
    pub const NONE: Pacing = Pacing {
        login_attempt: Duration::ZERO,
        port_probe: Duration::ZERO,
    };
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SimulationReport {
    pub attacker: String,
    pub victim: String,
    pub sent: u64,
    pub failed: u64,
}

/// Headers used for every simulated line: `auth.warning` from `sshd`.
pub fn attack_headers() -> MessageOptions {
    MessageOptions {
        app_name: "sshd".to_string(),
        facility: Facility::AUTH,
        severity: Severity::WARNING,
        ..MessageOptions::default()
    }
}

pub fn run<R: Rng>(
    kind: Simulation,
    sender: &mut Sender,
    fixtures: &mut Fixtures<R>,
    pacing: Pacing,
) -> Result<SimulationReport> {
    let victim = fixtures.ip();
    let attacker = fixtures.ip();
    tracing::info!(simulation = %kind, %attacker, %victim, "starting simulation");

    let lines = match kind {
        Simulation::BruteForce => brute_force(&attacker, fixtures),
        Simulation::PortScan => port_scan(&attacker, &victim),
    };
    let pause = match kind {
        Simulation::BruteForce => pacing.login_attempt,
        Simulation::PortScan => pacing.port_probe,
    };

    let headers = attack_headers();
    let mut report = SimulationReport {
        attacker,
        victim,
        ..SimulationReport::default()
    };
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        tracing::debug!(%line, "sending");
        match sender.send(&headers.message(line.as_str()).render()) {
            Ok(()) => report.sent += 1,
            Err(err) => {
                report.failed += 1;
                tracing::warn!(error = %err, "send failed");
            }
        }
        if i < last && !pause.is_zero() {
            thread::sleep(pause);
        }
    }

    Ok(report)
}

/// Repeated password failures for a handful of accounts, then a successful root login.
pub fn brute_force<R: Rng>(attacker: &str, fixtures: &mut Fixtures<R>) -> Vec<String> {
    let mut lines = Vec::with_capacity(BRUTE_FORCE_USERS.len() * BRUTE_FORCE_ATTEMPTS + 1);
    for user in BRUTE_FORCE_USERS {
        for _ in 0..BRUTE_FORCE_ATTEMPTS {
            lines.push(format!(
                "Failed password for {user} from {attacker} port {} ssh2",
                fixtures.port()
            ));
        }
    }
    lines.push(format!(
        "Accepted publickey for root from {attacker} port {} ssh2",
        fixtures.port()
    ));
    lines
}

/// Dropped connection attempts against common service ports.
pub fn port_scan(attacker: &str, victim: &str) -> Vec<String> {
    SCANNED_PORTS
        .iter()
        .map(|port| format!("SRC={attacker} DST={victim} PROTO=TCP DPT={port} ACTION=DROP"))
        .collect()
}
