use std::io::{Cursor, Write};
use std::net::UdpSocket;
use std::time::Duration;

use sysloggen::simulate::{Pacing, SCANNED_PORTS};
use sysloggen::{
    replay, simulate, stream, Error, Facility, Fixtures, Format, Generator, MessageOptions,
    Protocol, Sender, Severity, Simulation, StreamOptions,
};

fn collector() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind(("127.0.0.1", 0)).unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let port = socket.local_addr().unwrap().port();
    (socket, port)
}

fn drain(socket: &UdpSocket) -> Vec<String> {
    let mut buf = [0u8; 2048];
    let mut out = Vec::new();
    socket
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();
    while let Ok(n) = socket.recv(&mut buf) {
        out.push(String::from_utf8_lossy(&buf[..n]).into_owned());
    }
    out
}

#[test]
fn stream_sends_until_deadline() {
    let (socket, port) = collector();
    let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", port).unwrap();
    let mut generator = Generator::with_fixtures(Fixtures::seeded(1));
    let message = MessageOptions {
        format: Format::RFC5424,
        ..MessageOptions::default()
    };
    let opts = StreamOptions {
        template: "ssh-failed".to_string(),
        rate: 20,
        duration: Duration::from_millis(500),
    };

    let report = stream::run(&mut generator, &mut sender, &message, &opts).unwrap();
    assert!(report.sent >= 1, "{report:?}");
    assert!(report.sent <= 11, "{report:?}");
    assert_eq!(report.failed, 0);

    let received = drain(&socket);
    assert_eq!(received.len() as u64, report.sent);
    for line in received {
        assert!(line.starts_with("<134>1 "), "{line}");
        assert!(line.contains(" - Failed password for "), "{line}");
        assert!(line.ends_with(" ssh2\n"), "{line}");
    }
}

#[test]
fn stream_rejects_bad_options() {
    let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", 9).unwrap();
    let mut generator = Generator::new();
    let message = MessageOptions::default();

    let zero_rate = StreamOptions {
        rate: 0,
        ..StreamOptions::default()
    };
    assert!(matches!(
        stream::run(&mut generator, &mut sender, &message, &zero_rate),
        Err(Error::InvalidConfig(_))
    ));

    let missing = StreamOptions {
        template: "nope".to_string(),
        ..StreamOptions::default()
    };
    assert!(matches!(
        stream::run(&mut generator, &mut sender, &message, &missing),
        Err(Error::TemplateNotFound(_))
    ));
}

#[test]
fn replay_wraps_each_line() {
    let (socket, port) = collector();
    let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", port).unwrap();
    let message = MessageOptions {
        app_name: "replay".to_string(),
        hostname: Some("recorded-host".to_string()),
        ..MessageOptions::default()
    };

    let input = Cursor::new("kernel: eth0 link up\nsshd: session closed\n");
    let report = replay::run(input, &mut sender, &message, false).unwrap();
    assert_eq!(report.sent, 2);

    let received = drain(&socket);
    assert_eq!(received.len(), 2);
    assert!(received[0].ends_with(" recorded-host replay: kernel: eth0 link up\n"));
    assert!(received[1].ends_with(" recorded-host replay: sshd: session closed\n"));
}

#[test]
fn replay_survives_invalid_utf8() {
    let (socket, port) = collector();
    let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", port).unwrap();

    let input = Cursor::new(&b"first\ncaf\xe9 latin1\r\nthird"[..]);
    let report = replay::run(input, &mut sender, &MessageOptions::default(), false).unwrap();
    assert_eq!(report.sent, 3);
    assert_eq!(report.failed, 0);

    let received = drain(&socket);
    assert_eq!(received.len(), 3);
    assert!(received[0].ends_with(": first\n"), "{}", received[0]);
    assert!(received[1].ends_with(": caf\u{FFFD} latin1\n"), "{}", received[1]);
    assert!(received[2].ends_with(": third\n"), "{}", received[2]);
}

#[test]
fn replay_from_file() {
    let (socket, port) = collector();
    let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", port).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "first").unwrap();
    writeln!(file, "second").unwrap();
    writeln!(file, "third").unwrap();

    let report =
        replay::run_file(file.path(), &mut sender, &MessageOptions::default(), true).unwrap();
    assert_eq!(report.sent, 3);
    assert_eq!(drain(&socket).len(), 3);
}

#[test]
fn replay_missing_file() {
    let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", 9).unwrap();
    let err = replay::run_file(
        "/definitely/not/here.log",
        &mut sender,
        &MessageOptions::default(),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn brute_force_simulation() {
    let (socket, port) = collector();
    let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", port).unwrap();
    let mut fixtures = Fixtures::seeded(3);

    let report = simulate::run(Simulation::BruteForce, &mut sender, &mut fixtures, Pacing::NONE)
        .unwrap();
    assert_eq!(report.sent, 13);

    let received = drain(&socket);
    assert_eq!(received.len(), 13);
    let pri = format!("<{}>", Facility::AUTH.code() * 8 + Severity::WARNING.code());
    for line in &received {
        assert!(line.starts_with(&pri), "{line}");
        assert!(line.contains(" sshd: "), "{line}");
        assert!(line.contains(&format!(" from {} port ", report.attacker)), "{line}");
    }
    assert!(received[12].contains("Accepted publickey for root"));
}

#[test]
fn port_scan_simulation() {
    let (socket, port) = collector();
    let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", port).unwrap();
    let mut fixtures = Fixtures::seeded(3);

    let report =
        simulate::run(Simulation::PortScan, &mut sender, &mut fixtures, Pacing::NONE).unwrap();

    let received = drain(&socket);
    assert_eq!(received.len(), SCANNED_PORTS.len());
    for (line, port) in received.iter().zip(SCANNED_PORTS) {
        assert!(
            line.ends_with(&format!(
                "SRC={} DST={} PROTO=TCP DPT={port} ACTION=DROP\n",
                report.attacker, report.victim
            )),
            "{line}"
        );
    }
}
