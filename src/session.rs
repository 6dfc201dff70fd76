use std::io;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::icmp::v4::{EchoReply, EchoRequest, RawSocket, SequenceNumber, Socket};
use crate::probe::{ProbeOutcome, ProbeReport, ReplyData};
use crate::stats::SessionStats;
use crate::PingError;

// Large enough for any reply datagram a raw socket can hand us.
const RECV_BUFFER_LEN: usize = 64 * 1024;

#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Send/receive deadline per probe.
    pub timeout: Duration,
    /// Number of payload bytes carried by each request.
    pub payload_len: usize,
    /// Number of probes to run.
    pub count: u16,
    /// Flat pause between probes, regardless of how long a probe took.
    pub interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1000),
            payload_len: 32,
            count: 4,
            interval: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    Idle,
    Running,
    Finished,
}

/// One measurement run against a single target: `count` probes, strictly
/// sequential, each a single attempt with no retry. The socket is held for
/// the lifetime of the session and released when it drops.
pub struct Session<S> {
    config: SessionConfig,
    socket: S,
    identifier: u16,
    stats: SessionStats,
    state: State,
    recv_buf: Vec<u8>,
}

impl Session<RawSocket> {
    /// Opens a raw socket to `target`. Failure here is fatal to the whole
    /// run; there is no degraded mode without a transport.
    pub fn connect(
        target: Ipv4Addr,
        config: SessionConfig,
    ) -> Result<Session<RawSocket>, PingError> {
        let socket = RawSocket::connect(target, config.timeout)?;
        Ok(Session::with_socket(socket, config))
    }
}

impl<S: Socket> Session<S> {
    pub(crate) fn with_socket(socket: S, config: SessionConfig) -> Session<S> {
        Session {
            config,
            socket,
            // Chosen once per session so replies can be told apart from
            // other processes pinging through the same host.
            identifier: rand::thread_rng().gen(),
            stats: SessionStats::default(),
            state: State::Idle,
            recv_buf: vec![0u8; RECV_BUFFER_LEN],
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn peer(&self) -> Ipv4Addr {
        self.socket.peer()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Runs the configured number of probes, handing each report to
    /// `observe` as it happens. Per-probe failures are folded into the
    /// statistics and the loop moves on to the next sequence number.
    pub fn run<F>(&mut self, mut observe: F) -> &SessionStats
    where
        F: FnMut(&ProbeReport),
    {
        self.state = State::Running;
        let mut sequence = SequenceNumber::first();
        for i in 0..self.config.count {
            self.stats.on_sent();
            let outcome = self.probe(sequence);
            self.stats.record(&outcome);
            observe(&ProbeReport { sequence, outcome });
            sequence = sequence.next();
            if i + 1 < self.config.count {
                std::thread::sleep(self.config.interval);
            }
        }
        self.state = State::Finished;
        &self.stats
    }

    fn probe(&mut self, sequence: SequenceNumber) -> ProbeOutcome {
        let request = EchoRequest {
            identifier: self.identifier,
            sequence,
            payload_len: self.config.payload_len,
        };
        let datagram = request.encode();

        if let Err(e) = self.socket.set_deadline(self.config.timeout) {
            return ProbeOutcome::SendError(e.into());
        }
        let started = Instant::now();
        if let Err(e) = self.socket.send(&datagram) {
            tracing::warn!("send failed for sequence {}: {}", sequence, e);
            return ProbeOutcome::SendError(e.into());
        }
        tracing::trace!("sent {} bytes, sequence {}", datagram.len(), sequence);

        let n = match self.socket.recv(&mut self.recv_buf) {
            Err(e) if is_timeout(&e) => {
                tracing::debug!("sequence {} timed out", sequence);
                return ProbeOutcome::Timeout;
            }
            Err(e) => {
                tracing::warn!("receive failed for sequence {}: {}", sequence, e);
                return ProbeOutcome::ReceiveError(e.into());
            }
            Ok(n) => n,
        };
        let elapsed = started.elapsed();

        let reply = match EchoReply::decode(&self.recv_buf[..n]) {
            Err(e) => {
                tracing::warn!("discarding reply for sequence {}: {}", sequence, e);
                return ProbeOutcome::ReceiveError(e);
            }
            Ok(reply) => reply,
        };
        if reply.identifier != self.identifier || reply.sequence != sequence {
            tracing::warn!(
                "reply identifier {} sequence {} does not match request",
                reply.identifier,
                reply.sequence
            );
            return ProbeOutcome::ReceiveError(PingError {
                message: "reply does not match the outstanding request".to_string(),
            });
        }

        ProbeOutcome::Reply(ReplyData {
            bytes: reply.payload_len,
            ttl: reply.ttl,
            rtt: elapsed,
        })
    }
}

// A read timeout surfaces as WouldBlock on unix and TimedOut on windows.
fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icmp::v4::tests::{OnReceive, OnSend, SocketMock};

    fn test_config(count: u16) -> SessionConfig {
        SessionConfig {
            timeout: Duration::from_millis(100),
            payload_len: 32,
            count,
            interval: Duration::ZERO,
        }
    }

    #[test]
    fn probe_round_trip_reports_payload_bytes_and_ttl() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::EchoWithTtl(64));
        let mut session = Session::with_socket(socket.clone(), test_config(1));

        let mut replies = Vec::new();
        session.run(|report| {
            if let ProbeOutcome::Reply(reply) = &report.outcome {
                replies.push(*reply);
            }
        });

        assert_eq!(1, replies.len());
        assert_eq!(32, replies[0].bytes);
        assert_eq!(64, u8::from(replies[0].ttl));
        assert_eq!(1, session.stats().sent());
        assert_eq!(1, session.stats().received());
        assert_eq!(0, session.stats().lost());
        socket
            .should_send_number_of_messages(1)
            .should_set_deadline_per_send(Duration::from_millis(100));
    }

    #[test]
    fn session_moves_from_idle_to_finished() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::EchoWithTtl(64));
        let mut session = Session::with_socket(socket, test_config(2));

        assert_eq!(State::Idle, session.state());
        session.run(|_| {});
        assert_eq!(State::Finished, session.state());
    }

    #[test]
    fn timeout_counts_as_lost() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnWouldBlock);
        let mut session = Session::with_socket(socket, test_config(1));

        let mut timeouts = 0;
        session.run(|report| {
            if matches!(report.outcome, ProbeOutcome::Timeout) {
                timeouts += 1;
            }
        });

        assert_eq!(1, timeouts);
        assert_eq!(1, session.stats().lost());
        assert_eq!(0, session.stats().received());
    }

    #[test]
    fn receive_error_counts_as_lost() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnErr);
        let mut session = Session::with_socket(socket, test_config(1));

        session.run(|report| {
            assert!(matches!(report.outcome, ProbeOutcome::ReceiveError(_)));
        });

        assert_eq!(1, session.stats().lost());
    }

    #[test]
    fn send_failure_does_not_abort_the_run() {
        let socket = SocketMock::new(OnSend::ReturnErr, OnReceive::EchoWithTtl(64));
        let mut session = Session::with_socket(socket, test_config(3));

        let mut send_errors = 0;
        session.run(|report| {
            if matches!(report.outcome, ProbeOutcome::SendError(_)) {
                send_errors += 1;
            }
        });

        assert_eq!(3, send_errors);
        assert_eq!(3, session.stats().sent());
        assert_eq!(3, session.stats().lost());
        assert_eq!(State::Finished, session.state());
    }

    #[test]
    fn reply_with_foreign_identifier_is_not_a_success() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::EchoForeignIdentifier(64));
        let mut session = Session::with_socket(socket, test_config(1));

        session.run(|report| {
            assert!(matches!(report.outcome, ProbeOutcome::ReceiveError(_)));
        });

        assert_eq!(0, session.stats().received());
        assert_eq!(1, session.stats().lost());
    }

    #[test]
    fn sequence_numbers_advance_per_probe() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::EchoWithTtl(64));
        let mut session = Session::with_socket(socket, test_config(3));

        let mut sequences = Vec::new();
        session.run(|report| sequences.push(u16::from(report.sequence)));

        assert_eq!(vec![1, 2, 3], sequences);
        assert_eq!(3, session.stats().received());
    }

    #[test]
    fn zero_count_runs_no_probes() {
        let socket = SocketMock::new(OnSend::ReturnDefault, OnReceive::EchoWithTtl(64));
        let mut session = Session::with_socket(socket.clone(), test_config(0));

        session.run(|_| panic!("no probe expected"));

        assert_eq!(State::Finished, session.state());
        assert_eq!(0, session.stats().sent());
        assert_eq!(0.0, session.stats().loss_percent());
        socket.should_send_number_of_messages(0);
    }
}
