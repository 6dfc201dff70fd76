use std::time::Duration;

use crate::probe::ProbeOutcome;

/// Running aggregates of one session. Owned and mutated only by the probe
/// loop, read once at the end for the summary.
#[derive(Debug, Default, Clone)]
pub struct SessionStats {
    sent: u64,
    received: u64,
    lost: u64,
    min_rtt: Option<Duration>,
    max_rtt: Option<Duration>,
    total_rtt: Duration,
}

impl SessionStats {
    pub(crate) fn on_sent(&mut self) {
        self.sent += 1;
    }

    pub(crate) fn record(&mut self, outcome: &ProbeOutcome) {
        match outcome {
            ProbeOutcome::Reply(reply) => {
                self.received += 1;
                self.min_rtt = Some(self.min_rtt.map_or(reply.rtt, |min| min.min(reply.rtt)));
                self.max_rtt = Some(self.max_rtt.map_or(reply.rtt, |max| max.max(reply.rtt)));
                self.total_rtt += reply.rtt;
            }
            ProbeOutcome::Timeout | ProbeOutcome::SendError(_) | ProbeOutcome::ReceiveError(_) => {
                self.lost += 1;
            }
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn lost(&self) -> u64 {
        self.lost
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn loss_percent(&self) -> f64 {
        if self.sent == 0 {
            return 0.0;
        }
        self.lost as f64 * 100.0 / self.sent as f64
    }

    pub fn min_rtt_ms(&self) -> Option<u128> {
        self.min_rtt.map(|rtt| rtt.as_millis())
    }

    pub fn max_rtt_ms(&self) -> Option<u128> {
        self.max_rtt.map(|rtt| rtt.as_millis())
    }

    /// Mean round-trip time of the successful probes. `None` until at least
    /// one probe succeeded.
    pub fn avg_rtt_ms(&self) -> Option<u128> {
        if self.received == 0 {
            return None;
        }
        Some(self.total_rtt.as_millis() / u128::from(self.received))
    }
}
