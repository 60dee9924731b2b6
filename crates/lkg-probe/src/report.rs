//! Probe results and the connectivity report

use lkg_core::error::NetworkError;
use std::time::Duration;

/// Retries recommended for the linking client
pub const RECOMMENDED_RETRIES: u32 = 5;
/// Floor for the recommended connect timeout (seconds)
pub const MIN_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Floor for the recommended retry base delay (seconds)
pub const MIN_BASE_DELAY_SECS: u64 = 5;

/// What happened to one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// HTTP 200
    Reachable {
        /// Response status code
        status: u16,
    },
    /// Any other HTTP status
    Unexpected {
        /// Response status code
        status: u16,
    },
    /// No HTTP response
    Failed {
        /// Why the request failed
        error: NetworkError,
    },
}

/// One probed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Requested URL
    pub url: String,
    /// Response or failure
    pub outcome: ProbeOutcome,
    /// Wall time until response or failure
    pub elapsed: Duration,
}

impl ProbeResult {
    /// True for HTTP 200
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Reachable { .. })
    }
}

/// Overall connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every URL answered 200
    AllReachable,
    /// Some URLs answered 200
    Partial,
    /// No URL answered 200
    Unreachable,
}

/// Client settings suggested by the observed latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    /// Connect timeout
    pub connect_timeout_secs: u64,
    /// Read timeout
    pub read_timeout_secs: u64,
    /// Attempts after the first
    pub retries: u32,
    /// Initial delay between attempts
    pub base_delay_secs: u64,
}

/// Results of a probe run, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    /// One entry per configured URL
    pub results: Vec<ProbeResult>,
}

impl ProbeReport {
    /// Number of URLs probed
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of HTTP 200 responses
    #[must_use]
    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Percentage of successful requests (0 when nothing was probed)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.successful() as f64 / self.total() as f64 * 100.0
        }
    }

    /// Classify the run
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match self.successful() {
            0 => Verdict::Unreachable,
            n if n == self.total() => Verdict::AllReachable,
            _ => Verdict::Partial,
        }
    }

    /// Mean latency of successful requests, zero if there were none
    #[must_use]
    pub fn mean_latency(&self) -> Duration {
        let successes: Vec<Duration> = self
            .results
            .iter()
            .filter(|r| r.is_success())
            .map(|r| r.elapsed)
            .collect();
        match u32::try_from(successes.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => successes.iter().sum::<Duration>() / n,
        }
    }

    /// Timeouts and retry policy derived from the mean latency
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn recommendation(&self) -> Recommendation {
        let mean = self.mean_latency().as_secs_f64();
        // Whole seconds, truncated
        let connect = ((mean * 3.0) as u64).max(MIN_CONNECT_TIMEOUT_SECS);
        Recommendation {
            connect_timeout_secs: connect,
            read_timeout_secs: connect * 2,
            retries: RECOMMENDED_RETRIES,
            base_delay_secs: (mean as u64).max(MIN_BASE_DELAY_SECS),
        }
    }

    /// Human-readable report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("{}\n", "=".repeat(60)));
        report.push_str("Wikipedia connectivity test\n");
        report.push_str(&format!("{}\n", "=".repeat(60)));

        let total = self.total();
        for (i, result) in self.results.iter().enumerate() {
            report.push_str(&format!("\n[{}/{}] {}\n", i + 1, total, result.url));
            let secs = result.elapsed.as_secs_f64();
            match &result.outcome {
                ProbeOutcome::Reachable { status } => {
                    report.push_str(&format!("OK (status {status}, {secs:.2}s)\n"));
                }
                ProbeOutcome::Unexpected { status } => {
                    report.push_str(&format!("UNEXPECTED (status {status}, {secs:.2}s)\n"));
                }
                ProbeOutcome::Failed { error } => {
                    report.push_str(&format!("FAILED ({secs:.2}s): {error}\n"));
                }
            }
        }

        report.push_str(&format!("\n{}\n", "=".repeat(60)));
        report.push_str(&format!("Total: {total}\n"));
        report.push_str(&format!("Succeeded: {}\n", self.successful()));
        report.push_str(&format!("Failed: {}\n", total - self.successful()));
        report.push_str(&format!("Success rate: {:.1}%\n", self.success_rate()));

        match self.verdict() {
            Verdict::AllReachable => {
                report.push_str("\nAll endpoints reachable.\n");
            }
            Verdict::Partial => {
                report.push_str(&format!(
                    "\nPartially reachable ({}/{total}); expect an unstable connection.\n",
                    self.successful()
                ));
                report.push_str("Consider more retries, longer delays and conservative timeouts.\n");
            }
            Verdict::Unreachable => {
                report.push_str("\nNo endpoint reachable.\n");
                report.push_str("Check the network, firewall and HTTP_PROXY/HTTPS_PROXY settings.\n");
            }
        }

        let rec = self.recommendation();
        report.push_str("\nRecommended client settings:\n");
        report.push_str(&format!("- connect timeout: {}s\n", rec.connect_timeout_secs));
        report.push_str(&format!("- read timeout: {}s\n", rec.read_timeout_secs));
        report.push_str(&format!("- retries: {}\n", rec.retries));
        report.push_str(&format!("- retry base delay: {}s\n", rec.base_delay_secs));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(outcome: ProbeOutcome, millis: u64) -> ProbeResult {
        ProbeResult {
            url: "https://en.wikipedia.org".into(),
            outcome,
            elapsed: Duration::from_millis(millis),
        }
    }

    fn ok(millis: u64) -> ProbeResult {
        result(ProbeOutcome::Reachable { status: 200 }, millis)
    }

    #[test]
    fn fast_network_uses_floors() {
        let report = ProbeReport {
            results: vec![ok(300), ok(500)],
        };
        assert_eq!(report.verdict(), Verdict::AllReachable);
        assert_eq!(
            report.recommendation(),
            Recommendation {
                connect_timeout_secs: 10,
                read_timeout_secs: 20,
                retries: 5,
                base_delay_secs: 5,
            }
        );
    }

    #[test]
    fn slow_network_scales_with_mean() {
        let report = ProbeReport {
            results: vec![
                ok(4_000),
                ok(8_000),
                result(
                    ProbeOutcome::Failed {
                        error: NetworkError::Timeout {
                            message: "read".into(),
                        },
                    },
                    10_000,
                ),
            ],
        };
        // mean 6s over successes only
        let rec = report.recommendation();
        assert_eq!(rec.connect_timeout_secs, 18);
        assert_eq!(rec.read_timeout_secs, 36);
        assert_eq!(rec.base_delay_secs, 6);
        assert_eq!(report.verdict(), Verdict::Partial);
    }

    #[test]
    fn non_200_is_not_success() {
        let report = ProbeReport {
            results: vec![result(ProbeOutcome::Unexpected { status: 403 }, 100)],
        };
        assert_eq!(report.successful(), 0);
        assert_eq!(report.verdict(), Verdict::Unreachable);
        assert_eq!(report.mean_latency(), Duration::ZERO);
    }

    #[test]
    fn report_text() {
        let report = ProbeReport {
            results: vec![
                ok(250),
                result(
                    ProbeOutcome::Failed {
                        error: NetworkError::Connection {
                            message: "refused".into(),
                        },
                    },
                    10,
                ),
            ],
        };
        let text = report.generate_text();

        assert!(text.contains("[1/2] https://en.wikipedia.org\nOK (status 200, 0.25s)\n"));
        assert!(text.contains("FAILED (0.01s): connection error: refused\n"));
        assert!(text.contains("Success rate: 50.0%\n"));
        assert!(text.contains("Partially reachable (1/2)"));
        assert!(text.contains("- connect timeout: 10s\n"));
    }

    #[test]
    fn empty_run() {
        let report = ProbeReport::default();
        assert!(report.success_rate().abs() < f64::EPSILON);
        assert_eq!(report.verdict(), Verdict::Unreachable);
    }
}
