//! Runs relay cycles over a range of nested message counts and collects their gas deltas.

use crate::{GasDeltaResult, RelayChain, RelayOrchestrator};
use gastank_providers::AccessListOracle;
use std::{collections::BTreeMap, fs, io, path::Path};

/// Gas deltas keyed by the number of nested messages of the cycle that produced them.
///
/// Serializes as a JSON object with keys in ascending numeric order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SweepReport(BTreeMap<u64, GasDeltaResult>);

impl SweepReport {
    /// Records the result of the cycle with `nested_messages` nested messages.
    pub fn insert(&mut self, nested_messages: u64, result: GasDeltaResult) {
        self.0.insert(nested_messages, result);
    }

    /// Returns the result for `nested_messages`, if that cycle succeeded.
    pub fn get(&self, nested_messages: u64) -> Option<&GasDeltaResult> {
        self.0.get(&nested_messages)
    }

    /// Iterates over the results in ascending order of nested messages.
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &GasDeltaResult)> {
        self.0.iter()
    }

    /// Number of successful cycles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no cycle succeeded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Writes the report as pretty-printed JSON to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

/// Runs one relay cycle per nested message count in `0..=max_nested_messages`.
///
/// Cycles run back to back. A failed cycle is logged and left out of the report.
pub async fn sweep<S, D, O>(
    orchestrator: &RelayOrchestrator<S, D, O>,
    max_nested_messages: u64,
) -> SweepReport
where
    S: RelayChain,
    D: RelayChain,
    O: AccessListOracle,
{
    let mut report = SweepReport::default();
    for nested_messages in 0..=max_nested_messages {
        debug!(target: "relay", nested_messages, "Running sweep point");
        match orchestrator.run(nested_messages).await {
            Ok(outcome) => report.insert(nested_messages, outcome.deltas()),
            Err(err) => {
                warn!(target: "relay", nested_messages, %err, "Sweep point failed, skipping");
            }
        }
    }
    info!(
        target: "relay",
        succeeded = report.len(),
        attempted = max_nested_messages + 1,
        "Sweep finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DepositPolicy,
        test_utils::{MockOracle, orchestrator},
    };
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    /// Collects formatted log lines.
    #[derive(Debug, Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes).unwrap().lines().map(str::to_owned).collect()
        }
    }

    #[tokio::test]
    async fn test_sweep_skips_failed_points() {
        // The third oracle request is the relay of the second sweep point.
        let orchestrator = orchestrator(MockOracle::failing_on(3), DepositPolicy::TopUpToCap);

        let report = sweep(&orchestrator, 2).await;

        let keys: Vec<_> = report.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![0, 2]);
        assert!(report.get(1).is_none());
        assert_eq!(report.get(2), Some(&GasDeltaResult { relay: 10_000, claim: -10_000 }));
    }

    #[tokio::test]
    async fn test_sweep_is_quiet_at_info() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let orchestrator = orchestrator(MockOracle::failing_on(3), DepositPolicy::TopUpToCap);
        let report = sweep(&orchestrator, 2).await;
        assert_eq!(report.len(), 2);

        let lines = buffer.lines();
        // One warning for the failed point and the closing summary.
        assert_eq!(lines.len(), 2, "{lines:#?}");
        assert!(lines[0].contains("Sweep point failed"));
        assert!(lines[1].contains("Sweep finished"));
    }

    #[tokio::test]
    async fn test_sweep_all_points_fail() {
        let orchestrator = orchestrator(MockOracle::default(), DepositPolicy::TopUpToCap);
        orchestrator.source().with(|s| s.emit_sent_message = false);

        let report = sweep(&orchestrator, 3).await;

        assert!(report.is_empty());
        assert_eq!(orchestrator.oracle().calls(), 0);
    }

    #[test]
    fn test_report_orders_keys_numerically() {
        let mut report = SweepReport::default();
        for key in [10, 2, 0, 1] {
            report.insert(key, GasDeltaResult { relay: key as i128, claim: -1 });
        }

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"0":{"relay":0,"claim":-1},"1":{"relay":1,"claim":-1},"2":{"relay":2,"claim":-1},"10":{"relay":10,"claim":-1}}"#
        );
    }

    #[test]
    fn test_write_json() {
        let mut report = SweepReport::default();
        report.insert(0, GasDeltaResult { relay: 12, claim: -3 });
        report.insert(60, GasDeltaResult { relay: 1_500, claim: 42 });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gas_analysis.json");
        report.write_json(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        assert_eq!(serde_json::from_str::<SweepReport>(&json).unwrap(), report);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["60"]["relay"], 1_500);
    }
}
