#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::time::Duration;

    use transform_core::telemetry::{StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

    fn make_counters() -> TelemetryCounters {
        TelemetryCounters { calls: 4, bytes_in: 100, bytes_out: 150 }
    }

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add("encrypt", Duration::from_millis(3));
        times.add("encrypt", Duration::from_millis(2));
        times.add("frame-encode", Duration::from_millis(1));

        assert_eq!(times.get("encrypt"), Duration::from_millis(5));
        assert_eq!(times.get("absent"), Duration::ZERO);
        assert_eq!(times.total(), Duration::from_millis(6));
        assert_eq!(times.stages().collect::<Vec<_>>(), ["encrypt", "frame-encode"]);
    }

    #[test]
    fn snapshot_ratios() {
        let mut timer = TelemetryTimer::new();
        timer.time("gzip-compress", || std::thread::sleep(Duration::from_millis(2)));

        let snap = TelemetrySnapshot::from(&make_counters(), &timer);
        assert_eq!(snap.calls, 4);
        assert!((snap.size_ratio - 1.5).abs() < f64::EPSILON);
        assert!(snap.throughput_bytes_per_sec > 0.0);
        assert!(snap.stage_times.get("gzip-compress") >= Duration::from_millis(2));
        assert!(snap.sanity_check());
    }

    #[test]
    fn empty_counters_have_zero_ratio() {
        let snap = TelemetrySnapshot::from(&TelemetryCounters::default(), &TelemetryTimer::new());
        assert_eq!(snap.size_ratio, 0.0);
    }

    #[test]
    fn snapshot_serializes() {
        let snap = TelemetrySnapshot::from(&make_counters(), &TelemetryTimer::new());
        let doc = serde_json::to_string(&snap).unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&doc).unwrap();
        assert_eq!(back.bytes_out, 150);
    }
}
