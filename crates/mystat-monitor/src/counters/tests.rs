use super::*;
use chrono::{TimeZone, Utc};
use mystat_core::MystatError;
use pretty_assertions::assert_eq;
use std::str::FromStr;

fn at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn full_raw() -> Vec<(String, String)> {
    CounterName::all()
        .enumerate()
        .map(|(i, name)| (name.as_str().to_string(), (i * 10).to_string()))
        .collect()
}

mod counter_name_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tracked_set_size() {
        assert_eq!(TRACKED_COUNTERS, 23);
        assert_eq!(CounterName::all().count(), TRACKED_COUNTERS);
    }

    #[test]
    fn test_server_names_round_trip() {
        for name in CounterName::all() {
            assert_eq!(CounterName::from_str(name.as_str()).unwrap(), name);
        }
        assert_eq!(CounterName::ComSelect.as_str(), "Com_select");
        assert_eq!(
            CounterName::InnodbBufferPoolPagesFlushed.to_string(),
            "Innodb_buffer_pool_pages_flushed"
        );
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(
            CounterName::from_str("BYTES_SENT").unwrap(),
            CounterName::BytesSent
        );
        assert!(CounterName::from_str("Uptime").is_err());
    }

    #[test]
    fn test_only_buffer_pool_levels_are_gauges() {
        let gauges: Vec<_> = CounterName::all().filter(|n| n.is_gauge()).collect();
        assert_eq!(
            gauges,
            vec![
                CounterName::InnodbBufferPoolPagesDirty,
                CounterName::InnodbBufferPoolPagesFree
            ]
        );
    }

    #[test]
    fn test_index_matches_iteration_order() {
        for (i, name) in CounterName::all().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn test_serializes_as_server_name() {
        let json = serde_json::to_string(&CounterName::ComRollback).unwrap();
        assert_eq!(json, "\"Com_rollback\"");
    }
}

mod snapshot_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_complete_snapshot() {
        let snapshot = CounterSnapshot::parse(full_raw(), at());

        assert!(snapshot.is_complete());
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.get(CounterName::Connections), Some(0));
        assert_eq!(snapshot.get(CounterName::BytesSent), Some(10));
        assert_eq!(snapshot.captured_at(), at());
    }

    #[test]
    fn test_parse_ignores_untracked_names() {
        let mut raw = full_raw();
        raw.push(("Uptime".to_string(), "12345".to_string()));
        raw.push(("Threads_running".to_string(), "not a number".to_string()));

        let snapshot = CounterSnapshot::parse(raw, at());
        assert!(snapshot.validate().is_ok());
        assert!(snapshot.rejected().is_empty());
    }

    #[test]
    fn test_missing_counter_fails_validation() {
        let raw: Vec<_> = full_raw()
            .into_iter()
            .filter(|(name, _)| name != "Com_commit")
            .collect();
        let snapshot = CounterSnapshot::parse(raw, at());

        assert_eq!(snapshot.missing(), vec![CounterName::ComCommit]);
        let err = snapshot.validate().unwrap_err();
        assert!(matches!(err, MystatError::DataIntegrity(_)));
        assert!(err.to_string().contains("Com_commit"));
    }

    #[test]
    fn test_non_numeric_value_is_rejected_not_coerced() {
        let raw: Vec<_> = full_raw()
            .into_iter()
            .map(|(name, value)| {
                if name == "Sort_rows" {
                    (name, "-5".to_string())
                } else {
                    (name, value)
                }
            })
            .collect();
        let snapshot = CounterSnapshot::parse(raw, at());

        assert_eq!(snapshot.get(CounterName::SortRows), None);
        assert_eq!(
            snapshot.rejected(),
            &[RejectedValue {
                name: CounterName::SortRows,
                raw: "-5".to_string()
            }]
        );
        let message = snapshot.validate().unwrap_err().to_string();
        assert!(message.contains("non-numeric counters: Sort_rows=\"-5\""));
        assert!(!message.contains("missing counters"));
    }

    #[test]
    fn test_values_are_trimmed() {
        let snapshot = CounterSnapshot::parse([("Com_select", " 42 ")], at());
        assert_eq!(snapshot.get(CounterName::ComSelect), Some(42));
    }

    #[test]
    fn test_require_reports_missing_counter() {
        let snapshot = CounterSnapshot::from_values([(CounterName::ComSelect, 1)], at());
        assert_eq!(snapshot.require(CounterName::ComSelect).unwrap(), 1);
        assert!(matches!(
            snapshot.require(CounterName::ComInsert),
            Err(MystatError::DataIntegrity(_))
        ));
    }
}
