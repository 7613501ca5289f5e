use super::*;
use crate::delta::{InstantaneousFacts, MetricsRecord, RateMetrics, ReplicaLag};
use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;
use std::time::Duration;

const CANONICAL_BANNER: &str = "|                   |--------- THREAD INFO --------|------ TRX INFO ------|-------------------------- CMD INFO --------------------------|-- TMP INFO -|----------------------- ROWS INFO --------------------|- NETWORK INFO --|";
const CANONICAL_LABELS: &str = "|        time       |    total|active|  wait|create| total|  wait|  MaxSec|  select|  insert|  update|  delete|   begin|  commit|rollback|   mem|  disk|      sort|      read|    insert|    update|    delete|   outMB|    inMB|";

fn record(facts: InstantaneousFacts, rates: RateMetrics) -> MetricsRecord {
    MetricsRecord::new(
        Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap(),
        facts,
        rates,
        Duration::from_secs(1),
        Vec::new(),
    )
}

fn sample_record() -> MetricsRecord {
    let facts = InstantaneousFacts::new()
        .with_threads(120, 8, 2)
        .with_transactions(5, 1, 42);
    let rates = RateMetrics {
        new_connections: 3,
        selects: 1500,
        commits: 77,
        read_rows: 90_000,
        bytes_sent_mb: 12,
        ..RateMetrics::default()
    };
    record(facts, rates)
}

/// Byte offsets of every `|` in `line`
fn pipe_positions(line: &str) -> Vec<usize> {
    line.match_indices('|').map(|(i, _)| i).collect()
}

mod schema_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_has_24_columns() {
        let schema = TableSchema::canonical();
        assert_eq!(schema.column_count(), 24);
        assert_eq!(schema.groups().len(), 7);
        assert_eq!(schema.columns().next().unwrap().field, Field::Time);
    }

    #[test]
    fn test_extended_appends_replica_and_buffer_pool() {
        let schema = TableSchema::extended();
        assert_eq!(schema.column_count(), 31);

        let canonical: Vec<_> = TableSchema::canonical().columns().collect();
        let extended: Vec<_> = schema.columns().take(24).collect();
        assert_eq!(canonical, extended);

        let titles: Vec<_> = schema.groups().iter().map(|g| g.title).collect();
        assert_eq!(&titles[7..], &["REPL", "BUFFER POOL INFO"]);
    }

    #[test]
    fn test_group_width_counts_inner_separators() {
        let group = TableSchema::canonical().groups()[1];
        assert_eq!(group.title, "THREAD INFO");
        assert_eq!(group.width(), 9 + 6 + 6 + 6 + 3);
    }

    #[test]
    fn test_rendered_lag() {
        assert_eq!(rendered_lag(ReplicaLag::NotReplica), 0);
        assert_eq!(rendered_lag(ReplicaLag::Seconds(12)), 12);
        assert_eq!(rendered_lag(ReplicaLag::Unknown), LAG_UNKNOWN_SENTINEL);
    }

    #[test]
    fn test_schema_serializes_columns() {
        let json = serde_json::to_value(TableSchema::canonical()).unwrap();
        assert_eq!(json["groups"][0]["columns"][0]["label"], "time");
        assert_eq!(json["groups"][0]["columns"][0]["label_align"], "center");
    }
}

mod renderer_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_label_line() {
        let renderer = TableRenderer::new(TableSchema::canonical());
        assert_eq!(renderer.label_line(), CANONICAL_LABELS);
    }

    #[test]
    fn test_banner_matches_label_boundaries() {
        for schema in [TableSchema::canonical(), TableSchema::extended()] {
            let renderer = TableRenderer::new(schema);
            let banner = renderer.banner_line();
            let labels = renderer.label_line();

            assert_eq!(banner.len(), labels.len());
            let banner_pipes = pipe_positions(&banner);
            let label_pipes = pipe_positions(&labels);
            for pipe in &banner_pipes {
                assert!(label_pipes.contains(pipe), "banner pipe at {} misaligned", pipe);
            }
            assert_eq!(banner_pipes.len(), schema.groups().len() + 1);
        }
    }

    #[test]
    fn test_canonical_banner_is_exact() {
        let banner = TableRenderer::new(TableSchema::canonical()).banner_line();
        assert_eq!(banner, CANONICAL_BANNER);
    }

    #[test]
    fn test_banner_lead_overrides_centering() {
        let banner = TableRenderer::new(TableSchema::canonical()).banner_line();
        assert!(banner.contains("|----------------------- ROWS INFO --------------------|"));
        assert!(banner.ends_with("|- NETWORK INFO --|"));
        assert!(banner.contains("|--------- THREAD INFO --------|"));
    }

    #[test]
    fn test_row_aligns_with_labels() {
        let renderer = TableRenderer::new(TableSchema::canonical());
        let row = renderer.render_row(&sample_record());

        assert_eq!(pipe_positions(&row), pipe_positions(&renderer.label_line()));
        assert_eq!(row.split('|').count(), 24 + 2);
    }

    #[test]
    fn test_row_values_right_justified() {
        let row = TableRenderer::new(TableSchema::canonical()).render_row(&sample_record());
        let fields: Vec<&str> = row.trim_matches('|').split('|').collect();

        assert_eq!(fields[0], "2024-03-01 09:05:07");
        assert_eq!(fields[1], "      120");
        assert_eq!(fields[2], "     8");
        assert_eq!(fields[4], "     3");
        assert_eq!(fields[7], "      42");
        assert_eq!(fields[8], "    1500");
        assert_eq!(fields[13], "      77");
        assert_eq!(fields[18], "     90000");
        assert_eq!(fields[22], "      12");
        assert_eq!(fields[23], "       0");
    }

    #[test]
    fn test_oversized_value_is_not_truncated() {
        let rates = RateMetrics {
            temp_tables_created: 12_345_678,
            ..RateMetrics::default()
        };
        let renderer = TableRenderer::new(TableSchema::canonical());
        let row = renderer.render_row(&record(InstantaneousFacts::new(), rates));
        let fields: Vec<&str> = row.trim_matches('|').split('|').collect();

        assert_eq!(fields[15], "12345678");
        assert_eq!(row.len(), renderer.label_line().len() + 2);
    }

    #[test]
    fn test_extended_row_renders_lag_placeholders() {
        let renderer = TableRenderer::new(TableSchema::extended());
        let lag_field = |lag: ReplicaLag| {
            let facts = InstantaneousFacts::new().with_replica_lag(lag);
            let row = renderer.render_row(&record(facts, RateMetrics::default()));
            row.trim_matches('|').split('|').nth(24).unwrap().trim().to_string()
        };

        assert_eq!(lag_field(ReplicaLag::NotReplica), "0");
        assert_eq!(lag_field(ReplicaLag::Unknown), "99999");
        assert_eq!(lag_field(ReplicaLag::Seconds(8)), "8");
    }

    #[test]
    fn test_extended_row_renders_buffer_pool() {
        let rates = RateMetrics {
            buffer_pool_logical_read_mb: 1,
            buffer_pool_free_mb: 6,
            ..RateMetrics::default()
        };
        let row = TableRenderer::new(TableSchema::extended())
            .render_row(&record(InstantaneousFacts::new(), rates));
        let fields: Vec<&str> = row.trim_matches('|').split('|').collect();

        assert_eq!(fields.len(), 31);
        assert_eq!(fields[25], "       1");
        assert_eq!(fields[30], "       6");
    }

    #[test]
    fn test_header_lines_order() {
        let renderer = TableRenderer::default();
        let [banner, labels] = renderer.header_lines();
        assert_eq!(banner, renderer.banner_line());
        assert_eq!(labels, CANONICAL_LABELS);
    }
}
