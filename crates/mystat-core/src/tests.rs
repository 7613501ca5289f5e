//! Unit tests for core types

use super::*;
use async_trait::async_trait;

mod instance_addr_tests {
    use super::*;

    #[test]
    fn test_parse_ipv4_address() {
        let addr: InstanceAddr = "10.0.0.201:3306".parse().unwrap();
        assert_eq!(addr.host(), "10.0.0.201");
        assert_eq!(addr.port(), 3306);
        assert_eq!(addr.to_string(), "10.0.0.201:3306");
    }

    #[test]
    fn test_parse_hostname_address() {
        let addr: InstanceAddr = "db.example.com:3307".parse().unwrap();
        assert_eq!(addr.host(), "db.example.com");
        assert_eq!(addr.port(), 3307);
    }

    #[test]
    fn test_parse_bracketed_ipv6() {
        let addr: InstanceAddr = "[::1]:3306".parse().unwrap();
        assert_eq!(addr.host(), "::1");
        assert_eq!(addr.to_string(), "[::1]:3306");
    }

    #[test]
    fn test_missing_colon_is_usage_error() {
        let err = "10.0.0.201".parse::<InstanceAddr>().unwrap_err();
        assert!(matches!(err, MystatError::Usage(_)));
    }

    #[test]
    fn test_non_numeric_port_is_usage_error() {
        let err = "10.0.0.201:mysql".parse::<InstanceAddr>().unwrap_err();
        assert!(matches!(err, MystatError::Usage(_)));
        assert!(err.to_string().contains("mysql"));
    }

    #[test]
    fn test_empty_host_and_zero_port_rejected() {
        assert!(":3306".parse::<InstanceAddr>().is_err());
        assert!("10.0.0.201:0".parse::<InstanceAddr>().is_err());
        assert!("10.0.0.201:70000".parse::<InstanceAddr>().is_err());
    }
}

mod connection_config_tests {
    use super::*;

    #[test]
    fn test_defaults_to_utf8mb4() {
        let config = ConnectionConfig::new(InstanceAddr::new("localhost", 3306), "dba_ro");
        assert_eq!(config.charset, DEFAULT_CHARSET);
        assert!(config.password.is_none());
    }

    #[test]
    fn test_debug_masks_password() {
        let config = ConnectionConfig::new(InstanceAddr::new("localhost", 3306), "dba_ro")
            .with_password("s3cret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("***"));
    }
}

mod value_tests {
    use super::*;

    #[test]
    fn test_as_u64_accepts_integer_shapes() {
        assert_eq!(Value::Int64(42).as_u64(), Some(42));
        assert_eq!(Value::UInt64(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Value::Float64(7.0).as_u64(), Some(7));
        assert_eq!(Value::Decimal("12".into()).as_u64(), Some(12));
        assert_eq!(Value::Decimal("12.000".into()).as_u64(), Some(12));
        assert_eq!(Value::String(" 99 ".into()).as_u64(), Some(99));
    }

    #[test]
    fn test_as_u64_rejects_non_integers() {
        assert_eq!(Value::Null.as_u64(), None);
        assert_eq!(Value::Int64(-1).as_u64(), None);
        assert_eq!(Value::Float64(1.5).as_u64(), None);
        assert_eq!(Value::Decimal("1.5".into()).as_u64(), None);
        assert_eq!(Value::String("OFF".into()).as_u64(), None);
    }

    #[test]
    fn test_row_lookup_is_case_insensitive_fallback() {
        let row = Row::new(
            vec!["Variable_name".into(), "Value".into()],
            vec![Value::String("Connections".into()), Value::String("10".into())],
        );
        assert_eq!(row.get_by_name("Value"), Some(&Value::String("10".into())));
        assert_eq!(row.get_by_name("VARIABLE_NAME"), Some(&Value::String("Connections".into())));
        assert!(row.get_by_name("missing").is_none());
    }

    #[test]
    fn test_query_result_from_rows() {
        let result = QueryResult::from_rows(
            vec!["a".into()],
            vec![vec![Value::Int64(1)], vec![Value::Int64(2)]],
        );
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.first().map(|r| r.values.clone()), Some(vec![Value::Int64(1)]));
        assert!(QueryResult::default().first().is_none());
    }
}

mod connection_tests {
    use super::*;

    struct EchoConnection;

    #[async_trait]
    impl Connection for EchoConnection {
        fn driver_name(&self) -> &str {
            "echo"
        }

        async fn query(&self, sql: &str) -> Result<QueryResult> {
            if sql == "SELECT 1" {
                Ok(QueryResult::from_rows(vec!["1".into()], vec![vec![Value::Int64(1)]]))
            } else {
                Err(MystatError::Query(format!("unexpected statement: {}", sql)))
            }
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }

        fn is_closed(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_default_ping_runs_select_one() {
        assert!(EchoConnection.ping().await.is_ok());
    }

    #[test]
    fn test_connection_error_classification() {
        assert!(MystatError::Connection("gone".into()).is_connection_error());
        assert!(!MystatError::Query("syntax".into()).is_connection_error());
    }
}
