// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use finance_tracker_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn api() {
        let err = CoreError::Api {
            status: 400,
            body: "{\"amount\":[\"required\"]}".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (status 400): {\"amount\":[\"required\"]}"
        );
    }

    #[test]
    fn api_empty_body() {
        let err = CoreError::Api {
            status: 204,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "API error (status 204): ");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("bad float".into());
        assert_eq!(err.to_string(), "Serialization error: bad float");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("missing field `id`".into());
        assert_eq!(err.to_string(), "Deserialization error: missing field `id`");
    }

    #[test]
    fn storage() {
        let err = CoreError::Storage("lock poisoned".into());
        assert_eq!(err.to_string(), "Storage error: lock poisoned");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("amount must be positive, got -5".into());
        assert_eq!(err.to_string(), "Validation failed: amount must be positive, got -5");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn record_not_found() {
        let err = CoreError::RecordNotFound("42".into());
        assert_eq!(err.to_string(), "Record not found: 42");
    }

    #[test]
    fn invalid_state() {
        let err = CoreError::InvalidState("entry 1 is not being edited".into());
        assert_eq!(err.to_string(), "Invalid state: entry 1 is not being edited");
    }

    #[test]
    fn invalid_config() {
        let err = CoreError::InvalidConfig("base_url must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: base_url must not be empty"
        );
    }
}

// ── Accessors ───────────────────────────────────────────────────────

mod accessors {
    use super::*;

    #[test]
    fn status_and_body_for_api_errors() {
        let err = CoreError::Api {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.body(), Some("bad gateway"));
    }

    #[test]
    fn no_status_for_transport_errors() {
        let err = CoreError::Network("timeout".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("no such file")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_propagates_io() {
        fn read() -> Result<String, CoreError> {
            Ok(std::fs::read_to_string("/definitely/not/here.json")?)
        }
        assert!(matches!(read(), Err(CoreError::FileIO(_))));
    }

    #[test]
    fn debug_includes_variant_name() {
        let err = CoreError::RecordNotFound("7".into());
        assert!(format!("{err:?}").contains("RecordNotFound"));
    }
}
