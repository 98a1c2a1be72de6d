use std::path::PathBuf;

use super::*;

fn raw_with_storage() -> RawSettings {
    let mut raw = RawSettings::default();
    raw.storage.connection_string = Some("memory".to_string());
    raw
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = raw_with_storage();
    raw.server.public_port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        public_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_match_documented_values() {
    let settings = Settings::from_raw(raw_with_storage()).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), DEFAULT_PUBLIC_PORT);
    assert_eq!(settings.server.admin_addr.port(), DEFAULT_ADMIN_PORT);
    assert_eq!(settings.storage.container, "liveshow");
    assert_eq!(settings.storage.object, "liveshowdetails.json");
    assert_eq!(settings.storage.request_timeout, Duration::from_secs(30));
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.capacity.get(), 16);
    assert!(settings.telemetry.enabled);
    assert_eq!(settings.display.timezone, chrono_tz::Australia::Sydney);
    assert_eq!(settings.display.environment, "Production");
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn connection_string_is_required() {
    let err = Settings::from_raw(RawSettings::default()).expect_err("missing storage");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "storage.connection_string",
            ..
        }
    ));
}

#[test]
fn malformed_connection_string_is_rejected() {
    let mut raw = RawSettings::default();
    raw.storage.connection_string = Some("AccountName=a;AccountKey=b".to_string());
    let err = Settings::from_raw(raw).expect_err("unsupported connection");
    assert!(err.to_string().contains("BlobEndpoint"));
}

#[test]
fn storage_names_must_be_single_segments() {
    let mut raw = raw_with_storage();
    raw.storage.object = Some("../escape.json".to_string());
    let err = Settings::from_raw(raw).expect_err("nested object");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "storage.object",
            ..
        }
    ));
}

#[test]
fn zero_cache_capacity_is_rejected() {
    let mut raw = raw_with_storage();
    raw.cache.capacity = Some(0);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn unknown_timezone_is_rejected() {
    let mut raw = raw_with_storage();
    raw.display.timezone = Some("Mars/Olympus_Mons".to_string());
    let err = Settings::from_raw(raw).expect_err("bad timezone");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "display.timezone",
            ..
        }
    ));
}

#[test]
fn listeners_cannot_share_an_address() {
    let mut raw = raw_with_storage();
    raw.server.admin_port = Some(DEFAULT_PUBLIC_PORT);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = raw_with_storage();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn serve_overrides_toggle_cache_and_telemetry() {
    let mut raw = raw_with_storage();
    let overrides = ServeOverrides {
        cache_enabled: Some(false),
        telemetry_enabled: Some(false),
        display_timezone: Some("Europe/London".to_string()),
        display_environment: Some("Staging".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(!settings.cache.enabled);
    assert!(!settings.telemetry.enabled);
    assert_eq!(settings.display.timezone, chrono_tz::Europe::London);
    assert_eq!(settings.display.environment, "Staging");
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["onair"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "onair",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--storage-connection-string",
        "file:///srv/onair",
        "--cache-enabled",
        "no",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.storage.connection_string.as_deref(),
                Some("file:///srv/onair")
            );
            assert_eq!(serve.overrides.cache_enabled, Some(false));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_show_arguments() {
    let args = CliArgs::parse_from([
        "onair",
        "--config-file",
        "/etc/onair.toml",
        "show",
        "--storage-container",
        "staging",
        "--pretty",
    ]);

    assert_eq!(args.config_file, Some(PathBuf::from("/etc/onair.toml")));
    match args.command.expect("show command") {
        Command::Show(show) => {
            assert_eq!(show.storage.container.as_deref(), Some("staging"));
            assert!(show.pretty);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn show_overrides_only_touch_storage() {
    let mut raw = raw_with_storage();
    raw.apply_storage_overrides(&StorageOverrides {
        object: Some("other.json".to_string()),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.storage.object, "other.json");
    assert_eq!(settings.storage.container, "liveshow");
}
