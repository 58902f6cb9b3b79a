use dash_forge::settings::Settings;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_str().unwrap();

    let settings = Settings {
        api_key: Some("abc".to_string()),
        model: "gemini-3-pro".to_string(),
        request_timeout_secs: 120,
        debug_logging: true,
        ..Settings::default()
    };
    settings.save(path).unwrap();
    assert_eq!(Settings::load(path).unwrap(), settings);
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "api_key": "abc" }"#).unwrap();

    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings.api_key.as_deref(), Some("abc"));
    assert_eq!(settings.model, Settings::default().model);
    assert_eq!(settings.request_timeout_secs, 60);
    assert!(settings.enable_toasts);
}
