//! Integration tests for settings persistence

use aura_core::config::{
    Config, ConfigPatch, ConfigStorage, ConfigStore, FontSize, JsonFileStorage, OrbPreset,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_settings_survive_restart() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("settings.json");

    {
        let store = ConfigStore::open(JsonFileStorage::new(&path));
        store.update(
            ConfigPatch::new()
                .animation_speed(1.5)
                .visual_intensity(0.3)
                .orb_preset(OrbPreset::Ocean),
        );
    }

    assert!(path.exists());
    let content = fs::read_to_string(&path)?;
    assert!(content.contains("animationSpeedMultiplier"));
    assert!(content.contains("ocean"));

    let reopened = ConfigStore::open(JsonFileStorage::new(&path));
    assert_eq!(
        reopened.get(),
        Config {
            animation_speed_multiplier: 1.5,
            visual_intensity: 0.3,
            orb_preset: OrbPreset::Ocean,
            ..Config::default()
        }
    );

    Ok(())
}

#[test]
fn test_missing_file_loads_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let storage = JsonFileStorage::new(temp_dir.path().join("absent.json"));

    assert!(storage.load()?.is_none());
    assert_eq!(ConfigStore::open(storage).get(), Config::default());

    Ok(())
}

#[test]
fn test_corrupt_file_loads_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("settings.json");
    fs::write(&path, "{ this is not json")?;

    let store = ConfigStore::open(JsonFileStorage::new(&path));
    assert_eq!(store.get(), Config::default());

    // The next update overwrites the corrupt blob.
    store.update(ConfigPatch::new().font_size(FontSize::Compact));
    let saved: Config = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(saved.font_size, FontSize::Compact);

    Ok(())
}

#[test]
fn test_out_of_range_file_values_are_clamped() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{"animationSpeedMultiplier": 0, "visualIntensity": 7, "someOldKey": true}"#,
    )?;

    let config = ConfigStore::open(JsonFileStorage::new(&path)).get();
    assert!(config.animation_speed_multiplier > 0.0);
    assert_eq!(config.visual_intensity, 1.0);

    Ok(())
}

#[test]
fn test_save_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("nested").join("aura").join("settings.json");

    let store = ConfigStore::open(JsonFileStorage::new(&path));
    store.update(ConfigPatch::new().orb_enabled(false));

    assert!(path.exists());
    Ok(())
}

#[test]
fn test_unwritable_path_keeps_running() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    // A directory where the file should be makes every write fail.
    let path = temp_dir.path().join("settings.json");
    fs::create_dir(&path)?;

    let store = ConfigStore::open(JsonFileStorage::new(&path));
    store.update(ConfigPatch::new().animation_speed(2.0));
    assert_eq!(store.animation_speed(), 2.0);

    Ok(())
}
