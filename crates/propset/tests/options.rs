pub mod fixtures;

use fixtures::Person;
use propset::options::{OptionsErrorKind, load_options};
use propset::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn options_load_from_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("propset.toml");
    fs::write(&path, "adder_argument = \"raw\"\ntrim_text = true\n").unwrap();

    let options = load_options(Some(&path)).expect("options load");
    assert_eq!(options, BinderOptions { adder_argument: AdderArgument::Raw, trim_text: true });
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("propset.json");
    fs::write(&path, "{ \"trim_text\": true }").unwrap();

    let options = load_options(Some(&path)).unwrap();
    assert_eq!(options.adder_argument, AdderArgument::Converted);
    assert!(options.trim_text);
}

#[test]
fn unknown_adder_argument_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("propset.toml");
    fs::write(&path, "adder_argument = \"sideways\"\n").unwrap();

    let err = load_options(Some(&path)).unwrap_err();
    assert_eq!(err.kind(), OptionsErrorKind::Config);
    assert!(err.to_string().contains("Failed to deserialize options"));
}

#[test]
fn loaded_options_drive_the_setter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("propset.toml");
    fs::write(&path, "trim_text = true\n").unwrap();
    let options = load_options(Some(&path)).unwrap();

    let mut person = Person::default();
    let statuses = StatusManager::new();
    let mut setter = PropertySetter::new(&mut person, &statuses).with_options(options);
    setter.set_property("name", "  Joe\n").unwrap();
    drop(setter);

    assert_eq!(person.name, "Joe");
}
