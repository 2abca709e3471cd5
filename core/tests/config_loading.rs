//! Loading configuration documents from disk.

use fundraising_core::config::{CampaignKind, GeneratorConfig};
use std::path::PathBuf;

fn demo(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../demos")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

#[test]
fn yaml_and_json_demos_describe_the_same_configuration() {
    let yaml = GeneratorConfig::load(&demo("demo_config.yml")).unwrap();
    let json = GeneratorConfig::load(&demo("demo_config.json")).unwrap();

    yaml.validate().unwrap();
    assert_eq!(yaml.years, json.years);
    assert_eq!(yaml.first_year, json.first_year);
    assert_eq!(yaml.runs_per_year(), json.runs_per_year());
    for (name, channel) in &json.channels {
        let other = &yaml.channels[name];
        assert_eq!(other.distribution, channel.distribution, "{name}");
        assert_eq!(other.duration, channel.duration, "{name}");
        assert!(other.payment.keys().eq(channel.payment.keys()), "{name}");
    }
    assert_eq!(yaml.wealthy_job, json.wealthy_job);

    let retention = yaml.channels["Email"].campaign(CampaignKind::Retention).unwrap();
    assert_eq!(
        retention.cross_sell,
        vec![("Email".to_string(), 100.0), ("Print".to_string(), 40.0)]
    );
}

#[test]
fn yml_extension_selects_yaml() {
    let path = std::env::temp_dir().join(format!("fundraising-config-{}.yml", std::process::id()));
    std::fs::write(&path, "YEARS: 1\nFIRST_YEAR: 2014\n").unwrap();

    let config = GeneratorConfig::load(path.to_str().unwrap());
    std::fs::remove_file(&path).unwrap();

    let config = config.unwrap();
    assert_eq!(config.years, 1);
    assert_eq!(config.first_year, 2014);
    assert!(config.channels.is_empty());
}

#[test]
fn unparseable_document_names_the_file() {
    let path = std::env::temp_dir().join(format!("fundraising-config-{}.json", std::process::id()));
    std::fs::write(&path, "YEARS: 1\n").unwrap();

    let err = GeneratorConfig::load(path.to_str().unwrap()).unwrap_err();
    std::fs::remove_file(&path).unwrap();
    assert!(err.to_string().contains("Cannot parse"), "{err}");
}
