//! End-to-end campaign generation tests.

use fundraising_core::{
    config::{CampaignConfig, ChannelConfig, DateDistribution, GeneratorConfig},
    engine::GenEngine,
    generate, GenError,
};
use std::collections::{BTreeMap, HashMap};

/// One "Email" channel running a single prospecting campaign per year.
fn email_prospecting_config(years: u32) -> GeneratorConfig {
    let email = ChannelConfig {
        distribution: DateDistribution::Exponential,
        duration: 5,
        initial_nb: 0,
        cost_per_reach: 0.05,
        payment: [("Credit/Debit Card".to_string(), 65.0), ("PayPal".to_string(), 10.0)].into(),
        campaigns: BTreeMap::from([(
            "prospecting".to_string(),
            CampaignConfig {
                nb: 1,
                transformation_rate: 0.1,
                avg_donation: 20.0,
                std_deviation: 15.0,
                max_reach_contact: Some(100),
                cross_sell: vec![],
            },
        )]),
    };
    GeneratorConfig {
        years,
        first_year: 2014,
        channels: BTreeMap::from([("Email".to_string(), email)]),
        ..GeneratorConfig::default_test()
    }
}

#[test]
fn single_prospecting_campaign_matches_jitter_band() {
    let config = email_prospecting_config(1);
    let mut engine = GenEngine::new(&config, 2024).unwrap();
    assert!(engine.step_year().unwrap());
    assert!(!engine.step_year().unwrap());

    let txns = engine.transactions();
    // floor(100 * 0.1 * [0.85, 1.15))
    assert!((8..=11).contains(&txns.len()), "sent = {}", txns.len());
    assert_eq!(engine.campaigns_run(), 1);

    let first = &txns[0];
    for t in txns {
        assert_eq!(t.campaign_name, first.campaign_name);
        assert_eq!(t.channel, "Email");
        assert_eq!(t.campaign_type, "prospecting");
        assert!((t.reactivity - 100.0 / txns.len() as f64).abs() < 1e-9);
        assert!((t.cost - 100.0 * 0.05 / txns.len() as f64).abs() < 1e-9);
    }
    assert!(first.campaign_name.starts_with("2014-"));
    assert!(first.campaign_name.contains("_Email_"));
}

#[test]
fn every_contact_belongs_to_exactly_one_prospecting_audience() {
    let config = GeneratorConfig {
        channels: {
            let mut channels = email_prospecting_config(1).channels;
            let email = channels.get_mut("Email").unwrap();
            email.campaigns.get_mut("prospecting").unwrap().nb = 6;
            channels
        },
        ..email_prospecting_config(3)
    };
    let dataset = generate(&config, 7).unwrap();

    let mut campaigns_per_contact: HashMap<&str, usize> = HashMap::new();
    for t in &dataset.transactions {
        *campaigns_per_contact.entry(t.contact_id.as_str()).or_default() += 1;
    }
    assert!(!campaigns_per_contact.is_empty());
    assert!(
        campaigns_per_contact.values().all(|n| *n == 1),
        "a prospected contact donated in more than one campaign"
    );
}

#[test]
fn deciles_are_monotonic_within_each_campaign() {
    let dataset = generate(&GeneratorConfig::default_test(), 11).unwrap();
    assert!(!dataset.transactions.is_empty());

    let mut by_campaign: BTreeMap<&str, Vec<(f64, u8)>> = BTreeMap::new();
    for t in &dataset.transactions {
        assert!((1..=10).contains(&t.amount_decile));
        by_campaign
            .entry(t.campaign_name.as_str())
            .or_default()
            .push((t.donation_amount, t.amount_decile));
    }
    for (name, mut rows) in by_campaign {
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in rows.windows(2) {
            assert!(pair[0].1 <= pair[1].1, "decile order broken in {name}");
        }
    }
}

#[test]
fn transactions_are_emitted_year_major() {
    let dataset = generate(&GeneratorConfig::default_test(), 3).unwrap();
    let years: Vec<i32> = dataset
        .transactions
        .iter()
        .map(|t| t.campaign_name[..4].parse().unwrap())
        .collect();
    assert!(years.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(years.first(), Some(&2020));
    assert_eq!(years.last(), Some(&2021));
}

#[test]
fn within_a_year_channels_and_types_run_in_key_order() {
    let config = GeneratorConfig::default_test();
    let dataset = generate(&config, 3).unwrap();

    let mut by_year: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for t in &dataset.transactions {
        by_year
            .entry(&t.campaign_name[..4])
            .or_default()
            .push((t.channel.as_str(), t.campaign_type.as_str()));
    }
    assert_eq!(by_year.len(), 2);
    for (year, pairs) in by_year {
        assert!(
            pairs.windows(2).all(|w| w[0] <= w[1]),
            "{year}: (channel, type) pairs out of key order or interleaved"
        );
        assert!(pairs.contains(&("Email", "prospecting")), "{year}");
        assert!(pairs.contains(&("Print", "retention")), "{year}");
    }
}

#[test]
fn summary_counts_every_campaign_run() {
    let config = GeneratorConfig::default_test();
    let (dataset, summary) = GenEngine::new(&config, 8).unwrap().run_with_summary().unwrap();

    assert_eq!(summary.campaigns_run as u64, config.runs_per_year() * config.years as u64);
    assert_eq!(summary.transactions, dataset.transactions.len());
    assert_eq!(summary.contacts, dataset.contacts.len());
    let total: f64 = dataset.transactions.iter().map(|t| t.donation_amount).sum();
    assert!((summary.total_donated - total).abs() < 1e-6);
}

#[test]
fn window_overflowing_the_calendar_is_a_configuration_error() {
    let mut config = GeneratorConfig::default_test();
    config.channels.get_mut("Print").unwrap().duration = u32::MAX;
    let err = generate(&config, 1).unwrap_err();
    assert!(matches!(err, GenError::Configuration { .. }), "got {err}");

    let config = GeneratorConfig {
        first_year: 262_143,
        ..GeneratorConfig::default_test()
    };
    let err = generate(&config, 1).unwrap_err();
    assert!(matches!(err, GenError::Configuration { .. }), "got {err}");
}

#[test]
fn dates_fall_inside_campaign_windows() {
    let dataset = generate(&GeneratorConfig::default_test(), 19).unwrap();
    for t in &dataset.transactions {
        assert!(t.campaign_start <= t.date && t.date <= t.campaign_end);
        assert!(t.donation_amount >= 1.0);
    }
}

#[test]
fn unknown_campaign_type_contributes_nothing() {
    let mut config = email_prospecting_config(1);
    let email = config.channels.get_mut("Email").unwrap();
    let upgrade = email.campaigns["prospecting"].clone();
    email.campaigns.insert("upgrade".into(), upgrade);

    let dataset = generate(&config, 5).unwrap();
    assert!(dataset.transactions.iter().all(|t| t.campaign_type == "prospecting"));
}

#[test]
fn zero_years_is_an_empty_dataset() {
    let config = GeneratorConfig {
        years: 0,
        ..GeneratorConfig::default_test()
    };
    let dataset = generate(&config, 1).unwrap();
    assert!(dataset.transactions.is_empty());
    assert!(dataset.contacts.is_empty());
}

#[test]
fn invalid_configuration_aborts_generation() {
    let mut config = GeneratorConfig::default_test();
    config.campaign_themes.clear();
    assert!(generate(&config, 1).is_err());
}
