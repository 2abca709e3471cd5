use crate::{
    error::{GenError, GenResult},
    types::{ChannelName, Year},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A weighted option list as written in the configuration document:
/// `[["Forest protection", 0.1], ["Energy transition", 0.2]]`.
pub type WeightedList = Vec<(String, f64)>;

/// Longest campaign window a channel may declare, in days.
pub const MAX_CAMPAIGN_DURATION_DAYS: u32 = 3_660;

/// Response-time shape of a channel: when, inside the campaign
/// window, donations tend to land.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateDistribution {
    #[default]
    #[serde(alias = "regular")]
    Uniform,
    Exponential,
    InvertedExponential,
    /// Any tag we do not know. Sampled as uniform.
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignKind {
    Prospecting,
    Retention,
}

impl CampaignKind {
    /// Parse a campaign-type key. Unknown keys return None and are
    /// reported by the caller, never treated as fatal.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "prospecting" => Some(Self::Prospecting),
            "retention" => Some(Self::Retention),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prospecting => "prospecting",
            Self::Retention => "retention",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Repetitions per year.
    #[serde(default = "default_nb")]
    pub nb: u32,
    #[serde(default = "default_transformation_rate")]
    pub transformation_rate: f64,
    #[serde(default = "default_avg_donation")]
    pub avg_donation: f64,
    #[serde(default = "default_std_deviation")]
    pub std_deviation: f64,
    /// Prospecting only: how many people one campaign reaches.
    #[serde(default)]
    pub max_reach_contact: Option<u64>,
    /// Retention only: (source channel, percentage of its pool).
    #[serde(default)]
    pub cross_sell: Vec<(ChannelName, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub distribution: DateDistribution,
    /// Campaign window length in days.
    pub duration: u32,
    #[serde(default)]
    pub initial_nb: usize,
    #[serde(default)]
    pub cost_per_reach: f64,
    /// Payment method -> relative weight.
    #[serde(default)]
    pub payment: BTreeMap<String, f64>,
    /// Campaign-type key -> parameters. Keys other than
    /// "prospecting"/"retention" are kept and skipped with a warning.
    #[serde(default)]
    pub campaigns: BTreeMap<String, CampaignConfig>,
}

impl ChannelConfig {
    pub fn payment_table(&self) -> Vec<(&str, f64)> {
        self.payment.iter().map(|(k, w)| (k.as_str(), *w)).collect()
    }

    pub fn campaign(&self, kind: CampaignKind) -> Option<&CampaignConfig> {
        self.campaigns.get(kind.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Neutral,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalutationConfig {
    pub civility: String,
    pub gender: Gender,
    pub probability: f64,
}

/// The full generation configuration, as deserialized from the
/// upstream document. Read-only for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct GeneratorConfig {
    #[serde(default = "default_years")]
    pub years: u32,
    #[serde(default = "default_first_year")]
    pub first_year: Year,
    /// Carried for completeness; generation sizes pools per channel.
    #[serde(default = "default_initial_donor_database_size")]
    pub initial_donor_database_size: usize,
    /// Parsed but not applied: pools never shrink.
    #[serde(default = "default_global_churn_rate")]
    pub global_churn_rate: f64,
    #[serde(default)]
    pub channels: BTreeMap<ChannelName, ChannelConfig>,
    #[serde(default)]
    pub campaign_themes: WeightedList,
    #[serde(default)]
    pub where_possibilities: WeightedList,
    #[serde(default)]
    pub who_possibilities: WeightedList,
    #[serde(default)]
    pub what_possibilities: WeightedList,
    #[serde(default)]
    pub salutations: Vec<SalutationConfig>,
    #[serde(default)]
    pub wealthy_job: Vec<String>,
    #[serde(default)]
    pub non_wealthy_job: Vec<String>,
    #[serde(default = "default_localisation")]
    pub localisation: String,
}

fn default_nb() -> u32 {
    1
}
fn default_transformation_rate() -> f64 {
    0.1
}
fn default_avg_donation() -> f64 {
    50.0
}
fn default_std_deviation() -> f64 {
    10.0
}
fn default_years() -> u32 {
    10
}
fn default_first_year() -> Year {
    2014
}
fn default_initial_donor_database_size() -> usize {
    10_000
}
fn default_global_churn_rate() -> f64 {
    0.99
}
fn default_localisation() -> String {
    "fr_FR".into()
}

impl GeneratorConfig {
    /// Load from a document on disk: YAML for `.yml`/`.yaml`, JSON otherwise.
    /// In tests, use GeneratorConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let is_yaml = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));
        let config = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            serde_json::from_str(&content).map_err(anyhow::Error::from)
        };
        config.map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Total campaign runs per simulated year, across all channels.
    pub fn runs_per_year(&self) -> u64 {
        self.channels
            .values()
            .flat_map(|c| c.campaigns.values())
            .map(|c| c.nb as u64)
            .sum()
    }

    /// Reject configurations that cannot produce a dataset.
    /// Tables that are never consulted (no campaign runs) are not checked.
    pub fn validate(&self) -> GenResult<()> {
        for (name, channel) in &self.channels {
            if channel.duration > MAX_CAMPAIGN_DURATION_DAYS {
                return Err(GenError::config(format!(
                    "channel '{name}': duration {} exceeds {MAX_CAMPAIGN_DURATION_DAYS} days",
                    channel.duration
                )));
            }
            if !(channel.cost_per_reach >= 0.0) {
                return Err(GenError::config(format!(
                    "channel '{name}': cost_per_reach must be >= 0"
                )));
            }
            let runs: u32 = channel.campaigns.values().map(|c| c.nb).sum();
            if runs > 0 {
                check_weights(&format!("channel '{name}' payment"), channel.payment.values().copied())?;
            }
            for (key, campaign) in &channel.campaigns {
                if !(campaign.transformation_rate >= 0.0) {
                    return Err(GenError::config(format!(
                        "channel '{name}' {key}: transformation_rate must be >= 0"
                    )));
                }
                if !(campaign.std_deviation >= 0.0) {
                    return Err(GenError::config(format!(
                        "channel '{name}' {key}: std_deviation must be >= 0"
                    )));
                }
                if key == CampaignKind::Prospecting.as_str() && campaign.max_reach_contact.is_none() {
                    return Err(GenError::config(format!(
                        "channel '{name}' prospecting: max_reach_contact is required"
                    )));
                }
                for (source, pct) in &campaign.cross_sell {
                    if !(0.0..=100.0).contains(pct) {
                        return Err(GenError::config(format!(
                            "channel '{name}' {key}: cross_sell percentage {pct} for '{source}' outside [0, 100]"
                        )));
                    }
                }
            }
        }

        if self.runs_per_year() > 0 && self.years > 0 {
            check_weights("CAMPAIGN_THEMES", self.campaign_themes.iter().map(|(_, w)| *w))?;
            check_weights("SALUTATIONS", self.salutations.iter().map(|s| s.probability))?;
            if self.wealthy_job.is_empty() || self.non_wealthy_job.is_empty() {
                return Err(GenError::config(
                    "WEALTHY_JOB and NON_WEALTHY_JOB must both be non-empty",
                ));
            }
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let email = ChannelConfig {
            distribution: DateDistribution::Exponential,
            duration: 5,
            initial_nb: 200,
            cost_per_reach: 0.05,
            payment: [
                ("Credit/Debit Card".to_string(), 65.0),
                ("PayPal".to_string(), 10.0),
                ("Direct Debit".to_string(), 25.0),
            ]
            .into(),
            campaigns: [
                (
                    "prospecting".to_string(),
                    CampaignConfig {
                        nb: 2,
                        transformation_rate: 0.05,
                        avg_donation: 20.0,
                        std_deviation: 15.0,
                        max_reach_contact: Some(1_000),
                        cross_sell: vec![],
                    },
                ),
                (
                    "retention".to_string(),
                    CampaignConfig {
                        nb: 3,
                        transformation_rate: 0.2,
                        avg_donation: 30.0,
                        std_deviation: 10.0,
                        max_reach_contact: None,
                        cross_sell: vec![("Email".into(), 100.0), ("Print".into(), 40.0)],
                    },
                ),
            ]
            .into(),
        };

        let print = ChannelConfig {
            distribution: DateDistribution::InvertedExponential,
            duration: 30,
            initial_nb: 100,
            cost_per_reach: 0.8,
            payment: [("Cheque".to_string(), 60.0), ("Bank Transfer".to_string(), 40.0)].into(),
            campaigns: [(
                "retention".to_string(),
                CampaignConfig {
                    nb: 2,
                    transformation_rate: 0.3,
                    avg_donation: 45.0,
                    std_deviation: 20.0,
                    max_reach_contact: None,
                    cross_sell: vec![("Print".into(), 100.0)],
                },
            )]
            .into(),
        };

        Self {
            years: 2,
            first_year: 2020,
            initial_donor_database_size: 300,
            global_churn_rate: 0.99,
            channels: [("Email".to_string(), email), ("Print".to_string(), print)].into(),
            campaign_themes: vec![
                ("Forest protection".into(), 0.1),
                ("Carbon emission reduction".into(), 0.15),
                ("Energy transition".into(), 0.1),
            ],
            where_possibilities: vec![],
            who_possibilities: vec![("Youth".into(), 0.25), ("Families".into(), 0.2)],
            what_possibilities: vec![],
            salutations: vec![
                SalutationConfig {
                    civility: "Mr.".into(),
                    gender: Gender::Male,
                    probability: 0.45,
                },
                SalutationConfig {
                    civility: "Mrs.".into(),
                    gender: Gender::Female,
                    probability: 0.45,
                },
                SalutationConfig {
                    civility: "Mx.".into(),
                    gender: Gender::Neutral,
                    probability: 0.10,
                },
            ],
            wealthy_job: vec!["Surgeon".into(), "Lawyer".into(), "Company director".into()],
            non_wealthy_job: vec!["Teacher".into(), "Nurse".into(), "Student".into()],
            localisation: "en_GB".into(),
        }
    }
}

fn check_weights(label: &str, weights: impl Iterator<Item = f64>) -> GenResult<()> {
    let mut count = 0usize;
    let mut total = 0.0;
    for w in weights {
        if !(w >= 0.0) {
            return Err(GenError::config(format!("{label}: negative weight {w}")));
        }
        count += 1;
        total += w;
    }
    if count == 0 {
        return Err(GenError::config(format!("{label}: table is empty")));
    }
    if total <= 0.0 {
        return Err(GenError::config(format!("{label}: weights sum to {total}")));
    }
    Ok(())
}
