//! One campaign run: (year, channel, campaign type, repetition) in,
//! a batch of transactions out.
//!
//! ORDER OF DRAWS (fixed, part of the reproducibility contract):
//!   1. theme, start day, jitter            (campaign stream)
//!   2. audience allocation                 (population stream)
//!   3. dates, amounts, payment methods     (campaign stream)

use crate::{
    amounts::{amount_deciles, sample_amounts},
    config::{CampaignConfig, ChannelConfig, GeneratorConfig},
    contact_pool::{Allocation, ContactPool},
    dates::sample_dates,
    error::{GenError, GenResult},
    picker::pick_weighted,
    rng::SimRng,
    types::{ChannelName, ContactId, Year},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const JITTER_MIN: f64 = 0.85;
pub const JITTER_MAX: f64 = 1.15;
pub const DAYS_IN_START_RANGE: i64 = 365;

/// One donation. Write-once: never modified after the batch is emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub campaign_start: NaiveDate,
    pub campaign_end: NaiveDate,
    pub channel: ChannelName,
    pub campaign_name: String,
    pub campaign_type: String,
    pub donation_amount: f64,
    pub payment_method: String,
    /// Outreach cost spread over respondents.
    pub cost: f64,
    /// Reach per respondent (inverse response rate).
    pub reactivity: f64,
    pub contact_id: ContactId,
    pub amount_decile: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignMetadata {
    pub theme: String,
    pub start_day: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub name: String,
    pub transformation_rate: f64,
    pub avg_donation: f64,
    pub std_deviation: f64,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct CampaignBatch {
    pub metadata: CampaignMetadata,
    pub reach: u64,
    pub sent: u64,
    pub transactions: Vec<TransactionRecord>,
}

pub struct CampaignRunner<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> CampaignRunner<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Theme, window and name of a campaign starting in `year`.
    pub fn build_metadata(
        &self,
        year: Year,
        channel_name: &str,
        channel: &ChannelConfig,
        campaign: &CampaignConfig,
        rng: &mut SimRng,
    ) -> GenResult<CampaignMetadata> {
        let theme = pick_weighted(&self.config.campaign_themes, rng)?.clone();
        let start_day = rng.uniform_inclusive(1, DAYS_IN_START_RANGE);
        let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| GenError::config(format!("year {year} is out of range")))?;
        let start = jan_first
            .checked_add_signed(Duration::days(start_day))
            .ok_or_else(|| GenError::config(format!("campaign start in {year} is out of range")))?;
        let end = start
            .checked_add_signed(Duration::days(i64::from(channel.duration)))
            .ok_or_else(|| {
                GenError::config(format!(
                    "channel '{channel_name}': {start} + {} days is out of range",
                    channel.duration
                ))
            })?;

        Ok(CampaignMetadata {
            name: format!("{year}-{start_day:02}_{channel_name}_{theme}"),
            theme,
            start_day,
            start,
            end,
            transformation_rate: campaign.transformation_rate,
            avg_donation: campaign.avg_donation,
            std_deviation: campaign.std_deviation,
        })
    }

    /// Run one repetition of `campaign_type` on `channel_name`.
    /// An empty audience yields an empty batch.
    pub fn run(
        &self,
        year: Year,
        channel_name: &str,
        campaign_type: &str,
        pool: &mut ContactPool,
        campaign_rng: &mut SimRng,
        population_rng: &mut SimRng,
    ) -> GenResult<CampaignBatch> {
        let channel = self
            .config
            .channels
            .get(channel_name)
            .ok_or_else(|| GenError::config(format!("unknown channel '{channel_name}'")))?;
        let campaign = channel.campaigns.get(campaign_type).ok_or_else(|| {
            GenError::config(format!("channel '{channel_name}' has no '{campaign_type}' campaign"))
        })?;

        let metadata = self.build_metadata(year, channel_name, channel, campaign, campaign_rng)?;
        let jitter = campaign_rng.uniform_f64(JITTER_MIN, JITTER_MAX);
        let Allocation {
            reach,
            sent,
            audience,
        } = pool.allocate_for_campaign(campaign_type, channel_name, channel, jitter, population_rng)?;

        let transactions = if audience.is_empty() {
            Vec::new()
        } else {
            self.emit_transactions(
                &metadata,
                channel_name,
                channel,
                campaign_type,
                reach,
                audience,
                campaign_rng,
            )?
        };

        Ok(CampaignBatch {
            metadata,
            reach,
            sent,
            transactions,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_transactions(
        &self,
        metadata: &CampaignMetadata,
        channel_name: &str,
        channel: &ChannelConfig,
        campaign_type: &str,
        reach: u64,
        audience: Vec<ContactId>,
        rng: &mut SimRng,
    ) -> GenResult<Vec<TransactionRecord>> {
        let n = audience.len();
        let dates = sample_dates(n, channel.distribution, metadata.start, metadata.end, rng);
        let amounts = sample_amounts(n, metadata.avg_donation, metadata.std_deviation, rng);
        let payment_table = channel.payment_table();
        let payments = (0..n)
            .map(|_| pick_weighted(&payment_table, rng).map(|m| m.to_string()))
            .collect::<GenResult<Vec<_>>>()?;
        let deciles = amount_deciles(&amounts);

        let cost = reach as f64 * channel.cost_per_reach / n as f64;
        let reactivity = reach as f64 / n as f64;

        let transactions = audience
            .into_iter()
            .zip(dates)
            .zip(amounts)
            .zip(payments)
            .zip(deciles)
            .map(|((((contact_id, date), donation_amount), payment_method), amount_decile)| {
                TransactionRecord {
                    date,
                    campaign_start: metadata.start,
                    campaign_end: metadata.end,
                    channel: channel_name.to_string(),
                    campaign_name: metadata.name.clone(),
                    campaign_type: campaign_type.to_string(),
                    donation_amount,
                    payment_method,
                    cost,
                    reactivity,
                    contact_id,
                    amount_decile,
                }
            })
            .collect();
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    #[test]
    fn metadata_name_and_window() {
        let config = GeneratorConfig::default_test();
        let runner = CampaignRunner::new(&config);
        let channel = &config.channels["Print"];
        let campaign = &channel.campaigns["retention"];
        let mut rng = SimRng::new(3, 1);

        for _ in 0..200 {
            let meta = runner
                .build_metadata(2021, "Print", channel, campaign, &mut rng)
                .unwrap();
            assert!((1..=365).contains(&meta.start_day));
            assert_eq!((meta.end - meta.start).num_days(), 30);
            let jan_first = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
            assert_eq!((meta.start - jan_first).num_days(), meta.start_day);
            assert_eq!(
                meta.name,
                format!("2021-{:02}_Print_{}", meta.start_day, meta.theme)
            );
        }
    }

    #[test]
    fn window_past_calendar_limit_is_a_configuration_error() {
        let mut config = GeneratorConfig::default_test();
        config.channels.get_mut("Print").unwrap().duration = u32::MAX;
        let runner = CampaignRunner::new(&config);
        let channel = &config.channels["Print"];
        let campaign = &channel.campaigns["retention"];
        let mut rng = SimRng::new(3, 1);

        let err = runner
            .build_metadata(2021, "Print", channel, campaign, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GenError::Configuration { .. }), "got {err}");
    }

    #[test]
    fn batch_fields_are_consistent() {
        let config = GeneratorConfig::default_test();
        let bank = RngBank::new(77);
        let mut campaign_rng = bank.for_stream(StreamSlot::Campaign);
        let mut population_rng = bank.for_stream(StreamSlot::Population);
        let mut pool = ContactPool::new(&config.channels, &mut population_rng);
        let runner = CampaignRunner::new(&config);

        let batch = runner
            .run(2020, "Print", "retention", &mut pool, &mut campaign_rng, &mut population_rng)
            .unwrap();

        assert!(batch.sent <= batch.reach);
        assert_eq!(batch.transactions.len() as u64, batch.sent);
        assert!(!batch.transactions.is_empty());
        let n = batch.transactions.len() as f64;
        for t in &batch.transactions {
            assert!(t.date >= t.campaign_start && t.date <= t.campaign_end);
            assert!(t.donation_amount >= 1.0);
            assert!((1..=10).contains(&t.amount_decile));
            assert!(["Cheque", "Bank Transfer"].contains(&t.payment_method.as_str()));
            assert!((t.cost - batch.reach as f64 * 0.8 / n).abs() < 1e-9);
            assert!((t.reactivity - batch.reach as f64 / n).abs() < 1e-9);
            assert_eq!(t.campaign_name, batch.metadata.name);
            assert_eq!(t.campaign_type, "retention");
        }
    }

    #[test]
    fn unknown_campaign_type_emits_nothing() {
        let mut config = GeneratorConfig::default_test();
        let upgrade = config.channels["Email"].campaigns["retention"].clone();
        config
            .channels
            .get_mut("Email")
            .unwrap()
            .campaigns
            .insert("upgrade".into(), upgrade);

        let bank = RngBank::new(5);
        let mut campaign_rng = bank.for_stream(StreamSlot::Campaign);
        let mut population_rng = bank.for_stream(StreamSlot::Population);
        let mut pool = ContactPool::new(&config.channels, &mut population_rng);
        let runner = CampaignRunner::new(&config);

        let batch = runner
            .run(2020, "Email", "upgrade", &mut pool, &mut campaign_rng, &mut population_rng)
            .unwrap();
        assert_eq!(batch.reach, 0);
        assert!(batch.transactions.is_empty());
    }
}
