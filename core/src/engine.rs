//! The generation engine.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   for year in [first_year, first_year + years)
//!     for channel in channels            (key order)
//!       for campaign type in campaigns   (key order)
//!         for repetition in [0, nb)
//!           CampaignRunner::run
//!   then ProfileSynthesizer over the full transaction table.
//!
//! RULES:
//!   - The engine owns the ContactPool; nothing else mutates it.
//!   - All randomness flows through the RngBank.
//!   - Transaction batches are appended in emission order and never
//!     modified afterwards.

use crate::{
    campaign::{CampaignRunner, TransactionRecord},
    clock::SimClock,
    config::GeneratorConfig,
    contact_pool::ContactPool,
    error::GenResult,
    profile::{ContactRecord, ProfileSynthesizer},
    rng::{RngBank, SimRng, StreamSlot},
};
use serde::{Deserialize, Serialize};

/// The two output tables of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub transactions: Vec<TransactionRecord>,
    pub contacts: Vec<ContactRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub transactions: usize,
    pub contacts: usize,
    pub campaigns_run: usize,
    pub total_donated: f64,
}

impl Dataset {
    pub fn summary(&self, campaigns_run: usize) -> DatasetSummary {
        DatasetSummary {
            transactions: self.transactions.len(),
            contacts: self.contacts.len(),
            campaigns_run,
            total_donated: self.transactions.iter().map(|t| t.donation_amount).sum(),
        }
    }
}

pub struct GenEngine<'a> {
    config: &'a GeneratorConfig,
    pub clock: SimClock,
    pub pool: ContactPool,
    population_rng: SimRng,
    campaign_rng: SimRng,
    profile_rng: SimRng,
    transactions: Vec<TransactionRecord>,
    campaigns_run: usize,
}

impl<'a> GenEngine<'a> {
    /// Validate `config` and seed the contact pool.
    pub fn new(config: &'a GeneratorConfig, seed: u64) -> GenResult<Self> {
        config.validate()?;
        let bank = RngBank::new(seed);
        let mut population_rng = bank.for_stream(StreamSlot::Population);
        let pool = ContactPool::new(&config.channels, &mut population_rng);
        Ok(Self {
            config,
            clock: SimClock::new(config.first_year, config.years),
            pool,
            population_rng,
            campaign_rng: bank.for_stream(StreamSlot::Campaign),
            profile_rng: bank.for_stream(StreamSlot::Profile),
            transactions: Vec::new(),
            campaigns_run: 0,
        })
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn campaigns_run(&self) -> usize {
        self.campaigns_run
    }

    /// Simulate the next year. Returns false once every year is done.
    pub fn step_year(&mut self) -> GenResult<bool> {
        let Some(year) = self.clock.advance() else {
            return Ok(false);
        };
        let config = self.config;
        let runner = CampaignRunner::new(config);
        let before = self.transactions.len();

        for (channel_name, channel) in &config.channels {
            if channel.campaigns.is_empty() {
                log::warn!("year={year} channel '{channel_name}' has no campaigns");
            }
            for (campaign_type, campaign) in &channel.campaigns {
                for _ in 0..campaign.nb {
                    let batch = runner.run(
                        year,
                        channel_name,
                        campaign_type,
                        &mut self.pool,
                        &mut self.campaign_rng,
                        &mut self.population_rng,
                    )?;
                    log::debug!(
                        "year={year} campaign '{}': reach={} sent={} txns={}",
                        batch.metadata.name,
                        batch.reach,
                        batch.sent,
                        batch.transactions.len()
                    );
                    self.campaigns_run += 1;
                    self.transactions.extend(batch.transactions);
                }
            }
        }

        log::info!(
            "year={year}: {} transactions, {} distinct contacts in pool",
            self.transactions.len() - before,
            self.pool.distinct_contacts()
        );
        Ok(true)
    }

    /// Run every remaining year, then derive the contact table.
    pub fn run(self) -> GenResult<Dataset> {
        self.run_with_summary().map(|(dataset, _)| dataset)
    }

    /// As [`GenEngine::run`], also reporting what the run produced.
    pub fn run_with_summary(mut self) -> GenResult<(Dataset, DatasetSummary)> {
        while self.step_year()? {}
        let contacts =
            ProfileSynthesizer::new(self.config).synthesize(&self.transactions, &mut self.profile_rng)?;
        let dataset = Dataset {
            transactions: self.transactions,
            contacts,
        };
        let summary = dataset.summary(self.campaigns_run);
        log::info!(
            "generation complete: {} campaigns, {} transactions, {} contacts, {:.2} donated",
            summary.campaigns_run,
            summary.transactions,
            summary.contacts,
            summary.total_donated
        );
        Ok((dataset, summary))
    }
}

/// Generate the full dataset for `config` from `seed`.
/// Equal seeds give identical datasets.
pub fn generate(config: &GeneratorConfig, seed: u64) -> GenResult<Dataset> {
    GenEngine::new(config, seed)?.run()
}
