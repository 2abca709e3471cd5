use crate::{
    campaign::TransactionRecord,
    config::GeneratorConfig,
    error::{GenError, GenResult},
    identity::IdentityGenerator,
    picker::pick_index,
    rng::SimRng,
    types::{ContactId, Year},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contacts whose best decile is above this get a wealthy-pool job.
pub const WEALTHY_DECILE_THRESHOLD: u8 = 7;

pub const ADDRESS_LINE_2_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub contact_id: ContactId,
    pub salutation: String,
    pub gender: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address_1: String,
    pub address_2: String,
    pub zip_code: String,
    pub city: String,
    pub country: String,
    pub job: String,
    /// Highest amount decile across the contact's transactions.
    pub origin_decile: u8,
    #[serde(rename = "Creation_date")]
    pub creation_date: NaiveDate,
    #[serde(rename = "Creation_year")]
    pub creation_year: Year,
}

/// What the transaction history says about one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactHistory {
    pub max_decile: u8,
    pub first_date: NaiveDate,
}

/// Collapse the transaction table to one history per contact,
/// ordered by contact id.
pub fn summarize_histories(transactions: &[TransactionRecord]) -> BTreeMap<&str, ContactHistory> {
    let mut histories: BTreeMap<&str, ContactHistory> = BTreeMap::new();
    for t in transactions {
        histories
            .entry(t.contact_id.as_str())
            .and_modify(|h| {
                h.max_decile = h.max_decile.max(t.amount_decile);
                h.first_date = h.first_date.min(t.date);
            })
            .or_insert(ContactHistory {
                max_decile: t.amount_decile,
                first_date: t.date,
            });
    }
    histories
}

pub struct ProfileSynthesizer<'a> {
    config: &'a GeneratorConfig,
    identity: IdentityGenerator,
}

impl<'a> ProfileSynthesizer<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            identity: IdentityGenerator::for_locale(&config.localisation),
        }
    }

    /// One profile per distinct contact id in `transactions`.
    pub fn synthesize(
        &self,
        transactions: &[TransactionRecord],
        rng: &mut SimRng,
    ) -> GenResult<Vec<ContactRecord>> {
        let histories = summarize_histories(transactions);
        let mut contacts = Vec::with_capacity(histories.len());
        for (contact_id, history) in histories {
            contacts.push(self.profile(contact_id, history, rng)?);
        }
        log::info!("profile: synthesized {} contacts", contacts.len());
        Ok(contacts)
    }

    fn profile(
        &self,
        contact_id: &str,
        history: ContactHistory,
        rng: &mut SimRng,
    ) -> GenResult<ContactRecord> {
        let salutations = &self.config.salutations;
        let salutation = &salutations[pick_index(salutations.iter().map(|s| s.probability), rng)?];
        let id = &self.identity;

        let first_name = id.first_name(salutation.gender, rng).to_string();
        let last_name = id.last_name(rng).to_string();
        let phone = id.phone_number(rng);
        let address_1 = id.street_address(rng);
        let address_2 = if rng.chance(ADDRESS_LINE_2_PROBABILITY) {
            id.building_number(rng)
        } else {
            String::new()
        };
        let zip_code = id.postcode(rng);
        let city = id.city(rng).to_string();
        let country = id.country(rng).to_string();
        let job = self.pick_job(history.max_decile, rng)?;

        Ok(ContactRecord {
            contact_id: contact_id.to_string(),
            salutation: salutation.civility.clone(),
            gender: salutation.gender.as_str().to_string(),
            first_name,
            last_name,
            phone,
            address_1,
            address_2,
            zip_code,
            city,
            country,
            job,
            origin_decile: history.max_decile,
            creation_date: history.first_date,
            creation_year: history.first_date.year(),
        })
    }

    fn pick_job(&self, max_decile: u8, rng: &mut SimRng) -> GenResult<String> {
        let (label, pool) = if max_decile > WEALTHY_DECILE_THRESHOLD {
            ("WEALTHY_JOB", &self.config.wealthy_job)
        } else {
            ("NON_WEALTHY_JOB", &self.config.non_wealthy_job)
        };
        if pool.is_empty() {
            return Err(GenError::config(format!("{label} is empty")));
        }
        Ok(pool[rng.next_u64_below(pool.len() as u64) as usize].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(contact_id: &str, date: NaiveDate, decile: u8) -> TransactionRecord {
        TransactionRecord {
            date,
            campaign_start: date,
            campaign_end: date,
            channel: "Email".into(),
            campaign_name: "2020-05_Email_Forest protection".into(),
            campaign_type: "retention".into(),
            donation_amount: 10.0,
            payment_method: "PayPal".into(),
            cost: 0.1,
            reactivity: 2.0,
            contact_id: contact_id.into(),
            amount_decile: decile,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn histories_take_max_decile_and_first_date() {
        let txns = vec![
            txn("B", day(2021, 6, 1), 3),
            txn("A", day(2020, 2, 1), 9),
            txn("B", day(2019, 12, 31), 8),
            txn("A", day(2020, 1, 15), 2),
        ];
        let h = summarize_histories(&txns);
        assert_eq!(h.len(), 2);
        assert_eq!(h["A"], ContactHistory { max_decile: 9, first_date: day(2020, 1, 15) });
        assert_eq!(h["B"], ContactHistory { max_decile: 8, first_date: day(2019, 12, 31) });
    }

    #[test]
    fn job_pool_follows_origin_decile() {
        let config = GeneratorConfig::default_test();
        let synth = ProfileSynthesizer::new(&config);
        let mut rng = SimRng::new(10, 2);
        let txns = vec![txn("RICH0001", day(2020, 3, 3), 10), txn("MODEST01", day(2020, 3, 3), 7)];
        let contacts = synth.synthesize(&txns, &mut rng).unwrap();

        let modest = &contacts[0];
        let rich = &contacts[1];
        assert_eq!(modest.contact_id, "MODEST01");
        assert!(config.non_wealthy_job.contains(&modest.job));
        assert!(config.wealthy_job.contains(&rich.job));
        assert_eq!(rich.origin_decile, 10);
        assert_eq!(rich.creation_year, 2020);
    }

    #[test]
    fn gender_matches_salutation_table() {
        let config = GeneratorConfig::default_test();
        let synth = ProfileSynthesizer::new(&config);
        let mut rng = SimRng::new(11, 2);
        let txns: Vec<_> = (0..200)
            .map(|i| txn(&format!("C{i:07}"), day(2021, 1, 1), 5))
            .collect();
        for c in synth.synthesize(&txns, &mut rng).unwrap() {
            let entry = config
                .salutations
                .iter()
                .find(|s| s.civility == c.salutation)
                .unwrap();
            assert_eq!(c.gender, entry.gender.as_str());
            assert!(c.address_2.is_empty() || c.address_2.parse::<u32>().is_ok());
        }
    }

    #[test]
    fn no_transactions_no_contacts() {
        let config = GeneratorConfig::default_test();
        let synth = ProfileSynthesizer::new(&config);
        let mut rng = SimRng::new(1, 2);
        assert!(synth.synthesize(&[], &mut rng).unwrap().is_empty());
    }
}
