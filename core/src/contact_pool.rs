//! Per-channel contact registries.
//!
//! RULE: The pool only grows. Contacts are minted into a channel and
//! merged into other channels through retention, never removed.
//! The pool is owned by a single generation run and mutated only
//! through the operations below.
//!
//! Identifiers are 8-character tokens over [A-Z0-9] (36^8 ≈ 2.8e12
//! values). They are not checked against a global index, so a
//! collision is possible in principle but improbable at any
//! realistic dataset size.

use crate::{
    config::{CampaignKind, ChannelConfig},
    error::{GenError, GenResult},
    rng::SimRng,
    types::{ChannelName, ContactId},
};
use std::collections::{BTreeMap, BTreeSet};

pub const CONTACT_ID_LEN: usize = 8;
const CONTACT_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Outcome of one audience selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    /// People targeted before response.
    pub reach: u64,
    /// People who respond. Always `<= reach`.
    pub sent: u64,
    /// The responders; `audience.len() == sent`.
    pub audience: Vec<ContactId>,
}

pub struct ContactPool {
    existing: BTreeMap<ChannelName, BTreeSet<ContactId>>,
    /// Never-contacted members of the initial audiences. Tracked only:
    /// allocation does not read it yet.
    unused: BTreeMap<ChannelName, BTreeSet<ContactId>>,
}

impl ContactPool {
    /// An empty pool with no channels.
    pub fn empty() -> Self {
        Self {
            existing: BTreeMap::new(),
            unused: BTreeMap::new(),
        }
    }

    /// Seed every channel with `initial_nb` fresh contacts.
    pub fn new(channels: &BTreeMap<ChannelName, ChannelConfig>, rng: &mut SimRng) -> Self {
        let mut pool = Self::empty();
        for (name, channel) in channels {
            let initial = pool.mint_contacts(name, channel.initial_nb, rng);
            pool.unused
                .entry(name.clone())
                .or_default()
                .extend(initial.iter().cloned());
            log::info!("pool: initialised {} contacts for channel '{name}'", initial.len());
        }
        pool
    }

    /// Current contacts of a channel. Unknown channels are empty.
    pub fn contacts_of(&self, channel: &str) -> Vec<ContactId> {
        self.existing
            .get(channel)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contact_count(&self, channel: &str) -> usize {
        self.existing.get(channel).map_or(0, BTreeSet::len)
    }

    pub fn contains(&self, channel: &str, contact_id: &str) -> bool {
        self.existing
            .get(channel)
            .is_some_and(|set| set.contains(contact_id))
    }

    pub fn unused_of(&self, channel: &str) -> Vec<ContactId> {
        self.unused
            .get(channel)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Total distinct contacts across all channels.
    pub fn distinct_contacts(&self) -> usize {
        self.existing
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Mint `n` new identifiers into `channel`, returned in generation order.
    pub fn mint_contacts(&mut self, channel: &str, n: usize, rng: &mut SimRng) -> Vec<ContactId> {
        let fresh: Vec<ContactId> = (0..n).map(|_| mint_contact_id(rng)).collect();
        self.existing
            .entry(channel.to_string())
            .or_default()
            .extend(fresh.iter().cloned());
        fresh
    }

    /// Sample `floor(|pool| * pct / 100)` contacts without replacement
    /// from each source channel and return the union.
    pub fn cross_sell(&self, sources: &[(ChannelName, f64)], rng: &mut SimRng) -> BTreeSet<ContactId> {
        let mut audience = BTreeSet::new();
        for (source, pct) in sources {
            let Some(pool) = self.existing.get(source) else {
                continue;
            };
            let wanted = (pool.len() as f64 * (pct / 100.0)).floor() as usize;
            if wanted == 0 {
                continue;
            }
            let members: Vec<&ContactId> = pool.iter().collect();
            for i in rng.sample_indices(members.len(), wanted) {
                audience.insert(members[i].clone());
            }
        }
        audience
    }

    /// Select the responding audience of one campaign run.
    ///
    /// `jitter` scales the configured transformation rate; the product
    /// is clamped to [0, 1] so the response never exceeds the reach.
    /// Unknown campaign types are a no-op reported as a warning.
    pub fn allocate_for_campaign(
        &mut self,
        campaign_type: &str,
        channel_name: &str,
        channel: &ChannelConfig,
        jitter: f64,
        rng: &mut SimRng,
    ) -> GenResult<Allocation> {
        let Some(kind) = CampaignKind::parse(campaign_type) else {
            let warning = GenError::UnknownCampaignType {
                channel: channel_name.to_string(),
                campaign_type: campaign_type.to_string(),
            };
            log::warn!("pool: {warning}; skipping");
            return Ok(Allocation::default());
        };
        let Some(campaign) = channel.campaign(kind) else {
            return Err(GenError::config(format!(
                "channel '{channel_name}' has no {} campaign",
                kind.as_str()
            )));
        };
        let rate = (campaign.transformation_rate * jitter).clamp(0.0, 1.0);

        let allocation = match kind {
            CampaignKind::Prospecting => {
                let reach = campaign.max_reach_contact.ok_or_else(|| {
                    GenError::config(format!(
                        "channel '{channel_name}' prospecting: max_reach_contact is required"
                    ))
                })?;
                let sent = (reach as f64 * rate).floor() as u64;
                let audience = self.mint_contacts(channel_name, sent as usize, rng);
                Allocation {
                    reach,
                    sent,
                    audience,
                }
            }
            CampaignKind::Retention => {
                let pooled = self.cross_sell(&campaign.cross_sell, rng);
                let reach = pooled.len() as u64;
                let sent = (reach as f64 * rate).floor() as u64;
                // The union is ordered by identifier; the first `sent`
                // members respond.
                let audience: Vec<ContactId> = pooled.into_iter().take(sent as usize).collect();
                self.existing
                    .entry(channel_name.to_string())
                    .or_default()
                    .extend(audience.iter().cloned());
                Allocation {
                    reach,
                    sent,
                    audience,
                }
            }
        };

        log::debug!(
            "pool: {} campaign in '{channel_name}': reach={} sent={}",
            kind.as_str(),
            allocation.reach,
            allocation.sent
        );
        Ok(allocation)
    }
}

fn mint_contact_id(rng: &mut SimRng) -> ContactId {
    (0..CONTACT_ID_LEN)
        .map(|_| {
            let i = rng.next_u64_below(CONTACT_ID_ALPHABET.len() as u64) as usize;
            CONTACT_ID_ALPHABET[i] as char
        })
        .collect()
}
