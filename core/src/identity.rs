//! Locale-aware synthetic identity generation from curated lists.
//!
//! Provides plausible names, phone numbers and postal addresses for
//! donor profiles. All generation is deterministic (same RNG seed =
//! same identities).

use crate::{config::Gender, rng::SimRng};

/// Curated identity pools for one locale.
pub struct LocalePools {
    pub code: &'static str,
    male_first_names: &'static [&'static str],
    female_first_names: &'static [&'static str],
    last_names: &'static [&'static str],
    street_names: &'static [&'static str],
    street_kinds: &'static [&'static str],
    cities: &'static [&'static str],
    countries: &'static [&'static str],
    /// `#` = digit, `?` = uppercase letter.
    postcode_pattern: &'static str,
    phone_pattern: &'static str,
    /// Street number before (`true`) or after the street name.
    number_first: bool,
}

/// Deterministic identity generator bound to one locale.
pub struct IdentityGenerator {
    pools: &'static LocalePools,
}

impl IdentityGenerator {
    /// Unknown locales fall back to en_US.
    pub fn for_locale(locale: &str) -> Self {
        let pools = match locale {
            "fr_FR" => &FR_FR,
            "en_GB" => &EN_GB,
            "en_US" => &EN_US,
            other => {
                log::debug!("identity: no pools for locale '{other}', using en_US");
                &EN_US
            }
        };
        Self { pools }
    }

    pub fn locale(&self) -> &'static str {
        self.pools.code
    }

    /// First name for the given gender; neutral draws from both pools.
    pub fn first_name(&self, gender: Gender, rng: &mut SimRng) -> &'static str {
        let pool = match gender {
            Gender::Male => self.pools.male_first_names,
            Gender::Female => self.pools.female_first_names,
            Gender::Neutral => {
                if rng.chance(0.5) {
                    self.pools.male_first_names
                } else {
                    self.pools.female_first_names
                }
            }
        };
        pick(pool, rng)
    }

    pub fn last_name(&self, rng: &mut SimRng) -> &'static str {
        pick(self.pools.last_names, rng)
    }

    pub fn phone_number(&self, rng: &mut SimRng) -> String {
        fill_pattern(self.pools.phone_pattern, rng)
    }

    pub fn street_address(&self, rng: &mut SimRng) -> String {
        let number = rng.uniform_inclusive(1, 199);
        let kind = pick(self.pools.street_kinds, rng);
        let name = pick(self.pools.street_names, rng);
        if self.pools.number_first {
            format!("{number} {name} {kind}")
        } else {
            format!("{number}, {kind} {name}")
        }
    }

    pub fn building_number(&self, rng: &mut SimRng) -> String {
        rng.uniform_inclusive(1, 999).to_string()
    }

    pub fn postcode(&self, rng: &mut SimRng) -> String {
        fill_pattern(self.pools.postcode_pattern, rng)
    }

    pub fn city(&self, rng: &mut SimRng) -> &'static str {
        pick(self.pools.cities, rng)
    }

    pub fn country(&self, rng: &mut SimRng) -> &'static str {
        pick(self.pools.countries, rng)
    }
}

fn pick(pool: &'static [&'static str], rng: &mut SimRng) -> &'static str {
    pool[rng.next_u64_below(pool.len() as u64) as usize]
}

fn fill_pattern(pattern: &str, rng: &mut SimRng) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.next_u64_below(10) as u8),
            '?' => char::from(b'A' + rng.next_u64_below(26) as u8),
            other => other,
        })
        .collect()
}

static FR_FR: LocalePools = LocalePools {
    code: "fr_FR",
    male_first_names: &[
        "Louis", "Gabriel", "Jules", "Lucas", "Hugo", "Arthur", "Nathan", "Paul", "Thomas",
        "Antoine", "Nicolas", "Julien", "Maxime", "Pierre", "Alexandre", "Mathieu", "Olivier",
        "Philippe", "Laurent", "Bernard",
    ],
    female_first_names: &[
        "Emma", "Louise", "Jade", "Alice", "Chloé", "Léa", "Manon", "Camille", "Sarah", "Julie",
        "Claire", "Isabelle", "Nathalie", "Sophie", "Catherine", "Valérie", "Margaux", "Inès",
        "Anaïs", "Élise",
    ],
    last_names: &[
        "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
        "Moreau", "Simon", "Laurent", "Lefebvre", "Michel", "Garcia", "David", "Bertrand",
        "Roux", "Vincent", "Fournier", "Morel", "Girard", "André", "Mercier", "Dupont",
        "Lambert", "Bonnet", "François", "Martinez", "Legrand",
    ],
    street_names: &[
        "de la République", "Victor Hugo", "Jean Jaurès", "de la Paix", "Pasteur",
        "du Général de Gaulle", "des Lilas", "de la Gare", "Voltaire", "Émile Zola",
    ],
    street_kinds: &["rue", "avenue", "boulevard", "place", "chemin", "impasse"],
    cities: &[
        "Paris", "Lyon", "Marseille", "Toulouse", "Nantes", "Bordeaux", "Lille", "Rennes",
        "Strasbourg", "Montpellier", "Grenoble", "Dijon", "Angers", "Reims", "Tours",
    ],
    countries: &["France", "Belgique", "Suisse", "Luxembourg", "Canada", "Monaco"],
    postcode_pattern: "#####",
    phone_pattern: "+33 # ## ## ## ##",
    number_first: false,
};

static EN_GB: LocalePools = LocalePools {
    code: "en_GB",
    male_first_names: &[
        "Oliver", "George", "Harry", "Jack", "Jacob", "Noah", "Charlie", "Thomas", "Oscar",
        "William", "James", "Henry", "Alfie", "Leo", "Arthur", "Freddie", "Archie", "Joshua",
        "Daniel", "Edward",
    ],
    female_first_names: &[
        "Olivia", "Amelia", "Isla", "Ava", "Emily", "Sophie", "Grace", "Lily", "Freya", "Ella",
        "Charlotte", "Poppy", "Evie", "Jessica", "Ruby", "Florence", "Harriet", "Imogen",
        "Alice", "Eleanor",
    ],
    last_names: &[
        "Smith", "Jones", "Williams", "Taylor", "Brown", "Davies", "Evans", "Wilson", "Thomas",
        "Johnson", "Roberts", "Robinson", "Thompson", "Wright", "Walker", "White", "Edwards",
        "Hughes", "Green", "Hall", "Lewis", "Harris", "Clarke", "Patel", "Jackson", "Wood",
        "Turner", "Martin", "Cooper", "Hill",
    ],
    street_names: &[
        "High", "Station", "Church", "Victoria", "Park", "Green", "Manor", "Kings", "Queens",
        "Mill",
    ],
    street_kinds: &["Street", "Road", "Lane", "Avenue", "Close", "Crescent"],
    cities: &[
        "London", "Manchester", "Birmingham", "Leeds", "Glasgow", "Liverpool", "Bristol",
        "Sheffield", "Edinburgh", "Cardiff", "Leicester", "Nottingham", "York", "Oxford",
        "Cambridge",
    ],
    countries: &["United Kingdom", "Ireland", "France", "Germany", "Spain", "Netherlands"],
    postcode_pattern: "??# #??",
    phone_pattern: "+44 #### ######",
    number_first: true,
};

static EN_US: LocalePools = LocalePools {
    code: "en_US",
    male_first_names: &[
        "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
        "Charles", "Christopher", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Paul",
        "Andrew", "Joshua", "Kevin",
    ],
    female_first_names: &[
        "Mary", "Patricia", "Jennifer", "Linda", "Barbara", "Elizabeth", "Susan", "Jessica",
        "Sarah", "Karen", "Lisa", "Nancy", "Betty", "Margaret", "Sandra", "Ashley", "Kimberly",
        "Emily", "Donna", "Michelle",
    ],
    last_names: &[
        "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
        "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
        "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White",
        "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson",
    ],
    street_names: &[
        "Main", "Oak", "Pine", "Maple", "Cedar", "Elm", "Washington", "Lake", "Hill", "Sunset",
    ],
    street_kinds: &["Street", "Avenue", "Boulevard", "Drive", "Court", "Way"],
    cities: &[
        "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia",
        "San Antonio", "San Diego", "Dallas", "Austin", "Seattle", "Denver", "Boston",
        "Portland", "Atlanta",
    ],
    countries: &["United States", "Canada", "Mexico", "United Kingdom", "Australia"],
    postcode_pattern: "#####",
    phone_pattern: "(###) ###-####",
    number_first: true,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    #[test]
    fn identity_generation_is_deterministic() {
        let id = IdentityGenerator::for_locale("fr_FR");
        let mut rng1 = RngBank::new(12345).for_stream(StreamSlot::Profile);
        let mut rng2 = RngBank::new(12345).for_stream(StreamSlot::Profile);

        let a = (id.last_name(&mut rng1), id.street_address(&mut rng1), id.phone_number(&mut rng1));
        let b = (id.last_name(&mut rng2), id.street_address(&mut rng2), id.phone_number(&mut rng2));
        assert_eq!(a, b, "Same seed should produce same identity");
    }

    #[test]
    fn first_names_follow_gender() {
        let id = IdentityGenerator::for_locale("en_GB");
        let mut rng = SimRng::new(1, 2);
        for _ in 0..100 {
            assert!(EN_GB.male_first_names.contains(&id.first_name(Gender::Male, &mut rng)));
            assert!(EN_GB.female_first_names.contains(&id.first_name(Gender::Female, &mut rng)));
        }
    }

    #[test]
    fn patterns_are_filled() {
        let id = IdentityGenerator::for_locale("en_GB");
        let mut rng = SimRng::new(2, 2);
        for _ in 0..50 {
            let postcode = id.postcode(&mut rng);
            assert_eq!(postcode.len(), 7, "{postcode}");
            assert!(!postcode.contains('#') && !postcode.contains('?'));
            let phone = id.phone_number(&mut rng);
            assert!(phone.starts_with("+44 "), "{phone}");
        }
    }

    #[test]
    fn unknown_locale_falls_back_to_en_us() {
        assert_eq!(IdentityGenerator::for_locale("xx_XX").locale(), "en_US");
        assert_eq!(IdentityGenerator::for_locale("fr_FR").locale(), "fr_FR");
    }
}
