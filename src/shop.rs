use crate::model::{Animal, Gender, Health};
use crate::species::{AnimalKind, Climate};
use rand::Rng;

/// Oldest age, in days, a generated animal can have.
pub const MAX_AGE: u32 = 2000;

const BASE_PRICE: f64 = 2000.0;
const MIN_PRICE: i64 = 100;
const PRICE_WEIGHT_SCALE: f64 = 500.0;

/// Price of an animal of the given age (days) and weight (kg).
///
/// Non-increasing in both arguments and never below [`MIN_PRICE`].
pub fn price(age: u32, weight: u32) -> i64 {
    let age_factor = (1.0 - age as f64 / MAX_AGE as f64).max(0.0);
    let weight_factor = (1.0 - weight as f64 / PRICE_WEIGHT_SCALE).max(0.0);
    let price = (BASE_PRICE * age_factor * weight_factor).round() as i64;
    price.max(MIN_PRICE)
}

/// Pool of animals for sale, replaced wholesale on refresh.
#[derive(Debug, Clone)]
pub struct Shop {
    pub offers: Vec<Animal>,
    pub days_until_refresh: u32,
}

impl Shop {
    /// Create a shop stocked with a fresh set of offers.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut shop = Self {
            offers: Vec::new(),
            days_until_refresh: 0,
        };
        shop.refresh(rng);
        shop
    }

    /// Replace every offer and restart the refresh countdown.
    pub fn refresh<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n_offers = rng.random_range(5..=10);
        self.offers = (0..n_offers).map(|_| generate_animal(rng)).collect();
        self.days_until_refresh = rng.random_range(1..=3);
        log::debug!("shop refreshed with {n_offers} offers");
    }

    /// Advance the countdown by one day, refreshing when it runs out.
    ///
    /// Returns whether the offers were replaced.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.days_until_refresh = self.days_until_refresh.saturating_sub(1);
        if self.days_until_refresh == 0 {
            self.refresh(rng);
            return true;
        }
        false
    }
}

fn generate_animal<R: Rng + ?Sized>(rng: &mut R) -> Animal {
    let kind = AnimalKind::ALL[rng.random_range(0..AnimalKind::ALL.len())];
    let species_vec = kind.species();
    let species = species_vec[rng.random_range(0..species_vec.len())];

    let stems = kind.name_stems();
    let stem = stems[rng.random_range(0..stems.len())];
    let name = format!("{stem} {}", rng.random_range(0..1000));

    let climate = Climate::ALL[rng.random_range(0..Climate::ALL.len())];
    let age = rng.random_range(1..=MAX_AGE);
    let weight = rng.random_range(10..410);
    let happiness = rng.random_range(70..=100);
    let gender = Gender::random(rng);

    Animal {
        name,
        species,
        age,
        weight,
        gender,
        climate,
        health: Health::Healthy,
        happiness,
        hungry: false,
        unhappy: false,
        price: price(age, weight),
        lineage: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn price_examples() {
        assert_eq!(price(0, 0), 2000);
        assert_eq!(price(1000, 250), 500);
        assert_eq!(price(MAX_AGE, 10), 100);
        assert_eq!(price(10, 500), 100);
        assert_eq!(price(10, 900), 100);
    }

    proptest! {
        #[test]
        fn price_has_a_floor(age in 0u32..=MAX_AGE, weight in 0u32..10_000) {
            prop_assert!(price(age, weight) >= 100);
        }

        #[test]
        fn price_is_non_increasing_in_age(age in 0u32..MAX_AGE, weight in 0u32..600) {
            prop_assert!(price(age + 1, weight) <= price(age, weight));
        }

        #[test]
        fn price_is_non_increasing_in_weight(age in 0u32..=MAX_AGE, weight in 0u32..600) {
            prop_assert!(price(age, weight + 1) <= price(age, weight));
        }
    }

    #[test]
    fn refresh_stays_within_bounds() {
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        for _ in 0..50 {
            let shop = Shop::generate(&mut rng);
            assert!((5..=10).contains(&shop.offers.len()));
            assert!((1..=3).contains(&shop.days_until_refresh));
            for offer in &shop.offers {
                assert!(offer.price >= 100);
                assert!((1..=MAX_AGE).contains(&offer.age));
                assert!((10..410).contains(&offer.weight));
                assert!((70..=100).contains(&offer.happiness));
                assert_eq!(offer.health, Health::Healthy);
                assert_eq!(offer.is_predator(), offer.species.is_predator());
                assert!(offer.lineage.is_none());
            }
        }
    }

    #[test]
    fn tick_refreshes_only_when_countdown_expires() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let mut shop = Shop::generate(&mut rng);
        shop.days_until_refresh = 2;
        let before: Vec<String> = shop.offers.iter().map(|a| a.name.clone()).collect();

        assert!(!shop.tick(&mut rng));
        assert_eq!(shop.days_until_refresh, 1);
        let unchanged: Vec<String> = shop.offers.iter().map(|a| a.name.clone()).collect();
        assert_eq!(before, unchanged);

        assert!(shop.tick(&mut rng));
        assert!((1..=3).contains(&shop.days_until_refresh));
    }
}
