use crate::config::Config;
use crate::error::ZooError;
use crate::model::{Animal, Employee, Enclosure, Health, MAX_LEVEL, Role};
use crate::shop::Shop;
use crate::species::{AnimalKind, Climate, Species};
use crate::stats::{RunningStats, StatsReport};
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_distr::{Bernoulli, Uniform};
use std::fmt;

/// Age, in days, after which animals may die of old age.
const OLD_AGE: u32 = 1000;
/// Sick animals one veterinarian can treat in a single round.
const VET_CAPACITY: usize = 20;
const MIN_POPULARITY: i32 = 10;
const MAX_POPULARITY: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Ongoing,
    Bankrupt,
    Won,
}

/// Something that happened to an animal, enclosure or the shop during a day.
#[derive(Debug, Clone, PartialEq)]
pub enum DayEvent {
    Starved { name: String },
    Infected { name: String, enclosure: String },
    FellSick { name: String },
    DiedOfDisease { name: String },
    DiedOfOldAge { name: String, species: Species, age: u32 },
    Cleaned { enclosure: String },
    ShopRefreshed,
}

/// Summary of one resolved day.
#[derive(Debug, Clone)]
pub struct DayReport {
    pub day: u32,
    pub wages: i64,
    /// Food eaten, or `None` if there was not enough and the animals went hungry.
    pub food_eaten: Option<u32>,
    /// Total dirtiness left after cleaning.
    pub dirtiness: i64,
    pub visitors: i32,
    /// Visitor income minus the dirtiness penalty.
    pub revenue: i64,
    /// Revenue minus wages.
    pub profit: i64,
    pub events: Vec<DayEvent>,
    pub outcome: GameOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Healing {
    pub vet: String,
    pub animal: String,
}

/// Result of a veterinary round.
#[derive(Debug, Clone, PartialEq)]
pub struct Treatment {
    pub healed: Vec<Healing>,
    /// Sick animals left untreated.
    pub remaining: usize,
}

/// The zoo: aggregate game state and the turn engine.
///
/// Player actions validate first and leave the zoo untouched when they
/// return an error. Randomness is always supplied by the caller.
pub struct Zoo {
    cfg: Config,

    pub name: String,
    pub day: u32,
    pub days_survived: u32,

    pub money: i64,
    pub food: u32,
    pub popularity: i32,
    pub visitors: i32,

    pub enclosures: Vec<Enclosure>,
    pub employees: Vec<Employee>,
    pub shop: Shop,

    pub bought_today: u32,
    pub delegation_satisfied: bool,

    profit_stats: RunningStats,
}

impl Zoo {
    /// Open a new zoo with the starting resources, a director and a stocked shop.
    pub fn new<R: Rng + ?Sized>(name: &str, cfg: Config, rng: &mut R) -> Self {
        let shop = Shop::generate(rng);
        Self {
            name: normalize_name(name),
            day: 0,
            days_survived: 0,
            money: cfg.start.money,
            food: cfg.start.food,
            popularity: cfg.start.popularity,
            visitors: 0,
            enclosures: Vec::new(),
            employees: vec![Employee::director()],
            shop,
            bought_today: 0,
            delegation_satisfied: false,
            profit_stats: RunningStats::new(),
            cfg,
        }
    }

    pub fn cfg(&self) -> &Config {
        &self.cfg
    }

    pub fn count_live_animals(&self) -> usize {
        self.enclosures.iter().map(Enclosure::live_count).sum()
    }

    pub fn count_sick_animals(&self) -> usize {
        self.enclosures.iter().map(Enclosure::sick_count).sum()
    }

    pub fn outcome(&self) -> GameOutcome {
        if self.money < 0 {
            GameOutcome::Bankrupt
        } else if self.day >= self.cfg.rules.win_day {
            GameOutcome::Won
        } else {
            GameOutcome::Ongoing
        }
    }

    pub fn profit_report(&self) -> StatsReport {
        self.profit_stats.report()
    }

    /// Resolve one full day.
    pub fn advance_day<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<DayReport> {
        let starve_dist = Bernoulli::new(self.cfg.rules.starvation_death_prob)
            .context("invalid starvation death probability")?;
        let sick_dist =
            Bernoulli::new(self.cfg.rules.sickness_prob).context("invalid sickness probability")?;
        let epidemic_dist = Bernoulli::new(self.cfg.rules.epidemic_death_prob)
            .context("invalid epidemic death probability")?;
        let popularity_dist = Uniform::new_inclusive(-10, 10)?;

        let mut events = Vec::new();

        self.day += 1;
        self.days_survived += 1;
        self.bought_today = 0;

        for employee in &mut self.employees {
            employee.fatigued = false;
        }

        let wages: i64 = self.employees.iter().map(|employee| employee.wage).sum();
        self.money -= wages;

        let n_live = self.count_live_animals();
        let n_sick = self.count_sick_animals();

        let food_eaten = self.feed_animals(n_live, &starve_dist, rng, &mut events);

        self.maintain_enclosures(&mut events);
        let dirtiness = self.clean_enclosures(&mut events);

        self.roll_sickness(&sick_dist, rng, &mut events);
        self.resolve_epidemics(&epidemic_dist, rng, &mut events);
        self.age_animals(rng, &mut events);
        self.update_happiness();

        self.visitors = 2 * self.popularity;
        let revenue = self.visitors as i64 * n_live as i64 - 2 * dirtiness;
        self.money += revenue;
        let profit = revenue - wages;
        self.profit_stats.add(profit);

        self.popularity = next_popularity(self.popularity, popularity_dist.sample(rng), n_sick);

        if self.shop.tick(rng) {
            events.push(DayEvent::ShopRefreshed);
        }

        self.update_delegation();

        let outcome = self.outcome();
        log::info!(
            "day {}: wages {wages}, revenue {revenue}, money {}, popularity {}, {outcome:?}",
            self.day,
            self.money,
            self.popularity
        );

        Ok(DayReport {
            day: self.day,
            wages,
            food_eaten,
            dirtiness,
            visitors: self.visitors,
            revenue,
            profit,
            events,
            outcome,
        })
    }

    fn feed_animals<R: Rng + ?Sized>(
        &mut self,
        n_live: usize,
        starve_dist: &Bernoulli,
        rng: &mut R,
        events: &mut Vec<DayEvent>,
    ) -> Option<u32> {
        let required = 2 * n_live as u32;
        let fed = self.food >= required;
        if fed {
            self.food -= required;
        }

        for animal in self.live_animals_mut() {
            animal.hungry = !fed;
            if !fed && starve_dist.sample(rng) {
                animal.health = Health::Dead;
                log::debug!("{} starved", animal.name);
                events.push(DayEvent::Starved {
                    name: animal.name.clone(),
                });
            }
        }

        fed.then_some(required)
    }

    fn maintain_enclosures(&mut self, events: &mut Vec<DayEvent>) {
        for enclosure in &mut self.enclosures {
            for name in enclosure.maintain() {
                log::debug!("{name} caught a disease in {}", enclosure.name);
                events.push(DayEvent::Infected {
                    name,
                    enclosure: enclosure.name.clone(),
                });
            }
        }
    }

    /// Cleaners are shared across enclosures in list order, one enclosure each.
    ///
    /// Returns the total dirtiness left after cleaning.
    fn clean_enclosures(&mut self, events: &mut Vec<DayEvent>) -> i64 {
        let mut n_cleaners = self
            .employees
            .iter()
            .filter(|employee| employee.role == Role::Cleaner)
            .count();

        let mut dirtiness = 0;
        for enclosure in &mut self.enclosures {
            if enclosure.needs_cleaning() && n_cleaners > 0 {
                enclosure.clean();
                n_cleaners -= 1;
                log::debug!("{} was cleaned", enclosure.name);
                events.push(DayEvent::Cleaned {
                    enclosure: enclosure.name.clone(),
                });
            }
            dirtiness += enclosure.dirtiness as i64;
        }
        dirtiness
    }

    fn roll_sickness<R: Rng + ?Sized>(
        &mut self,
        sick_dist: &Bernoulli,
        rng: &mut R,
        events: &mut Vec<DayEvent>,
    ) {
        for animal in self.live_animals_mut() {
            if animal.health == Health::Healthy && sick_dist.sample(rng) {
                animal.health = Health::Sick;
                log::debug!("{} fell sick", animal.name);
                events.push(DayEvent::FellSick {
                    name: animal.name.clone(),
                });
            }
        }
    }

    fn resolve_epidemics<R: Rng + ?Sized>(
        &mut self,
        epidemic_dist: &Bernoulli,
        rng: &mut R,
        events: &mut Vec<DayEvent>,
    ) {
        for enclosure in &mut self.enclosures {
            let n_live = enclosure.live_count();
            let n_sick = enclosure.sick_count();
            if n_sick <= n_live - n_sick {
                continue;
            }
            for animal in enclosure.animals.iter_mut().filter(|animal| animal.is_sick()) {
                if epidemic_dist.sample(rng) {
                    animal.health = Health::Dead;
                    log::debug!("{} died of disease in {}", animal.name, enclosure.name);
                    events.push(DayEvent::DiedOfDisease {
                        name: animal.name.clone(),
                    });
                }
            }
        }
    }

    fn age_animals<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<DayEvent>) {
        for animal in self.live_animals_mut() {
            animal.age += 1;
            if animal.age <= OLD_AGE {
                continue;
            }
            if rng.random_range(0..100) < old_age_death_chance(animal.age) {
                animal.health = Health::Dead;
                log::debug!("{} died of old age at {} days", animal.name, animal.age);
                events.push(DayEvent::DiedOfOldAge {
                    name: animal.name.clone(),
                    species: animal.species,
                    age: animal.age,
                });
            }
        }
    }

    fn update_happiness(&mut self) {
        for enclosure in &mut self.enclosures {
            let dirty = enclosure.needs_cleaning();
            for animal in enclosure.animals.iter_mut().filter(|animal| animal.is_alive()) {
                animal.update_happiness(dirty);
            }
        }
    }

    fn live_animals_mut(&mut self) -> impl Iterator<Item = &mut Animal> {
        self.enclosures
            .iter_mut()
            .flat_map(|enclosure| enclosure.animals.iter_mut())
            .filter(|animal| animal.is_alive())
    }

    /// Take dead animals out of their enclosures.
    pub fn remove_dead(&mut self) -> Vec<Animal> {
        let mut removed = Vec::new();
        for enclosure in &mut self.enclosures {
            let (dead, alive): (Vec<_>, Vec<_>) = enclosure
                .animals
                .drain(..)
                .partition(|animal| !animal.is_alive());
            enclosure.animals = alive;
            removed.extend(dead);
        }
        self.update_delegation();
        removed
    }

    fn enclosure(&self, index: usize) -> Result<&Enclosure, ZooError> {
        self.enclosures.get(index).ok_or(ZooError::InvalidIndex {
            what: "enclosure",
            index,
        })
    }

    fn check_funds(&self, needed: i64) -> Result<(), ZooError> {
        if self.money < needed {
            return Err(ZooError::InsufficientFunds {
                needed,
                available: self.money,
            });
        }
        Ok(())
    }

    /// Buy a shop offer and place it in an enclosure.
    pub fn buy_animal(&mut self, offer_idx: usize, enclosure_idx: usize) -> Result<(), ZooError> {
        let rules = &self.cfg.rules;
        if self.days_survived >= rules.purchase_limit_day && self.bought_today >= rules.animals_per_day
        {
            return Err(ZooError::DailyPurchaseLimit(rules.animals_per_day));
        }

        let offer = self.shop.offers.get(offer_idx).ok_or(ZooError::InvalidIndex {
            what: "animal",
            index: offer_idx,
        })?;
        self.check_funds(offer.price)?;
        if self.food < 1 {
            return Err(ZooError::InsufficientFood {
                needed: 1,
                available: self.food,
            });
        }
        let enclosure = self.enclosure(enclosure_idx)?;
        if enclosure.is_full() {
            return Err(ZooError::EnclosureFull {
                capacity: enclosure.capacity,
            });
        }
        enclosure.check_residency(offer)?;
        enclosure.check_admission(offer)?;

        let animal = self.shop.offers.remove(offer_idx);
        self.money -= animal.price;
        self.food -= 1;
        self.bought_today += 1;
        log::info!("bought {} for {}", animal.name, animal.price);
        self.enclosures[enclosure_idx].animals.push(animal);

        self.update_delegation();
        Ok(())
    }

    /// Sell an animal for half its price.
    ///
    /// Returns the animal and the amount received.
    pub fn sell_animal(
        &mut self,
        enclosure_idx: usize,
        animal_idx: usize,
    ) -> Result<(Animal, i64), ZooError> {
        let enclosure = self.enclosure(enclosure_idx)?;
        if animal_idx >= enclosure.animals.len() {
            return Err(ZooError::InvalidIndex {
                what: "animal",
                index: animal_idx,
            });
        }

        let animal = self.enclosures[enclosure_idx].animals.remove(animal_idx);
        let payout = animal.price / 2;
        self.money += payout;
        log::info!("sold {} for {payout}", animal.name);

        self.update_delegation();
        Ok((animal, payout))
    }

    pub fn move_animal(
        &mut self,
        src_idx: usize,
        animal_idx: usize,
        dst_idx: usize,
    ) -> Result<(), ZooError> {
        let src = self.enclosure(src_idx)?;
        let animal = src.animals.get(animal_idx).ok_or(ZooError::InvalidIndex {
            what: "animal",
            index: animal_idx,
        })?;
        let dst = self.enclosure(dst_idx)?;
        if src_idx == dst_idx {
            return Err(ZooError::SameEnclosure);
        }
        if dst.is_full() {
            return Err(ZooError::EnclosureFull {
                capacity: dst.capacity,
            });
        }
        dst.check_residency(animal)?;
        dst.check_admission(animal)?;

        let animal = self.enclosures[src_idx].animals.remove(animal_idx);
        self.enclosures[dst_idx].animals.push(animal);

        self.update_delegation();
        Ok(())
    }

    /// Rename an animal, returning its previous name.
    pub fn rename_animal(
        &mut self,
        enclosure_idx: usize,
        animal_idx: usize,
        new_name: &str,
    ) -> Result<String, ZooError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ZooError::EmptyName);
        }
        self.enclosure(enclosure_idx)?;
        let animal = self.enclosures[enclosure_idx]
            .animals
            .get_mut(animal_idx)
            .ok_or(ZooError::InvalidIndex {
                what: "animal",
                index: animal_idx,
            })?;
        Ok(std::mem::replace(&mut animal.name, new_name.to_string()))
    }

    /// Breed two animals of one enclosure and house the offspring there.
    pub fn breed_animals<R: Rng + ?Sized>(
        &mut self,
        enclosure_idx: usize,
        first_idx: usize,
        second_idx: usize,
        rng: &mut R,
    ) -> Result<&Animal, ZooError> {
        let enclosure = self.enclosure(enclosure_idx)?;
        if enclosure.animals.len() < 2 {
            return Err(ZooError::TooFewAnimals { needed: 2 });
        }
        if enclosure.breeding {
            if let Some(species) = enclosure.locked_species {
                if enclosure.animals.iter().any(|animal| animal.species != species) {
                    return Err(ZooError::SpeciesLocked(species));
                }
            }
        }

        let invalid = |index| ZooError::InvalidIndex {
            what: "animal",
            index,
        };
        let first = enclosure.animals.get(first_idx).ok_or(invalid(first_idx))?;
        let second = enclosure.animals.get(second_idx).ok_or(invalid(second_idx))?;
        if first_idx == second_idx {
            return Err(ZooError::SelfBreeding);
        }
        if first.species != second.species {
            return Err(ZooError::SpeciesMismatch);
        }

        let offspring = first.breed(second, rng)?;
        if enclosure.is_full() {
            return Err(ZooError::EnclosureFull {
                capacity: enclosure.capacity,
            });
        }

        log::info!("{} was born", offspring.name);
        let enclosure = &mut self.enclosures[enclosure_idx];
        enclosure.add_animal(offspring)?;
        let newest = enclosure.animals.len() - 1;
        Ok(&enclosure.animals[newest])
    }

    /// Send every rested veterinarian to treat sick animals in storage order.
    pub fn treat_sick_animals(&mut self) -> Treatment {
        let mut treatment = Treatment {
            healed: Vec::new(),
            remaining: self.count_sick_animals(),
        };

        let vets = self
            .employees
            .iter_mut()
            .filter(|employee| employee.role == Role::Veterinarian && !employee.fatigued);
        for vet in vets {
            if treatment.remaining == 0 {
                break;
            }
            if treatment.remaining >= VET_CAPACITY {
                vet.fatigued = true;
            }

            let sick = self
                .enclosures
                .iter_mut()
                .flat_map(|enclosure| enclosure.animals.iter_mut())
                .filter(|animal| animal.is_sick())
                .take(VET_CAPACITY);
            for animal in sick {
                animal.health = Health::Healthy;
                treatment.healed.push(Healing {
                    vet: vet.name.clone(),
                    animal: animal.name.clone(),
                });
                treatment.remaining -= 1;
            }
        }

        treatment
    }

    /// Restock the shop immediately for a fee.
    pub fn refresh_shop<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), ZooError> {
        let cost = self.cfg.prices.shop_refresh;
        self.check_funds(cost)?;
        self.money -= cost;
        self.shop.refresh(rng);
        Ok(())
    }

    /// Buy food, returning the amount paid.
    pub fn buy_food(&mut self, amount: u32) -> Result<i64, ZooError> {
        if amount == 0 {
            return Err(ZooError::NonPositiveAmount);
        }
        let cost = amount as i64 * self.cfg.prices.food;
        self.check_funds(cost)?;
        self.money -= cost;
        self.food += amount;
        Ok(cost)
    }

    pub fn advertise(&mut self) -> Result<(), ZooError> {
        let cost = self.cfg.prices.advertisement;
        self.check_funds(cost)?;
        self.money -= cost;
        self.popularity = (self.popularity + self.cfg.rules.advertisement_popularity).min(MAX_POPULARITY);
        self.visitors += self.cfg.rules.advertisement_visitors;
        Ok(())
    }

    /// Build a standard enclosure; whether it is predator-only depends on luck.
    pub fn build_enclosure<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        kind: AnimalKind,
        climate: Climate,
        rng: &mut R,
    ) -> Result<&Enclosure, ZooError> {
        let cost = self.cfg.prices.enclosure;
        self.check_funds(cost)?;
        let name = checked_name(name)?;

        let predator_only = rng.random_bool(kind.predator_enclosure_odds());
        self.money -= cost;
        self.push_enclosure(Enclosure::new_standard(name, kind, climate, predator_only))
    }

    /// Build a breeding enclosure reserved for one species.
    pub fn build_breeding_enclosure(
        &mut self,
        name: &str,
        species: Species,
        climate: Climate,
    ) -> Result<&Enclosure, ZooError> {
        let cost = self.cfg.prices.breeding_enclosure;
        self.check_funds(cost)?;
        let name = checked_name(name)?;

        self.money -= cost;
        self.push_enclosure(Enclosure::new_breeding(name, species, climate))
    }

    fn push_enclosure(&mut self, enclosure: Enclosure) -> Result<&Enclosure, ZooError> {
        log::info!("built enclosure {}", enclosure.name);
        self.enclosures.push(enclosure);
        self.update_delegation();
        let index = self.enclosures.len() - 1;
        self.enclosure(index)
    }

    pub fn upgrade_enclosure(&mut self, index: usize) -> Result<&Enclosure, ZooError> {
        let enclosure = self.enclosure(index)?;
        if enclosure.level >= MAX_LEVEL {
            return Err(ZooError::MaxLevel);
        }
        let cost = enclosure.upgrade_cost();
        self.check_funds(cost)?;

        self.money -= cost;
        let enclosure = &mut self.enclosures[index];
        enclosure.capacity += enclosure.capacity_step();
        enclosure.upkeep += 20;
        enclosure.level += 1;
        Ok(enclosure)
    }

    /// Sell an empty enclosure, returning it and the amount received.
    pub fn sell_enclosure(&mut self, index: usize) -> Result<(Enclosure, i64), ZooError> {
        let enclosure = self.enclosure(index)?;
        if !enclosure.animals.is_empty() {
            return Err(ZooError::EnclosureNotEmpty(enclosure.animals.len()));
        }

        let enclosure = self.enclosures.remove(index);
        let payout = enclosure.sale_price();
        self.money += payout;
        self.update_delegation();
        Ok((enclosure, payout))
    }

    pub fn hire<R: Rng + ?Sized>(&mut self, role: Role, rng: &mut R) -> Result<&Employee, ZooError> {
        let max_employees = self.cfg.rules.max_employees;
        if self.employees.len() >= max_employees {
            return Err(ZooError::StaffLimit(max_employees));
        }
        self.employees.push(Employee::candidate(role, rng)?);
        let index = self.employees.len() - 1;
        Ok(&self.employees[index])
    }

    pub fn fire(&mut self, index: usize) -> Result<Employee, ZooError> {
        if index >= self.employees.len() {
            return Err(ZooError::InvalidIndex {
                what: "employee",
                index,
            });
        }
        Ok(self.employees.remove(index))
    }

    /// Re-evaluate whether the visiting delegation is happy with the marine exhibits.
    fn update_delegation(&mut self) {
        let has_marine_enclosure = self
            .enclosures
            .iter()
            .any(|enclosure| enclosure.kind == AnimalKind::Marine);
        let has_marine_animals = self
            .enclosures
            .iter()
            .flat_map(|enclosure| enclosure.animals.iter())
            .any(|animal| animal.is_alive() && animal.kind() == AnimalKind::Marine);
        self.delegation_satisfied = has_marine_enclosure && has_marine_animals;
    }
}

/// Popularity after the daily random swing and the penalty for animals sick
/// at the start of the day.
fn next_popularity(popularity: i32, swing: i32, n_sick: usize) -> i32 {
    let n_sick = i32::try_from(n_sick).unwrap_or(i32::MAX);
    popularity
        .saturating_add(swing)
        .saturating_sub(n_sick)
        .clamp(MIN_POPULARITY, MAX_POPULARITY)
}

/// Percent chance that an animal of this age dies of old age today.
fn old_age_death_chance(age: u32) -> u32 {
    (age.saturating_sub(OLD_AGE) / 10).min(99)
}

fn checked_name(name: &str) -> Result<String, ZooError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ZooError::EmptyName);
    }
    Ok(name.to_string())
}

/// Collapse runs of whitespace; blank names fall back to "My Zoo".
pub fn normalize_name(raw: &str) -> String {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        "My Zoo".to_string()
    } else {
        name
    }
}

impl fmt::Display for DayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayEvent::Starved { name } => write!(f, "{name} starved to death"),
            DayEvent::Infected { name, enclosure } => {
                write!(f, "{name} caught a disease in {enclosure}")
            }
            DayEvent::FellSick { name } => write!(f, "{name} fell sick"),
            DayEvent::DiedOfDisease { name } => write!(f, "{name} died of disease"),
            DayEvent::DiedOfOldAge { name, species, age } => {
                write!(f, "{name} ({species}) died of old age at {age} days")
            }
            DayEvent::Cleaned { enclosure } => write!(f, "{enclosure} was cleaned"),
            DayEvent::ShopRefreshed => write!(f, "the animal shop has new stock"),
        }
    }
}
