use crate::error::ZooError;
use crate::shop::price;
use crate::species::{AnimalKind, Climate, Diet, Species};
use rand::Rng;
use std::fmt;

/// Dirtiness above which an enclosure needs cleaning.
pub const CLEANING_THRESHOLD: u32 = 5;
/// Dirt added to every enclosure each day.
pub const DAILY_DIRT: u32 = 2;
/// Healthy animals a sick one can infect per enclosure per day.
pub const SPREAD_PER_DAY: usize = 2;
/// Animals must be older than this, in days, to breed.
pub const BREEDING_AGE: u32 = 5;
/// Highest enclosure upgrade level.
pub const MAX_LEVEL: u8 = 5;

const OFFSPRING_PREFIXES: [&str; 5] = ["Baby", "Tiny", "Kiddo", "Little", "Sprout"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Healthy,
    Sick,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

/// A single animal, either bought from the shop or born in the zoo.
#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    pub name: String,
    pub species: Species,
    /// Age in days.
    pub age: u32,
    /// Weight in kg.
    pub weight: u32,
    pub gender: Gender,
    pub climate: Climate,
    pub health: Health,
    /// Happiness in `0..=100`.
    pub happiness: u8,
    pub hungry: bool,
    pub unhappy: bool,
    pub price: i64,
    /// Snapshots of both parents, present only for animals born in the zoo.
    pub lineage: Option<Box<Lineage>>,
}

/// Parents of an animal, owned by value at the moment of birth.
#[derive(Debug, Clone, PartialEq)]
pub struct Lineage {
    pub first: Animal,
    pub second: Animal,
}

impl Animal {
    pub fn kind(&self) -> AnimalKind {
        self.species.kind()
    }

    pub fn diet(&self) -> Diet {
        self.species.diet()
    }

    pub fn is_predator(&self) -> bool {
        self.species.is_predator()
    }

    pub fn is_alive(&self) -> bool {
        self.health != Health::Dead
    }

    pub fn is_sick(&self) -> bool {
        self.health == Health::Sick
    }

    /// Breed `self` with `other`, producing an offspring.
    ///
    /// The offspring copies climate and species from `self`; its weight is a
    /// quarter of the parents' combined weight.
    pub fn breed<R: Rng + ?Sized>(&self, other: &Animal, rng: &mut R) -> Result<Animal, ZooError> {
        if self.gender == other.gender {
            return Err(ZooError::SameGender);
        }
        for parent in [self, other] {
            if parent.age <= BREEDING_AGE {
                return Err(ZooError::TooYoung {
                    name: parent.name.clone(),
                });
            }
        }

        let weight = (self.weight + other.weight) / 4;
        let prefix = OFFSPRING_PREFIXES[rng.random_range(0..OFFSPRING_PREFIXES.len())];

        Ok(Animal {
            name: format!("{prefix} {} and {}", self.name, other.name),
            species: self.species,
            age: 0,
            weight,
            gender: Gender::random(rng),
            climate: self.climate,
            health: Health::Healthy,
            happiness: 100,
            hungry: false,
            unhappy: false,
            price: price(0, weight),
            lineage: Some(Box::new(Lineage {
                first: self.clone(),
                second: other.clone(),
            })),
        })
    }

    /// Adjust happiness for one day spent in an enclosure.
    pub fn update_happiness(&mut self, dirty_enclosure: bool) {
        let mut happiness = self.happiness as i32;
        if self.hungry {
            happiness -= 15;
        }
        if self.is_sick() {
            happiness -= 20;
        }
        if dirty_enclosure {
            happiness -= 10;
        }
        if !self.hungry && !self.is_sick() && !dirty_enclosure {
            happiness += 5;
        }
        self.happiness = happiness.clamp(0, 100) as u8;
        self.unhappy = self.happiness < 50;
    }
}

/// Pen holding animals of one kind and climate.
#[derive(Debug, Clone)]
pub struct Enclosure {
    pub name: String,
    pub kind: AnimalKind,
    /// Only this species may enter, when set.
    pub locked_species: Option<Species>,
    pub climate: Climate,
    pub capacity: usize,
    pub predator_only: bool,
    pub breeding: bool,
    pub level: u8,
    /// Informational daily running cost.
    pub upkeep: i64,
    pub dirtiness: u32,
    pub animals: Vec<Animal>,
}

impl Enclosure {
    pub fn new_standard(name: String, kind: AnimalKind, climate: Climate, predator_only: bool) -> Self {
        Self {
            name,
            kind,
            locked_species: None,
            climate,
            capacity: 2,
            predator_only,
            breeding: false,
            level: 1,
            upkeep: 50,
            dirtiness: 0,
            animals: Vec::new(),
        }
    }

    pub fn new_breeding(name: String, species: Species, climate: Climate) -> Self {
        Self {
            name,
            kind: species.kind(),
            locked_species: Some(species),
            climate,
            capacity: 3,
            predator_only: species.is_predator(),
            breeding: true,
            level: 1,
            upkeep: 80,
            dirtiness: 0,
            animals: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.animals.len() >= self.capacity
    }

    /// Minimal admission contract: free space, matching diet and climate.
    pub fn check_admission(&self, animal: &Animal) -> Result<(), ZooError> {
        if self.is_full() {
            return Err(ZooError::EnclosureFull {
                capacity: self.capacity,
            });
        }
        if let Some(first) = self.animals.first() {
            if first.diet() != animal.diet() {
                return Err(ZooError::DietMismatch {
                    expected: first.diet(),
                    found: animal.diet(),
                });
            }
        }
        if animal.climate != self.climate {
            return Err(ZooError::ClimateMismatch {
                expected: self.climate,
                found: animal.climate,
            });
        }
        Ok(())
    }

    pub fn add_animal(&mut self, animal: Animal) -> Result<(), ZooError> {
        self.check_admission(&animal)?;
        self.animals.push(animal);
        Ok(())
    }

    /// Checks applied by player actions on top of [`Enclosure::check_admission`]:
    /// animal kind, species lock and predator flag.
    pub fn check_residency(&self, animal: &Animal) -> Result<(), ZooError> {
        if animal.kind() != self.kind {
            return Err(ZooError::KindMismatch {
                expected: self.kind,
                found: animal.kind(),
            });
        }
        if let Some(species) = self.locked_species {
            if species != animal.species {
                return Err(ZooError::SpeciesLocked(species));
            }
        }
        if animal.is_predator() != self.predator_only {
            return Err(ZooError::PredatorMismatch {
                enclosure: if self.predator_only { "for predators" } else { "not for predators" },
                animal: if animal.is_predator() { "a predator" } else { "not a predator" },
            });
        }
        Ok(())
    }

    pub fn live_count(&self) -> usize {
        self.animals.iter().filter(|animal| animal.is_alive()).count()
    }

    pub fn sick_count(&self) -> usize {
        self.animals.iter().filter(|animal| animal.is_sick()).count()
    }

    pub fn needs_cleaning(&self) -> bool {
        self.dirtiness > CLEANING_THRESHOLD
    }

    pub fn clean(&mut self) {
        self.dirtiness = 0;
    }

    /// Daily dirt build-up and disease spread.
    ///
    /// Returns the names of newly infected animals.
    pub fn maintain(&mut self) -> Vec<String> {
        self.dirtiness += DAILY_DIRT;

        if self.sick_count() == 0 {
            return Vec::new();
        }
        self.animals
            .iter_mut()
            .filter(|animal| animal.health == Health::Healthy)
            .take(SPREAD_PER_DAY)
            .map(|animal| {
                animal.health = Health::Sick;
                animal.name.clone()
            })
            .collect()
    }

    pub fn upgrade_cost(&self) -> i64 {
        200 * self.level as i64
    }

    pub fn capacity_step(&self) -> usize {
        if self.breeding { 3 } else { 2 }
    }

    pub fn sale_price(&self) -> i64 {
        let mut sale_price = 300 + (self.level as i64 - 1) * 100;
        if self.breeding {
            sale_price += 200;
        }
        sale_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Director,
    Veterinarian,
    Cleaner,
    Caretaker,
}

impl Role {
    pub const HIRABLE: [Role; 3] = [Role::Veterinarian, Role::Cleaner, Role::Caretaker];

    /// Inclusive wage and efficiency ranges offered when hiring.
    ///
    /// `None` for the director, who cannot be hired.
    fn hiring_ranges(self) -> Option<((i64, i64), (u8, u8))> {
        match self {
            Role::Director => None,
            Role::Veterinarian => Some(((60, 100), (50, 100))),
            Role::Cleaner => Some(((40, 70), (70, 100))),
            Role::Caretaker => Some(((50, 100), (60, 100))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub name: String,
    pub role: Role,
    pub wage: i64,
    pub efficiency: u8,
    /// Set when the employee has done their share of work today.
    pub fatigued: bool,
}

impl Employee {
    pub fn director() -> Self {
        Self {
            name: "Director Egor".to_string(),
            role: Role::Director,
            wage: 100,
            efficiency: 100,
            fatigued: false,
        }
    }

    /// Generate a candidate for the given role with a random name, wage and efficiency.
    pub fn candidate<R: Rng + ?Sized>(role: Role, rng: &mut R) -> Result<Self, ZooError> {
        const NAMES: [&str; 9] = [
            "Anna", "Boris", "Victoria", "Gleb", "Daria", "Egor", "Jeanne", "Irina", "Konstantin",
        ];
        let ((wage_lo, wage_hi), (eff_lo, eff_hi)) =
            role.hiring_ranges().ok_or(ZooError::NotHirable(role))?;
        Ok(Self {
            name: NAMES[rng.random_range(0..NAMES.len())].to_string(),
            role,
            wage: rng.random_range(wage_lo..=wage_hi),
            efficiency: rng.random_range(eff_lo..=eff_hi),
            fatigued: false,
        })
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Health::Healthy => "healthy",
            Health::Sick => "sick",
            Health::Dead => "dead",
        })
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "M",
            Gender::Female => "F",
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Director => "Director",
            Role::Veterinarian => "Veterinarian",
            Role::Cleaner => "Cleaner",
            Role::Caretaker => "Caretaker",
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    pub(crate) fn animal(name: &str, species: Species, climate: Climate) -> Animal {
        Animal {
            name: name.to_string(),
            species,
            age: 100,
            weight: 200,
            gender: Gender::Male,
            climate,
            health: Health::Healthy,
            happiness: 80,
            hungry: false,
            unhappy: false,
            price: price(100, 200),
            lineage: None,
        }
    }

    fn pair() -> (Animal, Animal) {
        let father = animal("Leo", Species::Lion, Climate::Tropic);
        let mut mother = animal("Nala", Species::Lion, Climate::Tropic);
        mother.gender = Gender::Female;
        mother.weight = 120;
        (father, mother)
    }

    #[test]
    fn admission_checks_capacity_diet_and_climate() {
        let mut enc = Enclosure::new_standard("Savanna".into(), AnimalKind::Bird, Climate::Tropic, false);
        enc.add_animal(animal("Polly", Species::Parrot, Climate::Tropic))
            .expect("empty enclosure admits a matching animal");

        let predator = animal("Hoot", Species::Owl, Climate::Tropic);
        assert!(matches!(
            enc.add_animal(predator),
            Err(ZooError::DietMismatch {
                expected: Diet::Herbivore,
                found: Diet::Predator
            })
        ));

        let cold = animal("Pinky", Species::Flamingo, Climate::Arctic);
        assert!(matches!(
            enc.add_animal(cold),
            Err(ZooError::ClimateMismatch { .. })
        ));

        enc.add_animal(animal("Pinky", Species::Flamingo, Climate::Tropic))
            .expect("second herbivore fits");
        assert_eq!(enc.animals.len(), 2);

        let extra = animal("Kiwi", Species::Parrot, Climate::Tropic);
        assert_eq!(
            enc.add_animal(extra),
            Err(ZooError::EnclosureFull { capacity: 2 })
        );
        assert_eq!(enc.animals.len(), 2);
    }

    #[test]
    fn residency_checks_kind_lock_and_predator_flag() {
        let enc = Enclosure::new_breeding("Pride".into(), Species::Lion, Climate::Tropic);
        assert!(enc.check_residency(&animal("Leo", Species::Lion, Climate::Tropic)).is_ok());
        assert_eq!(
            enc.check_residency(&animal("Stripe", Species::Tiger, Climate::Tropic)),
            Err(ZooError::SpeciesLocked(Species::Lion))
        );
        assert!(matches!(
            enc.check_residency(&animal("Rex", Species::Wolf, Climate::Tropic)),
            Err(ZooError::KindMismatch { .. })
        ));

        let kennel = Enclosure::new_standard("Kennel".into(), AnimalKind::Canine, Climate::Tropic, true);
        assert_eq!(
            kennel.check_residency(&animal("Buddy", Species::Dog, Climate::Tropic)),
            Err(ZooError::PredatorMismatch {
                enclosure: "for predators",
                animal: "not a predator",
            })
        );
    }

    #[test]
    fn breeding_produces_offspring_with_parent_snapshots() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let (mut father, mother) = pair();

        let cub = father.breed(&mother, &mut rng).expect("valid pair must breed");
        assert_eq!(cub.age, 0);
        assert_eq!(cub.weight, (200 + 120) / 4);
        assert_eq!(cub.happiness, 100);
        assert_eq!(cub.species, Species::Lion);
        assert_eq!(cub.climate, Climate::Tropic);
        assert!(cub.name.ends_with("Leo and Nala"), "{}", cub.name);
        assert!(cub.price >= 100);

        father.name = "Renamed".to_string();
        father.age = 999;
        let lineage = cub.lineage.as_ref().expect("born animals keep lineage");
        assert_eq!(lineage.first.name, "Leo");
        assert_eq!(lineage.first.age, 100);
        assert_eq!(lineage.second.name, "Nala");
    }

    #[test]
    fn breeding_rejects_same_gender() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let (father, _) = pair();
        let twin = father.clone();
        assert_eq!(father.breed(&twin, &mut rng), Err(ZooError::SameGender));
    }

    #[test]
    fn breeding_rejects_young_parents() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let (father, mut mother) = pair();
        mother.age = BREEDING_AGE;
        assert_eq!(
            father.breed(&mother, &mut rng),
            Err(ZooError::TooYoung {
                name: "Nala".to_string()
            })
        );

        let (mut father, mother) = pair();
        father.age = 0;
        assert!(matches!(
            father.breed(&mother, &mut rng),
            Err(ZooError::TooYoung { .. })
        ));
    }

    #[test]
    fn maintenance_spreads_to_at_most_two() {
        let mut enc = Enclosure::new_standard("Pond".into(), AnimalKind::Reptile, Climate::Tropic, false);
        enc.capacity = 6;
        for i in 0..5 {
            enc.animals.push(animal(&format!("Turtle {i}"), Species::Turtle, Climate::Tropic));
        }
        assert!(enc.maintain().is_empty());
        assert_eq!(enc.dirtiness, DAILY_DIRT);

        enc.animals[4].health = Health::Sick;
        let infected = enc.maintain();
        assert_eq!(infected, vec!["Turtle 0".to_string(), "Turtle 1".to_string()]);
        assert_eq!(enc.sick_count(), 3);
        assert_eq!(enc.dirtiness, 2 * DAILY_DIRT);
    }

    #[test]
    fn happiness_is_clamped_and_flags_unhappy() {
        let mut lion = animal("Leo", Species::Lion, Climate::Tropic);
        lion.happiness = 20;
        lion.hungry = true;
        lion.health = Health::Sick;
        lion.update_happiness(true);
        assert_eq!(lion.happiness, 0);
        assert!(lion.unhappy);

        lion.hungry = false;
        lion.health = Health::Healthy;
        lion.happiness = 98;
        lion.update_happiness(false);
        assert_eq!(lion.happiness, 100);
        assert!(!lion.unhappy);
    }

    #[test]
    fn candidates_come_from_hirable_roles_only() {
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        for role in Role::HIRABLE {
            let employee = Employee::candidate(role, &mut rng).expect("hirable role");
            assert_eq!(employee.role, role);
            assert!(!employee.fatigued);
        }
        let vet = Employee::candidate(Role::Veterinarian, &mut rng).expect("hirable role");
        assert!((60..=100).contains(&vet.wage));
        assert!((50..=100).contains(&vet.efficiency));

        assert_eq!(
            Employee::candidate(Role::Director, &mut rng),
            Err(ZooError::NotHirable(Role::Director))
        );
    }

    #[test]
    fn upgrade_and_sale_prices_scale_with_level() {
        let mut enc = Enclosure::new_breeding("Nest".into(), Species::Parrot, Climate::Tropic);
        assert_eq!(enc.upgrade_cost(), 200);
        assert_eq!(enc.capacity_step(), 3);
        assert_eq!(enc.sale_price(), 500);
        enc.level = 3;
        assert_eq!(enc.upgrade_cost(), 600);
        assert_eq!(enc.sale_price(), 700);

        let plain = Enclosure::new_standard("Yard".into(), AnimalKind::Canine, Climate::Arctic, false);
        assert_eq!(plain.capacity_step(), 2);
        assert_eq!(plain.sale_price(), 300);
    }
}
