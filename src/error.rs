use crate::model::Role;
use crate::species::{AnimalKind, Climate, Diet, Species};
use thiserror::Error;

/// Reasons a player action is rejected.
///
/// A rejected action leaves the zoo untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZooError {
    #[error("not enough money: {needed} needed, {available} available")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("not enough food: {needed} needed, {available} in stock")]
    InsufficientFood { needed: u32, available: u32 },

    #[error("there is no {what} number {}", .index.saturating_add(1))]
    /// `index` is zero-based and shown one-based.
    InvalidIndex { what: &'static str, index: usize },

    #[error("enclosure is full ({capacity} animals)")]
    EnclosureFull { capacity: usize },

    #[error("diet mismatch: enclosure holds {expected} animals, this one is a {found}")]
    DietMismatch { expected: Diet, found: Diet },

    #[error("climate mismatch: enclosure is {expected}, the animal needs {found}")]
    ClimateMismatch { expected: Climate, found: Climate },

    #[error("enclosure is built for {expected}, not {found}")]
    KindMismatch {
        expected: AnimalKind,
        found: AnimalKind,
    },

    #[error("enclosure is reserved for {0}")]
    SpeciesLocked(Species),

    #[error("enclosure is {enclosure}, the animal is {animal}")]
    PredatorMismatch {
        enclosure: &'static str,
        animal: &'static str,
    },

    #[error("parents must be of different genders")]
    SameGender,

    #[error("{name} is too young to breed (must be older than 5 days)")]
    TooYoung { name: String },

    #[error("parents must be of the same species")]
    SpeciesMismatch,

    #[error("an animal cannot breed with itself")]
    SelfBreeding,

    #[error("at least {needed} animals are required")]
    TooFewAnimals { needed: usize },

    #[error("enclosure still holds {0} animals")]
    EnclosureNotEmpty(usize),

    #[error("enclosure is already at the maximum level")]
    MaxLevel,

    #[error("a {0} cannot be hired")]
    NotHirable(Role),

    #[error("staff limit of {0} employees reached")]
    StaffLimit(usize),

    #[error("only {0} animal(s) may be bought per day at this stage")]
    DailyPurchaseLimit(u32),

    #[error("source and destination enclosures are the same")]
    SameEnclosure,

    #[error("name must not be empty")]
    EmptyName,

    #[error("amount must be positive")]
    NonPositiveAmount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_shown_one_based() {
        let error = ZooError::InvalidIndex {
            what: "enclosure",
            index: 0,
        };
        assert_eq!(error.to_string(), "there is no enclosure number 1");

        let error = ZooError::InvalidIndex {
            what: "animal",
            index: usize::MAX,
        };
        assert_eq!(error.to_string(), format!("there is no animal number {}", usize::MAX));
    }
}
