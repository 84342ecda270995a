//! Static animal catalogue: kinds, species, diets and climates.

use std::fmt;

/// Broad animal category an enclosure is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimalKind {
    Feline,
    Canine,
    Bird,
    Reptile,
    Marine,
}

/// Specific species; each belongs to exactly one [`AnimalKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Lion,
    Tiger,
    Leopard,
    Lynx,
    Cheetah,

    Dog,
    Wolf,
    Fox,
    Jackal,
    Hyena,

    Eagle,
    Parrot,
    Penguin,
    Owl,
    Flamingo,

    Snake,
    Turtle,
    Lizard,
    Crocodile,
    Dinosaur,

    Dolphin,
    Shark,
    Mollusk,
    Octopus,
    Whale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diet {
    Predator,
    Herbivore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Climate {
    Continental,
    Tropic,
    Arctic,
}

impl AnimalKind {
    pub const ALL: [AnimalKind; 5] = [
        AnimalKind::Feline,
        AnimalKind::Canine,
        AnimalKind::Bird,
        AnimalKind::Reptile,
        AnimalKind::Marine,
    ];

    pub fn species(self) -> [Species; 5] {
        use Species::*;
        match self {
            AnimalKind::Feline => [Lion, Tiger, Leopard, Lynx, Cheetah],
            AnimalKind::Canine => [Dog, Wolf, Fox, Jackal, Hyena],
            AnimalKind::Bird => [Eagle, Parrot, Penguin, Owl, Flamingo],
            AnimalKind::Reptile => [Snake, Turtle, Lizard, Crocodile, Dinosaur],
            AnimalKind::Marine => [Dolphin, Shark, Mollusk, Octopus, Whale],
        }
    }

    /// Stems used to name shop animals of this kind.
    pub fn name_stems(self) -> [&'static str; 5] {
        match self {
            AnimalKind::Feline => ["Ginger", "Stripes", "Spots", "Mane", "Claw"],
            AnimalKind::Canine => ["Buddy", "Rusty", "Rex", "Lord", "Scout"],
            AnimalKind::Bird => ["Wing", "Beak", "Feather", "Talon", "Chirp"],
            AnimalKind::Reptile => ["Spike", "Scale", "Slither", "Fang", "Tail"],
            AnimalKind::Marine => ["Wave", "Fin", "Bubble", "Shell", "Pearl"],
        }
    }

    /// Chance that a standard enclosure built for this kind is predator-only.
    pub fn predator_enclosure_odds(self) -> f64 {
        match self {
            AnimalKind::Feline => 1.0,
            AnimalKind::Canine => 0.8,
            AnimalKind::Bird => 1.0 / 3.0,
            AnimalKind::Reptile => 0.5,
            AnimalKind::Marine => 2.0 / 3.0,
        }
    }
}

impl Species {
    pub fn kind(self) -> AnimalKind {
        use Species::*;
        match self {
            Lion | Tiger | Leopard | Lynx | Cheetah => AnimalKind::Feline,
            Dog | Wolf | Fox | Jackal | Hyena => AnimalKind::Canine,
            Eagle | Parrot | Penguin | Owl | Flamingo => AnimalKind::Bird,
            Snake | Turtle | Lizard | Crocodile | Dinosaur => AnimalKind::Reptile,
            Dolphin | Shark | Mollusk | Octopus | Whale => AnimalKind::Marine,
        }
    }

    pub fn is_predator(self) -> bool {
        use Species::*;
        matches!(
            self,
            Lion | Tiger
                | Leopard
                | Lynx
                | Cheetah
                | Wolf
                | Fox
                | Jackal
                | Hyena
                | Eagle
                | Owl
                | Penguin
                | Snake
                | Crocodile
                | Dinosaur
                | Shark
                | Octopus
                | Dolphin
        )
    }

    pub fn diet(self) -> Diet {
        if self.is_predator() {
            Diet::Predator
        } else {
            Diet::Herbivore
        }
    }
}

impl Climate {
    pub const ALL: [Climate; 3] = [Climate::Tropic, Climate::Continental, Climate::Arctic];
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnimalKind::Feline => "Felines",
            AnimalKind::Canine => "Canines",
            AnimalKind::Bird => "Birds",
            AnimalKind::Reptile => "Reptiles",
            AnimalKind::Marine => "Marine",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Diet::Predator => "predator",
            Diet::Herbivore => "herbivore",
        })
    }
}

impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Climate::Continental => "Continental",
            Climate::Tropic => "Tropic",
            Climate::Arctic => "Arctic",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_species_maps_back_to_its_kind() {
        for kind in AnimalKind::ALL {
            for species in kind.species() {
                assert_eq!(species.kind(), kind, "{species}");
            }
        }
    }

    #[test]
    fn predator_lookup_is_fixed() {
        assert!(Species::Lion.is_predator());
        assert!(!Species::Dog.is_predator());
        assert!(Species::Penguin.is_predator());
        assert!(!Species::Parrot.is_predator());
        assert!(!Species::Whale.is_predator());
        assert_eq!(Species::Turtle.diet(), Diet::Herbivore);
        assert_eq!(Species::Shark.diet(), Diet::Predator);
    }
}
