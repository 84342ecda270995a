//! Interactive console front end.
//!
//! The menu is a state machine over [`Screen`]s. Each screen lists a command
//! enumeration whose order defines the menu numbering; its handler performs
//! the command and returns the next screen.

use crate::config::Config;
use crate::engine::{DayReport, GameOutcome, Zoo};
use crate::error::ZooError;
use crate::model::{Animal, Employee, Enclosure, Role};
use crate::species::{AnimalKind, Climate};
use anyhow::{Context, Result, bail};
use rand::Rng;
use std::fmt::{self, Display};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Main,
    Animals,
    Shop,
    Purchases,
    Enclosures,
    Staff,
}

enum Flow {
    Goto(Screen),
    End(GameOutcome),
}

#[derive(Debug, Clone, Copy)]
enum MainCommand {
    Animals,
    Purchases,
    Enclosures,
    Staff,
    NextDay,
    Exit,
}

#[derive(Debug, Clone, Copy)]
enum AnimalCommand {
    Buy,
    Sell,
    List,
    Move,
    Shop,
    Rename,
    Breed,
    Inspect,
    Treat,
    Back,
}

#[derive(Debug, Clone, Copy)]
enum ShopCommand {
    Refresh,
    Back,
}

#[derive(Debug, Clone, Copy)]
enum PurchaseCommand {
    Food,
    Advertisement,
    Back,
}

#[derive(Debug, Clone, Copy)]
enum EnclosureCommand {
    Build,
    BuildBreeding,
    Upgrade,
    Sell,
    Inspect,
    Back,
}

#[derive(Debug, Clone, Copy)]
enum StaffCommand {
    Hire,
    List,
    Fire,
    Back,
}

impl MainCommand {
    const ALL: [Self; 6] = [
        Self::Animals,
        Self::Purchases,
        Self::Enclosures,
        Self::Staff,
        Self::NextDay,
        Self::Exit,
    ];
}

impl AnimalCommand {
    const ALL: [Self; 10] = [
        Self::Buy,
        Self::Sell,
        Self::List,
        Self::Move,
        Self::Shop,
        Self::Rename,
        Self::Breed,
        Self::Inspect,
        Self::Treat,
        Self::Back,
    ];
}

impl ShopCommand {
    const ALL: [Self; 2] = [Self::Refresh, Self::Back];
}

impl PurchaseCommand {
    const ALL: [Self; 3] = [Self::Food, Self::Advertisement, Self::Back];
}

impl EnclosureCommand {
    const ALL: [Self; 6] = [
        Self::Build,
        Self::BuildBreeding,
        Self::Upgrade,
        Self::Sell,
        Self::Inspect,
        Self::Back,
    ];
}

impl StaffCommand {
    const ALL: [Self; 4] = [Self::Hire, Self::List, Self::Fire, Self::Back];
}

/// Line-based prompt/answer channel.
struct Console<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Console<I, O> {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        let n_bytes = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if n_bytes == 0 {
            bail!("input closed");
        }
        Ok(line.trim().to_string())
    }

    /// Read an integer, asking again until the answer parses.
    fn read_int(&mut self, prompt: &str) -> Result<i64> {
        loop {
            let line = self.read_line(prompt)?;
            match line.parse() {
                Ok(num) => return Ok(num),
                Err(_) => writeln!(self.output, "Please enter a number.")?,
            }
        }
    }

    /// Read a one-based item number and return the zero-based index.
    fn read_index(&mut self, prompt: &str) -> Result<usize> {
        loop {
            let num = self.read_int(prompt)?;
            match usize::try_from(num).ok().and_then(|num| num.checked_sub(1)) {
                Some(index) => return Ok(index),
                None => writeln!(self.output, "Please enter a number of 1 or more.")?,
            }
        }
    }

    /// Show a numbered list and return the chosen item.
    fn pick<T: Display + Copy>(&mut self, title: &str, items: &[T]) -> Result<T> {
        writeln!(self.output, "{title}")?;
        for (i, item) in items.iter().enumerate() {
            writeln!(self.output, "{}. {item}", i + 1)?;
        }
        loop {
            let num = self.read_int("> ")?;
            let chosen = usize::try_from(num)
                .ok()
                .and_then(|num| num.checked_sub(1))
                .and_then(|idx| items.get(idx));
            match chosen {
                Some(item) => return Ok(*item),
                None => writeln!(
                    self.output,
                    "Choose a number between 1 and {}.",
                    items.len()
                )?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.read_int(&format!("{question} (1 - yes, 2 - no): "))?;
        Ok(answer == 1)
    }
}

/// Interactive session driving one [`Zoo`].
pub struct Menu<I, O, R> {
    console: Console<I, O>,
    zoo: Zoo,
    rng: R,
}

impl<I: BufRead, O: Write, R: Rng> Menu<I, O, R> {
    /// Open a zoo, asking for its name when none is given.
    pub fn open(cfg: Config, name: Option<String>, input: I, output: O, mut rng: R) -> Result<Self> {
        let mut console = Console { input, output };
        let name = match name {
            Some(name) => name,
            None => console.read_line("Name your zoo: ")?,
        };
        let zoo = Zoo::new(&name, cfg, &mut rng);
        log::info!("opened {}", zoo.name);
        Ok(Self { console, zoo, rng })
    }

    /// Run until the game ends or the player exits.
    pub fn run(&mut self) -> Result<GameOutcome> {
        writeln!(
            self.console.output,
            "Welcome to {}! Keep it open for {} days without going broke.",
            self.zoo.name,
            self.zoo.cfg().rules.win_day
        )?;
        writeln!(
            self.console.output,
            "A foreign delegation is visiting: they hope to see marine animals in a marine enclosure."
        )?;

        let mut screen = Screen::Main;
        let outcome = loop {
            let satisfied = self.zoo.delegation_satisfied;
            let flow = match screen {
                Screen::Main => self.main_screen()?,
                Screen::Animals => self.animal_screen()?,
                Screen::Shop => self.shop_screen()?,
                Screen::Purchases => self.purchase_screen()?,
                Screen::Enclosures => self.enclosure_screen()?,
                Screen::Staff => self.staff_screen()?,
            };
            self.announce_delegation(satisfied)?;
            match flow {
                Flow::Goto(next) => screen = next,
                Flow::End(outcome) => break outcome,
            }
        };

        self.print_outcome(outcome)?;
        Ok(outcome)
    }

    fn announce_delegation(&mut self, was_satisfied: bool) -> Result<()> {
        let out = &mut self.console.output;
        match (was_satisfied, self.zoo.delegation_satisfied) {
            (false, true) => writeln!(out, "The delegation is delighted with your marine exhibit!")?,
            (true, false) => writeln!(out, "The delegation is disappointed: your marine exhibit is gone.")?,
            _ => {}
        }
        Ok(())
    }

    fn main_screen(&mut self) -> Result<Flow> {
        self.print_status()?;
        let command = self.console.pick("What would you like to do?", &MainCommand::ALL)?;
        let flow = match command {
            MainCommand::Animals => Flow::Goto(Screen::Animals),
            MainCommand::Purchases => Flow::Goto(Screen::Purchases),
            MainCommand::Enclosures => Flow::Goto(Screen::Enclosures),
            MainCommand::Staff => Flow::Goto(Screen::Staff),
            MainCommand::NextDay => self.next_day()?,
            MainCommand::Exit => Flow::End(GameOutcome::Ongoing),
        };
        Ok(flow)
    }

    fn next_day(&mut self) -> Result<Flow> {
        let report = self
            .zoo
            .advance_day(&mut self.rng)
            .context("failed to advance day")?;
        self.print_day_report(&report)?;

        for animal in self.zoo.remove_dead() {
            writeln!(
                self.console.output,
                "{} the {} was removed from the zoo.",
                animal.name, animal.species
            )?;
        }

        Ok(match report.outcome {
            GameOutcome::Ongoing => Flow::Goto(Screen::Main),
            outcome => Flow::End(outcome),
        })
    }

    fn animal_screen(&mut self) -> Result<Flow> {
        let command = self.console.pick("Animals:", &AnimalCommand::ALL)?;
        match command {
            AnimalCommand::Buy => self.buy_animal()?,
            AnimalCommand::Sell => self.sell_animal()?,
            AnimalCommand::List => self.list_animals()?,
            AnimalCommand::Move => self.move_animal()?,
            AnimalCommand::Shop => return Ok(Flow::Goto(Screen::Shop)),
            AnimalCommand::Rename => self.rename_animal()?,
            AnimalCommand::Breed => self.breed_animals()?,
            AnimalCommand::Inspect => self.inspect_enclosure()?,
            AnimalCommand::Treat => self.treat_animals()?,
            AnimalCommand::Back => return Ok(Flow::Goto(Screen::Main)),
        }
        Ok(Flow::Goto(Screen::Animals))
    }

    fn buy_animal(&mut self) -> Result<()> {
        self.print_offers()?;
        let offer_idx = self.console.read_index("Animal number: ")?;
        self.print_enclosures()?;
        let enclosure_idx = self.console.read_index("Enclosure number: ")?;

        let name = self.zoo.shop.offers.get(offer_idx).map(|offer| offer.name.clone());
        let result = self.zoo.buy_animal(offer_idx, enclosure_idx);
        if self.check("buy the animal", result)?.is_some() {
            writeln!(
                self.console.output,
                "{} moved into its new home.",
                name.unwrap_or_default()
            )?;
        }
        Ok(())
    }

    fn sell_animal(&mut self) -> Result<()> {
        let Some((enclosure_idx, animal_idx)) = self.select_animal()? else {
            return Ok(());
        };
        let offer = self
            .zoo
            .enclosures
            .get(enclosure_idx)
            .and_then(|enclosure| enclosure.animals.get(animal_idx))
            .map(|animal| (animal.name.clone(), animal.price / 2));
        if let Some((name, payout)) = offer {
            if !self.console.confirm(&format!("Sell {name} for {payout}?"))? {
                writeln!(self.console.output, "{name} stays.")?;
                return Ok(());
            }
        }

        let result = self.zoo.sell_animal(enclosure_idx, animal_idx);
        if let Some((animal, payout)) = self.check("sell the animal", result)? {
            writeln!(self.console.output, "Sold {} for {payout}.", animal.name)?;
        }
        Ok(())
    }

    fn list_animals(&mut self) -> Result<()> {
        let out = &mut self.console.output;
        if self.zoo.count_live_animals() == 0 {
            writeln!(out, "There are no animals in the zoo.")?;
            return Ok(());
        }
        for enclosure in &self.zoo.enclosures {
            for animal in &enclosure.animals {
                writeln!(out, "[{}] {}", enclosure.name, AnimalLine(animal))?;
            }
        }
        Ok(())
    }

    fn move_animal(&mut self) -> Result<()> {
        let Some((src_idx, animal_idx)) = self.select_animal()? else {
            return Ok(());
        };
        self.print_enclosures()?;
        let dst_idx = self.console.read_index("Destination enclosure number: ")?;

        let result = self.zoo.move_animal(src_idx, animal_idx, dst_idx);
        if self.check("move the animal", result)?.is_some() {
            writeln!(self.console.output, "The animal was moved.")?;
        }
        Ok(())
    }

    fn rename_animal(&mut self) -> Result<()> {
        let Some((enclosure_idx, animal_idx)) = self.select_animal()? else {
            return Ok(());
        };
        let new_name = self.console.read_line("New name: ")?;

        let result = self.zoo.rename_animal(enclosure_idx, animal_idx, &new_name);
        if let Some(old_name) = self.check("rename the animal", result)? {
            writeln!(self.console.output, "{old_name} is now called {}.", new_name.trim())?;
        }
        Ok(())
    }

    fn breed_animals(&mut self) -> Result<()> {
        self.print_enclosures()?;
        let enclosure_idx = self.console.read_index("Enclosure number: ")?;
        if !self.print_enclosure_animals(enclosure_idx)? {
            return Ok(());
        }
        let first_idx = self.console.read_index("First parent number: ")?;
        let second_idx = self.console.read_index("Second parent number: ")?;

        let result = self
            .zoo
            .breed_animals(enclosure_idx, first_idx, second_idx, &mut self.rng)
            .map(|offspring| offspring.name.clone());
        if let Some(name) = self.check("breed", result)? {
            writeln!(self.console.output, "{name} was born!")?;
        }
        Ok(())
    }

    fn inspect_enclosure(&mut self) -> Result<()> {
        self.print_enclosures()?;
        let enclosure_idx = self.console.read_index("Enclosure number: ")?;
        self.print_enclosure_animals(enclosure_idx)?;
        Ok(())
    }

    fn treat_animals(&mut self) -> Result<()> {
        let treatment = self.zoo.treat_sick_animals();
        let out = &mut self.console.output;
        if treatment.healed.is_empty() && treatment.remaining == 0 {
            writeln!(out, "No animal is sick.")?;
            return Ok(());
        }
        for healing in &treatment.healed {
            writeln!(out, "{} healed {}.", healing.vet, healing.animal)?;
        }
        if treatment.remaining > 0 {
            writeln!(
                out,
                "{} sick animals still need a rested veterinarian.",
                treatment.remaining
            )?;
        }
        Ok(())
    }

    fn shop_screen(&mut self) -> Result<Flow> {
        self.print_offers()?;
        let command = self.console.pick("Shop:", &ShopCommand::ALL)?;
        match command {
            ShopCommand::Refresh => {
                let result = self.zoo.refresh_shop(&mut self.rng);
                if self.check("refresh the shop", result)?.is_some() {
                    writeln!(self.console.output, "The shop has new animals.")?;
                }
                Ok(Flow::Goto(Screen::Shop))
            }
            ShopCommand::Back => Ok(Flow::Goto(Screen::Animals)),
        }
    }

    fn purchase_screen(&mut self) -> Result<Flow> {
        let command = self.console.pick("Purchases:", &PurchaseCommand::ALL)?;
        match command {
            PurchaseCommand::Food => {
                let amount = self.console.read_int("Units of food: ")?;
                let amount = u32::try_from(amount).unwrap_or(if amount > 0 { u32::MAX } else { 0 });
                let result = self.zoo.buy_food(amount);
                if let Some(cost) = self.check("buy food", result)? {
                    writeln!(
                        self.console.output,
                        "Bought {amount} food for {cost}. Stock: {}.",
                        self.zoo.food
                    )?;
                }
            }
            PurchaseCommand::Advertisement => {
                let result = self.zoo.advertise();
                if self.check("advertise", result)?.is_some() {
                    writeln!(
                        self.console.output,
                        "The campaign is running. Popularity: {}.",
                        self.zoo.popularity
                    )?;
                }
            }
            PurchaseCommand::Back => return Ok(Flow::Goto(Screen::Main)),
        }
        Ok(Flow::Goto(Screen::Purchases))
    }

    fn enclosure_screen(&mut self) -> Result<Flow> {
        let command = self.console.pick("Enclosures:", &EnclosureCommand::ALL)?;
        match command {
            EnclosureCommand::Build => {
                let name = self.console.read_line("Enclosure name: ")?;
                let kind = self.console.pick("Animal kind:", &AnimalKind::ALL)?;
                let climate = self.console.pick("Climate:", &Climate::ALL)?;
                let result = self
                    .zoo
                    .build_enclosure(&name, kind, climate, &mut self.rng)
                    .map(|enclosure| EnclosureLine(enclosure).to_string());
                if let Some(line) = self.check("build the enclosure", result)? {
                    writeln!(self.console.output, "Built {line}")?;
                }
            }
            EnclosureCommand::BuildBreeding => {
                let name = self.console.read_line("Enclosure name: ")?;
                let kind = self.console.pick("Animal kind:", &AnimalKind::ALL)?;
                let species = self.console.pick("Species:", &kind.species())?;
                let climate = self.console.pick("Climate:", &Climate::ALL)?;
                let result = self
                    .zoo
                    .build_breeding_enclosure(&name, species, climate)
                    .map(|enclosure| EnclosureLine(enclosure).to_string());
                if let Some(line) = self.check("build the enclosure", result)? {
                    writeln!(self.console.output, "Built {line}")?;
                }
            }
            EnclosureCommand::Upgrade => {
                self.print_enclosures()?;
                let index = self.console.read_index("Enclosure number: ")?;
                let result = self
                    .zoo
                    .upgrade_enclosure(index)
                    .map(|enclosure| EnclosureLine(enclosure).to_string());
                if let Some(line) = self.check("upgrade the enclosure", result)? {
                    writeln!(self.console.output, "Upgraded {line}")?;
                }
            }
            EnclosureCommand::Sell => {
                self.print_enclosures()?;
                let index = self.console.read_index("Enclosure number: ")?;
                let offer = self
                    .zoo
                    .enclosures
                    .get(index)
                    .filter(|enclosure| enclosure.animals.is_empty())
                    .map(|enclosure| (enclosure.name.clone(), enclosure.sale_price()));
                if let Some((name, payout)) = offer {
                    if !self.console.confirm(&format!("Sell {name} for {payout}?"))? {
                        writeln!(self.console.output, "{name} stays open.")?;
                        return Ok(Flow::Goto(Screen::Enclosures));
                    }
                }
                let result = self.zoo.sell_enclosure(index);
                if let Some((enclosure, payout)) = self.check("sell the enclosure", result)? {
                    writeln!(self.console.output, "Sold {} for {payout}.", enclosure.name)?;
                }
            }
            EnclosureCommand::Inspect => self.inspect_enclosure()?,
            EnclosureCommand::Back => return Ok(Flow::Goto(Screen::Main)),
        }
        Ok(Flow::Goto(Screen::Enclosures))
    }

    fn staff_screen(&mut self) -> Result<Flow> {
        let command = self.console.pick("Staff:", &StaffCommand::ALL)?;
        match command {
            StaffCommand::Hire => {
                let role = self.console.pick("Role:", &Role::HIRABLE)?;
                let result = self
                    .zoo
                    .hire(role, &mut self.rng)
                    .map(|employee| EmployeeLine(employee).to_string());
                if let Some(line) = self.check("hire", result)? {
                    writeln!(self.console.output, "Hired {line}")?;
                }
            }
            StaffCommand::List => self.print_staff()?,
            StaffCommand::Fire => {
                self.print_staff()?;
                let index = self.console.read_index("Employee number: ")?;
                let Some(name) = self.zoo.employees.get(index).map(|e| e.name.clone()) else {
                    let error = ZooError::InvalidIndex {
                        what: "employee",
                        index,
                    };
                    writeln!(self.console.output, "Cannot fire: {error}.")?;
                    return Ok(Flow::Goto(Screen::Staff));
                };
                if self.console.confirm(&format!("Really fire {name}?"))? {
                    let result = self.zoo.fire(index);
                    if self.check("fire", result)?.is_some() {
                        writeln!(self.console.output, "{name} has left the zoo.")?;
                    }
                }
            }
            StaffCommand::Back => return Ok(Flow::Goto(Screen::Main)),
        }
        Ok(Flow::Goto(Screen::Staff))
    }

    /// Print a rejected action; the value of a successful one is passed through.
    fn check<T>(&mut self, action: &str, result: Result<T, ZooError>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                log::debug!("rejected {action}: {error:?}");
                writeln!(self.console.output, "Cannot {action}: {error}.")?;
                Ok(None)
            }
        }
    }

    /// Ask for an enclosure and one of its animals.
    fn select_animal(&mut self) -> Result<Option<(usize, usize)>> {
        self.print_enclosures()?;
        let enclosure_idx = self.console.read_index("Enclosure number: ")?;
        if !self.print_enclosure_animals(enclosure_idx)? {
            return Ok(None);
        }
        let animal_idx = self.console.read_index("Animal number: ")?;
        Ok(Some((enclosure_idx, animal_idx)))
    }

    fn print_status(&mut self) -> Result<()> {
        let zoo = &self.zoo;
        let out = &mut self.console.output;
        writeln!(out)?;
        writeln!(out, "=== {} | day {} ===", zoo.name, zoo.day)?;
        writeln!(
            out,
            "Money: {} | Food: {} | Popularity: {} | Visitors: {}",
            zoo.money, zoo.food, zoo.popularity, zoo.visitors
        )?;
        writeln!(
            out,
            "Animals: {} ({} sick) | Enclosures: {} | Staff: {}",
            zoo.count_live_animals(),
            zoo.count_sick_animals(),
            zoo.enclosures.len(),
            zoo.employees.len()
        )?;
        let delegation = if zoo.delegation_satisfied {
            "satisfied"
        } else {
            "waiting for marine animals"
        };
        writeln!(out, "Delegation: {delegation}")?;
        Ok(())
    }

    fn print_offers(&mut self) -> Result<()> {
        let out = &mut self.console.output;
        writeln!(
            out,
            "Animals for sale (new stock in {} days):",
            self.zoo.shop.days_until_refresh
        )?;
        for (i, offer) in self.zoo.shop.offers.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, AnimalLine(offer))?;
        }
        Ok(())
    }

    fn print_enclosures(&mut self) -> Result<()> {
        let out = &mut self.console.output;
        if self.zoo.enclosures.is_empty() {
            writeln!(out, "You have no enclosures yet.")?;
        }
        for (i, enclosure) in self.zoo.enclosures.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, EnclosureLine(enclosure))?;
        }
        Ok(())
    }

    /// Print the occupants of an enclosure.
    ///
    /// Returns false, after saying so, when the enclosure does not exist.
    fn print_enclosure_animals(&mut self, index: usize) -> Result<bool> {
        let out = &mut self.console.output;
        let Some(enclosure) = self.zoo.enclosures.get(index) else {
            let error = ZooError::InvalidIndex {
                what: "enclosure",
                index,
            };
            writeln!(out, "{error}.")?;
            return Ok(false);
        };

        writeln!(out, "{}", EnclosureLine(enclosure))?;
        if enclosure.animals.is_empty() {
            writeln!(out, "  (empty)")?;
        }
        for (i, animal) in enclosure.animals.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, AnimalLine(animal))?;
            if let Some(lineage) = &animal.lineage {
                writeln!(
                    out,
                    "   child of {} and {}",
                    lineage.first.name, lineage.second.name
                )?;
            }
        }
        Ok(true)
    }

    fn print_staff(&mut self) -> Result<()> {
        let out = &mut self.console.output;
        for (i, employee) in self.zoo.employees.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, EmployeeLine(employee))?;
        }
        Ok(())
    }

    fn print_day_report(&mut self, report: &DayReport) -> Result<()> {
        let out = &mut self.console.output;
        writeln!(out, "--- Day {} ---", report.day)?;
        writeln!(out, "Wages paid: {}", report.wages)?;
        match report.food_eaten {
            Some(food) => writeln!(out, "Food eaten: {food}")?,
            None => writeln!(out, "Not enough food! The animals went hungry.")?,
        }
        writeln!(out, "Total dirtiness: {}", report.dirtiness)?;
        writeln!(
            out,
            "Visitors: {} | Revenue: {} | Profit: {}",
            report.visitors, report.revenue, report.profit
        )?;
        for event in &report.events {
            writeln!(out, "* {event}")?;
        }
        Ok(())
    }

    fn print_outcome(&mut self, outcome: GameOutcome) -> Result<()> {
        let zoo = &self.zoo;
        let out = &mut self.console.output;
        match outcome {
            GameOutcome::Won => writeln!(
                out,
                "Congratulations! {} stayed open for {} days with {} in the bank.",
                zoo.name, zoo.day, zoo.money
            )?,
            GameOutcome::Bankrupt => writeln!(
                out,
                "{} went bankrupt on day {}. Game over.",
                zoo.name, zoo.day
            )?,
            GameOutcome::Ongoing => writeln!(out, "Goodbye!")?,
        }

        let report = zoo.profit_report();
        if let (Some(worst), Some(best)) = (report.worst, report.best) {
            writeln!(
                out,
                "Daily profit over {} days: mean {:.1}, std dev {:.1}, worst {worst}, best {best}",
                report.n_days, report.mean, report.std_dev
            )?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn zoo(&self) -> &Zoo {
        &self.zoo
    }
}

struct AnimalLine<'a>(&'a Animal);

impl Display for AnimalLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let animal = self.0;
        write!(
            f,
            "{} | {} | {} | {} days | {} kg | {} | {} | happiness {} | price {}",
            animal.name,
            animal.species,
            animal.gender,
            animal.age,
            animal.weight,
            animal.climate,
            animal.health,
            animal.happiness,
            animal.price
        )?;
        if animal.hungry {
            write!(f, " | hungry")?;
        }
        if animal.unhappy {
            write!(f, " | unhappy")?;
        }
        Ok(())
    }
}

struct EnclosureLine<'a>(&'a Enclosure);

impl Display for EnclosureLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let enclosure = self.0;
        write!(f, "{} | {}", enclosure.name, enclosure.kind)?;
        if let Some(species) = enclosure.locked_species {
            write!(f, " (breeding {species})")?;
        }
        let diet = if enclosure.predator_only {
            "predators"
        } else {
            "non-predators"
        };
        write!(
            f,
            " | {} | {diet} | {}/{} animals | level {} | upkeep {} | dirtiness {}",
            enclosure.climate,
            enclosure.animals.len(),
            enclosure.capacity,
            enclosure.level,
            enclosure.upkeep,
            enclosure.dirtiness
        )?;
        if enclosure.needs_cleaning() {
            write!(f, " (dirty)")?;
        }
        Ok(())
    }
}

struct EmployeeLine<'a>(&'a Employee);

impl Display for EmployeeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let employee = self.0;
        write!(
            f,
            "{} | {} | wage {} | efficiency {}",
            employee.name, employee.role, employee.wage, employee.efficiency
        )?;
        if employee.fatigued {
            write!(f, " | tired")?;
        }
        Ok(())
    }
}

impl Display for MainCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Animals => "Manage animals",
            Self::Purchases => "Manage purchases",
            Self::Enclosures => "Manage enclosures",
            Self::Staff => "Manage staff",
            Self::NextDay => "Next day",
            Self::Exit => "Exit",
        })
    }
}

impl Display for AnimalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "Buy an animal",
            Self::Sell => "Sell an animal",
            Self::List => "List all animals",
            Self::Move => "Move an animal",
            Self::Shop => "Visit the shop",
            Self::Rename => "Rename an animal",
            Self::Breed => "Breed animals",
            Self::Inspect => "Inspect an enclosure",
            Self::Treat => "Treat sick animals",
            Self::Back => "Back",
        })
    }
}

impl Display for ShopCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Refresh => "Restock the shop now",
            Self::Back => "Back",
        })
    }
}

impl Display for PurchaseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Food => "Buy food",
            Self::Advertisement => "Buy advertising",
            Self::Back => "Back",
        })
    }
}

impl Display for EnclosureCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Build => "Build an enclosure",
            Self::BuildBreeding => "Build a breeding enclosure",
            Self::Upgrade => "Upgrade an enclosure",
            Self::Sell => "Sell an enclosure",
            Self::Inspect => "Inspect an enclosure",
            Self::Back => "Back",
        })
    }
}

impl Display for StaffCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hire => "Hire an employee",
            Self::List => "List employees",
            Self::Fire => "Fire an employee",
            Self::Back => "Back",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::animal;
    use crate::species::Species;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::io::Cursor;

    type TestMenu = Menu<Cursor<String>, Vec<u8>, ChaCha12Rng>;

    fn menu(input: &str) -> TestMenu {
        Menu::open(
            Config::default(),
            Some("Test Zoo".to_string()),
            Cursor::new(input.to_string()),
            Vec::new(),
            ChaCha12Rng::seed_from_u64(11),
        )
        .expect("zoo should open")
    }

    fn transcript(menu: &TestMenu) -> String {
        String::from_utf8_lossy(&menu.console.output).into_owned()
    }

    #[test]
    fn read_int_asks_again_on_garbage() {
        let mut console = Console {
            input: Cursor::new("abc\n\n 7 \n"),
            output: Vec::new(),
        };
        assert_eq!(console.read_int("> ").expect("a number eventually"), 7);
        let text = String::from_utf8_lossy(&console.output);
        assert_eq!(text.matches("Please enter a number.").count(), 2);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut console = Console {
            input: Cursor::new(""),
            output: Vec::new(),
        };
        assert!(console.read_int("> ").is_err());
    }

    #[test]
    fn read_index_is_one_based() {
        let mut console = Console {
            input: Cursor::new("3\n0\n-4\n1\n"),
            output: Vec::new(),
        };
        assert_eq!(console.read_index("> ").expect("valid"), 2);
        assert_eq!(console.read_index("> ").expect("valid"), 0);
        let text = String::from_utf8_lossy(&console.output);
        assert_eq!(text.matches("Please enter a number of 1 or more.").count(), 2);
    }

    #[test]
    fn pick_rejects_out_of_range_choices() {
        let mut console = Console {
            input: Cursor::new("0\n4\n2\n"),
            output: Vec::new(),
        };
        let climate = console.pick("Climate:", &Climate::ALL).expect("valid choice");
        assert_eq!(climate, Climate::ALL[1]);
        let text = String::from_utf8_lossy(&console.output);
        assert_eq!(text.matches("Choose a number between 1 and 3.").count(), 2);
    }

    #[test]
    fn zoo_name_is_asked_when_missing() {
        let menu = Menu::open(
            Config::default(),
            None,
            Cursor::new("  Sunny   Acres \n".to_string()),
            Vec::new(),
            ChaCha12Rng::seed_from_u64(1),
        )
        .expect("zoo should open");
        assert_eq!(menu.zoo().name, "Sunny Acres");
    }

    #[test]
    fn thirty_quiet_days_win_the_game() {
        let mut menu = menu(&"5\n".repeat(30));
        let outcome = menu.run().expect("game should finish");
        assert_eq!(outcome, GameOutcome::Won);
        assert_eq!(menu.zoo().day, 30);
        let text = transcript(&menu);
        assert!(text.contains("Congratulations!"), "{text}");
        assert!(text.contains("Daily profit over 30 days"), "{text}");
    }

    #[test]
    fn exit_ends_without_an_outcome() {
        let mut menu = menu("6\n");
        assert_eq!(menu.run().expect("clean exit"), GameOutcome::Ongoing);
        assert!(transcript(&menu).contains("Goodbye!"));
    }

    #[test]
    fn building_from_the_menu_charges_money() {
        // enclosures, build, name, felines, tropic, back, exit
        let mut menu = menu("3\n1\nPride Rock\n1\n1\n6\n6\n");
        menu.run().expect("clean exit");
        let zoo = menu.zoo();
        assert_eq!(zoo.enclosures.len(), 1);
        assert_eq!(zoo.enclosures[0].name, "Pride Rock");
        assert_eq!(zoo.enclosures[0].kind, AnimalKind::Feline);
        assert_eq!(zoo.money, 100_000 - 500);
        assert!(transcript(&menu).contains("Built Pride Rock"));
    }

    #[test]
    fn declined_firing_keeps_the_employee() {
        // staff, fire, first employee, no, back, exit
        let mut menu = menu("4\n3\n1\n2\n4\n6\n");
        menu.run().expect("clean exit");
        assert_eq!(menu.zoo().employees.len(), 1);
    }

    #[test]
    fn confirmed_firing_removes_the_employee() {
        let mut menu = menu("4\n3\n1\n1\n4\n6\n");
        menu.run().expect("clean exit");
        assert!(menu.zoo().employees.is_empty());
        assert!(transcript(&menu).contains("Director Egor has left the zoo."));
    }

    #[test]
    fn rejected_actions_are_reported_and_the_menu_continues() {
        // animals, sell, enclosure 1 (none exist), back, exit
        let mut menu = menu("1\n2\n1\n10\n6\n");
        menu.run().expect("clean exit");
        let text = transcript(&menu);
        assert!(text.contains("there is no enclosure number 1."), "{text}");
        assert!(text.contains("Goodbye!"));
    }

    #[test]
    fn declined_enclosure_sale_keeps_the_enclosure() {
        // enclosures, build, name, felines, tropic, sell, first, no, back, exit
        let mut menu = menu("3\n1\nPen\n1\n1\n4\n1\n2\n6\n6\n");
        menu.run().expect("clean exit");
        assert_eq!(menu.zoo().enclosures.len(), 1);
        assert_eq!(menu.zoo().money, 100_000 - 500);
        let text = transcript(&menu);
        assert!(text.contains("Sell Pen for 300? (1 - yes, 2 - no)"), "{text}");
        assert!(text.contains("Pen stays open."), "{text}");
    }

    #[test]
    fn confirmed_enclosure_sale_pays_out() {
        let mut menu = menu("3\n1\nPen\n1\n1\n4\n1\n1\n6\n6\n");
        menu.run().expect("clean exit");
        assert!(menu.zoo().enclosures.is_empty());
        assert_eq!(menu.zoo().money, 100_000 - 500 + 300);
        assert!(transcript(&menu).contains("Sold Pen for 300."));
    }

    #[test]
    fn declined_animal_sale_keeps_the_animal() {
        let mut menu = menu("");
        let mut pen =
            Enclosure::new_standard("Pen".into(), AnimalKind::Reptile, Climate::Tropic, false);
        let shelly = animal("Shelly", Species::Turtle, Climate::Tropic);
        let payout = shelly.price / 2;
        pen.animals.push(shelly);
        menu.zoo.enclosures.push(pen);
        let money = menu.zoo().money;

        // animals, sell, enclosure 1, animal 1, no, back, exit
        menu.console.input = Cursor::new("1\n2\n1\n1\n2\n10\n6\n".to_string());
        menu.run().expect("clean exit");
        assert_eq!(menu.zoo().enclosures[0].animals.len(), 1);
        assert_eq!(menu.zoo().money, money);
        let text = transcript(&menu);
        assert!(text.contains(&format!("Sell Shelly for {payout}?")), "{text}");
        assert!(text.contains("Shelly stays."), "{text}");
    }

    #[test]
    fn food_purchase_updates_stock() {
        // purchases, food, 20 units, back, exit
        let mut menu = menu("2\n1\n20\n3\n6\n");
        menu.run().expect("clean exit");
        assert_eq!(menu.zoo().food, 30);
        assert_eq!(menu.zoo().money, 100_000 - 100);
    }

    #[test]
    fn running_out_of_input_mid_game_is_an_error() {
        let mut menu = menu("5\n");
        assert!(menu.run().is_err());
    }
}
