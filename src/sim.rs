use crate::character::{self, CharacterId, LifeStage};
use crate::clock::Millis;
use crate::dice::Dice;
use crate::model::{
    Attention, DeathCause, PetState, Rules, DISCIPLINE_INC, GAME_WEIGHT, MAX_DISCIPLINE,
    MAX_HAPPY, MAX_HUNGER, MAX_POOP, MAX_WEIGHT, MEAL_WEIGHT, MIN_WEIGHT, SNACK_WEIGHT,
};
use tracing::{debug, info};

/// Player interventions. Each one is guarded and reports whether it took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PetAction {
    FeedMeal,
    FeedSnack,
    StartGame,
    GameWon,
    GameLost,
    Discipline,
    Medicine,
    Clean,
    ToggleLight,
}

/// Owns the pet record and advances it.
pub struct PetSimulation {
    pet: PetState,
    rules: Rules,
    dice: Box<dyn Dice>,
}

impl PetSimulation {
    pub fn new(rules: Rules, dice: Box<dyn Dice>) -> Self {
        Self {
            pet: PetState::new_egg(Millis::ZERO),
            rules,
            dice,
        }
    }

    pub fn init_new_egg(&mut self, now: Millis) {
        self.pet = PetState::new_egg(now);
        info!(now = now.0, "new egg");
    }

    /// Replace the record wholesale, e.g. with a loaded save.
    pub fn load_from_save(&mut self, pet: PetState) {
        self.pet = pet;
    }

    pub fn state(&self) -> &PetState {
        &self.pet
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn is_evolving(&self) -> bool {
        self.pet.ready_to_evolve
    }

    pub fn has_attention(&self) -> bool {
        self.pet.has_attention()
    }

    /// Advance the pet to `now`. Calling it again before any threshold is
    /// reached changes nothing.
    pub fn update(&mut self, now: Millis, hour: u8) {
        if self.pet.dead {
            return;
        }

        if self.pet.stage == LifeStage::Egg {
            if now.has_elapsed(self.pet.stage_start, self.rules.egg_hatch_ms) {
                self.pet.ready_to_evolve = true;
            }
            return;
        }

        self.tick_age(now);

        self.check_sleep(now, hour);
        if self.pet.asleep {
            return;
        }

        self.decay_hunger(now);
        self.decay_happiness(now);
        self.check_poop(now);
        self.check_sickness(now);
        self.check_discipline_call(now);
        self.check_care_window(now);
        self.check_evolution(now);
        self.check_death(now);
    }

    fn tick_age(&mut self, now: Millis) {
        if !now.has_elapsed(self.pet.last_age_tick, self.rules.age_tick_ms) {
            return;
        }
        self.pet.age = self.pet.age.saturating_add(1);
        self.pet.total_age = self.pet.total_age.saturating_add(1);
        self.pet.last_age_tick = now;
        debug!(age = self.pet.age, "pet aged");
    }

    fn check_sleep(&mut self, now: Millis, hour: u8) {
        let schedule = character::lookup(self.pet.character).sleep;
        let should_sleep = schedule.is_sleep_hour(hour);

        if should_sleep && !self.pet.asleep {
            self.pet.asleep = true;
            self.pet.light_off = false;
            self.pet.attention = Attention::Sleep;
            self.pet.attention_start = now;
            info!(hour, "pet fell asleep");
        } else if !should_sleep && self.pet.asleep {
            self.pet.asleep = false;
            self.pet.light_off = false;
            self.pet.attention = Attention::None;
            info!(hour, "pet woke up");
        }
    }

    fn decay_hunger(&mut self, now: Millis) {
        let def = character::lookup(self.pet.character);
        let interval = def.hunger_interval(self.rules.hunger_decay_ms);
        if !now.has_elapsed(self.pet.last_hunger_decay, interval) {
            return;
        }
        self.pet.hunger = self.pet.hunger.saturating_sub(1);
        self.pet.last_hunger_decay = now;
        if self.pet.hunger == 0 {
            self.raise_attention(Attention::Hungry, now);
        }
    }

    fn decay_happiness(&mut self, now: Millis) {
        let def = character::lookup(self.pet.character);
        let interval = def.happy_interval(self.rules.happy_decay_ms);
        if !now.has_elapsed(self.pet.last_happy_decay, interval) {
            return;
        }
        self.pet.happiness = self.pet.happiness.saturating_sub(1);
        self.pet.last_happy_decay = now;
        if self.pet.happiness == 0 {
            self.raise_attention(Attention::Unhappy, now);
        }
    }

    fn check_poop(&mut self, now: Millis) {
        let interval = self.rules.poop_interval(self.pet.stage);
        if !now.has_elapsed(self.pet.last_poop, interval) {
            return;
        }
        let before = self.pet.poop_count;
        self.pet.poop_count = (before + 1).min(MAX_POOP);
        self.pet.last_poop = now;
        // The poop-sickness delay counts from the moment the pile got too big.
        // A sick pet keeps its illness clock.
        let threshold = self.rules.poop_sick_threshold;
        if !self.pet.sick && before < threshold && self.pet.poop_count >= threshold {
            self.pet.last_sick_check = now;
        }
    }

    /// Poop-driven illness is evaluated first. The old-age roll runs on every
    /// awake tick spent at a qualifying age, and only if the pet is still well.
    fn check_sickness(&mut self, now: Millis) {
        if self.pet.sick {
            return;
        }

        if self.pet.poop_count >= self.rules.poop_sick_threshold
            && now.has_elapsed(self.pet.last_sick_check, self.rules.sick_from_poop_ms)
        {
            let level = self.dice.between(1, 3) as u8;
            self.fall_sick(level, now);
        }

        let r = &self.rules;
        let at_old_age_mark = self.pet.age >= r.old_age_sick_from
            && (self.pet.age - r.old_age_sick_from) % r.old_age_sick_every.max(1) == 0;
        if at_old_age_mark && !self.pet.sick && self.dice.chance(3, 10) {
            let level = self.dice.between(2, 3) as u8;
            self.fall_sick(level, now);
        }
    }

    /// Illness duration for the sickness death check counts from here.
    fn fall_sick(&mut self, level: u8, now: Millis) {
        self.pet.sick = true;
        self.pet.sickness_level = level;
        self.pet.medicine_given = 0;
        self.pet.last_sick_check = now;
        info!(level, age = self.pet.age, "pet fell sick");
    }

    fn check_discipline_call(&mut self, now: Millis) {
        if self.pet.stage < LifeStage::Child
            || self.pet.has_attention()
            || self.pet.discipline >= MAX_DISCIPLINE
        {
            return;
        }
        if now.has_elapsed(self.pet.last_discipline, self.rules.discipline_interval_ms) {
            if self.dice.chance(1, 3) {
                self.raise_attention(Attention::Discipline, now);
                self.pet.discipline_calls = self.pet.discipline_calls.saturating_add(1);
            }
            self.pet.last_discipline = now;
        }
    }

    fn check_care_window(&mut self, now: Millis) {
        if !self.pet.attention.counts_toward_care_window() {
            return;
        }
        if now.has_elapsed(self.pet.attention_start, self.rules.care_window_ms) {
            self.pet.care_mistakes = self.pet.care_mistakes.saturating_add(1);
            self.pet.total_care_mistakes = self.pet.total_care_mistakes.saturating_add(1);
            info!(
                kind = ?self.pet.attention,
                stage_mistakes = self.pet.care_mistakes,
                total_mistakes = self.pet.total_care_mistakes,
                "care mistake"
            );
            self.pet.attention = Attention::None;
        }
    }

    fn check_evolution(&mut self, now: Millis) {
        if self.pet.ready_to_evolve {
            return;
        }
        let r = &self.rules;
        let ready = match self.pet.stage {
            LifeStage::Baby => now.has_elapsed(self.pet.stage_start, r.baby_evolve_ms),
            LifeStage::Child => self.pet.age >= r.child_evolve_age,
            LifeStage::Teen => self.pet.age >= r.teen_evolve_age,
            LifeStage::Adult => self.secret_eligible() && self.dice.chance(2, 10),
            _ => false,
        };
        if ready {
            self.pet.ready_to_evolve = true;
            debug!(character = ?self.pet.character, "ready to evolve");
        }
    }

    /// Causes are checked in a fixed order and a later one overwrites an
    /// earlier one when both hold on the same tick.
    fn check_death(&mut self, now: Millis) {
        let mut cause = None;
        if self.pet.hunger == 0
            && self.pet.attention == Attention::Hungry
            && now.has_elapsed(self.pet.attention_start, self.rules.hunger_death_ms())
        {
            cause = Some(DeathCause::Neglect);
        }
        if self.pet.sick
            && now.has_elapsed(self.pet.last_sick_check, self.rules.sickness_death_ms())
        {
            cause = Some(DeathCause::Sickness);
        }
        if self.pet.age >= self.rules.max_age {
            cause = Some(DeathCause::OldAge);
        }

        if let Some(cause) = cause {
            self.pet.dead = true;
            self.pet.death_cause = cause;
            self.pet.character = CharacterId::Ghost;
            self.pet.stage = LifeStage::Dead;
            info!(?cause, age = self.pet.age, "pet died");
        }
    }

    fn raise_attention(&mut self, kind: Attention, now: Millis) {
        if self.pet.has_attention() {
            return;
        }
        self.pet.attention = kind;
        self.pet.attention_start = now;
        debug!(?kind, "attention raised");
    }

    fn secret_eligible(&self) -> bool {
        character::is_secret_eligible(
            self.pet.total_care_mistakes,
            self.pet.character,
            self.pet.age,
            self.rules.secret_evolve_age,
        )
    }

    /// Apply a pending evolution.
    pub fn do_evolve(&mut self, now: Millis) {
        self.pet.ready_to_evolve = false;
        if self.pet.dead {
            return;
        }

        let next = if self.pet.stage == LifeStage::Egg {
            CharacterId::Baby
        } else if self.pet.stage == LifeStage::Adult && self.secret_eligible() {
            character::SECRET_FORM
        } else {
            character::resolve_evolution(
                self.pet.character,
                self.pet.care_mistakes,
                self.pet.discipline,
            )
        };
        if next == CharacterId::None {
            return;
        }

        let from = self.pet.character;
        let def = character::lookup(next);
        self.pet.character = next;
        self.pet.stage = def.stage;
        if def.base_weight > 0 {
            self.pet.weight = def.base_weight;
        }
        self.pet.care_mistakes = 0;
        self.pet.discipline /= 2;
        self.pet.discipline_calls = 0;
        self.pet.stage_start = now;
        self.pet.attention = Attention::None;
        info!(?from, to = ?next, stage = ?def.stage, "evolved");
    }

    pub fn apply(&mut self, action: PetAction) -> bool {
        match action {
            PetAction::FeedMeal => self.feed_meal(),
            PetAction::FeedSnack => self.feed_snack(),
            PetAction::StartGame => self.start_game(),
            PetAction::GameWon => {
                self.on_game_win();
                true
            }
            PetAction::GameLost => {
                self.on_game_lose();
                true
            }
            PetAction::Discipline => self.discipline(),
            PetAction::Medicine => self.give_medicine(),
            PetAction::Clean => self.clean(),
            PetAction::ToggleLight => self.toggle_light(),
        }
    }

    pub fn feed_meal(&mut self) -> bool {
        let p = &mut self.pet;
        if p.asleep || p.dead || p.hunger >= MAX_HUNGER || p.attention == Attention::Discipline {
            return false;
        }
        p.hunger += 1;
        p.weight = p.weight.saturating_add(MEAL_WEIGHT).min(MAX_WEIGHT);
        p.clear_attention(Attention::Hungry);
        true
    }

    pub fn feed_snack(&mut self) -> bool {
        let p = &mut self.pet;
        if p.asleep || p.dead || p.happiness >= MAX_HAPPY {
            return false;
        }
        p.happiness += 1;
        p.weight = p.weight.saturating_add(SNACK_WEIGHT).min(MAX_WEIGHT);
        p.clear_attention(Attention::Unhappy);
        true
    }

    pub fn start_game(&mut self) -> bool {
        let p = &self.pet;
        !(p.asleep || p.dead || p.attention == Attention::Discipline)
    }

    pub fn on_game_win(&mut self) {
        let p = &mut self.pet;
        p.happiness = (p.happiness + 1).min(MAX_HAPPY);
        p.weight = p.weight.saturating_sub(GAME_WEIGHT).max(MIN_WEIGHT);
        p.clear_attention(Attention::Unhappy);
    }

    pub fn on_game_lose(&mut self) {
        let p = &mut self.pet;
        p.weight = p.weight.saturating_sub(GAME_WEIGHT).max(MIN_WEIGHT);
    }

    pub fn discipline(&mut self) -> bool {
        let p = &mut self.pet;
        if p.attention != Attention::Discipline {
            return false;
        }
        p.discipline = p.discipline.saturating_add(DISCIPLINE_INC).min(MAX_DISCIPLINE);
        p.attention = Attention::None;
        true
    }

    pub fn give_medicine(&mut self) -> bool {
        let p = &mut self.pet;
        if !p.sick || p.dead {
            return false;
        }
        p.medicine_given = p.medicine_given.saturating_add(1);
        if p.medicine_given >= p.sickness_level {
            p.sick = false;
            p.sickness_level = 0;
            p.medicine_given = 0;
            info!("pet cured");
        }
        true
    }

    pub fn clean(&mut self) -> bool {
        let p = &mut self.pet;
        if p.poop_count == 0 || p.dead {
            return false;
        }
        p.poop_count = 0;
        p.clear_attention(Attention::Poop);
        true
    }

    pub fn toggle_light(&mut self) -> bool {
        let p = &mut self.pet;
        if !p.asleep {
            return false;
        }
        p.light_off = !p.light_off;
        if p.light_off {
            p.clear_attention(Attention::Sleep);
        }
        true
    }
}
