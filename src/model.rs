use crate::character::{CharacterId, LifeStage};
use crate::clock::Millis;
use serde::{Deserialize, Serialize};

pub const MAX_HUNGER: u8 = 4;
pub const MAX_HAPPY: u8 = 4;
pub const MAX_DISCIPLINE: u8 = 100;
pub const DISCIPLINE_INC: u8 = 25;
pub const MAX_POOP: u8 = 4;
pub const MIN_WEIGHT: u8 = 5;
pub const MAX_WEIGHT: u8 = 99;
pub const MEAL_WEIGHT: u8 = 1;
pub const SNACK_WEIGHT: u8 = 2;
pub const GAME_WEIGHT: u8 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Attention {
    #[default]
    None = 0,
    Hungry,
    Unhappy,
    Discipline,
    Sick,
    Poop,
    Sleep,
}

impl Attention {
    /// Sleep and discipline calls never turn into care mistakes.
    pub fn counts_toward_care_window(self) -> bool {
        !matches!(self, Attention::None | Attention::Sleep | Attention::Discipline)
    }

    /// Kinds whose start time loses its meaning across a reload.
    pub fn is_time_sensitive(self) -> bool {
        matches!(self, Attention::Hungry | Attention::Unhappy | Attention::Sick)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeathCause {
    #[default]
    Neglect = 0,
    Sickness,
    OldAge,
}

/// The single mutable pet record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetState {
    pub character: CharacterId,
    pub stage: LifeStage,

    pub hunger: u8,
    pub happiness: u8,
    pub discipline: u8,
    pub weight: u8,
    /// Whole hours.
    pub age: u16,

    pub poop_count: u8,
    pub sick: bool,
    /// Doses required to cure the current illness.
    pub sickness_level: u8,
    pub medicine_given: u8,

    pub asleep: bool,
    pub light_off: bool,

    pub care_mistakes: u8,
    pub discipline_calls: u8,
    pub total_care_mistakes: u16,
    pub total_age: u16,

    pub attention: Attention,
    pub attention_start: Millis,

    pub last_hunger_decay: Millis,
    pub last_happy_decay: Millis,
    pub last_poop: Millis,
    pub last_age_tick: Millis,
    pub last_sick_check: Millis,
    pub last_discipline: Millis,
    pub stage_start: Millis,

    pub ready_to_evolve: bool,
    pub dead: bool,
    pub death_cause: DeathCause,
}

impl PetState {
    /// A fresh egg with every timer anchored at `now`.
    pub fn new_egg(now: Millis) -> Self {
        Self {
            character: CharacterId::Egg,
            stage: LifeStage::Egg,
            hunger: MAX_HUNGER,
            happiness: MAX_HAPPY,
            discipline: 0,
            weight: MIN_WEIGHT,
            age: 0,
            poop_count: 0,
            sick: false,
            sickness_level: 0,
            medicine_given: 0,
            asleep: false,
            light_off: false,
            care_mistakes: 0,
            discipline_calls: 0,
            total_care_mistakes: 0,
            total_age: 0,
            attention: Attention::None,
            attention_start: now,
            last_hunger_decay: now,
            last_happy_decay: now,
            last_poop: now,
            last_age_tick: now,
            last_sick_check: now,
            last_discipline: now,
            stage_start: now,
            ready_to_evolve: false,
            dead: false,
            death_cause: DeathCause::Neglect,
        }
    }

    /// Re-anchor a record loaded from an earlier run at `now`.
    ///
    /// Saved timestamps come from a clock whose origin is gone, so every
    /// timer restarts and no offline time is simulated. Attention kinds
    /// whose deadline depended on the old clock are dropped, and a pending
    /// evolution is discarded. Stats, identity and counters are untouched.
    pub fn rebase_timers(&mut self, now: Millis) {
        self.last_hunger_decay = now;
        self.last_happy_decay = now;
        self.last_poop = now;
        self.last_age_tick = now;
        self.last_sick_check = now;
        self.last_discipline = now;
        self.stage_start = now;
        self.attention_start = now;

        if self.attention.is_time_sensitive() {
            self.attention = Attention::None;
        }
        self.ready_to_evolve = false;
    }

    pub fn has_attention(&self) -> bool {
        self.attention != Attention::None
    }

    /// Clear the pending attention if it is of kind `kind`.
    pub(crate) fn clear_attention(&mut self, kind: Attention) {
        if self.attention == kind {
            self.attention = Attention::None;
        }
    }
}

/// Timing rules for the simulation. Durations are in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub egg_hatch_ms: u32,
    pub baby_evolve_ms: u32,
    pub child_evolve_age: u16,
    pub teen_evolve_age: u16,
    pub secret_evolve_age: u16,
    pub care_window_ms: u32,
    pub discipline_interval_ms: u32,
    pub hunger_decay_ms: u32,
    pub happy_decay_ms: u32,
    pub poop_interval_ms: u32,
    pub poop_interval_young_ms: u32,
    pub age_tick_ms: u32,
    pub sick_from_poop_ms: u32,
    pub poop_sick_threshold: u8,
    pub old_age_sick_from: u16,
    pub old_age_sick_every: u16,
    pub max_age: u16,
    pub hunger_death_windows: u32,
    pub sickness_death_windows: u32,
    pub evolution_anim_ms: u32,
    pub autosave_interval_ms: u32,
}

const MINUTE_MS: u32 = 60 * 1000;
const HOUR_MS: u32 = 60 * MINUTE_MS;

impl Default for Rules {
    fn default() -> Self {
        Self {
            egg_hatch_ms: 10 * 1000,
            baby_evolve_ms: 65 * MINUTE_MS,
            child_evolve_age: 3,
            teen_evolve_age: 6,
            secret_evolve_age: 10,
            care_window_ms: 15 * MINUTE_MS,
            discipline_interval_ms: 3 * HOUR_MS,
            hunger_decay_ms: HOUR_MS,
            happy_decay_ms: 50 * MINUTE_MS,
            poop_interval_ms: 180 * MINUTE_MS,
            poop_interval_young_ms: 90 * MINUTE_MS,
            age_tick_ms: HOUR_MS,
            sick_from_poop_ms: 30 * MINUTE_MS,
            poop_sick_threshold: 3,
            old_age_sick_from: 15,
            old_age_sick_every: 3,
            max_age: 168,
            hunger_death_windows: 8,
            sickness_death_windows: 12,
            evolution_anim_ms: 3000,
            autosave_interval_ms: 60 * 1000,
        }
    }
}

impl Rules {
    pub fn hunger_death_ms(&self) -> u32 {
        self.care_window_ms.saturating_mul(self.hunger_death_windows)
    }

    pub fn sickness_death_ms(&self) -> u32 {
        self.care_window_ms.saturating_mul(self.sickness_death_windows)
    }

    /// Poop comes faster for the Child stage and younger.
    pub fn poop_interval(&self, stage: LifeStage) -> u32 {
        if stage <= LifeStage::Child {
            self.poop_interval_young_ms
        } else {
            self.poop_interval_ms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_egg_anchors_every_timer() {
        let now = Millis(1234);
        let p = PetState::new_egg(now);
        assert_eq!(p.character, CharacterId::Egg);
        assert_eq!(p.stage, LifeStage::Egg);
        assert_eq!(p.hunger, MAX_HUNGER);
        assert_eq!(p.weight, MIN_WEIGHT);
        for t in [
            p.last_hunger_decay,
            p.last_happy_decay,
            p.last_poop,
            p.last_age_tick,
            p.last_sick_check,
            p.last_discipline,
            p.stage_start,
        ] {
            assert_eq!(t, now);
        }
    }

    #[test]
    fn rebase_keeps_discipline_and_sleep_attention() {
        let mut p = PetState::new_egg(Millis(0));
        p.attention = Attention::Discipline;
        p.rebase_timers(Millis(50));
        assert_eq!(p.attention, Attention::Discipline);

        p.attention = Attention::Unhappy;
        p.ready_to_evolve = true;
        p.rebase_timers(Millis(60));
        assert_eq!(p.attention, Attention::None);
        assert!(!p.ready_to_evolve);
        assert_eq!(p.attention_start, Millis(60));
    }

    #[test]
    fn default_rules_match_death_windows() {
        let r = Rules::default();
        assert_eq!(r.hunger_death_ms(), 2 * HOUR_MS);
        assert_eq!(r.sickness_death_ms(), 3 * HOUR_MS);
        assert_eq!(r.poop_interval(LifeStage::Baby), 90 * MINUTE_MS);
        assert_eq!(r.poop_interval(LifeStage::Adult), 180 * MINUTE_MS);
    }
}
