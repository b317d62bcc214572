//! Static character table and the evolution rules between its entries.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CharacterId {
    /// Sentinel: unknown character, or "no evolution target".
    #[default]
    None = 0,
    Egg,
    Baby,
    Chibi,
    /// Good teen.
    Junior,
    /// Bad teen.
    Cardboard,
    /// Best good adult; the only form that can reach the secret ending.
    Circuit,
    Rover,
    Tinker,
    Rex,
    Propeller,
    Atom,
    /// Secret adult.
    Armature,
    Ghost,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LifeStage {
    #[default]
    Egg = 0,
    Baby,
    Child,
    Teen,
    Adult,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepSchedule {
    pub bed_hour: u8,
    pub wake_hour: u8,
}

impl SleepSchedule {
    /// Whether `hour` falls inside the sleep window. A bed hour later than
    /// the wake hour means the window runs past midnight.
    pub fn is_sleep_hour(&self, hour: u8) -> bool {
        if self.bed_hour > self.wake_hour {
            hour >= self.bed_hour || hour < self.wake_hour
        } else {
            hour >= self.bed_hour && hour < self.wake_hour
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterDef {
    pub id: CharacterId,
    pub name: &'static str,
    pub display_name: &'static str,
    pub stage: LifeStage,
    /// Weight assigned on evolving into this form; 0 keeps the current weight.
    pub base_weight: u8,
    pub sleep: SleepSchedule,
    /// Decay speed ×10 (10 = normal, 15 = 1.5× faster). 0 means unscaled.
    pub hunger_decay_mul: u8,
    pub happy_decay_mul: u8,
}

impl CharacterDef {
    /// Scale a base decay interval by a ×10 multiplier. A faster multiplier
    /// gives a shorter interval.
    pub fn scaled_interval(base_ms: u32, mul: u8) -> u32 {
        if mul == 0 {
            return base_ms;
        }
        (u64::from(base_ms) * 10 / u64::from(mul)) as u32
    }

    pub fn hunger_interval(&self, base_ms: u32) -> u32 {
        Self::scaled_interval(base_ms, self.hunger_decay_mul)
    }

    pub fn happy_interval(&self, base_ms: u32) -> u32 {
        Self::scaled_interval(base_ms, self.happy_decay_mul)
    }
}

const fn def(
    id: CharacterId,
    name: &'static str,
    display_name: &'static str,
    stage: LifeStage,
    base_weight: u8,
    bed_hour: u8,
    wake_hour: u8,
    hunger_decay_mul: u8,
    happy_decay_mul: u8,
) -> CharacterDef {
    CharacterDef {
        id,
        name,
        display_name,
        stage,
        base_weight,
        sleep: SleepSchedule {
            bed_hour,
            wake_hour,
        },
        hunger_decay_mul,
        happy_decay_mul,
    }
}

// Indexed by `CharacterId as usize`.
static CHARACTERS: [CharacterDef; 14] = [
    def(CharacterId::None, "", "", LifeStage::Egg, 0, 0, 0, 10, 10),
    def(CharacterId::Egg, "Egg", "Tamago", LifeStage::Egg, 0, 0, 0, 0, 0),
    def(CharacterId::Baby, "Baby", "Bebi", LifeStage::Baby, 5, 20, 9, 10, 10),
    def(CharacterId::Chibi, "Chibi", "Chibi", LifeStage::Child, 10, 21, 9, 10, 10),
    def(CharacterId::Junior, "Junior", "Jr.", LifeStage::Teen, 20, 22, 9, 12, 10),
    def(CharacterId::Cardboard, "Cardboard", "Danbo", LifeStage::Teen, 20, 22, 10, 15, 12),
    def(CharacterId::Circuit, "Circuit", "Circuit", LifeStage::Adult, 30, 22, 9, 10, 8),
    def(CharacterId::Rover, "Rover", "Rover", LifeStage::Adult, 30, 22, 9, 12, 10),
    def(CharacterId::Tinker, "Tinker", "Tinker", LifeStage::Adult, 30, 22, 9, 14, 12),
    def(CharacterId::Rex, "Rex", "Rex", LifeStage::Adult, 35, 23, 10, 12, 10),
    def(CharacterId::Propeller, "Propeller", "Pera", LifeStage::Adult, 35, 23, 11, 14, 14),
    def(CharacterId::Atom, "Atom", "Atom", LifeStage::Adult, 40, 23, 11, 16, 16),
    def(CharacterId::Armature, "Armature", "Arm", LifeStage::Adult, 25, 22, 9, 8, 6),
    def(CharacterId::Ghost, "Ghost", "Ghost", LifeStage::Dead, 0, 0, 0, 0, 0),
];

pub fn lookup(id: CharacterId) -> &'static CharacterDef {
    lookup_index(id as u8)
}

/// Lookup by raw table index. Out-of-range indices resolve to the sentinel
/// entry at index 0.
pub fn lookup_index(index: u8) -> &'static CharacterDef {
    CHARACTERS
        .get(usize::from(index))
        .unwrap_or(&CHARACTERS[0])
}

pub fn all() -> &'static [CharacterDef] {
    &CHARACTERS
}

/// How a form picks its successor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Always(CharacterId),
    /// `good` while stage care mistakes stay at or below `max_mistakes`.
    ByCareMistakes {
        max_mistakes: u8,
        good: CharacterId,
        bad: CharacterId,
    },
    /// Discipline ≥ 75 → `best`, ≥ 50 → `mid`, otherwise `worst`.
    ByDiscipline {
        best: CharacterId,
        mid: CharacterId,
        worst: CharacterId,
    },
}

pub const BEST_DISCIPLINE: u8 = 75;
pub const MID_DISCIPLINE: u8 = 50;

static EVOLUTIONS: [(CharacterId, Transition); 4] = [
    (CharacterId::Baby, Transition::Always(CharacterId::Chibi)),
    (
        CharacterId::Chibi,
        Transition::ByCareMistakes {
            max_mistakes: 1,
            good: CharacterId::Junior,
            bad: CharacterId::Cardboard,
        },
    ),
    (
        CharacterId::Junior,
        Transition::ByDiscipline {
            best: CharacterId::Circuit,
            mid: CharacterId::Rover,
            worst: CharacterId::Tinker,
        },
    ),
    (
        CharacterId::Cardboard,
        Transition::ByDiscipline {
            best: CharacterId::Rex,
            mid: CharacterId::Propeller,
            worst: CharacterId::Atom,
        },
    ),
];

impl Transition {
    pub fn target(self, stage_care_mistakes: u8, discipline_pct: u8) -> CharacterId {
        match self {
            Transition::Always(id) => id,
            Transition::ByCareMistakes {
                max_mistakes,
                good,
                bad,
            } => {
                if stage_care_mistakes <= max_mistakes {
                    good
                } else {
                    bad
                }
            }
            Transition::ByDiscipline { best, mid, worst } => {
                if discipline_pct >= BEST_DISCIPLINE {
                    best
                } else if discipline_pct >= MID_DISCIPLINE {
                    mid
                } else {
                    worst
                }
            }
        }
    }
}

pub fn transition_for(current: CharacterId) -> Option<Transition> {
    EVOLUTIONS
        .iter()
        .find(|(from, _)| *from == current)
        .map(|(_, t)| *t)
}

/// Next form for `current`, or [`CharacterId::None`] when it does not evolve
/// through the regular table.
pub fn resolve_evolution(
    current: CharacterId,
    stage_care_mistakes: u8,
    discipline_pct: u8,
) -> CharacterId {
    transition_for(current)
        .map(|t| t.target(stage_care_mistakes, discipline_pct))
        .unwrap_or(CharacterId::None)
}

pub const SECRET_FROM: CharacterId = CharacterId::Circuit;
pub const SECRET_FORM: CharacterId = CharacterId::Armature;

pub fn is_secret_eligible(
    lifetime_care_mistakes: u16,
    current: CharacterId,
    age: u16,
    secret_age: u16,
) -> bool {
    lifetime_care_mistakes == 0 && current == SECRET_FROM && age >= secret_age
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_AGE: u16 = 10;

    #[test]
    fn table_is_indexed_by_id() {
        for (i, d) in all().iter().enumerate() {
            assert_eq!(d.id as usize, i);
        }
        assert_eq!(lookup(CharacterId::Ghost).stage, LifeStage::Dead);
    }

    #[test]
    fn unknown_index_falls_back_to_sentinel() {
        assert_eq!(lookup_index(200).id, CharacterId::None);
        assert_eq!(lookup_index(14).id, CharacterId::None);
        assert_eq!(lookup_index(2).id, CharacterId::Baby);
    }

    #[test]
    fn child_branches_on_care_mistakes() {
        assert_eq!(resolve_evolution(CharacterId::Chibi, 0, 0), CharacterId::Junior);
        assert_eq!(resolve_evolution(CharacterId::Chibi, 1, 0), CharacterId::Junior);
        assert_eq!(resolve_evolution(CharacterId::Chibi, 2, 100), CharacterId::Cardboard);
    }

    #[test]
    fn teens_branch_on_discipline() {
        assert_eq!(resolve_evolution(CharacterId::Junior, 9, 80), CharacterId::Circuit);
        assert_eq!(resolve_evolution(CharacterId::Junior, 0, 75), CharacterId::Circuit);
        assert_eq!(resolve_evolution(CharacterId::Junior, 0, 60), CharacterId::Rover);
        assert_eq!(resolve_evolution(CharacterId::Junior, 0, 10), CharacterId::Tinker);
        assert_eq!(resolve_evolution(CharacterId::Cardboard, 0, 90), CharacterId::Rex);
        assert_eq!(resolve_evolution(CharacterId::Cardboard, 0, 50), CharacterId::Propeller);
        assert_eq!(resolve_evolution(CharacterId::Cardboard, 0, 49), CharacterId::Atom);
    }

    #[test]
    fn terminal_forms_do_not_evolve() {
        assert_eq!(resolve_evolution(CharacterId::Baby, 4, 0), CharacterId::Chibi);
        for id in [
            CharacterId::None,
            CharacterId::Egg,
            CharacterId::Circuit,
            CharacterId::Atom,
            CharacterId::Armature,
            CharacterId::Ghost,
        ] {
            assert_eq!(resolve_evolution(id, 0, 100), CharacterId::None);
        }
    }

    #[test]
    fn secret_needs_clean_record_best_form_and_age() {
        assert!(is_secret_eligible(0, CharacterId::Circuit, 10, SECRET_AGE));
        assert!(!is_secret_eligible(1, CharacterId::Circuit, 10, SECRET_AGE));
        assert!(!is_secret_eligible(0, CharacterId::Rover, 10, SECRET_AGE));
        assert!(!is_secret_eligible(0, CharacterId::Circuit, 9, SECRET_AGE));
    }

    #[test]
    fn overnight_schedule_wraps_midnight() {
        let s = SleepSchedule {
            bed_hour: 22,
            wake_hour: 9,
        };
        assert!(s.is_sleep_hour(23));
        assert!(s.is_sleep_hour(0));
        assert!(s.is_sleep_hour(8));
        assert!(!s.is_sleep_hour(9));
        assert!(!s.is_sleep_hour(21));

        let egg = lookup(CharacterId::Egg).sleep;
        assert!(!egg.is_sleep_hour(3));
    }

    #[test]
    fn decay_multiplier_scales_interval() {
        assert_eq!(CharacterDef::scaled_interval(60_000, 10), 60_000);
        assert_eq!(CharacterDef::scaled_interval(60_000, 15), 40_000);
        assert_eq!(CharacterDef::scaled_interval(60_000, 8), 75_000);
        assert_eq!(CharacterDef::scaled_interval(60_000, 0), 60_000);
    }
}
