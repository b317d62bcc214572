use pocketpet::character::{self, CharacterId, LifeStage};
use pocketpet::clock::Millis;
use pocketpet::dice::{Dice, ScriptedDice, SeededDice};
use pocketpet::model::{
    Attention, PetState, Rules, MAX_DISCIPLINE, MAX_HAPPY, MAX_HUNGER, MAX_POOP, MAX_WEIGHT,
    MIN_WEIGHT,
};
use pocketpet::sim::{PetAction, PetSimulation};

const MIN: u32 = 60 * 1000;

const ACTIONS: [PetAction; 9] = [
    PetAction::FeedMeal,
    PetAction::FeedSnack,
    PetAction::StartGame,
    PetAction::GameWon,
    PetAction::GameLost,
    PetAction::Discipline,
    PetAction::Medicine,
    PetAction::Clean,
    PetAction::ToggleLight,
];

fn assert_invariants(p: &PetState) {
    assert!(p.hunger <= MAX_HUNGER, "hunger {}", p.hunger);
    assert!(p.happiness <= MAX_HAPPY, "happiness {}", p.happiness);
    assert!(p.discipline <= MAX_DISCIPLINE, "discipline {}", p.discipline);
    assert!((MIN_WEIGHT..=MAX_WEIGHT).contains(&p.weight), "weight {}", p.weight);
    assert!(p.poop_count <= MAX_POOP, "poop {}", p.poop_count);
    if p.dead {
        assert_eq!(p.character, CharacterId::Ghost);
        assert_eq!(p.stage, LifeStage::Dead);
    }
}

#[test]
fn random_care_keeps_every_stat_in_range() {
    for seed in 0..8u64 {
        let mut sim = PetSimulation::new(Rules::default(), Box::new(SeededDice::from_seed(seed)));
        let mut player = SeededDice::from_seed(seed + 100);
        sim.init_new_egg(Millis(0));

        let mut now = Millis(0);
        for step in 0..15_000u32 {
            now = now.plus(MIN);
            let hour = ((12 + step / 60) % 24) as u8;
            sim.update(now, hour);
            if sim.is_evolving() {
                sim.do_evolve(now);
            }
            if player.chance(1, 4) {
                let action = ACTIONS[player.below(ACTIONS.len() as u32) as usize];
                sim.apply(action);
            }
            assert_invariants(sim.state());
            if sim.state().dead {
                break;
            }
        }
    }
}

#[test]
fn a_well_kept_pet_grows_up_along_the_table() {
    let mut sim = PetSimulation::new(Rules::default(), Box::new(ScriptedDice::always(5)));
    sim.init_new_egg(Millis(0));
    let mut seen = vec![sim.state().character];

    let mut now = Millis(0);
    for _ in 0..(12 * 60) {
        now = now.plus(MIN);
        sim.update(now, 12);
        if sim.is_evolving() {
            sim.do_evolve(now);
            seen.push(sim.state().character);
        }
        // Keep every need met.
        sim.apply(PetAction::FeedMeal);
        sim.apply(PetAction::FeedSnack);
        sim.apply(PetAction::Clean);
        sim.apply(PetAction::Discipline);
        sim.apply(PetAction::Medicine);
    }

    assert_eq!(
        &seen[..4],
        &[CharacterId::Egg, CharacterId::Baby, CharacterId::Chibi, CharacterId::Junior]
    );
    assert_eq!(sim.state().stage, LifeStage::Adult);
    assert_eq!(sim.state().total_care_mistakes, 0);
    assert!(!sim.state().dead);
}

#[test]
fn resolved_targets_match_their_stage() {
    for def in character::all() {
        if let Some(t) = character::transition_for(def.id) {
            for mistakes in [0u8, 1, 2, 5] {
                for discipline in [0u8, 49, 50, 74, 75, 100] {
                    let next = t.target(mistakes, discipline);
                    assert!(character::lookup(next).stage > def.stage);
                }
            }
        }
    }
}

#[test]
fn hungry_attention_times_out_once() {
    let mut p = PetState::new_egg(Millis(0));
    p.character = CharacterId::Junior;
    p.stage = LifeStage::Teen;
    p.hunger = 0;
    p.attention = Attention::Hungry;
    let mut sim = PetSimulation::new(Rules::default(), Box::new(ScriptedDice::always(5)));
    sim.load_from_save(p);

    sim.update(Millis(15 * MIN - 1), 12);
    assert_eq!(sim.state().care_mistakes, 0);
    sim.update(Millis(15 * MIN), 12);
    assert_eq!(sim.state().care_mistakes, 1);
    assert_eq!(sim.state().total_care_mistakes, 1);
    sim.update(Millis(16 * MIN), 12);
    assert_eq!(sim.state().care_mistakes, 1);
}
