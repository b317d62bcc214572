//! Screen routing for one play session.
//!
//! [`Session`] owns every component (pet, mini-game, menu, save slot) and is
//! driven by [`Session::tick`] once per frame with the button state, the
//! current [`Millis`] reading and the hour of day.

use crate::character::{self, CharacterDef, CharacterId, LifeStage};
use crate::clock::{progress, Millis};
use crate::dice::Dice;
use crate::input::{Buttons, VButton};
use crate::menu::{FeedChoice, Menu, MenuItem};
use crate::minigame::{Guess, MiniGame};
use crate::model::{Attention, PetState, Rules};
use crate::sim::{PetAction, PetSimulation};
use crate::sound::SoundEffect;
use crate::storage::{self, KeyValueStore};
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Title,
    NewOrContinue,
    EggHatching,
    Gameplay,
    FeedMenu,
    Minigame,
    Evolution,
    Sleeping,
    StatScreen,
    DeathScreen,
}

impl Screen {
    /// Screens during which the pet keeps living and gets autosaved.
    pub fn autosaves(self) -> bool {
        matches!(self, Screen::Gameplay | Screen::Sleeping | Screen::FeedMenu)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartChoice {
    New,
    #[default]
    Continue,
}

/// What the evolution screen shows.
#[derive(Clone, Copy, Debug)]
pub struct EvolutionView {
    pub from: &'static CharacterDef,
    pub to: &'static CharacterDef,
    pub progress: f32,
}

pub struct Session {
    screen: Screen,
    previous: Screen,
    sim: PetSimulation,
    menu: Menu,
    game: MiniGame,
    game_dice: Box<dyn Dice>,
    store: Box<dyn KeyValueStore>,
    start_choice: StartChoice,
    evo_from: CharacterId,
    evo_start: Millis,
    last_save: Millis,
    sounds: Vec<SoundEffect>,
}

impl Session {
    /// `sim_dice` drives the pet's chance rolls, `game_dice` the mini-game.
    pub fn new(
        rules: Rules,
        sim_dice: Box<dyn Dice>,
        game_dice: Box<dyn Dice>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            screen: Screen::Title,
            previous: Screen::Title,
            sim: PetSimulation::new(rules, sim_dice),
            menu: Menu::default(),
            game: MiniGame::default(),
            game_dice,
            store,
            start_choice: StartChoice::default(),
            evo_from: CharacterId::None,
            evo_start: Millis::ZERO,
            last_save: Millis::ZERO,
            sounds: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn previous_screen(&self) -> Screen {
        self.previous
    }

    pub fn pet(&self) -> &PetState {
        self.sim.state()
    }

    pub fn character(&self) -> &'static CharacterDef {
        character::lookup(self.sim.state().character)
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn minigame(&self) -> &MiniGame {
        &self.game
    }

    pub fn start_choice(&self) -> StartChoice {
        self.start_choice
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn hatch_progress(&self, now: Millis) -> f32 {
        let pet = self.sim.state();
        progress(now, pet.stage_start, self.sim.rules().egg_hatch_ms)
    }

    pub fn evolution_view(&self, now: Millis) -> EvolutionView {
        EvolutionView {
            from: character::lookup(self.evo_from),
            to: self.character(),
            progress: progress(now, self.evo_start, self.sim.rules().evolution_anim_ms),
        }
    }

    /// Sound cues queued since the last drain, oldest first.
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }

    /// Persist the pet if a game is in progress. Used on shutdown.
    pub fn save_if_active(&mut self, now: Millis) {
        let active = !matches!(self.screen, Screen::Title | Screen::NewOrContinue);
        if active {
            self.save(now);
        }
    }

    pub fn tick(&mut self, input: &Buttons, now: Millis, hour: u8) {
        match self.screen {
            Screen::Title => self.on_title(input, now),
            Screen::NewOrContinue => self.on_new_or_continue(input, now),
            Screen::EggHatching => self.on_egg(now, hour),
            Screen::Gameplay => self.on_gameplay(input, now, hour),
            Screen::FeedMenu => self.on_feed_menu(input, now, hour),
            Screen::Minigame => self.on_minigame(input, now),
            Screen::Evolution => self.on_evolution(input, now),
            Screen::Sleeping => self.on_sleeping(input, now, hour),
            Screen::StatScreen => {
                if input.any_pressed() {
                    self.play(SoundEffect::ButtonPress);
                    self.go(Screen::Gameplay);
                }
            }
            Screen::DeathScreen => {
                if input.any_pressed() {
                    self.play(SoundEffect::ButtonPress);
                    storage::report(storage::clear_save(self.store.as_mut()));
                    self.go(Screen::Title);
                }
            }
        }

        if self.screen.autosaves()
            && now.since(self.last_save) > self.sim.rules().autosave_interval_ms
        {
            self.save(now);
        }
    }

    fn go(&mut self, to: Screen) {
        if to != self.screen {
            debug!(from = ?self.screen, to = ?to, "screen");
            self.previous = self.screen;
            self.screen = to;
        }
    }

    fn play(&mut self, effect: SoundEffect) {
        self.sounds.push(effect);
    }

    fn save(&mut self, now: Millis) {
        storage::report(storage::save_game(self.store.as_mut(), self.sim.state(), now));
        self.last_save = now;
    }

    fn start_new_egg(&mut self, now: Millis) {
        self.sim.init_new_egg(now);
        self.menu = Menu::default();
        self.last_save = now;
        self.go(Screen::EggHatching);
    }

    fn on_title(&mut self, input: &Buttons, now: Millis) {
        if !input.any_pressed() {
            return;
        }
        self.play(SoundEffect::ButtonPress);
        if storage::has_save(self.store.as_ref()) {
            self.start_choice = StartChoice::Continue;
            self.go(Screen::NewOrContinue);
        } else {
            self.start_new_egg(now);
        }
    }

    fn on_new_or_continue(&mut self, input: &Buttons, now: Millis) {
        if input.was_pressed(VButton::Left) || input.was_pressed(VButton::Right) {
            self.start_choice = match self.start_choice {
                StartChoice::New => StartChoice::Continue,
                StartChoice::Continue => StartChoice::New,
            };
            self.play(SoundEffect::ButtonPress);
            return;
        }
        if !input.was_pressed(VButton::Center) {
            return;
        }
        self.play(SoundEffect::ButtonPress);
        match self.start_choice {
            StartChoice::New => {
                storage::report(storage::clear_save(self.store.as_mut()));
                self.start_new_egg(now);
            }
            StartChoice::Continue => self.continue_saved(now),
        }
    }

    fn continue_saved(&mut self, now: Millis) {
        match storage::load_game(self.store.as_ref(), now) {
            Ok(pet) => {
                self.sim.load_from_save(pet);
                self.menu = Menu::default();
                self.last_save = now;
                let pet = self.sim.state();
                let next = if pet.dead {
                    Screen::DeathScreen
                } else if pet.stage == LifeStage::Egg {
                    Screen::EggHatching
                } else if pet.asleep {
                    Screen::Sleeping
                } else {
                    Screen::Gameplay
                };
                self.go(next);
            }
            Err(e) => {
                warn!(error = %e, "no usable save, starting over");
                self.start_new_egg(now);
            }
        }
    }

    fn on_egg(&mut self, now: Millis, hour: u8) {
        self.sim.update(now, hour);
        if self.sim.is_evolving() {
            self.play(SoundEffect::Hatch);
            self.begin_evolution(now);
        }
    }

    fn begin_evolution(&mut self, now: Millis) {
        self.evo_from = self.sim.state().character;
        self.sim.do_evolve(now);
        self.evo_start = now;
        info!(from = ?self.evo_from, to = ?self.sim.state().character, "evolution");
        self.go(Screen::Evolution);
    }

    /// Returns true when the pet died this tick.
    fn check_death(&mut self, now: Millis) -> bool {
        if !self.sim.state().dead {
            return false;
        }
        self.play(SoundEffect::Death);
        self.menu.close();
        self.save(now);
        self.go(Screen::DeathScreen);
        true
    }

    fn on_gameplay(&mut self, input: &Buttons, now: Millis, hour: u8) {
        let before = self.sim.state().attention;
        self.sim.update(now, hour);
        if self.check_death(now) {
            return;
        }
        if self.sim.is_evolving() {
            self.play(SoundEffect::Evolution);
            self.begin_evolution(now);
            return;
        }
        if self.sim.state().asleep {
            self.go(Screen::Sleeping);
            return;
        }
        let after = self.sim.state().attention;
        if before == Attention::None && after != Attention::None {
            self.play(SoundEffect::Attention);
        }

        if steps(input, VButton::Left) {
            self.menu.move_cursor(-1);
            self.play(SoundEffect::ButtonPress);
        }
        if steps(input, VButton::Right) {
            self.menu.move_cursor(1);
            self.play(SoundEffect::ButtonPress);
        }
        if input.was_pressed(VButton::Center) {
            self.activate(self.menu.current_item());
        }
    }

    fn activate(&mut self, item: MenuItem) {
        match item {
            MenuItem::Feed => {
                self.play(SoundEffect::ButtonPress);
                self.menu.open();
                self.go(Screen::FeedMenu);
            }
            MenuItem::Light => {
                let effect = if self.sim.apply(PetAction::ToggleLight) {
                    SoundEffect::Happy
                } else {
                    SoundEffect::ButtonPress
                };
                self.play(effect);
            }
            MenuItem::Play => {
                if self.sim.apply(PetAction::StartGame) {
                    self.play(SoundEffect::ButtonPress);
                    self.game.start(self.game_dice.as_mut());
                    self.go(Screen::Minigame);
                } else {
                    self.play(SoundEffect::Sad);
                }
            }
            MenuItem::Medicine => self.act(PetAction::Medicine, SoundEffect::Medicine),
            MenuItem::Clean => self.act(PetAction::Clean, SoundEffect::Happy),
            MenuItem::Status => {
                self.play(SoundEffect::ButtonPress);
                self.go(Screen::StatScreen);
            }
            MenuItem::Discipline => self.act(PetAction::Discipline, SoundEffect::Discipline),
        }
    }

    fn act(&mut self, action: PetAction, success: SoundEffect) {
        let effect = if self.sim.apply(action) {
            success
        } else {
            SoundEffect::Sad
        };
        self.play(effect);
    }

    fn on_feed_menu(&mut self, input: &Buttons, now: Millis, hour: u8) {
        self.sim.update(now, hour);
        if self.check_death(now) {
            return;
        }
        if steps(input, VButton::Left) {
            self.menu.move_sub_cursor(-1);
            self.play(SoundEffect::ButtonPress);
        }
        if steps(input, VButton::Right) {
            self.menu.move_sub_cursor(1);
            self.play(SoundEffect::ButtonPress);
        }
        if input.was_pressed(VButton::Center) {
            match self.menu.feed_choice() {
                FeedChoice::Meal => self.act(PetAction::FeedMeal, SoundEffect::Feed),
                FeedChoice::Snack => self.act(PetAction::FeedSnack, SoundEffect::Feed),
                FeedChoice::Cancel => self.play(SoundEffect::ButtonPress),
            }
            self.menu.close();
            self.go(Screen::Gameplay);
        }
    }

    fn on_minigame(&mut self, input: &Buttons, now: Millis) {
        self.game.update(now, self.game_dice.as_mut());
        if self.game.is_finished() {
            if self.game.is_win() {
                self.sim.apply(PetAction::GameWon);
                self.play(SoundEffect::GameWin);
            } else {
                self.sim.apply(PetAction::GameLost);
                self.play(SoundEffect::GameLose);
            }
            info!(wins = self.game.wins(), "mini-game over");
            self.go(Screen::Gameplay);
            return;
        }
        if self.game.showing_result() {
            return;
        }
        if input.was_pressed(VButton::Left) {
            self.game.guess(Guess::Higher, now);
            self.play(SoundEffect::ButtonPress);
        } else if input.was_pressed(VButton::Right) {
            self.game.guess(Guess::Lower, now);
            self.play(SoundEffect::ButtonPress);
        } else if input.was_pressed(VButton::Center) {
            self.sim.apply(PetAction::GameLost);
            self.play(SoundEffect::GameLose);
            info!("mini-game abandoned");
            self.go(Screen::Gameplay);
        }
    }

    fn on_evolution(&mut self, input: &Buttons, now: Millis) {
        let done = now.has_elapsed(self.evo_start, self.sim.rules().evolution_anim_ms);
        if done && input.any_pressed() {
            self.play(SoundEffect::ButtonPress);
            self.go(Screen::Gameplay);
        }
    }

    fn on_sleeping(&mut self, input: &Buttons, now: Millis, hour: u8) {
        self.sim.update(now, hour);
        if self.check_death(now) {
            return;
        }
        if !self.sim.state().asleep {
            self.play(SoundEffect::Happy);
            self.go(Screen::Gameplay);
            return;
        }
        if input.was_pressed(VButton::Center) {
            self.sim.apply(PetAction::ToggleLight);
            self.play(SoundEffect::ButtonPress);
        }
    }
}

/// Cursor buttons repeat while held.
fn steps(input: &Buttons, b: VButton) -> bool {
    input.was_pressed(b) || input.was_held(b)
}
