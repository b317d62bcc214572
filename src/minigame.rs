use crate::clock::Millis;
use crate::dice::Dice;

pub const ROUNDS: u8 = 5;
pub const WINS_NEEDED: u8 = 3;
pub const RESULT_DWELL_MS: u32 = 1200;
const LOW: u32 = 1;
const HIGH: u32 = 9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Guess {
    #[default]
    Higher,
    Lower,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundResult {
    #[default]
    Pending,
    Correct,
    Wrong,
}

/// Higher-or-lower over five rounds against a hidden next number.
#[derive(Clone, Debug, Default)]
pub struct MiniGame {
    round: u8,
    wins: u8,
    current: u8,
    next: u8,
    last_result: RoundResult,
    showing_result: bool,
    finished: bool,
    result_shown_at: Millis,
}

impl MiniGame {
    pub fn start(&mut self, dice: &mut dyn Dice) {
        *self = Self {
            round: 1,
            current: dice.between(LOW, HIGH) as u8,
            ..Self::default()
        };
        self.draw_next(dice);
    }

    fn draw_next(&mut self, dice: &mut dyn Dice) {
        let mut next = dice.between(LOW, HIGH) as u8;
        while next == self.current {
            next = dice.between(LOW, HIGH) as u8;
        }
        self.next = next;
    }

    /// Ignored while a result is on screen or after the last round.
    pub fn guess(&mut self, guess: Guess, now: Millis) {
        if self.showing_result || self.finished {
            return;
        }
        let correct = match guess {
            Guess::Higher => self.next > self.current,
            Guess::Lower => self.next < self.current,
        };
        if correct {
            self.wins += 1;
            self.last_result = RoundResult::Correct;
        } else {
            self.last_result = RoundResult::Wrong;
        }
        self.showing_result = true;
        self.result_shown_at = now;
    }

    /// Moves to the next round once the result has been shown long enough.
    pub fn update(&mut self, now: Millis, dice: &mut dyn Dice) {
        if self.showing_result && now.since(self.result_shown_at) > RESULT_DWELL_MS {
            self.advance_round(dice);
        }
    }

    fn advance_round(&mut self, dice: &mut dyn Dice) {
        self.current = self.next;
        self.last_result = RoundResult::Pending;
        self.showing_result = false;
        self.round += 1;
        if self.round > ROUNDS {
            self.finished = true;
        } else {
            self.draw_next(dice);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_win(&self) -> bool {
        self.wins >= WINS_NEEDED
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn current_number(&self) -> u8 {
        self.current
    }

    /// The number being guessed at. Only meant for display once revealed.
    pub fn revealed_number(&self) -> Option<u8> {
        self.showing_result.then_some(self.next)
    }

    pub fn wins(&self) -> u8 {
        self.wins
    }

    pub fn last_result(&self) -> RoundResult {
        self.last_result
    }

    pub fn showing_result(&self) -> bool {
        self.showing_result
    }

    #[cfg(test)]
    fn hidden(&self) -> u8 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedDice, SeededDice};

    fn play_out(
        game: &mut MiniGame,
        dice: &mut dyn Dice,
        pick: impl Fn(&MiniGame) -> Guess,
    ) -> u8 {
        let mut now = Millis(0);
        let mut rounds = 0;
        while !game.is_finished() {
            let g = pick(game);
            game.guess(g, now);
            rounds += 1;
            now = now.plus(RESULT_DWELL_MS + 1);
            game.update(now, dice);
        }
        rounds
    }

    #[test]
    fn hidden_number_never_repeats_current() {
        // Redraws 5 twice before settling on 7.
        let mut dice = ScriptedDice::new([4, 4, 4, 6]);
        let mut game = MiniGame::default();
        game.start(&mut dice);
        assert_eq!(game.current_number(), 5);
        assert_eq!(game.hidden(), 7);

        let mut dice = SeededDice::from_seed(11);
        for _ in 0..50 {
            game.start(&mut dice);
            while !game.is_finished() {
                assert_ne!(game.hidden(), game.current_number());
                assert!((1..=9).contains(&game.hidden()));
                game.guess(Guess::Higher, Millis(0));
                game.update(Millis(RESULT_DWELL_MS + 1), &mut dice);
            }
        }
    }

    #[test]
    fn perfect_player_wins_in_five_rounds() {
        let mut dice = SeededDice::from_seed(5);
        let mut game = MiniGame::default();
        game.start(&mut dice);
        let rounds = play_out(&mut game, &mut dice, |g| {
            if g.hidden() > g.current_number() {
                Guess::Higher
            } else {
                Guess::Lower
            }
        });
        assert_eq!(rounds, 5);
        assert_eq!(game.wins(), 5);
        assert!(game.is_win());
    }

    #[test]
    fn two_correct_guesses_lose() {
        let mut dice = SeededDice::from_seed(9);
        let mut game = MiniGame::default();
        game.start(&mut dice);
        let rounds = play_out(&mut game, &mut dice, |g| {
            let right = if g.hidden() > g.current_number() {
                Guess::Higher
            } else {
                Guess::Lower
            };
            let wrong = if right == Guess::Higher {
                Guess::Lower
            } else {
                Guess::Higher
            };
            if g.round() <= 2 {
                right
            } else {
                wrong
            }
        });
        assert_eq!(rounds, 5);
        assert_eq!(game.wins(), 2);
        assert!(!game.is_win());
    }

    #[test]
    fn result_dwell_blocks_input_and_advance() {
        let mut dice = ScriptedDice::new([0, 8]); // current 1, next 9
        let mut game = MiniGame::default();
        game.start(&mut dice);
        game.guess(Guess::Higher, Millis(100));
        assert_eq!(game.last_result(), RoundResult::Correct);
        assert_eq!(game.revealed_number(), Some(9));

        game.guess(Guess::Lower, Millis(150));
        assert_eq!(game.wins(), 1);

        game.update(Millis(100 + RESULT_DWELL_MS), &mut dice);
        assert!(game.showing_result());
        game.update(Millis(101 + RESULT_DWELL_MS), &mut dice);
        assert!(!game.showing_result());
        assert_eq!(game.round(), 2);
        assert_eq!(game.current_number(), 9);
        assert_eq!(game.revealed_number(), None);
    }
}
