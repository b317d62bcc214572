/// Named cues the session asks the audio collaborator to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    ButtonPress,
    Feed,
    Happy,
    Sad,
    Attention,
    GameWin,
    GameLose,
    Discipline,
    Evolution,
    Hatch,
    Death,
    Medicine,
}

impl SoundEffect {
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::ButtonPress => "button_press",
            SoundEffect::Feed => "feed",
            SoundEffect::Happy => "happy",
            SoundEffect::Sad => "sad",
            SoundEffect::Attention => "attention",
            SoundEffect::GameWin => "game_win",
            SoundEffect::GameLose => "game_lose",
            SoundEffect::Discipline => "discipline",
            SoundEffect::Evolution => "evolution",
            SoundEffect::Hatch => "hatch",
            SoundEffect::Death => "death",
            SoundEffect::Medicine => "medicine",
        }
    }

    /// Cues loud enough to be worth a terminal bell.
    pub fn is_alert(self) -> bool {
        matches!(
            self,
            SoundEffect::Attention | SoundEffect::Evolution | SoundEffect::Hatch | SoundEffect::Death
        )
    }
}
