#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Feed,
    Light,
    Play,
    Medicine,
    Clean,
    Status,
    Discipline,
}

impl MenuItem {
    pub const ALL: [MenuItem; 7] = [
        MenuItem::Feed,
        MenuItem::Light,
        MenuItem::Play,
        MenuItem::Medicine,
        MenuItem::Clean,
        MenuItem::Status,
        MenuItem::Discipline,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Feed => "Feed",
            MenuItem::Light => "Light",
            MenuItem::Play => "Play",
            MenuItem::Medicine => "Medicine",
            MenuItem::Clean => "Clean",
            MenuItem::Status => "Status",
            MenuItem::Discipline => "Discipline",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedChoice {
    Meal,
    Snack,
    Cancel,
}

impl FeedChoice {
    pub const ALL: [FeedChoice; 3] = [FeedChoice::Meal, FeedChoice::Snack, FeedChoice::Cancel];

    pub fn label(self) -> &'static str {
        match self {
            FeedChoice::Meal => "Meal",
            FeedChoice::Snack => "Snack",
            FeedChoice::Cancel => "Cancel",
        }
    }
}

fn step(cursor: usize, len: usize, delta: i32) -> usize {
    let len = len as i32;
    (cursor as i32 + delta).rem_euclid(len) as usize
}

/// Icon-strip cursor plus the feed sub-menu cursor. Both wrap around.
#[derive(Clone, Debug, Default)]
pub struct Menu {
    cursor: usize,
    sub_cursor: usize,
    open: bool,
}

impl Menu {
    pub fn move_cursor(&mut self, delta: i32) {
        self.cursor = step(self.cursor, MenuItem::ALL.len(), delta);
    }

    pub fn current_item(&self) -> MenuItem {
        MenuItem::ALL[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn open(&mut self) {
        self.open = true;
        self.sub_cursor = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.sub_cursor = 0;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn move_sub_cursor(&mut self, delta: i32) {
        self.sub_cursor = step(self.sub_cursor, FeedChoice::ALL.len(), delta);
    }

    pub fn feed_choice(&self) -> FeedChoice {
        FeedChoice::ALL[self.sub_cursor]
    }

    pub fn sub_cursor(&self) -> usize {
        self.sub_cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_both_ways() {
        let mut m = Menu::default();
        assert_eq!(m.current_item(), MenuItem::Feed);
        m.move_cursor(-1);
        assert_eq!(m.current_item(), MenuItem::Discipline);
        m.move_cursor(1);
        m.move_cursor(1);
        assert_eq!(m.current_item(), MenuItem::Light);
    }

    #[test]
    fn feed_sub_menu_resets_on_open() {
        let mut m = Menu::default();
        m.open();
        m.move_sub_cursor(-1);
        assert_eq!(m.feed_choice(), FeedChoice::Cancel);
        m.move_sub_cursor(1);
        assert_eq!(m.feed_choice(), FeedChoice::Meal);
        m.move_sub_cursor(1);
        m.close();
        assert!(!m.is_open());
        m.open();
        assert_eq!(m.feed_choice(), FeedChoice::Meal);
    }
}
