/// One abstract button for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Button {
    pub pressed: bool,
    /// Still down past the hold threshold.
    pub held: bool,
}

/// The three-button surface the session reads each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons {
    pub left: Button,
    pub center: Button,
    pub right: Button,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VButton {
    Left,
    Center,
    Right,
}

impl Buttons {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn press(b: VButton) -> Self {
        let mut out = Self::default();
        out.slot_mut(b).pressed = true;
        out
    }

    pub fn slot_mut(&mut self, b: VButton) -> &mut Button {
        match b {
            VButton::Left => &mut self.left,
            VButton::Center => &mut self.center,
            VButton::Right => &mut self.right,
        }
    }

    pub fn was_pressed(&self, b: VButton) -> bool {
        match b {
            VButton::Left => self.left.pressed,
            VButton::Center => self.center.pressed,
            VButton::Right => self.right.pressed,
        }
    }

    pub fn was_held(&self, b: VButton) -> bool {
        match b {
            VButton::Left => self.left.held,
            VButton::Center => self.center.held,
            VButton::Right => self.right.held,
        }
    }

    pub fn any_pressed(&self) -> bool {
        self.left.pressed || self.center.pressed || self.right.pressed
    }
}
