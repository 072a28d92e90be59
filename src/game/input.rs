use sdl2::keyboard::Keycode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonType {
    Left,
    Right,
    Up,
    Space,
}

impl ButtonType {
    const COUNT: usize = 4;

    pub fn from_keycode(key: Keycode) -> Option<Self> {
        match key {
            Keycode::Left => Some(Self::Left),
            Keycode::Right => Some(Self::Right),
            Keycode::Up => Some(Self::Up),
            Keycode::Space => Some(Self::Space),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Button {
    pub down: bool,
    /// State differs from the previous frame
    pub changed: bool,
}

/// Per-frame button state
#[derive(Debug, Clone, Default)]
pub struct Input {
    buttons: [Button; ButtonType::COUNT],
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame: nothing has changed yet
    pub fn begin_frame(&mut self) {
        for button in &mut self.buttons {
            button.changed = false;
        }
    }

    pub fn set(&mut self, button: ButtonType, down: bool) {
        let b = &mut self.buttons[button as usize];
        if b.down != down {
            b.down = down;
            b.changed = true;
        }
    }

    /// Forward a key event. Returns false for keys the game ignores.
    pub fn handle_key(&mut self, key: Keycode, down: bool) -> bool {
        match ButtonType::from_keycode(key) {
            Some(button) => {
                self.set(button, down);
                true
            },
            None => false,
        }
    }

    /// Release everything, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        for button in [ButtonType::Left, ButtonType::Right, ButtonType::Up, ButtonType::Space] {
            self.set(button, false);
        }
    }

    pub fn down(&self, button: ButtonType) -> bool {
        self.buttons[button as usize].down
    }

    pub fn pressed(&self, button: ButtonType) -> bool {
        let b = self.buttons[button as usize];
        b.down && b.changed
    }

    pub fn released(&self, button: ButtonType) -> bool {
        let b = self.buttons[button as usize];
        !b.down && b.changed
    }
}
