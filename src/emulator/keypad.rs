pub const NUM_KEYS: usize = 16;

/// The state of the hexadecimal keypad, keys `0x0..=0xF`.
/// Written by whoever handles input, and read by the emulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn press(&mut self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key, false);
    }

    /// Set the state of a key. Keys outside `0x0..=0xF` are ignored.
    pub fn set(&mut self, key: u8, down: bool) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = down;
        }
    }

    /// Whether a key is held down. Keys outside `0x0..=0xF` never are.
    pub fn is_down(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// The lowest numbered key that is held down, if any.
    pub fn first_down(&self) -> Option<u8> {
        self.keys.iter().position(|down| *down).map(|key| key as u8)
    }

    pub fn release_all(&mut self) {
        self.keys = [false; NUM_KEYS];
    }
}

impl From<[bool; NUM_KEYS]> for Keypad {
    fn from(keys: [bool; NUM_KEYS]) -> Self {
        Keypad { keys }
    }
}
