use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// hex keypad layout on the left-hand side of a qwerty keyboard
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals repeat key events while a key is held; treat a key as down for
/// this many polls after its last event
const HOLD_POLLS: u8 = 6;

/// Input produces the 16-entry pressed table the interpreter reads before
/// key-dependent opcodes. The table is a full snapshot; the interpreter
/// never sees individual events.
pub trait Input {
    fn poll_keys(&mut self) -> Result<[bool; 16], io::Error>;
}

/// reads the terminal keyboard through crossterm. Terminals deliver
/// presses but no releases, so each key stays "down" for a short hold
/// window refreshed by key-repeat events.
pub struct StdinInput {
    held: [u8; 16],
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl StdinInput {
    pub fn new() -> Self {
        terminal::enable_raw_mode().unwrap();
        StdinInput {
            held: [0; 16],
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            quit: false,
        }
    }

    /// the user asked to leave (Esc)
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn drain_events(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char(key) => {
                        if let Some(&mapped) = self.keymap.get(&key) {
                            self.held[mapped as usize] = HOLD_POLLS;
                        }
                    }
                    KeyCode::Esc => self.quit = true,
                    _ => {}
                },
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        StdinInput::new()
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        terminal::disable_raw_mode().unwrap();
    }
}

impl Input for StdinInput {
    fn poll_keys(&mut self) -> Result<[bool; 16], io::Error> {
        self.drain_events()?;
        let mut keys = [false; 16];
        for (key, hold) in self.held.iter_mut().enumerate() {
            if *hold > 0 {
                *hold -= 1;
                keys[key] = true;
            }
        }
        Ok(keys)
    }
}

/// dummy Input implementation for testing
pub struct DummyInput {
    keys: [bool; 16],
}

impl DummyInput {
    /// a table with the named keys held down
    pub fn new(down: &[u8]) -> Self {
        let mut keys = [false; 16];
        for &key in down {
            keys[(key & 0x0f) as usize] = true;
        }
        DummyInput { keys }
    }
}

impl Input for DummyInput {
    fn poll_keys(&mut self) -> Result<[bool; 16], io::Error> {
        Ok(self.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_all_sixteen_keys() {
        let map = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        let mut seen: Vec<u8> = map.values().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0x00..=0x0f).collect::<Vec<u8>>());
    }

    #[test]
    fn test_dummy_input_reports_requested_keys() {
        let mut input = DummyInput::new(&[0x1, 0xb]);
        let keys = input.poll_keys().unwrap();
        assert!(keys[0x1]);
        assert!(keys[0xb]);
        assert_eq!(keys.iter().filter(|&&down| down).count(), 2);
    }
}
