use beep::beep;
use std::error::Error;

/// how the drive loop renders the interpreter's beep events as audio
pub trait Sound {
    fn beep(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
}

const SIMPLEBEEP_PITCH: u16 = 1760; // A

/// PC-speaker tone. Tracks whether it is already sounding so the drive
/// loop can call it once per frame without re-issuing the tone.
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        SimpleBeep::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        if !self.is_beeping {
            beep(SIMPLEBEEP_PITCH)?;
            self.is_beeping = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_beeping {
            beep(0)?;
            self.is_beeping = false;
        }
        Ok(())
    }
}

/// silent fallback for hosts without a speaker, and for tests
pub struct Mute {
    pub beeps: usize,
}

impl Mute {
    pub fn new() -> Self {
        Mute { beeps: 0 }
    }
}

impl Default for Mute {
    fn default() -> Self {
        Mute::new()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        self.beeps += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_counts_beeps() {
        let mut sound = Mute::new();
        sound.beep().unwrap();
        sound.stop().unwrap();
        sound.beep().unwrap();
        assert_eq!(sound.beeps, 2);
    }
}
