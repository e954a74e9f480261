use std::env;
use std::error::Error;
use std::fs;
use std::time::Duration;

use chip8vm::display::{Display, MonoTermDisplay};
use chip8vm::input::{Input, StdinInput};
use chip8vm::sound::{Mute, Sound};
use chip8vm::Interpreter;

/// instruction batch per frame; ~540 instructions/second at 60 frames
const STEPS_PER_FRAME: usize = 9;
const FRAME: Duration = Duration::from_micros(16_667);

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args().nth(1).ok_or("usage: chip8vm <rom>")?;
    let image = fs::read(&path)?;

    let mut display = MonoTermDisplay::chip8()?;
    let mut input = StdinInput::new();
    let mut sound = Mute::new();

    let mut interpreter = Interpreter::new();
    interpreter.load(&image)?;

    let sleeper = spin_sleep::SpinSleeper::default();
    loop {
        interpreter.set_keys(input.poll_keys()?);
        if input.quit_requested() {
            break;
        }

        let mut beep_now = false;
        for _ in 0..STEPS_PER_FRAME {
            let step = interpreter.step()?;
            beep_now |= step.beep;
            if step.waiting_for_key {
                // nothing moves until a key arrives; go render and re-poll
                break;
            }
        }
        if beep_now {
            sound.beep()?;
        } else {
            sound.stop()?;
        }

        if interpreter.draw_pending() {
            display.draw(interpreter.framebuffer())?;
            interpreter.clear_draw_flag();
        }

        sleeper.sleep(FRAME);
    }

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..12 {
        println!();
    }
    Ok(())
}
