///
/// ## Design
///
/// * one owned `Interpreter` value holds the whole machine: RAM, registers,
///   call stack, timers, framebuffer, keypad
/// * `step()` is one fetch/decode/execute plus a timer tick; the drive loop
///   decides cadence, so instruction throughput stays decoupled from
///   display refresh
/// * decode up front into a typed `Instruction`, execute as one exhaustive
///   match; bad words surface as errors instead of vanishing in a default
///   branch
/// * faults (bad addresses, stack misuse, oversized images) come back as
///   `Error` values for the caller to handle; the interpreter never aborts
/// * display, input and sound sit behind traits so the terminal frontend
///   can be swapped out; each ships a dummy/mute stand-in for tests
///
/// Model
///
/// main (drive loop)
///  |-- display, input, sound
///  |-- interpreter
///  |    |-- load(image)
///  |    `-- step() -> { beep, waiting_for_key }
///  `-- each frame:
///       |-- keys = input.poll_keys(); interpreter.set_keys(keys)
///       |-- run a batch of steps
///       |-- beep/stop sound from what the steps reported
///       `-- if draw pending: display.draw(framebuffer); clear flag
pub mod display;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod sound;

pub use error::Error;
pub use instruction::Instruction;
pub use interpreter::{Interpreter, Step, DISPLAY_HEIGHT, DISPLAY_WIDTH, MAX_IMAGE_BYTES};
