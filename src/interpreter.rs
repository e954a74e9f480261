/// # interpreter
///
/// The machine proper: 4K of RAM with the font baked into low memory, the
/// sixteen V registers, the I address register, a 16-level call stack, the
/// two countdown timers, the 64x32 cell framebuffer and the keypad table.
/// One `step()` is one fetch/decode/execute cycle plus a timer tick.
///
/// The machine is an owned value; nothing here is process-global. Display,
/// input and sound collaborators live outside and talk to it through the
/// framebuffer/draw-flag accessors and the key setters between steps.
use crate::error::Error;
use crate::instruction::Instruction;
use rand::rngs::ThreadRng;
use rand::Rng;

/// how much RAM we have
pub const MEMORY_SIZE: usize = 4096;
/// where a program image lands
pub const PROGRAM_ADDR: u16 = 0x200;
/// everything above the interpreter region is program space
pub const MAX_IMAGE_BYTES: usize = MEMORY_SIZE - PROGRAM_ADDR as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

const STACK_LEVELS: usize = 16;
const KEY_COUNT: usize = 16;

/// the hex-digit glyphs, 5 bytes per digit, living at 0x000
const FONT_ADDR: usize = 0x000;
const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// what one completed `step()` observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step {
    /// the sound timer hit its final count; the host should beep once
    pub beep: bool,
    /// a key-wait instruction found no key down; pc and timers are
    /// untouched and the same instruction re-runs next step
    pub waiting_for_key: bool,
}

pub struct Interpreter {
    memory: [u8; MEMORY_SIZE],
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: [u16; STACK_LEVELS],
    sp: usize,
    delay_timer: u8,
    sound_timer: u8,
    framebuffer: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
    draw_flag: bool,
    keys: [bool; KEY_COUNT],
    rng: ThreadRng,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut interp = Interpreter {
            memory: [0; MEMORY_SIZE],
            v: [0; 16],
            i: 0,
            pc: 0,
            stack: [0; STACK_LEVELS],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            framebuffer: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            draw_flag: false,
            keys: [false; KEY_COUNT],
            rng: rand::thread_rng(),
        };
        interp.initialize();
        interp
    }

    /// full reset: everything zeroed, font reloaded, pc back to 0x200. The
    /// draw flag is raised so the host paints the blanked first frame.
    fn initialize(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        self.memory[FONT_ADDR..FONT_ADDR + FONT.len()].copy_from_slice(&FONT);
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_ADDR;
        self.stack = [0; STACK_LEVELS];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.framebuffer = [0; DISPLAY_WIDTH * DISPLAY_HEIGHT];
        self.draw_flag = true;
        self.keys = [false; KEY_COUNT];
    }

    /// reset the machine and copy a program image in at 0x200. An oversized
    /// image is refused and the machine stays initialized-but-empty.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Error> {
        self.initialize();
        if image.len() > MAX_IMAGE_BYTES {
            return Err(Error::ImageTooLarge { len: image.len() });
        }
        let start = PROGRAM_ADDR as usize;
        self.memory[start..start + image.len()].copy_from_slice(image);
        Ok(())
    }

    /// run one fetch/decode/execute cycle, then tick the timers. A key-wait
    /// with no key down returns before the timer phase so the blocked
    /// instruction costs nothing.
    pub fn step(&mut self) -> Result<Step, Error> {
        let word = self.fetch()?;
        let instruction = Instruction::decode(word).ok_or(Error::UnknownOpcode {
            word,
            pc: self.pc,
        })?;
        if self.execute(instruction)? {
            return Ok(Step { beep: false, waiting_for_key: true });
        }
        Ok(Step {
            beep: self.tick_timers(),
            waiting_for_key: false,
        })
    }

    /// press or release one keypad key (indices 0x0..=0xf)
    pub fn set_key(&mut self, key: u8, down: bool) {
        self.keys[(key & 0x0f) as usize] = down;
    }

    /// replace the whole keypad table, as an input driver does each frame
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    /// row-major 64x32 cells, each 0 or 1
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// true when the framebuffer changed since the display last consumed it
    pub fn draw_pending(&self) -> bool {
        self.draw_flag
    }

    /// the display driver calls this after rendering a frame
    pub fn clear_draw_flag(&mut self) {
        self.draw_flag = false;
    }

    fn fetch(&self) -> Result<u16, Error> {
        let pc = self.pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(Error::OutOfBounds { addr: self.pc, pc: self.pc });
        }
        Ok(u16::from_be_bytes([self.memory[pc], self.memory[pc + 1]]))
    }

    /// apply one instruction. Returns true when a key-wait found no key
    /// down, in which case nothing was touched.
    fn execute(&mut self, instruction: Instruction) -> Result<bool, Error> {
        use Instruction::*;

        match instruction {
            ClearScreen => {
                self.framebuffer = [0; DISPLAY_WIDTH * DISPLAY_HEIGHT];
                self.draw_flag = true;
                self.pc += 2;
            }
            Return => {
                if self.sp == 0 {
                    return Err(Error::StackUnderflow { pc: self.pc });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp] + 2;
            }
            Jump { nnn } => {
                self.pc = nnn;
            }
            Call { nnn } => {
                if self.sp == STACK_LEVELS {
                    return Err(Error::StackOverflow { pc: self.pc });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                self.pc = nnn;
            }
            SkipEqImm { x, nn } => self.skip_if(self.v[x as usize] == nn),
            SkipNeImm { x, nn } => self.skip_if(self.v[x as usize] != nn),
            SkipEqReg { x, y } => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            SetImm { x, nn } => {
                self.v[x as usize] = nn;
                self.pc += 2;
            }
            AddImm { x, nn } => {
                self.v[x as usize] = self.v[x as usize].wrapping_add(nn);
                self.pc += 2;
            }
            Assign { x, y } => {
                self.v[x as usize] = self.v[y as usize];
                self.pc += 2;
            }
            Or { x, y } => {
                self.v[x as usize] |= self.v[y as usize];
                self.pc += 2;
            }
            And { x, y } => {
                self.v[x as usize] &= self.v[y as usize];
                self.pc += 2;
            }
            Xor { x, y } => {
                self.v[x as usize] ^= self.v[y as usize];
                self.pc += 2;
            }
            AddReg { x, y } => {
                let (sum, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
                self.v[x as usize] = sum;
                self.v[0xf] = carry as u8;
                self.pc += 2;
            }
            SubReg { x, y } => {
                let (diff, borrow) = self.v[x as usize].overflowing_sub(self.v[y as usize]);
                self.v[x as usize] = diff;
                self.v[0xf] = !borrow as u8;
                self.pc += 2;
            }
            ShiftRight { x } => {
                let low = self.v[x as usize] & 0x01;
                self.v[x as usize] >>= 1;
                self.v[0xf] = low;
                self.pc += 2;
            }
            SubFrom { x, y } => {
                let (diff, borrow) = self.v[y as usize].overflowing_sub(self.v[x as usize]);
                self.v[x as usize] = diff;
                self.v[0xf] = !borrow as u8;
                self.pc += 2;
            }
            ShiftLeft { x } => {
                let high = (self.v[x as usize] & 0x80) >> 7;
                self.v[x as usize] <<= 1;
                self.v[0xf] = high;
                self.pc += 2;
            }
            SkipNeReg { x, y } => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            SetIndex { nnn } => {
                self.i = nnn;
                self.pc += 2;
            }
            JumpOffset { nnn } => {
                self.pc = nnn + self.v[0] as u16;
            }
            Random { x, nn } => {
                self.v[x as usize] = self.rng.gen::<u8>() & nn;
                self.pc += 2;
            }
            Draw { x, y, n } => {
                self.draw_sprite(self.v[x as usize], self.v[y as usize], n)?;
                self.pc += 2;
            }
            SkipKeyDown { x } => {
                self.skip_if(self.keys[(self.v[x as usize] & 0x0f) as usize])
            }
            SkipKeyUp { x } => {
                self.skip_if(!self.keys[(self.v[x as usize] & 0x0f) as usize])
            }
            ReadDelay { x } => {
                self.v[x as usize] = self.delay_timer;
                self.pc += 2;
            }
            WaitKey { x } => match self.keys.iter().position(|&down| down) {
                Some(key) => {
                    self.v[x as usize] = key as u8;
                    self.pc += 2;
                }
                None => return Ok(true),
            },
            SetDelay { x } => {
                self.delay_timer = self.v[x as usize];
                self.pc += 2;
            }
            SetSound { x } => {
                self.sound_timer = self.v[x as usize];
                self.pc += 2;
            }
            AddIndex { x } => {
                let sum = self.i.wrapping_add(self.v[x as usize] as u16);
                self.v[0xf] = (sum > 0x0fff) as u8;
                self.i = sum;
                self.pc += 2;
            }
            FontGlyph { x } => {
                self.i = self.v[x as usize] as u16 * 5;
                self.pc += 2;
            }
            StoreBcd { x } => {
                let value = self.v[x as usize];
                self.check_effect_range(2)?;
                let at = self.i as usize;
                self.memory[at] = value / 100;
                self.memory[at + 1] = (value / 10) % 10;
                self.memory[at + 2] = value % 10;
                self.pc += 2;
            }
            StoreRegs { x } => {
                self.check_effect_range(x as u16)?;
                let at = self.i as usize;
                for reg in 0..=x as usize {
                    self.memory[at + reg] = self.v[reg];
                }
                self.i += x as u16 + 1;
                self.pc += 2;
            }
            LoadRegs { x } => {
                self.check_effect_range(x as u16)?;
                let at = self.i as usize;
                for reg in 0..=x as usize {
                    self.v[reg] = self.memory[at + reg];
                }
                self.i += x as u16 + 1;
                self.pc += 2;
            }
        }
        Ok(false)
    }

    fn skip_if(&mut self, condition: bool) {
        self.pc += if condition { 4 } else { 2 };
    }

    /// fault unless I..=I+span stays inside RAM
    fn check_effect_range(&self, span: u16) -> Result<(), Error> {
        let last = self.i as usize + span as usize;
        if last >= MEMORY_SIZE {
            return Err(Error::OutOfBounds { addr: last as u16, pc: self.pc });
        }
        Ok(())
    }

    /// XOR-blit `rows` sprite rows from I at cell (x, y). VF records whether
    /// any lit cell went dark. Cells past the display edge are dropped, not
    /// wrapped; sprite-row reads past the end of RAM fault.
    fn draw_sprite(&mut self, x: u8, y: u8, rows: u8) -> Result<(), Error> {
        self.v[0xf] = 0;
        for row in 0..rows as usize {
            let addr = self.i as usize + row;
            if addr >= MEMORY_SIZE {
                return Err(Error::OutOfBounds { addr: addr as u16, pc: self.pc });
            }
            let bits = self.memory[addr];
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let px = x as usize + col;
                let py = y as usize + row;
                if px >= DISPLAY_WIDTH || py >= DISPLAY_HEIGHT {
                    continue;
                }
                let cell = py * DISPLAY_WIDTH + px;
                if self.framebuffer[cell] == 1 {
                    self.v[0xf] = 1;
                }
                self.framebuffer[cell] ^= 1;
            }
        }
        self.draw_flag = true;
        Ok(())
    }

    /// once per completed instruction; true when the sound timer hit its
    /// final count this tick
    fn tick_timers(&mut self) -> bool {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            let last = self.sound_timer == 1;
            self.sound_timer -= 1;
            return last;
        }
        false
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
