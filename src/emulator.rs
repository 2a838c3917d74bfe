//! The CHIP-8 virtual machine as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

pub mod error;
pub mod instruction;
pub mod keypad;
pub mod opcode;
pub mod screen;

use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use error::{LoadError, StepError};
use instruction::*;
use keypad::{Keypad, NUM_KEYS};
use opcode::Opcode;
use screen::Screen;

pub const MEM_SIZE: usize = 4096;
pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const PC_START: u16 = 0x200;
pub const FONT_START: u16 = 0x050;
pub const MAX_PROGRAM_SIZE: usize = MEM_SIZE - PC_START as usize;

// Each glyph is 5 rows of 8 pixels
const GLYPH_SIZE: u16 = 5;
const FLAG: usize = 0xF;

/// Index of a register. Only the low nibble names a register,
/// which is all a decoded opcode can hold.
fn reg(x: u8) -> usize {
    (x & 0xF) as usize
}
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

pub struct Emulator {
    memory: [u8; MEM_SIZE],
    registers: [u8; NUM_REGISTERS],
    delay_timer: u8,
    sound_timer: u8,
    i: u16,
    program_counter: u16,
    stack_pointer: usize,
    stack: [u16; STACK_SIZE],

    screen: Screen,
    keypad: Keypad,
    rng: StdRng,
}

impl Emulator {
    /// Create an emulator with an empty program, seeded from system entropy.
    pub fn new() -> Emulator {
        Emulator::with_rng(StdRng::from_entropy())
    }

    /// Create an emulator whose random numbers are reproducible.
    pub fn with_seed(seed: u64) -> Emulator {
        Emulator::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Emulator {
        let mut emulator = Emulator {
            memory: [0; MEM_SIZE],
            registers: [0; NUM_REGISTERS],
            delay_timer: 0,
            sound_timer: 0,
            i: 0,
            program_counter: PC_START,
            stack_pointer: 0,
            stack: [0; STACK_SIZE],

            screen: Screen::new(),
            keypad: Keypad::new(),
            rng,
        };
        emulator.reset();
        emulator
    }

    /// Create an emulator and load the program stored at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Emulator, LoadError> {
        let mut emulator = Emulator::new();
        emulator.load_file(path)?;
        Ok(emulator)
    }

    /// Reset the machine, then copy a program into memory at 0x200.
    /// Nothing is changed if the program does not fit.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }

        self.reset();
        let start = PC_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        log::debug!("Loaded {} byte program at {:#05x}", program.len(), PC_START);
        Ok(())
    }

    /// Read a whole program from `reader` and load it.
    pub fn load_from<R: Read>(&mut self, mut reader: R) -> Result<(), LoadError> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load(&program)
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        log::debug!("Reading program from {:?}", path.as_ref());
        let file = File::open(path)?;
        self.load_from(file)
    }

    /// Put every part of the machine in its power-on state.
    fn reset(&mut self) {
        self.memory = [0; MEM_SIZE];
        let font = FONT_START as usize;
        self.memory[font..font + FONT.len()].copy_from_slice(&FONT);

        self.registers = [0; NUM_REGISTERS];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.i = 0;
        self.program_counter = PC_START;
        self.stack_pointer = 0;
        self.stack = [0; STACK_SIZE];
        self.screen.clear();
        self.keypad.release_all();
    }

    /// Perform a single cycle: fetch an instruction, execute it,
    /// then update the timers.
    pub fn step(&mut self) -> Result<(), StepError> {
        let opcode = self.fetch()?;
        let instruction = Instruction::decode(opcode);

        log::trace!("{:#05x}: {:#06x} {:?}", self.program_counter, opcode.as_u16(), instruction);

        // Jumps, calls and skips overwrite this
        self.program_counter = self.program_counter.wrapping_add(2);

        if let Err(e) = self.execute(instruction) {
            log::warn!("{:?} failed: {}", instruction, e);
            return Err(e);
        }

        self.tick_timers();
        Ok(())
    }

    /// Read the two bytes at the program counter.
    fn fetch(&self) -> Result<Opcode, StepError> {
        let pc = self.program_counter as usize;
        if pc + 1 >= MEM_SIZE {
            return Err(StepError::Address(self.program_counter));
        }
        Ok(Opcode::from_bytes(self.memory[pc], self.memory[pc + 1]))
    }

    fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// The memory range `start..start + len`, if all of it is addressable.
    fn memory_range(&self, start: u16, len: usize) -> Result<Range<usize>, StepError> {
        let begin = start as usize;
        let end = begin + len;
        if end > MEM_SIZE {
            return Err(StepError::Address(start));
        }
        Ok(begin..end)
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = self.program_counter.wrapping_add(2);
        }
    }

    /// Write an arithmetic result, then the flag.
    /// The flag wins if `x` is VF.
    fn set_with_flag(&mut self, x: u8, value: u8, flag: bool) {
        self.registers[reg(x)] = value;
        self.registers[FLAG] = flag as u8;
    }

    /// Execute a single instruction without fetching it from memory.
    /// Timers are not updated. Register operands above 0xF use their low nibble.
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), StepError> {
        match instruction {
            Instruction::ClearScreen => self.screen.clear(),

            // Return to the previous call site via the stack
            Instruction::Return => {
                if self.stack_pointer == 0 {
                    return Err(StepError::StackUnderflow);
                }
                self.stack_pointer -= 1;
                self.program_counter = self.stack[self.stack_pointer];
            }

            Instruction::Jump(Addr(addr)) => self.program_counter = addr,

            // Store the return address on the stack, then jump
            Instruction::Call(Addr(addr)) => {
                if self.stack_pointer == STACK_SIZE {
                    return Err(StepError::StackOverflow);
                }
                self.stack[self.stack_pointer] = self.program_counter;
                self.stack_pointer += 1;
                self.program_counter = addr;
            }

            Instruction::SkipIfEqByte(Reg(x), Byte(kk)) => {
                self.skip_if(self.registers[reg(x)] == kk);
            }

            Instruction::SkipIfNeqByte(Reg(x), Byte(kk)) => {
                self.skip_if(self.registers[reg(x)] != kk);
            }

            Instruction::SkipIfEqReg(Reg(x), Reg(y)) => {
                self.skip_if(self.registers[reg(x)] == self.registers[reg(y)]);
            }

            Instruction::LoadByte(Reg(x), Byte(kk)) => self.registers[reg(x)] = kk,

            // No carry flag
            Instruction::AddByte(Reg(x), Byte(kk)) => {
                self.registers[reg(x)] = self.registers[reg(x)].wrapping_add(kk);
            }

            Instruction::Copy(Reg(x), Reg(y)) => {
                self.registers[reg(x)] = self.registers[reg(y)];
            }

            Instruction::Or(Reg(x), Reg(y)) => {
                self.registers[reg(x)] |= self.registers[reg(y)];
            }

            Instruction::And(Reg(x), Reg(y)) => {
                self.registers[reg(x)] &= self.registers[reg(y)];
            }

            Instruction::Xor(Reg(x), Reg(y)) => {
                self.registers[reg(x)] ^= self.registers[reg(y)];
            }

            Instruction::AddReg(Reg(x), Reg(y)) => {
                let (vx, vy) = (self.registers[reg(x)], self.registers[reg(y)]);
                let (sum, carry) = vx.overflowing_add(vy);
                self.set_with_flag(x, sum, carry);
            }

            // VF is 1 when there is no borrow
            Instruction::Sub(Reg(x), Reg(y)) => {
                let (vx, vy) = (self.registers[reg(x)], self.registers[reg(y)]);
                self.set_with_flag(x, vx.wrapping_sub(vy), vx >= vy);
            }

            Instruction::ShiftRight(Reg(x)) => {
                let vx = self.registers[reg(x)];
                self.set_with_flag(x, vx >> 1, vx & 1 == 1);
            }

            Instruction::SubFrom(Reg(x), Reg(y)) => {
                let (vx, vy) = (self.registers[reg(x)], self.registers[reg(y)]);
                self.set_with_flag(x, vy.wrapping_sub(vx), vy >= vx);
            }

            Instruction::ShiftLeft(Reg(x)) => {
                let vx = self.registers[reg(x)];
                self.set_with_flag(x, vx << 1, vx >> 7 == 1);
            }

            Instruction::SkipIfNeqReg(Reg(x), Reg(y)) => {
                self.skip_if(self.registers[reg(x)] != self.registers[reg(y)]);
            }

            Instruction::LoadIndex(Addr(addr)) => self.i = addr,

            Instruction::JumpOffset(Addr(addr)) => {
                self.program_counter = self.registers[0] as u16 + addr;
            }

            Instruction::Random(Reg(x), Byte(kk)) => {
                self.registers[reg(x)] = self.rng.gen::<u8>() & kk;
            }

            // XOR the sprite at I onto the screen, VF tells if any pixel was erased
            Instruction::Draw(Reg(x), Reg(y), Nibble(height)) => {
                let (vx, vy) = (self.registers[reg(x)], self.registers[reg(y)]);
                let sprite = self.memory_range(self.i, height as usize)?;
                let collision = self.screen.draw_sprite(vx as usize, vy as usize, &self.memory[sprite]);
                self.registers[FLAG] = collision as u8;
            }

            Instruction::SkipIfKeyDown(Reg(x)) => {
                self.skip_if(self.keypad.is_down(self.registers[reg(x)]));
            }

            Instruction::SkipIfKeyUp(Reg(x)) => {
                self.skip_if(!self.keypad.is_down(self.registers[reg(x)]));
            }

            Instruction::ReadDelay(Reg(x)) => self.registers[reg(x)] = self.delay_timer,

            // Runs again next cycle until a key is down. The lowest key wins.
            Instruction::WaitForKey(Reg(x)) => match self.keypad.first_down() {
                Some(key) => self.registers[reg(x)] = key,
                None => self.program_counter = self.program_counter.wrapping_sub(2),
            },

            Instruction::SetDelay(Reg(x)) => self.delay_timer = self.registers[reg(x)],

            Instruction::SetSound(Reg(x)) => self.sound_timer = self.registers[reg(x)],

            Instruction::AddIndex(Reg(x)) => {
                self.i = self.i.wrapping_add(self.registers[reg(x)] as u16);
            }

            Instruction::LoadGlyph(Reg(x)) => {
                self.i = FONT_START + GLYPH_SIZE * self.registers[reg(x)] as u16;
            }

            Instruction::StoreBcd(Reg(x)) => {
                let value = self.registers[reg(x)];
                let digits = self.memory_range(self.i, 3)?;
                self.memory[digits].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
            }

            // Dump V0..=Vx to memory starting at I
            Instruction::StoreRegs(Reg(x)) => {
                let target = self.memory_range(self.i, reg(x) + 1)?;
                self.memory[target].copy_from_slice(&self.registers[..=reg(x)]);
            }

            // Fill V0..=Vx from memory starting at I
            Instruction::LoadRegs(Reg(x)) => {
                let source = self.memory_range(self.i, reg(x) + 1)?;
                self.registers[..=reg(x)].copy_from_slice(&self.memory[source]);
            }

            Instruction::Nop(_) => {}
        };

        Ok(())
    }

    /// Execute several instructions in order, stopping at the first failure.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<(), StepError> {
        for instruction in instructions {
            self.execute(*instruction)?;
        }
        Ok(())
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    /// Replace the state of every key at once.
    pub fn set_keys(&mut self, keys: [bool; NUM_KEYS]) {
        self.keypad = Keypad::from(keys);
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.registers
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack_pointer(&self) -> usize {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// Whether a tone should be playing.
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
