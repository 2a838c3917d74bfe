/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

The machine owns its memory, registers, framebuffer and keypad.
It does not draw, read the keyboard or keep time by itself:
a frontend writes key states, calls `step()` at a fixed rate, and reads the screen afterwards.

# Headless runner

To try the emulator on a program without any frontend, run
`cargo run --release -- <program>`. Use `--dump` to print the screen when it stops,
and `-v`, `-vv` or `-vvv` for more logging.

# Library

The main way of running a program is to load it as bytes, then step through it.

```rust
use chip_8_vm::emulator::Emulator;

let mut emulator = Emulator::new();

// Load a program at address 0x200: V0 = 10, V1 = 5, V0 += V1
emulator.load(&[0x60, 0x0A, 0x61, 0x05, 0x80, 0x14])?;
for _ in 0..3 {
    emulator.step()?;
}
assert_eq!(emulator.registers()[0], 15);
assert_eq!(emulator.program_counter(), 0x206);
# Ok::<(), Box<dyn std::error::Error>>(())
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip_8_vm::emulator::Emulator;
use chip_8_vm::emulator::instruction::{Instruction, Reg, Byte, Addr};

let mut emulator = Emulator::new();

// Execute instructions manually
emulator.execute(Instruction::ClearScreen)?;

// Or many sequentially
emulator.execute_many(&[
    Instruction::Jump(Addr(0x250)),
    Instruction::LoadByte(Reg(0xA), Byte(35)),
    Instruction::Copy(Reg(0xB), Reg(0xA)),
])?;
assert_eq!(emulator.registers()[0xB], 35);
# Ok::<(), chip_8_vm::StepError>(())
```

## Input and output

Key states are written through `keypad_mut()` before a step,
and the framebuffer is read through `screen()` after it.

```rust
use chip_8_vm::emulator::Emulator;
use chip_8_vm::emulator::screen::{SCREEN_WIDTH, SCREEN_HEIGHT};

let mut emulator = Emulator::new();

// Wait for a key and store it in V0, then draw its glyph at (0, 0)
emulator.load(&[0xF0, 0x0A, 0xF0, 0x29, 0xD1, 0x15])?;
emulator.step()?;
assert_eq!(emulator.program_counter(), 0x200); // Still waiting

emulator.keypad_mut().press(0x7);
for _ in 0..3 {
    emulator.step()?;
}

let pixels = emulator.screen().pixels();
assert_eq!(pixels.len(), SCREEN_WIDTH * SCREEN_HEIGHT);
assert_eq!(&pixels[..4], &[1, 1, 1, 1]);
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub mod emulator;

pub use emulator::error::{LoadError, StepError};
pub use emulator::Emulator;
