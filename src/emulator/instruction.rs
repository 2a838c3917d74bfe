use crate::emulator::opcode::Opcode;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for register identifiers, `0x0..=0xF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for 8-bit constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Byte(pub u8);

/// A wrapper for 4-bit constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nibble(pub u8);

/// A single instruction from the CHIP-8 instruction set,
/// annotated with the opcode pattern it is decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,              // 00E0
    Return,                   // 00EE
    Jump(Addr),               // 1NNN
    Call(Addr),               // 2NNN
    SkipIfEqByte(Reg, Byte),  // 3XKK
    SkipIfNeqByte(Reg, Byte), // 4XKK
    SkipIfEqReg(Reg, Reg),    // 5XY0
    LoadByte(Reg, Byte),      // 6XKK
    AddByte(Reg, Byte),       // 7XKK
    Copy(Reg, Reg),           // 8XY0
    Or(Reg, Reg),             // 8XY1
    And(Reg, Reg),            // 8XY2
    Xor(Reg, Reg),            // 8XY3
    AddReg(Reg, Reg),         // 8XY4
    Sub(Reg, Reg),            // 8XY5
    ShiftRight(Reg),          // 8XY6
    SubFrom(Reg, Reg),        // 8XY7
    ShiftLeft(Reg),           // 8XYE
    SkipIfNeqReg(Reg, Reg),   // 9XY0
    LoadIndex(Addr),          // ANNN
    JumpOffset(Addr),         // BNNN
    Random(Reg, Byte),        // CXKK
    Draw(Reg, Reg, Nibble),   // DXYN
    SkipIfKeyDown(Reg),       // EX9E
    SkipIfKeyUp(Reg),         // EXA1
    ReadDelay(Reg),           // FX07
    WaitForKey(Reg),          // FX0A
    SetDelay(Reg),            // FX15
    SetSound(Reg),            // FX18
    AddIndex(Reg),            // FX1E
    LoadGlyph(Reg),           // FX29
    StoreBcd(Reg),            // FX33
    StoreRegs(Reg),           // FX55
    LoadRegs(Reg),            // FX65
    /// Anything without a handler, including machine code calls (0NNN).
    Nop(u16),
}

impl Instruction {
    /// Decode an opcode by its top nibble. Kinds 0, 8, E and F
    /// are shared by several instructions, and are decoded further
    /// by their own tables.
    pub fn decode(opcode: Opcode) -> Instruction {
        match opcode.kind() {
            0x0 => Self::decode_system(opcode),
            0x1 => Instruction::Jump(Addr(opcode.nnn())),
            0x2 => Instruction::Call(Addr(opcode.nnn())),
            0x3 => Instruction::SkipIfEqByte(Reg(opcode.x()), Byte(opcode.kk())),
            0x4 => Instruction::SkipIfNeqByte(Reg(opcode.x()), Byte(opcode.kk())),
            0x5 => Instruction::SkipIfEqReg(Reg(opcode.x()), Reg(opcode.y())),
            0x6 => Instruction::LoadByte(Reg(opcode.x()), Byte(opcode.kk())),
            0x7 => Instruction::AddByte(Reg(opcode.x()), Byte(opcode.kk())),
            0x8 => Self::decode_arithmetic(opcode),
            0x9 => Instruction::SkipIfNeqReg(Reg(opcode.x()), Reg(opcode.y())),
            0xA => Instruction::LoadIndex(Addr(opcode.nnn())),
            0xB => Instruction::JumpOffset(Addr(opcode.nnn())),
            0xC => Instruction::Random(Reg(opcode.x()), Byte(opcode.kk())),
            0xD => Instruction::Draw(Reg(opcode.x()), Reg(opcode.y()), Nibble(opcode.n())),
            0xE => Self::decode_keys(opcode),
            _ => Self::decode_misc(opcode),
        }
    }

    pub fn from_u16(value: u16) -> Instruction {
        Self::decode(Opcode::from_u16(value))
    }

    // 0NNN
    fn decode_system(opcode: Opcode) -> Instruction {
        match opcode.as_u16() {
            0x00E0 => Instruction::ClearScreen,
            0x00EE => Instruction::Return,
            other => Instruction::Nop(other),
        }
    }

    // 8XYN
    fn decode_arithmetic(opcode: Opcode) -> Instruction {
        let (_, x, y, n) = opcode.nibbles();
        let (x, y) = (Reg(x), Reg(y));
        match n {
            0x0 => Instruction::Copy(x, y),
            0x1 => Instruction::Or(x, y),
            0x2 => Instruction::And(x, y),
            0x3 => Instruction::Xor(x, y),
            0x4 => Instruction::AddReg(x, y),
            0x5 => Instruction::Sub(x, y),
            0x6 => Instruction::ShiftRight(x),
            0x7 => Instruction::SubFrom(x, y),
            0xE => Instruction::ShiftLeft(x),
            _ => Instruction::Nop(opcode.as_u16()),
        }
    }

    // EXKK
    fn decode_keys(opcode: Opcode) -> Instruction {
        let x = Reg(opcode.x());
        match opcode.kk() {
            0x9E => Instruction::SkipIfKeyDown(x),
            0xA1 => Instruction::SkipIfKeyUp(x),
            _ => Instruction::Nop(opcode.as_u16()),
        }
    }

    // FXKK
    fn decode_misc(opcode: Opcode) -> Instruction {
        let x = Reg(opcode.x());
        match opcode.kk() {
            0x07 => Instruction::ReadDelay(x),
            0x0A => Instruction::WaitForKey(x),
            0x15 => Instruction::SetDelay(x),
            0x18 => Instruction::SetSound(x),
            0x1E => Instruction::AddIndex(x),
            0x29 => Instruction::LoadGlyph(x),
            0x33 => Instruction::StoreBcd(x),
            0x55 => Instruction::StoreRegs(x),
            0x65 => Instruction::LoadRegs(x),
            _ => Instruction::Nop(opcode.as_u16()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0x00E0, Instruction::ClearScreen ; "clear screen")]
    #[test_case(0x00EE, Instruction::Return ; "return from call")]
    #[test_case(0x1025, Instruction::Jump(Addr(0x025)) ; "jump")]
    #[test_case(0x2037, Instruction::Call(Addr(0x037)) ; "call")]
    #[test_case(0x3A08, Instruction::SkipIfEqByte(Reg(0xA), Byte(0x08)) ; "skip if eq byte")]
    #[test_case(0x4A08, Instruction::SkipIfNeqByte(Reg(0xA), Byte(0x08)) ; "skip if neq byte")]
    #[test_case(0x5AB0, Instruction::SkipIfEqReg(Reg(0xA), Reg(0xB)) ; "skip if eq reg")]
    #[test_case(0x6B23, Instruction::LoadByte(Reg(0xB), Byte(0x23)) ; "load byte")]
    #[test_case(0x7CA1, Instruction::AddByte(Reg(0xC), Byte(0xA1)) ; "add byte")]
    #[test_case(0x8AB0, Instruction::Copy(Reg(0xA), Reg(0xB)) ; "copy")]
    #[test_case(0x8DE1, Instruction::Or(Reg(0xD), Reg(0xE)) ; "or")]
    #[test_case(0x8DE2, Instruction::And(Reg(0xD), Reg(0xE)) ; "and")]
    #[test_case(0x8DE3, Instruction::Xor(Reg(0xD), Reg(0xE)) ; "xor")]
    #[test_case(0x8AB4, Instruction::AddReg(Reg(0xA), Reg(0xB)) ; "add reg")]
    #[test_case(0x8AB5, Instruction::Sub(Reg(0xA), Reg(0xB)) ; "sub")]
    #[test_case(0x8AB6, Instruction::ShiftRight(Reg(0xA)) ; "shift right")]
    #[test_case(0x8AB7, Instruction::SubFrom(Reg(0xA), Reg(0xB)) ; "sub from")]
    #[test_case(0x8A0E, Instruction::ShiftLeft(Reg(0xA)) ; "shift left")]
    #[test_case(0x9AB0, Instruction::SkipIfNeqReg(Reg(0xA), Reg(0xB)) ; "skip if neq reg")]
    #[test_case(0xA025, Instruction::LoadIndex(Addr(0x025)) ; "load index")]
    #[test_case(0xB025, Instruction::JumpOffset(Addr(0x025)) ; "jump offset")]
    #[test_case(0xCA23, Instruction::Random(Reg(0xA), Byte(0x23)) ; "random")]
    #[test_case(0xDABC, Instruction::Draw(Reg(0xA), Reg(0xB), Nibble(0xC)) ; "draw")]
    #[test_case(0xEA9E, Instruction::SkipIfKeyDown(Reg(0xA)) ; "skip if key down")]
    #[test_case(0xEAA1, Instruction::SkipIfKeyUp(Reg(0xA)) ; "skip if key up")]
    #[test_case(0xFA07, Instruction::ReadDelay(Reg(0xA)) ; "read delay")]
    #[test_case(0xFA0A, Instruction::WaitForKey(Reg(0xA)) ; "wait for key")]
    #[test_case(0xFA15, Instruction::SetDelay(Reg(0xA)) ; "set delay")]
    #[test_case(0xFA18, Instruction::SetSound(Reg(0xA)) ; "set sound")]
    #[test_case(0xFA1E, Instruction::AddIndex(Reg(0xA)) ; "add index")]
    #[test_case(0xFA29, Instruction::LoadGlyph(Reg(0xA)) ; "load glyph")]
    #[test_case(0xFA33, Instruction::StoreBcd(Reg(0xA)) ; "store bcd")]
    #[test_case(0xFA55, Instruction::StoreRegs(Reg(0xA)) ; "store regs")]
    #[test_case(0xFA65, Instruction::LoadRegs(Reg(0xA)) ; "load regs")]
    fn opcodes_are_decoded(opcode: u16, expected: Instruction) {
        assert_eq!(Instruction::from_u16(opcode), expected);
    }

    #[test_case(0x0000 ; "zero word")]
    #[test_case(0x0123 ; "machine code call")]
    #[test_case(0x00E1 ; "near clear screen")]
    #[test_case(0x01E0 ; "clear screen with address bits")]
    #[test_case(0x8AB8 ; "arithmetic gap")]
    #[test_case(0x8ABF ; "arithmetic past shift left")]
    #[test_case(0xEA9F ; "key family gap")]
    #[test_case(0xFA00 ; "misc family gap")]
    #[test_case(0xFAFF ; "misc family end")]
    fn unknown_opcodes_are_nops(opcode: u16) {
        assert_eq!(Instruction::from_u16(opcode), Instruction::Nop(opcode));
    }

    proptest! {
        #[test]
        fn single_handler_kinds_never_decode_to_nop(kind in 1u16..=0xD, rest in 0u16..0x1000) {
            prop_assume!(kind != 0x8);
            let decoded = Instruction::from_u16(kind << 12 | rest);
            prop_assert!(!matches!(decoded, Instruction::Nop(_)));
        }
    }
}
