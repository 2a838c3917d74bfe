/// A fetched 16-bit instruction word, with accessors
/// for the fields an instruction may use.
///
/// Written in hexadecimal as `KXYN`, where
/// - K: the kind of instruction (top nibble)
/// - X and Y: 4-bit register identifiers
/// - N: 4-bit constant (lowest nibble)
/// - KK: 8-bit constant (lowest byte)
/// - NNN: 12-bit address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(u16);

impl Opcode {
    /// Combine a high and a low byte, as they are laid out in memory.
    pub fn from_bytes(high: u8, low: u8) -> Opcode {
        Opcode((high as u16) << 8 | low as u16)
    }

    pub fn from_u16(value: u16) -> Opcode {
        Opcode(value)
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// All four nibbles, most significant first.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (self.kind(), self.x(), self.y(), self.n())
    }

    pub fn kind(self) -> u8 {
        (self.0 >> 12) as u8 & 0xF
    }

    pub fn x(self) -> u8 {
        (self.0 >> 8) as u8 & 0xF
    }

    pub fn y(self) -> u8 {
        (self.0 >> 4) as u8 & 0xF
    }

    pub fn n(self) -> u8 {
        self.0 as u8 & 0xF
    }

    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}
