/// # instruction
///
/// Typed decode of the 16-bit CHIP-8 instruction word. Each word segments in
/// one of four conventional ways:
///
/// * `_NNN` -- 12-bit address or immediate
/// * `_XNN` -- register index X plus 8-bit immediate
/// * `_XY_` -- register indices X and Y
/// * `_XYN` -- register indices X and Y plus 4-bit count
///
/// Decoding up front into a variant per opcode keeps execution an exhaustive
/// match, with unrecognized words a real fallback case rather than a silent
/// default.

/// One decoded CHIP-8 instruction. Register indices are always in 0x0..=0xf
/// because they come from a masked nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0: clear the display
    ClearScreen,
    /// 00EE: return from subroutine
    Return,
    /// 1NNN: jump to NNN
    Jump { nnn: u16 },
    /// 2NNN: call subroutine at NNN
    Call { nnn: u16 },
    /// 3XNN: skip next instruction if VX == NN
    SkipEqImm { x: u8, nn: u8 },
    /// 4XNN: skip next instruction if VX != NN
    SkipNeImm { x: u8, nn: u8 },
    /// 5XY0: skip next instruction if VX == VY
    SkipEqReg { x: u8, y: u8 },
    /// 6XNN: VX := NN
    SetImm { x: u8, nn: u8 },
    /// 7XNN: VX := VX + NN, wrapping, carry flag untouched
    AddImm { x: u8, nn: u8 },
    /// 8XY0: VX := VY
    Assign { x: u8, y: u8 },
    /// 8XY1: VX := VX | VY
    Or { x: u8, y: u8 },
    /// 8XY2: VX := VX & VY
    And { x: u8, y: u8 },
    /// 8XY3: VX := VX ^ VY
    Xor { x: u8, y: u8 },
    /// 8XY4: VX := VX + VY, VF := carry
    AddReg { x: u8, y: u8 },
    /// 8XY5: VX := VX - VY, VF := 1 when no borrow
    SubReg { x: u8, y: u8 },
    /// 8XY6: VF := low bit of VX, VX := VX >> 1
    ShiftRight { x: u8 },
    /// 8XY7: VX := VY - VX, VF := 1 when no borrow
    SubFrom { x: u8, y: u8 },
    /// 8XYE: VF := high bit of VX, VX := VX << 1
    ShiftLeft { x: u8 },
    /// 9XY0: skip next instruction if VX != VY
    SkipNeReg { x: u8, y: u8 },
    /// ANNN: I := NNN
    SetIndex { nnn: u16 },
    /// BNNN: jump to NNN + V0
    JumpOffset { nnn: u16 },
    /// CXNN: VX := random byte & NN
    Random { x: u8, nn: u8 },
    /// DXYN: XOR N sprite rows from I at (VX, VY), VF := collision
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E: skip next instruction if key VX is down
    SkipKeyDown { x: u8 },
    /// EXA1: skip next instruction if key VX is up
    SkipKeyUp { x: u8 },
    /// FX07: VX := delay timer
    ReadDelay { x: u8 },
    /// FX0A: wait for a key, then VX := its index
    WaitKey { x: u8 },
    /// FX15: delay timer := VX
    SetDelay { x: u8 },
    /// FX18: sound timer := VX
    SetSound { x: u8 },
    /// FX1E: I := I + VX, VF := 1 when the sum passes 0x0fff
    AddIndex { x: u8 },
    /// FX29: I := font glyph address for digit VX
    FontGlyph { x: u8 },
    /// FX33: decimal digits of VX to memory at I, I+1, I+2
    StoreBcd { x: u8 },
    /// FX55: V0..=VX to memory at I, then I := I + X + 1
    StoreRegs { x: u8 },
    /// FX65: memory at I to V0..=VX, then I := I + X + 1
    LoadRegs { x: u8 },
}

impl Instruction {
    /// classify a raw big-endian instruction word; `None` for words outside
    /// the instruction set
    pub fn decode(word: u16) -> Option<Instruction> {
        use Instruction::*;

        let x = ((word & 0x0f00) >> 8) as u8;
        let y = ((word & 0x00f0) >> 4) as u8;
        let n = (word & 0x000f) as u8;
        let nn = (word & 0x00ff) as u8;
        let nnn = word & 0x0fff;

        match word & 0xf000 {
            0x0000 => match word {
                0x00e0 => Some(ClearScreen),
                0x00ee => Some(Return),
                // 0NNN machine-code calls have no machine to call into
                _ => None,
            },
            0x1000 => Some(Jump { nnn }),
            0x2000 => Some(Call { nnn }),
            0x3000 => Some(SkipEqImm { x, nn }),
            0x4000 => Some(SkipNeImm { x, nn }),
            0x5000 if n == 0 => Some(SkipEqReg { x, y }),
            0x6000 => Some(SetImm { x, nn }),
            0x7000 => Some(AddImm { x, nn }),
            0x8000 => match n {
                0x0 => Some(Assign { x, y }),
                0x1 => Some(Or { x, y }),
                0x2 => Some(And { x, y }),
                0x3 => Some(Xor { x, y }),
                0x4 => Some(AddReg { x, y }),
                0x5 => Some(SubReg { x, y }),
                0x6 => Some(ShiftRight { x }),
                0x7 => Some(SubFrom { x, y }),
                0xe => Some(ShiftLeft { x }),
                _ => None,
            },
            0x9000 if n == 0 => Some(SkipNeReg { x, y }),
            0xa000 => Some(SetIndex { nnn }),
            0xb000 => Some(JumpOffset { nnn }),
            0xc000 => Some(Random { x, nn }),
            0xd000 => Some(Draw { x, y, n }),
            0xe000 => match nn {
                0x9e => Some(SkipKeyDown { x }),
                0xa1 => Some(SkipKeyUp { x }),
                _ => None,
            },
            0xf000 => match nn {
                0x07 => Some(ReadDelay { x }),
                0x0a => Some(WaitKey { x }),
                0x15 => Some(SetDelay { x }),
                0x18 => Some(SetSound { x }),
                0x1e => Some(AddIndex { x }),
                0x29 => Some(FontGlyph { x }),
                0x33 => Some(StoreBcd { x }),
                0x55 => Some(StoreRegs { x }),
                0x65 => Some(LoadRegs { x }),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nnn_family() {
        assert_eq!(Instruction::decode(0x1abc), Some(Instruction::Jump { nnn: 0xabc }));
        assert_eq!(Instruction::decode(0x2200), Some(Instruction::Call { nnn: 0x200 }));
        assert_eq!(Instruction::decode(0xa050), Some(Instruction::SetIndex { nnn: 0x050 }));
        assert_eq!(Instruction::decode(0xbfff), Some(Instruction::JumpOffset { nnn: 0xfff }));
    }

    #[test]
    fn test_decode_xnn_family() {
        assert_eq!(
            Instruction::decode(0x63a5),
            Some(Instruction::SetImm { x: 0x3, nn: 0xa5 })
        );
        assert_eq!(
            Instruction::decode(0x4e01),
            Some(Instruction::SkipNeImm { x: 0xe, nn: 0x01 })
        );
        assert_eq!(
            Instruction::decode(0xc70f),
            Some(Instruction::Random { x: 0x7, nn: 0x0f })
        );
    }

    #[test]
    fn test_decode_xy_family_masks_then_shifts() {
        // Y comes from the masked middle nibble, not from `word & (0x00f0 >> 4)`
        assert_eq!(
            Instruction::decode(0x5ab0),
            Some(Instruction::SkipEqReg { x: 0xa, y: 0xb })
        );
        assert_eq!(
            Instruction::decode(0x8124),
            Some(Instruction::AddReg { x: 0x1, y: 0x2 })
        );
        assert_eq!(
            Instruction::decode(0xd12f),
            Some(Instruction::Draw { x: 0x1, y: 0x2, n: 0xf })
        );
    }

    #[test]
    fn test_decode_zero_family() {
        assert_eq!(Instruction::decode(0x00e0), Some(Instruction::ClearScreen));
        assert_eq!(Instruction::decode(0x00ee), Some(Instruction::Return));
        // 0NNN is not part of the implemented set
        assert_eq!(Instruction::decode(0x0123), None);
    }

    #[test]
    fn test_decode_rejects_bad_sub_ops() {
        assert_eq!(Instruction::decode(0x5ab1), None); // 5XY1
        assert_eq!(Instruction::decode(0x9ab5), None); // 9XY5
        assert_eq!(Instruction::decode(0x8ab8), None); // 8XY8
        assert_eq!(Instruction::decode(0xe19f), None); // EX9F
        assert_eq!(Instruction::decode(0xf0ff), None); // FXFF
    }

    #[test]
    fn test_decode_full_f_family() {
        for (word, want) in [
            (0xf207, Instruction::ReadDelay { x: 2 }),
            (0xf20a, Instruction::WaitKey { x: 2 }),
            (0xf215, Instruction::SetDelay { x: 2 }),
            (0xf218, Instruction::SetSound { x: 2 }),
            (0xf21e, Instruction::AddIndex { x: 2 }),
            (0xf229, Instruction::FontGlyph { x: 2 }),
            (0xf233, Instruction::StoreBcd { x: 2 }),
            (0xf255, Instruction::StoreRegs { x: 2 }),
            (0xf265, Instruction::LoadRegs { x: 2 }),
        ] {
            assert_eq!(Instruction::decode(word), Some(want));
        }
    }
}
