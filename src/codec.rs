// This file is part of the syzygy-bridge library.
// Copyright (C) 2017-2018 Niklas Fiekas <niklas.fiekas@backscattering.de>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Calling and result conventions of the native engine.
//!
//! A root DTZ probe returns a single 32-bit value:
//!
//! ```text
//! 31          20 19 18  16 15      10 9        4 3    0
//! +-------------+-----+---+----------+----------+------+
//! |     dtz     |  -  |pro|   from   |    to    | wdl  |
//! +-------------+-----+---+----------+----------+------+
//! ```
//!
//! The `dtz` field covers the sign bit, so fields are always extracted from
//! the unsigned value.

use shakmaty::{Role, Square};

use crate::{
    errors::ProbeFailure,
    position::TbPosition,
    types::{DtzProbe, Metric, Wdl},
};

pub const WDL_MASK: u32 = 0x0000_000f;
pub const TO_MASK: u32 = 0x0000_03f0;
pub const FROM_MASK: u32 = 0x0000_fc00;
pub const PROMOTES_MASK: u32 = 0x0007_0000;
pub const DTZ_MASK: u32 = 0xfff0_0000;

pub const WDL_SHIFT: u32 = 0;
pub const TO_SHIFT: u32 = 4;
pub const FROM_SHIFT: u32 = 10;
pub const PROMOTES_SHIFT: u32 = 16;
pub const DTZ_SHIFT: u32 = 20;

/// Returned by the engine when it cannot probe a position.
pub const RESULT_FAILED: u32 = 0xffff_ffff;

/// A raw result as returned by the native engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PackedResult(pub u32);

impl PackedResult {
    /// Reinterprets a signed native result without sign extension.
    #[inline]
    pub const fn from_signed(raw: i32) -> PackedResult {
        PackedResult(raw as u32)
    }

    /// Packs fields into a result. Each field is truncated to its width.
    pub const fn compose(wdl: u32, to: u32, from: u32, promotes: u32, dtz: u32) -> PackedResult {
        PackedResult(
            ((wdl << WDL_SHIFT) & WDL_MASK)
                | ((to << TO_SHIFT) & TO_MASK)
                | ((from << FROM_SHIFT) & FROM_MASK)
                | ((promotes << PROMOTES_SHIFT) & PROMOTES_MASK)
                | ((dtz << DTZ_SHIFT) & DTZ_MASK),
        )
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_failed(self) -> bool {
        self.0 == RESULT_FAILED
    }

    #[inline]
    pub const fn wdl_bits(self) -> u32 {
        (self.0 & WDL_MASK) >> WDL_SHIFT
    }

    #[inline]
    pub const fn to_bits(self) -> u32 {
        (self.0 & TO_MASK) >> TO_SHIFT
    }

    #[inline]
    pub const fn from_bits(self) -> u32 {
        (self.0 & FROM_MASK) >> FROM_SHIFT
    }

    #[inline]
    pub const fn promotes_bits(self) -> u32 {
        (self.0 & PROMOTES_MASK) >> PROMOTES_SHIFT
    }

    #[inline]
    pub const fn dtz_bits(self) -> u32 {
        (self.0 & DTZ_MASK) >> DTZ_SHIFT
    }

    pub fn decode_wdl(self) -> Result<Wdl, ProbeFailure> {
        decode_wdl(self.0)
    }

    pub fn decode_dtz(self) -> Result<DtzProbe, ProbeFailure> {
        decode_dtz(self.0)
    }
}

impl From<u32> for PackedResult {
    fn from(raw: u32) -> PackedResult {
        PackedResult(raw)
    }
}

impl From<PackedResult> for u32 {
    fn from(PackedResult(raw): PackedResult) -> u32 {
        raw
    }
}

/// Arguments of a probe, in the order the native engine expects them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ProbeArgs {
    pub white: u64,
    pub black: u64,
    pub kings: u64,
    pub queens: u64,
    pub rooks: u64,
    pub bishops: u64,
    pub knights: u64,
    pub pawns: u64,
    /// Halfmove clock. Ignored by WDL probes.
    pub rule50: u32,
    /// En passant square, or `0`.
    pub ep: u32,
    /// `true` if white is to move.
    pub turn: bool,
}

/// Packs a position into probe arguments.
pub fn pack(pos: &TbPosition) -> ProbeArgs {
    ProbeArgs {
        white: pos.white.0,
        black: pos.black.0,
        kings: pos.kings.0,
        queens: pos.queens.0,
        rooks: pos.rooks.0,
        bishops: pos.bishops.0,
        knights: pos.knights.0,
        pawns: pos.pawns.0,
        rule50: pos.halfmoves,
        ep: pos.ep.map_or(0, u32::from),
        turn: pos.turn.is_white(),
    }
}

/// Decodes the result of a WDL probe, which is the outcome ordinal itself.
pub fn decode_wdl(raw: u32) -> Result<Wdl, ProbeFailure> {
    Wdl::from_ordinal(raw).ok_or(ProbeFailure {
        metric: Metric::Wdl,
        raw: PackedResult(raw),
    })
}

fn promotion_from_bits(bits: u32) -> Option<Option<Role>> {
    Some(match bits {
        0 => None,
        1 => Some(Role::Queen),
        2 => Some(Role::Rook),
        3 => Some(Role::Bishop),
        4 => Some(Role::Knight),
        _ => return None,
    })
}

/// Decodes the packed result of a root DTZ probe.
pub fn decode_dtz(raw: u32) -> Result<DtzProbe, ProbeFailure> {
    let packed = PackedResult(raw);
    let failure = ProbeFailure {
        metric: Metric::Dtz,
        raw: packed,
    };

    if packed.is_failed() {
        return Err(failure);
    }

    let wdl = Wdl::from_ordinal(packed.wdl_bits()).ok_or(failure)?;
    let promotion = promotion_from_bits(packed.promotes_bits()).ok_or(failure)?;

    Ok(DtzProbe {
        wdl,
        from: Square::new(packed.from_bits()),
        to: Square::new(packed.to_bits()),
        promotion,
        dtz: packed.dtz_bits(),
    })
}

#[cfg(test)]
mod tests {
    use shakmaty::{Bitboard, Color};

    use super::*;

    #[test]
    fn test_decode_reference() {
        let probe = decode_dtz(19924244).expect("valid result");
        assert_eq!(probe.wdl, Wdl::Win);
        assert_eq!(probe.from, Square::B1);
        assert_eq!(probe.to, Square::B3);
        assert_eq!(u32::from(probe.from), 1);
        assert_eq!(u32::from(probe.to), 17);
        assert_eq!(probe.promotion, None);
        assert_eq!(probe.dtz, 19);
    }

    #[test]
    fn test_dtz_field_uses_sign_bit() {
        // Negative as i32. Shifting the signed value would smear the sign
        // bit into the dtz field.
        let packed = PackedResult::from_signed(-720912);
        assert_eq!(packed.raw(), 0xfff4_fff0);
        assert_eq!(packed.dtz_bits(), 4095);

        let probe = packed.decode_dtz().expect("valid result");
        assert_eq!(probe.wdl, Wdl::Loss);
        assert_eq!(probe.from, Square::H8);
        assert_eq!(probe.to, Square::H8);
        assert_eq!(probe.promotion, Some(Role::Knight));
        assert_eq!(probe.dtz, 4095);
    }

    #[test]
    fn test_compose_roundtrip() {
        for wdl in 0..=15 {
            for promotes in 0..=7 {
                for (to, from, dtz) in [(0, 0, 0), (17, 1, 19), (63, 63, 4095), (42, 7, 2048)] {
                    let packed = PackedResult::compose(wdl, to, from, promotes, dtz);
                    assert_eq!(packed.wdl_bits(), wdl);
                    assert_eq!(packed.to_bits(), to);
                    assert_eq!(packed.from_bits(), from);
                    assert_eq!(packed.promotes_bits(), promotes);
                    assert_eq!(packed.dtz_bits(), dtz);
                    assert_eq!(decode_dtz(packed.raw()), decode_dtz(packed.raw()));
                }
            }
        }
    }

    #[test]
    fn test_compose_reference() {
        assert_eq!(PackedResult::compose(4, 17, 1, 0, 19), PackedResult(19924244));
    }

    #[test]
    fn test_decode_failures() {
        let failure = decode_dtz(RESULT_FAILED).expect_err("sentinel");
        assert_eq!(failure.metric, Metric::Dtz);
        assert!(failure.raw.is_failed());

        let failure = decode_wdl(RESULT_FAILED).expect_err("sentinel");
        assert_eq!(failure.metric, Metric::Wdl);

        assert!(decode_wdl(5).is_err());
        assert!(decode_dtz(PackedResult::compose(5, 17, 1, 0, 19).raw()).is_err());
        assert!(decode_dtz(PackedResult::compose(4, 17, 1, 5, 19).raw()).is_err());
    }

    #[test]
    fn test_decode_wdl() {
        assert_eq!(decode_wdl(0), Ok(Wdl::Loss));
        assert_eq!(decode_wdl(1), Ok(Wdl::BlessedLoss));
        assert_eq!(decode_wdl(2), Ok(Wdl::Draw));
        assert_eq!(decode_wdl(3), Ok(Wdl::CursedWin));
        assert_eq!(decode_wdl(4), Ok(Wdl::Win));
    }

    #[test]
    fn test_pack() {
        let pos = TbPosition {
            white: Bitboard(3),
            black: Bitboard(4096),
            kings: Bitboard(4097),
            queens: Bitboard(0),
            rooks: Bitboard(2),
            bishops: Bitboard(0),
            knights: Bitboard(0),
            pawns: Bitboard(0),
            ep: None,
            turn: Color::White,
            halfmoves: 7,
        };

        assert_eq!(
            pack(&pos),
            ProbeArgs {
                white: 3,
                black: 4096,
                kings: 4097,
                queens: 0,
                rooks: 2,
                bishops: 0,
                knights: 0,
                pawns: 0,
                rule50: 7,
                ep: 0,
                turn: true,
            }
        );

        let pos = TbPosition {
            ep: Some(Square::E6),
            turn: Color::Black,
            ..pos
        };
        let args = pack(&pos);
        assert_eq!(args.ep, 44);
        assert!(!args.turn);
    }
}
