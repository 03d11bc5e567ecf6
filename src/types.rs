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

use std::{fmt, ops::Neg};

use shakmaty::{Move, Position, Role, Square};

/// WDL<sub>50</sub>. A position value taking into account the 50-move rule.
///
/// Ordered from the point of view of the side to move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(i8)]
pub enum Wdl {
    /// Unconditional loss for the side to move.
    Loss = -2,
    /// Loss that can be saved by the 50-move rule.
    BlessedLoss = -1,
    /// Unconditional draw.
    Draw = 0,
    /// Win that can be frustrated by the 50-move rule.
    CursedWin = 1,
    /// Unconditional win.
    Win = 2,
}

impl Wdl {
    /// Interprets an outcome ordinal as reported by the native engine
    /// (`0` is a loss, `4` is a win).
    pub const fn from_ordinal(ordinal: u32) -> Option<Wdl> {
        Some(match ordinal {
            0 => Wdl::Loss,
            1 => Wdl::BlessedLoss,
            2 => Wdl::Draw,
            3 => Wdl::CursedWin,
            4 => Wdl::Win,
            _ => return None,
        })
    }

    /// The outcome ordinal used by the native engine.
    pub const fn ordinal(self) -> u32 {
        (self as i8 + 2) as u32
    }
}

impl Neg for Wdl {
    type Output = Wdl;

    fn neg(self) -> Wdl {
        match self {
            Wdl::Loss => Wdl::Win,
            Wdl::BlessedLoss => Wdl::CursedWin,
            Wdl::Draw => Wdl::Draw,
            Wdl::CursedWin => Wdl::BlessedLoss,
            Wdl::Win => Wdl::Loss,
        }
    }
}

impl From<Wdl> for i8 {
    #[inline]
    fn from(wdl: Wdl) -> i8 {
        wdl as i8
    }
}

/// Type of probe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Metric {
    /// WDL<sub>50</sub>.
    Wdl,
    /// DTZ<sub>50</sub>′′, probed at the root.
    Dtz,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::Wdl => "wdl",
            Metric::Dtz => "dtz",
        })
    }
}

/// What a [`Session`](crate::Session) knows about its tablebase files.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LoadState {
    /// [`Session::load()`](crate::Session::load) has not been called yet.
    NotLoaded,
    /// Loading was attempted and failed. Tablebases stay unavailable.
    Failed,
    /// Tables for up to the given number of pieces are loaded.
    Loaded(u32),
}

impl LoadState {
    /// Interprets a supported size: `0` is not loaded, negative values mean
    /// a failed load.
    pub fn from_supported_size(size: i32) -> LoadState {
        match u32::try_from(size) {
            Ok(0) => LoadState::NotLoaded,
            Ok(pieces) => LoadState::Loaded(pieces),
            Err(_) => LoadState::Failed,
        }
    }

    pub fn supported_size(self) -> i32 {
        match self {
            LoadState::NotLoaded => 0,
            LoadState::Failed => -1,
            LoadState::Loaded(pieces) => i32::try_from(pieces).unwrap_or(i32::MAX),
        }
    }
}

/// A decoded root DTZ probe: the outcome, the move that makes progress
/// towards zeroing, and the distance to zeroing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DtzProbe {
    /// Outcome for the side to move.
    pub wdl: Wdl,
    /// Origin square of the suggested move.
    pub from: Square,
    /// Target square of the suggested move.
    pub to: Square,
    /// Piece the suggested move promotes to, if any.
    pub promotion: Option<Role>,
    /// Plies until the 50-move counter is reset on an optimal line.
    pub dtz: u32,
}

impl DtzProbe {
    /// Checkmate and stalemate are reported without a move, as a null move
    /// from a1 to a1.
    pub fn is_terminal(&self) -> bool {
        self.from == self.to
    }

    /// Finds the legal move in `pos` that matches the suggested move.
    pub fn to_move<P: Position>(&self, pos: &P) -> Option<Move> {
        if self.is_terminal() {
            return None;
        }
        pos.legal_moves().into_iter().find(|m| {
            m.from() == Some(self.from) && m.to() == self.to && m.promotion() == self.promotion
        })
    }
}

#[cfg(test)]
mod tests {
    use shakmaty::{fen::Fen, CastlingMode, Chess};

    use super::*;

    #[test]
    fn test_wdl_ordinals() {
        for ordinal in 0..5 {
            let wdl = Wdl::from_ordinal(ordinal).expect("valid ordinal");
            assert_eq!(wdl.ordinal(), ordinal);
        }
        assert_eq!(Wdl::from_ordinal(4), Some(Wdl::Win));
        assert_eq!(Wdl::from_ordinal(0), Some(Wdl::Loss));
        assert_eq!(Wdl::from_ordinal(5), None);
        assert_eq!(Wdl::from_ordinal(u32::MAX), None);
    }

    #[test]
    fn test_wdl_neg() {
        assert_eq!(-Wdl::Win, Wdl::Loss);
        assert_eq!(-Wdl::CursedWin, Wdl::BlessedLoss);
        assert_eq!(-Wdl::Draw, Wdl::Draw);
        assert!(Wdl::Loss < Wdl::BlessedLoss && Wdl::CursedWin < Wdl::Win);
        assert_eq!(i8::from(Wdl::CursedWin), 1);
    }

    #[test]
    fn test_load_state() {
        assert_eq!(LoadState::from_supported_size(0), LoadState::NotLoaded);
        assert_eq!(LoadState::from_supported_size(-1), LoadState::Failed);
        assert_eq!(LoadState::from_supported_size(5), LoadState::Loaded(5));
        for size in [-1, 0, 3, 7] {
            assert_eq!(LoadState::from_supported_size(size).supported_size(), size);
        }
    }

    #[test]
    fn test_to_move() {
        let pos: Chess = "8/8/8/8/8/8/4k3/KR6 w - - 0 1"
            .parse::<Fen>()
            .expect("valid fen")
            .into_position(CastlingMode::Standard)
            .expect("legal position");

        let probe = DtzProbe {
            wdl: Wdl::Win,
            from: Square::B1,
            to: Square::B3,
            promotion: None,
            dtz: 19,
        };
        let m = probe.to_move(&pos).expect("legal move");
        assert_eq!(m.role(), Role::Rook);
        assert_eq!(m.to(), Square::B3);

        let illegal = DtzProbe {
            from: Square::B1,
            to: Square::C2,
            ..probe
        };
        assert_eq!(illegal.to_move(&pos), None);

        let terminal = DtzProbe {
            from: Square::A1,
            to: Square::A1,
            ..probe
        };
        assert!(terminal.is_terminal());
        assert_eq!(terminal.to_move(&pos), None);
    }
}
