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

use shakmaty::{Bitboard, Color, EnPassantMode, Position, Square};

use crate::errors::{SyzygyError, SyzygyResult};

/// A position as seen by the native engine.
///
/// The engine assumes that castling is no longer possible. Use
/// [`TbPosition::from_position()`] to have that checked.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TbPosition {
    pub white: Bitboard,
    pub black: Bitboard,
    pub kings: Bitboard,
    pub queens: Bitboard,
    pub rooks: Bitboard,
    pub bishops: Bitboard,
    pub knights: Bitboard,
    pub pawns: Bitboard,
    /// Square where an en passant capture is possible.
    pub ep: Option<Square>,
    pub turn: Color,
    /// Halfmove clock. Only relevant for DTZ probes.
    pub halfmoves: u32,
}

impl TbPosition {
    /// Extracts the bitboards of a position.
    ///
    /// # Errors
    ///
    /// Returns [`SyzygyError::Castling`] if any castling rights remain.
    pub fn from_position<P: Position>(pos: &P) -> SyzygyResult<TbPosition> {
        if !pos.castles().is_empty() {
            return Err(SyzygyError::Castling);
        }

        let board = pos.board();
        Ok(TbPosition {
            white: board.white(),
            black: board.black(),
            kings: board.kings(),
            queens: board.queens(),
            rooks: board.rooks(),
            bishops: board.bishops(),
            knights: board.knights(),
            pawns: board.pawns(),
            ep: pos.ep_square(EnPassantMode::Legal),
            turn: pos.turn(),
            halfmoves: pos.halfmoves(),
        })
    }

    /// Number of pieces on the board, including both kings.
    #[inline]
    pub fn piece_count(&self) -> usize {
        (self.white | self.black).count()
    }
}

#[cfg(test)]
mod tests {
    use shakmaty::{fen::Fen, CastlingMode, Chess};

    use super::*;

    fn chess(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .expect("valid fen")
            .into_position(CastlingMode::Standard)
            .expect("legal position")
    }

    #[test]
    fn test_from_position() {
        let pos = TbPosition::from_position(&chess("8/8/8/8/8/8/4k3/KR6 w - - 0 1"))
            .expect("no castling rights");
        assert_eq!(pos.white, Bitboard(3));
        assert_eq!(pos.black, Bitboard(4096));
        assert_eq!(pos.kings, Bitboard(4097));
        assert_eq!(pos.rooks, Bitboard(2));
        assert_eq!(pos.queens | pos.bishops | pos.knights | pos.pawns, Bitboard(0));
        assert_eq!(pos.ep, None);
        assert_eq!(pos.turn, Color::White);
        assert_eq!(pos.piece_count(), 3);
    }

    #[test]
    fn test_legal_en_passant() {
        let pos = TbPosition::from_position(&chess("8/8/8/3pP3/8/8/4k3/K7 w - d6 0 2"))
            .expect("no castling rights");
        assert_eq!(pos.ep, Some(Square::D6));
        assert_eq!(pos.piece_count(), 4);
    }

    #[test]
    fn test_castling_rejected() {
        let pos = chess("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        assert!(matches!(
            TbPosition::from_position(&pos),
            Err(SyzygyError::Castling)
        ));
    }

    #[test]
    fn test_halfmoves() {
        let pos = TbPosition::from_position(&chess("8/8/8/8/8/8/4k3/KR6 b - - 37 80"))
            .expect("no castling rights");
        assert_eq!(pos.halfmoves, 37);
        assert_eq!(pos.turn, Color::Black);
    }
}
