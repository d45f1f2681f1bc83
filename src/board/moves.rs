/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

use super::{Board, Color, File, PieceKind, Square};

/// Maximum possible number of moves in a position reachable from the starting position.
///
/// Found [here](<https://www.chessprogramming.org/Chess_Position#cite_note-4>)
///
/// Arbitrary layouts can exceed it, so this only sizes the initial allocation of a [`MoveList`].
pub const MAX_NUM_MOVES: usize = 218;

/// Maximum number of destinations a single piece can have.
///
/// A Queen in the center of an otherwise empty board reaches 27 squares.
pub const MAX_NUM_DESTINATIONS: usize = 27;

/// All moves available to one side.
pub type MoveList = Vec<Move>;

/// An alias for an [`arrayvec::ArrayVec`] holding the destinations of a single piece.
pub type SquareList = arrayvec::ArrayVec<Square, MAX_NUM_DESTINATIONS>;

/// Represents the different kinds of moves that can be made during a chess game.
///
/// A [`Move`] does not store its kind. It is derived from the board the move is played on.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum MoveKind {
    /// Involves only a single piece moving from one location to another, and does not change the quantity or kind of any pieces on the board.
    Quiet,

    /// A special case on a Pawn's first move, wherein it can advance two squares forward.
    PawnDoublePush,

    /// The King moves two files towards the Rook on the `h` file, which then lands beside it on the `f` file.
    ShortCastle,

    /// The King moves two files towards the Rook on the `a` file, which then lands beside it on the `d` file.
    LongCastle,

    /// Involves a piece moving onto a square occupied by an opponent's piece, removing it from the board.
    Capture,

    /// A Pawn captures an enemy Pawn that just advanced two squares past it, landing on the square it skipped.
    EnPassantCapture,
}

impl MoveKind {
    /// Determines the [`MoveKind`] of moving the piece at `from` onto `to`, on the provided `board`.
    ///
    /// If there is no piece at `from`, the move is considered [`MoveKind::Quiet`].
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, MoveKind, Square};
    /// let board = Board::default();
    /// let e2 = "e2".parse().unwrap();
    /// let e4 = "e4".parse().unwrap();
    /// assert_eq!(MoveKind::new(&board, e2, e4), MoveKind::PawnDoublePush);
    /// ```
    pub fn new(board: &Board, from: Square, to: Square) -> Self {
        let Some(piece) = board.piece_at(from) else {
            return Self::Quiet;
        };

        let is_capture = board.piece_at(to).is_some();

        match piece.kind() {
            PieceKind::Pawn if !is_capture && from.file() != to.file() => Self::EnPassantCapture,
            PieceKind::Pawn if from.rank().abs_diff(to.rank()) == 2 => Self::PawnDoublePush,

            PieceKind::King if from.file().abs_diff(to.file()) == 2 => {
                if to.file() > from.file() {
                    Self::ShortCastle
                } else {
                    Self::LongCastle
                }
            }

            _ if is_capture => Self::Capture,
            _ => Self::Quiet,
        }
    }

    /// If this is a castling move, returns the [`File`]s of the Rook's origin and destination, respectively.
    ///
    /// # Example
    /// ```
    /// # use gambit::{File, MoveKind};
    /// assert_eq!(MoveKind::ShortCastle.castling_rook_files(), Some((File::H, File::F)));
    /// assert_eq!(MoveKind::LongCastle.castling_rook_files(), Some((File::A, File::D)));
    /// assert_eq!(MoveKind::Capture.castling_rook_files(), None);
    /// ```
    #[inline(always)]
    pub const fn castling_rook_files(&self) -> Option<(File, File)> {
        match self {
            Self::ShortCastle => Some((File::H, File::F)),
            Self::LongCastle => Some((File::A, File::D)),
            _ => None,
        }
    }
}

impl fmt::Display for MoveKind {
    /// Displays a human-readable description for this [`MoveKind`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Quiet => "Quiet",
            Self::PawnDoublePush => "Pawn Double Push",
            Self::ShortCastle => "Short Castle",
            Self::LongCastle => "Long Castle",
            Self::Capture => "Capture",
            Self::EnPassantCapture => "En Passant Capture",
        };

        write!(f, "{s}")
    }
}

/// Represents a move made on a chess board, including what a Pawn is to be promoted to, if anything.
///
/// Castling is written as the King's two-file step, such as `e1g1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a new [`Move`] between the given [`Square`]s, without a promotion.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Move, Square};
    /// let e1g1 = Move::new(Square::E1, Square::G1);
    /// assert_eq!(e1g1.to_string(), "e1g1");
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a new [`Move`] of a Pawn onto its last rank, becoming `promotion`.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Move, PieceKind, Square};
    /// let b7 = "b7".parse().unwrap();
    /// let b7a8n = Move::with_promotion(b7, Square::A8, PieceKind::Knight);
    /// assert_eq!(b7a8n.to_string(), "b7a8n");
    /// ```
    #[inline(always)]
    pub const fn with_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// Fetches the source (or "from") part of this [`Move`].
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Fetches the destination (or "to") part of this [`Move`].
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Fetches the [`PieceKind`] this move promotes to, if any.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Returns `true` if this [`Move`] carries a promotion.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Creates a [`Move`] from a string in long algebraic notation, such as `e2e4` or `e7e8q`.
    ///
    /// Will return a [`anyhow::Error`] if the string is invalid in any way.
    /// Whether the move is legal on any particular board is not checked.
    ///
    /// # Example
    /// ```
    /// # use gambit::*;
    /// let b7c8b = Move::from_uci("b7c8b").unwrap();
    /// assert_eq!(b7c8b.promotion(), Some(PieceKind::Bishop));
    /// assert_eq!(b7c8b.to(), Square::C8);
    ///
    /// assert!(Move::from_uci("e7e8k").is_err());
    /// assert!(Move::from_uci("e2").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let from = uci
            .get(0..2)
            .ok_or(anyhow!("Move str must contain a `from` square. Got {uci:?}"))?;
        let to = uci
            .get(2..4)
            .ok_or(anyhow!("Move str must contain a `to` square. Got {uci:?}"))?;

        let from = Square::from_uci(from)?;
        let to = Square::from_uci(to)?;

        let promotion = uci.get(4..).filter(|s| !s.is_empty());
        let Some(promotion) = promotion else {
            return Ok(Self::new(from, to));
        };

        let kind = PieceKind::from_str(promotion)?;
        if !kind.is_promotion_target() {
            bail!("A Pawn cannot promote to a {}. Got {uci:?}", kind.name());
        }

        Ok(Self::with_promotion(from, to, kind))
    }

    /// Converts this [`Move`] into a string in long algebraic notation.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        if let Some(promote) = self.promotion {
            format!("{}{}{}", self.from, self.to, promote)
        } else {
            format!("{}{}", self.from, self.to)
        }
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl From<LastMove> for Move {
    #[inline(always)]
    fn from(value: LastMove) -> Self {
        Self::new(value.from, value.to)
    }
}

impl fmt::Display for Move {
    /// A [`Move`] is displayed in long algebraic notation.
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Move {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<T: AsRef<str>> PartialEq<T> for Move {
    #[inline(always)]
    fn eq(&self, other: &T) -> bool {
        self.to_uci().eq(other.as_ref())
    }
}

/// The source and destination of the most recent move played on a [`Board`].
///
/// Only the single preceding move is ever remembered. It decides whether en passant is available.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LastMove {
    pub from: Square,
    pub to: Square,
}

impl LastMove {
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Returns `true` if this move travelled exactly two ranks along a single file.
    ///
    /// Whether the piece that travelled was a Pawn must be checked against the board.
    #[inline(always)]
    pub const fn is_two_rank_advance(&self) -> bool {
        self.from.file().inner() == self.to.file().inner()
            && self.from.rank().abs_diff(self.to.rank()) == 2
    }
}

impl fmt::Display for LastMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A Pawn that has reached its last rank and is waiting for the player to choose what it becomes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PendingPromotion {
    pub square: Square,
    pub color: Color,
}

impl fmt::Display for PendingPromotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pawn on {}", self.color.name(), self.square)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_parsing() {
        let mv = Move::from_uci("a2a4").unwrap();
        assert_eq!(mv.from(), "a2".parse().unwrap());
        assert_eq!(mv.to(), "a4".parse().unwrap());
        assert_eq!(mv.promotion(), None);

        let mv = Move::from_uci("b7b8Q").unwrap();
        assert_eq!(mv.promotion(), Some(PieceKind::Queen));
        assert_eq!(mv, "b7b8q");

        assert!(Move::from_uci("b7b8p").is_err());
        assert!(Move::from_uci("b7b8qq").is_err());
        assert!(Move::from_uci("z7b8").is_err());
        assert!(Move::from_uci("").is_err());
    }

    #[test]
    fn test_move_kind_classification() {
        let board = Board::from_fen("r3k2r/8/8/3pP3/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let sq = |s: &str| s.parse::<Square>().unwrap();

        assert_eq!(MoveKind::new(&board, Square::E1, Square::G1), MoveKind::ShortCastle);
        assert_eq!(MoveKind::new(&board, Square::E8, Square::C8), MoveKind::LongCastle);
        assert_eq!(MoveKind::new(&board, Square::E1, Square::F1), MoveKind::Quiet);
        assert_eq!(MoveKind::new(&board, Square::A1, Square::A8), MoveKind::Capture);
        assert_eq!(MoveKind::new(&board, sq("e5"), sq("d6")), MoveKind::EnPassantCapture);
        assert_eq!(MoveKind::new(&board, sq("e5"), sq("e6")), MoveKind::Quiet);
        assert_eq!(MoveKind::new(&board, sq("d5"), sq("d4")), MoveKind::Quiet);
    }

    #[test]
    fn test_last_move_two_rank_advance() {
        let sq = |s: &str| s.parse::<Square>().unwrap();
        assert!(LastMove::new(sq("d7"), sq("d5")).is_two_rank_advance());
        assert!(!LastMove::new(sq("d7"), sq("d6")).is_two_rank_advance());
        assert!(!LastMove::new(sq("a1"), sq("c3")).is_two_rank_advance());
    }
}
