/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{anyhow, bail, Result};

use super::{
    Color, File, LastMove, Move, MoveKind, PendingPromotion, Piece, PieceKind, Rank, Square,
};
use crate::Rejection;

/// Piece placements of the standard starting position.
pub const LAYOUT_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// FEN string for the starting position of chess.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A popular FEN string for debugging move generation.
pub const FEN_KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// Everything needed to take back a move applied with [`Board::make_move`].
///
/// Only valid for the board it was produced by, and only while no other move has been made since.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Undo {
    mv: Move,

    /// The piece that moved, as it was before moving.
    moved: Option<Piece>,

    /// The captured piece and where it stood, which differs from the destination for en passant.
    captured: Option<(Square, Piece)>,

    /// A castling Rook's origin, destination, and its state before moving.
    rook: Option<(Square, Square, Piece)>,

    last_move: Option<LastMove>,
    promotion: Option<PendingPromotion>,
}

impl Undo {
    /// The move this [`Undo`] takes back.
    #[inline(always)]
    pub const fn mv(&self) -> Move {
        self.mv
    }

    /// The piece captured by the move, if any.
    #[inline(always)]
    pub fn captured(&self) -> Option<Piece> {
        self.captured.map(|(_, piece)| piece)
    }
}

/// Represents the state of a chess game: the pieces on the `8x8` grid, whose turn it is,
/// the most recent move, and a Pawn awaiting promotion, if there is one.
///
/// Copying a [`Board`] yields a fully independent game state, which is how speculative moves are evaluated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// One cell per square, indexed by [`Square::index`].
    mailbox: [Option<Piece>; Square::COUNT],

    side_to_move: Color,

    last_move: Option<LastMove>,

    promotion: Option<PendingPromotion>,
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces, with White to move.
    ///
    /// # Example
    /// ```
    /// # use gambit::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_layout(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [None; Square::COUNT],
            side_to_move: Color::White,
            last_move: None,
            promotion: None,
        }
    }

    /// Constructs a [`Board`] from a placement string, such as [`LAYOUT_STARTPOS`].
    ///
    /// Ranks are separated by `/` and listed from rank 8 down to rank 1.
    /// A digit skips that many empty files, and a piece letter places an unmoved piece:
    /// uppercase for White, lowercase for Black. White moves first.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Color, Square, PieceKind};
    /// let board = Board::from_layout("4k3/8/8/8/8/8/8/4K3").unwrap();
    /// assert_eq!(board.side_to_move(), Color::White);
    /// assert_eq!(board.piece_at(Square::E8).unwrap().kind(), PieceKind::King);
    ///
    /// assert!(Board::from_layout("4k3/8/8/8/8/8/8/4K4").is_err());
    /// assert!(Board::from_layout("4k3/8/8/8/8/8/4K3").is_err());
    /// assert!(Board::from_layout("4k3/8/8/8/8/8/8/4X3").is_err());
    /// ```
    pub fn from_layout(layout: &str) -> Result<Self> {
        let mut board = Self::new();

        let ranks = layout.trim().split('/').collect::<Vec<_>>();
        if ranks.len() != Rank::COUNT {
            bail!(
                "Layout must have placements for exactly {} ranks. Got {} in {layout:?}",
                Rank::COUNT,
                ranks.len()
            );
        }

        // Ranks are listed from 8 down to 1, so reverse them to put White at the "bottom"
        for (rank, placements) in Rank::iter().zip(ranks.into_iter().rev()) {
            let mut file = 0;

            for c in placements.chars() {
                if let Some(empty) = c.to_digit(10) {
                    if !(1..=8).contains(&empty) {
                        bail!("Layout runs of empty squares must be between [1, 8]. Got {c:?} on rank {rank}");
                    }
                    file += empty as u8;
                    if file as usize > File::COUNT {
                        bail!("Layout rank {rank} overflows past the h file: {placements:?}");
                    }
                    continue;
                }

                let piece = Piece::from_uci(c).map_err(|_| {
                    anyhow!("Layout must contain only piece chars or digits. Got {c:?} on rank {rank}")
                })?;

                let Ok(current) = File::new(file) else {
                    bail!("Layout rank {rank} overflows past the h file: {placements:?}");
                };
                file += 1;

                board.place(piece, Square::new(current, rank));
            }

            if file as usize != File::COUNT {
                bail!(
                    "Layout rank {rank} must describe exactly {} files. Got {file} in {placements:?}",
                    File::COUNT
                );
            }
        }

        Ok(board)
    }

    /// Creates a new [`Board`] from the provided FEN string.
    ///
    /// Only the placements are required. The side to move defaults to White.
    ///
    /// When a castling field is present, a corner Rook without its castling right is considered to have moved,
    /// and so is a King that has lost both of its rights.
    /// An en passant square is recorded as the double push that produced it.
    /// Move counters are ignored.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Color, Square};
    /// let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b Kq - 0 1").unwrap();
    /// assert_eq!(board.side_to_move(), Color::Black);
    /// assert!(!board.piece_at(Square::H1).unwrap().has_moved());
    /// assert!(board.piece_at(Square::A1).unwrap().has_moved());
    /// assert!(!board.piece_at(Square::E8).unwrap().has_moved());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.split_ascii_whitespace();
        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;
        let mut board = Self::from_layout(placements)?;

        let active_color = split.next().unwrap_or("w");
        board.side_to_move = Color::from_str(active_color)?;

        if let Some(castling) = split.next() {
            if let Some(bad) = castling.chars().find(|c| !"KQkq-".contains(*c)) {
                bail!("FEN castling field may only contain `KQkq` or `-`. Got {bad:?}");
            }

            for color in Color::all() {
                let (short, long) = match color {
                    Color::White => ('K', 'Q'),
                    Color::Black => ('k', 'q'),
                };
                let (short, long) = (castling.contains(short), castling.contains(long));

                board.revoke_castling(color, File::H, short);
                board.revoke_castling(color, File::A, long);

                let home = Square::new(File::E, Rank::first(color));
                if !short && !long {
                    if let Some(king) = board[home]
                        .as_mut()
                        .filter(|p| p.parts() == (color, PieceKind::King))
                    {
                        king.set_moved(true);
                    }
                }
            }
        }

        if let Some(ep) = split.next().filter(|s| *s != "-") {
            let ep = Square::from_uci(ep)?;
            let pusher = board.side_to_move.opponent();

            let behind = ep.backward_by(pusher, 1);
            let ahead = ep.forward_by(pusher, 1);
            let (Some(from), Some(to)) = (behind, ahead) else {
                bail!("FEN en passant square {ep} cannot follow a double push by {pusher}");
            };

            if from.rank() != Rank::second(pusher) {
                bail!("FEN en passant square {ep} cannot follow a double push by {pusher}");
            }

            board.last_move = Some(LastMove::new(from, to));
        }

        Ok(board)
    }

    /// Marks the Rook in `color`'s corner on `file` as moved, unless it keeps its castling right.
    fn revoke_castling(&mut self, color: Color, file: File, keeps_right: bool) {
        if keeps_right {
            return;
        }

        let corner = Square::new(file, Rank::first(color));
        if let Some(rook) = self[corner]
            .as_mut()
            .filter(|p| p.parts() == (color, PieceKind::Rook))
        {
            rook.set_moved(true);
        }
    }

    /// Generates the placement string of this [`Board`], the inverse of [`Board::from_layout`].
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, LAYOUT_STARTPOS};
    /// assert_eq!(Board::default().to_layout(), LAYOUT_STARTPOS);
    /// ```
    pub fn to_layout(&self) -> String {
        let mut placements: [String; Rank::COUNT] = Default::default();

        for rank in Rank::iter() {
            let placement = &mut placements[rank.index()];
            let mut empty_spaces = 0;

            for file in File::iter() {
                if let Some(piece) = self.piece_at(Square::new(file, rank)) {
                    if empty_spaces != 0 {
                        *placement += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    placement.push(piece.to_uci());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                *placement += &empty_spaces.to_string();
            }
        }
        placements.reverse();

        placements.join("/")
    }

    /// Generates a FEN string of this [`Board`].
    ///
    /// Castling rights are read from the moved state of each King and corner Rook.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, FEN_STARTPOS};
    /// assert_eq!(Board::default().to_fen(), FEN_STARTPOS);
    /// ```
    pub fn to_fen(&self) -> String {
        let mut castling = String::new();
        for color in Color::all() {
            for (file, c) in [(File::H, 'k'), (File::A, 'q')] {
                if self.has_castling_right(color, file) {
                    castling.push(match color {
                        Color::White => c.to_ascii_uppercase(),
                        Color::Black => c,
                    });
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self
            .en_passant_target()
            .map(|sq| sq.to_string())
            .unwrap_or(String::from("-"));

        format!(
            "{} {} {castling} {ep} 0 1",
            self.to_layout(),
            self.side_to_move.to_uci()
        )
    }

    /// Returns `true` if `color` has an unmoved King on its home square and an unmoved Rook in the corner on `file`.
    pub fn has_castling_right(&self, color: Color, file: File) -> bool {
        let rank = Rank::first(color);
        let unmoved = |square: Square, kind: PieceKind| {
            self.piece_at(square)
                .is_some_and(|p| p.parts() == (color, kind) && !p.has_moved())
        };

        unmoved(Square::new(File::E, rank), PieceKind::King)
            && unmoved(Square::new(file, rank), PieceKind::Rook)
    }

    /// If the last move was a Pawn's double push, returns the square it passed over.
    pub fn en_passant_target(&self) -> Option<Square> {
        let last = self.last_move?;
        let pawn = self.piece_at(last.to).filter(|p| p.is_pawn())?;
        if !last.is_two_rank_advance() {
            return None;
        }

        last.to.backward_by(pawn.color(), 1)
    }

    /// Whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Toggles the current player from White to Black (or vice versa).
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// The source and destination of the most recent move, if any move has been made.
    #[inline(always)]
    pub const fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /// The Pawn waiting to be promoted, if any.
    #[inline(always)]
    pub const fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.promotion
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.mailbox[square.index()].as_ref()
    }

    /// Places `piece` (or nothing) at `square`, returning whatever was there before.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Piece, Square};
    /// let mut board = Board::new();
    /// let knight = Piece::from_uci('N').unwrap();
    /// assert_eq!(board.set_piece_at(Square::B1, Some(knight)), None);
    /// assert_eq!(board.set_piece_at(Square::B1, None), Some(knight));
    /// ```
    #[inline(always)]
    pub fn set_piece_at(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.mailbox[square.index()], piece)
    }

    /// Places `piece` at `square`, replacing anything that stood there.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.mailbox[square.index()] = Some(piece);
    }

    /// Removes and returns the piece at `square`, if there is one.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Color, PieceKind, Square};
    /// let mut board = Board::default();
    /// let taken = board.take(Square::E1).unwrap();
    /// assert_eq!(taken.parts(), (Color::White, PieceKind::King));
    /// assert!(board.piece_at(Square::E1).is_none());
    /// ```
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()].take()
    }

    /// Returns an iterator over every occupied square and its piece, from `a1` to `h8`.
    pub fn iter(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        Square::iter().filter_map(move |square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Returns an iterator over every piece of `color` and the square it stands on.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }

    /// Finds the [`Square`] of `color`'s King, if it has one.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Color, Square};
    /// let board = Board::default();
    /// assert_eq!(board.king_square(Color::Black), Some(Square::E8));
    /// assert_eq!(Board::new().king_square(Color::White), None);
    /// ```
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, piece)| piece.is_king())
            .map(|(square, _)| square)
    }

    /// Moves the piece at `from` onto `to` without any checks, returning whatever was captured on `to`.
    ///
    /// The moved piece is marked as having moved. Turns, the last move, and special moves are not touched.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Square};
    /// let mut board = Board::default();
    /// let captured = board.apply_move(Square::D1, Square::D8);
    /// assert_eq!(captured.unwrap().to_string(), "q");
    /// assert!(board.piece_at(Square::D8).unwrap().has_moved());
    /// assert!(board.piece_at(Square::D1).is_none());
    /// ```
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mut piece = self.take(from)?;
        piece.set_moved(true);
        self.set_piece_at(to, Some(piece))
    }

    /// Applies `mv` along with all of its side effects, without checking legality. The turn is not switched.
    ///
    /// * A castling King brings the Rook to the square beside its destination.
    /// * A Pawn capturing en passant removes the enemy Pawn beside it.
    /// * A Pawn reaching its last rank becomes `mv.promotion()`, or awaits promotion if that is `None`.
    /// * The move is recorded as the last move.
    ///
    /// The returned [`Undo`] restores the exact previous state through [`Board::unmake_move`].
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let (from, to) = (mv.from(), mv.to());
        let kind = MoveKind::new(self, from, to);

        let mut undo = Undo {
            mv,
            moved: self[from],
            captured: None,
            rook: None,
            last_move: self.last_move,
            promotion: self.promotion,
        };

        let Some(mut piece) = self.take(from) else {
            return undo;
        };
        let color = piece.color();

        if kind == MoveKind::EnPassantCapture {
            // The victim sits beside the capturing Pawn, not on the destination
            let victim_square = Square::new(to.file(), from.rank());
            undo.captured = self.take(victim_square).map(|victim| (victim_square, victim));
        } else if let Some((rook_file, rook_dest_file)) = kind.castling_rook_files() {
            let rook_from = Square::new(rook_file, from.rank());
            let rook_to = Square::new(rook_dest_file, from.rank());

            if let Some(rook) = self.take(rook_from) {
                undo.rook = Some((rook_from, rook_to, rook));
                let mut moved = rook;
                moved.set_moved(true);
                self.place(moved, rook_to);
            }
        }

        if let Some(victim) = self.take(to) {
            undo.captured = Some((to, victim));
        }

        piece.set_moved(true);
        self.promotion = None;

        if piece.is_pawn() && to.rank() == Rank::eighth(color) {
            match mv.promotion() {
                Some(promotion) => piece = piece.promoted(promotion),
                None => self.promotion = Some(PendingPromotion { square: to, color }),
            }
        }

        self.place(piece, to);
        self.last_move = Some(LastMove::new(from, to));

        undo
    }

    /// Takes back the move recorded in `undo`, restoring the board to exactly how it was before [`Board::make_move`].
    pub fn unmake_move(&mut self, undo: Undo) {
        let Undo {
            mv,
            moved,
            captured,
            rook,
            last_move,
            promotion,
        } = undo;

        if let Some(moved) = moved {
            self.take(mv.to());
            self.place(moved, mv.from());
        }

        if let Some((rook_from, rook_to, rook)) = rook {
            self.take(rook_to);
            self.place(rook, rook_from);
        }

        if let Some((square, victim)) = captured {
            self.place(victim, square);
        }

        self.last_move = last_move;
        self.promotion = promotion;
    }

    /// Copies `self` and returns a [`Board`] after having played the provided [`Move`] and passed the turn.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Color, Move};
    /// let board = Board::default();
    /// let after = board.with_move_played("e2e4".parse().unwrap());
    /// assert_eq!(after.side_to_move(), Color::Black);
    /// assert_eq!(after.to_layout(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR");
    /// // The original is untouched
    /// assert_eq!(board, Board::default());
    /// ```
    #[inline(always)]
    pub fn with_move_played(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.make_move(mv);
        copied.toggle_side_to_move();
        copied
    }

    /// Replaces the Pawn awaiting promotion with a new piece of `kind`.
    ///
    /// Returns the promotion that was resolved. The turn is not switched.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<PendingPromotion, Rejection> {
        let Some(pending) = self.promotion else {
            return Err(Rejection::NoPromotionPending);
        };

        if !kind.is_promotion_target() {
            return Err(Rejection::InvalidPromotion { kind });
        }

        let pawn = self
            .take(pending.square)
            .ok_or(Rejection::NoPromotionPending)?;

        self.place(pawn.promoted(kind), pending.square);
        self.promotion = None;

        Ok(pending)
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    /// Wrapper for [`Board::from_fen`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Board {
    /// The standard starting position, with White to move.
    #[inline(always)]
    fn default() -> Self {
        let mut board = Self::new();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for color in Color::all() {
            for (file, kind) in File::iter().zip(back_rank) {
                board.place(Piece::new(color, kind), Square::new(file, Rank::first(color)));
                board.place(
                    Piece::new(color, PieceKind::Pawn),
                    Square::new(file, Rank::second(color)),
                );
            }
        }

        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(198);

        for rank in Rank::iter().rev() {
            board += &format!("{rank}| ");

            for file in File::iter() {
                let occupant = self
                    .piece_at(Square::new(file, rank))
                    .map(Piece::to_uci)
                    .unwrap_or('.');

                board += &format!("{occupant} ");
            }

            board += "\n"
        }
        board += " +";
        for _ in File::iter() {
            board += "--";
        }
        board += "\n   ";
        for file in File::iter() {
            board += &format!("{file} ");
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}\n\nFEN: {}", self.to_fen())?;

        if let Some(last) = self.last_move {
            write!(f, "\nLast move: {last}")?;
        }
        if let Some(pending) = self.promotion {
            write!(f, "\nAwaiting promotion: {pending}")?;
        }

        Ok(())
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.mailbox[index.index()]
    }
}

impl IndexMut<Square> for Board {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.mailbox[index.index()]
    }
}
