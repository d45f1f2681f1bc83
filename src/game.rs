/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    is_checkmate, is_in_check, legal_destinations, Board, Color, Move, PendingPromotion, PieceKind,
    Rejection, Square, SquareList,
};

/// What a [`Game`] is waiting for next.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    /// The side to move must pick one of its pieces.
    AwaitingSelection,

    /// A piece is selected and the side to move must pick where it goes.
    AwaitingDestination(Square),

    /// A Pawn reached its last rank and the side to move must pick what it becomes.
    AwaitingPromotion(PendingPromotion),

    /// The game is over.
    Checkmate { winner: Color },
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingSelection => write!(f, "awaiting selection"),
            Self::AwaitingDestination(square) => write!(f, "awaiting destination for {square}"),
            Self::AwaitingPromotion(pending) => write!(f, "awaiting promotion of the {pending}"),
            Self::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
        }
    }
}

/// The result of an accepted move or promotion.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// The move was played and the turn passed. `check` is set if the new side to move is in check.
    Played { mv: Move, check: bool },

    /// The Pawn was moved onto its last rank and a promotion must be chosen before the turn passes.
    PromotionRequired(PendingPromotion),

    /// The move delivered checkmate and the game is over.
    Checkmate { winner: Color },
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Played { mv, check: true } => write!(f, "{mv} (check)"),
            Self::Played { mv, check: false } => write!(f, "{mv}"),
            Self::PromotionRequired(pending) => write!(f, "promote the {pending}"),
            Self::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
        }
    }
}

/// A game of chess driven one input at a time, as a player would click through it.
///
/// A turn is a selection followed by a destination, and possibly a promotion choice.
/// Inputs that do not fit the current [`GameState`] are refused with a [`Rejection`].
///
/// # Example
/// ```
/// # use gambit::{Game, GameState, MoveOutcome, Color};
/// let mut game = Game::default();
/// let e2 = "e2".parse().unwrap();
/// let e4 = "e4".parse().unwrap();
///
/// game.select_square(e2).unwrap();
/// assert_eq!(game.state(), GameState::AwaitingDestination(e2));
///
/// let outcome = game.submit_destination(e4).unwrap();
/// assert!(matches!(outcome, MoveOutcome::Played { check: false, .. }));
/// assert_eq!(game.side_to_move(), Color::Black);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Game {
    board: Board,

    /// The square of the piece picked to move, if any.
    selection: Option<Square>,

    /// Set once a side has been checkmated, holding the winner.
    winner: Option<Color>,
}

impl Game {
    /// Starts a game from the provided [`Board`].
    ///
    /// If the side to move is already checkmated, the game starts out over.
    pub fn new(board: Board) -> Self {
        let side = board.side_to_move();
        let winner = is_checkmate(&board, side).then(|| side.opponent());

        Self {
            board,
            selection: None,
            winner,
        }
    }

    /// Starts a game from a placement string. See [`Board::from_layout`].
    pub fn from_layout(layout: &str) -> Result<Self> {
        Ok(Self::new(Board::from_layout(layout)?))
    }

    /// Starts a game from a FEN string. See [`Board::from_fen`].
    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::new(Board::from_fen(fen)?))
    }

    /// Read-only access to the board, for drawing it.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// The currently selected square, if any.
    #[inline(always)]
    pub const fn selection(&self) -> Option<Square> {
        self.selection
    }

    #[inline(always)]
    pub const fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.board.pending_promotion()
    }

    /// Returns `true` once a side has been checkmated.
    #[inline(always)]
    pub const fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// The side that delivered checkmate, if the game is over.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Returns `true` if `color`'s King is currently attacked.
    #[inline(always)]
    pub fn is_in_check(&self, color: Color) -> bool {
        is_in_check(&self.board, color)
    }

    /// Returns `true` if `color` is in check and has no legal move.
    #[inline(always)]
    pub fn is_checkmate(&self, color: Color) -> bool {
        is_checkmate(&self.board, color)
    }

    /// The legal destinations of the piece on `square`, for highlighting move hints.
    #[inline(always)]
    pub fn legal_destinations(&self, square: Square) -> SquareList {
        legal_destinations(&self.board, square)
    }

    /// Reports what the game is waiting for.
    pub fn state(&self) -> GameState {
        if let Some(winner) = self.winner {
            GameState::Checkmate { winner }
        } else if let Some(pending) = self.pending_promotion() {
            GameState::AwaitingPromotion(pending)
        } else if let Some(square) = self.selection {
            GameState::AwaitingDestination(square)
        } else {
            GameState::AwaitingSelection
        }
    }

    /// Picks the piece on `square` to be moved.
    ///
    /// Accepted only while nothing is selected, and only for a piece of the side to move.
    pub fn select_square(&mut self, square: Square) -> Result<(), Rejection> {
        self.check_accepting_moves()?;

        if let Some(selected) = self.selection {
            return Err(rejected(Rejection::SelectionActive { square: selected }));
        }

        let Some(piece) = self.board.piece_at(square) else {
            return Err(rejected(Rejection::EmptySquare { square }));
        };

        let side_to_move = self.side_to_move();
        if piece.color() != side_to_move {
            return Err(rejected(Rejection::NotYourPiece {
                square,
                owner: piece.color(),
                side_to_move,
            }));
        }

        debug!(%square, piece = %piece.name(), "selected");
        self.selection = Some(square);
        Ok(())
    }

    /// Moves the selected piece to `square`, if that is one of its legal destinations.
    ///
    /// An illegal destination clears the selection and leaves the board untouched.
    /// A Pawn reaching its last rank waits there for [`Game::resolve_promotion`] before the turn passes.
    pub fn submit_destination(&mut self, square: Square) -> Result<MoveOutcome, Rejection> {
        self.check_accepting_moves()?;

        let Some(from) = self.selection.take() else {
            return Err(rejected(Rejection::NoSelection));
        };

        if !legal_destinations(&self.board, from).contains(&square) {
            return Err(rejected(Rejection::IllegalMove { from, to: square }));
        }

        let mv = Move::new(from, square);
        self.board.make_move(mv);
        debug!(%mv, "moved");

        if let Some(pending) = self.board.pending_promotion() {
            info!(%pending, "awaiting promotion");
            return Ok(MoveOutcome::PromotionRequired(pending));
        }

        Ok(self.pass_turn(mv))
    }

    /// Turns the Pawn awaiting promotion into a piece of `kind`, then passes the turn.
    ///
    /// Only Queens, Rooks, Bishops, and Knights may be chosen.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<MoveOutcome, Rejection> {
        if let Some(winner) = self.winner {
            return Err(rejected(Rejection::GameOver { winner }));
        }

        let pending = self.board.resolve_promotion(kind).map_err(rejected)?;

        let from = self
            .board
            .last_move()
            .map(|last| last.from)
            .unwrap_or(pending.square);
        let mv = Move::with_promotion(from, pending.square, kind);
        debug!(%mv, "promoted");

        Ok(self.pass_turn(mv))
    }

    /// A single entry point for square input: selects when nothing is selected, and otherwise submits a destination.
    ///
    /// Returns the outcome of the move, if this input completed one.
    pub fn click(&mut self, square: Square) -> Result<Option<MoveOutcome>, Rejection> {
        if self.selection.is_none() {
            self.select_square(square).map(|()| None)
        } else {
            self.submit_destination(square).map(Some)
        }
    }

    /// Refuses input once the game is over or while a promotion is outstanding.
    fn check_accepting_moves(&self) -> Result<(), Rejection> {
        if let Some(winner) = self.winner {
            return Err(rejected(Rejection::GameOver { winner }));
        }

        if let Some(pending) = self.pending_promotion() {
            return Err(rejected(Rejection::PromotionPending { pending }));
        }

        Ok(())
    }

    /// Hands the move to the other side and checks whether they have been mated.
    fn pass_turn(&mut self, mv: Move) -> MoveOutcome {
        self.board.toggle_side_to_move();
        let side = self.side_to_move();

        if is_checkmate(&self.board, side) {
            let winner = side.opponent();
            info!(%mv, %winner, "checkmate");
            self.winner = Some(winner);
            return MoveOutcome::Checkmate { winner };
        }

        let check = is_in_check(&self.board, side);
        info!(%mv, %side, check, "turn passed");

        MoveOutcome::Played { mv, check }
    }
}

/// Logs a refused input before handing it back.
fn rejected(rejection: Rejection) -> Rejection {
    info!(%rejection, "input rejected");
    rejection
}

impl FromStr for Game {
    type Err = anyhow::Error;
    /// Wrapper for [`Game::from_fen`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{} to move, {}", self.board, self.side_to_move(), self.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn play(game: &mut Game, from: &str, to: &str) -> MoveOutcome {
        game.select_square(sq(from)).unwrap();
        game.submit_destination(sq(to)).unwrap()
    }

    #[test]
    fn test_selection_rejections() {
        let mut game = Game::default();

        assert_eq!(
            game.select_square(sq("e4")),
            Err(Rejection::EmptySquare { square: sq("e4") })
        );
        assert_eq!(
            game.select_square(sq("e7")),
            Err(Rejection::NotYourPiece {
                square: sq("e7"),
                owner: Color::Black,
                side_to_move: Color::White
            })
        );
        assert_eq!(game.state(), GameState::AwaitingSelection);

        game.select_square(sq("g1")).unwrap();
        assert_eq!(
            game.select_square(sq("b1")),
            Err(Rejection::SelectionActive { square: sq("g1") })
        );
        assert_eq!(game.selection(), Some(sq("g1")));
    }

    #[test]
    fn test_destination_without_selection() {
        let mut game = Game::default();
        assert_eq!(
            game.submit_destination(sq("e4")),
            Err(Rejection::NoSelection)
        );
    }

    #[test]
    fn test_illegal_move_is_idempotent() {
        let mut game = Game::default();
        let before = *game.board();

        for _ in 0..3 {
            game.select_square(sq("e2")).unwrap();
            assert_eq!(
                game.submit_destination(sq("e5")),
                Err(Rejection::IllegalMove {
                    from: sq("e2"),
                    to: sq("e5")
                })
            );
            assert_eq!(game.board(), &before);
            assert_eq!(game.state(), GameState::AwaitingSelection);
            assert_eq!(game.side_to_move(), Color::White);
        }
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::default();
        play(&mut game, "e2", "e4");
        assert_eq!(game.side_to_move(), Color::Black);

        // White may not move twice
        assert!(matches!(
            game.select_square(sq("d2")),
            Err(Rejection::NotYourPiece { .. })
        ));

        play(&mut game, "e7", "e5");
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn test_check_is_reported() {
        let mut game = Game::default();
        play(&mut game, "e2", "e4");
        play(&mut game, "f7", "f6");
        let outcome = play(&mut game, "d1", "h5");
        assert_eq!(
            outcome,
            MoveOutcome::Played {
                mv: Move::new(Square::D1, sq("h5")),
                check: true
            }
        );
        assert!(game.is_in_check(Color::Black));
    }

    #[test]
    fn test_fools_mate_ends_the_game() {
        let mut game = Game::default();
        play(&mut game, "f2", "f3");
        play(&mut game, "e7", "e5");
        play(&mut game, "g2", "g4");
        let outcome = play(&mut game, "d8", "h4");

        assert_eq!(outcome, MoveOutcome::Checkmate { winner: Color::Black });
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Color::Black));
        assert_eq!(game.state(), GameState::Checkmate { winner: Color::Black });

        let before = game.clone();
        assert_eq!(
            game.select_square(Square::E1),
            Err(Rejection::GameOver { winner: Color::Black })
        );
        assert_eq!(game.click(sq("a2")), Err(Rejection::GameOver { winner: Color::Black }));
        assert_eq!(game, before);
    }

    #[test]
    fn test_promotion_flow() {
        let mut game = Game::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let outcome = play(&mut game, "b7", "b8");

        let pending = PendingPromotion {
            square: Square::B8,
            color: Color::White,
        };
        assert_eq!(outcome, MoveOutcome::PromotionRequired(pending));
        assert_eq!(game.state(), GameState::AwaitingPromotion(pending));
        // The turn has not passed yet
        assert_eq!(game.side_to_move(), Color::White);

        // Everything else is blocked until the promotion is resolved
        assert_eq!(
            game.select_square(Square::E1),
            Err(Rejection::PromotionPending { pending })
        );
        assert_eq!(
            game.resolve_promotion(PieceKind::King),
            Err(Rejection::InvalidPromotion {
                kind: PieceKind::King
            })
        );
        assert_eq!(
            game.resolve_promotion(PieceKind::Pawn),
            Err(Rejection::InvalidPromotion {
                kind: PieceKind::Pawn
            })
        );

        // A Rook on b8 checks the King on e8 along the back rank
        let outcome = game.resolve_promotion(PieceKind::Rook).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Played {
                mv: Move::with_promotion(sq("b7"), Square::B8, PieceKind::Rook),
                check: true
            }
        );
        assert_eq!(
            game.board().piece_at(Square::B8).unwrap().parts(),
            (Color::White, PieceKind::Rook)
        );
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.resolve_promotion(PieceKind::Queen), Err(Rejection::NoPromotionPending));
    }

    #[test]
    fn test_castling_moves_the_rook() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut game, "e1", "g1");
        assert_eq!(game.board().to_layout(), "r3k2r/8/8/8/8/8/8/R4RK1");
        assert!(game.board().piece_at(Square::F1).unwrap().has_moved());

        play(&mut game, "e8", "c8");
        assert_eq!(game.board().to_layout(), "2kr3r/8/8/8/8/8/8/R4RK1");
    }

    #[test]
    fn test_en_passant_removes_the_pawn() {
        let mut game = Game::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
        play(&mut game, "d7", "d5");
        assert!(game.legal_destinations(sq("e5")).contains(&sq("d6")));

        play(&mut game, "e5", "d6");
        assert_eq!(game.board().to_layout(), "4k3/8/3P4/8/8/8/8/4K3");
    }

    #[test]
    fn test_click_selects_then_moves() {
        let mut game = Game::default();
        assert_eq!(game.click(sq("g1")), Ok(None));
        assert_eq!(
            game.click(sq("f3")),
            Ok(Some(MoveOutcome::Played {
                mv: Move::new(Square::G1, sq("f3")),
                check: false
            }))
        );
    }

    #[test]
    fn test_already_mated_position_is_over() {
        let game = Game::from_layout("3R2k1/5ppp/8/8/8/8/8/6K1").unwrap();
        // White to move by default, so Black being mated is not noticed
        assert!(!game.is_game_over());
        assert!(game.is_checkmate(Color::Black));

        let game = Game::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(game.winner(), Some(Color::White));
    }
}
