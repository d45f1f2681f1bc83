/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

use crate::{Color, PendingPromotion, PieceKind, Square};

/// Reasons a [`Game`](crate::Game) refuses an input.
///
/// These are informational: apart from [`Rejection::IllegalMove`], which clears the current selection,
/// a rejected input leaves the game exactly as it was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The game has ended in checkmate.
    #[error("The game is over: {winner} won by checkmate")]
    GameOver { winner: Color },

    /// A Pawn must be promoted before anything else can happen.
    #[error("Choose a piece for the {pending} before moving")]
    PromotionPending { pending: PendingPromotion },

    /// A piece is already selected, so the next input must be a destination.
    #[error("The piece on {square} is already selected")]
    SelectionActive { square: Square },

    /// Selected an empty square.
    #[error("There is no piece on {square}")]
    EmptySquare { square: Square },

    /// Selected a piece belonging to the side not on move.
    #[error("The piece on {square} belongs to {owner}, but it is {side_to_move}'s turn")]
    NotYourPiece {
        square: Square,
        owner: Color,
        side_to_move: Color,
    },

    /// Submitted a destination without selecting a piece first.
    #[error("Select a piece before choosing where to move it")]
    NoSelection,

    /// The destination is not among the selected piece's legal moves.
    #[error("The piece on {from} cannot legally move to {to}")]
    IllegalMove { from: Square, to: Square },

    /// Tried to promote while no Pawn was waiting for it.
    #[error("There is no Pawn awaiting promotion")]
    NoPromotionPending,

    /// Tried to promote to a Pawn or a King.
    #[error("A Pawn cannot promote to a {}", .kind.name())]
    InvalidPromotion { kind: PieceKind },
}
