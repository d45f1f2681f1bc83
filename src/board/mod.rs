/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Check detection.
mod attacks;

/// Filtering pseudo-legal moves down to legal ones, and checkmate.
mod legal;

/// Pseudo-legal move generation, one function per kind of piece.
mod movegen;

/// Moves, the last-move record, and fixed-capacity lists of both.
mod moves;

/// Performance testing of move generation.
mod perft;

/// Colors, piece kinds, and pieces.
mod piece;

/// The board and its state.
mod position;

/// Squares, ranks, and files.
mod square;

pub use attacks::*;
pub use legal::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use square::*;
