/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arrayvec::ArrayVec;

use super::{
    is_in_check, pseudo_legal_destinations, Board, Color, Move, MoveList, Piece, PieceKind, Rank,
    Square, SquareList, MAX_NUM_MOVES,
};

/// Computes the legal destinations of the piece on `square`, in the order they were generated.
///
/// Each pseudo-legal destination is played on a copy of `board` and kept only if the mover's King is not left in check.
/// A castling King must additionally not be in check already, nor pass over an attacked square.
///
/// # Example
/// ```
/// # use gambit::{Board, legal_destinations};
/// // The Knight on d2 is pinned against its King
/// let board = Board::from_layout("4k3/8/8/b7/8/8/3N4/4K3").unwrap();
/// let d2 = "d2".parse().unwrap();
/// assert!(legal_destinations(&board, d2).is_empty());
/// ```
pub fn legal_destinations(board: &Board, square: Square) -> SquareList {
    let Some(&piece) = board.piece_at(square) else {
        return SquareList::new();
    };
    let color = piece.color();

    pseudo_legal_destinations(board, square)
        .into_iter()
        .filter(|&to| {
            if is_castle(piece, square, to) && !castling_path_is_safe(board, square, to, color) {
                return false;
            }

            let mut copied = *board;
            copied.make_move(Move::new(square, to));
            !is_in_check(&copied, color)
        })
        .collect()
}

/// Computes the same destinations as [`legal_destinations`], but by making and unmaking each move on `board` itself.
///
/// `board` is left exactly as it was found.
pub fn legal_destinations_in_place(board: &mut Board, square: Square) -> SquareList {
    let Some(&piece) = board.piece_at(square) else {
        return SquareList::new();
    };
    let color = piece.color();
    let mut legal = SquareList::new();

    for to in pseudo_legal_destinations(board, square) {
        if is_castle(piece, square, to) && !castling_path_is_safe_in_place(board, square, to, color)
        {
            continue;
        }

        let undo = board.make_move(Move::new(square, to));
        let is_safe = !is_in_check(board, color);
        board.unmake_move(undo);

        if is_safe {
            legal.push(to);
        }
    }

    legal
}

/// Generates every legal move for the side to move.
///
/// A Pawn reaching its last rank yields four moves, one per piece it may promote to.
///
/// # Example
/// ```
/// # use gambit::{Board, legal_moves};
/// assert_eq!(legal_moves(&Board::default()).len(), 20);
///
/// let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
/// let promotions = legal_moves(&board).into_iter().filter(|mv| mv.is_promotion()).count();
/// assert_eq!(promotions, 4);
/// ```
pub fn legal_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::with_capacity(MAX_NUM_MOVES);

    for (from, piece) in board.pieces(board.side_to_move()) {
        let destinations = legal_destinations(board, from);
        push_moves(&mut moves, *piece, from, destinations);
    }

    moves
}

/// Computes the same moves as [`legal_moves`], using [`legal_destinations_in_place`].
pub fn legal_moves_in_place(board: &mut Board) -> MoveList {
    let mut moves = MoveList::with_capacity(MAX_NUM_MOVES);

    let origins = board
        .pieces(board.side_to_move())
        .map(|(square, piece)| (square, *piece))
        .collect::<ArrayVec<_, { Square::COUNT }>>();

    for (from, piece) in origins {
        let destinations = legal_destinations_in_place(board, from);
        push_moves(&mut moves, piece, from, destinations);
    }

    moves
}

/// Returns `true` if `color` is in check and none of its pieces has a legal destination.
///
/// # Example
/// ```
/// # use gambit::{Board, Color, is_checkmate};
/// // Back rank mate
/// let board = Board::from_layout("3R2k1/5ppp/8/8/8/8/8/6K1").unwrap();
/// assert!(is_checkmate(&board, Color::Black));
///
/// // ...unless the King has somewhere to run
/// let board = Board::from_layout("3R2k1/5pp1/8/8/8/8/8/6K1").unwrap();
/// assert!(!is_checkmate(&board, Color::Black));
/// ```
pub fn is_checkmate(board: &Board, color: Color) -> bool {
    if !is_in_check(board, color) {
        return false;
    }

    board
        .pieces(color)
        .all(|(square, _)| legal_destinations(board, square).is_empty())
}

/// Appends a [`Move`] for every destination, expanding a Pawn's arrival on its last rank into each promotion.
fn push_moves(moves: &mut MoveList, piece: Piece, from: Square, destinations: SquareList) {
    for to in destinations {
        if piece.is_pawn() && to.rank() == Rank::eighth(piece.color()) {
            moves.extend(
                PieceKind::promotions()
                    .into_iter()
                    .map(|promotion| Move::with_promotion(from, to, promotion)),
            );
        } else {
            moves.push(Move::new(from, to));
        }
    }
}

/// Returns `true` if moving `piece` from `from` to `to` is a castle.
#[inline(always)]
fn is_castle(piece: Piece, from: Square, to: Square) -> bool {
    piece.is_king() && from.file().abs_diff(to.file()) == 2
}

/// The square a castling King passes over on its way from `from` to `to`.
#[inline(always)]
fn castling_transit(from: Square, to: Square) -> Option<Square> {
    let direction = if to.file() > from.file() { 1 } else { -1 };
    from.offset(direction, 0)
}

/// A King may not castle out of check, nor through an attacked square.
fn castling_path_is_safe(board: &Board, from: Square, to: Square, color: Color) -> bool {
    if is_in_check(board, color) {
        return false;
    }

    let Some(transit) = castling_transit(from, to) else {
        return false;
    };

    let mut copied = *board;
    copied.apply_move(from, transit);
    !is_in_check(&copied, color)
}

fn castling_path_is_safe_in_place(board: &mut Board, from: Square, to: Square, color: Color) -> bool {
    if is_in_check(board, color) {
        return false;
    }

    let Some(transit) = castling_transit(from, to) else {
        return false;
    };

    let undo = board.make_move(Move::new(from, transit));
    let is_safe = !is_in_check(board, color);
    board.unmake_move(undo);

    is_safe
}
