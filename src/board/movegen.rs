/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, File, Piece, PieceKind, Rank, Square, SquareList};

/// `(file, rank)` steps along the four ranks and files.
const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// `(file, rank)` steps along the four diagonals.
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// `(file, rank)` offsets of every square a Knight can jump to.
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// `(file, rank)` offsets of every square adjacent to a King.
const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Generates the pseudo-legal destinations of the piece standing on `square`.
///
/// Pseudo-legal moves follow how each piece moves, but may leave the mover's own King in check.
/// If `square` is empty, there are no destinations.
///
/// # Example
/// ```
/// # use gambit::{Board, pseudo_legal_destinations};
/// let board = Board::default();
/// let g1 = "g1".parse().unwrap();
/// let destinations = pseudo_legal_destinations(&board, g1);
/// assert_eq!(destinations.len(), 2);
/// ```
pub fn pseudo_legal_destinations(board: &Board, square: Square) -> SquareList {
    let Some(&piece) = board.piece_at(square) else {
        return SquareList::new();
    };

    match piece.kind() {
        PieceKind::Pawn => pawn_destinations(board, square, piece),
        PieceKind::Knight => knight_destinations(board, square, piece),
        PieceKind::Bishop => bishop_destinations(board, square, piece),
        PieceKind::Rook => rook_destinations(board, square, piece),
        PieceKind::Queen => queen_destinations(board, square, piece),
        PieceKind::King => king_destinations(board, square, piece),
    }
}

/// Pawns push forward onto empty squares and capture diagonally forward.
///
/// * One square forward, if it is empty.
/// * Two squares forward from the starting rank, if the Pawn has not moved and both squares are empty.
/// * One square diagonally forward, onto an enemy piece.
/// * En passant, onto the square an enemy Pawn skipped with a double push on the previous move,
///   if that Pawn landed directly beside this one.
pub fn pawn_destinations(board: &Board, square: Square, piece: Piece) -> SquareList {
    let mut destinations = SquareList::new();
    let color = piece.color();

    if let Some(single) = square.forward_by(color, 1).filter(|sq| is_empty(board, *sq)) {
        destinations.push(single);

        let can_double_push = !piece.has_moved() && square.rank() == Rank::second(color);
        if let Some(double) = square
            .forward_by(color, 2)
            .filter(|sq| can_double_push && is_empty(board, *sq))
        {
            destinations.push(double);
        }
    }

    for file_delta in [-1, 1] {
        let Some(target) = square.offset(file_delta, color.negation_multiplier()) else {
            continue;
        };

        if is_enemy(board, target, color) || is_en_passant(board, square, target, color) {
            destinations.push(target);
        }
    }

    destinations
}

/// Returns `true` if a `color` Pawn on `from` may capture en passant by moving to `target`.
fn is_en_passant(board: &Board, from: Square, target: Square, color: Color) -> bool {
    let Some(last) = board.last_move() else {
        return false;
    };

    let beside = Square::new(target.file(), from.rank());

    last.to == beside
        && last.is_two_rank_advance()
        && is_empty(board, target)
        && board
            .piece_at(beside)
            .is_some_and(|p| p.is_pawn() && p.color() != color)
}

/// Knights jump to any of the 8 squares an L-shape away that are not occupied by a friendly piece.
pub fn knight_destinations(board: &Board, square: Square, piece: Piece) -> SquareList {
    step(board, square, piece.color(), &KNIGHT_JUMPS)
}

/// Bishops slide along diagonals.
pub fn bishop_destinations(board: &Board, square: Square, piece: Piece) -> SquareList {
    slide(board, square, piece.color(), &DIAGONALS)
}

/// Rooks slide along ranks and files.
///
/// # Example
/// ```
/// # use gambit::{Board, Square, rook_destinations};
/// let board = Board::from_layout("8/8/8/8/3R4/8/8/8").unwrap();
/// let d4 = "d4".parse().unwrap();
/// let rook = *board.piece_at(d4).unwrap();
/// assert_eq!(rook_destinations(&board, d4, rook).len(), 14);
/// ```
pub fn rook_destinations(board: &Board, square: Square, piece: Piece) -> SquareList {
    slide(board, square, piece.color(), &ORTHOGONALS)
}

/// Queens slide along ranks, files, and diagonals.
pub fn queen_destinations(board: &Board, square: Square, piece: Piece) -> SquareList {
    let mut destinations = slide(board, square, piece.color(), &ORTHOGONALS);
    destinations.extend(slide(board, square, piece.color(), &DIAGONALS));
    destinations
}

/// Kings step onto any adjacent square not occupied by a friendly piece, and may castle.
///
/// Castling is offered when the King and the Rook on that side have never moved and every square between them is empty.
/// The destination is two files towards the Rook. Whether any of the squares involved are attacked is not considered here.
pub fn king_destinations(board: &Board, square: Square, piece: Piece) -> SquareList {
    let color = piece.color();
    let mut destinations = step(board, square, color, &KING_STEPS);

    let rank = Rank::first(color);
    if piece.has_moved() || square != Square::new(File::E, rank) {
        return destinations;
    }

    let sides: [(File, File, &[File]); 2] = [
        (File::H, File::G, &[File::F, File::G]),
        (File::A, File::C, &[File::B, File::C, File::D]),
    ];

    for (rook_file, king_file, between) in sides {
        let path_is_clear = between
            .iter()
            .all(|&file| is_empty(board, Square::new(file, rank)));

        if path_is_clear && board.has_castling_right(color, rook_file) {
            destinations.push(Square::new(king_file, rank));
        }
    }

    destinations
}

/// Walks each direction from `square` until the board edge, stopping before a friendly piece and on an enemy piece.
fn slide(board: &Board, square: Square, color: Color, directions: &[(i8, i8)]) -> SquareList {
    let mut destinations = SquareList::new();

    for &(df, dr) in directions {
        let mut current = square;
        while let Some(next) = current.offset(df, dr) {
            match board.piece_at(next) {
                None => destinations.push(next),
                Some(other) => {
                    if other.color() != color {
                        destinations.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }

    destinations
}

/// Collects every on-board offset from `square` that is not occupied by a friendly piece.
fn step(board: &Board, square: Square, color: Color, offsets: &[(i8, i8)]) -> SquareList {
    offsets
        .iter()
        .filter_map(|&(df, dr)| square.offset(df, dr))
        .filter(|&target| !board.piece_at(target).is_some_and(|p| p.color() == color))
        .collect()
}

#[inline(always)]
fn is_empty(board: &Board, square: Square) -> bool {
    board.piece_at(square).is_none()
}

#[inline(always)]
fn is_enemy(board: &Board, square: Square, color: Color) -> bool {
    board.piece_at(square).is_some_and(|p| p.color() != color)
}
