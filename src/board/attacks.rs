/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{pseudo_legal_destinations, Board, Color, SquareList};

/// Returns `true` if `color`'s King can be reached by any pseudo-legal move of the opponent.
///
/// A side without a King is never in check.
///
/// # Example
/// ```
/// # use gambit::{Board, Color, is_in_check};
/// let board = Board::from_layout("4k3/8/8/8/8/8/8/4R1K1").unwrap();
/// assert!(is_in_check(&board, Color::Black));
/// assert!(!is_in_check(&board, Color::White));
///
/// let kingless = Board::from_layout("8/8/8/8/8/8/8/4R3").unwrap();
/// assert!(!is_in_check(&kingless, Color::Black));
/// ```
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.king_square(color) else {
        return false;
    };

    board
        .pieces(color.opponent())
        .any(|(square, _)| pseudo_legal_destinations(board, square).contains(&king))
}

/// Collects the squares of every opposing piece currently giving check to `color`'s King.
///
/// # Example
/// ```
/// # use gambit::{Board, Color, Square, checkers};
/// let board = Board::from_layout("4k3/8/8/8/8/3n4/8/4K2r").unwrap();
/// let found = checkers(&board, Color::White);
/// assert_eq!(found.len(), 2);
/// assert!(found.contains(&Square::H1));
/// ```
pub fn checkers(board: &Board, color: Color) -> SquareList {
    let Some(king) = board.king_square(color) else {
        return SquareList::new();
    };

    board
        .pieces(color.opponent())
        .filter(|(square, _)| pseudo_legal_destinations(board, *square).contains(&king))
        .map(|(square, _)| square)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pawns_only_check_diagonally() {
        let board = Board::from_layout("8/8/8/8/4p3/4K3/8/8").unwrap();
        assert!(!is_in_check(&board, Color::White));

        let board = Board::from_layout("8/8/8/8/3p4/4K3/8/8").unwrap();
        assert!(is_in_check(&board, Color::White));

        // Black pawns capture towards rank 1, so one "behind" the King gives no check
        let board = Board::from_layout("8/8/8/8/8/4K3/3p4/8").unwrap();
        assert!(!is_in_check(&board, Color::White));
    }

    #[test]
    fn test_blocked_slider_gives_no_check() {
        let board = Board::from_layout("4r3/8/8/8/8/8/4P3/4K3").unwrap();
        assert!(!is_in_check(&board, Color::White));
        assert!(checkers(&board, Color::White).is_empty());

        let board = Board::from_layout("4r3/8/8/8/8/8/3P4/4K3").unwrap();
        assert!(is_in_check(&board, Color::White));
    }

    #[test]
    fn test_start_position_is_quiet() {
        let board = Board::default();
        assert!(!is_in_check(&board, Color::White));
        assert!(!is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_checkers_from_every_side() {
        let board = Board::from_layout("4q3/8/3n1n2/2n3n1/4K3/2n3n1/3n1n2/8").unwrap();
        let found = checkers(&board, Color::White);
        assert_eq!(found.len(), 9);
        assert!(found.contains(&"e8".parse().unwrap()));
        assert!(checkers(&board, Color::Black).is_empty());
    }
}
