/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{legal_moves, legal_moves_in_place, Board};

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// # Example
/// ```
/// # use gambit::{perft, Board};
/// assert_eq!(perft(&Board::default(), 2), 400);
/// ```
#[inline(always)]
pub fn perft(board: &Board, depth: usize) -> u64 {
    perft_generic::<true, false>(board, depth)
}

/// Perform a splitperft at the specified depth, printing the number of nodes reachable after each move available at the root node.
#[inline(always)]
pub fn splitperft(board: &Board, depth: usize) -> u64 {
    perft_generic::<true, true>(board, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
///
/// Every node is a fresh copy of its parent.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(board: &Board, depth: usize) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return legal_moves(board).len() as u64;
    }
    // Recursion limit; return 1, since we're fathoming this node.
    else if depth == 0 {
        return 1;
    }

    legal_moves(board).into_iter().fold(0, |nodes, mv| {
        let new_nodes = perft_generic::<BULK, false>(&board.with_move_played(mv), depth - 1);

        if SPLIT {
            println!("{mv}\t{new_nodes}");
        }

        nodes + new_nodes
    })
}

/// Same as [`perft_generic`] with bulk counting, but walks the tree by making and unmaking moves on a single [`Board`].
///
/// `board` is left exactly as it was found.
pub fn perft_in_place(board: &mut Board, depth: usize) -> u64 {
    if depth == 1 {
        return legal_moves_in_place(board).len() as u64;
    } else if depth == 0 {
        return 1;
    }

    legal_moves_in_place(board)
        .into_iter()
        .fold(0, |nodes, mv| {
            let undo = board.make_move(mv);
            board.toggle_side_to_move();

            let new_nodes = perft_in_place(board, depth - 1);

            board.toggle_side_to_move();
            board.unmake_move(undo);

            nodes + new_nodes
        })
}
