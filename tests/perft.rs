/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gambit::{perft_generic, perft_in_place, Board};

fn test_perft_fen_nodes(depth: usize, fen: &str, expected: u64) {
    let board = Board::from_fen(fen).unwrap();

    let res = perft_generic::<false, false>(&board, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on {fen}");

    let mut in_place = board;
    let res = perft_in_place(&mut in_place, depth);
    assert_eq!(res, expected, "in-place PERFT({depth}) failed on {fen}");
    assert_eq!(in_place, board, "in-place PERFT({depth}) changed {fen}");
}

#[cfg(test)]
mod startpos_perft {
    use crate::test_perft_fen_nodes;
    use gambit::FEN_STARTPOS;

    #[test]
    fn test_startpos_perft_1() {
        test_perft_fen_nodes(1, FEN_STARTPOS, 20);
    }
    #[test]
    fn test_startpos_perft_2() {
        test_perft_fen_nodes(2, FEN_STARTPOS, 400);
    }
    #[test]
    fn test_startpos_perft_3() {
        test_perft_fen_nodes(3, FEN_STARTPOS, 8902);
    }
    #[test]
    #[ignore = "slow without optimizations"]
    fn test_startpos_perft_4() {
        test_perft_fen_nodes(4, FEN_STARTPOS, 197281);
    }
}

#[cfg(test)]
mod promotion_perft {
    use crate::test_perft_fen_nodes;

    #[test]
    fn test_promotion_perft_1() {
        test_perft_fen_nodes(1, "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 24);
    }
    #[test]
    fn test_promotion_perft_2() {
        test_perft_fen_nodes(2, "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 496);
    }
    #[test]
    fn test_promotion_perft_3() {
        test_perft_fen_nodes(3, "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 9483);
    }
    #[test]
    #[ignore = "slow without optimizations"]
    fn test_promotion_perft_4() {
        test_perft_fen_nodes(4, "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", 182838);
    }
}

#[cfg(test)]
mod simple_perfts {
    use crate::test_perft_fen_nodes;
    use gambit::FEN_KIWIPETE;

    #[test]
    fn test_kiwipete_perft_1() {
        test_perft_fen_nodes(1, FEN_KIWIPETE, 48);
    }
    #[test]
    fn test_kiwipete_perft_2() {
        test_perft_fen_nodes(2, FEN_KIWIPETE, 2039);
    }
    #[test]
    #[ignore = "slow without optimizations"]
    fn test_kiwipete_perft_3() {
        test_perft_fen_nodes(3, FEN_KIWIPETE, 97862);
    }

    #[test]
    fn test_simple_perft_endgame() {
        test_perft_fen_nodes(1, "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -", 14);
        test_perft_fen_nodes(2, "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -", 191);
        test_perft_fen_nodes(3, "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -", 2812);
    }
    #[test]
    fn test_simple_perft_endgame_4() {
        test_perft_fen_nodes(4, "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -", 43238);
    }

    #[test]
    fn test_simple_perft_promotions_and_castling() {
        let fen = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
        test_perft_fen_nodes(1, fen, 6);
        test_perft_fen_nodes(2, fen, 264);
        test_perft_fen_nodes(3, fen, 9467);
    }

    #[test]
    fn test_simple_perft_discovered_checks() {
        let fen = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
        test_perft_fen_nodes(1, fen, 44);
        test_perft_fen_nodes(2, fen, 1486);
    }
}

#[cfg(test)]
mod special_perfts {
    use crate::test_perft_fen_nodes;

    #[test]
    fn test_special_perft_short_castling_available() {
        // Five King steps, seven Rook moves up the file, two along the rank, and castling
        test_perft_fen_nodes(1, "5k2/8/8/8/8/8/8/4K2R w K - 0 1", 15);
    }

    #[test]
    fn test_special_perft_long_castling_available() {
        // Five King steps, seven Rook moves up the file, three along the rank, and castling
        test_perft_fen_nodes(1, "3k4/8/8/8/8/8/8/R3K3 w Q - 0 1", 16);
    }

    #[test]
    fn test_special_perft_no_castling_rights() {
        test_perft_fen_nodes(1, "5k2/8/8/8/8/8/8/4K2R w - - 0 1", 14);
    }

    #[test]
    fn test_special_perft_lone_kings() {
        test_perft_fen_nodes(1, "k7/8/8/8/8/8/8/7K w - - 0 1", 3);
        test_perft_fen_nodes(2, "k7/8/8/8/8/8/8/7K w - - 0 1", 9);
    }

    #[test]
    #[ignore = "slow without optimizations"]
    fn test_special_perft_illegal_ep_move_1() {
        test_perft_fen_nodes(6, "3k4/3p4/8/K1P4r/8/8/8/8 b - - 0 1", 1134888);
    }

    #[test]
    #[ignore = "slow without optimizations"]
    fn test_special_perft_ep_capture_checks_opponent() {
        test_perft_fen_nodes(6, "8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1", 1440467);
    }

    #[test]
    #[ignore = "slow without optimizations"]
    fn test_special_perft_short_castling_gives_check() {
        test_perft_fen_nodes(6, "5k2/8/8/8/8/8/8/4K2R w K - 0 1", 661072);
    }

    #[test]
    #[ignore = "slow without optimizations"]
    fn test_special_perft_castling_prevented() {
        test_perft_fen_nodes(4, "r3k2r/8/3Q4/8/8/5q2/8/R3K2R b KQkq - 0 1", 1720476);
    }

    #[test]
    #[ignore = "slow without optimizations"]
    fn test_special_perft_promote_out_of_check() {
        test_perft_fen_nodes(6, "2K2r2/4P3/8/8/8/8/8/3k4 w - - 0 1", 3821001);
    }

    #[test]
    fn test_special_perft_self_stalemate() {
        test_perft_fen_nodes(6, "K1k5/8/P7/8/8/8/8/8 w - - 0 1", 2217);
    }
}
