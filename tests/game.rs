/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gambit::{Color, Game, GameState, MoveOutcome, PieceKind, Rejection, Square};

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

/// Plays each move as two clicks, returning the outcome of the last one.
fn play(game: &mut Game, moves: &[&str]) -> MoveOutcome {
    let mut last = None;
    for mv in moves {
        let (from, to) = mv.split_at(2);
        assert_eq!(game.click(sq(from)), Ok(None), "selecting {from} in {mv}");
        last = game.click(sq(to)).unwrap_or_else(|r| panic!("{mv} rejected: {r}"));
    }
    last.unwrap()
}

#[test]
fn test_scholars_mate() {
    let mut game = Game::default();
    let outcome = play(
        &mut game,
        &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
    );

    assert_eq!(outcome, MoveOutcome::Checkmate { winner: Color::White });
    assert!(game.is_game_over());
    assert_eq!(game.winner(), Some(Color::White));
    assert!(game.is_checkmate(Color::Black));
    assert_eq!(game.state(), GameState::Checkmate { winner: Color::White });

    // Nothing moves once the game is over
    assert_eq!(
        game.click(sq("e8")),
        Err(Rejection::GameOver { winner: Color::White })
    );
}

#[test]
fn test_check_must_be_answered() {
    let mut game = Game::default();
    let outcome = play(&mut game, &["e2e4", "f7f6", "d1h5"]);
    assert!(matches!(outcome, MoveOutcome::Played { check: true, .. }));
    assert!(game.is_in_check(Color::Black));

    // A move that ignores the check is refused and clears the selection
    game.select_square(sq("a7")).unwrap();
    assert_eq!(
        game.submit_destination(sq("a6")),
        Err(Rejection::IllegalMove {
            from: sq("a7"),
            to: sq("a6")
        })
    );
    assert_eq!(game.selection(), None);

    // Blocking with the g-pawn is fine
    let outcome = play(&mut game, &["g7g6"]);
    assert_eq!(outcome, MoveOutcome::Played { mv: "g7g6".parse().unwrap(), check: false });
    assert!(!game.is_in_check(Color::Black));
}

#[test]
fn test_long_castle_then_castling_through_check() {
    let mut game = Game::from_fen("r3k3/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
    play(&mut game, &["e1c1"]);
    assert_eq!(game.board().to_layout(), "r3k3/8/8/8/8/8/8/2KR3R");

    // The Rook on d1 now watches d8, which Black's King would have to cross
    assert!(!game.legal_destinations(sq("e8")).contains(&sq("c8")));
    game.select_square(sq("e8")).unwrap();
    assert_eq!(
        game.submit_destination(sq("c8")),
        Err(Rejection::IllegalMove {
            from: sq("e8"),
            to: sq("c8")
        })
    );
}

#[test]
fn test_underpromotion_with_check() {
    let mut game = Game::from_fen("8/4kP2/8/8/8/8/8/K7 w - - 0 1").unwrap();

    game.select_square(sq("f7")).unwrap();
    let outcome = game.submit_destination(sq("f8")).unwrap();
    assert!(matches!(outcome, MoveOutcome::PromotionRequired(p) if p.square == sq("f8")));

    // The turn stays with White until the choice is made
    assert_eq!(game.side_to_move(), Color::White);
    assert!(matches!(game.click(sq("a1")), Err(Rejection::PromotionPending { .. })));
    assert_eq!(
        game.resolve_promotion(PieceKind::King),
        Err(Rejection::InvalidPromotion { kind: PieceKind::King })
    );

    // A Knight on f8 does not reach e7, so there is no check
    let outcome = game.resolve_promotion(PieceKind::Knight).unwrap();
    assert!(matches!(outcome, MoveOutcome::Played { check: false, .. }));
    assert_eq!(game.board().to_layout(), "5N2/4k3/8/8/8/8/8/K7");
    assert_eq!(game.side_to_move(), Color::Black);
    assert_eq!(
        game.resolve_promotion(PieceKind::Queen),
        Err(Rejection::NoPromotionPending)
    );
}

#[test]
fn test_en_passant_through_clicks() {
    let mut game = Game::default();
    play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);

    assert!(game.legal_destinations(sq("e5")).contains(&sq("d6")));
    play(&mut game, &["e5d6"]);
    assert_eq!(game.board().piece_at(sq("d5")), None);

    // The chance is gone once another move is played
    let mut game = Game::default();
    play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"]);
    assert!(!game.legal_destinations(sq("e5")).contains(&sq("d6")));
}
