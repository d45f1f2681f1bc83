/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::{
    legal_moves, perft_generic, perft_in_place, Color, EngineCommand, Game, GameState, Move,
    MoveOutcome, Rejection,
};

/// The terminal driver: owns a [`Game`] and feeds it commands read from `stdin`.
///
/// It holds no rules of its own. Every decision is made by the [`Game`].
#[derive(Debug)]
pub struct Engine {
    /// The game being played.
    ///
    /// Replaced whenever a new game is started or a layout is loaded.
    game: Game,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] playing `game`, to be executed with [`Engine::run`].
    pub fn new(game: Game) -> Self {
        let (sender, receiver) = channel();

        Self {
            game,
            sender,
            receiver,
        }
    }

    /// Returns a string of the driver's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    pub fn run(&mut self) -> Result<()> {
        println!("{}", self.name());
        self.display();

        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(move || {
            if let Err(err) = input_handler(sender) {
                debug!("Input handler thread stopping: {err}");
            }
        });

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            if !self.execute(cmd) {
                break;
            }
        }

        Ok(())
    }

    /// Executes a single command, printing its results.
    ///
    /// Returns `false` once the engine should stop.
    pub fn execute(&mut self, cmd: EngineCommand) -> bool {
        debug!(?cmd, "executing");

        match cmd {
            EngineCommand::Click { square } => match self.game.click(square) {
                Ok(Some(outcome)) => self.report(outcome),
                Ok(None) => self.print_hints(),
                Err(rejection) => print_rejection(rejection),
            },

            EngineCommand::Display => self.display(),

            EngineCommand::Exit => return false,

            EngineCommand::Layout => println!("{}", self.game.board().to_layout()),

            EngineCommand::Load {
                layout,
                side,
                castling,
            } => {
                if let Err(err) = self.load(&layout, side, castling.as_deref()) {
                    eprintln!("Error: {err:#}");
                }
            }

            EngineCommand::Moves { square, sort } => self.moves(square, sort),

            EngineCommand::Move { square } => match self.game.submit_destination(square) {
                Ok(outcome) => self.report(outcome),
                Err(rejection) => print_rejection(rejection),
            },

            EngineCommand::New => {
                info!("starting a new game");
                self.game = Game::default();
                self.display();
            }

            EngineCommand::Perft { depth, in_place } => {
                let nodes = if in_place {
                    let mut board = *self.game.board();
                    perft_in_place(&mut board, depth)
                } else {
                    perft_generic::<true, false>(self.game.board(), depth)
                };
                println!("{nodes}");
            }

            EngineCommand::Promote { kind } => match self.game.resolve_promotion(kind) {
                Ok(outcome) => self.report(outcome),
                Err(rejection) => print_rejection(rejection),
            },

            EngineCommand::Select { square } => match self.game.select_square(square) {
                Ok(()) => self.print_hints(),
                Err(rejection) => print_rejection(rejection),
            },

            EngineCommand::Splitperft { depth } => {
                let nodes = perft_generic::<true, true>(self.game.board(), depth);
                println!("\n{nodes}");
            }

            EngineCommand::State => self.state(),
        };

        true
    }

    /// Replaces the game with one built from `layout`, the side to move, and castling rights.
    fn load(&mut self, layout: &str, side: Option<Color>, castling: Option<&str>) -> Result<()> {
        let side = side.unwrap_or_default();
        let fen = match castling {
            Some(castling) => format!("{layout} {} {castling}", side.to_uci()),
            None => format!("{layout} {}", side.to_uci()),
        };

        self.game = Game::from_fen(&fen).with_context(|| format!("Failed to load {layout:?}"))?;
        info!(%fen, "loaded a new position");

        self.display();
        Ok(())
    }

    /// Executes the `display` command, printing the current position.
    fn display(&self) {
        println!("{}", self.game);
    }

    /// Executes the `moves` command, printing all legal moves or the destinations of a single piece.
    fn moves(&self, square: Option<crate::Square>, sort: bool) {
        let mut moves = if let Some(square) = square {
            self.game
                .legal_destinations(square)
                .into_iter()
                .map(|to| Move::new(square, to).to_string())
                .collect::<Vec<_>>()
        } else {
            legal_moves(self.game.board())
                .into_iter()
                .map(|mv| mv.to_string())
                .collect::<Vec<_>>()
        };

        if sort {
            moves.sort();
        }

        // If there are none, print "(none)"
        let moves_string = if moves.is_empty() {
            String::from("(none)")
        } else {
            moves.join(", ")
        };
        println!("{moves_string}");
    }

    /// Executes the `state` command.
    fn state(&self) {
        println!("{} to move, {}", self.game.side_to_move(), self.game.state());

        for color in Color::all() {
            if self.game.is_in_check(color) {
                println!("{color} is in check");
            }
        }
    }

    /// Prints the destinations available to the freshly selected piece.
    fn print_hints(&self) {
        if let GameState::AwaitingDestination(square) = self.game.state() {
            let hints = self
                .game
                .legal_destinations(square)
                .into_iter()
                .map(|to| to.to_string())
                .collect::<Vec<_>>();

            if hints.is_empty() {
                println!("{square} selected, but it has no legal moves");
            } else {
                println!("{square} selected: {}", hints.join(", "));
            }
        }
    }

    /// Prints the board after an accepted move, along with what happens next.
    fn report(&self, outcome: MoveOutcome) {
        self.display();

        match outcome {
            MoveOutcome::Played { check: true, .. } => {
                println!("{} is in check", self.game.side_to_move())
            }
            MoveOutcome::PromotionRequired(pending) => {
                println!("Promote the {pending}: promote <q|r|b|n>")
            }
            MoveOutcome::Checkmate { winner } => println!("Checkmate! {winner} wins"),
            MoveOutcome::Played { check: false, .. } => {}
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Game::default())
    }
}

/// Rejections are part of normal play, so they are printed without ending anything.
fn print_rejection(rejection: Rejection) {
    println!("{rejection}");
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            // Send the Exit command and exit this function
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Engine received input of 0 bytes and is quitting");
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<EngineCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to engine")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => {
                warn!(input = buf, "unrecognized command");
                eprintln!("{err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;

    fn run_commands(engine: &mut Engine, commands: &[&str]) {
        for cmd in commands {
            let cmd = cmd.parse::<EngineCommand>().unwrap();
            assert!(engine.execute(cmd));
        }
    }

    #[test]
    fn test_commands_drive_the_game() {
        let mut engine = Engine::default();
        run_commands(&mut engine, &["select e2", "move e4", "click e7", "click e5"]);

        assert_eq!(
            engine.game().board().to_layout(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR"
        );
        assert_eq!(engine.game().side_to_move(), Color::White);
    }

    #[test]
    fn test_rejections_keep_running() {
        let mut engine = Engine::default();
        run_commands(&mut engine, &["move e4", "select e7", "promote q", "select e2", "move e5"]);
        assert_eq!(*engine.game().board(), Board::default());
    }

    #[test]
    fn test_load_replaces_the_game() {
        let mut engine = Engine::default();
        run_commands(&mut engine, &["load 4k3/P7/8/8/8/8/8/4K3 w -", "click a7", "click a8"]);
        assert_eq!(
            engine.game().state(),
            GameState::AwaitingPromotion(crate::PendingPromotion {
                square: crate::Square::A8,
                color: Color::White
            })
        );

        run_commands(&mut engine, &["promote q", "new"]);
        assert_eq!(engine.game(), &Game::default());

        // A bad layout leaves the current game in place
        run_commands(&mut engine, &["load 4k3/8 w"]);
        assert_eq!(engine.game(), &Game::default());
    }

    #[test]
    fn test_exit_stops() {
        let mut engine = Engine::default();
        assert!(!engine.execute(EngineCommand::Exit));
    }
}
