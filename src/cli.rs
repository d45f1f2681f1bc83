/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::Parser;

use crate::{Color, PieceKind, Square};

/// Startup options for the terminal driver.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Start from this placement string instead of the standard starting position.
    ///
    /// Ranks are listed from 8 down to 1 and separated by `/`, as in `4k3/8/8/8/8/8/8/4K3`.
    #[arg(short, long)]
    pub layout: Option<String>,

    /// The side to move first when starting from `--layout`.
    #[arg(short, long, requires = "layout")]
    pub side: Option<Color>,

    /// Filter for log output, such as `info` or `gambit=debug`.
    ///
    /// Falls back to the `RUST_LOG` environment variable, then to `warn`.
    #[arg(long)]
    pub log: Option<String>,
}

/// A command sent to the driver, one per line of input.
#[derive(Debug, Clone, Parser)]
#[command(multicall = true, about)]
pub enum EngineCommand {
    /// Select the piece on the provided square, or move the selected piece there.
    Click { square: Square },

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Quit the driver.
    #[command(alias = "quit")]
    Exit,

    /// Print the placement string of the current board.
    Layout,

    /// Replace the game with a new one from the provided placement string.
    Load {
        layout: String,

        /// The side to move first.
        side: Option<Color>,

        /// Castling rights in FEN form, such as `KQkq` or `-`.
        castling: Option<String>,
    },

    /// Shows all legal moves for the side to move, or the legal destinations of a specific piece.
    Moves {
        square: Option<Square>,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are listed in the order they are generated.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Move the selected piece to the provided square.
    #[command(alias = "to")]
    Move { square: Square },

    /// Start a new game from the standard starting position.
    New,

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft {
        depth: usize,

        /// If set, the tree is walked by making and unmaking moves on a single board instead of copying it.
        #[arg(short, long, default_value = "false")]
        in_place: bool,
    },

    /// Choose the piece a waiting Pawn becomes: `q`, `r`, `b`, or `n`.
    Promote { kind: PieceKind },

    /// Select the piece on the provided square.
    Select { square: Square },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Print what the game is waiting for, and whether either side is in check.
    State,
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a line of input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cmd = "click e2".parse::<EngineCommand>().unwrap();
        assert!(matches!(cmd, EngineCommand::Click { square } if square == "e2".parse::<Square>().unwrap()));

        let cmd = "promote n".parse::<EngineCommand>().unwrap();
        assert!(matches!(cmd, EngineCommand::Promote { kind: PieceKind::Knight }));

        let cmd = "load 4k3/8/8/8/8/8/8/4K3 b -".parse::<EngineCommand>().unwrap();
        assert!(matches!(
            cmd,
            EngineCommand::Load { side: Some(Color::Black), .. }
        ));

        assert!(matches!("d".parse::<EngineCommand>(), Ok(EngineCommand::Display)));
        assert!(matches!("quit".parse::<EngineCommand>(), Ok(EngineCommand::Exit)));
        assert!(matches!(
            "perft 3 --in-place".parse::<EngineCommand>(),
            Ok(EngineCommand::Perft { depth: 3, in_place: true })
        ));
        assert!(matches!(
            "perft 2 -i".parse::<EngineCommand>(),
            Ok(EngineCommand::Perft { depth: 2, in_place: true })
        ));
        assert!(matches!(
            "splitperft 2".parse::<EngineCommand>(),
            Ok(EngineCommand::Splitperft { depth: 2 })
        ));
        assert!(matches!(
            "moves e2 --sort".parse::<EngineCommand>(),
            Ok(EngineCommand::Moves { sort: true, .. })
        ));
    }

    #[test]
    fn test_reject_bad_arguments() {
        assert!("select z9".parse::<EngineCommand>().is_err());
        assert!("promote dragon".parse::<EngineCommand>().is_err());
        assert!("fly".parse::<EngineCommand>().is_err());
    }
}
