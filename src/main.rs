/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{Context, Result};
use clap::Parser;
use gambit::{Cli, Engine, Game};
use tracing_subscriber::EnvFilter;

/// Builds the starting game from the command-line options.
fn starting_game(cli: &Cli) -> Result<Game> {
    let Some(layout) = &cli.layout else {
        return Ok(Game::default());
    };

    let side = cli.side.unwrap_or_default();
    Game::from_fen(&format!("{layout} {}", side.to_uci()))
        .with_context(|| format!("Failed to start from layout {layout:?}"))
}

/// Builds the log filter from `--log`, falling back to `RUST_LOG` and then to `warn`.
///
/// The subscriber is not installed yet, so a bad `--log` filter is reported on stderr directly.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    if let Some(directives) = directives {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Ignoring invalid log filter {directives:?}: {e}"),
        }
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with the board on stdout
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let mut engine = match starting_game(&cli) {
        Ok(game) => Engine::new(game),
        Err(e) => {
            eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
            std::process::exit(1);
        }
    };

    if let Err(e) = engine.run() {
        eprintln!("{} encountered an error: {e}", env!("CARGO_PKG_NAME"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_from_flag() {
        let filter = log_filter(Some("gambit=debug"));
        assert!(filter.to_string().contains("gambit=debug"));
    }

    #[test]
    fn test_invalid_log_filter_falls_back() {
        let filter = log_filter(Some("gambit=loud"));
        assert!(!filter.to_string().contains("loud"));
    }

    #[test]
    fn test_starting_game_from_flags() {
        let cli = Cli::parse_from(["gambit", "--layout", "4k3/8/8/8/8/8/8/4K3", "--side", "b"]);
        let game = starting_game(&cli).unwrap();
        assert_eq!(game.side_to_move(), gambit::Color::Black);

        let cli = Cli::parse_from(["gambit", "--layout", "4k3/8"]);
        assert!(starting_game(&cli).is_err());
    }
}
