/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// All code related to the board itself: pieces, moves, and the rules that govern them.
mod board;

/// Command-line options and the commands accepted by the driver.
mod cli;

/// The terminal driver, including user input handling.
mod engine;

/// Reasons an input can be refused.
mod error;

/// The state machine of a game in progress: selection, promotion, turns, and checkmate.
mod game;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use error::*;
pub use game::*;
