/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::Color;

/// Represents a single square on an `8x8` chess board.
///
/// Internally encoded as `file + rank * 8`, so the squares are numbered as follows:
/// ```text
/// 8| 56 57 58 59 60 61 62 63
/// 7| 48 49 50 51 52 53 54 55
/// 6| 40 41 42 43 44 45 46 47
/// 5| 32 33 34 35 36 37 38 39
/// 4| 24 25 26 27 28 29 30 31
/// 3| 16 17 18 19 20 21 22 23
/// 2|  8  9 10 11 12 13 14 15
/// 1|  0  1  2  3  4  5  6  7
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
///
/// Rank `1` is White's back rank, so White's Pawns advance towards rank `8`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    pub const A1: Self = Self::new(File::A, Rank::ONE);
    pub const B1: Self = Self::new(File::B, Rank::ONE);
    pub const C1: Self = Self::new(File::C, Rank::ONE);
    pub const D1: Self = Self::new(File::D, Rank::ONE);
    pub const E1: Self = Self::new(File::E, Rank::ONE);
    pub const F1: Self = Self::new(File::F, Rank::ONE);
    pub const G1: Self = Self::new(File::G, Rank::ONE);
    pub const H1: Self = Self::new(File::H, Rank::ONE);

    pub const A8: Self = Self::new(File::A, Rank::EIGHT);
    pub const B8: Self = Self::new(File::B, Rank::EIGHT);
    pub const C8: Self = Self::new(File::C, Rank::EIGHT);
    pub const D8: Self = Self::new(File::D, Rank::EIGHT);
    pub const E8: Self = Self::new(File::E, Rank::EIGHT);
    pub const F8: Self = Self::new(File::F, Rank::EIGHT);
    pub const G8: Self = Self::new(File::G, Rank::EIGHT);
    pub const H8: Self = Self::new(File::H, Rank::EIGHT);

    pub const MIN: u8 = 0;
    pub const MAX: u8 = 63;
    pub const COUNT: usize = 64;

    /// Returns an iterator over all available squares, starting at `a1` and ending at `h8`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap(), Square::A1);
    /// assert_eq!(iter.last().unwrap(), Square::H8);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Creates a new [`Square`] from the provided [`File`] and [`Rank`].
    ///
    /// # Example
    /// ```
    /// # use gambit::{Square, File, Rank};
    /// let e1 = Square::new(File::E, Rank::ONE);
    /// assert_eq!(e1, Square::E1);
    /// ```
    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(file.0 | rank.0 << 3)
    }

    /// Creates a new [`Square`] from a raw `(file, rank)` pair, as supplied by a view layer.
    ///
    /// Both values must be `[0, 7]` or else an error is returned.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::from_coords(4, 0).unwrap(), Square::E1);
    /// assert!(Square::from_coords(8, 0).is_err());
    /// ```
    #[inline(always)]
    pub fn from_coords(file: u8, rank: u8) -> Result<Self> {
        Ok(Self::new(File::new(file)?, Rank::new(rank)?))
    }

    /// Fetches the [`File`] of this [`Square`].
    #[inline(always)]
    pub const fn file(&self) -> File {
        File(self.0 & 0b000_111)
    }

    /// Fetches the [`Rank`] of this [`Square`].
    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        Rank(self.0 >> 3)
    }

    /// Fetches the [`File`] and [`Rank`] of this [`Square`].
    #[inline(always)]
    pub const fn parts(&self) -> (File, Rank) {
        (self.file(), self.rank())
    }

    /// Returns this [`Square`] as a `usize`, for indexing into lists of 64 elements.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Attempt to offset this [`Square`] by the file and rank offsets.
    ///
    /// If `self + offset` would leave the board, then `None` is returned.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// let c4: Square = "c4".parse().unwrap();
    /// assert_eq!(c4.offset(1, 1), Some("d5".parse().unwrap()));
    /// assert_eq!(Square::A1.offset(-1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let Some(file) = self.file().offset(file_delta) else {
            return None;
        };

        let Some(rank) = self.rank().offset(rank_delta) else {
            return None;
        };

        Some(Self::new(file, rank))
    }

    /// Moves this [`Square`] `n` ranks towards `color`'s opponent, if possible.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Color, Square};
    /// let e4: Square = "e4".parse().unwrap();
    /// assert_eq!(e4.forward_by(Color::White, 1), Some("e5".parse().unwrap()));
    /// assert_eq!(e4.forward_by(Color::Black, 1), Some("e3".parse().unwrap()));
    /// ```
    #[inline(always)]
    pub fn forward_by(&self, color: Color, n: u8) -> Option<Self> {
        self.offset(0, n as i8 * color.negation_multiplier())
    }

    /// Moves this [`Square`] `n` ranks towards `color`'s own back rank, if possible.
    #[inline(always)]
    pub fn backward_by(&self, color: Color, n: u8) -> Option<Self> {
        self.offset(0, n as i8 * color.opponent().negation_multiplier())
    }

    /// Creates a [`Square`] from a string such as `"e4"`. Case-insensitive.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::from_uci("h8").unwrap(), Square::H8);
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();

        let file = chars.next().context("Square must contain a file char")?;
        let rank = chars.next().context("Square must contain a rank char")?;

        if chars.next().is_some() {
            bail!("Square must be exactly two chars. Got {square:?}");
        }

        Ok(Self::new(File::from_char(file)?, Rank::from_char(rank)?))
    }

    /// Converts this [`Square`] to a string such as `"e4"`.
    #[inline(always)]
    pub fn to_uci(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Wrapper for [`Square::from_uci`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl TryFrom<(u8, u8)> for Square {
    type Error = anyhow::Error;
    /// Wrapper for [`Square::from_coords`].
    #[inline(always)]
    fn try_from((file, rank): (u8, u8)) -> Result<Self, Self::Error> {
        Self::from_coords(file, rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_uci().fmt(f)
    }
}

impl fmt::Debug for Square {
    /// Displays the square's name and its internal decimal value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_uci(), self.0)
    }
}

/// Represents one of eight ranks on a chess board.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Rank(u8);

impl Rank {
    pub const ONE: Self = Self(0);
    pub const TWO: Self = Self(1);
    pub const THREE: Self = Self(2);
    pub const FOUR: Self = Self(3);
    pub const FIVE: Self = Self(4);
    pub const SIX: Self = Self(5);
    pub const SEVEN: Self = Self(6);
    pub const EIGHT: Self = Self(7);

    pub const MIN: u8 = 0;
    pub const MAX: u8 = 7;
    pub const COUNT: usize = 8;

    /// Returns an iterator over all ranks, from `1` to `8`.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Construct a new [`Rank`] from the provided value.
    #[inline(always)]
    pub fn new(rank: u8) -> Result<Self> {
        if rank > Self::MAX {
            bail!(
                "Invalid int for Rank: Must be between [{}, {}]. Got {rank}",
                Self::MIN,
                Self::MAX
            );
        }

        Ok(Self(rank))
    }

    /// The back rank of `color`, where its pieces start.
    #[inline(always)]
    pub const fn first(color: Color) -> Self {
        match color {
            Color::White => Self::ONE,
            Color::Black => Self::EIGHT,
        }
    }

    /// The rank `color`'s Pawns start on.
    #[inline(always)]
    pub const fn second(color: Color) -> Self {
        match color {
            Color::White => Self::TWO,
            Color::Black => Self::SEVEN,
        }
    }

    /// The rank on which `color`'s Pawns promote.
    #[inline(always)]
    pub const fn eighth(color: Color) -> Self {
        Self::first(color.opponent())
    }

    pub fn from_char(rank: char) -> Result<Self> {
        let Some(rank_int) = rank.to_digit(10) else {
            bail!("Invalid char for Rank: Must be between [1, 8]. Got {rank:?}");
        };

        if !(1..=8).contains(&rank_int) {
            bail!("Invalid char for Rank: Must be between [1, 8]. Got {rank:?}");
        }

        Self::new(rank_int as u8 - 1)
    }

    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    /// Obtain the inner value as a `usize`.
    ///
    /// Useful for indexing.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'1') as char
    }

    /// Attempt to offset this [`Rank`] by the provided `delta`.
    ///
    /// If `self + delta` would exceed the bounds of the board, then `None` is returned.
    #[inline(always)]
    pub const fn offset(self, delta: i8) -> Option<Self> {
        match self.0.checked_add_signed(delta) {
            Some(bits) if bits <= Self::MAX => Some(Self(bits)),
            _ => None,
        }
    }

    /// Computes the absolute difference between `self` and `other`.
    #[inline(always)]
    pub const fn abs_diff(&self, other: Self) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.char(), self.0)
    }
}

/// Represents one of eight files on a chess board.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct File(u8);

impl File {
    pub const A: Self = Self(0);
    pub const B: Self = Self(1);
    pub const C: Self = Self(2);
    pub const D: Self = Self(3);
    pub const E: Self = Self(4);
    pub const F: Self = Self(5);
    pub const G: Self = Self(6);
    pub const H: Self = Self(7);

    pub const MIN: u8 = 0;
    pub const MAX: u8 = 7;
    pub const COUNT: usize = 8;

    /// Returns an iterator over all files, from `a` to `h`.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Construct a new [`File`] from the provided value.
    #[inline(always)]
    pub fn new(file: u8) -> Result<Self> {
        if file > Self::MAX {
            bail!(
                "Invalid int for File: Must be between [{}, {}]. Got {file}",
                Self::MIN,
                Self::MAX
            );
        }

        Ok(Self(file))
    }

    pub fn from_char(file: char) -> Result<Self> {
        let lower = file.to_ascii_lowercase();
        if !('a'..='h').contains(&lower) {
            bail!("Invalid char for File: Must be between [a, h]. Got {file:?}");
        }

        Self::new(lower as u8 - b'a')
    }

    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    /// Obtain the inner value as a `usize`.
    ///
    /// Useful for indexing.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'a') as char
    }

    /// Attempt to offset this [`File`] by the provided `delta`.
    ///
    /// If `self + delta` would exceed the bounds of the board, then `None` is returned.
    ///
    /// # Example
    /// ```
    /// # use gambit::File;
    /// assert_eq!(File::C.offset(1), Some(File::D));
    /// assert_eq!(File::A.offset(-1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(self, delta: i8) -> Option<Self> {
        match self.0.checked_add_signed(delta) {
            Some(bits) if bits <= Self::MAX => Some(Self(bits)),
            _ => None,
        }
    }

    /// Computes the absolute difference between `self` and `other`.
    ///
    /// # Example
    /// ```
    /// # use gambit::File;
    /// assert_eq!(File::B.abs_diff(File::H), 6);
    /// ```
    #[inline(always)]
    pub const fn abs_diff(&self, other: Self) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.char(), self.0)
    }
}
