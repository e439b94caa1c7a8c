//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! A match has exactly two seats, numbered 1 and 2 by the game server.
//! Which seat is the local player changes from match to match and must be
//! resolved from the log (see `matches::resolve_local_seat`).
//!
//! ## SeatMap
//!
//! Per-seat storage with O(1) access, indexable by `Seat`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two competing player slots of a match.
///
/// Only seats 1 and 2 exist; anything else is rejected at decode time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seat(u8);

impl Seat {
    /// The first seat.
    pub const ONE: Seat = Seat(1);
    /// The second seat.
    pub const TWO: Seat = Seat(2);

    /// Create a seat, returning `None` for numbers other than 1 or 2.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        match number {
            1 | 2 => Some(Self(number)),
            _ => None,
        }
    }

    /// The seat number as written in the log (1 or 2).
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index for array storage.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The other seat of the match.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self.0 {
            1 => Self::TWO,
            _ => Self::ONE,
        }
    }

    /// Both seats in order.
    pub fn all() -> impl Iterator<Item = Seat> {
        [Self::ONE, Self::TWO].into_iter()
    }
}

/// Error for seat numbers outside 1..=2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidSeat(pub u8);

impl std::fmt::Display for InvalidSeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seat {} is not 1 or 2", self.0)
    }
}

impl TryFrom<u8> for Seat {
    type Error = InvalidSeat;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Seat::new(value).ok_or(InvalidSeat(value))
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.0
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage.
///
/// ## Example
///
/// ```
/// use arena_log::core::{Seat, SeatMap};
///
/// let mut library: SeatMap<usize> = SeatMap::with_default();
/// library[Seat::TWO] = 60;
///
/// assert_eq!(library[Seat::ONE], 0);
/// assert_eq!(library[Seat::TWO], 60);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; 2],
}

impl<T> SeatMap<T> {
    /// Create a SeatMap with values from a factory function.
    pub fn new(factory: impl Fn(Seat) -> T) -> Self {
        Self {
            data: [factory(Seat::ONE), factory(Seat::TWO)],
        }
    }

    /// Create a SeatMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        Seat::all().zip(self.data.iter())
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_basics() {
        assert_eq!(Seat::new(1), Some(Seat::ONE));
        assert_eq!(Seat::new(2), Some(Seat::TWO));
        assert_eq!(Seat::new(0), None);
        assert_eq!(Seat::new(3), None);

        assert_eq!(Seat::ONE.index(), 0);
        assert_eq!(Seat::TWO.index(), 1);
        assert_eq!(Seat::ONE.opponent(), Seat::TWO);
        assert_eq!(Seat::TWO.opponent(), Seat::ONE);
        assert_eq!(format!("{}", Seat::TWO), "Seat 2");
    }

    #[test]
    fn test_seat_decoding() {
        let seat: Seat = serde_json::from_str("2").unwrap();
        assert_eq!(seat, Seat::TWO);
        assert!(serde_json::from_str::<Seat>("3").is_err());
        assert_eq!(serde_json::to_string(&Seat::ONE).unwrap(), "1");
    }

    #[test]
    fn test_seat_map_new() {
        let map: SeatMap<u8> = SeatMap::new(|s| s.number() * 10);
        assert_eq!(map[Seat::ONE], 10);
        assert_eq!(map[Seat::TWO], 20);
    }

    #[test]
    fn test_seat_map_mutation_and_iter() {
        let mut map: SeatMap<Vec<i32>> = SeatMap::with_default();
        map[Seat::TWO].push(5);

        let pairs: Vec<_> = map.iter().map(|(s, v)| (s, v.len())).collect();
        assert_eq!(pairs, vec![(Seat::ONE, 0), (Seat::TWO, 1)]);
    }
}
