mod error;
pub mod output;
mod simulation;


pub use error::{Error, Result};
use itertools::Itertools;
use rand::Rng;
pub use serde::Deserialize;
pub use simulation::*;
use std::fmt::{Display, Formatter};
use tracing::trace;

/// The box a ball sits in. `Left` is marker 0, `Right` is marker 1.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub const fn marker(self) -> u8 {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// Number of balls in each box.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Occupancy {
    pub left: usize,
    pub right: usize,
}

impl Occupancy {
    pub const fn total(&self) -> usize {
        self.left + self.right
    }

    pub const fn of(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn moved_to(&mut self, side: Side) {
        match side {
            Side::Left => {
                self.right -= 1;
                self.left += 1;
            }
            Side::Right => {
                self.left -= 1;
                self.right += 1;
            }
        }
    }
}

/// A single ball changing boxes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Transfer {
    pub ball: usize,
    pub to: Side,
}

/// N numbered balls, each in one of two boxes.
///
/// The occupancy is kept next to the markers and updated on every flip, so
/// reading it is O(1). [`Urn::occurrences`] recounts from scratch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Urn {
    balls: Vec<Side>,
    occupancy: Occupancy,
}

impl Urn {
    /// Balls `0..initial_left` start in the left box, the rest in the right box.
    pub fn new(balls: usize, initial_left: usize) -> Result<Urn> {
        if balls == 0 {
            return Err(Error::EmptyUrn);
        }
        if initial_left > balls {
            return Err(Error::InitialCountOutOfRange {
                initial_left,
                balls,
            });
        }
        let mut state = vec![Side::Left; initial_left];
        state.resize(balls, Side::Right);
        Ok(Urn {
            balls: state,
            occupancy: Occupancy {
                left: initial_left,
                right: balls - initial_left,
            },
        })
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    /// Always false, an empty urn cannot be built.
    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn balls(&self) -> &[Side] {
        &self.balls
    }

    pub fn side_of(&self, ball: usize) -> Option<Side> {
        self.balls.get(ball).copied()
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// Counts the balls in `side` by scanning the whole urn.
    pub fn occurrences(&self, side: Side) -> usize {
        self.balls.iter().filter(|b| **b == side).count()
    }

    /// Moves `ball` to the other box and returns the box it ended up in.
    ///
    /// Panics if `ball` is not smaller than [`Urn::len`].
    pub fn flip(&mut self, ball: usize) -> Side {
        let to = self.balls[ball].other();
        self.balls[ball] = to;
        self.occupancy.moved_to(to);
        to
    }

    /// Picks a ball uniformly over all N balls, whatever box it is in, and
    /// moves it to the other box.
    pub fn transfer_one_ball<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Transfer {
        let ball = rng.gen_range(0..self.balls.len());
        let to = self.flip(ball);
        trace!(ball, %to, left = self.occupancy.left, right = self.occupancy.right, "transfer");
        Transfer { ball, to }
    }
}

impl Display for Urn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.balls.iter().join(", "))
    }
}
