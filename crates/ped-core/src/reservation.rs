//! Waiting-spot reservation token.

use std::fmt;

use crate::AreaId;

/// Proof that one spot in one waiting area is held by one agent.
///
/// The token is neither `Copy` nor `Clone`: it is created when a waiting
/// area hands out a spot and consumed when the spot is released, so a spot
/// cannot be released twice and an agent cannot hold two spots at once.
#[derive(Debug, PartialEq, Eq)]
pub struct SpotReservation {
    area: AreaId,
    spot: usize,
}

impl SpotReservation {
    /// Issue a token.  Only waiting areas should call this, right after
    /// marking `spot` occupied.
    #[doc(hidden)]
    pub fn issue(area: AreaId, spot: usize) -> Self {
        Self { area, spot }
    }

    #[inline]
    pub fn area(&self) -> AreaId {
        self.area
    }

    #[inline]
    pub fn spot(&self) -> usize {
        self.spot
    }
}

impl fmt::Display for SpotReservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} spot {}", self.area, self.spot)
    }
}
