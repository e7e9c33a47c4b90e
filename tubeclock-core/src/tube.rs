//! Validated tube indices

/// Number of tubes on the clock
pub const TUBE_COUNT: usize = 6;

/// Index outside the tube range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressError(pub usize);

/// Tube position, 0 (rightmost, seconds ones) to 5 (leftmost, hour tens)
///
/// Construction is the only place the range is checked; everything that
/// takes a `TubeIndex` can index fixed arrays without further checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TubeIndex(u8);

impl TubeIndex {
    /// All tubes in transmission order
    pub const ALL: [TubeIndex; TUBE_COUNT] = [
        TubeIndex(0),
        TubeIndex(1),
        TubeIndex(2),
        TubeIndex(3),
        TubeIndex(4),
        TubeIndex(5),
    ];

    /// Validate a raw index
    pub const fn new(index: usize) -> Result<Self, AddressError> {
        if index < TUBE_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(AddressError(index))
        }
    }

    /// Array index
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every tube
    pub fn iter() -> impl Iterator<Item = TubeIndex> {
        Self::ALL.into_iter()
    }
}

impl TryFrom<usize> for TubeIndex {
    type Error = AddressError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<TubeIndex> for usize {
    fn from(tube: TubeIndex) -> usize {
        tube.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        for i in 0..TUBE_COUNT {
            assert_eq!(TubeIndex::new(i).unwrap().get(), i);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(TubeIndex::new(6), Err(AddressError(6)));
        assert_eq!(TubeIndex::try_from(usize::MAX), Err(AddressError(usize::MAX)));
    }

    #[test]
    fn test_iter_order() {
        let order: Vec<usize> = TubeIndex::iter().map(usize::from).collect();
        assert_eq!(order, [0, 1, 2, 3, 4, 5]);
    }
}
