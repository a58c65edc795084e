use serde::{Deserialize, Serialize};

/// Which column is asked and which is expected
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// prompt = term, expected = definition
    #[default]
    Forward,
    /// prompt = definition, expected = term
    Reverse,
}

impl Direction {
    pub fn from_reverse_flag(reverse: bool) -> Self {
        if reverse {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }
}

/// Correct/incorrect counters for one direction, indexed by item
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectionCounters {
    pub corrects: Vec<u32>,
    pub incorrects: Vec<u32>,
}

impl DirectionCounters {
    pub fn zeroed(len: usize) -> Self {
        Self {
            corrects: vec![0; len],
            incorrects: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.corrects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrects.is_empty()
    }

    pub fn total_corrects(&self) -> u64 {
        self.corrects.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn total_incorrects(&self) -> u64 {
        self.incorrects.iter().map(|&c| u64::from(c)).sum()
    }

    /// First counter array whose length is not `len`
    fn mismatched_len(&self, len: usize) -> Option<usize> {
        [self.corrects.len(), self.incorrects.len()]
            .into_iter()
            .find(|&l| l != len)
    }
}

/// Per-item statistics, kept separately for each direction.
///
/// Counters only ever grow; [`ItemStatistics::reset`] is the single exception.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemStatistics {
    forward: DirectionCounters,
    reverse: DirectionCounters,
}

impl ItemStatistics {
    pub fn new(len: usize) -> Self {
        Self {
            forward: DirectionCounters::zeroed(len),
            reverse: DirectionCounters::zeroed(len),
        }
    }

    /// Rebuild from stored counters covering `len` items.
    ///
    /// On failure returns the length of the first array that does not hold
    /// exactly `len` entries.
    pub fn from_parts(
        forward: DirectionCounters,
        reverse: DirectionCounters,
        len: usize,
    ) -> std::result::Result<Self, usize> {
        match forward
            .mismatched_len(len)
            .or_else(|| reverse.mismatched_len(len))
        {
            Some(bad) => Err(bad),
            None => Ok(Self { forward, reverse }),
        }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn counters(&self, direction: Direction) -> &DirectionCounters {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }

    fn counters_mut(&mut self, direction: Direction) -> &mut DirectionCounters {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Reverse => &mut self.reverse,
        }
    }

    pub fn corrects(&self, direction: Direction, index: usize) -> u32 {
        self.counters(direction).corrects[index]
    }

    pub fn incorrects(&self, direction: Direction, index: usize) -> u32 {
        self.counters(direction).incorrects[index]
    }

    pub fn record_correct(&mut self, direction: Direction, index: usize) {
        let c = &mut self.counters_mut(direction).corrects[index];
        *c = c.saturating_add(1);
    }

    pub fn record_incorrect(&mut self, direction: Direction, index: usize) {
        let c = &mut self.counters_mut(direction).incorrects[index];
        *c = c.saturating_add(1);
    }

    /// Zero every counter in both directions
    pub fn reset(&mut self) {
        let len = self.len();
        *self = Self::new(len);
    }

    pub fn into_parts(self) -> (DirectionCounters, DirectionCounters) {
        (self.forward, self.reverse)
    }
}
