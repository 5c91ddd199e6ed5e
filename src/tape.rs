//! The sparse, two-way infinite tape driven by the Turing-machine engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use crate::types::{Direction, BLANK_SYMBOL};

/// A tape addressed by signed cell index.
///
/// Only written cells are stored; every other index reads as [`BLANK_SYMBOL`]. The tracked
/// extent covers every cell that was written or visited by the head, and exists only to
/// bound rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: BTreeMap<i64, char>,
    head: i64,
    leftmost: i64,
    rightmost: i64,
}

impl Default for Tape {
    fn default() -> Self {
        Self::from_input("", 0)
    }
}

impl Tape {
    /// Writes `input` starting at cell 0 and places the head at `head`.
    pub fn from_input(input: &str, head: i64) -> Self {
        let cells: BTreeMap<i64, char> = input
            .chars()
            .enumerate()
            .filter(|(_, symbol)| *symbol != BLANK_SYMBOL)
            .map(|(i, symbol)| (i as i64, symbol))
            .collect();
        let last = input.chars().count().saturating_sub(1) as i64;

        Self {
            cells,
            head,
            leftmost: head.min(0),
            rightmost: head.max(last),
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.read_at(self.head)
    }

    /// Returns the symbol at any index. Never-written cells are blank.
    pub fn read_at(&self, index: i64) -> char {
        self.cells.get(&index).copied().unwrap_or(BLANK_SYMBOL)
    }

    /// Writes `symbol` under the head. Writing the blank symbol erases the cell.
    pub fn write(&mut self, symbol: char) {
        if symbol == BLANK_SYMBOL {
            self.cells.remove(&self.head);
        } else {
            self.cells.insert(self.head, symbol);
        }
        self.track(self.head);
    }

    /// Moves the head one cell in `direction`, extending the tracked extent.
    pub fn move_head(&mut self, direction: Direction) {
        self.head += direction.offset();
        self.track(self.head);
    }

    fn track(&mut self, index: i64) {
        self.leftmost = self.leftmost.min(index);
        self.rightmost = self.rightmost.max(index);
    }

    pub fn head(&self) -> i64 {
        self.head
    }

    /// The leftmost and rightmost cells written or visited so far.
    pub fn bounds(&self) -> (i64, i64) {
        (self.leftmost, self.rightmost)
    }

    /// Iterates over the explicitly written cells in index order.
    pub fn written_cells(&self) -> impl Iterator<Item = (i64, char)> + '_ {
        self.cells.iter().map(|(&index, &symbol)| (index, symbol))
    }

    /// Renders the cells in `range`, blanks included.
    pub fn render(&self, range: RangeInclusive<i64>) -> String {
        range.map(|index| self.read_at(index)).collect()
    }
}

impl fmt::Display for Tape {
    /// Renders the tracked extent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(self.leftmost..=self.rightmost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_cells_read_blank() {
        let tape = Tape::from_input("ab", 0);

        assert_eq!(tape.read(), 'a');
        assert_eq!(tape.read_at(1), 'b');
        assert_eq!(tape.read_at(2), BLANK_SYMBOL);
        assert_eq!(tape.read_at(-100), BLANK_SYMBOL);
    }

    #[test]
    fn test_write_blank_erases() {
        let mut tape = Tape::from_input("ab", 1);
        tape.write(BLANK_SYMBOL);

        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert_eq!(tape.written_cells().collect::<Vec<_>>(), vec![(0, 'a')]);
    }

    #[test]
    fn test_head_moves_past_both_ends() {
        let mut tape = Tape::from_input("x", 0);

        tape.move_head(Direction::Left);
        tape.move_head(Direction::Left);
        assert_eq!(tape.head(), -2);
        tape.write('y');

        for _ in 0..5 {
            tape.move_head(Direction::Right);
        }
        tape.move_head(Direction::Stay);

        assert_eq!(tape.head(), 3);
        assert_eq!(tape.bounds(), (-2, 3));
        assert_eq!(tape.to_string(), "y□x□□□");
    }

    #[test]
    fn test_initial_extent_includes_head() {
        let tape = Tape::from_input("01", 5);
        assert_eq!(tape.bounds(), (0, 5));
        assert_eq!(tape.read(), BLANK_SYMBOL);

        let tape = Tape::from_input("", -3);
        assert_eq!(tape.bounds(), (-3, 0));
        assert_eq!(tape.render(-1..=1), "□□□");
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Tape::from_input("1", 0);
        let mut copy = original.clone();
        copy.write('0');

        assert_eq!(original.read(), '1');
        assert_eq!(copy.read(), '0');
    }
}
