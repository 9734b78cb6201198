/// Buffered turns.
///
/// The queue holds between 1 and `CAPACITY` directions. Its head is the
/// direction the snake travels on the next step. Neighbouring entries are
/// never equal and never opposite, which is what stops a quick
/// "up, back" key sequence from reversing the snake into itself.

use super::direction::Direction;

pub const CAPACITY: usize = 3;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DirectionQueue {
    dirs: Vec<Direction>,
}

impl DirectionQueue {
    pub fn new(initial: Direction) -> Self {
        DirectionQueue { dirs: vec![initial] }
    }

    /// Direction applied on the next step.
    pub fn head(&self) -> Direction {
        self.dirs[0]
    }

    pub fn as_slice(&self) -> &[Direction] {
        &self.dirs
    }

    /// Append `dir`, drop entries that repeat or reverse the entry kept
    /// before them, then keep only the first `CAPACITY` entries.
    pub fn enqueue(&mut self, dir: Direction) {
        self.dirs.push(dir);

        let mut kept: Vec<Direction> = Vec::with_capacity(self.dirs.len());
        for &d in &self.dirs {
            match kept.last() {
                Some(&prev) if prev == d || prev.is_opposite(d) => {}
                _ => kept.push(d),
            }
        }
        kept.truncate(CAPACITY);
        self.dirs = kept;
    }

    /// Consume the head unless it is the only entry left.
    pub fn dequeue(&mut self) {
        if self.dirs.len() > 1 {
            self.dirs.remove(0);
        }
    }
}
