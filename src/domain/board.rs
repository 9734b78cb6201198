/// The playing field: a fixed grid of integer cells.

use super::direction::Direction;

pub const COLUMNS: i32 = 17;
pub const ROWS: i32 = 15;

/// A board cell. Coordinates may leave the board transiently
/// (a snake head that just crashed into the wall).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    pub fn step(self, dir: Direction) -> Pos {
        let (dx, dy) = dir.vector();
        Pos::new(self.x + dx, self.y + dy)
    }

    pub fn on_board(self) -> bool {
        (0..COLUMNS).contains(&self.x) && (0..ROWS).contains(&self.y)
    }

    pub fn as_vec2(self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

/// Every cell of the board, column-major (x outer, y inner).
pub fn cells() -> Vec<Pos> {
    let mut all = Vec::with_capacity((COLUMNS * ROWS) as usize);
    for x in 0..COLUMNS {
        for y in 0..ROWS {
            all.push(Pos::new(x, y));
        }
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_has_every_cell_once() {
        let all = cells();
        assert_eq!(all.len(), 17 * 15);
        assert!(all.iter().all(|p| p.on_board()));
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn bounds() {
        assert!(Pos::new(0, 0).on_board());
        assert!(Pos::new(16, 14).on_board());
        assert!(!Pos::new(17, 0).on_board());
        assert!(!Pos::new(0, 15).on_board());
        assert!(!Pos::new(-1, 3).on_board());
        assert!(!Pos::new(3, -1).on_board());
    }

    #[test]
    fn step_follows_direction() {
        let p = Pos::new(8, 7);
        assert_eq!(p.step(Direction::East), Pos::new(9, 7));
        assert_eq!(p.step(Direction::North), Pos::new(8, 6));
        assert_eq!(p.step(Direction::West), Pos::new(7, 7));
        assert_eq!(p.step(Direction::South), Pos::new(8, 8));
    }
}
