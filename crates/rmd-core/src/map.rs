//! Map grid and geometry.
//!
//! A fixed-size grid of tiles. The demo layout is an open field with two
//! pillar walls, enough to exercise movement, line of sight and chasing.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::{MAP_HEIGHT, MAP_WIDTH};

/// A map coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chebyshev distance: diagonal steps count once.
    pub fn distance(self, other: Pos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn is_adjacent(self, other: Pos) -> bool {
        self.distance(other) == 1
    }
}

/// One map cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tile {
    pub walkable: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self { walkable: true }
    }
}

/// The playing field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl Map {
    /// Create an all-floor map.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
        }
    }

    /// The fixed demo arena: open floor with two pillar walls.
    pub fn demo() -> Self {
        let mut map = Self::new(MAP_WIDTH, MAP_HEIGHT);
        map.set_wall(Pos::new(30, 22));
        map.set_wall(Pos::new(50, 22));
        map
    }

    fn idx(&self, pos: Pos) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Out-of-bounds positions are not walls, but they are not walkable
    /// either.
    pub fn is_wall(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.tiles[self.idx(pos)].walkable
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.tiles[self.idx(pos)].walkable
    }

    pub fn set_wall(&mut self, pos: Pos) {
        if self.in_bounds(pos) {
            let i = self.idx(pos);
            self.tiles[i].walkable = false;
        }
    }

    /// Bresenham line walk. Walls block sight, but the blocking tile
    /// itself is visible.
    pub fn line_of_sight(&self, from: Pos, to: Pos) -> bool {
        let mut x = from.x;
        let mut y = from.y;

        let dx = (to.x - x).abs();
        let dy = -(to.y - y).abs();
        let sx = if x < to.x { 1 } else { -1 };
        let sy = if y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x != from.x || y != from.y {
                let here = Pos::new(x, y);
                if !self.in_bounds(here) {
                    return false;
                }
                if self.is_wall(here) {
                    return x == to.x && y == to.y;
                }
            }

            if x == to.x && y == to.y {
                return true;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// First step of a shortest cardinal path from `from` to `to`.
    ///
    /// `blocked` excludes intermediate tiles (occupied ones, say); the
    /// destination itself is exempt so a chaser can walk up to a target
    /// standing on it. Returns None when unreachable or already there.
    pub fn next_step_toward(
        &self,
        from: Pos,
        to: Pos,
        blocked: impl Fn(Pos) -> bool,
    ) -> Option<Pos> {
        if from == to {
            return None;
        }

        const STEPS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

        let mut first_step: Vec<Option<Pos>> = vec![None; (self.width * self.height) as usize];
        let mut visited = vec![false; (self.width * self.height) as usize];
        let mut queue = VecDeque::new();

        visited[self.idx(from)] = true;
        queue.push_back(from);

        while let Some(cur) = queue.pop_front() {
            for (dx, dy) in STEPS {
                let next = cur.offset(dx, dy);
                if !self.is_walkable(next) {
                    continue;
                }
                if next != to && blocked(next) {
                    continue;
                }
                let ni = self.idx(next);
                if visited[ni] {
                    continue;
                }
                visited[ni] = true;
                let step = if cur == from {
                    Some(next)
                } else {
                    first_step[self.idx(cur)]
                };
                first_step[ni] = step;
                if next == to {
                    return step;
                }
                queue.push_back(next);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_walls() {
        let map = Map::demo();
        assert!(map.is_wall(Pos::new(30, 22)));
        assert!(map.is_wall(Pos::new(50, 22)));
        assert!(map.is_walkable(Pos::new(40, 25)));
    }

    #[test]
    fn test_out_of_bounds() {
        let map = Map::demo();
        let outside = Pos::new(-1, 5);
        assert!(!map.in_bounds(outside));
        assert!(!map.is_wall(outside));
        assert!(!map.is_walkable(outside));
    }

    #[test]
    fn test_line_of_sight_open() {
        let map = Map::demo();
        assert!(map.line_of_sight(Pos::new(2, 2), Pos::new(10, 2)));
        assert!(map.line_of_sight(Pos::new(2, 2), Pos::new(2, 2)));
    }

    #[test]
    fn test_line_of_sight_blocked_by_pillar() {
        let map = Map::demo();
        // The pillar at (30, 22) sits between these two.
        assert!(!map.line_of_sight(Pos::new(28, 22), Pos::new(33, 22)));
        // The wall tile itself is visible.
        assert!(map.line_of_sight(Pos::new(28, 22), Pos::new(30, 22)));
    }

    #[test]
    fn test_next_step_straight() {
        let map = Map::demo();
        let step = map.next_step_toward(Pos::new(5, 5), Pos::new(8, 5), |_| false);
        assert_eq!(step, Some(Pos::new(6, 5)));
    }

    #[test]
    fn test_next_step_routes_around_wall() {
        let mut map = Map::new(9, 9);
        // Vertical wall with no gap at y=4.
        for y in 0..9 {
            map.set_wall(Pos::new(4, y));
        }
        assert_eq!(
            map.next_step_toward(Pos::new(2, 4), Pos::new(6, 4), |_| false),
            None
        );

        // Open a gap and the path threads through it.
        let mut map = Map::new(9, 9);
        for y in 0..9 {
            if y != 0 {
                map.set_wall(Pos::new(4, y));
            }
        }
        let mut pos = Pos::new(2, 4);
        let goal = Pos::new(6, 4);
        for _ in 0..30 {
            match map.next_step_toward(pos, goal, |_| false) {
                Some(next) => pos = next,
                None => break,
            }
            if pos == goal {
                break;
            }
        }
        assert_eq!(pos, goal);
    }

    #[test]
    fn test_next_step_respects_blockers() {
        let map = Map::new(9, 3);
        let occupied = Pos::new(3, 1);
        let step = map
            .next_step_toward(Pos::new(2, 1), Pos::new(6, 1), move |p| p == occupied)
            .unwrap();
        // Must detour around the occupied tile.
        assert_ne!(step, occupied);
    }

    #[test]
    fn test_next_step_to_blocked_destination() {
        let map = Map::new(9, 3);
        let goal = Pos::new(4, 1);
        // Destination occupied, but still reachable for an adjacent stop.
        let step = map.next_step_toward(Pos::new(2, 1), goal, move |p| p == goal);
        assert_eq!(step, Some(Pos::new(3, 1)));
    }
}
