//! Snake body: ordered segments with O(1) occupancy lookups

use std::collections::{HashMap, VecDeque};

use crate::sim::grid::{Direction, Point};

#[derive(Debug, Clone)]
pub struct Snake {
    /// Head first, tail last
    body: VecDeque<Point>,
    /// Segment count per cell, kept in step with `body`
    occupancy: HashMap<Point, u32>,
    direction: Direction,
    /// Committed on the next `advance`
    next_direction: Direction,
    growth_pending: u32,
}

impl Snake {
    pub fn new(start: Point, direction: Direction) -> Self {
        let mut snake = Self {
            body: VecDeque::new(),
            occupancy: HashMap::new(),
            direction,
            next_direction: direction,
            growth_pending: 0,
        };
        snake.push_head(start);
        snake
    }

    fn push_head(&mut self, point: Point) {
        self.body.push_front(point);
        *self.occupancy.entry(point).or_insert(0) += 1;
    }

    fn pop_tail(&mut self) {
        if let Some(tail) = self.body.pop_back() {
            if let Some(count) = self.occupancy.get_mut(&tail) {
                *count -= 1;
                if *count == 0 {
                    self.occupancy.remove(&tail);
                }
            }
        }
    }

    /// Move one cell along the queued direction and return the new head.
    ///
    /// The tail is released before the head is placed, so moving into the
    /// cell the tail just left is legal.
    pub fn advance(&mut self) -> Point {
        self.direction = self.next_direction;
        let new_head = self.head().moved(self.direction);
        if self.growth_pending > 0 {
            self.growth_pending -= 1;
        } else {
            self.pop_tail();
        }
        self.push_head(new_head);
        new_head
    }

    /// Queue a turn for the next tick. Rejects reversals against both the
    /// committed and the queued direction.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) || self.next_direction.is_opposite(direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }

    /// Defer `segments` cells of growth, one per tick
    pub fn grow(&mut self, segments: u32) {
        self.growth_pending += segments;
    }

    pub fn head(&self) -> Point {
        // body is never empty
        self.body.front().copied().unwrap_or(Point::ORIGIN)
    }

    pub fn tail(&self) -> Point {
        self.body.back().copied().unwrap_or(Point::ORIGIN)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn growth_pending(&self) -> u32 {
        self.growth_pending
    }

    pub fn contains(&self, point: Point) -> bool {
        self.occupancy.contains_key(&point)
    }

    pub fn hits_wall(&self, width: i32, height: i32) -> bool {
        !self.head().in_bounds(width, height)
    }

    pub fn hits_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|p| *p == head)
    }

    pub fn is_eating(&self, food: Point) -> bool {
        self.head() == food
    }
}
