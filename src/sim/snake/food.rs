//! Food kinds, placement and expiry

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{FOOD_BLINK_WINDOW, FOOD_PLACEMENT_ATTEMPTS};
use crate::sim::grid::Point;
use crate::sim::rng::GameRng;

use super::body::Snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    Bonus,
    SuperBonus,
    SpeedUp,
    SlowDown,
    MultiGrow,
}

impl FoodKind {
    pub const ALL: [FoodKind; 6] = [
        FoodKind::Normal,
        FoodKind::Bonus,
        FoodKind::SuperBonus,
        FoodKind::SpeedUp,
        FoodKind::SlowDown,
        FoodKind::MultiGrow,
    ];

    const MODIFIERS: [FoodKind; 3] = [FoodKind::SpeedUp, FoodKind::SlowDown, FoodKind::MultiGrow];

    pub fn points(&self) -> u32 {
        match self {
            FoodKind::Normal => 10,
            FoodKind::Bonus => 25,
            FoodKind::SuperBonus => 50,
            FoodKind::SpeedUp | FoodKind::SlowDown => 15,
            FoodKind::MultiGrow => 20,
        }
    }

    /// Segments added when eaten
    pub fn growth(&self) -> u32 {
        match self {
            FoodKind::MultiGrow => 3,
            FoodKind::SuperBonus => 2,
            _ => 1,
        }
    }

    /// How long the food stays on the board; normal food never expires
    pub fn lifetime(&self) -> Option<Duration> {
        match self {
            FoodKind::Normal => None,
            FoodKind::Bonus => Some(Duration::from_secs(15)),
            FoodKind::SuperBonus => Some(Duration::from_secs(10)),
            FoodKind::SpeedUp | FoodKind::SlowDown | FoodKind::MultiGrow => {
                Some(Duration::from_secs(12))
            }
        }
    }

    pub fn is_special(&self) -> bool {
        *self != FoodKind::Normal
    }

    /// Banner text shown when eaten (empty for normal food)
    pub fn effect_text(&self) -> &'static str {
        match self {
            FoodKind::Normal => "",
            FoodKind::Bonus => "Bonus points!",
            FoodKind::SuperBonus => "SUPER BONUS!",
            FoodKind::SpeedUp => "Speed up!",
            FoodKind::SlowDown => "Slow down!",
            FoodKind::MultiGrow => "Grow by 3 segments!",
        }
    }

    /// Suggested display color
    pub fn color(&self) -> &'static str {
        match self {
            FoodKind::Normal => "#FF0000",
            FoodKind::Bonus => "#FFD700",
            FoodKind::SuperBonus => "#FF00FF",
            FoodKind::SpeedUp => "#00FFFF",
            FoodKind::SlowDown => "#FFFF00",
            FoodKind::MultiGrow => "#00FF00",
        }
    }

    /// 70% normal, 15% bonus, 8% split across the modifiers, 7% super bonus
    pub fn roll(rng: &mut GameRng) -> FoodKind {
        let r = rng.roll();
        if r < 0.70 {
            FoodKind::Normal
        } else if r < 0.85 {
            FoodKind::Bonus
        } else if r < 0.93 {
            Self::MODIFIERS[rng.below(Self::MODIFIERS.len() as i32) as usize]
        } else {
            FoodKind::SuperBonus
        }
    }
}

/// The single active food item. Times are simulation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub position: Point,
    pub kind: FoodKind,
    pub spawned_at: Duration,
}

impl Food {
    pub fn place(position: Point, kind: FoodKind, now: Duration) -> Self {
        Self {
            position,
            kind,
            spawned_at: now,
        }
    }

    /// New food of a random kind on a cell the snake does not occupy
    pub fn spawn(width: i32, height: i32, snake: &Snake, rng: &mut GameRng, now: Duration) -> Self {
        let position = free_cell(width, height, snake, rng);
        let kind = FoodKind::roll(rng);
        Self::place(position, kind, now)
    }

    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.spawned_at)
    }

    pub fn has_expired(&self, now: Duration) -> bool {
        match self.kind.lifetime() {
            Some(lifetime) => self.age(now) > lifetime,
            None => false,
        }
    }

    /// Remaining lifetime, `None` for food that never expires
    pub fn time_to_expiration(&self, now: Duration) -> Option<Duration> {
        self.kind
            .lifetime()
            .map(|lifetime| lifetime.saturating_sub(self.age(now)))
    }

    pub fn should_blink(&self, now: Duration) -> bool {
        self.time_to_expiration(now)
            .is_some_and(|left| left <= FOOD_BLINK_WINDOW)
    }
}

/// Random probing first, then a row-major scan, then the board center
fn free_cell(width: i32, height: i32, snake: &Snake, rng: &mut GameRng) -> Point {
    for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
        let candidate = Point::new(rng.below(width), rng.below(height));
        if !snake.contains(candidate) {
            return candidate;
        }
    }
    for y in 0..height {
        for x in 0..width {
            let candidate = Point::new(x, y);
            if !snake.contains(candidate) {
                return candidate;
            }
        }
    }
    Point::new(width / 2, height / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Direction;

    #[test]
    fn test_kind_table() {
        assert_eq!(FoodKind::Normal.points(), 10);
        assert_eq!(FoodKind::SuperBonus.points(), 50);
        assert_eq!(FoodKind::MultiGrow.growth(), 3);
        assert_eq!(FoodKind::SuperBonus.growth(), 2);
        assert_eq!(FoodKind::SpeedUp.growth(), 1);
        assert!(!FoodKind::Normal.is_special());
        assert!(FoodKind::ALL.iter().filter(|k| k.is_special()).all(|k| k.lifetime().is_some()));
    }

    #[test]
    fn test_normal_never_expires() {
        let food = Food::place(Point::new(1, 1), FoodKind::Normal, Duration::ZERO);
        assert!(!food.has_expired(Duration::from_secs(3600)));
        assert_eq!(food.time_to_expiration(Duration::from_secs(3600)), None);
        assert!(!food.should_blink(Duration::from_secs(3600)));
    }

    #[test]
    fn test_special_expiry_and_blink() {
        let food = Food::place(Point::new(1, 1), FoodKind::SuperBonus, Duration::from_secs(2));
        let now = Duration::from_secs(8);
        assert!(!food.has_expired(now));
        assert!(!food.should_blink(now));
        assert_eq!(food.time_to_expiration(now), Some(Duration::from_secs(4)));

        let now = Duration::from_secs(9);
        assert!(food.should_blink(now));
        // Exactly at the lifetime is not yet expired
        assert!(!food.has_expired(Duration::from_secs(12)));
        assert!(food.has_expired(Duration::from_millis(12_001)));
    }

    #[test]
    fn test_spawn_avoids_snake() {
        let mut rng = GameRng::new(3);
        let mut snake = Snake::new(Point::new(0, 0), Direction::Right);
        snake.grow(6);
        for _ in 0..6 {
            snake.advance();
        }
        for _ in 0..200 {
            let food = Food::spawn(8, 1, &snake, &mut rng, Duration::ZERO);
            assert!(!snake.contains(food.position));
            assert!(food.position.in_bounds(8, 1));
        }
    }

    #[test]
    fn test_spawn_scans_when_nearly_full() {
        // 3x1 board, snake covers two cells, only (2, 0) is free
        let mut rng = GameRng::new(11);
        let mut snake = Snake::new(Point::new(0, 0), Direction::Right);
        snake.grow(1);
        snake.advance();
        let food = Food::spawn(3, 1, &snake, &mut rng, Duration::ZERO);
        assert_eq!(food.position, Point::new(2, 0));
    }

    #[test]
    fn test_spawn_full_board_falls_back_to_center() {
        let mut rng = GameRng::new(5);
        let mut snake = Snake::new(Point::new(0, 0), Direction::Right);
        snake.grow(1);
        snake.advance();
        let food = Food::spawn(2, 1, &snake, &mut rng, Duration::ZERO);
        assert_eq!(food.position, Point::new(1, 0));
    }

    #[test]
    fn test_kind_distribution() {
        let mut rng = GameRng::new(2024);
        let samples = 20_000;
        let mut normal = 0;
        let mut super_bonus = 0;
        let mut modifiers = 0;
        for _ in 0..samples {
            match FoodKind::roll(&mut rng) {
                FoodKind::Normal => normal += 1,
                FoodKind::SuperBonus => super_bonus += 1,
                FoodKind::SpeedUp | FoodKind::SlowDown | FoodKind::MultiGrow => modifiers += 1,
                FoodKind::Bonus => {}
            }
        }
        let ratio = |n: i32| n as f64 / samples as f64;
        assert!((ratio(normal) - 0.70).abs() < 0.02, "normal {}", ratio(normal));
        assert!((ratio(super_bonus) - 0.07).abs() < 0.02, "super {}", ratio(super_bonus));
        assert!((ratio(modifiers) - 0.08).abs() < 0.02, "modifiers {}", ratio(modifiers));
    }
}
