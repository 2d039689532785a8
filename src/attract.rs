//! Attract mode: autopilots that play both games unattended
//!
//! They only read public simulation state and return the input a player
//! would give, so a demo run goes through exactly the same code paths as a
//! human one.

use crate::sim::{Direction, GameState, PaddleMove, Point, PongSimulation, SnakeSimulation};

/// Steer greedily toward the food, never into a wall, the body, or a reversal.
///
/// Returns `None` when not playing or when every move is fatal.
pub fn snake_autopilot(sim: &SnakeSimulation) -> Option<Direction> {
    if sim.state() != GameState::Playing {
        return None;
    }
    let snake = sim.snake();
    let (width, height) = sim.board_size();
    let head = snake.head();
    let food = sim.food().position;

    // The tail cell frees up on the next move unless the snake is growing
    let tail_frees = snake.growth_pending() == 0 && snake.len() > 1;
    let blocked = |p: Point| {
        !p.in_bounds(width, height) || (snake.contains(p) && !(tail_frees && p == snake.tail()))
    };
    let exits = |p: Point| {
        Direction::ALL
            .iter()
            .filter(|d| !blocked(p.moved(**d)))
            .count()
    };

    Direction::ALL
        .iter()
        .copied()
        .filter(|d| !d.is_opposite(snake.direction()) && !d.is_opposite(snake.next_direction()))
        .map(|d| (d, head.moved(d)))
        .filter(|(_, next)| !blocked(*next))
        // Avoid dead ends, then close in on the food, then keep heading
        .min_by_key(|(d, next)| {
            let dead_end = usize::from(exits(*next) == 0 && *next != food);
            (
                dead_end,
                next.manhattan_distance(food),
                usize::from(*d != snake.next_direction()),
            )
        })
        .map(|(d, _)| d)
}

/// Keep the human paddle under the ball's predicted intercept.
///
/// Returns the key to hold this tick, or `None` to release both.
pub fn pong_autopilot(sim: &PongSimulation) -> Option<PaddleMove> {
    if sim.state() != GameState::Playing {
        return None;
    }
    let ball = sim.ball();
    let paddle = sim.left_paddle();
    let (_, canvas_height) = sim.canvas_size();

    let target_center = if ball.vel.x < 0.0 {
        ball.predict_y_at_x(paddle.x() + paddle.width()) + ball.size() / 2.0
    } else {
        canvas_height / 2.0
    };

    let difference = target_center - paddle.center_y();
    if difference.abs() <= paddle.speed() {
        None
    } else if difference > 0.0 {
        Some(PaddleMove::Down)
    } else {
        Some(PaddleMove::Up)
    }
}
