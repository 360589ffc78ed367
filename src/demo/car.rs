use crate::render::surface::Compositor;
use crate::sprite::stacked::StackedSprite;

/// Velocity multiplier applied every tick.
pub const FRICTION: f64 = 0.98;
/// Radians turned per tick while steering.
pub const TURN_THETA: f64 = 0.01;

/// Throttle input for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Throttle {
    #[default]
    Coast,
    Gas,
    Brake,
}

/// Steering input for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Steer {
    #[default]
    Straight,
    Left,
    Right,
}

/// Driver input sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Input {
    pub throttle: Throttle,
    pub steer: Steer,
}

/// Top-down car driving a [`StackedSprite`].
///
/// Acceleration is a per-tick impulse along the facing vector; it is reset after each
/// [`Car::update`], so input must be re-applied every tick.
pub struct Car<C: Compositor> {
    sprite: StackedSprite<C>,
    accel: f64,
    facing: (f64, f64),
    velocity: (f64, f64),
}

impl<C: Compositor> Car<C> {
    pub fn new(sprite: StackedSprite<C>) -> Self {
        Self {
            sprite,
            accel: 0.0,
            facing: (1.0, 0.0),
            velocity: (0.0, 0.0),
        }
    }

    pub fn apply_gas(&mut self) {
        self.accel = 1.0;
    }

    pub fn apply_brake(&mut self) {
        self.accel = -1.0;
    }

    pub fn turn_left(&mut self) {
        self.turn(TURN_THETA);
    }

    pub fn turn_right(&mut self) {
        self.turn(-TURN_THETA);
    }

    fn turn(&mut self, theta: f64) {
        let (s, c) = theta.sin_cos();
        let (dx, dy) = self.facing;
        self.facing = (dx * c - dy * s, dx * s + dy * c);
        self.sprite.rotate(theta);
    }

    /// Apply one tick's worth of input.
    pub fn apply_input(&mut self, input: Input) {
        match input.throttle {
            Throttle::Gas => self.apply_gas(),
            Throttle::Brake => self.apply_brake(),
            Throttle::Coast => {}
        }
        match input.steer {
            Steer::Left => self.turn_left(),
            Steer::Right => self.turn_right(),
            Steer::Straight => {}
        }
    }

    /// Advance physics by one tick at `tps` ticks per second and move the sprite.
    pub fn update(&mut self, tps: f64) {
        let (dx, dy) = self.facing;
        let (mut vx, mut vy) = self.velocity;
        vx += self.accel * dx / tps;
        vy += self.accel * dy / tps;

        vx *= FRICTION;
        vy *= FRICTION;
        self.velocity = (vx, vy);

        self.sprite.move_x(vx);
        self.sprite.move_y(vy);

        self.accel = 0.0;
    }

    pub fn facing(&self) -> (f64, f64) {
        self.facing
    }

    pub fn velocity(&self) -> (f64, f64) {
        self.velocity
    }

    pub fn sprite(&self) -> &StackedSprite<C> {
        &self.sprite
    }

    pub fn sprite_mut(&mut self) -> &mut StackedSprite<C> {
        &mut self.sprite
    }
}

#[cfg(test)]
#[path = "../../tests/unit/demo/car.rs"]
mod tests;
