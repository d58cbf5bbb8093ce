use super::vec2::Vec2;

pub const FRICTION: f64 = 0.85;
pub const MAX_THRUST: f64 = 100.;
pub const CHECKPOINT_RADIUS: f64 = 600.;
pub const POD_RADIUS: f64 = 400.;

/// A circle moving in the arena. Checkpoints and pods both embed one.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f64,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f64) -> Self {
        Body { pos, vel, radius }
    }

    pub fn pod(pos: Vec2, vel: Vec2) -> Self {
        Body::new(pos, vel, POD_RADIUS)
    }

    pub fn checkpoint(pos: Vec2) -> Self {
        Body::new(pos, Vec2::ZERO, CHECKPOINT_RADIUS)
    }

    /// One game turn: thrust along `heading`, move, then apply friction.
    /// Position is rounded and velocity truncated the way the referee does it.
    pub fn advance(&mut self, thrust: f64, heading: f64) {
        let vel = Vec2::lin_comb(1., self.vel, thrust, Vec2::from_angle(heading));
        self.pos = (self.pos + vel).round();
        self.vel = (vel * FRICTION).trunc();
    }

    pub fn advanced(mut self, thrust: f64, heading: f64) -> Body {
        self.advance(thrust, heading);
        self
    }

    /// Next turn without any thrust of its own.
    pub fn coast(self) -> Body {
        self.advanced(0., 0.)
    }

    /// Where this body ends up after `turns` turns of full thrust along `heading`.
    pub fn predict_position(&self, turns: u32, heading: f64) -> Vec2 {
        let mut body = *self;
        for _ in 0..turns {
            body.advance(MAX_THRUST, heading);
        }
        body.pos
    }

    pub fn touches(&self, other: &Body) -> bool {
        let reach = self.radius + other.radius;
        self.pos.sq_dist(other.pos) <= reach * reach
    }
}

/// First turn in `1..=turns` at which two coasting bodies come into contact.
/// Bodies already touching at the start only collide again after they
/// separate.
pub fn collision_turn(a: &Body, b: &Body, turns: u32) -> Option<u32> {
    let (mut a, mut b) = (*a, *b);
    let mut touching = a.touches(&b);
    for turn in 1..=turns {
        a = a.coast();
        b = b.coast();
        let now = a.touches(&b);
        if now && !touching {
            return Some(turn);
        }
        touching = now;
    }
    None
}

pub fn predict_collision(a: &Body, b: &Body, turns: u32) -> bool {
    collision_turn(a, b, turns).is_some()
}
