use rand::Rng;
use tracing::info;

use super::controller::{Command, Decision};
use super::course::Course;
use super::entity::{Body, CHECKPOINT_RADIUS};
use super::vec2::{angle_diff, Vec2};
use super::world::{PodInput, TurnInput};

pub const ARENA: Vec2 = Vec2 { x: 16000., y: 9000. };
pub const MAX_ROTATION: f64 = 18.;
pub const BOOST_THRUST: f64 = 650.;
/// Turns without thrust after raising the shield.
pub const SHIELD_COOLDOWN: u32 = 3;
/// Distance between neighbours on the start line.
pub const START_SPACING: f64 = 1100.;

#[derive(Debug, Clone, PartialEq)]
pub struct Racer {
    pub body: Body,
    /// Unknown until the first move; the first turn may face anywhere.
    pub heading: Option<f64>,
    pub next_checkpoint: usize,
    pub checkpoints_passed: u32,
    pub boost_used: bool,
    pub shield_cooldown: u32,
}

impl Racer {
    fn reading(&self, course: &Course) -> PodInput {
        let heading = self.heading.unwrap_or_else(|| {
            (course.checkpoint_at(self.next_checkpoint).pos() - self.body.pos).angle()
        });
        PodInput {
            pos: self.body.pos,
            vel: self.body.vel,
            heading: heading.round().rem_euclid(360.),
            next_checkpoint: self.next_checkpoint,
        }
    }

    fn rotate_towards(&mut self, target: Vec2) {
        let to_target = target - self.body.pos;
        if to_target == Vec2::ZERO {
            return;
        }

        let wanted = to_target.angle();
        let heading = match self.heading {
            None => wanted,
            Some(heading) => {
                let turn = angle_diff(heading, wanted).clamp(-MAX_ROTATION, MAX_ROTATION);
                heading + turn
            }
        };
        self.heading = Some(heading.rem_euclid(360.));
    }

    fn thrust_for(&mut self, command: Command) -> f64 {
        match command {
            Command::Shield => {
                self.shield_cooldown = SHIELD_COOLDOWN;
                0.
            }
            _ if self.shield_cooldown > 0 => {
                self.shield_cooldown -= 1;
                0.
            }
            Command::Boost if !self.boost_used => {
                self.boost_used = true;
                BOOST_THRUST
            }
            Command::Boost => 100.,
            Command::Thrust(thrust) => thrust.min(100) as f64,
        }
    }
}

/// Local referee: moves every pod by the same rules the controller predicts
/// with. Pods of team `t` sit at `t * pods_per_team ..`.
#[derive(Debug, Clone)]
pub struct Race {
    pub course: Course,
    pub racers: Vec<Racer>,
    pub pods_per_team: usize,
    pub turn: u32,
}

impl Race {
    pub fn new(course: Course, pods_per_team: usize) -> Self {
        let start = course.checkpoint_at(0).pos();
        let ahead = (course.checkpoint_at(1).pos() - start).norm();
        let across = Vec2::new(-ahead.y, ahead.x);

        let count = 2 * pods_per_team;
        let racers = (0..count)
            .map(|i| {
                let offset = (i as f64 - (count - 1) as f64 / 2.) * START_SPACING;
                Racer {
                    body: Body::pod((start + across * offset).round(), Vec2::ZERO),
                    heading: None,
                    next_checkpoint: 1 % course.checkpoint_count(),
                    checkpoints_passed: 0,
                    boost_used: false,
                    shield_cooldown: 0,
                }
            })
            .collect();

        Race {
            course,
            racers,
            pods_per_team,
            turn: 0,
        }
    }

    /// Course with `checkpoints` checkpoints spread over the arena, no two
    /// closer than two checkpoint diameters.
    pub fn random_course<R: Rng>(rng: &mut R, laps: u32, checkpoints: usize) -> Course {
        let margin = 2. * CHECKPOINT_RADIUS;
        let min_gap = 4. * CHECKPOINT_RADIUS;
        let mut points: Vec<Vec2> = Vec::with_capacity(checkpoints);

        while points.len() < checkpoints {
            let candidate = Vec2::new(
                rng.gen_range(margin..ARENA.x - margin).round(),
                rng.gen_range(margin..ARENA.y - margin).round(),
            );
            if points.iter().all(|p| p.dist(candidate) >= min_gap) {
                points.push(candidate);
            }
        }

        Course::new(laps, &points)
    }

    /// What team `team` reads this turn: its own pods first.
    pub fn turn_input(&self, team: usize) -> TurnInput {
        let (mine, theirs): (Vec<_>, Vec<_>) = self
            .racers
            .iter()
            .enumerate()
            .partition(|(i, _)| i / self.pods_per_team == team);

        let readings = |racers: Vec<(usize, &Racer)>| -> Vec<PodInput> {
            racers
                .into_iter()
                .map(|(_, racer)| racer.reading(&self.course))
                .collect()
        };

        TurnInput {
            mine: readings(mine),
            theirs: readings(theirs),
        }
    }

    /// Applies one decision per racer, in racer order.
    pub fn step(&mut self, decisions: &[Decision]) {
        for (i, (racer, decision)) in self.racers.iter_mut().zip(decisions).enumerate() {
            racer.rotate_towards(decision.target);
            let thrust = racer.thrust_for(decision.command);
            let heading = racer.heading.unwrap_or(0.);
            racer.body.advance(thrust, heading);

            let checkpoint = self.course.checkpoint_at(racer.next_checkpoint);
            if racer.body.pos.dist(checkpoint.pos()) <= checkpoint.body.radius {
                racer.next_checkpoint = (racer.next_checkpoint + 1) % self.course.checkpoint_count();
                racer.checkpoints_passed += 1;
                info!(racer = i, passed = racer.checkpoints_passed, "checkpoint");
            }
        }
        self.turn += 1;
    }

    pub fn winner(&self) -> Option<usize> {
        let total = self.course.total_checkpoints();
        self.racers
            .iter()
            .position(|racer| racer.checkpoints_passed >= total)
    }
}
