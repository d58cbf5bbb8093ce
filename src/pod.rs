use std::cmp::Ordering;

use tracing::info;

use super::course::Course;
use super::entity::Body;
use super::vec2::Vec2;

/// Everything we know about one racer, ours or theirs.
#[derive(Debug, Clone, PartialEq)]
pub struct Pod {
    pub body: Body,
    /// Degrees, `[0, 360)`.
    pub heading: f64,
    pub next_checkpoint: usize,
    pub last_checkpoint: Option<usize>,
    pub checkpoints_passed: u32,
    pub boost_used: bool,
    observed: bool,
}

impl Default for Pod {
    fn default() -> Self {
        Pod::new()
    }
}

impl Pod {
    pub fn new() -> Self {
        Pod {
            body: Body::pod(Vec2::ZERO, Vec2::ZERO),
            heading: 0.,
            next_checkpoint: 0,
            last_checkpoint: None,
            checkpoints_passed: 0,
            boost_used: false,
            observed: false,
        }
    }

    /// Takes this turn's reading. A change of the next checkpoint id means the
    /// previous one was just passed.
    pub fn observe(&mut self, pos: Vec2, vel: Vec2, heading: f64, next_checkpoint: usize) {
        self.body.pos = pos;
        self.body.vel = vel;
        self.heading = heading.rem_euclid(360.);

        if self.observed && next_checkpoint != self.next_checkpoint {
            self.last_checkpoint = Some(self.next_checkpoint);
            self.checkpoints_passed += 1;
            info!(
                passed = self.checkpoints_passed,
                checkpoint = self.next_checkpoint,
                "checkpoint passed"
            );
        }

        self.next_checkpoint = next_checkpoint;
        self.observed = true;
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.body.vel
    }

    pub fn sq_dist_to_next(&self, course: &Course) -> f64 {
        self.pos()
            .sq_dist(course.checkpoint_at(self.next_checkpoint).pos())
    }

    /// `Greater` when `self` is further along the race than `other`.
    pub fn progress_cmp(&self, other: &Pod, course: &Course) -> Ordering {
        self.checkpoints_passed
            .cmp(&other.checkpoints_passed)
            .then_with(|| {
                other
                    .sq_dist_to_next(course)
                    .total_cmp(&self.sq_dist_to_next(course))
            })
    }
}

/// Most advanced pod of `pods`, `None` for an empty slice.
pub fn leader<'a>(pods: &'a [Pod], course: &Course) -> Option<&'a Pod> {
    pods.iter().max_by(|a, b| a.progress_cmp(b, course))
}
