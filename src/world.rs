use super::course::Course;
use super::pod::Pod;
use super::vec2::Vec2;

/// One pod's line of the turn input.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct PodInput {
    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f64,
    pub next_checkpoint: usize,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct TurnInput {
    pub mine: Vec<PodInput>,
    pub theirs: Vec<PodInput>,
}

#[derive(Debug, Clone)]
pub struct World {
    pub course: Course,
    pub me: Vec<Pod>,
    pub opponent: Vec<Pod>,
    pub turn: u32,
}

impl World {
    pub fn new(course: Course, pods_per_team: usize) -> Self {
        World {
            course,
            me: vec![Pod::new(); pods_per_team],
            opponent: vec![Pod::new(); pods_per_team],
            turn: 0,
        }
    }

    pub fn apply(&mut self, input: &TurnInput) {
        for (pod, reading) in self
            .me
            .iter_mut()
            .zip(&input.mine)
            .chain(self.opponent.iter_mut().zip(&input.theirs))
        {
            pod.observe(
                reading.pos,
                reading.vel,
                reading.heading,
                reading.next_checkpoint,
            );
        }
        self.turn += 1;
    }
}
