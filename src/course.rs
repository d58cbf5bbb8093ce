use super::entity::Body;
use super::vec2::Vec2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Checkpoint {
    pub body: Body,
}

impl Checkpoint {
    pub fn new(pos: Vec2) -> Self {
        Checkpoint {
            body: Body::checkpoint(pos),
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }
}

/// The track: checkpoints in race order plus the lap count. Filled once at
/// setup and only read afterwards.
#[derive(Debug, Clone)]
pub struct Course {
    checkpoints: Vec<Checkpoint>,
    laps: u32,
}

impl Course {
    pub fn new(laps: u32, positions: &[Vec2]) -> Self {
        assert!(!positions.is_empty(), "course needs at least one checkpoint");

        Course {
            checkpoints: positions.iter().map(|&pos| Checkpoint::new(pos)).collect(),
            laps,
        }
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// Wraps around, so `index` may count across laps.
    pub fn checkpoint_at(&self, index: usize) -> &Checkpoint {
        &self.checkpoints[index % self.checkpoints.len()]
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Checkpoint passes needed to finish the race.
    pub fn total_checkpoints(&self) -> u32 {
        self.laps * self.checkpoints.len() as u32
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }
}
