use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use thiserror::Error;

use super::controller::Decision;
use super::course::Course;
use super::vec2::Vec2;
use super::world::{PodInput, TurnInput};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),
    #[error("invalid integer '{token}' for {field}")]
    InvalidInteger { field: &'static str, token: String },
    #[error("course needs at least one checkpoint")]
    EmptyCourse,
    #[error("lap count must be positive, got {0}")]
    InvalidLapCount(i64),
    #[error("checkpoint id {id} out of range, course has {count}")]
    CheckpointOutOfRange { id: i64, count: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Whitespace separated integers, read line by line.
pub struct TokenReader<R> {
    reader: R,
    tokens: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        TokenReader {
            reader,
            tokens: VecDeque::new(),
        }
    }

    /// True once the input holds nothing but whitespace.
    pub fn at_eof(&mut self) -> Result<bool, ProtocolError> {
        let mut line = String::new();
        while self.tokens.is_empty() {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(true);
            }
            self.tokens
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(false)
    }

    pub fn next_int(&mut self, field: &'static str) -> Result<i64, ProtocolError> {
        if self.at_eof()? {
            return Err(ProtocolError::UnexpectedEof(field));
        }
        let token = self.tokens.pop_front().unwrap_or_default();
        token
            .parse()
            .map_err(|_| ProtocolError::InvalidInteger { field, token })
    }

    fn next_count(&mut self, field: &'static str) -> Result<usize, ProtocolError> {
        let value = self.next_int(field)?;
        usize::try_from(value).map_err(|_| ProtocolError::InvalidInteger {
            field,
            token: value.to_string(),
        })
    }

    fn next_point(&mut self, x: &'static str, y: &'static str) -> Result<Vec2, ProtocolError> {
        let x = self.next_int(x)? as f64;
        let y = self.next_int(y)? as f64;
        Ok(Vec2::new(x, y))
    }

    /// Setup block: lap count, checkpoint count, then checkpoint coordinates.
    pub fn read_course(&mut self) -> Result<Course, ProtocolError> {
        let laps = self.next_int("lap count")?;
        let laps = u32::try_from(laps)
            .ok()
            .filter(|&laps| laps > 0)
            .ok_or(ProtocolError::InvalidLapCount(laps))?;
        let count = self.next_count("checkpoint count")?;
        if count == 0 {
            return Err(ProtocolError::EmptyCourse);
        }

        let checkpoints = (0..count)
            .map(|_| self.next_point("checkpoint x", "checkpoint y"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Course::new(laps, &checkpoints))
    }

    fn read_pod(&mut self, checkpoint_count: usize) -> Result<PodInput, ProtocolError> {
        let pos = self.next_point("x", "y")?;
        let vel = self.next_point("vx", "vy")?;
        let heading = self.next_int("angle")? as f64;
        let id = self.next_int("next checkpoint id")?;

        let next_checkpoint = usize::try_from(id)
            .ok()
            .filter(|&id| id < checkpoint_count)
            .ok_or(ProtocolError::CheckpointOutOfRange {
                id,
                count: checkpoint_count,
            })?;

        Ok(PodInput {
            pos,
            vel,
            heading,
            next_checkpoint,
        })
    }

    /// Our pods then theirs. `None` when the input ended cleanly before the turn.
    pub fn read_turn(
        &mut self,
        pods_per_team: usize,
        checkpoint_count: usize,
    ) -> Result<Option<TurnInput>, ProtocolError> {
        if self.at_eof()? {
            return Ok(None);
        }

        let mine = (0..pods_per_team)
            .map(|_| self.read_pod(checkpoint_count))
            .collect::<Result<Vec<_>, _>>()?;
        let theirs = (0..pods_per_team)
            .map(|_| self.read_pod(checkpoint_count))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(TurnInput { mine, theirs }))
    }

    /// Early league shape: own position, next checkpoint position, distance
    /// and angle to it, then the opponent position.
    pub fn read_simple_turn(&mut self) -> Result<Option<SimpleTurn>, ProtocolError> {
        if self.at_eof()? {
            return Ok(None);
        }

        let pos = self.next_point("x", "y")?;
        let checkpoint = self.next_point("next checkpoint x", "next checkpoint y")?;
        let checkpoint_dist = self.next_int("next checkpoint dist")? as f64;
        let checkpoint_angle = self.next_int("next checkpoint angle")? as f64;
        let opponent = self.next_point("opponent x", "opponent y")?;

        Ok(Some(SimpleTurn {
            pos,
            checkpoint,
            checkpoint_dist,
            checkpoint_angle,
            opponent,
        }))
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct SimpleTurn {
    pub pos: Vec2,
    pub checkpoint: Vec2,
    pub checkpoint_dist: f64,
    /// Between the pod's heading and the checkpoint, `[-180, 180]`.
    pub checkpoint_angle: f64,
    pub opponent: Vec2,
}

/// One line per decision, flushed so the referee sees the whole turn.
pub fn write_decisions<W: Write>(out: &mut W, decisions: &[Decision]) -> io::Result<()> {
    for decision in decisions {
        writeln!(out, "{decision}")?;
    }
    out.flush()
}
