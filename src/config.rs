use std::str::FromStr;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// How a pod picks its aim point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Follow the course.
    Race,
    /// Chase the leading opponent.
    Attack,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown behavior mode '{0}', expected 'race' or 'attack'")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "race" => Ok(Mode::Race),
            "attack" => Ok(Mode::Attack),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Steering constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    /// Switch to the following checkpoint once closer than this many turns of travel.
    pub anticipation: f64,
    /// Velocity multiple subtracted from the aim vector.
    pub compensation: f64,
    /// Thrust per unit of distance to the checkpoint.
    pub slowdown: f64,
    /// No thrust above this heading error, degrees.
    pub max_turn: f64,
    pub boost_distance: f64,
    pub boost_angle: f64,
    pub race_horizon: u32,
    pub attack_horizon: u32,
    pub shield_cos: f64,
    pub ally_cos: f64,
    pub ally_slowdown: f64,
    /// Added to two pod radii to get the ally slowdown range.
    pub ally_margin: f64,
    /// Turns of full thrust assumed for the chased opponent.
    pub attack_lookahead: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            anticipation: 5.,
            compensation: 3.,
            slowdown: 0.085,
            max_turn: 90.,
            boost_distance: 4000.,
            boost_angle: 10.,
            race_horizon: 2,
            attack_horizon: 3,
            shield_cos: 0.5,
            ally_cos: 0.5,
            ally_slowdown: 0.25,
            ally_margin: 300.,
            attack_lookahead: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tuning: Tuning,
    /// Mode of each owned pod, in input order.
    pub modes: Vec<Mode>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tuning: Tuning::default(),
            modes: vec![Mode::Race, Mode::Attack],
        }
    }
}

impl Config {
    /// Defaults overridden by environment variables:
    /// - `PODBOT_MODES`: comma separated modes, e.g. `race,attack`
    /// - `PODBOT_ANTICIPATION`, `PODBOT_COMPENSATION`, `PODBOT_BOOST_DISTANCE`
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(modes) = var("PODBOT_MODES") {
            config.modes = modes
                .split(',')
                .map(str::parse)
                .collect::<Result<Vec<Mode>, _>>()
                .context("invalid PODBOT_MODES")?;
        }

        let tuning = &mut config.tuning;
        for (key, field) in [
            ("PODBOT_ANTICIPATION", &mut tuning.anticipation),
            ("PODBOT_COMPENSATION", &mut tuning.compensation),
            ("PODBOT_BOOST_DISTANCE", &mut tuning.boost_distance),
        ] {
            if let Some(value) = var(key) {
                *field = value
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {key} value: {value}"))?;
            }
        }

        Ok(config)
    }

    /// Pods past the end of `modes` race.
    pub fn mode_for(&self, pod: usize) -> Mode {
        self.modes.get(pod).copied().unwrap_or(Mode::Race)
    }
}

/// Logs go to stderr, stdout carries the game protocol.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
