use tracing::{debug, info};

use super::controller::{Command, Decision};
use super::entity::{CHECKPOINT_RADIUS, MAX_THRUST};
use super::protocol::SimpleTurn;

/// Boost only on a straight at least twelve checkpoint radii long.
pub const BOOST_DISTANCE: f64 = 12. * CHECKPOINT_RADIUS;
pub const BOOST_ANGLE: f64 = 10.;
pub const MAX_TURN: f64 = 90.;

/// Pilot for the reduced input of the early leagues, where neither velocity
/// nor heading is known: full power unless facing away, boost once on a
/// long aligned straight.
#[derive(Default, Debug)]
pub struct SimplePilot {
    pub boost_used: bool,
}

impl SimplePilot {
    pub fn new() -> Self {
        SimplePilot { boost_used: false }
    }

    pub fn decide(&mut self, turn: &SimpleTurn) -> Decision {
        let angle = turn.checkpoint_angle.abs();

        let command = if !self.boost_used
            && turn.checkpoint_dist > BOOST_DISTANCE
            && angle < BOOST_ANGLE
        {
            self.boost_used = true;
            info!("boost spent");
            Command::Boost
        } else if angle > MAX_TURN {
            Command::Thrust(0)
        } else {
            Command::Thrust(MAX_THRUST as u8)
        };

        debug!(%command, dist = turn.checkpoint_dist, angle, "decided");
        Decision {
            target: turn.checkpoint,
            command,
        }
    }
}
