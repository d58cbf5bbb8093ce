use std::fmt;

use tracing::{debug, info};

use super::config::{Mode, Tuning};
use super::course::Course;
use super::entity::{predict_collision, MAX_THRUST, POD_RADIUS};
use super::pod::{leader, Pod};
use super::vec2::{angle_diff, Vec2};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// `0..=100`
    Thrust(u8),
    Boost,
    Shield,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thrust(thrust) => write!(f, "{thrust}"),
            Self::Boost => write!(f, "BOOST"),
            Self::Shield => write!(f, "SHIELD"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Decision {
    pub target: Vec2,
    pub command: Command,
}

/// Formats as the output line, `"x y command"`.
impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target.round();
        write!(
            f,
            "{} {} {}",
            target.x as i64, target.y as i64, self.command
        )
    }
}

/// Aim vector relative to the pod, plus the distance thrust is scaled by.
#[derive(Debug, Copy, Clone)]
struct Aim {
    vector: Vec2,
    distance: f64,
}

pub struct Controller {
    pub tuning: Tuning,
}

impl Controller {
    pub fn new(tuning: Tuning) -> Self {
        Controller { tuning }
    }

    /// Picks this turn's target and command for `pod`. Spends the boost when
    /// it is emitted.
    pub fn decide(
        &self,
        pod: &mut Pod,
        course: &Course,
        ally: Option<&Pod>,
        opponents: &[Pod],
        mode: Mode,
    ) -> Decision {
        let aim = match (mode, leader(opponents, course)) {
            (Mode::Attack, Some(target)) => self.attack_aim(pod, target),
            _ => self.race_aim(pod, course),
        };

        let command = self.command(pod, &aim, ally, opponents, mode);
        if command == Command::Boost {
            pod.boost_used = true;
            info!(?mode, "boost spent");
        }

        let decision = Decision {
            target: pod.pos() + aim.vector,
            command,
        };
        debug!(?mode, %decision, distance = aim.distance as i64, "decided");
        decision
    }

    fn race_aim(&self, pod: &Pod, course: &Course) -> Aim {
        let t = &self.tuning;
        let pos = pod.pos();
        let vel = pod.vel();

        let checkpoint = course.checkpoint_at(pod.next_checkpoint).pos();
        let distance = pos.dist(checkpoint);

        let last_leg = pod.checkpoints_passed + 1 >= course.total_checkpoints();
        let aim_at = if distance < t.anticipation * vel.len() && !last_leg {
            course.checkpoint_at(pod.next_checkpoint + 1).pos()
        } else {
            checkpoint
        };

        Aim {
            vector: Vec2::lin_comb(1., aim_at - pos, -t.compensation, vel),
            distance,
        }
    }

    fn attack_aim(&self, pod: &Pod, target: &Pod) -> Aim {
        let intercept = target
            .body
            .predict_position(self.tuning.attack_lookahead, target.heading);
        let vector = intercept - pod.pos();

        Aim {
            vector,
            distance: vector.len(),
        }
    }

    fn command(
        &self,
        pod: &Pod,
        aim: &Aim,
        ally: Option<&Pod>,
        opponents: &[Pod],
        mode: Mode,
    ) -> Command {
        let t = &self.tuning;

        if self.should_shield(pod, aim, opponents, mode) {
            return Command::Shield;
        }

        // Aim vector cancelled out: already where we want to be.
        if aim.vector == Vec2::ZERO {
            return Command::Thrust(0);
        }

        let turn = angle_diff(pod.heading, aim.vector.angle()).abs();
        if turn > t.max_turn {
            return Command::Thrust(0);
        }

        if mode == Mode::Race
            && !pod.boost_used
            && aim.distance > t.boost_distance
            && turn < t.boost_angle
            && !self.traffic_ahead(pod, ally, opponents)
        {
            return Command::Boost;
        }

        let mut thrust = (aim.distance * t.slowdown).clamp(0., MAX_THRUST);

        if let Some(ally) = ally {
            let close = pod.pos().dist(ally.pos()) < 2. * POD_RADIUS + t.ally_margin;
            let in_front = (ally.pos() - pod.pos())
                .cos_to(aim.vector)
                .is_some_and(|cos| cos > t.ally_cos);
            if close && in_front {
                thrust *= t.ally_slowdown;
            }
        }

        Command::Thrust(thrust.round() as u8)
    }

    /// Side-on hit coming from an opponent.
    fn should_shield(&self, pod: &Pod, aim: &Aim, opponents: &[Pod], mode: Mode) -> bool {
        let horizon = match mode {
            Mode::Race => self.tuning.race_horizon,
            Mode::Attack => self.tuning.attack_horizon,
        };

        opponents.iter().any(|opponent| {
            predict_collision(&pod.body, &opponent.body, horizon)
                && (opponent.pos() - pod.pos())
                    .cos_to(aim.vector)
                    .is_some_and(|cos| cos.abs() < self.tuning.shield_cos)
        })
    }

    fn traffic_ahead(&self, pod: &Pod, ally: Option<&Pod>, opponents: &[Pod]) -> bool {
        let horizon = self.tuning.race_horizon;
        ally.into_iter()
            .chain(opponents)
            .any(|other| predict_collision(&pod.body, &other.body, horizon))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn course(points: &[(f64, f64)]) -> Course {
        let points: Vec<Vec2> = points.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
        Course::new(3, &points)
    }

    fn pod(pos: (f64, f64), vel: (f64, f64), heading: f64, next: usize) -> Pod {
        let mut pod = Pod::new();
        pod.observe(Vec2::new(pos.0, pos.1), Vec2::new(vel.0, vel.1), heading, next);
        pod
    }

    fn far_away() -> Vec<Pod> {
        vec![
            pod((-20000., -20000.), (0., 0.), 0., 0),
            pod((-30000., -20000.), (0., 0.), 0., 0),
        ]
    }

    fn controller() -> Controller {
        Controller::new(Tuning::default())
    }

    #[test]
    fn boost_on_long_straight() {
        let course = course(&[(0., 0.), (6000., 0.)]);
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let decision = controller().decide(&mut me, &course, None, &far_away(), Mode::Race);
        assert_eq!(decision.command, Command::Boost);
        assert_eq!(decision.target, Vec2::new(6000., 0.));
        assert!(me.boost_used);
    }

    #[test]
    fn boost_only_once() {
        let course = course(&[(0., 0.), (6000., 0.)]);
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let controller = controller();
        let opponents = far_away();
        let boosts = (0..10)
            .map(|_| controller.decide(&mut me, &course, None, &opponents, Mode::Race))
            .filter(|d| d.command == Command::Boost)
            .count();
        assert_eq!(boosts, 1);
        let again = controller.decide(&mut me, &course, None, &opponents, Mode::Race);
        assert_eq!(again.command, Command::Thrust(100));
    }

    #[test]
    fn no_boost_in_attack() {
        let course = course(&[(0., 0.), (6000., 0.)]);
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let opponents = vec![
            pod((9000., 0.), (0., 0.), 0., 1),
            pod((12000., 0.), (0., 0.), 0., 1),
        ];
        let decision = controller().decide(&mut me, &course, None, &opponents, Mode::Attack);
        assert_eq!(decision.command, Command::Thrust(100));
        assert!(!me.boost_used);
    }

    #[test]
    fn attack_chases_the_leader() {
        let course = course(&[(0., 0.), (10000., 0.)]);
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let mut leading = pod((4000., 2000.), (0., 0.), 0., 1);
        leading.checkpoints_passed = 2;
        let trailing = pod((9000., 0.), (0., 0.), 0., 1);
        let opponents = vec![trailing, leading.clone()];

        let decision = controller().decide(&mut me, &course, None, &opponents, Mode::Attack);
        // 100 + 185 + 257 along its heading
        assert_eq!(decision.target, Vec2::new(4542., 2000.));
    }

    #[test]
    fn sharp_turn_means_no_thrust() {
        let course = course(&[(0., 0.), (100., 0.)]);
        let mut me = pod((0., 0.), (0., 0.), 180., 1);
        let decision = controller().decide(&mut me, &course, None, &far_away(), Mode::Race);
        assert_eq!(decision.command, Command::Thrust(0));
    }

    #[test]
    fn thrust_slows_on_approach() {
        let course = course(&[(0., 0.), (1000., 0.)]);
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let decision = controller().decide(&mut me, &course, None, &far_away(), Mode::Race);
        assert_eq!(decision.command, Command::Thrust(85));
    }

    #[test]
    fn ally_ahead_quarters_thrust() {
        let course = course(&[(0., 0.), (3000., 0.)]);
        let controller = controller();

        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let alone = controller.decide(&mut me, &course, None, &far_away(), Mode::Race);
        assert_eq!(alone.command, Command::Thrust(100));

        let ally = pod((500., 0.), (0., 0.), 0., 1);
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let blocked = controller.decide(&mut me, &course, Some(&ally), &far_away(), Mode::Race);
        assert_eq!(blocked.command, Command::Thrust(25));
    }

    #[test]
    fn ally_behind_is_ignored() {
        let course = course(&[(0., 0.), (3000., 0.)]);
        let ally = pod((-500., 0.), (0., 0.), 0., 1);
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let decision = controller().decide(&mut me, &course, Some(&ally), &far_away(), Mode::Race);
        assert_eq!(decision.command, Command::Thrust(100));
    }

    #[test]
    fn side_hit_raises_shield() {
        let course = course(&[(0., 0.), (6000., 0.)]);
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let opponents = vec![
            pod((0., 1200.), (0., -400.), 270., 1),
            pod((-30000., 0.), (0., 0.), 0., 1),
        ];
        let decision = controller().decide(&mut me, &course, None, &opponents, Mode::Race);
        assert_eq!(decision.command, Command::Shield);
        assert!(!me.boost_used);
    }

    #[test]
    fn head_on_hit_keeps_racing() {
        let course = course(&[(0., 0.), (3000., 0.)]);
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let opponents = vec![
            pod((1200., 0.), (-400., 0.), 180., 1),
            pod((-30000., 0.), (0., 0.), 0., 1),
        ];
        let decision = controller().decide(&mut me, &course, None, &opponents, Mode::Race);
        assert_eq!(decision.command, Command::Thrust(100));
    }

    #[test]
    fn no_boost_into_traffic() {
        let course = course(&[(0., 0.), (6000., 0.)]);
        let controller = controller();
        let oncoming = pod((1300., 0.), (-600., 0.), 180., 1);

        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let opponents = far_away();
        let decision = controller.decide(&mut me, &course, Some(&oncoming), &opponents, Mode::Race);
        assert_eq!(decision.command, Command::Thrust(100));
        assert!(!me.boost_used);

        // head-on, so no shield either
        let opponents = vec![oncoming, pod((-30000., 0.), (0., 0.), 0., 1)];
        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let decision = controller.decide(&mut me, &course, None, &opponents, Mode::Race);
        assert_eq!(decision.command, Command::Thrust(100));
        assert!(!me.boost_used);
    }

    #[test]
    fn attack_sees_side_hits_further_ahead() {
        let course = course(&[(0., 0.), (6000., 0.)]);
        let controller = controller();
        // 1500, 1075, 714: contact on the third turn only
        let diving = pod((0., 2000.), (0., -500.), 270., 1);
        let mut leading = pod((6000., 0.), (0., 0.), 0., 1);
        leading.checkpoints_passed = 2;
        let opponents = vec![diving, leading];

        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let racing = controller.decide(&mut me, &course, None, &opponents, Mode::Race);
        assert_eq!(racing.command, Command::Boost);

        let mut me = pod((0., 0.), (0., 0.), 0., 1);
        let attacking = controller.decide(&mut me, &course, None, &opponents, Mode::Attack);
        assert_eq!(attacking.command, Command::Shield);
    }

    #[test]
    fn drift_is_compensated() {
        let course = course(&[(0., 0.), (10000., 0.)]);
        let mut me = pod((0., 0.), (0., 200.), 0., 1);
        let decision = controller().decide(&mut me, &course, None, &far_away(), Mode::Race);
        assert_eq!(decision.target, Vec2::new(10000., -600.));
    }

    #[test]
    fn anticipates_next_checkpoint() {
        let course = course(&[(0., 0.), (2000., 0.), (2000., 5000.)]);
        let mut me = pod((0., 0.), (500., 0.), 0., 1);
        let decision = controller().decide(&mut me, &course, None, &far_away(), Mode::Race);
        assert_eq!(decision.target, Vec2::new(500., 5000.));
    }

    #[test]
    fn no_anticipation_on_last_leg() {
        let course = course(&[(0., 0.), (2000., 0.), (2000., 5000.)]);
        let mut me = pod((0., 0.), (500., 0.), 0., 1);
        me.checkpoints_passed = course.total_checkpoints() - 1;
        let decision = controller().decide(&mut me, &course, None, &far_away(), Mode::Race);
        assert_eq!(decision.target, Vec2::new(500., 0.));
    }

    #[test]
    fn cancelled_aim_means_no_thrust() {
        let course = course(&[(0., 0.), (300., 0.)]);
        let mut me = pod((0., 0.), (100., 0.), 0., 1);
        me.checkpoints_passed = course.total_checkpoints() - 1;
        let decision = controller().decide(&mut me, &course, None, &far_away(), Mode::Race);
        assert_eq!(decision.target, Vec2::new(0., 0.));
        assert_eq!(decision.command, Command::Thrust(0));
    }

    #[test]
    fn thrust_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let controller = controller();
        for _ in 0..2000 {
            let mut coord = || rng.gen_range(-5000..20000) as f64;
            let course = course(&[(coord(), coord()), (coord(), coord()), (coord(), coord())]);
            let mut random_pod = |next: usize| {
                pod(
                    (rng.gen_range(0..16000) as f64, rng.gen_range(0..9000) as f64),
                    (rng.gen_range(-700..700) as f64, rng.gen_range(-700..700) as f64),
                    rng.gen_range(0..360) as f64,
                    next,
                )
            };
            let mut me = random_pod(1);
            let ally = random_pod(2);
            let opponents = vec![random_pod(0), random_pod(1)];
            let mode = if rng.gen_bool(0.5) { Mode::Race } else { Mode::Attack };

            let decision = controller.decide(&mut me, &course, Some(&ally), &opponents, mode);
            if let Command::Thrust(thrust) = decision.command {
                assert!(thrust <= 100);
            }
            assert!(decision.target.x.is_finite() && decision.target.y.is_finite());
        }
    }

    #[test]
    fn output_line_format() {
        let decision = Decision {
            target: Vec2::new(1234.4, -56.6),
            command: Command::Thrust(42),
        };
        assert_eq!(decision.to_string(), "1234 -57 42");
        let boost = Decision {
            command: Command::Boost,
            ..decision
        };
        assert_eq!(boost.to_string(), "1234 -57 BOOST");
        assert_eq!(Command::Shield.to_string(), "SHIELD");
    }
}
