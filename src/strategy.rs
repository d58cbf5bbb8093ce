use super::*;

pub struct Strategy {
    pub config: Config,
    controller: Controller,
}

impl Strategy {
    pub fn new(config: Config) -> Self {
        let controller = Controller::new(config.tuning.clone());
        Strategy { config, controller }
    }
}

impl Strategy {
    /// One decision per owned pod, in input order.
    pub fn play(&mut self, world: &mut World) -> Vec<Decision> {
        let mut decisions = Vec::with_capacity(world.me.len());

        for i in 0..world.me.len() {
            // Allies are read-only this turn; take a snapshot before borrowing
            // our own pod mutably.
            let ally = world
                .me
                .iter()
                .enumerate()
                .find(|&(j, _)| j != i)
                .map(|(_, pod)| pod.clone());

            let mode = self.config.mode_for(i);
            let decision = self.controller.decide(
                &mut world.me[i],
                &world.course,
                ally.as_ref(),
                &world.opponent,
                mode,
            );
            decisions.push(decision);
        }

        decisions
    }
}
