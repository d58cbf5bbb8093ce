extern crate podbot;

use anyhow::Result;
use clap::Parser;
use podbot::{
    config::{init_tracing, Config, Mode},
    controller::{Command, Decision},
    course::Course,
    simulation::{Race, ARENA},
    strategy::Strategy,
    vec2::Vec2,
    world::World,
};

use flo_canvas::*;
use flo_draw::*;

use futures::executor;
use futures::prelude::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

const SCALE: f32 = 0.1;
const HEIGHT: f32 = ARENA.y as f32 * SCALE;
const WIDTH: f32 = ARENA.x as f32 * SCALE;
const PREDICTION_TURNS: u32 = 6;

/// Race the bot against a racing-only copy of itself on a random course.
#[derive(Parser, Debug)]
#[command(name = "local_sim")]
struct Cli {
    /// Seed for course generation, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    laps: u32,

    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(3..=8))]
    checkpoints: u32,

    /// Run to the end without a window
    #[arg(long)]
    headless: bool,

    #[arg(long, default_value_t = 600)]
    max_turns: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

struct Match {
    race: Race,
    worlds: [World; 2],
    strategies: [Strategy; 2],
    last_decisions: Vec<Decision>,
}

impl Match {
    fn new(course: Course) -> Self {
        let opponent_config = Config {
            modes: vec![Mode::Race, Mode::Race],
            ..Config::default()
        };

        Match {
            race: Race::new(course.clone(), 2),
            worlds: [World::new(course.clone(), 2), World::new(course, 2)],
            strategies: [Strategy::new(Config::default()), Strategy::new(opponent_config)],
            last_decisions: Vec::new(),
        }
    }

    fn step(&mut self) {
        let mut decisions = Vec::with_capacity(self.race.racers.len());

        for team in 0..2 {
            let input = self.race.turn_input(team);
            self.worlds[team].apply(&input);
            decisions.extend(self.strategies[team].play(&mut self.worlds[team]));
        }

        self.race.step(&decisions);
        self.last_decisions = decisions;
    }

    fn finished(&self, max_turns: u32) -> bool {
        self.race.winner().is_some() || self.race.turn >= max_turns
    }
}

fn to_screen(pos: Vec2) -> (f32, f32) {
    (pos.x as f32 * SCALE, HEIGHT - pos.y as f32 * SCALE)
}

fn team_color(racer: usize, opacity: f32) -> Color {
    if racer < 2 {
        Color::Rgba(0., 0., 1., opacity)
    } else {
        Color::Rgba(1., 0., 0., opacity)
    }
}

fn draw_circle_at_pos(gc: &mut CanvasGraphicsContext, pos: Vec2, radius: f64, col: Color) {
    let (x, y) = to_screen(pos);
    gc.new_path();

    gc.circle(x, y, radius as f32 * SCALE);

    gc.fill_color(col);

    gc.fill();
    gc.line_width(1.0);
    gc.stroke_color(Color::Rgba(0.0, 0.0, 0.0, 1.0));
    gc.stroke();
}

fn draw_line(gc: &mut CanvasGraphicsContext, from: Vec2, to: Vec2, col: Color) {
    let (x1, y1) = to_screen(from);
    let (x2, y2) = to_screen(to);

    gc.new_path();
    gc.move_to(x1, y1);
    gc.line_to(x2, y2);
    gc.line_width(1.0);
    gc.stroke_color(col);
    gc.stroke();
}

fn draw_course(gc: &mut CanvasGraphicsContext, course: &Course) {
    let count = course.checkpoint_count();
    for i in 0..count {
        let from = course.checkpoint_at(i);
        let to = course.checkpoint_at(i + 1);
        draw_line(gc, from.pos(), to.pos(), Color::Rgba(0., 0., 0., 0.2));
    }

    for (i, cp) in course.checkpoints().iter().enumerate() {
        let shade = if i == 0 { 0.4 } else { 0.7 };
        draw_circle_at_pos(
            gc,
            cp.pos(),
            cp.body.radius,
            Color::Rgba(shade, shade, shade, 0.6),
        );
    }
}

fn draw_racers(gc: &mut CanvasGraphicsContext, game: &Match) {
    for (i, racer) in game.race.racers.iter().enumerate() {
        draw_circle_at_pos(gc, racer.body.pos, racer.body.radius, team_color(i, 1.));

        if let Some(decision) = game.last_decisions.get(i) {
            let col = match decision.command {
                Command::Shield => Color::Rgba(0., 0.8, 0., 1.),
                Command::Boost => Color::Rgba(1., 0.6, 0., 1.),
                Command::Thrust(_) => team_color(i, 0.3),
            };
            draw_line(gc, racer.body.pos, decision.target, col);
        }
    }
}

fn draw_predictions(gc: &mut CanvasGraphicsContext, race: &Race) {
    for (i, racer) in race.racers.iter().enumerate() {
        let heading = racer.heading.unwrap_or(0.);
        let mut from = racer.body.pos;

        for turns in 1..=PREDICTION_TURNS {
            let to = racer.body.predict_position(turns, heading);
            draw_line(gc, from, to, team_color(i, 0.6));
            from = to;
        }
    }
}

struct App {
    cli: Cli,
    rng: StdRng,
    game: Match,
    canvas: Canvas,

    draw_predictions: bool,
}

impl App {
    fn new(cli: Cli, canvas: Canvas) -> Self {
        let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!(seed, "course seed");

        let mut rng = StdRng::seed_from_u64(seed);
        let course = Race::random_course(&mut rng, cli.laps, cli.checkpoints as usize);

        App {
            cli,
            rng,
            game: Match::new(course),
            canvas,
            draw_predictions: false,
        }
    }

    fn redraw(&mut self) {
        let game = &self.game;
        let draw_predictions_enabled = self.draw_predictions;

        self.canvas.draw(|gc| {
            gc.clear_all_layers();
            gc.canvas_height(HEIGHT);
            gc.center_region(0.0, 0.0, WIDTH, HEIGHT);

            gc.new_path();
            gc.rect(0., 0., WIDTH, HEIGHT);
            gc.line_width(1.0);
            gc.stroke_color(Color::Rgba(0.0, 0.0, 0.0, 0.3));
            gc.stroke();

            draw_course(gc, &game.race.course);
            draw_racers(gc, game);

            if draw_predictions_enabled {
                draw_predictions(gc, &game.race);
            }
        });
    }

    fn advance(&mut self) {
        if self.game.finished(self.cli.max_turns) {
            return;
        }

        self.game.step();
        if let Some(winner) = self.game.race.winner() {
            info!(winner, turn = self.game.race.turn, "race over");
        }
        self.redraw();
    }

    fn regenerate_course(&mut self) {
        let course =
            Race::random_course(&mut self.rng, self.cli.laps, self.cli.checkpoints as usize);
        self.game = Match::new(course);
        self.redraw();
    }
}

fn run_headless(cli: &Cli) {
    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    let course = Race::random_course(&mut rng, cli.laps, cli.checkpoints as usize);
    let mut game = Match::new(course);

    while !game.finished(cli.max_turns) {
        game.step();
    }

    match game.race.winner() {
        Some(winner) => println!(
            "seed {seed}: pod {winner} (team {}) won after {} turns",
            winner / game.race.pods_per_team,
            game.race.turn
        ),
        None => println!("seed {seed}: no winner after {} turns", game.race.turn),
    }

    for (i, racer) in game.race.racers.iter().enumerate() {
        println!(
            "pod {i}: {} checkpoints, boost {}",
            racer.checkpoints_passed,
            if racer.boost_used { "used" } else { "unused" }
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "info" });

    if cli.headless {
        run_headless(&cli);
        return Ok(());
    }

    with_2d_graphics(move || {
        executor::block_on(async move {
            let (canvas, mut events) = create_canvas_window_with_events("PODBOT");

            let mut app = App::new(cli, canvas);

            app.redraw();

            while let Some(event) = events.next().await {
                match event {
                    DrawEvent::KeyDown(_, Some(Key::KeySpace)) => {
                        app.advance();
                    }
                    DrawEvent::KeyDown(_, Some(Key::KeyR)) => {
                        app.regenerate_course();
                    }
                    DrawEvent::KeyDown(_, Some(Key::KeyEscape)) => {
                        std::process::exit(0);
                    }
                    DrawEvent::KeyDown(_, Some(Key::Key1)) => {
                        app.draw_predictions = !app.draw_predictions;
                        app.redraw();
                    }
                    _ => {}
                }
            }
        });
    });

    Ok(())
}
