//! Neon Runner entry point
//!
//! Native builds run a headless session: the autopilot plays (unless turned
//! off) for a fixed amount of simulated time and the outcome is logged.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;

    use neon_runner::consts::SIM_DT;
    use neon_runner::sim::{GameEvent, GamePhase};
    use neon_runner::{FileStore, Game, HighScoreStore, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "neon-runner")]
    #[command(about = "Headless endless-runner simulation")]
    pub struct Cli {
        /// Track seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Simulated seconds to run
        #[arg(long, default_value_t = 60.0)]
        seconds: f32,
        /// Tuning overrides as JSON
        #[arg(long, value_name = "FILE")]
        tuning: Option<PathBuf>,
        /// Where the high score is kept
        #[arg(long, value_name = "FILE", default_value = "neon_runner_highscore.json")]
        high_score_file: PathBuf,
        /// Skip reading and writing the high score
        #[arg(long)]
        no_save: bool,
        /// Disable the autopilot (the runner then just runs straight ahead)
        #[arg(long)]
        no_idle: bool,
        /// Number of runs; a new one starts after each game over
        #[arg(long, default_value_t = 1)]
        runs: u32,
    }

    pub fn run() -> ExitCode {
        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => match Tuning::load(path) {
                Ok(tuning) => tuning,
                Err(err) => {
                    log::error!("{err}");
                    return ExitCode::FAILURE;
                }
            },
            None => Tuning::default(),
        };

        let store: Option<Box<dyn HighScoreStore>> = if cli.no_save {
            None
        } else {
            Some(Box::new(FileStore::new(&cli.high_score_file)))
        };

        let seed = cli.seed.unwrap_or_else(rand::random);
        let mut game = match Game::new(seed, tuning, store) {
            Ok(game) => game,
            Err(err) => {
                log::error!("Invalid tuning: {err}");
                return ExitCode::FAILURE;
            }
        };
        game.set_idle(!cli.no_idle);

        let total_steps = (cli.seconds.max(0.0) / SIM_DT).round() as u64;
        let mut runs_done = 0;
        let mut pickups = 0u32;

        for _ in 0..total_steps {
            for event in game.step(SIM_DT) {
                match event {
                    GameEvent::GameOver {
                        final_score,
                        new_high_score,
                    } => {
                        runs_done += 1;
                        log::info!(
                            "Run {runs_done} over at {:.1}m: score {final_score}{}",
                            game.state().player().distance(),
                            if new_high_score { " (new record)" } else { "" }
                        );
                    }
                    GameEvent::EntityRemoved {
                        reason: neon_runner::sim::RemovalReason::Consumed,
                        ..
                    } if game.phase() == GamePhase::Running => pickups += 1,
                    GameEvent::DifficultyChanged { difficulty } => {
                        log::trace!("Difficulty {difficulty:.2}");
                    }
                    other => log::trace!("{other:?}"),
                }
            }

            if game.phase() == GamePhase::GameOver {
                if runs_done >= cli.runs {
                    break;
                }
                game.restart();
            }
        }

        println!("seed:       {seed:#x}");
        println!("runs:       {runs_done}");
        println!("distance:   {:.1}", game.state().player().distance());
        println!("score:      {}", game.score());
        println!("pickups:    {pickups}");
        println!("high score: {}", game.high_score());
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Neon Runner (native) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `neon_runner::Game` directly
}
