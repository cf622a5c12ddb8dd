use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};
use snake_engine::game::{EdgePolicy, GameConfig};
use snake_engine::modes::{HumanMode, HumanSettings, SimulateConfig, SimulateMode, TickSchedule};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON game configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Whether the grid edges kill or wrap around
    #[arg(long)]
    edge: Option<Edge>,

    /// Initial snake length
    #[arg(long)]
    length: Option<usize>,

    /// Seed for food placement (random if not given)
    #[arg(long)]
    seed: Option<u64>,

    /// Starting tick interval in milliseconds
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Factor applied to the tick interval each time food is eaten
    #[arg(long, default_value = "0.99", value_parser = parse_speed_up)]
    speed_up: f64,

    /// Shortest tick interval in milliseconds
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    min_tick_ms: u64,

    /// Where the high score is kept
    #[arg(long, default_value = ".snake_high_score.json")]
    high_score_file: PathBuf,

    /// Log file for interactive play (the terminal is taken by the game)
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Number of games to simulate
    #[arg(long, default_value = "100")]
    games: usize,

    /// Tick limit per simulated game
    #[arg(long, default_value = "10000")]
    max_ticks: u64,

    /// Seed for the simulated turning policy
    #[arg(long, default_value = "0")]
    policy_seed: u64,
}

fn parse_speed_up(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(format!("{} is not in (0, 1]", s))
    }
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Run headless games with a random turning policy
    Simulate,
}

#[derive(Clone, Copy, ValueEnum)]
enum Edge {
    Wall,
    Wrap,
}

impl From<Edge> for EdgePolicy {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Wall => EdgePolicy::Wall,
            Edge::Wrap => EdgePolicy::Wrap,
        }
    }
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(edge) = self.edge {
            config.edge_policy = edge.into();
        }
        if let Some(length) = self.length {
            config.initial_snake_length = length;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.game_config()?;

    match cli.mode {
        Mode::Human => {
            let log_file = File::create(&cli.log_file)
                .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
            WriteLogger::init(LevelFilter::Info, Config::default(), log_file)
                .context("Failed to initialize logger")?;
            info!("Starting snake");

            let settings = HumanSettings {
                schedule: TickSchedule::new(
                    Duration::from_millis(cli.tick_ms),
                    cli.speed_up,
                    Duration::from_millis(cli.min_tick_ms),
                ),
                high_score_path: cli.high_score_file.clone(),
            };
            let mut human_mode = HumanMode::new(config, settings)?;
            human_mode.run().await?;
        }
        Mode::Simulate => {
            TermLogger::init(
                LevelFilter::Info,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )
            .context("Failed to initialize logger")?;

            let simulate_config = SimulateConfig {
                games: cli.games,
                max_ticks: cli.max_ticks,
                policy_seed: cli.policy_seed,
                game_config: config,
                ..Default::default()
            };
            let mut simulate_mode = SimulateMode::new(simulate_config)?;
            let report = simulate_mode.run();
            simulate_mode.print_report(&report);
        }
    }

    Ok(())
}
