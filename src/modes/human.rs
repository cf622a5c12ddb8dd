use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{Instant, interval, interval_at};

use crate::game::{GameConfig, GameSession, SessionState, TickResult};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::{GameMetrics, HighScoreStore};
use crate::modes::TickSchedule;
use crate::render::{FrameInfo, Renderer};

/// Host-side settings for interactive play
#[derive(Debug, Clone)]
pub struct HumanSettings {
    pub schedule: TickSchedule,
    pub high_score_path: PathBuf,
}

impl Default for HumanSettings {
    fn default() -> Self {
        Self {
            schedule: TickSchedule::default(),
            high_score_path: PathBuf::from(".snake_high_score.json"),
        }
    }
}

pub struct HumanMode {
    session: GameSession<GameMetrics>,
    high_scores: HighScoreStore,
    schedule: TickSchedule,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    /// Set when the tick interval changed and the timer must be rebuilt
    reschedule: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, settings: HumanSettings) -> Result<Self> {
        let high_scores = HighScoreStore::load_or_default(&settings.high_score_path);
        let metrics = GameMetrics::with_high_score(high_scores.high_score());
        let session =
            GameSession::with_observer(config, metrics).context("Invalid game configuration")?;

        Ok(Self {
            session,
            high_scores,
            schedule: settings.schedule,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            reschedule: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.schedule.current());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.session.observer_mut().update();
                    let snapshot = self.session.snapshot();
                    let info = FrameInfo {
                        grid: self.session.grid(),
                        metrics: self.session.observer(),
                        paused: self.paused,
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &info);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.reschedule {
                let period = self.schedule.current();
                tick_timer = interval_at(Instant::now() + period, period);
                self.reschedule = false;
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    if !self.paused {
                        self.session.request_direction(direction);
                    }
                }
                KeyAction::Restart => self.reset_game(),
                KeyAction::Pause => {
                    if self.session.state() == SessionState::Running {
                        self.paused = !self.paused;
                    }
                }
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) {
        if self.paused || self.session.state() != SessionState::Running {
            return;
        }

        match self.session.tick() {
            TickResult::Continued { ate_food: true, .. } => {
                self.schedule.on_food();
                self.reschedule = true;
            }
            TickResult::Continued { .. } => {}
            TickResult::GameOver { final_score, .. } => {
                if let Err(e) = self.high_scores.record(final_score) {
                    error!("Error saving high score: {:#}", e);
                }
            }
        }
    }

    fn reset_game(&mut self) {
        self.session.restart();
        self.session.observer_mut().on_game_start();
        self.schedule.reset();
        self.reschedule = true;
        self.paused = false;
        info!("Restarted at {:?} per tick", self.schedule.current());
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, EdgePolicy, Position};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn mode(dir: &TempDir) -> HumanMode {
        let config = GameConfig::new(5, 5)
            .with_edge_policy(EdgePolicy::Wall)
            .with_seed(4);
        let settings = HumanSettings {
            high_score_path: dir.path().join("best.json"),
            ..Default::default()
        };
        HumanMode::new(config, settings).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let dir = TempDir::new().unwrap();
        let mode = mode(&dir);
        assert_eq!(mode.session.state(), SessionState::Running);
        assert_eq!(mode.session.score(), 0);
        assert_eq!(mode.session.observer().high_score, 0);
    }

    #[test]
    fn test_invalid_config() {
        let dir = TempDir::new().unwrap();
        let settings = HumanSettings {
            high_score_path: dir.path().join("best.json"),
            ..Default::default()
        };
        assert!(HumanMode::new(GameConfig::new(0, 3), settings).is_err());
    }

    #[test]
    fn test_game_reset() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir);
        mode.session.game_state_mut().food = Some(Position::new(0, 0));

        while mode.session.state() == SessionState::Running {
            mode.update_game();
        }

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.session.state(), SessionState::Running);
        assert_eq!(mode.session.score(), 0);
        assert_eq!(mode.session.observer().games_played, 1);
        assert_eq!(mode.schedule.current(), Duration::from_millis(100));
    }

    #[test]
    fn test_food_speeds_up_ticks() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir);
        mode.session.game_state_mut().food = Some(Position::new(3, 2));

        mode.update_game();

        assert_eq!(mode.session.score(), 1);
        assert_eq!(mode.session.observer().score, 1);
        assert!(mode.schedule.current() < Duration::from_millis(100));
        assert!(mode.reschedule);
    }

    #[test]
    fn test_high_score_persisted_on_game_over() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir);
        {
            let state = mode.session.game_state_mut();
            state.score = 6;
            state.food = Some(Position::new(0, 0));
        }

        while mode.session.state() == SessionState::Running {
            mode.update_game();
        }

        assert_eq!(mode.session.observer().high_score, 6);
        let stored = HighScoreStore::load(&dir.path().join("best.json")).unwrap();
        assert_eq!(stored.high_score(), 6);
    }

    #[test]
    fn test_pause_stops_ticks_and_turns() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir);
        mode.session.game_state_mut().food = Some(Position::new(0, 0));
        let before = mode.session.snapshot();

        mode.handle_event(key(KeyCode::Char(' ')));
        mode.handle_event(key(KeyCode::Up));
        mode.update_game();

        assert!(mode.paused);
        assert_eq!(mode.session.snapshot(), before);

        mode.handle_event(key(KeyCode::Char(' ')));
        mode.update_game();
        assert_eq!(mode.session.snapshot().heading, Direction::Right);
        assert_eq!(mode.session.snapshot().head(), Position::new(3, 2));
    }

    #[test]
    fn test_quit_key() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir);
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
