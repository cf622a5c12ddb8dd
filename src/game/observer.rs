/// Notifications a session sends to its host
///
/// Both methods default to doing nothing, so hosts only implement what they
/// care about.
pub trait SessionObserver {
    /// Called after a tick on which food was eaten, with the new score
    fn on_score_changed(&mut self, _score: u32) {}

    /// Called once when the session ends
    fn on_game_over(&mut self, _final_score: u32) {}
}

/// Observer for hosts that only look at tick results
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

impl<T: SessionObserver + ?Sized> SessionObserver for Box<T> {
    fn on_score_changed(&mut self, score: u32) {
        (**self).on_score_changed(score);
    }

    fn on_game_over(&mut self, final_score: u32) {
        (**self).on_game_over(final_score);
    }
}
