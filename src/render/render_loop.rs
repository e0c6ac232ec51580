use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation flag shared between the loop and whoever owns the view.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Per-frame redraw loop tied to the lifetime of a drawing surface.
///
/// The host calls [`RenderLoop::tick`] once per animation frame and only
/// draws (and schedules the next frame) while it returns `true`. Dropping
/// the loop cancels it.
#[derive(Debug, Default)]
pub struct RenderLoop {
    token: Option<CancellationToken>,
    frames: u64,
}

impl RenderLoop {
    /// Starts the loop. Starting a running loop returns its existing token.
    pub fn start(&mut self) -> CancellationToken {
        match &self.token {
            Some(token) if !token.is_cancelled() => token.clone(),
            _ => {
                let token = CancellationToken::default();
                self.token = Some(token.clone());
                log::debug!("Render loop started");
                token
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
            log::debug!("Render loop cancelled after {} frames", self.frames);
        }
    }

    pub fn is_running(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.frames += 1;
        true
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_loop_does_not_tick() {
        let mut render_loop = RenderLoop::default();
        assert!(!render_loop.tick());
        assert_eq!(render_loop.frames(), 0);
    }

    #[test]
    fn test_external_cancel_stops_loop() {
        let mut render_loop = RenderLoop::default();
        let token = render_loop.start();
        assert!(render_loop.tick());
        assert!(render_loop.tick());

        token.cancel();
        assert!(!render_loop.tick());
        assert_eq!(render_loop.frames(), 2);
    }

    #[test]
    fn test_restart_after_cancel_issues_fresh_token() {
        let mut render_loop = RenderLoop::default();
        let first = render_loop.start();
        assert!(!render_loop.start().is_cancelled());

        render_loop.cancel();
        assert!(first.is_cancelled());

        let second = render_loop.start();
        assert!(!second.is_cancelled());
        assert!(render_loop.is_running());
    }

    #[test]
    fn test_drop_cancels() {
        let mut render_loop = RenderLoop::default();
        let token = render_loop.start();
        drop(render_loop);
        assert!(token.is_cancelled());
    }
}
