//! Character-by-character reveal of advisory text
//!
//! A [`Typewriter`] owns at most one reveal task per [`DisplaySurface`].
//! Starting a new reveal bumps the surface generation and aborts the old
//! task; appends carrying a stale generation are rejected under the same
//! lock, so two reveals can never interleave on one surface.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Lazy, finite sequence of display chunks for one piece of text
#[derive(Debug, Clone)]
pub struct TextReveal {
    chars: Vec<char>,
    pos: usize,
}

impl TextReveal {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.chars.len() - self.pos
    }
}

impl Iterator for TextReveal {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(ch)
    }
}

/// Change notification for whatever mirrors the surface (a terminal, a widget)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceUpdate {
    Reset,
    Char(char),
    Finished,
}

pub type SurfaceHook = Arc<dyn Fn(SurfaceUpdate) + Send + Sync>;

#[derive(Debug, Default)]
struct SurfaceState {
    generation: u64,
    text: String,
    finished: bool,
}

/// Text area that reveals are written into
#[derive(Clone, Default)]
pub struct DisplaySurface {
    state: Arc<Mutex<SurfaceState>>,
    hook: Option<SurfaceHook>,
}

impl DisplaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook(mut self, hook: SurfaceHook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.lock().finished
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SurfaceState> {
        // Poison is ignored: the state is a plain text buffer
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, update: SurfaceUpdate) {
        if let Some(hook) = &self.hook {
            hook(update);
        }
    }

    // The hook runs after the guard is dropped so it may read the surface.
    fn begin(&self) -> u64 {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.text.clear();
            state.finished = false;
            state.generation
        };
        self.notify(SurfaceUpdate::Reset);
        generation
    }

    fn append(&self, generation: u64, ch: char) -> bool {
        {
            let mut state = self.lock();
            if state.generation != generation {
                return false;
            }
            state.text.push(ch);
        }
        self.notify(SurfaceUpdate::Char(ch));
        true
    }

    fn finish(&self, generation: u64) {
        let current = {
            let mut state = self.lock();
            let current = state.generation == generation;
            if current {
                state.finished = true;
            }
            current
        };
        if current {
            self.notify(SurfaceUpdate::Finished);
        }
    }
}

/// Restartable, cancellable reveal driver
pub struct Typewriter {
    surface: DisplaySurface,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl Typewriter {
    pub fn new(surface: DisplaySurface, interval: Duration) -> Self {
        Self {
            surface,
            interval,
            task: None,
        }
    }

    pub fn surface(&self) -> &DisplaySurface {
        &self.surface
    }

    /// Discard any in-flight reveal and start revealing `text` from scratch.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, text: &str) -> u64 {
        self.cancel();
        let generation = self.surface.begin();
        let surface = self.surface.clone();
        let interval = self.interval;
        let reveal = TextReveal::new(text);

        self.task = Some(tokio::spawn(async move {
            for ch in reveal {
                if !surface.append(generation, ch) {
                    return;
                }
                tokio::time::sleep(interval).await;
            }
            surface.finish(generation);
        }));
        generation
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Wait for the current reveal to complete (or be aborted).
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.cancel();
    }
}
