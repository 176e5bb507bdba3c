use std::sync::Arc;

use parking_lot::Mutex;

/// Receives the delta actually simulated at the end of every tick that ran,
/// e.g. to keep an attached visual in sync with the rope.
pub trait StepListener: Send {
    fn on_step(&mut self, delta: f64);
}

impl<F> StepListener for F
where
    F: FnMut(f64) + Send,
{
    fn on_step(&mut self, delta: f64) {
        self(delta)
    }
}

/// Shared log of simulated deltas. Clones record into the same buffer.
#[derive(Debug, Clone, Default)]
pub struct TickRecorder {
    deltas: Arc<Mutex<Vec<f64>>>,
}

impl TickRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deltas(&self) -> Vec<f64> {
        self.deltas.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.deltas.lock().len()
    }

    pub fn total(&self) -> f64 {
        self.deltas.lock().iter().sum()
    }

    pub fn clear(&self) {
        self.deltas.lock().clear();
    }
}

impl StepListener for TickRecorder {
    fn on_step(&mut self, delta: f64) {
        self.deltas.lock().push(delta);
    }
}
