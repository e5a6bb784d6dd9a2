use crate::evolution::network::Controls;

/// Whether an evaluation run continues after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    /// The individual is still driving.
    Running,
    /// The run is over and [`Episode::fitness`] is final.
    Finished,
}

/// A host simulation that scores one network per run.
///
/// The trainer calls [`reset`](Episode::reset) before every run, then
/// alternates [`sense`](Episode::sense) and [`advance`](Episode::advance)
/// until the episode finishes or the step limit is reached.
pub trait Episode {
    /// Restores the starting state.
    fn reset(&mut self);

    /// Sensor readings fed to the network's input layer.
    fn sense(&self) -> Vec<f32>;

    /// Applies one step of controls.
    fn advance(&mut self, controls: Controls) -> EpisodeStatus;

    /// Fitness accumulated so far in this run.
    fn fitness(&self) -> f32;
}
