use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{Clock, Trajectory, VehicleFrame};

/// Moves one vehicle along its trajectory in the background, recomputing its position every
/// frame from the current time. Dropping this stops the animation.
pub struct Animation {
    task: JoinHandle<()>,
}

impl Animation {
    /// Must be called from within a tokio runtime. `on_frame` is only called when the vehicle has
    /// a position; before its first stop, nothing happens.
    pub fn start<C, F>(
        trajectory: Trajectory,
        clock: C,
        frame_interval: Duration,
        mut on_frame: F,
    ) -> Self
    where
        C: Clock + 'static,
        F: FnMut(VehicleFrame) + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(frame_interval);
            // If a frame runs late, don't try to catch up
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let now = clock.now_minutes();
                if let Some(frame) = trajectory.interpolate(now) {
                    on_frame(frame);
                }
            }
        });
        Self { task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// No more frames are delivered after this returns.
    pub async fn stop(mut self) {
        self.task.abort();
        // Waiting observes the cancellation, so on_frame isn't running anymore
        let _ = (&mut self.task).await;
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        self.task.abort();
    }
}
