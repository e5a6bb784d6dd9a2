//! Headless ring track used to evaluate driving networks.
//!
//! The car drives around an annulus between two circles centred on the
//! origin. Three rays (45° right, straight ahead, 45° left) measure the
//! distance to the nearest wall. Leaving the annulus ends the run.

use serde::{Deserialize, Serialize};

use super::episode::{Episode, EpisodeStatus};
use crate::evolution::network::Controls;

/// Number of distance sensors, and so the required network input width.
pub const SENSOR_COUNT: usize = 3;

/// Ray directions relative to the heading, in radians.
const SENSOR_ANGLES: [f32; SENSOR_COUNT] = [
    -std::f32::consts::FRAC_PI_4,
    0.0,
    std::f32::consts::FRAC_PI_4,
];

/// Geometry, motion and scoring of the ring track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackParams {
    /// Radius of the inner wall.
    pub inner_radius: f32,
    /// Radius of the outer wall.
    pub outer_radius: f32,
    /// Ray distances are divided by this before being sensed.
    pub sensor_scale: f32,
    /// Distance covered per step at full throttle.
    pub max_step_distance: f32,
    /// Heading change per step at full steering, in degrees.
    pub max_turn_degrees: f32,
    /// Simulated seconds per step.
    pub dt: f32,
    /// Fitness weight of distance travelled.
    pub distance_multiplier: f32,
    /// Fitness weight of average speed.
    pub avg_speed_multiplier: f32,
    /// Fitness weight of mean sensor reading.
    pub sensor_multiplier: f32,
    /// Seconds after which a car below `min_fitness` is stopped.
    pub grace_period: f32,
    /// Fitness a car must reach within `grace_period`.
    pub min_fitness: f32,
    /// Fitness at which a run counts as solved.
    pub target_fitness: f32,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            inner_radius: 40.0,
            outer_radius: 60.0,
            sensor_scale: 20.0,
            max_step_distance: 11.4 * 0.02,
            max_turn_degrees: 90.0 * 0.1,
            dt: 0.02,
            distance_multiplier: 1.4,
            avg_speed_multiplier: 0.1,
            sensor_multiplier: 0.1,
            grace_period: 20.0,
            min_fitness: 40.0,
            target_fitness: 1500.0,
        }
    }
}

impl TrackParams {
    /// Checks the track is drivable.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.inner_radius >= 0.0 && self.outer_radius > self.inner_radius) {
            return Err(format!(
                "outer_radius ({}) must exceed a non-negative inner_radius ({})",
                self.outer_radius, self.inner_radius
            ));
        }
        if self.sensor_scale <= 0.0 || self.dt <= 0.0 {
            return Err("sensor_scale and dt must be positive".into());
        }
        Ok(())
    }

    fn start_radius(&self) -> f32 {
        (self.inner_radius + self.outer_radius) / 2.0
    }
}

/// One car on the ring track.
#[derive(Debug, Clone)]
pub struct RingTrack {
    params: TrackParams,
    x: f32,
    y: f32,
    heading: f32,
    time: f32,
    distance: f32,
    sensors: [f32; SENSOR_COUNT],
    fitness: f32,
}

impl RingTrack {
    /// Creates a track with the car at its starting pose.
    pub fn new(params: TrackParams) -> Self {
        let mut track = Self {
            params,
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            time: 0.0,
            distance: 0.0,
            sensors: [0.0; SENSOR_COUNT],
            fitness: 0.0,
        };
        track.reset();
        track
    }

    /// Track settings.
    pub fn params(&self) -> &TrackParams {
        &self.params
    }

    /// Total distance driven in this run.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Simulated seconds elapsed in this run.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// True when the car has left the annulus.
    pub fn crashed(&self) -> bool {
        let r = self.x.hypot(self.y);
        r <= self.params.inner_radius || r >= self.params.outer_radius
    }

    fn cast_sensors(&self) -> [f32; SENSOR_COUNT] {
        SENSOR_ANGLES.map(|offset| {
            let angle = self.heading + offset;
            let (dy, dx) = angle.sin_cos();
            let hit = [self.params.inner_radius, self.params.outer_radius]
                .into_iter()
                .filter_map(|radius| ray_circle(self.x, self.y, dx, dy, radius))
                .reduce(f32::min);
            hit.unwrap_or(0.0) / self.params.sensor_scale
        })
    }
}

impl Episode for RingTrack {
    /// Places the car midway between the walls, heading counter-clockwise.
    fn reset(&mut self) {
        self.x = self.params.start_radius();
        self.y = 0.0;
        self.heading = std::f32::consts::FRAC_PI_2;
        self.time = 0.0;
        self.distance = 0.0;
        self.fitness = 0.0;
        self.sensors = self.cast_sensors();
    }

    fn sense(&self) -> Vec<f32> {
        self.sensors.to_vec()
    }

    /// The sensor term of the fitness scores the readings the controls were
    /// derived from, not the ones taken after the move.
    fn advance(&mut self, controls: Controls) -> EpisodeStatus {
        let sensed = self.sensors;
        let step = controls.speed * self.params.max_step_distance;
        let (sin, cos) = self.heading.sin_cos();
        self.x += cos * step;
        self.y += sin * step;
        // Positive turning steers right, which is clockwise.
        self.heading -= (controls.turning * self.params.max_turn_degrees).to_radians();

        self.time += self.params.dt;
        self.distance += step.abs();
        self.sensors = self.cast_sensors();

        let avg_speed = self.distance / self.time;
        let mean_sensor = sensed.iter().sum::<f32>() / SENSOR_COUNT as f32;
        self.fitness = self.distance * self.params.distance_multiplier
            + avg_speed * self.params.avg_speed_multiplier
            + mean_sensor * self.params.sensor_multiplier;

        let stalled =
            self.time > self.params.grace_period && self.fitness < self.params.min_fitness;
        if self.crashed() || stalled || self.fitness >= self.params.target_fitness {
            EpisodeStatus::Finished
        } else {
            EpisodeStatus::Running
        }
    }

    fn fitness(&self) -> f32 {
        self.fitness
    }
}

/// Distance along a unit ray from (px, py) to a circle of `radius` at the origin.
fn ray_circle(px: f32, py: f32, dx: f32, dy: f32, radius: f32) -> Option<f32> {
    let b = px * dx + py * dy;
    let c = px * px + py * py - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    [-b - root, -b + root].into_iter().find(|&t| t > f32::EPSILON)
}
