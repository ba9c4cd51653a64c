//! Scene ownership and the run/restart state machine
//!
//! The controller owns the ball, platforms and particles and is the only
//! thing that mutates them. The host drives it from its frame callback with
//! [`SimulationController::frame`], passing a monotonic timestamp in
//! milliseconds. Deferred work (auto-start, the pause inside a restart) is
//! stored as a [`Deferred`] tagged with the scene generation that armed it;
//! [`SimulationController::reset`] bumps the generation, so nothing armed for
//! an earlier scene can fire into a rebuilt one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::ball::Ball;
use super::effects::{Effects, SimEvent};
use super::particle::Particle;
use super::platform::Platform;
use super::weight::WeightCategory;
use crate::consts::*;
use crate::error::SimError;

/// Tunables the host may override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Gap between stopping and restarting on restart/weight change
    pub restart_delay_ms: f64,
    /// Start on its own this long after boot (None = wait for the player)
    pub auto_start_delay_ms: Option<f64>,
    /// Live particle cap; the oldest particle is evicted beyond it
    pub max_particles: usize,
    /// Spray fragments when a heavy ball breaks a platform
    pub break_debris: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: RESTART_DELAY_MS,
            auto_start_delay_ms: Some(AUTO_START_DELAY_MS),
            max_particles: MAX_PARTICLES,
            break_debris: false,
        }
    }
}

/// Whether the tick loop is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerPhase {
    /// Scene built, waiting
    Idle,
    /// Ticking every frame
    Running,
}

/// Steps of a restart. `Stopping` runs immediately; the next stage waits
/// out the restart delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartStage {
    Stopping,
    Rebuilding,
    Starting,
}

/// Work to do when a [`Deferred`] comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Continuation {
    /// Start the first run if the player hasn't already
    AutoStart,
    /// Resume a restart at `stage`
    Restart { stage: RestartStage, rebuild: bool },
}

/// A cancellable timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deferred {
    pub generation: u64,
    pub due_ms: f64,
    pub continuation: Continuation,
}

/// Owns the scene and funnels every mutation through its operations
#[derive(Debug, Clone)]
pub struct SimulationController {
    arena: Arena,
    config: SimConfig,
    weight: WeightCategory,
    phase: ControllerPhase,
    /// Bumped by every reset; deferred work from older generations is dropped
    generation: u64,
    ball: Ball,
    platforms: Vec<Platform>,
    particles: Vec<Particle>,
    step_count: u64,
    /// Generation of the pending frame tick, if one is scheduled
    scheduled_tick: Option<u64>,
    deferred: Option<Deferred>,
    rng: Pcg32,
    /// Events from the most recent tick
    events: Vec<SimEvent>,
}

impl SimulationController {
    /// Create a controller with a freshly built, idle scene
    pub fn new(arena: Arena, weight: WeightCategory, config: SimConfig, seed: u64) -> Self {
        let mut controller = Self {
            arena,
            config,
            weight,
            phase: ControllerPhase::Idle,
            generation: 0,
            ball: Ball::new(Vec2::ZERO, BALL_RADIUS, weight),
            platforms: Vec::with_capacity(PLATFORM_ROWS.len()),
            particles: Vec::new(),
            step_count: 0,
            scheduled_tick: None,
            deferred: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        controller.build_scene(weight);
        controller
    }

    /// Create a controller for a canvas of the given size
    pub fn for_canvas(
        width: f32,
        height: f32,
        weight: WeightCategory,
        config: SimConfig,
        seed: u64,
    ) -> Result<Self, SimError> {
        let arena = Arena::new(width, height)?;
        Ok(Self::new(arena, weight, config, seed))
    }

    /// Arm the auto-start timer, if configured. Call once after the host
    /// has shown the first frame.
    pub fn boot(&mut self, now_ms: f64) {
        if let Some(delay) = self.config.auto_start_delay_ms {
            log::info!("Auto-start in {} ms", delay);
            self.deferred = Some(Deferred {
                generation: self.generation,
                due_ms: now_ms + delay,
                continuation: Continuation::AutoStart,
            });
        }
    }

    /// Replace the scene: one ball at the top centre, two full-width
    /// platforms, no particles. Always leaves the controller idle.
    pub fn build_scene(&mut self, weight: WeightCategory) {
        self.weight = weight;
        self.ball = Ball::new(
            Vec2::new(self.arena.width * 0.5, BALL_START_Y),
            BALL_RADIUS,
            weight,
        );
        self.platforms.clear();
        for row in PLATFORM_ROWS {
            self.platforms
                .push(Platform::new(0.0, row, self.arena.width, PLATFORM_HEIGHT));
        }
        self.particles.clear();
        self.events.clear();
        self.step_count = 0;
        self.phase = ControllerPhase::Idle;
        self.scheduled_tick = None;
        log::info!("Scene built ({} ball)", weight);
    }

    /// Begin the run. No-op if already running.
    pub fn start(&mut self) {
        if self.phase == ControllerPhase::Running {
            return;
        }
        for platform in &mut self.platforms {
            platform.broken = false;
        }
        self.ball.vel = Vec2::new(0.0, BALL_START_VY);
        self.phase = ControllerPhase::Running;
        self.scheduled_tick = Some(self.generation);
        log::info!("Run started ({} ball)", self.weight);
    }

    /// Stop, cancel everything pending and rebuild the scene
    pub fn reset(&mut self) {
        self.generation += 1;
        self.scheduled_tick = None;
        self.deferred = None;
        self.build_scene(self.weight);
    }

    /// Advance one tick. No-op unless running.
    pub fn tick(&mut self) {
        if self.phase != ControllerPhase::Running {
            return;
        }
        self.events.clear();

        {
            let mut fx = Effects {
                particles: &mut self.particles,
                rng: &mut self.rng,
                events: &mut self.events,
                max_particles: self.config.max_particles,
                break_debris: self.config.break_debris,
            };
            self.ball.step(&self.arena, &mut self.platforms, &mut fx);
        }

        for particle in &mut self.particles {
            particle.step(&self.arena);
        }
        self.particles.retain(|p| !p.is_dead());

        self.step_count += 1;
        self.scheduled_tick = Some(self.generation);
    }

    /// Start button: stop now, start again after the restart delay
    pub fn restart(&mut self, now_ms: f64) {
        self.run_restart(RestartStage::Stopping, false, now_ms);
    }

    /// Pick a new weight. A running (or restarting) scene is stopped and
    /// restarted with the new ball after the restart delay; an idle scene is
    /// rebuilt on the spot.
    pub fn set_weight(&mut self, weight: WeightCategory, now_ms: f64) {
        self.weight = weight;
        if self.phase == ControllerPhase::Running || self.pending_restart().is_some() {
            self.run_restart(RestartStage::Stopping, true, now_ms);
        } else {
            self.build_scene(weight);
        }
    }

    /// Host frame callback: fire due timers, then run the scheduled tick
    pub fn frame(&mut self, now_ms: f64) {
        self.poll(now_ms);
        if let Some(generation) = self.scheduled_tick.take() {
            if generation == self.generation {
                self.tick();
            }
        }
    }

    /// Fire the deferred continuation if it is due and still current
    pub fn poll(&mut self, now_ms: f64) {
        let Some(deferred) = self.deferred.take() else {
            return;
        };
        if deferred.generation != self.generation {
            log::debug!(
                "Dropping stale {:?} from generation {}",
                deferred.continuation,
                deferred.generation
            );
            return;
        }
        if now_ms < deferred.due_ms {
            self.deferred = Some(deferred);
            return;
        }

        match deferred.continuation {
            Continuation::AutoStart => {
                if self.phase == ControllerPhase::Idle {
                    log::info!("Auto-starting");
                    self.start();
                }
            }
            Continuation::Restart { stage, rebuild } => {
                self.run_restart(stage, rebuild, now_ms);
            }
        }
    }

    fn run_restart(&mut self, mut stage: RestartStage, rebuild: bool, now_ms: f64) {
        loop {
            match stage {
                RestartStage::Stopping => {
                    self.reset();
                    let next = if rebuild {
                        RestartStage::Rebuilding
                    } else {
                        RestartStage::Starting
                    };
                    self.deferred = Some(Deferred {
                        generation: self.generation,
                        due_ms: now_ms + self.config.restart_delay_ms,
                        continuation: Continuation::Restart {
                            stage: next,
                            rebuild,
                        },
                    });
                    log::info!("Restart armed (generation {})", self.generation);
                    return;
                }
                RestartStage::Rebuilding => {
                    self.build_scene(self.weight);
                    stage = RestartStage::Starting;
                }
                RestartStage::Starting => {
                    self.start();
                    return;
                }
            }
        }
    }

    /// Stage a pending restart will resume at, if any
    pub fn pending_restart(&self) -> Option<RestartStage> {
        match self.deferred {
            Some(Deferred {
                continuation: Continuation::Restart { stage, .. },
                generation,
                ..
            }) if generation == self.generation => Some(stage),
            _ => None,
        }
    }

    pub fn deferred(&self) -> Option<&Deferred> {
        self.deferred.as_ref()
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == ControllerPhase::Running
    }

    pub fn weight(&self) -> WeightCategory {
        self.weight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Events recorded by the most recent tick
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PlatformResponse;
    use proptest::prelude::*;

    fn controller(weight: WeightCategory) -> SimulationController {
        let arena = Arena::new(800.0, 600.0).unwrap();
        SimulationController::new(arena, weight, SimConfig::default(), 12345)
    }

    fn assert_fresh_scene(c: &SimulationController) {
        assert_eq!(c.phase(), ControllerPhase::Idle);
        assert_eq!(c.platforms().len(), 2);
        assert!(c.platforms().iter().all(|p| !p.broken));
        assert!(c.particles().is_empty());
        assert_eq!(c.ball().pos, Vec2::new(400.0, BALL_START_Y));
        assert_eq!(c.ball().vel, Vec2::ZERO);
        assert_eq!(c.step_count(), 0);
    }

    #[test]
    fn test_new_scene_layout() {
        let c = controller(WeightCategory::Heavy);
        assert_fresh_scene(&c);
        assert_eq!(c.ball().radius(), BALL_RADIUS);
        assert_eq!(c.ball().weight(), WeightCategory::Heavy);
        assert_eq!(c.platforms()[0].y, 200.0);
        assert_eq!(c.platforms()[1].y, 400.0);
        assert_eq!(c.platforms()[0].width, 800.0);
        assert_eq!(c.platforms()[0].height, PLATFORM_HEIGHT);
    }

    #[test]
    fn test_for_canvas_rejects_bad_size() {
        let result = SimulationController::for_canvas(
            0.0,
            600.0,
            WeightCategory::Light,
            SimConfig::default(),
            1,
        );
        assert!(matches!(result, Err(SimError::InvalidArena { .. })));
    }

    #[test]
    fn test_tick_is_noop_while_idle() {
        let mut c = controller(WeightCategory::Light);
        c.tick();
        c.frame(16.0);
        assert_fresh_scene(&c);
    }

    #[test]
    fn test_start_nudges_ball_and_runs() {
        let mut c = controller(WeightCategory::Light);
        c.start();
        assert!(c.is_running());
        assert_eq!(c.ball().vel, Vec2::new(0.0, BALL_START_VY));

        c.frame(16.0);
        assert_eq!(c.step_count(), 1);
        c.frame(32.0);
        assert_eq!(c.step_count(), 2);

        // Second start is ignored
        let vel = c.ball().vel;
        c.start();
        assert_eq!(c.ball().vel, vel);
    }

    #[test]
    fn test_reset_cancels_scheduled_tick() {
        let mut c = controller(WeightCategory::Medium);
        c.start();
        c.frame(16.0);
        c.reset();
        assert_fresh_scene(&c);
        c.frame(32.0);
        assert_eq!(c.step_count(), 0);
    }

    #[test]
    fn test_auto_start_fires_once_due() {
        let mut c = controller(WeightCategory::Light);
        c.boot(0.0);
        c.frame(1999.0);
        assert_eq!(c.phase(), ControllerPhase::Idle);
        c.frame(2000.0);
        assert!(c.is_running());
        assert!(c.deferred().is_none());
    }

    #[test]
    fn test_idle_weight_change_keeps_auto_start() {
        let mut c = controller(WeightCategory::Light);
        c.boot(0.0);
        c.set_weight(WeightCategory::Heavy, 500.0);
        assert_eq!(c.ball().weight(), WeightCategory::Heavy);
        assert_eq!(c.phase(), ControllerPhase::Idle);
        c.frame(2000.0);
        assert!(c.is_running());
        assert_eq!(c.ball().weight(), WeightCategory::Heavy);
    }

    #[test]
    fn test_reset_cancels_auto_start() {
        let mut c = controller(WeightCategory::Light);
        c.boot(0.0);
        c.reset();
        c.frame(5000.0);
        assert_eq!(c.phase(), ControllerPhase::Idle);
    }

    #[test]
    fn test_restart_sequence_without_rebuild() {
        let mut c = controller(WeightCategory::Light);
        c.start();
        for i in 0..30 {
            c.frame(i as f64 * 16.0);
        }
        c.restart(1000.0);
        assert_fresh_scene(&c);
        assert_eq!(c.pending_restart(), Some(RestartStage::Starting));

        c.frame(1050.0);
        assert_eq!(c.phase(), ControllerPhase::Idle);
        c.frame(1100.0);
        assert!(c.is_running());
        assert_eq!(c.pending_restart(), None);
        // The frame that fires the restart also runs the first tick
        assert_eq!(c.step_count(), 1);
    }

    #[test]
    fn test_running_weight_change_rebuilds_after_delay() {
        let mut c = controller(WeightCategory::Light);
        c.start();
        c.frame(0.0);
        c.set_weight(WeightCategory::Heavy, 100.0);
        assert_eq!(c.phase(), ControllerPhase::Idle);
        assert_eq!(c.pending_restart(), Some(RestartStage::Rebuilding));
        assert_eq!(c.ball().weight(), WeightCategory::Heavy);

        c.frame(150.0);
        assert_eq!(c.phase(), ControllerPhase::Idle);
        c.frame(200.0);
        assert!(c.is_running());
        assert_eq!(c.ball().weight(), WeightCategory::Heavy);
    }

    #[test]
    fn test_rapid_weight_changes_use_latest_weight() {
        let mut c = controller(WeightCategory::Light);
        c.start();
        c.set_weight(WeightCategory::Medium, 0.0);
        let first_generation = c.generation();
        c.set_weight(WeightCategory::Heavy, 40.0);
        assert!(c.generation() > first_generation);

        // The first change's timer would have been due at 100ms
        c.frame(100.0);
        assert_eq!(c.phase(), ControllerPhase::Idle);
        c.frame(140.0);
        assert!(c.is_running());
        assert_eq!(c.ball().weight(), WeightCategory::Heavy);
    }

    #[test]
    fn test_medium_stops_on_first_platform() {
        let mut c = controller(WeightCategory::Medium);
        c.start();
        let mut stopped = false;
        for _ in 0..200 {
            c.tick();
            if c.events().iter().any(|e| {
                matches!(
                    e,
                    SimEvent::PlatformHit {
                        response: PlatformResponse::Stopped,
                        ..
                    }
                )
            }) {
                assert_eq!(c.ball().vel, Vec2::ZERO);
                stopped = true;
            }
        }
        assert!(stopped);
        assert_eq!(c.ball().pos.y, 200.0 - BALL_RADIUS);
        assert!(c.platforms().iter().all(|p| !p.broken));
    }

    #[test]
    fn test_heavy_breaks_both_platforms_and_stops_on_floor() {
        let mut c = controller(WeightCategory::Heavy);
        c.start();
        for _ in 0..400 {
            c.tick();
        }
        assert!(c.platforms().iter().all(|p| p.broken));
        assert_eq!(c.ball().vel, Vec2::ZERO);
        assert_eq!(c.ball().pos.y, c.arena().floor_y() - BALL_RADIUS);
    }

    #[test]
    fn test_dead_particles_pruned_each_tick() {
        let arena = Arena::new(800.0, 600.0).unwrap();
        let config = SimConfig {
            break_debris: true,
            ..SimConfig::default()
        };
        let mut c = SimulationController::new(arena, WeightCategory::Heavy, config, 12345);
        c.start();

        let mut peak = 0;
        let mut pruned_ticks = 0;
        for _ in 0..600 {
            let before = c.particles().len();
            c.tick();
            assert!(c.particles().iter().all(|p| !p.is_dead()));

            // particles only appear on ticks that hit something
            let spawned = c.events().iter().any(|e| {
                matches!(
                    e,
                    SimEvent::FloorImpact { .. }
                        | SimEvent::PlatformHit {
                            response: PlatformResponse::Broke,
                            ..
                        }
                )
            });
            if !spawned {
                assert!(c.particles().len() <= before);
                if c.particles().len() < before {
                    pruned_ticks += 1;
                }
            }
            peak = peak.max(c.particles().len());
        }

        assert!(peak > 0);
        assert!(pruned_ticks > 0);
        assert!(c.particles().is_empty());
    }

    #[test]
    fn test_determinism() {
        let arena = Arena::new(640.0, 480.0).unwrap();
        let config = SimConfig {
            break_debris: true,
            ..SimConfig::default()
        };
        let mut a = SimulationController::new(arena, WeightCategory::Heavy, config.clone(), 99999);
        let mut b = SimulationController::new(arena, WeightCategory::Heavy, config, 99999);
        a.start();
        b.start();
        for _ in 0..300 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.ball().pos, b.ball().pos);
        assert_eq!(a.particles().len(), b.particles().len());
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.pos, pb.pos);
            assert_eq!(pa.life, pb.life);
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start,
        Tick,
        Reset,
        Restart,
        SetWeight(WeightCategory),
        Frame(f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Start),
            Just(Op::Tick),
            Just(Op::Reset),
            Just(Op::Restart),
            prop_oneof![
                Just(WeightCategory::Light),
                Just(WeightCategory::Medium),
                Just(WeightCategory::Heavy),
            ]
            .prop_map(Op::SetWeight),
            (0.0f64..250.0).prop_map(Op::Frame),
        ]
    }

    proptest! {
        #[test]
        fn prop_reset_always_yields_fresh_idle_scene(ops in prop::collection::vec(op(), 0..120)) {
            let mut c = controller(WeightCategory::Light);
            let mut now = 0.0;
            for op in ops {
                match op {
                    Op::Start => c.start(),
                    Op::Tick => c.tick(),
                    Op::Reset => c.reset(),
                    Op::Restart => c.restart(now),
                    Op::SetWeight(w) => c.set_weight(w, now),
                    Op::Frame(dt) => {
                        now += dt;
                        c.frame(now);
                    }
                }
            }
            c.reset();
            prop_assert_eq!(c.phase(), ControllerPhase::Idle);
            prop_assert_eq!(c.platforms().len(), 2);
            prop_assert!(c.platforms().iter().all(|p| !p.broken));
            prop_assert!(c.particles().is_empty());
            prop_assert!(c.deferred().is_none());

            // Nothing left over may restart the rebuilt scene
            c.frame(now + 10_000.0);
            prop_assert_eq!(c.phase(), ControllerPhase::Idle);
        }
    }
}
