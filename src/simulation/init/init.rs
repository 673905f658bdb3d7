use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::domain::config::GlobeConfig;
use crate::domain::state::SimulationState;
use crate::rigid_body::PhysicsBackend;
use crate::systems::scene::build_scene;

use super::perf_stats::FrameStats;
use super::GlobeCore;

pub(super) fn create_globe_core<B: PhysicsBackend>(config: GlobeConfig, mut backend: B, seed: u64) -> GlobeCore<B> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let scene = build_scene(&mut backend, &config, &mut rng);
    log::debug!("globe core ready (seed {:#x}, {} bodies)", seed, backend.body_count());

    GlobeCore {
        config,
        backend,
        scene,
        state: SimulationState::new(),
        perf_enabled: false,
        stats: FrameStats::default(),
    }
}
