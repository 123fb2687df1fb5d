//! Benchmark for the simulation tick.
//!
//! Run with: cargo bench --package stranded --bench simulation_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stranded::gameplay::{enemy, spawning};
use stranded::input::{MoveKeys, PlayerCommand};
use stranded::shared::Vec3;
use stranded::{InputSnapshot, MemoryAssets, SimConfig, Simulation};

const DT: f32 = 1.0 / 60.0;

fn simulation() -> Simulation {
    Simulation::new(SimConfig::default(), &mut MemoryAssets::standard())
        .unwrap_or_else(|err| panic!("simulation setup failed: {err}"))
}

fn benchmark_startup(c: &mut Criterion) {
    let mut group = c.benchmark_group("startup");
    group.sample_size(10);
    group.bench_function("generate_and_populate", |b| {
        b.iter(|| black_box(simulation()));
    });
    group.finish();
}

fn benchmark_idle_tick(c: &mut Criterion) {
    let mut sim = simulation();
    let idle = InputSnapshot::idle();

    c.bench_function("tick_idle", |b| {
        b.iter(|| black_box(sim.tick(black_box(DT), &idle)));
    });
}

fn benchmark_busy_tick(c: &mut Criterion) {
    let mut sim = simulation();
    let running = InputSnapshot::idle()
        .with_keys(MoveKeys {
            forward: true,
            run: true,
            ..MoveKeys::default()
        })
        .with_interact(true)
        .with_command(PlayerCommand::Attack);

    c.bench_function("tick_running_and_attacking", |b| {
        b.iter(|| black_box(sim.tick(black_box(DT), &running)));
    });
}

fn benchmark_enemy_controller(c: &mut Criterion) {
    let mut sim = simulation();
    let world = sim.world_mut();
    for i in 0..60u16 {
        let angle = f32::from(i) * 0.1;
        let at = Vec3::new(angle.cos() * 30.0, 10.0, angle.sin() * 30.0);
        spawning::spawn_enemy(world, usize::from(i % 4), at);
    }

    c.bench_function("update_enemies_65", |b| {
        b.iter(|| enemy::update_enemies(world, black_box(DT)));
    });
}

criterion_group!(
    benches,
    benchmark_startup,
    benchmark_idle_tick,
    benchmark_busy_tick,
    benchmark_enemy_controller,
);
criterion_main!(benches);
