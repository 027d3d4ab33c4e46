// benches/propagation.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::Rng;
use scene_graph::prelude::*;
use slotmap::SlotMap;

fn random_pose(rng: &mut impl Rng) -> Pose {
    Pose::new(
        Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
        Quat::from_euler_angles(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)),
        Vec3::new(1.0, 1.0, 1.0),
    )
}

/// Single chain of `depth` nodes; returns the graph and its root
fn build_chain(depth: usize, rng: &mut impl Rng) -> (SceneGraph, TransformInstance) {
    let mut units: SlotMap<UnitId, ()> = SlotMap::with_key();
    let mut graph = SceneGraph::with_config(&SceneGraphConfig {
        initial_capacity: depth,
        ..Default::default()
    });

    let root = graph.create_from_pose(units.insert(()), random_pose(rng));
    let mut tip = root;
    for _ in 1..depth {
        let node = graph.create_from_pose(units.insert(()), random_pose(rng));
        graph.link(node, tip);
        tip = node;
    }
    (graph, root)
}

/// One root with `width` children, each with four leaves
fn build_fan(width: usize, rng: &mut impl Rng) -> (SceneGraph, TransformInstance) {
    let mut units: SlotMap<UnitId, ()> = SlotMap::with_key();
    let mut graph = SceneGraph::new();

    let root = graph.create_from_pose(units.insert(()), random_pose(rng));
    for _ in 0..width {
        let branch = graph.create_from_pose(units.insert(()), random_pose(rng));
        graph.link(branch, root);
        for _ in 0..4 {
            let leaf = graph.create_from_pose(units.insert(()), random_pose(rng));
            graph.link(leaf, branch);
        }
    }
    (graph, root)
}

fn propagation_benchmark_fn(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut group = c.benchmark_group("Propagation");

    let (mut chain, chain_root) = build_chain(1_000, &mut rng);
    group.bench_function("set_local_position_chain_1000", |b| {
        let mut t = 0.0_f32;
        b.iter(|| {
            t += 0.01;
            chain.set_local_position(black_box(chain_root), Vec3::new(t, 0.0, 0.0));
        })
    });

    let (mut fan, fan_root) = build_fan(1_000, &mut rng);
    group.bench_function("set_local_rotation_fan_5000", |b| {
        let mut t = 0.0_f32;
        b.iter(|| {
            t += 0.01;
            fan.set_local_rotation(black_box(fan_root), Quat::from_axis_angle(&Vec3::y_axis(), t));
        })
    });

    group.bench_function("drain_and_clear_fan_5000", |b| {
        let mut units = Vec::with_capacity(fan.num_nodes());
        let mut poses = Vec::with_capacity(fan.num_nodes());
        b.iter(|| {
            fan.set_local_position(fan_root, Vec3::new(0.0, 1.0, 0.0));
            units.clear();
            poses.clear();
            fan.get_changed(&mut units, &mut poses);
            fan.clear_changed();
            black_box(units.len())
        })
    });

    group.finish();
}

criterion_group!(benches, propagation_benchmark_fn);
criterion_main!(benches);
