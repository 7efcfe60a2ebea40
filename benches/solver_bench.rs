//! Benchmarks for the profile kernel

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use profile_fea::prelude::*;

fn section() -> Section {
    Section::new(SectionParams::hollow_rect(0.06, 0.03, 0.003, 0.003)).unwrap()
}

fn cantilever(elements: usize) -> (Vec<Node>, Vec<BeamElement>, Vec<Support>) {
    let length = 2.0;
    let nodes = (0..=elements)
        .map(|k| Node::new(length * k as f64 / elements as f64, 0.0))
        .collect();
    let beams = (0..elements)
        .map(|k| BeamElement::new(k, k + 1, Material::aluminum(), section()))
        .collect();
    (nodes, beams, Support::fixed(0))
}

fn spd_matrix(n: usize) -> Matrix {
    let mut a = Matrix::identity(n).scale(n as f64);
    for i in 0..n {
        for j in 0..n {
            a.add_to(i, j, 1.0 / (1.0 + (i as f64 - j as f64).abs()));
        }
    }
    a
}

fn benchmark_cholesky_solve(c: &mut Criterion) {
    let a = spd_matrix(60);
    let b = vec![1.0; 60];
    c.bench_function("cholesky_solve_60", |bench| {
        bench.iter(|| black_box(a.solve(black_box(&b))))
    });
}

fn benchmark_return_mapping(c: &mut Criterion) {
    let material = Material::aluminum();
    c.bench_function("return_mapping_cycle", |bench| {
        bench.iter(|| {
            let mut point = ChabochePlasticity::new(&material);
            for step in 0..40 {
                let strain = 0.01 * (step as f64 * 0.3).sin();
                black_box(point.update(strain, 200.0));
            }
        })
    });
}

fn benchmark_internal_forces(c: &mut Criterion) {
    let (mut nodes, mut beams, _) = cantilever(1);
    nodes[1].set_displacement(0.001, 0.02, 0.015);
    c.bench_function("beam_internal_forces", |bench| {
        bench.iter(|| {
            beams[0].reset();
            black_box(beams[0].update_internal_forces(&nodes, 20.0).unwrap())
        })
    });
}

fn benchmark_buckling(c: &mut Criterion) {
    let (nodes, beams, supports) = cantilever(10);
    let options = BucklingOptions::default().with_seed(1);
    c.bench_function("buckling_cantilever_10", |bench| {
        bench.iter(|| {
            let analysis = StabilityAnalysis::new(&beams, &nodes, &supports);
            black_box(analysis.linear_buckling(&options).unwrap())
        })
    });
}

fn benchmark_modal(c: &mut Criterion) {
    let (nodes, beams, supports) = cantilever(10);
    let options = ModalOptions::modes(5).with_seed(1);
    c.bench_function("modal_cantilever_10_5modes", |bench| {
        bench.iter(|| {
            let analysis = DynamicAnalysis::new(&beams, &nodes, &supports);
            black_box(analysis.modal_analysis(&options).unwrap())
        })
    });
}

criterion_group!(
    benches,
    benchmark_cholesky_solve,
    benchmark_return_mapping,
    benchmark_internal_forces,
    benchmark_buckling,
    benchmark_modal,
);

criterion_main!(benches);
