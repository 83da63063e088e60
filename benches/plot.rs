//! Run these benches with `cargo bench --bench plot -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use sonde_profiles::{render_variable, PlotConfig, Variable};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(plot_benches);

criterion_group!(
    name = plot_benches;
    config = build_tester();
    targets = render_bench, svg_bench
);

fn render_bench(c: &mut Criterion) {
    let obs = utils::site_year(&utils::synthetic_survey(), "S03", 2015);
    let config = PlotConfig::new((0.0, 10.0)).with_title("S03 2015");

    c.bench_function("render_variable", |b| {
        b.iter(|| {
            for &var in &[Variable::Temperature, Variable::DissolvedOxygen] {
                let _x = render_variable(&obs, var, &config);
            }
        });
    });
}

fn svg_bench(c: &mut Criterion) {
    let obs = utils::site_year(&utils::synthetic_survey(), "S03", 2015);
    let config = PlotConfig::new((0.0, 10.0)).with_title("S03 2015");
    let plot = render_variable(&obs, Variable::Temperature, &config);

    c.bench_function("to_svg", |b| {
        b.iter(|| {
            let _x = plot.to_svg(800, 600).expect("oops");
        });
    });
}
