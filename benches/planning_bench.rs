//! Benchmarks for the three planning passes a caller typically chains: cut
//! ordering, Eulerian fill construction, and raster-scan plotting.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use plotplan_core::cutplan::optimize_travel;
use plotplan_core::fill::get_fill;
use plotplan_core::geometry::{Point, Subpath};
use plotplan_core::raster::{PixelSource, RasterPlotter, TraversalFlags, LEFT, TOP, X_AXIS};

fn square(x: f64, y: f64, side: f64) -> Subpath {
    Subpath::from_points(
        &[
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ],
        true,
    )
}

fn scattered_squares(n: usize) -> Vec<Subpath> {
    (0..n)
        .map(|i| square((i * 17 % 200) as f64, (i * 31 % 200) as f64, 5.0))
        .collect()
}

fn bench_optimize_travel(c: &mut Criterion) {
    let paths = scattered_squares(30);
    c.bench_function("optimize_travel_30_squares", |b| {
        b.iter(|| optimize_travel(black_box(&paths)))
    });
}

fn bench_get_fill(c: &mut Criterion) {
    let outline = square(0.0, 0.0, 100.0);
    c.bench_function("get_fill_100x100_pitch_1", |b| {
        b.iter(|| get_fill(black_box(&outline), 1.0))
    });
}

struct CheckerGrid {
    width: usize,
    height: usize,
}

impl PixelSource for CheckerGrid {
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn get(&self, x: usize, y: usize) -> u32 {
        if (x / 8 + y / 8) % 2 == 0 {
            1
        } else {
            0
        }
    }
}

fn bench_raster_plot(c: &mut Criterion) {
    let grid = CheckerGrid { width: 256, height: 256 };
    c.bench_function("raster_plot_256x256_checker", |b| {
        b.iter(|| {
            let mut plotter = RasterPlotter::new(
                black_box(&grid),
                TraversalFlags::new(X_AXIS | TOP | LEFT),
                0,
                0.0,
                0,
                0,
                1.0,
                None,
                None,
            );
            plotter.plot().count()
        })
    });
}

criterion_group!(benches, bench_optimize_travel, bench_get_fill, bench_raster_plot);
criterion_main!(benches);
