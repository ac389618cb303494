use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tabletop::{
    Button, Interaction, LayoutPreset, PickCount, Point, Rect, Size, StackId, TableSettings,
    TableShape, TableState, clamp_to_boundary,
    perimeter::{constrain_seat_param, evenly_spaced},
};

fn bounds() -> Rect {
    Rect::new(0.0, 0.0, 1600.0, 1000.0)
}

fn grid_table(decks: usize) -> TableState {
    let settings = TableSettings {
        preset: LayoutPreset::Grid,
        deck_count: decks,
        include_jokers: true,
        ..TableSettings::default()
    };
    TableState::new(settings, bounds())
}

/// Benchmark clamping a spread of points onto each felt shape
fn bench_clamp(c: &mut Criterion) {
    let fp = Size::new(70.0, 98.0);
    let b = bounds();
    let points: Vec<Point> = (0..256)
        .map(|i| Point::new((i * 37 % 2200) as f32 - 300.0, (i * 53 % 1600) as f32 - 300.0))
        .collect();

    let mut group = c.benchmark_group("clamp_to_boundary");
    for shape in [TableShape::Rectangle, TableShape::Oval, TableShape::Circle] {
        group.bench_with_input(BenchmarkId::from_parameter(shape), &shape, |bench, shape| {
            bench.iter(|| {
                points
                    .iter()
                    .map(|p| clamp_to_boundary(*p, Some(&b), *shape, fp))
                    .fold(0.0f32, |acc, p| acc + p.x)
            });
        });
    }
    group.finish();
}

/// Benchmark seat repositioning with a full ring of seats
fn bench_seat_constraint(c: &mut Criterion) {
    let params = evenly_spaced(8);
    c.bench_function("constrain_seat_param_8_seats", |b| {
        b.iter(|| constrain_seat_param(&params, 3, 0.61, 0.02));
    });
}

/// Benchmark building tables of increasing size
fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild_grid");
    for decks in [1, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(decks), &decks, |b, &decks| {
            b.iter(|| grid_table(decks));
        });
    }
    group.finish();
}

/// Benchmark hit testing against a crowded grid
fn bench_hit_test(c: &mut Criterion) {
    let table = grid_table(4);
    c.bench_function("stack_at_216_stacks", |b| {
        b.iter(|| table.stack_at(Point::new(800.0, 500.0)));
    });
}

/// Benchmark the census that runs after every mutation in debug builds
fn bench_census(c: &mut Criterion) {
    let table = grid_table(8);
    c.bench_function("census_432_cards", |b| {
        b.iter(|| table.census().is_ok());
    });
}

/// Benchmark a full pick-up and slide-deal gesture
fn bench_slide_deal(c: &mut Criterion) {
    c.bench_function("slide_deal_20_cards", |b| {
        b.iter_batched(
            || {
                let mut table = TableState::new(TableSettings::default(), bounds());
                let alice = table.add_player("alice");
                let mut ui = Interaction::with_seed(alice, 1);
                ui.pick_up(&mut table, StackId(1), PickCount::Count(20));
                (table, ui)
            },
            |(mut table, mut ui)| {
                let start = Point::new(100.0, 120.0);
                ui.pointer_down(&mut table, start, Button::Secondary, 0.0);
                for i in 1..=40 {
                    let at = start + Point::new(i as f32 * 30.0, (i % 7) as f32 * 10.0);
                    ui.pointer_move(&mut table, at, f64::from(i));
                }
                (table, ui)
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(geometry, bench_clamp, bench_seat_constraint);

criterion_group!(
    table_operations,
    bench_rebuild,
    bench_hit_test,
    bench_census,
    bench_slide_deal,
);

criterion_main!(geometry, table_operations);
