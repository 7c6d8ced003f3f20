use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use image::Rgb;
use story_core::{cover_fit, crossfade};
use story_ui::Bitmap;

fn gradient(w: u32, h: u32) -> Bitmap {
    Bitmap::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]))
}

fn bench_cover_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    group.sample_size(10);

    let source = gradient(1920, 1080);
    group.bench_function("cover_fit 1920x1080 -> 1040x720", |b| {
        b.iter(|| cover_fit(&source, 1040, 720));
    });

    let prev = gradient(1040, 720);
    let target = cover_fit(&source, 1040, 720);
    group.bench_function("crossfade 1040x720", |b| {
        b.iter_batched(
            || 0.5f32,
            |t| crossfade(&prev, &target, t),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_cover_fit);
criterion_main!(benches);
