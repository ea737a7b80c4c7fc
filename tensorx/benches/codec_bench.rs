use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use half::f16;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tensorx::{PixelBuffer, decode, encode, write_header};

const SIZES: [(u32, u32); 3] = [(64, 64), (512, 512), (1024, 768)];

fn random_pixels(width: u32, height: u32) -> PixelBuffer {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut data = vec![0u8; width as usize * height as usize * 3];
    rng.fill(data.as_mut_slice());
    PixelBuffer::new(width, height, data).expect("sized buffer")
}

fn random_latent(width: u32, height: u32) -> Vec<u8> {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut buf = write_header(height, width, 4).to_vec();
    for _ in 0..width as usize * height as usize * 4 {
        let v: f32 = rng.gen_range(-3.0..3.0);
        buf.extend_from_slice(&f16::from_f32(v).to_le_bytes());
    }
    buf
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_rgb");
    for (w, h) in SIZES {
        let pixels = random_pixels(w, h);
        group.throughput(Throughput::Bytes(pixels.as_bytes().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &pixels, |b, p| {
            b.iter(|| encode(black_box(p)))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (w, h) in SIZES {
        let rgb = encode(&random_pixels(w, h));
        group.throughput(Throughput::Elements(u64::from(w) * u64::from(h)));
        group.bench_with_input(BenchmarkId::new("rgb", format!("{w}x{h}")), &rgb, |b, buf| {
            b.iter(|| decode(black_box(buf)).expect("valid tensor"))
        });

        let latent = random_latent(w / 8, h / 8);
        group.bench_with_input(
            BenchmarkId::new("latent", format!("{}x{}", w / 8, h / 8)),
            &latent,
            |b, buf| b.iter(|| decode(black_box(buf)).expect("valid tensor")),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
