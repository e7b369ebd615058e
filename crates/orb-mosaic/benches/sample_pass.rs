use criterion::{Criterion, black_box, criterion_group, criterion_main};
use orb_core::config::Params;
use orb_core::draw::{CanvasSize, DrawCommand};
use orb_core::frame::FrameBuffer;
use orb_mosaic::compose::compose_frame;
use orb_mosaic::sampler::SamplePass;

/// Frame de test : dégradé de teintes sur 320×240.
fn gradient_frame() -> FrameBuffer {
    let mut frame = FrameBuffer::new(320, 240);
    for y in 0..240u32 {
        for x in 0..320u32 {
            let (r, g, b) = orb_core::color::hsl_to_rgb(
                x as f32 * 360.0 / 320.0,
                80.0,
                20.0 + y as f32 / 4.0,
            );
            frame.set_rgb(x, y, r, g, b);
        }
    }
    frame
}

fn bench_sample_pass(c: &mut Criterion) {
    let frame = gradient_frame();
    let canvas = CanvasSize::default();

    c.bench_function("sample_pass_detail_2", |b| {
        let params = Params {
            detail: 2,
            tolerance: 50,
            ..Params::default()
        };
        b.iter(|| SamplePass::new(black_box(&frame), params, canvas).count());
    });

    c.bench_function("compose_frame_default", |b| {
        let params = Params::default();
        let mut cmds: Vec<DrawCommand> = Vec::with_capacity(64 * 1024);
        b.iter(|| {
            cmds.clear();
            compose_frame(&mut cmds, Some(black_box(&frame)), &params, canvas)
        });
    });
}

criterion_group!(benches, bench_sample_pass);
criterion_main!(benches);
