use criterion::{Criterion, criterion_group, criterion_main};
use mannequin::objects::camera::Camera;
use mannequin::objects::model3d::Rotate;
use mannequin::objects::pivot::Pivot;
use mannequin::objects::triangle_mesh::TriangleMesh;
use mannequin::render::Renderer;
use mannequin::render::z_buffer::ZBufferPerformer;
use mannequin::scene::Scene;
use image::RgbImage;
use std::fmt::Write;
use std::hint::black_box;

const SIZES: &[(u32, u32)] = &[(480, 640), (1080, 1440)];

/// UV sphere split into `groups` bands, roughly the density of a generated body mesh.
fn banded_sphere(rings: usize, segments: usize, groups: usize) -> String {
    let mut obj = String::new();
    for r in 0..=rings {
        let theta = std::f64::consts::PI * r as f64 / rings as f64;
        for s in 0..segments {
            let phi = 2.0 * std::f64::consts::PI * s as f64 / segments as f64;
            let _ = writeln!(
                obj,
                "v {} {} {}",
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin()
            );
        }
    }

    let rings_per_group = rings.div_ceil(groups);
    for r in 0..rings {
        if r % rings_per_group == 0 {
            let _ = writeln!(obj, "g band{}", r / rings_per_group);
        }
        for s in 0..segments {
            let a = r * segments + s + 1;
            let b = r * segments + (s + 1) % segments + 1;
            let _ = writeln!(obj, "f {} {} {} {}", a, b, b + segments, a + segments);
        }
    }
    obj
}

fn render_benchmark(c: &mut Criterion) {
    let source = banded_sphere(120, 160, 3);

    let mut group = c.benchmark_group("Model");
    group.bench_function("Parse OBJ", |b| {
        b.iter(|| black_box(TriangleMesh::from_obj_str(black_box(&source)).unwrap()))
    });
    group.bench_function("Build pivot", |b| {
        let mesh = TriangleMesh::from_obj_str(&source).unwrap();
        b.iter_with_setup(|| mesh.clone(), |mesh| black_box(Pivot::new(mesh)))
    });
    group.finish();

    for &(width, height) in SIZES {
        let mut group = c.benchmark_group(format!("Frame {}x{}", width, height));

        let mut scene = Scene::new(Camera::for_surface(width, height));
        scene.set_background(RgbImage::from_pixel(800, 600, image::Rgb([120, 90, 60])));
        let mut pivot = Pivot::new(TriangleMesh::from_obj_str(&source).unwrap()).unwrap();
        pivot.set_rotation_y(0.4);
        scene.attach_model(pivot);

        let mut renderer = ZBufferPerformer::new(width, height);
        let mut frame = RgbImage::new(width, height);

        group.bench_function("Z-buffer", |b| {
            b.iter(|| renderer.create_frame_mut(black_box(&mut frame), &scene))
        });
        group.finish();
    }
}

criterion_group!(benches, render_benchmark);
criterion_main!(benches);
