//! Rendering on several cores must give the same image as rendering on one.

use lumen_renderer::{
    partition, render, Bvh, Camera, CameraSettings, Color, Material, Quad, Shape, Shapes, Sphere,
    Vec3,
};

fn scene() -> Vec<Box<dyn Shape>> {
    vec![
        Box::new(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Material::new(0.2, 0.0, 0.6, 0.2, Color::new(0.5, 0.8, 0.3)).unwrap(),
        )),
        Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Material::new(0.1, 0.7, 0.1, 0.1, Color::new(0.9, 0.9, 0.9))
                .unwrap()
                .with_fuzz(0.2),
        )),
        Box::new(Quad::new(
            Vec3::new(-2.0, -0.5, -2.5),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Material::default(),
        )),
    ]
}

fn settings() -> CameraSettings {
    CameraSettings::default()
        .with_resolution(32, 1.5)
        .with_quality(3)
        .with_position(Vec3::new(0.0, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
}

#[test]
fn render_is_independent_of_core_count() {
    let shapes = scene();
    let world = Bvh::new(&shapes);

    let serial = render(&Camera::new(settings()).unwrap(), &world, 7).unwrap();
    for cores in [2, 3, 4, 7] {
        let camera = Camera::new(settings().with_cores(cores)).unwrap();
        let parallel = render(&camera, &world, 7).unwrap();
        assert_eq!(parallel, serial, "cores = {cores}");
    }
}

#[test]
fn seed_changes_the_noise() {
    let world: Shapes = scene().into_iter().collect();
    let camera = Camera::new(settings()).unwrap();

    let a = render(&camera, &world, 1).unwrap();
    let b = render(&camera, &world, 2).unwrap();
    assert_eq!(render(&camera, &world, 1).unwrap(), a);
    assert_ne!(a, b);
}

#[test]
fn buffer_has_camera_dimensions() {
    let world: Shapes = scene().into_iter().collect();
    let camera = Camera::new(settings().with_cores(4)).unwrap();
    let image = render(&camera, &world, 0).unwrap();

    assert_eq!(image.width(), 32);
    assert_eq!(image.height(), 21);
    assert_eq!(image.as_rgb_bytes().len(), 32 * 21 * 3);
}

#[test]
fn more_cores_than_pixels() {
    let world: Shapes = scene().into_iter().collect();
    let settings = settings().with_resolution(2, 1.0).with_cores(8);
    let camera = Camera::new(settings.clone()).unwrap();
    let serial = Camera::new(settings.with_cores(1)).unwrap();

    assert_eq!(
        render(&camera, &world, 3).unwrap(),
        render(&serial, &world, 3).unwrap()
    );
}

#[test]
fn sky_only_image_is_a_vertical_gradient() {
    let world = Shapes::new();
    let settings = CameraSettings::default()
        .with_resolution(8, 1.0)
        .with_quality(1)
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_backgrounds(Color::ONE, Color::new(0.0, 0.0, 1.0));
    let image = render(&Camera::new(settings).unwrap(), &world, 0).unwrap();

    // Red fades toward the top, blue stays saturated
    let top = image.get(4, 0);
    let bottom = image.get(4, 7);
    assert!(top[0] < bottom[0]);
    assert!(top[2] >= 254);
    assert!(bottom[2] >= 254);
}

#[test]
fn partition_tiles_every_pixel() {
    for total in [0, 1, 17, 600, 1001] {
        for cores in 1..=9 {
            let ranges = partition(total, cores);
            assert_eq!(ranges.len(), cores);
            assert_eq!(ranges.iter().map(|r| r.len()).sum::<usize>(), total);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }
}
