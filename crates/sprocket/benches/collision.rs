use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{DQuat, DVec3};
use sprocket::{BodyHandle, CollisionConfig, ContactRecord, GearPinCollision, GearPinGeometry, Pose};

/// 100 shoes, a third of them wrapped around the gear and the rest on a
/// straight run beneath it.
fn track_scene(geom: &GearPinGeometry) -> Vec<Pose> {
    let seated = geom.gear_base_radius() + geom.gear_tooth_radius() + geom.pin_radius() - 0.001;
    let mut bodies = vec![Pose::IDENTITY];
    for i in 0..100_usize {
        let pose = if i < 33 {
            let rotation = DQuat::from_rotation_z(-geom.seat_angle(i % geom.num_teeth()));
            let pin = rotation * DVec3::new(0.0, seated, 0.0);
            Pose::new(pin - rotation * geom.pin_offset(), rotation)
        } else {
            #[allow(clippy::cast_precision_loss)]
            let x = 0.15 * i as f64 - 5.0;
            Pose::from_position(DVec3::new(x, -1.5, 0.0))
        };
        bodies.push(pose);
    }
    bodies
}

fn bench_collision_step(c: &mut Criterion) {
    let geom = GearPinGeometry::default();
    let bodies = track_scene(&geom);
    let shoes = (1..bodies.len()).map(BodyHandle).collect();
    let mut collision =
        GearPinCollision::new(BodyHandle(0), shoes, geom, CollisionConfig::default()).unwrap();
    let mut sink: Vec<ContactRecord> = Vec::with_capacity(64);

    c.bench_function("gear_pin_step_100_shoes", |b| {
        b.iter(|| {
            sink.clear();
            black_box(collision.perform_collision(black_box(&bodies), &mut sink))
        });
    });
}

criterion_group!(benches, bench_collision_step);
criterion_main!(benches);
