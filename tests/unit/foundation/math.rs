use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"keystage");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_u8(b'k');
    b.write_bytes(b"eystage");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn fnv_distinguishes_signed_zero() {
    let mut a = Fnv1a64::new_default();
    a.write_f64(0.0);
    let mut b = Fnv1a64::new_default();
    b.write_f64(-0.0);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn wrap_degrees_lands_in_range() {
    assert_eq!(wrap_degrees(0.0), 0.0);
    assert_eq!(wrap_degrees(360.0), 0.0);
    assert_eq!(wrap_degrees(-90.0), 270.0);
    assert_eq!(wrap_degrees(725.0), 5.0);
    let tiny = wrap_degrees(-1e-14);
    assert!((0.0..360.0).contains(&tiny));
}

#[test]
fn shortest_delta_crosses_zero() {
    assert_eq!(shortest_angle_delta(350.0, 10.0), 20.0);
    assert_eq!(shortest_angle_delta(10.0, 350.0), -20.0);
    assert_eq!(shortest_angle_delta(0.0, 90.0), 90.0);
    assert_eq!(shortest_angle_delta(0.0, 270.0), -90.0);
    assert_eq!(shortest_angle_delta(45.0, 45.0 + 720.0), 0.0);
}
