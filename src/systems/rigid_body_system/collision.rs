use crate::core::Vec2;
use crate::rigid_body::{Body, Shape};

/// Narrow phase. Returns `(normal, depth)` with the normal pointing from `b`
/// toward `a`, or `None` when the shapes don't overlap.
///
/// Only pairs the globe needs are supported: circles against circles and
/// circles against (one-way) boxes. Box-box pairs never touch.
pub(super) fn detect(a: &Body, b: &Body) -> Option<(Vec2, f32)> {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.pos, ra, b.pos, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half_width, half_height }) => {
            circle_rect(a.pos, radius, b, half_width, half_height)
        }
        (Shape::Circle { radius }, Shape::OneWayRect { half_width, half_height }) => {
            circle_one_way(a.pos, radius, b, half_width, half_height)
        }
        (Shape::Rect { .. } | Shape::OneWayRect { .. }, Shape::Circle { .. }) => {
            detect(b, a).map(|(n, d)| (-n, d))
        }
        _ => None,
    }
}

fn circle_circle(pa: Vec2, ra: f32, pb: Vec2, rb: f32) -> Option<(Vec2, f32)> {
    let delta = pa - pb;
    let r = ra + rb;
    let d2 = delta.length_squared();
    if d2 >= r * r {
        return None;
    }
    if d2 <= 1e-12 {
        // Coincident centers: pick a fixed axis instead of dividing by zero
        return Some((Vec2::new(0.0, -1.0), r));
    }
    let d = d2.sqrt();
    Some((delta * (1.0 / d), r - d))
}

fn circle_rect(center: Vec2, radius: f32, rect: &Body, hw: f32, hh: f32) -> Option<(Vec2, f32)> {
    let local = rect.world_to_local(center);
    let closest = Vec2::new(local.x.clamp(-hw, hw), local.y.clamp(-hh, hh));
    let diff = local - closest;
    let d2 = diff.length_squared();

    if d2 > radius * radius {
        return None;
    }

    let (normal_local, depth) = if d2 > 1e-12 {
        let d = d2.sqrt();
        (diff * (1.0 / d), radius - d)
    } else {
        // Center inside the box: leave through the nearest face
        let px = hw - local.x.abs();
        let py = hh - local.y.abs();
        if px < py {
            (Vec2::new(sign(local.x), 0.0), px + radius)
        } else {
            (Vec2::new(0.0, sign(local.y)), py + radius)
        }
    };

    Some((rect.local_dir_to_world(normal_local), depth))
}

fn circle_one_way(center: Vec2, radius: f32, rect: &Body, hw: f32, hh: f32) -> Option<(Vec2, f32)> {
    let local = rect.world_to_local(center);
    if local.x.abs() > hw + radius {
        return None;
    }
    let depth = hh + radius - local.y;
    if depth <= 0.0 {
        return None;
    }
    Some((rect.local_dir_to_world(Vec2::new(0.0, 1.0)), depth))
}

#[inline]
fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rigid_body::BodyDesc;

    fn body(desc: BodyDesc) -> Body {
        Body::from_desc(desc, 1)
    }

    #[test]
    fn circle_resting_on_floor_is_pushed_up() {
        let floor = body(BodyDesc::rect(Vec2::new(0.0, 10.0), 100.0, 10.0).fixed());
        let ball = body(BodyDesc::circle(Vec2::new(0.0, 2.0), 4.0));

        let (normal, depth) = detect(&ball, &floor).expect("overlap");
        assert!((normal.y + 1.0).abs() < 1e-5);
        assert!((depth - 1.0).abs() < 1e-5);
    }

    #[test]
    fn separated_shapes_do_not_touch() {
        let floor = body(BodyDesc::rect(Vec2::new(0.0, 10.0), 100.0, 10.0).fixed());
        let ball = body(BodyDesc::circle(Vec2::new(0.0, -20.0), 4.0));
        assert!(detect(&ball, &floor).is_none());
    }

    #[test]
    fn one_way_rect_always_pushes_along_its_normal() {
        // Local +y rotated by -90° points along world +x
        let wall = body(
            BodyDesc::one_way_rect(Vec2::zero(), 20.0, 4.0).angle(-std::f32::consts::FRAC_PI_2),
        );
        // Ball sitting behind the wall still gets sent to the +x side
        let ball = body(BodyDesc::circle(Vec2::new(-6.0, 0.0), 2.0));

        let (normal, depth) = detect(&ball, &wall).expect("behind wall counts as contact");
        assert!((normal.x - 1.0).abs() < 1e-5);
        assert!((depth - 10.0).abs() < 1e-4);

        let clear = body(BodyDesc::circle(Vec2::new(5.0, 0.0), 2.0));
        assert!(detect(&clear, &wall).is_none());
    }

    #[test]
    fn coincident_circles_get_a_finite_normal() {
        let a = body(BodyDesc::circle(Vec2::new(3.0, 3.0), 2.0));
        let b = body(BodyDesc::circle(Vec2::new(3.0, 3.0), 2.0));
        let (normal, depth) = detect(&a, &b).expect("overlap");
        assert!(normal.is_finite());
        assert_eq!(depth, 4.0);
    }

    #[test]
    fn swapped_order_flips_normal() {
        let floor = body(BodyDesc::rect(Vec2::new(0.0, 10.0), 100.0, 10.0).fixed());
        let ball = body(BodyDesc::circle(Vec2::new(0.0, 2.0), 4.0));
        let (n1, _) = detect(&ball, &floor).unwrap();
        let (n2, _) = detect(&floor, &ball).unwrap();
        assert_eq!(n1, -n2);
    }
}
