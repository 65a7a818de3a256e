//! Read-only measurements of scene primitives.
//!
//! Volumes and areas follow each primitive's parametric definition at unit
//! size (box and plane are 1 × 1, height from `height`), then apply the
//! object's scale. Boxes, wedges and planes are exact under any scale; round
//! primitives are exact under uniform scale and use the geometric-mean scale
//! otherwise.

use std::f64::consts::PI;

use glam::DVec3;
use serde::Serialize;
use shared::{MeasureKind, ObjectId, ObjectType, SceneObject};

/// Result of a measure-* tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub kind: MeasureKind,
    pub value: f64,
    /// Objects the value refers to (one for volume/area, two for distance)
    pub objects: Vec<ObjectId>,
}

fn scale_of(obj: &SceneObject) -> DVec3 {
    DVec3::from_array(obj.scale)
}

fn height(obj: &SceneObject) -> f64 {
    obj.height.unwrap_or(1.0)
}

/// Enclosed volume, or `None` for types without a closed parametric form
pub fn volume(obj: &SceneObject) -> Option<f64> {
    let s = scale_of(obj);
    let factor = s.x * s.y * s.z;
    let unit = match obj.kind {
        ObjectType::Box => height(obj),
        ObjectType::Wedge => height(obj) / 2.0,
        ObjectType::Plane => 0.0,
        ObjectType::Sphere => {
            let r = obj.radius.unwrap_or(0.5);
            4.0 / 3.0 * PI * r.powi(3)
        }
        ObjectType::Cylinder | ObjectType::Cone => {
            let (rt, rb) = radii(obj);
            PI * height(obj) / 3.0 * (rt * rt + rt * rb + rb * rb)
        }
        ObjectType::Torus => {
            let (major, minor) = torus_radii(obj);
            2.0 * PI * PI * major * minor * minor
        }
        ObjectType::CustomMesh
        | ObjectType::Extrusion
        | ObjectType::Revolution
        | ObjectType::Sweep => return None,
    };
    Some(unit * factor)
}

/// Surface area, or `None` for types without a closed parametric form
pub fn area(obj: &SceneObject) -> Option<f64> {
    let s = scale_of(obj);
    match obj.kind {
        ObjectType::Box => {
            let (a, b, c) = (s.x, height(obj) * s.y, s.z);
            Some(2.0 * (a * b + b * c + c * a))
        }
        ObjectType::Wedge => {
            // Right-triangle profile in x/y extruded along z
            let (a, b, c) = (s.x, height(obj) * s.y, s.z);
            Some(a * b + a * c + b * c + (a * a + b * b).sqrt() * c)
        }
        ObjectType::Plane => Some(s.x * s.y),
        ObjectType::Sphere | ObjectType::Cylinder | ObjectType::Cone | ObjectType::Torus => {
            let mean = factor_cbrt(s);
            let unit = match obj.kind {
                ObjectType::Sphere => {
                    let r = obj.radius.unwrap_or(0.5);
                    4.0 * PI * r * r
                }
                ObjectType::Torus => {
                    let (major, minor) = torus_radii(obj);
                    4.0 * PI * PI * major * minor
                }
                _ => {
                    let (rt, rb) = radii(obj);
                    let h = height(obj);
                    let slant = ((rb - rt).powi(2) + h * h).sqrt();
                    PI * (rt + rb) * slant + PI * (rt * rt + rb * rb)
                }
            };
            Some(unit * mean * mean)
        }
        ObjectType::CustomMesh
        | ObjectType::Extrusion
        | ObjectType::Revolution
        | ObjectType::Sweep => None,
    }
}

/// Centre-to-centre distance
pub fn distance(a: &SceneObject, b: &SceneObject) -> f64 {
    DVec3::from_array(a.position).distance(DVec3::from_array(b.position))
}

/// Closest other object to `target` by centre distance
pub fn nearest<'a>(target: &SceneObject, objects: &'a [SceneObject]) -> Option<&'a SceneObject> {
    objects
        .iter()
        .filter(|o| o.id != target.id)
        .min_by(|a, b| distance(target, a).total_cmp(&distance(target, b)))
}

fn radii(obj: &SceneObject) -> (f64, f64) {
    let default_top = if obj.kind == ObjectType::Cone { 0.0 } else { 0.5 };
    (
        obj.radius_top.unwrap_or(default_top),
        obj.radius_bottom.unwrap_or(0.5),
    )
}

fn torus_radii(obj: &SceneObject) -> (f64, f64) {
    (obj.radius.unwrap_or(0.5), obj.tube_radius.unwrap_or(0.2))
}

fn factor_cbrt(s: DVec3) -> f64 {
    (s.x * s.y * s.z).cbrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn obj(kind: ObjectType) -> SceneObject {
        SceneObject::new(kind, [0.0; 3], "#ffffff")
    }

    #[test]
    fn test_box_volume_and_area() {
        let mut b = obj(ObjectType::Box);
        assert!(approx(volume(&b).unwrap(), 1.0));
        assert!(approx(area(&b).unwrap(), 6.0));
        b.scale = [2.0, 3.0, 4.0];
        assert!(approx(volume(&b).unwrap(), 24.0));
        assert!(approx(area(&b).unwrap(), 2.0 * (6.0 + 12.0 + 8.0)));
    }

    #[test]
    fn test_sphere_uniform_scale() {
        let mut s = obj(ObjectType::Sphere);
        assert!(approx(volume(&s).unwrap(), 4.0 / 3.0 * PI * 0.125));
        s.scale = [2.0; 3];
        assert!(approx(volume(&s).unwrap(), 4.0 / 3.0 * PI));
        assert!(approx(area(&s).unwrap(), 4.0 * PI));
    }

    #[test]
    fn test_cone_is_third_of_cylinder() {
        let cyl = volume(&obj(ObjectType::Cylinder)).unwrap();
        let cone = volume(&obj(ObjectType::Cone)).unwrap();
        assert!(approx(cyl, PI * 0.25));
        assert!(approx(cone * 3.0, cyl));
    }

    #[test]
    fn test_torus_and_wedge() {
        let t = obj(ObjectType::Torus);
        assert!(approx(volume(&t).unwrap(), 2.0 * PI * PI * 0.5 * 0.04));
        let w = obj(ObjectType::Wedge);
        assert!(approx(volume(&w).unwrap(), 0.5));
        assert!(approx(area(&w).unwrap(), 3.0 + 2f64.sqrt()));
    }

    #[test]
    fn test_unsupported_types() {
        assert!(volume(&obj(ObjectType::CustomMesh)).is_none());
        assert!(area(&obj(ObjectType::Sweep)).is_none());
        assert_eq!(volume(&obj(ObjectType::Plane)), Some(0.0));
    }

    #[test]
    fn test_distance_and_nearest() {
        let a = SceneObject::new(ObjectType::Box, [0.0, 0.0, 0.0], "#ffffff");
        let b = SceneObject::new(ObjectType::Box, [3.0, 4.0, 0.0], "#ffffff");
        let c = SceneObject::new(ObjectType::Box, [1.0, 0.0, 0.0], "#ffffff");
        assert!(approx(distance(&a, &b), 5.0));
        let all = vec![a.clone(), b, c.clone()];
        assert_eq!(nearest(&a, &all).map(|o| &o.id), Some(&c.id));
        assert!(nearest(&a, &[a.clone()]).is_none());
    }
}
