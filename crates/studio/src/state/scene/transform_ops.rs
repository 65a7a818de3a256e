//! Transform and colour updates on the selected object

use shared::{clamp_scale, normalize_hex, Axis, AxisValues, SceneObject};

use super::SceneStore;

/// Which transform tuple an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformField {
    Position,
    /// Radians
    Rotation,
    /// Clamped to the scale floor
    Scale,
}

impl TransformField {
    fn slot(self, obj: &mut SceneObject) -> &mut [f64; 3] {
        match self {
            TransformField::Position => &mut obj.position,
            TransformField::Rotation => &mut obj.rotation,
            TransformField::Scale => &mut obj.scale,
        }
    }

    fn label(self) -> &'static str {
        match self {
            TransformField::Position => "position",
            TransformField::Rotation => "rotation",
            TransformField::Scale => "scale",
        }
    }
}

impl SceneStore {
    /// Apply `f` to the selected, unlocked object and record one snapshot
    fn mutate_selected(&mut self, op: &str, f: impl FnOnce(&mut SceneObject)) -> bool {
        let Some(id) = self.editable_selected(op) else {
            return false;
        };
        let Some(obj) = self.get_mut(&id) else {
            return false;
        };
        f(obj);
        obj.touch();
        self.record();
        tracing::debug!("{op} applied to {id}");
        true
    }

    /// Set any subset of one tuple's components as a single undoable step
    pub fn set_transform(&mut self, field: TransformField, values: &AxisValues) -> bool {
        // Scale maps anything below the floor (including -inf) to the floor
        let usable = |v: f64| match field {
            TransformField::Scale => !v.is_nan() && v != f64::INFINITY,
            _ => v.is_finite(),
        };
        let components: Vec<(Axis, f64)> = values.iter().filter(|(_, v)| usable(*v)).collect();
        if components.is_empty() {
            tracing::warn!("update {}: no usable components", field.label());
            return false;
        }
        self.mutate_selected(field.label(), |obj| {
            let slot = field.slot(obj);
            for (axis, v) in components {
                slot[axis.index()] = match field {
                    TransformField::Scale => clamp_scale(v),
                    _ => v,
                };
            }
        })
    }

    pub fn update_position(&mut self, axis: Axis, value: f64) -> bool {
        self.set_transform(TransformField::Position, &AxisValues::single(axis, value))
    }

    /// `value` in radians
    pub fn update_rotation(&mut self, axis: Axis, value: f64) -> bool {
        self.set_transform(TransformField::Rotation, &AxisValues::single(axis, value))
    }

    pub fn update_scale(&mut self, axis: Axis, value: f64) -> bool {
        self.set_transform(TransformField::Scale, &AxisValues::single(axis, value))
    }

    /// Multiply every scale component by `factor`
    pub fn scale_by(&mut self, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            tracing::warn!("scale_by: factor must be positive, got {factor}");
            return false;
        }
        self.mutate_selected("scale_by", |obj| {
            for s in &mut obj.scale {
                *s = clamp_scale(*s * factor);
            }
        })
    }

    /// Replace the selected object's colour with a normalized hex code
    pub fn update_color(&mut self, color: &str) -> bool {
        let Some(hex) = normalize_hex(color) else {
            tracing::warn!("update_color: '{color}' is not a 6-digit hex colour");
            return false;
        };
        self.mutate_selected("color", |obj| obj.color = hex)
    }
}
