//! Display helper functions for scene objects

use shared::{ObjectType, SceneObject};

/// Display name for an object: its name, or its type, plus a short id
pub fn object_display_name(obj: &SceneObject) -> String {
    let label = match obj.name.as_deref() {
        Some(name) => name.to_string(),
        None => type_label(obj.kind).to_string(),
    };
    format!("{} ({})", label, short_id(&obj.id))
}

fn type_label(kind: ObjectType) -> &'static str {
    match kind {
        ObjectType::Box => "Box",
        ObjectType::Sphere => "Sphere",
        ObjectType::Cylinder => "Cylinder",
        ObjectType::Cone => "Cone",
        ObjectType::Torus => "Torus",
        ObjectType::Plane => "Plane",
        ObjectType::Wedge => "Wedge",
        ObjectType::CustomMesh => "Custom Mesh",
        ObjectType::Extrusion => "Extrusion",
        ObjectType::Revolution => "Revolution",
        ObjectType::Sweep => "Sweep",
    }
}

/// Text icon for the scene tree
pub fn object_icon(obj: &SceneObject) -> &'static str {
    if !obj.visible {
        return "[-]";
    }
    match obj.kind {
        ObjectType::Box => "[B]",
        ObjectType::Sphere => "[S]",
        ObjectType::Cylinder => "[C]",
        ObjectType::Cone => "[^]",
        ObjectType::Torus => "[O]",
        ObjectType::Plane => "[_]",
        ObjectType::Wedge => "[/]",
        ObjectType::CustomMesh => "[M]",
        ObjectType::Extrusion => "[E]",
        ObjectType::Revolution => "[R]",
        ObjectType::Sweep => "[~]",
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("ééééééééé"), "éééééééé");
    }

    #[test]
    fn test_display_name_prefers_name() {
        let mut obj = SceneObject::new(ObjectType::Torus, [0.0; 3], "#ffffff");
        obj.id = "abcdef0123".into();
        assert_eq!(object_display_name(&obj), "Torus (abcdef01)");
        obj.name = Some("Ring".into());
        assert_eq!(object_display_name(&obj), "Ring (abcdef01)");
    }

    #[test]
    fn test_icon_hidden() {
        let mut obj = SceneObject::new(ObjectType::Cone, [0.0; 3], "#ffffff");
        assert_eq!(object_icon(&obj), "[^]");
        obj.visible = false;
        assert_eq!(object_icon(&obj), "[-]");
    }
}
