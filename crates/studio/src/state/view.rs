//! Presentation-only view state
//!
//! View tools never touch the object collection or its history; they only
//! flip flags here for the renderer to pick up.

use serde::Serialize;
use shared::ViewAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    #[default]
    Shaded,
    Wireframe,
}

/// Named camera positions accepted by `change-camera`
pub const CAMERA_PRESETS: [&str; 6] = ["perspective", "front", "back", "top", "left", "right"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub shading: ShadingMode,
    /// Bumped on every reset so the renderer can react to repeated resets
    pub camera_resets: u64,
    pub camera_preset: String,
    pub animating: bool,
    pub show_help: bool,
    pub show_properties: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Shaded,
            camera_resets: 0,
            camera_preset: CAMERA_PRESETS[0].to_string(),
            animating: false,
            show_help: false,
            show_properties: false,
        }
    }
}

impl ViewState {
    /// Apply a view action. Returns whether anything changed.
    pub fn apply(&mut self, action: &ViewAction) -> bool {
        match action {
            ViewAction::ResetCamera => {
                self.camera_resets += 1;
                self.camera_preset = CAMERA_PRESETS[0].to_string();
                true
            }
            ViewAction::Wireframe => self.set_shading(ShadingMode::Wireframe),
            ViewAction::Shaded => self.set_shading(ShadingMode::Shaded),
            ViewAction::Animate => {
                self.animating = !self.animating;
                true
            }
            ViewAction::ChangeCamera { preset } => self.change_camera(preset.as_deref()),
            ViewAction::ShowHelp => {
                self.show_help = !self.show_help;
                true
            }
            ViewAction::DisplayProperties => {
                self.show_properties = !self.show_properties;
                true
            }
        }
    }

    fn set_shading(&mut self, mode: ShadingMode) -> bool {
        let changed = self.shading != mode;
        self.shading = mode;
        changed
    }

    /// Switch to a named preset, or cycle to the next one when none is given
    fn change_camera(&mut self, preset: Option<&str>) -> bool {
        let next = match preset {
            Some(p) => {
                let p = p.trim().to_ascii_lowercase();
                if !CAMERA_PRESETS.contains(&p.as_str()) {
                    tracing::warn!("change-camera: unknown preset '{p}'");
                    return false;
                }
                p
            }
            None => {
                let current = CAMERA_PRESETS
                    .iter()
                    .position(|p| *p == self.camera_preset)
                    .unwrap_or(0);
                CAMERA_PRESETS[(current + 1) % CAMERA_PRESETS.len()].to_string()
            }
        };
        let changed = next != self.camera_preset;
        self.camera_preset = next;
        changed
    }
}
