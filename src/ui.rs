//! Game over overlay layout
//!
//! The host draws it; this only decides text and placement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{Layout, WorldConfig};

const MESSAGE_Y: f32 = 300.0;
const BUTTON_Y: f32 = 400.0;

/// Final score text plus a retry button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverOverlay {
    pub message: String,
    pub message_pos: Vec2,
    pub message_font_px: u32,
    pub button_label: String,
    pub button_pos: Vec2,
    pub button_font_px: u32,
}

impl GameOverOverlay {
    pub fn new(score: u64, layout: Layout, world: &WorldConfig) -> Self {
        // Phones are narrow, so the score goes on its own line
        let message = match layout {
            Layout::Desktop => format!("GAMEOVER score: {score}"),
            Layout::Mobile => format!("GAMEOVER\nscore: {score}"),
        };
        let center_x = world.width / 2.0;

        Self {
            message,
            message_pos: Vec2::new(center_x, MESSAGE_Y),
            message_font_px: 20,
            button_label: "RETRY".to_string(),
            button_pos: Vec2::new(center_x, BUTTON_Y),
            button_font_px: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_overlay() {
        let overlay = GameOverOverlay::new(120, Layout::Desktop, &WorldConfig::desktop());
        assert_eq!(overlay.message, "GAMEOVER score: 120");
        assert_eq!(overlay.message_pos, Vec2::new(400.0, 300.0));
        assert_eq!(overlay.button_label, "RETRY");
        assert_eq!(overlay.button_pos, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_mobile_overlay_centers_on_viewport() {
        let world = WorldConfig::mobile(390.0, 844.0);
        let overlay = GameOverOverlay::new(0, Layout::Mobile, &world);
        assert_eq!(overlay.message, "GAMEOVER\nscore: 0");
        assert_eq!(overlay.message_pos.x, 195.0);
        assert_eq!(overlay.button_pos.x, 195.0);
    }
}
