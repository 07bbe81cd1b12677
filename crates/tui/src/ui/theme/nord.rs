//! Nord (https://www.nordtheme.com) laid over the category browser roles.

use ratatui::style::Color;

use super::{
    roles::{Theme, ThemeRoles},
    theme_helpers::lighten_rgb,
};

pub const NORD0: Color = Color::Rgb(0x2E, 0x34, 0x40);
pub const NORD1: Color = Color::Rgb(0x3B, 0x42, 0x52);
pub const NORD3: Color = Color::Rgb(0x4C, 0x56, 0x6A);
pub const NORD4: Color = Color::Rgb(0xD8, 0xDE, 0xE9);
pub const NORD5: Color = Color::Rgb(0xE5, 0xE9, 0xF0);
pub const NORD6: Color = Color::Rgb(0xEC, 0xEF, 0xF4);
pub const NORD8: Color = Color::Rgb(0x88, 0xC0, 0xD0);
pub const NORD9: Color = Color::Rgb(0x81, 0xA1, 0xC1);
pub const NORD10: Color = Color::Rgb(0x5E, 0x81, 0xAC);
pub const NORD11: Color = Color::Rgb(0xBF, 0x61, 0x6A);
pub const NORD12: Color = Color::Rgb(0xD0, 0x87, 0x70);
pub const NORD13: Color = Color::Rgb(0xEB, 0xCB, 0x8B);
pub const NORD14: Color = Color::Rgb(0xA3, 0xBE, 0x8C);

// Comment grey from the Nord editor ports; dimmer than NORD3 on NORD1.
const DIM_GREY: Color = Color::Rgb(0x61, 0x6E, 0x88);

/// Nord palette, optionally with brightened text and frames.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                canvas: NORD0,
                panel: NORD1,
                frame: NORD1,
                frame_focused: NORD8,
                ink: NORD4,
                ink_heading: NORD5,
                ink_dim: DIM_GREY,
                highlight: NORD8,
                link: NORD9,
                loaded: NORD14,
                loading: NORD12,
                load_failed: NORD11,
                cursor_bg: NORD3,
                cursor_fg: NORD6,
            },
        }
    }

    pub fn high_contrast() -> Self {
        let mut theme = Self::new();
        let roles = &mut theme.roles;
        roles.frame = lighten_rgb(roles.frame, 0.30);
        roles.frame_focused = NORD10;
        roles.ink = NORD6;
        roles.ink_heading = NORD6;
        roles.ink_dim = NORD5;
        roles.loading = NORD13;
        roles.cursor_bg = lighten_rgb(roles.cursor_bg, 0.10);
        theme
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
