//! Theme styling for the TUI: semantic roles, the Nord palette and helper
//! builders for ratatui widgets. Prefer these helpers over hard-coded colors.

use std::env;

use tracing::debug;

pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use nord::NordTheme;
pub use roles::Theme;

/// Environment variable selecting the palette (`nord`, `nord-high-contrast`).
pub const THEME_ENV: &str = "AISLE_THEME";

/// Select a theme from `AISLE_THEME`, defaulting to Nord.
pub fn load_from_env() -> Box<dyn Theme> {
    let requested = env::var(THEME_ENV).unwrap_or_default();
    resolve(requested.trim())
}

fn resolve(name: &str) -> Box<dyn Theme> {
    match name.to_ascii_lowercase().as_str() {
        "nord-high-contrast" | "nord_hc" | "high-contrast" => Box::new(NordTheme::high_contrast()),
        "" | "nord" => Box::new(NordTheme::new()),
        other => {
            debug!(theme = other, "unknown theme requested; using nord");
            Box::new(NordTheme::new())
        }
    }
}
