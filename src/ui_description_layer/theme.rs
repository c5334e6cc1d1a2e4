/*
 * This module defines the visual themes for the application. The light theme
 * is simply the platform's defaults; the dark theme is a palette of
 * `PlatformCommand::DefineStyle` commands. The presenter sends one or the other
 * at startup and whenever the user toggles dark mode.
 */
use crate::platform_layer::types::{Color, PlatformCommand, StyleId};

/*
 * A dark palette with bright, readable text and accent colors for status
 * severities and the progress bar.
 */
pub fn define_dark_theme() -> Vec<PlatformCommand> {
    let text_light = Color {
        r: 220,
        g: 220,
        b: 220,
    };
    let text_info = Color {
        r: 120,
        g: 200,
        b: 255,
    };
    let text_warning = Color {
        r: 255,
        g: 165,
        b: 0,
    };
    let text_error = Color {
        r: 255,
        g: 100,
        b: 100,
    };
    let accent = Color {
        r: 0,
        g: 230,
        b: 170,
    };

    vec![
        PlatformCommand::DefineStyle {
            style_id: StyleId::DefaultText,
            color: text_light,
        },
        PlatformCommand::DefineStyle {
            style_id: StyleId::StatusInformation,
            color: text_info,
        },
        PlatformCommand::DefineStyle {
            style_id: StyleId::StatusWarning,
            color: text_warning,
        },
        PlatformCommand::DefineStyle {
            style_id: StyleId::StatusError,
            color: text_error,
        },
        PlatformCommand::DefineStyle {
            style_id: StyleId::ProgressBar,
            color: accent,
        },
        PlatformCommand::DefineStyle {
            style_id: StyleId::ResultRow,
            color: text_light,
        },
    ]
}

pub fn define_theme(dark_mode: bool) -> Vec<PlatformCommand> {
    if dark_mode {
        define_dark_theme()
    } else {
        vec![PlatformCommand::ResetStyles]
    }
}
