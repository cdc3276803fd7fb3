//! Fonts and colors shared by every Piper screen.
//!
//! Screens import these with `use piper_widgets::theme::*;` inside their
//! `live_design!` block.

use makepad_widgets::*;

live_design! {
    use link::theme::*;

    // Fonts
    pub FONT_REGULAR = <THEME_FONT_REGULAR> {}
    pub FONT_MEDIUM = <THEME_FONT_BOLD> {}
    pub FONT_SEMIBOLD = <THEME_FONT_BOLD> {}

    // Neutrals
    pub WHITE = #ffffff
    pub SLATE_50 = #f8fafc
    pub SLATE_100 = #f1f5f9
    pub SLATE_200 = #e2e8f0
    pub SLATE_300 = #cbd5e1
    pub SLATE_400 = #94a3b8
    pub SLATE_500 = #64748b
    pub SLATE_700 = #334155
    pub SLATE_900 = #0f172a

    pub TEXT_PRIMARY = #1e293b
    pub TEXT_SECONDARY = #475569
    pub TEXT_MUTED = #94a3b8
    pub BORDER = #e2e8f0
    pub PAGE_BG = #f1f5f9
    pub PANEL_BG = #ffffff
    pub HOVER_BG = #f8fafc

    // Accent
    pub INDIGO_50 = #eef2ff
    pub INDIGO_100 = #e0e7ff
    pub INDIGO_500 = #6366f1
    pub INDIGO_600 = #4f46e5
    pub INDIGO_700 = #4338ca

    // Status
    pub SUCCESS = #10b981
    pub WARNING = #f59e0b
    pub DANGER = #ef4444
    pub INFO = #6366f1
}
