use markquill::theme::{colors::ThemeColors, get_builtin_theme, list_builtin_themes};
use ratatui::style::Color;

#[test]
fn test_every_listed_theme_exists() {
    let names = list_builtin_themes();
    assert_eq!(names.len(), 4);
    for name in names {
        let theme = get_builtin_theme(&name).unwrap();
        assert_eq!(theme.name, name);
    }
}

#[test]
fn test_invalid_theme_returns_none() {
    assert!(get_builtin_theme("nonexistent").is_none());
}

#[test]
fn test_dark_theme_uses_ansi_colors() {
    let colors = ThemeColors::default_dark();

    assert_eq!(colors.background, Color::Reset);
    assert_eq!(colors.bookmark_marker, Color::LightBlue);
    assert_eq!(colors.error, Color::Red);
    assert_eq!(colors.warning, Color::Yellow);
}

#[test]
fn test_bookmark_line_stands_out_from_background() {
    for name in list_builtin_themes() {
        let colors = get_builtin_theme(&name).unwrap().colors;
        assert_ne!(colors.bookmark_line_bg, colors.background, "{}", name);
        assert_ne!(colors.cursor_line_bg, colors.bookmark_line_bg, "{}", name);
    }
}

#[test]
fn test_dark_and_light_themes_have_different_backgrounds() {
    let dark = ThemeColors::default_dark();
    let light = ThemeColors::default_light();
    assert_ne!(dark.background, light.background);
}
