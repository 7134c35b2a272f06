/// Compile-time layout tokens for the labeller window. Colors and stroke come
/// from `LabellerConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleTokens {
    pub window_default_width: i32,
    pub window_default_height: i32,
    pub window_min_width: i32,
    pub window_min_height: i32,
    /// Gap kept between the widget allocation and the fitted image on each side.
    pub canvas_padding: u32,
    pub handle_size: f64,
    pub label_font_size: f64,
    pub label_padding: f64,
    pub message_font_size: f64,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    window_default_width: 1280,
    window_default_height: 800,
    window_min_width: 480,
    window_min_height: 320,
    canvas_padding: 16,
    handle_size: 8.0,
    label_font_size: 12.0,
    label_padding: 3.0,
    message_font_size: 15.0,
};

#[cfg(test)]
mod tests {
    use super::LAYOUT_TOKENS;

    #[test]
    fn default_window_fits_inside_minimum_constraints() {
        let tokens = LAYOUT_TOKENS;
        assert!(tokens.window_default_width >= tokens.window_min_width);
        assert!(tokens.window_default_height >= tokens.window_min_height);
    }

    #[test]
    fn padding_leaves_room_for_an_image_at_minimum_size() {
        let tokens = LAYOUT_TOKENS;
        let padding = i32::try_from(tokens.canvas_padding * 2).unwrap();
        assert!(tokens.window_min_width > padding);
        assert!(tokens.window_min_height > padding);
    }

    #[test]
    fn handles_are_drawn_at_the_default_grab_tolerance() {
        let handle = LAYOUT_TOKENS.handle_size;
        assert_eq!(handle, f64::from(crate::surface::EditorOptions::default().handle_tolerance));
    }
}
