#[cfg(test)]
mod tests {
    use crisp_core::{Error, MarginTuning};

    use crate::config::{config_path, Config, DataRect};

    #[test]
    fn test_empty_json_gives_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.tick_count, 6);
        assert_eq!(cfg.data, DataRect::default());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let cfg = Config::from_json(
            r#"{
                "font_size": 9.5,
                "data": { "right": 50.0 },
                "tuning": { "margin": { "right_margin_px": 24.0 } }
            }"#,
        )
        .unwrap();
        assert!((cfg.font_size - 9.5).abs() < f32::EPSILON);
        assert_eq!(cfg.data.right, 50.0);
        assert_eq!(cfg.data.top, DataRect::default().top);
        assert_eq!(cfg.tuning.margin.right_margin_px, 24.0);
        assert_eq!(
            cfg.tuning.margin.left_padding_chars,
            MarginTuning::default().left_padding_chars
        );
        assert_eq!(cfg.text_color, Config::default().text_color);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Config::from_json("{ \"font_size\": ").is_err());
        assert!(Config::from_json("{ \"tick_count\": -3 }").is_err());
    }

    #[test]
    fn test_renderer_config_scales_font() {
        let cfg = Config::default();
        let renderer = cfg.renderer_config(2.0).unwrap();
        assert_eq!(renderer.font_size_px, 24.0);
        assert_eq!(renderer.text_color, cfg.text_color);
        assert_eq!(renderer.projection.right, 10000.0);
    }

    #[test]
    fn test_font_size_follows_scale_factor() {
        let cfg = Config::default();
        assert_eq!(cfg.font_size_px(1.0), 12.0);
        assert_eq!(cfg.font_size_px(1.5), 18.0);
        assert_eq!(cfg.font_size_px(1.25), 15.0);
        // Scale changes too small to move the rounded size keep the atlas.
        assert_eq!(cfg.font_size_px(1.02), cfg.font_size_px(1.0));
        assert_eq!(
            cfg.renderer_config(1.5).unwrap().font_size_px,
            cfg.font_size_px(1.5)
        );
        let tiny = Config {
            font_size: 0.2,
            ..Config::default()
        };
        assert_eq!(tiny.font_size_px(1.0), 1.0);
    }

    #[test]
    fn test_inverted_data_rect_rejected() {
        let cfg = Config {
            data: DataRect {
                left: 5.0,
                right: -5.0,
                bottom: 0.0,
                top: 1.0,
            },
            ..Config::default()
        };
        assert!(matches!(
            cfg.renderer_config(1.0),
            Err(Error::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_background_color_conversion() {
        let cfg = Config {
            background: [0.25, 0.5, 0.75, 1.0],
            ..Config::default()
        };
        let color = cfg.background_color();
        assert_eq!((color.r, color.g, color.b, color.a), (0.25, 0.5, 0.75, 1.0));
    }

    #[test]
    fn test_config_path_ends_with_json() {
        let path = config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
        assert!(path.parent().is_some_and(|dir| dir.ends_with("crisp")));
    }
}
