#[cfg(test)]
mod tests {
    use crate::testing::{atlas, CELL_H, CELL_W};
    use crate::{
        layout_label, Axis, DeviceSize, Label, LayoutTuning, PixelSize, ProjectionRect,
        FLOATS_PER_VERTEX, VERTICES_PER_GLYPH,
    };

    fn on_grid(value: f64, step: f64) -> bool {
        let ratio = value / step;
        (ratio - ratio.round()).abs() < 1e-6
    }

    fn setup() -> (ProjectionRect, PixelSize) {
        let rect = ProjectionRect::new(-1000.0, 10000.0, -2.0, 10.0).unwrap();
        let pixel = PixelSize::derive(&rect, DeviceSize::new(880, 240)).unwrap();
        (rect, pixel)
    }

    #[test]
    fn test_label_extents_from_metrics() {
        let image = atlas();
        let label = Label::new(-12.5, Axis::Vertical, &image.metrics).unwrap();
        assert_eq!(label.glyphs, vec!['-', '1', '2', ',', '5']);
        assert_eq!(label.pixel_width, 5 * CELL_W);
        assert_eq!(label.pixel_height, CELL_H);
        assert_eq!(label.vertex_count(), 5 * VERTICES_PER_GLYPH);
    }

    #[test]
    fn test_quad_buffer_size() {
        let image = atlas();
        let (rect, pixel) = setup();
        let mut label = Label::new(4000.0, Axis::Horizontal, &image.metrics).unwrap();
        layout_label(&mut label, &rect, pixel, &image.layout, &LayoutTuning::default());
        assert_eq!(label.quads.len(), 4 * VERTICES_PER_GLYPH);
        assert_eq!(
            label.flat_buffer().len(),
            4 * VERTICES_PER_GLYPH * FLOATS_PER_VERTEX
        );
    }

    #[test]
    fn test_horizontal_label_centered_under_tick() {
        let image = atlas();
        let (rect, pixel) = setup();
        let mut label = Label::new(4000.0, Axis::Horizontal, &image.metrics).unwrap();
        layout_label(&mut label, &rect, pixel, &image.layout, &LayoutTuning::default());

        let half = f64::from(label.pixel_width) * pixel.width / 2.0;
        let first_left = label.quads[0].position[0];
        // Pen starts at the hinted anchor, ink one pixel right of it.
        let pen = first_left - pixel.width;
        assert!(pen <= 4000.0 - half + 1e-9);
        assert!(pen > 4000.0 - half - pixel.width);

        let bottom = label.quads[1].position[1];
        assert!((bottom - (rect.bottom + pixel.height)).abs() <= pixel.height + 1e-9);
        let top = label.quads[0].position[1];
        assert!((top - bottom - f64::from(CELL_H) * pixel.height).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_label_beside_tick() {
        let image = atlas();
        let (rect, pixel) = setup();
        let mut label = Label::new(6.0, Axis::Vertical, &image.metrics).unwrap();
        layout_label(&mut label, &rect, pixel, &image.layout, &LayoutTuning::default());

        let pen = label.quads[0].position[0] - pixel.width;
        assert!((pen - (rect.left + 4.0 * pixel.width)).abs() <= pixel.width + 1e-9);

        let bottom = label.quads[1].position[1];
        let top = label.quads[0].position[1];
        let center = (top + bottom) / 2.0;
        assert!((center - 6.0).abs() <= pixel.height + 1e-9);
    }

    #[test]
    fn test_quad_edges_on_pixel_grid() {
        let image = atlas();
        let (rect, pixel) = setup();
        for (value, axis) in [
            (1234.5678, Axis::Horizontal),
            (-3.3, Axis::Vertical),
            (7.77, Axis::Vertical),
        ] {
            let mut label = Label::new(value, axis, &image.metrics).unwrap();
            layout_label(&mut label, &rect, pixel, &image.layout, &LayoutTuning::default());
            for v in &label.quads {
                assert!(on_grid(v.position[0], pixel.width), "x {}", v.position[0]);
                assert!(on_grid(v.position[1], pixel.height), "y {}", v.position[1]);
            }
        }
    }

    #[test]
    fn test_glyphs_advance_left_to_right() {
        let image = atlas();
        let (rect, pixel) = setup();
        let mut label = Label::new(987.0, Axis::Horizontal, &image.metrics).unwrap();
        layout_label(&mut label, &rect, pixel, &image.layout, &LayoutTuning::default());
        let lefts: Vec<f64> = label
            .quads
            .chunks(VERTICES_PER_GLYPH)
            .map(|quad| quad[0].position[0])
            .collect();
        for pair in lefts.windows(2) {
            assert!((pair[1] - pair[0] - f64::from(CELL_W) * pixel.width).abs() < 1e-9);
        }
    }

    #[test]
    fn test_uv_spans_glyph_column() {
        let image = atlas();
        let (rect, pixel) = setup();
        let mut label = Label::new(-8.0, Axis::Vertical, &image.metrics).unwrap();
        layout_label(&mut label, &rect, pixel, &image.layout, &LayoutTuning::default());

        let minus = image.metrics.get('-').unwrap();
        let quad = &label.quads[..VERTICES_PER_GLYPH];
        assert_eq!(quad[0].uv, [minus.atlas_u, 0.0]);
        assert_eq!(quad[1].uv, [minus.atlas_u, 1.0]);
        assert_eq!(quad[2].uv, [minus.atlas_u + image.layout.column_factor, 1.0]);
        assert_eq!(quad[5].uv, [minus.atlas_u + image.layout.column_factor, 0.0]);
        assert_eq!(quad[0], quad[3]);
        assert_eq!(quad[2], quad[4]);
    }

    #[test]
    fn test_layout_is_repeatable() {
        let image = atlas();
        let (rect, pixel) = setup();
        let mut label = Label::new(2000.0, Axis::Horizontal, &image.metrics).unwrap();
        layout_label(&mut label, &rect, pixel, &image.layout, &LayoutTuning::default());
        let first = label.quads.clone();
        layout_label(&mut label, &rect, pixel, &image.layout, &LayoutTuning::default());
        assert_eq!(first, label.quads);
    }
}
