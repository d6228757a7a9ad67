#[cfg(test)]
mod tests {
    use crate::testing::{atlas, BlockRasterizer, BASELINE, CELL_H, CELL_W};
    use crate::{build_atlas, Error, GLYPH_SET};

    #[test]
    fn test_atlas_is_one_row_of_cells() {
        let image = atlas();
        assert_eq!(image.width, CELL_W * GLYPH_SET.len() as u32);
        assert_eq!(image.height, CELL_H);
        assert_eq!(image.pixels.len(), (image.width * image.height) as usize);
        assert_eq!(image.layout.column_count, GLYPH_SET.len() as u32);
        assert_eq!(image.layout.row_count, 1);
        assert!((image.layout.column_factor - 1.0 / 13.0).abs() < 1e-12);
        assert_eq!(image.layout.row_factor, 1.0);
    }

    #[test]
    fn test_every_glyph_has_metrics_in_column_order() {
        let image = atlas();
        assert_eq!(image.metrics.len(), GLYPH_SET.len());
        for (column, &ch) in GLYPH_SET.iter().enumerate() {
            let metric = image.metrics.get(ch).unwrap();
            assert!((metric.atlas_u - column as f64 / 13.0).abs() < 1e-12);
            assert_eq!(metric.box_width, CELL_W);
            assert_eq!(metric.box_height, CELL_H);
            assert_eq!(metric.bearing_x, 1);
            assert_eq!(metric.advance, CELL_W as i32);
        }
    }

    #[test]
    fn test_unknown_glyph_is_invariant_violation() {
        let image = atlas();
        assert!(matches!(
            image.metrics.get('x'),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_glyph_ink_sits_on_baseline_inside_its_cell() {
        let image = atlas();
        let top = BASELINE - 9;
        for column in 0..GLYPH_SET.len() as u32 {
            let x0 = column * CELL_W;
            for y in 0..CELL_H {
                for x in 0..CELL_W {
                    let px = image.pixels[(y * image.width + x0 + x) as usize];
                    let inked = x < 5 && y >= top && y < BASELINE;
                    assert_eq!(px == 255, inked, "cell {column} at ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn test_rasterizer_failure_is_fatal() {
        let mut rasterizer = BlockRasterizer::new();
        rasterizer.fail_on = Some('7');
        assert!(matches!(
            build_atlas(&mut rasterizer),
            Err(Error::Initialization(_))
        ));
    }

    #[test]
    fn test_inkless_glyph_is_fatal() {
        let mut rasterizer = BlockRasterizer::new();
        rasterizer.blank_on = Some(',');
        let err = build_atlas(&mut rasterizer).unwrap_err();
        assert!(matches!(err, Error::Initialization(msg) if msg.contains("','")));
    }
}
