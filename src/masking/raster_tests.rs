//! Tests for raster operations.

use super::*;

fn checkerboard(w: u32, h: u32) -> Raster {
    let mut r = Raster::new(w, h, WHITE);
    for y in 0..h {
        for x in 0..w {
            if (x + y) % 2 == 0 {
                r.put_pixel(x, y, BLACK);
            }
        }
    }
    r
}

#[test]
fn test_from_rgb_validates_length() {
    assert!(Raster::from_rgb(2, 2, &[0; 12]).is_ok());
    assert!(Raster::from_rgb(2, 2, &[0; 11]).is_err());
    let r = Raster::from_rgb(1, 1, &[1, 2, 3]).unwrap();
    assert_eq!(r.pixel(0, 0), Some([1, 2, 3]));
    assert_eq!(r.to_rgb(), vec![1, 2, 3]);
}

#[test]
fn test_fill_rect_clips() {
    let mut r = Raster::new(4, 4, WHITE);
    r.fill_rect(PixelRect { x0: 2, y0: 2, x1: 10, y1: 10 }, BLACK);
    assert_eq!(r.pixel(3, 3), Some(BLACK));
    assert_eq!(r.pixel(1, 1), Some(WHITE));
    assert_eq!(r.pixel(4, 4), None);
}

#[test]
fn test_pixelate_averages_blocks() {
    let mut r = checkerboard(4, 4);
    r.pixelate(PixelRect { x0: 0, y0: 0, x1: 4, y1: 4 }, 2);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(r.pixel(x, y), Some([127, 127, 127]));
        }
    }
}

#[test]
fn test_pixelate_outside_region_untouched() {
    let mut r = checkerboard(6, 6);
    r.pixelate(PixelRect { x0: 0, y0: 0, x1: 2, y1: 2 }, 2);
    assert_eq!(r.pixel(4, 4), Some(BLACK));
    assert_eq!(r.pixel(5, 4), Some(WHITE));
}

#[test]
fn test_blur_smooths_region_only() {
    let mut r = checkerboard(20, 20);
    r.gaussian_blur(PixelRect { x0: 0, y0: 0, x1: 10, y1: 10 }, 2.0);
    let p = r.pixel(5, 5).unwrap();
    assert!(p[0] > 60 && p[0] < 200, "blurred pixel {:?}", p);
    assert_eq!(r.pixel(15, 15), Some(BLACK));
    assert_eq!(r.pixel(16, 15), Some(WHITE));
}

#[test]
fn test_blur_uniform_region_unchanged() {
    let mut r = Raster::new(8, 8, [40, 80, 120]);
    r.gaussian_blur(PixelRect { x0: 0, y0: 0, x1: 8, y1: 8 }, 3.0);
    assert_eq!(r.pixel(4, 4), Some([40, 80, 120]));
}

#[test]
fn test_from_bbox_scales_and_clamps() {
    let bbox = BoundingBox::new(10.0, 10.0, 20.0, 5.0);
    let rect = PixelRect::from_bbox(&bbox, 2.0, 50, 25);
    assert_eq!(rect, PixelRect { x0: 20, y0: 20, x1: 50, y1: 25 });

    let negative = BoundingBox::new(-5.0, -5.0, 3.0, 3.0);
    assert!(PixelRect::from_bbox(&negative, 1.0, 50, 50).is_empty());
}

#[test]
fn test_draw_text_marks_pixels() {
    let mut r = Raster::new(40, 10, WHITE);
    r.draw_text(1, 1, "A1", 1, BLACK);
    let dark = r.to_rgb().chunks(3).filter(|p| p[0] == 0).count();
    assert!(dark > 10);
    assert_eq!(text_width(2, 1), 11);
    assert_eq!(text_height(2), 14);
}
