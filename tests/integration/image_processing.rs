//! Display rendering of stored blobs across the accepted raster formats.

use devkeep::image_ops::{fit_box, render_preview, FULL_VIEW_BOX, THUMBNAIL_BOX};

use crate::common::fixtures::image_bytes;
use crate::common::init_test_logging;

#[test]
fn renders_every_supported_format() {
    init_test_logging();
    for format in [
        image::ImageFormat::Png,
        image::ImageFormat::Jpeg,
        image::ImageFormat::Bmp,
        image::ImageFormat::Gif,
    ] {
        let bytes = image_bytes(64, 48, format);
        let rendered = render_preview(&bytes, THUMBNAIL_BOX.0, THUMBNAIL_BOX.1)
            .unwrap_or_else(|e| panic!("{format:?} failed: {e}"));
        assert_eq!((rendered.width, rendered.height), (64, 48));
    }
}

#[test]
fn thumbnail_box_matches_reference_build() {
    assert_eq!(THUMBNAIL_BOX, (350, 250));
    assert_eq!(FULL_VIEW_BOX, (550, 400));
}

#[test]
fn large_image_fits_full_view_box() {
    init_test_logging();
    let bytes = image_bytes(1920, 1080, image::ImageFormat::Png);
    let rendered = render_preview(&bytes, FULL_VIEW_BOX.0, FULL_VIEW_BOX.1).unwrap();
    assert!(rendered.width <= FULL_VIEW_BOX.0);
    assert!(rendered.height <= FULL_VIEW_BOX.1);
    assert_eq!((rendered.source_width, rendered.source_height), (1920, 1080));
}

#[test]
fn fit_box_agrees_with_rendering() {
    init_test_logging();
    let bytes = image_bytes(777, 333, image::ImageFormat::Png);
    let expected = fit_box(777, 333, 350, 250);
    let rendered = render_preview(&bytes, 350, 250).unwrap();
    // image::resize rounds the same bound differently by at most one pixel
    assert!(rendered.width.abs_diff(expected.0) <= 1);
    assert!(rendered.height.abs_diff(expected.1) <= 1);
}

#[test]
fn preview_file_is_decodable() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("preview.png");

    let rendered = render_preview(&image_bytes(500, 400, image::ImageFormat::Jpeg), 350, 250).unwrap();
    rendered.save(&out).unwrap();

    let reloaded = image::open(&out).unwrap();
    assert_eq!(reloaded.width(), rendered.width);
    assert_eq!(reloaded.height(), rendered.height);
}
