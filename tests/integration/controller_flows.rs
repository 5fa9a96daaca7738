//! Controller intent flows against a file-backed store.

use devkeep::device::DeviceName;
use devkeep::error::DkError;
use devkeep::store::DeviceStore;
use devkeep::view::ViewController;
use tempfile::TempDir;

use crate::common::fixtures::TestInputs;
use crate::common::init_test_logging;

fn controller() -> (TempDir, ViewController) {
    let dir = TempDir::new().unwrap();
    let store = DeviceStore::open(dir.path().join("devices.db")).unwrap();
    (dir, ViewController::new(store))
}

#[test]
fn projection_always_reflects_store() {
    init_test_logging();
    let (_dir, ctl) = controller();

    let before = ctl.show(DeviceName::Cameras).unwrap();
    assert_eq!(
        before.text_content.as_deref(),
        Some(DeviceName::Cameras.default_text())
    );

    let after = ctl.edit_text(DeviceName::Cameras, "new projection").unwrap();
    assert_eq!(after.text_content.as_deref(), Some("new projection"));
    assert!(after.last_updated >= before.last_updated);
}

#[test]
fn text_import_flow_trims_and_persists() {
    init_test_logging();
    let (_dir, ctl) = controller();
    let inputs = TestInputs::new();
    let file = inputs.text_file("specs.txt", "Диапазон: 0–120 °C\n\n");

    let view = ctl.import_text_file(DeviceName::Thermometer, &file).unwrap();
    assert_eq!(view.text_content.as_deref(), Some("Диапазон: 0–120 °C"));
}

#[test]
fn image_import_then_view_flow() {
    init_test_logging();
    let (_dir, mut ctl) = controller();
    let inputs = TestInputs::new();
    let file = inputs.image_file("cam.png", 700, 300);

    let record = ctl.import_image_file(DeviceName::Cameras, &file).unwrap();
    assert!(record.has_image);

    let rendered = ctl.view_image(DeviceName::Cameras, 350, 250).unwrap();
    assert_eq!((rendered.source_width, rendered.source_height), (700, 300));
    assert!(rendered.width <= 350);
    assert!(rendered.height <= 250);
}

#[test]
fn corrupt_blob_surfaces_decode_error_without_losing_state() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let store = DeviceStore::open(dir.path().join("devices.db")).unwrap();
    store
        .set_image(DeviceName::Cameras, b"not an image at all", None)
        .unwrap();
    let mut ctl = ViewController::new(store);

    let err = ctl.view_image(DeviceName::Cameras, 350, 250).unwrap_err();
    assert!(matches!(err, DkError::ImageDecode(_)));

    // The stored record is untouched by the failed display attempt
    let record = ctl.show(DeviceName::Cameras).unwrap();
    assert!(record.has_image);
    assert_eq!(record.image_bytes, Some("not an image at all".len()));
}

#[test]
fn factory_reset_clears_text_and_images() {
    init_test_logging();
    let (_dir, mut ctl) = controller();
    let inputs = TestInputs::new();
    let file = inputs.image_file("pic.png", 16, 16);

    ctl.edit_text(DeviceName::MotionSensor, "dirty").unwrap();
    ctl.import_image_file(DeviceName::MotionSensor, &file).unwrap();

    ctl.factory_reset().unwrap();

    let view = ctl.show(DeviceName::MotionSensor).unwrap();
    assert_eq!(
        view.text_content.as_deref(),
        Some(DeviceName::MotionSensor.default_text())
    );
    assert!(!view.has_image);
}
