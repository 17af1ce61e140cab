use fm_halftone::{
    apply_halftone_file, load_buffer, EditorSession, HalftoneConfig, HalftoneParams, RasterBuffer,
    Region, Scope,
};
use image::{Rgba, RgbaImage};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fm-halftone-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_gradient(path: &PathBuf, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / width.max(1)) as u8;
        Rgba([v, v, v, 255])
    });
    img.save(path).unwrap();
}

#[test]
fn load_scales_down_wide_images() {
    let dir = scratch_dir("load");
    let path = dir.join("wide.png");
    write_gradient(&path, 40, 10);

    let full = load_buffer(&path, None).unwrap();
    assert_eq!((full.width(), full.height()), (40, 10));

    let scaled = load_buffer(&path, Some(20)).unwrap();
    assert_eq!((scaled.width(), scaled.height()), (20, 5));

    let untouched = load_buffer(&path, Some(100)).unwrap();
    assert_eq!(untouched, full);

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn missing_file_is_an_image_error() {
    let result = load_buffer("/definitely/not/here.png", None);
    assert!(matches!(result, Err(fm_halftone::HalftoneError::Image(_))));
}

#[test]
fn file_round_trip_produces_gray_output() {
    let dir = scratch_dir("file");
    let input = dir.join("in.png");
    let output = dir.join("out.png");
    write_gradient(&input, 24, 16);

    let config = HalftoneConfig {
        params: HalftoneParams {
            min_dot_size: 4,
            max_dot_size: 8,
            ..Default::default()
        },
        seed: Some(5),
        verbose: false,
    };
    let report = apply_halftone_file(&input, &output, None, config).unwrap();
    assert!(report.total_tiles() > 0);

    let result = load_buffer(&output, None).unwrap();
    assert_eq!((result.width(), result.height()), (24, 16));
    for y in 0..16 {
        for x in 0..24 {
            let [r, g, b, a] = result.pixel(x, y);
            assert_eq!(a, 255);
            assert!(r == g && g == b);
        }
    }

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn session_save_and_reset() {
    let dir = scratch_dir("session");
    let output = dir.join("session.png");

    let source = RasterBuffer::from_fn(16, 16, |x, y| {
        let v = ((x + y) * 8) as u8;
        [v, v, v, 255]
    });
    let mut session = EditorSession::from_buffer(source.clone());
    let engine = fm_halftone::HalftoneEngine::new(HalftoneConfig::default()).unwrap();

    assert!(session.select((2.0, 2.0), (12.0, 12.0)));
    assert_eq!(session.selection(), Some(Region::new(2, 2, 10, 10)));
    session.apply(Scope::Selection, &engine).unwrap();
    session.save(&output).unwrap();

    let saved = load_buffer(&output, None).unwrap();
    assert_eq!(&saved, session.current());

    session.reset();
    assert_eq!(session.current(), &source);

    std::fs::remove_dir_all(dir).ok();
}
