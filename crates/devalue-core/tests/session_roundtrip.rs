use devalue_core::effect::{GAMMA, INTENSITY, TARGET_LUMA, TARGET_VALUE};
use devalue_core::{
    BitDepth, Compositor, EffectPreset, EffectRegistry, GradingSession, RasterImage, Viewport,
};

fn write_source_png(dir: &std::path::Path, width: u32, height: u32) -> std::path::PathBuf {
    let bytes: Vec<u8> = (0..width * height)
        .flat_map(|i| {
            let x = (i % width) as u8;
            let y = (i / width) as u8;
            [x.wrapping_mul(37), y.wrapping_mul(53), 128, 255]
        })
        .collect();
    let image = RasterImage::from_rgba8(width, height, &bytes).unwrap();
    let path = dir.join("source.png");
    devalue_core::io::save(&image, &path).unwrap();
    path
}

#[test]
fn load_preview_export_reload() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_png(dir.path(), 6, 4);

    let mut session = GradingSession::new(EffectRegistry::new(), Viewport::new(800, 600)).unwrap();
    let loaded = session.load_image(&source).unwrap();
    assert_eq!(loaded.image.source_bit_depth(), BitDepth::U8);
    assert_eq!(loaded.source.as_deref(), Some(source.as_path()));

    session.select_effect("Deluma in YUV space").unwrap();
    session.set_parameter_by_key(INTENSITY, 0.6);
    session.set_parameter_by_key(TARGET_LUMA, 0.2);
    session.set_parameter_by_key(GAMMA, 1.5);

    let mut compositor = Compositor::cpu();
    let frame = session.preview(&mut compositor).unwrap();
    assert_eq!(frame.fit.scale, 1.0);

    let out_path = dir.path().join("graded.png");
    let exported = session.export(&compositor, &out_path).unwrap();
    assert_eq!(exported.pixels(), frame.image.pixels());

    let reloaded = devalue_core::io::load(&out_path).unwrap();
    assert_eq!(reloaded.dimensions(), (6, 4));
    assert_eq!(reloaded.source_bit_depth(), BitDepth::U8);
    assert_eq!(reloaded.to_rgba8(), exported.to_rgba8());
}

#[test]
fn preset_survives_json_and_restores_values() {
    let mut session = GradingSession::new(EffectRegistry::new(), Viewport::new(640, 480)).unwrap();
    session.select_effect("Devalue in HSV space").unwrap();
    session.set_parameter_by_key(INTENSITY, 0.25);
    session.set_parameter_by_key(TARGET_VALUE, 0.75);

    let json = session.effect().to_preset().to_json().unwrap();
    session.select_effect("Devalue in RGB space").unwrap();

    let preset = EffectPreset::from_json(&json).unwrap();
    let effect = session.apply_preset(&preset).unwrap();
    assert_eq!(effect.name(), "Devalue in HSV space");
    assert_eq!(effect.parameters().value(INTENSITY), Some(0.25));
    assert_eq!(effect.parameters().value(TARGET_VALUE), Some(0.75));
}

#[test]
fn large_image_preview_is_downscaled_but_export_is_native() {
    let dir = tempfile::tempdir().unwrap();
    let pixels = vec![[0.8, 0.4, 0.2, 1.0]; 1600 * 400];
    let image = RasterImage::new(1600, 400, pixels, BitDepth::F32).unwrap();

    let mut session = GradingSession::new(EffectRegistry::new(), Viewport::new(800, 600)).unwrap();
    session.set_image(image);

    let mut compositor = Compositor::default();
    let frame = session.preview(&mut compositor).unwrap();
    assert_eq!(frame.fit.scale, 0.5);
    assert_eq!(frame.fit.translate_y, 200.0);

    let exported = session.export(&compositor, &dir.path().join("wide.png")).unwrap();
    assert_eq!(exported.dimensions(), (1600, 400));

    let reloaded = devalue_core::io::load(&dir.path().join("wide.png")).unwrap();
    assert_eq!(reloaded.source_bit_depth(), BitDepth::U16);
}
