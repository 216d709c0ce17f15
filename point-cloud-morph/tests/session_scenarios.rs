use std::io::Cursor;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use point_cloud_morph::{
    InputEvent, MorphConfig, MorphSession, PointerClass, PressTarget, SessionEvent,
};

const N: usize = 2_000;

fn session() -> MorphSession {
    MorphSession::new(MorphConfig {
        particle_count: N,
        rng_seed: Some(42),
        ..MorphConfig::default()
    })
    .unwrap()
}

fn png_bytes(image: RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn touch(x: f32) -> [f32; 2] {
    [x, 300.0]
}

#[test]
fn scrolling_to_the_end_reveals_and_spins() {
    let mut s = session();
    s.set_scroll_progress(0.5);
    assert_eq!(s.frame_params().mix, 0.5);
    assert!(s.take_events().is_empty());

    s.set_scroll_progress(1.0);
    assert_eq!(s.take_events(), vec![SessionEvent::RevealedChanged(true)]);

    let spin = s.frame_params().spin_y;
    s.advance_frame();
    s.advance_frame();
    assert!(s.frame_params().spin_y > spin);

    s.set_scroll_progress(0.2);
    assert_eq!(s.take_events(), vec![SessionEvent::RevealedChanged(false)]);
    assert!(!s.revealed());
}

#[test]
fn uploaded_image_survives_chunk_changes() {
    let mut s = session();
    let mut image = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
    image.put_pixel(15, 5, Rgba([0, 128, 255, 255]));

    assert!(s.upload_image_bytes(&png_bytes(image)));
    assert!(s.frame_params().use_vertex_color);
    let target = s.particles().target.clone();
    let colors = s.particles().colors.clone();
    assert_eq!(target.len(), N);
    assert!(target.iter().all(|p| *p == target[0]));
    assert!((target[0][0] - 0.25).abs() < 1e-6);
    assert!((target[0][1] - 0.25).abs() < 1e-6);

    let source_before = s.particles().source.clone();
    assert!(s.increment_chunks());
    assert_ne!(s.particles().source, source_before);
    assert_eq!(s.particles().target, target);
    assert_eq!(s.particles().colors, colors);
}

#[test]
fn background_only_image_keeps_layout() {
    let mut s = session();
    let before = s.particles().clone();
    let white = RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255]));
    assert!(!s.upload_image_bytes(&png_bytes(white)));
    assert_eq!(s.particles(), &before);
    assert!(!s.take_events().contains(&SessionEvent::ImageApplied));
}

#[test]
fn swipes_step_chunks_on_release() {
    let mut s = session();
    let start = s.chunk_count();

    s.handle_input(InputEvent::PointerDown {
        class: PointerClass::Touch,
        target: PressTarget::Canvas,
        position: touch(200.0),
        touches: 1,
    });
    s.handle_input(InputEvent::PointerUp {
        class: PointerClass::Touch,
        position: touch(249.0),
    });
    assert_eq!(s.chunk_count(), start);

    s.handle_input(InputEvent::PointerDown {
        class: PointerClass::Touch,
        target: PressTarget::Canvas,
        position: touch(200.0),
        touches: 1,
    });
    s.handle_input(InputEvent::PointerUp {
        class: PointerClass::Touch,
        position: touch(250.0),
    });
    assert_eq!(s.chunk_count(), start + 1);

    s.handle_input(InputEvent::PointerDown {
        class: PointerClass::Mouse,
        target: PressTarget::Canvas,
        position: touch(400.0),
        touches: 1,
    });
    s.handle_input(InputEvent::PointerUp {
        class: PointerClass::Mouse,
        position: touch(100.0),
    });
    assert_eq!(s.chunk_count(), start);
}

#[test]
fn holding_a_button_repeats_until_release() {
    let mut s = session();
    let start = s.chunk_count();

    s.handle_input(InputEvent::ButtonDown { step: 1 });
    assert_eq!(s.chunk_count(), start + 1);

    for _ in 0..30 {
        s.advance_time(Duration::from_millis(16));
    }
    // 480 ms held: one repeat after the initial tick.
    assert_eq!(s.chunk_count(), start + 2);

    s.handle_input(InputEvent::ButtonUp);
    s.advance_time(Duration::from_secs(2));
    assert_eq!(s.chunk_count(), start + 2);
}

#[test]
fn holding_past_the_maximum_clamps() {
    let mut s = session();
    s.handle_input(InputEvent::ButtonDown { step: 1 });
    s.advance_time(Duration::from_secs(10));
    assert_eq!(s.chunk_count(), 20);

    let events = s.take_events();
    assert_eq!(events.last(), Some(&SessionEvent::ChunkCountChanged(20)));
}

#[test]
fn point_list_applies_like_an_image() {
    let mut s = session();
    assert!(s.apply_point_list_json(r#"{"points": [[0.1, 0.2, 0.0, 1, 0, 0], [0.3, 0.4, 0.0, 0, 1, 0]]}"#));
    let particles = s.particles();
    assert_eq!(particles.target[0], [0.1, 0.2, 0.0]);
    assert_eq!(particles.target[3], [0.3, 0.4, 0.0]);
    assert_eq!(particles.colors[2], [1.0, 0.0, 0.0]);
    assert_eq!(s.take_events(), vec![SessionEvent::ImageApplied]);
}

#[test]
fn seeded_sessions_sample_identically() {
    let mut image = RgbaImage::from_pixel(24, 24, Rgba([0, 0, 0, 0]));
    for x in 4..20 {
        image.put_pixel(x, 12, Rgba([x as u8 * 10, 90, 30, 255]));
    }
    let bytes = png_bytes(image);

    let mut a = session();
    let mut b = session();
    assert!(a.upload_image_bytes(&bytes));
    assert!(b.upload_image_bytes(&bytes));
    assert_eq!(a.particles(), b.particles());
}
