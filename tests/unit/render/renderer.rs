use std::{collections::HashMap, io::Cursor, sync::Arc, time::Duration};

use super::*;
use crate::{
    assets::{source::FrameSource, store::StoreOpts, template::FrameTemplate},
    foundation::error::{ReelError, ReelResult},
    render::surface::CpuSurface,
    scroll::select::select,
};

const CLEAR: [u8; 4] = [0, 0, 0, 255];

struct MemSource {
    files: HashMap<String, Vec<u8>>,
}

impl FrameSource for MemSource {
    fn fetch(&self, path: &str) -> ReelResult<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ReelError::asset(format!("404 {path}")))
    }
}

fn png(w: u32, h: u32, rgb: [u8; 3]) -> Vec<u8> {
    let px = [rgb[0], rgb[1], rgb[2], 255];
    let img = image::RgbaImage::from_raw(w, h, px.repeat((w * h) as usize)).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Frame `i` is a 4x2 image whose red channel encodes `i + 1`.
fn loaded_store(n: u32, missing: &[usize]) -> FrameStore {
    let template = FrameTemplate::new("f{index}.png", 0, n - 1, 4).unwrap();
    let files = (0..n as usize)
        .filter(|i| !missing.contains(i))
        .map(|i| (template.path_for(i), png(4, 2, [(i + 1) as u8, 10, 20])))
        .collect();
    let mut store =
        FrameStore::initialize(&template, Arc::new(MemSource { files }), StoreOpts::default())
            .unwrap();
    store.preload(n as usize);
    store.pump_until(Duration::from_secs(20), |s| {
        s.ready_count() + s.failed_count() == s.len()
    });
    store
}

fn renderer(vp: (u32, u32), crossfade: bool) -> FrameRenderer<CpuSurface> {
    let mut r = FrameRenderer::new(RenderOpts {
        cover_margin: 1.0,
        crossfade,
        clear_rgba: CLEAR,
    });
    r.attach_surface(CpuSurface::new(Viewport::new(vp.0, vp.1).unwrap()).unwrap());
    r
}

fn assert_fully_covered(surface: &CpuSurface) {
    let vp = surface.viewport();
    for y in 0..vp.height {
        for x in 0..vp.width {
            let px = surface.pixel(x, y).unwrap();
            assert_ne!(px, CLEAR, "unpainted pixel at {x},{y} of {vp}");
        }
    }
}

#[test]
fn draws_selected_frame_covering_surface() {
    let mut store = loaded_store(3, &[]);
    let mut r = renderer((8, 8), false);
    let out = r.render(select(0.5, 3).unwrap(), &mut store).unwrap();
    assert_eq!(
        out,
        RenderOutcome::Drawn {
            index: 1,
            blended_with: None
        }
    );
    let s = r.surface().unwrap();
    assert_eq!(s.pixel(0, 0), Some([2, 10, 20, 255]));
    assert_fully_covered(s);
}

#[test]
fn identical_selection_is_not_redrawn() {
    let mut store = loaded_store(3, &[]);
    let mut r = renderer((4, 4), true);
    let sel = select(0.25, 3).unwrap();
    assert!(matches!(r.render(sel, &mut store).unwrap(), RenderOutcome::Drawn { .. }));
    assert_eq!(r.render(sel, &mut store).unwrap(), RenderOutcome::Unchanged);
    let other = select(0.3, 3).unwrap();
    assert!(matches!(r.render(other, &mut store).unwrap(), RenderOutcome::Drawn { .. }));
}

#[test]
fn failed_frame_falls_back_to_last_good() {
    let mut store = loaded_store(100, &[50]);
    let mut r = renderer((6, 4), false);

    let at_49 = FrameSelection {
        index: 49,
        next_index: 50,
        blend: 0.0,
    };
    r.render(at_49, &mut store).unwrap();

    let at_50 = FrameSelection {
        index: 50,
        next_index: 51,
        blend: 0.0,
    };
    let out = r.render(at_50, &mut store).unwrap();
    assert_eq!(
        out,
        RenderOutcome::Fallback {
            requested: 50,
            drawn: 49
        }
    );
    assert_eq!(r.surface().unwrap().pixel(3, 2), Some([50, 10, 20, 255]));
    assert_eq!(r.last_good_index(), Some(49));
}

#[test]
fn nothing_loaded_shows_placeholder() {
    let mut store = loaded_store(2, &[0, 1]);
    let mut r = renderer((2, 2), true);
    let out = r.render(FrameSelection::FIRST, &mut store).unwrap();
    assert_eq!(out, RenderOutcome::Placeholder);
    assert_eq!(r.surface().unwrap().pixel(1, 1), Some(CLEAR));
}

#[test]
fn crossfade_blends_toward_next_frame() {
    let mut store = loaded_store(2, &[]);
    let mut r = renderer((2, 2), true);
    let sel = FrameSelection {
        index: 0,
        next_index: 1,
        blend: 0.5,
    };
    let out = r.render(sel, &mut store).unwrap();
    assert_eq!(
        out,
        RenderOutcome::Drawn {
            index: 0,
            blended_with: Some(1)
        }
    );
    // red 1 and 2 at half coverage rounds to either neighbor
    let px = r.surface().unwrap().pixel(0, 0).unwrap();
    assert!((1..=2).contains(&px[0]));
    assert_eq!(px[3], 255);
}

#[test]
fn missing_surface_defers_until_attached() {
    let mut store = loaded_store(2, &[]);
    let mut r: FrameRenderer<CpuSurface> = FrameRenderer::new(RenderOpts::default());
    let sel = FrameSelection::FIRST;
    assert_eq!(r.render(sel, &mut store).unwrap(), RenderOutcome::Deferred);
    assert!(r.has_pending_draw());

    r.attach_surface(CpuSurface::new(Viewport::new(3, 3).unwrap()).unwrap());
    assert!(matches!(r.render(sel, &mut store).unwrap(), RenderOutcome::Drawn { index: 0, .. }));
    assert!(!r.has_pending_draw());
}

#[test]
fn resize_redraws_last_selection_at_new_size() {
    let mut store = loaded_store(4, &[]);
    let mut r = renderer((1920, 1080), true);
    let sel = select(0.5, 4).unwrap();
    r.render(sel, &mut store).unwrap();

    let out = r
        .resize(Viewport::new(800, 600).unwrap(), &mut store)
        .unwrap();
    assert!(matches!(out, RenderOutcome::Drawn { index: 1, .. }));
    let s = r.surface().unwrap();
    assert_eq!(s.viewport(), Viewport::new(800, 600).unwrap());
    assert_fully_covered(s);
}

#[test]
fn placeholder_for_empty_sequence() {
    let mut r = renderer((2, 2), true);
    assert_eq!(r.render_placeholder().unwrap(), RenderOutcome::Placeholder);
    assert_eq!(r.render_placeholder().unwrap(), RenderOutcome::Unchanged);
}

#[test]
fn first_frame_stands_in_before_anything_was_drawn() {
    let mut store = loaded_store(10, &[]);
    let mut r = renderer((4, 4), false);
    let sel = FrameSelection {
        index: 7,
        next_index: 8,
        blend: 0.0,
    };
    // Simulate the selected frame not being resident yet.
    let mut partial = loaded_store(10, &[7]);
    let out = r.render(sel, &mut partial).unwrap();
    assert_eq!(
        out,
        RenderOutcome::Fallback {
            requested: 7,
            drawn: 0
        }
    );
    assert_eq!(r.last_good_index(), None);
    assert_eq!(r.surface().unwrap().pixel(2, 2), Some([1, 10, 20, 255]));

    assert!(matches!(
        r.render(sel, &mut store).unwrap(),
        RenderOutcome::Drawn { index: 7, .. }
    ));
}
