//! Test suite for the Web and headless browsers.

#![cfg(target_arch = "wasm32")]

extern crate wasm_bindgen_test;
use particle_field_background::{preset_config, CanvasSurface, FieldConfig, ParticleBackground, ParticleField};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn mounts_a_background_canvas() {
    let background = ParticleBackground::new(None).unwrap();
    let canvas = document().get_element_by_id("particle-canvas").unwrap();
    assert_eq!(canvas.tag_name().to_lowercase(), "canvas");
    assert_eq!(background.particle_count(), FieldConfig::default().particle_count);
    drop(background);
    assert!(document().get_element_by_id("particle-canvas").is_none());
}

#[wasm_bindgen_test]
fn attach_reads_json_config() {
    let canvas = document()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_id("attached");
    document().body().unwrap().append_child(&canvas).unwrap();

    let background =
        ParticleBackground::attach("attached", Some(r#"{"particle_count": 12}"#.to_owned())).unwrap();
    assert_eq!(background.particle_count(), 12);
    drop(background);
    // attached canvases belong to the page
    assert!(document().get_element_by_id("attached").is_some());
    canvas.remove();
}

#[wasm_bindgen_test]
fn rejects_missing_canvas_and_bad_config() {
    assert!(ParticleBackground::attach("no-such-canvas", None).is_err());
    assert!(ParticleBackground::new(Some(r#"{"particle_count": 100000}"#.to_owned())).is_err());
    assert!(preset_config("interactive").is_ok());
    assert!(preset_config("nope").is_err());
}

#[wasm_bindgen_test]
fn start_and_stop_are_idempotent() {
    let mut background = ParticleBackground::new(None).unwrap();
    assert!(!background.is_running());
    background.start().unwrap();
    background.start().unwrap();
    assert!(background.is_running());
    background.stop();
    background.stop();
    assert!(!background.is_running());
}

#[wasm_bindgen_test]
fn draws_onto_a_real_2d_context() {
    let canvas = document()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(100);
    canvas.set_height(100);
    let context = canvas
        .get_context("2d")
        .unwrap()
        .unwrap()
        .dyn_into::<CanvasRenderingContext2d>()
        .unwrap();

    let mut surface = CanvasSurface::new(context);
    let mut field = ParticleField::new(FieldConfig::drifting(), 100.0, 100.0);
    field.step(1.0);
    field.render(&mut surface);
}
