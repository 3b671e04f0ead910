use mandelzoom_core::{
    budget_for, BorderInsets, Complex, Mandelbrot, PlaneWindow, Viewport, MAX_ZOOM,
};

/// Iterate every pixel of a viewport and collect the counts into a flat Vec.
fn render_grid(engine: &Mandelbrot, viewport: &Viewport) -> Vec<u32> {
    let mut results = Vec::with_capacity((viewport.width() * viewport.height()) as usize);
    for py in 0..viewport.height() {
        for px in 0..viewport.width() {
            results.push(engine.iterate(viewport.pixel_to_complex(px, py)));
        }
    }
    results
}

#[test]
fn headless_initial_view() {
    let viewport = Viewport::new(PlaneWindow::INITIAL, 100, 50, BorderInsets::default()).unwrap();
    let engine = Mandelbrot::new(budget_for(1.0));

    let results = render_grid(&engine, &viewport);
    assert_eq!(results.len(), 100 * 50);

    let interior = results.iter().filter(|&&n| engine.is_interior(n)).count();
    let escaped = results.len() - interior;
    assert!(escaped > 0, "should have some escaped points");
    assert!(interior > 0, "should have some interior points");

    // The top-left corner (-2 + i) lies well outside the set.
    assert!(results[0] < 3);
}

#[test]
fn headless_render_is_deterministic() {
    let window = PlaneWindow::centered(Complex::new(-0.745, 0.186), 4.0, 2.0, 500.0).unwrap();
    let viewport = Viewport::new(window, 80, 40, BorderInsets::default()).unwrap();
    let engine = Mandelbrot::new(budget_for(500.0));

    let run1 = render_grid(&engine, &viewport);
    let run2 = render_grid(&engine, &viewport);
    assert_eq!(run1, run2, "two identical renders must produce identical results");
}

#[test]
fn deep_window_is_still_representable_at_ceiling() {
    let window = PlaneWindow::centered(Complex::new(-0.743643887, 0.131825904), 4.0, 2.0, MAX_ZOOM)
        .unwrap();
    let viewport = Viewport::new(window, 64, 32, BorderInsets::default()).unwrap();
    let a = viewport.pixel_to_complex(0, 0);
    let b = viewport.pixel_to_complex(1, 0);
    assert!(b.re > a.re, "adjacent pixels must map to distinct plane points");
}

#[test]
fn plane_window_deserializes_with_validation() {
    let ok: PlaneWindow =
        serde_json::from_str(r#"{"x_min":-1.5,"x_max":0.5,"y_min":-1.0,"y_max":1.0}"#).unwrap();
    assert_eq!(ok.x_range(), 2.0);

    let bad = serde_json::from_str::<PlaneWindow>(
        r#"{"x_min":1.0,"x_max":-1.0,"y_min":-1.0,"y_max":1.0}"#,
    );
    assert!(bad.is_err(), "inverted bounds must be rejected on load");
}

#[test]
fn plane_window_serialization_round_trips() {
    let window = PlaneWindow::centered(Complex::new(0.25, -0.5), 4.0, 2.0, 8.0).unwrap();
    let json = serde_json::to_string(&window).unwrap();
    let back: PlaneWindow = serde_json::from_str(&json).unwrap();
    assert_eq!(window, back);
}
