//! End-to-end scenarios through mask generation and the compositor.
//!
//! Run with: `cargo test -p iris-core`

use iris_core::grading::apply_local_adjustments;
use iris_core::mask::{BrushBitmap, process_mask};
use iris_core::params::{
    CircularSettings, LayerAdjustments, LinearSettings, LocalAdjustments, MaskShape, Point2D,
};
use iris_core::{Dimensions, Layer, Mask, MaskLayer, MaskStack, Raster, RenderOptions};

const EPSILON: f32 = 1e-4;

/// 4x4 test gradient: red ramps across, green ramps down.
fn create_test_gradient() -> Raster {
    let mut data = Vec::with_capacity(4 * 4 * 4);
    for y in 0..4u8 {
        for x in 0..4u8 {
            data.extend_from_slice(&[x * 80, y * 80, 128, 255]);
        }
    }
    Raster::from_rgba(4, 4, data).expect("valid raster")
}

fn circle(radius: f32, outer_feather: f32) -> Mask {
    Mask::new(MaskShape::Circular(CircularSettings {
        center: Point2D::new(0.5, 0.5),
        radius,
        inner_feather: 0.0,
        outer_feather,
    }))
}

fn assert_alpha(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "alpha length");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < EPSILON, "alpha[{i}]: got {a}, expected {e}");
    }
}

#[test]
fn test_circle_covering_small_image_is_opaque() {
    let alpha = process_mask(&circle(1.0, 0.0), None, Dimensions::new(2, 2));
    assert_alpha(alpha.values(), &[1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_vertical_linear_gradient_on_column() {
    let mask = Mask::new(MaskShape::Linear(LinearSettings {
        start: Point2D::new(0.5, 0.0),
        end: Point2D::new(0.5, 1.0),
        ..Default::default()
    }));
    let alpha = process_mask(&mask, None, Dimensions::new(1, 4));
    assert_alpha(alpha.values(), &[0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]);
}

#[test]
fn test_circle_decreases_outside_radius() {
    let alpha = process_mask(&circle(0.3, 20.0), None, Dimensions::new(101, 101));
    let row: Vec<f32> = (50..101).map(|x| alpha.get(x, 50)).collect();
    assert!((row[0] - 1.0).abs() < EPSILON, "center is fully selected");
    assert!(
        row.windows(2).all(|w| w[1] <= w[0]),
        "alpha must not increase moving away from the center"
    );
    assert_eq!(row[50], 0.0, "image edge is outside the feather");
}

#[test]
fn test_default_refinement_leaves_alpha_untouched() {
    let mask = circle(0.3, 20.0);
    let dims = Dimensions::new(21, 13);
    let raw = iris_core::mask::generate(&mask, None, dims);
    let refined = process_mask(&mask, None, dims);
    assert_alpha(refined.values(), raw.values());
}

#[test]
fn test_global_controls_fold_into_alpha() {
    let dims = Dimensions::new(3, 3);

    let mut half = circle(2.0, 0.0);
    half.global.opacity = 0.5;
    assert_alpha(process_mask(&half, None, dims).values(), &[0.5; 9]);

    let mut inverted = circle(2.0, 0.0);
    inverted.global.inverted = true;
    assert_alpha(process_mask(&inverted, None, dims).values(), &[0.0; 9]);
}

#[test]
fn test_brush_bitmap_drives_alpha() {
    let rgba = vec![0, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 51];
    let bitmap = BrushBitmap::new(2, 2, rgba).expect("valid bitmap");

    let blob = bitmap.encode();
    let restored = BrushBitmap::decode(&blob).expect("blob decodes");
    assert_eq!(restored, bitmap);

    let mut mask = Mask::brush();
    if let MaskShape::Brush(settings) = &mut mask.shape {
        settings.bitmap = Some(restored);
    }
    let alpha = process_mask(&mask, None, Dimensions::new(2, 2));
    assert_alpha(alpha.values(), &[1.0, 0.0, 0.0, 0.2]);
}

#[test]
fn test_brush_without_bitmap_selects_nothing() {
    let alpha = process_mask(&Mask::brush(), None, Dimensions::new(5, 5));
    assert!(alpha.is_empty_below(EPSILON));
}

#[test]
fn test_empty_stacks_return_input_bytes() {
    let source = create_test_gradient();
    let out = iris_core::render_bytes(
        source.as_bytes(),
        4,
        4,
        &[],
        &[],
        &RenderOptions::default(),
    )
    .expect("renders");
    assert_eq!(out, source.as_bytes());
}

#[test]
fn test_zero_opacity_layer_is_identity() {
    let source = create_test_gradient();
    let mut layer = Layer::color(0);
    layer.opacity = 0.0;
    if let LayerAdjustments::Color { color, .. } = &mut layer.adjustments {
        color.exposure = 180.0;
        color.saturation = 0.0;
    }
    let out = iris_core::render(&source, &[layer], &[], &RenderOptions::default())
        .expect("renders");
    assert_eq!(out, source);
}

#[test]
fn test_default_color_layer_is_identity() {
    let source = create_test_gradient();
    let out = iris_core::render(&source, &[Layer::color(0)], &[], &RenderOptions::default())
        .expect("renders");
    assert_eq!(out, source);
}

#[test]
fn test_neutral_local_adjustments_are_identity() {
    let source = create_test_gradient();
    let layer = MaskLayer::new(circle(2.0, 0.0));
    let out = iris_core::render(&source, &[], &[layer], &RenderOptions::default())
        .expect("renders");
    assert_eq!(out, source);
}

#[test]
fn test_mask_layers_follow_stack_order() {
    let source = create_test_gradient();
    let brighten = LocalAdjustments {
        exposure: 40.0,
        ..Default::default()
    };
    let punch = LocalAdjustments {
        contrast: 60.0,
        ..Default::default()
    };

    let mut stack = MaskStack::new();
    stack.add(MaskLayer::new(circle(2.0, 0.0)).with_adjustments(brighten));
    stack.add(MaskLayer::new(circle(2.0, 0.0)).with_adjustments(punch));

    let full = process_mask(&circle(2.0, 0.0), None, source.dimensions());
    let bright_then_punch = apply_local_adjustments(
        &apply_local_adjustments(&source, &full, &brighten),
        &full,
        &punch,
    );
    let punch_then_bright = apply_local_adjustments(
        &apply_local_adjustments(&source, &full, &punch),
        &full,
        &brighten,
    );

    let opts = RenderOptions::default();
    let out = iris_core::render(&source, &[], stack.layers(), &opts).expect("renders");
    assert_eq!(out, bright_then_punch);

    stack.reorder(1, 0).expect("in range");
    let orders: Vec<i32> = stack.iter().map(|l| l.mask.order).collect();
    assert_eq!(orders, vec![0, 1], "orders resync to positions");
    let out = iris_core::render(&source, &[], stack.layers(), &opts).expect("renders");
    assert_eq!(out, punch_then_bright);
}

#[test]
fn test_stack_document_parses_from_json() {
    let json = r##"{
        "id": "layer-1",
        "name": "Sky",
        "visible": true,
        "mask": {
            "id": "mask-1",
            "name": "Linear",
            "global": { "opacity": 1.0, "inverted": false, "enabled": true, "density": 100.0 },
            "refinement": { "feather": 0, "softness": 0, "falloff": 50, "edgeBlur": 0, "expansion": 0 },
            "shape": {
                "type": "linear",
                "start": { "x": 0.5, "y": 0.0 },
                "end": { "x": 0.5, "y": 1.0 },
                "gradientType": "linear",
                "midpoint": 0.5
            },
            "order": 0,
            "previewColor": "#dda0dd"
        },
        "adjustments": {
            "exposure": 0, "contrast": 0, "saturation": 0, "temperature": 0,
            "hue": 0, "shadows": 0, "highlights": 0, "sharpness": 0
        }
    }"##;
    let layer: MaskLayer = serde_json::from_str(json).expect("valid mask layer");
    assert_eq!(layer.mask.shape, MaskShape::Linear(LinearSettings::default()));
    assert!(layer.adjustments.is_neutral());
}
