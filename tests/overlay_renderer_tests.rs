mod support;

use approx::assert_relative_eq;
use climate_chart::api::{ChartHost, HostConfig, LiveChart, RenderingCapability};
use climate_chart::core::{OverlayRegion, PixelRect};
use climate_chart::extensions::{HatchStyle, OverlayOutcome, OverlayRenderer, OverlayTable};
use climate_chart::render::{PathCommand, SceneRenderer, Shape};
use support::{AffineAxis, FakeChart, clipped_group_count};

fn renderer() -> OverlayRenderer {
    OverlayRenderer::new(OverlayRegion::new(4.0, 8.0, 25.0, 5.0), HatchStyle::default())
}

#[test]
fn worked_example_draws_normalized_rect() {
    let mut chart = FakeChart::worked_example();
    let mut table = OverlayTable::default();

    let outcome = renderer().render(&mut chart, &mut table);
    let OverlayOutcome::Drawn {
        group,
        rect,
        line_count,
    } = outcome
    else {
        panic!("expected overlay to be drawn, got {outcome:?}");
    };

    assert_eq!(rect, PixelRect::new(40.0, 75.0, 40.0, 100.0));
    assert_eq!(line_count, 17);
    assert_eq!(table.get(chart.id()), Some(group));

    let scene = chart.scene();
    let background = scene.node(group).expect("group").children[0];
    let background = scene.node(background).expect("background");
    assert_eq!(background.shape, Shape::Rect(rect));
    assert!(background.attributes.fill.is_some());

    assert_eq!(scene.clip_rects().len(), 1);
    assert_eq!(scene.clip_rects().values().next(), Some(&rect));
    assert_eq!(scene.count_kind("path"), 17);
}

#[test]
fn hatch_strokes_run_bottom_left_to_top_right() {
    let mut chart = FakeChart::worked_example();
    let mut table = OverlayTable::default();
    renderer().render(&mut chart, &mut table);

    let scene = chart.scene();
    let first_path = scene
        .paint_order()
        .into_iter()
        .find_map(|id| match &scene.node(id)?.shape {
            Shape::Path(data) => Some(data.clone()),
            _ => None,
        })
        .expect("hatch path");
    assert_eq!(first_path[0], PathCommand::MoveTo(-60.0, 175.0));
    assert_eq!(first_path[1], PathCommand::LineTo(40.0, 75.0));
}

#[test]
fn second_render_replaces_first_overlay() {
    let mut chart = FakeChart::worked_example();
    let mut table = OverlayTable::default();
    let overlay = renderer();

    let first = overlay.render(&mut chart, &mut table);
    let second = overlay.render(&mut chart, &mut table);
    let (OverlayOutcome::Drawn { group: first, .. }, OverlayOutcome::Drawn { group: second, .. }) =
        (first, second)
    else {
        panic!("both passes should draw");
    };

    assert_ne!(first, second);
    assert!(!chart.scene.contains(first));
    assert!(chart.scene.contains(second));
    assert_eq!(chart.scene().roots(), &[second]);
    assert_eq!(clipped_group_count(chart.scene()), 1);
    assert_eq!(chart.scene().clip_rects().len(), 1);
    assert_eq!(table.len(), 1);
}

#[test]
fn missing_axes_skip_without_touching_scene() {
    let mut chart = FakeChart::with_axes(Vec::new(), vec![AffineAxis::new(0.0, 1.0)]);
    let mut table = OverlayTable::default();

    assert_eq!(renderer().render(&mut chart, &mut table), OverlayOutcome::Skipped);
    assert_eq!(chart.scene.calls, 0);
    assert!(table.is_empty());
}

#[test]
fn failing_axis_transform_draws_nothing() {
    let mut chart = FakeChart::with_axes(vec![AffineAxis::failing()], vec![AffineAxis::new(0.0, 1.0)]);
    let mut table = OverlayTable::default();

    assert_eq!(renderer().render(&mut chart, &mut table), OverlayOutcome::Failed);
    assert!(chart.scene().is_empty());
    assert!(table.is_empty());
}

#[test]
fn failing_transform_after_success_leaves_no_stale_overlay() {
    let mut chart = FakeChart::worked_example();
    let mut table = OverlayTable::default();
    let overlay = renderer();
    assert!(overlay.render(&mut chart, &mut table).is_drawn());

    chart.x_axes[0] = AffineAxis::failing();
    assert_eq!(overlay.render(&mut chart, &mut table), OverlayOutcome::Failed);
    assert!(chart.scene().is_empty());
    assert!(table.is_empty());
}

#[test]
fn renderer_capability_error_is_contained() {
    let mut chart = FakeChart::worked_example();
    chart.scene.refuse_clip_paths = true;
    let mut table = OverlayTable::default();
    let overlay = renderer();

    assert_eq!(overlay.render(&mut chart, &mut table), OverlayOutcome::Failed);
    // The partially drawn group is still tracked so the next pass removes it.
    let partial = table.get(chart.id()).expect("partial group tracked");
    assert_eq!(chart.scene().subtree_len(partial), 2);

    chart.scene.refuse_clip_paths = false;
    assert!(overlay.render(&mut chart, &mut table).is_drawn());
    assert!(!chart.scene.contains(partial));
    assert_eq!(chart.scene().roots().len(), 1);
}

#[test]
fn ascending_value_axis_still_yields_positive_rect() {
    let mut chart = FakeChart::with_axes(
        vec![AffineAxis::new(0.0, 10.0)],
        vec![AffineAxis::new(0.0, 5.0)],
    );
    let mut table = OverlayTable::default();

    let OverlayOutcome::Drawn { rect, line_count, .. } = renderer().render(&mut chart, &mut table)
    else {
        panic!("expected overlay");
    };
    assert_eq!(rect, PixelRect::new(40.0, 25.0, 40.0, 100.0));
    assert_eq!(line_count, 17);
}

#[test]
fn custom_spacing_changes_line_count() {
    let style = HatchStyle {
        spacing_px: 20.0,
        extra_lines: 2,
        ..HatchStyle::default()
    };
    let overlay = OverlayRenderer::new(OverlayRegion::default(), style);
    let mut chart = FakeChart::worked_example();
    let mut table = OverlayTable::default();

    let OverlayOutcome::Drawn { line_count, rect, .. } = overlay.render(&mut chart, &mut table)
    else {
        panic!("expected overlay");
    };
    assert_eq!(line_count, 9);
    assert_relative_eq!(rect.width + rect.height, 140.0);
}

#[test]
fn runaway_hatch_style_fails_without_panicking() {
    let mut chart = FakeChart::worked_example();
    let mut table = OverlayTable::default();
    assert!(renderer().render(&mut chart, &mut table).is_drawn());

    for style in [
        HatchStyle {
            spacing_px: 1e-300,
            ..HatchStyle::default()
        },
        HatchStyle {
            extra_lines: usize::MAX,
            ..HatchStyle::default()
        },
    ] {
        let overlay = OverlayRenderer::new(OverlayRegion::default(), style);
        assert_eq!(overlay.render(&mut chart, &mut table), OverlayOutcome::Failed);
        assert!(table.is_empty());
        assert!(chart.scene().is_empty());
        assert!(chart.scene().clip_rects().is_empty());

        let config = HostConfig::default().with_hatch_style(style);
        assert!(ChartHost::<FakeChart>::new(RenderingCapability::Display, config).is_err());
    }

    assert!(renderer().render(&mut chart, &mut table).is_drawn());
    assert_eq!(clipped_group_count(chart.scene()), 1);
}
