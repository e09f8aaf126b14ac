mod support;

use climate_chart::core::OverlayRegion;
use climate_chart::extensions::{HatchStyle, OverlayOutcome, OverlayRenderer, OverlayTable};
use climate_chart::interaction::ResizeEvent;
use climate_chart::api::{ChartHost, HostConfig, RenderingCapability};
use proptest::prelude::*;
use std::time::Duration;
use support::{AffineAxis, CountingBackend, FakeChart, clipped_group_count};

fn axis_strategy() -> impl Strategy<Value = AffineAxis> {
    (-500.0f64..500.0, prop_oneof![-40.0f64..-0.5, 0.5f64..40.0])
        .prop_map(|(offset, scale)| AffineAxis::new(offset, scale))
}

proptest! {
    #[test]
    fn line_count_follows_normalized_band(
        x_axis in axis_strategy(),
        y_axis in axis_strategy(),
        spacing in 2.0f64..40.0,
        extra in 0usize..8,
    ) {
        let style = HatchStyle { spacing_px: spacing, extra_lines: extra, ..HatchStyle::default() };
        let renderer = OverlayRenderer::new(OverlayRegion::default(), style);
        let mut chart = FakeChart::with_axes(vec![x_axis], vec![y_axis]);
        let mut table = OverlayTable::default();

        let outcome = renderer.render(&mut chart, &mut table);
        let OverlayOutcome::Drawn { rect, line_count, .. } = outcome else {
            return Err(TestCaseError::fail(format!("unexpected outcome {outcome:?}")));
        };

        let width = (x_axis.scale * 4.0).abs();
        let height = (y_axis.scale * 20.0).abs();
        prop_assert!((rect.width - width).abs() < 1e-6);
        prop_assert!((rect.height - height).abs() < 1e-6);
        prop_assert!(rect.width >= 0.0 && rect.height >= 0.0);

        let expected = ((rect.width + rect.height) / spacing).ceil() as usize + extra;
        prop_assert_eq!(line_count, expected);
        prop_assert_eq!(chart.scene().count_kind("path"), expected);
    }

    #[test]
    fn resizes_never_stack_overlays(sizes in prop::collection::vec((200u32..1600, 150u32..900), 1..12)) {
        let mut host: ChartHost<FakeChart> =
            ChartHost::new(RenderingCapability::Display, HostConfig::default()).expect("host");
        host.initialize();
        host.advance(Duration::ZERO);
        host.construct_with(&mut CountingBackend::default()).expect("construct");
        host.advance(Duration::from_millis(400));
        let draws = host.stats().overlay_draws;

        for (width, height) in &sizes {
            host.on_resize(ResizeEvent::new(*width, *height));
            let chart = host.chart().expect("chart");
            prop_assert_eq!(host.overlays().len(), 1);
            prop_assert_eq!(chart.scene().roots().len(), 1);
            prop_assert_eq!(clipped_group_count(chart.scene()), 1);
            prop_assert_eq!(chart.scene().clip_rects().len(), 1);
        }
        prop_assert_eq!(host.stats().overlay_draws, draws + sizes.len());
    }
}
