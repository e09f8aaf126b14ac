use std::fmt::Write;

use crate::api::{ChartHost, SceneChart};
use crate::error::{ChartError, ChartResult};
use crate::render::scene_to_svg;

pub const APP_TITLE: &str = "Charts IAT v2";

/// Renders the full HTML document for the chart page.
///
/// The current options are always embedded as JSON for hydration. When the
/// host owns a live chart its scene is inlined as SVG; a headless host only
/// ever emits the placeholder options.
pub fn render_page(host: &ChartHost<SceneChart>) -> ChartResult<String> {
    let options_json = host.options().to_json()?;
    let chart_markup = match host.chart() {
        Some(chart) => Some(scene_to_svg(chart.scene())?),
        None => None,
    };

    let mut html = String::new();
    write_page(&mut html, &options_json, chart_markup.as_deref())
        .map_err(|err| ChartError::Backend(format!("failed to write page: {err}")))?;
    Ok(html)
}

fn write_page(out: &mut String, options_json: &str, chart_svg: Option<&str>) -> std::fmt::Result {
    out.push_str("<!doctype html>\n");
    out.push_str(r#"<html lang="en"><head><meta charset="utf-8">"#);
    out.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    write!(out, "<title>{APP_TITLE}</title></head><body><app-root>")?;
    write!(out, "<h1>{APP_TITLE}</h1>")?;
    out.push_str(r#"<app-chart><div class="chart-container">"#);
    if let Some(svg) = chart_svg {
        out.push_str(svg);
    }
    out.push_str("</div>");
    write!(
        out,
        r#"<script type="application/json" id="chart-options">{}</script>"#,
        options_json.replace("</", "<\\/")
    )?;
    out.push_str("</app-chart></app-root></body></html>\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_page;

    #[test]
    fn script_payload_cannot_close_its_tag() {
        let mut html = String::new();
        write_page(&mut html, r#"{"t":"</script>"}"#, None).expect("write");
        assert!(html.contains(r#"{"t":"<\/script>"}"#));
        assert!(!html.contains("<svg"));
    }
}
