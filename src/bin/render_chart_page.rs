use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use climate_chart::api::{
    ChartHost, HostConfig, RenderingCapability, SceneChart, SceneChartBackend, render_page,
};
use climate_chart::error::{ChartError, ChartResult};
use climate_chart::interaction::ResizeEvent;
use tracing::{error, info};

#[derive(Debug, Default)]
struct Args {
    config_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    headless: bool,
    resize_to: Option<(u32, u32)>,
}

fn parse_args() -> ChartResult<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config_path = iter.next().map(PathBuf::from),
            "--out" => args.output_path = iter.next().map(PathBuf::from),
            "--headless" => args.headless = true,
            "--resize" => {
                let value = iter.next().unwrap_or_default();
                let (width, height) = value
                    .split_once('x')
                    .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
                    .ok_or_else(|| {
                        ChartError::Config(format!("expected --resize WIDTHxHEIGHT, got `{value}`"))
                    })?;
                args.resize_to = Some((width, height));
            }
            other => {
                return Err(ChartError::Config(format!(
                    "unknown argument `{other}` (expected --config, --out, --headless, --resize)"
                )));
            }
        }
    }
    Ok(args)
}

fn run(args: Args) -> ChartResult<()> {
    let config = match &args.config_path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|err| {
                ChartError::Config(format!("failed to read {}: {err}", path.display()))
            })?;
            HostConfig::from_json_str(&raw)?
        }
        None => HostConfig::default(),
    };

    let capability = RenderingCapability::from_display_available(!args.headless);
    let mut host: ChartHost<SceneChart> = ChartHost::new(capability, config)?;
    host.initialize();
    host.advance(Duration::ZERO);

    if capability.is_display() {
        let mut backend = SceneChartBackend::new(config.container);
        host.construct_with(&mut backend)?;
        host.on_layout_settled();
        host.advance(config.post_init_reflow_delay());
        if let Some((width, height)) = args.resize_to {
            host.on_resize(ResizeEvent::new(width, height));
            host.advance(Duration::from_secs(1));
        }
    }

    let html = render_page(&host)?;
    match &args.output_path {
        Some(path) => fs::write(path, html).map_err(|err| {
            ChartError::Backend(format!("failed to write {}: {err}", path.display()))
        })?,
        None => print!("{html}"),
    }

    let stats = host.stats();
    info!(
        state = host.state().name(),
        overlay_draws = stats.overlay_draws,
        overlay_failures = stats.overlay_failures,
        reflows = stats.reflows,
        "rendered chart page"
    );
    Ok(())
}

fn main() -> ExitCode {
    let _ = climate_chart::telemetry::init_default_tracing();

    let result = parse_args().and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "render_chart_page failed");
            eprintln!("render_chart_page: {err}");
            ExitCode::FAILURE
        }
    }
}
