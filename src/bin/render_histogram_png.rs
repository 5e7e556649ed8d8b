#[cfg(feature = "cairo-backend")]
use std::fs::{self, File};
#[cfg(feature = "cairo-backend")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cairo-backend")]
use fraudscope::error::{VizError, VizResult};
#[cfg(feature = "cairo-backend")]
use fraudscope::fetch::{Transport, TransportResponse};
#[cfg(feature = "cairo-backend")]
use fraudscope::refresh::{CompletionOutcome, RefreshState};

#[cfg(feature = "cairo-backend")]
const DEFAULT_WIDTH: u32 = 540;

#[cfg(feature = "cairo-backend")]
#[derive(Debug)]
struct CliArgs {
    input_path: PathBuf,
    output_path: PathBuf,
    width: u32,
    theme: String,
}

/// Serves a captured endpoint body from disk, whatever path is requested.
#[cfg(feature = "cairo-backend")]
struct FileTransport {
    path: PathBuf,
}

#[cfg(feature = "cairo-backend")]
impl Transport for FileTransport {
    fn get(&self, path: &str) -> VizResult<TransportResponse> {
        fs::read_to_string(&self.path)
            .map(TransportResponse::ok)
            .map_err(|err| VizError::Transport {
                endpoint: path.to_owned(),
                reason: format!("failed to read `{}`: {err}", self.path.display()),
            })
    }
}

#[cfg(feature = "cairo-backend")]
fn main() {
    let _ = fraudscope::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cairo-backend"))]
fn main() {
    eprintln!("this tool requires feature `cairo-backend`");
    std::process::exit(1);
}

#[cfg(feature = "cairo-backend")]
fn run() -> Result<(), String> {
    use std::time::Instant;

    use fraudscope::LiveBarChart;
    use fraudscope::api::LiveChartConfig;
    use fraudscope::core::Viewport;
    use fraudscope::fetch::{AgeCount, DataFetcher, Endpoint};
    use fraudscope::interaction::TooltipOverlay;
    use fraudscope::render::{CairoRenderer, Theme};

    let args = parse_args()?;
    let config = LiveChartConfig::default();
    let theme = Theme::from_stored(&args.theme);
    let mut renderer = CairoRenderer::for_viewport(Viewport::new(args.width, config.height_px))
        .map_err(|err| err.to_string())?;
    renderer
        .set_clear_color(theme.palette().background)
        .map_err(|err| err.to_string())?;
    let settle_after = config.transition_duration().max(config.fade_config().min_hold);

    let mut chart = LiveBarChart::new(renderer, TooltipOverlay::default(), config, args.width)
        .map_err(|err| err.to_string())?
        .with_theme(theme);

    let fetcher = DataFetcher::new(FileTransport {
        path: args.input_path.clone(),
    });
    let now = Instant::now();
    let ticket = chart.mount(now).map_err(|err| err.to_string())?;
    let outcome = chart.run_fetch(ticket, now, || {
        fetcher.fetch_series::<AgeCount>(&Endpoint::age_histogram())
    });
    ensure_applied(outcome, chart.refresh_state())?;

    let report = chart
        .render(now + settle_after)
        .map_err(|err| err.to_string())?;
    chart.teardown();

    write_png(&chart.into_renderer(), &args.output_path)?;
    println!(
        "rendered {} bars ({} theme) -> {}",
        report.bars_drawn,
        theme.as_str(),
        args.output_path.display()
    );
    Ok(())
}

/// Refuses to write an image when the input never became chart data.
#[cfg(feature = "cairo-backend")]
fn ensure_applied<T>(outcome: CompletionOutcome, state: &RefreshState<T>) -> Result<(), String> {
    match (outcome, state) {
        (CompletionOutcome::Applied, _) => Ok(()),
        (_, RefreshState::Failed(reason)) => Err(format!("input was not chart data: {reason}")),
        (outcome, _) => Err(format!("input was not applied to the chart ({outcome:?})")),
    }
}

#[cfg(feature = "cairo-backend")]
fn write_png(renderer: &fraudscope::render::CairoRenderer, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create `{}`: {err}", parent.display()))?;
    }
    let mut file = File::create(path)
        .map_err(|err| format!("failed to create `{}`: {err}", path.display()))?;
    renderer.write_png(&mut file).map_err(|err| err.to_string())
}

#[cfg(feature = "cairo-backend")]
fn parse_args() -> Result<CliArgs, String> {
    let mut input_path: Option<PathBuf> = None;
    let mut output_path = PathBuf::from("age_histogram.png");
    let mut width = DEFAULT_WIDTH;
    let mut theme = "light".to_owned();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input_path = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output_path = PathBuf::from(value);
            }
            "--width" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --width".to_owned())?;
                width = value
                    .parse()
                    .map_err(|err| format!("invalid --width `{value}`: {err}"))?;
            }
            "--theme" => {
                theme = args
                    .next()
                    .ok_or_else(|| "missing value for --theme".to_owned())?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
        }
    }

    let input_path =
        input_path.ok_or_else(|| format!("--input is required\n\n{}", usage_message()))?;
    Ok(CliArgs {
        input_path,
        output_path,
        width,
        theme,
    })
}

#[cfg(feature = "cairo-backend")]
fn print_usage() {
    println!("{}", usage_message());
}

#[cfg(feature = "cairo-backend")]
fn usage_message() -> &'static str {
    concat!(
        "usage: render_histogram_png --input <age_histogram.json> ",
        "[--output <file.png>] [--width <px>] [--theme light|dark]"
    )
}
