use futures::executor::block_on;
use remember_me_core::{
    ChartConfig, ChartSession, EssayConfig, FilterSelection, PortraitRecord,
    load_portraits_from_reader,
};
use remember_me_render::{SceneRenderer, SvgRenderOptions};
use serde::Serialize;
use std::io::Write as _;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(remember_me_core::Error),
    Render(remember_me_render::Error),
    Json(serde_json::Error),
    Raster(&'static str),
    EmptyDataset,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Raster(msg) => write!(f, "{msg}"),
            CliError::EmptyDataset => {
                write!(f, "No portraits with a year in the configured range")
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<remember_me_core::Error> for CliError {
    fn from(value: remember_me_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<remember_me_render::Error> for CliError {
    fn from(value: remember_me_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Parse,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    list_filters: bool,
    filter: FilterSelection,
    from: Option<FilterSelection>,
    highlight_year: Option<i32>,
    config_path: Option<String>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    diagram_id: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
struct FilterOut {
    key: &'static str,
    name: &'static str,
    labels: Option<[&'static str; 2]>,
}

fn usage() -> &'static str {
    "remember-me-cli\n\
\n\
USAGE:\n\
  remember-me-cli [parse] [--pretty] [<csv>|-]\n\
  remember-me-cli layout [--filter none|size|artist|sitter|gender] [--pretty] [<csv>|-]\n\
  remember-me-cli render [--filter <dim>] [--from <dim>] [--highlight-year <year>] [--format svg|png|jpg|pdf] [--scale <n>] [--background <css-color>] [--id <diagram-id>] [--out <path>] [<csv>|-]\n\
  remember-me-cli --list-filters\n\
\n\
SHARED OPTIONS:\n\
  --config <path.json>       JSON overrides merged over the built-in chart settings\n\
  --viewport-width <w>       overrides viewport.width\n\
  --viewport-height <h>      overrides viewport.height\n\
\n\
NOTES:\n\
  - If <csv> is omitted or '-', the dataset is read from stdin.\n\
  - parse prints the normalized portrait records as JSON.\n\
  - layout prints the computed chart layout as JSON.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - --from renders an animated SVG of the transition from another mode.\n\
  - --highlight-year is applied after the filter and cannot be combined with --from.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
"
}

fn parse_selection(value: Option<&String>) -> Result<FilterSelection, CliError> {
    let Some(value) = value else {
        return Err(CliError::Usage(usage()));
    };
    Ok(value.parse::<FilterSelection>()?)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Parse,
        render_format: RenderFormat::Svg,
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--list-filters" => args.list_filters = true,
            "--filter" => args.filter = parse_selection(it.next())?,
            "--from" => args.from = Some(parse_selection(it.next())?),
            "--highlight-year" => {
                let Some(year) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.highlight_year =
                    Some(year.parse::<i32>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config_path = Some(path.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width =
                    Some(w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height =
                    Some(h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.from.is_some() && args.highlight_year.is_some() {
        // Selecting a filter clears the highlight, and highlighting after the selection would
        // replace its transition.
        return Err(CliError::Usage(
            "--highlight-year cannot be combined with --from",
        ));
    }

    Ok(args)
}

fn build_config(args: &Args) -> Result<ChartConfig, CliError> {
    let mut overrides = match args.config_path.as_deref() {
        Some(path) => EssayConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EssayConfig::empty_object(),
    };
    // Non-finite numbers become JSON null and fail resolution as missing values.
    if let Some(width) = args.viewport_width {
        overrides.set_value("viewport.width", serde_json::Value::from(width));
    }
    if let Some(height) = args.viewport_height {
        overrides.set_value("viewport.height", serde_json::Value::from(height));
    }
    Ok(ChartConfig::from_essay_config(&EssayConfig::with_overrides(&overrides))?)
}

fn load_records(
    input: Option<&str>,
    config: &ChartConfig,
) -> Result<Vec<PortraitRecord>, CliError> {
    let records = match input {
        None | Some("-") => load_portraits_from_reader(std::io::stdin().lock(), config)?,
        Some(path) => block_on(remember_me_core::load_portraits(path, config))?,
    };
    if records.is_empty() {
        return Err(CliError::EmptyDataset);
    }
    Ok(records)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_bytes(bytes: &[u8], out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            std::io::stdout().lock().write_all(bytes)?;
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, bytes)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn raster_tree(svg: &str) -> Result<usvg::Tree, CliError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    // Used when none of the Gill Sans stack is installed.
    opt.font_family = "Arial".to_string();
    usvg::Tree::from_str(svg, &opt)
        .map_err(|_| CliError::Raster("failed to parse the rendered SVG"))
}

/// Rasterizes the settled chart onto `background`.
///
/// resvg ignores the root `background-color` style, so the fill is painted here.
fn rasterize(
    svg: &str,
    scale: f32,
    background: tiny_skia::Color,
) -> Result<tiny_skia::Pixmap, CliError> {
    let tree = raster_tree(svg)?;
    let size = tree
        .size()
        .to_int_size()
        .scale_by(scale)
        .ok_or(CliError::Raster("--scale yields an empty or oversized raster"))?;
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or(CliError::Raster("failed to allocate the raster canvas"))?;
    pixmap.fill(background);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn encode_jpeg(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, CliError> {
    // The canvas is opaque, so dropping alpha loses nothing.
    let rgb: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|px| [px.red(), px.green(), px.blue()])
        .collect();
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 90)
        .encode(
            &rgb,
            pixmap.width(),
            pixmap.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|_| CliError::Raster("failed to encode JPG"))?;
    Ok(out)
}

fn render_svg_to_pdf(svg: &str) -> Result<Vec<u8>, CliError> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();
    let tree = svg2pdf::usvg::Tree::from_str(svg, &opt)
        .map_err(|_| CliError::Raster("failed to parse the rendered SVG"))?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|_| CliError::Raster("failed to convert SVG to PDF"))
}

/// `white`, `black`, `transparent`, `#rgb`, `#rrggbb` or `#rrggbbaa`.
fn parse_background(text: &str) -> Option<tiny_skia::Color> {
    let text = text.trim().to_ascii_lowercase();
    let [r, g, b, a] = match text.as_str() {
        "white" => [255, 255, 255, 255],
        "black" => [0, 0, 0, 255],
        "transparent" => [0, 0, 0, 0],
        _ => {
            let hex = text.strip_prefix('#')?;
            if !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let n = u32::from_str_radix(hex, 16).ok()?;
            match hex.len() {
                3 => {
                    let nibble = |shift: u32| ((n >> shift) & 0xf) as u8 * 0x11;
                    [nibble(8), nibble(4), nibble(0), 255]
                }
                6 => {
                    let [_, r, g, b] = n.to_be_bytes();
                    [r, g, b, 255]
                }
                8 => n.to_be_bytes(),
                _ => return None,
            }
        }
    };
    Some(tiny_skia::Color::from_rgba8(r, g, b, a))
}

/// Drives a session into the requested end state and returns the scene.
fn build_scene(args: &Args, session: &mut ChartSession) -> SceneRenderer {
    let mut scene = SceneRenderer::new(session.config().clone());
    match args.from {
        Some(from) => {
            session.select(from, &mut scene);
            session.present(&mut scene);
            session.select(args.filter, &mut scene);
        }
        None => {
            session.select(args.filter, &mut scene);
            session.present(&mut scene);
        }
    }
    if let Some(year) = args.highlight_year {
        session.highlight_year(year, &mut scene);
    }
    // A rendered document is the settled end state; hover titles are live.
    if let Some(id) = session.latest_transition() {
        session.transition_complete(id, &mut scene);
    }
    scene
}

fn run(args: Args) -> Result<(), CliError> {
    if args.list_filters {
        let filters: Vec<_> = FilterSelection::options()
            .map(|selection| FilterOut {
                key: selection.key(),
                name: selection.display_name(),
                labels: match selection {
                    FilterSelection::None => None,
                    FilterSelection::Dimension(d) => Some(d.labels()),
                },
            })
            .collect();
        return write_json(&filters, args.pretty);
    }

    let config = build_config(&args)?;
    let records = load_records(args.input.as_deref(), &config)?;

    match args.command {
        Command::Parse => write_json(&records, args.pretty),
        Command::Layout => {
            let session = ChartSession::new(records, config);
            let layout = session.compute_layout(args.filter.into());
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let mut session = ChartSession::new(records, config);
            let scene = build_scene(&args, &mut session);

            let background = args.background.as_deref().unwrap_or("white");
            let svg_options = SvgRenderOptions {
                diagram_id: args.diagram_id.clone(),
                animate: matches!(args.render_format, RenderFormat::Svg),
                background: Some(background.to_string()),
            };
            let svg = scene.render_svg(&svg_options)?;

            let bytes = match args.render_format {
                RenderFormat::Svg => return write_bytes(svg.as_bytes(), args.out.as_deref()),
                RenderFormat::Pdf => render_svg_to_pdf(&svg)?,
                RenderFormat::Png | RenderFormat::Jpeg => {
                    let color = parse_background(background)
                        .ok_or(CliError::Usage("invalid --background color for raster output"))?;
                    if matches!(args.render_format, RenderFormat::Png) {
                        rasterize(&svg, args.render_scale, color)?
                            .encode_png()
                            .map_err(|_| CliError::Raster("failed to encode PNG"))?
                    } else if color.is_opaque() {
                        encode_jpeg(&rasterize(&svg, args.render_scale, color)?)?
                    } else {
                        return Err(CliError::Usage(
                            "JPG output requires an opaque --background (e.g. white)",
                        ));
                    }
                }
            };
            let out = args.out.clone().unwrap_or_else(|| {
                default_raster_out_path(args.input.as_deref(), args.render_format.extension())
                    .to_string_lossy()
                    .to_string()
            });
            write_bytes(&bytes, Some(&out))
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::EmptyDataset) => {
            eprintln!("{}", CliError::EmptyDataset);
            std::process::exit(3);
        }
        Err(err @ CliError::Usage(_)) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
