//! mapposter CLI
//!
//! Resolves a place, reads Overpass exports for it from a data directory and
//! writes a themed PNG poster.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use mapposter::{
    export_png,
    fetch::{
        assemble_request, GenerationConfig, LayerToggles, LocationQuery, OverpassFileFetcher,
        RetryPolicy, StaticGeocoder,
    },
    traits::Catalog,
    GeoPoint, PosterComposer, PosterFonts, ResolutionCatalog, ResolutionPreset, TextOverrides,
    ThemeCatalog,
};

#[derive(Parser)]
#[command(name = "mapposter")]
#[command(about = "Render a minimalist map poster for a city", long_about = None)]
struct Args {
    /// City to look up
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    city: Option<String>,

    /// Country of the city
    #[arg(long, default_value = "")]
    country: String,

    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Map radius in meters, clamped to 1000..=20000
    #[arg(long, default_value = "2000")]
    radius: f64,

    /// Theme key
    #[arg(long, default_value = ThemeCatalog::DEFAULT_THEME)]
    theme: String,

    /// JSON file with extra themes, merged over the built-in ones
    #[arg(long)]
    theme_file: Option<PathBuf>,

    /// Resolution preset (square, fhdPortrait, 4kLandscape, custom, ...)
    #[arg(long, default_value = "square")]
    resolution: String,

    /// Width for the custom preset
    #[arg(long)]
    width: Option<u32>,

    /// Height for the custom preset
    #[arg(long)]
    height: Option<u32>,

    /// Directory holding roads.json, water.json and parks.json
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// JSON file of additional known places
    #[arg(long)]
    places: Option<PathBuf>,

    /// Skip the water layer
    #[arg(long)]
    no_water: bool,

    /// Skip the parks layer
    #[arg(long)]
    no_parks: bool,

    /// Replacement text for the city heading
    #[arg(long)]
    title: Option<String>,

    /// Replacement text for the country line
    #[arg(long)]
    subtitle: Option<String>,

    /// TrueType font for poster text, instead of the bundled DejaVu Sans
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold TrueType font for the heading
    #[arg(long, requires = "font")]
    bold_font: Option<PathBuf>,

    /// Full generation config as JSON; overrides the location, size, layer and text flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the poster
    #[arg(long, short, default_value = ".")]
    output_dir: PathBuf,

    /// Print theme and resolution keys, then exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let themes = load_themes(args.theme_file.as_deref()).await?;
    if args.list {
        print_catalogs(&themes);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            GenerationConfig::from_json(&json).context("parsing generation config")?
        }
        None => config_from_args(&args, &themes)?,
    };

    let geocoder = match &args.places {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let extra = StaticGeocoder::from_json(&json)?;
            extra
                .places()
                .iter()
                .cloned()
                .fold(StaticGeocoder::builtin().clone(), StaticGeocoder::with_place)
        }
        None => StaticGeocoder::builtin().clone(),
    };
    let fetcher = OverpassFileFetcher::new(&args.data_dir);
    log::info!("reading map data from {}", fetcher.root().display());

    let request = assemble_request(&geocoder, &fetcher, &config, &RetryPolicy::default()).await?;
    log::info!(
        "rendering {} roads, {} water, {} parks at {}x{}",
        request.road_elements.len(),
        request.water_elements.len(),
        request.park_elements.len(),
        request.resolution.width,
        request.resolution.height
    );

    let composer = match &args.font {
        Some(font) => {
            PosterComposer::with_fonts(PosterFonts::load(font, args.bold_font.as_deref())?)
        }
        None => PosterComposer::new(),
    };

    let display = request.display.clone();
    let surface = composer.compose(request)?;
    let poster = export_png(&surface, &display)?;

    tokio::fs::create_dir_all(&args.output_dir).await?;
    let path = args.output_dir.join(&poster.filename);
    tokio::fs::write(&path, &poster.bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    println!("{}", path.display());
    Ok(())
}

async fn load_themes(theme_file: Option<&Path>) -> anyhow::Result<ThemeCatalog> {
    let builtin = ThemeCatalog::builtin();
    match theme_file {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(builtin.merged_with(&ThemeCatalog::from_json(&json)?))
        }
        None => Ok(builtin.clone()),
    }
}

fn print_catalogs(themes: &ThemeCatalog) {
    println!("themes:");
    for key in themes.keys() {
        println!("  {}", key);
    }
    println!("resolutions:");
    for preset in ResolutionPreset::NAMED {
        println!("  {:<14} {}", preset.key(), preset.label());
    }
    println!("  {:<14} --width/--height, clamped", "custom");
}

fn config_from_args(args: &Args, themes: &ThemeCatalog) -> anyhow::Result<GenerationConfig> {
    let query = match (args.lat, args.lon, &args.city) {
        (Some(lat), Some(lon), _) => LocationQuery::coordinates(GeoPoint::new(lat, lon)),
        (_, _, Some(city)) => LocationQuery::City {
            city: city.clone(),
            country: args.country.clone(),
        },
        _ => bail!("pass either --city or --lat/--lon"),
    };

    let preset = match (args.resolution.as_str(), args.width, args.height) {
        ("custom", Some(width), Some(height)) => ResolutionPreset::custom(width, height),
        (key, _, _) => ResolutionCatalog.preset(key)?,
    };

    Ok(GenerationConfig {
        query,
        resolution: preset.resolve(),
        radius_meters: args.radius,
        layers: LayerToggles {
            water: !args.no_water,
            parks: !args.no_parks,
        },
        text: TextOverrides {
            city: args.title.clone(),
            country: args.subtitle.clone(),
        },
        theme: themes.get(&args.theme)?,
    })
}
