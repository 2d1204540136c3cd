use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use polyreduce::units::{Meters, SquareMeters};
use polyreduce::{ReduceCfg, Reducer};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod convert;
mod pipeline;
mod preview;
mod provenance;
mod radar;

#[derive(Parser)]
#[command(name = "polyreduce")]
#[command(about = "Fit geofence polygons into Radar's vertex and area limits")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Simplify, scale or replace oversized polygons in a Radar CSV
    Simplify(SimplifyArgs),
    /// Convert a GeoJSON file into a Radar CSV
    Convert(ConvertArgs),
    /// Export a Radar CSV as a GeoJSON FeatureCollection for viewing
    Preview {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block with the default limits
    Report,
}

#[derive(Args)]
struct SimplifyArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "simplified.csv")]
    out: PathBuf,
    /// Maximum coordinates per polygon, closing point included
    #[arg(long)]
    max_vertices: Option<usize>,
    /// Minimum polygon area in square meters
    #[arg(long)]
    min_area: Option<f64>,
    /// Minimum radius of fallback circles in meters
    #[arg(long)]
    circle_radius: Option<f64>,
    /// Process polygons on one thread
    #[arg(long)]
    serial: bool,
}

#[derive(Args)]
struct ConvertArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "RadarFiles")]
    out_dir: PathBuf,
    /// Property holding the geofence description
    #[arg(long)]
    description_key: Option<String>,
    /// Property holding the tag (used with --no-filename-tag)
    #[arg(long)]
    tag_key: Option<String>,
    /// Property holding the external id (defaults to the file name)
    #[arg(long)]
    external_id_key: Option<String>,
    /// Property holding isochrone minutes; turns points into isochrones
    #[arg(long)]
    isochrone_key: Option<String>,
    /// Property holding circle radii in meters
    #[arg(long)]
    radius_key: Option<String>,
    /// Copy GeoJSON properties into the metadata column
    #[arg(long)]
    properties_as_metadata: bool,
    /// Take tags from --tag-key instead of the file name
    #[arg(long)]
    no_filename_tag: bool,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Simplify(args) => simplify(args),
        Action::Convert(args) => convert(args),
        Action::Preview { input, out } => preview(&input, &out),
        Action::Report => report(),
    }
}

fn reduce_cfg(args: &SimplifyArgs) -> Result<ReduceCfg> {
    let mut cfg = ReduceCfg::default();
    if let Some(n) = args.max_vertices {
        cfg.max_vertex_count = n;
    }
    if let Some(a) = args.min_area {
        cfg.minimum_area = SquareMeters(a);
    }
    if let Some(r) = args.circle_radius {
        cfg.default_circle_radius = Meters(r);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn simplify(args: SimplifyArgs) -> Result<()> {
    let cfg = reduce_cfg(&args)?;
    let records = radar::read_records(&args.input)?;
    tracing::info!(
        input = %args.input.display(),
        out = %args.out.display(),
        rows = records.len(),
        max_vertices = cfg.max_vertex_count,
        "simplify"
    );

    let reduced = pipeline::reduce_records(&records, &Reducer::new(cfg), !args.serial)?;
    radar::write_records(&args.out, &reduced.records)?;

    println!("Total CSV Rows: {}", records.len());
    println!("{}", reduced.stats);
    if reduced.malformed > 0 {
        println!("\tMalformed Polygons (copied unchanged): {}", reduced.malformed);
    }

    let params = json!({
        "input": args.input.to_string_lossy(),
        "parallel": !args.serial,
        "reduce": provenance::cfg_json(&cfg),
    });
    let mut stats = provenance::stats_json(&reduced.stats);
    stats["malformed"] = json!(reduced.malformed);
    let payload = provenance::Payload::new("simplify", params).with_stats(stats);
    provenance::write_sidecar(&args.out, payload)?;
    Ok(())
}

fn convert(args: ConvertArgs) -> Result<()> {
    let file_name = match args.input.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => bail!("cannot derive a file name from {}", args.input.display()),
    };
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let geojson: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let opts = convert::ConvertOptions {
        use_file_name_as_tag: !args.no_filename_tag,
        include_properties_as_metadata: args.properties_as_metadata,
        description_key: args.description_key,
        tag_key: args.tag_key,
        external_id_key: args.external_id_key,
        isochrone_key: args.isochrone_key,
        radius_key: args.radius_key,
    };
    let mut converter = convert::Converter::new(file_name.as_str(), opts);
    converter.process(&geojson);
    let (records, stats) = converter.finish();

    let out = args.out_dir.join(format!("{file_name}.csv"));
    tracing::info!(input = %args.input.display(), out = %out.display(), rows = records.len(), "convert");
    radar::write_records(&out, &records)?;
    println!(
        "Stats:\n\tCircles: {}\n\tIsochrones: {}\n\tPolygons: {}\n\tSkipped: {}",
        stats.circles, stats.isochrones, stats.polygons, stats.skipped
    );

    let payload = provenance::Payload::new(
        "convert",
        json!({ "input": args.input.to_string_lossy(), "file_name": file_name }),
    )
    .with_stats(json!({
        "circles": stats.circles,
        "isochrones": stats.isochrones,
        "polygons": stats.polygons,
        "skipped": stats.skipped,
    }));
    provenance::write_sidecar(&out, payload)?;
    Ok(())
}

fn preview(input: &Path, out: &Path) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), "preview");
    let records = radar::read_records(input)?;
    let fc = preview::feature_collection(&records);
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec(&fc)?)
        .with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": polyreduce::VERSION,
        "defaults": provenance::cfg_json(&ReduceCfg::default()),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
