//! Pipeline orchestration for the `street_heat` binary.
//!
//! Chains load -> fuse -> project -> compose/validate -> write. A stage bar
//! tracks the four steps and a second bar counts segments through
//! composition. Nothing is written unless every segment composes within
//! the character limit.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use street_heat_cli_utils::{ComposeBar, MultiProgress, Stage, StageBar};
use street_heat_compose::output::write_shuffled;
use street_heat_compose::{ComposeProgress, ParcelIndex, TweetComposer, mean_heat, validate_batch};
use street_heat_fusion::segment::project_segments;
use street_heat_fusion::{FusedTable, fuse, no_data};
use street_heat_neighborhood::NeighborhoodResolver;
use street_heat_segment_models::{Segment, SegmentId};
use street_heat_source::SourceTable;
use street_heat_source::csv_table::read_csv_path;
use street_heat_source::geojson_table::read_features_path;
use street_heat_source::parcels::parcel_addresses;

use crate::config::PipelineConfig;

/// The segment sources, in fusion order.
struct SegmentSources {
    heat: SourceTable,
    attributes: SourceTable,
    roads: SourceTable,
}

/// Loads the heat, attribute and geometry sources from `data_dir`.
///
/// Heat columns are denormalized as they are loaded.
fn load_segment_sources(
    config: &PipelineConfig,
    data_dir: &Path,
) -> Result<SegmentSources, Box<dyn std::error::Error>> {
    let mut heat = read_csv_path("urbanheat", &data_dir.join(&config.inputs.heat))?;
    config
        .heat
        .denormalization
        .apply_to_columns(&mut heat, &config.heat.columns)?;

    let attributes = read_csv_path("attributes", &data_dir.join(&config.inputs.attributes))?;
    let roads = read_features_path(
        "roads",
        &data_dir.join(&config.inputs.roads),
        &config.columns.segment.geometry,
    )?;

    Ok(SegmentSources {
        heat,
        attributes,
        roads,
    })
}

/// Fuses the segment sources on the join key.
fn fuse_sources(
    config: &PipelineConfig,
    sources: &SegmentSources,
) -> Result<FusedTable, Box<dyn std::error::Error>> {
    let fused = fuse(
        &config.join_key,
        &[&sources.heat, &sources.attributes, &sources.roads],
    )?;
    log::info!(
        "Fused {} segments over {} columns",
        fused.len(),
        fused.columns().len()
    );
    Ok(fused)
}

fn load_parcels(
    config: &PipelineConfig,
    data_dir: &Path,
) -> Result<ParcelIndex, Box<dyn std::error::Error>> {
    let table = read_csv_path("parcels", &data_dir.join(&config.inputs.parcels))?;
    let parcels = parcel_addresses(&table, &config.join_key, &config.columns.full_address)?;
    let index = ParcelIndex::new(parcels);
    log::info!("Loaded parcels for {} segments", index.segment_count());
    Ok(index)
}

/// Runs the full pipeline and writes the shuffled text CSV to `output`.
///
/// # Errors
///
/// Returns an error if any input fails to load, fusion fails, or any
/// segment fails to compose within the character limit.
pub fn run_compose(
    config: &PipelineConfig,
    data_dir: &Path,
    output: &Path,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline_start = Instant::now();
    let stages = StageBar::new(multi);

    stages.enter(Stage::Load);
    let sources = load_segment_sources(config, data_dir)?;
    let parcels = load_parcels(config, data_dir)?;
    let resolver =
        NeighborhoodResolver::load(data_dir, &config.sections, &config.neighborhoods)?;
    let zoning = config.zoning_table();

    stages.enter(Stage::Fuse);
    let fused = fuse_sources(config, &sources)?;
    let segments: Vec<Segment> = project_segments(&fused, &config.columns.segment)?;
    let fused_mean = mean_heat(&segments);
    log::info!("Mean heat over {} segments: {fused_mean:.2}°F", segments.len());

    stages.enter(Stage::Compose);
    let composer = TweetComposer::new(&parcels, &resolver, &zoning);
    let progress: Arc<dyn ComposeProgress> = Arc::new(ComposeBar::new(multi));
    let texts = validate_batch(
        &composer,
        &segments,
        fused_mean,
        config.char_limit,
        &progress,
    )?;

    stages.enter(Stage::Write);
    write_shuffled(output, texts, config.output.seed)?;

    let elapsed = pipeline_start.elapsed();
    stages.finish(elapsed);
    log::info!("Pipeline complete in {:.1}s", elapsed.as_secs_f64());
    Ok(())
}

/// Writes the street geometries with no fused data as `GeoJSON`.
///
/// # Errors
///
/// Returns an error if the inputs fail to load or the export cannot be
/// written.
pub fn run_no_data(
    config: &PipelineConfig,
    data_dir: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let sources = load_segment_sources(config, data_dir)?;
    let fused = fuse_sources(config, &sources)?;

    let rows = no_data::segments_without_data(&fused, &sources.roads)?;
    let collection = no_data::to_feature_collection(
        &rows,
        &config.join_key,
        &config.columns.segment.geometry,
    )?;

    std::fs::write(output, serde_json::to_string(&collection)?)?;
    log::info!(
        "Wrote {} no-data segments to {}",
        rows.len(),
        output.display()
    );
    Ok(())
}

/// Computes the house-number range of one segment's parcels.
///
/// # Errors
///
/// Returns an error if the parcel table fails to load.
pub fn run_range(
    config: &PipelineConfig,
    data_dir: &Path,
    segment_id: SegmentId,
) -> Result<String, Box<dyn std::error::Error>> {
    let parcels = load_parcels(config, data_dir)?;
    let addresses = parcels.addresses(segment_id);
    log::debug!("{segment_id}: {} parcel address(es)", addresses.len());
    Ok(street_heat_address::extract_range(addresses))
}

/// Resolves the no-data export path: the explicit override, else the
/// configured file.
#[must_use]
pub fn no_data_path(config: &PipelineConfig, output: Option<PathBuf>) -> Option<PathBuf> {
    output.or_else(|| config.output.no_data.as_ref().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use street_heat_cli_utils::ProgressDrawTarget;
    use street_heat_segment_models::ComposedText;
    use tempfile::TempDir;

    const HEAT: &str = "TLID,LST_CT,LST_weighted\n1,0.5,0.5\n2,0.6,0.6\n3,0.4,0.4\n";

    const ATTRIBUTES: &str = "TLID,FULLNAM,MAIN,cluster\n\
        1,Tremont St,1,2\n\
        2,Warren Ave,0,0\n\
        3,,0,\n\
        ,Orphan Rd,0,0\n";

    const PARCELS: &str = "TLID,full_address\n\
        1,10 Tremont St 02116\n\
        1,12 Tremont St 02116\n\
        2,15A Warren Ave 02118\n\
        ,1 Nowhere Pl 02118\n";

    fn road(id: i64, coords: &str) -> String {
        format!(
            r#"{{"type":"Feature","properties":{{"TLID":{id}}},"geometry":{{"type":"LineString","coordinates":{coords}}}}}"#
        )
    }

    fn area(property: &str, name: &str, x0: f64, x1: f64) -> String {
        format!(
            r#"{{"type":"Feature","properties":{{"{property}":"{name}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x0},0.0],[{x1},0.0],[{x1},1.0],[{x0},1.0],[{x0},0.0]]]}}}}"#
        )
    }

    fn collection(features: &[String]) -> String {
        format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        )
    }

    /// Writes every configured input into a fresh directory.
    fn data_dir(config: &PipelineConfig) -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = dir.path();

        std::fs::write(path.join(&config.inputs.heat), HEAT).unwrap();
        std::fs::write(path.join(&config.inputs.attributes), ATTRIBUTES).unwrap();
        std::fs::write(path.join(&config.inputs.parcels), PARCELS).unwrap();
        std::fs::write(
            path.join(&config.inputs.roads),
            collection(&[
                road(1, "[[0.2,0.5],[0.8,0.5]]"),
                road(2, "[[0.5,0.5],[1.5,0.5]]"),
                road(3, "[[5.0,5.0],[6.0,5.0]]"),
                road(5, "[[0.1,0.1],[0.2,0.2]]"),
            ]),
        )
        .unwrap();
        std::fs::write(
            path.join(&config.sections.path),
            collection(&[
                area("NBHDS89_", "Bay Village", 0.0, 1.0),
                area("NBHDS89_", "Unnamed", 1.0, 2.0),
            ]),
        )
        .unwrap();
        std::fs::write(
            path.join(&config.neighborhoods.path),
            collection(&[area("Name", "Back Bay", 0.0, 2.0)]),
        )
        .unwrap();

        dir
    }

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn read_output(path: &Path) -> Vec<ComposedText> {
        csv::Reader::from_path(path)
            .unwrap()
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn compose_writes_one_row_per_heat_segment() {
        let mut config = PipelineConfig::load(None).unwrap();
        config.output.seed = Some(7);
        let dir = data_dir(&config);
        let output = dir.path().join("tweets.csv");

        run_compose(&config, dir.path(), &output, &hidden()).unwrap();

        let mut texts = read_output(&output);
        texts.sort_by_key(|t| t.segment_id);
        let ids: Vec<i64> = texts.iter().map(|t| t.segment_id.value()).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert!(texts.iter().all(|t| t.char_len() <= 280));

        assert!(texts[0].text.starts_with(
            "10-12 Tremont St is a main street located in the Bay Village neighborhood \
             with 2 parcels, mostly commercial. Its summer land surface temperature \
             averaged 94.4°F,"
        ));
        assert!(texts[1].text.starts_with(
            "15A Warren Ave is a street located in the Back Bay neighborhood \
             with 1 parcel which is residential."
        ));
        assert!(texts[2].text.starts_with(
            "This segment of This is a street in Boston with 0 parcels."
        ));
    }

    #[test]
    fn seeded_compose_is_reproducible() {
        let mut config = PipelineConfig::load(None).unwrap();
        config.output.seed = Some(11);
        let dir = data_dir(&config);
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");

        run_compose(&config, dir.path(), &first, &hidden()).unwrap();
        run_compose(&config, dir.path(), &second, &hidden()).unwrap();

        assert_eq!(read_output(&first), read_output(&second));
    }

    #[test]
    fn over_limit_writes_nothing() {
        let mut config = PipelineConfig::load(None).unwrap();
        config.char_limit = 20;
        let dir = data_dir(&config);
        let output = dir.path().join("tweets.csv");

        assert!(run_compose(&config, dir.path(), &output, &hidden()).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_fails_before_writing() {
        let config = PipelineConfig::load(None).unwrap();
        let dir = data_dir(&config);
        std::fs::remove_file(dir.path().join(&config.inputs.parcels)).unwrap();
        let output = dir.path().join("tweets.csv");

        assert!(run_compose(&config, dir.path(), &output, &hidden()).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn no_data_exports_unfused_roads() {
        let config = PipelineConfig::load(None).unwrap();
        let dir = data_dir(&config);
        let output = dir.path().join("no_data.geojson");

        run_no_data(&config, dir.path(), &output).unwrap();

        let exported: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let features = exported["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["TLID"], serde_json::json!(5));
        assert_eq!(features[0]["geometry"]["type"], "LineString");
    }

    #[test]
    fn range_of_one_segment() {
        let config = PipelineConfig::load(None).unwrap();
        let dir = data_dir(&config);

        assert_eq!(run_range(&config, dir.path(), SegmentId(1)).unwrap(), "10-12");
        assert_eq!(run_range(&config, dir.path(), SegmentId(2)).unwrap(), "15A");
        assert_eq!(run_range(&config, dir.path(), SegmentId(3)).unwrap(), "");
    }

    #[test]
    fn no_data_path_prefers_override() {
        let config = PipelineConfig::load(None).unwrap();
        assert_eq!(
            no_data_path(&config, Some(PathBuf::from("markers.geojson"))),
            Some(PathBuf::from("markers.geojson"))
        );
        assert_eq!(
            no_data_path(&config, None),
            Some(PathBuf::from("no_data.geojson"))
        );
    }

    #[test]
    fn no_data_path_absent_without_config() {
        let mut config = PipelineConfig::load(None).unwrap();
        config.output.no_data = None;
        assert_eq!(no_data_path(&config, None), None);
    }
}
