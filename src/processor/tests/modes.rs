//! Matching-mode scenarios

use super::{create_run_files, read_lines, test_config};
use crate::models::{CornerMode, MatchMode};
use crate::processor::CoordinateCleaner;
use tempfile::TempDir;

#[tokio::test]
async fn test_string_only_excludes_truncated_match() {
    let temp_dir = TempDir::new().unwrap();
    let paths = create_run_files(&temp_dir, "Speciesa,12.3456,45.6789,extra\n", "12.34,45.67\n");

    let cleaner = CoordinateCleaner::new(paths.clone(), test_config(MatchMode::StringOnly)).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.records_processed, 1);
    assert_eq!(stats.string_matches, 1);
    assert_eq!(stats.rounding_matches, 0);
    assert_eq!(stats.excluded, 1);
    assert!(read_lines(&paths.good_output).is_empty());
    assert_eq!(
        read_lines(&paths.bad_output),
        vec!["Speciesa,12.3456,45.6789,extra"]
    );
}

#[tokio::test]
async fn test_neither_mode_does_not_read_bad_coordinates() {
    let temp_dir = TempDir::new().unwrap();
    let mut paths =
        create_run_files(&temp_dir, "Speciesa,12.3456,45.6789,extra\n", "12.34,45.67\n");
    paths.bad_coordinates = temp_dir.path().join("does-not-exist.txt");

    let cleaner = CoordinateCleaner::new(paths.clone(), test_config(MatchMode::Neither)).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.retained, 1);
    assert_eq!(stats.excluded, 0);
    assert_eq!(stats.bad_coordinates_loaded, 0);
    assert_eq!(
        read_lines(&paths.good_output),
        vec!["Speciesa,12.3456,45.6789,extra"]
    );
}

#[tokio::test]
async fn test_imprecise_record_excluded_in_every_mode() {
    for mode in [
        MatchMode::StringOnly,
        MatchMode::RoundingOnly,
        MatchMode::Both,
        MatchMode::Neither,
    ] {
        let temp_dir = TempDir::new().unwrap();
        let paths = create_run_files(&temp_dir, "Speciesb,1.1,2.2,extra\n", "12.34,45.67\n");

        let cleaner = CoordinateCleaner::new(paths.clone(), test_config(mode)).unwrap();
        let stats = cleaner.run().await.unwrap();

        assert_eq!(stats.imprecise, 1, "mode {mode}");
        assert_eq!(stats.coordinate_matches(), 0, "mode {mode}");
        assert_eq!(read_lines(&paths.bad_output), vec!["Speciesb,1.1,2.2,extra"]);
    }
}

#[tokio::test]
async fn test_rounding_only_uses_cell_centre() {
    let temp_dir = TempDir::new().unwrap();
    let localities = "near,12.3449,45.6701,a\nfar,12.3456,45.6789,b\n";
    let paths = create_run_files(&temp_dir, localities, "12.34,45.67\n");

    let cleaner =
        CoordinateCleaner::new(paths.clone(), test_config(MatchMode::RoundingOnly)).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.rounding_matches, 1);
    assert_eq!(stats.string_matches, 0);
    assert_eq!(read_lines(&paths.bad_output), vec!["near,12.3449,45.6701,a"]);
    assert_eq!(read_lines(&paths.good_output), vec!["far,12.3456,45.6789,b"]);
}

#[tokio::test]
async fn test_both_modes_count_each_strategy() {
    let temp_dir = TempDir::new().unwrap();
    let localities = "both,12.3449,45.6701,a\nstring,12.3456,45.6789,b\nclean,50.1234,8.5678,c\n";
    let paths = create_run_files(&temp_dir, localities, "12.34,45.67\n");

    let cleaner = CoordinateCleaner::new(paths.clone(), test_config(MatchMode::Both)).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.records_processed, 3);
    assert_eq!(stats.rounding_matches, 1);
    assert_eq!(stats.string_matches, 2);
    assert_eq!(stats.excluded, 2);
    assert_eq!(stats.retained, 1);
    assert_eq!(read_lines(&paths.good_output), vec!["clean,50.1234,8.5678,c"]);
}

#[tokio::test]
async fn test_padding_prevents_false_positive_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let paths = create_run_files(&temp_dir, "Speciesc,10.83,123.123,x\n", "0.83,123.12\n");

    let cleaner = CoordinateCleaner::new(paths.clone(), test_config(MatchMode::StringOnly)).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.string_matches, 0);
    assert_eq!(read_lines(&paths.good_output), vec!["Speciesc,10.83,123.123,x"]);
}

#[tokio::test]
async fn test_south_west_corner_mode() {
    let temp_dir = TempDir::new().unwrap();
    let localities = "inside,40.8612,73.8791,a\noutside,40.8712,73.8791,b\n";
    let corners = "40.87,73.87\n40.86,73.87\n40.87,73.88\n40.86,73.88\n";
    let paths = create_run_files(&temp_dir, localities, corners);

    let config = test_config(MatchMode::StringOnly).with_corners(CornerMode::SouthWest);
    let cleaner = CoordinateCleaner::new(paths.clone(), config).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.bad_coordinates_loaded, 1);
    assert_eq!(read_lines(&paths.bad_output), vec!["inside,40.8612,73.8791,a"]);
    assert_eq!(read_lines(&paths.good_output), vec!["outside,40.8712,73.8791,b"]);
}
