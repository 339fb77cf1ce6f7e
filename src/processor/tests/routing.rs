//! Output routing and line preservation tests

use super::{create_run_files, read_lines, test_config};
use crate::models::MatchMode;
use crate::processor::CoordinateCleaner;
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_every_record_lands_in_exactly_one_output() {
    let temp_dir = TempDir::new().unwrap();
    let localities = "\
a,12.3456,45.6789,x
b,1.1,2.2,x
c,50.1234,8.5678,x
d,45.166666,7.833333,x
e,-33.9249,18.4241,x
f,12.34,45.67,x
";
    let paths = create_run_files(&temp_dir, localities, "12.34,45.67\n-33.92,18.42\n");

    let cleaner = CoordinateCleaner::new(paths.clone(), test_config(MatchMode::Both)).unwrap();
    let stats = cleaner.run().await.unwrap();

    let good = read_lines(&paths.good_output);
    let bad = read_lines(&paths.bad_output);

    assert_eq!(good.len() + bad.len(), 6);
    assert_eq!(stats.retained, good.len());
    assert_eq!(stats.excluded, bad.len());
    for line in &good {
        assert!(!bad.contains(line), "{line} written to both outputs");
    }
    assert_eq!(good, vec!["c,50.1234,8.5678,x"]);
    assert_eq!(stats.imprecise, 2);
}

#[tokio::test]
async fn test_tab_delimited_lines_are_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let localities = "Quercus alba\t38.6141\t-90.2589\tMO\nQuercus rubra\t38.61\t-90.25\tMO\n";
    let paths = create_run_files(&temp_dir, localities, "38.61\t-90.25\n");

    let cleaner = CoordinateCleaner::new(paths.clone(), test_config(MatchMode::StringOnly)).unwrap();
    cleaner.run().await.unwrap();

    assert_eq!(
        fs::read_to_string(&paths.bad_output).unwrap(),
        "Quercus alba\t38.6141\t-90.2589\tMO\nQuercus rubra\t38.61\t-90.25\tMO\n"
    );
    assert_eq!(fs::read_to_string(&paths.good_output).unwrap(), "");
}

#[tokio::test]
async fn test_carriage_returns_are_stripped() {
    let temp_dir = TempDir::new().unwrap();
    let paths = create_run_files(&temp_dir, "a,50.1234,8.5678,x\r\nb,1.1,2.2,x\r\n", "");

    let cleaner = CoordinateCleaner::new(paths.clone(), test_config(MatchMode::StringOnly)).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.bad_coordinates_loaded, 0);
    assert_eq!(fs::read_to_string(&paths.good_output).unwrap(), "a,50.1234,8.5678,x\n");
    assert_eq!(fs::read_to_string(&paths.bad_output).unwrap(), "b,1.1,2.2,x\n");
}

#[tokio::test]
async fn test_extra_payload_fields_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let line = "Abies alba,46.2274,6.1469,G,Geneva,1897,\"quoted, text\"";
    let paths = create_run_files(&temp_dir, &format!("{line}\n"), "46.22,6.14\n");

    let cleaner =
        CoordinateCleaner::new(paths.clone(), test_config(MatchMode::RoundingOnly)).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.retained, 1);
    assert_eq!(read_lines(&paths.good_output), vec![line]);
}

#[tokio::test]
async fn test_latin1_payload_passes_through() {
    let temp_dir = TempDir::new().unwrap();
    let paths = create_run_files(&temp_dir, "", "40.41,-3.70\n");
    fs::write(
        &paths.localities,
        b"good1,50.1234,8.5678,x\nEspa\xf1a sp,40.4168,-3.7038,Madrid\ngood2,48.8566,2.3522,y\n",
    )
    .unwrap();

    let cleaner = CoordinateCleaner::new(paths.clone(), test_config(MatchMode::StringOnly)).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.records_processed, 3);
    assert_eq!(stats.malformed, 0);
    assert_eq!(
        fs::read(&paths.good_output).unwrap(),
        b"good1,50.1234,8.5678,x\ngood2,48.8566,2.3522,y\n"
    );
    assert_eq!(
        fs::read(&paths.bad_output).unwrap(),
        b"Espa\xf1a sp,40.4168,-3.7038,Madrid\n"
    );
}

#[tokio::test]
async fn test_carriage_return_only_line_endings() {
    let temp_dir = TempDir::new().unwrap();
    let paths = create_run_files(&temp_dir, "a,50.1234,8.5678,x\rb,1.1,2.2,x\r", "12.34,45.67\r");

    let cleaner = CoordinateCleaner::new(paths.clone(), test_config(MatchMode::Both)).unwrap();
    let stats = cleaner.run().await.unwrap();

    assert_eq!(stats.records_processed, 2);
    assert_eq!(stats.imprecise, 1);
    assert_eq!(fs::read_to_string(&paths.good_output).unwrap(), "a,50.1234,8.5678,x\n");
    assert_eq!(fs::read_to_string(&paths.bad_output).unwrap(), "b,1.1,2.2,x\n");
}
