//! End-to-end tests over temp directory fixtures: path resolution, walks, both producers.

use dirsource::engine::resolve_search_path;
use dirsource::pipeline::{DepthFilter, EntryKind, HighWaterOrder, NameFilter, WalkSpec};
use dirsource::utils::TreeConsts;
use dirsource::{
    FileRecord, FileSource, HighWater, SourceConfig, SourceError, TreeRecord, TreeSource,
};
use serial_test::serial;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const ENV_VAR: &str = "DIRSOURCE_TEST_SEARCH_PATH";

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn config_for(root: &Path) -> SourceConfig {
    SourceConfig {
        path: Some(root.to_path_buf()),
        ..Default::default()
    }
}

fn file_records(config: &SourceConfig, high_water: Option<&HighWater>) -> Vec<FileRecord> {
    FileSource::new(config, high_water)
        .unwrap()
        .records()
        .collect::<dirsource::Result<Vec<_>>>()
        .unwrap()
}

fn tree_records(config: &SourceConfig) -> Vec<TreeRecord> {
    ordered_tree_records(config, None)
}

fn ordered_tree_records(
    config: &SourceConfig,
    high_water: Option<&HighWater>,
) -> Vec<TreeRecord> {
    TreeSource::new(config, high_water)
        .unwrap()
        .records()
        .collect::<dirsource::Result<Vec<_>>>()
        .unwrap()
}

/// Paths of directory records and of document records, in emitted order.
fn phases(records: &[TreeRecord]) -> (Vec<&str>, Vec<&str>) {
    let (dirs, docs): (Vec<&TreeRecord>, Vec<&TreeRecord>) =
        records.iter().partition(|r| r.media.is_some());
    (
        dirs.iter().map(|r| r.path.as_str()).collect(),
        docs.iter().map(|r| r.path.as_str()).collect(),
    )
}

fn sorted_paths<'a>(paths: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut v: Vec<String> = paths.map(str::to_string).collect();
    v.sort();
    v
}

// --- resolve_search_path ---

#[test]
#[serial]
fn test_resolve_requires_path_or_env() {
    let err = resolve_search_path(&SourceConfig::default()).unwrap_err();
    match err {
        SourceError::Requirements(msg) => {
            assert!(msg.contains("path"));
            assert!(msg.contains("path_env"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
#[serial]
fn test_resolve_unset_env_is_requirements_error() {
    unsafe { std::env::remove_var(ENV_VAR) };
    let config = SourceConfig {
        path_env: Some(ENV_VAR.to_string()),
        path: Some(PathBuf::from("/ignored")),
        ..Default::default()
    };
    let err = resolve_search_path(&config).unwrap_err();
    assert!(matches!(err, SourceError::Requirements(msg) if msg.contains(ENV_VAR)));
}

#[test]
#[serial]
fn test_resolve_empty_env_is_requirements_error() {
    unsafe { std::env::set_var(ENV_VAR, "") };
    let config = SourceConfig {
        path_env: Some(ENV_VAR.to_string()),
        ..Default::default()
    };
    assert!(matches!(
        resolve_search_path(&config),
        Err(SourceError::Requirements(_))
    ));
    unsafe { std::env::remove_var(ENV_VAR) };
}

#[test]
#[serial]
fn test_resolve_env_value_used_verbatim() {
    unsafe { std::env::set_var(ENV_VAR, "relative/photos dir") };
    let config = SourceConfig {
        path_env: Some(ENV_VAR.to_string()),
        path: Some(PathBuf::from("/ignored")),
        ..Default::default()
    };
    assert_eq!(
        resolve_search_path(&config).unwrap(),
        PathBuf::from("relative/photos dir")
    );
    unsafe { std::env::remove_var(ENV_VAR) };
}

#[test]
fn test_resolve_path_verbatim() {
    let config = config_for(Path::new("some/where"));
    assert_eq!(
        resolve_search_path(&config).unwrap(),
        PathBuf::from("some/where")
    );
}

#[test]
#[serial]
fn test_source_from_env_walks_that_root() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.txt", "a");
    unsafe { std::env::set_var(ENV_VAR, tmp.path()) };
    let config = SourceConfig {
        path_env: Some(ENV_VAR.to_string()),
        ..Default::default()
    };
    let records = file_records(&config, None);
    unsafe { std::env::remove_var(ENV_VAR) };
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "a.txt");
}

#[test]
fn test_invalid_sort_field_fails_before_walk() {
    let config = config_for(Path::new("/does/not/exist"));
    let err = FileSource::new(&config, Some(&HighWater::new("weight"))).unwrap_err();
    assert!(matches!(err, SourceError::UnknownSortField(_)));
}

// --- walk ---

fn depth_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.txt", "a");
    write(tmp.path(), "d1/b.txt", "b");
    write(tmp.path(), "d1/d2/c.txt", "c");
    write(tmp.path(), ".hidden/h.txt", "h");
    write(tmp.path(), ".dotfile", "x");
    tmp
}

fn walk_paths(spec: WalkSpec) -> Vec<String> {
    let entries = spec.walk().collect::<dirsource::Result<Vec<_>>>().unwrap();
    sorted_paths(entries.iter().map(|e| e.relative_path.as_str()))
}

#[test]
fn test_walk_files_skips_hidden() {
    let tmp = depth_fixture();
    let paths = walk_paths(WalkSpec::new(tmp.path(), EntryKind::Files));
    assert_eq!(paths, vec!["a.txt", "d1/b.txt", "d1/d2/c.txt"]);
}

#[test]
fn test_walk_directories_only() {
    let tmp = depth_fixture();
    let paths = walk_paths(WalkSpec::new(tmp.path(), EntryKind::Directories));
    assert_eq!(paths, vec!["d1", "d1/d2"]);
}

#[test]
fn test_walk_depth_zero_is_root_level_only() {
    let tmp = depth_fixture();
    let spec = WalkSpec {
        depth: DepthFilter::new(&["== 0"]).unwrap(),
        ..WalkSpec::new(tmp.path(), EntryKind::Files)
    };
    assert_eq!(walk_paths(spec), vec!["a.txt"]);
}

#[test]
fn test_walk_depth_less_than_two() {
    let tmp = depth_fixture();
    let spec = WalkSpec {
        depth: DepthFilter::new(&["< 2"]).unwrap(),
        ..WalkSpec::new(tmp.path(), EntryKind::Files)
    };
    assert_eq!(walk_paths(spec), vec!["a.txt", "d1/b.txt"]);
}

#[test]
fn test_walk_depth_lower_bound_still_descends() {
    let tmp = depth_fixture();
    let spec = WalkSpec {
        depth: DepthFilter::new(&["> 1"]).unwrap(),
        ..WalkSpec::new(tmp.path(), EntryKind::Files)
    };
    assert_eq!(walk_paths(spec), vec!["d1/d2/c.txt"]);
}

#[test]
fn test_walk_include_and_exclude_conjunctive() {
    let tmp = depth_fixture();
    write(tmp.path(), "d1/keep.md", "k");
    let spec = WalkSpec {
        include: NameFilter::new(&["*.txt", "*.md"]).unwrap(),
        exclude: NameFilter::new(&["b.txt"]).unwrap(),
        depth: DepthFilter::new(&["< 2"]).unwrap(),
        ..WalkSpec::new(tmp.path(), EntryKind::Files)
    };
    assert_eq!(walk_paths(spec), vec!["a.txt", "d1/keep.md"]);
}

#[test]
fn test_walk_exclude_does_not_prune_directories() {
    let tmp = depth_fixture();
    let spec = WalkSpec {
        exclude: NameFilter::new(&["d1"]).unwrap(),
        ..WalkSpec::new(tmp.path(), EntryKind::Files)
    };
    assert_eq!(
        walk_paths(spec),
        vec!["a.txt", "d1/b.txt", "d1/d2/c.txt"]
    );
}

#[test]
fn test_walk_missing_root_is_error() {
    let tmp = TempDir::new().unwrap();
    let mut walk = WalkSpec::new(tmp.path().join("missing"), EntryKind::Files).walk();
    assert!(matches!(walk.next(), Some(Err(SourceError::Walk { .. }))));
    assert!(walk.next().is_none());
}

#[test]
fn test_walk_missing_root_skipped_when_configured() {
    let tmp = TempDir::new().unwrap();
    let spec = WalkSpec {
        skip_errors: true,
        ..WalkSpec::new(tmp.path().join("missing"), EntryKind::Files)
    };
    let mut walk = spec.walk();
    assert!(walk.next().is_none());
    assert_eq!(walk.skipped().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_walk_follows_symlinks() {
    let tmp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    write(outside.path(), "x.txt", "x");
    std::os::unix::fs::symlink(outside.path(), tmp.path().join("linked")).unwrap();
    let paths = walk_paths(WalkSpec::new(tmp.path(), EntryKind::Files));
    assert_eq!(paths, vec!["linked/x.txt"]);
}

#[cfg(unix)]
fn dangling_link_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "Album/a.jpg", "a");
    write(tmp.path(), "z.jpg", "z");
    let link = tmp.path().join("Album/dangling.jpg");
    std::os::unix::fs::symlink("/nonexistent/target", link).unwrap();
    tmp
}

#[cfg(unix)]
#[test]
fn test_walk_sorted_skips_dangling_symlink() {
    let tmp = dangling_link_fixture();
    let spec = WalkSpec {
        order: Some(HighWaterOrder::new(&HighWater::new("path")).unwrap()),
        ..WalkSpec::new(tmp.path(), EntryKind::Files)
    };
    let mut walk = spec.walk();
    let paths: Vec<String> = walk
        .by_ref()
        .map(|e| e.unwrap().relative_path)
        .collect();
    assert_eq!(paths, vec!["Album/a.jpg", "z.jpg"]);
    assert!(walk.skipped().is_empty());
}

fn set_mtime(path: &Path, secs: u64) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

#[test]
fn test_walk_sorted_by_time_modified() {
    let tmp = TempDir::new().unwrap();
    for (name, secs) in [("a.txt", 3_000), ("b.txt", 1_000), ("c.txt", 2_000)] {
        write(tmp.path(), name, name);
        set_mtime(&tmp.path().join(name), secs);
    }
    let spec = WalkSpec {
        order: Some(HighWaterOrder::new(&HighWater::new("time_modified")).unwrap()),
        ..WalkSpec::new(tmp.path(), EntryKind::Files)
    };
    let entries = spec.walk().collect::<dirsource::Result<Vec<_>>>().unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.file_name.as_str()).collect();
    assert_eq!(names, vec!["b.txt", "c.txt", "a.txt"]);
    let times: Vec<i64> = entries.iter().map(|e| e.time_modified).collect();
    assert_eq!(times, vec![1_000, 2_000, 3_000]);
}

// --- FileSource ---

#[test]
fn test_file_records_fields() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "top.txt", "12345");
    write(tmp.path(), "Trip/Photo.JPG", "jpg");
    let mut records = file_records(&config_for(tmp.path()), None);
    records.sort_by(|a, b| a.path.cmp(&b.path));
    assert_eq!(records.len(), 2);

    let photo = &records[0];
    assert_eq!(photo.path, "Trip/Photo.JPG");
    assert_eq!(photo.parent_path.as_deref(), Some("Trip"));
    assert_eq!(photo.name, "Photo.JPG");
    assert_eq!(photo.basename, "Photo");
    assert_eq!(photo.extension, "JPG");
    assert_eq!(photo.size, 3);
    assert_eq!(
        PathBuf::from(&photo.absolute_path),
        tmp.path().join("Trip/Photo.JPG")
    );

    let top = &records[1];
    assert_eq!(top.path, "top.txt");
    assert_eq!(top.parent_path, None);
    assert_eq!(top.size, 5);
}

#[test]
fn test_file_records_unique_paths_and_parents() {
    let tmp = depth_fixture();
    let records = file_records(&config_for(tmp.path()), None);
    let paths: HashSet<&str> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths.len(), records.len());
    for r in &records {
        match &r.parent_path {
            None => assert!(!r.path.contains('/')),
            Some(parent) => assert_eq!(r.path, format!("{}/{}", parent, r.name)),
        }
    }
}

#[test]
fn test_file_records_sorted_by_size_with_high_water() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "big.bin", &"x".repeat(30));
    write(tmp.path(), "small.bin", "x");
    write(tmp.path(), "mid.bin", &"x".repeat(10));

    let all = file_records(&config_for(tmp.path()), Some(&HighWater::new("size")));
    let sizes: Vec<u64> = all.iter().map(|r| r.size).collect();
    assert_eq!(sizes, vec![1, 10, 30]);

    let resumed = file_records(
        &config_for(tmp.path()),
        Some(&HighWater::new("size").after("1")),
    );
    let names: Vec<&str> = resumed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["mid.bin", "big.bin"]);
}

#[cfg(unix)]
#[test]
fn test_file_records_skip_dangling_symlink() {
    let tmp = dangling_link_fixture();
    let records = file_records(&config_for(tmp.path()), None);
    let paths = sorted_paths(records.iter().map(|r| r.path.as_str()));
    assert_eq!(paths, vec!["Album/a.jpg", "z.jpg"]);
}

#[test]
fn test_file_records_restartable() {
    let tmp = depth_fixture();
    let source = FileSource::new(&config_for(tmp.path()), None).unwrap();
    let first = source.records().count();
    let second = source.records().count();
    assert_eq!(first, 3);
    assert_eq!(first, second);
}

#[test]
fn test_file_source_fields_and_ids() {
    let names: Vec<&str> = FileSource::fields().iter().map(|(n, _)| *n).collect();
    assert!(names.contains(&"basename"));
    assert!(names.contains(&"size"));
    let ids = FileSource::ids();
    assert_eq!(ids.field, "path");
    assert_eq!(ids.max_length, 255);
    assert!(!ids.is_ascii);
}

// --- TreeSource ---

/// Converter stand-in: fails for paths containing "broken", otherwise echoes the file name.
#[cfg(unix)]
fn fake_converter(dir: &Path) -> String {
    use std::os::unix::fs::PermissionsExt;
    let script = dir.join("fake-pandoc");
    fs::write(
        &script,
        "#!/bin/sh\n\
         case \"$1\" in\n\
         *broken*) echo \"cannot read $1\"; exit 3 ;;\n\
         esac\n\
         [ \"$2\" = \"-t\" ] && [ \"$3\" = \"html5\" ] || exit 9\n\
         echo\n\
         echo \"<p>$(basename \"$1\")</p>\"\n\
         echo\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script.to_string_lossy().into_owned()
}

#[cfg(unix)]
fn tree_fixture() -> (TempDir, TempDir, SourceConfig) {
    let tmp = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "(3) Summer Trip/(0).docx", "desc");
    write(root, "(3) Summer Trip/b.png", "b");
    write(root, "(3) Summer Trip/a.JPG", "a");
    write(root, "(3) Summer Trip/Thumbs.db", "t");
    write(root, "(3) Summer Trip/notes.txt", "trip notes");
    write(root, "(3) Summer Trip/.DS_Store", "d");
    write(root, "Plain/clip.MP4", "m");
    write(root, "Plain/Sub/story.docx", "s");
    write(root, "broken dir/(0).docx", "x");
    write(root, "broken dir/c.gif", "c");
    write(root, "loose.txt", "hello\n");
    write(root, "broken.rtf", "r");
    fs::create_dir_all(root.join("Empty")).unwrap();
    let config = SourceConfig {
        converter: Some(fake_converter(tools.path())),
        ..config_for(root)
    };
    (tmp, tools, config)
}

#[cfg(unix)]
fn by_path<'a>(records: &'a [TreeRecord], path: &str) -> &'a TreeRecord {
    records
        .iter()
        .find(|r| r.path == path)
        .unwrap_or_else(|| panic!("no record for {path}"))
}

#[cfg(unix)]
#[test]
fn test_tree_directory_record() {
    let (_tmp, _tools, config) = tree_fixture();
    let records = tree_records(&config);
    let trip = by_path(&records, "(3) Summer Trip");
    assert_eq!(trip.name, "(3) Summer Trip");
    assert_eq!(trip.parent_path, None);
    assert_eq!(trip.weight, Some(-9997));
    assert_eq!(trip.description, "<p>(0).docx</p>");
    let media = trip.media.as_ref().unwrap();
    let media: Vec<(&str, &str)> = media
        .iter()
        .map(|m| (m.path.as_str(), m.extension.as_str()))
        .collect();
    assert_eq!(
        media,
        vec![
            ("(3) Summer Trip/a.JPG", "jpg"),
            ("(3) Summer Trip/b.png", "png"),
        ]
    );
}

#[cfg(unix)]
#[test]
fn test_tree_without_prefix_or_description() {
    let (_tmp, _tools, config) = tree_fixture();
    let records = tree_records(&config);
    let plain = by_path(&records, "Plain");
    assert_eq!(plain.weight, None);
    assert_eq!(plain.description, "");
    assert_eq!(plain.media.as_ref().unwrap().len(), 1);
    assert_eq!(plain.media.as_ref().unwrap()[0].extension, "mp4");

    let sub = by_path(&records, "Plain/Sub");
    assert_eq!(sub.parent_path.as_deref(), Some("Plain"));
    assert_eq!(sub.media, Some(vec![]));
}

#[cfg(unix)]
#[test]
fn test_tree_skips_empty_directories() {
    let (_tmp, _tools, config) = tree_fixture();
    let records = tree_records(&config);
    assert!(records.iter().all(|r| r.path != "Empty"));
}

#[cfg(unix)]
#[test]
fn test_tree_failed_description_falls_back_to_empty() {
    let (_tmp, _tools, config) = tree_fixture();
    let records = tree_records(&config);
    let broken = by_path(&records, "broken dir");
    assert_eq!(broken.description, "");
    assert_eq!(broken.media.as_ref().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_tree_document_records() {
    let (_tmp, _tools, config) = tree_fixture();
    let records = tree_records(&config);

    let loose = by_path(&records, "loose.txt");
    assert_eq!(loose.name, "loose");
    assert_eq!(loose.parent_path, None);
    assert_eq!(loose.description, "hello\n");
    assert_eq!(loose.media, None);
    assert_eq!(loose.weight, None);

    let notes = by_path(&records, "(3) Summer Trip/notes.txt");
    assert_eq!(notes.parent_path.as_deref(), Some("(3) Summer Trip"));
    assert_eq!(notes.description, "trip notes");

    let story = by_path(&records, "Plain/Sub/story.docx");
    assert_eq!(story.description, "<p>story.docx</p>");

    let broken = by_path(&records, "broken.rtf");
    assert_eq!(broken.description, TreeConsts::IMPORT_ERROR_MESSAGE);

    assert!(records.iter().all(|r| !r.path.ends_with("(0).docx")));
}

#[cfg(unix)]
#[test]
fn test_tree_directories_precede_documents() {
    let (_tmp, _tools, config) = tree_fixture();
    let records = tree_records(&config);
    let first_doc = records.iter().position(|r| r.media.is_none()).unwrap();
    assert!(records[..first_doc].iter().all(|r| r.media.is_some()));
    assert!(records[first_doc..].iter().all(|r| r.media.is_none()));
    assert_eq!(first_doc, 4);
    assert_eq!(records.len(), 8);
}

#[cfg(unix)]
#[test]
fn test_tree_paths_unique() {
    let (_tmp, _tools, config) = tree_fixture();
    let records = tree_records(&config);
    let paths: HashSet<&str> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths.len(), records.len());
}

#[test]
fn test_tree_missing_converter_is_not_fatal() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "Album/(0).docx", "d");
    write(tmp.path(), "Album/a.jpg", "a");
    write(tmp.path(), "letter.docx", "l");
    let config = SourceConfig {
        converter: Some("dirsource-test-no-such-converter".to_string()),
        ..config_for(tmp.path())
    };
    let records = tree_records(&config);
    assert_eq!(records.len(), 2);
    assert_eq!(by_path_any(&records, "Album").description, "");
    assert_eq!(
        by_path_any(&records, "letter.docx").description,
        TreeConsts::IMPORT_ERROR_MESSAGE
    );
}

#[cfg(unix)]
#[test]
fn test_tree_records_skip_dangling_symlink() {
    let tmp = dangling_link_fixture();
    let records = tree_records(&config_for(tmp.path()));
    assert_eq!(records.len(), 1);
    let album = &records[0];
    assert_eq!(album.path, "Album");
    let media: Vec<&str> = album
        .media
        .as_ref()
        .unwrap()
        .iter()
        .map(|m| m.path.as_str())
        .collect();
    assert_eq!(media, vec!["Album/a.jpg"]);
}

fn ordered_tree_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for rel in ["C/n.txt", "A/n.txt", "B/n.txt", "B/D/m.txt", "top.txt"] {
        write(tmp.path(), rel, rel);
    }
    tmp
}

#[test]
fn test_tree_sorted_by_path_in_both_phases() {
    let tmp = ordered_tree_fixture();
    let by_path_order = HighWater::new("path");
    let records = ordered_tree_records(&config_for(tmp.path()), Some(&by_path_order));
    let (dirs, docs) = phases(&records);
    assert_eq!(dirs, vec!["A", "B", "B/D", "C"]);
    assert_eq!(
        docs,
        vec!["A/n.txt", "B/D/m.txt", "B/n.txt", "C/n.txt", "top.txt"]
    );
    // Directory records all come before the first document.
    assert!(records[..4].iter().all(|r| r.media.is_some()));
}

#[test]
fn test_tree_high_water_applies_to_both_phases() {
    let tmp = ordered_tree_fixture();
    let records = ordered_tree_records(
        &config_for(tmp.path()),
        Some(&HighWater::new("path").after("B")),
    );
    let (dirs, docs) = phases(&records);
    assert_eq!(dirs, vec!["B/D", "C"]);
    assert_eq!(docs, vec!["B/D/m.txt", "B/n.txt", "C/n.txt", "top.txt"]);
}

#[test]
fn test_tree_include_exclude_only_filter_directories() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "Album/a.jpg", "a");
    write(tmp.path(), "Books/b.txt", "b");
    write(tmp.path(), "loose.txt", "l");
    let config = SourceConfig {
        include: vec!["A*".to_string()],
        exclude: vec!["*.txt".to_string()],
        ..config_for(tmp.path())
    };
    let records = ordered_tree_records(&config, Some(&HighWater::new("path")));
    let (dirs, docs) = phases(&records);
    assert_eq!(dirs, vec!["Album"]);
    assert_eq!(docs, vec!["Books/b.txt", "loose.txt"]);
}

#[test]
fn test_tree_record_errors_skipped_and_counted() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "A/a.jpg", "a");
    write(tmp.path(), "B/b.jpg", "b");
    let config = SourceConfig {
        skip_errors: true,
        ..config_for(tmp.path())
    };
    // A sorted walk lists both directories up front, so B can vanish before its record.
    let source = TreeSource::new(&config, Some(&HighWater::new("path"))).unwrap();
    let mut records = source.records();
    assert_eq!(records.next().unwrap().unwrap().path, "A");
    fs::remove_dir_all(tmp.path().join("B")).unwrap();
    assert!(records.next().is_none());
    assert_eq!(records.skipped().len(), 1);
    assert_eq!(records.skipped()[0].0, tmp.path().join("B"));
}

#[test]
fn test_tree_record_error_ends_stream_by_default() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "A/a.jpg", "a");
    write(tmp.path(), "B/b.jpg", "b");
    let by_path_order = HighWater::new("path");
    let source = TreeSource::new(&config_for(tmp.path()), Some(&by_path_order)).unwrap();
    let mut records = source.records();
    assert_eq!(records.next().unwrap().unwrap().path, "A");
    fs::remove_dir_all(tmp.path().join("B")).unwrap();
    assert!(matches!(records.next(), Some(Err(SourceError::Io { .. }))));
    assert!(records.next().is_none());
    assert!(records.skipped().is_empty());
}

fn by_path_any<'a>(records: &'a [TreeRecord], path: &str) -> &'a TreeRecord {
    records.iter().find(|r| r.path == path).unwrap()
}

#[test]
fn test_tree_depth_applies_to_documents() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "top.txt", "t");
    write(tmp.path(), "Dir/inner.txt", "i");
    let config = SourceConfig {
        depth: vec!["== 0".to_string()],
        ..config_for(tmp.path())
    };
    let records = tree_records(&config);
    let paths = sorted_paths(records.iter().map(|r| r.path.as_str()));
    assert_eq!(paths, vec!["Dir", "top.txt"]);
}

#[test]
fn test_tree_source_fields_and_display() {
    let names: Vec<&str> = TreeSource::fields().iter().map(|(n, _)| *n).collect();
    assert_eq!(names.len(), 9);
    assert!(names.contains(&"weight"));
    assert!(names.contains(&"media"));
    let tmp = TempDir::new().unwrap();
    let source = TreeSource::new(&config_for(tmp.path()), None).unwrap();
    assert_eq!(source.to_string(), "Migrate tree structure");
}
