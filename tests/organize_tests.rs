//! End-to-end organizer runs against real temp directories.

use filetime::FileTime;
use sortcopy::engine::{MemorySink, MessageLevel, Phase, ProgressUpdate};
use sortcopy::report::RunOutcome;
use sortcopy::scanner::ScanOptions;
use sortcopy::types::SkipReason;
use sortcopy::{Category, Organizer};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn quiet_organizer(source: &Path, target: &Path) -> (Organizer, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let organizer = Organizer::new(source, target).with_sink(sink.clone());
    (organizer, sink)
}

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write test file");
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_round_trip_keeps_name_and_content() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("holiday/photo.JPG"), b"ABCDE");

    let (mut organizer, _sink) = quiet_organizer(src.path(), dst.path());
    let report = organizer.run().expect("run should succeed");

    assert_eq!(report.processed_count(), 1);
    assert_eq!(
        fs::read(dst.path().join("Image/photo.JPG")).expect("read copy"),
        b"ABCDE"
    );
    for category in Category::ALL {
        assert!(dst.path().join(category.name()).is_dir(), "{} missing", category);
    }
}

#[test]
fn test_same_name_different_content_gets_suffix() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("one/a.txt"), b"first");
    write(&src.path().join("two/a.txt"), b"second");

    let (mut organizer, _sink) = quiet_organizer(src.path(), dst.path());
    let report = organizer.run().expect("run should succeed");

    assert_eq!(report.processed_count(), 2);
    let docs = dst.path().join("Document");
    assert_eq!(file_names(&docs), vec!["a.txt", "a_1.txt"]);

    let mut contents = vec![
        fs::read(docs.join("a.txt")).expect("read a.txt"),
        fs::read(docs.join("a_1.txt")).expect("read a_1.txt"),
    ];
    contents.sort();
    assert_eq!(contents, vec![b"first".to_vec(), b"second".to_vec()]);
}

#[test]
fn test_identical_content_in_literal_slot_is_skipped() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("a.txt"), b"same");
    write(&dst.path().join("Document/a.txt"), b"same");

    let (mut organizer, sink) = quiet_organizer(src.path(), dst.path());
    let report = organizer.run().expect("run should succeed");

    assert_eq!(report.processed_count(), 0);
    assert_eq!(report.duplicate_count(), 1);
    assert!(sink.contains("Skipping duplicate: a.txt"));
    assert_eq!(file_names(&dst.path().join("Document")), vec!["a.txt"]);
}

#[test]
fn test_different_content_in_literal_slot_is_renamed() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("a.txt"), b"new");
    write(&dst.path().join("Document/a.txt"), b"old");

    let (mut organizer, _sink) = quiet_organizer(src.path(), dst.path());
    organizer.run().expect("run should succeed");

    let docs = dst.path().join("Document");
    assert_eq!(fs::read(docs.join("a.txt")).unwrap(), b"old");
    assert_eq!(fs::read(docs.join("a_1.txt")).unwrap(), b"new");
}

#[test]
fn test_only_the_literal_slot_is_compared() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("a.txt"), b"Y");
    write(&dst.path().join("Document/a.txt"), b"X");
    write(&dst.path().join("Document/a_1.txt"), b"Y");

    let (mut organizer, _sink) = quiet_organizer(src.path(), dst.path());
    let report = organizer.run().expect("run should succeed");

    // a_1.txt already holds Y, but only a.txt is checked
    assert_eq!(report.processed_count(), 1);
    assert_eq!(
        fs::read(dst.path().join("Document/a_2.txt")).expect("read a_2.txt"),
        b"Y"
    );
}

#[test]
fn test_second_run_copies_nothing() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("song.mp3"), b"la la");
    write(&src.path().join("clip.mkv"), b"frames");
    write(&src.path().join("docs/report.pdf"), b"%PDF");
    write(&src.path().join("bundle.zip"), b"PK");

    let (mut first, _sink) = quiet_organizer(src.path(), dst.path());
    let first = first.run().expect("first run");
    assert_eq!(first.processed_count(), 4);

    let (mut second, _sink) = quiet_organizer(src.path(), dst.path());
    let second = second.run().expect("second run");

    assert_eq!(second.processed_count(), 0);
    assert_eq!(second.skipped_count(), first.processed_count());
    assert_eq!(second.duplicate_count(), second.skipped_count());
    assert_eq!(second.total_bytes, 0);
}

#[test]
fn test_stop_from_progress_callback_halts_after_current_file() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    for i in 0..5 {
        write(&src.path().join(format!("file{}.txt", i)), format!("{}", i).as_bytes());
    }

    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let (organizer, _sink) = quiet_organizer(src.path(), dst.path());
    let stop = organizer.stop_handle();
    let recorded = Arc::clone(&updates);
    let mut organizer = organizer.with_progress(Box::new(move |update: &ProgressUpdate| {
        if update.phase == Phase::Processing && update.current == 2 {
            stop.request_stop();
        }
        recorded.lock().expect("lock updates").push(update.clone());
    }));

    let report = organizer.run().expect("run should succeed");

    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert_eq!(report.processed_count(), 2);
    assert_eq!(report.untouched_count(), 3);
    assert_eq!(file_names(&dst.path().join("Document")).len(), 2);

    let updates = updates.lock().unwrap();
    let last = updates.last().expect("final update");
    assert_eq!(last.phase, Phase::Cancelled);
    assert_eq!(last.label, "cancelled");
    assert_eq!((last.current, last.total), (5, 5));
    assert!(report.render().contains("Not reached: 3"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_recorded_and_run_continues() {
    use std::os::unix::fs::PermissionsExt;

    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    let locked = src.path().join("locked.txt");
    write(&locked, b"secret");
    write(&src.path().join("open.png"), b"pixels");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // root reads anything; nothing to assert in that case
    if fs::read(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let (mut organizer, sink) = quiet_organizer(src.path(), dst.path());
    let report = organizer.run().expect("run should succeed");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(report.processed_count(), 1);
    assert_eq!(report.failed_count(), 1);
    assert!(dst.path().join("Image/open.png").exists());
    assert!(!sink.at_least(MessageLevel::Error).is_empty());
    assert!(matches!(report.skipped[0].reason, SkipReason::Failed { .. }));
}

#[test]
fn test_blocked_category_dir_fails_only_its_files() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("notes.txt"), b"words");
    write(&src.path().join("track.flac"), b"sound");
    // a plain file where the Document folder should go
    write(&dst.path().join("Document"), b"in the way");

    let (mut organizer, sink) = quiet_organizer(src.path(), dst.path());
    let report = organizer.run().expect("run should succeed");

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.processed_count(), 1);
    assert_eq!(report.failed_count(), 1);
    assert!(dst.path().join("Audio/track.flac").is_file());
    assert!(sink.contains("Failed to prepare target directories"));
    assert!(sink.contains("Failed to process"));
}

#[test]
fn test_sources_are_left_untouched() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    let file = src.path().join("keep/me.doc");
    write(&file, b"original");
    let old = FileTime::from_unix_time(1_600_000_000, 0);
    filetime::set_file_mtime(&file, old).unwrap();
    let before = file_names(&src.path().join("keep"));

    let (mut organizer, _sink) = quiet_organizer(src.path(), dst.path());
    organizer.run().expect("run should succeed");

    assert_eq!(fs::read(&file).unwrap(), b"original");
    assert_eq!(file_names(&src.path().join("keep")), before);
    let meta = fs::metadata(&file).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), old);
}

#[test]
fn test_copy_keeps_modification_time() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    let file = src.path().join("old.7z");
    write(&file, b"7z");
    let mtime = FileTime::from_unix_time(1_500_000_000, 0);
    filetime::set_file_mtime(&file, mtime).unwrap();

    let (mut organizer, _sink) = quiet_organizer(src.path(), dst.path());
    organizer.run().expect("run should succeed");

    let copied = fs::metadata(dst.path().join("Archive/old.7z")).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&copied), mtime);
}

#[test]
fn test_exclude_patterns_leave_files_behind() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("keep.txt"), b"k");
    write(&src.path().join("debug.log"), b"l");
    write(&src.path().join("cache/blob.bin"), b"c");

    let options = ScanOptions {
        exclude_patterns: vec!["*.log".to_string(), "cache/".to_string()],
        respect_ignore_files: false,
    };
    let (organizer, _sink) = quiet_organizer(src.path(), dst.path());
    let mut organizer = organizer.with_scan_options(options);
    let report = organizer.run().expect("run should succeed");

    assert_eq!(report.total_files, 1);
    assert_eq!(file_names(&dst.path().join("Document")), vec!["keep.txt"]);
    assert!(file_names(&dst.path().join("Other")).is_empty());
}

#[test]
fn test_no_part_files_remain_after_run() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("a.exe"), &vec![7u8; 300 * 1024]);
    write(&src.path().join("b.apk"), b"apk");

    let (mut organizer, _sink) = quiet_organizer(src.path(), dst.path());
    organizer.run().expect("run should succeed");

    assert_eq!(file_names(&dst.path().join("Program")), vec!["a.exe", "b.apk"]);
}

#[test]
fn test_unhashable_literal_slot_still_copies() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    write(&src.path().join("a.txt"), b"content");
    // a directory occupies the slot but cannot be hashed
    fs::create_dir_all(dst.path().join("Document/a.txt")).expect("create blocking dir");

    let (mut organizer, sink) = quiet_organizer(src.path(), dst.path());
    let report = organizer.run().expect("run should succeed");

    assert_eq!(report.processed_count(), 1);
    assert_eq!(report.skipped_count(), 0);
    assert_eq!(report.processed[0], dst.path().join("Document/a_1.txt"));
    assert_eq!(
        fs::read(dst.path().join("Document/a_1.txt")).expect("read a_1.txt"),
        b"content"
    );
    assert!(sink.contains("Failed to hash"));
}

#[test]
fn test_file_name_at_length_limit_is_copied() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    let long_name = format!("{}.txt", "n".repeat(246));
    write(&src.path().join(&long_name), b"long");

    let (mut organizer, _sink) = quiet_organizer(src.path(), dst.path());
    let report = organizer.run().expect("run should succeed");

    assert_eq!(report.processed_count(), 1);
    assert_eq!(report.failed_count(), 0);
    assert_eq!(fs::read(dst.path().join("Document").join(&long_name)).unwrap(), b"long");
}
