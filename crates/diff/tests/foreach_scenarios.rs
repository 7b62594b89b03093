//! Streaming traversal behavior: callback sequences, progress, skip
//! rules, and cancellation.

mod util;

use diff::{
    foreach, BinaryVerdict, Delta, DeltaList, DeltaStatus, DiffFlags, DiffOptions, Error,
    HunkRange, LineOrigin, SourceKind,
};
use util::{
    added_delta, deleted_delta, modified_delta, origins, repo_with_blobs, run_foreach, tree_list,
};

#[test]
fn pure_addition_emits_one_hunk_and_one_added_line() {
    let (repo, oids) = repo_with_blobs(&[b"hello\n"]);
    let mut list = tree_list(
        DiffOptions::default(),
        vec![added_delta("greeting.txt", (oids[0], 6))],
    );

    let log = run_foreach(&repo, &mut list).unwrap();

    assert_eq!(log.hunks.len(), 1);
    let (range, header) = &log.hunks[0];
    assert_eq!(
        *range,
        HunkRange {
            old_start: 0,
            old_lines: 0,
            new_start: 1,
            new_lines: 1
        }
    );
    assert_eq!(header, "@@ -0,0 +1 @@\n");
    assert_eq!(log.lines, vec![('+', "hello\n".to_owned())]);
}

#[test]
fn pure_deletion_emits_one_hunk_and_one_deleted_line() {
    let (repo, oids) = repo_with_blobs(&[b"hello\n"]);
    let mut list = tree_list(
        DiffOptions::default(),
        vec![deleted_delta("greeting.txt", (oids[0], 6))],
    );

    let log = run_foreach(&repo, &mut list).unwrap();

    assert_eq!(log.hunks.len(), 1);
    assert_eq!(log.hunks[0].1, "@@ -1 +0,0 @@\n");
    assert_eq!(log.lines, vec![('-', "hello\n".to_owned())]);
}

#[test]
fn missing_trailing_newline_surfaces_a_del_eofnl_event() {
    let (repo, oids) = repo_with_blobs(&[b"a\nb\n", b"a\nb"]);
    let mut list = tree_list(
        DiffOptions::default(),
        vec![modified_delta("f.txt", (oids[0], 4), (oids[1], 3))],
    );

    let log = run_foreach(&repo, &mut list).unwrap();

    assert_eq!(log.hunks[0].1, "@@ -1,2 +1,2 @@\n");
    assert_eq!(
        origins(&log),
        vec![
            LineOrigin::Context.as_char(),
            LineOrigin::Deletion.as_char(),
            LineOrigin::Addition.as_char(),
            LineOrigin::DelEofnl.as_char(),
        ]
    );
    assert_eq!(log.lines[0].1, "a\n");
    assert_eq!(log.lines[1].1, "b\n");
    assert_eq!(log.lines[2].1, "b");
}

#[test]
fn file_callback_reports_progress_per_index() {
    let (repo, oids) = repo_with_blobs(&[b"one\n", b"two\n"]);
    let mut list = tree_list(
        DiffOptions::default(),
        vec![
            added_delta("a.txt", (oids[0], 4)),
            added_delta("b.txt", (oids[1], 4)),
        ],
    );

    let log = run_foreach(&repo, &mut list).unwrap();

    let progress: Vec<f32> = log.files.iter().map(|entry| entry.1).collect();
    assert_eq!(progress, vec![0.0, 0.5]);
}

#[test]
fn unmodified_deltas_are_skipped_unless_included() {
    let (repo, oids) = repo_with_blobs(&[b"same\n"]);
    let unmodified = |options| {
        tree_list(
            options,
            vec![Delta::new(
                DeltaStatus::Unmodified,
                diff::DiffFile::new("s.txt", diff::FileMode::Blob).with_oid(oids[0], 5),
                diff::DiffFile::new("s.txt", diff::FileMode::Blob).with_oid(oids[0], 5),
            )],
        )
    };

    let mut skipped = unmodified(DiffOptions::default());
    let log = run_foreach(&repo, &mut skipped).unwrap();
    assert!(log.files.is_empty());

    let mut included = unmodified(DiffOptions {
        flags: DiffFlags::INCLUDE_UNMODIFIED,
        ..DiffOptions::default()
    });
    let log = run_foreach(&repo, &mut included).unwrap();
    assert_eq!(log.files.len(), 1);
    // Included, but still nothing to diff.
    assert!(log.hunks.is_empty());
    assert!(log.lines.is_empty());
}

#[test]
fn untracked_and_ignored_follow_their_include_flags() {
    let (repo, _) = repo_with_blobs(&[]);
    let entry = |status| {
        let mut delta = Delta::new(
            status,
            diff::DiffFile::new("w.txt", diff::FileMode::Blob),
            diff::DiffFile::new("w.txt", diff::FileMode::Blob),
        );
        delta.new.flags |= diff::FileFlags::VALID_OID;
        delta
    };

    let mut list = tree_list(
        DiffOptions::default(),
        vec![entry(DeltaStatus::Untracked), entry(DeltaStatus::Ignored)],
    );
    let log = run_foreach(&repo, &mut list).unwrap();
    assert!(log.files.is_empty());

    let mut list = tree_list(
        DiffOptions {
            flags: DiffFlags::INCLUDE_UNTRACKED | DiffFlags::INCLUDE_IGNORED,
            ..DiffOptions::default()
        },
        vec![entry(DeltaStatus::Untracked), entry(DeltaStatus::Ignored)],
    );
    let log = run_foreach(&repo, &mut list).unwrap();
    assert_eq!(log.files.len(), 2);
}

#[test]
fn false_from_file_callback_aborts_before_any_diff_output() {
    let (repo, oids) = repo_with_blobs(&[b"x\n"]);
    let mut list = tree_list(
        DiffOptions::default(),
        vec![added_delta("x.txt", (oids[0], 2))],
    );

    let mut hunks = 0usize;
    let mut file_cb = |_: &Delta, _: f32| false;
    let mut hunk_cb = |_: &Delta, _: &HunkRange, _: &[u8]| {
        hunks += 1;
        true
    };
    let result = foreach(
        &repo,
        &mut list,
        Some(&mut file_cb),
        Some(&mut hunk_cb),
        None,
    );

    assert!(matches!(result, Err(Error::UserAbort)));
    assert_eq!(hunks, 0);
}

#[test]
fn false_from_line_callback_stops_further_events() {
    let (repo, oids) = repo_with_blobs(&[b"a\nb\nc\n", b"x\ny\nz\n"]);
    let mut list = tree_list(
        DiffOptions::default(),
        vec![modified_delta("f.txt", (oids[0], 6), (oids[1], 6))],
    );

    let mut seen = 0usize;
    let mut line_cb = |_: &Delta, _: &HunkRange, _: LineOrigin, _: &[u8]| {
        seen += 1;
        false
    };
    let result = foreach(&repo, &mut list, None, None, Some(&mut line_cb));

    assert!(matches!(result, Err(Error::UserAbort)));
    assert_eq!(seen, 1);
}

#[test]
fn traversal_covers_every_delta_in_order() {
    let (repo, oids) = repo_with_blobs(&[b"1\n", b"2\n", b"3\n"]);
    let mut list = tree_list(
        DiffOptions::default(),
        vec![
            added_delta("a.txt", (oids[0], 2)),
            added_delta("b.txt", (oids[1], 2)),
            deleted_delta("c.txt", (oids[2], 2)),
        ],
    );

    let log = run_foreach(&repo, &mut list).unwrap();

    let paths: Vec<&str> = log.files.iter().map(|entry| entry.0.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "b.txt", "c.txt"]);
    assert_eq!(origins(&log), vec!['+', '+', '-']);
}

#[test]
fn empty_list_completes_without_callbacks() {
    let (repo, _) = repo_with_blobs(&[]);
    let mut list = DeltaList::new(
        SourceKind::Tree,
        SourceKind::Tree,
        DiffOptions::default(),
    );
    let log = run_foreach(&repo, &mut list).unwrap();
    assert!(log.files.is_empty());
    assert!(log.lines.is_empty());
}

#[test]
fn text_deltas_settle_to_a_textual_verdict() {
    let (repo, oids) = repo_with_blobs(&[b"old text\n", b"new text\n"]);
    let mut list = tree_list(
        DiffOptions::default(),
        vec![modified_delta("t.txt", (oids[0], 9), (oids[1], 9))],
    );

    let log = run_foreach(&repo, &mut list).unwrap();
    assert_eq!(log.files[0].3, BinaryVerdict::No);
}
