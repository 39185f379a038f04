//! Importing exam documents into question banks.

mod common;

use std::fs;

use exam_core::BlockDefect;
use exam_maker::commands::{import_directory, import_file, parse_file, ImportStatus};
use exam_maker::store::BankRepository;
use pretty_assertions::assert_eq;

use common::fixtures;
use common::TestContext;

#[test]
fn test_import_directory_creates_banks() {
    let ctx = TestContext::new();
    ctx.write_exam("pca.txt", &fixtures::sample_exam_content(4));
    ctx.write_exam("ace.txt", &fixtures::sample_exam_content(2));
    ctx.write_exam("notes.md", &fixtures::sample_exam_content(3));

    let result = import_directory(ctx.exams_dir(), &ctx.state.repository, false).unwrap();

    let banks: Vec<_> = result.files.iter().map(|f| f.bank.as_str()).collect();
    assert_eq!(banks, ["ace", "pca"]);
    assert_eq!(result.imported(), 6);
    assert!(result.failures.is_empty());

    let pca = ctx.state.repository.load_bank("pca").unwrap();
    assert_eq!(pca.questions.len(), 4);
    assert!(ctx.state.repository.find_bank("notes").unwrap().is_none());
}

#[test]
fn test_import_reports_anomalies_and_keeps_the_rest() {
    let ctx = TestContext::new();
    let content = fixtures::exam_document(&[
        fixtures::question_block(1, "A"),
        fixtures::block_without_timestamp(),
        fixtures::question_block(2, "E"),
        fixtures::question_block(3, "BD"),
    ]);
    let path = ctx.write_exam("pde.txt", &content);

    let result = import_file(&path, &ctx.state.repository, false).unwrap();

    assert_eq!(result.status, ImportStatus::Saved);
    assert_eq!(result.blocks_found, 4);
    assert_eq!(result.imported + result.anomalies.len(), result.blocks_found);
    let reasons: Vec<_> = result.anomalies.iter().map(|a| a.reason.clone()).collect();
    assert_eq!(
        reasons,
        vec![
            BlockDefect::MissingTimestamp,
            BlockDefect::UnknownAnswer {
                letter: exam_core::Letter::new('E').unwrap()
            },
        ]
    );

    let bank = ctx.state.repository.load_bank("pde").unwrap();
    assert!(bank.questions.get(1).unwrap().is_multi_answer());
}

#[test]
fn test_unchanged_source_is_skipped() {
    let ctx = TestContext::new();
    let path = ctx.write_exam("pca.txt", &fixtures::sample_exam_content(3));

    let first = import_file(&path, &ctx.state.repository, false).unwrap();
    assert_eq!(first.status, ImportStatus::Saved);
    let imported_at = ctx.state.repository.load_bank("pca").unwrap().imported_at;

    let second = import_file(&path, &ctx.state.repository, false).unwrap();
    assert_eq!(second.status, ImportStatus::Unchanged);
    assert_eq!(second.imported, 3);
    assert_eq!(
        ctx.state.repository.load_bank("pca").unwrap().imported_at,
        imported_at
    );

    let forced = import_file(&path, &ctx.state.repository, true).unwrap();
    assert_eq!(forced.status, ImportStatus::Saved);

    fs::write(&path, fixtures::sample_exam_content(5)).unwrap();
    let changed = import_file(&path, &ctx.state.repository, false).unwrap();
    assert_eq!(changed.status, ImportStatus::Saved);
    assert_eq!(changed.imported, 5);
}

#[test]
fn test_document_without_questions_is_not_saved() {
    let ctx = TestContext::new();
    let path = ctx.write_exam("empty.txt", &fixtures::exam_document(&["".into(), "  ".into()]));

    let result = import_file(&path, &ctx.state.repository, false).unwrap();

    assert_eq!(result.status, ImportStatus::NoQuestions);
    assert_eq!(result.blocks_found, 0);
    assert!(result.anomalies.is_empty());
    assert!(!result.stale_removed);
    assert!(ctx.state.repository.list_banks().unwrap().is_empty());
}

#[test]
fn test_source_without_questions_removes_stale_bank() {
    let ctx = TestContext::new();
    let path = ctx.write_exam("pca.txt", &fixtures::sample_exam_content(3));
    import_file(&path, &ctx.state.repository, false).unwrap();

    fs::write(&path, fixtures::block_without_timestamp()).unwrap();
    let result = import_file(&path, &ctx.state.repository, false).unwrap();

    assert_eq!(result.status, ImportStatus::NoQuestions);
    assert!(result.stale_removed);
    assert_eq!(result.anomalies.len(), 1);
    assert!(ctx.state.repository.find_bank("pca").unwrap().is_none());
}

#[test]
fn test_unreadable_file_does_not_stop_import() {
    let ctx = TestContext::new();
    ctx.write_exam("good.txt", &fixtures::sample_exam_content(2));
    fs::write(ctx.exams_dir().join("binary.txt"), b"\xff\xfe\x00\xc3").unwrap();

    let result = import_directory(ctx.exams_dir(), &ctx.state.repository, false).unwrap();

    assert_eq!(result.files.len(), 1);
    assert_eq!(result.failures.len(), 1);
    assert!(result.failures[0].0.ends_with("binary.txt"));
}

#[test]
fn test_parse_file_does_not_store() {
    let ctx = TestContext::new();
    let path = ctx.write_exam("pca.txt", &fixtures::sample_exam_content(2));

    let report = parse_file(&path).unwrap();

    assert_eq!(report.valid_count(), 2);
    assert!(ctx.state.repository.list_banks().unwrap().is_empty());
}

#[test]
fn test_missing_directory_is_an_error() {
    let ctx = TestContext::new();
    let missing = ctx.exams_dir().join("nope");
    assert!(import_directory(&missing, &ctx.state.repository, false).is_err());
}
