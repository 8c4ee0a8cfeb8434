//! End-to-end tests of the walk + rollup pipeline against a scripted oracle

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};
use treesum_core::error::TreesumError;
use treesum_core::ignore::IgnoreRuleSet;
use treesum_core::oracle::{OracleError, SummarizationOracle};
use treesum_core::scan::{ScanReport, Scanner};
use treesum_core::store::{SummaryKey, SummaryStore};
use walkdir::WalkDir;

/// Answers `S(<context>)` and records every call in order
#[derive(Default)]
struct ScriptedOracle {
    calls: RefCell<Vec<(String, String)>>,
    failing: RefCell<HashSet<String>>,
    blank: RefCell<HashSet<String>>,
}

impl ScriptedOracle {
    fn fail_on(&self, context: &str) {
        self.failing.borrow_mut().insert(context.to_string());
    }

    fn blank_on(&self, context: &str) {
        self.blank.borrow_mut().insert(context.to_string());
    }

    fn heal(&self) {
        self.failing.borrow_mut().clear();
        self.blank.borrow_mut().clear();
    }

    fn contexts(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }

    fn content_for(&self, context: &str) -> Option<String> {
        self.calls
            .borrow()
            .iter()
            .find(|(c, _)| c == context)
            .map(|(_, content)| content.clone())
    }

    fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl SummarizationOracle for ScriptedOracle {
    fn summarize(&self, content: &str, context: &str) -> Result<String, OracleError> {
        self.calls
            .borrow_mut()
            .push((context.to_string(), content.to_string()));
        if self.failing.borrow().contains(context) {
            return Err(OracleError::Network("connection refused".to_string()));
        }
        if self.blank.borrow().contains(context) {
            return Ok("   ".to_string());
        }
        Ok(format!("S({context})"))
    }
}

struct Fixture {
    _dir: TempDir,
    repo: PathBuf,
    meta: PathBuf,
}

impl Fixture {
    fn new(files: &[(&str, &[u8])]) -> Self {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("repo");
        let meta = dir.path().join("meta");
        fs::create_dir_all(&repo).unwrap();
        for (path, content) in files {
            let path = repo.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        Self {
            _dir: dir,
            repo,
            meta,
        }
    }

    /// The tree `repo/{a.txt, sub/{b.txt, c.png}}`
    fn basic() -> Self {
        Self::new(&[
            ("a.txt", b"alpha contents"),
            ("sub/b.txt", b"beta contents"),
            ("sub/c.png", b"this is valid text but has an image extension"),
        ])
    }

    fn scan(&self, rules: IgnoreRuleSet, oracle: &ScriptedOracle) -> ScanReport {
        Scanner::new(&self.repo, &self.meta, rules, oracle)
            .unwrap()
            .run()
    }

    fn store(&self) -> SummaryStore {
        SummaryStore::new(&self.meta)
    }

    fn read(&self, key: SummaryKey) -> Option<String> {
        self.store().read(&key)
    }

    /// Every record file under the metadata root with its raw content
    fn records(&self) -> BTreeMap<PathBuf, String> {
        if !self.meta.exists() {
            return BTreeMap::new();
        }
        WalkDir::new(&self.meta)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(&self.meta).unwrap().to_path_buf();
                (rel, fs::read_to_string(e.path()).unwrap())
            })
            .collect()
    }
}

#[test]
fn test_basic_tree_produces_file_directory_and_repository_records() {
    let fx = Fixture::basic();
    let oracle = ScriptedOracle::default();

    let report = fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert_eq!(
        fx.read(SummaryKey::file("a.txt")).as_deref(),
        Some("S(file: a.txt)")
    );
    assert_eq!(
        fx.read(SummaryKey::file("sub/b.txt")).as_deref(),
        Some("S(file: sub/b.txt)")
    );
    assert_eq!(
        fx.read(SummaryKey::directory("sub")).as_deref(),
        Some("S(directory: sub)")
    );
    assert_eq!(
        fx.read(SummaryKey::Repository).as_deref(),
        Some("S(directory: repository root)")
    );

    // sub is built from b.txt only; the png never reaches the oracle
    assert_eq!(
        oracle.content_for("directory: sub").as_deref(),
        Some("S(file: sub/b.txt)")
    );
    assert_eq!(
        oracle.content_for("directory: repository root").as_deref(),
        Some("S(file: a.txt)\n\nS(directory: sub)")
    );
    assert!(oracle.content_for("file: sub/c.png").is_none());
    assert!(!fx.meta.join("sub/c.png.summary.md").exists());

    assert_eq!(
        report,
        ScanReport {
            files_summarized: 2,
            files_excluded: 1,
            directories_summarized: 2,
            oracle_calls: 4,
            ..Default::default()
        }
    );
}

#[test]
fn test_record_files_on_disk() {
    let fx = Fixture::basic();
    fx.scan(IgnoreRuleSet::empty(), &ScriptedOracle::default());

    let records = fx.records();
    let names: Vec<&Path> = records.keys().map(PathBuf::as_path).collect();
    assert_eq!(
        names,
        vec![
            Path::new("_repository_summary.md"),
            Path::new("a.txt.summary.md"),
            Path::new("sub/_directory_summary.md"),
            Path::new("sub/b.txt.summary.md"),
        ]
    );
    assert_eq!(
        records[Path::new("sub/b.txt.summary.md")],
        "# Summary: sub/b.txt\n\nS(file: sub/b.txt)\n"
    );
    assert_eq!(
        records[Path::new("_repository_summary.md")],
        "# Summary: repository root\n\nS(directory: repository root)\n"
    );
}

#[test]
fn test_ignored_directory_is_pruned_entirely() {
    let fx = Fixture::basic();
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::new(["sub"], Vec::<String>::new()), &oracle);

    assert!(!fx.meta.join("sub").exists());
    assert!(oracle.contexts().iter().all(|c| !c.contains("sub")));
    assert_eq!(
        oracle.content_for("directory: repository root").as_deref(),
        Some("S(file: a.txt)")
    );
}

#[test]
fn test_ignore_pattern_excludes_matching_files() {
    let fx = Fixture::new(&[("keep.rs", b"fn keep() {}"), ("drop.lock", b"lock")]);
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::new(Vec::<String>::new(), ["*.lock"]), &oracle);

    assert!(fx.read(SummaryKey::file("keep.rs")).is_some());
    assert!(fx.read(SummaryKey::file("drop.lock")).is_none());
    assert!(oracle.content_for("file: drop.lock").is_none());
}

#[test]
fn test_second_run_calls_oracle_zero_times() {
    let fx = Fixture::basic();
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::empty(), &oracle);
    let first = fx.records();
    oracle.reset_calls();

    let report = fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert!(oracle.contexts().is_empty());
    assert_eq!(fx.records(), first);
    assert_eq!(report.oracle_calls, 0);
    assert_eq!(report.files_cached, 2);
    assert_eq!(report.directories_cached, 2);
}

#[test]
fn test_deleted_root_record_is_the_only_one_regenerated() {
    let fx = Fixture::basic();
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::empty(), &oracle);
    fs::remove_file(fx.meta.join("_repository_summary.md")).unwrap();
    oracle.reset_calls();

    fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert_eq!(oracle.contexts(), vec!["directory: repository root".to_string()]);
    // Rebuilt from cached file and directory records
    assert_eq!(
        oracle.content_for("directory: repository root").as_deref(),
        Some("S(file: a.txt)\n\nS(directory: sub)")
    );
}

#[test]
fn test_child_rollup_is_written_before_parent_reads_it() {
    let fx = Fixture::new(&[
        ("top.md", b"top"),
        ("a/one.md", b"one"),
        ("a/b/two.md", b"two"),
        ("a/b/c/three.md", b"three"),
    ]);
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::empty(), &oracle);

    let contexts = oracle.contexts();
    let position = |c: &str| contexts.iter().position(|x| x == c).unwrap();
    assert!(position("directory: a/b/c") < position("directory: a/b"));
    assert!(position("directory: a/b") < position("directory: a"));
    assert!(position("directory: a") < position("directory: repository root"));

    assert_eq!(
        oracle.content_for("directory: a/b").as_deref(),
        Some("S(file: a/b/two.md)\n\nS(directory: a/b/c)")
    );
    assert_eq!(
        oracle.content_for("directory: repository root").as_deref(),
        Some("S(file: top.md)\n\nS(directory: a)")
    );
}

#[test]
fn test_directory_without_direct_files_still_rolls_up_children() {
    let fx = Fixture::new(&[("src/core/lib.rs", b"pub fn core() {}")]);
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert_eq!(
        oracle.content_for("directory: src").as_deref(),
        Some("S(directory: src/core)")
    );
    assert_eq!(
        oracle.content_for("directory: repository root").as_deref(),
        Some("S(directory: src)")
    );
    assert!(fx.read(SummaryKey::directory("src")).is_some());
}

#[test]
fn test_sibling_rollups_fold_in_lexical_order() {
    let fx = Fixture::new(&[("zeta/z.txt", b"z"), ("alpha/a.txt", b"a"), ("mid.txt", b"m")]);
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert_eq!(
        oracle.content_for("directory: repository root").as_deref(),
        Some("S(file: mid.txt)\n\nS(directory: alpha)\n\nS(directory: zeta)")
    );
}

#[test]
fn test_files_fold_in_name_order() {
    let fx = Fixture::new(&[("b.txt", b"b"), ("c.txt", b"c"), ("a.txt", b"a")]);
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert_eq!(
        oracle.content_for("directory: repository root").as_deref(),
        Some("S(file: a.txt)\n\nS(file: b.txt)\n\nS(file: c.txt)")
    );
}

#[test]
fn test_empty_subtrees_produce_no_rollup() {
    let fx = Fixture::new(&[
        ("a.txt", b"alpha"),
        ("empty/blank.txt", b"  \n\t\n"),
        ("empty/picture.png", b"text"),
        ("empty/nested/zero.txt", b""),
    ]);
    fs::create_dir_all(fx.repo.join("hollow/deeper")).unwrap();
    let oracle = ScriptedOracle::default();

    let report = fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert!(!fx.meta.join("empty").exists());
    assert!(!fx.meta.join("hollow").exists());
    assert_eq!(report.files_skipped, 2);
    assert_eq!(
        oracle.contexts(),
        vec![
            "file: a.txt".to_string(),
            "directory: repository root".to_string()
        ]
    );
}

#[test]
fn test_nothing_eligible_means_no_repository_record() {
    let fx = Fixture::new(&[("logo.png", b"png"), ("blank.md", b"\n")]);
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert!(oracle.contexts().is_empty());
    assert!(fx.records().is_empty());
}

#[test]
fn test_nul_bytes_exclude_file() {
    let fx = Fixture::new(&[("blob.txt", b"head\0tail"), ("ok.txt", b"fine")]);
    let oracle = ScriptedOracle::default();

    fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert!(oracle.content_for("file: blob.txt").is_none());
    assert!(oracle.content_for("file: ok.txt").is_some());
}

#[test]
fn test_file_oracle_failure_is_omitted_and_retried_next_run() {
    let fx = Fixture::basic();
    let oracle = ScriptedOracle::default();
    oracle.fail_on("file: a.txt");

    let report = fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert_eq!(report.files_failed, 1);
    assert!(report.has_failures());
    assert!(fx.read(SummaryKey::file("a.txt")).is_none());
    assert_eq!(
        oracle.content_for("directory: repository root").as_deref(),
        Some("S(directory: sub)")
    );

    oracle.heal();
    oracle.reset_calls();
    fx.scan(IgnoreRuleSet::empty(), &oracle);

    // The file is retried; the existing repository record is left alone
    assert_eq!(oracle.contexts(), vec!["file: a.txt".to_string()]);
    assert!(fx.read(SummaryKey::file("a.txt")).is_some());
}

#[test]
fn test_blank_oracle_answer_counts_as_failure() {
    let fx = Fixture::new(&[("a.txt", b"alpha")]);
    let oracle = ScriptedOracle::default();
    oracle.blank_on("file: a.txt");

    let report = fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert_eq!(report.files_failed, 1);
    assert!(fx.records().is_empty());
}

#[test]
fn test_directory_oracle_failure_leaves_no_record() {
    let fx = Fixture::basic();
    let oracle = ScriptedOracle::default();
    oracle.fail_on("directory: sub");

    let report = fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert_eq!(report.directories_failed, 1);
    assert!(!fx.meta.join("sub/_directory_summary.md").exists());
    assert_eq!(
        oracle.content_for("directory: repository root").as_deref(),
        Some("S(file: a.txt)")
    );

    oracle.heal();
    oracle.reset_calls();
    fx.scan(IgnoreRuleSet::empty(), &oracle);
    assert_eq!(oracle.contexts(), vec!["directory: sub".to_string()]);
}

#[test]
fn test_metadata_root_inside_repository_is_not_walked() {
    let fx = Fixture::basic();
    let meta = fx.repo.join("scanner_metadata");
    let oracle = ScriptedOracle::default();

    Scanner::new(&fx.repo, &meta, IgnoreRuleSet::empty(), &oracle)
        .unwrap()
        .run();
    oracle.reset_calls();
    let report = Scanner::new(&fx.repo, &meta, IgnoreRuleSet::empty(), &oracle)
        .unwrap()
        .run();

    assert_eq!(report.oracle_calls, 0);
    assert!(!meta.join("scanner_metadata").exists());
    assert!(meta.join("_repository_summary.md").exists());
}

#[test]
fn test_root_spelled_with_parent_hop_still_excludes_metadata() {
    let fx = Fixture::basic();
    let root = fx.repo.join("sub/..");
    let meta = fx.repo.join("scanner_metadata");
    let oracle = ScriptedOracle::default();

    let first = Scanner::new(&root, &meta, IgnoreRuleSet::empty(), &oracle)
        .unwrap()
        .run();
    assert!(first.oracle_calls > 0);
    assert!(oracle
        .contexts()
        .iter()
        .all(|context| !context.contains("scanner_metadata")));

    oracle.reset_calls();
    let second = Scanner::new(&root, &meta, IgnoreRuleSet::empty(), &oracle)
        .unwrap()
        .run();

    assert_eq!(second.oracle_calls, 0);
    assert!(oracle.contexts().is_empty());
    assert!(!meta.join("scanner_metadata").exists());
}

#[cfg(unix)]
#[test]
fn test_root_reached_through_symlink_still_excludes_metadata() {
    let fx = Fixture::basic();
    let link = fx.repo.parent().unwrap().join("link");
    std::os::unix::fs::symlink(&fx.repo, &link).unwrap();
    let meta = fx.repo.join("scanner_metadata");
    let oracle = ScriptedOracle::default();

    Scanner::new(&link, &meta, IgnoreRuleSet::empty(), &oracle)
        .unwrap()
        .run();
    oracle.reset_calls();
    let second = Scanner::new(&link, &meta, IgnoreRuleSet::empty(), &oracle)
        .unwrap()
        .run();

    assert_eq!(second.oracle_calls, 0);
}

#[test]
fn test_unwritable_file_record_still_feeds_rollup_and_is_retried() {
    let fx = Fixture::basic();
    // A plain file where the `sub` record directory belongs
    fs::create_dir_all(&fx.meta).unwrap();
    fs::write(fx.meta.join("sub"), "blocker").unwrap();
    let oracle = ScriptedOracle::default();

    let report = fx.scan(IgnoreRuleSet::empty(), &oracle);

    assert_eq!(report.files_summarized, 2);
    assert!(oracle
        .content_for("directory: sub")
        .unwrap()
        .contains("S(file: sub/b.txt)"));
    assert!(!fx.store().exists(&SummaryKey::file("sub/b.txt")));
    assert!(fx.store().exists(&SummaryKey::file("a.txt")));

    fs::remove_file(fx.meta.join("sub")).unwrap();
    oracle.reset_calls();
    fx.scan(IgnoreRuleSet::empty(), &oracle);

    let contexts = oracle.contexts();
    assert!(contexts.contains(&"file: sub/b.txt".to_string()));
    assert!(!contexts.contains(&"file: a.txt".to_string()));
    assert_eq!(
        fx.read(SummaryKey::file("sub/b.txt")).as_deref(),
        Some("S(file: sub/b.txt)")
    );
}

#[test]
fn test_nested_metadata_root_only_excludes_itself() {
    let fx = Fixture::new(&[("docs/guide.md", b"guide"), ("a.txt", b"a")]);
    let meta = fx.repo.join("docs/summaries");
    let oracle = ScriptedOracle::default();

    let scanner = Scanner::new(&fx.repo, &meta, IgnoreRuleSet::empty(), &oracle).unwrap();
    assert!(scanner.rules().should_ignore(&meta, &fx.repo));
    assert!(!scanner.rules().should_ignore(&fx.repo.join("docs"), &fx.repo));

    scanner.run();
    assert!(meta.join("docs/guide.md.summary.md").exists());
}

#[test]
fn test_missing_repository_is_an_error() {
    let dir = tempdir().unwrap();
    let oracle = ScriptedOracle::default();
    let result = Scanner::new(
        &dir.path().join("absent"),
        &dir.path().join("meta"),
        IgnoreRuleSet::empty(),
        &oracle,
    );
    assert!(matches!(
        result,
        Err(TreesumError::RepositoryNotFound { .. })
    ));
}
