use std::fs;

use supersequence_dp::{
    store::{DiskStore, MemoryStore},
    table::build_cost_table,
    BackendChoice, CostStore, DigitSequence, FillOrder, SuffixPair, SupersequenceEngine,
    SupersequenceError,
};

fn seq(s: &str) -> DigitSequence {
    DigitSequence::parse(s).unwrap()
}

#[test]
fn base_cells_hold_prefix_values_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let a = seq("9081726354");
    let b = seq("111");
    let mut store = DiskStore::create(dir.path().join("base.db"), a.len() + 1, b.len() + 1).unwrap();
    let written = build_cost_table(&mut store, &a, &b, FillOrder::RowMajor).unwrap();
    assert_eq!(written, (a.len() + 1) * (b.len() + 1));

    for i in 0..=a.len() {
        let cost = store.get(SuffixPair::new(i, 0)).unwrap();
        assert_eq!(cost.digits(), &a.as_slice()[..i], "cost({i}, 0)");
    }
    for j in 0..=b.len() {
        let cost = store.get(SuffixPair::new(0, j)).unwrap();
        assert_eq!(cost.digits(), &b.as_slice()[..j], "cost(0, {j})");
    }
    assert!(store.get(SuffixPair::new(0, 0)).unwrap().is_empty());
    store.destroy().unwrap();
}

#[test]
fn rebuild_is_deterministic() {
    let a = seq("70451203");
    let b = seq("3321409");
    let build = || {
        let mut store = MemoryStore::new(a.len() + 1, b.len() + 1);
        build_cost_table(&mut store, &a, &b, FillOrder::RowMajor).unwrap();
        store
    };
    let (first, second) = (build(), build());
    for i1 in 0..=a.len() {
        for i2 in 0..=b.len() {
            let pair = SuffixPair::new(i1, i2);
            assert_eq!(first.get(pair).unwrap(), second.get(pair).unwrap());
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let engine = SupersequenceEngine::with_options(
        dir.path().join("det.db"),
        0,
        BackendChoice::Disk,
        FillOrder::RowMajor,
    );
    let r1 = engine.run(&a, &b).unwrap();
    let r2 = engine.run(&a, &b).unwrap();
    assert_eq!(r1, r2);
    assert_eq!(
        r1.as_slice(),
        first.get(SuffixPair::new(a.len(), b.len())).unwrap().digits()
    );
}

#[test]
fn stale_artifact_aborts_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.db");
    fs::write(&path, b"previous run").unwrap();

    let engine = SupersequenceEngine::with_options(&path, 0, BackendChoice::Disk, FillOrder::RowMajor);
    match engine.run(&seq("12"), &seq("34")) {
        Err(SupersequenceError::StaleCache { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected StaleCache, got {other:?}"),
    }
    // untouched: neither read, overwritten nor removed
    assert_eq!(fs::read(&path).unwrap(), b"previous run");
}

#[test]
fn successful_run_removes_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clean.db");
    let engine = SupersequenceEngine::with_options(&path, 0, BackendChoice::Disk, FillOrder::AntiDiagonal);
    let report = engine.run_report(&seq("4321"), &seq("1234")).unwrap();
    assert_eq!(report.backend, "disk");
    assert_eq!(report.cells, 25);
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn invalid_input_is_rejected_at_parse_time() {
    assert!(matches!(
        DigitSequence::parse("12 3"),
        Err(SupersequenceError::InvalidDigit { position: 2, found: ' ' })
    ));
}
