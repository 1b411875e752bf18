use favor_core::{FavorConfig, FavorStore, JsonFileStore};
use tempfile::TempDir;

fn config() -> FavorConfig {
    FavorConfig {
        max_value: 100,
        min_value: 0,
        init_value: 50,
        max_change: 10,
        ..Default::default()
    }
}

async fn open(temp_dir: &TempDir) -> JsonFileStore {
    JsonFileStore::open(config(), temp_dir.path()).await.unwrap()
}

#[tokio::test]
async fn test_adjust_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;

    assert_eq!(store.adjust("u1", 30).await.unwrap(), 60);
    assert_eq!(store.get("u1").await.unwrap(), 60);

    assert_eq!(store.adjust("u1", -100).await.unwrap(), 50);
    assert_eq!(store.get("u1").await.unwrap(), 50);
}

#[tokio::test]
async fn test_adjust_stays_in_bounds_and_step() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;

    let deltas = [25, -3, 10, 10, 10, 10, 7, -50, -50, -50, -50, -50, -50, 0, 4, i64::MAX, i64::MIN];
    let mut previous = store.get("u1").await.unwrap();
    for delta in deltas {
        let current = store.adjust("u1", delta).await.unwrap();
        assert!((0..=100).contains(&current), "{} out of bounds", current);
        assert!((current - previous).abs() <= 10);
        previous = current;
    }
}

#[tokio::test]
async fn test_adjust_zero_leaves_score_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;

    store.set("u1", 73).await.unwrap();
    assert_eq!(store.adjust("u1", 0).await.unwrap(), 73);
    assert_eq!(store.get("u1").await.unwrap(), 73);
}

#[tokio::test]
async fn test_adjust_reports_previous_value() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;

    let adj = store.adjust_detailed("u9", 4).await.unwrap();
    assert_eq!(adj.previous, 50);
    assert_eq!(adj.requested, 4);
    assert_eq!(adj.current, 54);
    assert_eq!(adj.change(), 4);
}

#[tokio::test]
async fn test_set_round_trips_outside_bounds() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;

    for value in [-1, 0, 100, 101, i64::MIN, i64::MAX] {
        store.set("u1", value).await.unwrap();
        assert_eq!(store.get("u1").await.unwrap(), value);
    }
}

#[tokio::test]
async fn test_scores_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = open(&temp_dir).await;
        store.set("u1", 12).await.unwrap();
        store.adjust("u2", -10).await.unwrap();
    }

    let store = open(&temp_dir).await;
    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot["u1"], 12);
    assert_eq!(snapshot["u2"], 40);
}

/// Two adjustments that read the same prior value before either writes.
/// Without exclusive writes the later write wins and one delta is lost.
#[tokio::test]
async fn test_overlapping_adjustments_last_writer_wins() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    let config = config();

    let prior_a = store.get("u1").await.unwrap();
    let prior_b = store.get("u1").await.unwrap();

    let a = favor_core::Adjustment::compute(&config, "u1", prior_a, 5);
    let b = favor_core::Adjustment::compute(&config, "u1", prior_b, 3);
    store.set("u1", a.current).await.unwrap();
    store.set("u1", b.current).await.unwrap();

    let last = store.get("u1").await.unwrap();
    assert_eq!(last, 53);
    assert!(last == prior_a + 5 || last == prior_a + 3);
    assert_ne!(last, prior_a + 8);
}

#[tokio::test]
async fn test_concurrent_adjustments_apply_at_least_one_delta() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;

    let (a, b) = tokio::join!(store.adjust("u1", 5), store.adjust("u1", 3));
    a.unwrap();
    b.unwrap();

    let last = store.get("u1").await.unwrap();
    assert!([53, 55, 58].contains(&last), "unexpected score {}", last);
}
