use std::collections::BTreeMap;
use std::fs;

use chrono::NaiveDate;
use tempfile::TempDir;
use ufc_rankings_lib::pipeline::{process_document, run_update};
use ufc_rankings_lib::html::Document;
use ufc_rankings_lib::{AppendOutcome, HistoryStore, RankChange, RankingsConfig, RankingsError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn serve(body: String) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rankings"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;
    mock_server
}

fn config(server: &MockServer, dir: &TempDir) -> RankingsConfig {
    RankingsConfig::default()
        .with_base_url(&server.uri())
        .with_history_path(dir.path().join("ufc_rankings_history.csv"))
}

#[tokio::test]
async fn first_run_creates_history() {
    let server = serve(load_fixture("rankings_full.html")).await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir);

    let report = run_update(&config, date(2025, 12, 20), false).await.unwrap();
    assert_eq!(report.rows, 165);
    assert_eq!(report.divisions, 11);
    assert_eq!(report.ufc_last_updated, date(2025, 12, 16));
    assert_eq!(report.skips.groupings_skipped, 1);
    assert_eq!(report.skips.rows_skipped, 0);
    assert_eq!(
        report.outcome,
        Some(AppendOutcome::Created {
            rows: 165,
            update: date(2025, 12, 16)
        })
    );

    let text = fs::read_to_string(&config.history_path).unwrap();
    assert_eq!(text.lines().count(), 166);
    assert_eq!(
        text.lines().next().unwrap(),
        "snapshot_date,ufc_last_updated,division,champion,fighter,fighter_url,rank,rank_change"
    );
}

#[tokio::test]
async fn second_run_with_same_update_is_a_no_op() {
    let server = serve(load_fixture("rankings_full.html")).await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir);

    run_update(&config, date(2025, 12, 20), false).await.unwrap();
    let before = fs::read(&config.history_path).unwrap();

    let report = run_update(&config, date(2025, 12, 21), false).await.unwrap();
    assert_eq!(
        report.outcome,
        Some(AppendOutcome::Skipped {
            update: date(2025, 12, 16)
        })
    );
    assert_eq!(fs::read(&config.history_path).unwrap(), before);
}

#[tokio::test]
async fn new_update_appends_after_existing_rows() {
    let dir = TempDir::new().unwrap();
    let page = load_fixture("rankings_full.html");

    let first = serve(page.clone()).await;
    let config_first = config(&first, &dir);
    run_update(&config_first, date(2025, 12, 20), false)
        .await
        .unwrap();
    let before = fs::read_to_string(&config_first.history_path).unwrap();

    let second = serve(page.replace("Dec. 16", "Dec. 23")).await;
    let config_second = config(&second, &dir);
    let report = run_update(&config_second, date(2025, 12, 27), false)
        .await
        .unwrap();
    assert_eq!(
        report.outcome,
        Some(AppendOutcome::Appended {
            rows: 165,
            update: date(2025, 12, 23)
        })
    );

    let after = fs::read_to_string(&config_second.history_path).unwrap();
    assert!(after.starts_with(&before));
    assert_eq!(after.lines().count(), 1 + 165 * 2);

    let store = HistoryStore::new(&config_second.history_path);
    let summaries = store.summaries().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1].snapshot_date, date(2025, 12, 27));
}

#[tokio::test]
async fn ranks_are_contiguous_per_division() {
    let server = serve(load_fixture("rankings_full.html")).await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir);
    run_update(&config, date(2025, 12, 20), false).await.unwrap();

    let records = HistoryStore::new(&config.history_path).load().unwrap();
    let mut by_division: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for record in &records {
        by_division
            .entry(record.division.clone())
            .or_default()
            .push(record.rank);
    }
    assert_eq!(by_division.len(), 11);
    for (division, ranks) in by_division {
        assert_eq!(ranks, (1..=15).collect::<Vec<u32>>(), "{}", division);
    }
    assert!(records.iter().all(|r| !r.division.ends_with("Top Rank")));
}

#[tokio::test]
async fn rank_changes_and_champions_are_recorded() {
    let server = serve(load_fixture("rankings_full.html")).await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir);
    run_update(&config, date(2025, 12, 20), false).await.unwrap();

    let records = HistoryStore::new(&config.history_path).load().unwrap();
    let p4p: Vec<_> = records
        .iter()
        .filter(|r| r.division == "Men's Pound-for-Pound")
        .collect();
    assert_eq!(p4p.len(), 15);
    assert!(p4p.iter().all(|r| r.champion == "Islam Makhachev"));
    assert_eq!(p4p[0].rank_change, RankChange::Up(2));
    assert_eq!(p4p[3].rank_change, RankChange::Down(1));
    assert_eq!(p4p[6].rank_change, RankChange::NotRanked);
    assert_eq!(p4p[8].rank_change, RankChange::Up(11));
    assert_eq!(p4p[11].rank_change, RankChange::Unknown);
    assert_eq!(p4p[1].rank_change, RankChange::Unknown);
    assert_eq!(
        p4p[0].fighter_url,
        format!("{}/athlete/mens-pound-for-pound-contender-1", server.uri())
    );

    let flyweight_last = records
        .iter()
        .find(|r| r.division == "Flyweight" && r.rank == 15)
        .unwrap();
    assert_eq!(flyweight_last.rank_change, RankChange::NotRanked);
    assert_eq!(flyweight_last.champion, "Alexandre Pantoja");
}

#[tokio::test]
async fn january_run_places_december_update_in_previous_year() {
    let server = serve(load_fixture("rankings_full.html")).await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir);

    let report = run_update(&config, date(2026, 1, 5), false).await.unwrap();
    assert_eq!(report.ufc_last_updated, date(2025, 12, 16));
    assert_eq!(report.snapshot_date, date(2026, 1, 5));
}

#[tokio::test]
async fn missing_last_updated_block_writes_nothing() {
    let page = load_fixture("rankings_full.html").replace("list-denotions", "list-notes");
    let server = serve(page).await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir);

    let err = run_update(&config, date(2025, 12, 20), false)
        .await
        .unwrap_err();
    assert!(matches!(err, RankingsError::Structure(_)));
    assert!(!config.history_path.exists());
}

#[tokio::test]
async fn unparseable_date_writes_nothing() {
    let page = load_fixture("rankings_full.html").replace("Dec. 16", "16/12");
    let server = serve(page).await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir);

    let err = run_update(&config, date(2025, 12, 20), false)
        .await
        .unwrap_err();
    assert!(matches!(err, RankingsError::DateParse(_)));
    assert!(!config.history_path.exists());
}

#[tokio::test]
async fn too_few_rows_writes_nothing() {
    let server = serve(load_fixture("rankings_full.html")).await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir).with_min_rows(200);

    let err = run_update(&config, date(2025, 12, 20), false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RankingsError::BelowThreshold { rows: 165, min: 200 }
    ));
    assert!(!config.history_path.exists());
}

#[tokio::test]
async fn server_error_writes_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rankings"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let dir = TempDir::new().unwrap();
    let config = config(&mock_server, &dir);

    let err = run_update(&config, date(2025, 12, 20), false)
        .await
        .unwrap_err();
    assert!(matches!(err, RankingsError::Fetch(_)));
    assert!(!config.history_path.exists());
}

#[tokio::test]
async fn dry_run_never_touches_history() {
    let server = serve(load_fixture("rankings_full.html")).await;
    let dir = TempDir::new().unwrap();
    let config = config(&server, &dir);

    let report = run_update(&config, date(2025, 12, 20), true).await.unwrap();
    assert_eq!(report.rows, 165);
    assert!(report.outcome.is_none());
    assert!(!config.history_path.exists());
}

#[test]
fn page_without_rankings_is_structural() {
    let dir = TempDir::new().unwrap();
    let config = RankingsConfig::default().with_history_path(dir.path().join("h.csv"));
    let doc = Document::parse(
        r#"<html><body>
            <div class="list-denotions"><p>Last updated: Tuesday, Dec. 16</p></div>
            <div class="view-grouping"><div class="promo">Tickets</div></div>
        </body></html>"#,
    );

    let err = process_document(&doc, &config, date(2025, 12, 20), false).unwrap_err();
    assert!(err.is_structural());
    assert!(!config.history_path.exists());
}
