//! End-to-end tests over the public API: a dataset loaded from JSON, served
//! through the datasource adapter, with layouts persisted to SQLite.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use gridsource_lib::Datasource;
use gridsource_lib::DatasourceConfig;
use gridsource_lib::FakeServer;
use gridsource_lib::GetRowsParams;
use gridsource_lib::columns::ColumnDefs;
use gridsource_lib::datasource::RowsOutcome;
use gridsource_lib::datasource::ServerSideDatasource;
use gridsource_lib::layout::LayoutPersistence;
use gridsource_lib::layout::LayoutSaver;
use gridsource_lib::layout::SqliteLayoutStore;
use gridsource_lib::loader::rows_from_str;
use gridsource_lib::model::row_id_string;
use gridsource_lib::query::ColumnVo;
use gridsource_lib::query::Direction;
use gridsource_lib::query::Pagination;
use gridsource_lib::query::Request;
use gridsource_lib::query::SortModelItem;
use serde_json::json;

const WINNERS: &str = r#"[
    {"athlete": "Michael Phelps", "age": 23, "country": "United States", "year": 2008, "date": "24/08/2008", "sport": "Swimming", "gold": 8, "total": 8},
    {"athlete": "Natalie Coughlin", "age": 25, "country": "United States", "year": 2008, "date": "24/08/2008", "sport": "Swimming", "gold": 1, "total": 6},
    {"athlete": "Aleksey Nemov", "age": 24, "country": "Russia", "year": 2000, "date": "01/10/2000", "sport": "Gymnastics", "gold": 2, "total": 6},
    {"athlete": "Alicia Coutts", "age": 24, "country": "Australia", "year": 2012, "date": "12/08/2012", "sport": "Swimming", "gold": 1, "total": 5},
    {"athlete": "Missy Franklin", "age": 17, "country": "United States", "year": 2012, "date": "12/08/2012", "sport": "Swimming", "gold": 4, "total": 5},
    {"athlete": "Ryan Lochte", "age": 27, "country": "United States", "year": 2012, "date": "12/08/2012", "sport": "Swimming", "gold": 2, "total": 5},
    {"athlete": "Allison Schmitt", "age": 22, "country": "United States", "year": 2012, "date": "12/08/2012", "sport": "Swimming", "gold": 3, "total": 5},
    {"athlete": "Ian Thorpe", "age": 17, "country": "Australia", "year": 2000, "date": "01/10/2000", "sport": "Swimming", "gold": 3, "total": 5}
]"#;

const COLUMNS: &str = r#"[
    {"headerName": "Athlete", "groupId": "groupA", "marryChildren": true, "children": [
        {"field": "athlete", "width": 200, "cellRenderer": "CustomCellRenderer"},
        {"field": "age", "width": 220},
        {"field": "country", "width": 220}
    ]},
    {"headerName": "Event", "groupId": "groupB", "children": [
        {"field": "year", "width": 180},
        {"field": "date", "width": 180, "comparator": "dateComparator"},
        {"field": "sport", "width": 180}
    ]},
    {"headerName": "Medals", "groupId": "groupC", "children": [
        {"field": "gold", "width": 120, "cellRenderer": "Push"},
        {"field": "total", "width": 120}
    ]}
]"#;

fn datasource() -> Datasource {
    let rows = rows_from_str(WINNERS).unwrap();
    let defs = ColumnDefs::from_json_str(COLUMNS).unwrap();
    let server = FakeServer::new(rows).with_comparators(defs.comparators());
    Datasource::new(server).with_config(DatasourceConfig::default().with_latency(Duration::from_millis(20)))
}

fn ids(rows: &[gridsource_lib::Row]) -> Vec<String> {
    rows.iter().map(row_id_string).collect()
}

#[tokio::test]
async fn test_sort_by_date_then_athlete() {
    let request = Request::range(0, 8)
        .sort_by(SortModelItem::desc("date"))
        .sort_by(SortModelItem::asc("athlete"));

    let block = datasource().fetch_rows(request).await.unwrap();

    // 2012 winners first by athlete name, then 2008, then 2000.
    assert_eq!(ids(&block.row_data), ["4", "7", "5", "6", "1", "2", "3", "8"]);
    assert_eq!(block.row_count, Some(8));
}

#[tokio::test]
async fn test_no_match_is_a_successful_empty_block() {
    let request = Request::range(0, 100).filter("country", json!({"type": "equals", "filter": "USA"}));

    let block = datasource().fetch_rows(request).await.unwrap();

    assert!(block.row_data.is_empty());
    assert_eq!(block.row_count, Some(0));
}

#[tokio::test]
async fn test_pages_cover_the_filtered_set_once() {
    let datasource = datasource();
    let base = Request::default().filter("sport", json!({"filterType": "set", "values": ["Swimming"]}));
    let pages = Pagination::new(3);

    let mut seen = Vec::new();
    let mut page = 0;
    loop {
        let block = datasource.fetch_rows(pages.request_for_page(page, &base)).await.unwrap();
        assert_eq!(block.row_count, Some(7));
        if block.row_data.is_empty() {
            break;
        }
        seen.extend(ids(&block.row_data));
        page += 1;
    }

    assert_eq!(page, 3);
    assert_eq!(seen, ["1", "2", "4", "5", "6", "7", "8"]);
}

#[tokio::test]
async fn test_overlapping_requests_complete_exactly_once_each() {
    let datasource = datasource();
    let outcomes = Arc::new(Mutex::new(Vec::new()));

    for (tag, request) in [("first", Request::range(0, 5)), ("second", Request::range(2, 8))] {
        let outcomes = outcomes.clone();
        datasource.get_rows(GetRowsParams::new(request, move |outcome| {
            outcomes.lock().unwrap().push((tag, outcome));
        }));
    }

    tokio::time::sleep(Duration::from_millis(200)).await;

    let outcomes = outcomes.lock().unwrap();
    assert_eq!(outcomes.len(), 2);
    for tag in ["first", "second"] {
        let matching: Vec<_> = outcomes.iter().filter(|(t, _)| *t == tag).collect();
        assert_eq!(matching.len(), 1);
        assert!(matches!(matching[0].1, RowsOutcome::Success(_)));
    }
}

#[tokio::test]
async fn test_many_concurrent_windows_match_sequential_answers() {
    let datasource = datasource();
    let requests: Vec<Request> = (0..8)
        .map(|start| Request::range(start, start + 3).sort_by(SortModelItem::asc("age")))
        .collect();

    let concurrent = futures::future::join_all(requests.iter().cloned().map(|r| datasource.fetch_rows(r))).await;

    for (request, block) in requests.into_iter().zip(concurrent) {
        let expected = datasource.server().get_data(&request);
        let block = block.unwrap();
        assert_eq!(block.row_data, expected.rows);
        assert_eq!(block.row_count, Some(8));
    }
}

#[tokio::test]
async fn test_group_level_then_drill_down() {
    let datasource = datasource();
    let by_country = Request::range(0, 10)
        .group_by(ColumnVo::new("country"))
        .sort_by(SortModelItem::asc("country"));

    let groups = datasource.fetch_rows(by_country.clone()).await.unwrap();
    let countries: Vec<String> = groups.row_data.iter().map(|r| r.value("country").to_string()).collect();
    assert_eq!(countries, ["Australia", "Russia", "United States"]);
    assert_eq!(ids(&groups.row_data)[0], "group:Australia");

    let leaves = datasource
        .fetch_rows(by_country.with_group_keys(["Australia"]))
        .await
        .unwrap();
    assert_eq!(ids(&leaves.row_data), ["4", "8"]);
}

#[tokio::test]
async fn test_layout_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layouts.db");
    let defs = ColumnDefs::from_json_str(COLUMNS).unwrap();

    let store = SqliteLayoutStore::open(&path).await.unwrap();
    let saver = LayoutSaver::spawn(LayoutPersistence::new(store));
    let mut model = defs.column_model();
    model.set_column_sort("age", Some(Direction::Asc), Some(0));
    if let Some(event) = model.move_column("total", 0) {
        saver.notify(event, model.column_state());
    }
    if let Some(event) = model.set_column_visible("date", false) {
        saver.notify(event, model.column_state());
    }
    saver.shutdown().await;

    let reopened = LayoutPersistence::new(SqliteLayoutStore::open(&path).await.unwrap());
    let saved = reopened.restore().await.unwrap();
    let age = saved.iter().find(|c| c.col_id == "age").unwrap();
    assert_eq!(age.sort, Some(Direction::Asc));

    let mut mounted = defs.column_model();
    assert!(reopened.restore_into(&mut mounted).await);

    assert_eq!(mounted.column_ids()[0], "total");
    assert_eq!(mounted.column("date").unwrap().hide, Some(true));
    assert!(mounted.column_state().iter().all(|c| c.sort.is_none()));
}
