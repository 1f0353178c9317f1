mod helpers;

use helpers::{insert_photo, test_db, test_embedding};
use viewfinder::catalog::browse::{get_photo, list_photos, record_click};
use viewfinder::catalog::search::{search_photos, SearchFilter, SearchOptions};
use viewfinder::catalog::stats::{categories, library_stats};
use viewfinder::catalog::types::EmbeddingKind;

#[test]
fn pagination_walks_the_whole_catalog() {
    let mut conn = test_db();
    for i in 0..5 {
        insert_photo(
            &mut conn,
            &format!("Photo {i}"),
            "",
            "nature",
            &test_embedding(i),
            &test_embedding(i + 100),
        );
    }

    let page1 = list_photos(&conn, 1, 2, None).unwrap();
    assert_eq!(page1.photos.len(), 2);
    assert_eq!(page1.total, 5);
    assert_eq!(page1.pages, 3);

    let page3 = list_photos(&conn, 3, 2, None).unwrap();
    assert_eq!(page3.photos.len(), 1);

    let page4 = list_photos(&conn, 4, 2, None).unwrap();
    assert!(page4.photos.is_empty(), "past-the-end pages are empty, not errors");
    assert_eq!(page4.total, 5);
}

#[test]
fn newest_photos_come_first() {
    let mut conn = test_db();
    insert_photo(&mut conn, "First", "", "nature", &test_embedding(0), &test_embedding(100));
    insert_photo(&mut conn, "Second", "", "nature", &test_embedding(1), &test_embedding(101));
    insert_photo(&mut conn, "Third", "", "nature", &test_embedding(2), &test_embedding(102));

    let page = list_photos(&conn, 1, 10, None).unwrap();
    let titles: Vec<&str> = page.photos.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[test]
fn category_filter_scopes_list_and_total() {
    let mut conn = test_db();
    insert_photo(&mut conn, "Tree", "", "nature", &test_embedding(0), &test_embedding(100));
    insert_photo(&mut conn, "River", "", "nature", &test_embedding(1), &test_embedding(101));
    insert_photo(&mut conn, "Tower", "", "city", &test_embedding(2), &test_embedding(102));

    let page = list_photos(&conn, 1, 10, Some("nature")).unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.pages, 1);
    assert!(page.photos.iter().all(|p| p.category == "nature"));
}

#[test]
fn click_tracking_updates_photo_and_log() {
    let mut conn = test_db();
    let id = insert_photo(&mut conn, "Clicked", "", "nature", &test_embedding(0), &test_embedding(100)).id;

    assert_eq!(record_click(&conn, &id).unwrap(), Some(1));
    assert_eq!(record_click(&conn, &id).unwrap(), Some(2));

    let photo = get_photo(&conn, &id).unwrap().unwrap();
    assert_eq!(photo.click_count, 2);

    let click_rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM activity_log WHERE operation = 'click' AND photo_id = ?1",
            rusqlite::params![id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(click_rows, 2);

    // Unknown IDs report None and leave no trace
    assert_eq!(record_click(&conn, "no-such-id").unwrap(), None);
    let total_clicks: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM activity_log WHERE operation = 'click'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(total_clicks, 2);
}

#[test]
fn library_stats_reflect_catalog_and_activity() {
    let mut conn = test_db();
    let id = insert_photo(&mut conn, "Tree", "", "nature", &test_embedding(0), &test_embedding(100)).id;
    insert_photo(&mut conn, "River", "", "nature", &test_embedding(1), &test_embedding(101));
    insert_photo(&mut conn, "Tower", "", "city", &test_embedding(2), &test_embedding(102));

    search_photos(
        &conn,
        &test_embedding(0),
        EmbeddingKind::Text,
        "tree",
        &SearchFilter::default(),
        &SearchOptions::default(),
    )
    .unwrap();
    record_click(&conn, &id).unwrap();

    let stats = library_stats(&conn, None).unwrap();
    assert_eq!(stats.total_photos, 3);
    assert_eq!(stats.total_uploads, 3);
    assert_eq!(stats.total_searches, 1);
    assert_eq!(stats.total_clicks, 1);
    assert!(stats.oldest_photo.is_some());
    assert!(stats.newest_photo.is_some());
    assert!(stats.oldest_photo <= stats.newest_photo);

    let cats = categories(&conn).unwrap();
    assert_eq!(cats.len(), 2);
    assert_eq!(cats[0].name, "nature");
    assert_eq!(cats[0].count, 2);
    assert_eq!(cats[1].name, "city");
    assert_eq!(cats[1].count, 1);
}
