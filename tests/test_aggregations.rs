mod common;

use common::{filters, memory_index, wood_catalog};
use facetdex::{FacetCount, FacetdexError};
use serde_json::json;

#[test]
fn test_drill_down_under_material() {
    let index = memory_index();
    wood_catalog(&index);
    index.rebuild().unwrap();

    let summary = index.aggregations(&filters(&["material:wood"])).unwrap();
    let color = &summary.facets["color"];
    assert_eq!(color.value("black"), Some(1));
    assert_eq!(color.value("red"), Some(1));
    assert_eq!(summary.facets.len(), 1);

    let price = summary.scalar("price").unwrap();
    assert_eq!(price.count, 2);
    assert_eq!(price.min, 10.0);
    assert_eq!(price.max, 20.0);
    assert_eq!(price.avg, 15.0);
    assert!(summary.scalar("updated").is_some());
}

#[test]
fn test_statistics_wait_for_rebuild() {
    let index = memory_index();
    wood_catalog(&index);

    let summary = index.aggregations(&[]).unwrap();
    assert!(summary.facets.is_empty());
    assert!(summary.scalars.is_empty());

    index.rebuild().unwrap();
    assert!(!index.aggregations(&[]).unwrap().facets.is_empty());
}

#[test]
fn test_root_breakdown_sums_to_unfiltered_count() {
    let index = memory_index();
    for (material, color) in [
        ("wood", "black"),
        ("wood", "red"),
        ("steel", "red"),
        ("stone", "blue"),
    ] {
        index
            .upsert(&json!({"material": material, "color": color, "price": 1}))
            .unwrap();
    }
    index.rebuild().unwrap();

    let root = index.aggregations(&[]).unwrap();
    let unfiltered = root.scalar("price").unwrap().count;
    assert_eq!(unfiltered, 4);
    assert_eq!(root.facets["material"].total(), unfiltered);
    assert_eq!(root.facets["color"].total(), unfiltered);
    assert_eq!(root.facets["material"].value("wood"), Some(2));
    assert_eq!(root.facets["color"].value("red"), Some(2));
}

#[test]
fn test_flags_report_single_counts() {
    let index = memory_index();
    index
        .upsert(&json!({"color": "red", "on_sale": true}))
        .unwrap();
    index.upsert(&json!({"color": "red"})).unwrap();
    index.rebuild().unwrap();

    let summary = index.aggregations(&filters(&["color:red"])).unwrap();
    assert_eq!(summary.facets["on_sale"], FacetCount::Flag(1));

    let root = index.aggregations(&[]).unwrap();
    assert_eq!(root.facets["on_sale"].as_flag(), Some(1));
    assert_eq!(root.facets["color"].value("red"), Some(2));
}

#[test]
fn test_drill_down_two_levels() {
    let index = memory_index();
    index
        .upsert(&json!({"material": "wood", "color": "red", "size": "s"}))
        .unwrap();
    index
        .upsert(&json!({"material": "wood", "color": "red", "size": "m"}))
        .unwrap();
    index
        .upsert(&json!({"material": "wood", "color": "blue", "size": "m"}))
        .unwrap();
    index.rebuild().unwrap();

    let summary = index
        .aggregations(&filters(&["material:wood", "color:red"]))
        .unwrap();
    assert_eq!(summary.facets["size"].value("s"), Some(1));
    assert_eq!(summary.facets["size"].value("m"), Some(1));
    assert!(!summary.facets.contains_key("color"));
    assert_eq!(summary.scalar("updated").unwrap().count, 2);
}

#[test]
fn test_rebuild_is_idempotent() {
    let index = memory_index();
    wood_catalog(&index);
    index.upsert(&json!({"material": "steel", "price": 5})).unwrap();

    let first_report = index.rebuild().unwrap();
    let first_root = index.aggregations(&[]).unwrap();
    let first_wood = index.aggregations(&filters(&["material:wood"])).unwrap();

    let second_report = index.rebuild().unwrap();
    assert_eq!(first_report, second_report);
    assert_eq!(index.aggregations(&[]).unwrap(), first_root);
    assert_eq!(
        index.aggregations(&filters(&["material:wood"])).unwrap(),
        first_wood
    );
}

#[test]
fn test_rebuild_forgets_combinations_removed_by_update() {
    let index = memory_index();
    let (black, _) = wood_catalog(&index);
    index.rebuild().unwrap();

    index
        .upsert(&json!({"id": black, "material": "wood", "color": "blue", "price": 10}))
        .unwrap();
    // stale until the next maintenance pass
    let stale = index.aggregations(&filters(&["material:wood"])).unwrap();
    assert_eq!(stale.facets["color"].value("black"), Some(1));

    let report = index.rebuild().unwrap();
    assert!(report.orphaned > 0);
    let fresh = index.aggregations(&filters(&["material:wood"])).unwrap();
    assert_eq!(fresh.facets["color"].value("black"), None);
    assert_eq!(fresh.facets["color"].value("blue"), Some(1));
    assert_eq!(fresh.facets["color"].value("red"), Some(1));
}

#[test]
fn test_unknown_filter_is_not_found() {
    let index = memory_index();
    wood_catalog(&index);
    let err = index
        .aggregations(&filters(&["material:unobtainium"]))
        .unwrap_err();
    assert!(matches!(err, FacetdexError::FacetNotFound(_)));
}

#[test]
fn test_scalar_name_is_not_a_filter() {
    let index = memory_index();
    index
        .upsert(&json!({"material": "wood", "price": 10}))
        .unwrap();
    index.rebuild().unwrap();

    let err = index.aggregations(&filters(&["price"])).unwrap_err();
    assert!(matches!(err, FacetdexError::FacetNotFound(ref name) if name == "price"));
    let err = index.aggregations(&filters(&["updated"])).unwrap_err();
    assert!(matches!(err, FacetdexError::FacetNotFound(_)));
    assert!(index.aggregations(&filters(&["material:wood"])).is_ok());
}

#[test]
fn test_flag_key_with_separator_does_not_pose_as_value() {
    let index = memory_index();
    index.upsert(&json!({"a:b": true, "price": 1})).unwrap();
    let valued = index.upsert(&json!({"a": "b", "price": 2})).unwrap();
    index.rebuild().unwrap();

    let root = index.aggregations(&[]).unwrap();
    assert_eq!(root.facets["a"], FacetCount::Values([("b".to_string(), 1)].into()));

    let hits = index
        .search(&facetdex::SearchParams::new().sort_by("price").filter("a:b"))
        .unwrap();
    assert_eq!(hits.iter().map(|hit| hit.id).collect::<Vec<_>>(), vec![valued]);
}
