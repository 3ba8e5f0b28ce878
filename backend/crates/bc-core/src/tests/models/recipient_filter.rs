use crate::RecipientFilter;

use uuid::Uuid;

#[test]
fn test_blank_search_is_ignored() {
    let filter = RecipientFilter {
        search: Some("   ".into()),
        category_ids: vec![],
    };
    assert_eq!(filter.search_term(), None);
}

#[test]
fn test_search_term_is_normalized() {
    let filter = RecipientFilter {
        search: Some("  ALIce ".into()),
        category_ids: vec![],
    };
    assert_eq!(filter.search_term().as_deref(), Some("alice"));
}

#[test]
fn test_distinct_categories_keeps_first_seen_order() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let filter = RecipientFilter {
        search: None,
        category_ids: vec![b, a, b, a],
    };
    assert_eq!(filter.distinct_categories(), vec![b, a]);
}

#[test]
fn test_filter_deserializes_with_missing_fields() {
    let filter: RecipientFilter = serde_json::from_str("{}").unwrap();
    assert_eq!(filter, RecipientFilter::default());
}
