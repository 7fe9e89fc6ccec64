//! Property-style tests for the grouping engine and the listing math,
//! exercised on in-memory fixtures.

use chrono::Utc;
use knowledge_service::db::criteria::{csv_pattern, keyword_patterns, path_patterns};
use knowledge_service::models::Post;
use knowledge_service::services::groups::{
    collect_folder_groups, collect_tag_groups, parent_folder, sort_groups, GroupBy,
};
use knowledge_service::services::{page_count, query_param_set};

fn post(id: i64, path: &str) -> Post {
    let now = Utc::now();
    Post {
        id,
        path: path.to_string(),
        title: format!("post {}", id),
        subtitle: None,
        tldr: "tldr".to_string(),
        keywords: format!(",kw{},", id),
        status: "published".to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn folder_groups_cover_the_whole_post_set_exactly_once() {
    let posts: Vec<Post> = (1..=20)
        .map(|id| post(id, &format!("area{}/p{}", id % 4, id)))
        .collect();
    let expected: Vec<i64> = posts.iter().map(|p| p.id).collect();

    let groups = collect_folder_groups(posts);

    let mut seen: Vec<i64> = groups
        .iter()
        .flat_map(|g| g.posts.iter().map(|p| p.id))
        .collect();
    seen.sort_unstable();
    let mut expected = expected;
    expected.sort_unstable();
    assert_eq!(seen, expected);

    for group in &groups {
        for member in &group.posts {
            assert_eq!(parent_folder(&member.path), group.key);
        }
    }
}

#[test]
fn alpha_sort_is_lexicographically_ascending() {
    let mut groups = collect_folder_groups(vec![
        post(1, "ops/p1"),
        post(2, "analytics/p2"),
        post(3, "ml/p3"),
        post(4, "analytics/p4"),
    ]);
    sort_groups(&mut groups, "alpha", false);

    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
}

#[test]
fn size_sort_is_monotonic_in_the_requested_direction() {
    let posts: Vec<Post> = (1..=15)
        .map(|id| post(id, &format!("area{}/p{}", id % 5, id)))
        .collect();

    let mut groups = collect_folder_groups(posts.clone());
    sort_groups(&mut groups, "size", true);
    let sizes: Vec<usize> = groups.iter().map(|g| g.posts.len()).collect();
    assert!(sizes.windows(2).all(|w| w[0] >= w[1]), "descending: {:?}", sizes);

    let mut groups = collect_folder_groups(posts);
    sort_groups(&mut groups, "size", false);
    let sizes: Vec<usize> = groups.iter().map(|g| g.posts.len()).collect();
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]), "ascending: {:?}", sizes);
}

#[test]
fn tags_grouping_end_to_end_shape() {
    let pairs = vec![
        ("t1".to_string(), post(1, "a/p1")),
        ("t2".to_string(), post(2, "b/p2")),
    ];
    let mut groups = collect_tag_groups(pairs);
    sort_groups(&mut groups, "alpha", false);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, "t1");
    assert_eq!(
        groups[0].posts.iter().map(|p| p.path.as_str()).collect::<Vec<_>>(),
        vec!["a/p1"]
    );
    assert_eq!(groups[1].key, "t2");
    assert_eq!(
        groups[1].posts.iter().map(|p| p.path.as_str()).collect::<Vec<_>>(),
        vec!["b/p2"]
    );
}

#[test]
fn unsupported_group_by_always_errors() {
    for raw in ["bogus", "folders", "TAGS", "author "] {
        assert!(GroupBy::parse(raw).is_err(), "{} should not parse", raw);
    }
}

#[test]
fn page_count_matches_ceiling_division() {
    for total in 0..50 {
        for page_size in 1..12 {
            let expected = (total as f64 / page_size as f64).ceil() as i64;
            assert_eq!(page_count(total, page_size), expected);
        }
    }
}

#[test]
fn filter_tokens_are_normalized_before_matching() {
    assert_eq!(
        query_param_set("  Spark   Streaming "),
        vec!["spark", "streaming"]
    );
    assert!(query_param_set(" \t ").is_empty());
}

#[test]
fn keyword_and_folder_filters_use_different_match_shapes() {
    // Listing filters match a token three ways; folder grouping demands the
    // exact comma-delimited form.
    assert_eq!(keyword_patterns("ml").len(), 3);
    assert_eq!(csv_pattern("ml"), "%,ml,%");
}

#[test]
fn path_filter_is_one_level_deep() {
    let (under, deeper) = path_patterns("a/b");
    // 'a/b/c' matches the first pattern and not the second; 'a/b/c/d'
    // matches both and is therefore excluded.
    assert!(like_match(&under, "a/b/c"));
    assert!(!like_match(&deeper, "a/b/c"));
    assert!(like_match(&under, "a/b/c/d"));
    assert!(like_match(&deeper, "a/b/c/d"));
}

/// Minimal SQL LIKE evaluation for patterns built out of literals and `%`.
fn like_match(pattern: &str, value: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    let mut rest = value;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(idx) => rest = &rest[idx + part.len()..],
                None => return false,
            }
        }
    }
    true
}
