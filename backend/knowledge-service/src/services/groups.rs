/// Grouping engine for the cluster and feed views
///
/// Partitions the published, non-excluded post set by author, tag, or
/// folder, then orders the groups alphabetically or by size.
use sqlx::PgPool;

use crate::db::criteria::{PostCriteria, Predicate};
use crate::db::{group_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{Author, Post, PostGroup};

/// Supported grouping dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Author,
    Tags,
    Folder,
}

impl GroupBy {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "author" => Ok(GroupBy::Author),
            "tags" => Ok(GroupBy::Tags),
            "folder" => Ok(GroupBy::Folder),
            other => Err(AppError::ValidationError(format!(
                "group by `{}` not understood",
                other
            ))),
        }
    }
}

/// Resolved grouping parameters.
#[derive(Debug, Clone)]
pub struct GroupParams {
    pub filters: String,
    pub sort_by: String,
    pub sort_desc: bool,
    pub group_by: String,
}

/// Group posts by the `group_by` field for the cluster and feed views.
pub async fn get_post_groups(
    pool: &PgPool,
    excluded_tags: &[String],
    params: &GroupParams,
) -> Result<Vec<PostGroup>> {
    let mut groups = match GroupBy::parse(&params.group_by)? {
        GroupBy::Author => {
            let pairs = group_repo::author_post_pairs(pool, excluded_tags).await?;
            collect_author_groups(pairs)
        }
        GroupBy::Tags => {
            let pairs = group_repo::tag_post_pairs(pool, excluded_tags).await?;
            collect_tag_groups(pairs)
        }
        GroupBy::Folder => {
            // Folder grouping applies the filter tokens, and it matches them
            // verbatim as comma-delimited keywords rather than with the
            // three-mode substring match used by the listing query.
            let mut criteria = PostCriteria::visible(excluded_tags);
            if !params.filters.is_empty() {
                for token in params.filters.split(' ').filter(|t| !t.is_empty()) {
                    criteria = criteria.and(Predicate::KeywordCsvToken(token.to_string()));
                }
            }
            let posts = post_repo::list_all_posts(pool, &criteria).await?;
            collect_folder_groups(posts)
        }
    };

    sort_groups(&mut groups, &params.sort_by, params.sort_desc);
    Ok(groups)
}

/// Parent directory of a post path: `a/b/c` -> `a/b`, `c` -> ``.
pub fn parent_folder(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

/// Fold (author, post) pairs into one group per author, preserving pair
/// order within each group.
pub fn collect_author_groups(pairs: Vec<(Author, Post)>) -> Vec<PostGroup> {
    let mut groups: Vec<PostGroup> = Vec::new();
    for (author, post) in pairs {
        match groups
            .iter_mut()
            .find(|g| g.author.as_deref() == Some(author.identifier.as_str()))
        {
            Some(group) => group.posts.push(post),
            None => groups.push(PostGroup {
                key: author.format_name,
                author: Some(author.identifier),
                posts: vec![post],
            }),
        }
    }
    groups
}

/// Fold (tag name, post) pairs into one group per tag.
pub fn collect_tag_groups(pairs: Vec<(String, Post)>) -> Vec<PostGroup> {
    let mut groups: Vec<PostGroup> = Vec::new();
    for (name, post) in pairs {
        match groups.iter_mut().find(|g| g.key == name) {
            Some(group) => group.posts.push(post),
            None => groups.push(PostGroup {
                key: name,
                author: None,
                posts: vec![post],
            }),
        }
    }
    groups
}

/// Partition posts by parent folder, first-seen order.
pub fn collect_folder_groups(posts: Vec<Post>) -> Vec<PostGroup> {
    let mut groups: Vec<PostGroup> = Vec::new();
    for post in posts {
        let folder = parent_folder(&post.path);
        match groups.iter_mut().find(|g| g.key == folder) {
            Some(group) => group.posts.push(post),
            None => groups.push(PostGroup {
                key: folder,
                author: None,
                posts: vec![post],
            }),
        }
    }
    groups
}

/// Order groups alphabetically by key, or by size per `sort_desc`.
pub fn sort_groups(groups: &mut [PostGroup], sort_by: &str, sort_desc: bool) {
    if sort_by == "alpha" {
        groups.sort_by(|a, b| a.key.cmp(&b.key));
    } else if sort_desc {
        groups.sort_by(|a, b| b.posts.len().cmp(&a.posts.len()));
    } else {
        groups.sort_by(|a, b| a.posts.len().cmp(&b.posts.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(id: i64, path: &str) -> Post {
        let now = Utc::now();
        Post {
            id,
            path: path.to_string(),
            title: format!("post {}", id),
            subtitle: None,
            tldr: String::new(),
            keywords: String::new(),
            status: "published".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn parse_rejects_unknown_group_by() {
        for raw in ["bogus", "", "folders"] {
            let err = GroupBy::parse(raw).unwrap_err();
            assert!(err.to_string().contains(raw));
        }
        assert_eq!(GroupBy::parse("folder").unwrap(), GroupBy::Folder);
    }

    #[test]
    fn parent_folder_drops_last_segment() {
        assert_eq!(parent_folder("a/b/c"), "a/b");
        assert_eq!(parent_folder("a/b"), "a");
        assert_eq!(parent_folder("standalone"), "");
    }

    #[test]
    fn folder_groups_partition_all_posts() {
        let posts = vec![
            post(4, "a/p4"),
            post(3, "b/p3"),
            post(2, "a/p2"),
            post(1, "p1"),
        ];
        let groups = collect_folder_groups(posts);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", ""]);

        let total: usize = groups.iter().map(|g| g.posts.len()).sum();
        assert_eq!(total, 4);
        assert_eq!(
            groups[0].posts.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![4, 2]
        );
    }

    #[test]
    fn tag_groups_keep_pair_order() {
        let pairs = vec![
            ("t1".to_string(), post(1, "a/p1")),
            ("t2".to_string(), post(2, "b/p2")),
        ];
        let groups = collect_tag_groups(pairs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "t1");
        assert_eq!(groups[0].posts[0].id, 1);
        assert_eq!(groups[1].key, "t2");
        assert_eq!(groups[1].posts[0].id, 2);
    }

    #[test]
    fn author_groups_carry_identifier() {
        let ann = Author {
            id: 1,
            identifier: "ann".to_string(),
            format_name: "Ann Smith".to_string(),
        };
        let pairs = vec![
            (ann.clone(), post(2, "a/p2")),
            (ann, post(1, "a/p1")),
        ];
        let groups = collect_author_groups(pairs);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "Ann Smith");
        assert_eq!(groups[0].author.as_deref(), Some("ann"));
        assert_eq!(groups[0].posts.len(), 2);
    }

    #[test]
    fn alpha_sort_orders_keys_ascending() {
        let mut groups = collect_folder_groups(vec![
            post(1, "zeta/p1"),
            post(2, "alpha/p2"),
            post(3, "mid/p3"),
        ]);
        sort_groups(&mut groups, "alpha", true);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn size_sort_is_monotonic_per_direction() {
        let posts = vec![
            post(1, "big/p1"),
            post(2, "big/p2"),
            post(3, "big/p3"),
            post(4, "mid/p4"),
            post(5, "mid/p5"),
            post(6, "small/p6"),
        ];
        let mut groups = collect_folder_groups(posts.clone());
        sort_groups(&mut groups, "size", true);
        let sizes: Vec<usize> = groups.iter().map(|g| g.posts.len()).collect();
        assert_eq!(sizes, vec![3, 2, 1]);

        let mut groups = collect_folder_groups(posts);
        sort_groups(&mut groups, "size", false);
        let sizes: Vec<usize> = groups.iter().map(|g| g.posts.len()).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
    }
}
