/// Predicate builder for post listing queries
///
/// Filter criteria are collected as an explicit predicate list and rendered
/// exactly once into a `sqlx::QueryBuilder`. Every listing and grouping query
/// goes through this module so the visibility rules (published status,
/// excluded tags) stay in one place.
use sqlx::{Postgres, QueryBuilder};

/// Status value a post must carry to appear in any listing.
pub const PUBLISHED: &str = "published";

/// A single filter condition over the `posts` table (aliased `p`).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `status = 'published'`
    Published,
    /// Post carries no tag with one of the given names
    NoExcludedTag(Vec<String>),
    /// One normalized filter token matched against the keyword string as
    /// substring, suffix, or prefix (case-insensitive, three modes OR-ed)
    KeywordToken(String),
    /// One raw filter token matched against the keyword string as the
    /// literal substring `,token,`. Used by folder grouping only; this is
    /// deliberately narrower than [`Predicate::KeywordToken`].
    KeywordCsvToken(String),
    /// Post path lies directly under one of the given prefixes, one level
    /// deep only
    PathUnder(Vec<String>),
    /// Post has at least one of the given tags
    HasAnyTag(Vec<String>),
    /// Post has at least one author with one of the given identifiers
    HasAnyAuthor(Vec<String>),
}

/// Conjunction of predicates applied to a post query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostCriteria {
    predicates: Vec<Predicate>,
}

impl PostCriteria {
    /// Base criteria every listing starts from: published posts outside the
    /// excluded tags.
    pub fn visible(excluded_tags: &[String]) -> Self {
        let mut criteria = PostCriteria {
            predicates: vec![Predicate::Published],
        };
        if !excluded_tags.is_empty() {
            criteria
                .predicates
                .push(Predicate::NoExcludedTag(excluded_tags.to_vec()));
        }
        criteria
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Render the `WHERE` clause into the given builder. Bind parameters are
    /// pushed in predicate order.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.predicates.is_empty() {
            return;
        }
        qb.push(" WHERE ");
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            push_predicate(predicate, qb);
        }
    }
}

fn push_predicate(predicate: &Predicate, qb: &mut QueryBuilder<'_, Postgres>) {
    match predicate {
        Predicate::Published => {
            qb.push("p.status = ");
            qb.push_bind(PUBLISHED);
        }
        Predicate::NoExcludedTag(names) => {
            qb.push(
                "NOT EXISTS (SELECT 1 FROM post_tags pt \
                 JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.name = ANY(",
            );
            qb.push_bind(names.clone());
            qb.push("))");
        }
        Predicate::KeywordToken(token) => {
            let [contains, suffix, prefix] = keyword_patterns(token);
            qb.push("(lower(p.keywords) LIKE ");
            qb.push_bind(contains);
            qb.push(" OR lower(p.keywords) LIKE ");
            qb.push_bind(suffix);
            qb.push(" OR lower(p.keywords) LIKE ");
            qb.push_bind(prefix);
            qb.push(")");
        }
        Predicate::KeywordCsvToken(token) => {
            qb.push("p.keywords LIKE ");
            qb.push_bind(csv_pattern(token));
        }
        Predicate::PathUnder(prefixes) => {
            qb.push("(");
            for (i, prefix) in prefixes.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                let (under, deeper) = path_patterns(prefix);
                qb.push("(p.path LIKE ");
                qb.push_bind(under);
                qb.push(" AND p.path NOT LIKE ");
                qb.push_bind(deeper);
                qb.push(")");
            }
            qb.push(")");
        }
        Predicate::HasAnyTag(names) => {
            qb.push(
                "EXISTS (SELECT 1 FROM post_tags pt \
                 JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.name = ANY(",
            );
            qb.push_bind(names.clone());
            qb.push("))");
        }
        Predicate::HasAnyAuthor(identifiers) => {
            qb.push(
                "EXISTS (SELECT 1 FROM post_authors pa \
                 JOIN users u ON u.id = pa.user_id \
                 WHERE pa.post_id = p.id AND u.identifier = ANY(",
            );
            qb.push_bind(identifiers.clone());
            qb.push("))");
        }
    }
}

/// The three match modes for one keyword token: contains, suffix, prefix.
pub fn keyword_patterns(token: &str) -> [String; 3] {
    [
        format!("%{}%", token),
        format!("%{}", token),
        format!("{}%", token),
    ]
}

/// Literal comma-delimited keyword pattern used by folder grouping.
pub fn csv_pattern(token: &str) -> String {
    format!("%,{},%", token)
}

/// LIKE patterns for the depth-one path filter: directly under the prefix,
/// and the deeper levels to exclude.
pub fn path_patterns(prefix: &str) -> (String, String) {
    (format!("{}/%", prefix), format!("{}/%/%", prefix))
}

/// Sort key for post listings, either a post column or a joined aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    UpdatedAt,
    CreatedAt,
    Title,
    UniqueViews,
    AllViews,
    Upvotes,
    Comments,
}

impl SortKey {
    /// Resolve a raw request value. Unknown keys resolve to `None` and the
    /// listing falls back to id order alone.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "updated_at" => Some(SortKey::UpdatedAt),
            "created_at" => Some(SortKey::CreatedAt),
            "title" => Some(SortKey::Title),
            "uniqueviews" => Some(SortKey::UniqueViews),
            "allviews" => Some(SortKey::AllViews),
            "upvotes" => Some(SortKey::Upvotes),
            "comments" => Some(SortKey::Comments),
            _ => None,
        }
    }

    /// Whether ordering needs an engagement join plus `GROUP BY`.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            SortKey::UniqueViews | SortKey::AllViews | SortKey::Upvotes | SortKey::Comments
        )
    }

    /// Outer join pulling in the engagement rows this key aggregates over.
    pub fn join_clause(self) -> Option<&'static str> {
        match self {
            SortKey::UniqueViews | SortKey::AllViews => {
                Some(" LEFT JOIN page_views pv ON pv.object_id = p.path")
            }
            SortKey::Upvotes => Some(" LEFT JOIN votes v ON v.object_id = p.path"),
            SortKey::Comments => Some(" LEFT JOIN comments c ON c.post_path = p.path"),
            _ => None,
        }
    }

    /// Expression the listing is ordered by.
    pub fn order_expr(self) -> &'static str {
        match self {
            SortKey::UpdatedAt => "p.updated_at",
            SortKey::CreatedAt => "p.created_at",
            SortKey::Title => "p.title",
            SortKey::UniqueViews => "COUNT(DISTINCT pv.user_id)",
            SortKey::AllViews => "COUNT(pv.id)",
            SortKey::Upvotes => "COUNT(v.id)",
            SortKey::Comments => "COUNT(c.id)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(criteria: &PostCriteria) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT p.id FROM posts p");
        criteria.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn visible_renders_published_and_excluded_tags() {
        let sql = rendered(&PostCriteria::visible(&["private".to_string()]));
        assert!(sql.contains("p.status = $1"));
        assert!(sql.contains("NOT EXISTS"));
        assert!(sql.contains("t.name = ANY($2)"));
    }

    #[test]
    fn visible_without_excluded_tags_has_no_tag_clause() {
        let sql = rendered(&PostCriteria::visible(&[]));
        assert!(sql.contains("p.status = $1"));
        assert!(!sql.contains("NOT EXISTS"));
    }

    #[test]
    fn keyword_tokens_are_anded_with_three_modes_each() {
        let criteria = PostCriteria::visible(&[])
            .and(Predicate::KeywordToken("python".into()))
            .and(Predicate::KeywordToken("spark".into()));
        let sql = rendered(&criteria);
        // two tokens, three LIKE branches each, plus the status bind
        assert_eq!(sql.matches("lower(p.keywords) LIKE").count(), 6);
        assert_eq!(sql.matches(" AND ").count(), 2);
    }

    #[test]
    fn keyword_patterns_cover_contains_suffix_prefix() {
        assert_eq!(
            keyword_patterns("ml"),
            ["%ml%".to_string(), "%ml".to_string(), "ml%".to_string()]
        );
    }

    #[test]
    fn csv_pattern_is_comma_delimited() {
        assert_eq!(csv_pattern("ml"), "%,ml,%");
    }

    #[test]
    fn path_patterns_stop_at_one_level() {
        let (under, deeper) = path_patterns("a/b");
        assert_eq!(under, "a/b/%");
        assert_eq!(deeper, "a/b/%/%");
    }

    #[test]
    fn path_filter_ors_prefixes() {
        let criteria = PostCriteria::visible(&[]).and(Predicate::PathUnder(vec![
            "projects".to_string(),
            "research".to_string(),
        ]));
        let sql = rendered(&criteria);
        assert_eq!(sql.matches("p.path LIKE").count(), 2);
        assert_eq!(sql.matches("p.path NOT LIKE").count(), 2);
        assert_eq!(sql.matches(" OR (").count(), 1);
    }

    #[test]
    fn unknown_sort_key_is_ignored() {
        assert_eq!(SortKey::parse("bogus"), None);
        assert_eq!(SortKey::parse(""), None);
    }

    #[test]
    fn aggregate_keys_carry_join_and_group() {
        for key in ["uniqueviews", "allviews", "upvotes", "comments"] {
            let sort = SortKey::parse(key).unwrap();
            assert!(sort.is_aggregate());
            assert!(sort.join_clause().is_some());
        }
        for key in ["updated_at", "created_at", "title"] {
            let sort = SortKey::parse(key).unwrap();
            assert!(!sort.is_aggregate());
            assert!(sort.join_clause().is_none());
        }
    }
}
