//! Site listing repository.

use sqlx::{FromRow, SqlitePool};

use crate::models::{NewSite, Status, StatusFilter, MIN_QUERY_LEN};

use super::{ActionOutcome, DbError, MoveDirection, MoveOutcome, StatusCounts};

/// Public search result cap.
pub const SEARCH_CAP: i64 = 30;
/// Admin dashboard row cap.
const ADMIN_LIST_CAP: i64 = 200;

const SEARCH_CLAUSE: &str = "(
    name LIKE ? COLLATE NOCASE
    OR category LIKE ? COLLATE NOCASE
    OR description LIKE ? COLLATE NOCASE
    OR IFNULL(city, '') LIKE ? COLLATE NOCASE
    OR url LIKE ? COLLATE NOCASE
)";

/// Site row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct SiteRecord {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub url: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub featured: i64,
    pub display_order: i64,
    pub submitted_at: String,
}

/// Site repository
pub struct SiteRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SiteRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Distinct categories that have at least one published site.
    pub async fn categories(&self) -> Result<Vec<String>, DbError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM sites
             WHERE status = 'valid' AND category <> ''
             ORDER BY category ASC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Published sites grouped by category, capped per category.
    /// Category order is alphabetical, matching [`Self::categories`].
    pub async fn featured_by_category(
        &self,
        per_category: usize,
    ) -> Result<Vec<(String, Vec<SiteRecord>)>, DbError> {
        let rows: Vec<SiteRecord> = sqlx::query_as(
            "SELECT * FROM sites
             WHERE status = 'valid' AND category <> ''
             ORDER BY category ASC, display_order ASC, featured DESC,
                      submitted_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        let mut grouped: Vec<(String, Vec<SiteRecord>)> = Vec::new();
        for site in rows {
            match grouped.last_mut() {
                Some((category, sites)) if *category == site.category => {
                    if sites.len() < per_category {
                        sites.push(site);
                    }
                }
                _ => grouped.push((site.category.clone(), vec![site])),
            }
        }
        Ok(grouped)
    }

    /// Latest published sites regardless of category.
    pub async fn latest(&self, limit: i64) -> Result<Vec<SiteRecord>, DbError> {
        let rows = sqlx::query_as(
            "SELECT * FROM sites
             WHERE status = 'valid'
             ORDER BY submitted_at DESC, id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// All published sites, newest first.
    pub async fn all_valid(&self) -> Result<Vec<SiteRecord>, DbError> {
        let rows = sqlx::query_as(
            "SELECT * FROM sites
             WHERE status = 'valid'
             ORDER BY submitted_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Published sites of one category, in admin-defined order.
    pub async fn by_category(&self, category: &str) -> Result<Vec<SiteRecord>, DbError> {
        let rows = sqlx::query_as(
            "SELECT * FROM sites
             WHERE category = ? AND status = 'valid'
             ORDER BY display_order ASC, featured DESC, submitted_at DESC, id DESC",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Case-insensitive substring search over published sites.
    /// Queries shorter than 2 characters return nothing.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<SiteRecord>, DbError> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }
        let like = format!("%{query}%");
        let sql = format!(
            "SELECT * FROM sites
             WHERE status = 'valid' AND {SEARCH_CLAUSE}
             ORDER BY featured DESC, display_order ASC, submitted_at DESC
             LIMIT ?"
        );
        let rows = sqlx::query_as(&sql)
            .bind(&like)
            .bind(&like)
            .bind(&like)
            .bind(&like)
            .bind(&like)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Insert a public submission as pending. Returns the new id.
    pub async fn submit(&self, site: &NewSite) -> Result<i64, DbError> {
        let result = sqlx::query(
            "INSERT INTO sites (name, city, url, description, category, status, submitted_at)
             VALUES (?, ?, ?, ?, ?, 'pending', DATETIME('now'))",
        )
        .bind(&site.name)
        .bind(&site.city)
        .bind(&site.url)
        .bind(&site.description)
        .bind(&site.category)
        .execute(self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Admin dashboard listing: status filter, optional search,
    /// pending entries first, capped at 200 rows. Returns the entries
    /// plus global per-status counts.
    pub async fn admin_list(
        &self,
        filter: StatusFilter,
        query: &str,
    ) -> Result<(Vec<SiteRecord>, StatusCounts), DbError> {
        let mut sql = String::from("SELECT * FROM sites WHERE 1 = 1");
        let mut binds: Vec<String> = Vec::new();

        if let StatusFilter::Only(status) = filter {
            sql.push_str(" AND status = ?");
            binds.push(status.as_str().to_string());
        }
        if query.chars().count() >= MIN_QUERY_LEN {
            sql.push_str(" AND ");
            sql.push_str(SEARCH_CLAUSE);
            let like = format!("%{query}%");
            binds.extend(std::iter::repeat(like).take(5));
        }
        sql.push_str(
            " ORDER BY CASE WHEN status = 'pending' THEN 0 ELSE 1 END,
                       submitted_at DESC, id DESC
              LIMIT ?",
        );

        let mut q = sqlx::query_as(&sql);
        for bind in &binds {
            q = q.bind(bind.as_str());
        }
        let entries = q.bind(ADMIN_LIST_CAP).fetch_all(self.pool).await?;

        let counts: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM sites GROUP BY status")
                .fetch_all(self.pool)
                .await?;

        Ok((entries, StatusCounts::from_rows(&counts)))
    }

    pub async fn by_id(&self, id: i64) -> Result<Option<SiteRecord>, DbError> {
        let row = sqlx::query_as("SELECT * FROM sites WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Moderation transition. Approval refreshes the timestamp, which
    /// doubles as the "last published" marker used for sorting.
    pub async fn set_status(&self, id: i64, status: Status) -> Result<ActionOutcome, DbError> {
        let result = if status == Status::Valid {
            sqlx::query(
                "UPDATE sites SET status = 'valid', submitted_at = DATETIME('now') WHERE id = ?",
            )
            .bind(id)
            .execute(self.pool)
            .await?
        } else {
            sqlx::query("UPDATE sites SET status = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(id)
                .execute(self.pool)
                .await?
        };
        Ok(ActionOutcome::from_rows(result.rows_affected()))
    }

    pub async fn delete(&self, id: i64) -> Result<ActionOutcome, DbError> {
        let result = sqlx::query("DELETE FROM sites WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(ActionOutcome::from_rows(result.rows_affected()))
    }

    /// Full admin edit of every user-visible field plus status.
    pub async fn update_full(
        &self,
        id: i64,
        site: &NewSite,
        status: Status,
    ) -> Result<ActionOutcome, DbError> {
        let result = sqlx::query(
            "UPDATE sites
             SET name = ?, city = ?, url = ?, description = ?, category = ?, status = ?
             WHERE id = ?",
        )
        .bind(&site.name)
        .bind(&site.city)
        .bind(&site.url)
        .bind(&site.description)
        .bind(&site.category)
        .bind(status.as_str())
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(ActionOutcome::from_rows(result.rows_affected()))
    }

    /// Swap display_order with the neighboring published site of the
    /// same category. A missing neighbor means the record is already
    /// at the boundary.
    pub async fn move_order(
        &self,
        id: i64,
        direction: MoveDirection,
    ) -> Result<MoveOutcome, DbError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(i64, i64, String)> =
            sqlx::query_as("SELECT id, display_order, category FROM sites WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((site_id, current_order, category)) = current else {
            return Ok(MoveOutcome::NotFound);
        };

        let neighbor_sql = match direction {
            MoveDirection::Up => {
                "SELECT id, display_order FROM sites
                 WHERE display_order < ? AND category = ? AND status = 'valid'
                 ORDER BY display_order DESC LIMIT 1"
            }
            MoveDirection::Down => {
                "SELECT id, display_order FROM sites
                 WHERE display_order > ? AND category = ? AND status = 'valid'
                 ORDER BY display_order ASC LIMIT 1"
            }
        };
        let neighbor: Option<(i64, i64)> = sqlx::query_as(neighbor_sql)
            .bind(current_order)
            .bind(&category)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((neighbor_id, neighbor_order)) = neighbor else {
            return Ok(MoveOutcome::AtBoundary);
        };

        sqlx::query("UPDATE sites SET display_order = ? WHERE id = ?")
            .bind(neighbor_order)
            .bind(site_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE sites SET display_order = ? WHERE id = ?")
            .bind(current_order)
            .bind(neighbor_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(MoveOutcome::Moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, pool::create_pool};

    async fn setup() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        migrations::run(&pool).await.unwrap();
        pool
    }

    fn site(name: &str, category: &str) -> NewSite {
        NewSite {
            name: name.to_string(),
            city: None,
            url: format!("https://{}.re", name.to_lowercase().replace(' ', "")),
            description: "Une description suffisamment longue.".to_string(),
            category: category.to_string(),
        }
    }

    async fn set_order(pool: &SqlitePool, id: i64, order: i64) {
        sqlx::query("UPDATE sites SET display_order = ? WHERE id = ?")
            .bind(order)
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn submission_is_pending_and_hidden() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);

        let id = repo.submit(&site("Chez Paul", "Restaurants")).await.unwrap();
        let record = repo.by_id(id).await.unwrap().unwrap();
        assert_eq!(record.status, "pending");
        assert!(repo.by_category("Restaurants").await.unwrap().is_empty());
        assert!(repo.categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn approve_publishes_reject_hides() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);
        let id = repo.submit(&site("Chez Paul", "Restaurants")).await.unwrap();

        assert_eq!(
            repo.set_status(id, Status::Valid).await.unwrap(),
            ActionOutcome::Applied
        );
        let published = repo.by_category("Restaurants").await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].name, "Chez Paul");

        assert_eq!(
            repo.set_status(id, Status::Refused).await.unwrap(),
            ActionOutcome::Applied
        );
        assert!(repo.by_category("Restaurants").await.unwrap().is_empty());
        // the row survives rejection
        assert!(repo.by_id(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn moderating_missing_id_reports_not_found() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);
        assert_eq!(
            repo.set_status(999, Status::Valid).await.unwrap(),
            ActionOutcome::NotFound
        );
        assert_eq!(repo.delete(999).await.unwrap(), ActionOutcome::NotFound);
    }

    #[tokio::test]
    async fn search_requires_two_characters() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);
        let id = repo.submit(&site("Chez Paul", "Restaurants")).await.unwrap();
        repo.set_status(id, Status::Valid).await.unwrap();

        assert!(repo.search("p", SEARCH_CAP).await.unwrap().is_empty());
        let hits = repo.search("paul", SEARCH_CAP).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_columns() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);
        let mut s = site("Chez Paul", "Restaurants");
        s.city = Some("Saint-Pierre".to_string());
        let id = repo.submit(&s).await.unwrap();
        repo.set_status(id, Status::Valid).await.unwrap();

        for query in ["PAUL", "restau", "saint-pierre", "chezpaul.re"] {
            let hits = repo.search(query, SEARCH_CAP).await.unwrap();
            assert_eq!(hits.len(), 1, "query {query:?} should match");
        }
        assert!(repo.search("volcan", SEARCH_CAP).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn move_up_at_top_is_boundary() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);
        let a = repo.submit(&site("Alpha", "Restaurants")).await.unwrap();
        let b = repo.submit(&site("Beta", "Restaurants")).await.unwrap();
        repo.set_status(a, Status::Valid).await.unwrap();
        repo.set_status(b, Status::Valid).await.unwrap();
        set_order(&pool, a, 1).await;
        set_order(&pool, b, 2).await;

        assert_eq!(
            repo.move_order(a, MoveDirection::Up).await.unwrap(),
            MoveOutcome::AtBoundary
        );
        // state unchanged
        assert_eq!(repo.by_id(a).await.unwrap().unwrap().display_order, 1);
        assert_eq!(repo.by_id(b).await.unwrap().unwrap().display_order, 2);
    }

    #[tokio::test]
    async fn move_up_then_down_restores_order() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);
        let a = repo.submit(&site("Alpha", "Restaurants")).await.unwrap();
        let b = repo.submit(&site("Beta", "Restaurants")).await.unwrap();
        repo.set_status(a, Status::Valid).await.unwrap();
        repo.set_status(b, Status::Valid).await.unwrap();
        set_order(&pool, a, 1).await;
        set_order(&pool, b, 2).await;

        assert_eq!(
            repo.move_order(b, MoveDirection::Up).await.unwrap(),
            MoveOutcome::Moved
        );
        assert_eq!(repo.by_id(b).await.unwrap().unwrap().display_order, 1);
        assert_eq!(repo.by_id(a).await.unwrap().unwrap().display_order, 2);

        assert_eq!(
            repo.move_order(b, MoveDirection::Down).await.unwrap(),
            MoveOutcome::Moved
        );
        assert_eq!(repo.by_id(a).await.unwrap().unwrap().display_order, 1);
        assert_eq!(repo.by_id(b).await.unwrap().unwrap().display_order, 2);
    }

    #[tokio::test]
    async fn move_ignores_other_categories() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);
        let a = repo.submit(&site("Alpha", "Restaurants")).await.unwrap();
        let b = repo.submit(&site("Beta", "Plages")).await.unwrap();
        repo.set_status(a, Status::Valid).await.unwrap();
        repo.set_status(b, Status::Valid).await.unwrap();
        set_order(&pool, a, 2).await;
        set_order(&pool, b, 1).await;

        // Beta is in another category, so Alpha has no neighbor above.
        assert_eq!(
            repo.move_order(a, MoveDirection::Up).await.unwrap(),
            MoveOutcome::AtBoundary
        );
    }

    #[tokio::test]
    async fn admin_list_filters_and_counts() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);
        let a = repo.submit(&site("Alpha", "Restaurants")).await.unwrap();
        let _b = repo.submit(&site("Beta", "Plages")).await.unwrap();
        repo.set_status(a, Status::Valid).await.unwrap();

        let (pending, counts) = repo
            .admin_list(StatusFilter::Only(Status::Pending), "")
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Beta");
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.valid, 1);
        assert_eq!(counts.refused, 0);
        assert_eq!(counts.total(), 2);

        let (all, _) = repo.admin_list(StatusFilter::All, "").await.unwrap();
        assert_eq!(all.len(), 2);
        // pending rows sort first
        assert_eq!(all[0].name, "Beta");

        let (hits, _) = repo.admin_list(StatusFilter::All, "alp").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Alpha");
    }

    #[tokio::test]
    async fn featured_by_category_caps_per_category() {
        let pool = setup().await;
        let repo = SiteRepo::new(&pool);
        for i in 0..5 {
            let id = repo
                .submit(&site(&format!("Resto{i}"), "Restaurants"))
                .await
                .unwrap();
            repo.set_status(id, Status::Valid).await.unwrap();
        }
        let id = repo.submit(&site("Plage", "Plages")).await.unwrap();
        repo.set_status(id, Status::Valid).await.unwrap();

        let grouped = repo.featured_by_category(3).await.unwrap();
        assert_eq!(grouped.len(), 2);
        let restaurants = grouped
            .iter()
            .find(|(c, _)| c == "Restaurants")
            .map(|(_, sites)| sites)
            .unwrap();
        assert_eq!(restaurants.len(), 3);
    }
}
