//! Talent directory repository.

use sqlx::{FromRow, SqlitePool};

use crate::models::{NewTalent, Status, StatusFilter, TalentUpdate, MIN_QUERY_LEN, TALENT_CATEGORIES};

use super::{ActionOutcome, DbError, MoveDirection, MoveOutcome, StatusCounts};

const ADMIN_LIST_CAP: i64 = 200;

const SEARCH_CLAUSE: &str = "(
    handle LIKE ? COLLATE NOCASE
    OR category LIKE ? COLLATE NOCASE
    OR description LIKE ? COLLATE NOCASE
    OR instagram LIKE ? COLLATE NOCASE
)";

/// Admin listing sort column, whitelisted so raw query strings never
/// reach the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TalentSort {
    Handle,
    Category,
    Status,
    CreatedAt,
    UpdatedAt,
    DisplayOrder,
}

impl TalentSort {
    /// Unknown values fall back to the default, never to an error.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "handle" => Self::Handle,
            "category" => Self::Category,
            "status" => Self::Status,
            "created_at" => Self::CreatedAt,
            "display_order" => Self::DisplayOrder,
            _ => Self::UpdatedAt,
        }
    }

    pub fn as_column(self) -> &'static str {
        match self {
            Self::Handle => "handle",
            Self::Category => "category",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DisplayOrder => "display_order",
        }
    }
}

impl Default for TalentSort {
    fn default() -> Self {
        Self::UpdatedAt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TalentRecord {
    pub id: i64,
    pub handle: String,
    pub instagram: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub status: String,
    pub display_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

pub struct TalentRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TalentRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Published talents grouped by category for the public page. Known
    /// categories come first in their fixed order, anything else after.
    pub async fn grouped_valid(&self) -> Result<Vec<(String, Vec<TalentRecord>)>, DbError> {
        let rows: Vec<TalentRecord> = sqlx::query_as(
            "SELECT * FROM talents
             WHERE status = 'valid'
             ORDER BY display_order ASC, updated_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        let mut grouped: Vec<(String, Vec<TalentRecord>)> = TALENT_CATEGORIES
            .iter()
            .map(|c| (c.to_string(), Vec::new()))
            .collect();
        for talent in rows {
            match grouped.iter_mut().find(|(c, _)| *c == talent.category) {
                Some((_, talents)) => talents.push(talent),
                None => grouped.push((talent.category.clone(), vec![talent])),
            }
        }
        grouped.retain(|(_, talents)| !talents.is_empty());
        Ok(grouped)
    }

    /// Insert a public submission as pending. Returns the new id.
    pub async fn submit(&self, talent: &NewTalent) -> Result<i64, DbError> {
        let result = sqlx::query(
            "INSERT INTO talents (handle, instagram, description, category, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, 'pending', DATETIME('now'), DATETIME('now'))",
        )
        .bind(&talent.handle)
        .bind(&talent.instagram)
        .bind(&talent.description)
        .bind(&talent.category)
        .execute(self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Insert a fully specified record from the admin form.
    pub async fn create_admin(&self, talent: &TalentUpdate) -> Result<i64, DbError> {
        let result = sqlx::query(
            "INSERT INTO talents (handle, instagram, description, category, image, status, display_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, DATETIME('now'), DATETIME('now'))",
        )
        .bind(&talent.handle)
        .bind(&talent.instagram)
        .bind(&talent.description)
        .bind(&talent.category)
        .bind(&talent.image)
        .bind(talent.status.as_str())
        .bind(talent.display_order)
        .execute(self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Admin listing with status filter, optional search, optional
    /// category scope and a whitelisted sort. Pending rows always sort
    /// first. Also returns per-status counts and per-category totals
    /// for the filter bar.
    #[allow(clippy::type_complexity)]
    pub async fn admin_list(
        &self,
        filter: StatusFilter,
        query: &str,
        sort: TalentSort,
        order: SortOrder,
        category: Option<&str>,
    ) -> Result<(Vec<TalentRecord>, StatusCounts, Vec<(String, i64)>), DbError> {
        let mut sql = String::from("SELECT * FROM talents WHERE 1 = 1");
        let mut binds: Vec<String> = Vec::new();

        if let StatusFilter::Only(status) = filter {
            sql.push_str(" AND status = ?");
            binds.push(status.as_str().to_string());
        }
        if let Some(category) = category {
            sql.push_str(" AND category = ?");
            binds.push(category.to_string());
        }
        if query.chars().count() >= MIN_QUERY_LEN {
            sql.push_str(" AND ");
            sql.push_str(SEARCH_CLAUSE);
            let like = format!("%{query}%");
            binds.extend(std::iter::repeat(like).take(4));
        }
        sql.push_str(&format!(
            " ORDER BY CASE WHEN status = 'pending' THEN 0 ELSE 1 END,
                       {} {}, id DESC
              LIMIT ?",
            sort.as_column(),
            order.as_sql(),
        ));

        let mut q = sqlx::query_as(&sql);
        for bind in &binds {
            q = q.bind(bind.as_str());
        }
        let entries = q.bind(ADMIN_LIST_CAP).fetch_all(self.pool).await?;

        let counts: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM talents GROUP BY status")
                .fetch_all(self.pool)
                .await?;
        let category_stats: Vec<(String, i64)> = sqlx::query_as(
            "SELECT category, COUNT(*) FROM talents
             WHERE category <> '' GROUP BY category ORDER BY category ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok((entries, StatusCounts::from_rows(&counts), category_stats))
    }

    pub async fn by_id(&self, id: i64) -> Result<Option<TalentRecord>, DbError> {
        let row = sqlx::query_as("SELECT * FROM talents WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Moderation transition. Every transition touches updated_at.
    pub async fn set_status(&self, id: i64, status: Status) -> Result<ActionOutcome, DbError> {
        let result = sqlx::query(
            "UPDATE talents SET status = ?, updated_at = DATETIME('now') WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(ActionOutcome::from_rows(result.rows_affected()))
    }

    pub async fn delete(&self, id: i64) -> Result<ActionOutcome, DbError> {
        let result = sqlx::query("DELETE FROM talents WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(ActionOutcome::from_rows(result.rows_affected()))
    }

    pub async fn update_full(&self, id: i64, talent: &TalentUpdate) -> Result<ActionOutcome, DbError> {
        let result = sqlx::query(
            "UPDATE talents
             SET handle = ?, instagram = ?, description = ?, category = ?,
                 image = ?, status = ?, display_order = ?, updated_at = DATETIME('now')
             WHERE id = ?",
        )
        .bind(&talent.handle)
        .bind(&talent.instagram)
        .bind(&talent.description)
        .bind(&talent.category)
        .bind(&talent.image)
        .bind(talent.status.as_str())
        .bind(talent.display_order)
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(ActionOutcome::from_rows(result.rows_affected()))
    }

    /// Swap display_order with the neighboring published talent.
    /// Neighbors are scoped to the explicit category filter when given,
    /// otherwise to the talent's own category when it has one.
    pub async fn move_order(
        &self,
        id: i64,
        direction: MoveDirection,
        category: Option<&str>,
    ) -> Result<MoveOutcome, DbError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(i64, i64, String)> =
            sqlx::query_as("SELECT id, display_order, category FROM talents WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((talent_id, current_order, own_category)) = current else {
            return Ok(MoveOutcome::NotFound);
        };

        let scope_category = match category {
            Some(c) => Some(c),
            None if !own_category.is_empty() => Some(own_category.as_str()),
            None => None,
        };

        let (operand, ordering) = match direction {
            MoveDirection::Up => ("display_order < ?", "display_order DESC"),
            MoveDirection::Down => ("display_order > ?", "display_order ASC"),
        };
        let scope = if scope_category.is_some() { " AND category = ?" } else { "" };
        let neighbor_sql = format!(
            "SELECT id, display_order FROM talents
             WHERE {operand} AND status = 'valid'{scope}
             ORDER BY {ordering} LIMIT 1"
        );
        let mut neighbor_query = sqlx::query_as(&neighbor_sql).bind(current_order);
        if let Some(category) = scope_category {
            neighbor_query = neighbor_query.bind(category);
        }
        let neighbor: Option<(i64, i64)> = neighbor_query.fetch_optional(&mut *tx).await?;
        let Some((neighbor_id, neighbor_order)) = neighbor else {
            return Ok(MoveOutcome::AtBoundary);
        };

        sqlx::query(
            "UPDATE talents SET display_order = ?, updated_at = DATETIME('now') WHERE id = ?",
        )
        .bind(neighbor_order)
        .bind(talent_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE talents SET display_order = ?, updated_at = DATETIME('now') WHERE id = ?",
        )
        .bind(current_order)
        .bind(neighbor_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(MoveOutcome::Moved)
    }

    /// Populate an empty table with the launch roster. Does nothing if
    /// any talent already exists.
    pub async fn seed_defaults(&self) -> Result<u64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM talents")
            .fetch_one(self.pool)
            .await?;
        if count > 0 {
            return Ok(0);
        }

        let mut inserted = 0u64;
        for (order, talent) in DEFAULT_TALENTS.iter().enumerate() {
            sqlx::query(
                "INSERT INTO talents (handle, instagram, description, category, image, status, display_order, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, 'valid', ?, DATETIME('now'), DATETIME('now'))",
            )
            .bind(talent.handle)
            .bind(talent.instagram)
            .bind(talent.description)
            .bind(talent.category)
            .bind(talent.image)
            .bind(order as i64 + 1)
            .execute(self.pool)
            .await?;
            inserted += 1;
        }
        tracing::info!(count = inserted, "seeded default talents");
        Ok(inserted)
    }
}

struct SeedTalent {
    handle: &'static str,
    instagram: &'static str,
    description: &'static str,
    category: &'static str,
    image: &'static str,
}

/// Launch roster, published as-is on first start.
const DEFAULT_TALENTS: &[SeedTalent] = &[
    SeedTalent {
        handle: "harendra_h24",
        instagram: "https://www.instagram.com/harendra_h24/",
        description: "Humoriste et créateur de contenu réunionnais, sketchs en créole.",
        category: "Comédiens",
        image: "img/talents/harendra_h24.jpg",
    },
    SeedTalent {
        handle: "benj_off",
        instagram: "https://www.instagram.com/benj_off/",
        description: "Chanteur réunionnais, reprises et compositions séga et maloya.",
        category: "Chanteurs",
        image: "img/talents/benj_off.jpg",
    },
    SeedTalent {
        handle: "titilecomik",
        instagram: "https://www.instagram.com/titilecomik/",
        description: "Comique péi, vidéos humoristiques sur le quotidien réunionnais.",
        category: "Comédiens",
        image: "img/talents/titilecomik.jpg",
    },
    SeedTalent {
        handle: "monsieur__moustache",
        instagram: "https://www.instagram.com/monsieur__moustache/",
        description: "Créateur de contenu humoristique, parodies et détournements.",
        category: "Comédiens",
        image: "img/talents/monsieur_moustache.jpg",
    },
    SeedTalent {
        handle: "lecouple_en_lu",
        instagram: "https://www.instagram.com/lecouple_en_lu/",
        description: "Couple d'influenceurs réunionnais, lifestyle et humour en duo.",
        category: "Influenceurs",
        image: "img/talents/lecouple_en_lu.jpg",
    },
    SeedTalent {
        handle: "adriana.ftn_",
        instagram: "https://www.instagram.com/adriana.ftn_/",
        description: "Influenceuse mode et lifestyle de La Réunion.",
        category: "Influenceurs",
        image: "img/talents/adriana_ftn.jpg",
    },
    SeedTalent {
        handle: "segaelofficiel",
        instagram: "https://www.instagram.com/segaelofficiel/",
        description: "Chanteur de séga, artiste péi aux sonorités traditionnelles.",
        category: "Chanteurs",
        image: "img/talents/segaelofficiel.jpg",
    },
    SeedTalent {
        handle: "pll_off",
        instagram: "https://www.instagram.com/pll_off/",
        description: "Groupe de musique réunionnais, séga et variétés créoles.",
        category: "Chanteurs",
        image: "img/talents/pll_off.jpg",
    },
    SeedTalent {
        handle: "kafmalbarofficiel",
        instagram: "https://www.instagram.com/kafmalbarofficiel/",
        description: "Artiste dancehall péi, figure de la scène musicale réunionnaise.",
        category: "Chanteurs",
        image: "img/talents/kafmalbar.jpg",
    },
    SeedTalent {
        handle: "jennie.leonie",
        instagram: "https://www.instagram.com/jennie.leonie/",
        description: "Créatrice de contenu, beauté et lifestyle tropical.",
        category: "Influenceurs",
        image: "img/talents/jennie_leonie.jpg",
    },
    SeedTalent {
        handle: "fanm.kreol",
        instagram: "https://www.instagram.com/fanm.kreol/",
        description: "Mise en avant de la culture créole et des femmes réunionnaises.",
        category: "Influenceurs",
        image: "img/talents/fanm_kreol.jpg",
    },
    SeedTalent {
        handle: "dronecopters_974",
        instagram: "https://www.instagram.com/dronecopters_974/",
        description: "Images aériennes de La Réunion, paysages filmés au drone.",
        category: "Influenceurs",
        image: "img/talents/dronecopters_974.jpg",
    },
    SeedTalent {
        handle: "priyapadavatanoff",
        instagram: "https://www.instagram.com/priyapadavatanoff/",
        description: "Chanteuse réunionnaise, reprises et titres originaux.",
        category: "Chanteurs",
        image: "img/talents/priyapadavatanoff.jpg",
    },
    SeedTalent {
        handle: "manupayet",
        instagram: "https://www.instagram.com/manupayet/",
        description: "Humoriste et acteur originaire de La Réunion.",
        category: "Célébrités",
        image: "img/talents/manupayet.jpg",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, pool::create_pool};

    async fn setup() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        migrations::run(&pool).await.unwrap();
        pool
    }

    fn talent(handle: &str, category: &str) -> NewTalent {
        NewTalent {
            handle: handle.to_string(),
            instagram: format!("https://www.instagram.com/{handle}/"),
            description: "Une description suffisamment longue.".to_string(),
            category: category.to_string(),
        }
    }

    async fn set_order(pool: &SqlitePool, id: i64, order: i64) {
        sqlx::query("UPDATE talents SET display_order = ? WHERE id = ?")
            .bind(order)
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
    }

    #[test]
    fn sort_whitelist_falls_back_to_updated_at() {
        assert_eq!(TalentSort::parse("handle"), TalentSort::Handle);
        assert_eq!(TalentSort::parse("id; DROP TABLE talents"), TalentSort::UpdatedAt);
        assert_eq!(TalentSort::parse(""), TalentSort::UpdatedAt);
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Desc);
    }

    #[tokio::test]
    async fn seeding_runs_once() {
        let pool = setup().await;
        let repo = TalentRepo::new(&pool);

        let first = repo.seed_defaults().await.unwrap();
        assert_eq!(first as usize, DEFAULT_TALENTS.len());
        let second = repo.seed_defaults().await.unwrap();
        assert_eq!(second, 0);

        let grouped = repo.grouped_valid().await.unwrap();
        assert!(!grouped.is_empty());
        // fixed category ordering on the public page
        assert_eq!(grouped[0].0, "Comédiens");
    }

    #[tokio::test]
    async fn grouping_keeps_known_categories_first() {
        let pool = setup().await;
        let repo = TalentRepo::new(&pool);
        for (handle, category) in [
            ("zako", "Autre"),
            ("alpha", "Chanteurs"),
            ("beta", "Comédiens"),
        ] {
            let id = repo.submit(&talent(handle, category)).await.unwrap();
            repo.set_status(id, Status::Valid).await.unwrap();
        }

        let grouped = repo.grouped_valid().await.unwrap();
        let categories: Vec<&str> = grouped.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(categories, ["Comédiens", "Chanteurs", "Autre"]);
    }

    #[tokio::test]
    async fn pending_talents_stay_hidden() {
        let pool = setup().await;
        let repo = TalentRepo::new(&pool);
        repo.submit(&talent("alpha", "Chanteurs")).await.unwrap();
        assert!(repo.grouped_valid().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn move_scoped_to_category() {
        let pool = setup().await;
        let repo = TalentRepo::new(&pool);
        let a = repo.submit(&talent("alpha", "Chanteurs")).await.unwrap();
        let b = repo.submit(&talent("beta", "Comédiens")).await.unwrap();
        let c = repo.submit(&talent("gamma", "Chanteurs")).await.unwrap();
        for id in [a, b, c] {
            repo.set_status(id, Status::Valid).await.unwrap();
        }
        set_order(&pool, a, 1).await;
        set_order(&pool, b, 2).await;
        set_order(&pool, c, 3).await;

        // scoped move skips beta, the unrelated category in between
        assert_eq!(
            repo.move_order(c, MoveDirection::Up, Some("Chanteurs"))
                .await
                .unwrap(),
            MoveOutcome::Moved
        );
        assert_eq!(repo.by_id(c).await.unwrap().unwrap().display_order, 1);
        assert_eq!(repo.by_id(a).await.unwrap().unwrap().display_order, 3);
        assert_eq!(repo.by_id(b).await.unwrap().unwrap().display_order, 2);

        // unscoped boundary
        assert_eq!(
            repo.move_order(c, MoveDirection::Up, None).await.unwrap(),
            MoveOutcome::AtBoundary
        );
        assert_eq!(
            repo.move_order(999, MoveDirection::Up, None).await.unwrap(),
            MoveOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn unscoped_move_stays_in_own_category() {
        let pool = setup().await;
        let repo = TalentRepo::new(&pool);
        let a = repo.submit(&talent("alpha", "Chanteurs")).await.unwrap();
        let b = repo.submit(&talent("beta", "Comédiens")).await.unwrap();
        let c = repo.submit(&talent("gamma", "Chanteurs")).await.unwrap();
        for id in [a, b, c] {
            repo.set_status(id, Status::Valid).await.unwrap();
        }
        set_order(&pool, a, 3).await;
        set_order(&pool, b, 2).await;
        set_order(&pool, c, 1).await;

        // even without an explicit filter, alpha swaps with the other
        // Chanteur and the Comédien in between keeps its slot
        assert_eq!(
            repo.move_order(a, MoveDirection::Up, None).await.unwrap(),
            MoveOutcome::Moved
        );
        assert_eq!(repo.by_id(a).await.unwrap().unwrap().display_order, 1);
        assert_eq!(repo.by_id(b).await.unwrap().unwrap().display_order, 2);
        assert_eq!(repo.by_id(c).await.unwrap().unwrap().display_order, 3);
    }

    #[tokio::test]
    async fn admin_list_sorts_and_counts() {
        let pool = setup().await;
        let repo = TalentRepo::new(&pool);
        let a = repo.submit(&talent("alpha", "Chanteurs")).await.unwrap();
        let _b = repo.submit(&talent("beta", "Comédiens")).await.unwrap();
        repo.set_status(a, Status::Valid).await.unwrap();

        let (entries, counts, stats) = repo
            .admin_list(StatusFilter::All, "", TalentSort::Handle, SortOrder::Asc, None)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        // pending first, even under handle sort
        assert_eq!(entries[0].handle, "beta");
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.valid, 1);
        assert_eq!(stats.len(), 2);

        let (scoped, _, _) = repo
            .admin_list(
                StatusFilter::All,
                "",
                TalentSort::default(),
                SortOrder::Desc,
                Some("Chanteurs"),
            )
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].handle, "alpha");

        let (searched, _, _) = repo
            .admin_list(
                StatusFilter::All,
                "alp",
                TalentSort::default(),
                SortOrder::Desc,
                None,
            )
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
    }

    #[tokio::test]
    async fn update_full_replaces_every_field() {
        let pool = setup().await;
        let repo = TalentRepo::new(&pool);
        let id = repo.submit(&talent("alpha", "Chanteurs")).await.unwrap();

        let update = TalentUpdate {
            handle: "alpha_off".to_string(),
            instagram: "https://www.instagram.com/alpha_off/".to_string(),
            description: "Description mise à jour par un administrateur.".to_string(),
            category: "Comédiens".to_string(),
            image: "img/talents/alpha.jpg".to_string(),
            status: Status::Valid,
            display_order: 7,
        };
        assert_eq!(repo.update_full(id, &update).await.unwrap(), ActionOutcome::Applied);

        let record = repo.by_id(id).await.unwrap().unwrap();
        assert_eq!(record.handle, "alpha_off");
        assert_eq!(record.category, "Comédiens");
        assert_eq!(record.image, "img/talents/alpha.jpg");
        assert_eq!(record.status, "valid");
        assert_eq!(record.display_order, 7);
    }
}
