//! Storage for doctors, staff and team members.
//!
//! The three tables share one schema, so a single store is parameterized
//! by `ProfileKind`.

use sqlx::sqlite::SqlitePool;

/// Which profile table a store operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Doctors,
    Staff,
    Team,
}

impl ProfileKind {
    pub fn table(self) -> &'static str {
        match self {
            ProfileKind::Doctors => "doctors",
            ProfileKind::Staff => "staff",
            ProfileKind::Team => "team",
        }
    }

    /// Singular label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            ProfileKind::Doctors => "Doctor",
            ProfileKind::Staff => "Staff member",
            ProfileKind::Team => "Team member",
        }
    }
}

#[derive(Clone)]
pub struct ProfileStore {
    pool: SqlitePool,
    kind: ProfileKind,
}

/// A person shown on the site.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub position: i64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    name: String,
    title: Option<String>,
    bio: Option<String>,
    image_url: Option<String>,
    position: i64,
    active: bool,
    created_at: String,
    updated_at: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            title: row.title,
            bio: row.bio,
            image_url: row.image_url,
            position: row.position,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fields written on create and update.
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    /// `None` appends after the current last entry on create, and keeps the
    /// existing position on update.
    pub position: Option<i64>,
    pub active: bool,
}

const PROFILE_COLUMNS: &str =
    "id, name, title, bio, image_url, position, active, created_at, updated_at";

impl ProfileStore {
    pub fn new(pool: SqlitePool, kind: ProfileKind) -> Self {
        Self { pool, kind }
    }

    /// Create a profile. Returns its ID.
    pub async fn create(&self, input: &ProfileInput) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(&format!(
            "INSERT INTO {table} (name, title, bio, image_url, position, active)
             VALUES (?, ?, ?, ?, COALESCE(?, (SELECT COALESCE(MAX(position), -1) + 1 FROM {table})), ?)",
            table = self.kind.table()
        ))
        .bind(&input.name)
        .bind(&input.title)
        .bind(&input.bio)
        .bind(&input.image_url)
        .bind(input.position)
        .bind(input.active)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a profile by ID, active or not.
    pub async fn get(&self, id: i64) -> Result<Option<Profile>, sqlx::Error> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM {} WHERE id = ?",
            PROFILE_COLUMNS,
            self.kind.table()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    /// List profiles in display order. Inactive entries only when asked for.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Profile>, sqlx::Error> {
        let rows: Vec<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM {} WHERE active = 1 OR ? ORDER BY position ASC, id ASC",
            PROFILE_COLUMNS,
            self.kind.table()
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    /// Update a profile. Returns true if it existed.
    pub async fn update(&self, id: i64, input: &ProfileInput) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET name = ?, title = ?, bio = ?, image_url = ?,
                position = COALESCE(?, position), active = ?, updated_at = datetime('now')
             WHERE id = ?",
            self.kind.table()
        ))
        .bind(&input.name)
        .bind(&input.title)
        .bind(&input.bio)
        .bind(&input.image_url)
        .bind(input.position)
        .bind(input.active)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a profile. Returns true if it existed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", self.kind.table()))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn input(name: &str) -> ProfileInput {
        ProfileInput {
            name: name.to_string(),
            title: Some("DMD".to_string()),
            bio: None,
            image_url: None,
            position: None,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_positions_append() {
        let db = Database::open(":memory:").await.unwrap();
        let doctors = db.profiles(ProfileKind::Doctors);

        let first = doctors.create(&input("Dr. Patel")).await.unwrap();
        let second = doctors.create(&input("Dr. Moreno")).await.unwrap();

        assert_eq!(doctors.get(first).await.unwrap().unwrap().position, 0);
        assert_eq!(doctors.get(second).await.unwrap().unwrap().position, 1);
    }

    #[tokio::test]
    async fn test_list_ordering_and_inactive() {
        let db = Database::open(":memory:").await.unwrap();
        let staff = db.profiles(ProfileKind::Staff);

        staff
            .create(&ProfileInput {
                position: Some(5),
                ..input("Last")
            })
            .await
            .unwrap();
        staff
            .create(&ProfileInput {
                position: Some(1),
                ..input("First")
            })
            .await
            .unwrap();
        staff
            .create(&ProfileInput {
                active: false,
                ..input("Former")
            })
            .await
            .unwrap();

        let active = staff.list(false).await.unwrap();
        let names: Vec<_> = active.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["First", "Last"]);

        assert_eq!(staff.list(true).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_tables_are_separate() {
        let db = Database::open(":memory:").await.unwrap();

        db.profiles(ProfileKind::Team)
            .create(&input("Front desk"))
            .await
            .unwrap();

        assert!(db.profiles(ProfileKind::Doctors).list(true).await.unwrap().is_empty());
        assert_eq!(db.profiles(ProfileKind::Team).list(true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let db = Database::open(":memory:").await.unwrap();
        let team = db.profiles(ProfileKind::Team);

        team.create(&input("A")).await.unwrap();
        let id = team.create(&input("B")).await.unwrap();

        let updated = ProfileInput {
            bio: Some("Hygienist since 2009".to_string()),
            ..input("B")
        };
        assert!(team.update(id, &updated).await.unwrap());

        let profile = team.get(id).await.unwrap().unwrap();
        assert_eq!(profile.position, 1);
        assert_eq!(profile.bio.as_deref(), Some("Hygienist since 2009"));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::open(":memory:").await.unwrap();
        let doctors = db.profiles(ProfileKind::Doctors);

        let id = doctors.create(&input("Dr. Lee")).await.unwrap();
        assert!(doctors.delete(id).await.unwrap());
        assert!(!doctors.delete(id).await.unwrap());
        assert!(doctors.get(id).await.unwrap().is_none());
    }
}
