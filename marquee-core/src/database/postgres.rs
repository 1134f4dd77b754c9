use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use marquee_model::{
    CastCredit, CatalogMovie, ExternalIdMapping, Genre, GenreId,
    ListMembership, ListType, MovieGenreLink, Person, PersonId,
    ProviderMovieId, SourceId, Video,
};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Decode, PgPool, Postgres, Row, Transaction, Type};
use tracing::info;

use crate::database::ports::{CatalogStore, CatalogTransaction, MovieRelations};
use crate::error::{Result, SyncError};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const MOVIE_COLUMNS: &str = "source_id, provider_id, title, overview, \
     poster_path, backdrop_path, release_date, popularity, vote_average, \
     vote_count, original_language, runtime, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl fmt::Debug for PostgresCatalogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresCatalogStore")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl PostgresCatalogStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await
            .map_err(|e| {
                SyncError::Store(format!("database connection failed: {e}"))
            })?;

        info!(max_connections, "catalog database pool initialized");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("catalog schema is up to date");
        Ok(())
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| SyncError::Store(format!("failed to read {name}: {e}")))
}

fn map_movie(row: &PgRow) -> Result<CatalogMovie> {
    Ok(CatalogMovie {
        source_id: SourceId(column(row, "source_id")?),
        provider_id: column::<Option<i64>>(row, "provider_id")?
            .map(ProviderMovieId),
        title: column(row, "title")?,
        overview: column(row, "overview")?,
        poster_path: column(row, "poster_path")?,
        backdrop_path: column(row, "backdrop_path")?,
        release_date: column::<Option<NaiveDate>>(row, "release_date")?,
        popularity: column(row, "popularity")?,
        vote_average: column::<Decimal>(row, "vote_average")?,
        vote_count: column(row, "vote_count")?,
        original_language: column(row, "original_language")?,
        runtime: column(row, "runtime")?,
        created_at: column::<DateTime<Utc>>(row, "created_at")?,
        updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
    })
}

fn map_mapping(row: &PgRow) -> Result<ExternalIdMapping> {
    Ok(ExternalIdMapping {
        source_id: SourceId(column(row, "source_id")?),
        provider_id: column::<Option<i64>>(row, "provider_id")?
            .map(ProviderMovieId),
        secondary_id: column(row, "secondary_id")?,
    })
}

fn map_person(row: &PgRow) -> Result<Person> {
    Ok(Person {
        id: PersonId(column(row, "id")?),
        name: column(row, "name")?,
        biography: column(row, "biography")?,
        birthday: column::<Option<NaiveDate>>(row, "birthday")?,
        place_of_birth: column(row, "place_of_birth")?,
        profile_path: column(row, "profile_path")?,
    })
}

fn map_membership(row: &PgRow) -> Result<ListMembership> {
    let list_type: String = column(row, "list_type")?;
    Ok(ListMembership {
        movie_id: SourceId(column(row, "movie_id")?),
        list_type: list_type
            .parse::<ListType>()
            .map_err(|e| SyncError::Store(e.to_string()))?,
        page: column(row, "page")?,
        position: column(row, "list_position")?,
    })
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    type Tx = PostgresTransaction;

    async fn begin(&self) -> Result<Self::Tx> {
        Ok(PostgresTransaction {
            tx: self.pool.begin().await?,
        })
    }

    async fn movie(&self, id: SourceId) -> Result<Option<CatalogMovie>> {
        let row = sqlx::query(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE source_id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_movie).transpose()
    }

    async fn person(&self, id: PersonId) -> Result<Option<Person>> {
        let row = sqlx::query(
            "SELECT id, name, biography, birthday, place_of_birth, \
             profile_path FROM people WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_person).transpose()
    }

    async fn genre(&self, id: GenreId) -> Result<Option<Genre>> {
        let row = sqlx::query("SELECT id, name FROM genres WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref()
            .map(|row| {
                Ok(Genre {
                    id: GenreId(column(row, "id")?),
                    name: column(row, "name")?,
                })
            })
            .transpose()
    }

    async fn relations(&self, movie: SourceId) -> Result<MovieRelations> {
        let genre_ids = sqlx::query(
            "SELECT genre_id FROM movie_genres WHERE movie_id = $1 \
             ORDER BY genre_id",
        )
        .bind(movie.0)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| column(row, "genre_id").map(GenreId))
        .collect::<Result<Vec<_>>>()?;

        let cast = sqlx::query(
            "SELECT person_id, rank, character_name FROM movie_cast \
             WHERE movie_id = $1 ORDER BY rank, person_id",
        )
        .bind(movie.0)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            Ok(CastCredit {
                movie_id: movie,
                person_id: PersonId(column(row, "person_id")?),
                rank: column(row, "rank")?,
                character: column(row, "character_name")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

        let videos = sqlx::query(
            "SELECT video_key, site, video_type, name FROM movie_videos \
             WHERE movie_id = $1 ORDER BY id",
        )
        .bind(movie.0)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            Ok(Video {
                movie_id: movie,
                key: column(row, "video_key")?,
                site: column(row, "site")?,
                video_type: column(row, "video_type")?,
                name: column(row, "name")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

        let list_memberships = sqlx::query(
            "SELECT movie_id, list_type, page, list_position \
             FROM movie_list_memberships \
             WHERE movie_id = $1 ORDER BY list_type",
        )
        .bind(movie.0)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(map_membership)
        .collect::<Result<Vec<_>>>()?;

        Ok(MovieRelations {
            genre_ids,
            cast,
            videos,
            list_memberships,
        })
    }

    async fn movies_with_provider_id(
        &self,
        start_after: Option<SourceId>,
        limit: usize,
    ) -> Result<Vec<SourceId>> {
        sqlx::query(
            r#"
            SELECT m.source_id FROM movies m
            WHERE (
                m.provider_id IS NOT NULL
                OR EXISTS (
                    SELECT 1 FROM movie_mappings mm
                    WHERE mm.source_id = m.source_id
                      AND mm.provider_id IS NOT NULL
                )
            )
              AND ($1::BIGINT IS NULL OR m.source_id > $1)
            ORDER BY m.source_id
            LIMIT $2
            "#,
        )
        .bind(start_after.map(|id| id.0))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| column(row, "source_id").map(SourceId))
        .collect()
    }

    async fn mappings_with_provider_id(
        &self,
        start_after: Option<SourceId>,
        limit: usize,
    ) -> Result<Vec<ExternalIdMapping>> {
        sqlx::query(
            "SELECT source_id, provider_id, secondary_id FROM movie_mappings \
             WHERE provider_id IS NOT NULL \
               AND ($1::BIGINT IS NULL OR source_id > $1) \
             ORDER BY source_id LIMIT $2",
        )
        .bind(start_after.map(|id| id.0))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(map_mapping)
        .collect()
    }

    async fn unimported_mappings(
        &self,
        limit: usize,
    ) -> Result<Vec<ExternalIdMapping>> {
        sqlx::query(
            "SELECT m.source_id, m.provider_id, m.secondary_id \
             FROM movie_mappings m \
             LEFT JOIN movies mv ON mv.source_id = m.source_id \
             WHERE m.provider_id IS NOT NULL AND mv.source_id IS NULL \
             ORDER BY m.source_id LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(map_mapping)
        .collect()
    }

    async fn people_needing_enrichment(
        &self,
        limit: usize,
    ) -> Result<Vec<PersonId>> {
        sqlx::query(
            "SELECT id FROM people \
             WHERE biography IS NULL OR birthday IS NULL \
                OR place_of_birth IS NULL \
             ORDER BY id LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| column(row, "id").map(PersonId))
        .collect()
    }

    async fn list_members(
        &self,
        list_type: ListType,
    ) -> Result<Vec<ListMembership>> {
        sqlx::query(
            "SELECT movie_id, list_type, page, list_position \
             FROM movie_list_memberships \
             WHERE list_type = $1 ORDER BY page, list_position",
        )
        .bind(list_type.as_str())
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(map_membership)
        .collect()
    }

    async fn count_movies(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

impl fmt::Debug for PostgresTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresTransaction").finish_non_exhaustive()
    }
}

#[async_trait]
impl CatalogTransaction for PostgresTransaction {
    async fn movie(&mut self, id: SourceId) -> Result<Option<CatalogMovie>> {
        let row = sqlx::query(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE source_id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref().map(map_movie).transpose()
    }

    async fn movie_by_provider_id(
        &mut self,
        id: ProviderMovieId,
    ) -> Result<Option<CatalogMovie>> {
        let row = sqlx::query(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE provider_id = $1 \
             ORDER BY source_id LIMIT 1"
        ))
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref().map(map_movie).transpose()
    }

    async fn save_movie(&mut self, movie: &CatalogMovie) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO movies (
                source_id, provider_id, title, overview, poster_path,
                backdrop_path, release_date, popularity, vote_average,
                vote_count, original_language, runtime, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (source_id) DO UPDATE SET
                provider_id = EXCLUDED.provider_id,
                title = EXCLUDED.title,
                overview = EXCLUDED.overview,
                poster_path = EXCLUDED.poster_path,
                backdrop_path = EXCLUDED.backdrop_path,
                release_date = EXCLUDED.release_date,
                popularity = EXCLUDED.popularity,
                vote_average = EXCLUDED.vote_average,
                vote_count = EXCLUDED.vote_count,
                original_language = EXCLUDED.original_language,
                runtime = EXCLUDED.runtime,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(movie.source_id.0)
        .bind(movie.provider_id.map(|id| id.0))
        .bind(&movie.title)
        .bind(&movie.overview)
        .bind(&movie.poster_path)
        .bind(&movie.backdrop_path)
        .bind(movie.release_date)
        .bind(movie.popularity)
        .bind(movie.vote_average)
        .bind(movie.vote_count)
        .bind(&movie.original_language)
        .bind(movie.runtime)
        .bind(movie.created_at)
        .bind(movie.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn mapping(
        &mut self,
        id: SourceId,
    ) -> Result<Option<ExternalIdMapping>> {
        let row = sqlx::query(
            "SELECT source_id, provider_id, secondary_id FROM movie_mappings \
             WHERE source_id = $1",
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref().map(map_mapping).transpose()
    }

    async fn mapping_by_provider_id(
        &mut self,
        id: ProviderMovieId,
    ) -> Result<Option<ExternalIdMapping>> {
        let row = sqlx::query(
            "SELECT source_id, provider_id, secondary_id FROM movie_mappings \
             WHERE provider_id = $1 ORDER BY source_id LIMIT 1",
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref().map(map_mapping).transpose()
    }

    async fn save_mapping(
        &mut self,
        mapping: &ExternalIdMapping,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO movie_mappings (source_id, provider_id, secondary_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (source_id) DO UPDATE SET \
                provider_id = EXCLUDED.provider_id, \
                secondary_id = EXCLUDED.secondary_id",
        )
        .bind(mapping.source_id.0)
        .bind(mapping.provider_id.map(|id| id.0))
        .bind(mapping.secondary_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn person(&mut self, id: PersonId) -> Result<Option<Person>> {
        let row = sqlx::query(
            "SELECT id, name, biography, birthday, place_of_birth, \
             profile_path FROM people WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref().map(map_person).transpose()
    }

    async fn save_person(&mut self, person: &Person) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO people (
                id, name, biography, birthday, place_of_birth, profile_path
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                biography = EXCLUDED.biography,
                birthday = EXCLUDED.birthday,
                place_of_birth = EXCLUDED.place_of_birth,
                profile_path = EXCLUDED.profile_path
            "#,
        )
        .bind(person.id.0)
        .bind(&person.name)
        .bind(&person.biography)
        .bind(person.birthday)
        .bind(&person.place_of_birth)
        .bind(&person.profile_path)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn save_genre(&mut self, genre: &Genre) -> Result<()> {
        sqlx::query(
            "INSERT INTO genres (id, name) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name",
        )
        .bind(genre.id.0)
        .bind(&genre.name)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn delete_genre_links(&mut self, movie: SourceId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(movie.0)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_genre_links(
        &mut self,
        links: &[MovieGenreLink],
    ) -> Result<()> {
        for link in links {
            sqlx::query(
                "INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(link.movie_id.0)
            .bind(link.genre_id.0)
            .execute(&mut *self.tx)
            .await?;
        }
        Ok(())
    }

    async fn delete_cast(&mut self, movie: SourceId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM movie_cast WHERE movie_id = $1")
            .bind(movie.0)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_cast(&mut self, credits: &[CastCredit]) -> Result<()> {
        for credit in credits {
            sqlx::query(
                "INSERT INTO movie_cast \
                 (movie_id, person_id, rank, character_name) \
                 VALUES ($1, $2, $3, $4) ON CONFLICT DO NOTHING",
            )
            .bind(credit.movie_id.0)
            .bind(credit.person_id.0)
            .bind(credit.rank)
            .bind(&credit.character)
            .execute(&mut *self.tx)
            .await?;
        }
        Ok(())
    }

    async fn delete_videos(&mut self, movie: SourceId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM movie_videos WHERE movie_id = $1")
            .bind(movie.0)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_videos(&mut self, videos: &[Video]) -> Result<()> {
        for video in videos {
            sqlx::query(
                "INSERT INTO movie_videos \
                 (movie_id, video_key, site, video_type, name) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(video.movie_id.0)
            .bind(&video.key)
            .bind(&video.site)
            .bind(&video.video_type)
            .bind(&video.name)
            .execute(&mut *self.tx)
            .await?;
        }
        Ok(())
    }

    async fn save_list_membership(
        &mut self,
        membership: &ListMembership,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO movie_list_memberships \
             (movie_id, list_type, page, list_position) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (movie_id, list_type) DO UPDATE SET \
                page = EXCLUDED.page, list_position = EXCLUDED.list_position",
        )
        .bind(membership.movie_id.0)
        .bind(membership.list_type.as_str())
        .bind(membership.page)
        .bind(membership.position)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
