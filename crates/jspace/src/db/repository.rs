//! Database repository for the highscore board.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, Highscore, HighscoreBoard, NewHighscore, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for highscore operations.
#[derive(Debug, Clone)]
pub struct HighscoreRepository {
    db_path: String,
}

impl HighscoreRepository {
    /// Opens the database at the given path, creating the file and applying
    /// pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating HighscoreRepository");
        let repository = Self { db_path };

        let mut conn = repository.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        info!(applied = applied.len(), "Migrations applied");

        Ok(repository)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Records a player's progress.
    ///
    /// The board keeps each player's best run: an entry replaces the stored
    /// one only when it reaches at least the same task. A new game that is
    /// still behind a finished one leaves the finished entry in place.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, entry), fields(name = %entry.name()))]
    pub fn upsert(&self, entry: NewHighscore) -> Result<Highscore, DbError> {
        use schema::highscores::dsl;

        debug!("Recording highscore");
        let mut conn = self.connection()?;

        let stored = conn.transaction::<Highscore, DbError, _>(|conn| {
            let existing: Option<Highscore> = dsl::highscores
                .filter(dsl::name.eq(entry.name().as_str()))
                .select(Highscore::as_select())
                .first(conn)
                .optional()?;

            match existing {
                None => {
                    diesel::insert_into(dsl::highscores)
                        .values(&entry)
                        .execute(conn)?;
                }
                Some(current) if *entry.task_index() >= *current.task_index() => {
                    diesel::update(dsl::highscores.find(*current.id()))
                        .set((
                            dsl::task_index.eq(*entry.task_index()),
                            dsl::completed_tries.eq(*entry.completed_tries()),
                            dsl::updated_at.eq(diesel::dsl::now),
                        ))
                        .execute(conn)?;
                }
                Some(current) => {
                    debug!(
                        stored_task = current.task_index(),
                        new_task = entry.task_index(),
                        "Keeping better entry"
                    );
                    return Ok(current);
                }
            }

            let stored: Highscore = dsl::highscores
                .filter(dsl::name.eq(entry.name().as_str()))
                .select(Highscore::as_select())
                .first(conn)?;
            Ok(stored)
        })?;

        info!(
            id = stored.id(),
            task_index = stored.task_index(),
            completed_tries = stored.completed_tries(),
            "Highscore recorded"
        );
        Ok(stored)
    }

    /// Gets a player's entry by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_by_name(&self, name: &str) -> Result<Option<Highscore>, DbError> {
        use schema::highscores::dsl;

        let mut conn = self.connection()?;
        let entry: Option<Highscore> = dsl::highscores
            .filter(dsl::name.eq(name))
            .select(Highscore::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = entry.is_some(), "Looked up highscore");
        Ok(entry)
    }

    /// Lists all entries ranked by progress: furthest task first, then
    /// fewest tries, then name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Highscore>, DbError> {
        use schema::highscores::dsl;

        let mut conn = self.connection()?;
        let entries: Vec<Highscore> = dsl::highscores
            .order((
                dsl::task_index.desc(),
                dsl::completed_tries.asc(),
                dsl::name.asc(),
            ))
            .select(Highscore::as_select())
            .load(&mut conn)?;

        info!(count = entries.len(), "Highscores loaded");
        Ok(entries)
    }

    /// Builds the aggregate board.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn board(&self) -> Result<HighscoreBoard, DbError> {
        Ok(HighscoreBoard::new(self.list()?))
    }
}
