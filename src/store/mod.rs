use crate::config::AppConfig;
use crate::error::Error;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_types::BigInt;
use diesel::sqlite::SqliteConnection;
use std::time::Duration;
use tracing::{debug, info};

pub mod models;
pub mod schema;

pub use models::{DocumentStatus, MarkOutcome, NewPdfRecord, PdfRecord};
use schema::pdf_data;

const CREATE_PDF_DATA_TABLE: &str = "CREATE TABLE IF NOT EXISTS pdf_data (
    hash TEXT PRIMARY KEY NOT NULL,
    file_name TEXT NOT NULL,
    status TEXT NOT NULL
)";

const SQLITE_MEMORY: &str = ":memory:";

/// Operations the classification core needs from storage.
pub trait DocumentStore {
    fn find_by_hash(&self, hash: &str) -> Result<Option<PdfRecord>, Error>;

    fn list_all(&self) -> Result<Vec<PdfRecord>, Error>;

    /// Plain insert; a duplicate hash fails with `ConstraintViolation`.
    fn insert(&self, record: &NewPdfRecord<'_>) -> Result<(), Error>;

    /// Insert unless a row with the same hash exists. Returns whether a row was written.
    fn insert_if_absent(&self, record: &NewPdfRecord<'_>) -> Result<bool, Error>;

    /// Atomically insert as `Read`, promote `Exists` to `Read`, or leave a
    /// `Read` row alone.
    fn mark_read(&self, hash: &str, file_name: &str) -> Result<MarkOutcome, Error>;
}

/// Where a database URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Sqlite(String),
    Postgres(String),
}

impl DatabaseTarget {
    pub fn parse(url: &str) -> Self {
        if let Some(rest) = url.strip_prefix("postgres://") {
            DatabaseTarget::Postgres(format!("postgresql://{}", rest))
        } else if url.starts_with("postgresql://") {
            DatabaseTarget::Postgres(url.to_string())
        } else if let Some(path) = url.strip_prefix("sqlite://") {
            DatabaseTarget::Sqlite(path.to_string())
        } else {
            DatabaseTarget::Sqlite(url.to_string())
        }
    }
}

enum Backend {
    Sqlite(Pool<ConnectionManager<SqliteConnection>>),
    #[cfg(feature = "postgres")]
    Postgres(Pool<ConnectionManager<diesel::pg::PgConnection>>),
}

/// Run the same diesel DSL on whichever backend the store holds. The pooled
/// connection is returned when `$body` finishes.
macro_rules! with_conn {
    ($store:expr, $conn:ident => $body:expr) => {{
        match &$store.backend {
            Backend::Sqlite(pool) => {
                let mut pooled = pool.get()?;
                let $conn = &mut *pooled;
                $body
            }
            #[cfg(feature = "postgres")]
            Backend::Postgres(pool) => {
                let mut pooled = pool.get()?;
                let $conn = &mut *pooled;
                $body
            }
        }
    }};
}

/// Like `with_conn!`, for statements whose SQL differs per backend.
macro_rules! with_conn_split {
    ($store:expr, sqlite: $sqlite_conn:ident => $sqlite_body:expr, postgres: $pg_conn:ident => $pg_body:expr) => {{
        match &$store.backend {
            Backend::Sqlite(pool) => {
                let mut pooled = pool.get()?;
                let $sqlite_conn = &mut *pooled;
                $sqlite_body
            }
            #[cfg(feature = "postgres")]
            Backend::Postgres(pool) => {
                let mut pooled = pool.get()?;
                let $pg_conn = &mut *pooled;
                $pg_body
            }
        }
    }};
}

/// Select-then-write for `mark_read`, run inside the caller's transaction.
macro_rules! mark_read_in {
    ($conn:ident, $hash:expr, $file_name:expr) => {{
        let existing = pdf_data::table
            .filter(pdf_data::hash.eq($hash))
            .select(PdfRecord::as_select())
            .first($conn)
            .optional()?;

        match existing {
            Some(record) if record.document_status() == DocumentStatus::Read => {
                Ok(MarkOutcome::AlreadyRead {
                    file_name: record.file_name,
                })
            }
            Some(_) => {
                diesel::update(pdf_data::table.filter(pdf_data::hash.eq($hash)))
                    .set(pdf_data::status.eq(DocumentStatus::Read.as_str()))
                    .execute($conn)?;
                Ok(MarkOutcome::Updated)
            }
            None => {
                diesel::insert_into(pdf_data::table)
                    .values(&NewPdfRecord {
                        hash: $hash,
                        file_name: $file_name,
                        status: DocumentStatus::Read.as_str(),
                    })
                    .execute($conn)?;
                Ok(MarkOutcome::Inserted)
            }
        }
    }};
}

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(QueryableByName)]
struct TableCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Handle over the `pdf_data` table.
pub struct Store {
    backend: Backend,
}

impl Store {
    pub fn connect(config: &AppConfig) -> Result<Self, Error> {
        let timeout = Duration::from_secs(config.connect_timeout_secs.max(1));
        let backend = match DatabaseTarget::parse(&config.database_url) {
            DatabaseTarget::Sqlite(path) => {
                let builder = Pool::<ConnectionManager<SqliteConnection>>::builder()
                    .connection_timeout(timeout)
                    .connection_customizer(Box::new(SqlitePragmas));
                // Every in-memory connection is its own database, so keep exactly one alive
                let builder = if path == SQLITE_MEMORY {
                    builder.max_size(1).idle_timeout(None).max_lifetime(None)
                } else {
                    builder.max_size(config.pool_size.max(1))
                };
                let pool = builder.build(ConnectionManager::<SqliteConnection>::new(&path))?;
                debug!("SQLite pool ready for {}", path);
                Backend::Sqlite(pool)
            }
            #[cfg(feature = "postgres")]
            DatabaseTarget::Postgres(url) => {
                let pool = Pool::<ConnectionManager<diesel::pg::PgConnection>>::builder()
                    .connection_timeout(timeout)
                    .max_size(config.pool_size.max(1))
                    .build(ConnectionManager::<diesel::pg::PgConnection>::new(url))?;
                debug!("PostgreSQL pool ready for {}", config.masked_database_url());
                Backend::Postgres(pool)
            }
            #[cfg(not(feature = "postgres"))]
            DatabaseTarget::Postgres(_) => {
                return Err(Error::UnsupportedDatabase(format!(
                    "{} (built without the `postgres` feature)",
                    config.masked_database_url()
                )));
            }
        };
        Ok(Store { backend })
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Sqlite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            Backend::Postgres(_) => "postgres",
        }
    }

    /// Create `pdf_data` if it does not exist. An existing table is left as is.
    pub fn create_schema(&self) -> Result<(), Error> {
        with_conn!(self, conn => {
            conn.batch_execute(CREATE_PDF_DATA_TABLE)?;
        });
        info!("pdf_data table ready ({})", self.backend_name());
        Ok(())
    }

    pub fn table_exists(&self) -> Result<bool, Error> {
        let found: TableCount = with_conn_split!(self,
            sqlite: conn => {
                diesel::sql_query(
                    "SELECT COUNT(*) AS count FROM sqlite_master \
                     WHERE type = 'table' AND name = 'pdf_data'",
                )
                .get_result(conn)?
            },
            postgres: conn => {
                diesel::sql_query(
                    "SELECT COUNT(*) AS count FROM information_schema.tables \
                     WHERE table_name = 'pdf_data'",
                )
                .get_result(conn)?
            }
        );
        Ok(found.count > 0)
    }
}

impl DocumentStore for Store {
    fn find_by_hash(&self, hash: &str) -> Result<Option<PdfRecord>, Error> {
        with_conn!(self, conn => {
            Ok(pdf_data::table
                .filter(pdf_data::hash.eq(hash))
                .select(PdfRecord::as_select())
                .first(conn)
                .optional()?)
        })
    }

    fn list_all(&self) -> Result<Vec<PdfRecord>, Error> {
        with_conn!(self, conn => {
            Ok(pdf_data::table
                .select(PdfRecord::as_select())
                .order((pdf_data::file_name.asc(), pdf_data::hash.asc()))
                .load(conn)?)
        })
    }

    fn insert(&self, record: &NewPdfRecord<'_>) -> Result<(), Error> {
        with_conn!(self, conn => {
            diesel::insert_into(pdf_data::table)
                .values(record)
                .execute(conn)?;
        });
        Ok(())
    }

    fn insert_if_absent(&self, record: &NewPdfRecord<'_>) -> Result<bool, Error> {
        let rows = with_conn!(self, conn => {
            diesel::insert_into(pdf_data::table)
                .values(record)
                .on_conflict_do_nothing()
                .execute(conn)?
        });
        Ok(rows == 1)
    }

    fn mark_read(&self, hash: &str, file_name: &str) -> Result<MarkOutcome, Error> {
        // SQLite takes the write lock up front so a second writer waits on
        // busy_timeout instead of failing when it upgrades from a read.
        with_conn_split!(self,
            sqlite: conn => {
                conn.immediate_transaction::<_, Error, _>(|conn| {
                    mark_read_in!(conn, hash, file_name)
                })
            },
            postgres: conn => {
                conn.transaction::<_, Error, _>(|conn| {
                    mark_read_in!(conn, hash, file_name)
                })
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> Store {
        let store = Store::connect(&AppConfig::with_database_url(SQLITE_MEMORY)).unwrap();
        store.create_schema().unwrap();
        store
    }

    #[test]
    fn test_parse_database_url() {
        assert_eq!(
            DatabaseTarget::parse("postgres://u:p@h/db"),
            DatabaseTarget::Postgres("postgresql://u:p@h/db".to_string())
        );
        assert_eq!(
            DatabaseTarget::parse("postgresql://h/db"),
            DatabaseTarget::Postgres("postgresql://h/db".to_string())
        );
        assert_eq!(
            DatabaseTarget::parse("sqlite://data/pdfs.db"),
            DatabaseTarget::Sqlite("data/pdfs.db".to_string())
        );
        assert_eq!(
            DatabaseTarget::parse("pdf_duper.db"),
            DatabaseTarget::Sqlite("pdf_duper.db".to_string())
        );
    }

    #[cfg(not(feature = "postgres"))]
    #[test]
    fn test_postgres_requires_feature() {
        let config = AppConfig::with_database_url("postgres://u:secret@h/db");
        let err = Store::connect(&config).err().unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_table_exists_after_create_schema() {
        let store = Store::connect(&AppConfig::with_database_url(SQLITE_MEMORY)).unwrap();
        assert!(!store.table_exists().unwrap());
        store.create_schema().unwrap();
        assert!(store.table_exists().unwrap());
        // Idempotent
        store.create_schema().unwrap();
    }

    #[test]
    fn test_mark_read_transitions() {
        let store = memory_store();
        assert_eq!(store.mark_read("h1", "a.pdf").unwrap(), MarkOutcome::Inserted);
        assert_eq!(
            store.mark_read("h1", "b.pdf").unwrap(),
            MarkOutcome::AlreadyRead {
                file_name: "a.pdf".to_string()
            }
        );

        store
            .insert(&NewPdfRecord {
                hash: "h2",
                file_name: "x.pdf",
                status: DocumentStatus::Exists.as_str(),
            })
            .unwrap();
        assert_eq!(store.mark_read("h2", "y.pdf").unwrap(), MarkOutcome::Updated);

        let record = store.find_by_hash("h2").unwrap().unwrap();
        assert_eq!(record.file_name, "x.pdf");
        assert_eq!(record.document_status(), DocumentStatus::Read);
    }

    #[test]
    fn test_insert_if_absent() {
        let store = memory_store();
        let record = NewPdfRecord {
            hash: "h1",
            file_name: "a.pdf",
            status: DocumentStatus::Exists.as_str(),
        };
        assert!(store.insert_if_absent(&record).unwrap());
        assert!(!store.insert_if_absent(&record).unwrap());
        assert_eq!(store.list_all().unwrap().len(), 1);
    }
}
