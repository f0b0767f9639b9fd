use crate::db::{DbConnection, DbPool};
use crate::domain::product::Product;

pub mod errors;
pub mod product;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Product>>;
    fn get_all_active(&self) -> RepositoryResult<Vec<Product>>;
    fn get_by_category(&self, category: &str) -> RepositoryResult<Vec<Product>>;
    fn search_by_name_or_description(&self, term: &str) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records.
pub trait ProductWriter {
    /// Insert the product when it has no id yet, otherwise update its row.
    fn save(&self, product: &Product) -> RepositoryResult<Product>;
    /// Remove the row, reporting whether one existed.
    fn delete(&self, id: i32) -> RepositoryResult<bool>;
}
