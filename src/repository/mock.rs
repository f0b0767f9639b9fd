use mockall::mock;

use super::{ProductReader, ProductWriter};
use crate::domain::product::Product;
use crate::repository::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Product>>;
        fn get_all_active(&self) -> RepositoryResult<Vec<Product>>;
        fn get_by_category(&self, category: &str) -> RepositoryResult<Vec<Product>>;
        fn search_by_name_or_description(&self, term: &str) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn save(&self, product: &Product) -> RepositoryResult<Product>;
        fn delete(&self, id: i32) -> RepositoryResult<bool>;
    }
}
