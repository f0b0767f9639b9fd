use chrono::Utc;
use diesel::prelude::*;

use crate::{
    db::unicode_lower,
    domain::product::{Product as DomainProduct, ProductListQuery},
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    repository::{DieselRepository, ProductReader, ProductWriter, RepositoryResult},
};

impl DieselRepository {
    /// Load the active products matching `query` in storage order.
    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut items = products::table
            .filter(products::is_active.eq(true))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(category) = query.category.as_ref() {
            items = items.filter(products::category.eq(category));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            items = items.filter(
                unicode_lower(products::name)
                    .like(pattern.clone())
                    .escape('\\')
                    .or(unicode_lower(products::description)
                        .like(pattern)
                        .escape('\\')),
            );
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        Ok(db_products.into_iter().map(Into::into).collect())
    }
}

impl ProductReader for DieselRepository {
    fn find_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .find(id)
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn find_by_name(&self, name: &str) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::name.eq(name))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn get_all_active(&self) -> RepositoryResult<Vec<DomainProduct>> {
        self.list_products(&ProductListQuery::new())
    }

    fn get_by_category(&self, category: &str) -> RepositoryResult<Vec<DomainProduct>> {
        self.list_products(&ProductListQuery::new().category(category))
    }

    fn search_by_name_or_description(&self, term: &str) -> RepositoryResult<Vec<DomainProduct>> {
        self.list_products(&ProductListQuery::new().search(term))
    }
}

impl ProductWriter for DieselRepository {
    fn save(&self, product: &DomainProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let saved = match product.id {
            Some(id) => {
                let changes = DbUpdateProduct::new(product, Utc::now().naive_utc());
                diesel::update(products::table.find(id))
                    .set(&changes)
                    .get_result::<DbProduct>(&mut conn)?
            }
            None => diesel::insert_into(products::table)
                .values(&DbNewProduct::from(product))
                .get_result::<DbProduct>(&mut conn)?,
        };

        Ok(saved.into())
    }

    fn delete(&self, id: i32) -> RepositoryResult<bool> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}

/// Escape `LIKE` wildcards so the term is matched literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
