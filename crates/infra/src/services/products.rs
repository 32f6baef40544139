//! Product catalog: categories and products with soft and hard deletion.
//!
//! Hard-deleting a category removes its products with it.

use std::sync::Arc;

use shelfkeep_core::text::contains_ignore_case;
use shelfkeep_core::{BatchDeletion, DomainError, DomainResult, Entity};
use shelfkeep_products::{
    Category, CategoryDetails, CategoryId, Product, ProductDetails, ProductFilter, ProductId,
    ProductSort,
};

use crate::query::{cmp_ignore_case, sort_rows, SortDir};
use crate::store::Repository;

/// Records that can be hidden and brought back.
trait SoftDeletable: Entity + Clone + Send + Sync {
    fn is_deleted(&self) -> bool;
    fn mark_deleted(&mut self);
    fn unmark_deleted(&mut self);
}

impl SoftDeletable for Category {
    fn is_deleted(&self) -> bool {
        Category::is_deleted(self)
    }

    fn mark_deleted(&mut self) {
        self.soft_delete();
    }

    fn unmark_deleted(&mut self) {
        self.restore();
    }
}

impl SoftDeletable for Product {
    fn is_deleted(&self) -> bool {
        Product::is_deleted(self)
    }

    fn mark_deleted(&mut self) {
        self.soft_delete();
    }

    fn unmark_deleted(&mut self) {
        self.restore();
    }
}

fn live<E: SoftDeletable>(repo: &dyn Repository<E>) -> DomainResult<Vec<E>> {
    Ok(repo.find_where(&|row: &E| !row.is_deleted())?)
}

fn deleted<E: SoftDeletable>(repo: &dyn Repository<E>) -> DomainResult<Vec<E>> {
    Ok(repo.find_where(&|row: &E| row.is_deleted())?)
}

fn soft_delete_one<E: SoftDeletable>(repo: &dyn Repository<E>, id: E::Id) -> DomainResult<()> {
    let mut row = repo.get(&id)?;
    row.mark_deleted();
    repo.update(row)?;
    tracing::info!(kind = E::KIND, %id, "soft deleted");
    Ok(())
}

/// Hide every existing id; already hidden rows count as deleted.
fn soft_delete_many<E: SoftDeletable>(
    repo: &dyn Repository<E>,
    ids: &[E::Id],
) -> BatchDeletion<E::Id> {
    let mut report = BatchDeletion::new();
    for &id in ids {
        report.record_outcome(id, soft_delete_one(repo, id));
    }
    tracing::info!(
        kind = E::KIND,
        deleted = report.deleted.len(),
        missing = report.missing.len(),
        failed = report.failed.len(),
        "batch soft delete"
    );
    report
}

/// Bring back hidden rows; returns the ids that were restored.
fn restore_many<E: SoftDeletable>(repo: &dyn Repository<E>, ids: &[E::Id]) -> DomainResult<Vec<E::Id>> {
    let mut restored = Vec::new();
    for &id in ids {
        if let Some(mut row) = repo.find_by_id(&id)? {
            if row.is_deleted() {
                row.unmark_deleted();
                repo.update(row)?;
                restored.push(id);
            }
        }
    }
    tracing::info!(kind = E::KIND, restored = restored.len(), "batch restore");
    Ok(restored)
}

pub struct CategoryService {
    categories: Arc<dyn Repository<Category>>,
    products: Arc<dyn Repository<Product>>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn Repository<Category>>, products: Arc<dyn Repository<Product>>) -> Self {
        Self {
            categories,
            products,
        }
    }

    pub fn create(&self, details: CategoryDetails) -> DomainResult<Category> {
        let category = self.categories.insert(Category::new(details)?)?;
        tracing::info!(category_id = %category.id_typed(), name = category.name(), "category created");
        Ok(category)
    }

    /// Any category, hidden or not.
    pub fn get(&self, id: CategoryId) -> DomainResult<Category> {
        Ok(self.categories.get(&id)?)
    }

    pub fn list(&self) -> DomainResult<Vec<Category>> {
        live(self.categories.as_ref())
    }

    pub fn list_deleted(&self) -> DomainResult<Vec<Category>> {
        deleted(self.categories.as_ref())
    }

    pub fn update(&self, id: CategoryId, details: CategoryDetails) -> DomainResult<Category> {
        let mut category = self.categories.get(&id)?;
        category.update(details)?;
        Ok(self.categories.update(category)?)
    }

    pub fn search_by_name(&self, name: &str) -> DomainResult<Vec<Category>> {
        let name = name.trim();
        Ok(self
            .categories
            .find_where(&|c: &Category| !c.is_deleted() && contains_ignore_case(c.name(), name))?)
    }

    pub fn sorted(&self, dir: SortDir) -> DomainResult<Vec<Category>> {
        let mut rows = self.list()?;
        sort_rows(&mut rows, dir, |a, b| cmp_ignore_case(a.name(), b.name()));
        Ok(rows)
    }

    pub fn soft_delete(&self, id: CategoryId) -> DomainResult<()> {
        soft_delete_one(self.categories.as_ref(), id)
    }

    pub fn soft_delete_many(&self, ids: &[CategoryId]) -> DomainResult<BatchDeletion<CategoryId>> {
        Ok(soft_delete_many(self.categories.as_ref(), ids))
    }

    pub fn restore_many(&self, ids: &[CategoryId]) -> DomainResult<Vec<CategoryId>> {
        restore_many(self.categories.as_ref(), ids)
    }

    /// Remove the category and every product in it.
    pub fn hard_delete(&self, id: CategoryId) -> DomainResult<()> {
        self.categories.get(&id)?;
        let products = self
            .products
            .find_where(&|p: &Product| p.category() == Some(id))?;
        for product in &products {
            self.products.delete(&product.id_typed())?;
        }
        self.categories.delete(&id)?;
        tracing::info!(category_id = %id, products = products.len(), "category hard deleted");
        Ok(())
    }

    pub fn hard_delete_many(&self, ids: &[CategoryId]) -> DomainResult<BatchDeletion<CategoryId>> {
        let mut report = BatchDeletion::new();
        for &id in ids {
            report.record_outcome(id, self.hard_delete(id));
        }
        Ok(report)
    }
}

pub struct ProductService {
    products: Arc<dyn Repository<Product>>,
    categories: Arc<dyn Repository<Category>>,
}

impl ProductService {
    pub fn new(products: Arc<dyn Repository<Product>>, categories: Arc<dyn Repository<Category>>) -> Self {
        Self {
            products,
            categories,
        }
    }

    fn check_category(&self, details: &ProductDetails) -> DomainResult<()> {
        let Some(id) = details.category else {
            return Ok(());
        };
        let category = self.categories.get(&id)?;
        if category.is_deleted() {
            return Err(DomainError::validation(format!(
                "category '{}' is deleted",
                category.name()
            )));
        }
        Ok(())
    }

    pub fn create(&self, details: ProductDetails) -> DomainResult<Product> {
        self.check_category(&details)?;
        let product = self.products.insert(Product::new(details)?)?;
        tracing::info!(product_id = %product.id_typed(), name = product.name(), "product created");
        Ok(product)
    }

    /// Any product, hidden or not.
    pub fn get(&self, id: ProductId) -> DomainResult<Product> {
        Ok(self.products.get(&id)?)
    }

    pub fn list(&self) -> DomainResult<Vec<Product>> {
        live(self.products.as_ref())
    }

    pub fn list_deleted(&self) -> DomainResult<Vec<Product>> {
        deleted(self.products.as_ref())
    }

    pub fn update(&self, id: ProductId, details: ProductDetails) -> DomainResult<Product> {
        let mut product = self.products.get(&id)?;
        self.check_category(&details)?;
        product.update(details)?;
        Ok(self.products.update(product)?)
    }

    pub fn search_by_name(&self, name: &str) -> DomainResult<Vec<Product>> {
        self.filter(&ProductFilter {
            name: Some(name.trim().to_string()),
            ..ProductFilter::default()
        })
    }

    /// Visible products matching every set criterion.
    pub fn filter(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        Ok(self
            .products
            .find_where(&|p: &Product| !p.is_deleted() && filter.matches(p))?)
    }

    pub fn sorted(&self, sort: ProductSort, dir: SortDir) -> DomainResult<Vec<Product>> {
        let mut rows = self.list()?;
        sort_rows(&mut rows, dir, |a, b| sort.compare(a, b));
        Ok(rows)
    }

    pub fn soft_delete(&self, id: ProductId) -> DomainResult<()> {
        soft_delete_one(self.products.as_ref(), id)
    }

    pub fn soft_delete_many(&self, ids: &[ProductId]) -> DomainResult<BatchDeletion<ProductId>> {
        Ok(soft_delete_many(self.products.as_ref(), ids))
    }

    pub fn restore_many(&self, ids: &[ProductId]) -> DomainResult<Vec<ProductId>> {
        restore_many(self.products.as_ref(), ids)
    }

    pub fn hard_delete(&self, id: ProductId) -> DomainResult<()> {
        self.products.delete(&id)?;
        tracing::info!(product_id = %id, "product hard deleted");
        Ok(())
    }

    pub fn hard_delete_many(&self, ids: &[ProductId]) -> DomainResult<BatchDeletion<ProductId>> {
        let mut report = BatchDeletion::new();
        for &id in ids {
            report.record_outcome(id, self.hard_delete(id));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRepository;
    use shelfkeep_core::Money;

    fn services() -> (CategoryService, ProductService) {
        let categories: Arc<dyn Repository<Category>> = Arc::new(InMemoryRepository::<Category>::new());
        let products: Arc<dyn Repository<Product>> = Arc::new(InMemoryRepository::<Product>::new());
        (
            CategoryService::new(categories.clone(), products.clone()),
            ProductService::new(products, categories),
        )
    }

    fn product(name: &str, price: u64, category: Option<CategoryId>) -> ProductDetails {
        ProductDetails {
            name: name.into(),
            description: None,
            price: Money::from_minor(price),
            quantity: 5,
            category,
        }
    }

    #[test]
    fn soft_delete_hides_and_restore_brings_back() {
        let (_, products) = services();
        let a = products.create(product("Hammer", 1_000, None)).unwrap();
        let b = products.create(product("Saw", 2_000, None)).unwrap();

        let report = products
            .soft_delete_many(&[a.id_typed(), ProductId::new()])
            .unwrap();
        assert_eq!(report.deleted, vec![a.id_typed()]);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(products.list().unwrap(), vec![b.clone()]);
        assert_eq!(products.list_deleted().unwrap().len(), 1);
        assert!(products.get(a.id_typed()).unwrap().is_deleted());

        let restored = products.restore_many(&[a.id_typed(), b.id_typed()]).unwrap();
        assert_eq!(restored, vec![a.id_typed()]);
        assert_eq!(products.list().unwrap().len(), 2);
    }

    #[test]
    fn hard_deleting_a_category_removes_its_products() {
        let (categories, products) = services();
        let tools = categories.create(CategoryDetails::named("Tools")).unwrap();
        products
            .create(product("Hammer", 1_000, Some(tools.id_typed())))
            .unwrap();
        let loose = products.create(product("Glue", 300, None)).unwrap();

        categories.hard_delete(tools.id_typed()).unwrap();
        assert_eq!(products.list().unwrap(), vec![loose]);
        assert!(categories.get(tools.id_typed()).unwrap_err().is_not_found());
    }

    #[test]
    fn products_cannot_join_a_deleted_category() {
        let (categories, products) = services();
        let old = categories.create(CategoryDetails::named("Old")).unwrap();
        categories.soft_delete(old.id_typed()).unwrap();

        let err = products
            .create(product("Widget", 100, Some(old.id_typed())))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn search_and_sort_skip_hidden_rows() {
        let (_, products) = services();
        let cheap = products.create(product("Small Hammer", 500, None)).unwrap();
        let dear = products.create(product("Big Hammer", 5_000, None)).unwrap();
        let gone = products.create(product("Old Hammer", 100, None)).unwrap();
        products.soft_delete(gone.id_typed()).unwrap();

        assert_eq!(products.search_by_name("hammer").unwrap().len(), 2);
        let by_price = products.sorted(ProductSort::Price, SortDir::Desc).unwrap();
        assert_eq!(by_price, vec![dear, cheap]);
    }
}
