//! In-memory unit of work backed by a shared store.
//!
//! Writes apply to the live store immediately; an open transaction keeps
//! an undo journal so rollback can restore the prior state. Unique
//! constraints are checked at write time against live rows, matching the
//! partial unique indexes of the relational schema.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use once_cell::sync::OnceCell;

use crate::domain::catalog::{Category, CategoryDraft, Product, ProductDraft};
use crate::domain::foundation::{
    CategoryId, DomainError, ErrorCode, ProductId, Timestamp, UserId,
};
use crate::domain::identity::{User, UserDraft};
use crate::ports::{
    CategoryRepository, ProductRepository, UnitOfWork, UnitOfWorkFactory, UserRepository,
};

#[derive(Default)]
struct StoreInner {
    products: HashMap<ProductId, Product>,
    categories: HashMap<CategoryId, Category>,
    users: HashMap<UserId, User>,
}

/// Shared backing store. Clone the `Arc` to share it across units of work.
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(StoreInner::default()),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        })
    }

    /// Makes every subsequent write fail, for exercising rollback paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent read fail, for exercising cache-only paths.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>, DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated read failure"));
        }
        Ok(self.inner.read().unwrap_or_else(|e| e.into_inner()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>, DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated write failure"));
        }
        Ok(self.inner.write().unwrap_or_else(|e| e.into_inner()))
    }

    fn write_for_rollback(&self) -> RwLockWriteGuard<'_, StoreInner> {
        // Rollback must succeed even while writes are failing.
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

enum UndoOp {
    RemoveProduct(ProductId),
    RestoreProduct(Box<Product>),
    RemoveCategory(CategoryId),
    RestoreCategory(Box<Category>),
    RemoveUser(UserId),
    RestoreUser(Box<User>),
}

/// Transactional state shared between a unit of work and its repositories.
struct TxState {
    store: Arc<InMemoryStore>,
    journal: Mutex<Option<Vec<UndoOp>>>,
    affected: AtomicU64,
}

impl TxState {
    // Synchronous so repositories can record while still holding the
    // store guard without the guard crossing an await point.
    fn record(&self, undo: UndoOp) {
        let mut journal = self.journal.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(journal) = journal.as_mut() {
            journal.push(undo);
        }
        self.affected.fetch_add(1, Ordering::SeqCst);
    }

    fn journal(&self) -> std::sync::MutexGuard<'_, Option<Vec<UndoOp>>> {
        self.journal.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn duplicate(what: &str) -> DomainError {
    DomainError::new(
        ErrorCode::DuplicateKey,
        format!("unique constraint violated: {}", what),
    )
}

struct InMemoryProductRepository {
    tx: Arc<TxState>,
}

impl InMemoryProductRepository {
    fn sku_taken(inner: &StoreInner, sku: &str, exclude: Option<&ProductId>) -> bool {
        inner.products.values().any(|p| {
            !p.audit.is_deleted
                && p.sku.as_deref() == Some(sku)
                && Some(&p.id) != exclude
        })
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, draft: &ProductDraft) -> Result<Product, DomainError> {
        let mut inner = self.tx.store.write()?;
        if let Some(sku) = draft.sku.as_deref() {
            if Self::sku_taken(&inner, sku, None) {
                return Err(duplicate("products.sku"));
            }
        }
        let product = Product::from_draft(draft.clone(), ProductId::new(), Timestamp::now());
        inner.products.insert(product.id, product.clone());
        drop(inner);
        self.tx.record(UndoOp::RemoveProduct(product.id));
        Ok(product)
    }

    async fn update(&self, product: &Product) -> Result<(), DomainError> {
        let mut inner = self.tx.store.write()?;
        let previous = match inner.products.get(&product.id) {
            Some(existing) if !existing.audit.is_deleted => existing.clone(),
            _ => {
                return Err(DomainError::new(
                    ErrorCode::ProductNotFound,
                    "Product not found",
                ))
            }
        };
        if let Some(sku) = product.sku.as_deref() {
            if Self::sku_taken(&inner, sku, Some(&product.id)) {
                return Err(duplicate("products.sku"));
            }
        }
        inner.products.insert(product.id, product.clone());
        drop(inner);
        self.tx
            .record(UndoOp::RestoreProduct(Box::new(previous)));
        Ok(())
    }

    async fn soft_delete(&self, id: &ProductId) -> Result<(), DomainError> {
        let mut inner = self.tx.store.write()?;
        let previous = match inner.products.get_mut(id) {
            Some(existing) if !existing.audit.is_deleted => {
                let previous = existing.clone();
                existing.mark_deleted();
                previous
            }
            _ => {
                return Err(DomainError::new(
                    ErrorCode::ProductNotFound,
                    "Product not found",
                ))
            }
        };
        drop(inner);
        self.tx
            .record(UndoOp::RestoreProduct(Box::new(previous)));
        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(inner
            .products
            .get(id)
            .filter(|p| !p.audit.is_deleted)
            .cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(inner
            .products
            .values()
            .find(|p| !p.audit.is_deleted && p.sku.as_deref() == Some(sku))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let inner = self.tx.store.read()?;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| !p.audit.is_deleted)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn find_active(&self) -> Result<Vec<Product>, DomainError> {
        let inner = self.tx.store.read()?;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| !p.audit.is_deleted && p.is_active)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn find_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>, DomainError> {
        let inner = self.tx.store.read()?;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| !p.audit.is_deleted && p.category_id == *category_id)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn find_by_price_range(
        &self,
        min: &BigDecimal,
        max: &BigDecimal,
    ) -> Result<Vec<Product>, DomainError> {
        let inner = self.tx.store.read()?;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| !p.audit.is_deleted && p.price >= *min && p.price <= *max)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.price.cmp(&b.price));
        Ok(products)
    }

    async fn find_low_stock(&self, threshold: i32) -> Result<Vec<Product>, DomainError> {
        let inner = self.tx.store.read()?;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| !p.audit.is_deleted && p.stock_quantity <= threshold)
            .cloned()
            .collect();
        products.sort_by_key(|p| p.stock_quantity);
        Ok(products)
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Product>, DomainError> {
        let needle = term.to_lowercase();
        let inner = self.tx.store.read()?;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| {
                !p.audit.is_deleted
                    && (p.name.to_lowercase().contains(&needle)
                        || p.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle)))
            })
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn is_sku_unique(
        &self,
        sku: &str,
        exclude: Option<&ProductId>,
    ) -> Result<bool, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(!Self::sku_taken(&inner, sku, exclude))
    }
}

struct InMemoryCategoryRepository {
    tx: Arc<TxState>,
}

impl InMemoryCategoryRepository {
    fn name_taken(inner: &StoreInner, name: &str, exclude: Option<&CategoryId>) -> bool {
        inner
            .categories
            .values()
            .any(|c| !c.audit.is_deleted && c.name == name && Some(&c.id) != exclude)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn insert(&self, draft: &CategoryDraft) -> Result<Category, DomainError> {
        let mut inner = self.tx.store.write()?;
        if Self::name_taken(&inner, &draft.name, None) {
            return Err(duplicate("categories.name"));
        }
        let category = Category::from_draft(draft.clone(), CategoryId::new(), Timestamp::now());
        inner.categories.insert(category.id, category.clone());
        drop(inner);
        self.tx.record(UndoOp::RemoveCategory(category.id));
        Ok(category)
    }

    async fn update(&self, category: &Category) -> Result<(), DomainError> {
        let mut inner = self.tx.store.write()?;
        let previous = match inner.categories.get(&category.id) {
            Some(existing) if !existing.audit.is_deleted => existing.clone(),
            _ => {
                return Err(DomainError::new(
                    ErrorCode::CategoryNotFound,
                    "Category not found",
                ))
            }
        };
        if Self::name_taken(&inner, &category.name, Some(&category.id)) {
            return Err(duplicate("categories.name"));
        }
        inner.categories.insert(category.id, category.clone());
        drop(inner);
        self.tx
            .record(UndoOp::RestoreCategory(Box::new(previous)));
        Ok(())
    }

    async fn soft_delete(&self, id: &CategoryId) -> Result<(), DomainError> {
        let mut inner = self.tx.store.write()?;
        let previous = match inner.categories.get_mut(id) {
            Some(existing) if !existing.audit.is_deleted => {
                let previous = existing.clone();
                existing.mark_deleted();
                previous
            }
            _ => {
                return Err(DomainError::new(
                    ErrorCode::CategoryNotFound,
                    "Category not found",
                ))
            }
        };
        drop(inner);
        self.tx
            .record(UndoOp::RestoreCategory(Box::new(previous)));
        Ok(())
    }

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(inner
            .categories
            .get(id)
            .filter(|c| !c.audit.is_deleted)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let inner = self.tx.store.read()?;
        let mut categories: Vec<Category> = inner
            .categories
            .values()
            .filter(|c| !c.audit.is_deleted)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_active(&self) -> Result<Vec<Category>, DomainError> {
        let inner = self.tx.store.read()?;
        let mut categories: Vec<Category> = inner
            .categories
            .values()
            .filter(|c| !c.audit.is_deleted && c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Category>, DomainError> {
        let needle = term.to_lowercase();
        let inner = self.tx.store.read()?;
        let mut categories: Vec<Category> = inner
            .categories
            .values()
            .filter(|c| {
                !c.audit.is_deleted
                    && (c.name.to_lowercase().contains(&needle)
                        || c.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle)))
            })
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn is_name_unique(
        &self,
        name: &str,
        exclude: Option<&CategoryId>,
    ) -> Result<bool, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(!Self::name_taken(&inner, name, exclude))
    }

    async fn product_count(&self, id: &CategoryId) -> Result<u64, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(inner
            .products
            .values()
            .filter(|p| !p.audit.is_deleted && p.category_id == *id)
            .count() as u64)
    }
}

struct InMemoryUserRepository {
    tx: Arc<TxState>,
}

impl InMemoryUserRepository {
    fn identity_taken(
        inner: &StoreInner,
        email: &str,
        username: &str,
        exclude: Option<&UserId>,
    ) -> bool {
        inner.users.values().any(|u| {
            !u.audit.is_deleted
                && (u.email == email || u.username == username)
                && Some(&u.id) != exclude
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, draft: &UserDraft) -> Result<User, DomainError> {
        let mut inner = self.tx.store.write()?;
        if Self::identity_taken(&inner, &draft.email, &draft.username, None) {
            return Err(duplicate("users.email/users.username"));
        }
        let user = User::from_draft(draft.clone(), UserId::new(), Timestamp::now());
        inner.users.insert(user.id, user.clone());
        drop(inner);
        self.tx.record(UndoOp::RemoveUser(user.id));
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut inner = self.tx.store.write()?;
        let previous = match inner.users.get(&user.id) {
            Some(existing) if !existing.audit.is_deleted => existing.clone(),
            _ => return Err(DomainError::new(ErrorCode::UserNotFound, "User not found")),
        };
        if Self::identity_taken(&inner, &user.email, &user.username, Some(&user.id)) {
            return Err(duplicate("users.email/users.username"));
        }
        inner.users.insert(user.id, user.clone());
        drop(inner);
        self.tx.record(UndoOp::RestoreUser(Box::new(previous)));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(inner.users.get(id).filter(|u| !u.audit.is_deleted).cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(inner
            .users
            .values()
            .find(|u| !u.audit.is_deleted && u.is_active && u.email == email)
            .cloned())
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(inner
            .users
            .values()
            .find(|u| !u.audit.is_deleted && u.is_active && u.username == username)
            .cloned())
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, DomainError> {
        let inner = self.tx.store.read()?;
        Ok(inner
            .users
            .values()
            .find(|u| !u.audit.is_deleted && (u.email == email || u.username == username))
            .cloned())
    }
}

pub struct InMemoryUnitOfWork {
    tx: Arc<TxState>,
    products: OnceCell<Arc<InMemoryProductRepository>>,
    categories: OnceCell<Arc<InMemoryCategoryRepository>>,
    users: OnceCell<Arc<InMemoryUserRepository>>,
}

impl InMemoryUnitOfWork {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self {
            tx: Arc::new(TxState {
                store,
                journal: Mutex::new(None),
                affected: AtomicU64::new(0),
            }),
            products: OnceCell::new(),
            categories: OnceCell::new(),
            users: OnceCell::new(),
        }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products
            .get_or_init(|| Arc::new(InMemoryProductRepository { tx: self.tx.clone() }))
            .clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories
            .get_or_init(|| Arc::new(InMemoryCategoryRepository { tx: self.tx.clone() }))
            .clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users
            .get_or_init(|| Arc::new(InMemoryUserRepository { tx: self.tx.clone() }))
            .clone()
    }

    async fn begin_transaction(&self) -> Result<(), DomainError> {
        let mut journal = self.tx.journal();
        if journal.is_some() {
            return Err(DomainError::new(
                ErrorCode::TransactionAlreadyOpen,
                "A transaction is already open on this unit of work",
            ));
        }
        *journal = Some(Vec::new());
        Ok(())
    }

    async fn save_changes(&self) -> Result<u64, DomainError> {
        Ok(self.tx.affected.swap(0, Ordering::SeqCst))
    }

    async fn commit_transaction(&self) -> Result<(), DomainError> {
        self.tx.journal().take();
        Ok(())
    }

    async fn rollback_transaction(&self) -> Result<(), DomainError> {
        let journal = self.tx.journal().take();
        if let Some(ops) = journal {
            let mut inner = self.tx.store.write_for_rollback();
            for op in ops.into_iter().rev() {
                match op {
                    UndoOp::RemoveProduct(id) => {
                        inner.products.remove(&id);
                    }
                    UndoOp::RestoreProduct(product) => {
                        inner.products.insert(product.id, *product);
                    }
                    UndoOp::RemoveCategory(id) => {
                        inner.categories.remove(&id);
                    }
                    UndoOp::RestoreCategory(category) => {
                        inner.categories.insert(category.id, *category);
                    }
                    UndoOp::RemoveUser(id) => {
                        inner.users.remove(&id);
                    }
                    UndoOp::RestoreUser(user) => {
                        inner.users.insert(user.id, *user);
                    }
                }
            }
        }
        self.tx.affected.store(0, Ordering::SeqCst);
        Ok(())
    }
}

pub struct InMemoryUnitOfWorkFactory {
    store: Arc<InMemoryStore>,
}

impl InMemoryUnitOfWorkFactory {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

impl UnitOfWorkFactory for InMemoryUnitOfWorkFactory {
    fn create(&self) -> Arc<dyn UnitOfWork> {
        Arc::new(InMemoryUnitOfWork::new(self.store.clone()))
    }
}
