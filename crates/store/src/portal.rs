//! One storage profile: its repositories, seeding and session wiring.

use std::sync::Arc;

use portal_auth::{Role, SessionResolver, User};
use portal_content::{Category, ContentObject, Department, Position, Post};
use portal_core::{Record, RepositoryResult};

use crate::{Keys, Storage, StorageRepository, StorageSessionStore};

/// Session resolver over a `PortalStore`'s repositories.
pub type PortalResolver = SessionResolver<
    Arc<StorageRepository<User>>,
    Arc<StorageRepository<Role>>,
    Arc<StorageSessionStore>,
>;

/// Which collections `initialize` had to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: Vec<&'static str>,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.seeded.is_empty()
    }
}

/// Repositories for every collection of one storage profile.
#[derive(Clone)]
pub struct PortalStore {
    keys: Keys,
    users: Arc<StorageRepository<User>>,
    roles: Arc<StorageRepository<Role>>,
    objects: Arc<StorageRepository<ContentObject>>,
    posts: Arc<StorageRepository<Post>>,
    categories: Arc<StorageRepository<Category>>,
    departments: Arc<StorageRepository<Department>>,
    positions: Arc<StorageRepository<Position>>,
    session: Arc<StorageSessionStore>,
}

impl PortalStore {
    pub fn new(storage: Arc<dyn Storage>, keys: Keys) -> Self {
        Self {
            users: Arc::new(StorageRepository::new(storage.clone(), &keys)),
            roles: Arc::new(StorageRepository::new(storage.clone(), &keys)),
            objects: Arc::new(StorageRepository::new(storage.clone(), &keys)),
            posts: Arc::new(StorageRepository::new(storage.clone(), &keys)),
            categories: Arc::new(StorageRepository::new(storage.clone(), &keys)),
            departments: Arc::new(StorageRepository::new(storage.clone(), &keys)),
            positions: Arc::new(StorageRepository::new(storage.clone(), &keys)),
            session: Arc::new(StorageSessionStore::new(storage, &keys)),
            keys,
        }
    }

    /// Seed reference data and create empty collections where absent.
    ///
    /// Existing keys are left alone, so this is safe on every start-up.
    pub fn initialize(&self) -> RepositoryResult<SeedReport> {
        let mut report = SeedReport::default();

        seed(&self.roles, &Role::defaults(), &mut report)?;
        seed(&self.departments, &Department::defaults(), &mut report)?;
        seed(&self.positions, &Position::defaults(), &mut report)?;
        seed(&self.categories, &Category::defaults(), &mut report)?;
        seed(&self.users, &[], &mut report)?;
        seed(&self.objects, &[], &mut report)?;
        seed(&self.posts, &[], &mut report)?;

        if report.is_empty() {
            tracing::debug!(prefix = self.keys.prefix(), "storage already initialized");
        } else {
            tracing::info!(
                prefix = self.keys.prefix(),
                collections = ?report.seeded,
                "storage seeded"
            );
        }
        Ok(report)
    }

    /// A resolver over this profile, already initialized from the session key.
    pub fn session_resolver(&self) -> PortalResolver {
        let mut resolver =
            SessionResolver::new(self.users.clone(), self.roles.clone(), self.session.clone());
        resolver.initialize();
        resolver
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn users(&self) -> &Arc<StorageRepository<User>> {
        &self.users
    }

    pub fn roles(&self) -> &Arc<StorageRepository<Role>> {
        &self.roles
    }

    pub fn objects(&self) -> &Arc<StorageRepository<ContentObject>> {
        &self.objects
    }

    pub fn posts(&self) -> &Arc<StorageRepository<Post>> {
        &self.posts
    }

    pub fn categories(&self) -> &Arc<StorageRepository<Category>> {
        &self.categories
    }

    pub fn departments(&self) -> &Arc<StorageRepository<Department>> {
        &self.departments
    }

    pub fn positions(&self) -> &Arc<StorageRepository<Position>> {
        &self.positions
    }
}

fn seed<T: Record>(
    repo: &StorageRepository<T>,
    records: &[T],
    report: &mut SeedReport,
) -> RepositoryResult<()> {
    if repo.seed(records)? {
        report.seeded.push(T::COLLECTION);
    }
    Ok(())
}
