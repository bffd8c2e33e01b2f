use anyhow::Context;

use portal_app::{Portal, PortalConfig};
use portal_core::Repository;

fn main() -> anyhow::Result<()> {
    portal_observability::init();

    let config = PortalConfig::from_env().context("invalid portal configuration")?;
    let store = config.open_store()?;
    let (portal, report) = Portal::open(store).context("failed to initialize portal storage")?;

    let storage = config
        .storage_path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "memory".to_string());
    let store = portal.store();
    let session = portal.session();

    tracing::info!(
        storage = %storage,
        prefix = %config.key_prefix,
        seeded = ?report.seeded,
        users = store.users().list()?.len(),
        objects = store.objects().list()?.len(),
        posts = store.posts().list()?.len(),
        authenticated = session.is_authenticated(),
        user_id = ?session.current_user_id(),
        "portal ready"
    );

    Ok(())
}
