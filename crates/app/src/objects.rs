//! Catalogue object workflows. Listing and detail are public.

use chrono::Utc;

use portal_auth::{AuthzError, Permission};
use portal_content::policy::require;
use portal_content::{ContentObject, ObjectDraft, next_object_id};
use portal_core::{ObjectId, Repository};

use crate::{Portal, PortalError, PortalResult};

impl Portal {
    /// All objects in catalogue order.
    pub fn list_objects(&self) -> PortalResult<Vec<ContentObject>> {
        let mut objects = self.store().objects().list()?;
        objects.sort_by_key(|o| (o.id.number().unwrap_or(u32::MAX), o.id.clone()));
        Ok(objects)
    }

    pub fn object_detail(&self, id: &ObjectId) -> PortalResult<ContentObject> {
        self.store()
            .objects()
            .get(id)?
            .ok_or_else(|| PortalError::not_found("object", id))
    }

    pub fn create_object(&mut self, draft: &ObjectDraft) -> PortalResult<ContentObject> {
        require(self.session(), &Permission::CREATE_OBJECT)?;
        let creator = self
            .session()
            .current_user_id()
            .cloned()
            .ok_or(AuthzError::Unauthenticated)?;

        let objects = self.store().objects();
        let id = next_object_id(&objects.list()?)?;
        let object = ContentObject::create(id, draft, creator, Utc::now())?;
        let object = objects.add(object)?;
        tracing::info!(object_id = %object.id, class = %object.object_class, "object created");
        Ok(object)
    }

    pub fn update_object(&mut self, id: &ObjectId, draft: &ObjectDraft) -> PortalResult<ContentObject> {
        require(self.session(), &Permission::EDIT_OBJECT)?;
        let mut object = self.object_detail(id)?;

        object.apply_edit(draft, Utc::now())?;
        let object = self.store().objects().update(object)?;
        tracing::info!(object_id = %object.id, "object updated");
        Ok(object)
    }

    pub fn delete_object(&mut self, id: &ObjectId) -> PortalResult<()> {
        require(self.session(), &Permission::ALL)?;
        if !self.store().objects().delete(id)? {
            return Err(PortalError::not_found("object", id));
        }
        tracing::info!(object_id = %id, "object deleted");
        Ok(())
    }
}
