//! Tag and group indices.
//!
//! Tags are a strict 1:1 mapping between a string label and an entity;
//! groups are many-to-many named collections. Both keep forward and reverse
//! maps in lockstep so that teardown on entity kill is a single call.

use std::collections::{HashMap, HashSet};

use crate::ecs::{
    entity::Entity,
    error::{Error, Result},
};

/// 1:1 tag index: one tag per entity, one entity per tag.
#[derive(Debug, Default)]
pub(crate) struct TagIndex {
    /// Tag -> holding entity.
    by_tag: HashMap<String, Entity>,

    /// Entity -> its tag.
    by_entity: HashMap<Entity, String>,
}

impl TagIndex {
    /// Bind a tag to an entity.
    ///
    /// Fails with [`Error::TagTaken`] if the tag is bound to a different
    /// entity. Re-tagging an entity replaces its previous tag.
    pub fn tag(&mut self, entity: Entity, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();

        if let Some(owner) = self.by_tag.get(&tag)
            && *owner != entity
        {
            return Err(Error::TagTaken { tag, owner: *owner });
        }

        if let Some(previous) = self.by_entity.insert(entity, tag.clone()) {
            self.by_tag.remove(&previous);
        }
        self.by_tag.insert(tag, entity);

        Ok(())
    }

    /// Look up the entity holding a tag.
    pub fn entity(&self, tag: &str) -> Result<Entity> {
        self.by_tag
            .get(tag)
            .copied()
            .ok_or_else(|| Error::UnknownTag(tag.to_string()))
    }

    /// Check whether the entity holds exactly this tag.
    #[inline]
    pub fn has(&self, entity: Entity, tag: &str) -> bool {
        self.by_entity.get(&entity).is_some_and(|held| held == tag)
    }

    /// Remove the entity's tag, if any, returning it. Both maps stay in
    /// lockstep.
    pub fn remove(&mut self, entity: Entity) -> Option<String> {
        let tag = self.by_entity.remove(&entity)?;
        self.by_tag.remove(&tag);
        Some(tag)
    }
}

/// Many-to-many group index with a full reverse map, so removal works for
/// any membership, not just the most recently assigned one.
#[derive(Debug, Default)]
pub(crate) struct GroupIndex {
    /// Group name -> member entities.
    members: HashMap<String, HashSet<Entity>>,

    /// Entity -> groups it belongs to.
    memberships: HashMap<Entity, HashSet<String>>,
}

impl GroupIndex {
    /// Add an entity to a group, creating the group on first use.
    pub fn add(&mut self, entity: Entity, group: impl Into<String>) {
        let group = group.into();
        self.members.entry(group.clone()).or_default().insert(entity);
        self.memberships.entry(entity).or_default().insert(group);
    }

    /// The member set of a group.
    pub fn members(&self, group: &str) -> Result<&HashSet<Entity>> {
        self.members
            .get(group)
            .ok_or_else(|| Error::UnknownGroup(group.to_string()))
    }

    /// Check whether the entity belongs to the group.
    #[inline]
    pub fn contains(&self, entity: Entity, group: &str) -> bool {
        self.memberships
            .get(&entity)
            .is_some_and(|groups| groups.contains(group))
    }

    /// The groups an entity belongs to, in no particular order.
    pub fn groups_of(&self, entity: Entity) -> Vec<&str> {
        self.memberships
            .get(&entity)
            .map(|groups| groups.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Remove an entity from one group. Groups emptied by the removal are
    /// dropped entirely.
    ///
    /// Fails with [`Error::UnknownGroup`] if no such group exists; removing
    /// a non-member from an existing group is a no-op.
    pub fn remove(&mut self, entity: Entity, group: &str) -> Result<()> {
        let members = self
            .members
            .get_mut(group)
            .ok_or_else(|| Error::UnknownGroup(group.to_string()))?;

        members.remove(&entity);
        if members.is_empty() {
            self.members.remove(group);
        }

        if let Some(groups) = self.memberships.get_mut(&entity) {
            groups.remove(group);
            if groups.is_empty() {
                self.memberships.remove(&entity);
            }
        }

        Ok(())
    }

    /// Remove an entity from every group it belongs to.
    pub fn forget(&mut self, entity: Entity) {
        let Some(groups) = self.memberships.remove(&entity) else {
            return;
        };

        for group in groups {
            if let Some(members) = self.members.get_mut(&group) {
                members.remove(&entity);
                if members.is_empty() {
                    self.members.remove(&group);
                }
            }
        }
    }
}
