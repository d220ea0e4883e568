//! The queue of items a user selected for baking.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::AssetIoError;
use crate::host::SceneHierarchy;
use crate::types::{MaterialId, MeshId, WorkItem};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkList {
    items: Vec<WorkItem>,
}

impl WorkList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: MaterialId) {
        self.items.push(WorkItem::Material(material));
    }

    pub fn add_mesh(&mut self, mesh: MeshId) {
        self.items.push(WorkItem::Mesh(mesh));
    }

    /// Add `mesh` and every mesh below it, parents before children
    ///
    /// Returns how many meshes were added. A mesh reached twice is only
    /// added once. On error the list is left unchanged.
    pub fn add_mesh_with_children<S: SceneHierarchy + ?Sized>(
        &mut self,
        mesh: MeshId,
        scene: &S,
    ) -> Result<usize, AssetIoError> {
        let mut queued = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = vec![mesh];
        while let Some(next) = pending.pop() {
            if !seen.insert(next.clone()) {
                warn!("{} appears twice in the hierarchy, skipping", next);
                continue;
            }
            let children = scene.children(&next)?;
            // Reverse so the first child is visited first
            pending.extend(children.into_iter().rev());
            queued.push(WorkItem::Mesh(next));
        }
        let added = queued.len();
        self.items.extend(queued);
        debug!("Queued {} mesh(es)", added);
        Ok(added)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<WorkItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryHost;

    #[test]
    fn test_add_and_clear() {
        let mut list = WorkList::new();
        list.add_material(MaterialId::new("a.mat"));
        list.add_mesh(MeshId::new("b.mesh"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[0].label(), "[MAT] a");
        assert_eq!(list.items()[1].label(), "[MESH] b");

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_children_in_preorder() {
        let mut host = MemoryHost::default();
        let root = host.add_mesh("root.mesh", vec![]);
        let left = host.add_mesh("left.mesh", vec![]);
        let leaf = host.add_mesh("leaf.mesh", vec![]);
        let right = host.add_mesh("right.mesh", vec![]);
        host.meshes.get_mut(&root).unwrap().children = vec![left.clone(), right.clone()];
        host.meshes.get_mut(&left).unwrap().children = vec![leaf.clone()];

        let mut list = WorkList::new();
        let added = list.add_mesh_with_children(root.clone(), &host).unwrap();

        assert_eq!(added, 4);
        assert_eq!(
            list.into_items(),
            vec![
                WorkItem::Mesh(root),
                WorkItem::Mesh(left),
                WorkItem::Mesh(leaf),
                WorkItem::Mesh(right),
            ]
        );
    }

    #[test]
    fn test_cycle_is_visited_once() {
        let mut host = MemoryHost::default();
        let a = host.add_mesh("a.mesh", vec![]);
        let b = host.add_mesh("b.mesh", vec![]);
        host.meshes.get_mut(&a).unwrap().children = vec![b.clone()];
        host.meshes.get_mut(&b).unwrap().children = vec![a.clone()];

        let mut list = WorkList::new();
        assert_eq!(list.add_mesh_with_children(a, &host).unwrap(), 2);
    }

    #[test]
    fn test_missing_child_is_an_error() {
        let mut host = MemoryHost::default();
        let root = host.add_mesh("root.mesh", vec![]);
        host.meshes.get_mut(&root).unwrap().children = vec![MeshId::new("gone.mesh")];

        let mut list = WorkList::new();
        let err = list.add_mesh_with_children(root, &host).unwrap_err();
        assert!(matches!(err, AssetIoError::NotFound(_)));
    }

    #[test]
    fn test_failed_walk_leaves_list_unchanged() {
        let mut host = MemoryHost::default();
        let root = host.add_mesh("root.mesh", vec![]);
        let ok = host.add_mesh("ok.mesh", vec![]);
        let broken = host.add_mesh("broken.mesh", vec![]);
        host.meshes.get_mut(&root).unwrap().children = vec![ok, broken.clone()];
        host.meshes.get_mut(&broken).unwrap().children = vec![MeshId::new("gone.mesh")];

        let mut list = WorkList::new();
        list.add_material(MaterialId::new("first.mat"));
        assert!(list.add_mesh_with_children(root, &host).is_err());
        assert_eq!(
            list.items(),
            &[WorkItem::Material(MaterialId::new("first.mat"))]
        );
    }
}
