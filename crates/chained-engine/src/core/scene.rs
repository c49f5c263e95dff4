use glam::Vec2;
use crate::api::types::{IdGenerator, ObjectId};
use crate::components::object::SceneObject;

/// Ordered object storage using a flat Vec.
/// Order is draw order: later objects are drawn on top.
/// Designed for editor-sized scenes (hundreds of objects, not millions).
pub struct Scene {
    objects: Vec<SceneObject>,
    ids: IdGenerator,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(256),
            ids: IdGenerator::new(),
        }
    }

    /// Reserve a fresh object id.
    pub fn next_id(&mut self) -> ObjectId {
        self.ids.next_id()
    }

    /// Create an object with a fresh id on top of the draw order.
    pub fn spawn(&mut self, name: impl Into<String>, asset_id: usize, position: Vec2) -> ObjectId {
        let id = self.next_id();
        self.objects
            .push(SceneObject::new(id, name, asset_id).with_position(position));
        id
    }

    /// Add a fully built object. Its id must come from `next_id`.
    pub fn push(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Remove an object by id, preserving the order of the rest.
    pub fn despawn(&mut self, id: ObjectId) -> Option<SceneObject> {
        let idx = self.index_of(id)?;
        Some(self.objects.remove(idx))
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Position of an object in draw order.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    /// Find the first object with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove every object. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
