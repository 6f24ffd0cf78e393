use uuid::Uuid;

use crate::spacetime::SpacetimeEntity;

/// The ordered collection of objects drawn on a diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectList {
    objects: Vec<SpacetimeEntity>,
}

impl ObjectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: SpacetimeEntity) {
        log::debug!("adding {} '{}'", object.kind(), object.name());
        self.objects.push(object);
    }

    pub fn get(&self, index: usize) -> Option<&SpacetimeEntity> {
        self.objects.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SpacetimeEntity> {
        self.objects.get_mut(index)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.objects.iter().position(|object| object.id() == id)
    }

    pub fn find(&self, id: Uuid) -> Option<&SpacetimeEntity> {
        self.objects.iter().find(|object| object.id() == id)
    }

    pub fn find_mut(&mut self, id: Uuid) -> Option<&mut SpacetimeEntity> {
        self.objects.iter_mut().find(|object| object.id() == id)
    }

    pub fn remove(&mut self, index: usize) -> Option<SpacetimeEntity> {
        if index >= self.objects.len() {
            return None;
        }
        let removed = self.objects.remove(index);
        log::debug!("removed {} '{}'", removed.kind(), removed.name());
        Some(removed)
    }

    pub fn remove_id(&mut self, id: Uuid) -> Option<SpacetimeEntity> {
        let index = self.position(id)?;
        self.remove(index)
    }

    pub fn clear(&mut self) {
        log::debug!("clearing {} objects", self.objects.len());
        self.objects.clear();
    }

    /// Swap in a freshly loaded set of objects.
    pub fn replace_all(&mut self, objects: impl IntoIterator<Item = SpacetimeEntity>) {
        self.objects = objects.into_iter().collect();
        log::debug!("replaced diagram with {} objects", self.objects.len());
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpacetimeEntity> {
        self.objects.iter()
    }
}

impl FromIterator<SpacetimeEntity> for ObjectList {
    fn from_iter<I: IntoIterator<Item = SpacetimeEntity>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ObjectList {
    type Item = SpacetimeEntity;
    type IntoIter = std::vec::IntoIter<SpacetimeEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObjectList {
    type Item = &'a SpacetimeEntity;
    type IntoIter = std::slice::Iter<'a, SpacetimeEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
