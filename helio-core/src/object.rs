//! Generic list envelope for collection responses.
use crate::metadata::{ListMeta, TypeMeta};
use serde::{Deserialize, Serialize};

/// A generic object list
///
/// Collection responses for every kind share this envelope shape, so a single
/// generic struct is used instead of one list struct per kind.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ObjectList<T>
where
    T: Clone,
{
    /// The type fields, not always present
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,

    /// ListMeta - mostly used for its `resourceVersion`
    #[serde(default)]
    pub metadata: ListMeta,

    /// The items of the collection
    #[serde(default, bound(deserialize = "Vec<T>: Deserialize<'de>"))]
    pub items: Vec<T>,
}

impl<T: Clone> ObjectList<T> {
    /// Returns an Iterator over the elements of this ObjectList
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Clone> IntoIterator for ObjectList<T> {
    type IntoIter = ::std::vec::IntoIter<Self::Item>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T: Clone> IntoIterator for &'a ObjectList<T> {
    type IntoIter = ::std::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
