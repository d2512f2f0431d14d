//! Path navigation over a document tree
//!
//! Resolution walks a [`KeyPath`] one segment at a time:
//! - a key segment requires the current node to be a map holding that key
//! - an index segment requires the current node to be an array with that index
//!
//! [`upsert`] validates the whole walk before touching the tree, so a failed
//! upsert leaves the document exactly as it was. Maps missing along the way
//! are created; arrays never are.
//!
//! [`delete_path`] removes array elements with swap-delete: the last element
//! takes the removed slot, so element order is not preserved.

use docpath_core::{Error, KeyPath, Result, Segment, Value};

/// Resolve `path` against `root`
///
/// # Errors
///
/// - [`Error::KeyDoesNotExist`] if a map lacks the key
/// - [`Error::NotAMap`] if a key segment meets an array or a scalar
/// - [`Error::NotArrayObj`] if an index segment meets a map or a scalar
/// - [`Error::ArrayOutOfRange`] if an index is past the end of its array
pub fn get_path<'a>(root: &'a Value, path: &KeyPath) -> Result<&'a Value> {
    resolve(root, path.segments())
}

/// Resolve `path` against `root` for mutation
///
/// Fails exactly like [`get_path`].
pub fn get_path_mut<'a>(root: &'a mut Value, path: &KeyPath) -> Result<&'a mut Value> {
    resolve_mut(root, path.segments())
}

/// Check whether `path` resolves in `root`
pub fn contains_path(root: &Value, path: &KeyPath) -> bool {
    get_path(root, path).is_ok()
}

pub(crate) fn resolve<'a>(root: &'a Value, segments: &[Segment]) -> Result<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = step(current, segment)?;
    }
    Ok(current)
}

fn resolve_mut<'a>(root: &'a mut Value, segments: &[Segment]) -> Result<&'a mut Value> {
    let mut current = root;
    for segment in segments {
        current = step_mut(current, segment)?;
    }
    Ok(current)
}

fn step<'a>(node: &'a Value, segment: &Segment) -> Result<&'a Value> {
    match (segment, node) {
        (Segment::Key(key), Value::Map(map)) => map
            .get(key)
            .ok_or_else(|| Error::KeyDoesNotExist(key.clone())),
        (Segment::Index(index), Value::Array(items)) => {
            items.get(*index).ok_or(Error::ArrayOutOfRange {
                index: *index,
                len: items.len(),
            })
        }
        (Segment::Key(key), _) => Err(Error::NotAMap(key.clone())),
        (Segment::Index(_), _) => Err(Error::NotArrayObj(segment.to_string())),
    }
}

fn step_mut<'a>(node: &'a mut Value, segment: &Segment) -> Result<&'a mut Value> {
    match (segment, node) {
        (Segment::Key(key), Value::Map(map)) => map
            .get_mut(key)
            .ok_or_else(|| Error::KeyDoesNotExist(key.clone())),
        (Segment::Index(index), Value::Array(items)) => {
            let len = items.len();
            items.get_mut(*index).ok_or(Error::ArrayOutOfRange {
                index: *index,
                len,
            })
        }
        (Segment::Key(key), _) => Err(Error::NotAMap(key.clone())),
        (Segment::Index(_), _) => Err(Error::NotArrayObj(segment.to_string())),
    }
}

/// Check that [`upsert`] of `path` into `root` would succeed
///
/// Nothing is modified. Segments below a missing key are checked against
/// the empty map that upsert would create there.
pub fn validate_upsert(root: &Value, path: &KeyPath) -> Result<()> {
    // None once the walk has left the existing tree
    let mut current = Some(root);
    for segment in path.segments() {
        current = match (segment, current) {
            (Segment::Key(key), Some(Value::Map(map))) => map.get(key),
            (Segment::Key(_), None) => None,
            (Segment::Index(index), Some(Value::Array(items))) => {
                if *index >= items.len() {
                    return Err(Error::ArrayOutOfRange {
                        index: *index,
                        len: items.len(),
                    });
                }
                Some(&items[*index])
            }
            (Segment::Key(key), Some(_)) => return Err(Error::NotAMap(key.clone())),
            (Segment::Index(_), _) => return Err(Error::NotArrayObj(segment.to_string())),
        };
    }
    Ok(())
}

/// Set `value` at `path`, creating missing intermediate maps
///
/// An existing value at `path` is replaced. Index segments may only address
/// existing elements.
///
/// # Errors
///
/// - [`Error::NotAMap`] if a key segment meets an existing non-map node
/// - [`Error::NotArrayObj`] if an index segment meets anything but an array
///   (including a map created by this call)
/// - [`Error::ArrayOutOfRange`] if an index is past the end of its array
///
/// On error the tree is unchanged.
pub fn upsert(root: &mut Value, path: &KeyPath, value: Value) -> Result<()> {
    validate_upsert(root, path)?;

    let (parents, last) = path.split_last();
    let mut current = root;
    for segment in parents {
        current = match (segment, current) {
            (Segment::Key(key), Value::Map(map)) => {
                map.entry(key.clone()).or_insert_with(Value::map)
            }
            (segment, node) => step_mut(node, segment)?,
        };
    }

    match (last, current) {
        (Segment::Key(key), Value::Map(map)) => {
            map.insert(key.clone(), value);
        }
        (segment, node) => *step_mut(node, segment)? = value,
    }
    Ok(())
}

/// Remove the value at `path` and return it
///
/// Array elements are swap-deleted.
///
/// # Errors
///
/// Fails like [`get_path`] if `path` does not resolve. On error the tree is
/// unchanged.
pub fn delete_path(root: &mut Value, path: &KeyPath) -> Result<Value> {
    let (parents, last) = path.split_last();
    let parent = resolve_mut(root, parents)?;

    match (last, parent) {
        (Segment::Key(key), Value::Map(map)) => map
            .remove(key)
            .ok_or_else(|| Error::KeyDoesNotExist(key.clone())),
        (Segment::Index(index), Value::Array(items)) => {
            if *index >= items.len() {
                return Err(Error::ArrayOutOfRange {
                    index: *index,
                    len: items.len(),
                });
            }
            Ok(items.swap_remove(*index))
        }
        (Segment::Key(key), _) => Err(Error::NotAMap(key.clone())),
        (Segment::Index(_), _) => Err(Error::NotArrayObj(last.to_string())),
    }
}

/// Path of the element that deleting `path` would move into its slot
///
/// Only array elements before the last one have such a source: swap-delete
/// moves the last element of the array into the freed slot.
pub fn swap_source(root: &Value, path: &KeyPath) -> Option<KeyPath> {
    let (parents, last) = path.split_last();
    let index = match last {
        Segment::Index(index) => *index,
        Segment::Key(_) => return None,
    };
    let len = resolve(root, parents).ok()?.as_array()?.len();
    if index + 1 >= len {
        return None;
    }
    let mut segments = parents.to_vec();
    segments.push(Segment::Index(len - 1));
    KeyPath::from_segments(segments).ok()
}
