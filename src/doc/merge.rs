use super::value::{DocMap, DocValue};

/// Merge `overlays` into a copy of `base`, left to right.
///
/// Per key of every overlay record:
///
/// - a key missing from the overlay leaves the existing value alone;
/// - `Null` and `Opaque` overlay values replace the existing value outright;
/// - list values are appended to the existing list, then deduplicated by deep
///   equality keeping the first occurrence;
/// - record values merge recursively into the existing record (an absent or
///   non-record existing value counts as an empty record);
/// - any other scalar replaces the existing value.
///
/// An `Opaque` base is returned unchanged whatever the overlays hold. A `Null` base
/// starts from the empty record. At the top level only overlays matching the base
/// shape (records onto records, lists onto lists) take effect.
pub fn merge<'a, I>(base: &DocValue, overlays: I) -> DocValue
where
    I: IntoIterator<Item = &'a DocValue>,
{
    match base {
        DocValue::Record(map) => {
            let mut target = map.clone();
            for overlay in overlays {
                if let DocValue::Record(fields) = overlay {
                    merge_records(&mut target, fields);
                }
            }
            DocValue::Record(target)
        }
        DocValue::Null => merge(&DocValue::empty(), overlays),
        DocValue::List(items) => {
            let mut target = items.clone();
            for overlay in overlays {
                if let DocValue::List(extra) = overlay {
                    target.extend(extra.iter().cloned());
                }
            }
            DocValue::List(dedup_deep(target))
        }
        DocValue::Opaque(_) | DocValue::Bool(_) | DocValue::Number(_) | DocValue::String(_) => {
            base.clone()
        }
    }
}

/// Fold [`merge`] over `fragments`, skipping empty ones.
///
/// Later fragments win. The result is always a record.
pub fn join_docs<'a, I>(fragments: I) -> DocValue
where
    I: IntoIterator<Item = &'a DocValue>,
{
    merge(
        &DocValue::empty(),
        fragments.into_iter().filter(|fragment| !fragment.is_empty()),
    )
}

// Keys already in `target` keep their position; new keys are appended.
fn merge_records(target: &mut DocMap, overlay: &DocMap) {
    for (key, value) in overlay {
        match target.get_mut(key) {
            Some(slot) => {
                let existing = std::mem::replace(slot, DocValue::Null);
                *slot = merge_entry(Some(existing), value);
            }
            None => {
                target.insert(key.clone(), merge_entry(None, value));
            }
        }
    }
}

fn merge_entry(existing: Option<DocValue>, overlay: &DocValue) -> DocValue {
    match overlay {
        DocValue::Null | DocValue::Opaque(_) => overlay.clone(),
        DocValue::List(items) => match existing {
            Some(DocValue::List(mut current)) => {
                current.extend(items.iter().cloned());
                DocValue::List(dedup_deep(current))
            }
            _ => DocValue::List(dedup_deep(items.clone())),
        },
        DocValue::Record(fields) => {
            let mut target = match existing {
                Some(DocValue::Record(current)) => current,
                _ => DocMap::new(),
            };
            merge_records(&mut target, fields);
            DocValue::Record(target)
        }
        DocValue::Bool(_) | DocValue::Number(_) | DocValue::String(_) => overlay.clone(),
    }
}

// Quadratic, but documentation lists are short.
fn dedup_deep(items: Vec<DocValue>) -> Vec<DocValue> {
    let mut out: Vec<DocValue> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
