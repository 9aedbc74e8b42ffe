//! Intern tables: object → dense id in first-registration order.
//!
//! Zwei Phasen, im Typsystem sichtbar gemacht: [`InternPool`] ist die lebende,
//! thread-sichere Tabelle der Registrierungsphase (idempotentes `add` unter
//! paralleler Einfügung); [`FrozenPool`] ist der unveränderliche Snapshot,
//! gegen den der finale Encode-Lauf arbeitet. `encode()` nimmt nur den
//! Snapshot an — damit kann sich das Ergebnis des Representability-Filters
//! zwischen Registrierung und Encoding nicht mehr ändern.

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::TypeRef;
use crate::{Error, FastHashMap, Result};

/// Membership seam shared by the live pool and the frozen snapshot.
///
/// The representability filter is generic over this trait: during
/// registration it runs against the growing [`InternPool`], during final
/// encoding against the closed [`FrozenPool`], with identical semantics.
pub trait ClassLookup {
    /// Pure membership test, never assigns an id.
    fn contains_class(&self, ty: &TypeRef) -> bool;
}

struct InternInner<T> {
    ids: FastHashMap<T, u32>,
    order: Vec<T>,
}

/// Append-only object → dense id table with first-registration order.
///
/// `add` ist idempotent und vergibt unter konkurrierenden Einfügungen
/// desselben Objekts höchstens eine Id (der Mutex serialisiert die
/// Vergabe). `index` ist Closed-World: ein nie registriertes Objekt ist
/// ein Fehler, kein stilles Anlegen.
pub struct InternSet<T> {
    name: &'static str,
    inner: Mutex<InternInner<T>>,
}

impl<T: Eq + Hash + Clone> InternSet<T> {
    /// Creates an empty table; `name` appears in lookup-miss diagnostics.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(InternInner {
                ids: FastHashMap::default(),
                order: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InternInner<T>> {
        // Ein gepoisonter Mutex heisst: ein anderer Registrierungs-Worker ist
        // gepanict. Die Tabelle selbst ist nie in einem halben Zustand
        // (einzelne push/insert-Paare unter demselben Lock).
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Assigns the next unused id to `value` if unseen, else returns the
    /// existing id. Idempotent.
    pub fn add(&self, value: &T) -> u32 {
        let mut inner = self.lock();
        if let Some(&id) = inner.ids.get(value) {
            return id;
        }
        let id = inner.order.len() as u32;
        inner.ids.insert(value.clone(), id);
        inner.order.push(value.clone());
        id
    }

    /// Pure membership test.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().ids.contains_key(value)
    }

    /// Returns the assigned id; fails if `value` was never added.
    pub fn index<Q>(&self, value: &Q) -> Result<u32>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.lock()
            .ids
            .get(value)
            .copied()
            .ok_or_else(|| Error::lookup_miss(self.name, value))
    }

    /// Number of interned objects.
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// True when no object was interned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn into_frozen(self) -> FrozenSet<T> {
        let inner = self
            .inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        FrozenSet {
            name: self.name,
            ids: inner.ids,
            order: inner.order,
        }
    }
}

/// Immutable snapshot of an [`InternSet`]: lock-free lookup plus positional
/// access for the decoder.
pub struct FrozenSet<T> {
    name: &'static str,
    ids: FastHashMap<T, u32>,
    order: Vec<T>,
}

impl<T: Eq + Hash> FrozenSet<T> {
    /// Pure membership test.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.contains_key(value)
    }

    /// Returns the assigned id; fails if `value` was never added.
    pub fn index<Q>(&self, value: &Q) -> Result<u32>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.ids
            .get(value)
            .copied()
            .ok_or_else(|| Error::lookup_miss(self.name, value))
    }

    /// Object at position `index` (first-registration order).
    pub fn get(&self, index: u32) -> Result<&T> {
        self.order
            .get(index as usize)
            .ok_or(Error::IndexUnresolvable {
                table: self.name,
                index: i64::from(index),
            })
    }

    /// Number of interned objects.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the snapshot holds no object.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The two intern tables the encoder consumes: classes and strings.
///
/// `new` verlangt den designierten Fallback-"Top"-Typ und den Void-Marker
/// und interniert beide sofort — die Fallback-Substitution in Member-Records
/// kann dadurch nie auf einen Lookup-Miss laufen.
pub struct InternPool {
    /// Retained type universe.
    pub classes: InternSet<TypeRef>,
    /// Member names, signatures, string literals, enum constant names.
    pub strings: InternSet<Arc<str>>,
    top: TypeRef,
    void: TypeRef,
    top_index: u32,
    void_index: u32,
}

impl InternPool {
    /// Creates a pool with the fallback top type and the void marker
    /// pre-interned.
    pub fn new(top: TypeRef, void: TypeRef) -> Self {
        let classes = InternSet::new("classes");
        let strings = InternSet::new("strings");
        let top_index = classes.add(&top);
        let void_index = classes.add(&void);
        InternPool {
            classes,
            strings,
            top,
            void,
            top_index,
            void_index,
        }
    }

    /// The designated fallback "top" type.
    pub fn top_type(&self) -> &TypeRef {
        &self.top
    }

    /// The void marker type constructor-like members encode as return type.
    pub fn void_type(&self) -> &TypeRef {
        &self.void
    }

    /// Closes the pool for the terminal encode pass.
    ///
    /// Konsumiert die lebende Tabelle; danach kann nichts mehr registriert
    /// werden. Der Snapshot wird ausschliesslich lesend geteilt.
    pub fn freeze(self) -> FrozenPool {
        FrozenPool {
            classes: self.classes.into_frozen(),
            strings: self.strings.into_frozen(),
            top_index: self.top_index,
            void_index: self.void_index,
        }
    }
}

impl ClassLookup for InternPool {
    fn contains_class(&self, ty: &TypeRef) -> bool {
        self.classes.contains(&**ty)
    }
}

/// Closed snapshot of an [`InternPool`].
pub struct FrozenPool {
    /// Retained type universe.
    pub classes: FrozenSet<TypeRef>,
    /// Member names, signatures, string literals, enum constant names.
    pub strings: FrozenSet<Arc<str>>,
    top_index: u32,
    void_index: u32,
}

impl FrozenPool {
    /// Intern index of a class; lookup miss is a filter/encoder disagreement.
    pub fn class_index(&self, ty: &TypeRef) -> Result<u32> {
        self.classes.index(&**ty)
    }

    /// Intern index of a class, substituting the fallback top type when the
    /// class was not retained. Keeps member records structurally parseable
    /// after type pruning.
    pub fn class_index_or_top(&self, ty: &TypeRef) -> u32 {
        match self.classes.index(&**ty) {
            Ok(index) => index,
            Err(_) => self.top_index,
        }
    }

    /// Intern index of the fallback top type.
    pub fn top_index(&self) -> u32 {
        self.top_index
    }

    /// Intern index of the void marker type.
    pub fn void_index(&self) -> u32 {
        self.void_index
    }

    /// Intern index of a string.
    pub fn string_index(&self, value: &str) -> Result<u32> {
        self.strings.index(value)
    }
}

impl ClassLookup for FrozenPool {
    fn contains_class(&self, ty: &TypeRef) -> bool {
        self.classes.contains(&**ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDesc;

    fn pool() -> InternPool {
        InternPool::new(
            TypeDesc::new(0, "java.lang.Object"),
            TypeDesc::new(1, "void"),
        )
    }

    #[test]
    fn add_is_idempotent() {
        let set: InternSet<Arc<str>> = InternSet::new("strings");
        let a: Arc<str> = "hello".into();
        assert_eq!(set.add(&a), 0);
        assert_eq!(set.add(&a), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ids_follow_first_registration_order() {
        let set: InternSet<Arc<str>> = InternSet::new("strings");
        assert_eq!(set.add(&"a".into()), 0);
        assert_eq!(set.add(&"b".into()), 1);
        assert_eq!(set.add(&"a".into()), 0);
        assert_eq!(set.add(&"c".into()), 2);
    }

    #[test]
    fn index_miss_is_error() {
        let set: InternSet<Arc<str>> = InternSet::new("strings");
        let err = set.index("never").unwrap_err();
        assert!(matches!(err, Error::LookupMiss { table: "strings", .. }));
    }

    #[test]
    fn contains_without_assignment() {
        let set: InternSet<Arc<str>> = InternSet::new("strings");
        assert!(!set.contains("x"));
        set.add(&"x".into());
        assert!(set.contains("x"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn pool_pre_interns_top_and_void() {
        let p = pool();
        assert!(p.contains_class(p.top_type()));
        assert!(p.contains_class(&p.void_type().clone()));
        let frozen = p.freeze();
        assert_eq!(frozen.top_index(), 0);
        assert_eq!(frozen.void_index(), 1);
    }

    #[test]
    fn fallback_substitution_for_unknown_class() {
        let p = pool();
        let known = TypeDesc::new(7, "Known");
        p.classes.add(&known);
        let frozen = p.freeze();
        let unknown = TypeDesc::new(99, "Pruned");
        assert_eq!(frozen.class_index_or_top(&unknown), frozen.top_index());
        assert_eq!(frozen.class_index_or_top(&known), 2);
    }

    #[test]
    fn frozen_positional_access() {
        let p = pool();
        p.strings.add(&"alpha".into());
        p.strings.add(&"beta".into());
        let frozen = p.freeze();
        assert_eq!(&**frozen.strings.get(0).unwrap(), "alpha");
        assert_eq!(&**frozen.strings.get(1).unwrap(), "beta");
        assert!(matches!(
            frozen.strings.get(5),
            Err(Error::IndexUnresolvable { table: "strings", index: 5 })
        ));
    }

    /// Parallele Registrierung desselben Objekts vergibt genau eine Id.
    #[test]
    fn concurrent_add_assigns_at_most_once() {
        let set: Arc<InternSet<Arc<str>>> = Arc::new(InternSet::new("strings"));
        let values: Vec<Arc<str>> = (0..16).map(|i| format!("s{}", i % 4).into()).collect();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let set = Arc::clone(&set);
                let values = values.clone();
                std::thread::spawn(move || {
                    for v in &values {
                        set.add(v);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        // 4 distinct values, ids dense 0..4
        assert_eq!(set.len(), 4);
        let mut ids: Vec<u32> = (0..4).map(|i| set.index(&*format!("s{i}")).unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
