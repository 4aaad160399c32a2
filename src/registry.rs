use std::any::{Any, TypeId};
use std::collections::hash_map::{Entry, HashMap};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::profile::{ActiveProfiles, Profile, ProfileMatch};
use crate::resolve::{scoped_provider, Provider, Scope, WiringError};

/// Typed logical name of a service.
///
/// Implemented for any small enumeration-like type, keys are never free strings.
pub trait ServiceKey: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<K> ServiceKey for K where K: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

/// One labeled implementation option for a logical service
pub struct Candidate<T: ?Sized> {
    name: String,
    profiles: BTreeSet<Profile>,
    scope: Scope,
    provider: Provider<Arc<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> Candidate<T> {
    /// A shared instance, built on first resolution
    pub fn singleton<I, F>(name: impl Into<String>, profiles: I, constructor: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Profile>,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        Self::scoped(Scope::Singleton, name, profiles, constructor)
    }

    /// A new instance for every resolution
    pub fn prototype<I, F>(name: impl Into<String>, profiles: I, constructor: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Profile>,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        Self::scoped(Scope::Prototype, name, profiles, constructor)
    }

    /// A candidate with an explicit [Scope]
    pub fn scoped<I, F>(scope: Scope, name: impl Into<String>, profiles: I, constructor: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Profile>,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            profiles: profiles
                .into_iter()
                .map(Into::into)
                .filter(|p: &Profile| !p.as_str().is_empty())
                .collect(),
            scope,
            provider: scoped_provider(scope, constructor),
        }
    }
}

impl<T: ?Sized> Candidate<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Obtain an instance from this candidate, ignoring profiles
    pub fn provide(&self) -> Arc<T> {
        self.provider.provide()
    }
}

impl<T: ?Sized> fmt::Debug for Candidate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name)
            .field("profiles", &self.profiles)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Type-erased list of candidates for one capability and key
trait Slot: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn capability(&self) -> &'static str;
    fn verify(&self, name: &str, active: &ActiveProfiles) -> Result<(), WiringError>;
}

struct CandidateList<T: ?Sized>(Vec<Candidate<T>>);

impl<T: ?Sized + Send + Sync + 'static> Slot for CandidateList<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn capability(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn verify(&self, name: &str, active: &ActiveProfiles) -> Result<(), WiringError> {
        select(&self.0, name, active, None).map(|_| ())
    }
}

type SlotKey<K> = (TypeId, K);

/// Collect candidates before freezing them into a [Registry]
pub struct RegistryBuilder<K> {
    slots: HashMap<SlotKey<K>, Box<dyn Slot>>,
    order: Vec<SlotKey<K>>,
}

impl<K: ServiceKey> RegistryBuilder<K> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Add a candidate for the capability `T` under the given key.
    ///
    /// Fails if the candidate has no profile or if its name is already taken for this key.
    pub fn register<T>(&mut self, key: K, candidate: Candidate<T>) -> Result<&mut Self, WiringError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if candidate.profiles.is_empty() {
            return Err(WiringError::MissingProfile {
                name: key.to_string(),
                candidate: candidate.name,
            });
        }

        let slot_key = (TypeId::of::<T>(), key);
        let slot = match self.slots.entry(slot_key) {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                self.order.push(slot_key);
                v.insert(Box::new(CandidateList::<T>(Vec::new())))
            }
        };
        let Some(list) = slot.as_any_mut().downcast_mut::<CandidateList<T>>() else {
            unreachable!("slot type is derived from its TypeId");
        };
        if list.0.iter().any(|c| c.name == candidate.name) {
            return Err(WiringError::DuplicateCandidate {
                name: key.to_string(),
                candidate: candidate.name,
            });
        }
        list.0.push(candidate);
        Ok(self)
    }

    pub fn build(self) -> Registry<K> {
        Registry {
            slots: self.slots,
            order: self.order,
        }
    }
}

impl<K: ServiceKey> Default for RegistryBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable table of candidates, keyed by capability and logical name
pub struct Registry<K> {
    slots: HashMap<SlotKey<K>, Box<dyn Slot>>,
    order: Vec<SlotKey<K>>,
}

impl<K: ServiceKey> Registry<K> {
    pub fn builder() -> RegistryBuilder<K> {
        RegistryBuilder::new()
    }

    /// Candidates registered for a capability and key, in registration order
    pub fn candidates<T: ?Sized + 'static>(&self, key: K) -> &[Candidate<T>] {
        self.slots
            .get(&(TypeId::of::<T>(), key))
            .and_then(|slot| slot.as_any().downcast_ref::<CandidateList<T>>())
            .map(|list| list.0.as_slice())
            .unwrap_or(&[])
    }

    /// Registered keys, in registration order.
    ///
    /// A key registered for several capabilities is listed once.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.order
            .iter()
            .enumerate()
            .filter(|(i, (_, key))| !self.order[..*i].iter().any(|(_, seen)| seen == key))
            .map(|(_, (_, key))| *key)
    }

    /// Select the single candidate matching the active profiles and build its instance
    pub fn resolve<T: ?Sized + 'static>(&self, key: K, active: &ActiveProfiles) -> Result<Arc<T>, WiringError> {
        let candidate = select(self.candidates::<T>(key), &key.to_string(), active, None)?;
        Ok(candidate.provide())
    }

    /// Same as [Registry::resolve], restricted to the candidate with the given name
    pub fn resolve_qualified<T: ?Sized + 'static>(
        &self,
        key: K,
        qualifier: &str,
        active: &ActiveProfiles,
    ) -> Result<Arc<T>, WiringError> {
        let candidate = select(self.candidates::<T>(key), &key.to_string(), active, Some(qualifier))?;
        Ok(candidate.provide())
    }

    /// Check that every registered key resolves under the active profiles, without building anything
    pub fn verify(&self, active: &ActiveProfiles) -> Result<(), WiringError> {
        for slot_key in &self.order {
            let slot = &self.slots[slot_key];
            tracing::debug!(key = %slot_key.1, capability = slot.capability(), "verifying");
            slot.verify(&slot_key.1.to_string(), active)?;
        }
        Ok(())
    }
}

impl<K: ServiceKey> fmt::Debug for Registry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.order.iter().map(|(_, key)| key))
            .finish()
    }
}

/// Pick exactly one candidate among those whose profiles are active
fn select<'a, T: ?Sized>(
    candidates: &'a [Candidate<T>],
    name: &str,
    active: &ActiveProfiles,
    qualifier: Option<&str>,
) -> Result<&'a Candidate<T>, WiringError> {
    if let Some(qualifier) = qualifier {
        if !candidates.iter().any(|c| c.name == qualifier) {
            return Err(WiringError::UnknownQualifier {
                name: name.to_owned(),
                qualifier: qualifier.to_owned(),
            });
        }
    }

    let matched: Vec<(&Candidate<T>, ProfileMatch)> = candidates
        .iter()
        .filter(|c| qualifier.map_or(true, |q| c.name == q))
        .filter_map(|c| active.matching(&c.profiles).map(|m| (c, m)))
        .collect();

    match matched.as_slice() {
        [] => Err(WiringError::UnresolvedDependency {
            name: name.to_owned(),
            active: active.to_string(),
        }),
        [(only, _)] => Ok(*only),
        _ => {
            let specific: Vec<&Candidate<T>> = matched
                .iter()
                .filter(|(_, m)| *m == ProfileMatch::Specific)
                .map(|(c, _)| *c)
                .collect();
            if let [only] = specific.as_slice() {
                return Ok(*only);
            }
            let tied = if specific.is_empty() {
                matched.iter().map(|(c, _)| c.name.clone()).collect()
            } else {
                specific.iter().map(|c| c.name.clone()).collect()
            };
            Err(WiringError::AmbiguousDependency {
                name: name.to_owned(),
                active: active.to_string(),
                candidates: tied,
            })
        }
    }
}
