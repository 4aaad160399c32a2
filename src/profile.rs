//! Environment labels and the set of labels active in a process.

use std::collections::BTreeSet;
use std::fmt;

/// Label that is active when no other profile is requested
pub const DEFAULT_PROFILE: &str = "default";

/// An environment label such as `dev` or `prod`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Profile(String);

impl Profile {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Profile {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Profile {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a set of candidate labels matches the active profiles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileMatch {
    /// At least one label other than the fallback is active
    Specific,
    /// Only the fallback label is shared
    Fallback,
}

/// The profiles selected for the current process.
///
/// The fallback label is always part of the set when nothing else was requested,
/// and it loses tie-breaks against any other active label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveProfiles {
    labels: BTreeSet<Profile>,
    fallback: Profile,
}

impl ActiveProfiles {
    /// Activate the given labels, using [DEFAULT_PROFILE] as fallback
    pub fn new<I>(labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Profile>,
    {
        Self::with_fallback(labels, DEFAULT_PROFILE)
    }

    pub fn with_fallback<I>(labels: I, fallback: impl Into<Profile>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Profile>,
    {
        let fallback = fallback.into();
        let mut labels: BTreeSet<Profile> = labels
            .into_iter()
            .map(Into::into)
            .filter(|p: &Profile| !p.as_str().is_empty())
            .collect();
        if labels.is_empty() {
            labels.insert(fallback.clone());
        }
        Self { labels, fallback }
    }

    /// Parse a comma-separated list such as `"dev, qa"`
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn fallback(&self) -> &Profile {
        &self.fallback
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|p| p.as_str() == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.labels.iter()
    }

    /// Active labels other than the fallback
    pub fn specific(&self) -> impl Iterator<Item = &Profile> {
        self.labels.iter().filter(move |p| **p != self.fallback)
    }

    /// Compare candidate labels against the active set
    pub fn matching<'a>(&self, labels: impl IntoIterator<Item = &'a Profile>) -> Option<ProfileMatch> {
        let mut result = None;
        for label in labels {
            if !self.labels.contains(label) {
                continue;
            }
            if *label != self.fallback {
                return Some(ProfileMatch::Specific);
            }
            result = Some(ProfileMatch::Fallback);
        }
        result
    }
}

impl Default for ActiveProfiles {
    fn default() -> Self {
        Self::new(std::iter::empty::<Profile>())
    }
}

impl fmt::Display for ActiveProfiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(label.as_str())?;
        }
        f.write_str("]")
    }
}
