//! Closed vocabularies and their bit-set representation.
//!
//! Permissions, roles and features are each a closed enum whose members own
//! one bit of a companion bitflags set. The ALL/ANY combinator in this module
//! is the single primitive every access check is built from.

use bitflags::Flags;

/// A closed vocabulary whose members each own one bit of a flag set.
pub trait Vocabulary: Copy + Eq + std::fmt::Debug + 'static {
    /// The bit set holding members of this vocabulary.
    type Set: FlagSet<Item = Self>;

    /// Every member, in declaration (bit) order.
    fn all() -> &'static [Self];

    /// The bit owned by this member.
    fn flag(self) -> Self::Set;
}

/// A bitflags set that can be expanded back into its vocabulary.
pub trait FlagSet: Flags + Copy {
    /// Member type of the vocabulary.
    type Item: Vocabulary<Set = Self>;
}

/// How a list of required members is matched against held members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Match {
    /// At least one required member must be held.
    #[default]
    Any,
    /// Every required member must be held.
    All,
}

impl Match {
    /// Maps the `require_all` flag of a query onto a match mode.
    #[must_use]
    pub const fn from_require_all(require_all: bool) -> Self {
        if require_all {
            Self::All
        } else {
            Self::Any
        }
    }
}

/// Check whether `held` satisfies `required` under `mode`.
///
/// An empty requirement is always satisfied, regardless of mode.
///
/// # Examples
///
/// ```
/// use lp_authz::permissions::{satisfies, Match, PermissionSet};
///
/// let held = PermissionSet::RISK_VIEW | PermissionSet::REPORT_VIEW;
/// let required = PermissionSet::RISK_VIEW | PermissionSet::RISK_ASSESS;
///
/// assert!(satisfies(held, required, Match::Any));
/// assert!(!satisfies(held, required, Match::All));
/// assert!(satisfies(held, PermissionSet::empty(), Match::All));
/// ```
pub fn satisfies<F: Flags + Copy>(held: F, required: F, mode: Match) -> bool {
    if required.is_empty() {
        return true;
    }

    match mode {
        Match::All => held.contains(required),
        Match::Any => held.intersects(required),
    }
}

/// Fold members into their bit set.
pub fn collect<V: Vocabulary>(items: impl IntoIterator<Item = V>) -> V::Set {
    items
        .into_iter()
        .fold(V::Set::empty(), |acc, item| acc.union(item.flag()))
}

/// Expand a bit set into its members, in declaration order.
pub fn members<F: FlagSet>(set: F) -> impl Iterator<Item = F::Item> {
    F::Item::all()
        .iter()
        .copied()
        .filter(move |item| set.contains(item.flag()))
}

/// Serde adapter encoding a flag set as a list of member spellings.
///
/// Used on snapshot fields so the external supplier can send
/// `["role_view", "risk_view"]` rather than raw bits.
pub mod as_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{collect, members, FlagSet};

    pub fn serialize<F, S>(set: &F, serializer: S) -> Result<S::Ok, S::Error>
    where
        F: FlagSet,
        F::Item: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(members(*set))
    }

    pub fn deserialize<'de, F, D>(deserializer: D) -> Result<F, D::Error>
    where
        F: FlagSet,
        F::Item: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let items = Vec::<F::Item>::deserialize(deserializer)?;
        Ok(collect(items))
    }
}
