//! Rights specs: which granted permission must allow which capability.

use std::fmt;
use std::str::FromStr;

use crate::error::GateError;

/// Name of the permission entry consulted by a bare capability spec.
pub const DEFAULT_RIGHTS: &str = "default";

/// What a guarded action requires.
///
/// The textual form is a comma-separated list of `permission:capability`
/// pairs; a bare capability refers to the [`DEFAULT_RIGHTS`] entry.
///
/// ```
/// use bitgrant_gate::RightsSpec;
///
/// let spec: RightsSpec = "post:update, post:delete".parse().unwrap();
/// assert_eq!(
///     spec.entries().collect::<Vec<_>>(),
///     vec![("post", "update"), ("post", "delete")]
/// );
///
/// let spec: RightsSpec = "delete".parse().unwrap();
/// assert_eq!(spec, RightsSpec::Default("delete".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RightsSpec {
    /// A capability of the default permission entry.
    Default(String),
    /// Allowed if any `(permission, capability)` pair is granted. Order is
    /// kept and repeated permission names are all evaluated.
    Any(Vec<(String, String)>),
}

impl RightsSpec {
    /// Spec requiring any of the given pairs.
    pub fn any<I, P, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        Self::Any(
            pairs
                .into_iter()
                .map(|(permission, capability)| (permission.into(), capability.into()))
                .collect(),
        )
    }

    /// The `(permission, capability)` pairs to evaluate, in order.
    pub fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        match self {
            Self::Default(capability) => {
                Box::new(std::iter::once((DEFAULT_RIGHTS, capability.as_str())))
            },
            Self::Any(pairs) => Box::new(
                pairs
                    .iter()
                    .map(|(permission, capability)| (permission.as_str(), capability.as_str())),
            ),
        }
    }
}

impl From<&str> for RightsSpec {
    fn from(capability: &str) -> Self {
        Self::Default(capability.to_owned())
    }
}

impl From<String> for RightsSpec {
    fn from(capability: String) -> Self {
        Self::Default(capability)
    }
}

impl<P: Into<String>, C: Into<String>> From<(P, C)> for RightsSpec {
    fn from(pair: (P, C)) -> Self {
        Self::any([pair])
    }
}

impl<P: Into<String>, C: Into<String>> From<Vec<(P, C)>> for RightsSpec {
    fn from(pairs: Vec<(P, C)>) -> Self {
        Self::any(pairs)
    }
}

impl<P: Into<String>, C: Into<String>, const N: usize> From<[(P, C); N]> for RightsSpec {
    fn from(pairs: [(P, C); N]) -> Self {
        Self::any(pairs)
    }
}

impl FromStr for RightsSpec {
    type Err = GateError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| GateError::InvalidSpec {
            input: input.to_owned(),
            reason: reason.to_owned(),
        };

        if input.trim().is_empty() {
            return Err(invalid("nothing to check"));
        }

        let mut pairs = Vec::new();
        let mut bare_only = true;
        for part in input.split(',').map(str::trim) {
            match part.split_once(':') {
                Some((permission, capability)) => {
                    let (permission, capability) = (permission.trim(), capability.trim());
                    if permission.is_empty() || capability.is_empty() {
                        return Err(invalid("expected `permission:capability`"));
                    }
                    if capability.contains(':') {
                        return Err(invalid("more than one `:` in an entry"));
                    }
                    bare_only = false;
                    pairs.push((permission.to_owned(), capability.to_owned()));
                },
                None if part.is_empty() => return Err(invalid("empty entry")),
                None => pairs.push((DEFAULT_RIGHTS.to_owned(), part.to_owned())),
            }
        }

        if bare_only && let [(_, capability)] = pairs.as_slice() {
            return Ok(Self::Default(capability.clone()));
        }
        Ok(Self::Any(pairs))
    }
}

impl fmt::Display for RightsSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default(capability) => f.write_str(capability),
            Self::Any(pairs) => {
                for (index, (permission, capability)) in pairs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{permission}:{capability}")?;
                }
                Ok(())
            },
        }
    }
}
