//! Capability-requirement matching.
//!
//! Decides whether a device's advertised capabilities satisfy the ordered
//! requirement list attached to a group invitation. Matching is a predicate,
//! not a validator: malformed ranges or patterns simply fail to match, they
//! never surface as errors.

use glob::Pattern;
use semver::{Version, VersionReq};
use tracing::trace;

use crate::message::{CapabilitySet, Requirement, RequirementType};

/// Returns `true` iff every requirement is satisfied by `capabilities`.
///
/// An empty requirement list matches vacuously. A requirement whose name is
/// absent from the capability set fails the whole list. Every comparator arm
/// yields an explicit boolean so the conjunction never depends on
/// fall-through.
pub fn matches_requirements(capabilities: &CapabilitySet, requirements: &[Requirement]) -> bool {
    requirements.iter().all(|req| {
        let satisfied = match capabilities.get(&req.name) {
            None => false,
            Some(capability) => match req.kind {
                RequirementType::Semver => semver_satisfies(capability, &req.value),
                RequirementType::Glob => glob_matches(capability, &req.value),
                RequirementType::Exact => capability == &req.value,
            },
        };
        if !satisfied {
            trace!(
                requirement = %req.name,
                kind = req.kind.as_str(),
                expected = %req.value,
                "capability requirement not satisfied"
            );
        }
        satisfied
    })
}

/// Semantic-version range satisfaction. The capability value must parse as a
/// version and the requirement value as a range; either failing to parse is a
/// non-match.
fn semver_satisfies(capability: &str, range: &str) -> bool {
    let version = match Version::parse(capability) {
        Ok(v) => v,
        Err(_) => return false,
    };
    match parse_range(range) {
        Some(req) => req.matches(&version),
        None => false,
    }
}

/// Parse a version range, accepting both comma-separated comparator lists
/// (`">=1.0.0, <2.0.0"`) and the space-separated dialect node-semver writes
/// (`">=1.0.0 <2.0.0"`).
fn parse_range(range: &str) -> Option<VersionReq> {
    if let Ok(req) = VersionReq::parse(range) {
        return Some(req);
    }
    let normalized = range.split_whitespace().collect::<Vec<_>>().join(", ");
    VersionReq::parse(&normalized).ok()
}

/// Shell-style glob matching (`*`, `?`, character classes). A malformed
/// pattern is a non-match.
fn glob_matches(capability: &str, pattern: &str) -> bool {
    match Pattern::new(pattern) {
        Ok(pattern) => pattern.matches(capability),
        Err(_) => false,
    }
}
