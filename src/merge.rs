use std::collections::BTreeMap;

use serde::Serialize;

use super::entities::{PropertyKind, PropertyRecord};
use super::value_objects::ClassRef;

/// Effective property of a class after inheritance resolution.
///
/// Exactly one value exists per distinct property name in a resolution
/// result; resolution is a name-keyed merge, not a multiset union.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedProperty {
    /// Property name, unique within one resolution result.
    pub name: String,
    /// Kind of values the property holds.
    pub kind: PropertyKind,
    /// Optional display label of the winning declaration.
    pub label: Option<String>,
    /// Optional range metadata of the winning declaration.
    pub range: Option<String>,
    /// Whether the property was acquired through inheritance.
    pub inherited: bool,
    /// Declaring ancestor when inherited, `None` for direct declarations.
    pub inherited_from: Option<ClassRef>,
}

/// Why a contested property name resolved to its winner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictReason {
    /// A direct declaration on the target shadowed inherited candidates.
    ShadowedByDirect,
    /// The candidate closest to the target by BFS distance won.
    NearestWins,
    /// Same-distance candidates were split by declaration order.
    DeclarationOrderTiebreak,
}

/// Record of a property name declared by more than one reachable class.
///
/// Conflicts are diagnostic, never fatal: resolution always completes and
/// always returns exactly one property per name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConflictRecord {
    /// The contested property name.
    pub name: String,
    /// Every declaring class, in closure discovery order.
    pub candidates: Vec<ClassRef>,
    /// The declaration that won.
    pub winner: ClassRef,
    /// How the winner was chosen.
    pub reason: ConflictReason,
}

/// One directly-declared property gathered from the ancestor closure.
#[derive(Clone, Debug)]
pub(crate) struct MergeCandidate {
    /// Class declaring the property.
    pub owner: ClassRef,
    /// BFS distance of the owner from the target.
    pub distance: u32,
    /// Discovery index of the owner in the closure; declaration-order
    /// tie-break key.
    pub ordinal: usize,
    /// The declaration itself.
    pub property: PropertyRecord,
}

/// Merges direct declarations from the whole closure into one property per
/// name, emitting a [`ConflictRecord`] for every contested name.
///
/// Candidates must arrive in closure order so that within each name group
/// the ordinal ordering matches discovery order. Output is sorted by name.
pub(crate) fn merge_properties(
    target: &ClassRef,
    candidates: Vec<MergeCandidate>,
) -> (Vec<ResolvedProperty>, Vec<ConflictRecord>) {
    let mut groups: BTreeMap<String, Vec<MergeCandidate>> = BTreeMap::new();
    for candidate in candidates {
        groups
            .entry(candidate.property.name().to_owned())
            .or_default()
            .push(candidate);
    }

    let mut properties = Vec::new();
    let mut conflicts = Vec::new();

    for (name, group) in groups {
        let (winner, reason) = pick_winner(&group);
        let inherited = winner.owner != *target;
        properties.push(ResolvedProperty {
            name: name.clone(),
            kind: winner.property.kind(),
            label: winner.property.label().map(ToOwned::to_owned),
            range: winner.property.range().map(ToOwned::to_owned),
            inherited,
            inherited_from: inherited.then(|| winner.owner.clone()),
        });

        if group.len() > 1 {
            conflicts.push(ConflictRecord {
                name,
                candidates: group
                    .iter()
                    .map(|candidate| candidate.owner.clone())
                    .collect(),
                winner: winner.owner.clone(),
                reason,
            });
        }
    }

    (properties, conflicts)
}

/// Applies the resolution order: direct shadowing, then nearest distance,
/// then earliest discovery.
fn pick_winner(group: &[MergeCandidate]) -> (&MergeCandidate, ConflictReason) {
    if let Some(direct) = group.iter().find(|candidate| candidate.distance == 0) {
        return (direct, ConflictReason::ShadowedByDirect);
    }

    let min_distance = group
        .iter()
        .map(|candidate| candidate.distance)
        .min()
        .unwrap_or_default();
    let mut nearest = group
        .iter()
        .filter(|candidate| candidate.distance == min_distance);
    let winner = nearest
        .clone()
        .min_by_key(|candidate| candidate.ordinal)
        .unwrap_or(&group[0]);
    let reason = if nearest.nth(1).is_some() {
        ConflictReason::DeclarationOrderTiebreak
    } else {
        ConflictReason::NearestWins
    };
    (winner, reason)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{merge_properties, ConflictReason, MergeCandidate};
    use crate::entities::{PropertyKind, PropertyRecord};
    use crate::value_objects::{ClassRef, GraphIri};

    fn cref(name: &str) -> ClassRef {
        let graph = GraphIri::new("https://example.org/g").expect("valid iri");
        ClassRef::new(graph, name)
    }

    fn candidate(owner: &str, distance: u32, ordinal: usize, name: &str) -> MergeCandidate {
        MergeCandidate {
            owner: cref(owner),
            distance,
            ordinal,
            property: PropertyRecord::new(owner, name, PropertyKind::Datatype),
        }
    }

    #[test]
    fn singleton_groups_attribute_inheritance() {
        let target = cref("Child");
        let (properties, conflicts) =
            merge_properties(&target, vec![candidate("Base", 1, 1, "weight")]);

        assert!(conflicts.is_empty());
        assert_eq!(properties.len(), 1);
        assert!(properties[0].inherited);
        assert_eq!(properties[0].inherited_from, Some(cref("Base")));
    }

    #[test]
    fn direct_declarations_are_not_marked_inherited() {
        let target = cref("Child");
        let (properties, conflicts) =
            merge_properties(&target, vec![candidate("Child", 0, 0, "weight")]);

        assert!(conflicts.is_empty());
        assert!(!properties[0].inherited);
        assert_eq!(properties[0].inherited_from, None);
    }

    #[rstest]
    #[case::shadowed(
        vec![("Child", 0, 0), ("Base", 1, 1)],
        "Child",
        ConflictReason::ShadowedByDirect
    )]
    #[case::nearest(
        vec![("Mid", 1, 1), ("Far", 2, 2)],
        "Mid",
        ConflictReason::NearestWins
    )]
    #[case::declaration_order(
        vec![("Left", 1, 1), ("Right", 1, 2)],
        "Left",
        ConflictReason::DeclarationOrderTiebreak
    )]
    fn contested_names_resolve_with_the_expected_reason(
        #[case] owners: Vec<(&str, u32, usize)>,
        #[case] expected_winner: &str,
        #[case] expected_reason: ConflictReason,
    ) {
        let target = cref("Child");
        let candidates = owners
            .into_iter()
            .map(|(owner, distance, ordinal)| candidate(owner, distance, ordinal, "speed"))
            .collect();

        let (properties, conflicts) = merge_properties(&target, candidates);

        assert_eq!(properties.len(), 1);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].winner, cref(expected_winner));
        assert_eq!(conflicts[0].reason, expected_reason);
        assert_eq!(
            properties[0].inherited_from.is_none(),
            expected_winner == "Child"
        );
    }

    #[test]
    fn one_property_per_distinct_name() {
        let target = cref("Child");
        let candidates = vec![
            candidate("Child", 0, 0, "speed"),
            candidate("Left", 1, 1, "speed"),
            candidate("Left", 1, 1, "wheels"),
            candidate("Right", 1, 2, "wheels"),
            candidate("Base", 2, 3, "weight"),
        ];

        let (properties, conflicts) = merge_properties(&target, candidates);

        let names: Vec<&str> = properties
            .iter()
            .map(|property| property.name.as_str())
            .collect();
        assert_eq!(names, vec!["speed", "weight", "wheels"]);
        assert_eq!(conflicts.len(), 2);
    }

    #[test]
    fn missing_metadata_degrades_to_none() {
        let target = cref("Child");
        let (properties, _) = merge_properties(&target, vec![candidate("Base", 1, 1, "speed")]);

        assert_eq!(properties[0].label, None);
        assert_eq!(properties[0].range, None);
    }
}
