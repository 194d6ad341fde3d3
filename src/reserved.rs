// SPDX-License-Identifier: AGPL-3.0-or-later

//! Fuzzy matching of proposed names against the reserved-name registry.
use crate::db::models::ReservedName;

/// Returns true when one of both names contains the other, ignoring case.
///
/// Containment is checked in both directions so "PACRA" and "PACRA House" flag each other.
/// Blank names never match, otherwise whitespace is compared as given.
pub fn matches(reserved_name: &str, name: &str) -> bool {
    if reserved_name.trim().is_empty() || name.trim().is_empty() {
        return false;
    }

    let reserved_name = reserved_name.to_lowercase();
    let name = name.to_lowercase();

    name.contains(&reserved_name) || reserved_name.contains(&name)
}

/// Returns all reserved names colliding with the given name, in registry order.
///
/// A blank name returns no matches.
pub fn check<'a, I>(reserved_names: I, name: &str) -> Vec<ReservedName>
where
    I: IntoIterator<Item = &'a ReservedName>,
{
    if name.trim().is_empty() {
        return Vec::new();
    }

    reserved_names
        .into_iter()
        .filter(|reserved| matches(&reserved.reserved_name, name))
        .cloned()
        .collect()
}
