// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::models::ReservedName;
use crate::db::MemoryStore;
use crate::reserved;

impl MemoryStore {
    /// Returns all reserved names colliding with a proposed name.
    pub fn check_reserved_name(&self, name: &str) -> Vec<ReservedName> {
        self.read(|tables| reserved::check(tables.reserved_names.iter(), name))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::test_utils::{name_clearance, NameClearance};

    #[rstest]
    #[case("PACRA", 1)]
    #[case("PACRA House", 1)]
    #[case("Bank", 1)]
    #[case("Lusaka Traders", 0)]
    #[case("", 0)]
    fn checks_registry(name_clearance: NameClearance, #[case] name: &str, #[case] matches: usize) {
        assert_eq!(name_clearance.store.check_reserved_name(name).len(), matches);
    }
}
