// SPDX-License-Identifier: AGPL-3.0-or-later

//! Derived queries and multi-table operations of `MemoryStore`, grouped by entity family.
mod collection;
mod field;
mod form;
mod reserved_name;
mod submission;
