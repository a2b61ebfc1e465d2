//! Grouping pass over the descriptor set.
//!
//! Everything here preserves input order. Groups are ordered by first
//! occurrence of their function name, never by hash or name order, so the
//! rendered output is stable across runs.

use std::collections::{BTreeMap, BTreeSet};

use crate::descriptor::SyscallDescriptor;

/// Invocation snippets destined for one generated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationGroup {
    /// Header name, relative to the output directory.
    pub function_name: String,
    /// Snippets in input order.
    pub snippets: Vec<String>,
}

/// Everything the renderers need, collected in one pass.
#[derive(Debug, Clone, Default)]
pub struct SyscallSet {
    /// Invocation groups in first-seen order.
    pub groups: Vec<InvocationGroup>,
    /// Every numeric ID in input order.
    pub ids: Vec<String>,
    /// Every dispatch entry in input order.
    pub table_entries: Vec<String>,
    /// Distinct handler symbols in first-seen order.
    pub handlers: Vec<String>,
}

impl SyscallSet {
    /// Partitions `descriptors` into groups and collects IDs, entries and
    /// handlers.
    pub fn collect(descriptors: &[SyscallDescriptor]) -> Self {
        let mut set = Self::default();
        let mut group_index: BTreeMap<&str, usize> = BTreeMap::new();
        let mut seen_handlers: BTreeSet<&str> = BTreeSet::new();

        for desc in descriptors {
            let slot = *group_index
                .entry(desc.function_name.as_str())
                .or_insert_with(|| {
                    set.groups.push(InvocationGroup {
                        function_name: desc.function_name.clone(),
                        snippets: Vec::new(),
                    });
                    set.groups.len() - 1
                });
            set.groups[slot]
                .snippets
                .push(desc.invocation_snippet.clone());

            set.ids.push(desc.numeric_id.clone());
            set.table_entries.push(desc.dispatch_entry.clone());

            if seen_handlers.insert(desc.handler_symbol.as_str()) {
                set.handlers.push(desc.handler_symbol.clone());
            }
        }

        set
    }

    /// Numeric IDs sorted by their textual form.
    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(func: &str, handler: &str, id: &str) -> SyscallDescriptor {
        SyscallDescriptor::new(
            func,
            handler,
            format!("/* {id} */"),
            id,
            format!("[{id}] = {handler}"),
        )
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let set = SyscallSet::collect(&[
            desc("zeta", "h_z", "K_SYSCALL_Z"),
            desc("alpha", "h_a", "K_SYSCALL_A"),
            desc("zeta", "h_z2", "K_SYSCALL_Z2"),
        ]);
        let names: Vec<_> = set.groups.iter().map(|g| g.function_name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(
            set.groups[0].snippets,
            ["/* K_SYSCALL_Z */", "/* K_SYSCALL_Z2 */"]
        );
        assert_eq!(set.groups[1].snippets, ["/* K_SYSCALL_A */"]);
    }

    #[test]
    fn handlers_are_deduplicated_in_order() {
        let set = SyscallSet::collect(&[
            desc("k_sem_take", "z_vrfy_k_sem_take", "K_SYSCALL_K_SEM_TAKE"),
            desc("k_sem_take", "z_vrfy_k_sem_take", "K_SYSCALL_K_SEM_GIVE"),
            desc("k_mutex_lock", "z_vrfy_k_mutex_lock", "K_SYSCALL_K_MUTEX_LOCK"),
        ]);
        assert_eq!(set.handlers, ["z_vrfy_k_sem_take", "z_vrfy_k_mutex_lock"]);
        assert_eq!(set.ids.len(), 3);
        assert_eq!(set.table_entries.len(), 3);
    }

    #[test]
    fn ids_sort_textually() {
        let set = SyscallSet::collect(&[
            desc("a", "h", "K_SYSCALL_K_SEM_TAKE"),
            desc("a", "h", "K_SYSCALL_K_MUTEX_LOCK"),
            desc("a", "h", "K_SYSCALL_K_SEM_GIVE"),
        ]);
        assert_eq!(
            set.sorted_ids(),
            [
                "K_SYSCALL_K_MUTEX_LOCK",
                "K_SYSCALL_K_SEM_GIVE",
                "K_SYSCALL_K_SEM_TAKE"
            ]
        );
        // Input order is untouched.
        assert_eq!(set.ids[0], "K_SYSCALL_K_SEM_TAKE");
    }
}
