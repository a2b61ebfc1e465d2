//! Text rendering of the generated C artifacts.
//!
//! All renderers are pure: the same [`SyscallSet`] and [`GenConfig`] always
//! produce the same bytes.

use std::path::PathBuf;

use crate::config::GenConfig;
use crate::syscalls::{InvocationGroup, SyscallSet};

const BANNER: &str = "/* auto-generated by gen-syscalls, don't edit */\n";

/// A rendered invocation stub header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubHeader {
    /// Path relative to the header output directory.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

/// The three rendered artifact categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Dispatch table source.
    pub dispatch: String,
    /// Shared syscall list header.
    pub listing: String,
    /// One header per target function, in first-seen order.
    pub headers: Vec<StubHeader>,
    /// Number of descriptors rendered into the table.
    pub syscall_count: usize,
    /// Number of distinct handler symbols.
    pub handler_count: usize,
}

/// Renders every artifact for `set`.
pub fn render_all(set: &SyscallSet, config: &GenConfig) -> Artifacts {
    Artifacts {
        dispatch: dispatch_table(set, config),
        listing: syscall_list(set, config),
        headers: set
            .groups
            .iter()
            .map(|group| StubHeader {
                path: PathBuf::from(&group.function_name),
                contents: invocation_header(group, config),
            })
            .collect(),
        syscall_count: set.ids.len(),
        handler_count: set.handlers.len(),
    }
}

/// Renders the dispatch table: a weak alias for every handler followed by
/// the table initializer, with the bad-syscall entry last.
pub fn dispatch_table(set: &SyscallSet, config: &GenConfig) -> String {
    let mut source = String::new();
    source.push_str(BANNER);
    source.push_str(
        "\n/* Weak handler functions that get replaced by the real ones unless a system\n \
         * call is not implemented due to kernel configuration.\n \
         */\n",
    );

    for handler in &set.handlers {
        source.push_str(&format!("\n__weak ALIAS_OF({})\n", config.no_syscall_handler));
        source.push_str(&prototype("", handler, &config.word_type));
    }

    let bad_entry = format!(
        "[{}] = {}",
        config.bad_syscall_id, config.bad_syscall_handler
    );
    let entries: Vec<&str> = set
        .table_entries
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(bad_entry.as_str()))
        .collect();

    source.push_str(&format!(
        "\n\nconst {} {}[{}] = {{\n\t{}\n}};\n",
        config.table_type,
        config.table_symbol,
        config.limit_id,
        entries.join(",\n\t")
    ));
    source
}

/// Renders the shared listing header: the sorted ID enumeration terminated
/// by the bad-syscall and limit sentinels, plus a plain prototype for every
/// handler.
pub fn syscall_list(set: &SyscallSet, config: &GenConfig) -> String {
    let mut ids = set.sorted_ids();
    ids.push(&config.bad_syscall_id);
    ids.push(&config.limit_id);

    let guard = &config.list_guard;
    let mut source = String::new();
    source.push('\n');
    source.push_str(BANNER);
    source.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
    source.push_str("#ifndef _ASMLANGUAGE\n\n");
    for include in &config.list_includes {
        source.push_str(&format!("#include <{include}>\n"));
    }
    source.push_str(CPP_OPEN);
    source.push_str(&format!("enum {{\n\t{}\n}};\n\n", ids.join(",\n\t")));

    for handler in &set.handlers {
        source.push('\n');
        source.push_str(&prototype("extern ", handler, &config.word_type));
    }

    source.push_str(CPP_CLOSE);
    source.push_str("\n#endif /* _ASMLANGUAGE */\n");
    source.push_str(&format!("\n#endif /* {guard} */\n"));
    source
}

/// Renders the stub header for one function: its snippets in input order,
/// separated by blank lines.
pub fn invocation_header(group: &InvocationGroup, config: &GenConfig) -> String {
    let guard = header_guard(&group.function_name);
    let mut source = String::new();
    source.push('\n');
    source.push_str(BANNER);
    source.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
    source.push_str("#ifndef _ASMLANGUAGE\n\n");
    for include in &config.stub_includes {
        source.push_str(&format!("#include <{include}>\n"));
    }
    source.push_str(CPP_OPEN);
    source.push_str(&group.snippets.join("\n\n"));
    source.push('\n');
    source.push_str(CPP_CLOSE);
    source.push_str("\n#endif /* _ASMLANGUAGE */\n");
    source.push_str(&format!("\n#endif /* {guard} */\n"));
    source
}

const CPP_OPEN: &str = "\n#ifdef __cplusplus\nextern \"C\" {\n#endif\n\n";
const CPP_CLOSE: &str = "\n#ifdef __cplusplus\n}\n#endif\n";

/// Six-word-plus-context handler prototype, continuation aligned under the
/// parameter list.
fn prototype(prefix: &str, name: &str, word: &str) -> String {
    let indent = " ".repeat(prefix.len() + word.len() + name.len() + 2);
    format!(
        "{prefix}{word} {name}({word} arg1, {word} arg2, {word} arg3,\n\
         {indent}{word} arg4, {word} arg5, {word} arg6, void *ssf);\n"
    )
}

/// Include guard for a stub header, derived from its relative path.
///
/// Letters and digits are uppercased, `_` becomes `__` and every other byte
/// becomes `_XX` in hex, so distinct paths that differ in more than letter
/// case never share a guard.
pub fn header_guard(function_name: &str) -> String {
    let mut body = String::with_capacity(function_name.len());
    for byte in function_name.bytes() {
        match byte {
            b'_' => body.push_str("__"),
            b if b.is_ascii_alphanumeric() => body.push(char::from(b.to_ascii_uppercase())),
            b => body.push_str(&format!("_{b:02X}")),
        }
    }
    format!("_SYSCALL_STUBS_{body}_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::SyscallDescriptor;

    fn example_set() -> SyscallSet {
        SyscallSet::collect(&[
            SyscallDescriptor::new(
                "k_sem_take",
                "z_vrfy_k_sem_take",
                "K_SYSCALL_DECLARE2(K_SYSCALL_K_SEM_TAKE, k_sem_take, int, struct k_sem *, sem, s32_t, timeout);",
                "K_SYSCALL_K_SEM_TAKE",
                "[K_SYSCALL_K_SEM_TAKE] = z_vrfy_k_sem_take",
            ),
            SyscallDescriptor::new(
                "k_sem_take",
                "z_vrfy_k_sem_take",
                "K_SYSCALL_DECLARE1_VOID(K_SYSCALL_K_SEM_GIVE, k_sem_give, struct k_sem *, sem);",
                "K_SYSCALL_K_SEM_GIVE",
                "[K_SYSCALL_K_SEM_GIVE] = z_vrfy_k_sem_take",
            ),
            SyscallDescriptor::new(
                "k_mutex_lock",
                "z_vrfy_k_mutex_lock",
                "K_SYSCALL_DECLARE2(K_SYSCALL_K_MUTEX_LOCK, k_mutex_lock, int, struct k_mutex *, mutex, s32_t, timeout);",
                "K_SYSCALL_K_MUTEX_LOCK",
                "[K_SYSCALL_K_MUTEX_LOCK] = z_vrfy_k_mutex_lock",
            ),
        ])
    }

    #[test]
    fn dispatch_table_has_bad_entry_last() {
        let text = dispatch_table(&example_set(), &GenConfig::default());
        assert!(text.contains(
            "const _k_syscall_handler_t _k_syscall_table[K_SYSCALL_LIMIT] = {\n\
             \t[K_SYSCALL_K_SEM_TAKE] = z_vrfy_k_sem_take,\n\
             \t[K_SYSCALL_K_SEM_GIVE] = z_vrfy_k_sem_take,\n\
             \t[K_SYSCALL_K_MUTEX_LOCK] = z_vrfy_k_mutex_lock,\n\
             \t[K_SYSCALL_BAD] = handler_bad_syscall\n\
             };\n"
        ));
        assert!(text.ends_with("};\n"));
    }

    #[test]
    fn dispatch_table_has_one_weak_alias_per_handler() {
        let text = dispatch_table(&example_set(), &GenConfig::default());
        assert_eq!(text.matches("__weak ALIAS_OF(handler_no_syscall)").count(), 2);
        assert_eq!(text.matches("u32_t z_vrfy_k_sem_take(").count(), 1);
        assert_eq!(text.matches("u32_t z_vrfy_k_mutex_lock(").count(), 1);
        assert!(text.contains(
            "__weak ALIAS_OF(handler_no_syscall)\n\
             u32_t z_vrfy_k_mutex_lock(u32_t arg1, u32_t arg2, u32_t arg3,\n\
             \x20                         u32_t arg4, u32_t arg5, u32_t arg6, void *ssf);\n"
        ));
    }

    #[test]
    fn listing_ends_with_sentinels() {
        let text = syscall_list(&example_set(), &GenConfig::default());
        assert!(text.contains(
            "enum {\n\
             \tK_SYSCALL_K_MUTEX_LOCK,\n\
             \tK_SYSCALL_K_SEM_GIVE,\n\
             \tK_SYSCALL_K_SEM_TAKE,\n\
             \tK_SYSCALL_BAD,\n\
             \tK_SYSCALL_LIMIT\n\
             };\n"
        ));
        assert_eq!(text.matches("extern u32_t z_vrfy_k_sem_take(").count(), 1);
        assert!(text.contains("#ifndef _ZEPHYR_SYSCALL_LIST_H_\n#define _ZEPHYR_SYSCALL_LIST_H_\n"));
        assert!(text.contains("#include <zephyr/types.h>\n"));
        assert!(text.contains("extern \"C\" {"));
        assert!(text.ends_with("#endif /* _ZEPHYR_SYSCALL_LIST_H_ */\n"));
    }

    #[test]
    fn empty_set_still_renders_sentinels() {
        let set = SyscallSet::default();
        let config = GenConfig::default();
        assert!(syscall_list(&set, &config).contains("enum {\n\tK_SYSCALL_BAD,\n\tK_SYSCALL_LIMIT\n};"));
        assert!(dispatch_table(&set, &config)
            .contains("= {\n\t[K_SYSCALL_BAD] = handler_bad_syscall\n};"));
    }

    #[test]
    fn stub_header_keeps_snippet_order() {
        let set = example_set();
        let text = invocation_header(&set.groups[0], &GenConfig::default());
        let take = text.find("K_SYSCALL_K_SEM_TAKE").unwrap();
        let give = text.find("K_SYSCALL_K_SEM_GIVE").unwrap();
        assert!(take < give);
        assert!(!text.contains("K_SYSCALL_K_MUTEX_LOCK"));
        assert!(text.contains("#include <syscall_list.h>\n#include <syscall_macros.h>\n"));
        assert!(text.contains("#ifndef _SYSCALL_STUBS_K__SEM__TAKE_\n"));
    }

    #[test]
    fn config_overrides_flow_into_output() {
        let config = GenConfig {
            word_type: "uintptr_t".into(),
            no_syscall_handler: "z_handler_no_syscall".into(),
            table_symbol: "syscall_table".into(),
            ..GenConfig::default()
        };
        let text = dispatch_table(&example_set(), &config);
        assert!(text.contains("__weak ALIAS_OF(z_handler_no_syscall)"));
        assert!(text.contains("uintptr_t z_vrfy_k_sem_take(uintptr_t arg1"));
        assert!(text.contains("syscall_table[K_SYSCALL_LIMIT]"));
    }

    #[test]
    fn render_all_is_deterministic() {
        let set = example_set();
        let config = GenConfig::default();
        let first = render_all(&set, &config);
        assert_eq!(first, render_all(&set, &config));
        assert_eq!(first.syscall_count, 3);
        assert_eq!(first.handler_count, 2);
        let paths: Vec<_> = first.headers.iter().map(|h| h.path.clone()).collect();
        assert_eq!(paths, [PathBuf::from("k_sem_take"), PathBuf::from("k_mutex_lock")]);
    }

    #[test]
    fn guard_from_nested_path() {
        assert_eq!(header_guard("syscalls/kernel.h"), "_SYSCALL_STUBS_SYSCALLS_2FKERNEL_2EH_");
    }

    #[test]
    fn guards_differ_for_separator_lookalikes() {
        assert_ne!(header_guard("a.h"), header_guard("a_h"));
        assert_ne!(header_guard("a/b"), header_guard("a_b"));
        assert_ne!(header_guard("a_2E"), header_guard("a.2E"));
        assert_eq!(header_guard("a_h"), "_SYSCALL_STUBS_A__H_");
    }
}
