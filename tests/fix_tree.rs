use fieldfix::defaults::{builtin_defaults, MappingConfig};
use fieldfix::refactor::{
    self, rewrite, FixOptions, MappingTable, RuleSet, WalkOptions, WriteMode,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn options() -> FixOptions {
    FixOptions {
        walk: WalkOptions::new(
            vec!["ts".to_string(), "tsx".to_string()],
            vec!["node_modules".to_string(), ".git".to_string()],
        ),
        mode: WriteMode::Write,
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

#[test]
fn rewrites_a_service_module() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "services/orders.ts",
        "export async function load(userId: string) {\n  \
         const order = await prisma.order.findFirst({ where: { userId, isActive: true } });\n  \
         return { orderId: order.orderId, createdAt: order.createdAt };\n}\n",
    );

    let rules = RuleSet::builtin().unwrap();
    let summary = refactor::run(root, &rules, &options()).unwrap();

    assert_eq!(
        read(root, "services/orders.ts"),
        "export async function load(user_id: string) {\n  \
         const order = await prisma.order.findFirst({ where: { user_id, is_active: true } });\n  \
         return { order_id: order.order_id, created_at: order.created_at };\n}\n"
    );
    assert_eq!(summary.files_changed, 1);
    assert_eq!(summary.total_changes, 7);
    assert_eq!(summary.changed[0].per_context.member_access, 2);
    assert_eq!(summary.changed[0].per_context.object_key, 4);
    assert_eq!(summary.changed[0].per_context.bare_identifier, 1);
}

#[test]
fn untouched_files_are_not_rewritten() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "util.ts", "export const noop = () => undefined;\n");
    let before = fs::metadata(root.join("util.ts")).unwrap().modified().unwrap();

    let rules = RuleSet::builtin().unwrap();
    let summary = refactor::run(root, &rules, &options()).unwrap();

    assert_eq!(summary.files_scanned, 1);
    assert_eq!(summary.files_changed, 0);
    assert!(summary.changed.is_empty());
    assert_eq!(
        fs::metadata(root.join("util.ts")).unwrap().modified().unwrap(),
        before
    );
}

#[test]
fn adjacent_routing_fields_stay_separate_on_disk() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "routing.tsx", "const ids = [routingStepId, routeTemplateId];\n");

    let rules = RuleSet::builtin().unwrap();
    let summary = refactor::run(root, &rules, &options()).unwrap();

    assert_eq!(
        read(root, "routing.tsx"),
        "const ids = [routing_step_id, route_template_id];\n"
    );
    assert_eq!(summary.total_changes, 2);
}

#[test]
fn dry_run_counts_without_writing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "a.ts", "const userId = order.orderId;\n");

    let rules = RuleSet::builtin().unwrap();
    let mut opts = options();
    opts.mode = WriteMode::DryRun;
    let summary = refactor::run(root, &rules, &opts).unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.total_changes, 2);
    assert!(!summary.changed[0].written);
    assert_eq!(read(root, "a.ts"), "const userId = order.orderId;\n");
}

#[test]
fn skipped_directories_and_other_suffixes_are_ignored() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "node_modules/lib/index.ts", "x.orderId\n");
    write(root, ".git/hooks/h.ts", "x.orderId\n");
    write(root, "app/page.js", "x.orderId\n");
    write(root, "app/page.ts", "x.orderId\n");

    let rules = RuleSet::builtin().unwrap();
    let summary = refactor::run(root, &rules, &options()).unwrap();

    assert_eq!(summary.files_scanned, 1);
    assert_eq!(read(root, "app/page.ts"), "x.order_id\n");
    assert_eq!(read(root, "node_modules/lib/index.ts"), "x.orderId\n");
    assert_eq!(read(root, "app/page.js"), "x.orderId\n");
}

#[test]
fn configured_mappings_extend_every_context() {
    let table = MappingTable::builtin()
        .with_extra(&[
            MappingConfig {
                from: "shipmentRef".to_string(),
                to: None,
            },
            MappingConfig {
                from: "carrierCode".to_string(),
                to: Some("carrier".to_string()),
            },
        ])
        .unwrap();
    let rules = RuleSet::from_table(&table).unwrap();

    let out = rewrite(&rules, "{ shipmentRef: s.shipmentRef, carrierCode }");
    assert_eq!(out.content, "{ shipment_ref: s.shipment_ref, carrier }");
    assert_eq!(out.changes, 3);

    let again = rewrite(&rules, &out.content);
    assert_eq!(again.changes, 0);
}

#[test]
fn invalid_configured_mapping_is_rejected() {
    let err = MappingTable::builtin()
        .with_extra(&[MappingConfig {
            from: "already_snake".to_string(),
            to: None,
        }])
        .unwrap_err();
    assert_eq!(err.code.as_str(), "mapping.invalid_entry");
}

#[cfg(unix)]
#[test]
fn unreadable_file_does_not_stop_the_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "a.ts", "a.userId\n");
    write(root, "b.ts", "b.userId\n");
    fs::set_permissions(root.join("a.ts"), fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to assert in that case.
    if fs::read_to_string(root.join("a.ts")).is_ok() {
        return;
    }

    let rules = RuleSet::builtin().unwrap();
    let summary = refactor::run(root, &rules, &options()).unwrap();

    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].file.ends_with("a.ts"));
    assert_eq!(summary.files_changed, 1);
    assert_eq!(read(root, "b.ts"), "b.user_id\n");

    fs::set_permissions(root.join("a.ts"), fs::Permissions::from_mode(0o644)).unwrap();
}

#[cfg(unix)]
#[test]
fn symlinked_source_is_rewritten_through_the_link() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "shared/types.ts", "x.orderId\n");
    fs::create_dir_all(root.join("src")).unwrap();
    std::os::unix::fs::symlink(root.join("shared/types.ts"), root.join("src/types.ts")).unwrap();

    let rules = RuleSet::builtin().unwrap();
    let summary = refactor::run(&root.join("src"), &rules, &options()).unwrap();

    assert_eq!(summary.total_changes, 1);
    assert!(fs::symlink_metadata(root.join("src/types.ts"))
        .unwrap()
        .file_type()
        .is_symlink());
    assert_eq!(read(root, "shared/types.ts"), "x.order_id\n");
    assert_eq!(read(root, "src/types.ts"), "x.order_id\n");
}

#[test]
fn default_walk_descends_into_node_modules_but_not_git() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "node_modules/lib/index.ts", "x.orderId\n");
    write(root, ".git/hooks/h.ts", "x.orderId\n");

    let defaults = builtin_defaults();
    let opts = FixOptions {
        walk: WalkOptions::new(defaults.extensions, defaults.skip_dirs),
        mode: WriteMode::Write,
    };
    let rules = RuleSet::builtin().unwrap();
    let summary = refactor::run(root, &rules, &opts).unwrap();

    assert_eq!(summary.files_scanned, 1);
    assert_eq!(read(root, "node_modules/lib/index.ts"), "x.order_id\n");
    assert_eq!(read(root, ".git/hooks/h.ts"), "x.orderId\n");
}
